//! `scaffy fields` subcommand
//!
//! Parses field tokens and prints the field model without touching any file.

use clap::Args;
use scaffy_codegen::{parse_fields, validate_fields};

use super::print_validation_errors;
use crate::error::{CliError, CliResult};
use crate::output::{json, table, OutputFormat};

/// Parse field tokens and print the resulting field model
#[derive(Debug, Args)]
pub struct FieldsCommand {
    /// Field definitions: name[?][:type[?][:payload]][:unique]
    pub tokens: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl FieldsCommand {
    pub fn execute(self) -> CliResult<()> {
        let errors = validate_fields(self.tokens.as_slice());
        if !errors.is_empty() {
            return Err(CliError::InvalidFields(print_validation_errors(&errors)));
        }
        let fields = parse_fields(self.tokens.as_slice())?;

        let output = match self.format {
            OutputFormat::Table => table::format_fields_table(&fields),
            OutputFormat::Json => json::format_fields_json(&fields, true)?,
            OutputFormat::JsonCompact => json::format_fields_json(&fields, false)?,
        };
        println!("{output}");
        Ok(())
    }
}
