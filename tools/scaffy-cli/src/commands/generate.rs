//! `scaffy generate` subcommand
//!
//! Inserts a table block into the project's schema file and, for scaffolds,
//! writes CRUD server actions plus list and form pages.
//!
//! # Usage
//!
//! ```text
//! scaffy generate model post title:string body:text published:boolean
//! scaffy generate scaffold post title status:enum:draft,published authorId:references:user
//! scaffy generate model post title --force          # replace an existing block
//! scaffy generate model post title --dry-run        # print, don't write
//! scaffy generate model post title --dialect pg     # skip detection
//! ```

use std::path::Path;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use scaffy_codegen::templates::{scaffold_files, TemplateContext};
use scaffy_codegen::{
    generate_schema, prepare, validate_fields, Dialect, IdMode, ModelContext, ProjectConfig,
    SchemaOptions, SchemaOutcome,
};
use tracing::debug;

use super::print_validation_errors;
use crate::error::{CliError, CliResult};
use crate::writer::{write_if_changed, WriteStatus};

/// Generate a model or a full CRUD scaffold
#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(subcommand)]
    pub subcommand: GenerateSubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum GenerateSubcommand {
    /// Schema block only
    Model(GenerateArgs),
    /// Schema block, server actions, list page and new-record form
    Scaffold(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Model name, singular or plural (e.g. Post, blog_post)
    pub name: String,

    /// Field definitions: name[?][:type[?][:payload]][:unique]
    pub fields: Vec<String>,

    /// Use random UUID primary keys instead of auto-increment
    #[arg(long)]
    pub uuid: bool,

    /// Omit the createdAt / updatedAt columns
    #[arg(long)]
    pub no_timestamps: bool,

    /// Replace an existing table block and overwrite scaffold files
    #[arg(long)]
    pub force: bool,

    /// Print generated output to stdout instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Dialect override (sqlite, postgres, mysql); detected when omitted
    #[arg(long)]
    pub dialect: Option<Dialect>,
}

impl GenerateArgs {
    fn options(&self) -> SchemaOptions {
        SchemaOptions {
            id_mode: if self.uuid {
                IdMode::Uuid
            } else {
                IdMode::AutoIncrement
            },
            timestamps: !self.no_timestamps,
        }
    }
}

impl GenerateCommand {
    pub fn execute(self, root: &Path) -> CliResult<()> {
        let (args, scaffold) = match self.subcommand {
            GenerateSubcommand::Model(args) => (args, false),
            GenerateSubcommand::Scaffold(args) => (args, true),
        };

        // ── Validate ───────────────────────────────────────────────────────
        ModelContext::new(&args.name)?;
        let errors = validate_fields(args.fields.as_slice());
        if !errors.is_empty() {
            return Err(CliError::InvalidFields(print_validation_errors(&errors)));
        }
        let (model, fields) = prepare(&args.name, args.fields.as_slice())?;

        // ── Configuration ──────────────────────────────────────────────────
        let mut config = ProjectConfig::load(root)?;
        if let Some(dialect) = args.dialect {
            config = config.with_dialect(dialect);
        }
        debug!(dialect = %config.dialect, source = %config.dialect_source, "using dialect");

        // ── Schema block ───────────────────────────────────────────────────
        let schema_file = config.schema_file();
        let current = read_schema(&schema_file)?;
        let change = generate_schema(
            &model,
            &fields,
            config.dialect,
            args.options(),
            args.force,
            &current,
        );

        for w in &change.warnings {
            eprintln!("{} {}", "!".yellow(), w);
        }

        match change.outcome {
            SchemaOutcome::Skipped => println!(
                "  {} table '{}' already exists in {} (use --force to replace)",
                "·".dimmed(),
                model.table_name,
                schema_file.display()
            ),
            _ => {
                write_if_changed(&schema_file, &change.content, true, args.dry_run)?;
            }
        }

        // ── Scaffold files ─────────────────────────────────────────────────
        let mut written = 0;
        if scaffold {
            let ctx = TemplateContext {
                model: &model,
                fields: &fields,
                id_mode: args.options().id_mode,
                db_module: &config.db_module,
                schema_module: &config.schema_module,
            };
            for file in scaffold_files(&config.app_dir, &ctx) {
                let path = config.root.join(&file.path);
                if write_if_changed(&path, &file.contents, args.force, args.dry_run)?
                    == WriteStatus::Written
                {
                    written += 1;
                }
            }
        }

        println!(
            "{} {} {} ({}, dialect from {}){}",
            "✓".green(),
            model.singular.pascal,
            outcome_label(change.outcome),
            config.dialect,
            config.dialect_source,
            if scaffold {
                format!(", {written} scaffold file(s) written")
            } else {
                String::new()
            }
        );

        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Current schema text; a missing file reads as empty and is created on write.
fn read_schema(path: &Path) -> CliResult<String> {
    if !path.exists() {
        debug!(path = %path.display(), "schema file missing, starting empty");
        return Ok(String::new());
    }
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text)
}

fn outcome_label(outcome: SchemaOutcome) -> &'static str {
    match outcome {
        SchemaOutcome::Inserted => "generated",
        SchemaOutcome::Replaced => "replaced",
        SchemaOutcome::Skipped => "left unchanged",
        SchemaOutcome::Removed => "removed",
        SchemaOutcome::NotFound => "not found",
    }
}
