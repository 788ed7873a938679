//! CLI Command Implementations

pub mod destroy;
pub mod fields;
pub mod generate;

use colored::Colorize;
use scaffy_codegen::ValidationError;

/// Print every validation failure and return how many there were.
pub(crate) fn print_validation_errors(errors: &[ValidationError]) -> usize {
    for e in errors {
        eprintln!("{} [{}] {}", "✗".red(), e.kind, e);
    }
    errors.len()
}
