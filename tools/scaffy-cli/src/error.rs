//! CLI Error Types

use scaffy_codegen::{ConfigError, ValidationError};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors with helpful messages and hints
#[derive(Debug, Error)]
pub enum CliError {
    /// Model name or a single field token was rejected
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Several field tokens were rejected; details already printed
    #[error("{0} invalid field definition(s)\n  Hint: run 'scaffy fields <tokens>' to check the syntax")]
    InvalidFields(usize),

    /// Project configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
