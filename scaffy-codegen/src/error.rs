//! Error types for the generator pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Model name is not an identifier.
    InvalidModelName,
    /// Model name collides with a reserved SQL word.
    ReservedModelName,
    /// Field name is not a camelCase identifier.
    InvalidFieldName,
    /// Field name collides with a reserved SQL word.
    ReservedFieldName,
    /// Type segment is not in the primitive vocabulary.
    UnknownFieldType,
    /// `enum` type with an empty value list.
    EmptyEnum,
    /// An enum value is not an identifier.
    InvalidEnumValue,
    /// An enum value appears twice.
    DuplicateEnumValue,
    /// `enum` type without a value segment.
    MissingEnumValues,
    /// `references` type without a target model segment.
    MissingReferenceTarget,
    /// A trailing segment that is neither a payload nor a known modifier.
    UnknownModifier,
}

impl ValidationErrorKind {
    /// Stable identifier used in JSON output and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidModelName => "InvalidModelName",
            Self::ReservedModelName => "ReservedModelName",
            Self::InvalidFieldName => "InvalidFieldName",
            Self::ReservedFieldName => "ReservedFieldName",
            Self::UnknownFieldType => "UnknownFieldType",
            Self::EmptyEnum => "EmptyEnum",
            Self::InvalidEnumValue => "InvalidEnumValue",
            Self::DuplicateEnumValue => "DuplicateEnumValue",
            Self::MissingEnumValues => "MissingEnumValues",
            Self::MissingReferenceTarget => "MissingReferenceTarget",
            Self::UnknownModifier => "UnknownModifier",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model-name or field-token validation failure.
///
/// Always fatal for the current command; raised before any synthesis or
/// file access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// The offending token exactly as supplied.
    pub token: String,
    /// Human-readable rule that was violated.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            token: token.into(),
            message: message.into(),
        }
    }

    pub fn is_model_error(&self) -> bool {
        matches!(
            self.kind,
            ValidationErrorKind::InvalidModelName | ValidationErrorKind::ReservedModelName
        )
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subject = if self.is_model_error() {
            "model name"
        } else {
            "field"
        };
        write!(f, "invalid {subject} '{}': {}", self.token, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failures while loading project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("project root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown dialect '{0}' — expected sqlite, postgres or mysql")]
    UnknownDialect(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_token_and_rule() {
        let e = ValidationError::new(
            ValidationErrorKind::InvalidFieldName,
            "Title:string",
            "field names must match ^[a-z][a-zA-Z0-9]*$",
        );
        let s = e.to_string();
        assert!(s.contains("invalid field"), "{s}");
        assert!(s.contains("'Title:string'"), "{s}");
        assert!(s.contains("^[a-z]"), "{s}");
    }

    #[test]
    fn model_errors_are_labelled() {
        let e = ValidationError::new(ValidationErrorKind::ReservedModelName, "select", "reserved");
        assert!(e.is_model_error());
        assert!(e.to_string().starts_with("invalid model name"));
    }
}
