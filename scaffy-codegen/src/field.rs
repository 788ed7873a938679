//! Field definition language parser
//!
//! Turns command-line tokens of the form
//! `name[?][:type[?][:payload]][:unique]` into [`Field`] values.
//!
//! Parsing happens in two steps: [`lex`] splits a token into its name, type
//! and payload segments plus an explicit [`Modifier`] set, then the raw token
//! is resolved into the tagged [`FieldKind`] in one pass. Validation is a
//! complete pass over every token before anything is generated.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::inflect::to_snake_case;

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static ENUM_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").unwrap());

/// SQL statement keywords and common column type names. Matched
/// case-insensitively against field names and model names.
pub const RESERVED_WORDS: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "between", "bigint", "blob", "bool",
    "boolean", "by", "case", "char", "check", "column", "constraint", "create", "database",
    "date", "datetime", "decimal", "default", "delete", "desc", "distinct", "double", "drop",
    "else", "end", "exists", "float", "foreign", "from", "grant", "group", "having", "in",
    "index", "inner", "insert", "int", "integer", "into", "is", "join", "json", "key", "left",
    "like", "limit", "not", "null", "numeric", "offset", "on", "or", "order", "outer",
    "primary", "real", "references", "revoke", "right", "schema", "select", "serial", "set",
    "table", "text", "then", "time", "timestamp", "trigger", "union", "unique", "update",
    "uuid", "values", "varchar", "view", "when", "where",
];

/// Returns `true` if `word` is in [`RESERVED_WORDS`], ignoring case.
pub fn is_reserved_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}

// ── Field model ──────────────────────────────────────────────────────────────

/// The closed primitive vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Text,
    Integer,
    BigInt,
    Boolean,
    DateTime,
    Date,
    Float,
    Decimal,
    Json,
    Uuid,
}

impl PrimitiveType {
    pub const ALL: &'static [PrimitiveType] = &[
        Self::String,
        Self::Text,
        Self::Integer,
        Self::BigInt,
        Self::Boolean,
        Self::DateTime,
        Self::Date,
        Self::Float,
        Self::Decimal,
        Self::Json,
        Self::Uuid,
    ];

    /// Resolve a type segment, accepting the `int`, `bool` and `timestamp`
    /// aliases.
    pub fn from_token(s: &str) -> Option<Self> {
        let ty = match s {
            "string" => Self::String,
            "text" => Self::Text,
            "integer" | "int" => Self::Integer,
            "bigint" => Self::BigInt,
            "boolean" | "bool" => Self::Boolean,
            "datetime" | "timestamp" => Self::DateTime,
            "date" => Self::Date,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "json" => Self::Json,
            "uuid" => Self::Uuid,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Json => "json",
            Self::Uuid => "uuid",
        }
    }
}

/// What a field stores. Each kind carries only its own payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Primitive {
        #[serde(rename = "primitive")]
        ty: PrimitiveType,
    },
    Enum {
        values: Vec<String>,
    },
    Reference {
        target: String,
    },
}

/// One declared attribute of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// camelCase identifier.
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub nullable: bool,
    pub unique: bool,
}

impl Field {
    /// A non-null, non-unique primitive field.
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Primitive { ty },
            nullable: false,
            unique: false,
        }
    }

    /// SQL column name (`snake_case`).
    pub fn column_name(&self) -> String {
        to_snake_case(&self.name)
    }

    /// Type label as written in the token: the primitive name, `enum` or
    /// `reference`.
    pub fn type_label(&self) -> &str {
        match &self.kind {
            FieldKind::Primitive { ty } => ty.as_str(),
            FieldKind::Enum { .. } => "enum",
            FieldKind::Reference { .. } => "reference",
        }
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self.kind {
            FieldKind::Primitive { ty } => Some(ty),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Enum { values } => Some(values),
            _ => None,
        }
    }

    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Reference { target } => Some(target),
            _ => None,
        }
    }
}

// ── Lexing ───────────────────────────────────────────────────────────────────

/// Token modifiers, collected before the field is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Modifier {
    /// Trailing `?` on the name or the type segment.
    Nullable,
    /// A literal `unique` segment.
    Unique,
}

/// A token split into segments, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub source: &'a str,
    pub name: &'a str,
    pub type_name: Option<&'a str>,
    pub payload: Option<&'a str>,
    /// Positional segments after the payload.
    pub extra: Vec<&'a str>,
    pub modifiers: BTreeSet<Modifier>,
}

impl RawToken<'_> {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Split a token into name, type, payload and modifiers.
pub fn lex(token: &str) -> RawToken<'_> {
    let mut modifiers = BTreeSet::new();
    let mut segments = token.split(':');

    let raw_name = segments.next().unwrap_or_default();
    let name = match raw_name.strip_suffix('?') {
        Some(stripped) => {
            modifiers.insert(Modifier::Nullable);
            stripped
        }
        None => raw_name,
    };

    let mut positional = Vec::new();
    for segment in segments {
        if segment == "unique" {
            modifiers.insert(Modifier::Unique);
        } else {
            positional.push(segment);
        }
    }

    let mut positional = positional.into_iter();
    let type_name = positional.next().map(|t| match t.strip_suffix('?') {
        Some(stripped) => {
            modifiers.insert(Modifier::Nullable);
            stripped
        }
        None => t,
    });
    let payload = positional.next();

    RawToken {
        source: token,
        name,
        type_name,
        payload,
        extra: positional.collect(),
        modifiers,
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse and validate one token.
pub fn parse_field(token: &str) -> Result<Field, ValidationError> {
    let raw = lex(token);
    let err = |kind, message: String| ValidationError::new(kind, token, message);

    if !FIELD_NAME.is_match(raw.name) {
        return Err(err(
            ValidationErrorKind::InvalidFieldName,
            format!(
                "field name '{}' must start with a lowercase letter and contain only letters and digits",
                raw.name
            ),
        ));
    }
    if is_reserved_word(raw.name) {
        return Err(err(
            ValidationErrorKind::ReservedFieldName,
            format!("'{}' is a reserved SQL word", raw.name),
        ));
    }
    if let Some(extra) = raw.extra.first() {
        return Err(err(
            ValidationErrorKind::UnknownModifier,
            format!("unexpected segment '{extra}' — only 'unique' may follow the payload"),
        ));
    }

    let type_name = raw.type_name.unwrap_or("string");
    let kind = match type_name {
        "reference" | "references" => resolve_reference(&raw).map_err(|m| err(m.0, m.1))?,
        "enum" => resolve_enum(&raw).map_err(|m| err(m.0, m.1))?,
        other => {
            let ty = PrimitiveType::from_token(other).ok_or_else(|| {
                err(
                    ValidationErrorKind::UnknownFieldType,
                    format!(
                        "unknown field type '{other}' — valid types: {}, enum, references",
                        PrimitiveType::ALL
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })?;
            if let Some(payload) = raw.payload {
                return Err(err(
                    ValidationErrorKind::UnknownModifier,
                    format!("type '{other}' takes no payload, found '{payload}'"),
                ));
            }
            FieldKind::Primitive { ty }
        }
    };

    Ok(Field {
        name: raw.name.to_string(),
        kind,
        nullable: raw.has(Modifier::Nullable),
        unique: raw.has(Modifier::Unique),
    })
}

type Violation = (ValidationErrorKind, String);

fn resolve_reference(raw: &RawToken<'_>) -> Result<FieldKind, Violation> {
    match raw.payload.map(str::trim) {
        Some(target) if !target.is_empty() => Ok(FieldKind::Reference {
            target: target.to_string(),
        }),
        _ => Err((
            ValidationErrorKind::MissingReferenceTarget,
            "references needs a target model, e.g. authorId:references:user".to_string(),
        )),
    }
}

fn resolve_enum(raw: &RawToken<'_>) -> Result<FieldKind, Violation> {
    let Some(payload) = raw.payload else {
        return Err((
            ValidationErrorKind::MissingEnumValues,
            "enum needs a comma-separated value list, e.g. status:enum:draft,published"
                .to_string(),
        ));
    };
    if payload.trim().is_empty() {
        return Err((
            ValidationErrorKind::EmptyEnum,
            "enum value list is empty".to_string(),
        ));
    }

    let mut values: Vec<String> = Vec::new();
    for value in payload.split(',').map(str::trim) {
        if !ENUM_VALUE.is_match(value) {
            return Err((
                ValidationErrorKind::InvalidEnumValue,
                format!(
                    "enum value '{value}' must start with a letter and contain only letters, digits, '_' or '-'"
                ),
            ));
        }
        if values.iter().any(|v| v == value) {
            return Err((
                ValidationErrorKind::DuplicateEnumValue,
                format!("duplicate enum value '{value}'"),
            ));
        }
        values.push(value.to_string());
    }

    Ok(FieldKind::Enum { values })
}

/// Parse every token, stopping at the first invalid one.
pub fn parse_fields<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Field>, ValidationError> {
    tokens.iter().map(|t| parse_field(t.as_ref())).collect()
}

/// Validate every token and return all problems found.
///
/// An empty `Vec` means [`parse_fields`] will succeed.
pub fn validate_fields<S: AsRef<str>>(tokens: &[S]) -> Vec<ValidationError> {
    tokens
        .iter()
        .filter_map(|t| parse_field(t.as_ref()).err())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
