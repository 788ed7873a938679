//! Generate / destroy pipeline
//!
//! Ties the parser, the type map and the mutation engine together. Every
//! function here is pure over the schema file text: callers read the file,
//! pass its content in, and decide what to do with the returned text.

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::{build_block, SchemaBlock};
use crate::context::ModelContext;
use crate::dialect::{Dialect, SchemaOptions};
use crate::error::ValidationError;
use crate::field::{parse_fields, Field};
use crate::schema::{has_table, insert_block, remove_model_block, upsert_imports};

/// What happened to the schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaOutcome {
    Inserted,
    Replaced,
    /// Table already present and overwrite was not requested.
    Skipped,
    Removed,
    NotFound,
}

impl SchemaOutcome {
    /// Whether the returned content may differ from the input.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            SchemaOutcome::Inserted | SchemaOutcome::Replaced | SchemaOutcome::Removed
        )
    }
}

/// Result of a pipeline run over one schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaChange {
    pub outcome: SchemaOutcome,
    /// New file content. Identical to the input unless the outcome mutates.
    pub content: String,
    /// Non-fatal findings such as unknown reference targets.
    pub warnings: Vec<String>,
}

/// Validate the model name and every field token.
///
/// Runs to completion before any synthesis or I/O; the first failure is
/// returned.
pub fn prepare<S: AsRef<str>>(
    model_name: &str,
    tokens: &[S],
) -> Result<(ModelContext, Vec<Field>), ValidationError> {
    let model = ModelContext::new(model_name)?;
    let fields = parse_fields(tokens)?;
    debug!(
        model = %model.singular.pascal,
        table = %model.table_name,
        fields = fields.len(),
        "validated model"
    );
    Ok((model, fields))
}

/// Reference targets whose table is not declared in `content`.
pub fn unknown_references(model: &ModelContext, fields: &[Field], content: &str) -> Vec<String> {
    fields
        .iter()
        .filter_map(|f| f.reference_target().map(|t| (f, ModelContext::derive(t))))
        .filter(|(_, target)| {
            target.table_name != model.table_name && !has_table(&target.table_name, content)
        })
        .map(|(field, target)| {
            format!(
                "field '{}' references '{}' but table '{}' is not declared in the schema file",
                field.name, target.singular.pascal, target.table_name
            )
        })
        .collect()
}

/// Insert, replace or skip the block for `model` in `current`.
pub fn generate_schema(
    model: &ModelContext,
    fields: &[Field],
    dialect: Dialect,
    options: SchemaOptions,
    force: bool,
    current: &str,
) -> SchemaChange {
    let warnings = unknown_references(model, fields, current);
    for w in &warnings {
        warn!("{}", w);
    }

    let exists = has_table(&model.table_name, current);
    if exists && !force {
        debug!(table = %model.table_name, "table exists, skipping");
        return SchemaChange {
            outcome: SchemaOutcome::Skipped,
            content: current.to_string(),
            warnings,
        };
    }

    let block: SchemaBlock = build_block(model, fields, dialect, options);

    let (base, outcome) = if exists {
        match remove_model_block(&model.table_name, current) {
            Some(removed) => (removed, SchemaOutcome::Replaced),
            // header present but braces unbalanced: leave the file alone
            None => {
                warn!(table = %model.table_name, "existing block could not be delimited");
                return SchemaChange {
                    outcome: SchemaOutcome::Skipped,
                    content: current.to_string(),
                    warnings,
                };
            }
        }
    } else {
        (current.to_string(), SchemaOutcome::Inserted)
    };

    let inserted = insert_block(&base, &block.text());
    let content = upsert_imports(&inserted, dialect, &block.imports);
    debug!(
        table = %model.table_name,
        outcome = ?outcome,
        columns = block.column_count(),
        "schema block written"
    );

    SchemaChange {
        outcome,
        content,
        warnings,
    }
}

/// Remove the block for `model` and its enum declarations.
///
/// The import line is left as is; unused imports are harmless and may be
/// shared with hand-written code.
pub fn destroy_schema(model: &ModelContext, current: &str) -> SchemaChange {
    match remove_model_block(&model.table_name, current) {
        Some(content) => {
            debug!(table = %model.table_name, "schema block removed");
            SchemaChange {
                outcome: SchemaOutcome::Removed,
                content,
                warnings: Vec::new(),
            }
        }
        None => SchemaChange {
            outcome: SchemaOutcome::NotFound,
            content: current.to_string(),
            warnings: Vec::new(),
        },
    }
}
