//! Import resolver
//!
//! Computes the ORM symbols a generated block needs and merges them into
//! whatever import list the schema file already has.

use std::collections::BTreeSet;

use crate::context::ModelContext;
use crate::dialect::{Dialect, SchemaOptions, TypeMap};
use crate::field::{Field, FieldKind};

/// Every symbol the block for `fields` imports from the dialect's ORM module.
///
/// The result is sorted; callers must not rely on discovery order.
pub fn required_symbols(
    fields: &[Field],
    dialect: Dialect,
    options: SchemaOptions,
) -> BTreeSet<String> {
    // enum constant names depend on the model, imports never do
    let placeholder = ModelContext::derive("model");
    let map = TypeMap::new(dialect, options, &placeholder);

    let mut symbols = BTreeSet::new();
    symbols.insert(dialect.table_fn().to_string());

    let columns = std::iter::once(map.id_column())
        .chain(fields.iter().map(|f| map.column(f)))
        .chain(map.timestamp_columns());
    symbols.extend(columns.filter_map(|c| c.import));

    if fields
        .iter()
        .any(|f| matches!(f.kind, FieldKind::Enum { .. }))
    {
        match dialect.enum_symbol() {
            Some(sym) => symbols.insert(sym.to_string()),
            // stored as plain strings
            None => symbols.insert("text".to_string()),
        };
    }

    symbols
}

/// Split the body of an `import { ... }` list into its entries.
pub fn parse_import_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Union of `existing` and `required`.
///
/// Existing entries keep their order; new ones are appended in the order
/// `required` yields them. Merging the same `required` twice is a no-op.
pub fn merge_imports<I, S>(existing: &[String], required: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged: Vec<String> = Vec::with_capacity(existing.len());
    for sym in existing {
        if !merged.contains(sym) {
            merged.push(sym.clone());
        }
    }
    for sym in required {
        let sym = sym.as_ref();
        if !merged.iter().any(|m| m == sym) {
            merged.push(sym.to_string());
        }
    }
    merged
}

/// `import { a, b } from "<module>";`
pub fn render_import_line<S: AsRef<str>>(symbols: &[S], dialect: Dialect) -> String {
    let list: Vec<&str> = symbols.iter().map(|s| s.as_ref()).collect();
    format!("import {{ {} }} from \"{}\";", list.join(", "), dialect.module())
}
