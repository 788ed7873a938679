//! Table Output Formatting

use colored::Colorize;
use scaffy_codegen::{Field, FieldKind};
use tabled::{builder::Builder, settings::Style};

/// Format parsed fields as a table
pub fn format_fields_table(fields: &[Field]) -> String {
    if fields.is_empty() {
        return "No fields".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(vec!["Name", "Column", "Type", "Details", "Nullable", "Unique"]);

    for field in fields {
        let details = match &field.kind {
            FieldKind::Primitive { .. } => String::new(),
            FieldKind::Enum { values } => values.join(", "),
            FieldKind::Reference { target } => format!("→ {target}"),
        };

        builder.push_record(vec![
            field.name.clone(),
            field.column_name(),
            field.type_label().to_string(),
            details,
            flag(field.nullable),
            flag(field.unique),
        ]);
    }

    builder.build().with(Style::modern()).to_string()
}

fn flag(on: bool) -> String {
    if on {
        "yes".green().to_string()
    } else {
        "no".dimmed().to_string()
    }
}
