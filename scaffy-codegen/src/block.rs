//! Schema block synthesis
//!
//! Assembles the text inserted into the schema file for one model: enum
//! declarations first, then the table body with the identifier column,
//! the declared fields in order and the optional timestamp pair.

use std::collections::BTreeSet;

use crate::context::ModelContext;
use crate::dialect::{ColumnSpec, Dialect, SchemaOptions, TypeMap};
use crate::field::Field;
use crate::imports::required_symbols;

/// One generated table unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlock {
    pub table_name: String,
    /// ORM symbols the block needs.
    pub imports: BTreeSet<String>,
    /// Top-level declarations emitted before the table.
    pub declarations: Vec<String>,
    /// `export const <table> = <fn>("<table>", { ... });`
    pub body: String,
}

impl SchemaBlock {
    /// Full text as inserted into the schema file.
    pub fn text(&self) -> String {
        if self.declarations.is_empty() {
            return self.body.clone();
        }
        format!("{}\n\n{}", self.declarations.join("\n"), self.body)
    }

    /// Number of columns in the table body.
    pub fn column_count(&self) -> usize {
        // header and closing line are not columns
        self.body.lines().count().saturating_sub(2)
    }
}

/// Every column of the table, in emission order.
pub fn columns(
    model: &ModelContext,
    fields: &[Field],
    dialect: Dialect,
    options: SchemaOptions,
) -> Vec<ColumnSpec> {
    let map = TypeMap::new(dialect, options, model);
    let mut columns = Vec::with_capacity(fields.len() + 3);
    columns.push(map.id_column());
    columns.extend(fields.iter().map(|f| map.column(f)));
    columns.extend(map.timestamp_columns());
    columns
}

/// Synthesise the block for `model`.
pub fn build_block(
    model: &ModelContext,
    fields: &[Field],
    dialect: Dialect,
    options: SchemaOptions,
) -> SchemaBlock {
    let map = TypeMap::new(dialect, options, model);

    let declarations = fields
        .iter()
        .filter_map(|f| map.enum_declaration(f))
        .map(|d| d.text)
        .collect();

    let mut body = format!(
        "export const {} = {}(\"{}\", {{\n",
        model.table_const(),
        dialect.table_fn(),
        model.table_name
    );
    for column in columns(model, fields, dialect, options) {
        body.push_str("  ");
        body.push_str(&column.render());
        body.push_str(",\n");
    }
    body.push_str("});");

    SchemaBlock {
        table_name: model.table_name.clone(),
        imports: required_symbols(fields, dialect, options),
        declarations,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::parse_fields;

    #[test]
    fn sqlite_post_block() {
        let model = ModelContext::new("post").unwrap();
        let fields =
            parse_fields(&["title:string", "published:boolean", "authorId:references:user"])
                .unwrap();
        let block = build_block(&model, &fields, Dialect::Sqlite, SchemaOptions::default());

        assert_eq!(
            block.text(),
            "export const posts = sqliteTable(\"posts\", {
  id: integer(\"id\").primaryKey({ autoIncrement: true }),
  title: text(\"title\").notNull(),
  published: integer(\"published\", { mode: \"boolean\" }).notNull(),
  authorId: integer(\"author_id\").notNull().references(() => users.id),
  createdAt: integer(\"created_at\", { mode: \"timestamp\" }).notNull().$defaultFn(() => new Date()),
  updatedAt: integer(\"updated_at\", { mode: \"timestamp\" }).notNull().$defaultFn(() => new Date()).$onUpdate(() => new Date()),
});"
        );
        assert_eq!(block.column_count(), 6);
        assert_eq!(block.table_name, "posts");
    }

    #[test]
    fn postgres_enum_declared_before_table() {
        let model = ModelContext::new("post").unwrap();
        let fields = parse_fields(&["status:enum:draft,published"]).unwrap();
        let options = SchemaOptions {
            timestamps: false,
            ..SchemaOptions::default()
        };
        let block = build_block(&model, &fields, Dialect::Postgres, options);
        let text = block.text();

        assert!(text.starts_with(
            "export const postStatusEnum = pgEnum(\"posts_status\", [\"draft\", \"published\"]);\n\nexport const posts = pgTable("
        ));
        assert_eq!(block.column_count(), 2);
        assert!(block.imports.contains("pgEnum"));
    }

    #[test]
    fn multi_word_model_uses_camel_const() {
        let model = ModelContext::new("BlogPost").unwrap();
        let block = build_block(&model, &[], Dialect::Mysql, SchemaOptions::default());
        assert!(block
            .body
            .starts_with("export const blogPosts = mysqlTable(\"blog_posts\", {\n"));
    }
}
