//! Dialect type map
//!
//! Projects a [`Field`] onto the column builders of one of the three Drizzle
//! dialects. Primitive kinds go through a fixed table; enums, references,
//! the identifier column and the timestamp pair each have their own rule.
//!
//! | kind     | sqlite                      | postgres                    | mysql                       |
//! |----------|-----------------------------|-----------------------------|-----------------------------|
//! | string   | `text`                      | `varchar(255)`              | `varchar(255)`              |
//! | boolean  | `integer` (boolean mode)    | `boolean`                   | `boolean`                   |
//! | datetime | `integer` (timestamp mode)  | `timestamp`                 | `datetime`                  |
//! | decimal  | `text`                      | `numeric(10, 2)`            | `decimal(10, 2)`            |
//!
//! SQLite has no fixed-point type, so decimals are stored as text to keep
//! the exact value.

use std::str::FromStr;

use serde::Serialize;

use crate::context::ModelContext;
use crate::error::ConfigError;
use crate::field::{Field, FieldKind, PrimitiveType};
use crate::inflect::to_pascal_case;

// ── Dialect ──────────────────────────────────────────────────────────────────

/// Target column system. Fixed for the whole invocation.
///
/// Parsed from text through [`FromStr`](std::str::FromStr) only, which
/// also accepts the `turso`, `libsql`, `postgresql` and `pg` aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    Mysql,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Sqlite, Dialect::Postgres, Dialect::Mysql];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
        }
    }

    /// Table declaration function.
    pub fn table_fn(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqliteTable",
            Dialect::Postgres => "pgTable",
            Dialect::Mysql => "mysqlTable",
        }
    }

    /// ORM module the column builders are imported from.
    pub fn module(self) -> &'static str {
        match self {
            Dialect::Sqlite => "drizzle-orm/sqlite-core",
            Dialect::Postgres => "drizzle-orm/pg-core",
            Dialect::Mysql => "drizzle-orm/mysql-core",
        }
    }

    /// Builder used for enum columns, if the dialect has one.
    pub fn enum_symbol(self) -> Option<&'static str> {
        match self {
            Dialect::Sqlite => None,
            Dialect::Postgres => Some("pgEnum"),
            Dialect::Mysql => Some("mysqlEnum"),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "turso" | "libsql" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            other => Err(ConfigError::UnknownDialect(other.to_string())),
        }
    }
}

// ── Options ──────────────────────────────────────────────────────────────────

/// Primary-key strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdMode {
    #[default]
    AutoIncrement,
    Uuid,
}

/// Per-invocation switches that shape the generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaOptions {
    pub id_mode: IdMode,
    /// Emit the `createdAt` / `updatedAt` pair.
    pub timestamps: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            id_mode: IdMode::AutoIncrement,
            timestamps: true,
        }
    }
}

// ── Column spec ──────────────────────────────────────────────────────────────

/// One resolved column of a table body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Property name in the table object (camelCase).
    pub key: String,
    /// Builder called for the column, e.g. `integer` or a local enum constant.
    pub symbol: String,
    /// SQL column name.
    pub column: String,
    /// Second builder argument, e.g. `{ mode: "boolean" }`.
    pub options: Option<String>,
    /// Chained calls without the leading dot, in emission order.
    pub chain: Vec<String>,
    /// Name to import from the ORM module; `None` for local constants.
    pub import: Option<String>,
}

impl ColumnSpec {
    fn new(key: &str, symbol: &str, column: &str, options: Option<String>) -> Self {
        Self {
            key: key.to_string(),
            symbol: symbol.to_string(),
            column: column.to_string(),
            options,
            chain: Vec::new(),
            import: Some(symbol.to_string()),
        }
    }

    fn then(mut self, call: impl Into<String>) -> Self {
        self.chain.push(call.into());
        self
    }

    /// Render as `key: builder("column", options).chain()`.
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}(\"{}\"", self.key, self.symbol, self.column);
        if let Some(options) = &self.options {
            out.push_str(", ");
            out.push_str(options);
        }
        out.push(')');
        for call in &self.chain {
            out.push('.');
            out.push_str(call);
        }
        out
    }
}

/// A top-level declaration emitted before the table for an enum field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub const_name: String,
    pub text: String,
}

// ── Type map ─────────────────────────────────────────────────────────────────

/// Resolves columns for one model in one dialect.
#[derive(Debug, Clone, Copy)]
pub struct TypeMap<'a> {
    pub dialect: Dialect,
    pub options: SchemaOptions,
    pub model: &'a ModelContext,
}

impl<'a> TypeMap<'a> {
    pub fn new(dialect: Dialect, options: SchemaOptions, model: &'a ModelContext) -> Self {
        Self {
            dialect,
            options,
            model,
        }
    }

    /// Column for a declared field.
    pub fn column(&self, field: &Field) -> ColumnSpec {
        let key = field.name.as_str();
        let column = field.column_name();

        let spec = match &field.kind {
            FieldKind::Primitive { ty } => {
                let (symbol, options) = primitive_builder(self.dialect, *ty);
                ColumnSpec::new(key, symbol, &column, options.map(str::to_string))
            }
            FieldKind::Enum { values } => self.enum_column(field, &column, values),
            FieldKind::Reference { target } => {
                let target = ModelContext::derive(target);
                let (symbol, options) = self.reference_builder();
                ColumnSpec::new(key, symbol, &column, options.map(str::to_string))
                    .then(format!("references(() => {}.id)", target.table_const()))
            }
        };

        apply_modifiers(spec, field)
    }

    fn enum_column(&self, field: &Field, column: &str, values: &[String]) -> ColumnSpec {
        match self.dialect {
            Dialect::Sqlite => ColumnSpec::new(
                &field.name,
                "text",
                column,
                Some(format!("{{ enum: {} }}", string_array(values))),
            ),
            Dialect::Postgres => {
                let mut spec =
                    ColumnSpec::new(&field.name, &self.enum_const_name(field), column, None);
                spec.import = None;
                spec
            }
            Dialect::Mysql => ColumnSpec::new(
                &field.name,
                "mysqlEnum",
                column,
                Some(self.enum_const_name(field)),
            ),
        }
    }

    /// Name of the top-level constant backing an enum field.
    pub fn enum_const_name(&self, field: &Field) -> String {
        let suffix = match self.dialect {
            Dialect::Mysql => "Values",
            _ => "Enum",
        };
        format!(
            "{}{}{}",
            self.model.singular.camel,
            to_pascal_case(&field.name),
            suffix
        )
    }

    /// Top-level declaration for an enum field, if this dialect needs one.
    pub fn enum_declaration(&self, field: &Field) -> Option<EnumDeclaration> {
        let values = field.enum_values()?;
        let const_name = self.enum_const_name(field);
        let text = match self.dialect {
            Dialect::Sqlite => return None,
            Dialect::Postgres => format!(
                "export const {const_name} = pgEnum(\"{}_{}\", {});",
                self.model.table_name,
                field.column_name(),
                string_array(values)
            ),
            Dialect::Mysql => format!(
                "export const {const_name} = {} as const;",
                string_array(values)
            ),
        };
        Some(EnumDeclaration { const_name, text })
    }

    /// The primary-key column.
    pub fn id_column(&self) -> ColumnSpec {
        match (self.dialect, self.options.id_mode) {
            (Dialect::Sqlite, IdMode::AutoIncrement) => ColumnSpec::new("id", "integer", "id", None)
                .then("primaryKey({ autoIncrement: true })"),
            (Dialect::Sqlite, IdMode::Uuid) => ColumnSpec::new("id", "text", "id", None)
                .then("primaryKey()")
                .then("$defaultFn(() => crypto.randomUUID())"),
            (Dialect::Postgres, IdMode::AutoIncrement) => {
                ColumnSpec::new("id", "serial", "id", None).then("primaryKey()")
            }
            (Dialect::Postgres, IdMode::Uuid) => ColumnSpec::new("id", "uuid", "id", None)
                .then("primaryKey()")
                .then("defaultRandom()"),
            (Dialect::Mysql, IdMode::AutoIncrement) => {
                ColumnSpec::new("id", "serial", "id", None).then("primaryKey()")
            }
            (Dialect::Mysql, IdMode::Uuid) => {
                ColumnSpec::new("id", "varchar", "id", Some("{ length: 36 }".to_string()))
                    .then("primaryKey()")
                    .then("$defaultFn(() => crypto.randomUUID())")
            }
        }
    }

    /// Builder matching the storage type of an identifier column.
    fn reference_builder(&self) -> (&'static str, Option<&'static str>) {
        match (self.dialect, self.options.id_mode) {
            (Dialect::Sqlite, IdMode::AutoIncrement) => ("integer", None),
            (Dialect::Sqlite, IdMode::Uuid) => ("text", None),
            (Dialect::Postgres, IdMode::AutoIncrement) => ("integer", None),
            (Dialect::Postgres, IdMode::Uuid) => ("uuid", None),
            (Dialect::Mysql, IdMode::AutoIncrement) => {
                ("bigint", Some("{ mode: \"number\", unsigned: true }"))
            }
            (Dialect::Mysql, IdMode::Uuid) => ("varchar", Some("{ length: 36 }")),
        }
    }

    /// `createdAt` / `updatedAt`, or nothing when timestamps are disabled.
    pub fn timestamp_columns(&self) -> Vec<ColumnSpec> {
        if !self.options.timestamps {
            return Vec::new();
        }
        let column = |key: &str, name: &str| match self.dialect {
            Dialect::Sqlite => ColumnSpec::new(
                key,
                "integer",
                name,
                Some("{ mode: \"timestamp\" }".to_string()),
            )
            .then("notNull()")
            .then("$defaultFn(() => new Date())"),
            Dialect::Postgres | Dialect::Mysql => ColumnSpec::new(key, "timestamp", name, None)
                .then("notNull()")
                .then("defaultNow()"),
        };

        let created = column("createdAt", "created_at");
        let updated = column("updatedAt", "updated_at");
        let updated = match self.dialect {
            Dialect::Mysql => updated.then("onUpdateNow()"),
            _ => updated.then("$onUpdate(() => new Date())"),
        };
        vec![created, updated]
    }
}

/// Resolve a single column without holding on to a [`TypeMap`].
pub fn resolve_column(
    field: &Field,
    dialect: Dialect,
    options: SchemaOptions,
    model: &ModelContext,
) -> ColumnSpec {
    TypeMap::new(dialect, options, model).column(field)
}

fn apply_modifiers(mut spec: ColumnSpec, field: &Field) -> ColumnSpec {
    // `references(...)` stays last
    let tail: Vec<String> = spec.chain.drain(..).collect();
    if !field.nullable {
        spec.chain.push("notNull()".to_string());
    }
    if field.unique {
        spec.chain.push("unique()".to_string());
    }
    spec.chain.extend(tail);
    spec
}

/// Builder and inline options for a primitive kind.
pub fn primitive_builder(
    dialect: Dialect,
    ty: PrimitiveType,
) -> (&'static str, Option<&'static str>) {
    use PrimitiveType as P;
    match dialect {
        Dialect::Sqlite => match ty {
            P::String | P::Text | P::Date | P::Decimal | P::Uuid => ("text", None),
            P::Integer => ("integer", None),
            P::BigInt => ("integer", Some("{ mode: \"number\" }")),
            P::Boolean => ("integer", Some("{ mode: \"boolean\" }")),
            P::DateTime => ("integer", Some("{ mode: \"timestamp\" }")),
            P::Float => ("real", None),
            P::Json => ("text", Some("{ mode: \"json\" }")),
        },
        Dialect::Postgres => match ty {
            P::String => ("varchar", Some("{ length: 255 }")),
            P::Text => ("text", None),
            P::Integer => ("integer", None),
            P::BigInt => ("bigint", Some("{ mode: \"number\" }")),
            P::Boolean => ("boolean", None),
            P::DateTime => ("timestamp", None),
            P::Date => ("date", None),
            P::Float => ("doublePrecision", None),
            P::Decimal => ("numeric", Some("{ precision: 10, scale: 2 }")),
            P::Json => ("jsonb", None),
            P::Uuid => ("uuid", None),
        },
        Dialect::Mysql => match ty {
            P::String => ("varchar", Some("{ length: 255 }")),
            P::Text => ("text", None),
            P::Integer => ("int", None),
            P::BigInt => ("bigint", Some("{ mode: \"number\" }")),
            P::Boolean => ("boolean", None),
            P::DateTime => ("datetime", None),
            P::Date => ("date", None),
            P::Float => ("double", None),
            P::Decimal => ("decimal", Some("{ precision: 10, scale: 2 }")),
            P::Json => ("json", None),
            P::Uuid => ("varchar", Some("{ length: 36 }")),
        },
    }
}

fn string_array(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::parse_field;

    fn post() -> ModelContext {
        ModelContext::new("post").unwrap()
    }

    fn render(dialect: Dialect, token: &str) -> String {
        let ctx = post();
        let map = TypeMap::new(dialect, SchemaOptions::default(), &ctx);
        map.column(&parse_field(token).unwrap()).render()
    }

    #[test]
    fn dialect_text_forms() {
        for (text, dialect) in [
            ("turso", Dialect::Sqlite),
            ("libsql", Dialect::Sqlite),
            ("PostgreSQL", Dialect::Postgres),
            ("pg", Dialect::Postgres),
            ("mysql", Dialect::Mysql),
        ] {
            assert_eq!(text.parse::<Dialect>().unwrap(), dialect, "{text}");
        }
        assert!("oracle".parse::<Dialect>().is_err());
        assert_eq!(serde_json::to_string(&Dialect::Postgres).unwrap(), "\"postgres\"");
    }

    #[test]
    fn boolean_differs_per_dialect() {
        let ctx = post();
        let field = parse_field("published:boolean").unwrap();
        let specs: Vec<ColumnSpec> = Dialect::ALL
            .iter()
            .map(|d| TypeMap::new(*d, SchemaOptions::default(), &ctx).column(&field))
            .collect();

        assert_eq!(specs[0].symbol, "integer");
        assert_eq!(specs[0].options.as_deref(), Some("{ mode: \"boolean\" }"));
        assert_eq!(specs[1].symbol, "boolean");
        assert_eq!(specs[1].options, None);
        assert_eq!(specs[2].symbol, "boolean");
        assert_ne!(specs[0], specs[1]);
    }

    #[test]
    fn renders_not_null_and_unique() {
        assert_eq!(
            render(Dialect::Sqlite, "email:string:unique"),
            "email: text(\"email\").notNull().unique()"
        );
        assert_eq!(
            render(Dialect::Postgres, "bio?:text"),
            "bio: text(\"bio\")"
        );
        assert_eq!(
            render(Dialect::Mysql, "title"),
            "title: varchar(\"title\", { length: 255 }).notNull()"
        );
    }

    #[test]
    fn column_names_are_snake_case() {
        assert_eq!(
            render(Dialect::Postgres, "publishedAt:datetime?"),
            "publishedAt: timestamp(\"published_at\")"
        );
    }

    #[test]
    fn decimal_is_exact_on_sqlite() {
        assert_eq!(
            render(Dialect::Sqlite, "price:decimal"),
            "price: text(\"price\").notNull()"
        );
        assert_eq!(
            render(Dialect::Postgres, "price:decimal"),
            "price: numeric(\"price\", { precision: 10, scale: 2 }).notNull()"
        );
    }

    #[test]
    fn every_primitive_resolves_in_every_dialect() {
        for dialect in Dialect::ALL {
            for ty in PrimitiveType::ALL {
                let (symbol, _) = primitive_builder(dialect, *ty);
                assert!(!symbol.is_empty(), "{dialect} {}", ty.as_str());
            }
        }
    }

    #[test]
    fn reference_uses_identifier_type() {
        assert_eq!(
            render(Dialect::Sqlite, "authorId:references:user"),
            "authorId: integer(\"author_id\").notNull().references(() => users.id)"
        );
        assert_eq!(
            render(Dialect::Mysql, "authorId?:references:user"),
            "authorId: bigint(\"author_id\", { mode: \"number\", unsigned: true }).references(() => users.id)"
        );

        let ctx = post();
        let uuid = SchemaOptions {
            id_mode: IdMode::Uuid,
            timestamps: true,
        };
        let field = parse_field("categoryId:references:category").unwrap();
        let spec = TypeMap::new(Dialect::Postgres, uuid, &ctx).column(&field);
        assert_eq!(
            spec.render(),
            "categoryId: uuid(\"category_id\").notNull().references(() => categories.id)"
        );
    }

    #[test]
    fn enum_per_dialect() {
        let ctx = post();
        let field = parse_field("status:enum:draft,published").unwrap();

        let sqlite = TypeMap::new(Dialect::Sqlite, SchemaOptions::default(), &ctx);
        assert_eq!(
            sqlite.column(&field).render(),
            "status: text(\"status\", { enum: [\"draft\", \"published\"] }).notNull()"
        );
        assert!(sqlite.enum_declaration(&field).is_none());

        let pg = TypeMap::new(Dialect::Postgres, SchemaOptions::default(), &ctx);
        let spec = pg.column(&field);
        assert_eq!(spec.render(), "status: postStatusEnum(\"status\").notNull()");
        assert_eq!(spec.import, None);
        assert_eq!(
            pg.enum_declaration(&field).unwrap().text,
            "export const postStatusEnum = pgEnum(\"posts_status\", [\"draft\", \"published\"]);"
        );

        let my = TypeMap::new(Dialect::Mysql, SchemaOptions::default(), &ctx);
        assert_eq!(
            my.column(&field).render(),
            "status: mysqlEnum(\"status\", postStatusValues).notNull()"
        );
        assert_eq!(
            my.enum_declaration(&field).unwrap().text,
            "export const postStatusValues = [\"draft\", \"published\"] as const;"
        );
    }

    #[test]
    fn id_columns() {
        let ctx = post();
        let auto = SchemaOptions::default();
        let uuid = SchemaOptions {
            id_mode: IdMode::Uuid,
            timestamps: true,
        };
        assert_eq!(
            TypeMap::new(Dialect::Sqlite, auto, &ctx).id_column().render(),
            "id: integer(\"id\").primaryKey({ autoIncrement: true })"
        );
        assert_eq!(
            TypeMap::new(Dialect::Postgres, uuid, &ctx).id_column().render(),
            "id: uuid(\"id\").primaryKey().defaultRandom()"
        );
        assert_eq!(
            TypeMap::new(Dialect::Mysql, auto, &ctx).id_column().render(),
            "id: serial(\"id\").primaryKey()"
        );
        assert_eq!(
            TypeMap::new(Dialect::Sqlite, uuid, &ctx).id_column().symbol,
            "text"
        );
    }

    #[test]
    fn timestamps_per_dialect() {
        let ctx = post();
        let sqlite = TypeMap::new(Dialect::Sqlite, SchemaOptions::default(), &ctx);
        let cols = sqlite.timestamp_columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(
            cols[0].render(),
            "createdAt: integer(\"created_at\", { mode: \"timestamp\" }).notNull().$defaultFn(() => new Date())"
        );
        assert!(cols[1].render().ends_with(".$onUpdate(() => new Date())"));

        let my = TypeMap::new(Dialect::Mysql, SchemaOptions::default(), &ctx);
        assert!(my.timestamp_columns()[1].render().ends_with(".onUpdateNow()"));

        let off = SchemaOptions {
            id_mode: IdMode::AutoIncrement,
            timestamps: false,
        };
        assert!(TypeMap::new(Dialect::Postgres, off, &ctx)
            .timestamp_columns()
            .is_empty());
    }

    #[test]
    fn dialect_from_str() {
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("Turso".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert!("oracle".parse::<Dialect>().is_err());
    }
}
