//! Scaffy Codegen — field definitions to Drizzle schema blocks and CRUD scaffolds
//!
//! This library turns compact `name:type:modifier` tokens into a typed
//! field model and projects it onto the `drizzle-orm` column builders of
//! one of three dialects (sqlite, postgres, mysql). The resulting table
//! block is inserted into, replaced in or removed from a shared,
//! hand-edited schema file without touching anything else in it.
//!
//! - **Parsing** — [`parse_fields`], [`ModelContext::new`]
//! - **Synthesis** — [`build_block`], [`required_symbols`]
//! - **Mutation** — [`has_table`], [`insert_block`], [`remove_block`],
//!   [`upsert_imports`]
//! - **Pipeline** — [`generate_schema`], [`destroy_schema`]
//!
//! # Usage
//!
//! ```rust
//! use scaffy_codegen::{generate_schema, prepare, Dialect, SchemaOptions, SchemaOutcome};
//!
//! let (model, fields) = prepare(
//!     "post",
//!     &["title:string", "published:boolean", "authorId:references:user"],
//! )
//! .unwrap();
//!
//! let change = generate_schema(
//!     &model,
//!     &fields,
//!     Dialect::Sqlite,
//!     SchemaOptions::default(),
//!     false,
//!     "",
//! );
//! assert_eq!(change.outcome, SchemaOutcome::Inserted);
//! assert!(change.content.contains("export const posts = sqliteTable(\"posts\", {"));
//! ```

pub mod block;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod field;
pub mod generator;
pub mod imports;
pub mod inflect;
pub mod schema;
pub mod templates;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use block::{build_block, SchemaBlock};
pub use config::{DialectSource, ProjectConfig};
pub use context::{ModelContext, NameForms};
pub use dialect::{resolve_column, ColumnSpec, Dialect, IdMode, SchemaOptions, TypeMap};
pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use field::{parse_field, parse_fields, validate_fields, Field, FieldKind, PrimitiveType};
pub use generator::{destroy_schema, generate_schema, prepare, SchemaChange, SchemaOutcome};
pub use imports::{merge_imports, required_symbols};
pub use schema::{
    has_table, insert_block, remove_block, remove_enum_declarations, upsert_imports,
    BlockLocator, BlockSpan, BraceScanner,
};
pub use templates::{scaffold_files, GeneratedFile, TemplateContext};
