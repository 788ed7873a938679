//! Integration tests for the generate / destroy pipeline against files on disk

use std::fs;

use scaffy_codegen::{
    build_block, destroy_schema, generate_schema, has_table, prepare, remove_block, Dialect,
    IdMode, SchemaOptions, SchemaOutcome,
};
use tempfile::TempDir;

const POST_FIELDS: [&str; 3] = ["title:string", "published:boolean", "authorId:references:user"];

#[test]
fn test_sqlite_generate_into_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let schema = temp_dir.path().join("schema.ts");
    fs::write(&schema, "").unwrap();

    let (model, fields) = prepare("post", &POST_FIELDS).unwrap();
    let current = fs::read_to_string(&schema).unwrap();
    let change = generate_schema(
        &model,
        &fields,
        Dialect::Sqlite,
        SchemaOptions::default(),
        false,
        &current,
    );
    fs::write(&schema, &change.content).unwrap();

    let content = fs::read_to_string(&schema).unwrap();
    assert_eq!(change.outcome, SchemaOutcome::Inserted);
    assert_eq!(content.matches("sqliteTable(\"posts\"").count(), 1);

    let import_lines: Vec<&str> = content
        .lines()
        .filter(|l| l.starts_with("import "))
        .collect();
    assert_eq!(
        import_lines,
        ["import { integer, sqliteTable, text } from \"drizzle-orm/sqlite-core\";"]
    );

    let block = build_block(&model, &fields, Dialect::Sqlite, SchemaOptions::default());
    assert_eq!(block.column_count(), 6);
    assert!(content.contains(&block.body));
}

#[test]
fn test_generate_preserves_hand_written_code() {
    let existing = r#"import { integer, sqliteTable, text } from "drizzle-orm/sqlite-core";
import { relations } from "drizzle-orm";

export const users = sqliteTable("users", {
  id: integer("id").primaryKey({ autoIncrement: true }),
  name: text("name").notNull(),
});

export const usersRelations = relations(users, ({ many }) => ({
  posts: many(posts),
}));
"#;
    let (model, fields) = prepare("posts", &POST_FIELDS).unwrap();
    let change = generate_schema(
        &model,
        &fields,
        Dialect::Sqlite,
        SchemaOptions::default(),
        false,
        existing,
    );

    assert_eq!(change.outcome, SchemaOutcome::Inserted);
    assert!(change.warnings.is_empty());
    // every symbol was already imported
    assert!(change.content.starts_with(existing));

    let destroyed = destroy_schema(&model, &change.content);
    assert_eq!(destroyed.outcome, SchemaOutcome::Removed);
    assert_eq!(destroyed.content, existing);
}

#[test]
fn test_second_generate_is_skipped() {
    let (model, fields) = prepare("post", &POST_FIELDS).unwrap();
    let options = SchemaOptions::default();
    let first = generate_schema(&model, &fields, Dialect::Postgres, options, false, "");
    let second = generate_schema(&model, &fields, Dialect::Postgres, options, false, &first.content);

    assert_eq!(second.outcome, SchemaOutcome::Skipped);
    assert_eq!(second.content, first.content);
}

#[test]
fn test_force_replaces_postgres_enum_block() {
    let (model, fields) = prepare("post", &["title", "status:enum:draft,published"]).unwrap();
    let options = SchemaOptions {
        id_mode: IdMode::Uuid,
        timestamps: false,
    };
    let first = generate_schema(&model, &fields, Dialect::Postgres, options, false, "");
    assert!(first
        .content
        .contains("export const postStatusEnum = pgEnum(\"posts_status\", [\"draft\", \"published\"]);"));
    assert!(first.content.contains("id: uuid(\"id\").primaryKey().defaultRandom(),"));

    let (_, renamed) = prepare("post", &["title", "state:enum:open,closed"]).unwrap();
    let forced = generate_schema(&model, &renamed, Dialect::Postgres, options, true, &first.content);

    assert_eq!(forced.outcome, SchemaOutcome::Replaced);
    assert!(!forced.content.contains("postStatusEnum"));
    assert!(forced.content.contains("postStateEnum"));
    assert_eq!(forced.content.matches("pgTable(\"posts\"").count(), 1);
    assert_eq!(forced.content.matches("import {").count(), 1);
}

#[test]
fn test_destroy_keeps_enums_of_models_sharing_a_prefix() {
    let options = SchemaOptions::default();
    let (tag, tag_fields) = prepare("postTag", &["kind:enum:a,b"]).unwrap();
    let (post, post_fields) = prepare("post", &["title", "status:enum:draft,live"]).unwrap();

    let with_tags = generate_schema(&tag, &tag_fields, Dialect::Postgres, options, false, "");
    assert!(with_tags
        .content
        .contains("export const postTagKindEnum = pgEnum(\"post_tags_kind\", [\"a\", \"b\"]);"));
    let with_posts = generate_schema(&post, &post_fields, Dialect::Postgres, options, false, &with_tags.content);

    let destroyed = destroy_schema(&post, &with_posts.content);
    assert_eq!(destroyed.outcome, SchemaOutcome::Removed);
    assert!(!destroyed.content.contains("postStatusEnum"));
    assert!(destroyed
        .content
        .contains("export const postTagKindEnum = pgEnum(\"post_tags_kind\", [\"a\", \"b\"]);"));
    assert!(destroyed.content.contains("kind: postTagKindEnum(\"kind\")"));
}

#[test]
fn test_destroy_absent_table_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let schema = temp_dir.path().join("schema.ts");
    let original = "export const users = mysqlTable(\"users\", {\n  id: serial(\"id\").primaryKey(),\n});\n";
    fs::write(&schema, original).unwrap();

    let (model, _) = prepare("comment", &[] as &[&str]).unwrap();
    let change = destroy_schema(&model, &fs::read_to_string(&schema).unwrap());

    assert_eq!(change.outcome, SchemaOutcome::NotFound);
    assert!(!change.outcome.is_mutation());
    assert_eq!(change.content, original);
}

#[test]
fn test_multiple_models_round_trip() {
    let options = SchemaOptions::default();
    let mut content = String::new();
    for (name, tokens) in [
        ("user", vec!["email:string:unique"]),
        ("post", vec!["title", "authorId:references:user"]),
        ("comment", vec!["body:text", "postId:references:post"]),
    ] {
        let (model, fields) = prepare(name, tokens.as_slice()).unwrap();
        let change = generate_schema(&model, &fields, Dialect::Mysql, options, false, &content);
        assert!(change.warnings.is_empty(), "{name}: {:?}", change.warnings);
        content = change.content;
    }

    for table in ["users", "posts", "comments"] {
        assert!(has_table(table, &content), "{table}");
    }

    let without_posts = remove_block("posts", &content);
    assert!(has_table("users", &without_posts));
    assert!(!has_table("posts", &without_posts));
    assert!(has_table("comments", &without_posts));
    assert!(!without_posts.contains("\n\n\n"));
}
