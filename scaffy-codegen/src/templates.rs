//! CRUD scaffold templates
//!
//! Plain string interpolation over the model context and field list. Three
//! files are produced under `<app_dir>/<plural-kebab>/`:
//!
//! - `actions.ts` — server actions (list, get, create, update, delete)
//! - `page.tsx` — list page with per-row delete
//! - `new/page.tsx` — creation form

use std::path::{Path, PathBuf};

use crate::context::ModelContext;
use crate::dialect::IdMode;
use crate::field::{Field, FieldKind, PrimitiveType};
use crate::inflect::split_words;

/// A file to be written, path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Inputs shared by every template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub model: &'a ModelContext,
    pub fields: &'a [Field],
    pub id_mode: IdMode,
    /// Import specifier of the database client, e.g. `@/db`.
    pub db_module: &'a str,
    /// Import specifier of the schema module, e.g. `@/db/schema`.
    pub schema_module: &'a str,
}

impl TemplateContext<'_> {
    fn id_type(&self) -> &'static str {
        match self.id_mode {
            IdMode::AutoIncrement => "number",
            IdMode::Uuid => "string",
        }
    }

    fn route(&self) -> String {
        format!("/{}", self.model.route_segment())
    }
}

/// Route directory of the model, relative to the project root.
pub fn scaffold_dir(app_dir: &Path, model: &ModelContext) -> PathBuf {
    app_dir.join(model.route_segment())
}

/// Every scaffold file for the model, in write order.
pub fn scaffold_files(app_dir: &Path, ctx: &TemplateContext<'_>) -> Vec<GeneratedFile> {
    let dir = scaffold_dir(app_dir, ctx.model);
    vec![
        GeneratedFile {
            path: dir.join("actions.ts"),
            contents: actions_ts(ctx),
        },
        GeneratedFile {
            path: dir.join("page.tsx"),
            contents: list_page_tsx(ctx),
        },
        GeneratedFile {
            path: dir.join("new").join("page.tsx"),
            contents: new_page_tsx(ctx),
        },
    ]
}

// ── actions.ts ───────────────────────────────────────────────────────────────

pub fn actions_ts(ctx: &TemplateContext<'_>) -> String {
    let s = &ctx.model.singular.pascal;
    let p = &ctx.model.plural.pascal;
    let table = ctx.model.table_const();
    let id = ctx.id_type();
    let route = ctx.route();

    let mut assignments = String::new();
    for field in ctx.fields {
        assignments.push_str(&format!(
            "    {}: {},\n",
            field.name,
            form_value(field, ctx.id_mode, s)
        ));
    }

    format!(
        r#""use server";

import {{ eq }} from "drizzle-orm";
import {{ revalidatePath }} from "next/cache";
import {{ redirect }} from "next/navigation";
import {{ db }} from "{db}";
import {{ {table} }} from "{schema}";

export type {s} = typeof {table}.$inferSelect;
export type New{s} = typeof {table}.$inferInsert;

function parse{s}Form(formData: FormData): New{s} {{
  return {{
{assignments}  }};
}}

export async function list{p}(): Promise<{s}[]> {{
  return db.select().from({table});
}}

export async function get{s}(id: {id}): Promise<{s} | undefined> {{
  const rows = await db.select().from({table}).where(eq({table}.id, id)).limit(1);
  return rows[0];
}}

export async function create{s}(formData: FormData) {{
  await db.insert({table}).values(parse{s}Form(formData));
  revalidatePath("{route}");
  redirect("{route}");
}}

export async function update{s}(id: {id}, formData: FormData) {{
  await db.update({table}).set(parse{s}Form(formData)).where(eq({table}.id, id));
  revalidatePath("{route}");
  redirect("{route}");
}}

export async function delete{s}(id: {id}) {{
  await db.delete({table}).where(eq({table}.id, id));
  revalidatePath("{route}");
}}
"#,
        db = ctx.db_module,
        schema = ctx.schema_module,
    )
}

/// FormData coercion expression for one field.
fn form_value(field: &Field, id_mode: IdMode, model_pascal: &str) -> String {
    let raw = format!("formData.get(\"{}\")", field.name);
    let value = match &field.kind {
        FieldKind::Primitive { ty } => match ty {
            PrimitiveType::Boolean => return format!("{raw} === \"on\""),
            PrimitiveType::Integer | PrimitiveType::BigInt | PrimitiveType::Float => {
                format!("Number({raw})")
            }
            PrimitiveType::DateTime => format!("new Date(String({raw}))"),
            PrimitiveType::Json => format!("JSON.parse(String({raw}))"),
            PrimitiveType::String
            | PrimitiveType::Text
            | PrimitiveType::Date
            | PrimitiveType::Decimal
            | PrimitiveType::Uuid => format!("String({raw})"),
        },
        FieldKind::Enum { .. } => {
            format!("String({raw}) as {model_pascal}[\"{}\"]", field.name)
        }
        FieldKind::Reference { .. } => match id_mode {
            IdMode::AutoIncrement => format!("Number({raw})"),
            IdMode::Uuid => format!("String({raw})"),
        },
    };

    if field.nullable {
        format!("{raw} ? {value} : null")
    } else {
        value
    }
}

// ── page.tsx ─────────────────────────────────────────────────────────────────

pub fn list_page_tsx(ctx: &TemplateContext<'_>) -> String {
    let s = &ctx.model.singular.pascal;
    let p = &ctx.model.plural.pascal;
    let route = ctx.route();

    let mut headers = String::new();
    let mut cells = String::new();
    for field in ctx.fields {
        headers.push_str(&format!("            <th>{}</th>\n", humanize(&field.name)));
        cells.push_str(&format!("              <td>{}</td>\n", display_cell(field)));
    }

    format!(
        r#"import Link from "next/link";
import {{ delete{s}, list{p} }} from "./actions";

export default async function {p}Page() {{
  const rows = await list{p}();

  return (
    <main>
      <h1>{title}</h1>
      <Link href="{route}/new">New {label}</Link>
      <table>
        <thead>
          <tr>
            <th>Id</th>
{headers}            <th />
          </tr>
        </thead>
        <tbody>
          {{rows.map((row) => (
            <tr key={{row.id}}>
              <td>{{row.id}}</td>
{cells}              <td>
                <form action={{delete{s}.bind(null, row.id)}}>
                  <button type="submit">Delete</button>
                </form>
              </td>
            </tr>
          ))}}
        </tbody>
      </table>
    </main>
  );
}}
"#,
        title = capitalize(&humanize(&ctx.model.plural.snake)),
        label = humanize(&ctx.model.singular.snake).to_lowercase(),
    )
}

fn display_cell(field: &Field) -> String {
    let value = format!("row.{}", field.name);
    match field.primitive_type() {
        Some(PrimitiveType::Boolean) => format!("{{{value} ? \"Yes\" : \"No\"}}"),
        Some(PrimitiveType::DateTime) => format!("{{{value}?.toLocaleString()}}"),
        Some(PrimitiveType::Json) => format!("{{JSON.stringify({value})}}"),
        _ => format!("{{String({value} ?? \"\")}}"),
    }
}

// ── new/page.tsx ─────────────────────────────────────────────────────────────

pub fn new_page_tsx(ctx: &TemplateContext<'_>) -> String {
    let s = &ctx.model.singular.pascal;
    let label = humanize(&ctx.model.singular.snake).to_lowercase();

    let mut inputs = String::new();
    for field in ctx.fields {
        inputs.push_str(&form_input(field));
    }

    format!(
        r#"import {{ create{s} }} from "../actions";

export default function New{s}Page() {{
  return (
    <main>
      <h1>New {label}</h1>
      <form action={{create{s}}}>
{inputs}        <button type="submit">Create {label}</button>
      </form>
    </main>
  );
}}
"#
    )
}

fn form_input(field: &Field) -> String {
    let name = &field.name;
    let required = if field.nullable { "" } else { " required" };

    let control = match &field.kind {
        FieldKind::Enum { values } => {
            let mut select = format!("          <select name=\"{name}\"{required}>\n");
            for v in values {
                select.push_str(&format!("            <option value=\"{v}\">{v}</option>\n"));
            }
            select.push_str("          </select>\n");
            select
        }
        FieldKind::Reference { .. } => {
            format!("          <input name=\"{name}\" type=\"number\"{required} />\n")
        }
        FieldKind::Primitive { ty } => match ty {
            PrimitiveType::Boolean => {
                format!("          <input name=\"{name}\" type=\"checkbox\" />\n")
            }
            PrimitiveType::Text | PrimitiveType::Json => {
                format!("          <textarea name=\"{name}\"{required} />\n")
            }
            _ => format!(
                "          <input name=\"{name}\" type=\"{}\"{}{required} />\n",
                input_type(*ty),
                step(*ty)
            ),
        },
    };

    format!(
        "        <label>\n          {}\n{control}        </label>\n",
        humanize(name)
    )
}

fn input_type(ty: PrimitiveType) -> &'static str {
    match ty {
        PrimitiveType::Integer
        | PrimitiveType::BigInt
        | PrimitiveType::Float
        | PrimitiveType::Decimal => "number",
        PrimitiveType::Date => "date",
        PrimitiveType::DateTime => "datetime-local",
        _ => "text",
    }
}

fn step(ty: PrimitiveType) -> &'static str {
    match ty {
        PrimitiveType::Float | PrimitiveType::Decimal => " step=\"any\"",
        _ => "",
    }
}

// ── Labels ───────────────────────────────────────────────────────────────────

/// `authorId` → `Author id`
fn humanize(name: &str) -> String {
    let words: Vec<String> = split_words(name).iter().map(|w| w.to_lowercase()).collect();
    capitalize(&words.join(" "))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
