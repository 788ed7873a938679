//! Schema mutation engine
//!
//! Structural edits on a shared, hand-edited schema file: locate a table
//! block by its header line and brace depth, append new blocks, excise
//! existing ones and keep the ORM import line in sync.
//!
//! The file is treated as opaque text. Only lines of the shape
//!
//! ```text
//! export const <ident> = <sqliteTable|pgTable|mysqlTable>("<table>", {
//! ```
//!
//! are recognised, for all three dialects at once. Unbalanced braces never
//! raise: the scan simply never finds the end of the block and the table
//! is reported as absent.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;
use crate::imports::{merge_imports, parse_import_list, render_import_line};

/// Table declaration functions recognised in block headers.
pub const TABLE_FUNCTIONS: [&str; 3] = ["sqliteTable", "pgTable", "mysqlTable"];

static ENUM_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*export\s+const\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:pgEnum\(.*\)|\[.*\]\s*as\s+const)\s*;?\s*$"#)
        .unwrap()
});

/// Header pattern for `table`, usable both per line and on whole content.
fn header_pattern(table: &str) -> Regex {
    let pattern = format!(
        r#"(?m)^[ \t]*export[ \t]+const[ \t]+[A-Za-z_$][A-Za-z0-9_$]*[ \t]*=[ \t]*(?:{})\([ \t]*["'`]{}["'`]"#,
        TABLE_FUNCTIONS.join("|"),
        regex::escape(table)
    );
    // the table name is escaped, so the pattern is always valid
    Regex::new(&pattern).unwrap()
}

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

// ── Block location ───────────────────────────────────────────────────────────

/// Inclusive line range of a table block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

/// Finds the line span of a table block inside file content.
pub trait BlockLocator {
    fn locate(&self, content: &str, table: &str) -> Option<BlockSpan>;
}

/// Line-oriented brace-depth scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceScanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Searching,
    InBlock {
        start: usize,
        depth: i64,
        saw_open: bool,
    },
    Found(BlockSpan),
}

impl BlockLocator for BraceScanner {
    fn locate(&self, content: &str, table: &str) -> Option<BlockSpan> {
        let header = header_pattern(table);
        let mut state = ScanState::Searching;

        for (idx, line) in content.split('\n').enumerate() {
            if state == ScanState::Searching && header.is_match(line) {
                state = ScanState::InBlock {
                    start: idx,
                    depth: 0,
                    saw_open: false,
                };
            }

            if let ScanState::InBlock {
                start,
                mut depth,
                mut saw_open,
            } = state
            {
                for c in line.chars() {
                    match c {
                        '{' => {
                            depth += 1;
                            saw_open = true;
                        }
                        '}' => depth -= 1,
                        _ => {}
                    }
                }
                state = if saw_open && depth == 0 {
                    ScanState::Found(BlockSpan { start, end: idx })
                } else {
                    ScanState::InBlock {
                        start,
                        depth,
                        saw_open,
                    }
                };
            }

            if let ScanState::Found(span) = state {
                return Some(span);
            }
        }

        // EOF while searching or mid-block
        None
    }
}

/// Locate `table` with the default scanner.
pub fn find_block(table: &str, content: &str) -> Option<BlockSpan> {
    BraceScanner.locate(content, table)
}

/// Whether a block header for `table` exists anywhere in `content`.
pub fn has_table(table: &str, content: &str) -> bool {
    header_pattern(table).is_match(content)
}

// ── Insertion ────────────────────────────────────────────────────────────────

/// Append `block` after a single blank separator line.
///
/// Trailing blank lines of `content` move below the block, so removing it
/// again restores the original text. Callers decide whether the table may
/// be written; this never checks.
pub fn insert_block(content: &str, block: &str) -> String {
    let block = block.trim_end_matches('\n');
    if content.trim().is_empty() {
        return format!("{block}\n");
    }

    let body = content.trim_end_matches('\n');
    let trailing = content.len() - body.len();

    let mut out = String::with_capacity(content.len() + block.len() + 3);
    out.push_str(body);
    out.push_str("\n\n");
    out.push_str(block);
    out.push('\n');
    out.push_str(&"\n".repeat(trailing.saturating_sub(1)));
    out
}

// ── Removal ──────────────────────────────────────────────────────────────────

/// Remove the block for `table`; returns the input unchanged if absent.
pub fn remove_block(table: &str, content: &str) -> String {
    match find_block(table, content) {
        Some(span) => excise(content, span),
        None => content.to_string(),
    }
}

/// Remove the block for `table` together with the enum declarations only
/// it uses.
///
/// A declaration goes with the block when its constant is named inside the
/// block and nowhere else in the file. Returns `None` if the table is
/// absent.
pub fn remove_model_block(table: &str, content: &str) -> Option<String> {
    let span = find_block(table, content)?;
    let lines: Vec<&str> = content.split('\n').collect();
    let outside = |idx: usize| idx < span.start || idx > span.end;
    let block_text = lines[span.start..=span.end].join("\n");

    let owned: Vec<String> = lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| outside(*idx))
        .filter_map(|(_, line)| enum_declaration_name(line))
        .filter(|name| mentions_identifier(&block_text, name))
        .filter(|name| {
            !lines.iter().enumerate().any(|(idx, line)| {
                outside(idx)
                    && enum_declaration_name(line) != Some(*name)
                    && mentions_identifier(line, name)
            })
        })
        .map(str::to_string)
        .collect();

    // declarations emitted directly above the block go with it
    let mut start = span.start;
    let mut cursor = start;
    if cursor > 0 && lines[cursor - 1].trim().is_empty() {
        cursor -= 1;
    }
    let mut found_declaration = false;
    while cursor > 0
        && enum_declaration_name(lines[cursor - 1]).is_some_and(|n| owned.iter().any(|o| o == n))
    {
        cursor -= 1;
        found_declaration = true;
    }
    if found_declaration {
        start = cursor;
    }

    let out = excise(content, BlockSpan { start, end: span.end });
    Some(remove_enum_declarations(owned.as_slice(), &out))
}

/// Drop the single-line enum declarations of the constants in `names`.
pub fn remove_enum_declarations<S: AsRef<str>>(names: &[S], content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let kept: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| {
            enum_declaration_name(line)
                .map_or(true, |n| !names.iter().any(|name| name.as_ref() == n))
        })
        .collect();
    if kept.len() == lines.len() {
        return content.to_string();
    }
    collapse_blank_lines(&kept.join("\n"))
}

fn enum_declaration_name(line: &str) -> Option<&str> {
    ENUM_DECLARATION
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether `ident` occurs in `text` as a whole identifier.
fn mentions_identifier(text: &str, ident: &str) -> bool {
    text.match_indices(ident).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + ident.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

fn excise(content: &str, span: BlockSpan) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    lines.drain(span.start..=span.end);

    // drop the separator line that preceded the block
    if span.start > 0 && lines[span.start - 1].trim().is_empty() {
        let followed_by_blank = lines
            .get(span.start)
            .map_or(true, |l| l.trim().is_empty());
        if followed_by_blank {
            lines.remove(span.start - 1);
        }
    } else if span.start == 0 && lines.len() > 1 && lines[0].trim().is_empty() {
        lines.remove(0);
    }

    collapse_blank_lines(&lines.join("\n"))
}

/// Replace every run of three or more consecutive newlines with two.
pub fn collapse_blank_lines(content: &str) -> String {
    BLANK_RUN.replace_all(content, "\n\n").into_owned()
}

// ── Imports ──────────────────────────────────────────────────────────────────

fn import_pattern(dialect: Dialect) -> Regex {
    let pattern = format!(
        r#"import\s*\{{([^}}]*)\}}\s*from\s*["']{}["'][ \t]*;?"#,
        regex::escape(dialect.module())
    );
    Regex::new(&pattern).unwrap()
}

/// Symbols of the first import statement from the dialect's ORM module.
pub fn existing_imports(content: &str, dialect: Dialect) -> Option<Vec<String>> {
    import_pattern(dialect)
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|list| parse_import_list(list.as_str()))
}

/// Make sure the ORM import line lists every symbol in `required`.
///
/// Only the first matching import statement is considered. When nothing
/// new is needed the content is returned untouched; otherwise the list is
/// rewritten wholesale. Without an import line a new one is prepended.
pub fn upsert_imports(content: &str, dialect: Dialect, required: &BTreeSet<String>) -> String {
    let pattern = import_pattern(dialect);

    let Some(caps) = pattern.captures(content) else {
        let symbols: Vec<&String> = required.iter().collect();
        let line = render_import_line(&symbols, dialect);
        return if content.trim().is_empty() {
            format!("{line}\n")
        } else if content.starts_with("import") {
            format!("{line}\n{content}")
        } else {
            format!("{line}\n\n{content}")
        };
    };

    let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
        return content.to_string();
    };

    let existing = parse_import_list(list.as_str());
    let merged = merge_imports(&existing, required);
    if merged.len() == existing.len() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len() + 32);
    out.push_str(&content[..whole.start()]);
    out.push_str(&render_import_line(&merged, dialect));
    out.push_str(&content[whole.end()..]);
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
