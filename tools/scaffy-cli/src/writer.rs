//! File writing with change detection
//!
//! Every write goes through here so that `--dry-run` and `--force` behave the
//! same for the schema file and for scaffold files.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::error::CliResult;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
    /// Exists with different content and overwriting was not allowed.
    Skipped,
    Removed,
    Missing,
}

/// Write `contents` to `path`, creating parent directories as needed.
/// Prints a status line indicating whether the file was written or unchanged.
pub fn write_if_changed(
    path: &Path,
    contents: &str,
    overwrite: bool,
    dry_run: bool,
) -> CliResult<WriteStatus> {
    let existing = std::fs::read_to_string(path).ok();
    if existing.as_deref() == Some(contents) {
        println!("  {} {} unchanged", "·".dimmed(), path.display());
        return Ok(WriteStatus::Unchanged);
    }
    if existing.is_some() && !overwrite {
        println!(
            "  {} {} exists, skipped (use --force to overwrite)",
            "!".yellow(),
            path.display()
        );
        return Ok(WriteStatus::Skipped);
    }

    if dry_run {
        println!("{}  {}", "── would write".dimmed(), path.display());
        println!("{contents}");
        return Ok(WriteStatus::Written);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    println!("  {} {} written", "→".cyan(), path.display());
    Ok(WriteStatus::Written)
}

/// Delete `path` if it exists, then any directories left empty up to `stop`.
pub fn remove_generated(path: &Path, stop: &Path, dry_run: bool) -> CliResult<WriteStatus> {
    if !path.exists() {
        return Ok(WriteStatus::Missing);
    }
    if dry_run {
        println!("  {} {} would be removed", "-".red(), path.display());
        return Ok(WriteStatus::Removed);
    }

    std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    println!("  {} {} removed", "-".red(), path.display());

    let mut dir = path.parent();
    while let Some(d) = dir {
        if d == stop || !d.starts_with(stop) {
            break;
        }
        let is_empty = std::fs::read_dir(d)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty {
            break;
        }
        std::fs::remove_dir(d).with_context(|| format!("removing {}", d.display()))?;
        dir = d.parent();
    }
    Ok(WriteStatus::Removed)
}
