//! `scaffy destroy` subcommand
//!
//! Removes a generated table block (and its enum declarations) from the
//! schema file and, for scaffolds, the generated route files.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use scaffy_codegen::templates::{scaffold_files, TemplateContext};
use scaffy_codegen::{destroy_schema, has_table, IdMode, ModelContext, ProjectConfig, SchemaOutcome};

use crate::error::CliResult;
use crate::writer::{remove_generated, write_if_changed};

/// Remove a previously generated model or scaffold
#[derive(Debug, Args)]
pub struct DestroyCommand {
    #[command(subcommand)]
    pub subcommand: DestroySubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum DestroySubcommand {
    /// Schema block only
    Model(DestroyArgs),
    /// Schema block and scaffold files
    Scaffold(DestroyArgs),
}

#[derive(Debug, Args)]
pub struct DestroyArgs {
    /// Model name, singular or plural
    pub name: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would be removed without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

impl DestroyCommand {
    pub fn execute(self, root: &Path) -> CliResult<()> {
        let (args, scaffold) = match self.subcommand {
            DestroySubcommand::Model(args) => (args, false),
            DestroySubcommand::Scaffold(args) => (args, true),
        };

        let model = ModelContext::new(&args.name)?;
        let config = ProjectConfig::load(root)?;

        let schema_file = config.schema_file();
        let current = if schema_file.exists() {
            std::fs::read_to_string(&schema_file)
                .with_context(|| format!("reading {}", schema_file.display()))?
        } else {
            String::new()
        };

        // file paths do not depend on the field list
        let ctx = TemplateContext {
            model: &model,
            fields: &[],
            id_mode: IdMode::AutoIncrement,
            db_module: &config.db_module,
            schema_module: &config.schema_module,
        };
        let files: Vec<_> = if scaffold {
            scaffold_files(&config.app_dir, &ctx)
                .into_iter()
                .map(|f| config.root.join(f.path))
                .filter(|p| p.exists())
                .collect()
        } else {
            Vec::new()
        };

        let in_schema = has_table(&model.table_name, &current);
        if !in_schema && files.is_empty() {
            println!(
                "  {} table '{}' not found in {}, nothing to remove",
                "·".dimmed(),
                model.table_name,
                schema_file.display()
            );
            return Ok(());
        }

        // ── Confirm ────────────────────────────────────────────────────────
        println!("The following will be removed:");
        if in_schema {
            println!("  - table '{}' in {}", model.table_name, schema_file.display());
        }
        for f in &files {
            println!("  - {}", f.display());
        }
        if !args.yes && !args.dry_run && !confirm("Continue?")? {
            println!("  {} aborted, nothing removed", "·".dimmed());
            return Ok(());
        }

        // ── Remove ─────────────────────────────────────────────────────────
        let change = destroy_schema(&model, &current);
        match schema_step(in_schema, change.outcome) {
            SchemaStep::Write => {
                write_if_changed(&schema_file, &change.content, true, args.dry_run)?;
            }
            SchemaStep::Undelimited => println!(
                "  {} table '{}' could not be delimited in {}, left as is",
                "!".yellow(),
                model.table_name,
                schema_file.display()
            ),
            SchemaStep::Absent => {}
        }

        let stop = config.app_path();
        for f in &files {
            remove_generated(f, &stop, args.dry_run)?;
        }

        println!("{} {} destroyed", "✓".green(), model.singular.pascal);
        Ok(())
    }
}

/// What to do with the schema file after a destroy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaStep {
    Write,
    /// Header present but the block never closed.
    Undelimited,
    /// No table to begin with; only scaffold files were removed.
    Absent,
}

fn schema_step(in_schema: bool, outcome: SchemaOutcome) -> SchemaStep {
    match (in_schema, outcome) {
        (_, SchemaOutcome::Removed) => SchemaStep::Write,
        (true, _) => SchemaStep::Undelimited,
        (false, _) => SchemaStep::Absent,
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
fn confirm(question: &str) -> CliResult<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
