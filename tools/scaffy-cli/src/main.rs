//! Scaffy CLI - Field-definition scaffolding for Drizzle projects
//!
//! Generates table blocks in the shared schema file, CRUD server actions and
//! pages from compact `name:type:modifier` field tokens, and removes them
//! again.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{destroy::DestroyCommand, fields::FieldsCommand, generate::GenerateCommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod writer;

/// Scaffy - generate and destroy Drizzle models and CRUD scaffolds
#[derive(Debug, Parser)]
#[command(name = "scaffy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Project root (where package.json / drizzle.config.* live)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a model or a full CRUD scaffold
    #[command(name = "generate", visible_alias = "g")]
    Generate(GenerateCommand),

    /// Remove a previously generated model or scaffold
    #[command(name = "destroy", visible_alias = "d")]
    Destroy(DestroyCommand),

    /// Parse field tokens and print the resulting field model
    #[command(name = "fields")]
    Fields(FieldsCommand),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Command::Generate(cmd) => cmd.execute(&cli.root),
        Command::Destroy(cmd) => cmd.execute(&cli.root),
        Command::Fields(cmd) => cmd.execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
