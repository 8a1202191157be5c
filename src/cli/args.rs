//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, export::ExportArgs, import::ImportArgs, init::InitArgs,
    terms::TermsCommands,
};

#[derive(Parser)]
#[command(name = "attrsync")]
#[command(author, version, about = "Product attribute description sync")]
#[command(long_about = "Export product attribute terms that lack a description to CSV, then import the generated descriptions back into the catalog.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Site root (default: auto-detect by finding .attrsync/)
    #[arg(long, global = true, env = "ATTRSYNC_SITE")]
    pub site: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new attrsync site
    Init(InitArgs),

    /// Export attribute terms with an empty description to CSV
    #[command(name = "export-empty", visible_alias = "export")]
    Export(ExportArgs),

    /// Import generated descriptions from CSV into the catalog
    Import(ImportArgs),

    /// Inspect catalog terms
    #[command(subcommand)]
    Terms(TermsCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// Just IDs, one per line
    Id,
}
