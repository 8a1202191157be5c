//! `attrsync export-empty` command - Export attribute terms lacking a description

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{open_site, warn};
use crate::cli::GlobalOpts;
use crate::core::catalog::CatalogDb;
use crate::core::csv_contract::EXPORT_FILE_NAME;
use crate::core::export::{export_empty_terms, ExportOptions};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Number of terms to export (default: 10, or default_limit from config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Full path to save CSV (default: <uploads>/pa-empty-attributes.csv)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let config = site.config();

    // Only the default location is created on demand
    let (file, create_dir) = match args.file.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => (path, false),
        None => (site.uploads_dir().join(EXPORT_FILE_NAME), true),
    };

    let options = ExportOptions {
        limit: args
            .limit
            .map(|l| l as usize)
            .unwrap_or_else(|| config.default_limit()),
        file,
        taxonomy_prefix: config.taxonomy_prefix(),
        sample_size: config.sample_size(),
        create_dir,
    };

    let db = CatalogDb::open(&site.database_path())?;

    if !global.quiet {
        println!(
            "{} Exporting up to {} empty {}* terms",
            style("→").blue(),
            style(options.limit).cyan(),
            options.taxonomy_prefix
        );
    }

    let report = export_empty_terms(&db, &options)?;

    for skip in &report.skipped {
        warn(format!(
            "Error fetching terms for {}: {}",
            skip.taxonomy, skip.error
        ));
    }

    println!(
        "{} Export complete. Exported {} terms to: {}",
        style("✓").green(),
        style(report.exported).cyan(),
        style(report.path.display()).yellow()
    );
    println!("CSV file: {}", report.path.display());

    Ok(())
}
