//! `attrsync import` command - Apply generated descriptions from CSV

use clap::ArgAction;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{open_site, parse_flag, warn};
use crate::cli::GlobalOpts;
use crate::core::catalog::CatalogDb;
use crate::core::import::{
    import_descriptions, resolve_csv_path, ImportMode, ImportOptions, ImportReport, RowAction,
    RowIssue, RowOutcome,
};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import (default: newest pa-attributes*.csv in uploads)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Preview only (1) or write to the catalog (0). Always preview first.
    #[arg(
        long,
        default_value = "1",
        default_missing_value = "1",
        num_args = 0..=1,
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub dry: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;

    let csv = resolve_csv_path(args.csv.as_deref(), &site.uploads_dir())?;
    let mode = ImportMode::from_dry_flag(args.dry);

    println!("Using CSV: {}", style(csv.display()).yellow());
    println!("Mode: {}", mode);

    let mut db = CatalogDb::open(&site.database_path())?;
    let report = import_descriptions(&mut db, &ImportOptions { csv, mode })?;

    for outcome in &report.rows {
        print_outcome(outcome, global.quiet);
    }

    if !global.quiet {
        print_summary(&report);
    }

    println!(
        "{} Finished. Updated count: {} (dry={})",
        style("✓").green(),
        style(report.updated).cyan(),
        report.mode.flag()
    );

    Ok(())
}

fn print_outcome(outcome: &RowOutcome, quiet: bool) {
    let row = outcome.row;

    if let (Some(taxonomy), Some(term_id)) = (&outcome.discovered_taxonomy, outcome_term_id(outcome)) {
        if !quiet {
            println!(
                "Row {}: discovered taxonomy '{}' for term_id {}",
                row, taxonomy, term_id
            );
        }
    }

    match &outcome.action {
        RowAction::WouldUpdate {
            term_id,
            taxonomy,
            desc_len,
        } if !quiet => {
            println!(
                "{} DRY: Would update term_id={} taxonomy={} desc_len={}",
                style("○").dim(),
                term_id,
                taxonomy,
                desc_len
            );
        }
        RowAction::Updated { term_id, taxonomy } if !quiet => {
            println!(
                "{} Updated term {} (taxonomy: {})",
                style("✓").green(),
                style(term_id).cyan(),
                taxonomy
            );
        }
        RowAction::Skipped(issue) => match issue {
            RowIssue::InvalidTermId { .. } => {
                warn(format!("Skipping row {}: empty/invalid term_id", row))
            }
            RowIssue::TermNotFound { term_id } => {
                warn(format!("Row {}: term_id {} not found; skipping", row, term_id))
            }
            RowIssue::UpdateFailed { .. } | RowIssue::Unreadable(_) => {
                warn(format!("Row {}: {}", row, issue))
            }
        },
        _ => {}
    }
}

fn outcome_term_id(outcome: &RowOutcome) -> Option<u64> {
    match &outcome.action {
        RowAction::WouldUpdate { term_id, .. }
        | RowAction::Updated { term_id, .. }
        | RowAction::Skipped(RowIssue::UpdateFailed { term_id, .. })
        | RowAction::Skipped(RowIssue::TermNotFound { term_id }) => Some(*term_id),
        RowAction::Skipped(_) => None,
    }
}

fn print_summary(report: &ImportReport) {
    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:   {}", style(report.rows_processed()).cyan());
    if report.mode.is_dry() {
        let previewed = report.rows_processed() - report.skipped();
        println!("  Would update:     {}", style(previewed).yellow());
    } else {
        println!("  Terms updated:    {}", style(report.updated).green());
    }
    if report.skipped() > 0 {
        println!("  Skipped:          {}", style(report.skipped()).red());
    }
    if report.mode.is_dry() {
        println!();
        println!(
            "{}",
            style("Dry run complete. No terms were changed. Re-run with --dry=0 to apply.").yellow()
        );
    }
    println!();
}
