//! `attrsync terms` command - Inspect catalog terms

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_site, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{CatalogDb, Term, TermQuery, TermStore};

#[derive(Subcommand, Debug)]
pub enum TermsCommands {
    /// List terms, optionally only those lacking a description
    List(ListArgs),

    /// Show a single term
    Show {
        /// Term ID
        term_id: u64,
    },
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only this taxonomy (default: every taxonomy)
    #[arg(long, short = 't')]
    pub taxonomy: Option<String>,

    /// Only terms whose description is empty
    #[arg(long)]
    pub empty: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(cmd: TermsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TermsCommands::List(args) => run_list(args, global),
        TermsCommands::Show { term_id } => run_show(term_id, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let db = CatalogDb::open(&site.database_path())?;

    let taxonomies = match args.taxonomy {
        Some(taxonomy) => vec![taxonomy],
        None => db.taxonomies()?,
    };

    let mut terms: Vec<Term> = Vec::new();
    for taxonomy in &taxonomies {
        terms.extend(
            db.terms(taxonomy, TermQuery::all())?
                .into_iter()
                .filter(|t| !args.empty || t.has_empty_description()),
        );
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&terms).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["term_id", "taxonomy", "name", "slug", "count", "description"])
                .into_diagnostic()?;
            for term in &terms {
                wtr.write_record([
                    term.term_id.to_string(),
                    term.taxonomy.clone(),
                    term.name.clone(),
                    term.slug.clone(),
                    term.count.to_string(),
                    term.description.clone(),
                ])
                .into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Id => {
            for term in &terms {
                println!("{}", term.term_id);
            }
        }
        OutputFormat::Table => {
            if terms.is_empty() {
                println!("No terms found.");
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(["ID", "Taxonomy", "Name", "Slug", "Count", "Description"]);
            for term in &terms {
                builder.push_record([
                    term.term_id.to_string(),
                    term.taxonomy.clone(),
                    truncate_str(&term.name, 30),
                    truncate_str(&term.slug, 30),
                    term.count.to_string(),
                    truncate_str(&term.description, 50),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));

            if !global.quiet {
                println!();
                println!("{} term(s) found", style(terms.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_show(term_id: u64, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let db = CatalogDb::open(&site.database_path())?;

    let term = db
        .term(term_id)?
        .ok_or_else(|| miette::miette!("Term not found: {}", term_id))?;

    println!("{}", style(&term.name).bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  ID:          {}", style(term.term_id).cyan());
    println!("  Taxonomy:    {}", term.taxonomy);
    println!("  Slug:        {}", term.slug);
    println!("  Products:    {}", term.count);
    if term.has_empty_description() {
        println!("  Description: {}", style("(empty)").dim());
    } else {
        println!("  Description: {}", term.description);
    }

    Ok(())
}
