//! `attrsync init` command - Initialize a new attrsync site

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::catalog::{CatalogDb, TermStore};
use crate::core::site::{Site, SiteError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .attrsync/ already exists
    #[arg(long)]
    pub force: bool,

    /// Seed an empty catalog with a few demo attribute terms
    #[arg(long)]
    pub demo: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let site = if args.force {
        Site::init_force(&path)
    } else {
        Site::init(&path)
    };

    match site {
        Ok(site) => {
            let mut db = CatalogDb::open(&site.database_path())?;
            println!(
                "{} Initialized attrsync site at {}",
                style("✓").green(),
                style(site.root().display()).cyan()
            );

            if args.demo {
                seed_demo(&mut db)?;
            }

            println!();
            println!("Created site structure:");
            print_structure(&site);
            println!();
            println!("Next steps:");
            println!(
                "  {} Export terms without a description",
                style("attrsync export-empty --limit 20").yellow()
            );
            println!(
                "  {} Preview generated descriptions",
                style("attrsync import --csv <file>").yellow()
            );
            println!(
                "  {} Apply them",
                style("attrsync import --csv <file> --dry=0").yellow()
            );
            Ok(())
        }
        Err(SiteError::AlreadyExists(path)) => {
            println!(
                "{} attrsync site already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("attrsync init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn seed_demo(db: &mut CatalogDb) -> Result<()> {
    if !db.taxonomies()?.is_empty() {
        println!(
            "{} Catalog already has taxonomies, skipping demo data",
            style("!").yellow()
        );
        return Ok(());
    }

    let terms = db.seed_demo()?;
    println!(
        "{} Seeded demo catalog with {} terms",
        style("✓").green(),
        style(terms).cyan()
    );
    Ok(())
}

fn print_structure(site: &Site) {
    let root = site.root();
    let entries = [
        site.site_dir().join("config.yaml"),
        site.database_path(),
        site.uploads_dir(),
    ];

    for entry in entries {
        if entry.exists() {
            let prefix = if entry.is_dir() { "📁" } else { "📄" };
            println!("  {} {}", prefix, style(display_relative(root, &entry)).dim());
        }
    }
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
