//! Core module - catalog access, CSV contract, export and import

pub mod catalog;
pub mod config;
pub mod csv_contract;
pub mod error;
pub mod export;
pub mod html;
pub mod import;
pub mod site;

pub use catalog::{CatalogDb, StoreError, Term, TermQuery, TermStore};
pub use config::Config;
pub use error::SyncError;
pub use export::{export_empty_terms, ExportOptions, ExportReport};
pub use import::{import_descriptions, resolve_csv_path, ImportMode, ImportOptions, ImportReport};
pub use site::{Site, SiteError};
