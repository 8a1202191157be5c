//! Errors that abort an export or import run

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::catalog::StoreError;

/// A terminal failure: nothing after the failing step runs
#[derive(Debug, Error, Diagnostic)]
pub enum SyncError {
    #[error("export limit must be a positive number (got {0})")]
    #[diagnostic(code(attrsync::export::limit))]
    InvalidLimit(usize),

    #[error("No {prefix}* taxonomies found on this site.")]
    #[diagnostic(
        code(attrsync::export::no_taxonomies),
        help("register attribute taxonomies in the catalog, or change taxonomy_prefix in .attrsync/config.yaml")
    )]
    NoTaxonomies { prefix: String },

    #[error("{action} {}: {source}", .path.display())]
    #[diagnostic(code(attrsync::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV not found at provided path: {}", .0.display())]
    #[diagnostic(code(attrsync::import::file_not_found))]
    FileNotFound(PathBuf),

    #[error("No CSV provided and no files matching 'pa-attributes*.csv' found in uploads: {}", .0.display())]
    #[diagnostic(
        code(attrsync::import::no_csv),
        help("pass --csv <path> or place a pa-attributes*.csv file in the uploads directory")
    )]
    NoCsvFound(PathBuf),

    #[error("CSV appears empty or unreadable: {}", .0.display())]
    #[diagnostic(code(attrsync::import::empty))]
    EmptyCsv(PathBuf),

    #[error("CSV header missing required columns: {}", .missing.join(","))]
    #[diagnostic(
        code(attrsync::import::missing_columns),
        help("the header row must contain term_id, taxonomy and generated_description")
    )]
    MissingColumns { missing: Vec<String> },

    #[error("CSV error in {}: {source}", .path.display())]
    #[diagnostic(code(attrsync::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    pub(crate) fn io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        SyncError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        SyncError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}
