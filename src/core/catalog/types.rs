//! Catalog type definitions
//!
//! Records returned by the term store and the errors its calls can fail with.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// A single value within a taxonomy (e.g. "Red" within `pa_color`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub term_id: u64,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Number of published catalog items tagged with this term
    pub count: u64,
}

impl Term {
    /// A term qualifies for export when its description is blank
    pub fn has_empty_description(&self) -> bool {
        self.description.trim().is_empty()
    }
}

/// Options for enumerating the terms of a taxonomy
#[derive(Debug, Clone, Copy, Default)]
pub struct TermQuery {
    /// Include terms no published item is tagged with
    pub include_empty: bool,
}

impl TermQuery {
    /// Every term, regardless of usage count
    pub fn all() -> Self {
        Self {
            include_empty: true,
        }
    }
}

/// Publication state of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Publish,
    Draft,
    Private,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Publish => "publish",
            ProductStatus::Draft => "draft",
            ProductStatus::Private => "private",
        }
    }
}

/// Errors raised by term store calls
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("catalog database error: {0}")]
    #[diagnostic(code(attrsync::store::sqlite))]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid taxonomy: {0}")]
    #[diagnostic(code(attrsync::store::unknown_taxonomy))]
    UnknownTaxonomy(String),

    #[error("term {term_id} does not exist in taxonomy {taxonomy}")]
    #[diagnostic(code(attrsync::store::term_not_found))]
    TermNotFound { term_id: u64, taxonomy: String },

    #[error("catalog schema version {found} is not supported (expected {expected})")]
    #[diagnostic(
        code(attrsync::store::schema_mismatch),
        help("the catalog database was written by a different attrsync version")
    )]
    SchemaMismatch { found: i32, expected: i32 },

    #[error("IO error: {0}")]
    #[diagnostic(code(attrsync::store::io))]
    Io(String),
}
