//! Import of generated descriptions back into the catalog
//!
//! Runs in four stages: resolve the CSV path, validate the header, walk the
//! rows (dry or live), summarize. Anything failing before the rows are
//! walked aborts the run; a failing row is recorded and skipped.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use csv::StringRecord;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::catalog::{StoreError, TermStore};
use crate::core::csv_contract::{
    is_import_candidate, HeaderIndex, RowFields, IMPORT_FALLBACK_NAME, REQUIRED_IMPORT_COLUMNS,
};
use crate::core::error::SyncError;

/// Whether an import writes to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    DryRun,
    Live,
}

impl ImportMode {
    pub fn from_dry_flag(dry: bool) -> Self {
        if dry {
            ImportMode::DryRun
        } else {
            ImportMode::Live
        }
    }

    pub fn is_dry(&self) -> bool {
        matches!(self, ImportMode::DryRun)
    }

    /// The `--dry` value that selects this mode
    pub fn flag(&self) -> &'static str {
        match self {
            ImportMode::DryRun => "1",
            ImportMode::Live => "0",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::DryRun => write!(f, "DRY RUN (no DB changes)"),
            ImportMode::Live => write!(f, "LIVE (will update DB)"),
        }
    }
}

/// Options for one import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Resolved CSV path (see [`resolve_csv_path`])
    pub csv: PathBuf,
    pub mode: ImportMode,
}

/// Why a row was skipped
#[derive(Debug, Error)]
pub enum RowIssue {
    #[error("unreadable record: {0}")]
    Unreadable(String),

    #[error("empty/invalid term_id '{raw}'")]
    InvalidTermId { raw: String },

    #[error("term_id {term_id} not found")]
    TermNotFound { term_id: u64 },

    #[error("Failed updating term {term_id}: {source}")]
    UpdateFailed {
        term_id: u64,
        #[source]
        source: StoreError,
    },
}

/// What happened to a row
#[derive(Debug)]
pub enum RowAction {
    /// Dry run: the update that would be applied
    WouldUpdate {
        term_id: u64,
        taxonomy: String,
        /// Byte length of the new description
        desc_len: usize,
    },
    Updated {
        term_id: u64,
        taxonomy: String,
    },
    Skipped(RowIssue),
}

/// Result for one data row
#[derive(Debug)]
pub struct RowOutcome {
    /// Row number in the file; the header is row 1
    pub row: usize,
    /// Taxonomy looked up because the row left it blank
    pub discovered_taxonomy: Option<String>,
    pub action: RowAction,
}

/// Outcome of an import run
#[derive(Debug)]
pub struct ImportReport {
    pub csv: PathBuf,
    pub mode: ImportMode,
    /// Terms whose description was written
    pub updated: usize,
    pub rows: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn rows_processed(&self) -> usize {
        self.rows.len()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.action, RowAction::Skipped(_)))
            .count()
    }
}

/// Pick the CSV to import
///
/// An explicit path must exist. Otherwise the newest `pa-attributes*.csv`
/// in the uploads directory wins, falling back to the fixed default name.
pub fn resolve_csv_path(explicit: Option<&Path>, uploads_dir: &Path) -> Result<PathBuf, SyncError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        if !path.exists() {
            return Err(SyncError::FileNotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    let newest = WalkDir::new(uploads_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_import_candidate(&e.file_name().to_string_lossy()))
        .map(|e| {
            let modified = e
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, e.file_name().to_os_string(), e.into_path())
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    if let Some((_, _, path)) = newest {
        tracing::debug!("discovered import file {}", path.display());
        return Ok(path);
    }

    let fallback = uploads_dir.join(IMPORT_FALLBACK_NAME);
    if fallback.is_file() {
        return Ok(fallback);
    }

    Err(SyncError::NoCsvFound(uploads_dir.to_path_buf()))
}

/// Apply `generated_description` values from the CSV to matching terms
pub fn import_descriptions<S>(store: &mut S, options: &ImportOptions) -> Result<ImportReport, SyncError>
where
    S: TermStore + ?Sized,
{
    let path = options.csv.as_path();
    let file = File::open(path).map_err(|e| SyncError::io("Failed to open CSV:", path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(BufReader::new(file));

    let (header, header_line) = match rdr.headers() {
        Ok(headers) => (
            HeaderIndex::new(headers),
            headers.position().map_or(1, |p| p.line()),
        ),
        Err(e) => {
            tracing::debug!("cannot read CSV header: {}", e);
            return Err(SyncError::EmptyCsv(path.to_path_buf()));
        }
    };
    if header.is_empty() {
        return Err(SyncError::EmptyCsv(path.to_path_buf()));
    }

    let missing = header.missing(&REQUIRED_IMPORT_COLUMNS);
    if !missing.is_empty() {
        return Err(SyncError::MissingColumns { missing });
    }

    let mut report = ImportReport {
        csv: path.to_path_buf(),
        mode: options.mode,
        updated: 0,
        rows: Vec::new(),
    };

    // Rows are numbered like the file's records: header is row 1 and every
    // blank line the reader drops still takes a row number.
    let mut row = 1;
    let mut next_line = header_line + 1;
    for result in rdr.records() {
        let outcome = match result {
            Ok(record) => {
                if let Some(pos) = record.position() {
                    for _ in next_line..pos.line() {
                        row += 1;
                        record_outcome(&mut report, blank_row(row));
                    }
                    next_line = pos.line() + 1 + embedded_line_breaks(&record);
                }
                row += 1;
                process_row(store, options.mode, row, &header.fields(&record))
            }
            Err(e) => {
                if let Some(pos) = e.position() {
                    next_line = pos.line() + 1;
                }
                row += 1;
                RowOutcome {
                    row,
                    discovered_taxonomy: None,
                    action: RowAction::Skipped(RowIssue::Unreadable(e.to_string())),
                }
            }
        };
        record_outcome(&mut report, outcome);
    }

    Ok(report)
}

fn record_outcome(report: &mut ImportReport, outcome: RowOutcome) {
    match &outcome.action {
        RowAction::Updated { .. } => report.updated += 1,
        RowAction::Skipped(issue) => tracing::debug!(row = outcome.row, %issue, "skipping row"),
        RowAction::WouldUpdate { .. } => {}
    }
    report.rows.push(outcome);
}

/// A blank line carries no term id
fn blank_row(row: usize) -> RowOutcome {
    RowOutcome {
        row,
        discovered_taxonomy: None,
        action: RowAction::Skipped(RowIssue::InvalidTermId { raw: String::new() }),
    }
}

/// Line breaks inside quoted fields, so the record spans more than one line
fn embedded_line_breaks(record: &StringRecord) -> u64 {
    record.iter().map(|field| field.matches('\n').count() as u64).sum()
}

/// Integer prefix of a term id cell: `"12.0"` and `"12abc"` read as 12
fn leading_integer(raw: &str) -> Option<i64> {
    let sign = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    raw[..sign + digits].parse().ok()
}

fn process_row<S>(store: &mut S, mode: ImportMode, row: usize, fields: &RowFields<'_>) -> RowOutcome
where
    S: TermStore + ?Sized,
{
    let skip = |issue: RowIssue, discovered_taxonomy: Option<String>| RowOutcome {
        row,
        discovered_taxonomy,
        action: RowAction::Skipped(issue),
    };

    let raw_id = fields.get("term_id").trim();
    let term_id = match leading_integer(raw_id) {
        Some(id) if id > 0 => id as u64,
        _ => {
            return skip(
                RowIssue::InvalidTermId {
                    raw: raw_id.to_string(),
                },
                None,
            )
        }
    };

    let mut taxonomy = fields.get("taxonomy").trim().to_string();
    let mut discovered = None;
    if taxonomy.is_empty() {
        match store.term(term_id) {
            Ok(Some(term)) => {
                taxonomy = term.taxonomy;
                discovered = Some(taxonomy.clone());
            }
            Ok(None) => return skip(RowIssue::TermNotFound { term_id }, None),
            Err(e) => {
                tracing::debug!(term_id, "term lookup failed: {}", e);
                return skip(RowIssue::TermNotFound { term_id }, None);
            }
        }
    }

    let description = fields.get("generated_description");

    let action = match mode {
        ImportMode::DryRun => RowAction::WouldUpdate {
            term_id,
            taxonomy,
            desc_len: description.len(),
        },
        ImportMode::Live => match store.update_term_description(term_id, &taxonomy, description) {
            Ok(()) => RowAction::Updated { term_id, taxonomy },
            Err(source) => return skip(RowIssue::UpdateFailed { term_id, source }, discovered),
        },
    };

    RowOutcome {
        row,
        discovered_taxonomy: discovered,
        action,
    }
}
