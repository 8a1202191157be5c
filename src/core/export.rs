//! Export of attribute terms that still lack a description
//!
//! Walks every `pa_*` taxonomy, keeps the terms whose description is blank
//! and writes them to CSV together with a few sample products, leaving the
//! `generated_description` column for the enrichment step to fill in.

use std::fs::{self, File};
use std::path::PathBuf;

use crate::core::catalog::{StoreError, Term, TermQuery, TermStore};
use crate::core::csv_contract::{join_samples, EXPORT_HEADERS};
use crate::core::error::SyncError;
use crate::core::html::decode_entities;

/// Taxonomies exported unless configured otherwise
pub const TAXONOMY_PREFIX: &str = "pa_";

/// Sample products listed per term
pub const SAMPLE_SIZE: usize = 3;

/// Terms exported when no limit is given
pub const DEFAULT_LIMIT: usize = 10;

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Stop after this many rows, across all taxonomies
    pub limit: usize,
    /// Destination CSV, truncated if it exists
    pub file: PathBuf,
    pub taxonomy_prefix: String,
    pub sample_size: usize,
    /// Create the destination's directory if it is missing
    pub create_dir: bool,
}

impl ExportOptions {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            file: file.into(),
            taxonomy_prefix: TAXONOMY_PREFIX.to_string(),
            sample_size: SAMPLE_SIZE,
            create_dir: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A taxonomy whose terms could not be fetched
#[derive(Debug)]
pub struct TaxonomySkip {
    pub taxonomy: String,
    pub error: StoreError,
}

/// Outcome of an export run
#[derive(Debug)]
pub struct ExportReport {
    /// Data rows written
    pub exported: usize,
    pub path: PathBuf,
    pub skipped: Vec<TaxonomySkip>,
}

/// Write terms with an empty description to `options.file`
pub fn export_empty_terms<S>(store: &S, options: &ExportOptions) -> Result<ExportReport, SyncError>
where
    S: TermStore + ?Sized,
{
    if options.limit == 0 {
        return Err(SyncError::InvalidLimit(options.limit));
    }

    let taxonomies: Vec<String> = store
        .taxonomies()?
        .into_iter()
        .filter(|t| t.starts_with(&options.taxonomy_prefix))
        .collect();

    if taxonomies.is_empty() {
        return Err(SyncError::NoTaxonomies {
            prefix: options.taxonomy_prefix.clone(),
        });
    }
    tracing::debug!(?taxonomies, "exporting attribute taxonomies");

    if options.create_dir {
        if let Some(dir) = options.file.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| SyncError::io("Unable to create directory", dir, e))?;
        }
    }

    let file = File::create(&options.file)
        .map_err(|e| SyncError::io("Unable to open file for writing:", &options.file, e))?;
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);
    wtr.write_record(EXPORT_HEADERS)
        .map_err(|e| SyncError::csv(&options.file, e))?;

    let mut report = ExportReport {
        exported: 0,
        path: options.file.clone(),
        skipped: Vec::new(),
    };

    'taxonomies: for taxonomy in &taxonomies {
        let terms = match store.terms(taxonomy, TermQuery::all()) {
            Ok(terms) => terms,
            Err(error) => {
                tracing::debug!(%taxonomy, %error, "skipping taxonomy");
                report.skipped.push(TaxonomySkip {
                    taxonomy: taxonomy.clone(),
                    error,
                });
                continue;
            }
        };

        for term in terms.iter().filter(|t| t.has_empty_description()) {
            let row = export_row(store, taxonomy, term, options.sample_size)?;
            wtr.write_record(&row)
                .map_err(|e| SyncError::csv(&options.file, e))?;

            report.exported += 1;
            if report.exported >= options.limit {
                break 'taxonomies;
            }
        }
    }

    wtr.flush()
        .map_err(|e| SyncError::io("Unable to write", &options.file, e))?;

    Ok(report)
}

fn export_row<S>(
    store: &S,
    taxonomy: &str,
    term: &Term,
    sample_size: usize,
) -> Result<[String; 9], SyncError>
where
    S: TermStore + ?Sized,
{
    let sample_ids = store.sample_products(taxonomy, term.term_id, sample_size)?;
    let sample_titles = sample_ids
        .iter()
        .map(|&id| store.product_title(id).map(|t| decode_entities(&t)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok([
        term.term_id.to_string(),
        taxonomy.to_string(),
        term.name.clone(),
        term.slug.clone(),
        term.description.clone(),
        term.count.to_string(),
        join_samples(&sample_ids),
        join_samples(&sample_titles),
        String::new(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CatalogDb, ProductStatus};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    /// Delegates to a catalog but fails term listing for one taxonomy
    struct BrokenTaxonomy {
        inner: CatalogDb,
        broken: &'static str,
    }

    impl TermStore for BrokenTaxonomy {
        fn taxonomies(&self) -> Result<Vec<String>, StoreError> {
            self.inner.taxonomies()
        }
        fn terms(&self, taxonomy: &str, query: TermQuery) -> Result<Vec<Term>, StoreError> {
            if taxonomy == self.broken {
                return Err(StoreError::UnknownTaxonomy(taxonomy.to_string()));
            }
            self.inner.terms(taxonomy, query)
        }
        fn sample_products(&self, t: &str, id: u64, n: usize) -> Result<Vec<u64>, StoreError> {
            self.inner.sample_products(t, id, n)
        }
        fn product_title(&self, id: u64) -> Result<String, StoreError> {
            self.inner.product_title(id)
        }
        fn term(&self, id: u64) -> Result<Option<Term>, StoreError> {
            self.inner.term(id)
        }
        fn update_term_description(&mut self, id: u64, t: &str, d: &str) -> Result<(), StoreError> {
            self.inner.update_term_description(id, t, d)
        }
    }

    fn read_rows(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(String::from).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    fn five_empty_colors() -> CatalogDb {
        let mut db = CatalogDb::open_in_memory().unwrap();
        db.register_taxonomy("pa_color").unwrap();
        for name in ["Amber", "Blue", "Cyan", "Denim", "Emerald"] {
            db.insert_term("pa_color", name, "", "").unwrap();
        }
        db
    }

    #[test]
    fn test_limit_caps_rows() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let db = five_empty_colors();

        let report = export_empty_terms(&db, &ExportOptions::new(&path).with_limit(2)).unwrap();

        assert_eq!(report.exported, 2);
        let (headers, rows) = read_rows(&path);
        assert_eq!(headers, EXPORT_HEADERS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], "Amber");
        assert_eq!(rows[1][2], "Blue");
    }

    #[test]
    fn test_limit_is_global_across_taxonomies() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut db = five_empty_colors();
        db.register_taxonomy("pa_size").unwrap();
        db.insert_term("pa_size", "Large", "", "").unwrap();

        let report = export_empty_terms(&db, &ExportOptions::new(&path).with_limit(5)).unwrap();

        assert_eq!(report.exported, 5);
        let (_, rows) = read_rows(&path);
        assert!(rows.iter().all(|r| r[1] == "pa_color"));
    }

    #[test]
    fn test_terms_with_description_are_skipped() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut db = CatalogDb::open_in_memory().unwrap();
        db.register_taxonomy("pa_color").unwrap();
        db.insert_term("pa_color", "Red", "red", "Warm red").unwrap();
        db.insert_term("pa_color", "Blue", "blue", "   \t").unwrap();
        db.insert_term("pa_color", "Green", "green", "").unwrap();

        let report = export_empty_terms(&db, &ExportOptions::new(&path)).unwrap();

        assert_eq!(report.exported, 2);
        let (_, rows) = read_rows(&path);
        let names: Vec<_> = rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(names, vec!["Blue", "Green"]);
        // whitespace-only descriptions are carried through as-is
        assert_eq!(rows[0][4], "   \t");
    }

    #[test]
    fn test_non_attribute_taxonomies_ignored() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut db = CatalogDb::open_in_memory().unwrap();
        db.register_taxonomy("product_cat").unwrap();
        db.insert_term("product_cat", "Shoes", "", "").unwrap();

        let err = export_empty_terms(&db, &ExportOptions::new(&path)).unwrap_err();

        assert!(matches!(err, SyncError::NoTaxonomies { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_created_only_for_a_real_export() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("uploads");
        let mut options = ExportOptions::new(dir.join("out.csv"));
        options.create_dir = true;

        let mut db = CatalogDb::open_in_memory().unwrap();
        db.register_taxonomy("product_cat").unwrap();
        let err = export_empty_terms(&db, &options).unwrap_err();
        assert!(matches!(err, SyncError::NoTaxonomies { .. }));
        assert!(!dir.exists());

        let report = export_empty_terms(&five_empty_colors(), &options).unwrap();
        assert_eq!(report.exported, 5);
        assert!(dir.join("out.csv").is_file());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let db = five_empty_colors();

        let err = export_empty_terms(&db, &ExportOptions::new(&path).with_limit(0)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidLimit(0)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing-dir/out.csv");
        let db = five_empty_colors();

        let err = export_empty_terms(&db, &ExportOptions::new(&path)).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }

    #[test]
    fn test_samples_and_titles() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut db = CatalogDb::open_in_memory().unwrap();
        db.register_taxonomy("pa_color").unwrap();
        let red = db.insert_term("pa_color", "Red", "red", "").unwrap();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let titles = ["Tee &amp; Cap", "Hoodie &quot;Night&quot;", "Scarf", "Old Sock"];
        let mut ids = Vec::new();
        for (i, title) in titles.iter().enumerate() {
            let id = db
                .insert_product(title, ProductStatus::Publish, base - Duration::days(i as i64))
                .unwrap();
            db.tag_product(id, red).unwrap();
            ids.push(id);
        }

        export_empty_terms(&db, &ExportOptions::new(&path)).unwrap();

        let (_, rows) = read_rows(&path);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row[0], red.to_string());
        assert_eq!(row[1], "pa_color");
        assert_eq!(row[3], "red");
        assert_eq!(row[5], "4");
        assert_eq!(row[6], format!("{}|{}|{}", ids[0], ids[1], ids[2]));
        assert_eq!(row[7], "Tee & Cap|Hoodie \"Night\"|Scarf");
        assert_eq!(row[8], "");
    }

    #[test]
    fn test_unused_term_has_empty_samples() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let db = five_empty_colors();

        export_empty_terms(&db, &ExportOptions::new(&path).with_limit(1)).unwrap();

        let (_, rows) = read_rows(&path);
        assert_eq!(rows[0][5], "0");
        assert_eq!(rows[0][6], "");
        assert_eq!(rows[0][7], "");
    }

    #[test]
    fn test_failing_taxonomy_is_skipped() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut db = five_empty_colors();
        db.register_taxonomy("pa_size").unwrap();
        db.insert_term("pa_size", "Large", "", "").unwrap();
        let store = BrokenTaxonomy {
            inner: db,
            broken: "pa_color",
        };

        let report = export_empty_terms(&store, &ExportOptions::new(&path)).unwrap();

        assert_eq!(report.exported, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].taxonomy, "pa_color");
        let (_, rows) = read_rows(&path);
        assert_eq!(rows[0][2], "Large");
    }

    #[test]
    fn test_rerun_overwrites_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        std::fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();
        let db = five_empty_colors();

        export_empty_terms(&db, &ExportOptions::new(&path).with_limit(1)).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        export_empty_terms(&db, &ExportOptions::new(&path).with_limit(1)).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with(
            "term_id,taxonomy,term_name,slug,current_description,product_count,sample_product_ids,sample_product_titles,generated_description\n"
        ));
        assert_eq!(first.lines().count(), 2);
    }
}
