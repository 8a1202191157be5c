//! SQLite-backed catalog holding taxonomies, terms and products
//!
//! The catalog stands in for the host shop's term storage:
//! - Taxonomies are enumerated in registration order
//! - Terms carry a description and a usage count derived from tagging
//! - Products can be sampled per term, newest first
//!
//! Exporter and importer only talk to it through [`TermStore`].

mod queries;
mod schema;
mod types;

pub use types::*;

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Storage operations the exporter and importer depend on
///
/// Every call may fail on its own; callers decide whether a failure aborts
/// the run or only skips the current taxonomy or row.
pub trait TermStore {
    /// Names of all registered taxonomies, in registration order
    fn taxonomies(&self) -> Result<Vec<String>, StoreError>;

    /// Terms of one taxonomy, ordered by name then id
    fn terms(&self, taxonomy: &str, query: TermQuery) -> Result<Vec<Term>, StoreError>;

    /// Up to `limit` published product ids tagged with the term, newest first
    fn sample_products(
        &self,
        taxonomy: &str,
        term_id: u64,
        limit: usize,
    ) -> Result<Vec<u64>, StoreError>;

    /// Display title of a product (empty when the product is unknown)
    fn product_title(&self, product_id: u64) -> Result<String, StoreError>;

    /// Look a term up by id alone
    fn term(&self, term_id: u64) -> Result<Option<Term>, StoreError>;

    /// Replace the description of a term within its taxonomy
    fn update_term_description(
        &mut self,
        term_id: u64,
        taxonomy: &str,
        description: &str,
    ) -> Result<(), StoreError>;
}

/// The catalog backed by SQLite
pub struct CatalogDb {
    conn: Connection,
}

impl CatalogDb {
    /// Open or create the catalog database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut db = Self { conn };
        db.init_schema()?;
        tracing::debug!("opened catalog {}", path.display());
        Ok(db)
    }

    /// Open a throwaway in-memory catalog
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let mut db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Register a taxonomy (no-op if it already exists)
    pub fn register_taxonomy(&mut self, name: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO taxonomies (name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    /// Insert a term and return its id
    pub fn insert_term(
        &mut self,
        taxonomy: &str,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<u64, StoreError> {
        self.ensure_taxonomy(taxonomy)?;

        let slug = if slug.is_empty() {
            slugify(name)
        } else {
            slug.to_string()
        };

        self.conn.execute(
            "INSERT INTO terms (taxonomy, name, slug, description) VALUES (?1, ?2, ?3, ?4)",
            params![taxonomy, name, slug, description],
        )?;
        Ok(self.conn.last_insert_rowid() as u64)
    }

    /// Insert a product and return its id
    pub fn insert_product(
        &mut self,
        title: &str,
        status: ProductStatus,
        created: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.conn.execute(
            "INSERT INTO products (title, status, created) VALUES (?1, ?2, ?3)",
            params![
                title,
                status.as_str(),
                created.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;
        Ok(self.conn.last_insert_rowid() as u64)
    }

    /// Tag a product with a term
    pub fn tag_product(&mut self, product_id: u64, term_id: u64) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO term_relationships (product_id, term_id) VALUES (?1, ?2)",
            params![product_id as i64, term_id as i64],
        )?;
        Ok(())
    }

    /// Fill an empty catalog with a few attribute taxonomies for trying things out
    pub fn seed_demo(&mut self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let tee = self.insert_product("Classic Tee &amp; Cap Bundle", ProductStatus::Publish, now)?;
        let hoodie = self.insert_product(
            "Hoodie &quot;Night&quot; Edition",
            ProductStatus::Publish,
            now - chrono::Duration::days(1),
        )?;

        let mut terms = 0;
        for (taxonomy, values) in [
            ("pa_color", &["Red", "Navy", "Forest Green"][..]),
            ("pa_size", &["Small", "Medium", "Large"][..]),
            ("product_cat", &["Apparel"][..]),
        ] {
            self.register_taxonomy(taxonomy)?;
            for value in values {
                let id = self.insert_term(taxonomy, value, "", "")?;
                if *value == "Red" || *value == "Medium" {
                    self.tag_product(tee, id)?;
                    self.tag_product(hoodie, id)?;
                }
                terms += 1;
            }
        }

        Ok(terms)
    }

    fn ensure_taxonomy(&self, taxonomy: &str) -> Result<(), StoreError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM taxonomies WHERE name = ?1",
                params![taxonomy],
                |row| row.get(0),
            )
            .optional()?;

        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::UnknownTaxonomy(taxonomy.to_string())),
        }
    }
}

/// Lowercase, dash-separated slug for a term name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests;
