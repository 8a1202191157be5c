//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{CatalogDb, StoreError, SCHEMA_VERSION};

impl CatalogDb {
    /// Create tables if missing and verify the schema version
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Registered taxonomies, enumerated in registration order
            CREATE TABLE IF NOT EXISTS taxonomies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            -- Terms; ids are global across taxonomies
            CREATE TABLE IF NOT EXISTS terms (
                term_id INTEGER PRIMARY KEY AUTOINCREMENT,
                taxonomy TEXT NOT NULL,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                UNIQUE (taxonomy, slug),
                FOREIGN KEY (taxonomy) REFERENCES taxonomies(name)
            );
            CREATE INDEX IF NOT EXISTS idx_terms_taxonomy ON terms(taxonomy);

            -- Catalog items
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'publish',
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_products_created ON products(created);

            -- Item to term tagging
            CREATE TABLE IF NOT EXISTS term_relationships (
                product_id INTEGER NOT NULL,
                term_id INTEGER NOT NULL,
                PRIMARY KEY (product_id, term_id),
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
                FOREIGN KEY (term_id) REFERENCES terms(term_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_term_relationships_term ON term_relationships(term_id);
            "#,
        )?;

        let found: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match found {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(version) if version != SCHEMA_VERSION => {
                return Err(StoreError::SchemaMismatch {
                    found: version,
                    expected: SCHEMA_VERSION,
                });
            }
            Some(_) => {}
        }

        Ok(())
    }
}
