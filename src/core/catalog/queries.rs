//! Read and update queries behind the [`TermStore`] trait

use rusqlite::{params, OptionalExtension, Row};

use super::{CatalogDb, StoreError, Term, TermQuery, TermStore};

const TERM_COLUMNS: &str = r#"t.term_id, t.taxonomy, t.name, t.slug, t.description,
    (SELECT COUNT(*) FROM term_relationships r
        JOIN products p ON p.id = r.product_id
        WHERE r.term_id = t.term_id AND p.status = 'publish') AS usage_count"#;

fn term_from_row(row: &Row<'_>) -> rusqlite::Result<Term> {
    Ok(Term {
        term_id: row.get::<_, i64>(0)? as u64,
        taxonomy: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        count: row.get::<_, i64>(5)? as u64,
    })
}

impl TermStore for CatalogDb {
    fn taxonomies(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM taxonomies ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn terms(&self, taxonomy: &str, query: TermQuery) -> Result<Vec<Term>, StoreError> {
        self.ensure_taxonomy(taxonomy)?;

        let sql = format!(
            "SELECT {} FROM terms t WHERE t.taxonomy = ?1 ORDER BY t.name, t.term_id",
            TERM_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![taxonomy], term_from_row)?;

        let mut terms = rows.collect::<Result<Vec<_>, _>>()?;
        if !query.include_empty {
            terms.retain(|t| t.count > 0);
        }
        Ok(terms)
    }

    fn sample_products(
        &self,
        taxonomy: &str,
        term_id: u64,
        limit: usize,
    ) -> Result<Vec<u64>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT p.id FROM products p
                JOIN term_relationships r ON r.product_id = p.id
                JOIN terms t ON t.term_id = r.term_id
                WHERE t.taxonomy = ?1 AND t.term_id = ?2 AND p.status = 'publish'
                ORDER BY p.created DESC, p.id DESC
                LIMIT ?3"#,
        )?;
        let rows = stmt.query_map(params![taxonomy, term_id as i64, limit as i64], |row| {
            row.get::<_, i64>(0)
        })?;

        let ids = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(ids.into_iter().map(|id| id as u64).collect())
    }

    fn product_title(&self, product_id: u64) -> Result<String, StoreError> {
        let title: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM products WHERE id = ?1",
                params![product_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(title.unwrap_or_default())
    }

    fn term(&self, term_id: u64) -> Result<Option<Term>, StoreError> {
        let sql = format!("SELECT {} FROM terms t WHERE t.term_id = ?1", TERM_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![term_id as i64], term_from_row)
            .optional()?)
    }

    fn update_term_description(
        &mut self,
        term_id: u64,
        taxonomy: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        self.ensure_taxonomy(taxonomy)?;

        let changed = self.conn.execute(
            "UPDATE terms SET description = ?1 WHERE term_id = ?2 AND taxonomy = ?3",
            params![description, term_id as i64, taxonomy],
        )?;

        if changed == 0 {
            return Err(StoreError::TermNotFound {
                term_id,
                taxonomy: taxonomy.to_string(),
            });
        }

        tracing::debug!(term_id, taxonomy, "term description updated");
        Ok(())
    }
}
