//! The CSV contract shared by export and import
//!
//! Export writes a fixed 9-column layout. Import addresses columns by name,
//! so any column order works as long as the required names are present.

use csv::StringRecord;
use std::collections::HashMap;

/// Export header, in output order
pub const EXPORT_HEADERS: [&str; 9] = [
    "term_id",
    "taxonomy",
    "term_name",
    "slug",
    "current_description",
    "product_count",
    "sample_product_ids",
    "sample_product_titles",
    "generated_description",
];

/// Columns an import file must carry
pub const REQUIRED_IMPORT_COLUMNS: [&str; 3] = ["term_id", "taxonomy", "generated_description"];

/// Default export file name inside the uploads directory
pub const EXPORT_FILE_NAME: &str = "pa-empty-attributes.csv";

/// Import candidates are `<prefix>*<suffix>` inside the uploads directory
pub const IMPORT_FILE_PREFIX: &str = "pa-attributes";
pub const IMPORT_FILE_SUFFIX: &str = ".csv";

/// Fallback import file when no candidate matches
pub const IMPORT_FALLBACK_NAME: &str = "pa-attributes-minimal-for-import.csv";

/// Separator for multi-value sample columns
pub const SAMPLE_SEPARATOR: &str = "|";

/// Join sample values with the sample separator (empty when there are none)
pub fn join_samples<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(SAMPLE_SEPARATOR)
}

/// Whether a file name matches the import candidate pattern
pub fn is_import_candidate(file_name: &str) -> bool {
    file_name.starts_with(IMPORT_FILE_PREFIX) && file_name.ends_with(IMPORT_FILE_SUFFIX)
}

/// Column names of a header record mapped to their positions
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Build from a header record, trimming each name
    ///
    /// If a name repeats, the last occurrence wins.
    pub fn new(headers: &StringRecord) -> Self {
        let names: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, positions }
    }

    /// Number of header columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.iter().all(|n| n.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Required columns absent from this header, in required order
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Map a data record onto the header, padding short rows with empty values
    pub fn fields(&self, record: &StringRecord) -> RowFields<'_> {
        let values = (0..self.names.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        RowFields {
            index: self,
            values,
        }
    }
}

/// One data row, addressable by column name
#[derive(Debug)]
pub struct RowFields<'a> {
    index: &'a HeaderIndex,
    values: Vec<String>,
}

impl RowFields<'_> {
    /// Raw value of a column; empty for columns not in the header
    pub fn get(&self, name: &str) -> &str {
        self.index
            .positions
            .get(name)
            .and_then(|&i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Column name/value pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.index
            .names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}
