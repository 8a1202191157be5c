//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the uploads directory
pub const ENV_UPLOADS_DIR: &str = "ATTRSYNC_UPLOADS_DIR";

/// Environment variable overriding the catalog database path
pub const ENV_DATABASE: &str = "ATTRSYNC_DATABASE";

/// attrsync configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory CSV files are exchanged through (relative to the site root)
    pub uploads_dir: Option<PathBuf>,

    /// Catalog database path (relative to the site root)
    pub database: Option<PathBuf>,

    /// Prefix selecting the attribute taxonomies to export
    pub taxonomy_prefix: Option<String>,

    /// Sample products listed per exported term
    pub sample_size: Option<usize>,

    /// Terms exported when no limit is given
    pub default_limit: Option<usize>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(site_dir: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessor fallbacks)

        // 2. Global user config (~/.config/attrsync/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Site config (.attrsync/config.yaml)
        if let Some(dir) = site_dir {
            if let Some(site_config) = Self::read_file(&dir.join("config.yaml")) {
                config.merge(site_config);
            }
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var(ENV_UPLOADS_DIR) {
            if !dir.is_empty() {
                config.uploads_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(db) = std::env::var(ENV_DATABASE) {
            if !db.is_empty() {
                config.database = Some(PathBuf::from(db));
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        // A file holding only comments parses as None
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring invalid config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "attrsync")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.uploads_dir.is_some() {
            self.uploads_dir = other.uploads_dir;
        }
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.taxonomy_prefix.is_some() {
            self.taxonomy_prefix = other.taxonomy_prefix;
        }
        if other.sample_size.is_some() {
            self.sample_size = other.sample_size;
        }
        if other.default_limit.is_some() {
            self.default_limit = other.default_limit;
        }
    }

    /// Taxonomy prefix, `pa_` unless configured
    pub fn taxonomy_prefix(&self) -> String {
        self.taxonomy_prefix
            .clone()
            .unwrap_or_else(|| crate::core::export::TAXONOMY_PREFIX.to_string())
    }

    /// Sample products per term, 3 unless configured
    pub fn sample_size(&self) -> usize {
        self.sample_size
            .unwrap_or(crate::core::export::SAMPLE_SIZE)
    }

    /// Export limit when `--limit` is omitted, 10 unless configured
    pub fn default_limit(&self) -> usize {
        self.default_limit
            .unwrap_or(crate::core::export::DEFAULT_LIMIT)
    }
}
