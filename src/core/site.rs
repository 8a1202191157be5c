//! Site discovery and structure
//!
//! A site is the storage-access context shared by every command: the
//! directory holding `.attrsync/` (config and catalog database) plus the
//! uploads directory where CSV files are exchanged.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::Config;

/// Name of the site marker directory
pub const SITE_DIR: &str = ".attrsync";

/// Default catalog database location, relative to the site root
pub const DEFAULT_DATABASE: &str = ".attrsync/catalog.db";

/// Default uploads directory, relative to the site root
pub const DEFAULT_UPLOADS: &str = "uploads";

/// Represents an attrsync site
#[derive(Debug)]
pub struct Site {
    /// Root directory of the site (parent of .attrsync/)
    root: PathBuf,
    config: Config,
}

impl Site {
    /// Find the site root by walking up from the current directory
    pub fn discover() -> Result<Self, SiteError> {
        let current =
            std::env::current_dir().map_err(|e| SiteError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the site root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, SiteError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| SiteError::IoError(e.to_string()))?;

        loop {
            if current.join(SITE_DIR).is_dir() {
                return Ok(Self::open_root(current));
            }

            if !current.pop() {
                return Err(SiteError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Resolve the site from an explicit `--site` path, or discover it
    pub fn locate(explicit: Option<&Path>) -> Result<Self, SiteError> {
        match explicit {
            Some(path) => {
                let root = path
                    .canonicalize()
                    .map_err(|e| SiteError::IoError(format!("{}: {}", path.display(), e)))?;
                if !root.join(SITE_DIR).is_dir() {
                    return Err(SiteError::NotFound {
                        searched_from: path.to_path_buf(),
                    });
                }
                Ok(Self::open_root(root))
            }
            None => Self::discover(),
        }
    }

    /// Create a new site structure at the given path
    pub fn init(path: &Path) -> Result<Self, SiteError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(SITE_DIR).exists() {
            return Err(SiteError::AlreadyExists(root));
        }

        Self::init_force(&root)
    }

    /// Create the site structure, rewriting the config if it already exists
    pub fn init_force(path: &Path) -> Result<Self, SiteError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let site_dir = root.join(SITE_DIR);

        std::fs::create_dir_all(&site_dir).map_err(|e| SiteError::IoError(e.to_string()))?;
        std::fs::write(site_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| SiteError::IoError(e.to_string()))?;

        let site = Self::open_root(root);
        std::fs::create_dir_all(site.uploads_dir())
            .map_err(|e| SiteError::IoError(e.to_string()))?;

        Ok(site)
    }

    fn open_root(root: PathBuf) -> Self {
        let config = Config::load(Some(&root.join(SITE_DIR)));
        Self { root, config }
    }

    fn default_config() -> &'static str {
        r#"# attrsync site configuration

# Directory where CSV files are exported to and discovered from
# uploads_dir: uploads

# Catalog database holding taxonomies, terms and products
# database: .attrsync/catalog.db

# Only taxonomies whose name starts with this prefix are exported
# taxonomy_prefix: pa_

# Number of sample products listed per exported term
# sample_size: 3

# Number of terms exported when --limit is not given
# default_limit: 10
"#
    }

    /// Get the site root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .attrsync directory
    pub fn site_dir(&self) -> PathBuf {
        self.root.join(SITE_DIR)
    }

    /// Effective configuration for this site
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory CSV files are written to and discovered in
    pub fn uploads_dir(&self) -> PathBuf {
        self.resolve(self.config.uploads_dir.as_deref(), DEFAULT_UPLOADS)
    }

    /// Location of the catalog database
    pub fn database_path(&self) -> PathBuf {
        self.resolve(self.config.database.as_deref(), DEFAULT_DATABASE)
    }

    fn resolve(&self, configured: Option<&Path>, default: &str) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.root.join(path),
            None => self.root.join(default),
        }
    }
}

/// Errors that can occur during site operations
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("not an attrsync site (searched from {searched_from:?}). Run 'attrsync init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("attrsync site already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_site_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let site = Site::init(tmp.path()).unwrap();

        assert!(site.site_dir().is_dir());
        assert!(site.site_dir().join("config.yaml").exists());
        assert!(site.uploads_dir().is_dir());
        assert_eq!(site.database_path(), site.root().join(DEFAULT_DATABASE));
    }

    #[test]
    fn test_site_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Site::init(tmp.path()).unwrap();

        let err = Site::init(tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::AlreadyExists(_)));
    }

    #[test]
    fn test_site_discover_finds_site_dir() {
        let tmp = tempdir().unwrap();
        Site::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let site = Site::discover_from(&subdir).unwrap();
        assert_eq!(
            site.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_site_discover_fails_without_site_dir() {
        let tmp = tempdir().unwrap();
        let err = Site::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::NotFound { .. }));
    }

    #[test]
    fn test_site_config_overrides_uploads_dir() {
        let tmp = tempdir().unwrap();
        Site::init(tmp.path()).unwrap();
        std::fs::write(
            tmp.path().join(SITE_DIR).join("config.yaml"),
            "uploads_dir: exchange/csv\n",
        )
        .unwrap();

        let site = Site::locate(Some(tmp.path())).unwrap();
        assert!(site.uploads_dir().ends_with("exchange/csv"));
        assert!(site.uploads_dir().starts_with(site.root()));
    }
}
