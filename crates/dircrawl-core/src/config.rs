//! Crawl configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::CrawlError;
use crate::table::TableName;

/// Database file used when none is given.
pub const DEFAULT_DATABASE: &str = "dircrawl.db";

/// Configuration for one crawl run. Immutable once built.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(
    setter(into),
    build_fn(validate = "Self::validate", error = "CrawlError")
)]
pub struct CrawlConfig {
    /// Top-level directory to crawl.
    pub root: PathBuf,

    /// Destination table.
    pub table: TableName,

    /// SQLite database file holding the table.
    #[builder(default = "PathBuf::from(DEFAULT_DATABASE)")]
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Descend into symbolic links to directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Leave entries under `/QSYS.LIB` out of the table.
    #[builder(default = "false")]
    #[serde(default)]
    pub skip_library_namespace: bool,

    /// Echo each insert statement to stdout.
    #[builder(default = "false")]
    #[serde(default)]
    pub print_sql: bool,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

impl CrawlConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) => ensure_directory(root).map_err(|e| match e {
                CrawlError::InvalidArgument { message } => message,
                other => other.to_string(),
            }),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl CrawlConfig {
    /// Create a new crawl config builder.
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }
}

/// Check that `path` names an existing directory.
pub fn ensure_directory(path: &Path) -> Result<(), CrawlError> {
    if path.as_os_str().is_empty() {
        return Err(CrawlError::invalid_argument("Root path cannot be empty"));
    }
    if !path.is_dir() {
        return Err(CrawlError::invalid_argument(format!(
            "Directory {} not found. Process cancelled.",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> TableName {
        TableName::parse("TMP.DIRCRAWL").unwrap()
    }

    #[test]
    fn test_config_builder_defaults() {
        let temp = TempDir::new().unwrap();
        let config = CrawlConfig::builder()
            .root(temp.path())
            .table(table())
            .build()
            .unwrap();

        assert_eq!(config.root, temp.path());
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert!(!config.follow_symlinks);
        assert!(!config.skip_library_namespace);
        assert!(!config.print_sql);
    }

    #[test]
    fn test_config_builder_flags() {
        let temp = TempDir::new().unwrap();
        let config = CrawlConfig::builder()
            .root(temp.path())
            .table(table())
            .database(temp.path().join("crawl.db"))
            .follow_symlinks(true)
            .skip_library_namespace(true)
            .print_sql(true)
            .build()
            .unwrap();

        assert!(config.follow_symlinks);
        assert!(config.skip_library_namespace);
        assert!(config.print_sql);
        assert_eq!(config.database, temp.path().join("crawl.db"));
    }

    #[test]
    fn test_missing_root_rejected() {
        let temp = TempDir::new().unwrap();
        let err = CrawlConfig::builder()
            .root(temp.path().join("missing"))
            .table(table())
            .build()
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_missing_root_message_prefixed_once() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = CrawlConfig::builder()
            .root(missing.as_path())
            .table(table())
            .build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!(
                "Invalid argument: Directory {} not found. Process cancelled.",
                missing.display()
            )
        );
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = CrawlConfig::builder()
            .root(file)
            .table(table())
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_table_required() {
        let temp = TempDir::new().unwrap();
        let err = CrawlConfig::builder().root(temp.path()).build().unwrap_err();
        assert!(err.to_string().contains("table"));
    }
}
