//! Error types for crawl operations.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error carried as the source of store-side failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Bad or missing input (CLI flag, config field, root path).
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Metadata could not be read for a non-symlink object.
    #[error("Unable to read metadata for {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination table could not be created.
    #[error("Unable to create table {table}. Process cancelled.")]
    Schema {
        table: String,
        #[source]
        source: BoxError,
    },

    /// A row could not be written.
    #[error("Error inserting record for {path}. Process cancelled.")]
    Persistence {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The database itself could not be opened.
    #[error("Unable to open database {path}")]
    Database {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl CrawlError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a stat error with path context.
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Create a schema error for a table.
    pub fn schema(table: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Schema {
            table: table.into(),
            source: source.into(),
        }
    }

    /// Create a persistence error for the entry at `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a database open error.
    pub fn database(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Database {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Check if this error came from bad input rather than the run itself.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

impl From<derive_builder::UninitializedFieldError> for CrawlError {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::invalid_argument(format!("{} is required", err.field_name()))
    }
}

impl From<String> for CrawlError {
    fn from(message: String) -> Self {
        Self::invalid_argument(message)
    }
}
