//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the table lifecycle and the entry writer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or configured.
    #[error("Failed to open database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Dropping the table failed for a reason other than absence.
    #[error("Failed to drop table {table}: {source}")]
    Drop {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Creating the table failed.
    #[error("Failed to create table {table}: {source}")]
    Create {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Preparing the insert statement failed.
    #[error("Failed to prepare insert into {table}: {source}")]
    Prepare {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A single-row insert failed.
    #[error("Failed to insert '{path}' into {table}: {source}")]
    Insert {
        table: String,
        path: String,
        #[source]
        source: rusqlite::Error,
    },
}
