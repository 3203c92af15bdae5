//! Crawl table schema and lifecycle.
//!
//! The table is replaced on every run: dropped if present, then recreated
//! empty with a fixed column layout.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use dircrawl_core::TableName;

use crate::error::{StoreError, StoreResult};

/// Column names in insert order.
pub const COLUMNS: [&str; 10] = [
    "IFSFULL",
    "IFSFILE",
    "IFSPREFIX",
    "IFSEXT",
    "IFSSIZE",
    "IFSTYPE",
    "IFSSYMLNK",
    "IFSCRTTIME",
    "IFSMODTIME",
    "IFSACCTIME",
];

/// Column definitions matching [`COLUMNS`].
const COLUMN_DEFINITIONS: &str = "IFSFULL VARCHAR(1024), \
    IFSFILE VARCHAR(1024), \
    IFSPREFIX VARCHAR(1024), \
    IFSEXT VARCHAR(100), \
    IFSSIZE DECIMAL(15,2), \
    IFSTYPE VARCHAR(10), \
    IFSSYMLNK VARCHAR(10), \
    IFSCRTTIME TIMESTAMP, \
    IFSMODTIME TIMESTAMP, \
    IFSACCTIME TIMESTAMP";

/// Pragmas applied to every crawl connection.
const WRITE_PRAGMAS: &str = r#"
PRAGMA synchronous = NORMAL;
PRAGMA temp_store = MEMORY;
PRAGMA cache_size = -64000;
"#;

/// Open (creating if needed) the database file with write-friendly pragmas.
pub fn open_database(path: &Path) -> StoreResult<Connection> {
    let open_err = |source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open(path).map_err(open_err)?;
    let mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(open_err)?;
    conn.execute_batch(WRITE_PRAGMAS).map_err(open_err)?;
    debug!(path = %path.display(), journal_mode = %mode, "database opened");

    Ok(conn)
}

/// `CREATE TABLE` statement for `table`.
pub fn create_table_sql(table: &TableName) -> String {
    format!("CREATE TABLE {} ({COLUMN_DEFINITIONS})", table.to_sql())
}

/// Drop `table` if it exists. Returns whether a table was removed.
pub fn drop_table(conn: &Connection, table: &TableName) -> StoreResult<bool> {
    let drop_err = |source| StoreError::Drop {
        table: table.to_string(),
        source,
    };

    let existed = table_exists(conn, table).map_err(drop_err)?;
    conn.execute(&format!("DROP TABLE IF EXISTS {}", table.to_sql()), [])
        .map_err(drop_err)?;

    if existed {
        info!(%table, "table dropped");
    }
    Ok(existed)
}

/// Create `table` with the crawl column layout.
pub fn create_table(conn: &Connection, table: &TableName) -> StoreResult<()> {
    conn.execute(&create_table_sql(table), [])
        .map_err(|source| StoreError::Create {
            table: table.to_string(),
            source,
        })?;

    info!(%table, "table created");
    Ok(())
}

/// Check whether `table` exists.
pub fn table_exists(conn: &Connection, table: &TableName) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table.to_string()],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}
