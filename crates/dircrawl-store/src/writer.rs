//! Single-row entry writer.
//!
//! Each entry becomes one insert with bound parameters. With SQL echo on,
//! the equivalent literal statement is printed for debugging; that text is
//! never executed.

use rusqlite::{Connection, Statement, params};
use tracing::{debug, error};

use dircrawl_core::{CrawlEntry, EntrySink, TableName};

use crate::error::{StoreError, StoreResult};
use crate::schema::COLUMNS;

/// Parameterized `INSERT` statement for `table`.
pub fn insert_sql(table: &TableName) -> String {
    let placeholders = (1..=COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        table.to_sql(),
        COLUMNS.join(",")
    )
}

/// Literal `INSERT` text for an entry.
///
/// String fields are already quote-escaped, so they are wrapped in quotes
/// as they are.
pub fn render_insert(table: &TableName, entry: &CrawlEntry) -> String {
    format!(
        "insert into {} ({}) VALUES('{}','{}','{}','{}',{},'{}','{}','{}','{}','{}')",
        table.to_sql(),
        COLUMNS.join(","),
        entry.full_path,
        entry.file_name,
        entry.name_prefix,
        entry.extension,
        entry.size_bytes,
        entry.kind,
        entry.symlink_flag(),
        entry.created_at,
        entry.modified_at,
        entry.accessed_at,
    )
}

/// Writes crawl entries into the crawl table through a prepared statement.
pub struct TableWriter<'conn> {
    table: TableName,
    stmt: Statement<'conn>,
    echo_sql: bool,
    rows_written: u64,
}

impl<'conn> TableWriter<'conn> {
    /// Prepare a writer for `table`, which must already exist.
    pub fn new(conn: &'conn Connection, table: &TableName, echo_sql: bool) -> StoreResult<Self> {
        let stmt = conn
            .prepare(&insert_sql(table))
            .map_err(|source| StoreError::Prepare {
                table: table.to_string(),
                source,
            })?;

        Ok(Self {
            table: table.clone(),
            stmt,
            echo_sql,
            rows_written: 0,
        })
    }

    /// Number of rows inserted so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Table this writer targets.
    pub fn table(&self) -> &TableName {
        &self.table
    }
}

impl EntrySink for TableWriter<'_> {
    type Error = StoreError;

    fn insert(&mut self, entry: &CrawlEntry) -> Result<(), Self::Error> {
        if self.echo_sql {
            println!("{}", render_insert(&self.table, entry));
        }

        let size = i64::try_from(entry.size_bytes).unwrap_or(i64::MAX);
        let result = self.stmt.execute(params![
            entry.full_path,
            entry.file_name.as_str(),
            entry.name_prefix.as_str(),
            entry.extension.as_str(),
            size,
            entry.kind.as_ref(),
            entry.symlink_flag(),
            entry.created_at,
            entry.modified_at,
            entry.accessed_at,
        ]);

        match result {
            Ok(_) => {
                self.rows_written += 1;
                debug!(path = %entry.full_path, kind = %entry.kind, "row inserted");
                Ok(())
            }
            Err(source) => {
                error!(path = %entry.full_path, table = %self.table, error = %source, "insert failed");
                Err(StoreError::Insert {
                    table: self.table.to_string(),
                    path: entry.full_path.clone(),
                    source,
                })
            }
        }
    }
}
