//! SQLite persistence for dircrawl.
//!
//! Owns the crawl table's lifecycle (drop, then create with a fixed column
//! layout) and writes one row per crawl entry.
//!
//! # Example
//!
//! ```rust,no_run
//! use dircrawl_core::{EntrySink, TableName, normalize};
//! use dircrawl_store::{TableWriter, create_table, drop_table, open_database};
//!
//! let conn = open_database("dircrawl.db".as_ref()).unwrap();
//! let table = TableName::parse("TMP.DIRCRAWL").unwrap();
//! drop_table(&conn, &table).unwrap();
//! create_table(&conn, &table).unwrap();
//!
//! let mut writer = TableWriter::new(&conn, &table, false).unwrap();
//! writer.insert(&normalize("/tmp".as_ref()).unwrap()).unwrap();
//! ```

mod error;
mod schema;
mod writer;

pub use error::{StoreError, StoreResult};
pub use schema::{
    COLUMNS, create_table, create_table_sql, drop_table, open_database, table_exists,
};
pub use writer::{TableWriter, insert_sql, render_insert};
