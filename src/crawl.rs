//! Crawl run stages: validate, reset the table, walk and persist.

use rusqlite::Connection;
use tracing::{info, warn};

use dircrawl_core::{CrawlConfig, CrawlError, CrawlStats, TableName, ensure_directory};
use dircrawl_scan::TreeWalker;
use dircrawl_store::{TableWriter, create_table, drop_table};

/// Run one crawl into `conn`.
///
/// The root is re-checked before the table is touched, so a run against a
/// vanished directory leaves the previous table contents in place.
pub fn run(config: &CrawlConfig, conn: &Connection) -> Result<CrawlStats, CrawlError> {
    ensure_directory(&config.root)?;

    let dropped = reset_table(conn, &config.table)?;
    println!("Drop: {dropped}");
    println!("Create: true");

    walk_into_table(config, conn)
}

/// Drop and recreate the crawl table.
///
/// A failed drop is logged and tolerated; a failed create is fatal. Returns
/// whether the drop succeeded.
pub fn reset_table(conn: &Connection, table: &TableName) -> Result<bool, CrawlError> {
    let dropped = match drop_table(conn, table) {
        Ok(_) => true,
        Err(err) => {
            warn!(%table, error = %err, "drop failed, continuing");
            false
        }
    };

    create_table(conn, table).map_err(|e| CrawlError::schema(table.to_string(), e))?;
    Ok(dropped)
}

/// Walk the configured root and insert one row per entry into the table.
pub fn walk_into_table(config: &CrawlConfig, conn: &Connection) -> Result<CrawlStats, CrawlError> {
    let mut writer = TableWriter::new(conn, &config.table, config.print_sql)
        .map_err(|e| CrawlError::schema(config.table.to_string(), e))?;

    let stats = TreeWalker::new(config).walk(&mut writer)?;
    info!(
        table = %writer.table(),
        rows = writer.rows_written(),
        "crawl persisted"
    );
    Ok(stats)
}
