use dircrawl_core::{EntrySink, TableName, normalize};
use dircrawl_store::{TableWriter, create_table, drop_table, open_database, table_exists};
use std::fs;
use tempfile::TempDir;

fn row_count(conn: &rusqlite::Connection, table: &TableName) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table.to_sql()), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_open_database_creates_file() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("crawl.db");

    let conn = open_database(&db).unwrap();
    let table = TableName::parse("TMP.DIRCRAWL").unwrap();
    create_table(&conn, &table).unwrap();

    assert!(db.exists());
    assert!(table_exists(&conn, &table).unwrap());
}

#[test]
fn test_open_database_in_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("no").join("such").join("crawl.db");
    assert!(open_database(&db).is_err());
}

#[test]
fn test_recreate_discards_previous_rows() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "abc").unwrap();
    let conn = open_database(&temp.path().join("crawl.db")).unwrap();
    let table = TableName::parse("TMP.DIRCRAWL").unwrap();
    let entry = normalize(&temp.path().join("a.txt")).unwrap();

    for _ in 0..2 {
        drop_table(&conn, &table).unwrap();
        create_table(&conn, &table).unwrap();
        let mut writer = TableWriter::new(&conn, &table, false).unwrap();
        writer.insert(&entry).unwrap();
        writer.insert(&entry).unwrap();
    }

    // Duplicates within a run are kept; earlier runs are gone.
    assert_eq!(row_count(&conn, &table), 2);
}

#[test]
fn test_escaped_quotes_are_stored_doubled() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("it's here.txt");
    fs::write(&path, "x").unwrap();

    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let table = TableName::parse("CRAWL").unwrap();
    create_table(&conn, &table).unwrap();
    let mut writer = TableWriter::new(&conn, &table, false).unwrap();
    writer.insert(&normalize(&path).unwrap()).unwrap();
    drop(writer);

    let (full, name, prefix): (String, String, String) = conn
        .query_row("SELECT IFSFULL, IFSFILE, IFSPREFIX FROM \"CRAWL\"", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap();

    assert!(full.ends_with("it''s here.txt"));
    assert_eq!(full.replace("''", "'"), path.to_string_lossy());
    assert_eq!(name, "it''s here.txt");
    assert_eq!(prefix, "it''s here");
}
