use chrono::{FixedOffset, TimeZone};
use peopledb_core::db::migrations::latest_version;
use peopledb_core::db::{open_db, open_db_in_memory, DbError};
use peopledb_core::{PeopleRepository, Person};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::rc::Rc;

#[test]
fn open_db_in_memory_creates_all_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "people");
    assert_table_exists(&conn, "addresses");
}

#[test]
fn file_database_can_bind_id_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("people.db")).unwrap();

    let ids = Rc::new(vec![Value::Integer(4), Value::Integer(9)]);
    let total: i64 = conn
        .query_row("SELECT SUM(value) FROM rarray(?)", [ids], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 13);
}

#[test]
fn reopening_file_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");
    let dob = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(1990, 5, 1, 8, 30, 0)
        .unwrap();

    let first = open_db(&path).unwrap();
    let saved = PeopleRepository::new(&first)
        .save(Person::new("Linus", "T", dob))
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let found = PeopleRepository::new(&second)
        .find_by_id(saved.id().unwrap())
        .unwrap();
    assert_eq!(found, Some(saved));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
