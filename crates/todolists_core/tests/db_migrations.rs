use rusqlite::Connection;
use todolists_core::db::migrations::{apply_migrations, latest_version};
use todolists_core::db::{connect, open_db, open_db_in_memory, DbError};

#[test]
fn fresh_database_runs_every_step() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 1);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "todolists");
    assert_table_exists(&conn, "todos");
}

#[test]
fn reopening_a_migrated_database_runs_no_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todolists.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = connect(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "todos");

    let mut raw = Connection::open(&path).unwrap();
    assert_eq!(apply_migrations(&mut raw).unwrap(), 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match connect(&path) {
        Err(DbError::SchemaTooNew { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be refused"),
    }
}

#[test]
fn deleting_a_list_cascades_to_its_todos() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO users (username, password) VALUES ('admin', 'x');
         INSERT INTO todolists (id, title, username) VALUES (1, 'Work', 'admin');
         INSERT INTO todos (title, todolist_id, username) VALUES ('Email', 1, 'admin');
         DELETE FROM todolists WHERE id = 1;",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn list_titles_are_unique_per_user_only() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO users (username, password) VALUES ('admin', 'x'), ('guest', 'y');
         INSERT INTO todolists (title, username) VALUES ('Work', 'admin');
         INSERT INTO todolists (title, username) VALUES ('Work', 'guest');",
    )
    .unwrap();

    let duplicate = conn.execute(
        "INSERT INTO todolists (title, username) VALUES ('Work', 'admin');",
        [],
    );
    assert!(duplicate.is_err());
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
