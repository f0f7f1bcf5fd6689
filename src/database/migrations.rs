//! Schema migrations for the Stringboard SQLite store.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Foreign keys are per-connection, so they are enabled on every open.
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: boards, bookmark entries, connectors")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add connector_beads with stable insertion sequence")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: boards and the two tables that reference them.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS boards (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            x REAL NOT NULL,
            y REAL NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bookmark_entries (
            id TEXT PRIMARY KEY,
            board_id TEXT NOT NULL,
            title TEXT NOT NULL,
            url TEXT,
            description TEXT,
            icon TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (board_id) REFERENCES boards(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS connectors (
            id TEXT PRIMARY KEY,
            from_board_id TEXT NOT NULL,
            to_board_id TEXT NOT NULL,
            color TEXT NOT NULL,
            stroke_width REAL NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            CHECK (from_board_id <> to_board_id),
            FOREIGN KEY (from_board_id) REFERENCES boards(id) ON DELETE CASCADE,
            FOREIGN KEY (to_board_id) REFERENCES boards(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bookmark_entries_board ON bookmark_entries(board_id, sort_order);
        CREATE INDEX IF NOT EXISTS idx_connectors_from ON connectors(from_board_id);
        CREATE INDEX IF NOT EXISTS idx_connectors_to ON connectors(to_board_id);
        ",
    )?;
    Ok(())
}

/// V2: connector beads. `seq` keeps insertion order so equal `sort_order`
/// values come back in the order they were written.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS connector_beads (
            id TEXT PRIMARY KEY,
            connector_id TEXT NOT NULL,
            x REAL NOT NULL,
            y REAL NOT NULL,
            sort_order INTEGER NOT NULL,
            seq INTEGER NOT NULL,
            FOREIGN KEY (connector_id) REFERENCES connectors(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_connector_beads_connector ON connector_beads(connector_id, seq);
        ",
    )?;
    Ok(())
}
