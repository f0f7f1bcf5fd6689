//! SQLite-backed [`TimelineService`].
//!
//! Cascading deletes are delegated to the schema's `ON DELETE CASCADE`
//! foreign keys; connector beads are rewritten inside a transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::timeline_service::{new_id, now, TimelineService};
use crate::database::Database;
use crate::types::board::{Board, BoardPatch, Position};
use crate::types::bookmark::{BookmarkEntry, BookmarkPatch};
use crate::types::connector::{ConnectorBead, ConnectorDraft, ConnectorPatch, ConnectorString};
use crate::types::errors::ServiceError;
use crate::types::timeline::TimelineData;

const BOARD_COLUMNS: &str = "id, title, x, y, created_at, updated_at";
const BOOKMARK_COLUMNS: &str =
    "id, board_id, title, url, description, icon, sort_order, created_at, updated_at";
const CONNECTOR_COLUMNS: &str =
    "id, from_board_id, to_board_id, color, stroke_width, created_at, updated_at";

/// Timeline store persisted in a SQLite database.
pub struct SqliteTimelineService {
    db: Mutex<Database>,
}

impl SqliteTimelineService {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, ServiceError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, ServiceError> {
        self.db
            .lock()
            .map_err(|_| ServiceError::Unavailable("database lock poisoned".to_string()))
    }

    fn row_to_board(row: &rusqlite::Row) -> rusqlite::Result<Board> {
        Ok(Board {
            id: row.get(0)?,
            title: row.get(1)?,
            position: Position::new(row.get(2)?, row.get(3)?),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<BookmarkEntry> {
        Ok(BookmarkEntry {
            id: row.get(0)?,
            board_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            description: row.get(4)?,
            icon: row.get(5)?,
            order: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn row_to_connector(row: &rusqlite::Row) -> rusqlite::Result<ConnectorString> {
        Ok(ConnectorString {
            id: row.get(0)?,
            from_board_id: row.get(1)?,
            to_board_id: row.get(2)?,
            beads: Vec::new(),
            color: row.get(3)?,
            stroke_width: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn board_exists(conn: &Connection, id: &str) -> Result<bool, ServiceError> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM boards WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn require_board(conn: &Connection, id: &str) -> Result<(), ServiceError> {
        if Self::board_exists(conn, id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id.to_string()))
        }
    }

    fn load_board(conn: &Connection, id: &str) -> Result<Board, ServiceError> {
        conn.query_row(
            &format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ?1"),
            params![id],
            Self::row_to_board,
        )
        .optional()?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    fn load_bookmark(conn: &Connection, id: &str) -> Result<BookmarkEntry, ServiceError> {
        conn.query_row(
            &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmark_entries WHERE id = ?1"),
            params![id],
            Self::row_to_bookmark,
        )
        .optional()?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    fn load_beads(conn: &Connection, connector_id: &str) -> Result<Vec<ConnectorBead>, ServiceError> {
        let mut stmt = conn.prepare(
            "SELECT id, x, y, sort_order FROM connector_beads WHERE connector_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![connector_id], |row| {
            Ok(ConnectorBead {
                id: row.get(0)?,
                x: row.get(1)?,
                y: row.get(2)?,
                order: row.get(3)?,
            })
        })?;
        let mut beads = Vec::new();
        for row in rows {
            beads.push(row?);
        }
        Ok(beads)
    }

    fn load_connector(conn: &Connection, id: &str) -> Result<ConnectorString, ServiceError> {
        let mut connector = conn
            .query_row(
                &format!("SELECT {CONNECTOR_COLUMNS} FROM connectors WHERE id = ?1"),
                params![id],
                Self::row_to_connector,
            )
            .optional()?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        connector.beads = Self::load_beads(conn, id)?;
        Ok(connector)
    }

    fn write_beads(
        conn: &Connection,
        connector_id: &str,
        beads: &[ConnectorBead],
    ) -> Result<(), ServiceError> {
        conn.execute(
            "DELETE FROM connector_beads WHERE connector_id = ?1",
            params![connector_id],
        )?;
        let mut stmt = conn.prepare(
            "INSERT INTO connector_beads (id, connector_id, x, y, sort_order, seq) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (seq, bead) in beads.iter().enumerate() {
            let id = if bead.id.is_empty() { new_id() } else { bead.id.clone() };
            stmt.execute(params![id, connector_id, bead.x, bead.y, bead.order, seq as i64])?;
        }
        Ok(())
    }

    fn collect<T>(
        conn: &Connection,
        sql: &str,
        map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, ServiceError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

#[async_trait]
impl TimelineService for SqliteTimelineService {
    async fn get_all(&self) -> Result<TimelineData, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        let boards = Self::collect(
            conn,
            &format!("SELECT {BOARD_COLUMNS} FROM boards ORDER BY created_at, rowid"),
            Self::row_to_board,
        )?;
        let bookmarks = Self::collect(
            conn,
            &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmark_entries ORDER BY board_id, sort_order, rowid"),
            Self::row_to_bookmark,
        )?;
        let mut connectors = Self::collect(
            conn,
            &format!("SELECT {CONNECTOR_COLUMNS} FROM connectors ORDER BY created_at, rowid"),
            Self::row_to_connector,
        )?;
        for connector in &mut connectors {
            connector.beads = Self::load_beads(conn, &connector.id)?;
        }
        Ok(TimelineData {
            boards,
            bookmarks,
            connectors,
        })
    }

    async fn create_board(&self, title: &str, position: Position) -> Result<Board, ServiceError> {
        let db = self.lock()?;
        let ts = now();
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            position,
            created_at: ts,
            updated_at: ts,
        };
        db.connection().execute(
            "INSERT INTO boards (id, title, x, y, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![board.id, board.title, position.x, position.y, ts, ts],
        )?;
        Ok(board)
    }

    async fn update_board(&self, id: &str, patch: &BoardPatch) -> Result<Board, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        let mut board = Self::load_board(conn, id)?;
        patch.apply_to(&mut board);
        board.updated_at = now();
        conn.execute(
            "UPDATE boards SET title = ?1, x = ?2, y = ?3, updated_at = ?4 WHERE id = ?5",
            params![board.title, board.position.x, board.position.y, board.updated_at, id],
        )?;
        Ok(board)
    }

    async fn delete_board(&self, id: &str) -> Result<(), ServiceError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM boards WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn create_bookmark(
        &self,
        board_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkEntry, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        Self::require_board(conn, board_id)?;
        let order: i64 = conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM bookmark_entries WHERE board_id = ?1",
            params![board_id],
            |row| row.get(0),
        )?;
        let ts = now();
        let entry = BookmarkEntry {
            id: new_id(),
            board_id: board_id.to_string(),
            title: title.to_string(),
            url: url.map(str::to_string),
            description: None,
            icon: None,
            order,
            created_at: ts,
            updated_at: ts,
        };
        conn.execute(
            "INSERT INTO bookmark_entries (id, board_id, title, url, description, icon, sort_order, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, NULL, NULL, ?5, ?6, ?7)",
            params![entry.id, board_id, title, url, order, ts, ts],
        )?;
        Ok(entry)
    }

    async fn update_bookmark(
        &self,
        id: &str,
        patch: &BookmarkPatch,
    ) -> Result<BookmarkEntry, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        let mut entry = Self::load_bookmark(conn, id)?;
        patch.apply_to(&mut entry);
        entry.updated_at = now();
        conn.execute(
            "UPDATE bookmark_entries SET title = ?1, url = ?2, description = ?3, icon = ?4, updated_at = ?5 WHERE id = ?6",
            params![entry.title, entry.url, entry.description, entry.icon, entry.updated_at, id],
        )?;
        Ok(entry)
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), ServiceError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM bookmark_entries WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn move_bookmark(
        &self,
        id: &str,
        new_board_id: &str,
        new_order: i64,
    ) -> Result<BookmarkEntry, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        Self::require_board(conn, new_board_id)?;
        let affected = conn.execute(
            "UPDATE bookmark_entries SET board_id = ?1, sort_order = ?2, updated_at = ?3 WHERE id = ?4",
            params![new_board_id, new_order, now(), id],
        )?;
        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Self::load_bookmark(conn, id)
    }

    async fn create_connector(
        &self,
        draft: &ConnectorDraft,
    ) -> Result<ConnectorString, ServiceError> {
        if draft.from_board_id == draft.to_board_id {
            return Err(ServiceError::Rejected(format!(
                "connector endpoints must differ ({})",
                draft.from_board_id
            )));
        }
        let db = self.lock()?;
        let conn = db.connection();
        Self::require_board(conn, &draft.from_board_id)?;
        Self::require_board(conn, &draft.to_board_id)?;

        let id = new_id();
        let ts = now();
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO connectors (id, from_board_id, to_board_id, color, stroke_width, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, draft.from_board_id, draft.to_board_id, draft.color, draft.stroke_width, ts, ts],
        )?;
        Self::write_beads(&tx, &id, &draft.beads)?;
        tx.commit()?;

        Self::load_connector(conn, &id)
    }

    async fn update_connector(
        &self,
        id: &str,
        patch: &ConnectorPatch,
    ) -> Result<ConnectorString, ServiceError> {
        let db = self.lock()?;
        let conn = db.connection();
        let mut connector = Self::load_connector(conn, id)?;
        patch.apply_to(&mut connector);
        connector.updated_at = now();

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE connectors SET color = ?1, stroke_width = ?2, updated_at = ?3 WHERE id = ?4",
            params![connector.color, connector.stroke_width, connector.updated_at, id],
        )?;
        if let Some(beads) = &patch.beads {
            Self::write_beads(&tx, id, beads)?;
        }
        tx.commit()?;

        Self::load_connector(conn, id)
    }

    async fn delete_connector(&self, id: &str) -> Result<(), ServiceError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM connectors WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
