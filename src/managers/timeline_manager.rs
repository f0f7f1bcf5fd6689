//! Timeline Manager for Stringboard.
//!
//! Owns the authoritative [`TimelineData`] of an editor session. Every
//! mutation is validated against the committed data, sent to the
//! [`TimelineService`], and only applied locally once the service confirms.
//! A failed call is recorded in [`TimelineManager::last_error`] and leaves
//! the committed data exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use crate::services::timeline_service::TimelineService;
use crate::types::board::{Board, BoardPatch, Position};
use crate::types::bookmark::{BookmarkEntry, BookmarkPatch};
use crate::types::connector::{ConnectorDraft, ConnectorPatch, ConnectorString};
use crate::types::errors::{ServiceError, TimelineError};
use crate::types::timeline::TimelineData;

/// Controller over the board / bookmark / connector graph.
pub struct TimelineManager {
    service: Arc<dyn TimelineService>,
    data: TimelineData,
    last_error: Option<TimelineError>,
}

impl TimelineManager {
    /// Creates a manager with an empty graph. Call [`load`](Self::load) to
    /// pull the persisted state.
    pub fn new(service: Arc<dyn TimelineService>) -> Self {
        Self {
            service,
            data: TimelineData::default(),
            last_error: None,
        }
    }

    /// Replaces the committed data with whatever the service holds.
    pub async fn load(&mut self) -> Result<&TimelineData, TimelineError> {
        let call = self.service.get_all();
        let data = Self::persist(&mut self.last_error, "load", call).await?;
        tracing::info!(
            boards = data.boards.len(),
            bookmarks = data.bookmarks.len(),
            connectors = data.connectors.len(),
            "Loaded timeline"
        );
        self.data = data;
        Ok(&self.data)
    }

    pub fn data(&self) -> &TimelineData {
        &self.data
    }

    /// Last persistence or validation failure, for user-visible messaging.
    pub fn last_error(&self) -> Option<&TimelineError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ─── Boards ───

    pub async fn create_board(
        &mut self,
        title: &str,
        position: Position,
    ) -> Result<Board, TimelineError> {
        let call = self.service.create_board(title, position);
        let board = Self::persist(&mut self.last_error, "create_board", call).await?;
        tracing::info!(board_id = %board.id, "Created board");
        self.data.boards.push(board.clone());
        Ok(board)
    }

    pub async fn update_board(
        &mut self,
        id: &str,
        patch: &BoardPatch,
    ) -> Result<Board, TimelineError> {
        self.ensure_board(id)?;
        let call = self.service.update_board(id, patch);
        let board = Self::persist(&mut self.last_error, "update_board", call).await?;
        if let Some(slot) = self.data.boards.iter_mut().find(|b| b.id == id) {
            *slot = board.clone();
        }
        tracing::debug!(board_id = %id, "Updated board");
        Ok(board)
    }

    /// Deletes a board together with its bookmark entries and every connector
    /// touching it. Nothing is removed locally unless the service succeeds.
    pub async fn delete_board(&mut self, id: &str) -> Result<(), TimelineError> {
        self.ensure_board(id)?;
        let call = self.service.delete_board(id);
        Self::persist(&mut self.last_error, "delete_board", call).await?;

        let bookmarks_before = self.data.bookmarks.len();
        let connectors_before = self.data.connectors.len();
        self.data.boards.retain(|b| b.id != id);
        self.data.bookmarks.retain(|e| e.board_id != id);
        self.data.connectors.retain(|c| !c.touches(id));
        tracing::info!(
            board_id = %id,
            bookmarks = bookmarks_before - self.data.bookmarks.len(),
            connectors = connectors_before - self.data.connectors.len(),
            "Deleted board with cascade"
        );
        Ok(())
    }

    // ─── Bookmark entries ───

    pub async fn create_bookmark(
        &mut self,
        board_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkEntry, TimelineError> {
        self.ensure_board(board_id)?;
        let call = self.service.create_bookmark(board_id, title, url);
        let entry = Self::persist(&mut self.last_error, "create_bookmark", call).await?;
        tracing::info!(bookmark_id = %entry.id, board_id = %board_id, "Created bookmark");
        self.data.bookmarks.push(entry.clone());
        Ok(entry)
    }

    pub async fn update_bookmark(
        &mut self,
        id: &str,
        patch: &BookmarkPatch,
    ) -> Result<BookmarkEntry, TimelineError> {
        self.ensure_bookmark(id)?;
        let call = self.service.update_bookmark(id, patch);
        let entry = Self::persist(&mut self.last_error, "update_bookmark", call).await?;
        self.replace_bookmark(entry.clone());
        Ok(entry)
    }

    pub async fn delete_bookmark(&mut self, id: &str) -> Result<(), TimelineError> {
        self.ensure_bookmark(id)?;
        let call = self.service.delete_bookmark(id);
        Self::persist(&mut self.last_error, "delete_bookmark", call).await?;
        self.data.bookmarks.retain(|e| e.id != id);
        tracing::info!(bookmark_id = %id, "Deleted bookmark");
        Ok(())
    }

    /// Moves an entry to `new_board_id` (possibly its current board) at `new_order`.
    pub async fn move_bookmark(
        &mut self,
        id: &str,
        new_board_id: &str,
        new_order: i64,
    ) -> Result<BookmarkEntry, TimelineError> {
        self.ensure_bookmark(id)?;
        self.ensure_board(new_board_id)?;
        let call = self.service.move_bookmark(id, new_board_id, new_order);
        let entry = Self::persist(&mut self.last_error, "move_bookmark", call).await?;
        tracing::info!(bookmark_id = %id, board_id = %new_board_id, order = new_order, "Moved bookmark");
        self.replace_bookmark(entry.clone());
        Ok(entry)
    }

    // ─── Connectors ───

    /// Persists a new connector. Self-loops and unknown endpoints are
    /// rejected before the service is called.
    pub async fn create_connector(
        &mut self,
        draft: &ConnectorDraft,
    ) -> Result<ConnectorString, TimelineError> {
        if draft.from_board_id == draft.to_board_id {
            return Err(self.reject(TimelineError::SelfConnection(draft.from_board_id.clone())));
        }
        self.ensure_board(&draft.from_board_id)?;
        self.ensure_board(&draft.to_board_id)?;
        let call = self.service.create_connector(draft);
        let connector = Self::persist(&mut self.last_error, "create_connector", call).await?;
        tracing::info!(
            connector_id = %connector.id,
            from = %connector.from_board_id,
            to = %connector.to_board_id,
            beads = connector.beads.len(),
            "Created connector"
        );
        self.data.connectors.push(connector.clone());
        Ok(connector)
    }

    pub async fn update_connector(
        &mut self,
        id: &str,
        patch: &ConnectorPatch,
    ) -> Result<ConnectorString, TimelineError> {
        self.ensure_connector(id)?;
        let call = self.service.update_connector(id, patch);
        let connector = Self::persist(&mut self.last_error, "update_connector", call).await?;
        if let Some(slot) = self.data.connectors.iter_mut().find(|c| c.id == id) {
            *slot = connector.clone();
        }
        tracing::debug!(connector_id = %id, "Updated connector");
        Ok(connector)
    }

    pub async fn delete_connector(&mut self, id: &str) -> Result<(), TimelineError> {
        self.ensure_connector(id)?;
        let call = self.service.delete_connector(id);
        Self::persist(&mut self.last_error, "delete_connector", call).await?;
        self.data.connectors.retain(|c| c.id != id);
        tracing::info!(connector_id = %id, "Deleted connector");
        Ok(())
    }

    // ─── Derived views ───

    pub fn get_board_by_id(&self, id: &str) -> Option<&Board> {
        self.data.boards.iter().find(|b| b.id == id)
    }

    pub fn get_bookmark_by_id(&self, id: &str) -> Option<&BookmarkEntry> {
        self.data.bookmarks.iter().find(|e| e.id == id)
    }

    pub fn get_connector_by_id(&self, id: &str) -> Option<&ConnectorString> {
        self.data.connectors.iter().find(|c| c.id == id)
    }

    /// Entries of a board in ascending `order`; ties keep insertion order.
    pub fn get_bookmarks_by_board(&self, board_id: &str) -> Vec<&BookmarkEntry> {
        let mut entries: Vec<&BookmarkEntry> = self
            .data
            .bookmarks
            .iter()
            .filter(|e| e.board_id == board_id)
            .collect();
        entries.sort_by_key(|e| e.order);
        entries
    }

    /// Connectors with `board_id` at either end.
    pub fn get_connectors_by_board(&self, board_id: &str) -> Vec<&ConnectorString> {
        self.data
            .connectors
            .iter()
            .filter(|c| c.touches(board_id))
            .collect()
    }

    /// Connector owning the bead with `bead_id`, if any.
    pub fn find_connector_by_bead(&self, bead_id: &str) -> Option<&ConnectorString> {
        self.data
            .connectors
            .iter()
            .find(|c| c.beads.iter().any(|b| b.id == bead_id))
    }

    /// Board id → committed position, built fresh on every call.
    pub fn board_positions(&self) -> HashMap<String, Position> {
        self.data
            .boards
            .iter()
            .map(|b| (b.id.clone(), b.position))
            .collect()
    }

    // ─── Internals ───

    async fn persist<T>(
        last_error: &mut Option<TimelineError>,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, TimelineError> {
        match call.await {
            Ok(value) => {
                *last_error = None;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "Persistence failed; committed state unchanged");
                let err = TimelineError::Service(err);
                *last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn reject(&mut self, err: TimelineError) -> TimelineError {
        tracing::warn!(error = %err, "Rejected timeline action");
        self.last_error = Some(err.clone());
        err
    }

    fn ensure_board(&mut self, id: &str) -> Result<(), TimelineError> {
        if self.data.has_board(id) {
            Ok(())
        } else {
            Err(self.reject(TimelineError::BoardNotFound(id.to_string())))
        }
    }

    fn ensure_bookmark(&mut self, id: &str) -> Result<(), TimelineError> {
        if self.get_bookmark_by_id(id).is_some() {
            Ok(())
        } else {
            Err(self.reject(TimelineError::BookmarkNotFound(id.to_string())))
        }
    }

    fn ensure_connector(&mut self, id: &str) -> Result<(), TimelineError> {
        if self.get_connector_by_id(id).is_some() {
            Ok(())
        } else {
            Err(self.reject(TimelineError::ConnectorNotFound(id.to_string())))
        }
    }

    fn replace_bookmark(&mut self, entry: BookmarkEntry) {
        if let Some(slot) = self.data.bookmarks.iter_mut().find(|e| e.id == entry.id) {
            *slot = entry;
        }
    }
}
