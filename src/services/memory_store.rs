//! In-memory [`TimelineService`] used by tests and the demo binary.
//!
//! Supports failure injection so callers can exercise the controller's
//! no-partial-apply behaviour.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::timeline_service::{new_id, now, TimelineService};
use crate::types::board::{Board, BoardPatch, Position};
use crate::types::bookmark::{BookmarkEntry, BookmarkPatch};
use crate::types::connector::{ConnectorDraft, ConnectorPatch, ConnectorString};
use crate::types::errors::ServiceError;
use crate::types::timeline::TimelineData;

/// Mock store holding a [`TimelineData`] behind a mutex.
pub struct InMemoryTimelineService {
    data: Mutex<TimelineData>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryTimelineService {
    pub fn new() -> Self {
        Self::with_data(TimelineData::default())
    }

    /// Creates a store pre-seeded with `data`.
    pub fn with_data(data: TimelineData) -> Self {
        Self {
            data: Mutex::new(data),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// When set, every call fails with [`ServiceError::Unavailable`] without
    /// touching the stored data.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of service calls received so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copy of what the store currently holds.
    pub fn snapshot(&self) -> TimelineData {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn enter(&self) -> Result<MutexGuard<'_, TimelineData>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("injected failure".to_string()));
        }
        self.data
            .lock()
            .map_err(|_| ServiceError::Unavailable("store lock poisoned".to_string()))
    }
}

impl Default for InMemoryTimelineService {
    fn default() -> Self {
        Self::new()
    }
}

fn require_board(data: &TimelineData, board_id: &str) -> Result<(), ServiceError> {
    if data.has_board(board_id) {
        Ok(())
    } else {
        Err(ServiceError::NotFound(board_id.to_string()))
    }
}

#[async_trait]
impl TimelineService for InMemoryTimelineService {
    async fn get_all(&self) -> Result<TimelineData, ServiceError> {
        Ok(self.enter()?.clone())
    }

    async fn create_board(&self, title: &str, position: Position) -> Result<Board, ServiceError> {
        let mut data = self.enter()?;
        let ts = now();
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            position,
            created_at: ts,
            updated_at: ts,
        };
        data.boards.push(board.clone());
        Ok(board)
    }

    async fn update_board(&self, id: &str, patch: &BoardPatch) -> Result<Board, ServiceError> {
        let mut data = self.enter()?;
        let board = data
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        patch.apply_to(board);
        board.updated_at = now();
        Ok(board.clone())
    }

    async fn delete_board(&self, id: &str) -> Result<(), ServiceError> {
        let mut data = self.enter()?;
        require_board(&data, id)?;
        data.boards.retain(|b| b.id != id);
        data.bookmarks.retain(|e| e.board_id != id);
        data.connectors.retain(|c| !c.touches(id));
        Ok(())
    }

    async fn create_bookmark(
        &self,
        board_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkEntry, ServiceError> {
        let mut data = self.enter()?;
        require_board(&data, board_id)?;
        let order = data
            .bookmarks
            .iter()
            .filter(|e| e.board_id == board_id)
            .map(|e| e.order)
            .max()
            .map_or(0, |max| max + 1);
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
        data.bookmarks.push(entry.clone());
        Ok(entry)
    }

    async fn update_bookmark(
        &self,
        id: &str,
        patch: &BookmarkPatch,
    ) -> Result<BookmarkEntry, ServiceError> {
        let mut data = self.enter()?;
        let entry = data
            .bookmarks
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        patch.apply_to(entry);
        entry.updated_at = now();
        Ok(entry.clone())
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), ServiceError> {
        let mut data = self.enter()?;
        let before = data.bookmarks.len();
        data.bookmarks.retain(|e| e.id != id);
        if data.bookmarks.len() == before {
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
        let mut data = self.enter()?;
        require_board(&data, new_board_id)?;
        let entry = data
            .bookmarks
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        entry.board_id = new_board_id.to_string();
        entry.order = new_order;
        entry.updated_at = now();
        Ok(entry.clone())
    }

    async fn create_connector(
        &self,
        draft: &ConnectorDraft,
    ) -> Result<ConnectorString, ServiceError> {
        let mut data = self.enter()?;
        if draft.from_board_id == draft.to_board_id {
            return Err(ServiceError::Rejected(format!(
                "connector endpoints must differ ({})",
                draft.from_board_id
            )));
        }
        require_board(&data, &draft.from_board_id)?;
        require_board(&data, &draft.to_board_id)?;
        let ts = now();
        let connector = ConnectorString {
            id: new_id(),
            from_board_id: draft.from_board_id.clone(),
            to_board_id: draft.to_board_id.clone(),
            beads: draft.beads.clone(),
            color: draft.color.clone(),
            stroke_width: draft.stroke_width,
            created_at: ts,
            updated_at: ts,
        };
        data.connectors.push(connector.clone());
        Ok(connector)
    }

    async fn update_connector(
        &self,
        id: &str,
        patch: &ConnectorPatch,
    ) -> Result<ConnectorString, ServiceError> {
        let mut data = self.enter()?;
        let connector = data
            .connectors
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        patch.apply_to(connector);
        connector.updated_at = now();
        Ok(connector.clone())
    }

    async fn delete_connector(&self, id: &str) -> Result<(), ServiceError> {
        let mut data = self.enter()?;
        let before = data.connectors.len();
        data.connectors.retain(|c| c.id != id);
        if data.connectors.len() == before {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
