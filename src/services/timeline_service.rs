//! Data-access service contract for the timeline graph.
//!
//! The controller never talks to storage directly; it goes through a
//! [`TimelineService`] so the backing store can be the in-memory mock, the
//! SQLite file store or a remote REST backend.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::board::{Board, BoardPatch, Position};
use crate::types::bookmark::{BookmarkEntry, BookmarkPatch};
use crate::types::connector::{ConnectorDraft, ConnectorPatch, ConnectorString};
use crate::types::errors::ServiceError;
use crate::types::timeline::TimelineData;

/// Async CRUD over boards, bookmark entries and connectors.
///
/// Deleting a board cascades to its entries and to every connector touching
/// it. Deleting a missing ID reports [`ServiceError::NotFound`] and leaves the
/// store unchanged.
#[async_trait]
pub trait TimelineService: Send + Sync {
    async fn get_all(&self) -> Result<TimelineData, ServiceError>;

    async fn create_board(&self, title: &str, position: Position) -> Result<Board, ServiceError>;
    async fn update_board(&self, id: &str, patch: &BoardPatch) -> Result<Board, ServiceError>;
    async fn delete_board(&self, id: &str) -> Result<(), ServiceError>;

    async fn create_bookmark(
        &self,
        board_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkEntry, ServiceError>;
    async fn update_bookmark(
        &self,
        id: &str,
        patch: &BookmarkPatch,
    ) -> Result<BookmarkEntry, ServiceError>;
    async fn delete_bookmark(&self, id: &str) -> Result<(), ServiceError>;
    async fn move_bookmark(
        &self,
        id: &str,
        new_board_id: &str,
        new_order: i64,
    ) -> Result<BookmarkEntry, ServiceError>;

    async fn create_connector(&self, draft: &ConnectorDraft)
        -> Result<ConnectorString, ServiceError>;
    async fn update_connector(
        &self,
        id: &str,
        patch: &ConnectorPatch,
    ) -> Result<ConnectorString, ServiceError>;
    async fn delete_connector(&self, id: &str) -> Result<(), ServiceError>;
}

/// Current UNIX timestamp in seconds.
pub(crate) fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
