//! Drag Manager for Stringboard.
//!
//! Tracks the single pointer-driven move that may be in progress on a
//! canvas. The manager never touches the committed timeline: renderers read
//! the live offset from here, and the caller commits the final position when
//! the session ends.

use crate::types::board::Position;
use crate::types::drag::{DragKind, DragSession};
use crate::types::errors::DragError;

/// Trait defining the drag session interface.
pub trait DragManagerTrait {
    fn start_drag(&mut self, kind: DragKind, item_id: &str, start: Position) -> Result<(), DragError>;
    fn update_drag(&mut self, position: Position) -> Result<(), DragError>;
    fn end_drag(&mut self) -> Option<DragSession>;
    fn is_dragging(&self) -> bool;
    fn session(&self) -> Option<&DragSession>;
    fn offset(&self) -> Option<Position>;
    fn offset_for(&self, kind: DragKind, item_id: &str) -> Option<Position>;
}

/// `Idle` when `session` is `None`, `Dragging` otherwise.
#[derive(Debug, Default)]
pub struct DragManager {
    session: Option<DragSession>,
}

impl DragManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DragManagerTrait for DragManager {
    /// Begins a session. Only one session may be active at a time.
    fn start_drag(&mut self, kind: DragKind, item_id: &str, start: Position) -> Result<(), DragError> {
        if let Some(active) = &self.session {
            tracing::warn!(active = %active.item_id, requested = %item_id, "Drag already in progress");
            return Err(DragError::AlreadyDragging(active.item_id.clone()));
        }
        tracing::debug!(?kind, item_id, "Drag started");
        self.session = Some(DragSession {
            kind,
            item_id: item_id.to_string(),
            start,
            current: start,
        });
        Ok(())
    }

    /// Records the latest pointer position. Nothing else changes.
    fn update_drag(&mut self, position: Position) -> Result<(), DragError> {
        let session = self.session.as_mut().ok_or(DragError::NotDragging)?;
        session.current = position;
        Ok(())
    }

    /// Returns to idle and hands back the finished session, if there was one.
    fn end_drag(&mut self) -> Option<DragSession> {
        let finished = self.session.take();
        if let Some(session) = &finished {
            let offset = session.offset();
            tracing::debug!(item_id = %session.item_id, dx = offset.x, dy = offset.y, "Drag ended");
        }
        finished
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    fn offset(&self) -> Option<Position> {
        self.session.as_ref().map(DragSession::offset)
    }

    /// Live offset for one item, so a renderer can shift just that item.
    fn offset_for(&self, kind: DragKind, item_id: &str) -> Option<Position> {
        self.session
            .as_ref()
            .filter(|s| s.kind == kind && s.item_id == item_id)
            .map(DragSession::offset)
    }
}
