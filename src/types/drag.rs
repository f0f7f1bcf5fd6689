use serde::{Deserialize, Serialize};

use super::board::Position;

/// What a drag session is moving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Board,
    Bookmark,
    Bead,
}

/// Transient record of an in-progress pointer-driven move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub item_id: String,
    pub start: Position,
    pub current: Position,
}

impl DragSession {
    /// Uncommitted delta between the pointer-down and the latest pointer position.
    pub fn offset(&self) -> Position {
        self.current.delta_from(self.start)
    }
}

/// Where a dragged bookmark entry was dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkDrop {
    pub board_id: String,
    pub order: i64,
}
