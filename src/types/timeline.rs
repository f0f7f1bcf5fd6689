use serde::{Deserialize, Serialize};

use super::board::Board;
use super::bookmark::BookmarkEntry;
use super::connector::ConnectorString;

/// The aggregate root of an editor session: every board, entry and connector.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimelineData {
    pub boards: Vec<Board>,
    pub bookmarks: Vec<BookmarkEntry>,
    pub connectors: Vec<ConnectorString>,
}

impl TimelineData {
    pub fn has_board(&self, board_id: &str) -> bool {
        self.boards.iter().any(|b| b.id == board_id)
    }

    /// True when every bookmark and connector endpoint names a live board.
    pub fn is_referentially_intact(&self) -> bool {
        self.bookmarks.iter().all(|e| self.has_board(&e.board_id))
            && self
                .connectors
                .iter()
                .all(|c| self.has_board(&c.from_board_id) && self.has_board(&c.to_board_id))
    }
}
