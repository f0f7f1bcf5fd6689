use serde::{Deserialize, Serialize};

/// A point on the unbounded canvas plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, used to apply a drag offset to a committed position.
    pub fn translate(self, delta: Position) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Vector from `origin` to `self`.
    pub fn delta_from(self, origin: Position) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn midpoint(self, other: Position) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A positioned container node on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub id: String,
    pub title: String,
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for a board. `None` fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BoardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl BoardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            position: None,
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            title: None,
            position: Some(position),
        }
    }

    pub fn apply_to(&self, board: &mut Board) {
        if let Some(title) = &self.title {
            board.title = title.clone();
        }
        if let Some(position) = self.position {
            board.position = position;
        }
    }
}

/// A single position change produced by an alignment or distribution pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionUpdate {
    pub board_id: String,
    pub position: Position,
}
