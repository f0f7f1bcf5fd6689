use serde::{Deserialize, Serialize};

use super::board::Position;

/// Stroke colour given to connectors when none is configured.
pub const DEFAULT_CONNECTOR_COLOR: &str = "#e11d48";

/// Stroke width given to connectors when none is configured.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// An ordered waypoint on a connector, in absolute plane coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorBead {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub order: i64,
}

impl ConnectorBead {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A directed edge between two distinct boards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorString {
    pub id: String,
    pub from_board_id: String,
    pub to_board_id: String,
    pub beads: Vec<ConnectorBead>,
    pub color: String,
    pub stroke_width: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ConnectorString {
    pub fn touches(&self, board_id: &str) -> bool {
        self.from_board_id == board_id || self.to_board_id == board_id
    }

    /// Beads in traversal order. The sort is stable so equal `order` values
    /// keep their insertion order.
    pub fn sorted_beads(&self) -> Vec<&ConnectorBead> {
        let mut beads: Vec<&ConnectorBead> = self.beads.iter().collect();
        beads.sort_by_key(|b| b.order);
        beads
    }
}

/// Creation payload for a connector, produced by the authoring state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorDraft {
    pub from_board_id: String,
    pub to_board_id: String,
    pub beads: Vec<ConnectorBead>,
    pub color: String,
    pub stroke_width: f64,
}

impl ConnectorDraft {
    pub fn new(from_board_id: impl Into<String>, to_board_id: impl Into<String>) -> Self {
        Self {
            from_board_id: from_board_id.into(),
            to_board_id: to_board_id.into(),
            beads: Vec::new(),
            color: DEFAULT_CONNECTOR_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn with_beads(mut self, beads: Vec<ConnectorBead>) -> Self {
        self.beads = beads;
        self
    }
}

/// Partial update for a connector. `beads`, when present, replaces the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConnectorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beads: Option<Vec<ConnectorBead>>,
}

impl ConnectorPatch {
    pub fn beads(beads: Vec<ConnectorBead>) -> Self {
        Self {
            beads: Some(beads),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, connector: &mut ConnectorString) {
        if let Some(color) = &self.color {
            connector.color = color.clone();
        }
        if let Some(width) = self.stroke_width {
            connector.stroke_width = width;
        }
        if let Some(beads) = &self.beads {
            connector.beads = beads.clone();
        }
    }
}
