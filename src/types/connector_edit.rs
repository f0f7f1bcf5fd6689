use serde::{Deserialize, Serialize};

use super::connector::{ConnectorBead, ConnectorDraft};

/// How an authoring session was entered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorEditMode {
    Create,
    Edit,
}

/// Observable state of the connector-authoring machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorEditState {
    Inactive,
    SourcePending,
    TargetPending,
    Ready,
    Editing,
}

impl ConnectorEditState {
    pub fn is_active(self) -> bool {
        self != ConnectorEditState::Inactive
    }
}

/// What finishing the current authoring session must persist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorCommit {
    Create(ConnectorDraft),
    UpdateBeads {
        connector_id: String,
        beads: Vec<ConnectorBead>,
    },
}

/// Snapshot of the authoring machine for renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorEditSnapshot {
    pub state: ConnectorEditState,
    pub mode: Option<ConnectorEditMode>,
    pub selected_connector_id: Option<String>,
    pub source_board_id: Option<String>,
    pub target_board_id: Option<String>,
    pub temp_beads: Vec<ConnectorBead>,
}
