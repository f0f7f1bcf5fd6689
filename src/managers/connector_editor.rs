//! Connector Editor for Stringboard.
//!
//! The step-by-step authoring flow for connectors:
//!
//! ```text
//! Inactive ──start(Create)──▶ SourcePending ──source──▶ TargetPending ──target──▶ Ready ──finish──▶ Inactive
//!    │                                                      ▲   │ source (resets target)   │ add bead
//!    └──start(Edit)──▶ Editing ──finish──▶ Inactive         └───┘                          ▼
//! ```
//!
//! Any active state returns to `Inactive` on cancel, discarding selections
//! and beads. The editor only holds transient state; persisting a finished
//! session is done by the caller with [`ConnectorEditor::pending_commit`]
//! followed by [`ConnectorEditor::reset`] once the save succeeded.

use uuid::Uuid;

use crate::types::board::Position;
use crate::types::connector::{ConnectorBead, ConnectorDraft, ConnectorString};
use crate::types::connector::{DEFAULT_CONNECTOR_COLOR, DEFAULT_STROKE_WIDTH};
use crate::types::connector_edit::{
    ConnectorCommit, ConnectorEditMode, ConnectorEditSnapshot, ConnectorEditState,
};
use crate::types::errors::ConnectorEditError;

/// Trait defining the connector-authoring interface.
pub trait ConnectorEditorTrait {
    fn start_connector_edit(
        &mut self,
        mode: ConnectorEditMode,
        connector: Option<&ConnectorString>,
    ) -> Result<(), ConnectorEditError>;
    fn select_source_board(&mut self, board_id: &str) -> Result<(), ConnectorEditError>;
    fn select_target_board(&mut self, board_id: &str) -> Result<bool, ConnectorEditError>;
    fn add_temp_bead(&mut self, position: Position) -> Result<ConnectorBead, ConnectorEditError>;
    fn move_bead(&mut self, bead_id: &str, position: Position) -> Result<(), ConnectorEditError>;
    fn remove_bead(&mut self, bead_id: &str) -> Result<(), ConnectorEditError>;
    fn pending_commit(&self) -> Result<ConnectorCommit, ConnectorEditError>;
    fn cancel_connector_edit(&mut self) -> bool;
    fn reset(&mut self);
    fn state(&self) -> ConnectorEditState;
    fn snapshot(&self) -> ConnectorEditSnapshot;
}

/// Singleton authoring state for one canvas.
#[derive(Debug)]
pub struct ConnectorEditor {
    mode: Option<ConnectorEditMode>,
    selected_connector_id: Option<String>,
    source_board_id: Option<String>,
    target_board_id: Option<String>,
    temp_beads: Vec<ConnectorBead>,
    color: String,
    stroke_width: f64,
}

impl ConnectorEditor {
    pub fn new() -> Self {
        Self::with_style(DEFAULT_CONNECTOR_COLOR, DEFAULT_STROKE_WIDTH)
    }

    /// Editor whose new connectors get the given stroke.
    pub fn with_style(color: &str, stroke_width: f64) -> Self {
        Self {
            mode: None,
            selected_connector_id: None,
            source_board_id: None,
            target_board_id: None,
            temp_beads: Vec::new(),
            color: color.to_string(),
            stroke_width,
        }
    }

    pub fn set_style(&mut self, color: &str, stroke_width: f64) {
        self.color = color.to_string();
        self.stroke_width = stroke_width;
    }

    pub fn mode(&self) -> Option<ConnectorEditMode> {
        self.mode
    }

    pub fn selected_connector_id(&self) -> Option<&str> {
        self.selected_connector_id.as_deref()
    }

    pub fn source_board_id(&self) -> Option<&str> {
        self.source_board_id.as_deref()
    }

    pub fn target_board_id(&self) -> Option<&str> {
        self.target_board_id.as_deref()
    }

    pub fn temp_beads(&self) -> &[ConnectorBead] {
        &self.temp_beads
    }

    pub fn has_bead(&self, bead_id: &str) -> bool {
        self.temp_beads.iter().any(|b| b.id == bead_id)
    }

    /// Whether working-copy beads may be added, moved or removed right now.
    pub fn beads_editable(&self) -> bool {
        matches!(
            self.state(),
            ConnectorEditState::Ready | ConnectorEditState::Editing
        )
    }

    fn invalid(&self, action: &'static str) -> ConnectorEditError {
        let state = self.state();
        tracing::warn!(action, ?state, "Connector edit action rejected");
        ConnectorEditError::InvalidState {
            action,
            state: format!("{:?}", state),
        }
    }

    fn require_beads_editable(&self, action: &'static str) -> Result<(), ConnectorEditError> {
        if self.beads_editable() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    /// Beads in traversal order, renumbered `0..n`.
    fn normalized_beads(&self) -> Vec<ConnectorBead> {
        let mut beads = self.temp_beads.clone();
        beads.sort_by_key(|b| b.order);
        for (i, bead) in beads.iter_mut().enumerate() {
            bead.order = i as i64;
        }
        beads
    }
}

impl Default for ConnectorEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorEditorTrait for ConnectorEditor {
    /// Enters `Create` (→ `SourcePending`) or `Edit` (→ `Editing`) mode.
    ///
    /// Edit mode needs the connector being edited; its beads become the
    /// working copy.
    fn start_connector_edit(
        &mut self,
        mode: ConnectorEditMode,
        connector: Option<&ConnectorString>,
    ) -> Result<(), ConnectorEditError> {
        if self.mode.is_some() {
            return Err(ConnectorEditError::AlreadyActive);
        }
        match mode {
            ConnectorEditMode::Create => {
                self.reset();
            }
            ConnectorEditMode::Edit => {
                let connector = connector.ok_or(ConnectorEditError::MissingConnectorId)?;
                self.selected_connector_id = Some(connector.id.clone());
                self.source_board_id = Some(connector.from_board_id.clone());
                self.target_board_id = Some(connector.to_board_id.clone());
                self.temp_beads = connector.beads.clone();
            }
        }
        self.mode = Some(mode);
        tracing::debug!(?mode, state = ?self.state(), "Connector edit started");
        Ok(())
    }

    /// Sets the source board. Re-selecting a source clears the target and
    /// discards the temp beads placed for the previous pair.
    fn select_source_board(&mut self, board_id: &str) -> Result<(), ConnectorEditError> {
        match self.state() {
            ConnectorEditState::SourcePending
            | ConnectorEditState::TargetPending
            | ConnectorEditState::Ready => {
                self.source_board_id = Some(board_id.to_string());
                self.target_board_id = None;
                self.temp_beads.clear();
                tracing::debug!(board_id, "Connector source selected");
                Ok(())
            }
            _ => Err(self.invalid("select source board")),
        }
    }

    /// Sets the target board. Returns `Ok(false)` and changes nothing when
    /// `board_id` is the current source.
    fn select_target_board(&mut self, board_id: &str) -> Result<bool, ConnectorEditError> {
        match self.state() {
            ConnectorEditState::TargetPending | ConnectorEditState::Ready => {
                if self.source_board_id.as_deref() == Some(board_id) {
                    tracing::debug!(board_id, "Ignoring target equal to source");
                    return Ok(false);
                }
                self.target_board_id = Some(board_id.to_string());
                tracing::debug!(board_id, "Connector target selected");
                Ok(true)
            }
            _ => Err(self.invalid("select target board")),
        }
    }

    /// Appends a waypoint after the current last bead.
    fn add_temp_bead(&mut self, position: Position) -> Result<ConnectorBead, ConnectorEditError> {
        self.require_beads_editable("add bead")?;
        let order = self
            .temp_beads
            .iter()
            .map(|b| b.order)
            .max()
            .map_or(0, |max| max + 1);
        let bead = ConnectorBead {
            id: Uuid::new_v4().to_string(),
            x: position.x,
            y: position.y,
            order,
        };
        self.temp_beads.push(bead.clone());
        Ok(bead)
    }

    fn move_bead(&mut self, bead_id: &str, position: Position) -> Result<(), ConnectorEditError> {
        self.require_beads_editable("move bead")?;
        let bead = self
            .temp_beads
            .iter_mut()
            .find(|b| b.id == bead_id)
            .ok_or_else(|| ConnectorEditError::BeadNotFound(bead_id.to_string()))?;
        bead.x = position.x;
        bead.y = position.y;
        Ok(())
    }

    fn remove_bead(&mut self, bead_id: &str) -> Result<(), ConnectorEditError> {
        self.require_beads_editable("remove bead")?;
        let before = self.temp_beads.len();
        self.temp_beads.retain(|b| b.id != bead_id);
        if self.temp_beads.len() == before {
            return Err(ConnectorEditError::BeadNotFound(bead_id.to_string()));
        }
        Ok(())
    }

    /// What finishing now would persist. Does not change state.
    fn pending_commit(&self) -> Result<ConnectorCommit, ConnectorEditError> {
        match (self.state(), &self.source_board_id, &self.target_board_id) {
            (ConnectorEditState::Ready, Some(from), Some(to)) => {
                let mut draft = ConnectorDraft::new(from.clone(), to.clone())
                    .with_beads(self.normalized_beads());
                draft.color = self.color.clone();
                draft.stroke_width = self.stroke_width;
                Ok(ConnectorCommit::Create(draft))
            }
            (ConnectorEditState::Editing, _, _) => match &self.selected_connector_id {
                Some(id) => Ok(ConnectorCommit::UpdateBeads {
                    connector_id: id.clone(),
                    beads: self.normalized_beads(),
                }),
                None => Err(ConnectorEditError::MissingConnectorId),
            },
            _ => Err(self.invalid("finish")),
        }
    }

    /// Discards the session. Returns whether anything was active.
    fn cancel_connector_edit(&mut self) -> bool {
        let was_active = self.mode.is_some();
        if was_active {
            tracing::debug!(state = ?self.state(), beads = self.temp_beads.len(), "Connector edit cancelled");
        }
        self.reset();
        was_active
    }

    /// Back to `Inactive` with every transient field cleared.
    fn reset(&mut self) {
        self.mode = None;
        self.selected_connector_id = None;
        self.source_board_id = None;
        self.target_board_id = None;
        self.temp_beads.clear();
    }

    fn state(&self) -> ConnectorEditState {
        match self.mode {
            None => ConnectorEditState::Inactive,
            Some(ConnectorEditMode::Edit) => ConnectorEditState::Editing,
            Some(ConnectorEditMode::Create) => {
                match (&self.source_board_id, &self.target_board_id) {
                    (None, _) => ConnectorEditState::SourcePending,
                    (Some(_), None) => ConnectorEditState::TargetPending,
                    (Some(_), Some(_)) => ConnectorEditState::Ready,
                }
            }
        }
    }

    fn snapshot(&self) -> ConnectorEditSnapshot {
        ConnectorEditSnapshot {
            state: self.state(),
            mode: self.mode,
            selected_connector_id: self.selected_connector_id.clone(),
            source_board_id: self.source_board_id.clone(),
            target_board_id: self.target_board_id.clone(),
            temp_beads: self.temp_beads.clone(),
        }
    }
}
