//! App Core for Stringboard.
//!
//! The editor session: owns the timeline controller, the drag session, the
//! connector editor and the settings, and turns finished gestures into
//! timeline mutations.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::managers::connector_editor::{ConnectorEditor, ConnectorEditorTrait};
use crate::managers::drag_manager::{DragManager, DragManagerTrait};
use crate::managers::timeline_manager::TimelineManager;
use crate::platform;
use crate::services::layout_engine;
use crate::services::memory_store::InMemoryTimelineService;
use crate::services::path_router;
#[cfg(feature = "remote")]
use crate::services::remote_store::RemoteTimelineService;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::sqlite_store::SqliteTimelineService;
use crate::services::timeline_service::TimelineService;
use crate::types::board::{Board, BoardPatch, Position, PositionUpdate};
use crate::types::connector::{ConnectorPatch, ConnectorString};
use crate::types::connector_edit::{ConnectorCommit, ConnectorEditMode};
use crate::types::drag::{BookmarkDrop, DragKind, DragSession};
use crate::types::errors::{ConnectorEditError, DragError, EditorError, TimelineError};
use crate::types::path::{ConnectorPath, PathDescription};
use crate::types::settings::{EditorSettings, StorageBackend, StorageSettings};

/// Central editor session holding all controllers.
pub struct App {
    pub timeline: TimelineManager,
    pub drag: DragManager,
    pub connector_editor: ConnectorEditor,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Creates a session over `service`. Call [`startup`](Self::startup) to
    /// load the persisted timeline.
    pub fn new(service: Arc<dyn TimelineService>, settings_engine: SettingsEngine) -> Self {
        let connectors = &settings_engine.get_settings().connectors;
        let connector_editor = ConnectorEditor::with_style(&connectors.color, connectors.stroke_width);
        Self {
            timeline: TimelineManager::new(service),
            drag: DragManager::new(),
            connector_editor,
            settings_engine,
        }
    }

    /// Creates a session whose storage backend is chosen by the settings.
    pub fn from_settings(settings_engine: SettingsEngine) -> Result<Self, EditorError> {
        let service = open_service(&settings_engine.get_settings().storage)?;
        Ok(Self::new(service, settings_engine))
    }

    /// Loads the committed timeline from the service.
    pub async fn startup(&mut self) -> Result<(), EditorError> {
        self.timeline.load().await?;
        Ok(())
    }

    pub fn settings(&self) -> &EditorSettings {
        self.settings_engine.get_settings()
    }

    /// Updates one setting and refreshes whatever the session derives from it.
    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<(), EditorError> {
        self.settings_engine.set_value(key, value)?;
        let connectors = &self.settings_engine.get_settings().connectors;
        self.connector_editor
            .set_style(&connectors.color, connectors.stroke_width);
        Ok(())
    }

    fn place(&self, position: Position) -> Position {
        let grid = &self.settings().grid;
        if grid.snap_on_drop {
            layout_engine::snap_to_grid(position, grid.size)
        } else {
            position
        }
    }

    // ─── Boards ───

    /// Where [`add_board`](Self::add_board) puts the next board: the origin on
    /// an empty canvas, otherwise one column right of the right-most board.
    pub fn next_board_position(&self) -> Position {
        let rightmost = self
            .timeline
            .data()
            .boards
            .iter()
            .max_by(|a, b| a.position.x.total_cmp(&b.position.x));
        match rightmost {
            Some(board) => self.place(Position::new(
                board.position.x + layout_engine::DISTRIBUTE_SPACING,
                board.position.y,
            )),
            None => Position::default(),
        }
    }

    pub async fn add_board(&mut self, title: &str) -> Result<Board, EditorError> {
        let position = self.next_board_position();
        Ok(self.timeline.create_board(title, position).await?)
    }

    // ─── Drag ───

    /// Begins a drag of an item that exists in the committed data or, for
    /// beads, in the connector editor's working copy.
    pub fn start_drag(
        &mut self,
        kind: DragKind,
        item_id: &str,
        start: Position,
    ) -> Result<(), EditorError> {
        match kind {
            DragKind::Board if self.timeline.get_board_by_id(item_id).is_none() => {
                return Err(TimelineError::BoardNotFound(item_id.to_string()).into());
            }
            DragKind::Bookmark if self.timeline.get_bookmark_by_id(item_id).is_none() => {
                return Err(TimelineError::BookmarkNotFound(item_id.to_string()).into());
            }
            DragKind::Bead if self.connector_editor.has_bead(item_id) => {
                if !self.connector_editor.beads_editable() {
                    return Err(ConnectorEditError::InvalidState {
                        action: "drag bead",
                        state: format!("{:?}", self.connector_editor.state()),
                    }
                    .into());
                }
            }
            DragKind::Bead if self.timeline.find_connector_by_bead(item_id).is_none() => {
                return Err(ConnectorEditError::BeadNotFound(item_id.to_string()).into());
            }
            _ => {}
        }
        Ok(self.drag.start_drag(kind, item_id, start)?)
    }

    pub fn update_drag(&mut self, position: Position) -> Result<(), EditorError> {
        Ok(self.drag.update_drag(position)?)
    }

    /// Ends the drag and commits the move. The session is over even when
    /// the commit fails; the committed data then keeps the old position.
    pub async fn end_drag(
        &mut self,
        drop: Option<BookmarkDrop>,
    ) -> Result<DragSession, EditorError> {
        let session = self.drag.end_drag().ok_or(DragError::NotDragging)?;
        let offset = session.offset();

        match session.kind {
            DragKind::Board => {
                let board = self
                    .timeline
                    .get_board_by_id(&session.item_id)
                    .ok_or_else(|| TimelineError::BoardNotFound(session.item_id.clone()))?;
                let target = self.place(board.position.translate(offset));
                if target != board.position {
                    self.timeline
                        .update_board(&session.item_id, &BoardPatch::position(target))
                        .await?;
                }
            }
            DragKind::Bead => self.commit_bead_move(&session.item_id, offset).await?,
            DragKind::Bookmark => {
                if let Some(drop) = drop {
                    self.timeline
                        .move_bookmark(&session.item_id, &drop.board_id, drop.order)
                        .await?;
                }
            }
        }
        Ok(session)
    }

    async fn commit_bead_move(&mut self, bead_id: &str, offset: Position) -> Result<(), EditorError> {
        let working_copy = self
            .connector_editor
            .temp_beads()
            .iter()
            .find(|b| b.id == bead_id)
            .map(|b| b.position().translate(offset));
        if let Some(target) = working_copy {
            self.connector_editor.move_bead(bead_id, target)?;
            return Ok(());
        }

        let connector = self
            .timeline
            .find_connector_by_bead(bead_id)
            .ok_or_else(|| ConnectorEditError::BeadNotFound(bead_id.to_string()))?;
        let connector_id = connector.id.clone();
        let mut beads = connector.beads.clone();
        for bead in beads.iter_mut().filter(|b| b.id == bead_id) {
            let target = bead.position().translate(offset);
            bead.x = target.x;
            bead.y = target.y;
        }
        self.timeline
            .update_connector(&connector_id, &ConnectorPatch::beads(beads))
            .await?;
        Ok(())
    }

    // ─── Connector authoring ───

    pub fn start_connector_edit(
        &mut self,
        mode: ConnectorEditMode,
        connector_id: Option<&str>,
    ) -> Result<(), EditorError> {
        let connector = match (mode, connector_id) {
            (ConnectorEditMode::Edit, Some(id)) => Some(
                self.timeline
                    .get_connector_by_id(id)
                    .ok_or_else(|| TimelineError::ConnectorNotFound(id.to_string()))?,
            ),
            _ => None,
        };
        Ok(self.connector_editor.start_connector_edit(mode, connector)?)
    }

    /// Persists the authoring session. On failure the editor keeps its
    /// state so the user can retry or cancel.
    pub async fn finish_connector_edit(&mut self) -> Result<ConnectorString, EditorError> {
        let connector = match self.connector_editor.pending_commit()? {
            ConnectorCommit::Create(draft) => self.timeline.create_connector(&draft).await?,
            ConnectorCommit::UpdateBeads {
                connector_id,
                beads,
            } => {
                self.timeline
                    .update_connector(&connector_id, &ConnectorPatch::beads(beads))
                    .await?
            }
        };
        self.connector_editor.reset();
        Ok(connector)
    }

    /// Picks the connector's source. The board must exist in the committed data.
    pub fn select_source_board(&mut self, board_id: &str) -> Result<(), EditorError> {
        self.require_board(board_id)?;
        Ok(self.connector_editor.select_source_board(board_id)?)
    }

    /// Picks the connector's target. Returns `Ok(false)` when `board_id` is
    /// the source; an unknown board is an error.
    pub fn select_target_board(&mut self, board_id: &str) -> Result<bool, EditorError> {
        self.require_board(board_id)?;
        Ok(self.connector_editor.select_target_board(board_id)?)
    }

    fn require_board(&self, board_id: &str) -> Result<(), EditorError> {
        match self.timeline.get_board_by_id(board_id) {
            Some(_) => Ok(()),
            None => {
                tracing::warn!(board_id, "Connector endpoint is not a known board");
                Err(TimelineError::BoardNotFound(board_id.to_string()).into())
            }
        }
    }

    pub fn cancel_connector_edit(&mut self) -> bool {
        self.connector_editor.cancel_connector_edit()
    }

    // ─── Layout ───

    /// Boards for `ids`, in the given order.
    fn selection(&self, ids: &[String]) -> Result<Vec<Board>, EditorError> {
        ids.iter()
            .map(|id| {
                self.timeline
                    .get_board_by_id(id)
                    .cloned()
                    .ok_or_else(|| EditorError::from(TimelineError::BoardNotFound(id.clone())))
            })
            .collect()
    }

    /// Applies updates one at a time. Stops at the first failure; updates
    /// applied before it stay committed.
    pub async fn apply_position_updates(
        &mut self,
        updates: Vec<PositionUpdate>,
    ) -> Result<Vec<Board>, EditorError> {
        let mut moved = Vec::with_capacity(updates.len());
        for update in updates {
            let board = self
                .timeline
                .update_board(&update.board_id, &BoardPatch::position(update.position))
                .await?;
            moved.push(board);
        }
        tracing::info!(boards = moved.len(), "Applied layout updates");
        Ok(moved)
    }

    pub async fn align_horizontally(&mut self, ids: &[String]) -> Result<Vec<Board>, EditorError> {
        let updates = layout_engine::align_horizontally(&self.selection(ids)?);
        self.apply_position_updates(updates).await
    }

    pub async fn align_vertically(&mut self, ids: &[String]) -> Result<Vec<Board>, EditorError> {
        let updates = layout_engine::align_vertically(&self.selection(ids)?);
        self.apply_position_updates(updates).await
    }

    pub async fn distribute_horizontally(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Board>, EditorError> {
        let updates = layout_engine::distribute_horizontally(&self.selection(ids)?);
        self.apply_position_updates(updates).await
    }

    pub async fn distribute_vertically(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Board>, EditorError> {
        let updates = layout_engine::distribute_vertically(&self.selection(ids)?);
        self.apply_position_updates(updates).await
    }

    // ─── Rendering ───

    /// Committed board positions with the live board drag offset applied.
    pub fn live_board_positions(&self) -> HashMap<String, Position> {
        let mut positions = self.timeline.board_positions();
        if let Some(session) = self.drag.session().filter(|s| s.kind == DragKind::Board) {
            if let Some(position) = positions.get_mut(&session.item_id) {
                *position = position.translate(session.offset());
            }
        }
        positions
    }

    /// Paths for every committed connector, following a live board or bead drag.
    pub fn connector_paths(&self) -> Vec<ConnectorPath> {
        let positions = self.live_board_positions();
        let dragged_bead = self
            .drag
            .session()
            .filter(|s| s.kind == DragKind::Bead)
            .map(|s| (s.item_id.as_str(), s.offset()));

        self.timeline
            .data()
            .connectors
            .iter()
            .map(|connector| {
                let path = match dragged_bead {
                    Some((bead_id, offset)) if connector.beads.iter().any(|b| b.id == bead_id) => {
                        let mut live = connector.clone();
                        for bead in live.beads.iter_mut().filter(|b| b.id == bead_id) {
                            bead.x += offset.x;
                            bead.y += offset.y;
                        }
                        path_router::generate_path(&live, &positions)
                    }
                    _ => path_router::generate_path(connector, &positions),
                };
                ConnectorPath {
                    connector_id: connector.id.clone(),
                    color: connector.color.clone(),
                    stroke_width: connector.stroke_width,
                    svg: path.to_svg_path(),
                    path,
                }
            })
            .collect()
    }

    /// Stroke of the connector being authored, once both endpoints are known.
    pub fn preview_path(&self) -> Option<PathDescription> {
        let positions = self.live_board_positions();
        let from = positions.get(self.connector_editor.source_board_id()?)?;
        let to = positions.get(self.connector_editor.target_board_id()?)?;
        Some(path_router::preview_path(
            *from,
            *to,
            self.connector_editor.temp_beads(),
        ))
    }
}

/// Builds the data-access service named by `storage`.
pub fn open_service(storage: &StorageSettings) -> Result<Arc<dyn TimelineService>, EditorError> {
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryTimelineService::new())),
        StorageBackend::Sqlite => {
            let path = storage
                .database_path
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(platform::default_database_path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    EditorError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            tracing::info!(path = %path.display(), "Opening SQLite timeline store");
            let service = SqliteTimelineService::open(&path)
                .map_err(|e| EditorError::Storage(e.to_string()))?;
            Ok(Arc::new(service))
        }
        StorageBackend::Remote => open_remote(storage.remote_url.as_deref()),
    }
}

#[cfg(feature = "remote")]
fn open_remote(url: Option<&str>) -> Result<Arc<dyn TimelineService>, EditorError> {
    let url = url.ok_or_else(|| EditorError::Storage("storage.remote_url is not set".to_string()))?;
    tracing::info!(url, "Using remote timeline store");
    let service = RemoteTimelineService::new(url).map_err(|e| EditorError::Storage(e.to_string()))?;
    Ok(Arc::new(service))
}

#[cfg(not(feature = "remote"))]
fn open_remote(_url: Option<&str>) -> Result<Arc<dyn TimelineService>, EditorError> {
    Err(EditorError::Storage(
        "remote storage requires the `remote` feature".to_string(),
    ))
}
