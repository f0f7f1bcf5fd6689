//! RPC method handler for the Stringboard JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! editor session held by the `App` struct.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::managers::connector_editor::ConnectorEditorTrait;
use crate::managers::drag_manager::DragManagerTrait;
use crate::types::board::{BoardPatch, Position};
use crate::types::bookmark::BookmarkPatch;
use crate::types::connector::ConnectorPatch;
use crate::types::connector_edit::ConnectorEditMode;
use crate::types::drag::{BookmarkDrop, DragKind};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

/// Deserializes `params[key]`, e.g. a `{"x":..,"y":..}` position.
fn typed_param<T: DeserializeOwned>(params: &Value, key: &str) -> Result<T, String> {
    let raw = params.get(key).ok_or_else(|| format!("missing {}", key))?;
    serde_json::from_value(raw.clone()).map_err(|e| format!("invalid {}: {}", key, e))
}

fn optional_param<T: DeserializeOwned>(params: &Value, key: &str) -> Result<Option<T>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => typed_param(params, key).map(Some),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        "timeline.get" => {
            let a = app.lock().await;
            to_json(a.timeline.data())
        }

        // ─── Boards ───
        "board.create" => {
            let title = str_param(params, "title")?;
            let position: Option<Position> = optional_param(params, "position")?;
            let mut a = app.lock().await;
            let board = match position {
                Some(position) => a
                    .timeline
                    .create_board(title, position)
                    .await
                    .map_err(|e| e.to_string())?,
                None => a.add_board(title).await.map_err(|e| e.to_string())?,
            };
            to_json(&board)
        }
        "board.update" => {
            let id = str_param(params, "id")?;
            let patch = BoardPatch {
                title: optional_param(params, "title")?,
                position: optional_param(params, "position")?,
            };
            let mut a = app.lock().await;
            let board = a.timeline.update_board(id, &patch).await.map_err(|e| e.to_string())?;
            to_json(&board)
        }
        "board.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            a.timeline.delete_board(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "board.align" | "board.distribute" => {
            let ids: Vec<String> = typed_param(params, "ids")?;
            let axis = params.get("axis").and_then(|v| v.as_str()).unwrap_or("horizontal");
            let mut a = app.lock().await;
            let moved = match (method, axis) {
                ("board.align", "horizontal") => a.align_horizontally(&ids).await,
                ("board.align", "vertical") => a.align_vertically(&ids).await,
                ("board.distribute", "horizontal") => a.distribute_horizontally(&ids).await,
                ("board.distribute", "vertical") => a.distribute_vertically(&ids).await,
                _ => return Err(format!("invalid axis: {}", axis)),
            }
            .map_err(|e| e.to_string())?;
            to_json(&moved)
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let board_id = str_param(params, "board_id")?;
            let title = str_param(params, "title")?;
            let url = params.get("url").and_then(|v| v.as_str());
            let mut a = app.lock().await;
            let entry = a
                .timeline
                .create_bookmark(board_id, title, url)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&entry)
        }
        "bookmark.update" => {
            let id = str_param(params, "id")?;
            let patch = BookmarkPatch {
                title: optional_param(params, "title")?,
                url: optional_param(params, "url")?,
                description: optional_param(params, "description")?,
                icon: optional_param(params, "icon")?,
            };
            let mut a = app.lock().await;
            let entry = a.timeline.update_bookmark(id, &patch).await.map_err(|e| e.to_string())?;
            to_json(&entry)
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            a.timeline.delete_bookmark(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.move" => {
            let id = str_param(params, "id")?;
            let board_id = str_param(params, "board_id")?;
            let order = params.get("order").and_then(|v| v.as_i64()).ok_or("missing order")?;
            let mut a = app.lock().await;
            let entry = a
                .timeline
                .move_bookmark(id, board_id, order)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&entry)
        }
        "bookmark.list" => {
            let board_id = str_param(params, "board_id")?;
            let a = app.lock().await;
            to_json(&a.timeline.get_bookmarks_by_board(board_id))
        }

        // ─── Connectors ───
        "connector.update" => {
            let id = str_param(params, "id")?;
            let patch = ConnectorPatch {
                color: optional_param(params, "color")?,
                stroke_width: optional_param(params, "stroke_width")?,
                beads: optional_param(params, "beads")?,
            };
            let mut a = app.lock().await;
            let connector = a
                .timeline
                .update_connector(id, &patch)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&connector)
        }
        "connector.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            a.timeline.delete_connector(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "connector.paths" => {
            let a = app.lock().await;
            to_json(&a.connector_paths())
        }

        // ─── Drag ───
        "drag.start" => {
            let kind: DragKind = typed_param(params, "kind")?;
            let item_id = str_param(params, "item_id")?;
            let position: Position = typed_param(params, "position")?;
            let mut a = app.lock().await;
            a.start_drag(kind, item_id, position).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "drag.update" => {
            let position: Position = typed_param(params, "position")?;
            let mut a = app.lock().await;
            a.update_drag(position).map_err(|e| e.to_string())?;
            to_json(&a.drag.offset())
        }
        "drag.end" => {
            let drop: Option<BookmarkDrop> = optional_param(params, "drop")?;
            let mut a = app.lock().await;
            let session = a.end_drag(drop).await.map_err(|e| e.to_string())?;
            to_json(&session)
        }
        "drag.state" => {
            let a = app.lock().await;
            Ok(json!({
                "dragging": a.drag.is_dragging(),
                "session": to_json(&a.drag.session())?,
                "offset": to_json(&a.drag.offset())?,
            }))
        }

        // ─── Connector authoring ───
        "connect.start" => {
            let mode: ConnectorEditMode = typed_param(params, "mode")?;
            let connector_id = params.get("connector_id").and_then(|v| v.as_str());
            let mut a = app.lock().await;
            a.start_connector_edit(mode, connector_id).map_err(|e| e.to_string())?;
            to_json(&a.connector_editor.snapshot())
        }
        "connect.source" => {
            let board_id = str_param(params, "board_id")?;
            let mut a = app.lock().await;
            a.select_source_board(board_id).map_err(|e| e.to_string())?;
            to_json(&a.connector_editor.snapshot())
        }
        "connect.target" => {
            let board_id = str_param(params, "board_id")?;
            let mut a = app.lock().await;
            let accepted = a.select_target_board(board_id).map_err(|e| e.to_string())?;
            Ok(json!({"accepted": accepted, "state": to_json(&a.connector_editor.state())?}))
        }
        "connect.bead" => {
            let position: Position = typed_param(params, "position")?;
            let mut a = app.lock().await;
            let bead = a
                .connector_editor
                .add_temp_bead(position)
                .map_err(|e| e.to_string())?;
            to_json(&bead)
        }
        "connect.move_bead" => {
            let bead_id = str_param(params, "bead_id")?;
            let position: Position = typed_param(params, "position")?;
            let mut a = app.lock().await;
            a.connector_editor
                .move_bead(bead_id, position)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "connect.remove_bead" => {
            let bead_id = str_param(params, "bead_id")?;
            let mut a = app.lock().await;
            a.connector_editor
                .remove_bead(bead_id)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "connect.finish" => {
            let mut a = app.lock().await;
            let connector = a.finish_connector_edit().await.map_err(|e| e.to_string())?;
            to_json(&connector)
        }
        "connect.cancel" => {
            let mut a = app.lock().await;
            Ok(json!({"cancelled": a.cancel_connector_edit()}))
        }
        "connect.state" => {
            let a = app.lock().await;
            let preview = a.preview_path();
            Ok(json!({
                "editor": to_json(&a.connector_editor.snapshot())?,
                "preview": preview.as_ref().map(|p| p.to_svg_path()),
            }))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            to_json(a.settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
