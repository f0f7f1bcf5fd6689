//! Unit tests for the connector-authoring state machine.

use rstest::rstest;
use stringboard::managers::connector_editor::{ConnectorEditor, ConnectorEditorTrait};
use stringboard::types::board::Position;
use stringboard::types::connector::{ConnectorBead, ConnectorString};
use stringboard::types::connector_edit::{ConnectorCommit, ConnectorEditMode, ConnectorEditState};
use stringboard::types::errors::ConnectorEditError;

fn existing_connector() -> ConnectorString {
    ConnectorString {
        id: "c1".to_string(),
        from_board_id: "a".to_string(),
        to_board_id: "b".to_string(),
        beads: vec![
            ConnectorBead { id: "k0".to_string(), x: 100.0, y: 0.0, order: 0 },
            ConnectorBead { id: "k1".to_string(), x: 200.0, y: 0.0, order: 1 },
        ],
        color: "#e11d48".to_string(),
        stroke_width: 2.0,
        created_at: 0,
        updated_at: 0,
    }
}

/// Helper: editor in `Ready` with source `a` and target `b`.
fn ready_editor() -> ConnectorEditor {
    let mut editor = ConnectorEditor::new();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    editor.select_source_board("a").unwrap();
    assert!(editor.select_target_board("b").unwrap());
    editor
}

#[test]
fn test_create_flow_states() {
    let mut editor = ConnectorEditor::new();
    assert_eq!(editor.state(), ConnectorEditState::Inactive);

    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    assert_eq!(editor.state(), ConnectorEditState::SourcePending);

    editor.select_source_board("a").unwrap();
    assert_eq!(editor.state(), ConnectorEditState::TargetPending);

    editor.select_target_board("b").unwrap();
    assert_eq!(editor.state(), ConnectorEditState::Ready);
}

#[test]
fn test_target_equal_to_source_is_ignored() {
    let mut editor = ConnectorEditor::new();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    editor.select_source_board("a").unwrap();

    assert_eq!(editor.select_target_board("a"), Ok(false));
    assert_eq!(editor.target_board_id(), None);
    assert_eq!(editor.state(), ConnectorEditState::TargetPending);
}

#[test]
fn test_reselecting_source_resets_target() {
    let mut editor = ready_editor();
    editor.select_source_board("c").unwrap();
    assert_eq!(editor.source_board_id(), Some("c"));
    assert_eq!(editor.target_board_id(), None);
    assert_eq!(editor.state(), ConnectorEditState::TargetPending);
}

#[test]
fn test_reselecting_source_discards_temp_beads() {
    let mut editor = ready_editor();
    let bead = editor.add_temp_bead(Position::new(10.0, 10.0)).unwrap();
    editor.select_source_board("a").unwrap();
    assert!(editor.temp_beads().is_empty());
    assert!(!editor.has_bead(&bead.id));
    assert!(!editor.beads_editable());

    editor.select_target_board("b").unwrap();
    assert!(editor.beads_editable());
    let next = editor.add_temp_bead(Position::new(20.0, 20.0)).unwrap();
    assert_eq!(next.order, 0);
}

#[test]
fn test_start_twice_rejected() {
    let mut editor = ConnectorEditor::new();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    assert_eq!(
        editor.start_connector_edit(ConnectorEditMode::Create, None),
        Err(ConnectorEditError::AlreadyActive)
    );
}

#[test]
fn test_edit_requires_connector() {
    let mut editor = ConnectorEditor::new();
    assert_eq!(
        editor.start_connector_edit(ConnectorEditMode::Edit, None),
        Err(ConnectorEditError::MissingConnectorId)
    );
    assert_eq!(editor.state(), ConnectorEditState::Inactive);
}

#[rstest]
#[case::inactive(None)]
#[case::source_pending(Some(0))]
#[case::target_pending(Some(1))]
fn test_beads_only_when_ready_or_editing(#[case] steps: Option<usize>) {
    let mut editor = ConnectorEditor::new();
    if let Some(steps) = steps {
        editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
        if steps >= 1 {
            editor.select_source_board("a").unwrap();
        }
    }
    let err = editor.add_temp_bead(Position::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, ConnectorEditError::InvalidState { action: "add bead", .. }));
    assert!(editor.temp_beads().is_empty());
}

#[test]
fn test_target_before_source_rejected() {
    let mut editor = ConnectorEditor::new();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    assert!(matches!(
        editor.select_target_board("b"),
        Err(ConnectorEditError::InvalidState { .. })
    ));
}

#[test]
fn test_temp_beads_get_increasing_order() {
    let mut editor = ready_editor();
    let first = editor.add_temp_bead(Position::new(10.0, 10.0)).unwrap();
    let second = editor.add_temp_bead(Position::new(20.0, 20.0)).unwrap();
    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_ne!(first.id, second.id);
}

#[test]
fn test_ready_commit_is_create_draft() {
    let mut editor = ready_editor();
    editor.set_style("#22c55e", 3.5);
    editor.add_temp_bead(Position::new(10.0, 10.0)).unwrap();

    match editor.pending_commit().unwrap() {
        ConnectorCommit::Create(draft) => {
            assert_eq!(draft.from_board_id, "a");
            assert_eq!(draft.to_board_id, "b");
            assert_eq!(draft.beads.len(), 1);
            assert_eq!(draft.color, "#22c55e");
            assert_eq!(draft.stroke_width, 3.5);
        }
        other => panic!("expected a create commit, got {:?}", other),
    }
    // Peeking does not change state.
    assert_eq!(editor.state(), ConnectorEditState::Ready);
}

#[test]
fn test_commit_not_available_before_ready() {
    let mut editor = ConnectorEditor::new();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    editor.select_source_board("a").unwrap();
    assert!(matches!(
        editor.pending_commit(),
        Err(ConnectorEditError::InvalidState { action: "finish", .. })
    ));
}

#[test]
fn test_edit_mode_works_on_copy_of_beads() {
    let connector = existing_connector();
    let mut editor = ConnectorEditor::new();
    editor
        .start_connector_edit(ConnectorEditMode::Edit, Some(&connector))
        .unwrap();
    assert_eq!(editor.state(), ConnectorEditState::Editing);
    assert_eq!(editor.selected_connector_id(), Some("c1"));
    assert_eq!(editor.temp_beads(), connector.beads.as_slice());

    editor.move_bead("k0", Position::new(150.0, 50.0)).unwrap();
    editor.remove_bead("k1").unwrap();
    let added = editor.add_temp_bead(Position::new(300.0, 0.0)).unwrap();
    assert_eq!(added.order, 1);

    match editor.pending_commit().unwrap() {
        ConnectorCommit::UpdateBeads { connector_id, beads } => {
            assert_eq!(connector_id, "c1");
            assert_eq!(beads.len(), 2);
            assert_eq!(beads[0].id, "k0");
            assert_eq!(beads[0].position(), Position::new(150.0, 50.0));
            assert_eq!(beads[1].id, added.id);
        }
        other => panic!("expected a bead update, got {:?}", other),
    }
    assert_eq!(connector.beads[0].x, 100.0);
}

#[test]
fn test_commit_renumbers_bead_order() {
    let mut connector = existing_connector();
    connector.beads[0].order = 7;
    connector.beads[1].order = 3;
    let mut editor = ConnectorEditor::new();
    editor
        .start_connector_edit(ConnectorEditMode::Edit, Some(&connector))
        .unwrap();

    let ConnectorCommit::UpdateBeads { beads, .. } = editor.pending_commit().unwrap() else {
        panic!("expected a bead update");
    };
    let ids: Vec<(&str, i64)> = beads.iter().map(|b| (b.id.as_str(), b.order)).collect();
    assert_eq!(ids, vec![("k1", 0), ("k0", 1)]);
}

#[test]
fn test_source_selection_illegal_while_editing() {
    let connector = existing_connector();
    let mut editor = ConnectorEditor::new();
    editor
        .start_connector_edit(ConnectorEditMode::Edit, Some(&connector))
        .unwrap();
    assert!(editor.select_source_board("z").is_err());
    assert_eq!(editor.source_board_id(), Some("a"));
}

#[test]
fn test_unknown_bead_errors() {
    let mut editor = ready_editor();
    assert_eq!(
        editor.move_bead("missing", Position::default()),
        Err(ConnectorEditError::BeadNotFound("missing".to_string()))
    );
    assert_eq!(
        editor.remove_bead("missing"),
        Err(ConnectorEditError::BeadNotFound("missing".to_string()))
    );
}

#[test]
fn test_cancel_discards_everything() {
    let mut editor = ready_editor();
    editor.add_temp_bead(Position::new(5.0, 5.0)).unwrap();

    assert!(editor.cancel_connector_edit());
    let snapshot = editor.snapshot();
    assert_eq!(snapshot.state, ConnectorEditState::Inactive);
    assert_eq!(snapshot.mode, None);
    assert_eq!(snapshot.source_board_id, None);
    assert_eq!(snapshot.target_board_id, None);
    assert!(snapshot.temp_beads.is_empty());

    assert!(!editor.cancel_connector_edit());
}

#[test]
fn test_restart_after_reset() {
    let mut editor = ready_editor();
    editor.reset();
    editor.start_connector_edit(ConnectorEditMode::Create, None).unwrap();
    assert_eq!(editor.state(), ConnectorEditState::SourcePending);
}
