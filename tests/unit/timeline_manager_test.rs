//! Unit tests for the TimelineManager public API.
//!
//! These tests drive the controller against the in-memory store, whose call
//! counter and failure switch show exactly when the service was reached.

use std::sync::Arc;

use rstest::rstest;

use stringboard::managers::timeline_manager::TimelineManager;
use stringboard::services::memory_store::InMemoryTimelineService;
use stringboard::types::board::{BoardPatch, Position};
use stringboard::types::bookmark::BookmarkPatch;
use stringboard::types::connector::{ConnectorBead, ConnectorDraft, ConnectorPatch};
use stringboard::types::errors::{ServiceError, TimelineError};

/// Helper: a manager plus a handle on its store.
fn setup() -> (TimelineManager, Arc<InMemoryTimelineService>) {
    let service = Arc::new(InMemoryTimelineService::new());
    let manager = TimelineManager::new(service.clone());
    (manager, service)
}

/// Helper: two boards A and B joined by one connector, with a bookmark on each.
async fn seeded() -> (TimelineManager, Arc<InMemoryTimelineService>, String, String) {
    let (mut mgr, service) = setup();
    let a = mgr.create_board("A", Position::new(0.0, 0.0)).await.unwrap().id;
    let b = mgr.create_board("B", Position::new(500.0, 100.0)).await.unwrap().id;
    mgr.create_bookmark(&a, "On A", Some("https://a.example")).await.unwrap();
    mgr.create_bookmark(&b, "On B", None).await.unwrap();
    mgr.create_connector(&ConnectorDraft::new(a.clone(), b.clone())).await.unwrap();
    (mgr, service, a, b)
}

// ─── Boards ───

#[tokio::test]
async fn test_create_board_appends_after_confirmation() {
    let (mut mgr, service) = setup();
    let board = mgr.create_board("Ideas", Position::new(40.0, 60.0)).await.unwrap();

    assert_eq!(mgr.data().boards.len(), 1);
    assert_eq!(mgr.get_board_by_id(&board.id), Some(&board));
    assert_eq!(service.snapshot().boards, vec![board]);
    assert!(mgr.last_error().is_none());
}

#[tokio::test]
async fn test_update_board_replaces_local_copy() {
    let (mut mgr, _service, a, _b) = seeded().await;
    let updated = mgr
        .update_board(&a, &BoardPatch::position(Position::new(80.0, 20.0)))
        .await
        .unwrap();
    assert_eq!(updated.position, Position::new(80.0, 20.0));
    assert_eq!(mgr.get_board_by_id(&a).unwrap().position, Position::new(80.0, 20.0));
    assert_eq!(mgr.get_board_by_id(&a).unwrap().title, "A");
}

#[tokio::test]
async fn test_update_unknown_board_never_reaches_service() {
    let (mut mgr, service) = setup();
    let err = mgr
        .update_board("ghost", &BoardPatch::title("Nope"))
        .await
        .unwrap_err();
    assert_eq!(err, TimelineError::BoardNotFound("ghost".to_string()));
    assert_eq!(service.call_count(), 0);
    assert_eq!(mgr.last_error(), Some(&err));
}

#[tokio::test]
async fn test_delete_board_cascades() {
    let (mut mgr, service, a, b) = seeded().await;
    mgr.delete_board(&a).await.unwrap();

    let data = mgr.data();
    assert!(mgr.get_board_by_id(&a).is_none());
    assert!(data.bookmarks.iter().all(|e| e.board_id != a));
    assert!(data.connectors.is_empty());
    assert_eq!(mgr.get_bookmarks_by_board(&b).len(), 1);
    assert!(data.is_referentially_intact());
    assert_eq!(service.snapshot(), *data);
}

// ─── No partial apply ───

#[tokio::test]
async fn test_failed_delete_leaves_data_untouched() {
    let (mut mgr, service, a, _b) = seeded().await;
    let before = mgr.data().clone();
    service.set_failing(true);

    let err = mgr.delete_board(&a).await.unwrap_err();
    assert!(matches!(err, TimelineError::Service(ServiceError::Unavailable(_))));
    assert_eq!(*mgr.data(), before);
    assert_eq!(mgr.last_error(), Some(&err));
}

/// Mutations on existing entries and connectors that can fail at the store.
#[derive(Debug, Clone, Copy)]
enum Mutation {
    UpdateBookmark,
    DeleteBookmark,
    MoveBookmark,
    UpdateConnector,
    DeleteConnector,
}

#[rstest]
#[case::update_bookmark(Mutation::UpdateBookmark)]
#[case::delete_bookmark(Mutation::DeleteBookmark)]
#[case::move_bookmark(Mutation::MoveBookmark)]
#[case::update_connector(Mutation::UpdateConnector)]
#[case::delete_connector(Mutation::DeleteConnector)]
#[tokio::test]
async fn test_failed_mutation_leaves_data_untouched(#[case] mutation: Mutation) {
    let (mut mgr, service, a, b) = seeded().await;
    let entry_id = mgr.get_bookmarks_by_board(&a)[0].id.clone();
    let connector_id = mgr.data().connectors[0].id.clone();
    let before = mgr.data().clone();
    service.set_failing(true);

    let result = match mutation {
        Mutation::UpdateBookmark => {
            let patch = BookmarkPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            };
            mgr.update_bookmark(&entry_id, &patch).await.map(|_| ())
        }
        Mutation::DeleteBookmark => mgr.delete_bookmark(&entry_id).await,
        Mutation::MoveBookmark => mgr.move_bookmark(&entry_id, &b, 3).await.map(|_| ()),
        Mutation::UpdateConnector => {
            let beads = vec![ConnectorBead { id: "k".to_string(), x: 1.0, y: 2.0, order: 0 }];
            mgr.update_connector(&connector_id, &ConnectorPatch::beads(beads))
                .await
                .map(|_| ())
        }
        Mutation::DeleteConnector => mgr.delete_connector(&connector_id).await,
    };

    let err = result.unwrap_err();
    assert!(matches!(err, TimelineError::Service(ServiceError::Unavailable(_))));
    assert_eq!(*mgr.data(), before);
    assert_eq!(mgr.last_error(), Some(&err));
}

#[tokio::test]
async fn test_failed_create_does_not_append() {
    let (mut mgr, service) = setup();
    service.set_failing(true);
    assert!(mgr.create_board("Lost", Position::default()).await.is_err());
    assert!(mgr.data().boards.is_empty());
    assert!(mgr.last_error().is_some());
}

#[tokio::test]
async fn test_success_clears_last_error() {
    let (mut mgr, service) = setup();
    service.set_failing(true);
    let _ = mgr.create_board("Lost", Position::default()).await;
    service.set_failing(false);
    mgr.create_board("Saved", Position::default()).await.unwrap();
    assert!(mgr.last_error().is_none());
}

#[tokio::test]
async fn test_clear_error() {
    let (mut mgr, _service) = setup();
    let _ = mgr.delete_board("ghost").await;
    assert!(mgr.last_error().is_some());
    mgr.clear_error();
    assert!(mgr.last_error().is_none());
}

// ─── Bookmarks ───

#[tokio::test]
async fn test_bookmarks_listed_in_order() {
    let (mut mgr, _service) = setup();
    let a = mgr.create_board("A", Position::default()).await.unwrap().id;
    let first = mgr.create_bookmark(&a, "First", None).await.unwrap();
    let second = mgr.create_bookmark(&a, "Second", None).await.unwrap();
    assert!(first.order < second.order);

    mgr.move_bookmark(&second.id, &a, first.order - 1).await.unwrap();
    let titles: Vec<&str> = mgr
        .get_bookmarks_by_board(&a)
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_move_bookmark_between_boards() {
    let (mut mgr, _service, a, b) = seeded().await;
    let entry = mgr.get_bookmarks_by_board(&a)[0].id.clone();
    let moved = mgr.move_bookmark(&entry, &b, 5).await.unwrap();

    assert_eq!(moved.board_id, b);
    assert_eq!(moved.order, 5);
    assert!(mgr.get_bookmarks_by_board(&a).is_empty());
    assert_eq!(mgr.get_bookmarks_by_board(&b).len(), 2);
}

#[tokio::test]
async fn test_move_bookmark_to_unknown_board_rejected() {
    let (mut mgr, service, a, _b) = seeded().await;
    let entry = mgr.get_bookmarks_by_board(&a)[0].id.clone();
    let calls = service.call_count();
    let err = mgr.move_bookmark(&entry, "ghost", 0).await.unwrap_err();
    assert_eq!(err, TimelineError::BoardNotFound("ghost".to_string()));
    assert_eq!(service.call_count(), calls);
}

#[tokio::test]
async fn test_update_and_delete_bookmark() {
    let (mut mgr, _service, a, _b) = seeded().await;
    let entry = mgr.get_bookmarks_by_board(&a)[0].id.clone();
    let patch = BookmarkPatch {
        description: Some("notes".to_string()),
        ..BookmarkPatch::default()
    };
    let updated = mgr.update_bookmark(&entry, &patch).await.unwrap();
    assert_eq!(updated.description.as_deref(), Some("notes"));
    assert_eq!(updated.title, "On A");

    mgr.delete_bookmark(&entry).await.unwrap();
    assert!(mgr.get_bookmark_by_id(&entry).is_none());
    assert_eq!(
        mgr.delete_bookmark(&entry).await.unwrap_err(),
        TimelineError::BookmarkNotFound(entry)
    );
}

#[tokio::test]
async fn test_create_bookmark_on_unknown_board() {
    let (mut mgr, service) = setup();
    let err = mgr.create_bookmark("ghost", "X", None).await.unwrap_err();
    assert_eq!(err, TimelineError::BoardNotFound("ghost".to_string()));
    assert_eq!(service.call_count(), 0);
}

// ─── Connectors ───

#[tokio::test]
async fn test_self_connection_rejected_before_service() {
    let (mut mgr, service) = setup();
    let a = mgr.create_board("A", Position::default()).await.unwrap().id;
    let calls = service.call_count();

    let err = mgr
        .create_connector(&ConnectorDraft::new(a.clone(), a.clone()))
        .await
        .unwrap_err();
    assert_eq!(err, TimelineError::SelfConnection(a));
    assert_eq!(service.call_count(), calls);
    assert!(mgr.data().connectors.is_empty());
}

#[tokio::test]
async fn test_connector_with_unknown_endpoint_rejected() {
    let (mut mgr, service) = setup();
    let a = mgr.create_board("A", Position::default()).await.unwrap().id;
    let calls = service.call_count();
    let err = mgr
        .create_connector(&ConnectorDraft::new(a, "ghost"))
        .await
        .unwrap_err();
    assert_eq!(err, TimelineError::BoardNotFound("ghost".to_string()));
    assert_eq!(service.call_count(), calls);
}

#[tokio::test]
async fn test_connectors_by_board_either_endpoint() {
    let (mut mgr, _service, a, b) = seeded().await;
    let c = mgr.create_board("C", Position::new(900.0, 0.0)).await.unwrap().id;
    mgr.create_connector(&ConnectorDraft::new(c.clone(), a.clone())).await.unwrap();

    assert_eq!(mgr.get_connectors_by_board(&a).len(), 2);
    assert_eq!(mgr.get_connectors_by_board(&b).len(), 1);
    assert_eq!(mgr.get_connectors_by_board(&c).len(), 1);
}

#[tokio::test]
async fn test_update_connector_beads_and_lookup() {
    let (mut mgr, _service, a, _b) = seeded().await;
    let connector_id = mgr.get_connectors_by_board(&a)[0].id.clone();
    let beads = vec![ConnectorBead {
        id: "k1".to_string(),
        x: 250.0,
        y: 40.0,
        order: 0,
    }];
    let updated = mgr
        .update_connector(&connector_id, &ConnectorPatch::beads(beads.clone()))
        .await
        .unwrap();
    assert_eq!(updated.beads, beads);
    assert_eq!(mgr.find_connector_by_bead("k1").map(|c| c.id.as_str()), Some(connector_id.as_str()));

    mgr.delete_connector(&connector_id).await.unwrap();
    assert!(mgr.find_connector_by_bead("k1").is_none());
}

#[tokio::test]
async fn test_update_unknown_connector() {
    let (mut mgr, service) = setup();
    let err = mgr
        .update_connector("ghost", &ConnectorPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, TimelineError::ConnectorNotFound("ghost".to_string()));
    assert_eq!(service.call_count(), 0);
}

// ─── Load & positions ───

#[tokio::test]
async fn test_load_replaces_data_from_service() {
    let (_mgr, service, _a, _b) = seeded().await;
    let mut fresh = TimelineManager::new(service.clone());
    assert!(fresh.data().boards.is_empty());
    fresh.load().await.unwrap();
    assert_eq!(*fresh.data(), service.snapshot());
}

#[tokio::test]
async fn test_board_positions_map() {
    let (mgr, _service, a, b) = seeded().await;
    let positions = mgr.board_positions();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[&a], Position::new(0.0, 0.0));
    assert_eq!(positions[&b], Position::new(500.0, 100.0));
}
