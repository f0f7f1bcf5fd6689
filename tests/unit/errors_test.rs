use stringboard::types::errors::*;

// === ServiceError Tests ===

#[test]
fn service_error_display_variants() {
    assert_eq!(
        ServiceError::NotFound("b1".to_string()).to_string(),
        "Record not found: b1"
    );
    assert_eq!(
        ServiceError::Rejected("duplicate".to_string()).to_string(),
        "Request rejected: duplicate"
    );
    assert_eq!(
        ServiceError::DatabaseError("disk full".to_string()).to_string(),
        "Storage database error: disk full"
    );
    assert_eq!(
        ServiceError::NetworkError("timeout".to_string()).to_string(),
        "Storage network error: timeout"
    );
    assert_eq!(
        ServiceError::SerializationError("eof".to_string()).to_string(),
        "Storage serialization error: eof"
    );
    assert_eq!(
        ServiceError::Unavailable("maintenance".to_string()).to_string(),
        "Storage unavailable: maintenance"
    );
}

#[test]
fn service_error_from_no_rows_is_not_found() {
    let err: ServiceError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn service_error_from_other_sqlite_error_is_database_error() {
    let err: ServiceError = rusqlite::Error::InvalidQuery.into();
    assert!(matches!(err, ServiceError::DatabaseError(_)));
}

#[test]
fn service_error_from_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: ServiceError = json_err.into();
    assert!(matches!(err, ServiceError::SerializationError(_)));
}

// === TimelineError Tests ===

#[test]
fn timeline_error_display_variants() {
    assert_eq!(
        TimelineError::BoardNotFound("b1".to_string()).to_string(),
        "Board not found: b1"
    );
    assert_eq!(
        TimelineError::BookmarkNotFound("e1".to_string()).to_string(),
        "Bookmark not found: e1"
    );
    assert_eq!(
        TimelineError::ConnectorNotFound("c1".to_string()).to_string(),
        "Connector not found: c1"
    );
    assert_eq!(
        TimelineError::SelfConnection("b1".to_string()).to_string(),
        "Connector cannot join board b1 to itself"
    );
}

#[test]
fn timeline_error_wraps_service_error() {
    let err: TimelineError = ServiceError::Unavailable("down".to_string()).into();
    assert_eq!(err.to_string(), "Persistence failed: Storage unavailable: down");
    assert!(!err.is_validation());
}

#[test]
fn timeline_error_reference_errors_are_validation() {
    assert!(TimelineError::BoardNotFound("x".to_string()).is_validation());
    assert!(TimelineError::SelfConnection("x".to_string()).is_validation());
}

#[test]
fn timeline_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(TimelineError::BoardNotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === DragError Tests ===

#[test]
fn drag_error_display_variants() {
    assert_eq!(
        DragError::AlreadyDragging("b1".to_string()).to_string(),
        "Drag already in progress for b1"
    );
    assert_eq!(DragError::NotDragging.to_string(), "No drag in progress");
}

// === ConnectorEditError Tests ===

#[test]
fn connector_edit_error_display_variants() {
    assert_eq!(
        ConnectorEditError::AlreadyActive.to_string(),
        "Connector edit already active"
    );
    assert_eq!(
        ConnectorEditError::MissingConnectorId.to_string(),
        "Edit mode requires a connector ID"
    );
    assert_eq!(
        ConnectorEditError::InvalidState {
            action: "add bead",
            state: "SourcePending".to_string()
        }
        .to_string(),
        "Cannot add bead while SourcePending"
    );
    assert_eq!(
        ConnectorEditError::BeadNotFound("k1".to_string()).to_string(),
        "Bead not found: k1"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::SerializationError("bad".to_string()).to_string(),
        "Settings serialization error: bad"
    );
    assert_eq!(
        SettingsError::InvalidKey("grid.nope".to_string()).to_string(),
        "Invalid settings key: grid.nope"
    );
}

// === EditorError Tests ===

#[test]
fn editor_error_is_transparent() {
    let err: EditorError = DragError::NotDragging.into();
    assert_eq!(err.to_string(), "No drag in progress");

    let err: EditorError = TimelineError::BoardNotFound("b9".to_string()).into();
    assert_eq!(err.to_string(), "Board not found: b9");
    assert_eq!(
        err,
        EditorError::Timeline(TimelineError::BoardNotFound("b9".to_string()))
    );
}

#[test]
fn editor_error_storage_display() {
    assert_eq!(
        EditorError::Storage("no url".to_string()).to_string(),
        "Storage setup failed: no url"
    );
}
