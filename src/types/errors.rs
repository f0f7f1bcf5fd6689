use thiserror::Error;

// === ServiceError ===

/// Failures reported by a data-access service implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The backing store has no record with the given ID.
    #[error("Record not found: {0}")]
    NotFound(String),
    /// The store refused the request (constraint violation, bad payload).
    #[error("Request rejected: {0}")]
    Rejected(String),
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    DatabaseError(String),
    /// Remote backend could not be reached or answered with an error.
    #[error("Storage network error: {0}")]
    NetworkError(String),
    /// A payload could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    SerializationError(String),
    /// The store is temporarily unavailable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => ServiceError::NotFound(err.to_string()),
            other => ServiceError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

// === TimelineError ===

/// Errors surfaced by the timeline controller.
///
/// Reference errors are raised before any service call; `Service` wraps a
/// persistence failure after which the committed data is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// Board with the given ID was not found.
    #[error("Board not found: {0}")]
    BoardNotFound(String),
    /// Bookmark entry with the given ID was not found.
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),
    /// Connector with the given ID was not found.
    #[error("Connector not found: {0}")]
    ConnectorNotFound(String),
    /// A connector cannot start and end on the same board.
    #[error("Connector cannot join board {0} to itself")]
    SelfConnection(String),
    /// The data-access service failed.
    #[error("Persistence failed: {0}")]
    Service(#[from] ServiceError),
}

impl TimelineError {
    /// Whether the error was raised before reaching the data-access service.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TimelineError::Service(_))
    }
}

// === DragError ===

/// Errors related to the drag session state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DragError {
    /// A drag session is already active for the given item.
    #[error("Drag already in progress for {0}")]
    AlreadyDragging(String),
    /// No drag session is active.
    #[error("No drag in progress")]
    NotDragging,
}

// === ConnectorEditError ===

/// Errors related to the connector-authoring state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectorEditError {
    /// An authoring session is already running.
    #[error("Connector edit already active")]
    AlreadyActive,
    /// Edit mode was requested without a connector ID.
    #[error("Edit mode requires a connector ID")]
    MissingConnectorId,
    /// The action is not legal in the current state.
    #[error("Cannot {action} while {state}")]
    InvalidState { action: &'static str, state: String },
    /// The bead is not part of the working copy.
    #[error("Bead not found: {0}")]
    BeadNotFound(String),
}

// === SettingsError ===

/// Errors related to the settings engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// File system I/O error.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// JSON serialization or deserialization error.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
}

// === EditorError ===

/// Any failure surfaced by the editor session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Drag(#[from] DragError),
    #[error(transparent)]
    ConnectorEdit(#[from] ConnectorEditError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Storage backend could not be constructed from settings.
    #[error("Storage setup failed: {0}")]
    Storage(String),
}
