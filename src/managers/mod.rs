// Stringboard state managers
// Managers hold editor state: the committed timeline, the live drag session, connector authoring.

pub mod connector_editor;
pub mod drag_manager;
pub mod timeline_manager;
