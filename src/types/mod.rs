// Stringboard shared type definitions
// Each submodule defines plain model values passed between controllers, services and renderers.

pub mod board;
pub mod bookmark;
pub mod connector;
pub mod connector_edit;
pub mod drag;
pub mod errors;
pub mod path;
pub mod settings;
pub mod timeline;
