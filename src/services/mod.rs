// Stringboard services
// Services provide stateless geometry, persistence backends and settings.

pub mod layout_engine;
pub mod memory_store;
pub mod path_router;
#[cfg(feature = "remote")]
pub mod remote_store;
pub mod settings_engine;
pub mod sqlite_store;
pub mod timeline_service;
