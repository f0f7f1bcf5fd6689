use serde::{Deserialize, Serialize};

use super::connector::{DEFAULT_CONNECTOR_COLOR, DEFAULT_STROKE_WIDTH};

/// Top-level editor settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EditorSettings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub connectors: ConnectorSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Grid snapping applied when a drag is committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridSettings {
    pub size: f64,
    pub snap_on_drop: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 20.0,
            snap_on_drop: true,
        }
    }
}

/// Stroke defaults for newly authored connectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorSettings {
    pub color: String,
    pub stroke_width: f64,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_CONNECTOR_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Which backing store the data-access service talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    Sqlite,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database_path: Option<String>,
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
