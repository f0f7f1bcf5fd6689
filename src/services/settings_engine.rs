// Stringboard Settings Engine
// Loads, saves and edits editor settings stored as JSON at the platform config path.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::EditorSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<EditorSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &EditorSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists [`EditorSettings`] as pretty-printed JSON.
pub struct SettingsEngine {
    config_path: String,
    settings: EditorSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, otherwise `settings.json` in the
    /// platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });
        Self {
            config_path,
            settings: EditorSettings::default(),
        }
    }

    /// Engine that starts from `settings` without touching the disk until saved.
    pub fn with_settings(path: String, settings: EditorSettings) -> Self {
        Self {
            config_path: path,
            settings,
        }
    }
}

impl SettingsEngine {
    /// Installs `settings` and writes them out. A failed write puts the
    /// previous settings back so memory and disk agree.
    fn replace_and_save(&mut self, settings: EditorSettings) -> Result<(), SettingsError> {
        let previous = std::mem::replace(&mut self.settings, settings);
        if let Err(err) = self.save() {
            tracing::warn!(error = %err, path = %self.config_path, "Settings not saved, keeping previous values");
            self.settings = previous;
            return Err(err);
        }
        Ok(())
    }
}

/// Walks a dot-separated `key` inside `root` and replaces the leaf.
///
/// Only existing keys may be set; unknown segments are rejected.
fn set_dotted(root: &mut Value, key: &str, value: Value) -> Result<(), SettingsError> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .get_mut(part)
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
    }

    match current {
        Value::Object(map) if map.contains_key(leaf) => {
            map.insert(leaf.to_string(), value);
            Ok(())
        }
        _ => Err(SettingsError::InvalidKey(key.to_string())),
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file yields defaults; a malformed file is an error.
    fn load(&mut self) -> Result<EditorSettings, SettingsError> {
        let path = Path::new(&self.config_path);
        if !path.exists() {
            self.settings = EditorSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read {}: {}", self.config_path, e)))?;
        self.settings = serde_json::from_str(&content)
            .map_err(|e| SettingsError::SerializationError(format!("Failed to parse settings: {}", e)))?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::IoError(format!("Failed to create config directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write {}: {}", self.config_path, e)))
    }

    fn get_settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Updates one setting by dot path (`grid.size`, `storage.backend`) and saves.
    ///
    /// The whole document is re-validated, so a value of the wrong type is
    /// rejected and the previous settings stay in place.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        set_dotted(&mut json_value, key, value)?;

        let updated: EditorSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::SerializationError(format!("Invalid value for '{}': {}", key, e))
        })?;

        self.replace_and_save(updated)
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.replace_and_save(EditorSettings::default())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
