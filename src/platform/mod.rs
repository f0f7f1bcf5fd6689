// Stringboard platform paths
// Config and data locations per OS, resolved from the usual environment variables.

use std::env;
use std::path::PathBuf;

const APP_DIR_UNIX: &str = "stringboard";
const APP_DIR_DESKTOP: &str = "Stringboard";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the directory holding `settings.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/stringboard` or `~/.config/stringboard`
/// - **macOS**: `~/Library/Application Support/Stringboard`
/// - **Windows**: `%APPDATA%/Stringboard`
pub fn get_config_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR_DESKTOP)
    } else if cfg!(target_os = "macos") {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_DESKTOP)
    } else if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join(APP_DIR_UNIX)
    } else {
        home_dir().join(".config").join(APP_DIR_UNIX)
    }
}

/// Returns the directory holding the SQLite store.
///
/// `STRINGBOARD_DATA_DIR` overrides the platform default everywhere.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("STRINGBOARD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "windows") || cfg!(target_os = "macos") {
        get_config_dir()
    } else if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_DIR_UNIX)
    } else {
        home_dir().join(".local").join("share").join(APP_DIR_UNIX)
    }
}

/// Default location of the SQLite store.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("stringboard.db")
}
