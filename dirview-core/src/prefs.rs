//! src/prefs.rs
//! ============================================================================
//! # Local preferences
//!
//! A tiny key/value store for settings the user changes from inside the UI
//! (currently only the theme). The file store keeps a flat TOML table in the
//! data directory and rewrites it on every change.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::{debug, warn};

use crate::{error::AppError, model::theme_mode::ThemeMode};

/// Fixed key the theme preference is stored under.
pub const THEME_KEY: &str = "dirview-theme";

pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Preferences persisted as `preferences.toml`.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store, treating a missing or unreadable file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences at {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        debug!(entries = values.len(), path = %path.display(), "Preferences loaded");
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::file_io(parent, e))?;
        }
        let text = toml::to_string(&self.values)?;
        std::fs::write(&self.path, text).map_err(|e| AppError::file_io(&self.path, e))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Non-persistent store.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Best guess at the terminal's appearance from `COLORFGBG` ("fg;bg").
pub fn detect_system_theme() -> Option<ThemeMode> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
}

fn theme_from_colorfgbg(value: &str) -> Option<ThemeMode> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    // ANSI 0-6 and 8 are dark backgrounds.
    if bg <= 6 || bg == 8 {
        Some(ThemeMode::Dark)
    } else {
        Some(ThemeMode::Light)
    }
}

/// Stored preference first, then the system appearance, then dark. A value
/// that did not come from the store is written back.
pub fn resolve_theme(store: &mut dyn PreferenceStore, system: Option<ThemeMode>) -> ThemeMode {
    if let Some(stored) = store.get(THEME_KEY).and_then(|v| ThemeMode::from_str(&v).ok()) {
        return stored;
    }

    let resolved = system.unwrap_or_default();
    if let Err(e) = store.set(THEME_KEY, resolved.as_str()) {
        warn!("Failed to persist theme preference: {e}");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_preference_wins() {
        let mut store = MemoryPreferenceStore::with(THEME_KEY, "light");
        assert_eq!(resolve_theme(&mut store, Some(ThemeMode::Dark)), ThemeMode::Light);
    }

    #[test]
    fn test_system_preference_is_persisted() {
        let mut store = MemoryPreferenceStore::default();
        assert_eq!(resolve_theme(&mut store, Some(ThemeMode::Light)), ThemeMode::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let mut store = MemoryPreferenceStore::with(THEME_KEY, "sepia");
        assert_eq!(resolve_theme(&mut store, None), ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(theme_from_colorfgbg("15;0"), Some(ThemeMode::Dark));
        assert_eq!(theme_from_colorfgbg("0;15"), Some(ThemeMode::Light));
        assert_eq!(theme_from_colorfgbg("0;default;7"), Some(ThemeMode::Light));
        assert_eq!(theme_from_colorfgbg("nonsense"), None);
    }

    #[test]
    fn test_file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.toml");

        let mut store = FilePreferenceStore::open(&path);
        assert!(store.get(THEME_KEY).is_none());
        store.set(THEME_KEY, "light").unwrap();

        let reopened = FilePreferenceStore::open(&path);
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("light"));
    }
}
