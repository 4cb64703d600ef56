//! Agent host configuration, stored as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether a visible screen is attached. Keyboard control requires one.
    #[serde(default)]
    pub display_screen: bool,
    /// Seed for the automated fallback policy; entropy when absent
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Global log level name (e.g. "info", "debug")
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.display_screen);
        assert_eq!(settings.random_seed, None);
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"display_screen": true}"#).expect("parse");
        assert!(settings.display_screen);
        assert_eq!(settings.random_seed, None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Settings::from_json(r#"{"display_screen": "yes"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("emu_core_settings_does_not_exist.json");
        let _ = fs::remove_file(&path);
        let settings = Settings::load(&path).expect("defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_save_load() {
        let test_dir = std::env::temp_dir().join("emu_core_test_settings");
        fs::create_dir_all(&test_dir).unwrap();
        let path = test_dir.join("settings.json");

        let settings = Settings {
            display_screen: true,
            random_seed: Some(123),
            log_level: Some("debug".to_string()),
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        fs::remove_dir_all(&test_dir).unwrap();
    }
}
