/// User settings persisted between sessions
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/asset-browser/settings.json
/// - macOS: ~/Library/Application Support/asset-browser/settings.json
/// - Windows: %APPDATA%\asset-browser\settings.json
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::data::ViewMode;
use super::store::{clamp_page_size, DEFAULT_PAGE_SIZE};
use crate::error::{BrowserError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Assets requested per page
    pub page_size: usize,
    /// Last used layout
    pub view: ViewMode,
    /// Whether the details panel starts open
    pub details_panel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            view: ViewMode::Grid,
            details_panel: true,
        }
    }
}

impl Settings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON string, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn validated(mut self) -> Self {
        self.page_size = clamp_page_size(self.page_size);
        self
    }

    /// Get the path where the settings file should be stored
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(BrowserError::NoDataDir)?;

        path.push("asset-browser");
        path.push("settings.json");
        Ok(path)
    }

    /// Load settings from `path`. A missing file yields the defaults; a
    /// broken one is reported and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("⚠️  Ignoring unreadable settings at {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!("💾 Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_keeps_values() {
        let settings = Settings {
            page_size: 40,
            view: ViewMode::List,
            details_panel: false,
        };
        let restored = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(settings, restored);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"view":"list"}"#).unwrap();
        assert_eq!(settings.view, ViewMode::List);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert!(settings.details_panel);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let settings = Settings::from_json(r#"{"page_size":0}"#).unwrap();
        assert_eq!(settings.page_size, 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("asset-browser-test-missing/settings.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("asset-browser-test-{}", std::process::id()))
            .join("settings.json");
        let settings = Settings {
            page_size: 25,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }
}
