use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{endpoints, limits, paths};
use crate::error::AskError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Use the incremental channel; `false` goes straight to the single-shot call.
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    pub max_entries: usize,
}

/// Presentation preferences. Only the front-end reads these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub dark_mode: bool,
}

fn default_connect_timeout() -> u64 {
    limits::DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_streaming() -> bool {
    true
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: limits::HISTORY_MAX_ENTRIES,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                base_url: endpoints::DEFAULT_BASE_URL.to_string(),
                connect_timeout_secs: default_connect_timeout(),
                streaming: default_streaming(),
            },
            history: HistorySettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), AskError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AskError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.base_url, "http://localhost:8086");
        assert_eq!(settings.server.connect_timeout_secs, 10);
        assert!(settings.server.streaming);
        assert_eq!(settings.history.max_entries, 50);
        assert!(!settings.display.dark_mode);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.server.base_url = "http://example.test".to_string();
        settings.display.dark_mode = true;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.server.base_url, "http://example.test");
        assert!(loaded.display.dark_mode);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://x\"\n").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.server.base_url, "http://x");
        assert!(loaded.server.streaming);
        assert_eq!(loaded.history.max_entries, 50);
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.server.base_url, "http://localhost:8086");
    }
}
