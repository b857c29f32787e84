use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::session::DEFAULT_IDENTITY;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    /// Sender identity stamped on outgoing messages.
    pub username: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: DEFAULT_IDENTITY.to_string(),
        }
    }
}

impl Settings {
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("parley.toml"))
    }

    /// Whether a settings file has been written before.
    pub fn exists() -> bool {
        Self::toml_path().is_some_and(|p| p.is_file())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from disk, falling back to defaults on a missing or unreadable file.
    pub fn load() -> Self {
        let Some(path) = Self::toml_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::toml_path().ok_or(ConfigError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml_string()?)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(feature = "gui")]
pub fn build_ui(app: &adw::Application) {
    if Settings::exists() {
        crate::ui::main_window::show_main_window(app, Settings::load());
    } else {
        crate::ui::setup::show_setup_window(app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let s = Settings::default();
        assert_eq!(s.base_url, "http://127.0.0.1:8000");
        assert_eq!(s.username, "Me");
    }

    #[test]
    fn toml_round_trip() {
        let s = Settings {
            base_url: "https://chat.example.com".into(),
            username: "alice".into(),
        };
        let text = s.to_toml_string().unwrap();
        assert!(text.contains("username = \"alice\""));
        assert_eq!(Settings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let s = Settings::from_toml_str("username = \"bob\"\n").unwrap();
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.username, "bob");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(Settings::from_toml_str("base_url = ["), Err(ConfigError::Parse(_))));
    }
}
