//! Configuration system
//!
//! Settings are plain serde structs. Any type implementing [`Config`] can be
//! loaded from or saved to `.toml` and `.ron` files; the format is picked from
//! the file extension.

use std::path::Path;
use std::time::Duration;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or malformed
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Error in config file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Initial window geometry and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Title bar text
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "LVE Preview".to_string(),
        }
    }
}

/// Render preview settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Preview width; the window extent is used when unset
    pub width: Option<u32>,
    /// Preview height; the window extent is used when unset
    pub height: Option<u32>,
    /// Shared library exporting `update_render_preview`; the built-in
    /// constant fill is used when unset
    pub renderer_library: Option<String>,
    /// Preview refreshes per second; every frame when unset or `0`
    pub update_frequency: Option<u32>,
}

impl PreviewConfig {
    /// Minimum time between preview refreshes, `None` to refresh every frame
    pub fn update_interval(&self) -> Option<Duration> {
        match self.update_frequency {
            None | Some(0) => None,
            Some(hz) => Some(Duration::from_secs(1) / hz),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Render preview settings
    pub preview: PreviewConfig,
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Whether to enable Vulkan validation layers; auto-detected from the
    /// build profile when unset
    pub enable_validation: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            preview: PreviewConfig::default(),
            log_level: "info".to_string(),
            enable_validation: None,
        }
    }
}

impl AppConfig {
    /// Parsed log level, `Info` for unknown names
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using info", self.log_level);
            log::LevelFilter::Info
        })
    }

    /// Whether validation layers should be requested
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }
}

impl Config for AppConfig {}
