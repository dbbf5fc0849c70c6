//! Editor configuration.
//!
//! Placeholder names, the default marker color and the storage key live here
//! instead of being hard-coded, so an embedding application can adjust them
//! and ship them as a JSON file.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AREA_NAME, DEFAULT_MARKER_COLOR, DEFAULT_MARKER_NAME, STORAGE_KEY,
};

/// Verbosity of the editor's log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    /// Includes gesture and filter transitions
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Config format version written by this build. Files with a higher version
/// are refused.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Color given to new markers and used for markers without a color
    #[serde(default = "default_marker_color")]
    pub default_marker_color: String,

    /// Placeholder name for new markers
    #[serde(default = "default_marker_name")]
    pub default_marker_name: String,

    /// Placeholder name for new areas
    #[serde(default = "default_area_name")]
    pub default_area_name: String,

    /// Key under which the workspace snapshot is persisted
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_marker_color() -> String {
    DEFAULT_MARKER_COLOR.to_string()
}

fn default_marker_name() -> String {
    DEFAULT_MARKER_NAME.to_string()
}

fn default_area_name() -> String {
    DEFAULT_AREA_NAME.to_string()
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_marker_color: default_marker_color(),
            default_marker_name: default_marker_name(),
            default_area_name: default_area_name(),
            storage_key: default_storage_key(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }

        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a config file was refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("editor config version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.default_marker_color, "#10b981");
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"default_marker_name": "Stop", "log_level": "debug"}"#)
            .expect("partial config should parse");
        assert_eq!(config.default_marker_name, "Stop");
        assert_eq!(config.default_area_name, DEFAULT_AREA_NAME);
        assert_eq!(log::LevelFilter::from(config.log_level), log::LevelFilter::Debug);
    }

    #[test]
    fn test_round_trip() {
        let mut config = EditorConfig::new();
        config.default_marker_color = "#ef4444".to_string();
        let json = config.to_json().expect("serialize");
        assert_eq!(EditorConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{\"log_level\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = EditorConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion {
                found: 99,
                supported: CONFIG_VERSION
            }
        ));
    }
}
