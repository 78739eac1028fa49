// Planckrs Settings Module
// Boot-time settings for the simulated host, loaded from TOML

#![cfg(feature = "settings")]

use std::path::{Path, PathBuf};

use crate::layer::Layer;

/// Settings that control how the simulated host boots
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/planckrs/settings.toml).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Default layer restored at boot (QWERTY or BEPO)
    default_layer: Layer,

    /// Start with music mode enabled
    music_enabled: bool,

    /// Log every report change at info level
    log_keys: bool,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    layout: Option<LayoutSettings>,

    #[serde(default)]
    music: Option<MusicSettings>,

    #[serde(default)]
    report: Option<ReportSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LayoutSettings {
    #[serde(default)]
    default: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct MusicSettings {
    #[serde(default)]
    enabled: Option<toml::Value>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ReportSettings {
    #[serde(default)]
    log_keys: Option<toml::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with the factory defaults
    pub fn new() -> Self {
        Self {
            default_layer: Layer::Qwerty,
            music_enabled: false,
            log_keys: false,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let settings = Self::from_toml(&content)?;
        log::debug!("loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(default) = toml_settings.layout.and_then(|l| l.default) {
            let layer = Layer::from_name(&default)
                .map_err(|e| SettingsError::InvalidValue(e.to_string()))?;
            if !layer.is_base() {
                return Err(SettingsError::InvalidValue(format!(
                    "default layer must be QWERTY or BEPO, got {}",
                    layer
                )));
            }
            settings.default_layer = layer;
        }

        if let Some(value) = toml_settings.music.and_then(|m| m.enabled) {
            settings.music_enabled = parse_bool_value(&value)?;
        }

        if let Some(value) = toml_settings.report.and_then(|r| r.log_keys) {
            settings.log_keys = parse_bool_value(&value)?;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("planckrs").join("settings.toml"))
    }

    /// Load from default location (~/.config/planckrs/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        log::debug!("no settings file, using defaults");
        Ok(Self::new())
    }

    pub fn default_layer(&self) -> Layer {
        self.default_layer
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn log_keys(&self) -> bool {
        self.log_keys
    }
}

/// Parse a TOML value as a boolean
fn parse_bool_value(value: &toml::Value) -> Result<bool, SettingsError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(SettingsError::InvalidValue(format!(
                "Cannot convert '{}' to boolean",
                s
            ))),
        },
        _ => Err(SettingsError::InvalidValue(format!(
            "Cannot convert {:?} to boolean",
            value
        ))),
    }
}

/// Default settings content for `planckrs init`
pub fn default_settings_content() -> &'static str {
    r#"# Planckrs Settings
# Place this file at: ~/.config/planckrs/settings.toml

[layout]
# Default layer restored at boot: "qwerty" or "bepo"
default = "qwerty"

[music]
# Start with music mode on; LOWER and RAISE never play notes
enabled = false

[report]
# Log every report change
log_keys = false
"#
}
