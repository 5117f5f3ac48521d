use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reference::{InvalidTimeReference, TimeReference};
use crate::slider::{Placement, TooltipStyle};

/// Environment variable that overrides the configured time reference.
pub const TIME_REFERENCE_ENV: &str = "DAYSTAMP_TIME_REFERENCE";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clock the calendar date is read from (`utc`, `local` or `+HH:MM`)
    pub time_reference: TimeReference,

    /// Reject invalid input instead of printing `NaN-NaN-NaN`
    pub strict: bool,

    /// Tooltip placement and look
    pub tooltip: TooltipSettings,
}

/// Tooltip defaults, written snake_case in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    /// Where the tooltip is drawn relative to the handle
    pub placement: Placement,
    /// Background colour
    pub background: String,
    /// Text colour
    pub color: String,
    /// Font size
    pub font_size: String,
    /// Left and right padding
    pub padding: String,
    /// Corner radius
    pub border_radius: String,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        let style = TooltipStyle::default();
        Self {
            placement: Placement::default(),
            background: style.background,
            color: style.color,
            font_size: style.font_size,
            padding: style.padding_left,
            border_radius: style.border_radius,
        }
    }
}

impl TooltipSettings {
    /// The CSS style these settings describe.
    pub fn style(&self) -> TooltipStyle {
        TooltipStyle {
            background: self.background.clone(),
            color: self.color.clone(),
            font_size: self.font_size.clone(),
            padding_left: self.padding.clone(),
            padding_right: self.padding.clone(),
            border_radius: self.border_radius.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_reference: TimeReference::Utc,
            strict: false,
            tooltip: TooltipSettings::default(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.config/daystamp/config.toml)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("daystamp").join("config.toml"))
    }

    /// No config directory exists on wasm targets
    #[cfg(target_arch = "wasm32")]
    pub fn config_path() -> Option<PathBuf> {
        None
    }

    /// Load config from the default path, or return default if there is none
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Load config from `path`, or return default if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Render config as TOML text
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from the environment (`DAYSTAMP_TIME_REFERENCE`)
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(std::env::var(TIME_REFERENCE_ENV).ok().as_deref())
    }

    fn apply_overrides(&mut self, time_reference: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = time_reference.filter(|v| !v.trim().is_empty()) {
            self.time_reference = raw.parse()?;
            log::debug!("Time reference overridden to {}", self.time_reference);
        }
        Ok(())
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Write a default config file at `path`
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn init_at(path: &Path, force: bool) -> Result<Self, ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let config = Config::default();
        config.save_to(path)?;
        Ok(config)
    }
}

/// Errors from loading or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Serialization error
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Invalid time reference override
    #[error(transparent)]
    InvalidTimeReference(#[from] InvalidTimeReference),
    /// Refused to overwrite an existing config file
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    /// No config directory on this platform
    #[error("Could not determine config directory")]
    NoConfigDir,
}
