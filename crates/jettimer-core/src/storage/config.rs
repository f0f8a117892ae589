//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Countdown timing (tick, animation frame and color cycle intervals)
//! - The preset duration used when a run is started without explicit fields
//! - Terminal rendering (arc width, color output, accent gradient)
//!
//! Configuration is stored at `~/.config/jettimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::timer::{default_progress_colors, DriverConfig, Gradient, TimeParts};

/// Countdown timing configuration, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default = "default_color_cycle_ms")]
    pub color_cycle_ms: u64,
}

/// Duration loaded into the fields before a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default)]
    pub hours: u32,
    #[serde(default = "default_preset_minutes")]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_arc_width")]
    pub arc_width: u32,
    #[serde(default = "default_true")]
    pub color: bool,
    /// Accent colors cycled while running, as `#rrggbb`.
    #[serde(default = "default_progress_colors")]
    pub gradient: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/jettimer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub preset: PresetConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_tick_ms() -> u64 {
    1000
}
fn default_frame_ms() -> u64 {
    16
}
fn default_color_cycle_ms() -> u64 {
    300
}
fn default_preset_minutes() -> u32 {
    5
}
fn default_arc_width() -> u32 {
    40
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            frame_ms: default_frame_ms(),
            color_cycle_ms: default_color_cycle_ms(),
        }
    }
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: default_preset_minutes(),
            seconds: 0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            arc_width: default_arc_width(),
            color: true,
            gradient: default_progress_colors(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// The whole config is validated afterwards; on failure it is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is unparseable
    /// or out of range.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::apply`] fails or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check every value that cannot be expressed in the type alone.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, ms) in [
            ("timer.tick_ms", self.timer.tick_ms),
            ("timer.frame_ms", self.timer.frame_ms),
            ("timer.color_cycle_ms", self.timer.color_cycle_ms),
        ] {
            if ms == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "interval must be at least 1 ms".into(),
                });
            }
        }
        self.preset()?;
        self.gradient()?;
        Ok(())
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            tick: Duration::from_millis(self.timer.tick_ms.max(1)),
            frame: Duration::from_millis(self.timer.frame_ms.max(1)),
            color_cycle: Duration::from_millis(self.timer.color_cycle_ms.max(1)),
        }
    }

    /// The preset duration as validated time parts.
    ///
    /// # Errors
    ///
    /// Returns an error if a preset field is out of range.
    pub fn preset(&self) -> Result<TimeParts, ValidationError> {
        TimeParts::new(self.preset.hours, self.preset.minutes, self.preset.seconds)
    }

    /// The accent gradient.
    ///
    /// # Errors
    ///
    /// Returns an error if a color is not `#rrggbb`.
    pub fn gradient(&self) -> Result<Gradient, ValidationError> {
        Gradient::from_hex(&self.ui.gradient)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
