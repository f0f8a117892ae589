mod config;

pub use config::{Config, PresetConfig, TimerConfig, UiConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/jettimer[-dev]/` based on JETTIMER_ENV.
///
/// Set JETTIMER_ENV=dev to use the development config directory. Only
/// configuration lives here; timer state is never written to disk.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::NoDataDir("home directory not found".into()))?
        .join(".config");

    let env = std::env::var("JETTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("jettimer-dev")
    } else {
        base_dir.join("jettimer")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
