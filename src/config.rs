//! Configuration file support.
//!
//! Read from `<config dir>/zcalc/config.toml`:
//!
//! ```toml
//! max_length = 15
//! error_timeout_ms = 3000
//!
//! [display]
//! color = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::calculator::DEFAULT_MAX_LENGTH;
use crate::session::{CalculatorSettings, DEFAULT_ERROR_TIMEOUT};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Length cap for new input.
    pub max_length: usize,
    /// Delay in milliseconds before an error clears itself.
    pub error_timeout_ms: u64,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colour the display red while an error is shown.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            error_timeout_ms: DEFAULT_ERROR_TIMEOUT.as_millis() as u64,
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// location is tried and any problem with it falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            return Self::from_toml(&content)
                .with_context(|| format!("Invalid config at {}", path.display()));
        }

        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Ok(Self::default());
            }
        };

        match Self::from_toml(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {:#}", path, err);
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;

        if config.max_length == 0 {
            bail!("max_length must be at least 1");
        }
        if config.error_timeout_ms == 0 {
            bail!("error_timeout_ms must be at least 1");
        }

        Ok(config)
    }

    /// Default config file location.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zcalc").join("config.toml"))
    }

    pub fn settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            max_length: self.max_length,
            error_timeout: Duration::from_millis(self.error_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings(), CalculatorSettings::default());
        assert!(config.display.color);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml("error_timeout_ms = 1500\n[display]\ncolor = false\n").unwrap();
        assert_eq!(config.max_length, 15);
        assert_eq!(config.settings().error_timeout, Duration::from_millis(1500));
        assert!(!config.display.color);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml("max_length = 0").is_err());
        assert!(Config::from_toml("error_timeout_ms = 0").is_err());
        assert!(Config::from_toml("max_length = \"long\"").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = std::env::temp_dir().join("zcalc-missing-config-test.toml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_file_loads() {
        let path = std::env::temp_dir().join(format!("zcalc-config-{}.toml", std::process::id()));
        std::fs::write(&path, "max_length = 20\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.max_length, 20);
    }
}
