//! # Configuration System
//!
//! YAML configuration for the radar console. Every section is optional and
//! falls back to the built-in defaults:
//!
//! - `signal`: test tone and dummy ADC
//! - `adc`: dual-channel converter used for captures
//! - `sweep`: sweep rate, blip decay, targets and trail
//! - `speed`: scan-speed slider range
//! - `logging`: level and output format
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `PPI_CONFIG` environment variable
//! 2. `./ppi.yaml` (current directory)
//! 3. `~/.config/ppi/config.yaml` (user config)
//! 4. `/etc/ppi/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! sweep:
//!   angular_rate: 150.0
//!   decay_rate: 0.5
//!   targets:
//!     - angle: 140.0
//!       distance_ratio: 0.7
//!     - angle: 75.0
//!       distance_ratio: 0.5
//!
//! speed:
//!   min: 1.0
//!   max: 5.0
//!
//! logging:
//!   level: debug
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adc::AdcConfig;
use crate::observe::LogConfig;
use crate::signal_source::{SignalConfig, SourceMode};
use crate::sweep::{SweepConfig, TargetSpec};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PPI_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read or write the file
    ReadError(String),
    /// Malformed YAML
    ParseError(String),
    /// Value out of range
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Range of the scan-speed slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub min: f64,
    pub max: f64,
    /// Speed at startup
    pub initial: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 5.0,
            initial: 1.0,
        }
    }
}

impl SpeedConfig {
    /// Clamp a requested speed into the slider range.
    ///
    /// Never panics: a NaN speed maps to `min`, and on an inverted range
    /// (`min > max`, rejected by `validate`) `max` wins.
    pub fn clamp(&self, speed: f64) -> f64 {
        speed.max(self.min).min(self.max)
    }
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub signal: SignalConfig,
    pub adc: AdcConfig,
    pub sweep: SweepConfig,
    pub speed: SpeedConfig,
    pub logging: LogConfig,
}

impl ConsoleConfig {
    /// Load configuration from the default search path.
    ///
    /// A `PPI_CONFIG` that names a missing file is an error; otherwise the
    /// first existing file wins and defaults are returned when none exists.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points to {}",
                    CONFIG_ENV,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        match Self::config_search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Candidate files, in search order (excluding `PPI_CONFIG`).
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./ppi.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "ppi") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/ppi/config.yaml"));
        paths
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: crate::types::PpiError| ConfigError::ValidationError(e.to_string());

        if !(self.signal.sample_rate.is_finite() && self.signal.sample_rate > 0.0) {
            return Err(ConfigError::ValidationError(
                "signal.sample_rate must be positive".to_string(),
            ));
        }
        if !self.signal.frequency.is_finite() {
            return Err(ConfigError::ValidationError(
                "signal.frequency must be finite".to_string(),
            ));
        }
        if let SourceMode::Sine { amplitude } = self.signal.mode {
            if !amplitude.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "signal.mode.amplitude must be finite, got {}",
                    amplitude
                )));
            }
        }
        if self.signal.samples_per_frame == 0 {
            return Err(ConfigError::ValidationError(
                "signal.samples_per_frame must be > 0".to_string(),
            ));
        }

        self.adc.validate().map_err(invalid)?;
        self.sweep.validate().map_err(invalid)?;

        let s = &self.speed;
        if !(s.min.is_finite() && s.max.is_finite() && s.min > 0.0 && s.min <= s.max) {
            return Err(ConfigError::ValidationError(format!(
                "speed range must satisfy 0 < min <= max, got {}..{}",
                s.min, s.max
            )));
        }
        if !(s.min..=s.max).contains(&s.initial) {
            return Err(ConfigError::ValidationError(format!(
                "speed.initial {} outside {}..{}",
                s.initial, s.min, s.max
            )));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            sweep: SweepConfig {
                targets: vec![TargetSpec::new(140.0, 0.7), TargetSpec::new(75.0, 0.5)],
                ..Default::default()
            },
            ..Default::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
