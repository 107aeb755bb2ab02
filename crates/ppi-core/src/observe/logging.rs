//! # Structured Logging
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and one
//! `fmt` layer in the configured [`LogFormat`]. `RUST_LOG` takes precedence
//! over the configured level unless an explicit `filter` directive is set.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ppi_core::observe::{init_logging, LogConfig, LogFormat};
//!
//! init_logging(&LogConfig {
//!     format: LogFormat::Compact,
//!     ..Default::default()
//! });
//!
//! tracing::info!(frames = 600, "console started");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// Minimum event level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, coloured
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// Machine-readable
    Json,
}

/// Logging configuration, the `logging:` section of the console config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Prefix events with a timestamp
    pub timestamps: bool,
    /// Include file:line
    pub source_location: bool,
    /// Directive overriding `level`, e.g. `"ppi_core=debug,ppi_sim=info"`
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            timestamps: true,
            source_location: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Verbose preset for working on the console.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            source_location: true,
            ..Default::default()
        }
    }

    /// JSON events for log collectors.
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            ..Default::default()
        }
    }

    /// Errors only.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            ..Default::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match self.filter {
            Some(ref directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer(config: &LogConfig) -> BoxedLayer {
    let base = fmt::layer()
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is left in place.
pub fn init_logging(config: &LogConfig) -> bool {
    tracing_subscriber::registry()
        .with(fmt_layer(config))
        .with(config.env_filter())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_presets() {
        let dev = LogConfig::development();
        assert_eq!(dev.level, LogLevel::Debug);
        assert!(dev.source_location);

        assert_eq!(LogConfig::production().format, LogFormat::Json);

        let quiet = LogConfig::quiet();
        assert_eq!(quiet.level, LogLevel::Error);
        assert!(!quiet.timestamps);
    }

    #[test]
    fn test_partial_yaml_section() {
        let cfg: LogConfig = serde_yaml::from_str("level: debug\nformat: json\n").unwrap();
        assert_eq!(cfg.level, LogLevel::Debug);
        assert_eq!(cfg.format, LogFormat::Json);
        assert!(cfg.timestamps);
        assert!(cfg.filter.is_none());
    }

    #[test]
    fn test_init_twice_keeps_first() {
        // The first call may lose to another test; the second always does.
        let _ = init_logging(&LogConfig::quiet());
        assert!(!init_logging(&LogConfig::quiet()));
    }
}
