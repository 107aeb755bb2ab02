//! Core types for the radar console simulation
//!
//! Two kinds of sample flow through the console:
//!
//! - **Normalized amplitude**: a plain `f64` sine value scaled by an
//!   application-defined amplitude, used by the waveform display.
//! - **ADC reading**: an unsigned 16-bit code in `[0, 65535]`, the output of
//!   the dummy converter feeding the oscilloscope view.
//!
//! ```text
//!   sin(2πft) ∈ [-1, 1]
//!        │
//!        ├── × amplitude ─────────────► Sample::Amplitude(f64)
//!        │
//!        └── (s + 1) / 2 × 65535 ─────► Sample::Adc(u16)
//! ```

use crate::config::ConfigError;

/// Full-scale code of the unsigned 16-bit dummy ADC.
pub const ADC_MAX_VALUE: u16 = u16::MAX;

/// A raw reading from the unsigned 16-bit ADC.
pub type AdcSample = u16;

/// A single generated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Sine value multiplied by the source amplitude.
    Amplitude(f64),
    /// Quantized converter reading.
    Adc(AdcSample),
}

impl Sample {
    /// Sample value as `f64`, regardless of representation.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Sample::Amplitude(v) => v,
            Sample::Adc(code) => code as f64,
        }
    }

    /// The ADC code, if this is a converter reading.
    pub fn adc(&self) -> Option<AdcSample> {
        match *self {
            Sample::Adc(code) => Some(code),
            Sample::Amplitude(_) => None,
        }
    }
}

/// Result type for console simulation operations
pub type PpiResult<T> = Result<T, PpiError>;

/// Errors raised by the simulation core.
///
/// All core operations are total over well-formed input; the only failures
/// are caller-contract violations and configuration problems.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PpiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PpiError {
    /// Shorthand for an [`PpiError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        PpiError::InvalidArgument(msg.into())
    }
}

/// Fail with `InvalidArgument` unless `value` is finite.
pub(crate) fn ensure_finite(name: &str, value: f64) -> PpiResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PpiError::invalid(format!("{name} must be finite, got {value}")))
    }
}

/// Fail with `InvalidArgument` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> PpiResult<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(PpiError::invalid(format!("{name} must be positive, got {value}")))
    }
}
