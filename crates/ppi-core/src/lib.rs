//! # Radar PPI Console Core
//!
//! Simulation core for a radar operator console: a deterministic test-tone
//! source behind a dummy 16-bit ADC, and a sector sweep that reveals fixed
//! targets as fading blips on a Plan Position Indicator.
//!
//! ## Overview
//!
//! - **Signal source**: closed-form sine samples, raw or ADC-quantized
//! - **Dual-channel ADC**: signed 16-bit converter for two-channel captures
//! - **Sweep simulator**: 0°–180° back-and-forth scan, blip trigger and decay
//! - **Display geometry**: half-disc layout, rings, labels, waveform trace
//! - **Spectrum**: DC removal, FFT magnitude and dominant-tone estimate
//!
//! ## Frame Flow
//!
//! ```text
//!   SignalSource ──► [u16; 500] ──► wave_trace ──► oscilloscope panel
//!
//!   dt, speed ──► SweepSimulator::tick ──► TickResult ──► PpiGeometry ──► PPI panel
//!                                            │
//!                                            └─► trail() ──► afterglow
//! ```
//!
//! Time is always supplied by the caller; nothing here reads a clock.
//!
//! ## Example
//!
//! ```rust
//! use ppi_core::prelude::*;
//!
//! let mut sweep = SweepSimulator::new(SweepConfig {
//!     targets: vec![TargetSpec::new(90.0, 0.5)],
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let tick = sweep.tick(0.6, 1.0).unwrap();
//! assert_eq!(tick.angle, 90.0);
//! assert_eq!(tick.active_targets[0].intensity, 1.0);
//! ```

pub mod adc;
pub mod config;
pub mod display;
pub mod observe;
pub mod signal_source;
pub mod spectrum;
pub mod sweep;
pub mod types;

pub use adc::{AdcConfig, ChannelConfig, DualChannelAdc};
pub use config::{ConfigError, ConsoleConfig, SpeedConfig};
pub use display::{PpiGeometry, Point, Rect};
pub use signal_source::{adc_scale, generate_wave, SignalConfig, SignalSource, SourceMode};
pub use spectrum::{compute_spectrum, dominant_tone, remove_dc, Spectrum, ToneEstimate};
pub use sweep::{
    Blip, SweepConfig, SweepDirection, SweepSimulator, SweepState, TargetSpec, TickResult,
    TrailSegment,
};
pub use types::{AdcSample, PpiError, PpiResult, Sample, ADC_MAX_VALUE};

/// Prelude for common imports
pub mod prelude {
    pub use crate::signal_source::{generate_wave, SignalSource, SourceMode};
    pub use crate::sweep::{SweepConfig, SweepDirection, SweepSimulator, TargetSpec};
    pub use crate::types::{PpiError, PpiResult, Sample};
}
