//! Dual-Channel ADC Simulator
//!
//! Simulates a two-channel signed converter digitizing a pair of sine
//! generators, e.g. an in-phase and a quadrature input. Each acquisition
//! starts at `t = 0` and returns both channels interleaved, the layout a
//! multichannel card hands back from a block transfer:
//!
//! ```text
//!   [ch0[0], ch1[0], ch0[1], ch1[1], ...]
//! ```
//!
//! Voltages map to codes by `round(v × code_max / v_max)`, clipped to the
//! signed range of the configured bit depth.
//!
//! ## Example
//!
//! ```rust
//! use ppi_core::adc::{AdcConfig, DualChannelAdc};
//!
//! let adc = DualChannelAdc::new(AdcConfig::default()).unwrap();
//! let block = adc.acquire(1024);
//! assert_eq!(block.len(), 2048);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, ensure_positive, AdcSample, PpiError, PpiResult};

/// One analog input feeding the converter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Peak amplitude in volts
    pub amplitude_vp: f64,
    /// Tone frequency in Hz
    pub frequency_hz: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            amplitude_vp: 2.5,
            frequency_hz: 30_000.0,
        }
    }
}

/// Converter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    /// Sample rate per channel in Hz
    pub sample_rate: f64,
    /// Resolution in bits (2..=16)
    pub bits: u32,
    /// Full-scale input range in volts, symmetric around 0 (±voltage_max)
    pub voltage_max: f64,
    /// The two analog inputs
    pub channels: [ChannelConfig; 2],
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            sample_rate: 200_000.0, // 200 kHz
            bits: 16,
            voltage_max: 5.0,
            channels: [ChannelConfig::default(); 2],
        }
    }
}

impl AdcConfig {
    /// Check rates, resolution and channel settings.
    pub fn validate(&self) -> PpiResult<()> {
        ensure_positive("adc sample_rate", self.sample_rate)?;
        ensure_positive("voltage_max", self.voltage_max)?;
        if !(2..=16).contains(&self.bits) {
            return Err(PpiError::invalid(format!(
                "adc bits must be within 2..=16, got {}",
                self.bits
            )));
        }
        for (idx, ch) in self.channels.iter().enumerate() {
            ensure_finite("channel frequency", ch.frequency_hz)?;
            ensure_finite("channel amplitude", ch.amplitude_vp)?;
            if ch.amplitude_vp < 0.0 {
                return Err(PpiError::invalid(format!(
                    "channel {idx}: amplitude must be non-negative, got {}",
                    ch.amplitude_vp
                )));
            }
        }
        Ok(())
    }

    /// Largest positive code, `2^(bits-1) - 1`.
    pub fn code_max(&self) -> i32 {
        (1i32 << (self.bits - 1)) - 1
    }

    /// Most negative code, `-2^(bits-1)`.
    pub fn code_min(&self) -> i32 {
        -(1i32 << (self.bits - 1))
    }
}

/// Two-channel signed ADC fed by sine generators.
#[derive(Debug, Clone)]
pub struct DualChannelAdc {
    config: AdcConfig,
    scale: f64,
}

impl DualChannelAdc {
    /// Create a converter, validating its configuration.
    pub fn new(config: AdcConfig) -> PpiResult<Self> {
        config.validate()?;
        let scale = config.code_max() as f64 / config.voltage_max;
        Ok(Self { config, scale })
    }

    /// Convert a voltage to a converter code, with clipping.
    pub fn volts_to_code(&self, volts: f64) -> i16 {
        let code = (volts * self.scale).round();
        code.clamp(self.config.code_min() as f64, self.config.code_max() as f64) as i16
    }

    /// Code for channel `ch` at sample `n` of an acquisition.
    fn channel_code(&self, ch: usize, n: usize) -> i16 {
        let input = &self.config.channels[ch];
        let t = n as f64 / self.config.sample_rate;
        self.volts_to_code(input.amplitude_vp * (2.0 * PI * input.frequency_hz * t).sin())
    }

    /// Acquire `samples_per_channel` samples from both inputs, interleaved.
    pub fn acquire(&self, samples_per_channel: usize) -> Vec<i16> {
        let mut out = Vec::with_capacity(samples_per_channel * 2);
        for n in 0..samples_per_channel {
            out.push(self.channel_code(0, n));
            out.push(self.channel_code(1, n));
        }
        tracing::trace!(samples_per_channel, "adc acquisition");
        out
    }

    /// Acquire a single channel without interleaving.
    pub fn acquire_channel(&self, ch: usize, samples: usize) -> PpiResult<Vec<i16>> {
        if ch >= self.config.channels.len() {
            return Err(PpiError::invalid(format!("channel {ch} does not exist")));
        }
        Ok((0..samples).map(|n| self.channel_code(ch, n)).collect())
    }

    /// Update one input's amplitude and frequency.
    pub fn set_channel(&mut self, ch: usize, input: ChannelConfig) -> PpiResult<()> {
        if ch >= self.config.channels.len() {
            return Err(PpiError::invalid(format!("channel {ch} does not exist")));
        }
        let mut next = self.config.clone();
        next.channels[ch] = input;
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &AdcConfig {
        &self.config
    }
}

/// Shift a signed code into the unsigned capture domain (`-32768 → 0`).
pub fn offset_binary(code: i16) -> AdcSample {
    (code as i32 + 32_768) as AdcSample
}

/// Undo [`offset_binary`].
pub fn from_offset_binary(sample: AdcSample) -> i16 {
    (sample as i32 - 32_768) as i16
}
