//! Signal Source / Dummy ADC
//!
//! Generates the console's test signals: a synthetic sine tone, or the same
//! tone quantized by a dummy 16-bit ADC. Every sample is evaluated in closed
//! form from the running sample index, `t = index / sample_rate`, so there is
//! no phase accumulator and no error builds up over long runs.
//!
//! ## Example
//!
//! ```rust
//! use ppi_core::signal_source::{generate_wave, SignalSource};
//!
//! // 30 kHz tone through the dummy ADC at 1 MHz
//! let mut adc = SignalSource::adc(30_000.0, 1_000_000.0).unwrap();
//! let first = adc.next_sample();
//! assert_eq!(first.adc(), Some(32767));
//!
//! // One frame of waveform in a single call
//! let wave = generate_wave(4, 1.0, 1.0, 0.0, 4.0);
//! assert!((wave[1] - 1.0).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, ensure_positive, AdcSample, PpiResult, Sample, ADC_MAX_VALUE};

/// How the sine value is presented to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceMode {
    /// `amplitude * sin(...)`
    Sine { amplitude: f64 },
    /// `(sin + 1) / 2 * 65535`, truncated
    Adc,
}

/// Signal source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Tone frequency in Hz
    pub frequency: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Output representation
    pub mode: SourceMode,
    /// Samples drawn by the host per displayed frame
    pub samples_per_frame: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            frequency: 30_000.0,       // 30 kHz
            sample_rate: 1_000_000.0,  // 1 MHz
            mode: SourceMode::Adc,
            samples_per_frame: 500,
        }
    }
}

/// Map a sine value in `[-1, 1]` onto the unsigned 16-bit ADC range.
///
/// The result is truncated, so only exactly `+1.0` reaches full scale.
/// Inputs outside `[-1, 1]` saturate.
pub fn adc_scale(sin_value: f64) -> AdcSample {
    ((sin_value + 1.0) / 2.0 * ADC_MAX_VALUE as f64) as AdcSample
}

/// Generate `n` samples of `amplitude * sin(2π·frequency·i/sample_rate + phase)`.
///
/// Pure: the host calls this to materialize a whole frame of waveform at once.
pub fn generate_wave(
    n: usize,
    amplitude: f64,
    frequency: f64,
    phase: f64,
    sample_rate: f64,
) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amplitude * (2.0 * PI * frequency * t + phase).sin()
        })
        .collect()
}

/// Deterministic sample generator driven by a monotonic sample index.
#[derive(Debug, Clone)]
pub struct SignalSource {
    frequency: f64,
    sample_rate: f64,
    mode: SourceMode,
    sample_index: u64,
}

impl SignalSource {
    /// Create a new signal source.
    pub fn new(frequency: f64, sample_rate: f64, mode: SourceMode) -> PpiResult<Self> {
        ensure_finite("frequency", frequency)?;
        ensure_positive("sample_rate", sample_rate)?;
        if let SourceMode::Sine { amplitude } = mode {
            ensure_finite("amplitude", amplitude)?;
        }
        Ok(Self {
            frequency,
            sample_rate,
            mode,
            sample_index: 0,
        })
    }

    /// Create a source from configuration.
    pub fn from_config(config: &SignalConfig) -> PpiResult<Self> {
        Self::new(config.frequency, config.sample_rate, config.mode)
    }

    /// Create a normalized sine source.
    pub fn sine(frequency: f64, amplitude: f64, sample_rate: f64) -> PpiResult<Self> {
        Self::new(frequency, sample_rate, SourceMode::Sine { amplitude })
    }

    /// Create a dummy ADC source.
    pub fn adc(frequency: f64, sample_rate: f64) -> PpiResult<Self> {
        Self::new(frequency, sample_rate, SourceMode::Adc)
    }

    /// Value of the sample at `index`, without touching the counter.
    pub fn sample_at(&self, index: u64) -> Sample {
        let t = index as f64 / self.sample_rate;
        let s = (2.0 * PI * self.frequency * t).sin();
        match self.mode {
            SourceMode::Sine { amplitude } => Sample::Amplitude(amplitude * s),
            SourceMode::Adc => Sample::Adc(adc_scale(s)),
        }
    }

    /// Produce the next sample and advance the sample index.
    pub fn next_sample(&mut self) -> Sample {
        let sample = self.sample_at(self.sample_index);
        self.sample_index += 1;
        sample
    }

    /// Fill `buffer` with consecutive ADC codes.
    ///
    /// Sine-mode sources are routed through [`adc_scale`] after removing the
    /// amplitude, so the buffer always holds converter readings.
    pub fn fill_adc(&mut self, buffer: &mut [AdcSample]) {
        for slot in buffer.iter_mut() {
            *slot = match self.next_sample() {
                Sample::Adc(code) => code,
                Sample::Amplitude(v) => match self.mode {
                    SourceMode::Sine { amplitude } if amplitude != 0.0 => adc_scale(v / amplitude),
                    _ => adc_scale(0.0),
                },
            };
        }
    }

    /// Number of samples produced so far.
    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    /// Tone frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Output representation.
    pub fn mode(&self) -> SourceMode {
        self.mode
    }
}
