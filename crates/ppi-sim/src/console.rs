//! Headless Console Host
//!
//! Drives one frame of the operator console at a time:
//!
//! ```text
//!   frame(dt)
//!     ├─ SweepSimulator::tick(dt, speed)      ──► TickResult
//!     ├─ unless paused: SignalSource::fill_adc ──► wave buffer
//!     └─ SweepSimulator::trail()              ──► afterglow
//! ```
//!
//! Pausing freezes the oscilloscope only; the sweep keeps turning. The
//! analyzer window works on whatever the wave buffer currently holds.

use ppi_core::config::{ConsoleConfig, SpeedConfig};
use ppi_core::signal_source::SignalSource;
use ppi_core::spectrum::{dominant_tone, remove_dc, ToneEstimate};
use ppi_core::sweep::{SweepSimulator, TickResult, TrailSegment};
use ppi_core::types::{AdcSample, PpiResult};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Frame counter, starting at 1
    pub frame: u64,
    pub tick: TickResult,
    pub trail: Vec<TrailSegment>,
    /// Whether the wave buffer was refilled this frame
    pub wave_refreshed: bool,
}

/// The console's runtime state.
#[derive(Debug)]
pub struct Console {
    source: SignalSource,
    sweep: SweepSimulator,
    wave: Vec<AdcSample>,
    speed_range: SpeedConfig,
    speed: f64,
    paused: bool,
    analyzer_open: bool,
    frames: u64,
}

impl Console {
    /// Build a console from configuration.
    pub fn new(config: &ConsoleConfig) -> PpiResult<Self> {
        config.validate()?;
        let source = SignalSource::from_config(&config.signal)?;
        let sweep = SweepSimulator::new(config.sweep.clone())?;
        tracing::info!(
            frequency = config.signal.frequency,
            sample_rate = config.signal.sample_rate,
            targets = config.sweep.targets.len(),
            "console initialized"
        );
        Ok(Self {
            source,
            sweep,
            wave: vec![0; config.signal.samples_per_frame],
            speed_range: config.speed,
            speed: config.speed.initial,
            paused: false,
            analyzer_open: false,
            frames: 0,
        })
    }

    /// Advance the console by `dt` seconds.
    pub fn frame(&mut self, dt: f64) -> PpiResult<FrameSnapshot> {
        let tick = self.sweep.tick(dt, self.speed)?;

        let wave_refreshed = !self.paused;
        if wave_refreshed {
            self.source.fill_adc(&mut self.wave);
        }

        self.frames += 1;
        Ok(FrameSnapshot {
            frame: self.frames,
            trail: self.sweep.trail(),
            tick,
            wave_refreshed,
        })
    }

    /// Set the scan speed, clamped to the slider range. Returns the speed applied.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let clamped = self.speed_range.clamp(speed);
        if clamped != speed {
            tracing::warn!(
                requested = speed,
                applied = clamped,
                min = self.speed_range.min,
                max = self.speed_range.max,
                "scan speed clamped"
            );
        }
        self.speed = clamped;
        clamped
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Freeze or resume the oscilloscope. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::debug!(paused = self.paused, "wave display");
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn open_analyzer(&mut self) {
        self.analyzer_open = true;
    }

    pub fn close_analyzer(&mut self) {
        self.analyzer_open = false;
    }

    pub fn analyzer_open(&self) -> bool {
        self.analyzer_open
    }

    /// Dominant tone of the current wave buffer, in ADC codes.
    ///
    /// `None` while the analyzer is closed or the buffer holds no tone.
    pub fn analyze(&self) -> Option<ToneEstimate> {
        if !self.analyzer_open {
            return None;
        }
        let mut samples: Vec<f64> = self.wave.iter().map(|&c| c as f64).collect();
        remove_dc(&mut samples);
        dominant_tone(&samples, self.source.sample_rate())
    }

    /// The most recent ADC frame.
    pub fn wave(&self) -> &[AdcSample] {
        &self.wave
    }

    pub fn sweep(&self) -> &SweepSimulator {
        &self.sweep
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
