//! Frequency Analyzer
//!
//! Backs the console's analyzer window: removes the DC level from a captured
//! frame, takes its FFT and reports the positive half of the magnitude
//! spectrum together with the strongest tone.
//!
//! ```text
//!   ADC frame ──► remove_dc ──► FFT ──► |X[k]|, k < n/2 ──► peak bin
//!                                                         (skips k = 0)
//! ```
//!
//! Bin `k` sits at `k · sample_rate / n` Hz. A pure tone of peak amplitude
//! `A` landing exactly on a bin has `|X[k]| = A·n/2`, so the reported tone
//! amplitude is `2·|X[k]|/n`.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Magnitude spectrum over the non-negative frequencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    /// Bin centre frequencies in Hz
    pub frequencies: Vec<f64>,
    /// `|X[k]|` for each bin
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Strongest tone found in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEstimate {
    pub frequency_hz: f64,
    /// Peak amplitude in input units
    pub amplitude: f64,
    pub phase_deg: f64,
}

/// Subtract the arithmetic mean in place.
pub fn remove_dc(samples: &mut [f64]) {
    if samples.is_empty() {
        return;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    for s in samples.iter_mut() {
        *s -= mean;
    }
}

fn fft(samples: &[f64]) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = samples.iter().map(|&s| Complex64::new(s, 0.0)).collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer
}

/// Magnitude spectrum of `samples`, first `n/2` bins.
pub fn compute_spectrum(samples: &[f64], sample_rate: f64) -> Spectrum {
    let n = samples.len();
    if n < 2 {
        return Spectrum::default();
    }
    let bins = fft(samples);
    let half = n / 2;
    let bin_hz = sample_rate / n as f64;
    Spectrum {
        frequencies: (0..half).map(|k| k as f64 * bin_hz).collect(),
        magnitudes: bins[..half].iter().map(|c| c.norm()).collect(),
    }
}

/// Largest non-DC bin of `samples`.
///
/// Returns `None` for fewer than two samples or when every bin is zero.
pub fn dominant_tone(samples: &[f64], sample_rate: f64) -> Option<ToneEstimate> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let bins = fft(samples);
    let half = (n / 2).max(2);
    let (k, peak) = bins[1..half]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c))
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))?;

    if peak.norm() == 0.0 {
        return None;
    }

    Some(ToneEstimate {
        frequency_hz: k as f64 * sample_rate / n as f64,
        amplitude: 2.0 * peak.norm() / n as f64,
        phase_deg: peak.arg().to_degrees(),
    })
}
