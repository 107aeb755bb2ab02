//! PPI Display Geometry: sector scope, blips and waveform trace
//!
//! Maps the simulator's polar output onto screen coordinates for a
//! half-disc Plan Position Indicator sitting at the bottom of a panel:
//!
//! ```text
//!   ┌──────────────────────────────┐
//!   │   120   90   60              │
//!   │  150 .-''''''-.  30          │
//!   │    .'  ring    '.            │
//!   │ 180 ──────o────── 0          │   centre 20 px above the panel floor
//!   └──────────────────────────────┘
//! ```
//!
//! Angles are degrees measured counter-clockwise from the positive x axis;
//! screen y grows downwards, hence the `-sin` term.
//!
//! Also provides the oscilloscope trace mapping for ADC frames and the
//! colour helpers used for the sweep and blips.
//!
//! ## Example
//!
//! ```rust
//! use ppi_core::display::{PpiGeometry, Rect};
//!
//! let geo = PpiGeometry::for_area(Rect::new(0.0, 0.0, 400.0, 300.0));
//! let tip = geo.sweep_endpoint(90.0);
//! assert!((tip.x - geo.center.x).abs() < 1e-9);
//! assert!(tip.y < geo.center.y);
//! ```

use crate::sweep::{Blip, SECTOR_MAX_DEG};
use crate::types::AdcSample;

/// Gap between the panel floor and the PPI baseline, pixels.
const BASELINE_OFFSET: f64 = 20.0;
/// Smallest radius ever drawn.
const MIN_RADIUS: f64 = 10.0;
/// Spacing of the azimuth labels, degrees.
const AZIMUTH_LABEL_STEP: usize = 30;
/// Fractions of the radius at which range rings are drawn.
const RANGE_RING_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// An azimuth label and where to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthLabel {
    pub degrees: u32,
    pub position: Point,
}

/// Layout of the half-disc PPI inside a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PpiGeometry {
    /// Radar location (bottom centre of the half disc).
    pub center: Point,
    /// Radius of the outermost ring.
    pub radius: f64,
}

impl PpiGeometry {
    /// Fit the half disc into `area`, leaving a margin for labels.
    pub fn for_area(area: Rect) -> Self {
        let center = Point::new(area.x + area.width / 2.0, area.y + area.height - BASELINE_OFFSET);
        let radius = if area.width / 2.0 < area.height - BASELINE_OFFSET {
            area.width / 2.0 - BASELINE_OFFSET
        } else {
            area.height - 30.0
        };
        Self {
            center,
            radius: radius.max(MIN_RADIUS),
        }
    }

    /// Screen point at `angle_deg` and `ratio` of the radius.
    pub fn polar_point(&self, angle_deg: f64, ratio: f64) -> Point {
        let theta = angle_deg.to_radians();
        let r = self.radius * ratio;
        Point::new(self.center.x + r * theta.cos(), self.center.y - r * theta.sin())
    }

    /// Tip of the sweep line.
    pub fn sweep_endpoint(&self, angle_deg: f64) -> Point {
        self.polar_point(angle_deg, 1.0)
    }

    /// Where to draw a blip.
    pub fn blip_position(&self, blip: &Blip) -> Point {
        self.polar_point(blip.angle, blip.distance_ratio)
    }

    /// Radii of the range rings, innermost first.
    pub fn range_rings(&self) -> Vec<f64> {
        RANGE_RING_FRACTIONS.iter().map(|f| f * self.radius).collect()
    }

    /// Azimuth labels every 30° just outside the outer ring.
    pub fn azimuth_labels(&self) -> Vec<AzimuthLabel> {
        (0..=SECTOR_MAX_DEG as u32)
            .step_by(AZIMUTH_LABEL_STEP)
            .map(|deg| {
                let ratio = (self.radius + 10.0) / self.radius;
                AzimuthLabel {
                    degrees: deg,
                    position: self.polar_point(deg as f64, ratio),
                }
            })
            .collect()
    }
}

/// Map an ADC frame onto a polyline spanning `area`.
///
/// Mid-scale sits on the horizontal centre line; full scale reaches the
/// panel edges. Sample `i` is placed at `x + i·width/n`.
pub fn wave_trace(area: Rect, samples: &[AdcSample]) -> Vec<Point> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }
    let mid_y = area.y + area.height / 2.0;
    let half_scale = u16::MAX as f64 / 2.0;
    samples
        .iter()
        .enumerate()
        .map(|(i, &code)| {
            let x = area.x + i as f64 * area.width / n as f64;
            let norm = (code as f64 - half_scale) / half_scale; // -1..+1
            Point::new(x, mid_y - norm * area.height / 2.0)
        })
        .collect()
}

/// Classic green phosphor radar-scope colormap.
///
/// Maps a normalised value in `[0, 1]` to shades of green with R=0, B=0.
/// Values outside `[0, 1]` are clamped.
pub fn colormap_green(value: f64) -> (u8, u8, u8) {
    let v = value.clamp(0.0, 1.0);
    (0, (v * 255.0).round() as u8, 0)
}

/// RGBA colour of a blip: red, alpha following intensity.
pub fn blip_color(intensity: f64) -> (u8, u8, u8, u8) {
    let a = (intensity.clamp(0.0, 1.0) * 255.0).round() as u8;
    (255, 0, 0, a)
}
