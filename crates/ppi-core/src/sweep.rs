//! Sector-Scan Sweep Simulator
//!
//! Discrete-time model of the PPI sweep line and its target blips. The sweep
//! oscillates over the 0°–180° sector (boustrophedon scan): it moves at
//! `speed × angular_rate` degrees per second, clamps at either bound and
//! reverses direction there. Position is continuous; only the sign of the
//! velocity jumps.
//!
//! ```text
//!              90°
//!          .-""|""-.
//!        .'    |    '.        Forward:  0° ──► 180°
//!       /      |  *   \       Backward: 180° ──► 0°
//!      |       | blip  |
//!  180° ───────o─────── 0°
//! ```
//!
//! Each tick the simulator compares the pre-tick and post-tick angle with
//! every target angle. Only the two endpoints are examined, so a tick that
//! jumps across a target in one step still detects it. A crossing retriggers
//! the blip at full intensity; intensities then fade linearly at
//! `decay_rate` per second.
//!
//! The simulator never reads a clock; elapsed time is an explicit argument.
//!
//! ## Example
//!
//! ```rust
//! use ppi_core::sweep::{SweepConfig, SweepDirection, SweepSimulator, TargetSpec};
//!
//! let config = SweepConfig {
//!     targets: vec![TargetSpec::new(90.0, 0.5)],
//!     ..Default::default()
//! };
//! let mut sim = SweepSimulator::new(config).unwrap();
//!
//! let result = sim.tick(0.6, 1.0).unwrap(); // 150°/s × 0.6 s = 90°
//! assert_eq!(result.angle, 90.0);
//! assert_eq!(result.direction, SweepDirection::Forward);
//! assert_eq!(result.active_targets[0].intensity, 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, ensure_positive, PpiError, PpiResult};

/// Lower bound of the scanned sector, in degrees.
pub const SECTOR_MIN_DEG: f64 = 0.0;
/// Upper bound of the scanned sector, in degrees.
pub const SECTOR_MAX_DEG: f64 = 180.0;

/// Intensities at or below this are treated as fully faded.
const INTENSITY_FLOOR: f64 = 1e-9;

/// Sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepDirection {
    /// Increasing angle (0° → 180°)
    #[default]
    Forward,
    /// Decreasing angle (180° → 0°)
    Backward,
}

impl SweepDirection {
    /// +1.0 for forward, -1.0 for backward.
    pub fn sign(self) -> f64 {
        match self {
            SweepDirection::Forward => 1.0,
            SweepDirection::Backward => -1.0,
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Forward => SweepDirection::Backward,
            SweepDirection::Backward => SweepDirection::Forward,
        }
    }
}

/// Angular position and heading of the sweep line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepState {
    /// Angle in degrees, always within `[0, 180]`.
    pub angle: f64,
    /// Current heading.
    pub direction: SweepDirection,
}

/// Fixed position of a target, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Bearing in degrees, `[0, 180]`
    pub angle: f64,
    /// Range as a fraction of the display radius, `[0, 1]`
    pub distance_ratio: f64,
}

impl TargetSpec {
    /// Create a target position.
    pub fn new(angle: f64, distance_ratio: f64) -> Self {
        Self { angle, distance_ratio }
    }

    fn validate(&self, idx: usize) -> PpiResult<()> {
        ensure_finite("target angle", self.angle)?;
        ensure_finite("target distance_ratio", self.distance_ratio)?;
        if !(SECTOR_MIN_DEG..=SECTOR_MAX_DEG).contains(&self.angle) {
            return Err(PpiError::invalid(format!(
                "target {idx}: angle {} outside [0, 180]",
                self.angle
            )));
        }
        if !(0.0..=1.0).contains(&self.distance_ratio) {
            return Err(PpiError::invalid(format!(
                "target {idx}: distance_ratio {} outside [0, 1]",
                self.distance_ratio
            )));
        }
        Ok(())
    }
}

/// A target with its current blip intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Bearing in degrees.
    pub angle: f64,
    /// Range as a fraction of the display radius.
    pub distance_ratio: f64,
    /// Blip intensity in `[0, 1]`; 0 means not shown.
    pub intensity: f64,
}

impl From<TargetSpec> for Target {
    fn from(spec: TargetSpec) -> Self {
        Self {
            angle: spec.angle,
            distance_ratio: spec.distance_ratio,
            intensity: 0.0,
        }
    }
}

/// A visible blip, ready for alpha blending by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blip {
    /// Bearing in degrees.
    pub angle: f64,
    /// Range as a fraction of the display radius.
    pub distance_ratio: f64,
    /// Intensity in `(0, 1]`.
    pub intensity: f64,
}

/// Outcome of a single [`SweepSimulator::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Sweep angle after the tick, degrees.
    pub angle: f64,
    /// Sweep heading after the tick.
    pub direction: SweepDirection,
    /// Targets with intensity > 0, in configuration order.
    pub active_targets: Vec<Blip>,
    /// Indices of targets retriggered on this tick.
    pub triggered: Vec<usize>,
    /// Whether the sweep hit a bound and reversed on this tick.
    pub reversed: bool,
}

/// One line of the afterglow drawn behind the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    /// Angle in degrees.
    pub angle: f64,
    /// Opacity in `(0, 0.5]`.
    pub alpha: f64,
}

/// Sweep simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Sweep rate at speed 1.0, degrees per second
    pub angular_rate: f64,
    /// Blip fade rate, intensity units per second
    pub decay_rate: f64,
    /// Fixed target positions
    pub targets: Vec<TargetSpec>,
    /// Reject configurations without targets
    pub require_targets: bool,
    /// Number of afterglow lines behind the sweep
    pub trail_length: usize,
    /// Angular spacing between afterglow lines, degrees
    pub trail_step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            angular_rate: 150.0,
            decay_rate: 0.5, // ~2 s fade
            targets: vec![TargetSpec::new(45.0, 0.6)],
            require_targets: false,
            trail_length: 20,
            trail_step: 0.5,
        }
    }
}

impl SweepConfig {
    /// Check rates and target positions.
    pub fn validate(&self) -> PpiResult<()> {
        ensure_positive("angular_rate", self.angular_rate)?;
        ensure_positive("decay_rate", self.decay_rate)?;
        ensure_positive("trail_step", self.trail_step)?;
        if self.require_targets && self.targets.is_empty() {
            return Err(PpiError::invalid("at least one target is required"));
        }
        for (idx, target) in self.targets.iter().enumerate() {
            target.validate(idx)?;
        }
        Ok(())
    }
}

/// Back-and-forth sector sweep with fading target blips.
#[derive(Debug, Clone)]
pub struct SweepSimulator {
    config: SweepConfig,
    state: SweepState,
    targets: Vec<Target>,
}

impl SweepSimulator {
    /// Create a simulator at angle 0, heading forward, all blips dark.
    pub fn new(config: SweepConfig) -> PpiResult<Self> {
        config.validate()?;
        let targets = config.targets.iter().copied().map(Target::from).collect();
        tracing::debug!(
            targets = config.targets.len(),
            angular_rate = config.angular_rate,
            decay_rate = config.decay_rate,
            "sweep simulator created"
        );
        Ok(Self {
            config,
            state: SweepState::default(),
            targets,
        })
    }

    /// Advance the simulation by `dt` seconds at the given speed multiplier.
    ///
    /// `dt` and `speed` must be finite and non-negative; violations are
    /// rejected without modifying any state. At most one boundary reflection
    /// happens per tick: a step long enough to bounce twice ends clamped at
    /// the first bound it reaches.
    pub fn tick(&mut self, dt: f64, speed: f64) -> PpiResult<TickResult> {
        ensure_finite("dt", dt)?;
        ensure_finite("speed", speed)?;
        if dt < 0.0 {
            return Err(PpiError::invalid(format!("dt must be non-negative, got {dt}")));
        }
        if speed < 0.0 {
            return Err(PpiError::invalid(format!("speed must be non-negative, got {speed}")));
        }

        let heading = self.state.direction;
        let prev = self.state.angle;
        let mut curr = prev + heading.sign() * speed * self.config.angular_rate * dt;

        let mut reversed = false;
        if curr >= SECTOR_MAX_DEG {
            curr = SECTOR_MAX_DEG;
            reversed = self.state.direction != SweepDirection::Backward;
            self.state.direction = SweepDirection::Backward;
        } else if curr <= SECTOR_MIN_DEG {
            curr = SECTOR_MIN_DEG;
            reversed = self.state.direction != SweepDirection::Forward;
            self.state.direction = SweepDirection::Forward;
        }
        self.state.angle = curr;

        if reversed {
            tracing::debug!(angle = curr, direction = ?self.state.direction, "sweep reversed");
        }

        let fade = self.config.decay_rate * dt;
        for target in self.targets.iter_mut().filter(|t| t.intensity > 0.0) {
            let next = target.intensity - fade;
            target.intensity = if next <= INTENSITY_FLOOR { 0.0 } else { next };
        }

        let mut triggered = Vec::new();
        for (idx, target) in self.targets.iter_mut().enumerate() {
            if crossed(heading, prev, curr, target.angle) {
                target.intensity = 1.0;
                triggered.push(idx);
                tracing::debug!(target = idx, angle = target.angle, "blip triggered");
            }
        }

        Ok(TickResult {
            angle: self.state.angle,
            direction: self.state.direction,
            active_targets: self.active_blips(),
            triggered,
            reversed,
        })
    }

    /// Targets currently visible.
    pub fn active_blips(&self) -> Vec<Blip> {
        self.targets
            .iter()
            .filter(|t| t.intensity > 0.0)
            .map(|t| Blip {
                angle: t.angle,
                distance_ratio: t.distance_ratio,
                intensity: t.intensity,
            })
            .collect()
    }

    /// Afterglow lines behind the sweep, nearest first.
    ///
    /// Segment `i` (1-based) has opacity `0.5 - i·0.5/trail_length`, so the
    /// nearest line is just under 0.5 and the last one is fully transparent.
    /// Segments that would fall outside the sector are skipped.
    pub fn trail(&self) -> Vec<TrailSegment> {
        let len = self.config.trail_length;
        let sign = self.state.direction.sign();
        (1..=len)
            .filter_map(|i| {
                let angle = self.state.angle - i as f64 * sign * self.config.trail_step;
                if !(SECTOR_MIN_DEG..=SECTOR_MAX_DEG).contains(&angle) {
                    return None;
                }
                let alpha = 0.5 - i as f64 * 0.5 / len as f64;
                Some(TrailSegment { angle, alpha })
            })
            .collect()
    }

    /// Restore the initial state: angle 0, forward, all blips dark.
    pub fn reset(&mut self) {
        self.state = SweepState::default();
        for target in &mut self.targets {
            target.intensity = 0.0;
        }
    }

    /// Current sweep state.
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// All targets with their intensities.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The configuration this simulator was built with.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }
}

/// Endpoint-only crossing test for a sweep moving from `prev` to `curr`.
fn crossed(heading: SweepDirection, prev: f64, curr: f64, target: f64) -> bool {
    match heading {
        SweepDirection::Forward => prev < target && target <= curr,
        SweepDirection::Backward => prev > target && target >= curr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sim_with(targets: Vec<TargetSpec>) -> SweepSimulator {
        SweepSimulator::new(SweepConfig {
            targets,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sim = sim_with(vec![TargetSpec::new(45.0, 0.6)]);
        assert_eq!(sim.state().angle, 0.0);
        assert_eq!(sim.state().direction, SweepDirection::Forward);
        assert!(sim.targets().iter().all(|t| t.intensity == 0.0));
        assert!(sim.active_blips().is_empty());
    }

    #[test]
    fn test_forward_motion() {
        let mut sim = sim_with(vec![]);
        let r = sim.tick(0.1, 2.0).unwrap();
        assert_relative_eq!(r.angle, 30.0, epsilon = 1e-9);
        assert_eq!(r.direction, SweepDirection::Forward);
        assert!(!r.reversed);
    }

    #[test]
    fn test_reflection_at_upper_bound() {
        let mut sim = sim_with(vec![]);
        let r = sim.tick(1.0, 1.0).unwrap(); // 150°
        assert!(!r.reversed);
        let r = sim.tick(1.0, 1.0).unwrap(); // would be 300°
        assert_eq!(r.angle, 180.0);
        assert_eq!(r.direction, SweepDirection::Backward);
        assert!(r.reversed);

        let r = sim.tick(0.2, 1.0).unwrap();
        assert_relative_eq!(r.angle, 150.0, epsilon = 1e-9);
        assert_eq!(r.direction, SweepDirection::Backward);
    }

    #[test]
    fn test_reflection_at_lower_bound() {
        let mut sim = sim_with(vec![]);
        sim.tick(1.5, 1.0).unwrap(); // 180, backward
        let r = sim.tick(1.5, 1.0).unwrap(); // 0, forward
        assert_eq!(r.angle, 0.0);
        assert_eq!(r.direction, SweepDirection::Forward);
        assert!(r.reversed);
    }

    #[test]
    fn test_single_bounce_per_tick() {
        let mut sim = sim_with(vec![]);
        // 150°/s × 10 s would be several full cycles.
        let r = sim.tick(10.0, 1.0).unwrap();
        assert_eq!(r.angle, 180.0);
        assert_eq!(r.direction, SweepDirection::Backward);
    }

    #[test]
    fn test_angle_bounded_and_direction_flips_only_at_bounds() {
        let mut sim = sim_with(vec![]);
        let dts = [0.016, 0.033, 0.2, 0.0, 0.75, 1.9, 0.004, 0.5];
        let speeds = [1.0, 5.0, 2.5, 1.0, 3.3];
        let mut direction = sim.state().direction;
        for i in 0..2000 {
            let dt = dts[i % dts.len()];
            let speed = speeds[i % speeds.len()];
            let r = sim.tick(dt, speed).unwrap();
            assert!((0.0..=180.0).contains(&r.angle), "angle {} escaped", r.angle);
            if r.direction != direction {
                assert!(r.angle == 0.0 || r.angle == 180.0);
                assert!(r.reversed);
            }
            direction = r.direction;
        }
    }

    #[test]
    fn test_direction_unchanged_away_from_bounds() {
        let mut sim = sim_with(vec![]);
        for _ in 0..100 {
            let r = sim.tick(0.01, 1.0).unwrap(); // 1.5° per tick, ends at 150°
            assert_eq!(r.direction, SweepDirection::Forward);
        }
        assert_relative_eq!(sim.state().angle, 150.0, epsilon = 1e-6);
    }

    #[test]
    fn test_trigger_scenario_at_ninety_degrees() {
        let mut sim = sim_with(vec![TargetSpec::new(90.0, 0.5)]);
        let r = sim.tick(0.6, 1.0).unwrap();
        assert_eq!(r.angle, 90.0);
        assert_eq!(r.triggered, vec![0]);
        assert_eq!(r.active_targets.len(), 1);
        assert_eq!(r.active_targets[0].intensity, 1.0);
        assert_eq!(r.active_targets[0].distance_ratio, 0.5);

        // Freeze the sweep so nothing retriggers, then let 2 s elapse.
        for _ in 0..4 {
            let r = sim.tick(0.5, 0.0).unwrap();
            assert!(r.triggered.is_empty());
        }
        assert_eq!(sim.targets()[0].intensity, 0.0);
        assert!(sim.active_blips().is_empty());
    }

    #[test]
    fn test_trigger_requires_interval_containment() {
        let mut sim = sim_with(vec![TargetSpec::new(90.0, 0.5)]);
        let r = sim.tick(0.5, 1.0).unwrap(); // 0 → 75
        assert!(r.triggered.is_empty());
        let r = sim.tick(0.1, 1.0).unwrap(); // 75 → 90
        assert_eq!(r.triggered, vec![0]);
        let r = sim.tick(0.1, 1.0).unwrap(); // 90 → 105: 90 is not in (90, 105]
        assert!(r.triggered.is_empty());
    }

    #[test]
    fn test_backward_crossing_retriggers() {
        let mut sim = sim_with(vec![TargetSpec::new(120.0, 0.3)]);
        sim.tick(1.0, 1.0).unwrap(); // 0 → 150, trigger
        sim.tick(0.4, 1.0).unwrap(); // 150 → 180, fade 0.2
        assert_relative_eq!(sim.targets()[0].intensity, 0.8, epsilon = 1e-12);
        let r = sim.tick(0.4, 1.0).unwrap(); // 180 → 120 backward
        assert_eq!(r.direction, SweepDirection::Backward);
        assert_eq!(r.triggered, vec![0]);
        assert_eq!(sim.targets()[0].intensity, 1.0);
    }

    #[test]
    fn test_large_step_crosses_every_target() {
        let mut sim = sim_with(vec![
            TargetSpec::new(10.0, 0.1),
            TargetSpec::new(90.0, 0.5),
            TargetSpec::new(180.0, 1.0),
        ]);
        let r = sim.tick(5.0, 1.0).unwrap();
        assert_eq!(r.triggered, vec![0, 1, 2]);
        assert_eq!(r.active_targets.len(), 3);
    }

    #[test]
    fn test_target_at_lower_bound_triggers_on_return() {
        let mut sim = sim_with(vec![TargetSpec::new(0.0, 0.2)]);
        let r = sim.tick(0.1, 1.0).unwrap();
        assert!(r.triggered.is_empty());
        sim.tick(2.0, 1.0).unwrap(); // to 180
        let r = sim.tick(2.0, 1.0).unwrap(); // back to 0
        assert_eq!(r.triggered, vec![0]);
    }

    #[test]
    fn test_decay_is_linear_and_floored() {
        let mut sim = SweepSimulator::new(SweepConfig {
            targets: vec![TargetSpec::new(30.0, 0.4)],
            decay_rate: 0.5,
            ..Default::default()
        })
        .unwrap();
        sim.tick(0.2, 1.0).unwrap(); // 0 → 30, trigger
        let mut last = 1.0;
        for _ in 0..10 {
            sim.tick(0.25, 0.0).unwrap();
            let now = sim.targets()[0].intensity;
            assert!(now <= last);
            if now > 0.0 {
                assert_relative_eq!(last - now, 0.125, epsilon = 1e-12);
            }
            assert!(now >= 0.0);
            last = now;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_decay_reaches_zero_at_frame_rate() {
        let mut sim = sim_with(vec![TargetSpec::new(90.0, 0.5)]);
        sim.tick(0.6, 1.0).unwrap(); // 0 → 90, trigger
        assert_eq!(sim.targets()[0].intensity, 1.0);

        // 1/decay_rate = 2 s at 60 frames per second, sweep frozen.
        for frame in 0..120 {
            sim.tick(1.0 / 60.0, 0.0).unwrap();
            if frame < 119 {
                assert!(sim.targets()[0].intensity > 0.0, "faded early at frame {frame}");
            }
        }
        assert_eq!(sim.targets()[0].intensity, 0.0);
        assert!(sim.active_blips().is_empty());
    }

    #[test]
    fn test_invalid_tick_arguments_leave_state() {
        let mut sim = sim_with(vec![TargetSpec::new(45.0, 0.6)]);
        sim.tick(0.1, 1.0).unwrap();
        let before = sim.state();
        assert!(matches!(sim.tick(-0.1, 1.0), Err(PpiError::InvalidArgument(_))));
        assert!(sim.tick(f64::NAN, 1.0).is_err());
        assert!(sim.tick(0.1, -1.0).is_err());
        assert!(sim.tick(0.1, f64::INFINITY).is_err());
        assert_eq!(sim.state(), before);
    }

    #[test]
    fn test_config_validation() {
        let bad_angle = SweepConfig {
            targets: vec![TargetSpec::new(190.0, 0.5)],
            ..Default::default()
        };
        assert!(SweepSimulator::new(bad_angle).is_err());

        let bad_ratio = SweepConfig {
            targets: vec![TargetSpec::new(90.0, 1.5)],
            ..Default::default()
        };
        assert!(SweepSimulator::new(bad_ratio).is_err());

        let bad_rate = SweepConfig {
            angular_rate: 0.0,
            ..Default::default()
        };
        assert!(SweepSimulator::new(bad_rate).is_err());

        let empty = SweepConfig {
            targets: vec![],
            ..Default::default()
        };
        assert!(SweepSimulator::new(empty.clone()).is_ok());
        let required = SweepConfig {
            require_targets: true,
            ..empty
        };
        assert!(SweepSimulator::new(required).is_err());
    }

    #[test]
    fn test_trail_follows_heading() {
        let mut sim = sim_with(vec![]);
        sim.tick(0.6, 1.0).unwrap(); // 90°, forward
        let trail = sim.trail();
        assert_eq!(trail.len(), 20);
        assert_relative_eq!(trail[0].angle, 89.5, epsilon = 1e-9);
        assert_relative_eq!(trail[19].angle, 80.0, epsilon = 1e-9);
        assert!(trail.windows(2).all(|w| w[0].alpha > w[1].alpha));
        assert_relative_eq!(trail[0].alpha, 0.475, epsilon = 1e-12);
        assert_relative_eq!(trail[1].alpha, 0.45, epsilon = 1e-12);
        assert_eq!(trail[19].alpha, 0.0);

        // Right after the reversal the afterglow would lie beyond 180°.
        sim.tick(1.0, 1.0).unwrap();
        assert_eq!(sim.state().direction, SweepDirection::Backward);
        assert!(sim.trail().is_empty());

        sim.tick(0.1, 1.0).unwrap(); // ~165°, backward
        let trail = sim.trail();
        assert_eq!(trail.len(), 20);
        assert!(trail.iter().all(|s| s.angle > sim.state().angle && s.angle <= 180.0));
        assert_relative_eq!(trail[0].angle, sim.state().angle + 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_trail_clipped_at_sector_edge() {
        let mut sim = sim_with(vec![]);
        sim.tick(0.02, 1.0).unwrap(); // 3°, forward
        let trail = sim.trail();
        // Only 2.5, 2.0, ..., 0.0 survive.
        assert_eq!(trail.len(), 6);
        assert!(trail.iter().all(|s| s.angle >= 0.0));
    }

    #[test]
    fn test_reset() {
        let mut sim = sim_with(vec![TargetSpec::new(45.0, 0.6)]);
        sim.tick(0.5, 1.0).unwrap();
        assert!(!sim.active_blips().is_empty());
        sim.reset();
        assert_eq!(sim.state(), SweepState::default());
        assert!(sim.active_blips().is_empty());
    }

    #[test]
    fn test_independent_instances() {
        let mut a = sim_with(vec![TargetSpec::new(45.0, 0.6)]);
        let b = sim_with(vec![TargetSpec::new(45.0, 0.6)]);
        a.tick(0.5, 1.0).unwrap();
        assert_eq!(b.state().angle, 0.0);
        assert!(b.active_blips().is_empty());
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(SweepDirection::Forward.sign(), 1.0);
        assert_eq!(SweepDirection::Backward.sign(), -1.0);
        assert_eq!(SweepDirection::Forward.reversed(), SweepDirection::Backward);
    }
}
