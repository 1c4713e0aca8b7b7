//! Gradient animation.
//!
//! Each tick rotates every gradient of octave `n` by that lattice's fixed
//! angular step.  Rotation never resets; stopping the animation just means
//! not ticking.  [`TickClock`] turns variable frame times into whole ticks so
//! the swirl speed is independent of frame rate.

use bevy::log::warn;

use crate::octave::OctaveSet;

/// Default animation rate, matching a 60 FPS frame loop.
pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Advances the gradient angles of an [`OctaveSet`].
pub struct OctaveRotator;

impl OctaveRotator {
    /// Advance every lattice by one tick.
    #[inline]
    pub fn advance(set: &mut OctaveSet) {
        Self::advance_ticks(set, 1);
    }

    /// Advance every lattice by `ticks` ticks in a single pass.
    ///
    /// Octave `n` rotates by `ticks × step_n`; the vectors are re-derived from
    /// the new angles once, however many ticks elapsed.
    pub fn advance_ticks(set: &mut OctaveSet, ticks: u32) {
        if ticks == 0 {
            return;
        }
        for lattice in set.lattices_mut() {
            let delta = lattice.step() * ticks as f64;
            lattice.rotate(delta);
        }
    }
}

/// Fixed-timestep accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct TickClock {
    tick_seconds: f64,
    accumulator: f64,
    /// Ticks beyond this per call are dropped instead of replayed.
    max_ticks: u32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_HZ)
    }
}

impl TickClock {
    /// A clock ticking `hz` times per second.  Non-positive or non-finite rates
    /// fall back to [`DEFAULT_TICK_HZ`].
    pub fn new(hz: f64) -> Self {
        let hz = if hz.is_finite() && hz > 0.0 {
            hz
        } else {
            DEFAULT_TICK_HZ
        };
        Self {
            tick_seconds: 1.0 / hz,
            accumulator: 0.0,
            max_ticks: 4,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks.max(1);
        self
    }

    /// Add `dt` seconds and return how many whole ticks elapsed.
    pub fn ticks(&mut self, dt: f64) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }
        self.accumulator += dt;
        let due = (self.accumulator / self.tick_seconds).floor();
        self.accumulator -= due * self.tick_seconds;
        if due > self.max_ticks as f64 {
            warn!(
                "animation fell {} ticks behind; dropping all but {}",
                due, self.max_ticks
            );
            return self.max_ticks;
        }
        due as u32
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::FractalConfig;

    fn set(steps: Option<Vec<f64>>) -> OctaveSet {
        let c = FractalConfig {
            angular_steps: steps,
            ..FractalConfig::default()
        };
        OctaveSet::generate(c, &mut StdRng::seed_from_u64(21)).unwrap()
    }

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn angles_drift_linearly() {
        let steps = vec![0.1, 0.25, 0.4, 1.7];
        let mut s = set(Some(steps.clone()));
        let initial: Vec<f64> = s.lattices().iter().map(|l| l.angle_at(3, 5)).collect();
        let n = 137;
        for _ in 0..n {
            OctaveRotator::advance(&mut s);
        }
        for (i, l) in s.lattices().iter().enumerate() {
            let expected = initial[i] + n as f64 * steps[i];
            assert!(
                angle_diff(l.angle_at(3, 5), expected) < 1e-9,
                "octave {i} drifted"
            );
        }
    }

    #[test]
    fn batched_ticks_match_single_ticks() {
        let mut a = set(None);
        let mut b = a.clone();
        for _ in 0..12 {
            OctaveRotator::advance(&mut a);
        }
        OctaveRotator::advance_ticks(&mut b, 12);
        for (la, lb) in a.lattices().iter().zip(b.lattices()) {
            for (ix, iy) in [(0, 0), (4, 7), (8, 8)] {
                assert!(angle_diff(la.angle_at(ix, iy), lb.angle_at(ix, iy)) < 1e-12);
            }
        }
    }

    #[test]
    fn zero_ticks_is_noop() {
        let mut s = set(None);
        let before = s.lattices()[2].lookup(1, 1);
        OctaveRotator::advance_ticks(&mut s, 0);
        assert_eq!(s.lattices()[2].lookup(1, 1), before);
    }

    #[test]
    fn rotation_changes_the_field() {
        let mut s = set(None);
        let before = crate::fractal::composite(&s, 1.3, 2.6);
        OctaveRotator::advance(&mut s);
        assert_ne!(before, crate::fractal::composite(&s, 1.3, 2.6));
    }

    #[test]
    fn clock_accumulates_fractional_frames() {
        let mut clock = TickClock::new(10.0);
        assert_eq!(clock.ticks(0.05), 0);
        assert_eq!(clock.ticks(0.06), 1);
        assert_eq!(clock.ticks(0.25), 2);
        assert_eq!(clock.ticks(-1.0), 0);
        assert_eq!(clock.ticks(f64::NAN), 0);
    }

    #[test]
    fn clock_caps_backlog() {
        let mut clock = TickClock::new(60.0).with_max_ticks(3);
        assert_eq!(clock.ticks(1.0), 3);
        // Backlog is discarded, not carried into the next frame.
        assert_eq!(clock.ticks(1.0 / 120.0), 0);
    }
}
