//! Trajectories that drive drawables around the canvas.
//!
//! A trajectory is an iterator of per-step displacements: feed each item to
//! [`Transformable::translate`](crate::shape::Transformable::translate) and the
//! shape follows the path.  Displacements rather than absolute positions let a
//! shape keep whatever offset it started with.

use std::f64::consts::TAU;

use bevy::math::DVec2;

use crate::shape::interpolate_with_length;

/// Constant angular-speed motion around a circle, starting at angle 0.
#[derive(Clone, Debug)]
pub struct CircleTrajectory {
    center: DVec2,
    radius: f64,
    /// Fraction of a full turn per step; negative runs clockwise.
    increment: f64,
    looped: bool,
    t: f64,
    prev: DVec2,
}

impl CircleTrajectory {
    /// `increment` is the fraction of a turn covered per step.
    pub fn new(center: DVec2, radius: f64, increment: f64) -> Self {
        Self {
            center,
            radius,
            increment: increment.abs(),
            looped: true,
            t: 0.0,
            prev: center + DVec2::new(radius, 0.0),
        }
    }

    pub fn clockwise(mut self) -> Self {
        self.increment = -self.increment.abs();
        self
    }

    /// Stop after one full turn instead of circling forever.
    pub fn once(mut self) -> Self {
        self.looped = false;
        self
    }

    fn point(&self, t: f64) -> DVec2 {
        self.center + self.radius * DVec2::from_angle(TAU * t)
    }
}

impl Iterator for CircleTrajectory {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        if self.increment == 0.0 || !self.increment.is_finite() {
            return None;
        }
        if !self.looped && self.t.abs() > 1.0 {
            return None;
        }
        let current = self.point(self.t);
        let step = current - self.prev;
        self.prev = current;
        self.t += self.increment;
        if self.looped {
            self.t %= 1.0;
        }
        Some(step)
    }
}

/// Walks a polyline resampled to evenly spaced points, one point per step.
#[derive(Clone, Debug)]
pub struct PathTrajectory {
    points: Vec<DVec2>,
    looped: bool,
    index: usize,
}

impl PathTrajectory {
    /// Resample `vertices` so consecutive points are at most `spacing` apart.
    pub fn new(vertices: &[DVec2], spacing: f64) -> Self {
        Self {
            points: interpolate_with_length(vertices, spacing),
            looped: true,
            index: 0,
        }
    }

    /// Stop at the last vertex instead of jumping back to the first.
    pub fn once(mut self) -> Self {
        self.looped = false;
        self
    }

    /// A capital "A" of height `height` centered on the origin, traced from
    /// the bottom-left foot over the apex and back along the crossbar.
    pub fn letter_a(height: f64, spacing: f64) -> Self {
        let h = height;
        let outline = [
            DVec2::new(-h / 2.0, -h / 2.0),
            DVec2::new(0.0, h / 2.0),
            DVec2::new(h / 2.0, -h / 2.0),
            DVec2::new(h / 4.0, 0.0),
            DVec2::new(-h / 4.0, 0.0),
            DVec2::new(-h / 2.0, -h / 2.0),
        ];
        Self::new(&outline, spacing)
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }
}

impl Iterator for PathTrajectory {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        if self.points.len() < 2 {
            return None;
        }
        let next = self.index + 1;
        let next = if next < self.points.len() {
            next
        } else if self.looped {
            0
        } else {
            return None;
        };
        let step = self.points[next] - self.points[self.index];
        self.index = next;
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Shape, Transformable};

    fn close(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn circle_steps_sum_to_zero_over_a_turn() {
        let steps: Vec<DVec2> = CircleTrajectory::new(DVec2::ZERO, 100.0, 0.25)
            .take(5)
            .collect();
        assert!(close(steps[0], DVec2::ZERO));
        assert!(close(steps[1], DVec2::new(-100.0, 100.0)));
        assert!(close(steps.iter().copied().sum(), DVec2::ZERO));
    }

    #[test]
    fn clockwise_circle_goes_down_first() {
        let mut c = CircleTrajectory::new(DVec2::ZERO, 10.0, 0.25).clockwise();
        c.next();
        assert!(close(c.next().unwrap(), DVec2::new(-10.0, -10.0)));
    }

    #[test]
    fn single_turn_circle_ends() {
        assert_eq!(CircleTrajectory::new(DVec2::ZERO, 1.0, 0.25).once().count(), 5);
    }

    #[test]
    fn point_follows_letter_path() {
        let path = PathTrajectory::letter_a(100.0, 5.0);
        let start = path.points()[0];
        let n = path.points().len();
        let mut dot = Shape::Point {
            at: start,
            color: [0, 0, 0],
        };
        for step in path.clone().once() {
            dot.translate(step);
        }
        // The outline is closed, so the walk ends where it began.
        assert!(close(dot.center(), path.points()[n - 1]));
        assert!(close(dot.center(), start));
        assert_eq!(path.once().count(), n - 1);
    }

    #[test]
    fn looped_path_wraps() {
        let mut p = PathTrajectory::new(&[DVec2::ZERO, DVec2::X], 10.0);
        assert!(close(p.next().unwrap(), DVec2::X));
        assert!(close(p.next().unwrap(), -DVec2::X));
        assert!(close(p.next().unwrap(), DVec2::X));
    }
}
