//! Gradient lattices: one square grid of unit vectors per octave.
//!
//! Every gradient is stored as an angle and its derived `(cos, sin)` pair.
//! Nothing writes the vector directly; [`GradientLattice::rotate`] advances
//! the angle and re-derives the vector, so every stored gradient keeps unit
//! length for the lattice's whole lifetime.

use std::f64::consts::TAU;

use rand::Rng;

use crate::{config::FractalConfig, error::NoiseError};

/// A `side × side` grid of unit gradients with toroidal lookup.
#[derive(Clone, Debug)]
pub struct GradientLattice {
    octave: usize,
    side: usize,
    /// Per-tick rotation applied by the [`OctaveRotator`](crate::rotator::OctaveRotator).
    step: f64,
    /// Row-major angles in `[0, 2π)`.
    angles: Vec<f64>,
    /// Row-major `(cos θ, sin θ)`, always in sync with `angles`.
    gradients: Vec<[f64; 2]>,
}

impl GradientLattice {
    /// Draw a fresh lattice for `octave` with independent angles uniform in
    /// `[0, 2π)`.
    ///
    /// The side is `floor(base_cells * lacunarity^octave) + 1`; the extra row
    /// and column hold the far corners of the last cell.
    pub fn generate<R: Rng + ?Sized>(
        config: &FractalConfig,
        octave: usize,
        rng: &mut R,
    ) -> Result<Self, NoiseError> {
        let raw = config.wrap_width(octave).floor() + 1.0;
        if !raw.is_finite() || raw < 2.0 || raw > crate::config::MAX_LATTICE_SIDE as f64 {
            return Err(NoiseError::DegenerateLattice { octave, side: raw });
        }
        let side = raw as usize;
        let step = config.angular_step(octave)?;
        if !step.is_finite() {
            return Err(NoiseError::InvalidParameter {
                name: "angular_steps",
                value: step,
                expected: "finite radians per tick",
            });
        }

        let angles: Vec<f64> = (0..side * side)
            .map(|_| rng.random_range(0.0..TAU))
            .collect();
        let gradients = angles.iter().map(|&a| unit(a)).collect();

        Ok(Self {
            octave,
            side,
            step,
            angles,
            gradients,
        })
    }

    #[inline]
    pub fn octave(&self) -> usize {
        self.octave
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Angular step (radians per tick) this lattice was tagged with.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    fn index(&self, ix: i64, iy: i64) -> usize {
        let side = self.side as i64;
        (iy.rem_euclid(side) * side + ix.rem_euclid(side)) as usize
    }

    /// Gradient at `(ix, iy)`, wrapping both indices modulo the side length.
    #[inline]
    pub fn lookup(&self, ix: i64, iy: i64) -> [f64; 2] {
        self.gradients[self.index(ix, iy)]
    }

    /// Angle of the gradient at `(ix, iy)`, wrapped like [`lookup`](Self::lookup).
    #[inline]
    pub fn angle_at(&self, ix: i64, iy: i64) -> f64 {
        self.angles[self.index(ix, iy)]
    }

    /// Iterate `(ix, iy, gradient)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, [f64; 2])> + '_ {
        let side = self.side;
        self.gradients
            .iter()
            .enumerate()
            .map(move |(i, &g)| (i % side, i / side, g))
    }

    /// Rotate every gradient by `delta` radians in place.
    pub fn rotate(&mut self, delta: f64) {
        for (angle, gradient) in self.angles.iter_mut().zip(self.gradients.iter_mut()) {
            *angle = (*angle + delta).rem_euclid(TAU);
            *gradient = unit(*angle);
        }
    }
}

#[inline]
fn unit(angle: f64) -> [f64; 2] {
    let (sin, cos) = angle.sin_cos();
    [cos, sin]
}
