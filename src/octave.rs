//! The per-scene set of octave lattices.
//!
//! An [`OctaveSet`] is created once when a scene is entered and dropped when
//! it exits.  It owns every lattice, the validated configuration and the
//! current pan offset; nothing in it is shared with other scenes.

use bevy::log::debug;
use noise::NoiseFn;
use rand::Rng;

use crate::{
    config::FractalConfig, error::NoiseError, fractal::composite, lattice::GradientLattice,
};

#[derive(Clone, Debug)]
pub struct OctaveSet {
    config: FractalConfig,
    lattices: Vec<GradientLattice>,
    /// Cached `Σ persistence^n`.
    normalizer: f64,
}

impl OctaveSet {
    /// Validate `config` and draw one lattice per octave from `rng`.
    ///
    /// Lattices are drawn in octave order, so the same seeded source and
    /// configuration always yield the same set.
    pub fn generate<R: Rng + ?Sized>(config: FractalConfig, rng: &mut R) -> Result<Self, NoiseError> {
        config.validate()?;
        let lattices = (0..config.octave_count)
            .map(|n| GradientLattice::generate(&config, n, rng))
            .collect::<Result<Vec<_>, _>>()?;
        let normalizer = config.normalizer();
        debug!(
            "generated {} octave lattices (sides {:?})",
            lattices.len(),
            lattices.iter().map(GradientLattice::side).collect::<Vec<_>>()
        );
        Ok(Self {
            config,
            lattices,
            normalizer,
        })
    }

    #[inline]
    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    #[inline]
    pub fn lattices(&self) -> &[GradientLattice] {
        &self.lattices
    }

    #[inline]
    pub(crate) fn lattices_mut(&mut self) -> &mut [GradientLattice] {
        &mut self.lattices
    }

    #[inline]
    pub fn octave_count(&self) -> usize {
        self.lattices.len()
    }

    #[inline]
    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    #[inline]
    pub fn pan(&self) -> [f64; 2] {
        self.config.pan_offset
    }

    /// Replace the pan offset.  A non-finite component is rejected and the
    /// previous offset kept.
    pub fn set_pan(&mut self, offset: [f64; 2]) -> Result<(), NoiseError> {
        for (axis, value) in ["pan_offset.x", "pan_offset.y"].into_iter().zip(offset) {
            if !value.is_finite() {
                return Err(NoiseError::InvalidParameter {
                    name: axis,
                    value,
                    expected: "a finite real",
                });
            }
        }
        self.config.pan_offset = offset;
        Ok(())
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<(), NoiseError> {
        let [x, y] = self.config.pan_offset;
        self.set_pan([x + dx, y + dy])
    }
}

/// Fixed-normalizer composite, so an [`OctaveSet`] plugs into the `noise`
/// crate's combinators (`ScaleBias`, `Clamp`, `Blend`, …).
///
/// The radial bias is not applied here: it needs the whole field for its
/// min–max rescale.
impl NoiseFn<f64, 2> for OctaveSet {
    fn get(&self, point: [f64; 2]) -> f64 {
        composite(self, point[0], point[1])
    }
}
