//! Per-scene noise configuration.
//!
//! A [`FractalConfig`] is plain data: build one (or start from
//! [`FractalConfig::default`]), tweak fields, and hand it to
//! [`OctaveSet::generate`](crate::octave::OctaveSet::generate), which calls
//! [`FractalConfig::validate`] before touching any lattice.

use crate::{error::NoiseError, terrain::RadialBias};

/// Largest lattice side accepted for any octave.
///
/// A side of 4097 already holds ~16.8 M gradients (two `f64` vectors plus an
/// angle each, ~400 MB); anything above that is a configuration mistake.
pub const MAX_LATTICE_SIDE: usize = 4097;

/// Upper bound on the gradients held by all octaves together.
///
/// Twice the largest single lattice, which leaves room for a full
/// lacunarity-2 stack ending at [`MAX_LATTICE_SIDE`] while still refusing
/// long stacks of near-1 lacunarity.
pub const MAX_TOTAL_GRADIENTS: usize = 2 * MAX_LATTICE_SIDE * MAX_LATTICE_SIDE;

/// How the weighted octave sum is brought back into `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Normalization {
    /// Divide by `Σ persistence^n`.  Bounded per cell, independent of the rest
    /// of the field.
    #[default]
    GeometricSeries,
    /// Rescale the finished field by its own minimum and maximum.  Needed once a
    /// radial bias pushes values past the series bound.
    MinMax,
}

/// Configures one animated or static noise scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FractalConfig {
    /// Lattice cells across the raster at octave 0.
    pub base_cells: u32,
    pub octave_count: usize,
    /// Amplitude decay per octave, in `(0, 1]`.
    pub persistence: f64,
    /// Frequency growth per octave, `> 1`.
    pub lacunarity: f64,
    /// Pan offset in lattice units, added after frequency scaling.
    pub pan_offset: [f64; 2],
    /// Rotation per tick for each octave, in radians.  `None` uses
    /// [`default_angular_step`].
    pub angular_steps: Option<Vec<f64>>,
    pub normalization: Normalization,
    /// Optional additive island bump (see [`RadialBias`]).
    pub radial_bias: Option<RadialBias>,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            base_cells: 8,
            octave_count: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            pan_offset: [0.0, 0.0],
            angular_steps: None,
            normalization: Normalization::GeometricSeries,
            radial_bias: None,
        }
    }
}

/// `(10 + 5n)` degrees per tick, in radians.  Higher octaves swirl faster.
#[inline]
pub fn default_angular_step(octave: usize) -> f64 {
    (10.0 + 5.0 * octave as f64).to_radians()
}

impl FractalConfig {
    /// The island-terrain preset: default fractal parameters, the default
    /// [`RadialBias`] and min–max normalization.
    pub fn island() -> Self {
        Self {
            normalization: Normalization::MinMax,
            radial_bias: Some(RadialBias::default()),
            ..Self::default()
        }
    }

    /// Frequency multiplier `lacunarity^octave`.
    #[inline]
    pub fn frequency(&self, octave: usize) -> f64 {
        self.lacunarity.powi(octave as i32)
    }

    /// Amplitude weight `persistence^octave`.
    #[inline]
    pub fn amplitude(&self, octave: usize) -> f64 {
        self.persistence.powi(octave as i32)
    }

    /// Nominal domain width of an octave, `base_cells * lacunarity^octave`.
    /// Continuous coordinates wrap modulo this value.
    #[inline]
    pub fn wrap_width(&self, octave: usize) -> f64 {
        self.base_cells as f64 * self.frequency(octave)
    }

    /// Unvalidated lattice side `floor(wrap_width) + 1`, kept as `f64` so
    /// validation can report overflow and NaN.
    #[inline]
    fn raw_side(&self, octave: usize) -> f64 {
        self.wrap_width(octave).floor() + 1.0
    }

    /// Lattice side length for `octave`.  Only meaningful after
    /// [`validate`](Self::validate) succeeded.
    #[inline]
    pub fn side(&self, octave: usize) -> usize {
        self.raw_side(octave) as usize
    }

    /// Rotation per tick for `octave`.  Fails when explicit steps do not
    /// reach that octave.
    pub fn angular_step(&self, octave: usize) -> Result<f64, NoiseError> {
        match &self.angular_steps {
            Some(steps) => steps
                .get(octave)
                .copied()
                .ok_or(NoiseError::StepCountMismatch {
                    expected: self.octave_count.max(octave + 1),
                    got: steps.len(),
                }),
            None => Ok(default_angular_step(octave)),
        }
    }

    /// `Σ persistence^n` for `n = 0..octave_count`.
    ///
    /// Summed term by term rather than via the closed form, which divides by
    /// zero at `persistence == 1`.
    pub fn normalizer(&self) -> f64 {
        (0..self.octave_count).map(|n| self.amplitude(n)).sum()
    }

    /// Reject every configuration that could produce a degenerate lattice or
    /// an unbounded composite.
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.base_cells == 0 {
            return Err(NoiseError::InvalidParameter {
                name: "base_cells",
                value: 0.0,
                expected: "a positive integer",
            });
        }
        if self.octave_count == 0 {
            return Err(NoiseError::InvalidParameter {
                name: "octave_count",
                value: 0.0,
                expected: "a positive integer",
            });
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(NoiseError::InvalidParameter {
                name: "persistence",
                value: self.persistence,
                expected: "a real in (0, 1]",
            });
        }
        if !(self.lacunarity > 1.0 && self.lacunarity.is_finite()) {
            return Err(NoiseError::InvalidParameter {
                name: "lacunarity",
                value: self.lacunarity,
                expected: "a finite real > 1",
            });
        }
        for (axis, value) in ["pan_offset.x", "pan_offset.y"].into_iter().zip(self.pan_offset) {
            if !value.is_finite() {
                return Err(NoiseError::InvalidParameter {
                    name: axis,
                    value,
                    expected: "a finite real",
                });
            }
        }
        let mut total = 0usize;
        for octave in 0..self.octave_count {
            let side = self.raw_side(octave);
            if !side.is_finite() || side < 2.0 || side > MAX_LATTICE_SIDE as f64 {
                return Err(NoiseError::DegenerateLattice { octave, side });
            }
            total += (side as usize).pow(2);
            if total > MAX_TOTAL_GRADIENTS {
                return Err(NoiseError::TooManyGradients {
                    octaves: self.octave_count,
                    max: MAX_TOTAL_GRADIENTS,
                });
            }
        }
        if let Some(steps) = &self.angular_steps {
            if steps.len() != self.octave_count {
                return Err(NoiseError::StepCountMismatch {
                    expected: self.octave_count,
                    got: steps.len(),
                });
            }
            if let Some(&bad) = steps.iter().find(|s| !s.is_finite()) {
                return Err(NoiseError::InvalidParameter {
                    name: "angular_steps",
                    value: bad,
                    expected: "finite radians per tick",
                });
            }
        }
        if let Some(bias) = &self.radial_bias {
            if self.normalization != Normalization::MinMax {
                return Err(NoiseError::BiasRequiresMinMax);
            }
            bias.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(FractalConfig::default().validate(), Ok(()));
        assert_eq!(FractalConfig::island().validate(), Ok(()));
    }

    #[test]
    fn sides_follow_lacunarity() {
        let c = FractalConfig::default();
        let sides: Vec<usize> = (0..c.octave_count).map(|n| c.side(n)).collect();
        assert_eq!(sides, vec![9, 17, 33, 65]);
    }

    #[test]
    fn fractional_lacunarity_floors_side() {
        let c = FractalConfig {
            base_cells: 3,
            lacunarity: 1.5,
            ..FractalConfig::default()
        };
        // 3, 4.5, 6.75, 10.125
        assert_eq!(c.side(1), 5);
        assert_eq!(c.side(3), 11);
    }

    #[test]
    fn normalizer_is_geometric_sum() {
        let c = FractalConfig::default();
        assert!((c.normalizer() - 1.875).abs() < 1e-12);

        let flat = FractalConfig {
            octave_count: 3,
            persistence: 1.0,
            ..FractalConfig::default()
        };
        assert!((flat.normalizer() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_domain_parameters() {
        let bad = [
            FractalConfig {
                base_cells: 0,
                ..FractalConfig::default()
            },
            FractalConfig {
                octave_count: 0,
                ..FractalConfig::default()
            },
            FractalConfig {
                persistence: 0.0,
                ..FractalConfig::default()
            },
            FractalConfig {
                persistence: 1.5,
                ..FractalConfig::default()
            },
            FractalConfig {
                lacunarity: 1.0,
                ..FractalConfig::default()
            },
            FractalConfig {
                lacunarity: f64::NAN,
                ..FractalConfig::default()
            },
            FractalConfig {
                pan_offset: [f64::INFINITY, 0.0],
                ..FractalConfig::default()
            },
        ];
        for c in bad {
            assert!(
                matches!(c.validate(), Err(NoiseError::InvalidParameter { .. })),
                "accepted {c:?}"
            );
        }
    }

    #[test]
    fn rejects_oversized_lattice() {
        let c = FractalConfig {
            octave_count: 16,
            ..FractalConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(NoiseError::DegenerateLattice { octave: 10, .. })
        ));
    }

    #[test]
    fn rejects_step_count_mismatch() {
        let c = FractalConfig {
            angular_steps: Some(vec![0.1, 0.2]),
            ..FractalConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(NoiseError::StepCountMismatch {
                expected: 4,
                got: 2
            })
        );
    }

    #[test]
    fn bias_needs_min_max() {
        let c = FractalConfig {
            radial_bias: Some(RadialBias::default()),
            ..FractalConfig::default()
        };
        assert_eq!(c.validate(), Err(NoiseError::BiasRequiresMinMax));
    }

    #[test]
    fn default_steps_increase_with_octave() {
        let c = FractalConfig::default();
        assert!((c.angular_step(0).unwrap() - 10f64.to_radians()).abs() < 1e-12);
        assert!((c.angular_step(3).unwrap() - 25f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn short_step_list_is_an_error() {
        let c = FractalConfig {
            angular_steps: Some(vec![0.1]),
            ..FractalConfig::default()
        };
        assert_eq!(c.angular_step(0), Ok(0.1));
        assert_eq!(
            c.angular_step(2),
            Err(NoiseError::StepCountMismatch {
                expected: 4,
                got: 1
            })
        );
    }

    #[test]
    fn long_shallow_stack_is_rejected() {
        // Every side stays at 4097, so only the running total can stop it.
        let c = FractalConfig {
            base_cells: 4096,
            lacunarity: 1.0 + 1e-9,
            octave_count: 1_000_000,
            ..FractalConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(NoiseError::TooManyGradients { octaves: 1_000_000, .. })
        ));
    }

    #[test]
    fn full_lacunarity_two_stack_fits() {
        let c = FractalConfig {
            octave_count: 10,
            ..FractalConfig::default()
        };
        assert_eq!(c.side(9), MAX_LATTICE_SIDE);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn serde_round_trip() {
        let c = FractalConfig {
            angular_steps: Some(vec![0.1, 0.2, 0.3, 0.4]),
            ..FractalConfig::island()
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: FractalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
