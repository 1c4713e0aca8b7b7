//! Island terrain: a radial bump on the low octaves plus threshold coloring.
//!
//! [`RadialBias`] lifts a Gaussian island out of the noise before the octave
//! sum; the biased field is min–max rescaled to `[-1, 1]` and
//! [`ColorBandTable::color_of`] maps every value to the first band whose
//! threshold is `>=` the value.

use std::collections::BTreeSet;

use crate::{
    error::NoiseError,
    field::{ColorField, SampleField},
};

/// An sRGB colour.
pub type Rgb = [u8; 3];

/// Additive Gaussian bump applied to a subset of octaves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadialBias {
    /// Bump center in octave-0 lattice units; scaled by `lacunarity^n` per octave.
    pub center: [f64; 2],
    /// Height of the bump at its center.
    pub peak: f64,
    /// Gaussian falloff radius (standard deviation) in octave-local lattice units.
    pub radius: f64,
    /// Octaves that receive the bump.
    pub octaves: BTreeSet<usize>,
}

impl Default for RadialBias {
    fn default() -> Self {
        Self {
            center: [4.0, 4.0],
            peak: 3.0,
            radius: 8.0 / 1.5,
            octaves: BTreeSet::from([0, 1, 2]),
        }
    }
}

impl RadialBias {
    pub fn validate(&self) -> Result<(), NoiseError> {
        let checks = [
            ("radial_bias.center.x", self.center[0], self.center[0].is_finite()),
            ("radial_bias.center.y", self.center[1], self.center[1].is_finite()),
            ("radial_bias.peak", self.peak, self.peak.is_finite()),
            (
                "radial_bias.radius",
                self.radius,
                self.radius.is_finite() && self.radius > 0.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(NoiseError::InvalidParameter {
                    name,
                    value,
                    expected: "a finite real (radius > 0)",
                });
            }
        }
        Ok(())
    }

    /// Bump height at octave-local `(x, y)` for `octave` sampled at `frequency`.
    /// Zero for octaves outside [`octaves`](Self::octaves).
    #[inline]
    pub fn bias(&self, x: f64, y: f64, octave: usize, frequency: f64) -> f64 {
        if !self.octaves.contains(&octave) {
            return 0.0;
        }
        let dx = x - self.center[0] * frequency;
        let dy = y - self.center[1] * frequency;
        self.peak * (-(dx * dx + dy * dy) / (2.0 * self.radius * self.radius)).exp()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorBand {
    pub threshold: f64,
    pub color: Rgb,
}

/// Ascending `(threshold, color)` bands covering `[-1, 1]`.
///
/// Invariants (checked by [`ColorBandTable::new`] and on deserialization):
/// thresholds strictly increase, the first is `<= -1` and the last `>= 1`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<ColorBand>", into = "Vec<ColorBand>")]
pub struct ColorBandTable {
    bands: Vec<ColorBand>,
}

impl ColorBandTable {
    pub fn new(bands: Vec<ColorBand>) -> Result<Self, NoiseError> {
        let (Some(first), Some(last)) = (bands.first(), bands.last()) else {
            return Err(NoiseError::EmptyBandTable);
        };
        for (index, pair) in bands.windows(2).enumerate() {
            // `!(a < b)` also rejects NaN thresholds.
            if !(pair[0].threshold < pair[1].threshold) {
                return Err(NoiseError::ThresholdOrder {
                    index: index + 1,
                    prev: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }
        if !(first.threshold <= -1.0 && last.threshold >= 1.0) {
            return Err(NoiseError::ThresholdCoverage {
                first: first.threshold,
                last: last.threshold,
            });
        }
        Ok(Self { bands })
    }

    /// Build from `(threshold, color)` pairs.
    pub fn from_pairs(pairs: &[(f64, Rgb)]) -> Result<Self, NoiseError> {
        Self::new(
            pairs
                .iter()
                .map(|&(threshold, color)| ColorBand { threshold, color })
                .collect(),
        )
    }

    /// Deep water through snow.
    ///
    /// Deep water owns everything up to `-0.7`; it is listed twice so the
    /// table also starts at `-1`.
    pub fn island() -> Self {
        Self {
            bands: [
                (-1.0, [10, 0, 160]),
                (-0.7, [10, 0, 160]),
                (-0.2, [0, 125, 255]),
                (0.0, [10, 220, 255]),
                (0.1, [255, 255, 100]),
                (0.7, [30, 200, 10]),
                (0.95, [100, 70, 10]),
                (1.0, [255, 255, 255]),
            ]
            .into_iter()
            .map(|(threshold, color)| ColorBand { threshold, color })
            .collect(),
        }
    }

    #[inline]
    pub fn bands(&self) -> &[ColorBand] {
        &self.bands
    }

    /// Index of the first band whose threshold is `>= value`.
    ///
    /// A value equal to a threshold selects that threshold's band.  Values
    /// above the last threshold (only reachable through rounding) clamp to the
    /// last band.
    #[inline]
    pub fn band_index(&self, value: f64) -> usize {
        self.bands
            .partition_point(|b| b.threshold < value)
            .min(self.bands.len() - 1)
    }

    #[inline]
    pub fn color_of(&self, value: f64) -> Rgb {
        self.bands[self.band_index(value)].color
    }
}

impl TryFrom<Vec<ColorBand>> for ColorBandTable {
    type Error = NoiseError;

    fn try_from(bands: Vec<ColorBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<ColorBandTable> for Vec<ColorBand> {
    fn from(table: ColorBandTable) -> Self {
        table.bands
    }
}

/// Maps a normalized [`SampleField`] to colours through a [`ColorBandTable`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TerrainShader {
    pub bands: ColorBandTable,
}

impl Default for TerrainShader {
    fn default() -> Self {
        Self {
            bands: ColorBandTable::island(),
        }
    }
}

impl TerrainShader {
    pub fn new(bands: ColorBandTable) -> Self {
        Self { bands }
    }

    pub fn shade(&self, field: &SampleField) -> ColorField {
        ColorField::from_fn(field.width(), field.height(), |x, y| {
            self.bands.color_of(field.get(x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Rgb = [1, 0, 0];
    const B: Rgb = [2, 0, 0];
    const C: Rgb = [3, 0, 0];
    const D: Rgb = [4, 0, 0];
    const E: Rgb = [5, 0, 0];

    fn table() -> ColorBandTable {
        ColorBandTable::from_pairs(&[(-1.0, A), (-0.2, B), (0.0, C), (0.5, D), (1.0, E)]).unwrap()
    }

    #[test]
    fn exact_threshold_selects_its_own_band() {
        let t = table();
        assert_eq!(t.color_of(0.0), C);
        assert_eq!(t.color_of(-0.2), B);
        assert_eq!(t.color_of(-1.0), A);
        assert_eq!(t.color_of(1.0), E);
    }

    #[test]
    fn values_between_thresholds_take_upper_band() {
        let t = table();
        assert_eq!(t.color_of(-0.5), B);
        assert_eq!(t.color_of(0.0001), D);
        assert_eq!(t.color_of(0.75), E);
    }

    #[test]
    fn banding_is_total() {
        let t = table();
        for i in 0..=2000 {
            let v = -1.0 + i as f64 * 0.001;
            let idx = t.band_index(v);
            assert!(t.bands()[idx].threshold >= v);
            if idx > 0 {
                assert!(t.bands()[idx - 1].threshold < v);
            }
        }
        assert_eq!(t.color_of(1.0 + 1e-12), E);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(ColorBandTable::new(vec![]), Err(NoiseError::EmptyBandTable));
        assert!(matches!(
            ColorBandTable::from_pairs(&[(-1.0, A), (0.5, B), (0.5, C), (1.0, D)]),
            Err(NoiseError::ThresholdOrder { index: 2, .. })
        ));
        assert!(matches!(
            ColorBandTable::from_pairs(&[(-0.7, A), (1.0, B)]),
            Err(NoiseError::ThresholdCoverage { .. })
        ));
        assert!(matches!(
            ColorBandTable::from_pairs(&[(-1.0, A), (0.9, B)]),
            Err(NoiseError::ThresholdCoverage { .. })
        ));
    }

    #[test]
    fn island_table_is_valid() {
        let island = ColorBandTable::island();
        assert_eq!(ColorBandTable::new(island.bands().to_vec()), Ok(island.clone()));
        assert_eq!(island.color_of(-0.85), [10, 0, 160]);
        assert_eq!(island.color_of(0.05), [255, 255, 100]);
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let bad = r#"[{"threshold":0.5,"color":[0,0,0]},{"threshold":-1.0,"color":[0,0,0]}]"#;
        assert!(serde_json::from_str::<ColorBandTable>(bad).is_err());

        let json = serde_json::to_string(&table()).unwrap();
        assert_eq!(serde_json::from_str::<ColorBandTable>(&json).unwrap(), table());
    }

    #[test]
    fn bias_peaks_at_scaled_center() {
        let b = RadialBias::default();
        assert_eq!(b.bias(4.0, 4.0, 0, 1.0), 3.0);
        assert_eq!(b.bias(8.0, 8.0, 1, 2.0), 3.0);
        assert_eq!(b.bias(4.0, 4.0, 3, 8.0), 0.0);
        assert!(b.bias(12.0, 4.0, 0, 1.0) < b.bias(6.0, 4.0, 0, 1.0));
    }

    #[test]
    fn bias_rejects_zero_radius() {
        let b = RadialBias {
            radius: 0.0,
            ..RadialBias::default()
        };
        assert!(b.validate().is_err());
    }
}
