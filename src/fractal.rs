//! Multi-octave fractal compositing.
//!
//! Octave `n` is sampled at `lacunarity^n` times the base coordinate plus the
//! pan offset, wrapped into `[0, base_cells · lacunarity^n)`, and weighted by
//! `persistence^n`.  [`composite`] divides the sum by `Σ persistence^n`;
//! biased terrain fields instead keep the raw sum and are rescaled as a
//! whole by [`min_max_rescale`].

use crate::{octave::OctaveSet, sampler::sample, terrain::RadialBias};

/// Normalized fractal value at `(x, y)` (octave-0 lattice units), in `[-1, 1]`.
#[inline]
pub fn composite(set: &OctaveSet, x: f64, y: f64) -> f64 {
    composite_raw(set, x, y, None) / set.normalizer()
}

/// Weighted octave sum without normalization.
///
/// When `bias` is given, its bump is added to each affected octave's sample
/// before weighting, so the result is no longer bounded by the series sum.
pub fn composite_raw(set: &OctaveSet, x: f64, y: f64, bias: Option<&RadialBias>) -> f64 {
    let config = set.config();
    let [pan_x, pan_y] = config.pan_offset;
    let mut sum = 0.0;
    for (n, lattice) in set.lattices().iter().enumerate() {
        let frequency = config.frequency(n);
        let wrap = config.wrap_width(n);
        let xr = (frequency * x + pan_x).rem_euclid(wrap);
        let yr = (frequency * y + pan_y).rem_euclid(wrap);
        let mut value = sample(lattice, xr, yr);
        if let Some(bias) = bias {
            value += bias.bias(xr, yr, n, frequency);
        }
        sum += config.amplitude(n) * value;
    }
    sum
}

/// Rescale `values` in place so the minimum maps to `-1` and the maximum to `1`.
///
/// A flat (or empty) field has no range to stretch and becomes all zeros.
pub fn min_max_rescale(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !(range > 0.0 && range.is_finite()) {
        values.fill(0.0);
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - min) / range * 2.0 - 1.0;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::{FractalConfig, Normalization};

    fn set(config: FractalConfig, seed: u64) -> OctaveSet {
        OctaveSet::generate(config, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn assert_bounded(s: &OctaveSet) {
        for i in 0..120 {
            for j in 0..120 {
                let v = composite(s, i as f64 * 0.071, j as f64 * 0.067);
                assert!((-1.0..=1.0).contains(&v), "{v} escaped [-1, 1]");
            }
        }
    }

    #[test]
    fn bounded_for_default_config() {
        assert_bounded(&set(FractalConfig::default(), 1));
    }

    #[test]
    fn bounded_single_octave_full_persistence() {
        let c = FractalConfig {
            octave_count: 1,
            persistence: 1.0,
            ..FractalConfig::default()
        };
        assert_bounded(&set(c, 2));
    }

    #[test]
    fn bounded_many_flat_octaves() {
        let c = FractalConfig {
            base_cells: 2,
            octave_count: 6,
            persistence: 1.0,
            lacunarity: 2.5,
            ..FractalConfig::default()
        };
        assert_bounded(&set(c, 3));
    }

    #[test]
    fn pan_shifts_single_octave() {
        let base = FractalConfig {
            octave_count: 1,
            ..FractalConfig::default()
        };
        let panned = FractalConfig {
            pan_offset: [1.25, 0.0],
            ..base.clone()
        };
        let a = set(base, 9);
        let b = set(panned, 9);
        for i in 0..40 {
            let x = i as f64 * 0.1;
            assert_eq!(composite(&b, x, 0.3), composite(&a, x + 1.25, 0.3));
        }
    }

    #[test]
    fn negative_coordinates_wrap() {
        let s = set(FractalConfig::default(), 4);
        let v = composite(&s, -3.7, -0.2);
        assert!(v.is_finite());
        assert!((-1.0..=1.0).contains(&v));
    }

    #[test]
    fn bias_raises_the_center() {
        let c = FractalConfig {
            normalization: Normalization::MinMax,
            radial_bias: Some(RadialBias::default()),
            ..FractalConfig::default()
        };
        let s = set(c, 6);
        let bias = s.config().radial_bias.clone().unwrap();
        let center = composite_raw(&s, 4.0, 4.0, Some(&bias));
        let plain = composite_raw(&s, 4.0, 4.0, None);
        assert!(center > plain + 2.0);
    }

    #[test]
    fn min_max_spans_unit_range() {
        let mut v = vec![3.0, -1.0, 0.5, 7.0];
        min_max_rescale(&mut v);
        assert_eq!(v[1], -1.0);
        assert_eq!(v[3], 1.0);
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn min_max_flat_field_is_zero() {
        let mut v = vec![0.4; 5];
        min_max_rescale(&mut v);
        assert!(v.iter().all(|&x| x == 0.0));
    }
}
