//! Whole-raster evaluation.
//!
//! Pixel `(px, py)` maps to the noise domain as
//! `(base_cells · px / extent, base_cells · py / extent)`, where `extent` is
//! the pixel size of the lattice grid (by default the shorter raster side).
//! Every call recomputes every cell; nothing is cached between frames.

use bevy::log::debug;
use rayon::prelude::*;

use crate::{
    config::Normalization,
    error::NoiseError,
    field::{ColorField, SampleField, validate_dimensions},
    fractal::{composite, composite_raw, min_max_rescale},
    octave::OctaveSet,
    terrain::TerrainShader,
};

/// Evaluates an [`OctaveSet`] over a fixed-size raster.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterEvaluator {
    width: u32,
    height: u32,
    /// Pixels spanned by `base_cells` lattice cells.
    extent: f64,
}

impl RasterEvaluator {
    pub fn new(width: u32, height: u32) -> Result<Self, NoiseError> {
        validate_dimensions(width, height)?;
        debug!("raster evaluator {width}×{height}");
        Ok(Self {
            width,
            height,
            extent: width.min(height) as f64,
        })
    }

    /// Override the grid pixel extent.  Larger extents zoom in.
    pub fn with_extent(mut self, extent: u32) -> Result<Self, NoiseError> {
        if extent == 0 {
            return Err(NoiseError::InvalidParameter {
                name: "extent",
                value: 0.0,
                expected: "a positive pixel count",
            });
        }
        self.extent = extent as f64;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Noise-domain coordinate of pixel `p` for a set with `base_cells` cells.
    #[inline]
    pub fn to_domain(&self, base_cells: u32, p: u32) -> f64 {
        base_cells as f64 * p as f64 / self.extent
    }

    /// Evaluate every cell on the calling thread.
    ///
    /// Bit-reproducible: the same set and raster always give the same field.
    pub fn evaluate(&self, set: &OctaveSet) -> SampleField {
        let mut values = vec![0.0f64; self.cell_count()];
        for (py, row) in values.chunks_mut(self.width as usize).enumerate() {
            self.fill_row(set, py as u32, row);
        }
        self.finish(set, values)
    }

    /// Evaluate rows in parallel on the current rayon pool.
    ///
    /// Each cell runs the exact same arithmetic as [`evaluate`](Self::evaluate),
    /// and the min–max pass runs after all rows are done, so the result is
    /// bit-identical to the serial path.
    pub fn evaluate_par(&self, set: &OctaveSet) -> SampleField {
        let mut values = vec![0.0f64; self.cell_count()];
        values
            .par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(py, row)| self.fill_row(set, py as u32, row));
        self.finish(set, values)
    }

    /// Evaluate and color through `shader`.
    pub fn evaluate_colors(&self, set: &OctaveSet, shader: &TerrainShader) -> ColorField {
        shader.shade(&self.evaluate(set))
    }

    /// Parallel counterpart of [`evaluate_colors`](Self::evaluate_colors).
    pub fn evaluate_colors_par(&self, set: &OctaveSet, shader: &TerrainShader) -> ColorField {
        shader.shade(&self.evaluate_par(set))
    }

    #[inline]
    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn fill_row(&self, set: &OctaveSet, py: u32, row: &mut [f64]) {
        let config = set.config();
        let y = self.to_domain(config.base_cells, py);
        match config.normalization {
            Normalization::GeometricSeries => {
                for (px, cell) in row.iter_mut().enumerate() {
                    let x = self.to_domain(config.base_cells, px as u32);
                    *cell = composite(set, x, y);
                }
            }
            Normalization::MinMax => {
                let bias = config.radial_bias.as_ref();
                for (px, cell) in row.iter_mut().enumerate() {
                    let x = self.to_domain(config.base_cells, px as u32);
                    *cell = composite_raw(set, x, y, bias);
                }
            }
        }
    }

    fn finish(&self, set: &OctaveSet, mut values: Vec<f64>) -> SampleField {
        if set.config().normalization == Normalization::MinMax {
            min_max_rescale(&mut values);
        }
        SampleField::from_values(self.width, self.height, values)
    }
}
