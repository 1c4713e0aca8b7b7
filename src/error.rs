//! Construction-time errors.
//!
//! Every failure the engine can produce is detected while a scene is being
//! set up (config validation, lattice construction, raster sizing).  Once an
//! [`OctaveSet`](crate::octave::OctaveSet) and a
//! [`RasterEvaluator`](crate::raster::RasterEvaluator) exist, evaluation is
//! infallible.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoiseError {
    /// A scalar parameter is outside its valid domain.
    #[error("invalid {name}: {value} ({expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// `floor(base_cells * lacunarity^octave) + 1` is not a usable side length.
    #[error("octave {octave} would produce a degenerate lattice (side {side})")]
    DegenerateLattice { octave: usize, side: f64 },

    /// All octaves together would hold more than
    /// [`MAX_TOTAL_GRADIENTS`](crate::config::MAX_TOTAL_GRADIENTS) gradients.
    #[error("{octaves} octaves exceed the gradient budget of {max}")]
    TooManyGradients { octaves: usize, max: usize },

    /// `angular_steps` was given but does not have one entry per octave.
    #[error("expected {expected} angular steps (one per octave), got {got}")]
    StepCountMismatch { expected: usize, got: usize },

    /// A radial bias breaks the fixed series bound, so min–max rescaling is required.
    #[error("a radial bias requires min-max normalization")]
    BiasRequiresMinMax,

    /// Color-band thresholds must be strictly increasing.
    #[error("color band thresholds must be strictly increasing (band {index}: {prev} >= {next})")]
    ThresholdOrder { index: usize, prev: f64, next: f64 },

    /// Color-band thresholds must span `[-1, 1]`.
    #[error("color band thresholds must span [-1, 1] (got [{first}, {last}])")]
    ThresholdCoverage { first: f64, last: f64 },

    #[error("color band table is empty")]
    EmptyBandTable,

    /// Either `width` or `height` was zero.
    #[error("raster dimensions must be non-zero (got {width}×{height})")]
    ZeroDimension { width: u32, height: u32 },

    /// One or both dimensions exceeded [`MAX_DIMENSION`](crate::field::MAX_DIMENSION).
    #[error("raster dimensions {width}×{height} exceed MAX_DIMENSION={max}")]
    DimensionTooLarge { width: u32, height: u32, max: u32 },
}
