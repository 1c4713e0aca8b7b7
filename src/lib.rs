//! `bevy_symbios_flow`: animated gradient-lattice noise for Bevy.
//!
//! # Architecture
//! The core is plain CPU code with no Bevy types in the hot path:
//! [`OctaveSet`] holds one [`GradientLattice`] of unit gradients per octave,
//! [`fractal::composite`] sums quintic-interpolated samples across octaves,
//! [`OctaveRotator`] swirls the gradients between frames, and
//! [`RasterEvaluator`] recomputes a whole [`SampleField`] per call (serially
//! or row-parallel, bit-identical either way).  [`TerrainShader`] turns a
//! field into island colours through a [`ColorBandTable`].
//!
//! The Bevy side only moves pixels: [`FlowField`] animates a field into an
//! `Image` every frame, and [`async_gen::PendingField`] builds static fields
//! on a background pool.

pub mod async_gen;
pub mod config;
pub mod error;
pub mod field;
pub mod flow;
pub mod fractal;
pub mod image;
pub mod lattice;
pub mod layer;
pub mod octave;
pub mod raster;
pub mod rotator;
pub mod sampler;
pub mod shape;
pub mod terrain;
pub mod trajectory;

pub use config::{FractalConfig, Normalization};
pub use error::NoiseError;
pub use field::{ColorField, SampleField};
pub use flow::FlowField;
pub use lattice::GradientLattice;
pub use octave::OctaveSet;
pub use raster::RasterEvaluator;
pub use rotator::{OctaveRotator, TickClock};
pub use terrain::{ColorBandTable, RadialBias, TerrainShader};
pub use trajectory::{CircleTrajectory, PathTrajectory};

use bevy::prelude::*;

/// Bevy plugin: registers background-field polling and flow animation.
pub struct SymbiosFlowPlugin;

impl Plugin for SymbiosFlowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (async_gen::poll_field_tasks, flow::animate_flow_fields),
        );
    }
}
