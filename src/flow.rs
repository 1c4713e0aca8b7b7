//! Animated "flowing" noise.
//!
//! A [`FlowField`] owns everything one animated scene needs: its lattices, a
//! raster evaluator, a tick clock and the image it draws into.  Each frame
//! [`animate_flow_fields`] rotates the gradients, re-evaluates the whole
//! raster and rewrites the image, strictly in that order.

use bevy::{
    asset::Assets,
    ecs::{
        component::Component,
        system::{Query, Res, ResMut},
    },
    image::Image,
    log::{debug, warn},
    prelude::Handle,
    time::Time,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::FractalConfig,
    error::NoiseError,
    image::{make_field_image, refresh_image},
    octave::OctaveSet,
    raster::RasterEvaluator,
    rotator::{OctaveRotator, TickClock},
    terrain::TerrainShader,
};

#[derive(Component)]
pub struct FlowField {
    set: OctaveSet,
    raster: RasterEvaluator,
    clock: TickClock,
    shader: Option<TerrainShader>,
    image: Handle<Image>,
    /// While paused, ticks are discarded and the image is left untouched.
    pub paused: bool,
}

impl FlowField {
    /// Build the lattices from `seed`, render the first greyscale frame and
    /// upload it.
    pub fn new(
        config: FractalConfig,
        seed: u64,
        width: u32,
        height: u32,
        images: &mut Assets<Image>,
    ) -> Result<Self, NoiseError> {
        Self::build(config, None, seed, width, height, images)
    }

    /// Like [`new`](Self::new), but every frame, the first included, is
    /// colored through `shader`.
    pub fn terrain(
        config: FractalConfig,
        shader: TerrainShader,
        seed: u64,
        width: u32,
        height: u32,
        images: &mut Assets<Image>,
    ) -> Result<Self, NoiseError> {
        Self::build(config, Some(shader), seed, width, height, images)
    }

    fn build(
        config: FractalConfig,
        shader: Option<TerrainShader>,
        seed: u64,
        width: u32,
        height: u32,
        images: &mut Assets<Image>,
    ) -> Result<Self, NoiseError> {
        let raster = RasterEvaluator::new(width, height)?;
        let set = OctaveSet::generate(config, &mut StdRng::seed_from_u64(seed))?;
        let mut field = Self {
            set,
            raster,
            clock: TickClock::default(),
            shader,
            image: Handle::default(),
            paused: false,
        };
        field.image = images.add(make_field_image(field.render(), width, height));
        debug!(
            "flow field {width}×{height} with {} octaves{}",
            field.set.octave_count(),
            if field.shader.is_some() { ", shaded" } else { "" }
        );
        Ok(field)
    }

    /// Swap the shader (or drop it for greyscale) and redraw the current
    /// state into the image right away.  Returns `false` if the image asset
    /// no longer exists.
    pub fn set_shader(&mut self, shader: Option<TerrainShader>, images: &mut Assets<Image>) -> bool {
        self.shader = shader;
        refresh_image(&self.image, self.render(), images)
    }

    pub fn with_clock(mut self, clock: TickClock) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn image(&self) -> &Handle<Image> {
        &self.image
    }

    #[inline]
    pub fn octaves(&self) -> &OctaveSet {
        &self.set
    }

    /// Shift the pan offset; takes effect on the next rendered frame.
    /// Rotation goes through [`step`](Self::step).
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<(), NoiseError> {
        self.set.pan_by(dx, dy)
    }

    /// RGBA8 pixels of the current state.
    pub fn render(&self) -> Vec<u8> {
        match &self.shader {
            Some(shader) => self.raster.evaluate_colors_par(&self.set, shader).to_rgba8(),
            None => self.raster.evaluate_par(&self.set).to_gray_rgba8(),
        }
    }

    /// Advance by `dt` seconds.  Returns the new frame when at least one tick
    /// elapsed, `None` otherwise.
    pub fn step(&mut self, dt: f64) -> Option<Vec<u8>> {
        let ticks = self.clock.ticks(dt);
        if ticks == 0 || self.paused {
            return None;
        }
        OctaveRotator::advance_ticks(&mut self.set, ticks);
        Some(self.render())
    }
}

/// Bevy system: animates every [`FlowField`] and refreshes its image.
pub fn animate_flow_fields(
    time: Res<Time>,
    mut fields: Query<&mut FlowField>,
    mut images: ResMut<Assets<Image>>,
) {
    let dt = time.delta_secs_f64();
    for mut field in &mut fields {
        let Some(frame) = field.step(dt) else {
            continue;
        };
        if !refresh_image(field.image(), frame, &mut images) {
            warn!("flow field image is gone; pausing");
            field.paused = true;
        }
    }
}
