//! Background generation of static noise and terrain fields.
//!
//! A full terrain raster at a few hundred pixels per side takes long enough
//! to stall a frame, so static scenes hand the work to a private, bounded
//! [`rayon`] pool.  When a task finishes, [`poll_field_tasks`] uploads the
//! pixels to [`Assets<Image>`] and the entity receives [`FieldReady`].
//!
//! # Usage
//! ```rust,ignore
//! commands.spawn(PendingField::noise(FractalConfig::default(), 7, 512, 512));
//! commands.spawn(PendingField::terrain(
//!     FractalConfig::island(),
//!     TerrainShader::default(),
//!     7,
//!     512,
//!     512,
//! ));
//! // Later, query for FieldReady to consume the handle.
//! ```

/// Maximum number of field generation tasks that run concurrently.
const MAX_GENERATION_THREADS: usize = 4;

/// Returns the library-private rayon pool used for field generation.
///
/// Kept apart from the global rayon pool so background fields never starve
/// the application's own parallel work, and so the row-parallel evaluator
/// inside a task is capped at the same thread count.
fn gen_pool() -> &'static rayon::ThreadPool {
    static POOL: OnceLock<rayon::ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(MAX_GENERATION_THREADS)
            .thread_name(|i| format!("noise-field-{i}"))
            .build()
            .expect("failed to build noise field thread pool")
    })
}

use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use bevy::{
    asset::Assets,
    ecs::{
        component::Component,
        entity::Entity,
        system::{Commands, Query, ResMut},
    },
    image::Image,
    prelude::Handle,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::FractalConfig,
    error::NoiseError,
    image::make_field_image,
    octave::OctaveSet,
    raster::RasterEvaluator,
    terrain::TerrainShader,
};

/// RGBA8 pixels of a finished field.
pub struct FieldPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Build and evaluate a greyscale field on the calling thread.
pub fn generate_noise_pixels(
    config: FractalConfig,
    seed: u64,
    width: u32,
    height: u32,
) -> Result<FieldPixels, NoiseError> {
    let raster = RasterEvaluator::new(width, height)?;
    let set = OctaveSet::generate(config, &mut StdRng::seed_from_u64(seed))?;
    Ok(FieldPixels {
        rgba: raster.evaluate_par(&set).to_gray_rgba8(),
        width,
        height,
    })
}

/// Build, evaluate and color a terrain field on the calling thread.
pub fn generate_terrain_pixels(
    config: FractalConfig,
    shader: &TerrainShader,
    seed: u64,
    width: u32,
    height: u32,
) -> Result<FieldPixels, NoiseError> {
    let raster = RasterEvaluator::new(width, height)?;
    let set = OctaveSet::generate(config, &mut StdRng::seed_from_u64(seed))?;
    Ok(FieldPixels {
        rgba: raster.evaluate_colors_par(&set, shader).to_rgba8(),
        width,
        height,
    })
}

/// Spawned onto an entity to request background field generation.
///
/// Dropping `PendingField` (e.g. when the scene's entities are despawned)
/// sets a cancellation flag; tasks that have not started yet exit without
/// doing any work.
#[derive(Component)]
pub struct PendingField {
    // Wrapped in Mutex so the struct is Sync, which Bevy's Component bound requires.
    pub(crate) rx: std::sync::Mutex<mpsc::Receiver<Result<FieldPixels, NoiseError>>>,
    cancelled: Arc<AtomicBool>,
}

impl Drop for PendingField {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

fn spawn_task<F>(f: F) -> PendingField
where
    F: FnOnce() -> Result<FieldPixels, NoiseError> + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let (tx, rx) = mpsc::sync_channel(1);
    gen_pool().spawn(move || {
        if !flag.load(Ordering::Relaxed) {
            tx.send(f()).ok();
        }
    });
    PendingField {
        rx: std::sync::Mutex::new(rx),
        cancelled,
    }
}

impl PendingField {
    /// Greyscale fractal noise at `width × height`.
    pub fn noise(config: FractalConfig, seed: u64, width: u32, height: u32) -> Self {
        spawn_task(move || generate_noise_pixels(config, seed, width, height))
    }

    /// Colored terrain at `width × height`.
    pub fn terrain(
        config: FractalConfig,
        shader: TerrainShader,
        seed: u64,
        width: u32,
        height: u32,
    ) -> Self {
        spawn_task(move || generate_terrain_pixels(config, &shader, seed, width, height))
    }
}

/// Added to the entity by [`poll_field_tasks`] when generation is complete.
#[derive(Component)]
pub struct FieldReady(pub Handle<Image>);

/// Bevy system: polls pending generation tasks and uploads finished fields.
pub fn poll_field_tasks(
    mut commands: Commands,
    tasks: Query<(Entity, &PendingField)>,
    mut images: ResMut<Assets<Image>>,
) {
    for (entity, pending) in &tasks {
        let poll = pending
            .rx
            .lock()
            .expect("field thread poisoned")
            .try_recv();
        match poll {
            Ok(Ok(pixels)) => {
                let handle = images.add(make_field_image(pixels.rgba, pixels.width, pixels.height));
                commands
                    .entity(entity)
                    .remove::<PendingField>()
                    .insert(FieldReady(handle));
            }
            Ok(Err(e)) => {
                bevy::log::error!("Field generation failed: {e}");
                commands.entity(entity).remove::<PendingField>();
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                bevy::log::error!("Field generation thread panicked");
                commands.entity(entity).remove::<PendingField>();
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn noise_pixels_are_seed_stable() {
        let a = generate_noise_pixels(FractalConfig::default(), 3, 32, 16).unwrap();
        let b = generate_noise_pixels(FractalConfig::default(), 3, 32, 16).unwrap();
        assert_eq!(a.rgba.len(), 32 * 16 * 4);
        assert_eq!(a.rgba, b.rgba);
    }

    #[test]
    fn invalid_requests_surface_errors() {
        assert!(matches!(
            generate_noise_pixels(FractalConfig::default(), 0, 0, 16),
            Err(NoiseError::ZeroDimension { .. })
        ));
        let bad = FractalConfig {
            persistence: -1.0,
            ..FractalConfig::default()
        };
        assert!(generate_terrain_pixels(bad, &TerrainShader::default(), 0, 8, 8).is_err());
    }

    #[test]
    fn background_task_delivers() {
        let pending = PendingField::terrain(
            FractalConfig::island(),
            TerrainShader::default(),
            11,
            24,
            24,
        );
        let result = pending
            .rx
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(30))
            .expect("task did not finish");
        let pixels = result.unwrap();
        assert_eq!((pixels.width, pixels.height), (24, 24));
        assert!(pixels.rgba.chunks(4).all(|p| p[3] == 255));
    }
}
