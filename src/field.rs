//! Dense row-major output rasters.

use crate::{error::NoiseError, terrain::Rgb};

/// Maximum allowed raster dimension (per side).
///
/// Every animated frame recomputes the whole raster, so 4096² (~16.8 M cells
/// times the octave count) is already far past interactive rates.
pub const MAX_DIMENSION: u32 = 4096;

/// Dimension guard shared by every raster constructor.
#[inline]
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), NoiseError> {
    if width == 0 || height == 0 {
        return Err(NoiseError::ZeroDimension { width, height });
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(NoiseError::DimensionTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Scalar noise values, one per cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleField {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl SampleField {
    /// Wrap an existing buffer.  `values.len()` must equal `width * height`.
    pub(crate) fn from_values(width: u32, height: u32, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        Self {
            width,
            height,
            values,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Greyscale RGBA8: `floor(255 · (v + 1) / 2)` in every colour channel.
    pub fn to_gray_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.values.len() * 4);
        for &v in &self.values {
            let g = to_gray(v);
            out.extend_from_slice(&[g, g, g, 255]);
        }
        out
    }
}

/// Map a value in `[-1, 1]` to a grey level.
#[inline]
pub fn to_gray(v: f64) -> u8 {
    (255.0 * (v + 1.0) / 2.0).clamp(0.0, 255.0) as u8
}

/// One colour per cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorField {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ColorField {
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Opaque RGBA8, ready for an `Rgba8UnormSrgb` image.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &[r, g, b] in &self.pixels {
            out.extend_from_slice(&[r, g, b, 255]);
        }
        out
    }
}
