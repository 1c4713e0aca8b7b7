//! Upload finished rasters into Bevy's asset system.

use bevy::{
    asset::{Assets, RenderAssetUsages},
    image::{Image, ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor},
    prelude::Handle,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};

use crate::field::{ColorField, SampleField};

/// Build an RGBA8 sRGB image from a row-major buffer of `width * height * 4` bytes.
///
/// Noise rasters are displayed cell-for-pixel, so the sampler is nearest and
/// clamps at the edges; no mipmaps are generated since animated fields are
/// rewritten every frame.
pub fn make_field_image(data: Vec<u8>, width: u32, height: u32) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Nearest,
        ..Default::default()
    });
    image
}

/// Greyscale upload of a scalar field.
pub fn sample_field_to_image(field: &SampleField, images: &mut Assets<Image>) -> Handle<Image> {
    images.add(make_field_image(
        field.to_gray_rgba8(),
        field.width(),
        field.height(),
    ))
}

pub fn color_field_to_image(field: &ColorField, images: &mut Assets<Image>) -> Handle<Image> {
    images.add(make_field_image(
        field.to_rgba8(),
        field.width(),
        field.height(),
    ))
}

/// Replace the pixel data of an existing image.
///
/// Returns `false` if the handle no longer resolves (the image was dropped)
/// or the buffer size does not match the image.
pub fn refresh_image(handle: &Handle<Image>, data: Vec<u8>, images: &mut Assets<Image>) -> bool {
    let Some(mut image) = images.get_mut(handle) else {
        return false;
    };
    let size = image.texture_descriptor.size;
    if data.len() != size.width as usize * size.height as usize * 4 {
        return false;
    }
    image.data = Some(data);
    true
}
