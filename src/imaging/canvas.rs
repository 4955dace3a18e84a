//! Canvas allocation and compositing.
//!
//! A canvas is a freshly allocated, solid-filled image that scaled or tiled
//! content is drawn onto. Drawing clips silently at the canvas edges, so
//! callers may place images at any offset, including partly off-canvas.

use super::backend::TransformError;
use super::params::{Background, Size};
use image::{ColorType, DynamicImage, Rgb, RgbImage, imageops};

/// Pixel layout of a canvas.
///
/// `Unspecified` stands for a layout the compositor has no canvas for (e.g.
/// float buffers). It is resolved to [`PixelFormat::DEFAULT`] before
/// allocation and never reaches the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Unspecified,
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
}

impl PixelFormat {
    /// Concrete stand-in for `Unspecified`: 24-bit RGB.
    pub const DEFAULT: Self = PixelFormat::Rgb8;

    /// Pixel format of a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 => PixelFormat::L8,
            ColorType::La8 => PixelFormat::La8,
            ColorType::Rgb8 => PixelFormat::Rgb8,
            ColorType::Rgba8 => PixelFormat::Rgba8,
            ColorType::L16 => PixelFormat::L16,
            ColorType::La16 => PixelFormat::La16,
            ColorType::Rgb16 => PixelFormat::Rgb16,
            ColorType::Rgba16 => PixelFormat::Rgba16,
            _ => PixelFormat::Unspecified,
        }
    }

    /// Replace `Unspecified` with [`PixelFormat::DEFAULT`].
    pub fn resolve(self) -> Self {
        match self {
            PixelFormat::Unspecified => Self::DEFAULT,
            concrete => concrete,
        }
    }
}

/// Allocate a `size` canvas in `format`, filled with `background`.
///
/// Alpha channels, where present, are fully opaque.
pub fn new_canvas(
    size: Size,
    format: PixelFormat,
    background: Background,
) -> Result<DynamicImage, TransformError> {
    if size.width == 0 || size.height == 0 {
        return Err(TransformError::Compositor(format!(
            "cannot allocate a {size} canvas"
        )));
    }
    let fill = RgbImage::from_pixel(size.width, size.height, Rgb(background.to_array()));
    let rgb = DynamicImage::ImageRgb8(fill);
    let canvas = match format.resolve() {
        PixelFormat::Rgb8 | PixelFormat::Unspecified => rgb,
        PixelFormat::Rgba8 => DynamicImage::ImageRgba8(rgb.to_rgba8()),
        PixelFormat::L8 => DynamicImage::ImageLuma8(rgb.to_luma8()),
        PixelFormat::La8 => DynamicImage::ImageLumaA8(rgb.to_luma_alpha8()),
        PixelFormat::L16 => DynamicImage::ImageLuma16(rgb.to_luma16()),
        PixelFormat::La16 => DynamicImage::ImageLumaA16(rgb.to_luma_alpha16()),
        PixelFormat::Rgb16 => DynamicImage::ImageRgb16(rgb.to_rgb16()),
        PixelFormat::Rgba16 => DynamicImage::ImageRgba16(rgb.to_rgba16()),
    };
    Ok(canvas)
}

/// Draw `image` onto `canvas` with its top-left corner at `(x, y)`.
///
/// `image` is converted to the canvas layout first, so 16-bit canvases keep
/// full precision. Pixels falling outside the canvas are dropped. Alpha is
/// blended.
pub fn draw(canvas: &mut DynamicImage, image: &DynamicImage, x: i64, y: i64) {
    macro_rules! overlay_as {
        ($bottom:expr, $as_layout:ident, $to_layout:ident) => {
            match image.$as_layout() {
                Some(top) => imageops::overlay($bottom, top, x, y),
                None => imageops::overlay($bottom, &image.$to_layout(), x, y),
            }
        };
    }

    match canvas {
        DynamicImage::ImageLuma8(bottom) => overlay_as!(bottom, as_luma8, to_luma8),
        DynamicImage::ImageLumaA8(bottom) => overlay_as!(bottom, as_luma_alpha8, to_luma_alpha8),
        DynamicImage::ImageRgb8(bottom) => overlay_as!(bottom, as_rgb8, to_rgb8),
        DynamicImage::ImageRgba8(bottom) => overlay_as!(bottom, as_rgba8, to_rgba8),
        DynamicImage::ImageLuma16(bottom) => overlay_as!(bottom, as_luma16, to_luma16),
        DynamicImage::ImageLumaA16(bottom) => {
            overlay_as!(bottom, as_luma_alpha16, to_luma_alpha16)
        }
        DynamicImage::ImageRgb16(bottom) => overlay_as!(bottom, as_rgb16, to_rgb16),
        DynamicImage::ImageRgba16(bottom) => overlay_as!(bottom, as_rgba16, to_rgba16),
        // new_canvas never allocates float layouts
        other => imageops::overlay(other, image, x, y),
    }
}
