//! Pure Rust resampling backend.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Resample | `image::DynamicImage::resize_exact` with `Lanczos3` by default |
//! | Sharpening | `image::DynamicImage::unsharpen` |
//!
//! The pixel layout of the input is kept: an RGBA input yields an RGBA output.

use super::backend::{BackendError, Resampler};
use super::params::Sharpening;
use image::DynamicImage;
use image::imageops::FilterType;

/// Resampler built on the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct LanczosResampler {
    filter: FilterType,
    sharpening: Sharpening,
}

impl LanczosResampler {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            sharpening: Sharpening::soft(),
        }
    }

    /// Use a different interpolation filter (e.g. `Triangle` for speed).
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Use different unsharp-mask parameters when sharpening is requested.
    pub fn with_sharpening(mut self, sharpening: Sharpening) -> Self {
        self.sharpening = sharpening;
        self
    }
}

impl Default for LanczosResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler for LanczosResampler {
    fn resample(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        sharpen: bool,
    ) -> Result<DynamicImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot resample to {width}x{height}"
            )));
        }
        let resized = image.resize_exact(width, height, self.filter);
        if sharpen {
            Ok(resized.unsharpen(self.sharpening.sigma, self.sharpening.threshold))
        } else {
            Ok(resized)
        }
    }
}
