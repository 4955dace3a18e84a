//! Fluent convenience API over the strategy engine.
//!
//! ```no_run
//! # use imgscale::imaging::{ImageFormat, ImageScaler};
//! # use std::path::Path;
//! # fn main() -> Result<(), imgscale::imaging::TransformError> {
//! let path = ImageScaler::open(Path::new("photo.jpg"))?
//!     .fit(200, 200)?
//!     .save_as(ImageFormat::Png, Path::new("out"), "thumb")?;
//! # Ok(())
//! # }
//! ```
//!
//! Every strategy call transforms the scaler's source image, never a previous
//! output, so `scaler.fit(..)?.adjust(..)?` yields the adjusted original.

use super::backend::{Resampler, TransformError};
use super::codec::{self, ImageFormat};
use super::operations;
use super::params::{Background, Dimensions, LimitAxis, Strategy, TransformSettings};
use super::rust_backend::LanczosResampler;
use super::strategy::transform;
use image::DynamicImage;
use std::path::{Path, PathBuf};

pub struct ImageScaler<R = LanczosResampler> {
    source: DynamicImage,
    output: Option<DynamicImage>,
    resampler: R,
}

impl ImageScaler<LanczosResampler> {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            source: image,
            output: None,
            resampler: LanczosResampler::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransformError> {
        Ok(Self::new(codec::decode(bytes)?))
    }

    pub fn open(path: &Path) -> Result<Self, TransformError> {
        Ok(Self::new(codec::open(path)?))
    }
}

impl<R: Resampler> ImageScaler<R> {
    /// Swap the resampler; any output produced so far is kept.
    pub fn with_resampler<S: Resampler>(self, resampler: S) -> ImageScaler<S> {
        ImageScaler {
            source: self.source,
            output: self.output,
            resampler,
        }
    }

    /// Crop-to-fill to exactly `width × height`.
    pub fn fit(self, width: u32, height: u32) -> Result<Self, TransformError> {
        self.apply(Strategy::Fit, Dimensions::exact(width, height), Background::WHITE)
    }

    /// Letterbox into `width × height` on white.
    pub fn adjust(self, width: u32, height: u32) -> Result<Self, TransformError> {
        self.adjust_with_background(width, height, Background::WHITE)
    }

    pub fn adjust_with_background(
        self,
        width: u32,
        height: u32,
        background: Background,
    ) -> Result<Self, TransformError> {
        self.apply(Strategy::Adjust, Dimensions::exact(width, height), background)
    }

    /// Resample to `width × height`, ignoring the aspect ratio.
    pub fn expand(self, width: u32, height: u32) -> Result<Self, TransformError> {
        self.apply(Strategy::Expand, Dimensions::exact(width, height), Background::WHITE)
    }

    /// Downscale so the bounded axis fits; smaller images pass through unchanged.
    pub fn limit(self, axis: LimitAxis) -> Result<Self, TransformError> {
        self.apply(Strategy::Limit, Dimensions::from(axis), Background::WHITE)
    }

    /// Repeat the source over a `width × height` canvas.
    pub fn tile(self, width: u32, height: u32) -> Result<Self, TransformError> {
        self.apply(Strategy::Tile, Dimensions::exact(width, height), Background::WHITE)
    }

    fn apply(
        mut self,
        strategy: Strategy,
        dimensions: Dimensions,
        background: Background,
    ) -> Result<Self, TransformError> {
        let settings = TransformSettings::new(strategy, dimensions).with_background(background);
        let output = transform(&self.source, &settings, &self.resampler)?.into_owned();
        self.output = Some(output);
        Ok(self)
    }

    /// The latest output, or the source if no strategy has run yet.
    pub fn image(&self) -> &DynamicImage {
        self.output.as_ref().unwrap_or(&self.source)
    }

    pub fn into_image(self) -> DynamicImage {
        self.output.unwrap_or(self.source)
    }

    pub fn to_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, TransformError> {
        codec::encode(self.image(), format)
    }

    /// Write `<dir>/<name>.<ext>` and return its path.
    pub fn save_as(
        &self,
        format: ImageFormat,
        dir: &Path,
        name: &str,
    ) -> Result<PathBuf, TransformError> {
        operations::save_image(self.image(), format, dir, name)
    }

    pub fn to_data_uri(&self, format: ImageFormat) -> Result<String, TransformError> {
        operations::to_data_uri(self.image(), format)
    }
}
