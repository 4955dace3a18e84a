//! Resampling backend trait and the error taxonomy.
//!
//! The [`Resampler`] trait is the one seam between the strategy engine and
//! pixel-level filtering. The engine decides *what size* and *whether to
//! sharpen*; the resampler decides how.
//!
//! The production implementation is
//! [`LanczosResampler`](super::rust_backend::LanczosResampler). Tests use a
//! recording mock that produces solid images of the requested size.

use image::DynamicImage;
use thiserror::Error;

/// Failure reported by an external collaborator.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Every way a transformation can fail. All of them are fatal to the call.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Strategy missing, dimension/ratio combination missing, or Limit given both/neither axis.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Non-positive size, zero ratio side, malformed background color.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Resampler failed: {0}")]
    Resampler(#[source] BackendError),
    #[error("Compositor failed: {0}")]
    Compositor(String),
    #[error("Codec error: {0}")]
    Codec(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pixel resampling collaborator.
///
/// Must return an image of exactly `width × height`. `sharpen` is advisory:
/// implementations choose how (or whether) to apply a mild unsharp pass.
pub trait Resampler: Sync {
    fn resample(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        sharpen: bool,
    ) -> Result<DynamicImage, BackendError>;
}
