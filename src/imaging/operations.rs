//! High-level image operations.
//!
//! These functions combine the codec with the strategy engine: decode, run
//! [`transform`], encode in the settings' output format. Settings are validated
//! before anything is decoded, so a misconfigured request never touches pixels.

use super::backend::{Resampler, TransformError};
use super::codec::{self, ImageFormat};
use super::params::TransformSettings;
use super::strategy::transform;
use super::validation::validate;
use base64::{Engine as _, engine::general_purpose};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Decode `bytes`, transform, and encode in `settings.format`.
pub fn transform_bytes<R: Resampler + ?Sized>(
    bytes: &[u8],
    settings: &TransformSettings,
    resampler: &R,
) -> Result<Vec<u8>> {
    validate(settings)?;
    let image = codec::decode(bytes)?;
    let output = transform(&image, settings, resampler)?;
    codec::encode(&output, settings.format)
}

/// Where an output named `name` in `format` goes: `<output_dir>/<name>.<ext>`.
pub fn output_path(output_dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", name, format.extension()))
}

/// Write already-transformed `image` to `<output_dir>/<name>.<ext>`.
///
/// Creates the output directory if needed.
pub fn save_image(
    image: &DynamicImage,
    format: ImageFormat,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let bytes = codec::encode(image, format)?;
    fs::create_dir_all(output_dir)?;
    let path = output_path(output_dir, name, format);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Transform the image at `input` and write it as `<output_dir>/<name>.<ext>`.
///
/// Returns the path written.
pub fn transform_file<R: Resampler + ?Sized>(
    input: &Path,
    output_dir: &Path,
    name: &str,
    settings: &TransformSettings,
    resampler: &R,
) -> Result<PathBuf> {
    validate(settings)?;
    let image = codec::open(input)?;
    let output = transform(&image, settings, resampler)?;
    save_image(&output, settings.format, output_dir, name)
}

/// Encode `image` in `format` as a `data:` URI.
pub fn to_data_uri(image: &DynamicImage, format: ImageFormat) -> Result<String> {
    let bytes = codec::encode(image, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        general_purpose::STANDARD.encode(bytes)
    ))
}
