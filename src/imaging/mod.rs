//! Image transformation in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image::load_from_memory`, `DynamicImage::write_to` (PNG, JPEG, BMP, GIF) |
//! | **Resample** | `resize_exact` with Lanczos3 + `unsharpen` for small downscales |
//! | **Canvas** | solid `ImageBuffer` fill + `imageops::overlay` |
//! | **Data URI** | `base64` standard engine |
//!
//! The module is split into:
//! - **Parameters**: Value types describing a transformation request
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Validation**: Up-front checks on [`TransformSettings`]
//! - **Backend**: [`Resampler`] trait + [`LanczosResampler`], error types
//! - **Canvas**: Background canvases and compositing
//! - **Strategy**: The engine dispatching Fit / Adjust / Expand / Tile / Limit
//! - **Codec**: [`ImageFormat`] table, decode and encode
//! - **Operations**: High-level functions combining codec + engine
//! - **Scaler**: Fluent [`ImageScaler`] convenience API

pub mod backend;
mod calculations;
pub mod canvas;
pub mod codec;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod scaler;
pub mod strategy;
pub mod validation;

pub use backend::{BackendError, Resampler, TransformError};
pub use calculations::{SHARPEN_THRESHOLD, resolve_dimensions, sharpen_for};
pub use canvas::PixelFormat;
pub use codec::ImageFormat;
pub use operations::{output_path, to_data_uri, transform_bytes, transform_file};
pub use params::{
    AspectRatio, Background, Dimensions, LimitAxis, STANDARD_RATIOS, STANDARD_SIZES, Sharpening,
    Size, Strategy, TransformSettings,
};
pub use rust_backend::LanczosResampler;
pub use scaler::ImageScaler;
pub use strategy::transform;
pub use validation::validate;
