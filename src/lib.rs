//! # imgscale
//!
//! Resize images to a target box. One request names a [`Strategy`] and a
//! target size; the engine does the geometry and hands pixel resampling to a
//! pluggable [`Resampler`].
//!
//! [`Strategy`]: imaging::Strategy
//! [`Resampler`]: imaging::Resampler
//!
//! # Strategies
//!
//! ```text
//! input 400x300, target 200x200
//!
//! fit      266x200 resample → crop 33px off each side       → 200x200, no bars
//! adjust   200x150 resample → centered at y=25 on background → 200x200, bars
//! expand   200x200 resample                                   → 200x200, distorted
//! tile     input drawn at (0,0), (400,0), ... clipped         → 200x200
//! limit    width ≤ 200: 200x150 resample, smaller inputs pass through unchanged
//! ```
//!
//! A target may be given as width × height, or as one axis plus an
//! [`AspectRatio`](imaging::AspectRatio) from which the other axis is derived.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Strategy engine, geometry, canvas, codec, fluent [`ImageScaler`](imaging::ImageScaler) |
//! | [`config`] | `imgscale.toml` loading, validation, merging onto stock defaults |
//! | [`batch`] | Parallel directory transformation with progress events and a JSON report |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Settings Are Read-Only
//!
//! The engine takes [`TransformSettings`](imaging::TransformSettings) by shared
//! reference. A ratio derived from explicit dimensions is a local value, so
//! one settings value can drive any number of transformations, in parallel,
//! with the same result for the same input.
//!
//! ## Integer Geometry
//!
//! Every derived dimension is `floor(a * b / c)` in 64-bit integers, clamped
//! to at least 1 px. Results never depend on float rounding.
//!
//! ## Validate Before Pixels
//!
//! A missing strategy, a missing ratio, or a Limit request with both axes is
//! reported before anything is decoded or resampled.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
