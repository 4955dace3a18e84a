//! Parameter types for image transformations.
//!
//! These types describe *what* to produce, not *how* to produce it. They are
//! the interface between callers (CLI, config file, [`ImageScaler`]) and the
//! [`strategy`](super::strategy) engine that does the pixel work.
//!
//! ## Types
//!
//! - [`AspectRatio`]: Target `x:y` ratio. Both sides positive, checked on construction.
//! - [`Dimensions`]: A possibly-partial target size (width and/or height).
//! - [`Size`]: A fully resolved `width × height` in pixels.
//! - [`LimitAxis`]: The single axis bounded by the Limit strategy.
//! - [`Background`]: RGB fill for letterbox borders and fresh canvases.
//! - [`Strategy`]: The closed set of transformation strategies.
//! - [`Sharpening`]: Unsharp-mask parameters requested from the resampler.
//! - [`TransformSettings`]: The full request handed to the engine. Read-only.
//!
//! [`ImageScaler`]: super::scaler::ImageScaler

use super::backend::TransformError;
use super::codec::ImageFormat;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target width:height ratio.
///
/// The coefficient is always derived from the current `x` and `y`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    x: u32,
    y: u32,
}

impl AspectRatio {
    pub const SQUARE: Self = Self::from_parts(1, 1);
    pub const R3_2: Self = Self::from_parts(3, 2);
    pub const R4_3: Self = Self::from_parts(4, 3);
    pub const R5_3: Self = Self::from_parts(5, 3);
    pub const R5_4: Self = Self::from_parts(5, 4);
    pub const R16_9: Self = Self::from_parts(16, 9);
    /// 16:10, stored reduced as 8:5.
    pub const R16_10: Self = Self::from_parts(8, 5);
    pub const R2_3: Self = Self::from_parts(2, 3);
    pub const R3_4: Self = Self::from_parts(3, 4);
    pub const R3_5: Self = Self::from_parts(3, 5);
    pub const R4_5: Self = Self::from_parts(4, 5);
    pub const R9_16: Self = Self::from_parts(9, 16);
    pub const R10_16: Self = Self::from_parts(10, 16);

    const fn from_parts(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Create a ratio, rejecting zero on either side.
    pub fn new(x: u32, y: u32) -> Result<Self, TransformError> {
        if x == 0 || y == 0 {
            return Err(TransformError::InvalidArgument(format!(
                "aspect ratio {x}:{y} must have positive sides"
            )));
        }
        Ok(Self { x, y })
    }

    /// Ratio of an explicit box, e.g. the target canvas.
    pub fn of(size: Size) -> Result<Self, TransformError> {
        Self::new(size.width, size.height)
    }

    pub fn x(self) -> u32 {
        self.x
    }

    pub fn y(self) -> u32 {
        self.y
    }

    /// Width divided by height.
    pub fn coefficient(self) -> f64 {
        self.x as f64 / self.y as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    /// Parses `W:H`, e.g. `16:9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected W:H, got '{s}'"))?;
        let x: u32 = x.trim().parse().map_err(|_| format!("invalid ratio width '{x}'"))?;
        let y: u32 = y.trim().parse().map_err(|_| format!("invalid ratio height '{y}'"))?;
        Self::new(x, y).map_err(|e| e.to_string())
    }
}

/// Standard ratios, landscape first, then portrait.
pub const STANDARD_RATIOS: &[AspectRatio] = &[
    AspectRatio::SQUARE,
    AspectRatio::R3_2,
    AspectRatio::R4_3,
    AspectRatio::R5_3,
    AspectRatio::R5_4,
    AspectRatio::R16_9,
    AspectRatio::R16_10,
    AspectRatio::R2_3,
    AspectRatio::R3_4,
    AspectRatio::R3_5,
    AspectRatio::R4_5,
    AspectRatio::R9_16,
    AspectRatio::R10_16,
];

/// Standard edge lengths in pixels, usable for either axis.
pub const STANDARD_SIZES: &[u32] = &[
    50, 60, 80, 90, 100, 120, 240, 320, 400, 480, 600, 640, 720, 768, 800, 900, 960, 1024, 1080,
    1200, 1280, 1440, 1920,
];

/// A possibly-partial target size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Dimensions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// Both axes set.
    pub fn exact(width: u32, height: u32) -> Self {
        Self::new(Some(width), Some(height))
    }

    pub fn width_only(width: u32) -> Self {
        Self::new(Some(width), None)
    }

    pub fn height_only(height: u32) -> Self {
        Self::new(None, Some(height))
    }

    /// Number of axes that are set (0, 1 or 2).
    pub fn axes_set(&self) -> usize {
        usize::from(self.width.is_some()) + usize::from(self.height.is_some())
    }
}

impl From<LimitAxis> for Dimensions {
    fn from(axis: LimitAxis) -> Self {
        match axis {
            LimitAxis::Width(w) => Self::width_only(w),
            LimitAxis::Height(h) => Self::height_only(h),
        }
    }
}

/// A fully resolved size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The one axis the Limit strategy caps, with its pixel limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitAxis {
    Width(u32),
    Height(u32),
}

/// Solid RGB fill for borders and new canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Background {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from loosely typed components (config files, CLI).
    ///
    /// Requires exactly three components, each in `0..=255`.
    pub fn from_components(components: &[i64]) -> Result<Self, TransformError> {
        let [r, g, b] = components else {
            return Err(TransformError::InvalidArgument(format!(
                "background needs 3 components, got {}",
                components.len()
            )));
        };
        let channel = |v: i64| {
            u8::try_from(v).map_err(|_| {
                TransformError::InvalidArgument(format!("background component {v} is not in 0-255"))
            })
        };
        Ok(Self::rgb(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Background {
    type Err = String;

    /// Parses `R,G,B`, e.g. `192,205,224`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid color component '{}'", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components).map_err(|e| e.to_string())
    }
}

/// Transformation strategy.
///
/// The set is closed: dispatch is a single `match` in the strategy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Crop-to-fill: cover the target box, crop the overflow centered.
    Fit,
    /// Letterbox/pillarbox: fit inside the target box on a background canvas.
    Adjust,
    /// Resample straight to the target size, ignoring ratio.
    Expand,
    /// Repeat the input as a tile across the canvas, no scaling.
    Tile,
    /// Downscale so one axis is at most the limit; never enlarges.
    Limit,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Fit,
        Strategy::Adjust,
        Strategy::Expand,
        Strategy::Tile,
        Strategy::Limit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Fit => "fit",
            Strategy::Adjust => "adjust",
            Strategy::Expand => "expand",
            Strategy::Tile => "tile",
            Strategy::Limit => "limit",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("unknown strategy '{wanted}' (expected fit, adjust, expand, tile or limit)")
            })
    }
}

/// Sharpening parameters for unsharp mask.
///
/// - `sigma`: Standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: Minimum brightness difference to sharpen (0 = sharpen all pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    /// Mild sharpening for small downscaled output.
    pub fn soft() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

impl Default for Sharpening {
    fn default() -> Self {
        Self::soft()
    }
}

/// A full transformation request.
///
/// Owned by the caller and only ever borrowed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSettings {
    pub dimensions: Dimensions,
    /// Target ratio; required when only one of width/height is set.
    pub ratio: Option<AspectRatio>,
    pub strategy: Option<Strategy>,
    /// Encoding used by the byte/file level operations.
    pub format: ImageFormat,
    pub background: Background,
    /// EXIF-style orientation. Reserved: no strategy reads it.
    pub orientation: u16,
}

impl TransformSettings {
    pub fn new(strategy: Strategy, dimensions: Dimensions) -> Self {
        Self {
            strategy: Some(strategy),
            dimensions,
            ..Self::default()
        }
    }

    pub fn with_ratio(mut self, ratio: AspectRatio) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            ratio: None,
            strategy: None,
            format: ImageFormat::default(),
            background: Background::BLACK,
            orientation: 0,
        }
    }
}
