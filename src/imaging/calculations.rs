//! Pure calculation functions for transformation geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Floors are computed with integer arithmetic so results never depend on
//! float rounding (e.g. 400×300 scaled to 200 wide is exactly 150 tall).
//! Every computed dimension is clamped to at least 1 px.

use super::backend::TransformError;
use super::params::{AspectRatio, Dimensions, LimitAxis, Size};

/// Output edges below this size get a sharpening request when downscaled.
pub const SHARPEN_THRESHOLD: u32 = 200;

/// `floor(value * num / den)`, at least 1.
fn scale_floor(value: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

/// Whether a single axis should be sharpened after resampling.
///
/// True iff the axis shrank and ended up below [`SHARPEN_THRESHOLD`].
pub fn needs_sharpening(output: u32, input: u32) -> bool {
    output < input && output < SHARPEN_THRESHOLD
}

/// Sharpening decision for a resample from `input` to `output`: either axis qualifies.
pub fn sharpen_for(output: Size, input: Size) -> bool {
    needs_sharpening(output.width, input.width) || needs_sharpening(output.height, input.height)
}

/// Compute the missing dimension from a ratio.
///
/// - width unset: `width = floor(height * x / y)`
/// - otherwise: `height = floor(width * y / x)` (width wins when both are set)
///
/// # Examples
/// ```
/// # use imgscale::imaging::{AspectRatio, Dimensions, Size, resolve_dimensions};
/// let size = resolve_dimensions(Dimensions::width_only(200), Some(AspectRatio::R4_3)).unwrap();
/// assert_eq!(size, Size::new(200, 150));
/// ```
pub fn resolve_dimensions(
    dimensions: Dimensions,
    ratio: Option<AspectRatio>,
) -> Result<Size, TransformError> {
    let ratio = ratio.ok_or_else(|| {
        TransformError::InvalidConfiguration("target ratio is not set".into())
    })?;
    match (dimensions.width, dimensions.height) {
        (None, None) => Err(TransformError::InvalidConfiguration(
            "at least one of width or height is required".into(),
        )),
        (None, Some(height)) => Ok(Size::new(scale_floor(height, ratio.x(), ratio.y()), height)),
        (Some(width), _) => Ok(Size::new(width, scale_floor(width, ratio.y(), ratio.x()))),
    }
}

/// Whether `a` is relatively wider than `b` (`a.w/a.h > b.w/b.h`), compared exactly.
pub fn is_wider(a: Size, b: Size) -> bool {
    u64::from(a.width) * u64::from(b.height) > u64::from(b.width) * u64::from(a.height)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the input aspect ratio. One dimension matches exactly, the other may exceed.
pub fn fill_dimensions(input: Size, target: Size) -> Size {
    if is_wider(input, target) {
        // Input is wider: height matches, width overflows
        Size::new(
            scale_floor(target.height, input.width, input.height),
            target.height,
        )
    } else {
        // Input is taller (or equal): width matches, height overflows
        Size::new(
            target.width,
            scale_floor(target.width, input.height, input.width),
        )
    }
}

/// Calculate dimensions that fit entirely inside a target area.
///
/// One dimension matches exactly, the other is equal or shorter.
pub fn contain_dimensions(input: Size, target: Size) -> Size {
    if is_wider(input, target) {
        // Borders top and bottom
        Size::new(
            target.width,
            scale_floor(target.width, input.height, input.width),
        )
    } else {
        // Borders left and right
        Size::new(
            scale_floor(target.height, input.width, input.height),
            target.height,
        )
    }
}

/// Offset that centers `inner` within `outer`: `floor((outer - inner) / 2)`.
///
/// Order does not matter; the result is the same for crop and letterbox.
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.abs_diff(inner) / 2
}

/// Output size of the Limit strategy, or `None` when the input is already within the limit.
pub fn limit_dimensions(input: Size, limit: LimitAxis) -> Option<Size> {
    match limit {
        LimitAxis::Width(max) if input.width > max => Some(Size::new(
            max,
            scale_floor(max, input.height, input.width),
        )),
        LimitAxis::Height(max) if input.height > max => Some(Size::new(
            scale_floor(max, input.width, input.height),
            max,
        )),
        _ => None,
    }
}

/// Grid of tile placements covering a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile: Size,
    pub columns: u32,
    pub rows: u32,
}

impl TileGrid {
    /// Top-left corner of every tile, row by row.
    pub fn positions(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |col| {
                (
                    i64::from(col) * i64::from(self.tile.width),
                    i64::from(row) * i64::from(self.tile.height),
                )
            })
        })
    }
}

/// Repeat counts for tiling: `floor(target / tile) + 1` on each axis.
///
/// The extra tile covers any remainder; draws past the edge are clipped.
pub fn tile_grid(tile: Size, target: Size) -> TileGrid {
    TileGrid {
        tile,
        columns: target.width / tile.width + 1,
        rows: target.height / tile.height + 1,
    }
}
