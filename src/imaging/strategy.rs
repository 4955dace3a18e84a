//! The strategy engine.
//!
//! Each [`Strategy`] has two entry points:
//!
//! - [`Strategy::process_by_ratio`]: one axis given, the other derived from
//!   the settings' [`AspectRatio`](super::AspectRatio).
//! - [`Strategy::process_by_dimensions`]: both axes given explicitly.
//!
//! [`transform`] validates the settings and picks the entry point. Limit is
//! axis-exclusive and has no ratio form; both entry points route it the same way.
//!
//! Output is always exactly the resolved target size, except for Limit, which
//! returns the input untouched (borrowed, no copy) when it is already within
//! the bound.
//!
//! ```text
//! Fit      resample to cover target ──► crop centered
//! Adjust   resample to fit inside   ──► draw centered on background canvas
//! Expand   resample to target (ratio ignored)
//! Tile     draw input on a grid over the canvas, no resampling
//! Limit    resample bounded axis down to the limit, or return input as is
//! ```

use super::backend::{BackendError, Resampler, TransformError};
use super::calculations::{
    center_offset, contain_dimensions, fill_dimensions, limit_dimensions, resolve_dimensions,
    sharpen_for, tile_grid,
};
use super::canvas::{PixelFormat, draw, new_canvas};
use super::params::{Background, LimitAxis, Size, Strategy, TransformSettings};
use super::validation::{
    Route, require_strategy, route, validate_by_dimensions, validate_by_ratio, validate_limit,
};
use image::DynamicImage;
use std::borrow::Cow;

/// Transform `image` as described by `settings`.
///
/// Settings are only read. Errors are raised before any pixel work when the
/// settings are incomplete or contradictory.
pub fn transform<'a, R: Resampler + ?Sized>(
    image: &'a DynamicImage,
    settings: &TransformSettings,
    resampler: &R,
) -> Result<Cow<'a, DynamicImage>, TransformError> {
    let strategy = require_strategy(settings)?;
    if strategy == Strategy::Limit {
        return strategy.process_by_dimensions(image, settings, resampler);
    }
    match route(settings.dimensions)? {
        Route::ByRatio => strategy.process_by_ratio(image, settings, resampler),
        Route::ByDimensions => strategy.process_by_dimensions(image, settings, resampler),
    }
}

impl Strategy {
    /// Resolve the missing axis from the ratio, then apply the strategy.
    pub fn process_by_ratio<'a, R: Resampler + ?Sized>(
        self,
        image: &'a DynamicImage,
        settings: &TransformSettings,
        resampler: &R,
    ) -> Result<Cow<'a, DynamicImage>, TransformError> {
        if self == Strategy::Limit {
            return self.process_by_dimensions(image, settings, resampler);
        }
        validate_by_ratio(settings)?;
        let target = resolve_dimensions(settings.dimensions, settings.ratio)?;
        self.render(image, target, settings, resampler)
    }

    /// Apply the strategy to the explicit width × height in `settings`.
    pub fn process_by_dimensions<'a, R: Resampler + ?Sized>(
        self,
        image: &'a DynamicImage,
        settings: &TransformSettings,
        resampler: &R,
    ) -> Result<Cow<'a, DynamicImage>, TransformError> {
        if self == Strategy::Limit {
            let axis = validate_limit(settings)?;
            check_input(image)?;
            return limit(image, axis, resampler);
        }
        let target = validate_by_dimensions(settings)?;
        self.render(image, target, settings, resampler)
    }

    fn render<'a, R: Resampler + ?Sized>(
        self,
        image: &'a DynamicImage,
        target: Size,
        settings: &TransformSettings,
        resampler: &R,
    ) -> Result<Cow<'a, DynamicImage>, TransformError> {
        check_input(image)?;
        let output = match self {
            Strategy::Fit => fit(image, target, resampler)?,
            Strategy::Adjust => adjust(image, target, settings.background, resampler)?,
            Strategy::Expand => expand(image, target, resampler)?,
            Strategy::Tile => tile(image, target, settings.background)?,
            Strategy::Limit => return limit(image, validate_limit(settings)?, resampler),
        };
        Ok(Cow::Owned(output))
    }
}

fn check_input(image: &DynamicImage) -> Result<(), TransformError> {
    let input = Size::of(image);
    if input.width == 0 || input.height == 0 {
        return Err(TransformError::InvalidArgument(format!(
            "input image is {input}, nothing to transform"
        )));
    }
    Ok(())
}

/// Resample to exactly `size`, requesting sharpening for small downscales.
fn resample<R: Resampler + ?Sized>(
    resampler: &R,
    image: &DynamicImage,
    size: Size,
) -> Result<DynamicImage, TransformError> {
    let sharpen = sharpen_for(size, Size::of(image));
    let resampled = resampler
        .resample(image, size.width, size.height, sharpen)
        .map_err(TransformError::Resampler)?;
    let actual = Size::of(&resampled);
    if actual != size {
        return Err(TransformError::Resampler(BackendError::ProcessingFailed(
            format!("resampler returned {actual}, expected {size}"),
        )));
    }
    Ok(resampled)
}

/// Crop-to-fill: cover the target, then cut the overflow centered.
fn fit<R: Resampler + ?Sized>(
    image: &DynamicImage,
    target: Size,
    resampler: &R,
) -> Result<DynamicImage, TransformError> {
    let covering = fill_dimensions(Size::of(image), target);
    let scaled = resample(resampler, image, covering)?;
    let x = center_offset(covering.width, target.width);
    let y = center_offset(covering.height, target.height);
    Ok(scaled.crop_imm(x, y, target.width, target.height))
}

/// Letterbox/pillarbox: fit inside the target, centered on a background canvas.
fn adjust<R: Resampler + ?Sized>(
    image: &DynamicImage,
    target: Size,
    background: Background,
    resampler: &R,
) -> Result<DynamicImage, TransformError> {
    let contained = contain_dimensions(Size::of(image), target);
    let scaled = resample(resampler, image, contained)?;
    let mut canvas = new_canvas(target, PixelFormat::of(image), background)?;
    let x = center_offset(target.width, contained.width);
    let y = center_offset(target.height, contained.height);
    draw(&mut canvas, &scaled, i64::from(x), i64::from(y));
    Ok(canvas)
}

fn expand<R: Resampler + ?Sized>(
    image: &DynamicImage,
    target: Size,
    resampler: &R,
) -> Result<DynamicImage, TransformError> {
    resample(resampler, image, target)
}

/// Repeat the input over the canvas without scaling; the last row and column are clipped.
fn tile(
    image: &DynamicImage,
    target: Size,
    background: Background,
) -> Result<DynamicImage, TransformError> {
    let mut canvas = new_canvas(target, PixelFormat::of(image), background)?;
    let grid = tile_grid(Size::of(image), target);
    for (x, y) in grid.positions() {
        draw(&mut canvas, image, x, y);
    }
    Ok(canvas)
}

/// Downscale so the bounded axis equals the limit; never upscales.
fn limit<'a, R: Resampler + ?Sized>(
    image: &'a DynamicImage,
    axis: LimitAxis,
    resampler: &R,
) -> Result<Cow<'a, DynamicImage>, TransformError> {
    match limit_dimensions(Size::of(image), axis) {
        Some(size) => Ok(Cow::Owned(resample(resampler, image, size)?)),
        None => Ok(Cow::Borrowed(image)),
    }
}
