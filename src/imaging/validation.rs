//! Settings validation.
//!
//! Every check here runs before any pixel work, so a failing call never
//! produces partial output. Order: strategy present, sizes positive, then the
//! per-strategy dimension/ratio rules:
//!
//! | Strategy | Route | Required | Forbidden |
//! |---|---|---|---|
//! | Fit, Adjust, Expand, Tile | ratio | one of width/height, ratio | |
//! | Fit, Adjust, Expand, Tile | dimensions | width and height | |
//! | Limit | limit | exactly one of width/height | both, neither |

use super::backend::TransformError;
use super::params::{Dimensions, LimitAxis, Size, Strategy, TransformSettings};

/// Which entry point a request goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// One axis given, the other derived from the ratio.
    ByRatio,
    /// Both axes given.
    ByDimensions,
}

pub fn require_strategy(settings: &TransformSettings) -> Result<Strategy, TransformError> {
    settings.strategy.ok_or_else(|| {
        TransformError::InvalidConfiguration("image processing strategy is not set".into())
    })
}

/// Reject explicitly set zero sizes.
pub fn check_positive(dimensions: Dimensions) -> Result<(), TransformError> {
    if dimensions.width == Some(0) {
        return Err(TransformError::InvalidArgument(
            "output width must be positive".into(),
        ));
    }
    if dimensions.height == Some(0) {
        return Err(TransformError::InvalidArgument(
            "output height must be positive".into(),
        ));
    }
    Ok(())
}

/// Pick the entry point: both axes → dimensions, one axis → ratio.
pub fn route(dimensions: Dimensions) -> Result<Route, TransformError> {
    match dimensions.axes_set() {
        2 => Ok(Route::ByDimensions),
        1 => Ok(Route::ByRatio),
        _ => Err(TransformError::InvalidConfiguration(
            "target dimensions are not set".into(),
        )),
    }
}

/// Preconditions of the ratio entry point.
pub fn validate_by_ratio(settings: &TransformSettings) -> Result<(), TransformError> {
    check_positive(settings.dimensions)?;
    if settings.dimensions.axes_set() == 0 {
        return Err(TransformError::InvalidConfiguration(
            "at least one of width or height is required".into(),
        ));
    }
    if settings.ratio.is_none() {
        return Err(TransformError::InvalidConfiguration(
            "target ratio is not set".into(),
        ));
    }
    Ok(())
}

/// Preconditions of the dimensions entry point; returns the target size.
pub fn validate_by_dimensions(settings: &TransformSettings) -> Result<Size, TransformError> {
    check_positive(settings.dimensions)?;
    match (settings.dimensions.width, settings.dimensions.height) {
        (Some(width), Some(height)) => Ok(Size::new(width, height)),
        _ => Err(TransformError::InvalidConfiguration(
            "both width and height are required".into(),
        )),
    }
}

/// Preconditions of the Limit strategy; returns the bounded axis.
pub fn validate_limit(settings: &TransformSettings) -> Result<LimitAxis, TransformError> {
    check_positive(settings.dimensions)?;
    match (settings.dimensions.width, settings.dimensions.height) {
        (Some(width), None) => Ok(LimitAxis::Width(width)),
        (None, Some(height)) => Ok(LimitAxis::Height(height)),
        (Some(_), Some(_)) => Err(TransformError::InvalidConfiguration(
            "limit takes width or height, not both".into(),
        )),
        (None, None) => Err(TransformError::InvalidConfiguration(
            "limit requires width or height".into(),
        )),
    }
}

/// Full up-front check of a request, as the engine will run it.
pub fn validate(settings: &TransformSettings) -> Result<Strategy, TransformError> {
    let strategy = require_strategy(settings)?;
    if strategy == Strategy::Limit {
        validate_limit(settings)?;
        return Ok(strategy);
    }
    check_positive(settings.dimensions)?;
    match route(settings.dimensions)? {
        Route::ByRatio => validate_by_ratio(settings)?,
        Route::ByDimensions => {
            validate_by_dimensions(settings)?;
        }
    }
    Ok(strategy)
}
