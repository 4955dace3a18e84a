//! End-to-end strategy behavior with the production resampler.
//!
//! Unit tests in `src/imaging/strategy.rs` use a recording mock; these run the
//! real Lanczos path so sizes, bars, and tiling are checked on actual pixels.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use imgscale::imaging::{
    AspectRatio, Background, Dimensions, LanczosResampler, Strategy, TransformError,
    TransformSettings, transform,
};
use rayon::prelude::*;
use std::borrow::Cow;

fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

fn exact(strategy: Strategy, width: u32, height: u32) -> TransformSettings {
    TransformSettings::new(strategy, Dimensions::exact(width, height))
}

// =========================================================================
// Concrete scenarios
// =========================================================================

#[test]
fn fit_400x300_to_square_crops_without_bars() {
    let resampler = LanczosResampler::new();
    let input = solid(400, 300, [10, 200, 30]);
    let out = transform(&input, &exact(Strategy::Fit, 200, 200), &resampler).unwrap();

    assert_eq!(out.dimensions(), (200, 200));
    for (x, y) in [(0, 0), (199, 0), (0, 199), (199, 199), (100, 100)] {
        let Rgba([r, g, b, _]) = out.get_pixel(x, y);
        assert!(g > 150 && r < 60 && b < 80, "({x},{y}) = {r},{g},{b}");
    }
}

#[test]
fn adjust_400x300_to_square_has_25px_bars() {
    let resampler = LanczosResampler::new();
    let input = solid(400, 300, [255, 255, 255]);
    let out = transform(&input, &exact(Strategy::Adjust, 200, 200), &resampler).unwrap();

    assert_eq!(out.dimensions(), (200, 200));
    for y in [0, 12, 24, 175, 187, 199] {
        assert_eq!(out.get_pixel(100, y), Rgba([0, 0, 0, 255]), "bar row {y}");
    }
    for y in [30, 100, 170] {
        let Rgba([r, g, b, _]) = out.get_pixel(100, y);
        assert!(r > 200 && g > 200 && b > 200, "image row {y}");
    }
}

#[test]
fn limit_1920x1080_to_width_200() {
    let resampler = LanczosResampler::new();
    let input = solid(1920, 1080, [0, 0, 0]);
    let settings = TransformSettings::new(Strategy::Limit, Dimensions::width_only(200));
    let out = transform(&input, &settings, &resampler).unwrap();
    assert_eq!(out.dimensions(), (200, 112));
}

#[test]
fn limit_50x50_is_identity() {
    let resampler = LanczosResampler::new();
    let input = DynamicImage::ImageRgb8(RgbImage::from_fn(50, 50, |x, y| {
        Rgb([x as u8, y as u8, (x * y % 256) as u8])
    }));
    let settings = TransformSettings::new(Strategy::Limit, Dimensions::width_only(200));
    let out = transform(&input, &settings, &resampler).unwrap();

    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(out.to_rgb8(), input.to_rgb8());
}

#[test]
fn tile_100x100_to_350x250_covers_canvas() {
    let resampler = LanczosResampler::new();
    let input = DynamicImage::ImageRgb8(RgbImage::from_fn(100, 100, |x, y| {
        Rgb([x as u8, y as u8, 255])
    }));
    let settings = exact(Strategy::Tile, 350, 250).with_background(Background::rgb(1, 2, 3));
    let out = transform(&input, &settings, &resampler).unwrap();

    assert_eq!(out.dimensions(), (350, 250));
    // Every canvas pixel comes from a tile: no background shows through
    for y in 0..250 {
        for x in 0..350 {
            assert_eq!(
                out.get_pixel(x, y),
                Rgba([(x % 100) as u8, (y % 100) as u8, 255, 255]),
                "({x},{y})"
            );
        }
    }
}

// =========================================================================
// Properties over a spread of shapes
// =========================================================================

const INPUTS: &[(u32, u32)] = &[(400, 300), (300, 400), (97, 13), (13, 97), (64, 64), (1, 1)];
const TARGETS: &[(u32, u32)] = &[(200, 200), (50, 120), (120, 50), (1, 1), (333, 111)];

#[test]
fn box_strategies_produce_exact_target_size() {
    let resampler = LanczosResampler::new();
    for strategy in [Strategy::Fit, Strategy::Adjust, Strategy::Expand, Strategy::Tile] {
        for &(iw, ih) in INPUTS {
            let input = solid(iw, ih, [50, 50, 50]);
            for &(tw, th) in TARGETS {
                let out = transform(&input, &exact(strategy, tw, th), &resampler).unwrap();
                assert_eq!(
                    out.dimensions(),
                    (tw, th),
                    "{strategy} {iw}x{ih} -> {tw}x{th}"
                );
            }
        }
    }
}

#[test]
fn ratio_path_matches_resolved_size() {
    let resampler = LanczosResampler::new();
    let input = solid(120, 80, [9, 9, 9]);
    for ratio in [AspectRatio::R16_9, AspectRatio::R3_4, AspectRatio::R16_10] {
        let by_width = TransformSettings::new(Strategy::Fit, Dimensions::width_only(160))
            .with_ratio(ratio);
        let out = transform(&input, &by_width, &resampler).unwrap();
        assert_eq!(out.width(), 160);
        assert_eq!(out.height(), 160 * ratio.y() / ratio.x());

        let by_height = TransformSettings::new(Strategy::Adjust, Dimensions::height_only(90))
            .with_ratio(ratio);
        let out = transform(&input, &by_height, &resampler).unwrap();
        assert_eq!(out.height(), 90);
        assert_eq!(out.width(), 90 * ratio.x() / ratio.y());
    }
}

#[test]
fn limit_never_enlarges() {
    let resampler = LanczosResampler::new();
    for &(iw, ih) in INPUTS {
        let input = solid(iw, ih, [0, 0, 0]);
        for limit in [1, 50, 200, 1000] {
            let settings = TransformSettings::new(Strategy::Limit, Dimensions::height_only(limit));
            let out = transform(&input, &settings, &resampler).unwrap();
            assert!(out.height() <= ih.max(1));
            assert_eq!(out.height(), ih.min(limit));
            assert!(out.width() <= iw);
        }
    }
}

#[test]
fn alpha_input_keeps_alpha_canvas() {
    let resampler = LanczosResampler::new();
    let input = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255])));
    let settings = exact(Strategy::Adjust, 40, 40).with_background(Background::rgb(255, 0, 0));
    let out = transform(&input, &settings, &resampler).unwrap();
    assert_eq!(out.color(), image::ColorType::Rgba8);
    assert_eq!(out.get_pixel(20, 0), Rgba([255, 0, 0, 255]));
}

// =========================================================================
// Validation and concurrency
// =========================================================================

#[test]
fn validation_errors_surface_through_public_api() {
    let resampler = LanczosResampler::new();
    let input = solid(10, 10, [0, 0, 0]);

    let no_strategy = TransformSettings {
        dimensions: Dimensions::exact(5, 5),
        ..TransformSettings::default()
    };
    assert!(matches!(
        transform(&input, &no_strategy, &resampler),
        Err(TransformError::InvalidConfiguration(_))
    ));

    let limit_both = exact(Strategy::Limit, 5, 5);
    assert!(matches!(
        transform(&input, &limit_both, &resampler),
        Err(TransformError::InvalidConfiguration(_))
    ));

    let zero = exact(Strategy::Fit, 0, 5);
    assert!(matches!(
        transform(&input, &zero, &resampler),
        Err(TransformError::InvalidArgument(_))
    ));
}

#[test]
fn shared_settings_across_threads_give_identical_results() {
    let resampler = LanczosResampler::new();
    let settings = exact(Strategy::Adjust, 64, 48).with_background(Background::rgb(7, 8, 9));
    let input = DynamicImage::ImageRgb8(RgbImage::from_fn(90, 30, |x, y| {
        Rgb([x as u8, y as u8, 100])
    }));
    let expected = transform(&input, &settings, &resampler).unwrap().to_rgb8();

    let results: Vec<_> = (0..16)
        .into_par_iter()
        .map(|_| transform(&input, &settings, &resampler).unwrap().to_rgb8())
        .collect();
    for result in results {
        assert_eq!(result, expected);
    }
    assert_eq!(settings.ratio, None);
}
