//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Transform
//!
//! ```text
//! photo.jpg 4000x3000 → thumb.png 200x200 (fit)
//! ```
//!
//! ## Batch
//!
//! ```text
//! Transforming 3 images
//! 001 a.jpg
//!     4000x3000 → 200x200 (fit)
//!     Output: out/a.png
//! 002 broken.png
//!     Failed: Codec error: ...
//!
//! Transformed 2 of 3 images, 1 failed → out/report.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::batch::{BatchEvent, BatchReport};
use crate::imaging::{ImageFormat, STANDARD_RATIOS, STANDARD_SIZES, Size, Strategy};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Position as shown to users: 1-based, zero-padded to three digits.
fn position(index: usize) -> String {
    format!("{:03}", index + 1)
}

fn resize_line(from: Size, to: Size, strategy: Strategy) -> String {
    format!("{} \u{2192} {} ({})", from, to, strategy)
}

fn describe(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Fit => "scale to cover the box, crop the overflow",
        Strategy::Adjust => "scale to fit inside the box, pad with background",
        Strategy::Expand => "resample to the box, ignoring proportions",
        Strategy::Tile => "repeat unscaled over the box",
        Strategy::Limit => "downscale to a maximum width or height",
    }
}

// ============================================================================
// Transform output
// ============================================================================

/// Format the one-line summary of a single-file transformation.
pub fn format_transform_summary(
    source: &Path,
    output: &Path,
    from: Size,
    to: Size,
    strategy: Strategy,
) -> Vec<String> {
    let source_name = source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    vec![format!(
        "{} {} \u{2192} {} {} ({})",
        source_name,
        from,
        output.display(),
        to,
        strategy
    )]
}

pub fn print_transform_summary(
    source: &Path,
    output: &Path,
    from: Size,
    to: Size,
    strategy: Strategy,
) {
    for line in format_transform_summary(source, output, from, to, strategy) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch output
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => {
            let noun = if *total == 1 { "image" } else { "images" };
            vec![format!("Transforming {} {}", total, noun)]
        }
        BatchEvent::Transformed {
            index,
            source,
            output,
            from,
            to,
            strategy,
        } => vec![
            format!("{} {}", position(*index), source.display()),
            format!("    {}", resize_line(*from, *to, *strategy)),
            format!("    Output: {}", output.display()),
        ],
        BatchEvent::Failed {
            index,
            source,
            error,
        } => vec![
            format!("{} {}", position(*index), source.display()),
            format!("    Failed: {}", error),
        ],
    }
}

/// Format the closing line of a batch run.
pub fn format_batch_summary(report: &BatchReport, report_path: &Path) -> Vec<String> {
    let total = report.entries.len();
    let mut line = format!("Transformed {} of {} images", report.succeeded(), total);
    if report.failed() > 0 {
        line.push_str(&format!(", {} failed", report.failed()));
    }
    line.push_str(&format!(" \u{2192} {}", report_path.display()));
    vec![String::new(), line]
}

pub fn print_batch_summary(report: &BatchReport, report_path: &Path) {
    for line in format_batch_summary(report, report_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Format the built-in strategies, ratios, sizes and formats.
pub fn format_presets() -> Vec<String> {
    let mut lines = vec!["Strategies".to_string()];
    for strategy in Strategy::ALL {
        lines.push(format!("    {:<7} {}", strategy.name(), describe(strategy)));
    }

    lines.push(String::new());
    lines.push("Ratios".to_string());
    let ratios: Vec<String> = STANDARD_RATIOS.iter().map(|r| r.to_string()).collect();
    lines.push(format!("    {}", ratios.join(" ")));

    lines.push(String::new());
    lines.push("Sizes".to_string());
    let sizes: Vec<String> = STANDARD_SIZES.iter().map(|s| s.to_string()).collect();
    lines.push(format!("    {}", sizes.join(" ")));

    lines.push(String::new());
    lines.push("Formats".to_string());
    for format in ImageFormat::ALL {
        lines.push(format!(
            "    {:<4} {} ({})",
            format.extension(),
            format.mime_type(),
            format.extensions().join(", ")
        ));
    }
    lines
}

pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ReportEntry;
    use std::path::PathBuf;

    #[test]
    fn position_is_one_based_and_padded() {
        assert_eq!(position(0), "001");
        assert_eq!(position(41), "042");
    }

    // =========================================================================
    // Transform summary tests
    // =========================================================================

    #[test]
    fn transform_summary_shows_sizes_and_strategy() {
        let lines = format_transform_summary(
            Path::new("/photos/dawn.jpg"),
            Path::new("out/dawn.png"),
            Size::new(400, 300),
            Size::new(200, 200),
            Strategy::Fit,
        );
        assert_eq!(
            lines,
            vec!["dawn.jpg 400x300 \u{2192} out/dawn.png 200x200 (fit)"]
        );
    }

    // =========================================================================
    // Batch event tests
    // =========================================================================

    #[test]
    fn format_batch_started() {
        assert_eq!(
            format_batch_event(&BatchEvent::Started { total: 5 }),
            vec!["Transforming 5 images"]
        );
        assert_eq!(
            format_batch_event(&BatchEvent::Started { total: 1 }),
            vec!["Transforming 1 image"]
        );
    }

    #[test]
    fn format_batch_transformed() {
        let event = BatchEvent::Transformed {
            index: 0,
            source: PathBuf::from("trips/b.jpg"),
            output: PathBuf::from("out/trips/b.png"),
            from: Size::new(1920, 1080),
            to: Size::new(200, 112),
            strategy: Strategy::Limit,
        };
        let lines = format_batch_event(&event);
        assert_eq!(lines[0], "001 trips/b.jpg");
        assert_eq!(lines[1], "    1920x1080 \u{2192} 200x112 (limit)");
        assert_eq!(lines[2], "    Output: out/trips/b.png");
    }

    #[test]
    fn format_batch_failed() {
        let event = BatchEvent::Failed {
            index: 2,
            source: PathBuf::from("broken.png"),
            error: "Codec error: bad signature".to_string(),
        };
        assert_eq!(
            format_batch_event(&event),
            vec!["003 broken.png", "    Failed: Codec error: bad signature"]
        );
    }

    #[test]
    fn batch_summary_mentions_failures_only_when_present() {
        let ok = ReportEntry {
            source: PathBuf::from("a.png"),
            output: Some(PathBuf::from("out/a.png")),
            from: Some(Size::new(2, 2)),
            to: Some(Size::new(1, 1)),
            error: None,
        };
        let bad = ReportEntry {
            source: PathBuf::from("b.png"),
            output: None,
            from: None,
            to: None,
            error: Some("boom".to_string()),
        };
        let mut report = BatchReport {
            strategy: Strategy::Fit,
            format: ImageFormat::Png,
            entries: vec![ok.clone()],
        };
        let lines = format_batch_summary(&report, Path::new("out/report.json"));
        assert_eq!(lines[1], "Transformed 1 of 1 images \u{2192} out/report.json");

        report.entries.push(bad);
        let lines = format_batch_summary(&report, Path::new("out/report.json"));
        assert_eq!(
            lines[1],
            "Transformed 1 of 2 images, 1 failed \u{2192} out/report.json"
        );
    }

    // =========================================================================
    // Presets tests
    // =========================================================================

    #[test]
    fn presets_list_every_strategy_and_format() {
        let lines = format_presets();
        for strategy in Strategy::ALL {
            assert!(
                lines.iter().any(|l| l.trim_start().starts_with(strategy.name())),
                "missing {strategy}"
            );
        }
        assert!(lines.iter().any(|l| l.contains("image/jpeg (jpg, jpeg)")));
        assert!(lines.iter().any(|l| l.contains("16:9") && l.contains("8:5")));
        assert!(lines.iter().any(|l| l.contains("1920")));
    }
}
