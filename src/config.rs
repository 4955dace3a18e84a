//! Configuration module.
//!
//! Handles loading, validating, and merging the `imgscale.toml` file. Stock
//! defaults are overridden by the user file, and command-line flags override
//! both (see `main.rs`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [transform]
//! strategy = "fit"          # fit | adjust | expand | tile | limit (no default)
//! width = 200               # Target width in px (optional)
//! height = 200              # Target height in px (optional)
//! ratio = [4, 3]            # Aspect ratio used when only one axis is given
//! format = "png"            # png | jpg | jpeg | bmp | gif
//! background = [0, 0, 0]    # RGB fill for Adjust bars and Tile canvas
//! orientation = 0           # Reserved, not applied
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [transform]
//! strategy = "adjust"
//! background = [255, 255, 255]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    AspectRatio, Background, Dimensions, ImageFormat, Strategy, TransformError, TransformSettings,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "imgscale.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid transform settings: {0}")]
    Settings(#[from] TransformError),
}

/// Configuration loaded from `imgscale.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// What to do with each image.
    pub transform: TransformConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

/// Values given on the command line, applied over the `[transform]` table.
#[derive(Debug, Clone, Default)]
pub struct TransformOverrides {
    pub strategy: Option<Strategy>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub ratio: Option<AspectRatio>,
    pub format: Option<ImageFormat>,
    pub background: Option<Background>,
}

impl TransformConfig {
    /// Apply `overrides` field by field.
    ///
    /// Limit bounds exactly one axis, so when the result is Limit and only
    /// one axis was overridden, the other axis from the file is dropped.
    pub fn with_overrides(mut self, overrides: &TransformOverrides) -> Self {
        if let Some(strategy) = overrides.strategy {
            self.strategy = Some(strategy);
        }
        if let Some(width) = overrides.width {
            self.width = Some(width);
        }
        if let Some(height) = overrides.height {
            self.height = Some(height);
        }
        if self.strategy == Some(Strategy::Limit) {
            match (overrides.width, overrides.height) {
                (Some(_), None) => self.height = None,
                (None, Some(_)) => self.width = None,
                _ => {}
            }
        }
        if let Some(ratio) = overrides.ratio {
            self.ratio = Some([ratio.x(), ratio.y()]);
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(background) = overrides.background {
            self.background = background.to_array().iter().map(|&c| i64::from(c)).collect();
        }
        self
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// A missing strategy or missing dimensions are not errors here: they
    /// may still come from the command line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.transform.ratio, Some([0, _] | [_, 0])) {
            return Err(ConfigError::Validation(
                "transform.ratio values must be non-zero".into(),
            ));
        }
        if self.transform.width == Some(0) || self.transform.height == Some(0) {
            return Err(ConfigError::Validation(
                "transform.width and transform.height must be positive".into(),
            ));
        }
        Background::from_components(&self.transform.background)?;
        Ok(())
    }
}

/// The `[transform]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Aspect ratio as `[width, height]`, e.g. `[16, 9]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<[u32; 2]>,
    pub format: ImageFormat,
    /// RGB components. Kept wide so out-of-range values are reported, not truncated.
    pub background: Vec<i64>,
    pub orientation: u16,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            width: None,
            height: None,
            ratio: None,
            format: ImageFormat::Png,
            background: vec![0, 0, 0],
            orientation: 0,
        }
    }
}

impl TransformConfig {
    /// Convert to engine settings.
    ///
    /// Checks the background color and ratio; whether the combination of
    /// strategy and dimensions is runnable is left to the engine.
    pub fn to_settings(&self) -> Result<TransformSettings, TransformError> {
        let ratio = self
            .ratio
            .map(|[x, y]| AspectRatio::new(x, y))
            .transpose()?;
        Ok(TransformSettings {
            dimensions: Dimensions::new(self.width, self.height),
            ratio,
            strategy: self.strategy,
            format: self.format,
            background: Background::from_components(&self.background)?,
            orientation: self.orientation,
        })
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Stock defaults as a TOML value, the base every user file is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Deep-merge two TOML values. Tables merge key by key; anything else in
/// `overlay` replaces `base`.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `imgscale.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgscale Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults; commented keys have no default.
#
# Command-line flags (--strategy, --width, ...) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Transformation
# ---------------------------------------------------------------------------
[transform]
# How to reach the target size:
#   fit     scale to cover, then crop the overflow (centered)
#   adjust  scale to fit inside, pad with the background color (centered)
#   expand  resample to exactly width x height, ignoring proportions
#   tile    repeat the image unscaled over a width x height canvas
#   limit   downscale so width (or height) is at most the given value
# strategy = "fit"

# Target size in pixels. Give both for an exact box, or one of them
# together with `ratio` to derive the other. `limit` takes exactly one.
# width = 200
# height = 200

# Aspect ratio as [width, height], used when only one axis is given.
# Common choices: [1, 1], [4, 3], [3, 2], [16, 9], [8, 5].
# ratio = [4, 3]

# Output format: png, jpg (or jpeg), bmp, gif.
format = "png"

# RGB fill for the Adjust bars and the Tile canvas, each 0-255.
background = [0, 0, 0]

# Reserved; not applied by any strategy.
orientation = 0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers for `batch`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_strategy() {
        let config = AppConfig::default();
        assert_eq!(config.transform.strategy, None);
        assert_eq!(config.transform.format, ImageFormat::Png);
        assert_eq!(config.transform.background, vec![0, 0, 0]);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[transform]
strategy = "adjust"
width = 300
ratio = [16, 9]
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.transform.strategy, Some(Strategy::Adjust));
        assert_eq!(config.transform.width, Some(300));
        assert_eq!(config.transform.height, None);
        assert_eq!(config.transform.ratio, Some([16, 9]));
        assert_eq!(config.transform.format, ImageFormat::Png);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[transform]
strategy = "fit"
widht = 300
"#;
        assert!(toml::from_str::<AppConfig>(toml).is_err());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let toml = r#"
[transform]
strategy = "stretch"
"#;
        assert!(toml::from_str::<AppConfig>(toml).is_err());
    }

    // =========================================================================
    // to_settings tests
    // =========================================================================

    #[test]
    fn to_settings_maps_every_field() {
        let config = TransformConfig {
            strategy: Some(Strategy::Tile),
            width: Some(64),
            height: None,
            ratio: Some([4, 3]),
            format: ImageFormat::Gif,
            background: vec![192, 205, 224],
            orientation: 3,
        };
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.strategy, Some(Strategy::Tile));
        assert_eq!(settings.dimensions, Dimensions::width_only(64));
        assert_eq!(settings.ratio, Some(AspectRatio::R4_3));
        assert_eq!(settings.format, ImageFormat::Gif);
        assert_eq!(settings.background, Background::rgb(192, 205, 224));
        assert_eq!(settings.orientation, 3);
    }

    #[test]
    fn to_settings_rejects_bad_background() {
        for bad in [vec![1, 2], vec![0, 0, 256], vec![-1, 0, 0], vec![1, 2, 3, 4]] {
            let config = TransformConfig {
                background: bad.clone(),
                ..TransformConfig::default()
            };
            assert!(
                matches!(config.to_settings(), Err(TransformError::InvalidArgument(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn to_settings_rejects_zero_ratio() {
        let config = TransformConfig {
            ratio: Some([0, 3]),
            ..TransformConfig::default()
        };
        assert!(matches!(
            config.to_settings(),
            Err(TransformError::InvalidArgument(_))
        ));
    }

    // =========================================================================
    // with_overrides tests
    // =========================================================================

    fn file_box(strategy: Strategy) -> TransformConfig {
        TransformConfig {
            strategy: Some(strategy),
            width: Some(300),
            height: Some(200),
            ..TransformConfig::default()
        }
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = file_box(Strategy::Fit).with_overrides(&TransformOverrides {
            width: Some(640),
            format: Some(ImageFormat::Bmp),
            background: Some(Background::rgb(1, 2, 3)),
            ..TransformOverrides::default()
        });
        assert_eq!(config.strategy, Some(Strategy::Fit));
        assert_eq!(config.width, Some(640));
        assert_eq!(config.height, Some(200));
        assert_eq!(config.format, ImageFormat::Bmp);
        assert_eq!(config.background, vec![1, 2, 3]);
    }

    #[test]
    fn limit_with_one_axis_flag_drops_the_other_axis() {
        let by_width = file_box(Strategy::Fit).with_overrides(&TransformOverrides {
            strategy: Some(Strategy::Limit),
            width: Some(1280),
            ..TransformOverrides::default()
        });
        assert_eq!((by_width.width, by_width.height), (Some(1280), None));
        let settings = by_width.to_settings().unwrap();
        assert!(crate::imaging::validate(&settings).is_ok());

        let by_height = file_box(Strategy::Limit).with_overrides(&TransformOverrides {
            height: Some(720),
            ..TransformOverrides::default()
        });
        assert_eq!((by_height.width, by_height.height), (None, Some(720)));
    }

    #[test]
    fn limit_without_axis_flags_keeps_file_axes() {
        let config = file_box(Strategy::Fit).with_overrides(&TransformOverrides {
            strategy: Some(Strategy::Limit),
            ..TransformOverrides::default()
        });
        assert_eq!((config.width, config.height), (Some(300), Some(200)));
    }

    #[test]
    fn other_strategies_keep_the_file_axis() {
        let config = file_box(Strategy::Adjust).with_overrides(&TransformOverrides {
            width: Some(50),
            ..TransformOverrides::default()
        });
        assert_eq!((config.width, config.height), (Some(50), Some(200)));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config.transform, TransformConfig::default());
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
[transform]
strategy = "limit"
width = 1280
format = "jpg"

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.transform.strategy, Some(Strategy::Limit));
        assert_eq!(config.transform.width, Some(1280));
        assert_eq!(config.transform.format, ImageFormat::Jpeg);
        // Unspecified values should be defaults
        assert_eq!(config.transform.background, vec![0, 0, 0]);
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_rejects_misspelled_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[transform]\nstrategy = \"fit\"\nwidht = 300\n").unwrap();
        match load_config(&path) {
            Err(ConfigError::Toml(e)) => assert!(e.to_string().contains("widht"), "{e}"),
            other => panic!("expected a TOML error, got {other:?}"),
        }
    }

    #[test]
    fn load_config_rejects_unknown_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[output]\nquality = 90\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_accepts_generated_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, stock_config_toml()).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.transform, TransformConfig::default());
    }

    #[test]
    fn load_config_validates_background() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[transform]\nbackground = [10, 20]\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Settings(_))));
    }

    #[test]
    fn load_config_validates_ratio_and_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[transform]\nratio = [4, 0]\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
        fs::write(&path, "[transform]\nheight = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.transform, TransformConfig::default());
        config.validate().unwrap();
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
        let zero = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&zero), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("width = 90").unwrap();
        let overlay: toml::Value = toml::from_str("width = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("width").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_nested_tables_keep_siblings() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[transform]\nwidth = 10\n").unwrap();
        let merged = merge_toml(base, overlay);
        let transform = merged.get("transform").unwrap();
        assert_eq!(transform.get("width").unwrap().as_integer(), Some(10));
        assert_eq!(transform.get("format").unwrap().as_str(), Some("png"));
    }

    #[test]
    fn merge_toml_arrays_are_replaced() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[transform]\nbackground = [1, 2, 3]\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.transform.background, vec![1, 2, 3]);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("transform").is_some());
        assert!(val.get("processing").is_some());
    }
}
