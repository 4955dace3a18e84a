use clap::{Parser, Subcommand};
use imgscale::config::{self, AppConfig, TransformOverrides};
use imgscale::imaging::operations::save_image;
use imgscale::imaging::{
    AspectRatio, Background, ImageFormat, LanczosResampler, Size, Strategy, TransformSettings,
    codec, transform, validate,
};
use imgscale::{batch, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; called exactly once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Flags that override the `[transform]` table of the config file.
#[derive(clap::Args, Clone, Default)]
struct TransformArgs {
    /// fit | adjust | expand | tile | limit
    #[arg(long, global = true)]
    strategy: Option<Strategy>,

    /// Target width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Aspect ratio used when only one of width/height is given, e.g. 16:9
    #[arg(long, global = true)]
    ratio: Option<AspectRatio>,

    /// Output format: png, jpg, bmp, gif
    #[arg(long, global = true)]
    format: Option<ImageFormat>,

    /// Fill color for Adjust bars and the Tile canvas, e.g. 255,255,255
    #[arg(long, global = true)]
    background: Option<Background>,
}

#[derive(Parser)]
#[command(name = "imgscale")]
#[command(about = "Resize images to a target box with a choice of strategies")]
#[command(long_about = "\
Resize images to a target box with a choice of strategies

Strategies:

  fit     scale to cover the box, then crop the overflow (centered)
  adjust  scale to fit inside the box, pad with the background color
  expand  resample to exactly the box, ignoring proportions
  tile    repeat the image unscaled over the box
  limit   downscale so width (or height) is at most the given value

Give --width and --height for an exact box, or one of them with --ratio to
derive the other. limit takes exactly one of --width / --height; a single
axis flag with limit drops the other axis set in the config file.

Settings are read from imgscale.toml (if present) and overridden by flags.
Run 'imgscale gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(flatten)]
    transform: TransformArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform a single image
    Transform {
        /// Image to transform
        input: PathBuf,
        /// Directory to write the result into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Output file name without extension (defaults to the input's)
        #[arg(long)]
        name: Option<String>,
    },
    /// Transform every image under a directory
    Batch {
        /// Directory to scan for images
        dir: PathBuf,
        /// Directory to write results and report.json into
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,
    },
    /// Print a stock imgscale.toml with all options documented
    GenConfig,
    /// List strategies, standard ratios and sizes, and formats
    Presets,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Transform {
            ref input,
            ref output_dir,
            ref name,
        } => {
            let app_config = config::load_config(&cli.config)?;
            let settings = resolve_settings(&app_config, &cli.transform)?;
            let strategy = validate(&settings)?;
            let image = codec::open(input)?;
            let result = transform(&image, &settings, &LanczosResampler::new())?;
            let name = name.clone().unwrap_or_else(|| file_stem(input));
            let written = save_image(&result, settings.format, output_dir, &name)?;
            output::print_transform_summary(
                input,
                &written,
                Size::of(&image),
                Size::of(&result),
                strategy,
            );
        }
        Command::Batch {
            ref dir,
            ref output_dir,
        } => {
            let app_config = config::load_config(&cli.config)?;
            let settings = resolve_settings(&app_config, &cli.transform)?;
            init_thread_pool(&app_config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = batch::run(
                dir,
                output_dir,
                &settings,
                &LanczosResampler::new(),
                Some(tx),
            );
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = report?;
            output::print_batch_summary(&report, &output_dir.join(batch::REPORT_FILE));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Presets => {
            output::print_presets();
        }
    }

    Ok(())
}

/// Config file values with command-line flags applied on top.
fn resolve_settings(
    app_config: &AppConfig,
    args: &TransformArgs,
) -> Result<TransformSettings, Box<dyn std::error::Error>> {
    let overrides = TransformOverrides {
        strategy: args.strategy,
        width: args.width,
        height: args.height,
        ratio: args.ratio,
        format: args.format,
        background: args.background,
    };
    let transform = app_config.transform.clone().with_overrides(&overrides);
    Ok(transform.to_settings()?)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
