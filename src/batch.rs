//! Batch transformation of a directory tree.
//!
//! Walks the input directory, transforms every image with a known decoder
//! using the same settings, and mirrors the directory layout in the output:
//!
//! ```text
//! photos/                     out/
//! ├── a.jpg          →        ├── a.png
//! ├── notes.txt               ├── trips/
//! └── trips/                  │   └── b.png
//!     └── b.gif      →        └── report.json
//! ```
//!
//! ## Output Names
//!
//! Each image is written as `<stem>.<ext>`. Images in one directory that share
//! a stem (`a.png`, `a.bmp`) keep their source extension instead
//! (`a.png.png`, `a.bmp.png`), so no two images write the same file. Names
//! are compared case-insensitively. An image whose output would still clash
//! with an earlier one is reported as failed and not written.
//!
//! ## Failures
//!
//! Invalid settings abort before any file is touched. A file that fails to
//! decode or transform is recorded in the report and reported as a
//! [`BatchEvent::Failed`]; the rest of the batch continues.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon). The
//! report keeps the walk order regardless of completion order; events arrive
//! in completion order.

use crate::imaging::operations::save_image;
use crate::imaging::{
    ImageFormat, Resampler, Size, Strategy, TransformError, TransformSettings, codec, output_path,
    transform, validate,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the JSON summary written into the output directory.
pub const REPORT_FILE: &str = "report.json";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Progress event emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    Transformed {
        index: usize,
        source: PathBuf,
        output: PathBuf,
        from: Size,
        to: Size,
        strategy: Strategy,
    },
    Failed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

/// Outcome of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Written to `report.json` and returned from [`run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub strategy: Strategy,
    pub format: ImageFormat,
    pub entries: Vec<ReportEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_none()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

/// Every decodable image under `dir`, sorted by path. `skip` (typically the
/// output directory) is not descended into.
pub fn find_images(dir: &Path, skip: Option<&Path>) -> Result<Vec<PathBuf>, BatchError> {
    let extensions = codec::supported_input_extensions();
    let mut images = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| skip.is_none_or(|skip| entry.path() != skip));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let known = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if known {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

/// Transform every image under `input_dir` into `output_dir`.
pub fn run<R: Resampler + ?Sized>(
    input_dir: &Path,
    output_dir: &Path,
    settings: &TransformSettings,
    resampler: &R,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    let strategy = validate(settings)?;
    let sources = find_images(input_dir, Some(output_dir))?;
    std::fs::create_dir_all(output_dir)?;

    let send = |event: BatchEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening
            tx.send(event).ok();
        }
    };
    send(BatchEvent::Started {
        total: sources.len(),
    });

    let relatives: Vec<PathBuf> = sources
        .iter()
        .map(|source| source.strip_prefix(input_dir).unwrap_or(source).to_path_buf())
        .collect();
    let planned = plan_outputs(&relatives, output_dir, settings.format);

    let entries: Vec<ReportEntry> = sources
        .par_iter()
        .zip(relatives.par_iter())
        .zip(planned.par_iter())
        .enumerate()
        .map(|(index, ((source, relative), planned))| {
            let outcome = match planned {
                Ok((dir, name)) => transform_one(source, dir, name, settings, resampler)
                    .map_err(|e| e.to_string()),
                Err(clash) => Err(clash.clone()),
            };
            match outcome {
                Ok((output, from, to)) => {
                    send(BatchEvent::Transformed {
                        index,
                        source: relative.clone(),
                        output: output.clone(),
                        from,
                        to,
                        strategy,
                    });
                    ReportEntry {
                        source: relative.clone(),
                        output: Some(output),
                        from: Some(from),
                        to: Some(to),
                        error: None,
                    }
                }
                Err(error) => {
                    send(BatchEvent::Failed {
                        index,
                        source: relative.clone(),
                        error: error.clone(),
                    });
                    ReportEntry {
                        source: relative.clone(),
                        output: None,
                        from: None,
                        to: None,
                        error: Some(error),
                    }
                }
            }
        })
        .collect();

    let report = BatchReport {
        strategy,
        format: settings.format,
        entries,
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_dir.join(REPORT_FILE), json)?;
    Ok(report)
}

/// Output directory and file name for every image in `relatives`, in the
/// same order.
///
/// Images sharing a stem in one directory keep their extension in the name.
/// An output already claimed by an earlier image is an `Err` naming the clash.
fn plan_outputs(
    relatives: &[PathBuf],
    output_dir: &Path,
    format: ImageFormat,
) -> Vec<Result<(PathBuf, String), String>> {
    let stem_key = |relative: &Path| {
        relative
            .with_extension("")
            .to_string_lossy()
            .to_lowercase()
    };
    let mut stems: HashMap<String, usize> = HashMap::new();
    for relative in relatives {
        *stems.entry(stem_key(relative)).or_default() += 1;
    }

    let mut claimed = HashSet::new();
    relatives
        .iter()
        .map(|relative| {
            let shared = stems.get(&stem_key(relative)).is_some_and(|&n| n > 1);
            let name = if shared {
                relative.file_name()
            } else {
                relative.file_stem()
            };
            let name = name
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target_dir = match relative.parent() {
                Some(parent) => output_dir.join(parent),
                None => output_dir.to_path_buf(),
            };
            let path = output_path(&target_dir, &name, format);
            if claimed.insert(path.to_string_lossy().to_lowercase()) {
                Ok((target_dir, name))
            } else {
                Err(format!(
                    "output {} is already written by another image",
                    path.display()
                ))
            }
        })
        .collect()
}

fn transform_one<R: Resampler + ?Sized>(
    source: &Path,
    target_dir: &Path,
    name: &str,
    settings: &TransformSettings,
    resampler: &R,
) -> Result<(PathBuf, Size, Size), TransformError> {
    let image = codec::open(source)?;
    let output = transform(&image, settings, resampler)?;
    let path = save_image(&output, settings.format, target_dir, name)?;
    Ok((path, Size::of(&image), Size::of(&output)))
}
