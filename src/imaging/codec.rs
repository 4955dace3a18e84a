//! Output formats and the decode/encode adapter.
//!
//! | Format | Extension | Also accepts | MIME type |
//! |---|---|---|---|
//! | PNG | `png` | | `image/png` |
//! | JPEG | `jpg` | `jpeg` | `image/jpeg` |
//! | BMP | `bmp` | | `image/bmp` |
//! | GIF | `gif` | | `image/gif` |
//!
//! Decoding and encoding are delegated to the `image` crate. Encoders accept
//! a narrower set of pixel layouts than decoders produce, so [`encode`]
//! converts first (JPEG has no alpha, GIF wants RGBA, BMP is 8-bit only).

use super::backend::TransformError;
use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

/// Encodable image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Bmp,
    Gif,
}

struct FormatEntry {
    format: ImageFormat,
    extensions: &'static [&'static str],
    mime_type: &'static str,
}

/// First extension of each entry is the canonical one.
const FORMATS: &[FormatEntry] = &[
    FormatEntry {
        format: ImageFormat::Png,
        extensions: &["png"],
        mime_type: "image/png",
    },
    FormatEntry {
        format: ImageFormat::Jpeg,
        extensions: &["jpg", "jpeg"],
        mime_type: "image/jpeg",
    },
    FormatEntry {
        format: ImageFormat::Bmp,
        extensions: &["bmp"],
        mime_type: "image/bmp",
    },
    FormatEntry {
        format: ImageFormat::Gif,
        extensions: &["gif"],
        mime_type: "image/gif",
    },
];

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Bmp,
        ImageFormat::Gif,
    ];

    fn entry(self) -> &'static FormatEntry {
        FORMATS
            .iter()
            .find(|entry| entry.format == self)
            .unwrap_or(&FORMATS[0])
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        self.entry().extensions[0]
    }

    /// Every extension that maps to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        self.entry().extensions
    }

    pub fn mime_type(self) -> &'static str {
        self.entry().mime_type
    }

    /// Look up a format by file extension (case-insensitive, surrounding whitespace ignored).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let wanted = extension.trim().trim_start_matches('.');
        FORMATS
            .iter()
            .find(|entry| entry.extensions.iter().any(|e| e.eq_ignore_ascii_case(wanted)))
            .map(|entry| entry.format)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!("unknown image format '{}' (expected png, jpg, jpeg, bmp or gif)", s.trim())
        })
    }
}

/// Decode an image from encoded bytes, guessing the format from its signature.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, TransformError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Load and decode an image from disk.
pub fn open(path: &Path) -> Result<DynamicImage, TransformError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// Convert to a pixel layout the target encoder accepts.
fn encodable(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    let has_alpha = image.color().has_alpha();
    match (format, image) {
        (ImageFormat::Jpeg, DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_)) => {
            Cow::Borrowed(image)
        }
        (ImageFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        (ImageFormat::Gif, DynamicImage::ImageRgba8(_)) => Cow::Borrowed(image),
        (ImageFormat::Gif, _) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        (
            ImageFormat::Bmp,
            DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_),
        ) => Cow::Borrowed(image),
        (ImageFormat::Png, DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_))
        | (ImageFormat::Bmp, _) => {
            if has_alpha {
                Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
            } else {
                Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
            }
        }
        (ImageFormat::Png, _) => Cow::Borrowed(image),
    }
}

/// Encode an image into `format`.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, TransformError> {
    let mut cursor = Cursor::new(Vec::new());
    encodable(image, format).write_to(&mut cursor, format.to_image_format())?;
    Ok(cursor.into_inner())
}

/// Extensions that [`decode`] can read.
pub fn supported_input_extensions() -> Vec<&'static str> {
    FORMATS
        .iter()
        .filter(|entry| entry.format.to_image_format().reading_enabled())
        .flat_map(|entry| entry.extensions.iter().copied())
        .collect()
}
