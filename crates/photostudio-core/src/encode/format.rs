//! Export formats, quality constants and download filenames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality used for single-image export.
pub const SINGLE_EXPORT_QUALITY: f32 = 0.95;

/// Quality used for batch export and sharing.
pub const BATCH_EXPORT_QUALITY: f32 = 0.9;

/// Quality applied when the requested one is outside [0, 1].
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    /// Parse a MIME type leniently.
    ///
    /// Anything mentioning `png` is PNG, anything mentioning `jpeg` is JPEG,
    /// everything else falls through to WEBP.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("png") {
            ExportFormat::Png
        } else if mime.contains("jpeg") {
            ExportFormat::Jpeg
        } else {
            ExportFormat::Webp
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }

    /// True if the encoder honours the quality parameter.
    pub fn is_lossy(self) -> bool {
        matches!(self, ExportFormat::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// `edited-<timestamp_ms>.<ext>`
pub fn single_export_filename(timestamp_ms: u64, format: ExportFormat) -> String {
    format!("edited-{}.{}", timestamp_ms, format.extension())
}

/// `<basename>-batch.jpg`, where the last non-empty `.ext` suffix is stripped.
pub fn batch_export_filename(original_name: &str) -> String {
    format!("{}-batch.{}", strip_extension(original_name), ExportFormat::Jpeg.extension())
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => name,
    }
}
