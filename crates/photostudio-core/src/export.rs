//! Single export, batch export and share.
//!
//! Delivery is abstracted behind [`DownloadSink`] and [`ShareTarget`] so the
//! browser glue (anchor clicks, `navigator.share`) stays outside the core.
//! None of the outcomes here are fatal: encoder failures and unsupported
//! targets come back as values.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::collection::SourceImage;
use crate::encode::{
    batch_export_filename, encode_rendered, single_export_filename, EncodeError, ExportFormat,
    BATCH_EXPORT_QUALITY, SINGLE_EXPORT_QUALITY,
};
use crate::render::{render, RenderOptions};
use crate::settings::AdjustmentSettings;

/// Filename used for shared images.
pub const SHARE_FILENAME: &str = "photo.jpg";
pub const SHARE_TITLE: &str = "Edited photo";
pub const SHARE_TEXT: &str = "Shared via Creative Photo Studio";
pub const SHARE_UNSUPPORTED_MESSAGE: &str =
    "Sharing is not supported in this browser. You can download instead.";

/// An encoded file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Receives finished downloads.
pub trait DownloadSink {
    fn deliver(&mut self, artifact: ExportArtifact);
}

impl<F> DownloadSink for F
where
    F: FnMut(ExportArtifact),
{
    fn deliver(&mut self, artifact: ExportArtifact) {
        self(artifact)
    }
}

/// Result of a single export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered { filename: String },
    /// No image was loaded; the sink was not touched.
    NothingToExport,
    /// Encoding failed; the sink was not touched.
    Skipped(String),
}

/// One image to export with its own settings snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a> {
    pub image: &'a SourceImage,
    pub settings: AdjustmentSettings,
}

/// An image the batch could not export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub name: String,
    pub reason: String,
}

/// Summary of a batch export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Delivered filenames, in order.
    pub delivered: Vec<String>,
    pub skipped: Vec<SkippedImage>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.delivered.len() + self.skipped.len()
    }
}

/// Render and encode one image.
pub fn render_and_encode(
    image: &SourceImage,
    settings: &AdjustmentSettings,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let output = render(image, settings, &RenderOptions::export());
    encode_rendered(&output, format, quality)
}

/// Export the active image as `edited-<timestamp_ms>.<ext>`.
#[instrument(skip_all, fields(format = %format, timestamp_ms = timestamp_ms))]
pub fn export_single(
    image: Option<&SourceImage>,
    settings: &AdjustmentSettings,
    format: ExportFormat,
    timestamp_ms: u64,
    sink: &mut dyn DownloadSink,
) -> ExportOutcome {
    let Some(image) = image else {
        return ExportOutcome::NothingToExport;
    };

    match render_and_encode(image, settings, format, SINGLE_EXPORT_QUALITY) {
        Ok(bytes) => {
            let filename = single_export_filename(timestamp_ms, format);
            info!(file = %filename, size = bytes.len(), "Exported image");
            sink.deliver(ExportArtifact {
                filename: filename.clone(),
                mime_type: format.mime_type(),
                bytes,
            });
            ExportOutcome::Delivered { filename }
        }
        Err(e) => {
            warn!(image = image.name(), error = %e, "Export skipped");
            ExportOutcome::Skipped(e.to_string())
        }
    }
}

/// Export every item as JPEG, in order, one artifact per encoded image.
///
/// Each item carries its own settings, so nothing shared is changed.
#[instrument(skip_all)]
pub fn export_batch<'a, I>(items: I, sink: &mut dyn DownloadSink) -> BatchReport
where
    I: IntoIterator<Item = BatchItem<'a>>,
{
    let mut report = BatchReport::default();

    for item in items {
        let name = item.image.name();
        match render_and_encode(item.image, &item.settings, ExportFormat::Jpeg, BATCH_EXPORT_QUALITY)
        {
            Ok(bytes) => {
                let filename = batch_export_filename(name);
                sink.deliver(ExportArtifact {
                    filename: filename.clone(),
                    mime_type: ExportFormat::Jpeg.mime_type(),
                    bytes,
                });
                report.delivered.push(filename);
            }
            Err(e) => {
                warn!(image = name, error = %e, "Batch item skipped");
                report.skipped.push(SkippedImage {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        delivered = report.delivered.len(),
        skipped = report.skipped.len(),
        "Batch export finished"
    );
    report
}

/// Payload handed to a share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub title: &'static str,
    pub text: &'static str,
}

impl ShareRequest {
    fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            filename: SHARE_FILENAME,
            mime_type: ExportFormat::Jpeg.mime_type(),
            bytes,
            title: SHARE_TITLE,
            text: SHARE_TEXT,
        }
    }
}

/// Errors a share target may report.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Share cancelled")]
    Cancelled,

    #[error("Share failed: {0}")]
    Failed(String),
}

/// A platform share facility.
pub trait ShareTarget {
    fn is_supported(&self) -> bool;

    fn share(&mut self, request: ShareRequest) -> Result<(), ShareError>;
}

/// Result of a share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// Carries the message to show the user.
    Unsupported(&'static str),
    Cancelled,
    NothingToShare,
    Skipped(String),
}

/// Build the share payload for an image (JPEG at batch quality).
pub fn share_request(
    image: &SourceImage,
    settings: &AdjustmentSettings,
) -> Result<ShareRequest, EncodeError> {
    render_and_encode(image, settings, ExportFormat::Jpeg, BATCH_EXPORT_QUALITY).map(ShareRequest::jpeg)
}

/// Share the active image as `photo.jpg`.
#[instrument(skip_all)]
pub fn share(
    image: Option<&SourceImage>,
    settings: &AdjustmentSettings,
    target: &mut dyn ShareTarget,
) -> ShareOutcome {
    if !target.is_supported() {
        warn!("Share target unavailable");
        return ShareOutcome::Unsupported(SHARE_UNSUPPORTED_MESSAGE);
    }

    let Some(image) = image else {
        return ShareOutcome::NothingToShare;
    };

    let request = match share_request(image, settings) {
        Ok(request) => request,
        Err(e) => {
            warn!(image = image.name(), error = %e, "Share skipped");
            return ShareOutcome::Skipped(e.to_string());
        }
    };

    match target.share(request) {
        Ok(()) => {
            info!(image = image.name(), "Shared image");
            ShareOutcome::Shared
        }
        Err(ShareError::Cancelled) => ShareOutcome::Cancelled,
        Err(e) => {
            warn!(error = %e, "Share failed");
            ShareOutcome::Skipped(e.to_string())
        }
    }
}
