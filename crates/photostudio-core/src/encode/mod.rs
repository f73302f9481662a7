//! Encoding of rendered output for download and share.
//!
//! This module provides:
//! - PNG, JPEG and lossless WEBP encoding of RGBA rasters
//! - Lenient MIME parsing into an [`ExportFormat`]
//! - Export quality constants and download filenames
//!
//! All operations are synchronous and single-threaded within WASM.

mod encoder;
mod format;

pub use encoder::{encode_raster, encode_rendered, jpeg_quality, EncodeError};
pub use format::{
    batch_export_filename, single_export_filename, ExportFormat, BATCH_EXPORT_QUALITY,
    DEFAULT_JPEG_QUALITY, SINGLE_EXPORT_QUALITY,
};
