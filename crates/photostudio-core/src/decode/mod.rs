//! Image decoding for ingested files.
//!
//! This module provides functionality for:
//! - Decoding browser-loadable raster formats (JPEG, PNG, WEBP, GIF, BMP)
//! - Applying EXIF orientation so pixels match what an `<img>` shows
//! - The shared RGBA [`Raster`] type used across the pipeline
//!
//! All operations are synchronous and single-threaded within WASM.

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, Orientation, Raster, CHANNELS};
