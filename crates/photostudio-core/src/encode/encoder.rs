//! Raster encoding for export.
//!
//! PNG and WEBP keep the alpha channel; WEBP uses the lossless encoder and
//! ignores quality. JPEG has no alpha, so pixels are composited over black
//! before encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::format::{ExportFormat, DEFAULT_JPEG_QUALITY};
use crate::decode::{Raster, CHANNELS};
use crate::render::RenderedOutput;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ExportFormat,
        message: String,
    },

    /// The codec returned no bytes
    #[error("{0} encoder produced no data")]
    EmptyOutput(ExportFormat),
}

/// Map a 0-1 quality to the JPEG encoder's 1-100 scale.
///
/// Values outside [0, 1] (and NaN) use [`DEFAULT_JPEG_QUALITY`].
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        DEFAULT_JPEG_QUALITY
    };
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a rendered output.
pub fn encode_rendered(
    output: &RenderedOutput,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    encode_raster(&output.raster, format, quality)
}

/// Encode an RGBA raster in the given format.
///
/// `quality` is in [0, 1] and only affects JPEG.
pub fn encode_raster(
    raster: &Raster,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (raster.width, raster.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = width as usize * height as usize * CHANNELS;
    if raster.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: raster.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());

    let result = match format {
        ExportFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &raster.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ExportFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            &raster.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ExportFormat::Jpeg => {
            let rgb = composite_over_black(&raster.pixels);
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    })?;

    let bytes = buffer.into_inner();
    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput(format));
    }
    Ok(bytes)
}

/// Flatten RGBA onto an opaque black background.
fn composite_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let a = px[3] as u16;
        for &c in &px[..3] {
            rgb.push(((c as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn format_strategy() -> impl Strategy<Value = ExportFormat> {
        prop_oneof![
            Just(ExportFormat::Png),
            Just(ExportFormat::Jpeg),
            Just(ExportFormat::Webp),
        ]
    }

    proptest! {
        /// Property: every valid raster encodes to non-empty bytes in every format.
        #[test]
        fn prop_valid_input_encodes(
            (width, height) in (1u32..=32, 1u32..=32),
            format in format_strategy(),
            quality in 0.0f32..=1.0,
            value in any::<u8>(),
        ) {
            let raster = Raster::new(width, height, vec![value; (width * height) as usize * CHANNELS]);
            let bytes = encode_raster(&raster, format, quality);
            prop_assert!(bytes.is_ok());
            prop_assert!(!bytes.unwrap().is_empty());
        }

        /// Property: same input, same output.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=16, 1u32..=16),
            format in format_strategy(),
        ) {
            let raster = Raster::new(width, height, vec![100u8; (width * height) as usize * CHANNELS]);
            let a = encode_raster(&raster, format, 0.9).unwrap();
            let b = encode_raster(&raster, format, 0.9).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: mapped JPEG quality is always in 1..=100.
        #[test]
        fn prop_jpeg_quality_in_range(quality in proptest::num::f32::ANY) {
            let q = jpeg_quality(quality);
            prop_assert!((1..=100).contains(&q));
        }
    }
}
