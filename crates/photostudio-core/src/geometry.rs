//! Crop and scale geometry.
//!
//! Converts a normalized crop rectangle and a scale factor into the source
//! pixel rectangle to sample and the output surface size, bounded by a
//! maximum dimension while preserving aspect ratio.
//!
//! # Coordinate System
//!
//! - Crop coordinates are normalized (0.0 to 1.0) relative to image dimensions
//! - Source rectangle coordinates are fractional pixels
//! - Origin is top-left corner

use serde::Serialize;

use crate::settings::{CropRect, SCALE};

/// Largest output edge, for both preview and export.
pub const MAX_OUTPUT_DIMENSION: u32 = 1600;

/// Source-space rectangle in (fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    /// True when the rectangle sits on whole pixels.
    pub fn is_pixel_aligned(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.fract() == 0.0)
    }
}

/// Resolved geometry for one render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    /// Region of the source image that is drawn.
    pub source: SourceRect,
    /// Unclamped output width (`source.width * scale`).
    pub target_width: f64,
    /// Unclamped output height (`source.height * scale`).
    pub target_height: f64,
    /// Downscale applied to respect the maximum dimension (at most 1).
    pub ratio: f64,
    /// Final output width in pixels.
    pub output_width: u32,
    /// Final output height in pixels.
    pub output_height: u32,
}

/// Resolve crop and scale against a source image.
///
/// ```text
/// sx = x*W   sy = y*H   sw = max(1, w*W)   sh = max(1, h*H)
/// targetW = sw*scale    targetH = sh*scale
/// r  = min(maxDim/targetW, maxDim/targetH, 1)
/// cw = max(1, round(targetW*r))   ch = max(1, round(targetH*r))
/// ```
///
/// Output dimensions never exceed `max_dimension` and never fall below 1.
/// A non-finite or non-positive scale is treated as 1; other values are
/// clamped to the scale slider range.
pub fn resolve_geometry(
    width: u32,
    height: u32,
    crop: &CropRect,
    scale: f64,
    max_dimension: u32,
) -> Geometry {
    let crop = crop.clamped();
    let scale = if scale.is_finite() && scale > 0.0 {
        scale.clamp(SCALE.min, SCALE.max)
    } else {
        1.0
    };
    let max_dim = max_dimension.max(1) as f64;

    let w = width as f64;
    let h = height as f64;

    let source = SourceRect {
        x: crop.x * w,
        y: crop.y * h,
        width: (crop.w * w).max(1.0),
        height: (crop.h * h).max(1.0),
    };

    let target_width = source.width * scale;
    let target_height = source.height * scale;
    let ratio = (max_dim / target_width).min(max_dim / target_height).min(1.0);

    let output_width = fit_edge(target_width * ratio, max_dim);
    let output_height = fit_edge(target_height * ratio, max_dim);

    Geometry {
        source,
        target_width,
        target_height,
        ratio,
        output_width,
        output_height,
    }
}

#[inline]
fn fit_edge(length: f64, max_dim: f64) -> u32 {
    length.round().clamp(1.0, max_dim) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn crop_strategy() -> impl Strategy<Value = CropRect> {
        (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
            .prop_map(|(x, y, w, h)| CropRect::new(x, y, w, h))
    }

    proptest! {
        /// Property: output dimensions stay within [1, 1600].
        #[test]
        fn prop_output_bounded(
            width in 1u32..=20_000,
            height in 1u32..=20_000,
            crop in crop_strategy(),
            scale in 0.1f64..=3.0,
        ) {
            let g = resolve_geometry(width, height, &crop, scale, MAX_OUTPUT_DIMENSION);

            prop_assert!(g.output_width >= 1 && g.output_width <= MAX_OUTPUT_DIMENSION);
            prop_assert!(g.output_height >= 1 && g.output_height <= MAX_OUTPUT_DIMENSION);
        }

        /// Property: the clamp ratio never enlarges.
        #[test]
        fn prop_ratio_at_most_one(
            width in 1u32..=10_000,
            height in 1u32..=10_000,
            scale in 0.1f64..=3.0,
        ) {
            let g = resolve_geometry(width, height, &CropRect::FULL, scale, MAX_OUTPUT_DIMENSION);
            prop_assert!(g.ratio > 0.0 && g.ratio <= 1.0);
        }

        /// Property: source rectangle is never smaller than one pixel.
        #[test]
        fn prop_source_at_least_one_pixel(
            width in 1u32..=5_000,
            height in 1u32..=5_000,
            crop in crop_strategy(),
        ) {
            let g = resolve_geometry(width, height, &crop, 1.0, MAX_OUTPUT_DIMENSION);
            prop_assert!(g.source.width >= 1.0);
            prop_assert!(g.source.height >= 1.0);
        }

        /// Property: each edge is the scaled target rounded to the nearest pixel.
        #[test]
        fn prop_edges_are_rounded_targets(
            width in 50u32..=4_000,
            height in 50u32..=4_000,
            scale in 0.1f64..=3.0,
        ) {
            let g = resolve_geometry(width, height, &CropRect::FULL, scale, MAX_OUTPUT_DIMENSION);
            let exact_w = g.target_width * g.ratio;
            let exact_h = g.target_height * g.ratio;
            prop_assert!((g.output_width as f64 - exact_w).abs() <= 0.5 + 1e-9);
            prop_assert!((g.output_height as f64 - exact_h).abs() <= 0.5 + 1e-9);
        }
    }
}
