//! Render pipeline: source image + settings in, output raster out.
//!
//! # Pipeline
//!
//! 1. Resolve crop/scale geometry (bounded by `max_dimension`)
//! 2. Allocate a transparent output surface
//! 3. Draw the source rectangle stretched over the whole surface, rotated
//!    about the surface center
//! 4. Apply the filter chain to the drawn layer
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - The crop is stretched to exactly fill the output (no letterboxing)
//! - Corners uncovered by a rotated image stay transparent
//!
//! `render` is a pure function: preview and export call it with their own
//! settings snapshot and get an independent raster back.

mod sample;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::SourceImage;
use crate::decode::{Raster, CHANNELS};
use crate::filter::{apply_filter_chain, build_filter_chain};
use crate::geometry::{resolve_geometry, Geometry, MAX_OUTPUT_DIMENSION};
use crate::settings::AdjustmentSettings;

pub use sample::InterpolationFilter;

/// Rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Largest output edge in pixels.
    pub max_dimension: u32,
    /// Source sampling filter.
    pub interpolation: InterpolationFilter,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::preview()
    }
}

impl RenderOptions {
    /// Bilinear sampling, 1600px bound.
    pub fn preview() -> Self {
        Self {
            max_dimension: MAX_OUTPUT_DIMENSION,
            interpolation: InterpolationFilter::Bilinear,
        }
    }

    /// Lanczos3 sampling, 1600px bound.
    pub fn export() -> Self {
        Self {
            max_dimension: MAX_OUTPUT_DIMENSION,
            interpolation: InterpolationFilter::Lanczos3,
        }
    }
}

/// A rendered raster and the geometry that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub raster: Raster,
    pub geometry: Geometry,
}

impl RenderedOutput {
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    /// RGBA pixel data, suitable for `ImageData`.
    pub fn pixels(&self) -> &[u8] {
        &self.raster.pixels
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

/// Render a source image with the given settings.
pub fn render(
    image: &SourceImage,
    settings: &AdjustmentSettings,
    options: &RenderOptions,
) -> RenderedOutput {
    render_raster(image.raster(), settings, options)
}

/// Render a bare raster with the given settings.
///
/// Settings are sanitized first, so out-of-range values cannot produce an
/// invalid surface.
pub fn render_raster(
    source: &Raster,
    settings: &AdjustmentSettings,
    options: &RenderOptions,
) -> RenderedOutput {
    let settings = settings.sanitized();
    let geometry = resolve_geometry(
        source.width,
        source.height,
        &settings.crop,
        settings.scale,
        options.max_dimension,
    );

    let mut raster = draw(source, &geometry, settings.rotate, options.interpolation);

    let chain = build_filter_chain(&settings.adjustments);
    apply_filter_chain(&mut raster, &chain);

    debug!(
        src_width = source.width,
        src_height = source.height,
        out_width = geometry.output_width,
        out_height = geometry.output_height,
        rotate = settings.rotate,
        filter = %chain,
        "Rendered image"
    );

    RenderedOutput { raster, geometry }
}

/// True when an angle is a whole number of turns.
#[inline]
fn is_zero_rotation(angle_degrees: f64) -> bool {
    let normalized = angle_degrees % 360.0;
    normalized.abs() < 0.001 || (360.0 - normalized.abs()).abs() < 0.001
}

/// Draw the geometry's source rectangle onto a fresh output surface.
fn draw(
    source: &Raster,
    geometry: &Geometry,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Raster {
    let (out_w, out_h) = (geometry.output_width, geometry.output_height);

    if source.is_empty() {
        return Raster::transparent(out_w, out_h);
    }

    let rotated = !is_zero_rotation(angle_degrees);
    if !rotated {
        if let Some(copy) = copy_aligned(source, geometry) {
            return copy;
        }
    }

    let (sin, cos) = if rotated {
        angle_degrees.to_radians().sin_cos()
    } else {
        (0.0, 1.0)
    };

    let (dst_w, dst_h) = (out_w as f64, out_h as f64);
    let (half_w, half_h) = (dst_w / 2.0, dst_h / 2.0);
    let step_x = geometry.source.width / dst_w;
    let step_y = geometry.source.height / dst_h;

    let mut output = vec![0u8; out_w as usize * out_h as usize * CHANNELS];

    for dst_y in 0..out_h {
        for dst_x in 0..out_w {
            // Pixel center relative to the surface center.
            let dx = dst_x as f64 + 0.5 - half_w;
            let dy = dst_y as f64 + 0.5 - half_h;

            // Inverse of a clockwise rotation in y-down raster space.
            let local_x = dx * cos + dy * sin + half_w;
            let local_y = -dx * sin + dy * cos + half_h;

            if local_x < 0.0 || local_x >= dst_w || local_y < 0.0 || local_y >= dst_h {
                continue;
            }

            let src_x = geometry.source.x + local_x * step_x;
            let src_y = geometry.source.y + local_y * step_y;

            let idx = (dst_y as usize * out_w as usize + dst_x as usize) * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&sample::sample(source, src_x, src_y, filter));
        }
    }

    Raster::new(out_w, out_h, output)
}

/// Direct pixel copy when the source rectangle maps 1:1 onto the output.
fn copy_aligned(source: &Raster, geometry: &Geometry) -> Option<Raster> {
    let rect = &geometry.source;
    let fits = rect.is_pixel_aligned()
        && rect.width == geometry.output_width as f64
        && rect.height == geometry.output_height as f64
        && rect.x + rect.width <= source.width as f64
        && rect.y + rect.height <= source.height as f64;
    if !fits {
        return None;
    }

    let (left, top) = (rect.x as usize, rect.y as usize);
    let (out_w, out_h) = (geometry.output_width as usize, geometry.output_height as usize);
    let row_bytes = out_w * CHANNELS;
    let src_stride = source.width as usize * CHANNELS;

    let mut output = Vec::with_capacity(out_h * row_bytes);
    for y in 0..out_h {
        let start = (top + y) * src_stride + left * CHANNELS;
        output.extend_from_slice(&source.pixels[start..start + row_bytes]);
    }

    Some(Raster::new(geometry.output_width, geometry.output_height, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CropRect;

    /// Each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v / 2, 255 - v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    fn settings() -> AdjustmentSettings {
        AdjustmentSettings::new()
    }

    #[test]
    fn test_identity_render_reproduces_source() {
        let img = test_image(40, 30);
        let out = render_raster(&img, &settings(), &RenderOptions::preview());

        assert_eq!((out.width(), out.height()), (40, 30));
        assert_eq!(out.raster, img);
    }

    #[test]
    fn test_identity_render_lanczos_reproduces_source() {
        let img = test_image(16, 9);
        let out = render_raster(&img, &settings(), &RenderOptions::export());
        assert_eq!(out.raster, img);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let img = test_image(20, 10);
        let mut s = settings();
        s.rotate = -0.0;
        assert_eq!(render_raster(&img, &s, &RenderOptions::preview()).raster, img);
    }

    #[test]
    fn test_crop_copies_region() {
        let img = test_image(10, 10);
        let mut s = settings();
        s.crop = CropRect::new(0.3, 0.3, 0.4, 0.4);
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!((out.width(), out.height()), (4, 4));
        // First pixel comes from (3, 3).
        assert_eq!(out.raster.pixel(0, 0), img.pixel(3, 3));
        assert_eq!(out.raster.pixel(3, 3), img.pixel(6, 6));
    }

    #[test]
    fn test_scale_sets_output_size() {
        let img = test_image(100, 50);
        let mut s = settings();
        s.scale = 0.5;
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!((out.width(), out.height()), (50, 25));
        assert_eq!(out.pixels().len(), 50 * 25 * CHANNELS);
    }

    #[test]
    fn test_large_image_bounded() {
        let img = Raster::from_rgb(2000, 10, &vec![128u8; 2000 * 10 * 3]);
        let out = render_raster(&img, &settings(), &RenderOptions::preview());

        assert_eq!(out.width(), 1600);
        assert_eq!(out.height(), 8);
        assert!(out.pixels().chunks_exact(4).all(|px| px == [128, 128, 128, 255]));
    }

    #[test]
    fn test_rotation_keeps_output_size() {
        let img = test_image(40, 20);
        let mut s = settings();
        s.rotate = 30.0;
        let out = render_raster(&img, &s, &RenderOptions::preview());
        assert_eq!((out.width(), out.height()), (40, 20));
    }

    #[test]
    fn test_rotation_leaves_transparent_corners() {
        let img = Raster::from_rgb(40, 20, &vec![200u8; 40 * 20 * 3]);
        let mut s = settings();
        s.rotate = 45.0;
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!(out.raster.pixel(0, 0)[3], 0);
        assert_eq!(out.raster.pixel(20, 10), [200, 200, 200, 255]);
    }

    #[test]
    fn test_rotation_180_flips() {
        let img = test_image(8, 4);
        let mut s = settings();
        s.rotate = 180.0;
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!(out.raster.pixel(0, 0), img.pixel(7, 3));
        assert_eq!(out.raster.pixel(7, 3), img.pixel(0, 0));
    }

    #[test]
    fn test_rotation_is_clockwise() {
        // Left column bright, rest dark. After +90 degrees the bright column
        // lands on the top row.
        let mut pixels = Vec::new();
        for _y in 0..9 {
            for x in 0..9 {
                let v = if x == 0 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let img = Raster::new(9, 9, pixels);
        let mut s = settings();
        s.rotate = 90.0;
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!(out.raster.pixel(4, 0)[0], 255);
        assert_eq!(out.raster.pixel(4, 8)[0], 0);
    }

    #[test]
    fn test_crop_is_stretched_without_letterbox() {
        // Wide crop of a square image still fills the whole output.
        let img = Raster::from_rgb(10, 10, &[60u8; 10 * 10 * 3]);
        let mut s = settings();
        s.crop = CropRect::new(0.0, 0.0, 1.0, 0.25);
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert!(out.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_overflowing_crop_clamps_to_edge() {
        let img = test_image(10, 10);
        let mut s = settings();
        s.crop = CropRect::new(0.8, 0.0, 0.5, 1.0);
        let out = render_raster(&img, &s, &RenderOptions::preview());

        assert_eq!((out.width(), out.height()), (5, 10));
        // Columns past the right edge repeat the last source column.
        assert_eq!(out.raster.pixel(4, 2), img.pixel(9, 2));
        assert!(out.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_filters_applied_after_draw() {
        let img = Raster::from_rgb(4, 4, &[100u8; 4 * 4 * 3]);
        let mut s = settings();
        s.adjustments.invert = 100.0;
        let out = render_raster(&img, &s, &RenderOptions::preview());
        assert_eq!(out.raster.pixel(1, 1), [155, 155, 155, 255]);
    }

    #[test]
    fn test_small_blur_keeps_uniform_image_opaque() {
        let img = Raster::from_rgb(20, 20, &[90u8; 20 * 20 * 3]);
        for blur in [0.01, 0.05, 0.3] {
            let mut s = settings();
            s.adjustments.blur = blur;
            let out = render_raster(&img, &s, &RenderOptions::preview());
            assert!(
                out.pixels().chunks_exact(4).all(|px| px == [90, 90, 90, 255]),
                "blur {blur}"
            );
        }
    }

    #[test]
    fn test_out_of_range_settings_sanitized() {
        let img = test_image(10, 10);
        let mut s = settings();
        s.scale = f64::NAN;
        s.adjustments.brightness = f32::NAN;
        let out = render_raster(&img, &s, &RenderOptions::preview());
        assert_eq!(out.raster, img);
    }

    #[test]
    fn test_render_is_deterministic() {
        let img = test_image(30, 20);
        let mut s = settings();
        s.rotate = 12.0;
        s.scale = 1.3;
        s.adjustments.sepia = 40.0;
        let a = render_raster(&img, &s, &RenderOptions::export());
        let b = render_raster(&img, &s, &RenderOptions::export());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_source_renders_transparent() {
        let img = Raster::new(0, 0, vec![]);
        let out = render_raster(&img, &settings(), &RenderOptions::preview());
        assert_eq!((out.width(), out.height()), (1, 1));
        assert_eq!(out.raster.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_render_options_default_is_preview() {
        assert_eq!(RenderOptions::default(), RenderOptions::preview());
        assert_eq!(RenderOptions::export().interpolation, InterpolationFilter::Lanczos3);
    }
}
