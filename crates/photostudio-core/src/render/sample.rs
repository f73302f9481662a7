//! Source sampling with bilinear and Lanczos3 interpolation.
//!
//! Coordinates are continuous source-space positions where pixel `i` covers
//! `[i, i + 1)`, so pixel centers sit at `i + 0.5`. Lookups outside the
//! image clamp to the nearest edge pixel. Interpolation is alpha-weighted so
//! transparent neighbours do not darken opaque ones.

use crate::decode::{Raster, CHANNELS};

/// Interpolation filter used when sampling the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Sample the source at a continuous position.
#[inline]
pub(crate) fn sample(image: &Raster, x: f64, y: f64, filter: InterpolationFilter) -> [u8; 4] {
    match filter {
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
    }
}

#[inline]
fn get_pixel_f64(image: &Raster, px: i64, py: i64) -> [f64; 4] {
    let px = px.clamp(0, image.width as i64 - 1) as usize;
    let py = py.clamp(0, image.height as i64 - 1) as usize;
    let idx = (py * image.width as usize + px) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Alpha-weighted accumulator for interpolated RGBA values.
#[derive(Default)]
struct Accum {
    color: [f64; 3],
    alpha: f64,
    weight: f64,
}

impl Accum {
    #[inline]
    fn add(&mut self, pixel: [f64; 4], weight: f64) {
        let aw = pixel[3] * weight;
        self.color[0] += pixel[0] * aw;
        self.color[1] += pixel[1] * aw;
        self.color[2] += pixel[2] * aw;
        self.alpha += aw;
        self.weight += weight;
    }

    fn finish(self) -> [u8; 4] {
        if self.weight.abs() < f64::EPSILON || self.alpha <= 0.0 {
            return [0, 0, 0, 0];
        }
        let alpha = self.alpha / self.weight;
        let mut out = [0u8; 4];
        for (o, c) in out.iter_mut().zip(self.color) {
            *o = (c / self.alpha).clamp(0.0, 255.0).round() as u8;
        }
        out[3] = alpha.clamp(0.0, 255.0).round() as u8;
        out
    }
}

/// Bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = Accum::default();
    acc.add(get_pixel_f64(image, x0, y0), (1.0 - tx) * (1.0 - ty));
    acc.add(get_pixel_f64(image, x0 + 1, y0), tx * (1.0 - ty));
    acc.add(get_pixel_f64(image, x0, y0 + 1), (1.0 - tx) * ty);
    acc.add(get_pixel_f64(image, x0 + 1, y0 + 1), tx * ty);
    acc.finish()
}

/// Lanczos3 interpolation over a 6x6 neighbourhood.
fn sample_lanczos3(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;

    let mut acc = Accum::default();
    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(fy - py as f64, 3.0);
        if wy == 0.0 {
            continue;
        }
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(fx - px as f64, 3.0) * wy;
            if weight != 0.0 {
                acc.add(get_pixel_f64(image, px, py), weight);
            }
        }
    }
    acc.finish()
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_pixel_center_is_exact() {
        let img = gradient(10, 10);
        for filter in [InterpolationFilter::Bilinear, InterpolationFilter::Lanczos3] {
            assert_eq!(sample(&img, 3.5, 4.5, filter), img.pixel(3, 4));
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = Raster::new(2, 1, vec![0, 0, 0, 255, 100, 100, 100, 255]);
        assert_eq!(sample_bilinear(&img, 1.0, 0.5), [50, 50, 50, 255]);
    }

    #[test]
    fn test_out_of_bounds_clamps_to_edge() {
        let img = gradient(4, 4);
        assert_eq!(sample_bilinear(&img, -10.0, -10.0), img.pixel(0, 0));
        assert_eq!(sample_bilinear(&img, 40.0, 0.5), img.pixel(3, 0));
        assert_eq!(sample_lanczos3(&img, 40.0, 40.0), img.pixel(3, 3));
    }

    #[test]
    fn test_transparent_neighbour_does_not_darken() {
        let img = Raster::new(2, 1, vec![200, 100, 50, 255, 0, 0, 0, 0]);
        let px = sample_bilinear(&img, 1.0, 0.5);
        assert_eq!(&px[..3], &[200, 100, 50]);
        assert!(px[3] == 127 || px[3] == 128);
    }

    #[test]
    fn test_lanczos_weight() {
        assert_eq!(lanczos_weight(0.0, 3.0), 1.0);
        assert_eq!(lanczos_weight(3.0, 3.0), 0.0);
        assert!(lanczos_weight(1.0, 3.0).abs() < 1e-10);
        assert!(lanczos_weight(0.5, 3.0) > 0.5);
    }

    #[test]
    fn test_single_pixel_image() {
        let img = Raster::new(1, 1, vec![9, 8, 7, 255]);
        assert_eq!(sample_bilinear(&img, 0.2, 0.9), [9, 8, 7, 255]);
        assert_eq!(sample_lanczos3(&img, 0.7, 0.1), [9, 8, 7, 255]);
    }
}
