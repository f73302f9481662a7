//! Pixel evaluation of filter operations.
//!
//! Color ops follow the Filter Effects definitions:
//! - brightness, contrast and invert are linear transfer functions
//! - saturate, hue-rotate, grayscale and sepia are 3x3 color matrices
//!
//! Channels are processed as f32 in [0, 1] and clamped after every op.
//! Consecutive color ops are fused into a single pass over the pixels;
//! blur splits the chain because it needs the whole raster.

use crate::decode::{Raster, CHANNELS};

use super::{FilterChain, FilterOp};

type Matrix3 = [[f32; 3]; 3];

/// Apply a filter chain to a raster in place.
///
/// Identity ops are skipped. Alpha is left untouched by color ops and fully
/// transparent pixels are not recolored.
pub fn apply_filter_chain(raster: &mut Raster, chain: &FilterChain) {
    let mut pending: Vec<FilterOp> = Vec::new();

    for op in chain.iter().filter(|op| !op.is_identity()) {
        if let FilterOp::Blur(sigma) = *op {
            apply_color_ops(&mut raster.pixels, &pending);
            pending.clear();
            apply_blur(raster, sigma);
        } else {
            pending.push(*op);
        }
    }

    apply_color_ops(&mut raster.pixels, &pending);
}

/// Evaluate a sequence of color ops on one RGB triple in [0, 1].
pub fn apply_color_ops_to_rgb(mut rgb: [f32; 3], ops: &[FilterOp]) -> [f32; 3] {
    for op in ops {
        rgb = apply_color_op(rgb, op);
    }
    rgb
}

fn apply_color_ops(pixels: &mut [u8], ops: &[FilterOp]) {
    if ops.is_empty() {
        return;
    }

    for px in pixels.chunks_exact_mut(CHANNELS) {
        if px[3] == 0 {
            continue;
        }
        let rgb = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ];
        let [r, g, b] = apply_color_ops_to_rgb(rgb, ops);
        px[0] = to_byte(r);
        px[1] = to_byte(g);
        px[2] = to_byte(b);
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn apply_color_op(rgb: [f32; 3], op: &FilterOp) -> [f32; 3] {
    let out = match *op {
        FilterOp::Brightness(gain) => rgb.map(|c| c * gain),
        FilterOp::Contrast(pct) => {
            let amount = pct / 100.0;
            rgb.map(|c| (c - 0.5) * amount + 0.5)
        }
        FilterOp::Saturate(pct) => mul(&saturate_matrix(pct / 100.0), rgb),
        FilterOp::HueRotate(deg) => mul(&hue_rotate_matrix(deg), rgb),
        FilterOp::Grayscale(pct) => mul(&grayscale_matrix(unit_amount(pct)), rgb),
        FilterOp::Sepia(pct) => mul(&sepia_matrix(unit_amount(pct)), rgb),
        FilterOp::Invert(pct) => {
            let amount = unit_amount(pct);
            rgb.map(|c| amount + c * (1.0 - 2.0 * amount))
        }
        FilterOp::Blur(_) => rgb,
    };
    out.map(|c| c.clamp(0.0, 1.0))
}

/// Percentage to a [0, 1] amount, capped at 100%.
#[inline]
fn unit_amount(pct: f32) -> f32 {
    (pct / 100.0).clamp(0.0, 1.0)
}

#[inline]
fn mul(m: &Matrix3, [r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let k = 1.0 - amount;
    [
        [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix3 {
    let k = 1.0 - amount;
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}

/// Gaussian blur on premultiplied color so transparent regions do not bleed
/// black into opaque edges. Samples past the border clamp to the edge pixel.
fn apply_blur(raster: &mut Raster, sigma: f32) {
    if sigma <= 0.0 || raster.is_empty() {
        return;
    }

    let (width, height) = (raster.width as usize, raster.height as usize);
    let kernel = gaussian_kernel(sigma);

    let buf: Vec<[f32; 4]> = raster
        .pixels
        .chunks_exact(CHANNELS)
        .map(premultiply)
        .collect();
    let buf = blur_pass(&buf, width, height, &kernel, Axis::Horizontal);
    let buf = blur_pass(&buf, width, height, &kernel, Axis::Vertical);

    for (dst, px) in raster.pixels.chunks_exact_mut(CHANNELS).zip(&buf) {
        dst.copy_from_slice(&unpremultiply(*px));
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Normalized 1D Gaussian weights, radius `ceil(3 * sigma)` and at least 1.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = ((sigma * 3.0).ceil() as usize).max(1);
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

fn blur_pass(
    src: &[[f32; 4]],
    width: usize,
    height: usize,
    kernel: &[f32],
    axis: Axis,
) -> Vec<[f32; 4]> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![[0.0f32; 4]; src.len()];

    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 4];
            for (k, weight) in kernel.iter().enumerate() {
                let offset = k as isize - radius;
                let idx = match axis {
                    Axis::Horizontal => {
                        let sx = (x as isize + offset).clamp(0, width as isize - 1) as usize;
                        y * width + sx
                    }
                    Axis::Vertical => {
                        let sy = (y as isize + offset).clamp(0, height as isize - 1) as usize;
                        sy * width + x
                    }
                };
                for (a, c) in acc.iter_mut().zip(src[idx]) {
                    *a += c * weight;
                }
            }
            out[y * width + x] = acc;
        }
    }
    out
}

#[inline]
fn premultiply(px: &[u8]) -> [f32; 4] {
    let a = px[3] as f32 / 255.0;
    [
        px[0] as f32 * a,
        px[1] as f32 * a,
        px[2] as f32 * a,
        px[3] as f32,
    ]
}

#[inline]
fn unpremultiply([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    let alpha = a.clamp(0.0, 255.0).round();
    if alpha == 0.0 {
        return [0, 0, 0, 0];
    }
    let scale = 255.0 / a;
    let channel = |c: f32| (c * scale).clamp(0.0, 255.0).round() as u8;
    [channel(r), channel(g), channel(b), alpha as u8]
}
