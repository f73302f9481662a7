//! Filter chain construction from adjustment settings.

use std::fmt;

use serde::Serialize;

use crate::settings::ColorAdjustments;

/// One composable filter operation.
///
/// Units follow the CSS filter functions of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "kebab-case")]
pub enum FilterOp {
    /// Multiplicative gain (1.0 = unchanged).
    Brightness(f32),
    /// Percentage (100 = unchanged).
    Contrast(f32),
    /// Percentage (100 = unchanged).
    Saturate(f32),
    /// Degrees.
    HueRotate(f32),
    /// Gaussian standard deviation in pixels.
    Blur(f32),
    /// Percentage, capped at 100.
    Grayscale(f32),
    /// Percentage, capped at 100.
    Sepia(f32),
    /// Percentage, capped at 100.
    Invert(f32),
}

impl FilterOp {
    /// True if applying this op cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        match *self {
            FilterOp::Brightness(gain) => gain == 1.0,
            FilterOp::Contrast(pct) | FilterOp::Saturate(pct) => pct == 100.0,
            FilterOp::HueRotate(deg) => deg % 360.0 == 0.0,
            FilterOp::Blur(v) | FilterOp::Grayscale(v) | FilterOp::Sepia(v) | FilterOp::Invert(v) => {
                v <= 0.0
            }
        }
    }

    /// The op's parameter in its own unit.
    pub fn amount(&self) -> f32 {
        match *self {
            FilterOp::Brightness(v)
            | FilterOp::Contrast(v)
            | FilterOp::Saturate(v)
            | FilterOp::HueRotate(v)
            | FilterOp::Blur(v)
            | FilterOp::Grayscale(v)
            | FilterOp::Sepia(v)
            | FilterOp::Invert(v) => v,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Brightness(gain) => write!(f, "brightness({gain})"),
            FilterOp::Contrast(pct) => write!(f, "contrast({pct}%)"),
            FilterOp::Saturate(pct) => write!(f, "saturate({pct}%)"),
            FilterOp::HueRotate(deg) => write!(f, "hue-rotate({deg}deg)"),
            FilterOp::Blur(px) => write!(f, "blur({px}px)"),
            FilterOp::Grayscale(pct) => write!(f, "grayscale({pct}%)"),
            FilterOp::Sepia(pct) => write!(f, "sepia({pct}%)"),
            FilterOp::Invert(pct) => write!(f, "invert({pct}%)"),
        }
    }
}

/// Ordered list of filter operations.
///
/// `Display` renders the CSS `filter` property value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterOp> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if no op in the chain can change a pixel.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(FilterOp::is_identity)
    }

    /// CSS `filter` value, e.g. `brightness(1) contrast(100%) ...`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Brightness gain with exposure folded in: `brightness/100 + exposure/100`.
///
/// Exposure is an additive offset on the brightness multiplier rather than a
/// separate photographic exposure operation.
#[inline]
pub fn brightness_gain(adjustments: &ColorAdjustments) -> f32 {
    adjustments.brightness / 100.0 + adjustments.exposure / 100.0
}

/// Map adjustment settings to an ordered filter chain.
///
/// Order is fixed: brightness, contrast, saturate, hue-rotate, blur,
/// grayscale, sepia, invert. Brightness, contrast, saturate and hue-rotate
/// are always present; blur, grayscale, sepia and invert are omitted when
/// exactly zero.
pub fn build_filter_chain(adjustments: &ColorAdjustments) -> FilterChain {
    let mut ops = vec![
        FilterOp::Brightness(brightness_gain(adjustments)),
        FilterOp::Contrast(adjustments.contrast),
        FilterOp::Saturate(adjustments.saturation),
        FilterOp::HueRotate(adjustments.hue),
    ];

    let optional = [
        FilterOp::Blur(adjustments.blur),
        FilterOp::Grayscale(adjustments.grayscale),
        FilterOp::Sepia(adjustments.sepia),
        FilterOp::Invert(adjustments.invert),
    ];
    ops.extend(optional.into_iter().filter(|op| op.amount() != 0.0));

    FilterChain { ops }
}
