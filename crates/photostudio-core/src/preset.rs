//! Built-in presets: named, complete sets of color adjustments.

use serde::Serialize;

use crate::settings::{AdjustmentSettings, ColorAdjustments};

/// A named set of adjustment values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub values: ColorAdjustments,
}

impl Preset {
    /// Replace the adjustment fields of `settings`, keeping rotate, scale and crop.
    pub fn apply_to(&self, settings: &AdjustmentSettings) -> AdjustmentSettings {
        settings.with_adjustments(self.values)
    }
}

const fn adjustments(
    brightness: f32,
    contrast: f32,
    saturation: f32,
    hue: f32,
    blur: f32,
    grayscale: f32,
    sepia: f32,
    invert: f32,
    exposure: f32,
) -> ColorAdjustments {
    ColorAdjustments {
        brightness,
        contrast,
        saturation,
        hue,
        blur,
        grayscale,
        sepia,
        invert,
        exposure,
    }
}

/// Presets in display order.
pub const PRESETS: [Preset; 5] = [
    Preset {
        name: "Original",
        values: ColorAdjustments::NEUTRAL,
    },
    Preset {
        name: "Vivid Pop",
        values: adjustments(110.0, 115.0, 135.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0),
    },
    Preset {
        name: "Film Warm",
        values: adjustments(105.0, 95.0, 110.0, 10.0, 0.0, 0.0, 18.0, 0.0, 4.0),
    },
    Preset {
        name: "Mono",
        values: adjustments(100.0, 120.0, 0.0, 0.0, 0.0, 100.0, 0.0, 0.0, 0.0),
    },
    Preset {
        name: "Noir",
        values: adjustments(95.0, 140.0, 0.0, 0.0, 1.0, 100.0, 0.0, 0.0, -5.0),
    },
];

/// Look up a preset by name, ignoring ASCII case and surrounding whitespace.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
