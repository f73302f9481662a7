//! Edit settings: the value objects the UI mutates and the pipeline reads.
//!
//! Settings are plain immutable snapshots. Every render, export or batch
//! receives its own copy, so nothing in the pipeline observes a half-applied
//! change.

use serde::{Deserialize, Serialize};

/// Clamp a normalized coordinate to [0, 1]. NaN becomes 0.
#[inline]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Parse a crop text field, coercing anything non-numeric to 0.
pub fn parse_crop_input(text: &str) -> f64 {
    text.trim().parse::<f64>().map(clamp01).unwrap_or(0.0)
}

/// Normalized crop rectangle within the source image.
///
/// Each field is clamped to [0, 1] independently. `x + w` may exceed 1;
/// the renderer samples clamp-to-edge past the image border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropRect {
    /// The whole image.
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    /// Create a crop rectangle, clamping every field to [0, 1].
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: clamp01(x),
            y: clamp01(y),
            w: clamp01(w),
            h: clamp01(h),
        }
    }

    /// Return a copy with every field clamped to [0, 1].
    pub fn clamped(self) -> Self {
        Self::new(self.x, self.y, self.w, self.h)
    }

    /// True when the rectangle covers the whole image.
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

/// Range metadata for one slider control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSpec {
    /// Settings field name, as serialized.
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Neutral value, also the fallback for NaN input.
    pub neutral: f64,
}

impl SliderSpec {
    const fn new(field: &'static str, label: &'static str, min: f64, max: f64, neutral: f64) -> Self {
        Self {
            field,
            label,
            min,
            max,
            step: 1.0,
            neutral,
        }
    }

    /// Clamp a value into range; NaN falls back to the neutral value.
    pub fn sanitize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.neutral;
        }
        value.clamp(self.min, self.max)
    }
}

pub const BRIGHTNESS: SliderSpec = SliderSpec::new("brightness", "Brightness", 0.0, 200.0, 100.0);
pub const CONTRAST: SliderSpec = SliderSpec::new("contrast", "Contrast", 0.0, 200.0, 100.0);
pub const SATURATION: SliderSpec = SliderSpec::new("saturation", "Saturation", 0.0, 300.0, 100.0);
pub const HUE: SliderSpec = SliderSpec::new("hue", "Hue", -180.0, 180.0, 0.0);
pub const EXPOSURE: SliderSpec = SliderSpec::new("exposure", "Exposure", -50.0, 50.0, 0.0);
pub const BLUR: SliderSpec = SliderSpec::new("blur", "Blur", 0.0, 10.0, 0.0);
pub const GRAYSCALE: SliderSpec = SliderSpec::new("grayscale", "Grayscale", 0.0, 100.0, 0.0);
pub const SEPIA: SliderSpec = SliderSpec::new("sepia", "Sepia", 0.0, 100.0, 0.0);
pub const INVERT: SliderSpec = SliderSpec::new("invert", "Invert", 0.0, 100.0, 0.0);
pub const ROTATE: SliderSpec = SliderSpec::new("rotate", "Rotate", -180.0, 180.0, 0.0);
pub const SCALE: SliderSpec = SliderSpec {
    step: 0.01,
    ..SliderSpec::new("scale", "Scale", 0.1, 3.0, 1.0)
};

/// Slider controls in panel order: the adjust panel, then transform.
pub const SLIDERS: [SliderSpec; 11] = [
    BRIGHTNESS, CONTRAST, SATURATION, HUE, EXPOSURE, BLUR, GRAYSCALE, SEPIA, INVERT, ROTATE, SCALE,
];

/// Step of the numeric crop inputs (range is always 0 to 1).
pub const CROP_STEP: f64 = 0.01;

/// Color and tone adjustments: the fields a preset replaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjustments {
    /// Brightness percentage (0 to 200, 100 = neutral)
    pub brightness: f32,
    /// Contrast percentage (0 to 200, 100 = neutral)
    pub contrast: f32,
    /// Saturation percentage (0 to 300, 100 = neutral)
    pub saturation: f32,
    /// Hue rotation in degrees (-180 to 180)
    pub hue: f32,
    /// Gaussian blur radius in pixels (0 to 10)
    pub blur: f32,
    /// Grayscale amount percentage (0 to 100)
    pub grayscale: f32,
    /// Sepia amount percentage (0 to 100)
    pub sepia: f32,
    /// Invert amount percentage (0 to 100)
    pub invert: f32,
    /// Additive offset on the brightness gain (-50 to 50)
    pub exposure: f32,
}

impl Default for ColorAdjustments {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl ColorAdjustments {
    pub const NEUTRAL: ColorAdjustments = ColorAdjustments {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
        hue: 0.0,
        blur: 0.0,
        grayscale: 0.0,
        sepia: 0.0,
        invert: 0.0,
        exposure: 0.0,
    };

    /// Check if all values are neutral.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Return a copy with every field clamped into its slider range.
    pub fn sanitized(&self) -> Self {
        let s = |spec: &SliderSpec, v: f32| spec.sanitize(v as f64) as f32;
        Self {
            brightness: s(&BRIGHTNESS, self.brightness),
            contrast: s(&CONTRAST, self.contrast),
            saturation: s(&SATURATION, self.saturation),
            hue: s(&HUE, self.hue),
            blur: s(&BLUR, self.blur),
            grayscale: s(&GRAYSCALE, self.grayscale),
            sepia: s(&SEPIA, self.sepia),
            invert: s(&INVERT, self.invert),
            exposure: s(&EXPOSURE, self.exposure),
        }
    }
}

/// Complete edit state applied to one image.
///
/// Serialized flat (`{ brightness, ..., rotate, scale, crop }`) so the UI
/// sees one object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSettings {
    #[serde(flatten)]
    pub adjustments: ColorAdjustments,
    /// Rotation in degrees, clockwise-positive (-180 to 180)
    pub rotate: f64,
    /// Output scale factor (0.1 to 3)
    pub scale: f64,
    pub crop: CropRect,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            adjustments: ColorAdjustments::NEUTRAL,
            rotate: 0.0,
            scale: 1.0,
            crop: CropRect::FULL,
        }
    }
}

impl AdjustmentSettings {
    /// Create settings with every field neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if these settings leave the image untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Return a copy with only the adjustment fields replaced.
    pub fn with_adjustments(&self, adjustments: ColorAdjustments) -> Self {
        Self {
            adjustments,
            ..*self
        }
    }

    /// Return a copy with one slider field set by its serialized name.
    ///
    /// The value is clamped into the slider's range. Returns `None` for an
    /// unknown field.
    pub fn with_field(&self, field: &str, value: f64) -> Option<Self> {
        let spec = SLIDERS.iter().find(|s| s.field == field)?;
        let value = spec.sanitize(value);
        let mut next = *self;
        let adj = &mut next.adjustments;
        match spec.field {
            "brightness" => adj.brightness = value as f32,
            "contrast" => adj.contrast = value as f32,
            "saturation" => adj.saturation = value as f32,
            "hue" => adj.hue = value as f32,
            "exposure" => adj.exposure = value as f32,
            "blur" => adj.blur = value as f32,
            "grayscale" => adj.grayscale = value as f32,
            "sepia" => adj.sepia = value as f32,
            "invert" => adj.invert = value as f32,
            "rotate" => next.rotate = value,
            "scale" => next.scale = value,
            _ => return None,
        }
        Some(next)
    }

    /// Return a copy with every field clamped into range.
    pub fn sanitized(&self) -> Self {
        Self {
            adjustments: self.adjustments.sanitized(),
            rotate: ROTATE.sanitize(self.rotate),
            scale: SCALE.sanitize(self.scale),
            crop: self.crop.clamped(),
        }
    }
}
