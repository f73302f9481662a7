//! Static catalog data: presets and slider ranges.
//!
//! The UI builds its preset buttons and range inputs from these so the
//! values are defined once, in the core.

use photostudio_core::preset::PRESETS;
use photostudio_core::settings::{parse_crop_input, SLIDERS};
use wasm_bindgen::prelude::*;

/// Presets as `[{ name, values: { brightness, ... } }]`.
#[wasm_bindgen]
pub fn presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&PRESETS[..]).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Preset names in display order.
#[wasm_bindgen]
pub fn preset_names() -> Vec<String> {
    PRESETS.iter().map(|p| p.name.to_string()).collect()
}

/// Slider ranges as `[{ field, label, min, max, step, neutral }]`.
#[wasm_bindgen]
pub fn slider_ranges() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&SLIDERS[..]).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Coerce a crop text input to a number in [0, 1] (non-numeric becomes 0).
#[wasm_bindgen]
pub fn clamp_crop_input(text: &str) -> f64 {
    parse_crop_input(text)
}
