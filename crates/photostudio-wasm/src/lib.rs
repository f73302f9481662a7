//! Photo Studio WASM - WebAssembly bindings for the Photo Studio editor
//!
//! This crate exposes photostudio-core to the JavaScript UI.
//!
//! # Module Structure
//!
//! - `editor` - `JsEditor`: images, settings, preview, export and share
//! - `catalog` - Presets, slider ranges and crop input coercion
//! - `types` - WASM-compatible wrapper types for rendered images and files
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor, presets } from '@photostudio/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! editor.add_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! editor.apply_preset('Vivid Pop');
//! const artifact = editor.export_single('image/png', Date.now());
//! ```

use wasm_bindgen::prelude::*;

mod catalog;
mod editor;
mod types;

pub use catalog::{clamp_crop_input, preset_names, presets, slider_ranges};
pub use editor::JsEditor;
pub use types::{JsExportArtifact, JsRenderedImage, JsSharePayload};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Show a non-fatal notice in the browser console.
pub(crate) fn notice(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
