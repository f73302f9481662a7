//! Editor session bindings.
//!
//! `JsEditor` owns the loaded images and the current settings. JavaScript
//! keeps one instance per editor and calls into it from UI events.
//!
//! ```typescript
//! const editor = new JsEditor();
//! editor.add_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! editor.update('brightness', 120);
//! const frame = editor.render_preview();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width, frame.height), 0, 0);
//! ```

use photostudio_core::encode::ExportFormat;
use photostudio_core::export::{share_request, ExportArtifact, ExportOutcome};
use photostudio_core::render::RenderOptions;
use photostudio_core::settings::{parse_crop_input, CropRect};
use photostudio_core::{AdjustmentSettings, EditorSession};
use wasm_bindgen::prelude::*;

use crate::notice;
use crate::types::{JsExportArtifact, JsRenderedImage, JsSharePayload};

/// Editor state for JavaScript.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsEditor {
    session: EditorSession,
    options: RenderOptions,
}

#[wasm_bindgen]
impl JsEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditor {
        JsEditor::default()
    }

    /// Decode and append an image file. Returns the new image count.
    ///
    /// # Errors
    /// Returns an error if the bytes cannot be decoded; the collection is
    /// left unchanged.
    pub fn add_image(&mut self, name: String, bytes: &[u8]) -> Result<usize, JsValue> {
        let report = self.session.ingest([(name, bytes)]);
        if let Some(failure) = report.failed.first() {
            let message = format!("Could not load {}: {}", failure.name, failure.error);
            notice(&message);
            return Err(JsValue::from_str(&message));
        }
        Ok(self.session.images().len())
    }

    #[wasm_bindgen(getter)]
    pub fn image_count(&self) -> usize {
        self.session.images().len()
    }

    /// Filenames in collection order.
    pub fn image_names(&self) -> Vec<String> {
        self.session
            .images()
            .iter()
            .map(|img| img.name().to_string())
            .collect()
    }

    /// Index of the active image, or `undefined` when empty.
    #[wasm_bindgen(getter)]
    pub fn active_index(&self) -> Option<usize> {
        self.session.images().active_index()
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.session.select(index)
    }

    /// Remove the image at `index`.
    pub fn remove(&mut self, index: usize) -> bool {
        let id = self.session.images().iter().nth(index).map(|img| img.id());
        id.is_some_and(|id| self.session.remove(id))
    }

    /// Current settings as a plain object.
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.settings())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the settings. Missing fields take their neutral value and
    /// out-of-range values are clamped.
    pub fn set_settings(&mut self, value: JsValue) -> Result<(), JsValue> {
        let settings: AdjustmentSettings = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;
        self.session.update(settings);
        Ok(())
    }

    /// Set one slider field by name. Returns false for an unknown field.
    pub fn update(&mut self, field: &str, value: f64) -> bool {
        match self.session.settings().with_field(field, value) {
            Some(next) => {
                self.session.update(next);
                true
            }
            None => false,
        }
    }

    /// Set the crop rectangle from the four text inputs.
    pub fn set_crop(&mut self, x: &str, y: &str, w: &str, h: &str) {
        let crop = CropRect::new(
            parse_crop_input(x),
            parse_crop_input(y),
            parse_crop_input(w),
            parse_crop_input(h),
        );
        self.session.update_with(|s| s.crop = crop);
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Apply a preset by name (case-insensitive).
    pub fn apply_preset(&mut self, name: &str) -> bool {
        self.session.apply_preset(name)
    }

    /// Override render options (e.g. `{ max_dimension: 800 }`).
    pub fn set_render_options(&mut self, value: JsValue) -> Result<(), JsValue> {
        self.options = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid render options: {}", e)))?;
        Ok(())
    }

    /// Render the active image, or `undefined` when nothing is loaded.
    pub fn render_preview(&self) -> Option<JsRenderedImage> {
        self.session
            .render_active(&self.options)
            .map(JsRenderedImage::from)
    }

    /// CSS `filter` value for the current settings.
    pub fn filter_css(&self) -> String {
        self.session.filter_chain().to_css()
    }

    /// Export the active image in the format named by `mime`.
    ///
    /// Returns `undefined` when there is nothing to export or encoding fails.
    pub fn export_single(&self, mime: &str, timestamp_ms: f64) -> Option<JsExportArtifact> {
        let format = ExportFormat::from_mime(mime);
        let mut delivered = None;
        let outcome = self.session.export_active(
            format,
            timestamp_ms.max(0.0) as u64,
            &mut |artifact: ExportArtifact| delivered = Some(artifact),
        );

        if let ExportOutcome::Skipped(reason) = &outcome {
            notice(&format!("Export failed: {}", reason));
        }
        delivered.map(JsExportArtifact::from)
    }

    /// Export every image as JPEG, calling `callback(artifact)` once per file.
    ///
    /// Returns the number of files delivered.
    pub fn export_batch(&self, callback: &js_sys::Function) -> Result<usize, JsValue> {
        let mut first_error = None;
        let report = self.session.export_batch(&mut |artifact: ExportArtifact| {
            let value = JsValue::from(JsExportArtifact::from(artifact));
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                first_error.get_or_insert(e);
            }
        });

        for skipped in &report.skipped {
            notice(&format!("Skipped {}: {}", skipped.name, skipped.reason));
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(report.delivered.len()),
        }
    }

    /// JPEG payload for `navigator.share`, or `undefined` when nothing is
    /// loaded or encoding fails.
    pub fn share_payload(&self) -> Option<JsSharePayload> {
        let image = self.session.images().active()?;
        match share_request(image, &self.session.settings()) {
            Ok(request) => Some(request.into()),
            Err(e) => {
                notice(&format!("Share failed: {}", e));
                None
            }
        }
    }
}
