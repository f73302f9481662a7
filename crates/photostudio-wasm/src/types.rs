//! WASM-compatible wrapper types for rendered output and export payloads.
//!
//! Byte buffers live in WASM memory. Getters that return `Vec<u8>` copy the
//! data into a JavaScript `Uint8Array`.

use photostudio_core::export::{ExportArtifact, ShareRequest};
use photostudio_core::render::RenderedOutput;
use wasm_bindgen::prelude::*;

/// A rendered image for JavaScript.
///
/// Pixels are RGBA, ready for `new ImageData(new Uint8ClampedArray(pixels), width, height)`.
#[wasm_bindgen]
pub struct JsRenderedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRenderedImage {
    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl From<RenderedOutput> for JsRenderedImage {
    fn from(output: RenderedOutput) -> Self {
        let raster = output.into_raster();
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }
}

/// An encoded file to download.
#[wasm_bindgen]
pub struct JsExportArtifact {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsExportArtifact {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// Encoded file bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<ExportArtifact> for JsExportArtifact {
    fn from(artifact: ExportArtifact) -> Self {
        Self {
            filename: artifact.filename,
            mime_type: artifact.mime_type.to_string(),
            bytes: artifact.bytes,
        }
    }
}

/// Everything JavaScript needs to build a `navigator.share` call.
///
/// ```typescript
/// const payload = editor.share_payload();
/// if (payload && navigator.share) {
///   const file = new File([payload.bytes()], payload.filename, { type: payload.mimeType });
///   await navigator.share({ files: [file], title: payload.title, text: payload.text });
/// }
/// ```
#[wasm_bindgen]
pub struct JsSharePayload {
    request: ShareRequest,
}

#[wasm_bindgen]
impl JsSharePayload {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.request.filename.to_string()
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.request.mime_type.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.request.title.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.request.text.to_string()
    }

    /// JPEG bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.request.bytes.clone()
    }
}

impl From<ShareRequest> for JsSharePayload {
    fn from(request: ShareRequest) -> Self {
        Self { request }
    }
}
