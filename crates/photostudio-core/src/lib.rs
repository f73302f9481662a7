//! Photo Studio Core - Image transform pipeline
//!
//! This crate provides the editing pipeline behind the Photo Studio web
//! editor: decoding, crop/scale geometry, rotation, color filters, presets
//! and export encoding.

pub mod collection;
pub mod decode;
pub mod encode;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod preset;
pub mod render;
pub mod session;
pub mod settings;

pub use collection::{ImageCollection, ImageId, IngestReport, SourceImage};
pub use decode::{decode_image, DecodeError, Raster};
pub use encode::{encode_rendered, EncodeError, ExportFormat};
pub use export::{
    BatchItem, BatchReport, DownloadSink, ExportArtifact, ExportOutcome, ShareOutcome,
    ShareRequest, ShareTarget,
};
pub use filter::{build_filter_chain, FilterChain, FilterOp};
pub use geometry::{resolve_geometry, Geometry, MAX_OUTPUT_DIMENSION};
pub use preset::{find_preset, Preset, PRESETS};
pub use render::{render, render_raster, InterpolationFilter, RenderOptions, RenderedOutput};
pub use session::EditorSession;
pub use settings::{AdjustmentSettings, ColorAdjustments, CropRect, SliderSpec, SLIDERS};
