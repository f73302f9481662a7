//! Filter chain: adjustment settings mapped to composable color operations.
//!
//! # Chain Order
//!
//! 1. Brightness (gain, exposure folded in)
//! 2. Contrast
//! 3. Saturate
//! 4. Hue-rotate
//! 5. Blur (only when non-zero)
//! 6. Grayscale (only when non-zero)
//! 7. Sepia (only when non-zero)
//! 8. Invert (only when non-zero)
//!
//! The chain is data first: it can be rendered to a CSS `filter` string for
//! a cheap live preview, or evaluated on a [`Raster`](crate::decode::Raster)
//! by the render pipeline.

mod chain;
mod color;

pub use chain::{brightness_gain, build_filter_chain, FilterChain, FilterOp};
pub use color::{apply_color_ops_to_rgb, apply_filter_chain};
