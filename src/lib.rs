//! texquad: software rasterizer for texture-mapped quads
//!
//! Draws textured quadrilaterals into plain in-memory pixel buffers with no
//! hardware acceleration. The `rasterizer` module holds the whole pipeline;
//! `scene` wraps it with RON scene files and PNG output.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod logging;
pub mod rasterizer;
pub mod scene;
