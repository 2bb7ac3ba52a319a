//! Sketchpad Render Library
//!
//! CPU raster backend for the drawing engine's `Surface` and the lossless
//! snapshot codec built on it.

mod raster;
pub mod snapshot;

pub use raster::PixmapSurface;
pub use snapshot::{
    SnapshotError, SnapshotResult, decode_image, encode_png, export_snapshot, import_snapshot,
};
