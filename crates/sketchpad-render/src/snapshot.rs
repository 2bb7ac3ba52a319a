//! Raster snapshot export and import.
//!
//! Export renders the canvas at unit scale and encodes it as PNG. Import
//! decodes any supported image and replaces the drawing with it. Rendering,
//! encoding and decoding run on a worker thread; the returned futures only
//! wait for it.

use crate::raster::PixmapSurface;
use futures::channel::oneshot;
use sketchpad_core::shapes::BitmapData;
use sketchpad_core::{CanvasScene, DrawingEngine};
use thiserror::Error;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Nothing to export: the canvas has no elements")]
    Empty,
    #[error("Could not allocate a {0}x{1} pixmap")]
    Allocation(u32, u32),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Decoded image has no pixels")]
    InvalidImage,
    #[error("Could not start snapshot worker: {0}")]
    Spawn(std::io::Error),
    #[error("Snapshot worker stopped before finishing")]
    WorkerLost,
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Encode straight-alpha RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> SnapshotResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

/// Decode PNG, JPEG or WebP bytes into a bitmap.
pub fn decode_image(bytes: &[u8]) -> SnapshotResult<BitmapData> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    BitmapData::from_rgba8_vec(width, height, rgba.into_raw()).ok_or(SnapshotError::InvalidImage)
}

/// Pixel size of the scene (at least 1x1).
pub fn snapshot_size(scene: &CanvasScene) -> (u32, u32) {
    let size = scene.size();
    let width = size.width.round().max(1.0) as u32;
    let height = size.height.round().max(1.0) as u32;
    (width, height)
}

/// Render a scene and its elements to PNG.
pub fn render_snapshot(scene: &CanvasScene) -> SnapshotResult<Vec<u8>> {
    if scene.is_empty() {
        return Err(SnapshotError::Empty);
    }
    let (width, height) = snapshot_size(scene);
    let mut surface =
        PixmapSurface::new(width, height).ok_or(SnapshotError::Allocation(width, height))?;
    scene.render(&mut surface);
    encode_png(&surface.to_rgba8(), width, height)
}

/// Run `job` on a fresh worker thread and wait for its result.
async fn on_worker<T, F>(job: F) -> SnapshotResult<T>
where
    F: FnOnce() -> SnapshotResult<T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("sketchpad-snapshot".to_string())
        .spawn(move || {
            // The caller may have dropped the future.
            let _ = tx.send(job());
        })
        .map_err(SnapshotError::Spawn)?;
    rx.await.map_err(|_| SnapshotError::WorkerLost)?
}

/// Export the canvas as PNG bytes. `None` when there is nothing to export
/// or encoding failed.
///
/// The canvas is captured when this is called, so the engine stays free
/// for input while the returned future is pending.
pub fn export_snapshot(
    engine: &DrawingEngine,
) -> impl Future<Output = Option<Vec<u8>>> + Send + use<> {
    let scene = engine.scene();
    async move {
        if scene.is_empty() {
            log::debug!("Snapshot export skipped: no elements");
            return None;
        }
        match on_worker(move || render_snapshot(&scene)).await {
            Ok(png_data) => {
                log::info!("Snapshot export complete: {} bytes", png_data.len());
                Some(png_data)
            }
            Err(e) => {
                log::warn!("Snapshot export failed: {}", e);
                None
            }
        }
    }
}

/// Replace the drawing with the image in `bytes`.
///
/// Undecodable input clears the canvas instead.
pub async fn import_snapshot(engine: &mut DrawingEngine, bytes: &[u8]) {
    let bytes = bytes.to_vec();
    match on_worker(move || decode_image(&bytes)).await {
        Ok(bitmap) => {
            log::info!("Snapshot import: {}x{}", bitmap.width(), bitmap.height());
            engine.load_bitmap(bitmap);
        }
        Err(e) => {
            log::warn!("Snapshot import failed, clearing canvas: {}", e);
            engine.clear();
        }
    }
}
