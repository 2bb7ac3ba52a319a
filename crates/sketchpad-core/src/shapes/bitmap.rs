//! Raster image element used when seeding the canvas from a snapshot.

use super::{ElementId, Paint};
use crate::surface::Surface;
use kurbo::Rect;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Immutable straight-alpha RGBA8 pixel buffer.
///
/// Clones share the pixels, so history entries and previews holding the
/// same image cost one buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct BitmapData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl BitmapData {
    /// Copy caller-supplied pixels into a new buffer.
    ///
    /// Returns `None` when a dimension is zero or the slice length does not
    /// match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[u8]) -> Option<Self> {
        Self::from_rgba8_vec(width, height, pixels.to_vec())
    }

    /// Take ownership of an already private pixel buffer.
    pub fn from_rgba8_vec(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels, not premultiplied.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl fmt::Debug for BitmapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// An image placed at a destination rectangle in canvas space.
#[derive(Debug, Clone)]
pub struct Bitmap {
    id: ElementId,
    image: BitmapData,
    dest: Rect,
    paint: Paint,
}

impl Bitmap {
    pub fn new(image: BitmapData, dest: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            dest: dest.abs(),
            paint: Paint::default(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn image(&self) -> &BitmapData {
        &self.image
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    /// The destination rectangle.
    pub fn bounds(&self) -> Rect {
        self.dest
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        if self.image.is_empty() {
            return;
        }
        surface.draw_image(&self.image, self.dest, &self.paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Element;

    #[test]
    fn test_rejects_mismatched_length() {
        assert!(BitmapData::from_rgba8(2, 2, &[0u8; 15]).is_none());
        assert!(BitmapData::from_rgba8(0, 2, &[]).is_none());
        assert!(BitmapData::from_rgba8(2, 2, &[0u8; 16]).is_some());
    }

    #[test]
    fn test_owns_private_copy() {
        let mut source = vec![255u8; 4];
        let data = BitmapData::from_rgba8(1, 1, &source).unwrap();
        source[0] = 0;
        assert_eq!(data.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_cloned_element_shares_pixels() {
        let data = BitmapData::from_rgba8_vec(64, 64, vec![7u8; 64 * 64 * 4]).unwrap();
        let element = Element::Bitmap(Bitmap::new(data, Rect::new(0.0, 0.0, 64.0, 64.0)));
        let copy = element.clone();

        let (Element::Bitmap(a), Element::Bitmap(b)) = (&element, &copy) else {
            panic!("expected bitmaps");
        };
        assert!(Arc::ptr_eq(&a.image().pixels, &b.image().pixels));
    }

    #[test]
    fn test_bounds_are_destination() {
        let data = BitmapData::from_rgba8(1, 1, &[0, 0, 0, 255]).unwrap();
        let bitmap = Bitmap::new(data, Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(bitmap.bounds(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }
}
