//! Drawing surface abstraction.
//!
//! The engine and its elements only talk to this trait; concrete backends
//! (an offscreen raster, a GPU scene, a host toolkit's painter) implement it.

use crate::shapes::{BitmapData, Paint};
use kurbo::{Affine, BezPath, Rect};
use peniko::Color;

/// Target for element and canvas drawing.
///
/// Geometry passed to the drawing methods is mapped through the transform
/// last given to [`Surface::set_transform`], and clipped to the rectangle
/// last given to [`Surface::set_clip`] (interpreted in that same space).
pub trait Surface {
    /// Fill the whole surface with `color`, ignoring transform and clip.
    fn clear(&mut self, color: Color);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Replace the current clip rectangle (`None` removes clipping).
    fn set_clip(&mut self, clip: Option<Rect>);

    /// Fill `path` with the paint color.
    fn fill_path(&mut self, path: &BezPath, paint: &Paint);

    /// Stroke `path` using the paint's width, caps and joins.
    fn stroke_path(&mut self, path: &BezPath, paint: &Paint);

    /// Draw `image` scaled into `dest`.
    fn draw_image(&mut self, image: &BitmapData, dest: Rect, paint: &Paint);
}

#[cfg(test)]
pub(crate) use recording::{DrawOp, RecordingSurface};

#[cfg(test)]
mod recording {
    use super::*;

    /// One recorded surface call.
    #[derive(Debug, Clone)]
    pub(crate) enum DrawOp {
        Clear,
        Transform(Affine),
        Clip(Option<Rect>),
        Fill { bounds: Rect, paint: Paint },
        Stroke { bounds: Rect, paint: Paint },
        Image { dest: Rect },
    }

    /// Surface that records every call for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _color: Color) {
            self.ops.push(DrawOp::Clear);
        }

        fn set_transform(&mut self, transform: Affine) {
            self.ops.push(DrawOp::Transform(transform));
        }

        fn set_clip(&mut self, clip: Option<Rect>) {
            self.ops.push(DrawOp::Clip(clip));
        }

        fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
            use kurbo::Shape;
            self.ops.push(DrawOp::Fill {
                bounds: path.bounding_box(),
                paint: paint.clone(),
            });
        }

        fn stroke_path(&mut self, path: &BezPath, paint: &Paint) {
            use kurbo::Shape;
            self.ops.push(DrawOp::Stroke {
                bounds: path.bounding_box(),
                paint: paint.clone(),
            });
        }

        fn draw_image(&mut self, _image: &BitmapData, dest: Rect, _paint: &Paint) {
            self.ops.push(DrawOp::Image { dest });
        }
    }
}
