//! Rectangle element.

use super::{ElementId, Paint, drag_bounds};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use uuid::Uuid;

/// An axis-aligned rectangle (also used for squares).
#[derive(Debug, Clone)]
pub struct Rectangle {
    id: ElementId,
    rect: Rect,
    paint: Paint,
}

impl Rectangle {
    pub fn new(rect: Rect, paint: Paint) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: rect.abs(),
            paint,
        }
    }

    /// Rectangle spanned by a drag; `square` forces equal sides.
    pub fn from_drag(start: Point, end: Point, square: bool, paint: Paint) -> Self {
        Self::new(drag_bounds(start, end, square), paint)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn to_path(&self) -> BezPath {
        self.rect.to_path(0.1)
    }
}
