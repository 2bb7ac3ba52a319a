//! Ellipse element.

use super::{ElementId, Paint, drag_bounds};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use uuid::Uuid;

/// An oval inscribed in an axis-aligned rectangle (also used for circles).
#[derive(Debug, Clone)]
pub struct Ellipse {
    id: ElementId,
    rect: Rect,
    paint: Paint,
}

impl Ellipse {
    pub fn new(rect: Rect, paint: Paint) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: rect.abs(),
            paint,
        }
    }

    /// Ellipse inscribed in the drag rectangle; `circle` forces equal radii.
    pub fn from_drag(start: Point, end: Point, circle: bool, paint: Paint) -> Self {
        Self::new(drag_bounds(start, end, circle), paint)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.rect.width() / 2.0, self.rect.height() / 2.0)
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn to_path(&self) -> BezPath {
        KurboEllipse::from_rect(self.rect).to_path(0.1)
    }
}
