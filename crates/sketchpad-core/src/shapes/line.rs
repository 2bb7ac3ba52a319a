//! Straight line element.

use super::{ElementId, Paint};
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;

/// A single straight segment between the two raw drag points.
#[derive(Debug, Clone)]
pub struct Line {
    id: ElementId,
    start: Point,
    end: Point,
    paint: Paint,
}

impl Line {
    pub fn new(start: Point, end: Point, paint: Paint) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            paint,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }
}
