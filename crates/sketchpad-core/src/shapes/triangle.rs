//! Isosceles triangle element.

use super::{ElementId, Paint, points_bounds};
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;

/// An isosceles triangle whose apex sits on the drag's starting edge.
#[derive(Debug, Clone)]
pub struct Triangle {
    id: ElementId,
    corners: [Point; 3],
    paint: Paint,
}

impl Triangle {
    /// Apex at the horizontal midpoint of the drag on the start row; base
    /// corners at `(start.x, end.y)` and `end`.
    pub fn from_drag(start: Point, end: Point, paint: Paint) -> Self {
        let apex = Point::new(start.x + (end.x - start.x) / 2.0, start.y);
        let base_left = Point::new(start.x, start.y + (end.y - start.y));
        Self {
            id: Uuid::new_v4(),
            corners: [apex, base_left, end],
            paint,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Apex followed by the two base corners.
    pub fn corners(&self) -> [Point; 3] {
        self.corners
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn bounds(&self) -> Rect {
        points_bounds(&self.corners)
    }

    pub fn to_path(&self) -> BezPath {
        let [apex, left, right] = self.corners;
        let mut path = BezPath::new();
        path.move_to(apex);
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let tri = Triangle::from_drag(Point::new(10.0, 10.0), Point::new(50.0, 70.0), Paint::default());
        assert_eq!(
            tri.corners(),
            [
                Point::new(30.0, 10.0),
                Point::new(10.0, 70.0),
                Point::new(50.0, 70.0),
            ]
        );
        assert_eq!(tri.bounds(), Rect::new(10.0, 10.0, 50.0, 70.0));
    }

    #[test]
    fn test_upward_drag_flips() {
        let tri = Triangle::from_drag(Point::new(0.0, 100.0), Point::new(40.0, 0.0), Paint::default());
        assert_eq!(tri.corners()[0], Point::new(20.0, 100.0));
        assert_eq!(tri.bounds(), Rect::new(0.0, 0.0, 40.0, 100.0));
    }
}
