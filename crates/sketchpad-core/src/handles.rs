//! Resize handles on the canvas border.

use kurbo::{Point, Rect};

/// One of the eight canvas resize hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    // Corners
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    // Edge midpoints
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleKind {
    /// Hit-test order: corners first, then edges.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomRight,
        HandleKind::BottomLeft,
        HandleKind::Top,
        HandleKind::Right,
        HandleKind::Bottom,
        HandleKind::Left,
    ];

    /// Position of this handle on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            HandleKind::TopLeft => Point::new(rect.x0, rect.y0),
            HandleKind::TopRight => Point::new(rect.x1, rect.y0),
            HandleKind::BottomRight => Point::new(rect.x1, rect.y1),
            HandleKind::BottomLeft => Point::new(rect.x0, rect.y1),
            HandleKind::Top => Point::new(center.x, rect.y0),
            HandleKind::Right => Point::new(rect.x1, center.y),
            HandleKind::Bottom => Point::new(center.x, rect.y1),
            HandleKind::Left => Point::new(rect.x0, center.y),
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::BottomLeft | HandleKind::Left)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, HandleKind::TopRight | HandleKind::BottomRight | HandleKind::Right)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::TopRight | HandleKind::Top)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, HandleKind::BottomLeft | HandleKind::BottomRight | HandleKind::Bottom)
    }
}

/// A resize handle placed in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

/// All eight handles of `rect`, in hit-test order.
pub fn canvas_handles(rect: Rect) -> [Handle; 8] {
    HandleKind::ALL.map(|kind| Handle {
        kind,
        position: kind.position(rect),
    })
}

/// First handle of `rect` within `tolerance` of `point`.
pub fn hit_test_handle(rect: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    canvas_handles(rect)
        .into_iter()
        .find(|handle| handle.position.distance_squared(point) <= tolerance * tolerance)
        .map(|handle| handle.kind)
}
