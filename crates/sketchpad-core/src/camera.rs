//! Camera module: canvas size, pan/zoom and screen/canvas mapping.

use crate::handles::{HandleKind, hit_test_handle};
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Smallest allowed canvas width or height, in canvas units.
///
/// Canvas sides are always whole pixels so a snapshot has exactly the
/// canvas size.
pub const MIN_CANVAS_SIZE: f64 = 100.0;

/// Camera manages the canvas rectangle and its view transform.
///
/// Screen position of a canvas point is
/// `centering + pan + point * zoom`, where the centering offset keeps the
/// canvas centered on any axis where it is smaller than the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    canvas_size: Size,
    zoom: f64,
    pan: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Camera {
    /// Create a camera for a canvas of the given size (clamped).
    pub fn new(canvas_size: Size) -> Self {
        let mut camera = Self {
            canvas_size: Size::new(MIN_CANVAS_SIZE, MIN_CANVAS_SIZE),
            zoom: 1.0,
            pan: Vec2::ZERO,
        };
        camera.set_canvas_size(canvas_size.width, canvas_size.height);
        camera
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Set canvas size, rounding each side to whole pixels and clamping it to
    /// at least `MIN_CANVAS_SIZE`.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_size = Size::new(clamp_side(width), clamp_side(height));
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Pan the canvas by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Reset zoom and pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }

    /// Canvas rectangle in canvas coordinates.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas_size.to_rect()
    }

    /// Whether a canvas-space point lies on the canvas.
    pub fn contains(&self, canvas_point: Point) -> bool {
        let rect = self.canvas_rect();
        canvas_point.x >= rect.x0
            && canvas_point.x <= rect.x1
            && canvas_point.y >= rect.y0
            && canvas_point.y <= rect.y1
    }

    /// Offset that centers the scaled canvas inside the viewport.
    pub fn centering_offset(&self, viewport: Size) -> Vec2 {
        Vec2::new(
            ((viewport.width - self.canvas_size.width * self.zoom) / 2.0).max(0.0),
            ((viewport.height - self.canvas_size.height * self.zoom) / 2.0).max(0.0),
        )
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self, viewport: Size) -> Affine {
        Affine::translate(self.centering_offset(viewport) + self.pan) * Affine::scale(self.zoom)
    }

    /// Screen-to-canvas transform.
    pub fn inverse_transform(&self, viewport: Size) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-(self.centering_offset(viewport) + self.pan))
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point, viewport: Size) -> Point {
        self.inverse_transform(viewport) * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point, viewport: Size) -> Point {
        self.transform(viewport) * canvas_point
    }

    /// Canvas rectangle in screen coordinates.
    pub fn screen_rect(&self, viewport: Size) -> Rect {
        self.transform(viewport).transform_rect_bbox(self.canvas_rect())
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64, viewport: Size) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let canvas_point = self.screen_to_canvas(screen_point, viewport);
        self.zoom = new_zoom;

        // Adjust pan so canvas_point stays under screen_point
        let new_screen = self.canvas_to_screen(canvas_point, viewport);
        self.pan += screen_point - new_screen;
    }

    /// Resize handle under a screen point, if any.
    pub fn handle_at(&self, screen_point: Point, viewport: Size, tolerance: f64) -> Option<HandleKind> {
        hit_test_handle(self.screen_rect(viewport), screen_point, tolerance)
    }

    /// Resize the canvas by dragging `handle` to `screen_point`.
    ///
    /// The edges opposite the dragged ones keep their screen position.
    /// Returns whether the canvas size changed.
    pub fn apply_resize(&mut self, handle: HandleKind, screen_point: Point, viewport: Size) -> bool {
        let before = self.screen_rect(viewport);
        let old_size = self.canvas_size;
        let p = self.screen_to_canvas(screen_point, viewport);

        let mut width = old_size.width;
        let mut height = old_size.height;
        if handle.moves_right() {
            width = p.x;
        } else if handle.moves_left() {
            width = old_size.width - p.x;
        }
        if handle.moves_bottom() {
            height = p.y;
        } else if handle.moves_top() {
            height = old_size.height - p.y;
        }
        self.set_canvas_size(width, height);

        let after = self.screen_rect(viewport);
        let anchor_x = if handle.moves_left() {
            before.x1 - after.x1
        } else {
            before.x0 - after.x0
        };
        let anchor_y = if handle.moves_top() {
            before.y1 - after.y1
        } else {
            before.y0 - after.y0
        };
        self.pan += Vec2::new(anchor_x, anchor_y);

        self.canvas_size != old_size
    }
}

fn clamp_side(value: f64) -> f64 {
    if value.is_finite() {
        value.round().max(MIN_CANVAS_SIZE)
    } else {
        MIN_CANVAS_SIZE
    }
}
