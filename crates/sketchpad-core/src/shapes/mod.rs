//! Element definitions for the drawing surface.
//!
//! Elements are immutable once built: geometry and paint are fixed at
//! construction and only the element *set* held by the history changes.

mod bitmap;
mod ellipse;
mod freehand;
mod line;
mod rectangle;
mod triangle;

pub use bitmap::{Bitmap, BitmapData};
pub use ellipse::Ellipse;
pub use freehand::{DEFAULT_SIMPLIFY_TOLERANCE, Freehand, simplify_stroke};
pub use line::Line;
pub use rectangle::Rectangle;
pub use triangle::Triangle;

use crate::surface::Surface;
use kurbo::{Cap, Join, Point, Rect};
use peniko::{Color, Compose};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint record owned by every element.
///
/// Each element receives its own copy at construction time; changing the
/// engine's stroke settings afterwards never affects committed elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    /// Stroke (or fill) color.
    pub color: SerializableColor,
    /// Stroke width in canvas units.
    pub width: f64,
    /// Fill the interior instead of stroking the outline.
    pub fill: bool,
    /// Antialias edges.
    pub anti_alias: bool,
    /// Line cap for open paths.
    pub cap: Cap,
    /// Line join between segments.
    pub join: Join,
    /// Compositing mode. `Compose::Copy` replaces destination pixels.
    pub compose: Compose,
}

impl Paint {
    /// Outline paint with round caps and joins.
    pub fn stroke(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            fill: false,
            anti_alias: true,
            cap: Cap::Round,
            join: Join::Round,
            compose: Compose::SrcOver,
        }
    }

    /// Solid fill paint.
    pub fn fill(color: SerializableColor) -> Self {
        Self {
            fill: true,
            ..Self::stroke(color, 1.0)
        }
    }

    /// Replace the compositing mode.
    pub fn with_compose(mut self, compose: Compose) -> Self {
        self.compose = compose;
        self
    }

    /// Set fill-vs-stroke.
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Color as a peniko color.
    pub fn peniko_color(&self) -> Color {
        self.color.into()
    }

    /// Stroke geometry for outline rendering.
    pub fn stroke_style(&self) -> kurbo::Stroke {
        kurbo::Stroke::new(self.width)
            .with_caps(self.cap)
            .with_join(self.join)
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::stroke(SerializableColor::black(), 2.0)
    }
}

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Axis-aligned rectangle spanned by a drag from `start` to `end`.
///
/// With `square` set, both sides become `max(|dx|, |dy|)` and the rect
/// grows from `start` in the direction the pointer moved.
pub fn drag_bounds(start: Point, end: Point, square: bool) -> Rect {
    if !square {
        return Rect::from_points(start, end);
    }
    let side = (end.x - start.x).abs().max((end.y - start.y).abs());
    let x0 = if end.x >= start.x { start.x } else { start.x - side };
    let y0 = if end.y >= start.y { start.y } else { start.y - side };
    Rect::new(x0, y0, x0 + side, y0 + side)
}

/// Bounding rectangle of a set of points (`Rect::ZERO` when empty).
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// A finished, immutable drawing element.
#[derive(Debug, Clone)]
pub enum Element {
    Freehand(Freehand),
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Bitmap(Bitmap),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Freehand(e) => e.id(),
            Element::Line(e) => e.id(),
            Element::Rectangle(e) => e.id(),
            Element::Ellipse(e) => e.id(),
            Element::Triangle(e) => e.id(),
            Element::Bitmap(e) => e.id(),
        }
    }

    /// Axis-aligned bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Freehand(e) => e.bounds(),
            Element::Line(e) => e.bounds(),
            Element::Rectangle(e) => e.bounds(),
            Element::Ellipse(e) => e.bounds(),
            Element::Triangle(e) => e.bounds(),
            Element::Bitmap(e) => e.bounds(),
        }
    }

    pub fn paint(&self) -> &Paint {
        match self {
            Element::Freehand(e) => e.paint(),
            Element::Line(e) => e.paint(),
            Element::Rectangle(e) => e.paint(),
            Element::Ellipse(e) => e.paint(),
            Element::Triangle(e) => e.paint(),
            Element::Bitmap(e) => e.paint(),
        }
    }

    /// Draw the element with its own paint onto `surface`.
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self {
            Element::Freehand(e) => surface.stroke_path(&e.to_path(), e.paint()),
            Element::Line(e) => surface.stroke_path(&e.to_path(), e.paint()),
            Element::Rectangle(e) => paint_outline(surface, &e.to_path(), e.paint()),
            Element::Ellipse(e) => paint_outline(surface, &e.to_path(), e.paint()),
            Element::Triangle(e) => paint_outline(surface, &e.to_path(), e.paint()),
            Element::Bitmap(e) => e.draw(surface),
        }
    }

    /// Short name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Freehand(_) => "freehand",
            Element::Line(_) => "line",
            Element::Rectangle(_) => "rectangle",
            Element::Ellipse(_) => "ellipse",
            Element::Triangle(_) => "triangle",
            Element::Bitmap(_) => "bitmap",
        }
    }
}

fn paint_outline(surface: &mut dyn Surface, path: &kurbo::BezPath, paint: &Paint) {
    if paint.fill {
        surface.fill_path(path, paint);
    } else {
        surface.stroke_path(path, paint);
    }
}
