//! Drawing tools and the rules that turn a pointer drag into an element.

use crate::shapes::{
    Element, Ellipse, Freehand, Line, Paint, Rectangle, SerializableColor, Triangle,
};
use kurbo::Point;
use peniko::Compose;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Line,
    Rectangle,
    Square,
    Ellipse,
    Circle,
    Triangle,
}

impl ToolKind {
    /// Tools that accumulate every pointer sample into a path.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser)
    }
}

/// Minimum stroke width.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// Current stroke settings applied to new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeSettings {
    pub color: SerializableColor,
    pub width: f64,
    /// Fill closed shapes instead of outlining them.
    pub fill: bool,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 2.0,
            fill: false,
        }
    }
}

impl StrokeSettings {
    /// Set the width, clamped to at least [`MIN_STROKE_WIDTH`].
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_finite() {
            width.max(MIN_STROKE_WIDTH)
        } else {
            MIN_STROKE_WIDTH
        };
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    /// Paint a new element drawn with `tool` receives.
    ///
    /// The eraser paints with `background` and replaces destination pixels.
    pub fn paint_for(&self, tool: ToolKind, background: SerializableColor) -> Paint {
        match tool {
            ToolKind::Eraser => Paint::stroke(background, self.width).with_compose(Compose::Copy),
            ToolKind::Pen | ToolKind::Line => Paint::stroke(self.color, self.width),
            ToolKind::Rectangle
            | ToolKind::Square
            | ToolKind::Ellipse
            | ToolKind::Circle
            | ToolKind::Triangle => Paint::stroke(self.color, self.width).with_fill(self.fill),
        }
    }
}

/// Build the element for a drag with `tool`.
///
/// `path` holds every sample of a freehand gesture; shape tools only use
/// `start` and `end`.
pub fn build_element(
    tool: ToolKind,
    start: Point,
    end: Point,
    path: &[Point],
    paint: Paint,
    tolerance: f64,
) -> Element {
    match tool {
        ToolKind::Pen | ToolKind::Eraser => {
            if path.is_empty() {
                Element::Freehand(Freehand::new(&[start, end], paint, tolerance))
            } else {
                Element::Freehand(Freehand::new(path, paint, tolerance))
            }
        }
        ToolKind::Line => Element::Line(Line::new(start, end, paint)),
        ToolKind::Rectangle => Element::Rectangle(Rectangle::from_drag(start, end, false, paint)),
        ToolKind::Square => Element::Rectangle(Rectangle::from_drag(start, end, true, paint)),
        ToolKind::Ellipse => Element::Ellipse(Ellipse::from_drag(start, end, false, paint)),
        ToolKind::Circle => Element::Ellipse(Ellipse::from_drag(start, end, true, paint)),
        ToolKind::Triangle => Element::Triangle(Triangle::from_drag(start, end, paint)),
    }
}
