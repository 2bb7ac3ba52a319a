//! Detached copy of the committed canvas.

use crate::shapes::{Element, SerializableColor};
use crate::surface::Surface;
use kurbo::{Affine, Size};

/// Canvas size, background and committed elements at one point in time.
///
/// Owns its elements, so it can be rendered on another thread while the
/// engine keeps taking input.
#[derive(Debug, Clone)]
pub struct CanvasScene {
    size: Size,
    background: SerializableColor,
    elements: Vec<Element>,
}

impl CanvasScene {
    pub fn new(size: Size, background: SerializableColor, elements: Vec<Element>) -> Self {
        Self {
            size,
            background,
            elements,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Draw the background then every element at unit scale.
    pub fn render(&self, surface: &mut dyn Surface) {
        draw_canvas(surface, self.size, self.background, &self.elements);
    }
}

pub(crate) fn draw_canvas(
    surface: &mut dyn Surface,
    size: Size,
    background: SerializableColor,
    elements: &[Element],
) {
    surface.clear(background.into());
    surface.set_transform(Affine::IDENTITY);
    surface.set_clip(Some(size.to_rect()));
    for element in elements {
        element.draw(surface);
    }
    surface.set_clip(None);
}
