//! The drawing engine: canvas state, tool state machine and rendering.

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::events::EngineEvent;
use crate::handles::{HandleKind, canvas_handles};
use crate::history::{Batch, BatchScope, History};
use crate::scene::{CanvasScene, draw_canvas};
use crate::shapes::{Bitmap, BitmapData, Element, Paint, SerializableColor};
use crate::surface::Surface;
use crate::tools::{StrokeSettings, ToolKind, build_element};
use kurbo::{Affine, Point, Rect, Shape as _, Size};

/// What the pointer is currently doing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Drawing with a tool. Points are in canvas space.
    Dragging {
        tool: ToolKind,
        start: Point,
        last: Point,
        /// Every sample of a freehand gesture (empty for shape tools).
        path: Vec<Point>,
    },
    /// Panning the view after a press outside the canvas.
    Panning { last_screen: Point },
    /// Dragging a canvas resize handle.
    Resizing { handle: HandleKind },
}

/// A single drawing surface with its history.
///
/// All pointer coordinates are screen coordinates; the host passes the
/// current viewport size with every input and render call.
#[derive(Debug)]
pub struct DrawingEngine {
    config: EngineConfig,
    camera: Camera,
    tool: ToolKind,
    stroke: StrokeSettings,
    history: History,
    interaction: Interaction,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let camera = Camera::new(Size::new(config.canvas_width, config.canvas_height));
        let mut stroke = config.stroke.clone();
        stroke.set_width(config.stroke.width);
        Self {
            config,
            camera,
            tool: ToolKind::default(),
            stroke,
            history: History::new(),
            interaction: Interaction::Idle,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Whether a tool gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    /// Committed elements in z-order.
    pub fn elements(&self) -> &[Element] {
        self.history.elements()
    }

    // --- Tool and stroke settings ---

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Select a tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.interaction != Interaction::Idle {
            self.cancel();
        }
        if self.tool != tool {
            log::debug!("tool: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
    }

    pub fn stroke(&self) -> &StrokeSettings {
        &self.stroke
    }

    /// Set the stroke width for new elements (at least 1).
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke.set_width(width);
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.stroke.set_color(color);
    }

    pub fn set_fill_mode(&mut self, fill: bool) {
        self.stroke.set_fill(fill);
    }

    // --- View ---

    pub fn zoom(&self) -> f64 {
        self.camera.zoom()
    }

    /// Set zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.history.events_mut().notify_changed();
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64, viewport: Size) {
        self.camera.zoom_at(screen_point, factor, viewport);
        self.history.events_mut().notify_changed();
    }

    /// Zoom back to 1 and drop any pan.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.history.events_mut().notify_changed();
    }

    pub fn canvas_width(&self) -> f64 {
        self.camera.canvas_size().width
    }

    pub fn canvas_height(&self) -> f64 {
        self.camera.canvas_size().height
    }

    /// Resize the canvas, clamping each side to the minimum.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        let before = self.camera.canvas_size();
        self.camera.set_canvas_size(width, height);
        if self.camera.canvas_size() != before {
            self.history.events_mut().notify_changed();
            self.notify_canvas_size();
        }
    }

    // --- History ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Remove every element as one undoable step.
    pub fn clear(&mut self) {
        self.history.record_clear();
    }

    /// Open a batch that ends when the returned guard is dropped.
    pub fn batch(&mut self) -> BatchScope<'_, Self> {
        BatchScope::new(self)
    }

    /// Drain pending notifications in the order they fired.
    pub fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.history.poll_events()
    }

    /// Replace the drawing with `image`, resizing the canvas to match.
    ///
    /// Undoing restores the previous elements; the canvas size is not part
    /// of history.
    pub fn load_bitmap(&mut self, image: BitmapData) {
        let (width, height) = (f64::from(image.width()), f64::from(image.height()));
        log::info!("loading {}x{} bitmap", image.width(), image.height());
        {
            let mut scope = self.batch();
            scope.cancel();
            scope.history.record_clear();
            scope.camera.set_canvas_size(width, height);
            let dest = scope.camera.canvas_rect();
            scope.history.record_add(Element::Bitmap(Bitmap::new(image, dest)));
        }
        self.notify_canvas_size();
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, screen: Point, viewport: Size) {
        if self.interaction != Interaction::Idle {
            log::debug!("pointer down during {:?}, restarting", self.interaction);
            self.cancel();
        }

        if let Some(handle) = self
            .camera
            .handle_at(screen, viewport, self.config.handle_tolerance)
        {
            log::debug!("resize start: {:?}", handle);
            self.interaction = Interaction::Resizing { handle };
            return;
        }

        let point = self.camera.screen_to_canvas(screen, viewport);
        if !self.camera.contains(point) {
            log::debug!("pan start at {:?}", screen);
            self.interaction = Interaction::Panning {
                last_screen: screen,
            };
            return;
        }

        let path = if self.tool.is_freehand() {
            vec![point]
        } else {
            Vec::new()
        };
        log::debug!("{:?} start at {:?}", self.tool, point);
        self.interaction = Interaction::Dragging {
            tool: self.tool,
            start: point,
            last: point,
            path,
        };
    }

    pub fn pointer_move(&mut self, screen: Point, viewport: Size) {
        match &mut self.interaction {
            Interaction::Idle => return,
            Interaction::Resizing { handle } => {
                let handle = *handle;
                if self.camera.apply_resize(handle, screen, viewport) {
                    let size = self.camera.canvas_size();
                    self.history.events_mut().push(EngineEvent::CanvasSizeChanged {
                        width: size.width,
                        height: size.height,
                    });
                }
            }
            Interaction::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.camera.pan_by(delta);
            }
            Interaction::Dragging {
                tool, last, path, ..
            } => {
                let point = self.camera.screen_to_canvas(screen, viewport);
                *last = point;
                if tool.is_freehand() {
                    path.push(point);
                }
            }
        }
        self.history.events_mut().notify_changed();
    }

    pub fn pointer_up(&mut self, screen: Point, viewport: Size) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {}
            Interaction::Resizing { handle } => log::debug!("resize end: {:?}", handle),
            Interaction::Panning { .. } => log::debug!("pan end"),
            Interaction::Dragging {
                tool,
                start,
                mut last,
                mut path,
            } => {
                let point = self.camera.screen_to_canvas(screen, viewport);
                if point != last {
                    last = point;
                    if tool.is_freehand() {
                        path.push(point);
                    }
                }
                let element = self.build(tool, start, last, &path);
                self.history.record_add(element);
            }
        }
    }

    /// Abandon the current gesture without recording anything.
    pub fn cancel(&mut self) {
        let previous = std::mem::take(&mut self.interaction);
        if matches!(previous, Interaction::Dragging { .. }) {
            log::debug!("gesture cancelled");
            // The preview disappears.
            self.history.events_mut().notify_changed();
        }
    }

    /// Element the current gesture would commit, if any.
    pub fn preview(&self) -> Option<Element> {
        match &self.interaction {
            Interaction::Dragging {
                tool,
                start,
                last,
                path,
            } => Some(self.build(*tool, *start, *last, path)),
            _ => None,
        }
    }

    // --- Rendering ---

    /// Draw the full view: backdrop, canvas, elements, preview and handles.
    pub fn render(&self, surface: &mut dyn Surface, viewport: Size) {
        surface.clear(self.config.backdrop.into());
        surface.set_transform(Affine::IDENTITY);
        surface.set_clip(None);

        let screen_rect = self.camera.screen_rect(viewport);
        let canvas_path = screen_rect.to_path(0.1);
        surface.fill_path(&canvas_path, &Paint::fill(self.config.background));
        surface.stroke_path(&canvas_path, &Paint::stroke(self.config.border, 1.0));

        surface.set_transform(self.camera.transform(viewport));
        surface.set_clip(Some(self.camera.canvas_rect()));
        for element in self.elements() {
            element.draw(surface);
        }
        if let Some(preview) = self.preview() {
            preview.draw(surface);
        }
        surface.set_clip(None);
        surface.set_transform(Affine::IDENTITY);

        let size = self.config.handle_size;
        let handle_paint = Paint::fill(self.config.handle_color);
        for handle in canvas_handles(screen_rect) {
            let square = Rect::from_center_size(handle.position, (size, size));
            surface.fill_path(&square.to_path(0.1), &handle_paint);
        }
    }

    /// Draw the canvas alone at unit scale: background then elements.
    ///
    /// This is what a snapshot contains; the surface should match the
    /// canvas size.
    pub fn render_canvas(&self, surface: &mut dyn Surface) {
        draw_canvas(
            surface,
            self.camera.canvas_size(),
            self.config.background,
            self.elements(),
        );
    }

    /// Owned copy of what [`render_canvas`](Self::render_canvas) draws.
    pub fn scene(&self) -> CanvasScene {
        CanvasScene::new(
            self.camera.canvas_size(),
            self.config.background,
            self.elements().to_vec(),
        )
    }

    fn build(&self, tool: ToolKind, start: Point, end: Point, path: &[Point]) -> Element {
        let paint = self.stroke.paint_for(tool, self.config.background);
        build_element(tool, start, end, path, paint, self.config.simplify_tolerance)
    }

    fn notify_canvas_size(&mut self) {
        let size = self.camera.canvas_size();
        log::debug!("canvas size: {}x{}", size.width, size.height);
        self.history.events_mut().push(EngineEvent::CanvasSizeChanged {
            width: size.width,
            height: size.height,
        });
    }
}

impl Batch for DrawingEngine {
    fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    fn end_batch(&mut self) {
        self.history.end_batch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use peniko::Compose;

    const VIEWPORT: Size = Size::new(1000.0, 800.0);

    fn engine() -> DrawingEngine {
        // Small handle tolerance keeps gestures near the corners drawable.
        DrawingEngine::new(EngineConfig {
            handle_tolerance: 5.0,
            ..EngineConfig::default()
        })
    }

    fn screen(engine: &DrawingEngine, x: f64, y: f64) -> Point {
        engine.camera().canvas_to_screen(Point::new(x, y), VIEWPORT)
    }

    fn drag(engine: &mut DrawingEngine, from: (f64, f64), to: (f64, f64)) {
        let start = screen(engine, from.0, from.1);
        let end = screen(engine, to.0, to.1);
        engine.pointer_down(start, VIEWPORT);
        engine.pointer_move(start.midpoint(end), VIEWPORT);
        engine.pointer_up(end, VIEWPORT);
    }

    #[test]
    fn test_line_scenario() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Line);
        drag(&mut engine, (10.0, 10.0), (50.0, 10.0));

        assert!(engine.can_undo());
        assert!(!engine.can_redo());
        assert_eq!(engine.elements().len(), 1);
        let id = engine.elements()[0].id();

        assert!(engine.undo());
        assert!(engine.elements().is_empty());
        assert!(engine.can_redo());

        assert!(engine.redo());
        assert_eq!(engine.elements().len(), 1);
        let Element::Line(line) = &engine.elements()[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.id(), id);
        assert!((line.start().x - 10.0).abs() < 1e-9);
        assert!((line.end().x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pen_collects_path() {
        let mut engine = engine();
        let points: Vec<Point> = (0..8)
            .map(|i| screen(&engine, 100.0 + i as f64 * 10.0, 200.0))
            .collect();
        engine.pointer_down(points[0], VIEWPORT);
        for p in &points[1..7] {
            engine.pointer_move(*p, VIEWPORT);
        }
        assert!(engine.is_drawing());
        engine.pointer_up(points[7], VIEWPORT);

        assert!(!engine.is_drawing());
        let Element::Freehand(stroke) = &engine.elements()[0] else {
            panic!("expected a freehand stroke");
        };
        assert_eq!(stroke.points().len(), 8);
    }

    #[test]
    fn test_eraser_paints_background_with_copy() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Eraser);
        drag(&mut engine, (100.0, 100.0), (200.0, 150.0));

        let paint = engine.elements()[0].paint();
        assert_eq!(paint.compose, Compose::Copy);
        assert_eq!(paint.color, engine.config().background);
    }

    #[test]
    fn test_press_outside_canvas_pans() {
        let mut engine = engine();
        // Canvas occupies (100, 100) - (900, 700) on screen.
        engine.pointer_down(Point::new(20.0, 400.0), VIEWPORT);
        assert!(matches!(engine.interaction(), Interaction::Panning { .. }));
        engine.pointer_move(Point::new(40.0, 410.0), VIEWPORT);
        engine.pointer_move(Point::new(50.0, 420.0), VIEWPORT);
        engine.pointer_up(Point::new(50.0, 420.0), VIEWPORT);

        assert_eq!(engine.camera().pan(), kurbo::Vec2::new(30.0, 20.0));
        assert!(engine.elements().is_empty());
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_handle_drag_resizes() {
        let mut engine = engine();
        engine.pointer_down(Point::new(900.0, 400.0), VIEWPORT);
        assert_eq!(
            engine.interaction(),
            &Interaction::Resizing {
                handle: HandleKind::Right
            }
        );
        engine.poll_events();

        engine.pointer_move(Point::new(950.0, 400.0), VIEWPORT);
        engine.pointer_up(Point::new(950.0, 400.0), VIEWPORT);

        assert!((engine.canvas_width() - 850.0).abs() < 1e-9);
        assert!((engine.canvas_height() - 600.0).abs() < 1e-9);
        let events = engine.poll_events();
        assert!(events.contains(&EngineEvent::CanvasSizeChanged {
            width: 850.0,
            height: 600.0
        }));
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_set_tool_cancels_gesture() {
        let mut engine = engine();
        engine.pointer_down(screen(&engine, 50.0, 50.0), VIEWPORT);
        assert!(engine.is_drawing());
        engine.set_tool(ToolKind::Rectangle);
        assert!(!engine.is_drawing());
        engine.pointer_up(screen(&engine, 80.0, 80.0), VIEWPORT);
        assert!(engine.elements().is_empty());
    }

    #[test]
    fn test_move_while_idle_is_silent() {
        let mut engine = engine();
        engine.pointer_move(Point::new(500.0, 400.0), VIEWPORT);
        assert!(engine.poll_events().is_empty());
    }

    #[test]
    fn test_commit_fires_both_notifications() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Rectangle);
        drag(&mut engine, (10.0, 10.0), (60.0, 40.0));
        let events = engine.poll_events();
        assert_eq!(events.last(), Some(&EngineEvent::UndoRedoAvailabilityChanged));
        assert!(events.contains(&EngineEvent::Changed));
    }

    #[test]
    fn test_batch_coalesces_gestures() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Ellipse);
        {
            let mut scope = engine.batch();
            drag(&mut scope, (10.0, 10.0), (60.0, 40.0));
            drag(&mut scope, (100.0, 100.0), (160.0, 140.0));
        }
        assert_eq!(engine.elements().len(), 2);
        assert_eq!(
            engine.poll_events(),
            vec![EngineEvent::Changed, EngineEvent::UndoRedoAvailabilityChanged]
        );
    }

    #[test]
    fn test_setters_clamp() {
        let mut engine = engine();
        engine.set_zoom(0.0);
        assert!((engine.zoom() - 0.1).abs() < f64::EPSILON);
        engine.set_zoom(100.0);
        assert!((engine.zoom() - 5.0).abs() < f64::EPSILON);
        engine.set_canvas_size(10.0, 10.0);
        assert!((engine.canvas_width() - 100.0).abs() < f64::EPSILON);
        assert!((engine.canvas_height() - 100.0).abs() < f64::EPSILON);
        engine.set_stroke_width(0.0);
        assert!((engine.stroke().width - 1.0).abs() < f64::EPSILON);
        assert!(engine.poll_events().contains(&EngineEvent::CanvasSizeChanged {
            width: 100.0,
            height: 100.0
        }));
    }

    #[test]
    fn test_clear_then_undo() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Triangle);
        drag(&mut engine, (10.0, 10.0), (60.0, 40.0));
        drag(&mut engine, (100.0, 10.0), (160.0, 40.0));
        engine.clear();
        assert!(engine.elements().is_empty());
        engine.undo();
        assert_eq!(engine.elements().len(), 2);
    }

    #[test]
    fn test_load_bitmap_replaces_content() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Line);
        drag(&mut engine, (10.0, 10.0), (50.0, 10.0));
        engine.poll_events();

        let image = BitmapData::from_rgba8_vec(300, 200, vec![255; 300 * 200 * 4]).unwrap();
        engine.load_bitmap(image);

        assert!((engine.canvas_width() - 300.0).abs() < f64::EPSILON);
        assert!((engine.canvas_height() - 200.0).abs() < f64::EPSILON);
        assert_eq!(engine.elements().len(), 1);
        assert_eq!(engine.elements()[0].bounds(), Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(
            engine.poll_events(),
            vec![
                EngineEvent::Changed,
                EngineEvent::UndoRedoAvailabilityChanged,
                EngineEvent::CanvasSizeChanged {
                    width: 300.0,
                    height: 200.0
                },
            ]
        );

        engine.undo();
        engine.undo();
        assert!(matches!(engine.elements()[0], Element::Line(_)));
    }

    #[test]
    fn test_render_order() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Line);
        drag(&mut engine, (10.0, 10.0), (50.0, 10.0));
        engine.set_tool(ToolKind::Rectangle);
        engine.pointer_down(screen(&engine, 100.0, 100.0), VIEWPORT);
        engine.pointer_move(screen(&engine, 150.0, 150.0), VIEWPORT);

        let mut surface = RecordingSurface::default();
        engine.render(&mut surface, VIEWPORT);
        let ops = &surface.ops;

        assert!(matches!(ops[0], DrawOp::Clear));
        assert!(matches!(ops[3], DrawOp::Fill { bounds, .. } if bounds == Rect::new(100.0, 100.0, 900.0, 700.0)));
        assert!(matches!(ops[4], DrawOp::Stroke { .. }));
        assert!(matches!(ops[6], DrawOp::Clip(Some(rect)) if rect == Rect::new(0.0, 0.0, 800.0, 600.0)));
        // Committed line, then the rectangle preview.
        assert!(matches!(ops[7], DrawOp::Stroke { .. }));
        assert!(matches!(ops[8], DrawOp::Stroke { bounds, .. } if bounds == Rect::new(100.0, 100.0, 150.0, 150.0)));
        assert!(matches!(ops[9], DrawOp::Clip(None)));
        assert!(matches!(ops[10], DrawOp::Transform(t) if t == Affine::IDENTITY));
        assert_eq!(ops.len(), 11 + 8);
        assert!(ops[11..].iter().all(|op| matches!(op, DrawOp::Fill { .. })));
        // Preview is not committed.
        assert_eq!(engine.elements().len(), 1);
    }

    #[test]
    fn test_render_canvas_skips_preview() {
        let mut engine = engine();
        engine.pointer_down(screen(&engine, 100.0, 100.0), VIEWPORT);
        let mut surface = RecordingSurface::default();
        engine.render_canvas(&mut surface);
        assert_eq!(surface.ops.len(), 4);
    }

    #[test]
    fn test_scene_is_detached() {
        let mut engine = engine();
        engine.set_tool(ToolKind::Line);
        drag(&mut engine, (10.0, 10.0), (50.0, 10.0));
        let scene = engine.scene();

        engine.clear();
        engine.set_canvas_size(300.0, 300.0);

        assert_eq!(scene.size(), Size::new(800.0, 600.0));
        assert_eq!(scene.elements().len(), 1);
        let mut surface = RecordingSurface::default();
        scene.render(&mut surface);
        assert_eq!(surface.ops.len(), 5);
    }
}
