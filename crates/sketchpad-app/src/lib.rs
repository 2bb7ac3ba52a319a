//! Sketchpad Application
//!
//! Native host that drives a [`DrawingEngine`] from a session script and
//! writes the resulting snapshot to disk.

pub mod script;

pub use script::{Script, Step};

use kurbo::Size;
use sketchpad_core::{ConfigError, DrawingEngine, EngineConfig, EngineEvent};
use sketchpad_render::{export_snapshot, import_snapshot};
use std::path::Path;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script parse error: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Host state: one engine and the viewport it is shown in.
pub struct App {
    engine: DrawingEngine,
    viewport: Size,
    events_seen: usize,
}

impl App {
    pub fn new(config: EngineConfig, viewport: Size) -> Self {
        Self {
            engine: DrawingEngine::new(config),
            viewport,
            events_seen: 0,
        }
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    /// Number of engine events drained so far.
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }

    /// Apply one step, then drain the engine's events.
    pub async fn apply(&mut self, step: &Step) -> Result<(), AppError> {
        let viewport = self.viewport;
        let engine = &mut self.engine;
        match step {
            Step::Tool { tool } => engine.set_tool(*tool),
            Step::StrokeWidth { width } => engine.set_stroke_width(*width),
            Step::StrokeColor { color } => engine.set_stroke_color(*color),
            Step::Fill { enabled } => engine.set_fill_mode(*enabled),
            Step::Zoom { zoom } => engine.set_zoom(*zoom),
            Step::CanvasSize { width, height } => engine.set_canvas_size(*width, *height),
            Step::Down { x, y } => engine.pointer_down((*x, *y).into(), viewport),
            Step::Move { x, y } => engine.pointer_move((*x, *y).into(), viewport),
            Step::Up { x, y } => engine.pointer_up((*x, *y).into(), viewport),
            Step::Undo => {
                engine.undo();
            }
            Step::Redo => {
                engine.redo();
            }
            Step::Clear => engine.clear(),
            Step::Import { path } => {
                let bytes = std::fs::read(path)?;
                import_snapshot(engine, &bytes).await;
            }
        }
        self.drain_events();
        Ok(())
    }

    fn drain_events(&mut self) {
        for event in self.engine.poll_events() {
            match event {
                EngineEvent::Changed => {}
                EngineEvent::UndoRedoAvailabilityChanged => log::debug!(
                    "undo: {}, redo: {}",
                    self.engine.can_undo(),
                    self.engine.can_redo()
                ),
                EngineEvent::CanvasSizeChanged { width, height } => {
                    log::info!("Canvas resized to {}x{}", width, height)
                }
            }
            self.events_seen += 1;
        }
    }
}

/// Parse a script, validating its config.
pub fn load_script(json: &str) -> Result<Script, AppError> {
    let mut script: Script = serde_json::from_str(json)?;
    script.config = script.config.validated()?;
    Ok(script)
}

/// Replay the script at `script_path` and write the snapshot to
/// `output_path`. Returns false when the canvas was empty and nothing was
/// written.
pub async fn run(script_path: &Path, output_path: &Path) -> Result<bool, AppError> {
    let script = load_script(&std::fs::read_to_string(script_path)?)?;
    log::info!(
        "Replaying {} steps from {}",
        script.steps.len(),
        script_path.display()
    );

    let mut app = App::new(script.config, script.viewport);
    for step in &script.steps {
        app.apply(step).await?;
    }

    let Some(png_data) = export_snapshot(app.engine()).await else {
        log::warn!("Canvas is empty, no snapshot written");
        return Ok(false);
    };
    std::fs::write(output_path, &png_data)?;
    log::info!(
        "Wrote {} ({} bytes, {} elements)",
        output_path.display(),
        png_data.len(),
        app.engine().elements().len()
    );
    Ok(true)
}
