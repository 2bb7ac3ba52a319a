//! Sketchpad Core Library
//!
//! Platform-agnostic drawing engine for the Sketchpad annotation canvas:
//! elements, canvas coordinates, undo/redo history and the tool state machine.

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod handles;
pub mod history;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod tools;

pub use camera::{Camera, MAX_ZOOM, MIN_CANVAS_SIZE, MIN_ZOOM};
pub use config::EngineConfig;
pub use engine::{DrawingEngine, Interaction};
pub use error::{ConfigError, ConfigResult};
pub use events::EngineEvent;
pub use handles::{Handle, HandleKind};
pub use history::{Batch, BatchScope, History, HistoryAction};
pub use scene::CanvasScene;
pub use shapes::{BitmapData, Element, ElementId, Paint, SerializableColor};
pub use surface::Surface;
pub use tools::{StrokeSettings, ToolKind};
