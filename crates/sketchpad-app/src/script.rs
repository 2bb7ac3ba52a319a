//! Session scripts: a recorded sequence of host inputs.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use sketchpad_core::{EngineConfig, SerializableColor, ToolKind};
use std::path::PathBuf;

/// A JSON session script.
///
/// ```json
/// {
///   "viewport": { "width": 1000, "height": 800 },
///   "steps": [
///     { "op": "tool", "tool": "line" },
///     { "op": "down", "x": 110, "y": 110 },
///     { "op": "up", "x": 150, "y": 110 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: Size,
    #[serde(default)]
    pub config: EngineConfig,
    pub steps: Vec<Step>,
}

fn default_viewport() -> Size {
    Size::new(1280.0, 800.0)
}

/// One host input. Pointer coordinates are in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolKind },
    StrokeWidth { width: f64 },
    StrokeColor { color: SerializableColor },
    Fill { enabled: bool },
    Zoom { zoom: f64 },
    CanvasSize { width: f64, height: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Undo,
    Redo,
    Clear,
    /// Replace the drawing with an image file.
    Import { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script: Script = serde_json::from_str(
            r#"{
                "steps": [
                    { "op": "tool", "tool": "circle" },
                    { "op": "stroke_color", "color": { "r": 1, "g": 2, "b": 3, "a": 255 } },
                    { "op": "down", "x": 1, "y": 2 },
                    { "op": "undo" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.viewport, default_viewport());
        assert_eq!(script.config, EngineConfig::default());
        assert_eq!(script.steps[0], Step::Tool { tool: ToolKind::Circle });
        assert_eq!(script.steps[2], Step::Down { x: 1.0, y: 2.0 });
        assert_eq!(script.steps[3], Step::Undo);
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result: Result<Script, _> = serde_json::from_str(r#"{ "steps": [{ "op": "fly" }] }"#);
        assert!(result.is_err());
    }
}
