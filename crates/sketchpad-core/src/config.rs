//! Engine configuration.

use crate::camera::MIN_CANVAS_SIZE;
use crate::error::{ConfigError, ConfigResult};
use crate::shapes::{DEFAULT_SIMPLIFY_TOLERANCE, SerializableColor};
use crate::tools::StrokeSettings;
use serde::{Deserialize, Serialize};

/// Default handle hit tolerance in screen pixels.
pub const DEFAULT_HANDLE_TOLERANCE: f64 = 20.0;

/// Tunables for a [`DrawingEngine`](crate::DrawingEngine).
///
/// Missing fields in JSON fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial canvas width in canvas units.
    pub canvas_width: f64,
    /// Initial canvas height in canvas units.
    pub canvas_height: f64,
    /// Distance in screen pixels within which a resize handle is hit.
    pub handle_tolerance: f64,
    /// Side length of the drawn handle squares, in screen pixels.
    pub handle_size: f64,
    /// Freehand simplification tolerance in canvas units.
    pub simplify_tolerance: f64,
    /// Canvas fill; also the eraser color.
    pub background: SerializableColor,
    /// Area around the canvas.
    pub backdrop: SerializableColor,
    pub border: SerializableColor,
    pub handle_color: SerializableColor,
    /// Stroke settings a new engine starts with.
    pub stroke: StrokeSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            handle_tolerance: DEFAULT_HANDLE_TOLERANCE,
            handle_size: 8.0,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            background: SerializableColor::white(),
            backdrop: SerializableColor::new(224, 224, 224, 255),
            border: SerializableColor::new(160, 160, 160, 255),
            handle_color: SerializableColor::new(33, 150, 243, 255),
            stroke: StrokeSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Reject non-positive tolerances and round sizes to whole pixels
    /// and clamp them to their minimums.
    pub fn validated(mut self) -> ConfigResult<Self> {
        positive("handle_tolerance", self.handle_tolerance)?;
        positive("handle_size", self.handle_size)?;
        positive("simplify_tolerance", self.simplify_tolerance)?;
        if !self.canvas_width.is_finite() || !self.canvas_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "canvas_size",
                reason: "must be finite".to_string(),
            });
        }
        self.canvas_width = self.canvas_width.round().max(MIN_CANVAS_SIZE);
        self.canvas_height = self.canvas_height.round().max(MIN_CANVAS_SIZE);
        let width = self.stroke.width;
        self.stroke.set_width(width);
        Ok(self)
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}
