//! Change notifications emitted by the engine.
//!
//! Events are collected and must be polled by the host after each
//! interaction.

use serde::{Deserialize, Serialize};

/// Something the host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The element list changed; the host should repaint.
    Changed,
    /// `can_undo` or `can_redo` may have changed.
    UndoRedoAvailabilityChanged,
    /// The canvas was resized.
    CanvasSizeChanged { width: f64, height: f64 },
}

/// Pending events plus batch bookkeeping.
///
/// While a batch is open, `Changed` and `UndoRedoAvailabilityChanged` are
/// collapsed into flags and emitted once when the outermost batch ends.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<EngineEvent>,
    batch_depth: usize,
    changed: bool,
    availability: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify_changed(&mut self) {
        if self.batch_depth > 0 {
            self.changed = true;
        } else {
            self.pending.push(EngineEvent::Changed);
        }
    }

    pub fn notify_availability(&mut self) {
        if self.batch_depth > 0 {
            self.availability = true;
        } else {
            self.pending.push(EngineEvent::UndoRedoAvailabilityChanged);
        }
    }

    /// Queue an event that is never coalesced.
    pub fn push(&mut self, event: EngineEvent) {
        self.pending.push(event);
    }

    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close one batch level. Unbalanced calls are ignored.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            log::warn!("end_batch called without a matching begin_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        if std::mem::take(&mut self.changed) {
            self.pending.push(EngineEvent::Changed);
        }
        if std::mem::take(&mut self.availability) {
            self.pending.push(EngineEvent::UndoRedoAvailabilityChanged);
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Drain all queued events in emission order.
    pub fn poll(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }
}
