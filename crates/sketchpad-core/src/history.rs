//! Linear undo/redo over the element set.
//!
//! Unlike a snapshot-per-change history, every entry stores only the
//! element(s) it touched plus the position they occupied.

use crate::events::{EngineEvent, EventQueue};
use crate::shapes::Element;
use std::ops::{Deref, DerefMut};

/// A reversible change to the element set.
#[derive(Debug, Clone)]
pub enum HistoryAction {
    /// `element` was inserted at `index`.
    Add { element: Element, index: usize },
    /// `element` was removed from `index`.
    Remove { element: Element, index: usize },
    /// All elements were removed. While undoable, `snapshot` holds them in
    /// order; once undone it is empty since redo takes the live set.
    Clear { snapshot: Vec<Element> },
}

/// Owns the live element set and its undo/redo stacks.
#[derive(Debug, Default)]
pub struct History {
    elements: Vec<Element>,
    undo_stack: Vec<HistoryAction>,
    redo_stack: Vec<HistoryAction>,
    events: EventQueue,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Append an element. Returns its index.
    pub fn record_add(&mut self, element: Element) -> usize {
        let index = self.elements.len();
        log::debug!("record add: {} at {}", element.kind_name(), index);
        self.elements.push(element.clone());
        self.push_forward(HistoryAction::Add { element, index });
        index
    }

    /// Remove the element at `index`, recording it for undo.
    pub fn record_remove(&mut self, index: usize) -> Option<Element> {
        if index >= self.elements.len() {
            return None;
        }
        let element = self.elements.remove(index);
        log::debug!("record remove: {} at {}", element.kind_name(), index);
        self.push_forward(HistoryAction::Remove {
            element: element.clone(),
            index,
        });
        Some(element)
    }

    /// Remove every element as one undoable step. No-op when empty.
    pub fn record_clear(&mut self) {
        if self.elements.is_empty() {
            return;
        }
        let snapshot = std::mem::take(&mut self.elements);
        log::debug!("record clear: {} elements", snapshot.len());
        self.push_forward(HistoryAction::Clear { snapshot });
    }

    /// Revert the most recent action. Returns false if nothing was undone.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.undo_stack.pop() else {
            return false;
        };
        let applied = match action {
            HistoryAction::Add { element, index } => self
                .take_element(&element, index)
                .map(|index| HistoryAction::Add { element, index }),
            HistoryAction::Remove { element, index } => {
                let index = self.insert_clamped(element.clone(), index);
                Some(HistoryAction::Remove { element, index })
            }
            HistoryAction::Clear { snapshot } => {
                self.elements.extend(snapshot);
                Some(HistoryAction::Clear {
                    snapshot: Vec::new(),
                })
            }
        };
        self.finish_step(applied, false)
    }

    /// Re-apply the most recently undone action. Returns false if nothing
    /// was redone.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        let applied = match action {
            HistoryAction::Add { element, index } => {
                let index = self.insert_clamped(element.clone(), index);
                Some(HistoryAction::Add { element, index })
            }
            HistoryAction::Remove { element, index } => {
                if index < self.elements.len() {
                    let removed = self.elements.remove(index);
                    Some(HistoryAction::Remove {
                        element: removed,
                        index,
                    })
                } else {
                    log::warn!("redo remove: index {} out of range, dropping", index);
                    None
                }
            }
            HistoryAction::Clear { .. } => {
                let snapshot = std::mem::take(&mut self.elements);
                Some(HistoryAction::Clear { snapshot })
            }
        };
        self.finish_step(applied, true)
    }

    /// Drop all elements and history without recording anything.
    pub fn reset(&mut self) {
        let had_history = self.can_undo() || self.can_redo();
        let had_elements = !self.elements.is_empty();
        self.elements.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        if had_elements {
            self.events.notify_changed();
        }
        if had_history {
            self.events.notify_availability();
        }
    }

    /// Open a batch that ends when the returned guard is dropped.
    pub fn batch(&mut self) -> BatchScope<'_, Self> {
        BatchScope::new(self)
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Drain queued events.
    pub fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.events.poll()
    }

    fn push_forward(&mut self, action: HistoryAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
        self.notify_mutation();
    }

    /// Push the inverse of a step onto the opposite stack.
    fn finish_step(&mut self, applied: Option<HistoryAction>, onto_undo: bool) -> bool {
        let Some(action) = applied else {
            self.events.notify_availability();
            return false;
        };
        if onto_undo {
            self.undo_stack.push(action);
        } else {
            self.redo_stack.push(action);
        }
        self.notify_mutation();
        true
    }

    fn notify_mutation(&mut self) {
        self.events.notify_changed();
        self.events.notify_availability();
    }

    /// Insert at `index`, appending when it is past the end.
    fn insert_clamped(&mut self, element: Element, index: usize) -> usize {
        if index <= self.elements.len() {
            self.elements.insert(index, element);
            index
        } else {
            self.elements.push(element);
            self.elements.len() - 1
        }
    }

    /// Remove `element`, preferring the recorded index. Returns where it was.
    fn take_element(&mut self, element: &Element, index: usize) -> Option<usize> {
        let id = element.id();
        let position = if self.elements.get(index).is_some_and(|e| e.id() == id) {
            Some(index)
        } else {
            self.elements.iter().position(|e| e.id() == id)
        };
        match position {
            Some(position) => {
                self.elements.remove(position);
                Some(position)
            }
            None => {
                log::warn!("undo add: element {} no longer present, dropping", id);
                None
            }
        }
    }
}

/// Something that coalesces notifications between `begin_batch` and
/// `end_batch`.
pub trait Batch {
    fn begin_batch(&mut self);
    fn end_batch(&mut self);
}

impl Batch for History {
    fn begin_batch(&mut self) {
        self.events.begin_batch();
    }

    fn end_batch(&mut self) {
        self.events.end_batch();
    }
}

/// Batch guard.
///
/// Derefs to the batched value; the batch ends on drop, including early
/// returns and unwinding.
pub struct BatchScope<'a, T: Batch + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: Batch + ?Sized> BatchScope<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        target.begin_batch();
        Self { target }
    }
}

impl<T: Batch + ?Sized> Deref for BatchScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Batch + ?Sized> DerefMut for BatchScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Batch + ?Sized> Drop for BatchScope<'_, T> {
    fn drop(&mut self) {
        self.target.end_batch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Bitmap, BitmapData, ElementId, Line, Paint, Rectangle};
    use kurbo::{Point, Rect};
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn line(x: f64) -> Element {
        Element::Line(Line::new(
            Point::new(x, 0.0),
            Point::new(x + 10.0, 0.0),
            Paint::default(),
        ))
    }

    fn rect() -> Element {
        Element::Rectangle(Rectangle::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Paint::default(),
        ))
    }

    fn ids(history: &History) -> Vec<ElementId> {
        history.elements().iter().map(Element::id).collect()
    }

    fn count_changed(events: &[EngineEvent]) -> usize {
        events.iter().filter(|e| **e == EngineEvent::Changed).count()
    }

    #[test]
    fn test_record_add_returns_index() {
        let mut history = History::new();
        assert_eq!(history.record_add(line(0.0)), 0);
        assert_eq!(history.record_add(line(1.0)), 1);
        assert_eq!(history.len(), 2);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_is_inverse_of_forward_ops() {
        let mut history = History::new();
        let mut states = vec![ids(&history)];

        history.record_add(line(0.0));
        states.push(ids(&history));
        history.record_add(rect());
        states.push(ids(&history));
        history.record_clear();
        states.push(ids(&history));
        history.record_add(line(5.0));
        states.push(ids(&history));

        states.pop();
        while let Some(expected) = states.pop() {
            assert!(history.undo());
            assert_eq!(ids(&history), expected);
        }
        assert!(!history.undo());
    }

    #[test]
    fn test_redo_restores_forward_state() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.record_add(line(1.0));
        history.record_clear();
        let cleared = ids(&history);

        history.undo();
        let restored = ids(&history);
        assert_eq!(restored.len(), 2);
        history.undo();
        history.undo();
        assert!(history.is_empty());

        history.redo();
        history.redo();
        assert_eq!(ids(&history), restored);
        history.redo();
        assert_eq!(ids(&history), cleared);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_add_invalidates_redo() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.undo();
        assert!(history.can_redo());

        history.record_add(line(1.0));
        assert!(!history.can_redo());
        assert!(!history.redo());
    }

    #[test]
    fn test_clear_of_empty_set_is_noop() {
        let mut history = History::new();
        history.record_clear();
        assert!(!history.can_undo());
        assert!(history.poll_events().is_empty());
    }

    #[test]
    fn test_remove_and_undo() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.record_add(line(1.0));
        history.record_add(line(2.0));
        let before = ids(&history);

        let removed = history.record_remove(1).unwrap();
        assert_eq!(removed.id(), before[1]);
        assert_eq!(history.len(), 2);

        history.undo();
        assert_eq!(ids(&history), before);

        history.redo();
        assert_eq!(history.len(), 2);
        assert!(history.record_remove(7).is_none());
    }

    #[test]
    fn test_redo_add_out_of_range_appends() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.record_add(line(1.0));
        let second = history.elements()[1].id();
        history.undo();

        // Shrink the set behind the history's back.
        history.elements.clear();

        assert!(history.redo());
        assert_eq!(ids(&history), vec![second]);
        // The recorded index was corrected, so undo removes the right one.
        assert!(history.undo());
        assert!(history.is_empty());
    }

    #[test]
    fn test_redo_remove_out_of_range_is_dropped() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.record_add(line(1.0));
        history.record_remove(1);
        history.undo();
        history.elements.truncate(1);

        assert!(!history.redo());
        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_every_mutation_notifies() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.undo();
        let events = history.poll_events();
        assert_eq!(count_changed(&events), 2);
        assert!(events.contains(&EngineEvent::UndoRedoAvailabilityChanged));
    }

    #[test]
    fn test_batch_coalesces_notifications() {
        let mut history = History::new();
        history.begin_batch();
        for i in 0..5 {
            history.record_add(line(i as f64));
        }
        history.record_clear();
        assert!(history.poll_events().is_empty());
        history.end_batch();

        let events = history.poll_events();
        assert_eq!(count_changed(&events), 1);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_batch_is_silent() {
        let mut history = History::new();
        {
            let mut scope = history.batch();
            scope.record_clear();
            assert!(!scope.undo());
        }
        let events = history.poll_events();
        assert_eq!(count_changed(&events), 0);
    }

    #[test]
    fn test_batch_scope_ends_on_early_return() {
        fn add_then_bail(history: &mut History) -> Option<()> {
            let mut scope = history.batch();
            scope.record_add(line(0.0));
            scope.record_remove(9)?;
            Some(())
        }

        let mut history = History::new();
        assert!(add_then_bail(&mut history).is_none());
        assert!(!history.events_mut().in_batch());
        assert_eq!(count_changed(&history.poll_events()), 1);
    }

    #[test]
    fn test_batch_scope_ends_during_unwind() {
        let mut history = History::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut scope = history.batch();
            scope.record_add(line(0.0));
            scope.record_add(line(1.0));
            if scope.len() == 2 {
                panic!("interrupted mid-batch");
            }
        }));

        assert!(result.is_err());
        assert!(!history.events_mut().in_batch());
        assert_eq!(
            history.poll_events(),
            vec![EngineEvent::Changed, EngineEvent::UndoRedoAvailabilityChanged]
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_history_shares_bitmap_pixels() {
        let data = BitmapData::from_rgba8_vec(32, 32, vec![9; 32 * 32 * 4]).unwrap();
        let dest = Rect::new(0.0, 0.0, 32.0, 32.0);
        let mut history = History::new();
        history.record_add(Element::Bitmap(Bitmap::new(data.clone(), dest)));
        history.record_clear();
        history.undo();
        history.redo();
        history.undo();

        let Element::Bitmap(live) = &history.elements()[0] else {
            panic!("expected a bitmap");
        };
        assert_eq!(live.image().pixels().as_ptr(), data.pixels().as_ptr());
        let Some(HistoryAction::Add { element, .. }) = history.undo_stack.first() else {
            panic!("expected the add action");
        };
        let Element::Bitmap(recorded) = element else {
            panic!("expected a bitmap");
        };
        assert_eq!(recorded.image().pixels().as_ptr(), data.pixels().as_ptr());
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut history = History::new();
        history.record_add(line(0.0));
        history.undo();
        history.record_add(line(1.0));
        history.reset();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
