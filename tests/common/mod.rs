//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use linked_ideas::{CanvasObserver, ElementRef, Rect};
use std::cell::RefCell;
use std::rc::Rc;

/// Records observer notifications for testing.
///
/// Each field records calls to the corresponding callback with their arguments.
#[derive(Default, Clone)]
pub struct RecordingObserver {
    /// (frame, prefilled text)
    pub shown: Rc<RefCell<Vec<(Rect, String)>>>,
    /// Count of dismiss_text_entry calls
    pub dismissed: Rc<RefCell<usize>>,
    /// Count of needs_redraw calls
    pub redraws: Rc<RefCell<usize>>,
    pub selections: Rc<RefCell<Vec<Option<ElementRef>>>>,
    /// Count of diagram_changed calls
    pub diagram_changes: Rc<RefCell<usize>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded notifications.
    pub fn clear(&self) {
        self.shown.borrow_mut().clear();
        *self.dismissed.borrow_mut() = 0;
        *self.redraws.borrow_mut() = 0;
        self.selections.borrow_mut().clear();
        *self.diagram_changes.borrow_mut() = 0;
    }
}

impl CanvasObserver for RecordingObserver {
    fn show_text_entry(&self, frame: Rect, text: &str) {
        self.shown.borrow_mut().push((frame, text.to_owned()));
    }

    fn dismiss_text_entry(&self) {
        *self.dismissed.borrow_mut() += 1;
    }

    fn needs_redraw(&self) {
        *self.redraws.borrow_mut() += 1;
    }

    fn selection_changed(&self, selection: Option<ElementRef>) {
        self.selections.borrow_mut().push(selection);
    }

    fn diagram_changed(&self) {
        *self.diagram_changes.borrow_mut() += 1;
    }
}
