//! Controller harness shared by the level tests.
//!
//! Text is measured at 10 px per column and 20 px per line, so a concept
//! named `"alpha"` anchored at (100, 100) covers x 55..125 and y 70..110.

use super::RecordingObserver;
use linked_ideas::{
    CanvasConfig, CanvasController, ConceptId, ElementRef, LinkId, MonospaceMetrics, Point,
};
use std::rc::Rc;

pub const METRICS: MonospaceMetrics = MonospaceMetrics {
    char_width: 10.0,
    line_height: 20.0,
};

pub fn test_config() -> CanvasConfig {
    CanvasConfig {
        metrics: METRICS,
        ..CanvasConfig::default()
    }
}

/// A controller with a recording observer attached.
pub struct CanvasHarness {
    pub ctrl: CanvasController,
    pub observer: RecordingObserver,
}

impl CanvasHarness {
    pub fn new() -> Self {
        let ctrl = CanvasController::with_config(test_config());
        let observer = RecordingObserver::new();
        ctrl.set_observer(Rc::new(observer.clone()));
        Self { ctrl, observer }
    }

    pub fn single_click(&self, x: f32, y: f32) -> bool {
        self.ctrl.mouse_down(x, y, 1)
    }

    pub fn double_click(&self, x: f32, y: f32) -> bool {
        self.ctrl.mouse_down(x, y, 2)
    }

    /// Create a concept through the UI path: double click, type, Enter.
    pub fn add_concept(&self, text: &str, x: f32, y: f32) -> ConceptId {
        assert!(self.double_click(x, y), "double click should start a concept");
        assert!(self.ctrl.commit_text(text), "commit should succeed");
        let diagram = self.ctrl.diagram();
        diagram
            .concepts()
            .last()
            .map(|c| c.id())
            .expect("concept should have been added")
    }

    pub fn connect(&self, origin: ConceptId, target: ConceptId) -> LinkId {
        self.ctrl.connect(origin, target).expect("link should be valid")
    }

    pub fn concept_text(&self, id: ConceptId) -> Option<String> {
        let diagram = self.ctrl.diagram();
        diagram.concept(id).map(|c| c.text().to_owned())
    }

    pub fn is_selected(&self, element: ElementRef) -> bool {
        self.ctrl.diagram().is_selected(element)
    }

    pub fn concept_count(&self) -> usize {
        self.ctrl.diagram().concepts().len()
    }

    pub fn link_count(&self) -> usize {
        self.ctrl.diagram().links().len()
    }

    pub fn anchor(&self, id: ConceptId) -> Point {
        self.ctrl.diagram().concept(id).map(|c| c.point()).unwrap_or_default()
    }
}
