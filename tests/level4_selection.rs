//! Level 4: Selection Tests
//!
//! Tests single-click selection, replacing and clearing the selection,
//! overlapping concepts, and the highlight drawn for selected concepts.

mod common;

use common::harness::CanvasHarness;
use linked_ideas::{CanvasError, CanvasState, ConceptId, DrawCommand, ElementRef, LinkId};
use slint::Color;

// ============================================================================
// Single Selection
// ============================================================================

#[test]
fn test_single_click_selects_concept() {
    let harness = CanvasHarness::new();
    let id = harness.add_concept("alpha", 100.0, 100.0);

    assert!(harness.single_click(100.0, 100.0));
    assert_eq!(
        harness.ctrl.state(),
        CanvasState::SelectedElement {
            element: ElementRef::Concept(id)
        }
    );
    assert!(harness.is_selected(ElementRef::Concept(id)));
}

#[test]
fn test_click_on_rect_edge_selects() {
    let harness = CanvasHarness::new();
    let id = harness.add_concept("alpha", 100.0, 100.0);

    // alpha covers x 55..125, y 70..110; edges count as inside
    harness.single_click(55.0, 70.0);
    assert_eq!(harness.ctrl.selection(), Some(ElementRef::Concept(id)));
}

#[test]
fn test_single_click_replaces_selection() {
    let harness = CanvasHarness::new();
    let a = harness.add_concept("alpha", 100.0, 100.0);
    let b = harness.add_concept("beta", 400.0, 100.0);

    harness.single_click(100.0, 100.0);
    harness.single_click(400.0, 100.0);

    assert!(!harness.is_selected(ElementRef::Concept(a)), "alpha should be deselected");
    assert!(harness.is_selected(ElementRef::Concept(b)), "beta should be selected");
    let diagram = harness.ctrl.diagram();
    assert_eq!(diagram.selected_elements(), vec![ElementRef::Concept(b)]);
}

#[test]
fn test_click_on_already_selected_concept() {
    let harness = CanvasHarness::new();
    let id = harness.add_concept("alpha", 100.0, 100.0);

    harness.single_click(100.0, 100.0);
    harness.single_click(100.0, 100.0);
    assert!(harness.is_selected(ElementRef::Concept(id)));
}

#[test]
fn test_click_on_empty_canvas_clears_selection() {
    let harness = CanvasHarness::new();
    let id = harness.add_concept("alpha", 100.0, 100.0);
    harness.single_click(100.0, 100.0);

    harness.single_click(600.0, 600.0);
    assert_eq!(harness.ctrl.state(), CanvasState::Waiting);
    assert!(!harness.is_selected(ElementRef::Concept(id)));
}

#[test]
fn test_at_most_one_element_selected() {
    let harness = CanvasHarness::new();
    let ids: Vec<ConceptId> = (0..5)
        .map(|i| harness.add_concept("node", i as f32 * 200.0, 0.0))
        .collect();

    for i in 0..5 {
        harness.single_click(i as f32 * 200.0, 0.0);
        let selected = harness.ctrl.diagram().selected_elements();
        assert_eq!(selected, vec![ElementRef::Concept(ids[i])]);
    }
}

// ============================================================================
// Overlapping Concepts
// ============================================================================

#[test]
fn test_overlap_selects_first_inserted() {
    let harness = CanvasHarness::new();
    let first = harness.add_concept("first", 100.0, 100.0);
    // Create the second concept off to the side, then slide it over the first
    let second = harness.add_concept("second", 400.0, 400.0);
    harness
        .ctrl
        .move_concept(second, linked_ideas::Point::new(105.0, 100.0))
        .unwrap();

    harness.single_click(100.0, 100.0);
    assert_eq!(harness.ctrl.selection(), Some(ElementRef::Concept(first)));
}

// ============================================================================
// Notifications and Highlight
// ============================================================================

#[test]
fn test_selection_changes_are_reported() {
    let harness = CanvasHarness::new();
    let a = harness.add_concept("alpha", 100.0, 100.0);
    let b = harness.add_concept("beta", 400.0, 100.0);
    harness.observer.clear();

    harness.single_click(100.0, 100.0);
    harness.single_click(100.0, 100.0);
    harness.single_click(400.0, 100.0);
    harness.single_click(600.0, 600.0);

    assert_eq!(
        harness.observer.selections.borrow().as_slice(),
        &[
            Some(ElementRef::Concept(a)),
            Some(ElementRef::Concept(b)),
            None
        ]
    );
}

#[test]
fn test_selected_concept_is_highlighted_in_red() {
    let harness = CanvasHarness::new();
    let id = harness.add_concept("alpha", 100.0, 100.0);
    harness.single_click(100.0, 100.0);

    let commands = harness.ctrl.draw_commands();
    let rect = harness.ctrl.diagram().concept(id).unwrap().rect();
    assert_eq!(
        commands,
        vec![
            DrawCommand::Text {
                text: "alpha".into(),
                at: rect.origin
            },
            DrawCommand::StrokeRect {
                rect,
                color: Color::from_rgb_u8(255, 0, 0)
            },
        ]
    );

    harness.single_click(600.0, 600.0);
    assert_eq!(harness.ctrl.draw_commands().len(), 1);
}

#[test]
fn test_selecting_unknown_element_fails() {
    let harness = CanvasHarness::new();
    assert!(!harness.ctrl.select(ElementRef::Link(LinkId(7))));

    let err = harness
        .ctrl
        .apply(linked_ideas::Action::ToSelectedElement(ElementRef::Link(LinkId(7))))
        .unwrap_err();
    assert_eq!(err, CanvasError::UnknownElement(ElementRef::Link(LinkId(7))));
    assert_eq!(harness.ctrl.state(), CanvasState::Waiting);
}
