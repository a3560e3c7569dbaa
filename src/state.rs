//! Canvas interaction state machine.
//!
//! The machine owns the current [`CanvasState`] and applies [`Action`]s to a
//! [`Diagram`]. Each successful transition returns the [`Effect`]s the host
//! has to carry out (show or hide the text entry, redraw). A failed transition
//! returns an error and leaves both the state and the diagram untouched.
//!
//! Side effects of leaving and entering states:
//! - leaving `NewConcept` / `EditingConceptText` dismisses the text entry
//! - leaving `SelectedElement(e)` clears `e`'s selection flag
//! - entering `SelectedElement(e)` sets `e`'s selection flag
//! - entering `EditingConceptText` sets the concept's editing flag, leaving clears it

use crate::error::CanvasError;
use crate::graph::{ConceptId, Diagram, ElementRef};
use crate::hit_test::{concept_at, links_at};
use crate::path::Point;
use crate::text::TextMetrics;
use tracing::{debug, trace};

/// Click classification delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Single,
    Double,
}

impl Click {
    /// Map a toolkit click count. Counts other than 1 and 2 are not handled.
    pub fn from_count(count: i32) -> Option<Self> {
        match count {
            1 => Some(Click::Single),
            2 => Some(Click::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CanvasState {
    #[default]
    Waiting,
    /// Text entry is open at `at` for a concept that does not exist yet.
    NewConcept { at: Point },
    /// Text entry is open at `at` to edit an existing concept.
    EditingConceptText { at: Point, concept: ConceptId },
    SelectedElement { element: ElementRef },
}

impl CanvasState {
    pub fn name(&self) -> &'static str {
        match self {
            CanvasState::Waiting => "Waiting",
            CanvasState::NewConcept { .. } => "NewConcept",
            CanvasState::EditingConceptText { .. } => "EditingConceptText",
            CanvasState::SelectedElement { .. } => "SelectedElement",
        }
    }

    /// Whether the inline text entry is open.
    pub fn is_text_entry(&self) -> bool {
        matches!(
            self,
            CanvasState::NewConcept { .. } | CanvasState::EditingConceptText { .. }
        )
    }

    pub fn selection(&self) -> Option<ElementRef> {
        match self {
            CanvasState::SelectedElement { element } => Some(*element),
            _ => None,
        }
    }
}

/// Transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToWaiting,
    ToNewConcept(Point),
    ToEditingConcept(ConceptId),
    ToSelectedElement(ElementRef),
    /// Confirm the text entry (Enter).
    CommitText(String),
    /// Abandon the text entry (Escape).
    Cancel,
    /// Remove the selected element from the diagram.
    DeleteSelection,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ToWaiting => "wait",
            Action::ToNewConcept(_) => "start a new concept",
            Action::ToEditingConcept(_) => "edit a concept",
            Action::ToSelectedElement(_) => "select an element",
            Action::CommitText(_) => "commit text",
            Action::Cancel => "cancel text entry",
            Action::DeleteSelection => "delete the selection",
        }
    }
}

/// Work the host carries out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open the inline text entry at a point, prefilled with `text`.
    ShowTextEntry { at: Point, text: String },
    /// Clear, hide and disable the inline text entry.
    DismissTextEntry,
    ConceptAdded(ConceptId),
    ConceptTextChanged(ConceptId),
    ElementsRemoved(Vec<ElementRef>),
    SelectionChanged(Option<ElementRef>),
    Redraw,
}

#[derive(Debug, Clone, Default)]
pub struct CanvasStateMachine {
    state: CanvasState,
}

impl CanvasStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn selection(&self) -> Option<ElementRef> {
        self.state.selection()
    }

    /// Translate a click at `point` into a transition.
    ///
    /// - single click on a concept selects the first concept hit, anywhere
    ///   else returns to `Waiting`
    /// - double click on a concept edits it, on empty canvas starts a new
    ///   concept; a double click on a link alone does nothing
    pub fn handle_click(
        &mut self,
        diagram: &mut Diagram,
        metrics: &dyn TextMetrics,
        point: Point,
        click: Click,
    ) -> Result<Vec<Effect>, CanvasError> {
        let action = match click {
            Click::Single => match concept_at(diagram, point) {
                Some(id) => Action::ToSelectedElement(ElementRef::Concept(id)),
                None => Action::ToWaiting,
            },
            Click::Double => match concept_at(diagram, point) {
                Some(id) => Action::ToEditingConcept(id),
                None if !links_at(diagram, point).is_empty() => {
                    debug!(x = point.x, y = point.y, "double click on link ignored");
                    return Ok(Vec::new());
                }
                None => Action::ToNewConcept(point),
            },
        };
        trace!(?click, action = action.name(), "click");
        self.apply(diagram, metrics, action)
    }

    /// Apply an action.
    ///
    /// # Errors
    /// - `InvalidTransition` when the action does not apply to the current state
    /// - `UnknownElement` when the action names an element not in the diagram
    pub fn apply(
        &mut self,
        diagram: &mut Diagram,
        metrics: &dyn TextMetrics,
        action: Action,
    ) -> Result<Vec<Effect>, CanvasError> {
        match action {
            Action::ToWaiting => Ok(self.transition(diagram, CanvasState::Waiting, |_, _| {})),

            Action::ToNewConcept(at) => {
                Ok(self.transition(diagram, CanvasState::NewConcept { at }, |_, _| {}))
            }

            Action::ToEditingConcept(concept) => {
                let at = diagram
                    .concept(concept)
                    .ok_or(CanvasError::UnknownElement(concept.into()))?
                    .point();
                let next = CanvasState::EditingConceptText { at, concept };
                Ok(self.transition(diagram, next, |_, _| {}))
            }

            Action::ToSelectedElement(element) => {
                if !diagram.contains(element) {
                    return Err(CanvasError::UnknownElement(element));
                }
                let next = CanvasState::SelectedElement { element };
                Ok(self.transition(diagram, next, |_, _| {}))
            }

            Action::CommitText(text) => self.commit_text(diagram, metrics, text),

            Action::Cancel if self.state.is_text_entry() => {
                Ok(self.transition(diagram, CanvasState::Waiting, |_, _| {}))
            }

            Action::DeleteSelection => {
                let Some(element) = self.state.selection() else {
                    return Err(self.invalid(&Action::DeleteSelection));
                };
                if !diagram.contains(element) {
                    return Err(CanvasError::UnknownElement(element));
                }
                Ok(self.transition(diagram, CanvasState::Waiting, |diagram, effects| {
                    let mut removed = vec![element];
                    match element {
                        ElementRef::Concept(id) => {
                            if let Ok(links) = diagram.remove_concept(id) {
                                removed.extend(links.into_iter().map(ElementRef::Link));
                            }
                        }
                        ElementRef::Link(id) => {
                            let _ = diagram.remove_link(id);
                        }
                    }
                    effects.push(Effect::ElementsRemoved(removed));
                }))
            }

            action @ Action::Cancel => Err(self.invalid(&action)),
        }
    }

    fn commit_text(
        &mut self,
        diagram: &mut Diagram,
        metrics: &dyn TextMetrics,
        text: String,
    ) -> Result<Vec<Effect>, CanvasError> {
        match self.state {
            CanvasState::NewConcept { at } => {
                Ok(self.transition(diagram, CanvasState::Waiting, |diagram, effects| {
                    if text.is_empty() {
                        debug!(error = %CanvasError::EmptyInput, "discarding new concept");
                        return;
                    }
                    let id = diagram.add_concept(text, at, metrics);
                    debug!(%id, x = at.x, y = at.y, "concept added");
                    effects.push(Effect::ConceptAdded(id));
                }))
            }
            CanvasState::EditingConceptText { concept, .. } => {
                if diagram.concept(concept).is_none() {
                    return Err(CanvasError::UnknownElement(concept.into()));
                }
                Ok(self.transition(diagram, CanvasState::Waiting, |diagram, effects| {
                    if text.is_empty() {
                        debug!(error = %CanvasError::EmptyInput, %concept, "keeping previous text");
                        return;
                    }
                    if diagram.set_concept_text(concept, text, metrics).is_ok() {
                        effects.push(Effect::ConceptTextChanged(concept));
                    }
                }))
            }
            _ => Err(self.invalid(&Action::CommitText(text))),
        }
    }

    fn invalid(&self, action: &Action) -> CanvasError {
        CanvasError::InvalidTransition {
            state: self.state.name(),
            action: action.name(),
        }
    }

    /// Leave the current state, run `between`, enter `next`.
    fn transition(
        &mut self,
        diagram: &mut Diagram,
        next: CanvasState,
        between: impl FnOnce(&mut Diagram, &mut Vec<Effect>),
    ) -> Vec<Effect> {
        let previous = self.state;
        let mut effects = Vec::new();

        Self::exit(previous, diagram, &mut effects);
        between(diagram, &mut effects);
        Self::enter(next, diagram, &mut effects);
        self.state = next;

        if previous.selection() != next.selection() {
            effects.push(Effect::SelectionChanged(next.selection()));
        }
        effects.push(Effect::Redraw);

        debug!(from = previous.name(), to = next.name(), "canvas transition");
        effects
    }

    fn exit(state: CanvasState, diagram: &mut Diagram, effects: &mut Vec<Effect>) {
        match state {
            CanvasState::Waiting => {}
            CanvasState::NewConcept { .. } => effects.push(Effect::DismissTextEntry),
            CanvasState::EditingConceptText { concept, .. } => {
                if let Some(node) = diagram.concept_mut(concept) {
                    node.set_editing(false);
                }
                effects.push(Effect::DismissTextEntry);
            }
            CanvasState::SelectedElement { element } => {
                diagram.set_selected(element, false);
            }
        }
    }

    fn enter(state: CanvasState, diagram: &mut Diagram, effects: &mut Vec<Effect>) {
        match state {
            CanvasState::Waiting => {}
            CanvasState::NewConcept { at } => effects.push(Effect::ShowTextEntry {
                at,
                text: String::new(),
            }),
            CanvasState::EditingConceptText { at, concept } => {
                let text = match diagram.concept_mut(concept) {
                    Some(node) => {
                        node.set_editing(true);
                        node.text().to_owned()
                    }
                    None => String::new(),
                };
                effects.push(Effect::ShowTextEntry { at, text });
            }
            CanvasState::SelectedElement { element } => {
                diagram.set_selected(element, true);
            }
        }
    }
}
