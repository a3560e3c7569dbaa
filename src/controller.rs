//! High-level controller wiring the canvas core to a host UI.
//!
//! The [`CanvasController`] owns the diagram, the state machine and the
//! inline text-entry surface, and hands out closures for the UI callbacks.
//!
//! # Example
//!
//! ```ignore
//! use linked_ideas::CanvasController;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = CanvasController::new();
//!
//!     window.on_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_text_committed(ctrl.text_committed_callback());
//!     window.on_text_cancelled(ctrl.text_cancelled_callback());
//!
//!     let model = std::rc::Rc::new(slint::VecModel::<DrawItem>::default());
//!     ctrl.bind_draw_model(model.clone(), DrawItem::from_command);
//!     window.set_draw_items(model.into());
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::CanvasConfig;
use crate::document::{self, Document};
use crate::error::{CanvasError, DiagramError, DocumentError};
use crate::graph::{ConceptId, Diagram, ElementRef, LinkId};
use crate::path::{Point, Rect};
use crate::render::{DrawCommand, DrawList};
use crate::state::{Action, CanvasState, CanvasStateMachine, Click, Effect};
use crate::text::TextMetrics;
use slint::{SharedString, VecModel};
use std::cell::{Cell, Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Notifications from the core to the host shell.
///
/// All methods default to no-ops; implement the ones the shell cares about.
pub trait CanvasObserver {
    /// Show an editable text field in `frame`, prefilled with `text`.
    fn show_text_entry(&self, _frame: Rect, _text: &str) {}
    /// Clear, hide and disable the text field.
    fn dismiss_text_entry(&self) {}
    fn needs_redraw(&self) {}
    fn selection_changed(&self, _selection: Option<ElementRef>) {}
    /// Concepts or links were added, edited or removed.
    fn diagram_changed(&self) {}
}

/// State of the inline text-entry surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextEntry {
    pub frame: Rect,
    pub visible: bool,
    pub editable: bool,
    pub text: String,
}

impl TextEntry {
    fn show(&mut self, frame: Rect, text: String) {
        self.frame = frame;
        self.visible = true;
        self.editable = true;
        self.text = text;
    }

    fn dismiss(&mut self) {
        self.frame.origin = Point::default();
        self.visible = false;
        self.editable = false;
        self.text.clear();
    }
}

/// Controller that owns canvas state and provides callback implementations.
///
/// Clone this controller to share it across callbacks. All clones see the
/// same diagram and state.
#[derive(Clone)]
pub struct CanvasController {
    diagram: Rc<RefCell<Diagram>>,
    machine: Rc<RefCell<CanvasStateMachine>>,
    text_entry: Rc<RefCell<TextEntry>>,
    draw_list: Rc<RefCell<DrawList>>,
    config: Rc<CanvasConfig>,
    metrics: Rc<dyn TextMetrics>,
    observer: Rc<RefCell<Option<Rc<dyn CanvasObserver>>>>,
    needs_redraw: Rc<Cell<bool>>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// Create a controller with an empty diagram and default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create a controller measuring text with the config's monospace metrics.
    pub fn with_config(config: CanvasConfig) -> Self {
        let metrics = Rc::new(config.metrics);
        Self::with_metrics(config, metrics)
    }

    /// Create a controller with host-supplied text metrics.
    pub fn with_metrics(config: CanvasConfig, metrics: Rc<dyn TextMetrics>) -> Self {
        let draw_list = DrawList::new(config.render_style());
        Self {
            diagram: Rc::new(RefCell::new(Diagram::new())),
            machine: Rc::new(RefCell::new(CanvasStateMachine::new())),
            text_entry: Rc::new(RefCell::new(TextEntry::default())),
            draw_list: Rc::new(RefCell::new(draw_list)),
            config: Rc::new(config),
            metrics,
            observer: Rc::new(RefCell::new(None)),
            needs_redraw: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_observer(&self, observer: Rc<dyn CanvasObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Read access to the diagram.
    ///
    /// Edits go through the controller so the state machine never refers to
    /// removed elements. Drop the guard before calling back into the controller.
    pub fn diagram(&self) -> Ref<'_, Diagram> {
        self.diagram.borrow()
    }

    pub fn state(&self) -> CanvasState {
        *self.machine.borrow().state()
    }

    /// The currently selected element, for shell-level editing affordances.
    pub fn selection(&self) -> Option<ElementRef> {
        self.machine.borrow().selection()
    }

    pub fn text_entry(&self) -> TextEntry {
        self.text_entry.borrow().clone()
    }

    /// Return and reset the pending redraw flag.
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.replace(false)
    }

    // === Event handlers ===

    /// Handle a pointer press at canvas-local `(x, y)` with the toolkit's
    /// click count. Returns `true` if a transition happened.
    pub fn mouse_down(&self, x: f32, y: f32, click_count: i32) -> bool {
        let Some(click) = Click::from_count(click_count) else {
            trace!(click_count, "click count ignored");
            return false;
        };
        let point = Point::new(x, y);
        self.safe_transition(|machine, diagram, metrics| {
            machine.handle_click(diagram, metrics, point, click)
        })
    }

    /// Confirm the text entry (Enter).
    pub fn commit_text(&self, text: &str) -> bool {
        self.apply_logged(Action::CommitText(text.to_owned()))
    }

    /// Abandon the text entry (Escape).
    pub fn cancel_text_entry(&self) -> bool {
        self.apply_logged(Action::Cancel)
    }

    pub fn select(&self, element: ElementRef) -> bool {
        self.apply_logged(Action::ToSelectedElement(element))
    }

    pub fn delete_selection(&self) -> bool {
        self.apply_logged(Action::DeleteSelection)
    }

    /// Apply an action and report failures to the caller instead of logging.
    pub fn apply(&self, action: Action) -> Result<(), CanvasError> {
        let effects = {
            let mut machine = self.machine.borrow_mut();
            let mut diagram = self.diagram.borrow_mut();
            machine.apply(&mut *diagram, &*self.metrics, action)?
        };
        self.dispatch(effects);
        Ok(())
    }

    fn apply_logged(&self, action: Action) -> bool {
        self.safe_transition(|machine, diagram, metrics| machine.apply(diagram, metrics, action))
    }

    /// Run a transition; failures are logged and leave everything unchanged.
    fn safe_transition<F>(&self, transition: F) -> bool
    where
        F: FnOnce(
            &mut CanvasStateMachine,
            &mut Diagram,
            &dyn TextMetrics,
        ) -> Result<Vec<Effect>, CanvasError>,
    {
        let result = {
            let mut machine = self.machine.borrow_mut();
            let mut diagram = self.diagram.borrow_mut();
            transition(&mut *machine, &mut *diagram, &*self.metrics)
        };

        match result {
            Ok(effects) => {
                self.dispatch(effects);
                true
            }
            Err(err) => {
                warn!(error = %err, state = self.state().name(), "transition ignored");
                false
            }
        }
    }

    /// Carry out transition effects. No borrows are held while the observer
    /// runs, so it may call back into the controller.
    fn dispatch(&self, effects: Vec<Effect>) {
        let observer = self.observer.borrow().clone();

        for effect in effects {
            match effect {
                Effect::ShowTextEntry { at, text } => {
                    let frame = Rect::centered(at, self.config.text_entry_size);
                    if let Some(observer) = &observer {
                        observer.show_text_entry(frame, &text);
                    }
                    self.text_entry.borrow_mut().show(frame, text);
                }
                Effect::DismissTextEntry => {
                    self.text_entry.borrow_mut().dismiss();
                    if let Some(observer) = &observer {
                        observer.dismiss_text_entry();
                    }
                }
                Effect::ConceptAdded(_)
                | Effect::ConceptTextChanged(_)
                | Effect::ElementsRemoved(_) => {
                    if let Some(observer) = &observer {
                        observer.diagram_changed();
                    }
                }
                Effect::SelectionChanged(selection) => {
                    if let Some(observer) = &observer {
                        observer.selection_changed(selection);
                    }
                }
                Effect::Redraw => self.request_redraw(observer.as_deref()),
            }
        }
    }

    fn request_redraw(&self, observer: Option<&dyn CanvasObserver>) {
        self.needs_redraw.set(true);
        if let Some(observer) = observer {
            observer.needs_redraw();
        }
    }

    fn diagram_mutated(&self) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = &observer {
            observer.diagram_changed();
        }
        self.request_redraw(observer.as_deref());
    }

    // === Diagram editing outside the state machine ===

    /// Link two concepts using the configured default color.
    pub fn connect(&self, origin: ConceptId, target: ConceptId) -> Result<LinkId, DiagramError> {
        let id = self
            .diagram
            .borrow_mut()
            .add_link(origin, target, self.config.default_link_color)?;
        debug!(%id, %origin, %target, "link added");
        self.diagram_mutated();
        Ok(id)
    }

    pub fn move_concept(&self, id: ConceptId, point: Point) -> Result<(), DiagramError> {
        self.diagram.borrow_mut().move_concept(id, point)?;
        self.diagram_mutated();
        Ok(())
    }

    pub fn set_link_color(&self, id: LinkId, color: slint::Color) -> Result<(), DiagramError> {
        self.diagram.borrow_mut().set_link_color(id, color)?;
        self.diagram_mutated();
        Ok(())
    }

    /// Remove a concept (with its links) or a link.
    ///
    /// If the selection or the concept being edited goes away, the canvas
    /// first returns to `Waiting`.
    pub fn remove_element(&self, element: ElementRef) -> Result<(), DiagramError> {
        let doomed = {
            let diagram = self.diagram.borrow();
            let mut doomed = vec![element];
            match element {
                ElementRef::Concept(id) => {
                    if diagram.concept(id).is_none() {
                        return Err(DiagramError::UnknownConcept(id));
                    }
                    doomed.extend(diagram.links_connected_to(id).into_iter().map(ElementRef::Link));
                }
                ElementRef::Link(id) => {
                    if diagram.link(id).is_none() {
                        return Err(DiagramError::UnknownLink(id));
                    }
                }
            }
            doomed
        };

        let referenced = match self.state() {
            CanvasState::SelectedElement { element } => doomed.contains(&element),
            CanvasState::EditingConceptText { concept, .. } => {
                doomed.contains(&ElementRef::Concept(concept))
            }
            CanvasState::Waiting | CanvasState::NewConcept { .. } => false,
        };
        if referenced {
            self.apply_logged(Action::ToWaiting);
        }

        {
            let mut diagram = self.diagram.borrow_mut();
            match element {
                ElementRef::Concept(id) => {
                    diagram.remove_concept(id)?;
                }
                ElementRef::Link(id) => {
                    diagram.remove_link(id)?;
                }
            }
        }
        debug!(?element, removed = doomed.len(), "element removed");
        self.diagram_mutated();
        Ok(())
    }

    /// Swap in a different diagram, e.g. after opening a document.
    ///
    /// Any pending text entry is dismissed and the canvas returns to `Waiting`.
    pub fn replace_diagram(&self, diagram: Diagram) {
        let was_text_entry = self.state().is_text_entry();
        *self.diagram.borrow_mut() = diagram;
        *self.machine.borrow_mut() = CanvasStateMachine::new();
        if was_text_entry {
            self.dispatch(vec![Effect::DismissTextEntry]);
        }
        self.dispatch(vec![Effect::SelectionChanged(None)]);
        self.diagram_mutated();
    }

    pub fn open_document(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let diagram = document::load(path, &*self.metrics)?;
        self.replace_diagram(diagram);
        Ok(())
    }

    pub fn save_document(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        document::save(&self.diagram.borrow(), path)
    }

    pub fn to_document(&self) -> Document {
        Document::from_diagram(&self.diagram.borrow())
    }

    // === Rendering ===

    /// Render the current diagram. Called once per display refresh.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut draw_list = self.draw_list.borrow_mut();
        draw_list.update(&self.diagram.borrow());
        draw_list.commands().to_vec()
    }

    /// Mirror draw commands into a Slint model on every render.
    pub fn bind_draw_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&DrawCommand) -> P + 'static,
    {
        let mut draw_list = self.draw_list.borrow_mut();
        draw_list.update(&self.diagram.borrow());
        draw_list.bind_model(model, constructor);
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-pressed(x, y, click-count)`.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, i32) {
        let ctrl = self.clone();
        move |x, y, click_count| {
            ctrl.mouse_down(x, y, click_count);
        }
    }

    /// Returns a callback for `text-committed(text)`.
    pub fn text_committed_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |text| {
            ctrl.commit_text(text.as_str());
        }
    }

    /// Returns a callback for `text-cancelled()`.
    pub fn text_cancelled_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.cancel_text_entry();
        }
    }
}
