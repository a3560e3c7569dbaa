//! # Linked Ideas
//!
//! Toolkit-agnostic core of a concept-map editor. Users double-click empty
//! canvas to type a new concept, click concepts to select them and connect
//! concepts with arrowed links.
//!
//! ## Layout
//!
//! - [`path`] - points, rectangles, arrows and SVG path commands
//! - [`text`] - the [`TextMetrics`] seam used to size concepts
//! - [`graph`] - concepts, links and the [`Diagram`] that owns them
//! - [`hit_test`] - which concept or link lies under a point
//! - [`state`] - the [`CanvasStateMachine`] driving clicks and text entry
//! - [`render`] - turns a diagram into [`DrawCommand`]s
//! - [`document`] - JSON persistence
//! - [`config`] - colors and sizes, loadable from JSON
//! - [`controller`] - [`CanvasController`], the glue for a Slint UI
//!
//! ## Quick Start
//!
//! ```
//! use linked_ideas::{CanvasController, CanvasState, DrawCommand};
//!
//! let ctrl = CanvasController::new();
//! ctrl.mouse_down(100.0, 100.0, 2);
//! assert!(matches!(ctrl.state(), CanvasState::NewConcept { .. }));
//!
//! ctrl.commit_text("idea");
//! assert!(matches!(
//!     ctrl.draw_commands().as_slice(),
//!     [DrawCommand::Text { text, .. }] if text == "idea"
//! ));
//! ```

pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod graph;
pub mod hit_test;
pub mod path;
pub mod render;
pub mod state;
pub mod text;

pub use config::CanvasConfig;
pub use controller::{CanvasController, CanvasObserver, TextEntry};
pub use document::Document;
pub use error::{CanvasError, ConfigError, DiagramError, DocumentError};
pub use graph::{
    concept_rect, link_rect, ConceptId, ConceptNode, Diagram, ElementRef, Link, LinkId,
    Selectable, CONCEPT_PADDING, LINK_PADDING, MAX_ELEMENT_ID,
};
pub use hit_test::{compute_arrow, concept_at, element_at, hit_test, links_at};
pub use path::{
    first_intersection, polygon_path_commands, rect_contains, Arrow, ArrowStyle, Point, Rect,
    Size,
};
pub use render::{render, DrawCommand, DrawList, RenderStyle};
pub use state::{Action, CanvasState, CanvasStateMachine, Click, Effect};
pub use text::{MonospaceMetrics, TextMetrics};
