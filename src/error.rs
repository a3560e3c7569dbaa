//! Error types for the canvas core.
//!
//! None of these are fatal. The controller logs them and carries on with the
//! state it had before the failing request.

use crate::graph::{ConceptId, ElementRef, LinkId};

/// Failure of a canvas interaction or geometry query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The requested action does not apply to the current state.
    #[error("cannot {action} while in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    /// No boundary intersection exists for an arrow.
    #[error("arrow geometry is degenerate")]
    DegenerateGeometry,
    /// Text confirmation carried no content.
    #[error("text entry is empty")]
    EmptyInput,
    /// The element is not part of the diagram.
    #[error("unknown element {0:?}")]
    UnknownElement(ElementRef),
    #[error(transparent)]
    Diagram(#[from] DiagramError),
}

/// Violations of the diagram's referential invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("concept {0} not found")]
    UnknownConcept(ConceptId),
    #[error("link {0} not found")]
    UnknownLink(LinkId),
    #[error("link {link} references missing concept {concept}")]
    DanglingLink { link: LinkId, concept: ConceptId },
    #[error("concept id {0} used more than once")]
    DuplicateConcept(ConceptId),
    #[error("link id {0} used more than once")]
    DuplicateLink(LinkId),
    #[error("id {0} exceeds the largest accepted id")]
    IdOutOfRange(u64),
}

/// Errors while reading or writing a diagram document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
    #[error("inconsistent document: {0}")]
    Diagram(#[from] DiagramError),
}

/// Errors while loading a [`CanvasConfig`](crate::config::CanvasConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color `{0}`, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("{field} must be a finite, non-negative length, got {value}")]
    InvalidLength { field: &'static str, value: f32 },
}
