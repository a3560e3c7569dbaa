//! Diagram documents.
//!
//! A document is the JSON form of a [`Diagram`]: concept ids, texts and
//! anchor points, plus link ids, endpoints and colors. Selection and editing
//! flags are session state and are not stored. Text sizes are re-measured on
//! load, so a document opened with different font metrics lays out correctly.

use crate::config::hex_color;
use crate::error::DocumentError;
use crate::graph::{ConceptId, ConceptNode, Diagram, Link, LinkId};
use crate::path::Point;
use crate::text::TextMetrics;
use serde::{Deserialize, Serialize};
use slint::Color;
use std::path::Path;
use tracing::debug;

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: ConceptId,
    pub text: String,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: LinkId,
    pub origin: ConceptId,
    pub target: ConceptId,
    #[serde(with = "hex_color", default = "crate::graph::default_link_color")]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    #[serde(default)]
    pub concepts: Vec<ConceptRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl Document {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            concepts: diagram
                .concepts()
                .iter()
                .map(|c| ConceptRecord {
                    id: c.id(),
                    text: c.text().to_owned(),
                    point: c.point(),
                })
                .collect(),
            links: diagram
                .links()
                .iter()
                .map(|l| LinkRecord {
                    id: l.id(),
                    origin: l.origin(),
                    target: l.target(),
                    color: l.color(),
                })
                .collect(),
        }
    }

    /// Rebuild the diagram, checking ids and link endpoints.
    ///
    /// # Errors
    /// `UnsupportedVersion` for documents from a newer format, `Diagram` for
    /// duplicate ids or links to missing concepts.
    pub fn into_diagram(self, metrics: &dyn TextMetrics) -> Result<Diagram, DocumentError> {
        if self.version == 0 || self.version > DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(self.version));
        }

        let mut diagram = Diagram::new();
        for record in self.concepts {
            diagram.insert_concept(ConceptNode::new(record.id, record.text, record.point, metrics))?;
        }
        for record in self.links {
            diagram.insert_link(Link::new(record.id, record.origin, record.target, record.color))?;
        }
        diagram.validate()?;

        debug!(
            concepts = diagram.concepts().len(),
            links = diagram.links().len(),
            "document loaded"
        );
        Ok(diagram)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write `diagram` to `path` as a JSON document.
pub fn save(diagram: &Diagram, path: impl AsRef<Path>) -> Result<(), DocumentError> {
    let json = Document::from_diagram(diagram).to_json_string()?;
    std::fs::write(path.as_ref(), json)?;
    debug!(path = %path.as_ref().display(), "document saved");
    Ok(())
}

/// Read a JSON document from `path` and rebuild its diagram.
pub fn load(path: impl AsRef<Path>, metrics: &dyn TextMetrics) -> Result<Diagram, DocumentError> {
    let json = std::fs::read_to_string(path)?;
    Document::from_json_str(&json)?.into_diagram(metrics)
}
