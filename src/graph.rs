use crate::error::DiagramError;
use crate::path::{Point, Rect, Size};
use crate::text::TextMetrics;
use serde::{Deserialize, Serialize};
use slint::Color;
use std::collections::HashSet;
use std::fmt;

/// Padding added around a concept's text when computing its rectangle.
pub const CONCEPT_PADDING: f32 = 20.0;

/// Minimum extent of a link rectangle along either axis.
pub const LINK_PADDING: f32 = 20.0;

/// Largest id accepted from outside the diagram. Freshly allocated ids
/// continue above it without wrapping.
pub const MAX_ELEMENT_ID: u64 = (1 << 53) - 1;

/// Opaque handle of a concept node within a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(pub u64);

/// Opaque handle of a link within a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u64);

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "concept#{}", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Any element that can be hit, selected or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Concept(ConceptId),
    Link(LinkId),
}

impl From<ConceptId> for ElementRef {
    fn from(id: ConceptId) -> Self {
        ElementRef::Concept(id)
    }
}

impl From<LinkId> for ElementRef {
    fn from(id: LinkId) -> Self {
        ElementRef::Link(id)
    }
}

/// Selection capability shared by concepts and links.
pub trait Selectable {
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);
}

/// Default color for newly created links (gray).
pub fn default_link_color() -> Color {
    Color::from_rgb_u8(128, 128, 128)
}

/// Rectangle of a concept anchored at `anchor` whose text measures `text_size`.
///
/// The rectangle always contains the anchor point.
pub fn concept_rect(anchor: Point, text_size: Size) -> Rect {
    // Negative or NaN measurements count as empty text.
    let width = text_size.width.max(0.0);
    let height = text_size.height.max(0.0);
    Rect::new(
        anchor.x - width / 2.0 - CONCEPT_PADDING,
        anchor.y - height / 2.0 - CONCEPT_PADDING,
        width + CONCEPT_PADDING,
        height + CONCEPT_PADDING,
    )
}

/// Bounding rectangle of a link between two anchor points.
///
/// Nearly axis-aligned links are widened so the box never collapses to zero
/// area: width and height are at least [`LINK_PADDING`].
pub fn link_rect(origin: Point, target: Point) -> Rect {
    let mut min_x = origin.x.min(target.x);
    if (origin.x - target.x).abs() <= LINK_PADDING {
        min_x -= LINK_PADDING / 2.0;
    }
    let mut min_y = origin.y.min(target.y);
    if (origin.y - target.y).abs() <= LINK_PADDING {
        min_y -= LINK_PADDING / 2.0;
    }
    let max_x = origin.x.max(target.x);
    let max_y = origin.y.max(target.y);

    Rect::new(
        min_x,
        min_y,
        (max_x - min_x).max(LINK_PADDING),
        (max_y - min_y).max(LINK_PADDING),
    )
}

/// A text-bearing node on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptNode {
    id: ConceptId,
    text: String,
    point: Point,
    text_size: Size,
    selected: bool,
    editing: bool,
}

impl ConceptNode {
    pub fn new(id: ConceptId, text: impl Into<String>, point: Point, metrics: &dyn TextMetrics) -> Self {
        let text = text.into();
        let text_size = metrics.measure(&text);
        Self {
            id,
            text,
            point,
            text_size,
            selected: false,
            editing: false,
        }
    }

    pub fn id(&self) -> ConceptId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Anchor point; the rectangle is laid out around it.
    pub fn point(&self) -> Point {
        self.point
    }

    pub fn text_size(&self) -> Size {
        self.text_size
    }

    pub fn rect(&self) -> Rect {
        concept_rect(self.point, self.text_size)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub fn set_text(&mut self, text: impl Into<String>, metrics: &dyn TextMetrics) {
        self.text = text.into();
        self.text_size = metrics.measure(&self.text);
    }

    pub fn set_point(&mut self, point: Point) {
        self.point = point;
    }

    fn remeasure(&mut self, metrics: &dyn TextMetrics) {
        self.text_size = metrics.measure(&self.text);
    }
}

impl Selectable for ConceptNode {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// A directed, colored connection between two concepts.
///
/// Endpoints are handles into the owning [`Diagram`]; the diagram keeps them
/// valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    id: LinkId,
    origin: ConceptId,
    target: ConceptId,
    color: Color,
    selected: bool,
}

impl Link {
    pub fn new(id: LinkId, origin: ConceptId, target: ConceptId, color: Color) -> Self {
        Self {
            id,
            origin,
            target,
            color,
            selected: false,
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn origin(&self) -> ConceptId {
        self.origin
    }

    pub fn target(&self) -> ConceptId {
        self.target
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Whether either endpoint is `concept`.
    pub fn touches(&self, concept: ConceptId) -> bool {
        self.origin == concept || self.target == concept
    }
}

impl Selectable for Link {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Ordered collection of concepts and links.
///
/// Invariant: every link's origin and target is a concept present in the
/// diagram. Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    concepts: Vec<ConceptNode>,
    links: Vec<Link>,
    next_id: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn concepts(&self) -> &[ConceptNode] {
        &self.concepts
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.links.is_empty()
    }

    pub fn concept(&self, id: ConceptId) -> Option<&ConceptNode> {
        self.concepts.iter().find(|c| c.id == id)
    }

    pub fn concept_mut(&mut self, id: ConceptId) -> Option<&mut ConceptNode> {
        self.concepts.iter_mut().find(|c| c.id == id)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }

    // next_id never exceeds MAX_ELEMENT_ID through inserts, so this cannot
    // reach u64::MAX in practice.
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Create a concept with `text` anchored at `point`.
    pub fn add_concept(
        &mut self,
        text: impl Into<String>,
        point: Point,
        metrics: &dyn TextMetrics,
    ) -> ConceptId {
        let id = ConceptId(self.allocate_id());
        self.concepts.push(ConceptNode::new(id, text, point, metrics));
        id
    }

    /// Insert a concept built elsewhere (e.g. from a document), keeping its id.
    pub fn insert_concept(&mut self, concept: ConceptNode) -> Result<(), DiagramError> {
        if concept.id.0 > MAX_ELEMENT_ID {
            return Err(DiagramError::IdOutOfRange(concept.id.0));
        }
        if self.concept(concept.id).is_some() {
            return Err(DiagramError::DuplicateConcept(concept.id));
        }
        self.next_id = self.next_id.max(concept.id.0);
        self.concepts.push(concept);
        Ok(())
    }

    /// Connect `origin` to `target`. Both concepts must exist.
    pub fn add_link(
        &mut self,
        origin: ConceptId,
        target: ConceptId,
        color: Color,
    ) -> Result<LinkId, DiagramError> {
        self.require_concept(origin)?;
        self.require_concept(target)?;
        let id = LinkId(self.allocate_id());
        self.links.push(Link::new(id, origin, target, color));
        Ok(id)
    }

    /// Insert a link built elsewhere, keeping its id.
    pub fn insert_link(&mut self, link: Link) -> Result<(), DiagramError> {
        if link.id.0 > MAX_ELEMENT_ID {
            return Err(DiagramError::IdOutOfRange(link.id.0));
        }
        if self.link(link.id).is_some() {
            return Err(DiagramError::DuplicateLink(link.id));
        }
        for endpoint in [link.origin, link.target] {
            if self.concept(endpoint).is_none() {
                return Err(DiagramError::DanglingLink {
                    link: link.id,
                    concept: endpoint,
                });
            }
        }
        self.next_id = self.next_id.max(link.id.0);
        self.links.push(link);
        Ok(())
    }

    fn require_concept(&self, id: ConceptId) -> Result<&ConceptNode, DiagramError> {
        self.concept(id).ok_or(DiagramError::UnknownConcept(id))
    }

    pub fn move_concept(&mut self, id: ConceptId, point: Point) -> Result<(), DiagramError> {
        let concept = self.concept_mut(id).ok_or(DiagramError::UnknownConcept(id))?;
        concept.set_point(point);
        Ok(())
    }

    pub fn set_concept_text(
        &mut self,
        id: ConceptId,
        text: impl Into<String>,
        metrics: &dyn TextMetrics,
    ) -> Result<(), DiagramError> {
        let concept = self.concept_mut(id).ok_or(DiagramError::UnknownConcept(id))?;
        concept.set_text(text, metrics);
        Ok(())
    }

    pub fn set_link_color(&mut self, id: LinkId, color: Color) -> Result<(), DiagramError> {
        let link = self.link_mut(id).ok_or(DiagramError::UnknownLink(id))?;
        link.set_color(color);
        Ok(())
    }

    /// Find all links connected to a concept, in diagram order.
    pub fn links_connected_to(&self, concept: ConceptId) -> Vec<LinkId> {
        self.links
            .iter()
            .filter(|link| link.touches(concept))
            .map(|link| link.id)
            .collect()
    }

    /// Remove a concept together with every link that touches it.
    ///
    /// Returns the ids of the removed links.
    pub fn remove_concept(&mut self, id: ConceptId) -> Result<Vec<LinkId>, DiagramError> {
        let index = self
            .concepts
            .iter()
            .position(|c| c.id == id)
            .ok_or(DiagramError::UnknownConcept(id))?;
        let removed = self.links_connected_to(id);
        self.links.retain(|link| !link.touches(id));
        self.concepts.remove(index);
        Ok(removed)
    }

    pub fn remove_link(&mut self, id: LinkId) -> Result<Link, DiagramError> {
        let index = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(DiagramError::UnknownLink(id))?;
        Ok(self.links.remove(index))
    }

    /// Resolve both endpoints of a link.
    pub fn link_endpoints(&self, link: &Link) -> Result<(&ConceptNode, &ConceptNode), DiagramError> {
        let dangling = |concept| DiagramError::DanglingLink {
            link: link.id,
            concept,
        };
        let origin = self.concept(link.origin).ok_or_else(|| dangling(link.origin))?;
        let target = self.concept(link.target).ok_or_else(|| dangling(link.target))?;
        Ok((origin, target))
    }

    pub fn link_rect(&self, link: &Link) -> Result<Rect, DiagramError> {
        let (origin, target) = self.link_endpoints(link)?;
        Ok(link_rect(origin.point, target.point))
    }

    pub fn contains(&self, element: ElementRef) -> bool {
        match element {
            ElementRef::Concept(id) => self.concept(id).is_some(),
            ElementRef::Link(id) => self.link(id).is_some(),
        }
    }

    pub fn element_rect(&self, element: ElementRef) -> Option<Rect> {
        match element {
            ElementRef::Concept(id) => self.concept(id).map(ConceptNode::rect),
            ElementRef::Link(id) => self.link(id).and_then(|l| self.link_rect(l).ok()),
        }
    }

    fn selectable_mut(&mut self, element: ElementRef) -> Option<&mut dyn Selectable> {
        match element {
            ElementRef::Concept(id) => self.concept_mut(id).map(|c| c as &mut dyn Selectable),
            ElementRef::Link(id) => self.link_mut(id).map(|l| l as &mut dyn Selectable),
        }
    }

    /// Set an element's selection flag. Returns `false` if it does not exist.
    pub fn set_selected(&mut self, element: ElementRef, selected: bool) -> bool {
        match self.selectable_mut(element) {
            Some(item) => {
                item.set_selected(selected);
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, element: ElementRef) -> bool {
        match element {
            ElementRef::Concept(id) => self.concept(id).is_some_and(Selectable::is_selected),
            ElementRef::Link(id) => self.link(id).is_some_and(Selectable::is_selected),
        }
    }

    /// All selected elements, concepts first, in diagram order.
    pub fn selected_elements(&self) -> Vec<ElementRef> {
        let concepts = self
            .concepts
            .iter()
            .filter(|c| c.is_selected())
            .map(|c| ElementRef::Concept(c.id));
        let links = self
            .links
            .iter()
            .filter(|l| l.is_selected())
            .map(|l| ElementRef::Link(l.id));
        concepts.chain(links).collect()
    }

    /// Check the referential invariant and id uniqueness.
    pub fn validate(&self) -> Result<(), DiagramError> {
        let mut concept_ids = HashSet::new();
        for concept in &self.concepts {
            if !concept_ids.insert(concept.id) {
                return Err(DiagramError::DuplicateConcept(concept.id));
            }
        }
        let mut link_ids = HashSet::new();
        for link in &self.links {
            if !link_ids.insert(link.id) {
                return Err(DiagramError::DuplicateLink(link.id));
            }
            for endpoint in [link.origin, link.target] {
                if !concept_ids.contains(&endpoint) {
                    return Err(DiagramError::DanglingLink {
                        link: link.id,
                        concept: endpoint,
                    });
                }
            }
        }
        Ok(())
    }

    /// Recompute every concept's text size, e.g. after the font changed.
    pub fn remeasure(&mut self, metrics: &dyn TextMetrics) {
        for concept in &mut self.concepts {
            concept.remeasure(metrics);
        }
    }
}
