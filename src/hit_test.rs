use crate::error::CanvasError;
use crate::graph::{ConceptId, ConceptNode, Diagram, ElementRef, Link, LinkId};
use crate::path::{first_intersection, Arrow, Point};

/// Find all concepts whose rectangle contains `point`
///
/// Results keep diagram (insertion) order. An empty result means nothing was
/// hit.
pub fn hit_test(diagram: &Diagram, point: Point) -> Vec<&ConceptNode> {
    diagram
        .concepts()
        .iter()
        .filter(|concept| concept.rect().contains(point))
        .collect()
}

/// Find the topmost concept at `point`.
///
/// "Topmost" is the first match in insertion order.
pub fn concept_at(diagram: &Diagram, point: Point) -> Option<ConceptId> {
    diagram
        .concepts()
        .iter()
        .find(|concept| concept.rect().contains(point))
        .map(ConceptNode::id)
}

/// Find all links whose bounding rectangle contains `point`
pub fn links_at(diagram: &Diagram, point: Point) -> Vec<LinkId> {
    diagram
        .links()
        .iter()
        .filter(|link| {
            diagram
                .link_rect(link)
                .map(|rect| rect.contains(point))
                .unwrap_or(false)
        })
        .map(Link::id)
        .collect()
}

/// Find the element at `point`, preferring concepts over links.
pub fn element_at(diagram: &Diagram, point: Point) -> Option<ElementRef> {
    concept_at(diagram, point)
        .map(ElementRef::Concept)
        .or_else(|| links_at(diagram, point).first().copied().map(ElementRef::Link))
}

/// Compute the arrow drawn for a link
///
/// The tail is where the line between the two anchors leaves the origin's
/// rectangle, the head is where it enters the target's rectangle.
///
/// # Errors
/// `DegenerateGeometry` when the rectangles overlap such that either
/// intersection is missing, or when tail and head coincide.
pub fn compute_arrow(diagram: &Diagram, link: &Link) -> Result<Arrow, CanvasError> {
    let (origin, target) = diagram.link_endpoints(link)?;

    let tail = first_intersection(&origin.rect(), target.point());
    let head = first_intersection(&target.rect(), origin.point());

    match (tail, head) {
        (Some(tail), Some(head)) if tail.distance_to(head) > f32::EPSILON => {
            Ok(Arrow::new(tail, head))
        }
        _ => Err(CanvasError::DegenerateGeometry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagramError;
    use crate::graph::default_link_color;
    use crate::text::MonospaceMetrics;

    const METRICS: MonospaceMetrics = MonospaceMetrics {
        char_width: 10.0,
        line_height: 20.0,
    };

    // ========================================================================
    // hit_test() / concept_at()
    // ========================================================================

    #[test]
    fn test_hit_test_single_concept() {
        let mut diagram = Diagram::new();
        let id = diagram.add_concept("hello", Point::new(100.0, 100.0), &METRICS);

        let hits = hit_test(&diagram, Point::new(100.0, 100.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), id);
    }

    #[test]
    fn test_hit_test_miss_is_empty() {
        let mut diagram = Diagram::new();
        diagram.add_concept("hello", Point::new(100.0, 100.0), &METRICS);
        assert!(hit_test(&diagram, Point::new(500.0, 500.0)).is_empty());
        assert_eq!(concept_at(&diagram, Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_hit_test_empty_diagram() {
        let diagram = Diagram::new();
        assert!(hit_test(&diagram, Point::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_hit_test_overlapping_keeps_insertion_order() {
        let mut diagram = Diagram::new();
        let first = diagram.add_concept("first", Point::new(100.0, 100.0), &METRICS);
        let second = diagram.add_concept("second", Point::new(105.0, 100.0), &METRICS);

        let hits: Vec<ConceptId> = hit_test(&diagram, Point::new(100.0, 100.0))
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(hits, vec![first, second]);
        assert_eq!(concept_at(&diagram, Point::new(100.0, 100.0)), Some(first));
    }

    // ========================================================================
    // links_at() / element_at()
    // ========================================================================

    #[test]
    fn test_links_at_inside_link_rect() {
        let mut diagram = Diagram::new();
        let a = diagram.add_concept("a", Point::new(0.0, 0.0), &METRICS);
        let b = diagram.add_concept("b", Point::new(300.0, 200.0), &METRICS);
        let link = diagram.add_link(a, b, default_link_color()).unwrap();

        assert_eq!(links_at(&diagram, Point::new(150.0, 100.0)), vec![link]);
        assert!(links_at(&diagram, Point::new(400.0, 100.0)).is_empty());
    }

    #[test]
    fn test_element_at_prefers_concepts() {
        let mut diagram = Diagram::new();
        let a = diagram.add_concept("a", Point::new(0.0, 0.0), &METRICS);
        let b = diagram.add_concept("b", Point::new(300.0, 200.0), &METRICS);
        let link = diagram.add_link(a, b, default_link_color()).unwrap();

        // The anchor of `a` is inside both its rect and the link rect
        assert_eq!(element_at(&diagram, Point::new(0.0, 0.0)), Some(ElementRef::Concept(a)));
        assert_eq!(
            element_at(&diagram, Point::new(150.0, 100.0)),
            Some(ElementRef::Link(link))
        );
        assert_eq!(element_at(&diagram, Point::new(-500.0, 0.0)), None);
    }

    // ========================================================================
    // compute_arrow()
    // ========================================================================

    #[test]
    fn test_compute_arrow_endpoints_on_rect_boundaries() {
        let mut diagram = Diagram::new();
        let a = diagram.add_concept("a", Point::new(0.0, 0.0), &METRICS);
        let b = diagram.add_concept("b", Point::new(300.0, 0.0), &METRICS);
        let id = diagram.add_link(a, b, default_link_color()).unwrap();
        let link = diagram.link(id).unwrap();

        let arrow = compute_arrow(&diagram, link).unwrap();
        let a_rect = diagram.concept(a).unwrap().rect();
        let b_rect = diagram.concept(b).unwrap().rect();

        assert!((arrow.tail.x - a_rect.max_x()).abs() < 1e-3);
        assert!((arrow.head.x - b_rect.min_x()).abs() < 1e-3);
        assert!(arrow.tail.x < arrow.head.x);
    }

    #[test]
    fn test_compute_arrow_overlapping_concepts_is_degenerate() {
        let mut diagram = Diagram::new();
        let a = diagram.add_concept("a", Point::new(0.0, 0.0), &METRICS);
        let b = diagram.add_concept("b", Point::new(2.0, 2.0), &METRICS);
        let id = diagram.add_link(a, b, default_link_color()).unwrap();
        let link = diagram.link(id).unwrap();

        assert_eq!(compute_arrow(&diagram, link), Err(CanvasError::DegenerateGeometry));
    }

    #[test]
    fn test_compute_arrow_self_link_is_degenerate() {
        let mut diagram = Diagram::new();
        let a = diagram.add_concept("a", Point::new(0.0, 0.0), &METRICS);
        let id = diagram.add_link(a, a, default_link_color()).unwrap();
        let link = diagram.link(id).unwrap();

        assert_eq!(compute_arrow(&diagram, link), Err(CanvasError::DegenerateGeometry));
    }

    #[test]
    fn test_compute_arrow_dangling_link() {
        let diagram = Diagram::new();
        let orphan = Link::new(LinkId(1), ConceptId(2), ConceptId(3), default_link_color());
        assert_eq!(
            compute_arrow(&diagram, &orphan),
            Err(CanvasError::Diagram(DiagramError::DanglingLink {
                link: LinkId(1),
                concept: ConceptId(2)
            }))
        );
    }
}
