//! Geometry primitives for the canvas: points, rectangles, arrows and the
//! SVG path commands used to hand arrow shapes to a Slint `Path`.

use serde::{Deserialize, Serialize};

/// A position in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, origin at the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        rect_contains(self, point)
    }
}

/// Inclusive containment: points on any edge count as inside.
pub fn rect_contains(rect: &Rect, point: Point) -> bool {
    point.x >= rect.min_x()
        && point.x <= rect.max_x()
        && point.y >= rect.min_y()
        && point.y <= rect.max_y()
}

/// Find where the segment from the rectangle's center toward `toward`
/// leaves the rectangle.
///
/// Returns `None` when `toward` lies inside the rectangle (edges included),
/// since no boundary crossing exists in that direction.
pub fn first_intersection(rect: &Rect, toward: Point) -> Option<Point> {
    if rect_contains(rect, toward) {
        return None;
    }

    let center = rect.center();
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    let half_w = rect.size.width / 2.0;
    let half_h = rect.size.height / 2.0;

    // Parameter along the segment at which each pair of edges is reached.
    let tx = if dx != 0.0 { half_w / dx.abs() } else { f32::INFINITY };
    let ty = if dy != 0.0 { half_h / dy.abs() } else { f32::INFINITY };
    let t = tx.min(ty);

    if !t.is_finite() {
        return None;
    }

    Some(Point::new(center.x + dx * t, center.y + dy * t))
}

/// Dimensions of the filled arrow shape drawn for a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    pub shaft_width: f32,
    pub head_length: f32,
    pub head_width: f32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            shaft_width: 2.0,
            head_length: 10.0,
            head_width: 8.0,
        }
    }
}

/// Straight arrow between two boundary points. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: Point,
    pub head: Point,
}

impl Arrow {
    pub fn new(tail: Point, head: Point) -> Self {
        Self { tail, head }
    }

    pub fn length(&self) -> f32 {
        self.tail.distance_to(self.head)
    }

    /// Outline of the arrow as a closed polygon (shaft plus head).
    ///
    /// Points run tail-left, head-base-left, barb-left, tip, barb-right,
    /// head-base-right, tail-right. A zero-length arrow yields no points.
    pub fn polygon(&self, style: &ArrowStyle) -> Vec<Point> {
        let length = self.length();
        if length <= f32::EPSILON {
            return Vec::new();
        }

        let ux = (self.head.x - self.tail.x) / length;
        let uy = (self.head.y - self.tail.y) / length;
        // Left-hand normal
        let nx = -uy;
        let ny = ux;

        let head_length = style.head_length.min(length);
        let base = Point::new(self.head.x - ux * head_length, self.head.y - uy * head_length);
        let shaft = style.shaft_width / 2.0;
        let barb = style.head_width / 2.0;

        let offset = |p: Point, d: f32| Point::new(p.x + nx * d, p.y + ny * d);

        vec![
            offset(self.tail, shaft),
            offset(base, shaft),
            offset(base, barb),
            self.head,
            offset(base, -barb),
            offset(base, -shaft),
            offset(self.tail, -shaft),
        ]
    }
}

/// Generate SVG path commands for a closed polygon
///
/// # Returns
/// SVG path command string (e.g., "M 0 0 L 10 0 L 10 10 Z"), or an empty
/// string when there are no points.
pub fn polygon_path_commands(points: &[Point]) -> String {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut commands = format!("M {} {}", first.x, first.y);
    for p in iter {
        commands.push_str(&format!(" L {} {}", p.x, p.y));
    }
    commands.push_str(" Z");
    commands
}
