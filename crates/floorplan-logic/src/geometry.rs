//! Rectangle geometry and layout validation.
//!
//! `Rect` is the only shape the synthesizer knows about. The validation
//! half of this module takes a finished [`Layout`] and returns issues as
//! plain data; nothing here mutates a layout.

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::plan::Plan;
use crate::sizing::ResolvedRoom;

/// Intersections at or below this area (m²) count as touching, not overlapping.
pub const OVERLAP_EPSILON: f64 = 1e-6;

/// Tolerance (m) for deciding that two walls coincide.
pub const WALL_TOLERANCE: f64 = 0.1;

/// Axis-aligned rectangle in meters. `(x, y)` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same size, new origin.
    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }

    /// Area of the geometric intersection (0 when disjoint or touching).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// True only for a positive-area intersection above [`OVERLAP_EPSILON`].
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > OVERLAP_EPSILON
    }

    /// `max(w/h, h/w)`; always ≥ 1 for a valid rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return f64::INFINITY;
        }
        (self.width / self.height).max(self.height / self.width)
    }

    /// True if `other` lies fully inside this rectangle, within `tolerance`.
    pub fn contains(&self, other: &Rect, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }

    /// Length of the given wall.
    pub fn wall_length(&self, wall: Wall) -> f64 {
        match wall {
            Wall::North | Wall::South => self.width,
            Wall::East | Wall::West => self.height,
        }
    }
}

/// Axis-aligned bounds of a set of rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds of `rects`, or `None` for an empty iterator.
    pub fn of<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Self> {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let mut bb = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.right(),
            max_y: first.bottom(),
        };
        for r in iter {
            bb.min_x = bb.min_x.min(r.x);
            bb.min_y = bb.min_y.min(r.y);
            bb.max_x = bb.max_x.max(r.right());
            bb.max_y = bb.max_y.max(r.bottom());
        }
        Some(bb)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A side of a room. Screen orientation: north is the minimum-y edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    North,
    South,
    East,
    West,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::North, Wall::South, Wall::East, Wall::West];

    pub fn opposite(self) -> Wall {
        match self {
            Wall::North => Wall::South,
            Wall::South => Wall::North,
            Wall::East => Wall::West,
            Wall::West => Wall::East,
        }
    }
}

/// Where two rooms share a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedWall {
    /// Wall of the first room that faces the second.
    pub wall: Wall,
    /// Start of the shared span along the wall axis (x for N/S, y for E/W).
    pub start: f64,
    /// End of the shared span.
    pub end: f64,
    /// Fixed coordinate of the wall line (y for N/S, x for E/W).
    pub line: f64,
}

/// Find the wall of `a` that touches `b` with a positive-length shared span.
///
/// Walls are checked East, West, South, North, so a rectangle touching two
/// sides of `a` (impossible without overlap) resolves deterministically.
pub fn shared_wall(a: &Rect, b: &Rect) -> Option<SharedWall> {
    let span = |lo_a: f64, hi_a: f64, lo_b: f64, hi_b: f64| {
        let start = lo_a.max(lo_b);
        let end = hi_a.min(hi_b);
        (end - start > WALL_TOLERANCE / 2.0).then_some((start, end))
    };

    if (a.right() - b.x).abs() < WALL_TOLERANCE {
        if let Some((start, end)) = span(a.y, a.bottom(), b.y, b.bottom()) {
            return Some(SharedWall {
                wall: Wall::East,
                start,
                end,
                line: a.right(),
            });
        }
    }
    if (a.x - b.right()).abs() < WALL_TOLERANCE {
        if let Some((start, end)) = span(a.y, a.bottom(), b.y, b.bottom()) {
            return Some(SharedWall {
                wall: Wall::West,
                start,
                end,
                line: a.x,
            });
        }
    }
    if (a.bottom() - b.y).abs() < WALL_TOLERANCE {
        if let Some((start, end)) = span(a.x, a.right(), b.x, b.right()) {
            return Some(SharedWall {
                wall: Wall::South,
                start,
                end,
                line: a.bottom(),
            });
        }
    }
    if (a.y - b.bottom()).abs() < WALL_TOLERANCE {
        if let Some((start, end)) = span(a.x, a.right(), b.x, b.right()) {
            return Some(SharedWall {
                wall: Wall::North,
                start,
                end,
                line: a.y,
            });
        }
    }
    None
}

/// A layout validation issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    pub fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Per-room checks ──────────────────────────────────────────────────

/// Check that no room has zero or negative dimensions.
pub fn check_room_dimensions(layout: &Layout) -> Vec<ValidationIssue> {
    layout
        .iter()
        .filter(|(_, r)| !(r.width > 0.0 && r.height > 0.0))
        .map(|(id, r)| {
            ValidationIssue::error(
                "room_geometry",
                format!(
                    "Room '{}' has non-positive dimensions: {}×{}",
                    id, r.width, r.height
                ),
            )
        })
        .collect()
}

/// Check that room aspect ratios are reasonable (< 10:1).
pub fn check_room_aspect_ratios(layout: &Layout) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (id, r) in layout.iter() {
        if r.width <= 0.0 || r.height <= 0.0 {
            continue; // caught by dimension check
        }
        let ratio = r.aspect_ratio();
        if ratio > 10.0 {
            issues.push(ValidationIssue::warning(
                "room_geometry",
                format!(
                    "Room '{}' has extreme aspect ratio {:.1}:1 ({}×{})",
                    id, ratio, r.width, r.height
                ),
            ));
        }
    }
    issues
}

// ── B. Pairwise checks ──────────────────────────────────────────────────

/// Every pair of rooms whose intersection exceeds [`OVERLAP_EPSILON`].
pub fn check_room_overlaps(layout: &Layout) -> Vec<ValidationIssue> {
    let rooms: Vec<(&String, &Rect)> = layout.iter().collect();
    let mut issues = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let (id_a, a) = rooms[i];
            let (id_b, b) = rooms[j];
            let area = a.intersection_area(b);
            if area > OVERLAP_EPSILON {
                issues.push(ValidationIssue::error(
                    "room_overlap",
                    format!("Rooms '{}' and '{}' overlap by {:.4} m²", id_a, id_b, area),
                ));
            }
        }
    }
    issues
}

// ── C. Plan consistency ─────────────────────────────────────────────────

/// Check the layout holds exactly one rect per plan room.
pub fn check_completeness(layout: &Layout, plan: &Plan) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for room in &plan.rooms {
        if layout.get(&room.id).is_none() {
            issues.push(ValidationIssue::error(
                "completeness",
                format!("Room '{}' is missing from the layout", room.id),
            ));
        }
    }
    for id in layout.ids() {
        if !plan.rooms.iter().any(|r| r.id == id) {
            issues.push(ValidationIssue::error(
                "completeness",
                format!("Layout contains unknown room '{}'", id),
            ));
        }
    }
    issues
}

/// Check every room kept its resolved size.
pub fn check_size_preservation(layout: &Layout, rooms: &[ResolvedRoom]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for room in rooms {
        if let Some(r) = layout.get(&room.id) {
            if (r.width - room.width).abs() > 1e-9 || (r.height - room.height).abs() > 1e-9 {
                issues.push(ValidationIssue::error(
                    "size_preservation",
                    format!(
                        "Room '{}' is {}×{}, expected {}×{}",
                        room.id, r.width, r.height, room.width, room.height
                    ),
                ));
            }
        }
    }
    issues
}

/// Check the minimum corner sits at `margin`.
pub fn check_normalized(layout: &Layout, margin: f64) -> Vec<ValidationIssue> {
    match layout.bounding_box() {
        Some(bb) if (bb.min_x - margin).abs() > 1e-9 || (bb.min_y - margin).abs() > 1e-9 => {
            vec![ValidationIssue::warning(
                "normalization",
                format!(
                    "Layout minimum corner is ({:.3},{:.3}), expected ({},{})",
                    bb.min_x, bb.min_y, margin, margin
                ),
            )]
        }
        _ => Vec::new(),
    }
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_layout(
    layout: &Layout,
    plan: &Plan,
    rooms: &[ResolvedRoom],
    margin: f64,
) -> Vec<ValidationIssue> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(layout));
    all.extend(check_room_aspect_ratios(layout));
    all.extend(check_room_overlaps(layout));
    all.extend(check_completeness(layout, plan));
    all.extend(check_size_preservation(layout, rooms));
    all.extend(check_normalized(layout, margin));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_of(rects: &[(&str, Rect)]) -> Layout {
        let mut layout = Layout::new();
        for (id, r) in rects {
            layout.insert(id.to_string(), *r);
        }
        layout
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 4.0, 3.0);
        let b = Rect::new(4.0, 0.0, 3.0, 3.0);
        assert_eq!(a.intersection_area(&b), 0.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_intersection_area() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 3.0, 4.0, 4.0);
        assert!((a.intersection_area(&b) - 2.0).abs() < 1e-12);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_sliver_below_epsilon_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0 - 1e-7, 0.0, 1.0, 1.0);
        assert!(a.intersection_area(&b) > 0.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_bounding_box() {
        let rects = [Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(3.0, -1.0, 1.0, 1.0)];
        let bb = BoundingBox::of(&rects).unwrap();
        assert_eq!(bb.min_x, 0.0);
        assert_eq!(bb.min_y, -1.0);
        assert_eq!(bb.max_x, 4.0);
        assert_eq!(bb.max_y, 2.0);
        assert_eq!(bb.area(), 12.0);
        assert!(BoundingBox::of(&[]).is_none());
    }

    #[test]
    fn test_aspect_ratio_symmetric() {
        assert_eq!(Rect::new(0.0, 0.0, 4.0, 2.0).aspect_ratio(), 2.0);
        assert_eq!(Rect::new(0.0, 0.0, 2.0, 4.0).aspect_ratio(), 2.0);
    }

    #[test]
    fn test_shared_wall_east_west() {
        let a = Rect::new(0.0, 0.0, 4.0, 3.0);
        let b = Rect::new(4.0, 1.0, 3.0, 3.0);
        let sw = shared_wall(&a, &b).unwrap();
        assert_eq!(sw.wall, Wall::East);
        assert_eq!((sw.start, sw.end, sw.line), (1.0, 3.0, 4.0));
        let back = shared_wall(&b, &a).unwrap();
        assert_eq!(back.wall, Wall::West);
    }

    #[test]
    fn test_shared_wall_north_south() {
        let a = Rect::new(0.0, 0.0, 4.0, 3.0);
        let b = Rect::new(1.0, 3.0, 2.0, 2.0);
        assert_eq!(shared_wall(&a, &b).unwrap().wall, Wall::South);
        assert_eq!(shared_wall(&b, &a).unwrap().wall, Wall::North);
    }

    #[test]
    fn test_corner_contact_is_not_shared_wall() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(2.0, 2.0, 2.0, 2.0);
        assert!(shared_wall(&a, &b).is_none());
    }

    #[test]
    fn test_overlapping_rooms_reported() {
        let layout = layout_of(&[
            ("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
            ("b", Rect::new(5.0, 5.0, 10.0, 10.0)),
        ]);
        let issues = check_room_overlaps(&layout);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_zero_width_room() {
        let layout = layout_of(&[("a", Rect::new(0.0, 0.0, 0.0, 10.0))]);
        let issues = check_room_dimensions(&layout);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("non-positive"));
    }

    #[test]
    fn test_extreme_aspect_ratio() {
        let layout = layout_of(&[("hall", Rect::new(0.0, 0.0, 20.0, 1.0))]);
        let issues = check_room_aspect_ratios(&layout);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_normalized_check() {
        let layout = layout_of(&[("a", Rect::new(0.2, 0.2, 1.0, 1.0))]);
        assert!(check_normalized(&layout, 0.2).is_empty());
        assert_eq!(check_normalized(&layout, 0.0).len(), 1);
    }
}
