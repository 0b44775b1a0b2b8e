//! Constructive placement.
//!
//! Walks the adjacency graph breadth-first from the root and drops each
//! room so it touches an already-placed neighbor. For every anchor it tries
//! the four sides, sliding along the anchor's edge in fixed steps, and keeps
//! the non-overlapping candidate that grows the bounding box the least.
//! Rooms that cannot be attached anywhere go to the right of everything
//! placed so far, so placement always succeeds.

use std::cmp::Reverse;

use crate::adjacency::{select_root, AdjacencyGraph};
use crate::config::PlacerConfig;
use crate::geometry::{BoundingBox, Rect};
use crate::layout::Layout;
use crate::sizing::ResolvedRoom;

/// Side of the anchor a candidate touches. Screen orientation: `Top` is
/// towards smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
    Top,
    Bottom,
}

impl Side {
    /// Candidate order; earlier sides win ties.
    pub const ORDER: [Side; 4] = [Side::Right, Side::Left, Side::Top, Side::Bottom];
}

/// Origins along an edge of length `anchor_len` starting at `anchor_start`
/// for a room of extent `own_len`: `max(1, floor(anchor_len / step))`
/// positions, symmetric around the centered one.
pub fn slide_positions(anchor_start: f64, anchor_len: f64, own_len: f64, step: f64) -> Vec<f64> {
    let steps = if step > 0.0 {
        ((anchor_len / step).floor() as usize).max(1)
    } else {
        1
    };
    let center = anchor_start + (anchor_len - own_len) / 2.0;
    let half = (steps / 2) as f64;
    (0..steps)
        .map(|s| center + (s as f64 - half) * step)
        .collect()
}

/// All touching candidates for a `width × height` room around `anchor`, in
/// side order then slide order. Overlap is not checked here.
pub fn touching_candidates(anchor: &Rect, width: f64, height: f64, step: f64) -> Vec<Rect> {
    let mut candidates = Vec::new();
    for side in Side::ORDER {
        match side {
            Side::Right | Side::Left => {
                let x = if side == Side::Right {
                    anchor.right()
                } else {
                    anchor.x - width
                };
                for y in slide_positions(anchor.y, anchor.height, height, step) {
                    candidates.push(Rect::new(x, y, width, height));
                }
            }
            Side::Top | Side::Bottom => {
                let y = if side == Side::Bottom {
                    anchor.bottom()
                } else {
                    anchor.y - height
                };
                for x in slide_positions(anchor.x, anchor.width, width, step) {
                    candidates.push(Rect::new(x, y, width, height));
                }
            }
        }
    }
    candidates
}

fn union_area(bb: Option<BoundingBox>, r: &Rect) -> f64 {
    match bb {
        Some(bb) => {
            let w = bb.max_x.max(r.right()) - bb.min_x.min(r.x);
            let h = bb.max_y.max(r.bottom()) - bb.min_y.min(r.y);
            w * h
        }
        None => r.area(),
    }
}

/// Best non-overlapping touching position against one anchor, or `None`.
/// Ties keep the first candidate found.
fn best_against_anchor(
    anchor: &Rect,
    width: f64,
    height: f64,
    layout: &Layout,
    step: f64,
) -> Option<Rect> {
    let bb = layout.bounding_box();
    let mut best: Option<(f64, Rect)> = None;
    for candidate in touching_candidates(anchor, width, height, step) {
        if layout.rects().any(|placed| placed.overlaps(&candidate)) {
            continue;
        }
        let area = union_area(bb, &candidate);
        match best {
            Some((best_area, _)) if area >= best_area => {}
            _ => best = Some((area, candidate)),
        }
    }
    best.map(|(_, rect)| rect)
}

/// Position right of the current bounding box at `y = 0`.
fn fallback_position(layout: &Layout, width: f64, height: f64, gap: f64) -> Rect {
    let max_x = layout
        .rects()
        .map(Rect::right)
        .fold(f64::NEG_INFINITY, f64::max);
    let x = if max_x.is_finite() { max_x + gap } else { 0.0 };
    Rect::new(x, 0.0, width, height)
}

/// Build the initial layout: one rect per room, pairwise non-overlapping,
/// in breadth-first insertion order. `rooms` must be in graph node order
/// (plan order).
pub fn place_rooms(rooms: &[ResolvedRoom], graph: &AdjacencyGraph, config: &PlacerConfig) -> Layout {
    let mut layout = Layout::new();
    let Some(root) = select_root(rooms) else {
        return layout;
    };

    let root_room = &rooms[root];
    layout.insert(
        root_room.id.clone(),
        Rect::new(0.0, 0.0, root_room.width, root_room.height),
    );
    log::debug!("placer: root '{}' at origin", root_room.id);

    for node in graph.traversal_order(root) {
        let room = &rooms[node];
        if layout.contains(&room.id) {
            continue;
        }

        let mut anchors: Vec<usize> = graph
            .neighbors(node)
            .iter()
            .copied()
            .filter(|&n| layout.contains(graph.id(n)))
            .collect();
        anchors.sort_by_key(|&n| Reverse(graph.degree(n)));

        let placed = anchors.iter().find_map(|&anchor| {
            let anchor_rect = *layout.get(graph.id(anchor))?;
            best_against_anchor(
                &anchor_rect,
                room.width,
                room.height,
                &layout,
                config.slide_step,
            )
            .map(|rect| (graph.id(anchor), rect))
        });

        match placed {
            Some((anchor_id, rect)) => {
                log::debug!(
                    "placer: '{}' touches '{}' at ({:.2},{:.2})",
                    room.id,
                    anchor_id,
                    rect.x,
                    rect.y
                );
                layout.insert(room.id.clone(), rect);
            }
            None => {
                let rect = fallback_position(&layout, room.width, room.height, config.fallback_gap);
                log::warn!(
                    "placer: no touching position for '{}' ({} anchors), placed at ({:.2},{:.2})",
                    room.id,
                    anchors.len(),
                    rect.x,
                    rect.y
                );
                layout.insert(room.id.clone(), rect);
            }
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shared_wall;
    use crate::plan::{DoorSpec, Plan, RoomSpec};
    use crate::sizing::{resolve_rooms, SizeTable};

    fn place(plan: &Plan) -> Layout {
        let rooms = resolve_rooms(plan, &SizeTable::default());
        let graph = AdjacencyGraph::build(plan);
        place_rooms(&rooms, &graph, &PlacerConfig::default())
    }

    fn assert_no_overlaps(layout: &Layout) {
        let rects: Vec<(&String, &Rect)> = layout.iter().collect();
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(
                    !rects[i].1.overlaps(rects[j].1),
                    "'{}' overlaps '{}'",
                    rects[i].0,
                    rects[j].0
                );
            }
        }
    }

    #[test]
    fn test_slide_positions_single_step_centers() {
        assert_eq!(slide_positions(0.0, 0.25, 2.0, 0.5), vec![-0.875]);
    }

    #[test]
    fn test_slide_positions_symmetric() {
        let ys = slide_positions(0.0, 2.0, 2.0, 0.5);
        assert_eq!(ys, vec![-1.0, -0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_candidate_count() {
        let anchor = Rect::new(0.0, 0.0, 4.0, 3.0);
        // 6 slides on each vertical side, 8 on each horizontal side
        assert_eq!(touching_candidates(&anchor, 3.0, 3.0, 0.5).len(), 28);
    }

    #[test]
    fn test_two_rooms_touch_on_right() {
        let plan = Plan::new(vec![
            RoomSpec::new("a", "Study").with_size(4.0, 3.0).adjacent_to(&["b"]),
            RoomSpec::new("b", "Closet").with_size(3.0, 3.0),
        ]);
        let layout = place(&plan);
        assert_eq!(layout.get("a"), Some(&Rect::new(0.0, 0.0, 4.0, 3.0)));
        assert_eq!(layout.get("b"), Some(&Rect::new(4.0, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn test_single_room_at_origin() {
        let plan = Plan::new(vec![RoomSpec::new("only", "Kitchen")]);
        let layout = place(&plan);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.get("only"), Some(&Rect::new(0.0, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn test_disconnected_room_goes_right_of_bbox() {
        let plan = Plan::new(vec![
            RoomSpec::new("living", "Living Room").with_size(5.0, 4.0),
            RoomSpec::new("shed", "Shed").with_size(2.0, 2.0),
        ]);
        let layout = place(&plan);
        assert_eq!(layout.get("shed"), Some(&Rect::new(5.5, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_root_inserted_first() {
        let plan = Plan::new(vec![
            RoomSpec::new("bath", "Bathroom").adjacent_to(&["living"]),
            RoomSpec::new("living", "Living Room"),
        ]);
        let layout = place(&plan);
        assert_eq!(layout.ids().next(), Some("living"));
        assert_eq!(layout.get("living").unwrap().x, 0.0);
    }

    #[test]
    fn test_star_plan_is_complete_and_disjoint() {
        let plan = Plan::new(vec![
            RoomSpec::new("living", "Living Room")
                .with_size(5.0, 4.0)
                .adjacent_to(&["kitchen", "master", "guest", "balcony"]),
            RoomSpec::new("kitchen", "Kitchen").with_size(3.0, 3.0),
            RoomSpec::new("master", "Master Bedroom").with_size(4.0, 4.0),
            RoomSpec::new("guest", "Guest Room").with_size(3.5, 3.0),
            RoomSpec::new("kids", "Kids Room").with_size(3.5, 3.0),
            RoomSpec::new("bath1", "Bathroom").with_size(2.8, 3.0),
            RoomSpec::new("balcony", "Balcony").with_size(2.0, 1.5),
        ])
        .with_doors(vec![
            DoorSpec::new("guest", "kids"),
            DoorSpec::new("master", "bath1"),
        ]);
        let layout = place(&plan);
        assert_eq!(layout.len(), 7);
        assert_no_overlaps(&layout);
    }

    #[test]
    fn test_crowded_anchor_still_places_everything() {
        // Eight satellites around a tiny hub: the hub runs out of sides.
        let mut rooms = vec![RoomSpec::new("hub", "Living Room")
            .with_size(1.0, 1.0)
            .adjacent_to(&["sat"])];
        for i in 0..8 {
            rooms.push(RoomSpec::new(format!("sat{}", i), "Storage").with_size(2.0, 2.0));
        }
        let layout = place(&Plan::new(rooms));
        assert_eq!(layout.len(), 9);
        assert_no_overlaps(&layout);
    }

    #[test]
    fn test_anchor_with_higher_degree_wins() {
        let plan = Plan::new(vec![
            RoomSpec::new("living", "Living Room")
                .with_size(5.0, 4.0)
                .adjacent_to(&["study", "corridor"]),
            RoomSpec::new("study", "Study").with_size(3.0, 3.0),
            RoomSpec::new("corridor", "Corridor")
                .with_size(1.5, 4.0)
                .adjacent_to(&["closet_a", "closet_b"]),
            RoomSpec::new("nook", "Nook")
                .with_size(2.0, 2.0)
                .adjacent_to(&["study", "corridor"]),
            RoomSpec::new("closet_a", "Closet").with_size(1.0, 1.0),
            RoomSpec::new("closet_b", "Closet").with_size(1.0, 1.0),
        ]);
        let graph = AdjacencyGraph::build(&plan);
        let nook = graph.index_of("nook").unwrap();
        let study = graph.index_of("study").unwrap();
        let corridor = graph.index_of("corridor").unwrap();
        assert_eq!(graph.neighbors(nook), &[study, corridor]);
        assert!(graph.degree(corridor) > graph.degree(study));

        let layout = place(&plan);
        assert_eq!(layout.get("study"), Some(&Rect::new(5.0, 0.0, 3.0, 3.0)));
        assert_eq!(layout.get("corridor"), Some(&Rect::new(-1.5, 0.0, 1.5, 4.0)));
        let nook_rect = layout.get("nook").unwrap();
        assert_eq!(nook_rect, &Rect::new(-3.5, 0.0, 2.0, 2.0));
        assert!(shared_wall(nook_rect, layout.get("corridor").unwrap()).is_some());
        assert!(shared_wall(nook_rect, layout.get("study").unwrap()).is_none());
        assert_no_overlaps(&layout);
    }

    #[test]
    fn test_boxed_in_anchor_falls_through_to_next() {
        // The 1×1 core is flanked by two 3×3 rooms, leaving no side free
        // for the 2×2 nook.
        let plan = Plan::new(vec![
            RoomSpec::new("core", "Living Room")
                .with_size(1.0, 1.0)
                .adjacent_to(&["east", "west", "nook"]),
            RoomSpec::new("east", "Bedroom").with_size(3.0, 3.0),
            RoomSpec::new("west", "Bedroom").with_size(3.0, 3.0),
            RoomSpec::new("nook", "Nook")
                .with_size(2.0, 2.0)
                .adjacent_to(&["east"]),
        ]);
        let graph = AdjacencyGraph::build(&plan);
        let core = graph.index_of("core").unwrap();
        let east = graph.index_of("east").unwrap();
        assert!(graph.degree(core) > graph.degree(east));

        let layout = place(&plan);
        let core_rect = *layout.get("core").unwrap();
        let east_rect = *layout.get("east").unwrap();
        assert_eq!(east_rect, Rect::new(1.0, -1.5, 3.0, 3.0));
        assert_eq!(layout.get("west"), Some(&Rect::new(-3.0, -1.5, 3.0, 3.0)));

        let nook_rect = *layout.get("nook").unwrap();
        assert_eq!(nook_rect, Rect::new(4.0, -1.5, 2.0, 2.0));
        assert!(shared_wall(&nook_rect, &east_rect).is_some());
        assert!(shared_wall(&nook_rect, &core_rect).is_none());
        // Not the right-of-bounding-box fallback at y = 0.
        assert_ne!(nook_rect, Rect::new(4.5, 0.0, 2.0, 2.0));
        assert_no_overlaps(&layout);
    }
}
