//! Door positions on shared walls.
//!
//! Runs after synthesis. Each explicit door gets a point on the wall its two
//! rooms share, a fixed fraction along the shared span. Doors that cannot be
//! placed are reported as issues instead of failing the run.

use serde::{Deserialize, Serialize};

use crate::geometry::{shared_wall, ValidationIssue, Wall};
use crate::layout::Layout;
use crate::plan::Plan;

/// Fraction along the shared span, measured from its start, where the door goes.
pub const DOOR_FRACTION: f64 = 0.2;

/// A door fixed to a point on a shared wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorPlacement {
    pub from_room: String,
    pub to_room: String,
    /// Wall of `from_room` the door sits in.
    pub wall_from: Wall,
    /// Wall of `to_room` the door sits in; always opposite `wall_from`.
    pub wall_to: Wall,
    pub x: f64,
    pub y: f64,
    /// Distance from the start corner of `wall_from` (its min-x or min-y end).
    pub position_along_wall: f64,
}

/// Place a single door between two rooms, if they share a wall.
pub fn place_door(layout: &Layout, from: &str, to: &str) -> Option<DoorPlacement> {
    let a = layout.get(from)?;
    let b = layout.get(to)?;
    let shared = shared_wall(a, b)?;
    let along = shared.start + DOOR_FRACTION * (shared.end - shared.start);
    let (x, y, position_along_wall) = match shared.wall {
        Wall::North | Wall::South => (along, shared.line, along - a.x),
        Wall::East | Wall::West => (shared.line, along, along - a.y),
    };
    Some(DoorPlacement {
        from_room: from.to_string(),
        to_room: to.to_string(),
        wall_from: shared.wall,
        wall_to: shared.wall.opposite(),
        x,
        y,
        position_along_wall,
    })
}

/// Place every door of the plan. Unknown rooms are errors; rooms that do not
/// share a wall are warnings.
pub fn place_doors(plan: &Plan, layout: &Layout) -> (Vec<DoorPlacement>, Vec<ValidationIssue>) {
    let mut placements = Vec::new();
    let mut issues = Vec::new();

    for (from, to) in plan.door_pairs() {
        let missing: Vec<&str> = [from, to]
            .into_iter()
            .filter(|id| !layout.contains(id))
            .collect();
        if !missing.is_empty() {
            issues.push(ValidationIssue::error(
                "door_placement",
                format!(
                    "Door {} ↔ {} references unknown room(s): {}",
                    from,
                    to,
                    missing.join(", ")
                ),
            ));
            continue;
        }

        match place_door(layout, from, to) {
            Some(door) => {
                log::debug!(
                    "doors: {} ↔ {} on {:?} wall at ({:.2},{:.2})",
                    from,
                    to,
                    door.wall_from,
                    door.x,
                    door.y
                );
                placements.push(door);
            }
            None => issues.push(ValidationIssue::warning(
                "door_placement",
                format!("Door {} ↔ {}: rooms do not share a wall", from, to),
            )),
        }
    }
    (placements, issues)
}
