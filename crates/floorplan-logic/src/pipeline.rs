//! End-to-end synthesis.
//!
//! validate plan → resolve sizes → adjacency graph → constructive placement
//! → adjacency pairs → anneal → normalize → doors → layout validation.
//!
//! Only an invalid plan fails the run. Everything after validation always
//! produces a layout; problems found along the way come back as issues.

use crate::adjacency::{adjacency_pairs, AdjacencyGraph};
use crate::anneal::{anneal, AnnealStats};
use crate::config::SynthesisConfig;
use crate::doors::{place_doors, DoorPlacement};
use crate::error::Result;
use crate::geometry::{validate_layout, Severity, ValidationIssue};
use crate::layout::Layout;
use crate::normalize::{normalize, normalized};
use crate::placer::place_rooms;
use crate::plan::Plan;
use crate::sizing::resolve_rooms;

/// Everything one synthesis run produces.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Final annealed, normalized layout.
    pub layout: Layout,
    /// Constructive placement, normalized with the same margin.
    pub initial_layout: Layout,
    pub stats: AnnealStats,
    pub doors: Vec<DoorPlacement>,
    /// Door placement issues followed by layout validation issues.
    pub issues: Vec<ValidationIssue>,
}

impl Synthesis {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

/// Synthesize a layout for `plan`.
pub fn synthesize(plan: &Plan, config: &SynthesisConfig) -> Result<Synthesis> {
    plan.validate()?;

    let rooms = resolve_rooms(plan, &config.sizes);
    let graph = AdjacencyGraph::build(plan);
    log::info!(
        "synthesize: {} rooms, {} adjacency edges, {} doors",
        graph.node_count(),
        graph.edge_count(),
        plan.doors.len()
    );

    let placed = place_rooms(&rooms, &graph, &config.placer);
    let pairs = adjacency_pairs(plan);
    let outcome = anneal(&placed, &pairs, &config.anneal);
    log::info!(
        "synthesize: annealed {} iterations, cost {:.3} → {:.3}",
        config.anneal.iterations,
        outcome.stats.initial_cost,
        outcome.stats.best_cost
    );

    let mut layout = outcome.layout;
    normalize(&mut layout, config.margin);

    let (doors, mut issues) = place_doors(plan, &layout);
    issues.extend(validate_layout(&layout, plan, &rooms, config.margin));
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    log::info!(
        "synthesize: {} doors placed, {} issues ({} errors)",
        doors.len(),
        issues.len(),
        errors
    );

    Ok(Synthesis {
        initial_layout: normalized(&placed, config.margin),
        layout,
        stats: outcome.stats,
        doors,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Rect;
    use crate::plan::{DoorSpec, RoomSpec};

    fn quick() -> SynthesisConfig {
        SynthesisConfig::default().with_iterations(300)
    }

    #[test]
    fn test_empty_plan_rejected() {
        let err = synthesize(&Plan::default(), &quick()).unwrap_err();
        assert!(matches!(err, Error::InvalidPlan(_)));
    }

    #[test]
    fn test_single_room() {
        let plan = Plan::new(vec![RoomSpec::new("only", "Kitchen")]);
        let out = synthesize(&plan, &quick()).unwrap();
        assert_eq!(out.layout.get("only"), Some(&Rect::new(0.2, 0.2, 3.0, 3.0)));
        assert_eq!(out.initial_layout, out.layout);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn test_two_rooms_touch_and_get_a_door() {
        let plan = Plan::new(vec![
            RoomSpec::new("a", "Study").with_size(4.0, 3.0).adjacent_to(&["b"]),
            RoomSpec::new("b", "Closet").with_size(3.0, 3.0),
        ])
        .with_doors(vec![DoorSpec::new("a", "b")]);
        let out = synthesize(&plan, &quick()).unwrap();
        assert!(!out.has_errors(), "{:?}", out.issues);
        assert_eq!(out.initial_layout.get("a"), Some(&Rect::new(0.2, 0.2, 4.0, 3.0)));
        assert_eq!(out.stats.best_cost_trace.len(), 300);
    }

    #[test]
    fn test_unknown_door_reported_not_fatal() {
        let plan = Plan::new(vec![RoomSpec::new("a", "Office")])
            .with_doors(vec![DoorSpec::new("a", "ghost")]);
        let out = synthesize(&plan, &quick()).unwrap();
        assert!(out.doors.is_empty());
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].category, "door_placement");
    }
}
