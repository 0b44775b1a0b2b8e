//! Integration tests for the full layout synthesis pipeline.
//!
//! Exercises: Plan JSON → sizes → adjacency graph → constructive placement
//! → annealing → normalization → doors → validation → fallback hints.
//!
//! All tests are pure logic with no I/O beyond the bundled sample plan.

use floorplan_logic::adjacency::{adjacency_pairs, AdjacencyGraph};
use floorplan_logic::anneal::anneal;
use floorplan_logic::config::{AnnealConfig, PlacerConfig, SynthesisConfig};
use floorplan_logic::geometry::{check_room_overlaps, shared_wall, Rect, Severity};
use floorplan_logic::hints::{fallback_hints, validate_hints};
use floorplan_logic::layout::Layout;
use floorplan_logic::normalize::normalized;
use floorplan_logic::placer::place_rooms;
use floorplan_logic::plan::{Plan, RoomSpec};
use floorplan_logic::sizing::{resolve_rooms, SizeTable};
use floorplan_logic::{synthesize, Error};

const SAMPLE_PLAN: &str = include_str!("../../../data/sample_plan.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn sample_plan() -> Plan {
    Plan::from_json(SAMPLE_PLAN).expect("sample plan parses")
}

fn quick_config(seed: u64) -> SynthesisConfig {
    SynthesisConfig::default()
        .with_iterations(400)
        .with_seed(seed)
}

fn place(plan: &Plan) -> Layout {
    let rooms = resolve_rooms(plan, &SizeTable::default());
    let graph = AdjacencyGraph::build(plan);
    place_rooms(&rooms, &graph, &PlacerConfig::default())
}

fn two_room_plan() -> Plan {
    Plan::new(vec![
        RoomSpec::new("a", "Room").with_size(4.0, 3.0).adjacent_to(&["b"]),
        RoomSpec::new("b", "Room").with_size(3.0, 3.0),
    ])
}

// ── Plan boundary ──────────────────────────────────────────────────────

#[test]
fn sample_plan_parses() {
    let plan = sample_plan();
    assert_eq!(plan.rooms.len(), 7);
    assert_eq!(plan.doors.len(), 6);
    assert_eq!(plan.room("bath1").unwrap().fixtures.len(), 3);
    plan.validate().unwrap();
}

#[test]
fn plan_aliases_and_nulls_accepted() {
    let json = r#"{
        "rooms": [
            {"id": "k", "type": "Kitchen", "size": {"width_m": 3.2, "height_m": 2.8},
             "preferred_adjacent": null, "fixtures": null},
            {"id": "d", "type": "Dining", "min_width": 3.0, "min_height": 3.0}
        ],
        "doors": [{"from": "k", "to": "d"}]
    }"#;
    let plan = Plan::from_json(json).unwrap();
    let rooms = resolve_rooms(&plan, &SizeTable::default());
    assert_eq!((rooms[0].width, rooms[0].height), (3.2, 2.8));
    assert_eq!((rooms[1].width, rooms[1].height), (3.0, 3.0));
    assert_eq!(plan.doors[0].count, 1);
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(Plan::from_json("{\"rooms\": ["), Err(Error::Json(_))));
}

#[test]
fn zero_rooms_rejected_before_synthesis() {
    let plan = Plan::from_json(r#"{"rooms": []}"#).unwrap();
    assert!(matches!(
        synthesize(&plan, &quick_config(1)),
        Err(Error::InvalidPlan(_))
    ));
}

// ── Constructive placement ─────────────────────────────────────────────

#[test]
fn placer_output_is_complete_and_disjoint() {
    let plan = sample_plan();
    let layout = place(&plan);
    assert_eq!(layout.len(), plan.rooms.len());
    for room in &plan.rooms {
        assert!(layout.contains(&room.id), "missing {}", room.id);
    }
    assert!(check_room_overlaps(&layout).is_empty());
}

#[test]
fn two_rooms_placed_touching() {
    let layout = place(&two_room_plan());
    assert_eq!(layout.get("a"), Some(&Rect::new(0.0, 0.0, 4.0, 3.0)));
    let a = layout.get("a").unwrap();
    let b = layout.get("b").unwrap();
    assert!(shared_wall(a, b).is_some());
    assert!(!a.overlaps(b));
}

#[test]
fn kitchenette_substring_quirk_preserved() {
    let plan = Plan::new(vec![
        RoomSpec::new("hall", "Hallway").adjacent_to(&["kitchen"]),
        RoomSpec::new("k1", "Kitchen"),
        RoomSpec::new("kitchenette", "Pantry"),
    ]);
    let graph = AdjacencyGraph::build(&plan);
    assert!(graph.has_edge("hall", "k1"));
    assert!(graph.has_edge("hall", "kitchenette"));
}

// ── Annealing ──────────────────────────────────────────────────────────

#[test]
fn two_rooms_never_overlap_after_annealing() {
    let plan = two_room_plan();
    let placed = place(&plan);
    let pairs = adjacency_pairs(&plan);
    for seed in 0..10 {
        for iterations in [1, 100, 1000] {
            let config = AnnealConfig {
                iterations,
                seed,
                ..AnnealConfig::default()
            };
            let out = anneal(&placed, &pairs, &config);
            let a = out.layout.get("a").unwrap();
            let b = out.layout.get("b").unwrap();
            assert!(a.intersection_area(b) <= 1e-6, "seed {} budget {}", seed, iterations);
        }
    }
}

#[test]
fn same_seed_same_layout() {
    let plan = sample_plan();
    let first = synthesize(&plan, &quick_config(42)).unwrap();
    let second = synthesize(&plan, &quick_config(42)).unwrap();
    assert_eq!(first.layout, second.layout);
    assert_eq!(first.stats.best_cost_trace, second.stats.best_cost_trace);
}

#[test]
fn best_cost_is_monotone() {
    let out = synthesize(&sample_plan(), &quick_config(5)).unwrap();
    assert_eq!(out.stats.best_cost_trace.len(), 400);
    assert!(out
        .stats
        .best_cost_trace
        .windows(2)
        .all(|w| w[1] <= w[0]));
    assert!(out.stats.best_cost <= out.stats.initial_cost);
}

#[test]
fn annealing_never_resizes() {
    let plan = sample_plan();
    let rooms = resolve_rooms(&plan, &SizeTable::default());
    let out = synthesize(&plan, &quick_config(8)).unwrap();
    for room in &rooms {
        let r = out.layout.get(&room.id).unwrap();
        assert_eq!((r.width, r.height), (room.width, room.height));
    }
}

#[test]
fn zero_budget_keeps_placement() {
    let out = synthesize(&sample_plan(), &quick_config(1).with_iterations(0)).unwrap();
    assert_eq!(out.layout, out.initial_layout);
}

// ── Full pipeline ──────────────────────────────────────────────────────

#[test]
fn sample_synthesis_has_no_errors() {
    for seed in [1, 2, 3] {
        let out = synthesize(&sample_plan(), &quick_config(seed)).unwrap();
        assert_eq!(out.layout.len(), 7);
        let errors: Vec<_> = out
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "seed {}: {:?}", seed, errors);
    }
}

#[test]
fn final_layout_is_normalized_and_stable() {
    let out = synthesize(&sample_plan(), &quick_config(3)).unwrap();
    let bb = out.layout.bounding_box().unwrap();
    assert_eq!((bb.min_x, bb.min_y), (0.2, 0.2));
    assert_eq!(normalized(&out.layout, 0.2), out.layout);
}

#[test]
fn single_room_lands_on_margin() {
    let plan = Plan::new(vec![RoomSpec::new("studio", "Studio").with_size(6.0, 4.5)]);
    let graph = AdjacencyGraph::build(&plan);
    assert_eq!((graph.node_count(), graph.edge_count()), (1, 0));
    let out = synthesize(&plan, &quick_config(1)).unwrap();
    assert_eq!(out.layout.get("studio"), Some(&Rect::new(0.2, 0.2, 6.0, 4.5)));
}

#[test]
fn doors_sit_on_room_edges() {
    let out = synthesize(&sample_plan(), &quick_config(4)).unwrap();
    for door in &out.doors {
        let a = out.layout.get(&door.from_room).unwrap();
        let on_x_edge = (door.x - a.x).abs() < 0.1 || (door.x - a.right()).abs() < 0.1;
        let on_y_edge = (door.y - a.y).abs() < 0.1 || (door.y - a.bottom()).abs() < 0.1;
        assert!(on_x_edge || on_y_edge, "{:?}", door);
        assert_eq!(door.wall_to, door.wall_from.opposite());
    }
    assert!(out.doors.len() + out.issues.len() >= 6);
}

#[test]
fn fallback_hints_validate_on_synthesized_layout() {
    let plan = sample_plan();
    let out = synthesize(&plan, &quick_config(6)).unwrap();
    let hints = fallback_hints(&plan, &out.layout);
    assert!(!hints.furniture.is_empty());
    assert!(validate_hints(&out.layout, &hints).is_empty());
}

#[test]
fn config_json_overrides_apply() {
    let config = SynthesisConfig::from_json(r#"{"margin": 1.0, "anneal": {"iterations": 50}}"#)
        .unwrap();
    let out = synthesize(&sample_plan(), &config).unwrap();
    let bb = out.layout.bounding_box().unwrap();
    assert_eq!((bb.min_x, bb.min_y), (1.0, 1.0));
    assert_eq!(out.stats.best_cost_trace.len(), 50);
}
