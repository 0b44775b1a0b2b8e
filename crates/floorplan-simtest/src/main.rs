//! Floorplan Headless Layout Harness
//!
//! Runs the full synthesis pipeline on the bundled sample plan and checks
//! the invariants every layout must satisfy. Entirely in-process, no
//! rendering and no external services.
//!
//! Usage:
//!   cargo run -p floorplan-simtest
//!   cargo run -p floorplan-simtest -- --verbose

use floorplan_logic::adjacency::{adjacency_pairs, AdjacencyGraph};
use floorplan_logic::config::SynthesisConfig;
use floorplan_logic::geometry::{check_room_overlaps, Severity};
use floorplan_logic::hints::{fallback_hints, validate_hints, PlacementHints};
use floorplan_logic::normalize::normalized;
use floorplan_logic::placer::place_rooms;
use floorplan_logic::plan::Plan;
use floorplan_logic::sizing::resolve_rooms;
use floorplan_logic::{synthesize, Synthesis};

// ── Sample plan (same JSON the benchmarks use) ──────────────────────────
const SAMPLE_PLAN_JSON: &str = include_str!("../../../data/sample_plan.json");

/// Seeds swept by the determinism and feasibility checks.
const SEEDS: [u64; 5] = [1, 7, 42, 1234, 99_999];

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Floorplan Layout Harness ===\n");

    let mut results = Vec::new();

    let plan = match Plan::from_json(SAMPLE_PLAN_JSON) {
        Ok(plan) => plan,
        Err(e) => {
            println!("  ✗ plan_parse: {}", e);
            std::process::exit(1);
        }
    };
    let config = SynthesisConfig::default();

    // 1. Plan and graph
    results.extend(validate_plan(&plan, &config));

    // 2. Constructive placement
    results.extend(validate_placement(&plan, &config));

    // 3. Full synthesis across seeds
    results.extend(validate_synthesis(&plan, &config, verbose));

    // 4. Placement hints
    results.extend(validate_hints_fallback(&plan, &config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Plan & Graph ─────────────────────────────────────────────────────

fn validate_plan(plan: &Plan, config: &SynthesisConfig) -> Vec<TestResult> {
    println!("--- Plan & Adjacency Graph ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "plan_valid".into(),
        passed: plan.validate().is_ok(),
        detail: format!("{} rooms, {} doors", plan.rooms.len(), plan.doors.len()),
    });

    let rooms = resolve_rooms(plan, &config.sizes);
    let bad: Vec<_> = rooms
        .iter()
        .filter(|r| !(r.width > 0.0 && r.height > 0.0))
        .collect();
    results.push(TestResult {
        name: "sizes_positive".into(),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            format!(
                "total floor area {:.1} m²",
                rooms.iter().map(|r| r.area()).sum::<f64>()
            )
        } else {
            format!("{} rooms with non-positive size", bad.len())
        },
    });

    let graph = AdjacencyGraph::build(plan);
    let isolated: Vec<&str> = (0..graph.node_count())
        .filter(|&n| graph.degree(n) == 0)
        .map(|n| graph.id(n))
        .collect();
    results.push(TestResult {
        name: "graph_connected_rooms".into(),
        passed: isolated.is_empty(),
        detail: if isolated.is_empty() {
            format!("{} edges, no isolated rooms", graph.edge_count())
        } else {
            format!("isolated: {}", isolated.join(", "))
        },
    });

    let pairs = adjacency_pairs(plan);
    results.push(TestResult {
        name: "adjacency_pairs_present".into(),
        passed: !pairs.is_empty(),
        detail: format!("{} deduplicated pairs", pairs.len()),
    });

    results
}

// ── 2. Constructive Placement ───────────────────────────────────────────

fn validate_placement(plan: &Plan, config: &SynthesisConfig) -> Vec<TestResult> {
    println!("--- Constructive Placement ---");
    let mut results = Vec::new();

    let rooms = resolve_rooms(plan, &config.sizes);
    let graph = AdjacencyGraph::build(plan);
    let layout = place_rooms(&rooms, &graph, &config.placer);

    results.push(TestResult {
        name: "placement_complete".into(),
        passed: layout.len() == plan.rooms.len()
            && plan.rooms.iter().all(|r| layout.contains(&r.id)),
        detail: format!("{}/{} rooms placed", layout.len(), plan.rooms.len()),
    });

    let overlaps = check_room_overlaps(&layout);
    results.push(TestResult {
        name: "placement_no_overlap".into(),
        passed: overlaps.is_empty(),
        detail: if overlaps.is_empty() {
            "no overlapping rooms".into()
        } else {
            overlaps
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let bb = layout.bounding_box();
    results.push(TestResult {
        name: "placement_bbox".into(),
        passed: bb.is_some(),
        detail: match bb {
            Some(bb) => format!("{:.1} × {:.1} m", bb.width(), bb.height()),
            None => "empty layout".into(),
        },
    });

    results
}

// ── 3. Full Synthesis ───────────────────────────────────────────────────

fn validate_synthesis(plan: &Plan, config: &SynthesisConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Synthesis ({} seeds) ---", SEEDS.len());
    let mut results = Vec::new();

    let mut runs: Vec<(u64, Synthesis)> = Vec::new();
    for seed in SEEDS {
        match synthesize(plan, &config.clone().with_seed(seed)) {
            Ok(out) => runs.push((seed, out)),
            Err(e) => results.push(TestResult {
                name: format!("synthesize_seed_{}", seed),
                passed: false,
                detail: e.to_string(),
            }),
        }
    }

    for (seed, out) in &runs {
        let errors: Vec<&str> = out
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect();
        results.push(TestResult {
            name: format!("layout_valid_seed_{}", seed),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                format!(
                    "cost {:.2} → {:.2}, {} doors, {} warnings",
                    out.stats.initial_cost,
                    out.stats.best_cost,
                    out.doors.len(),
                    out.issues.len()
                )
            } else {
                errors.join("; ")
            },
        });

        let monotone = out.stats.best_cost_trace.windows(2).all(|w| w[1] <= w[0]);
        results.push(TestResult {
            name: format!("best_cost_monotone_seed_{}", seed),
            passed: monotone,
            detail: format!("{} iterations traced", out.stats.best_cost_trace.len()),
        });

        let stable = normalized(&out.layout, config.margin) == out.layout;
        results.push(TestResult {
            name: format!("normalize_idempotent_seed_{}", seed),
            passed: stable,
            detail: "re-normalizing is a no-op".into(),
        });
    }

    if let Some((seed, first)) = runs.first() {
        let again = synthesize(plan, &config.clone().with_seed(*seed));
        let same = matches!(&again, Ok(out) if out.layout == first.layout);
        results.push(TestResult {
            name: "deterministic".into(),
            passed: same,
            detail: format!("seed {} reproduced", seed),
        });

        if verbose {
            match first.layout.to_json_pretty() {
                Ok(json) => println!("{}", json),
                Err(e) => println!("layout serialization failed: {}", e),
            }
            if let Ok(doors) = serde_json::to_string_pretty(&first.doors) {
                println!("{}", doors);
            }
        }
    }

    results
}

// ── 4. Placement Hints ──────────────────────────────────────────────────

fn validate_hints_fallback(plan: &Plan, config: &SynthesisConfig) -> Vec<TestResult> {
    println!("--- Placement Hints ---");
    let mut results = Vec::new();

    let out = match synthesize(plan, config) {
        Ok(out) => out,
        Err(e) => {
            results.push(TestResult {
                name: "hints_synthesize".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let hints = fallback_hints(plan, &out.layout);
    let issues = validate_hints(&out.layout, &hints);
    results.push(TestResult {
        name: "fallback_hints_clean".into(),
        passed: issues.is_empty() && !hints.is_empty(),
        detail: format!(
            "{} furniture, {} windows, {} issues",
            hints.furniture.len(),
            hints.windows.len(),
            issues.len()
        ),
    });

    let wrapped = format!(
        "Here are my suggestions:\n```json\n{}\n```",
        serde_json::to_string(&hints).unwrap_or_default()
    );
    let parsed = PlacementHints::from_response(&wrapped);
    results.push(TestResult {
        name: "hints_response_parse".into(),
        passed: matches!(&parsed, Ok(h)
            if h.furniture.len() == hints.furniture.len() && h.windows.len() == hints.windows.len()),
        detail: "prose-wrapped hints round-trip".into(),
    });

    results
}
