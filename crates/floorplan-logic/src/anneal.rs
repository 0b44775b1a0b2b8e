//! Simulated-annealing refinement of a placed layout.
//!
//! Each iteration translates one random room by up to `max_shift` on each
//! axis and keeps or reverts the move by the Metropolis rule under a
//! linearly cooling temperature. Every `snap_interval` iterations a greedy
//! sweep tries to snap each room flush against each other room's edges.
//!
//! The run is fully determined by its seed: each iteration draws one room
//! index and two offsets, plus one acceptance sample for non-improving
//! moves. The snap sweep draws nothing. Rooms are only ever translated.
//!
//! Once an overlap-free layout has been seen, `best` only ever moves to
//! another overlap-free layout, so a feasible start can never come back
//! overlapping.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::adjacency::AdjacencyPair;
use crate::config::AnnealConfig;
use crate::cost::{CostBreakdown, CostModel};
use crate::layout::Layout;

/// Temperature floor used in the acceptance probability.
const MIN_TEMPERATURE: f64 = 1e-6;

/// Run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealStats {
    pub initial_cost: f64,
    pub best_cost: f64,
    /// Random moves accepted.
    pub accepted: u32,
    /// Snap moves applied.
    pub snaps_applied: u32,
    /// Best cost after each iteration; non-increasing.
    pub best_cost_trace: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub layout: Layout,
    pub stats: AnnealStats,
}

/// Tracks the best layout seen so far.
struct Best {
    layout: Layout,
    cost: CostBreakdown,
}

impl Best {
    /// Adopt `candidate` if it is cheaper, without ever trading an
    /// overlap-free best for an overlapping one.
    fn offer(&mut self, candidate: &Layout, cost: CostBreakdown) {
        let feasible_enough = cost.is_overlap_free() || !self.cost.is_overlap_free();
        if cost.total < self.cost.total && feasible_enough {
            self.layout.clone_from(candidate);
            self.cost = cost;
        }
    }
}

/// Temperature at iteration `it` of `total`.
pub fn temperature(initial: f64, it: u32, total: u32) -> f64 {
    if total == 0 {
        return initial;
    }
    initial * (1.0 - it as f64 / total as f64)
}

/// Refine `initial` for `config.iterations` steps and return the best layout.
///
/// `pairs` is the adjacency-pair list the cost model pulls together; pairs
/// naming rooms absent from the layout are ignored. Never fails.
pub fn anneal(initial: &Layout, pairs: &[AdjacencyPair], config: &AnnealConfig) -> AnnealOutcome {
    let mut rng = StdRng::seed_from_u64(config.seed);
    anneal_with_rng(initial, pairs, config, &mut rng)
}

/// [`anneal`] drawing from a caller-owned generator; `config.seed` is not used.
pub fn anneal_with_rng<R: Rng>(
    initial: &Layout,
    pairs: &[AdjacencyPair],
    config: &AnnealConfig,
    rng: &mut R,
) -> AnnealOutcome {
    let model = CostModel::new(initial, pairs, config.weights, config.ideal_aspect);
    let mut current = initial.clone();
    let mut current_cost = model.evaluate(&current);
    let mut best = Best {
        layout: current.clone(),
        cost: current_cost,
    };
    let mut stats = AnnealStats {
        initial_cost: current_cost.total,
        best_cost: current_cost.total,
        accepted: 0,
        snaps_applied: 0,
        best_cost_trace: Vec::with_capacity(config.iterations as usize),
    };

    let n = current.len();
    if n == 0 {
        return AnnealOutcome {
            layout: current,
            stats,
        };
    }

    let shift = config.max_shift.abs();
    log::debug!(
        "anneal: {} rooms, {} pairs, {} iterations, initial cost {:.3}",
        n,
        model.pair_count(),
        config.iterations,
        current_cost.total
    );

    for it in 0..config.iterations {
        let t = temperature(config.initial_temperature, it, config.iterations);

        let index = rng.gen_range(0..n);
        let dx = rng.gen_range(-shift..=shift);
        let dy = rng.gen_range(-shift..=shift);
        let target = current.get_index(index).map(|(_, r)| (r.x + dx, r.y + dy));

        if let Some(previous) = target.and_then(|(x, y)| current.move_index(index, x, y)) {
            let candidate_cost = model.evaluate(&current);
            let delta = candidate_cost.total - current_cost.total;
            let accept = delta < 0.0 || rng.gen::<f64>() < (-delta / t.max(MIN_TEMPERATURE)).exp();
            if accept {
                current_cost = candidate_cost;
                stats.accepted += 1;
                best.offer(&current, current_cost);
            } else {
                current.set_index(index, previous);
            }
        }

        if config.snap_interval > 0 && it % config.snap_interval == 0 {
            stats.snaps_applied += snap_sweep(&mut current, &mut current_cost, &model, &mut best);
        }

        stats.best_cost_trace.push(best.cost.total);
    }

    stats.best_cost = best.cost.total;
    log::debug!(
        "anneal: best cost {:.3} (from {:.3}), {} accepted, {} snaps",
        stats.best_cost,
        stats.initial_cost,
        stats.accepted,
        stats.snaps_applied
    );
    AnnealOutcome {
        layout: best.layout,
        stats,
    }
}

/// Flush positions for a `width × height` mover against each side of the
/// room at `(bx, by, bw, bh)`: left, right, top, bottom.
fn snap_positions(width: f64, height: f64, bx: f64, by: f64, bw: f64, bh: f64) -> [(f64, f64); 4] {
    [
        (bx - width, by),
        (bx + bw, by),
        (bx, by - height),
        (bx, by + bh),
    ]
}

/// Snap each room in turn to its cheapest flush position against any
/// other room, applying the move when it strictly beats the running cost.
/// Later rooms are scored against the layout with earlier snaps applied.
/// Returns the number of moves applied.
fn snap_sweep(
    layout: &mut Layout,
    current_cost: &mut CostBreakdown,
    model: &CostModel,
    best: &mut Best,
) -> u32 {
    let n = layout.len();
    let mut applied = 0;

    for mover in 0..n {
        let mut best_move: Option<(f64, f64, CostBreakdown)> = None;
        for target in 0..n {
            if mover == target {
                continue;
            }
            let (Some((_, m)), Some((_, t))) = (layout.get_index(mover), layout.get_index(target)) else {
                continue;
            };
            let positions = snap_positions(m.width, m.height, t.x, t.y, t.width, t.height);
            for (x, y) in positions {
                let Some(previous) = layout.move_index(mover, x, y) else {
                    continue;
                };
                let cost = model.evaluate(layout);
                layout.set_index(mover, previous);
                if best_move.map_or(true, |(_, _, c)| cost.total < c.total) {
                    best_move = Some((x, y, cost));
                }
            }
        }

        if let Some((x, y, cost)) = best_move {
            if cost.total < current_cost.total && layout.move_index(mover, x, y).is_some() {
                *current_cost = cost;
                applied += 1;
                best.offer(layout, cost);
            }
        }
    }
    applied
}
