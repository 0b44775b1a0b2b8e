//! Layout cost model.
//!
//! Four pure scores over a whole layout, combined linearly:
//!
//! | Term | Measures | Ideal |
//! |------|----------|-------|
//! | overlap | summed pairwise intersection area | 0 |
//! | adjacency | summed center distance of adjacency pairs | 0 |
//! | area | bounding-box area (floored at [`MIN_BBOX_AREA`]) | small |
//! | aspect | summed excess of `max(w/h, h/w)` over the ideal ratio | 0 |

use crate::adjacency::AdjacencyPair;
use crate::config::CostWeights;
use crate::geometry::{Rect, OVERLAP_EPSILON};
use crate::layout::Layout;

/// Floor for the bounding-box area term.
pub const MIN_BBOX_AREA: f64 = 1e-4;

/// Sum of intersection areas over all unordered room pairs.
pub fn overlap_area(layout: &Layout) -> f64 {
    pairwise_overlap(layout).0
}

/// `(sum, max)` of pairwise intersection areas.
fn pairwise_overlap(layout: &Layout) -> (f64, f64) {
    let rects: Vec<&Rect> = layout.rects().collect();
    let mut total = 0.0;
    let mut worst: f64 = 0.0;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let area = rects[i].intersection_area(rects[j]);
            total += area;
            worst = worst.max(area);
        }
    }
    (total, worst)
}

fn center_distance(a: &Rect, b: &Rect) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by)
}

/// Sum of center distances over `pairs`; pairs naming an unknown room add 0.
pub fn adjacency_distance(layout: &Layout, pairs: &[AdjacencyPair]) -> f64 {
    pairs
        .iter()
        .filter_map(|(a, b)| Some(center_distance(layout.get(a)?, layout.get(b)?)))
        .sum()
}

/// Bounding-box area, never below [`MIN_BBOX_AREA`].
pub fn bbox_area(layout: &Layout) -> f64 {
    layout
        .bounding_box()
        .map_or(0.0, |bb| bb.area())
        .max(MIN_BBOX_AREA)
}

/// Summed excess aspect ratio over `ideal`.
pub fn aspect_penalty(layout: &Layout, ideal: f64) -> f64 {
    layout
        .rects()
        .map(|r| {
            let ratio = if r.width > 0.0 && r.height > 0.0 {
                r.aspect_ratio()
            } else {
                1e6
            };
            (ratio - ideal).max(0.0)
        })
        .sum()
}

/// Each term of one evaluation, plus the weighted total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub overlap: f64,
    pub adjacency: f64,
    pub area: f64,
    pub aspect: f64,
    pub total: f64,
    /// Largest single pairwise intersection.
    pub worst_overlap: f64,
}

impl CostBreakdown {
    /// No pair intersects by more than [`OVERLAP_EPSILON`].
    pub fn is_overlap_free(&self) -> bool {
        self.worst_overlap <= OVERLAP_EPSILON
    }
}

/// Weighted cost with adjacency pairs pre-resolved to layout positions.
///
/// The layout handed to [`CostModel::evaluate`] must have the same ids in
/// the same order as the one the model was built from; the annealer only
/// ever translates rooms, so that holds for a whole run.
#[derive(Debug, Clone)]
pub struct CostModel {
    weights: CostWeights,
    ideal_aspect: f64,
    pairs: Vec<(usize, usize)>,
}

impl CostModel {
    pub fn new(
        layout: &Layout,
        pairs: &[AdjacencyPair],
        weights: CostWeights,
        ideal_aspect: f64,
    ) -> Self {
        let position = |id: &str| layout.ids().position(|other| other == id);
        let pairs = pairs
            .iter()
            .filter_map(|(a, b)| Some((position(a.as_str())?, position(b.as_str())?)))
            .collect();
        Self {
            weights,
            ideal_aspect,
            pairs,
        }
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    /// Number of adjacency pairs that resolved to rooms in the layout.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn evaluate(&self, layout: &Layout) -> CostBreakdown {
        let (overlap, worst_overlap) = pairwise_overlap(layout);
        let adjacency = self
            .pairs
            .iter()
            .filter_map(|&(a, b)| {
                let (_, ra) = layout.get_index(a)?;
                let (_, rb) = layout.get_index(b)?;
                Some(center_distance(ra, rb))
            })
            .sum::<f64>();
        let area = bbox_area(layout);
        let aspect = aspect_penalty(layout, self.ideal_aspect);
        let w = &self.weights;
        CostBreakdown {
            overlap,
            adjacency,
            area,
            aspect,
            total: w.overlap * overlap + w.adjacency * adjacency + w.area * area + w.aspect * aspect,
            worst_overlap,
        }
    }

    pub fn cost(&self, layout: &Layout) -> f64 {
        self.evaluate(layout).total
    }
}

/// One-shot weighted cost of a layout.
pub fn total_cost(
    layout: &Layout,
    pairs: &[AdjacencyPair],
    weights: CostWeights,
    ideal_aspect: f64,
) -> f64 {
    CostModel::new(layout, pairs, weights, ideal_aspect).cost(layout)
}
