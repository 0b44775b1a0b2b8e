//! Room size resolution.
//!
//! Priority: explicit size (both dimensions) → minimum-size hints (both) →
//! type-keyed default table → fallback. Non-positive or non-finite values
//! count as missing, so geometry code never sees a degenerate rectangle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::plan::{Plan, RoomSpec};

/// Last-resort size (m) when nothing else applies.
pub const FALLBACK_SIZE: Dimensions = Dimensions {
    width: 3.5,
    height: 3.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        positive(Some(self.width)).is_some() && positive(Some(self.height)).is_some()
    }
}

/// Default sizes keyed by room type, plus the fallback.
///
/// Lookup ignores case and surrounding whitespace, so "kitchen" and
/// " Kitchen " both hit the "Kitchen" entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTable {
    pub defaults: IndexMap<String, Dimensions>,
    pub fallback: Dimensions,
}

impl Default for SizeTable {
    fn default() -> Self {
        let defaults = [
            ("Living Room", 5.0, 4.0),
            ("Kitchen", 3.0, 3.0),
            ("Master Bedroom", 4.0, 4.0),
            ("Kids Room", 3.5, 3.0),
            ("Guest Room", 3.5, 3.0),
            ("Bathroom", 1.8, 2.4),
            ("Balcony", 2.0, 1.5),
        ]
        .into_iter()
        .map(|(name, w, h)| (name.to_string(), Dimensions::new(w, h)))
        .collect();
        Self {
            defaults,
            fallback: FALLBACK_SIZE,
        }
    }
}

impl SizeTable {
    /// An empty table: every lookup yields the fallback.
    pub fn empty() -> Self {
        Self {
            defaults: IndexMap::new(),
            fallback: FALLBACK_SIZE,
        }
    }

    pub fn with_entry(mut self, room_type: impl Into<String>, width: f64, height: f64) -> Self {
        self.defaults
            .insert(room_type.into(), Dimensions::new(width, height));
        self
    }

    /// Table entry for a room type, if any valid one exists.
    pub fn lookup(&self, room_type: &str) -> Option<Dimensions> {
        let key = room_type.trim();
        self.defaults
            .iter()
            .find(|(name, _)| name.trim().to_lowercase() == key.to_lowercase())
            .map(|(_, dims)| *dims)
            .filter(Dimensions::is_valid)
    }

    fn fallback(&self) -> Dimensions {
        if self.fallback.is_valid() {
            self.fallback
        } else {
            FALLBACK_SIZE
        }
    }
}

/// A room with its working size fixed for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoom {
    pub id: String,
    pub room_type: String,
    pub width: f64,
    pub height: f64,
}

impl ResolvedRoom {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

/// Resolve one room's `(width, height)`. Never fails.
pub fn resolve_size(room: &RoomSpec, table: &SizeTable) -> (f64, f64) {
    if let Some(size) = room.size {
        if let (Some(w), Some(h)) = (positive(size.width), positive(size.height)) {
            return (w, h);
        }
    }
    if let (Some(w), Some(h)) = (positive(room.min_width), positive(room.min_height)) {
        return (w, h);
    }
    let dims = table
        .lookup(&room.room_type)
        .unwrap_or_else(|| table.fallback());
    (dims.width, dims.height)
}

/// Resolve every room of a plan, in plan order.
pub fn resolve_rooms(plan: &Plan, table: &SizeTable) -> Vec<ResolvedRoom> {
    plan.rooms
        .iter()
        .map(|room| {
            let (width, height) = resolve_size(room, table);
            ResolvedRoom {
                id: room.id.clone(),
                room_type: room.room_type.clone(),
                width,
                height,
            }
        })
        .collect()
}
