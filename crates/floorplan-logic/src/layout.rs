//! Room id → rectangle map.
//!
//! Backed by an `IndexMap` so iteration follows insertion order, which is
//! the placer's breadth-first order. Everything downstream (random room
//! picks, snap sweeps, serialization) depends on that order being stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Rect};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    rects: IndexMap<String, Rect>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a room's rect. Replacing keeps the original position
    /// in iteration order.
    pub fn insert(&mut self, id: impl Into<String>, rect: Rect) {
        self.rects.insert(id.into(), rect);
    }

    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.rects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Rect)> {
        self.rects.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rects.keys().map(String::as_str)
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.rects.values()
    }

    /// Rect at a position in iteration order.
    pub fn get_index(&self, index: usize) -> Option<(&String, &Rect)> {
        self.rects.get_index(index)
    }

    /// Move the room at `index` to a new origin, returning its previous rect.
    pub(crate) fn move_index(&mut self, index: usize, x: f64, y: f64) -> Option<Rect> {
        let (_, rect) = self.rects.get_index_mut(index)?;
        let previous = *rect;
        *rect = previous.moved_to(x, y);
        Some(previous)
    }

    /// Restore a rect previously returned by [`Layout::move_index`].
    pub(crate) fn set_index(&mut self, index: usize, rect: Rect) {
        if let Some((_, slot)) = self.rects.get_index_mut(index) {
            *slot = rect;
        }
    }

    pub(crate) fn rects_mut(&mut self) -> impl Iterator<Item = &mut Rect> {
        self.rects.values_mut()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of(self.rects.values())
    }

    /// Serialize as a JSON object `{ id: {x, y, width, height} }`.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
