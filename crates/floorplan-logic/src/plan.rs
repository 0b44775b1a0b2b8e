//! Plan input model: rooms, doors, notes.
//!
//! This is the single canonical shape the synthesizer accepts. External
//! producers (the text-extraction service, hand-written fixtures) are
//! converted to it once, via serde, in [`Plan::from_json`]. Field aliases
//! cover the spellings those producers are known to emit.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Input description of a floor: ordered rooms plus explicit doors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub rooms: Vec<RoomSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doors: Vec<DoorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One room as requested. Sizes are optional hints; see [`crate::sizing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(
        rename = "size_m",
        alias = "size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<SizeSpec>,
    #[serde(
        rename = "min_width_m",
        alias = "min_width",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_width: Option<f64>,
    #[serde(
        rename = "min_height_m",
        alias = "min_height",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_height: Option<f64>,
    /// Free-text tokens matched against other rooms' type and id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_adjacent: Vec<String>,
    /// Opaque labels carried through untouched.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fixtures: Vec<String>,
}

/// Explicit size in meters; either dimension may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeSpec {
    #[serde(rename = "width_m", alias = "width", default)]
    pub width: Option<f64>,
    #[serde(rename = "height_m", alias = "height", default)]
    pub height: Option<f64>,
}

/// An explicit door between two rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSpec {
    #[serde(alias = "from")]
    pub from_room: String,
    #[serde(alias = "to")]
    pub to_room: String,
    #[serde(default = "default_door_count")]
    pub count: u32,
}

fn default_door_count() -> u32 {
    1
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Plan {
    pub fn new(rooms: Vec<RoomSpec>) -> Self {
        Self {
            rooms,
            doors: Vec::new(),
            notes: None,
        }
    }

    pub fn with_doors(mut self, doors: Vec<DoorSpec>) -> Self {
        self.doors = doors;
        self
    }

    /// Parse a plan from JSON. Does not validate; call [`Plan::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject plans the core cannot lay out: no rooms, empty or duplicate ids.
    pub fn validate(&self) -> Result<()> {
        if self.rooms.is_empty() {
            return Err(Error::InvalidPlan("plan has no rooms".into()));
        }
        let mut seen = HashSet::new();
        for (i, room) in self.rooms.iter().enumerate() {
            if room.id.trim().is_empty() {
                return Err(Error::InvalidPlan(format!("room #{} has an empty id", i)));
            }
            if !seen.insert(room.id.as_str()) {
                return Err(Error::InvalidPlan(format!(
                    "duplicate room id '{}'",
                    room.id
                )));
            }
        }
        Ok(())
    }

    pub fn room(&self, id: &str) -> Option<&RoomSpec> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Door endpoints in declaration order, skipping doors with an empty end.
    pub fn door_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.doors
            .iter()
            .filter(|d| !d.from_room.is_empty() && !d.to_room.is_empty())
            .map(|d| (d.from_room.as_str(), d.to_room.as_str()))
    }
}

impl RoomSpec {
    pub fn new(id: impl Into<String>, room_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_type: room_type.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(SizeSpec {
            width: Some(width),
            height: Some(height),
        });
        self
    }

    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    pub fn adjacent_to(mut self, tokens: &[&str]) -> Self {
        self.preferred_adjacent = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_fixtures(mut self, fixtures: &[&str]) -> Self {
        self.fixtures = fixtures.iter().map(|f| f.to_string()).collect();
        self
    }
}

impl DoorSpec {
    pub fn new(from_room: impl Into<String>, to_room: impl Into<String>) -> Self {
        Self {
            from_room: from_room.into(),
            to_room: to_room.into(),
            count: 1,
        }
    }
}
