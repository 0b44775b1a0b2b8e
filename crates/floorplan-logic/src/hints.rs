//! Furniture and window placement hints.
//!
//! Hints come from an external suggestion service as JSON, often wrapped
//! in prose. This module parses them, checks them against a finished
//! layout, and can produce a deterministic fallback set when the service
//! is unavailable. All coordinates are absolute layout coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{shared_wall, Rect, Severity, ValidationIssue, Wall};
use crate::layout::Layout;
use crate::plan::{null_as_default, Plan};

/// Containment slack (m) for furniture and window spans.
pub const HINT_TOLERANCE: f64 = 1e-6;

/// A furniture item inside one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureHint {
    pub room_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// `[x, y, width, height]` in meters.
    pub rect: [f64; 4],
    #[serde(default)]
    pub rotation_deg: f64,
}

impl FurnitureHint {
    pub fn new(room_id: impl Into<String>, kind: impl Into<String>, rect: Rect) -> Self {
        Self {
            room_id: room_id.into(),
            kind: kind.into(),
            rect: [rect.x, rect.y, rect.width, rect.height],
            rotation_deg: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        let [x, y, width, height] = self.rect;
        Rect::new(x, y, width, height)
    }
}

/// A window on one wall of a room. `offset_m` runs from the wall's min-x
/// (north/south) or min-y (east/west) end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowHint {
    pub room_id: String,
    pub wall: Wall,
    pub offset_m: f64,
    pub width_m: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementHints {
    #[serde(default, deserialize_with = "null_as_default")]
    pub furniture: Vec<FurnitureHint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub windows: Vec<WindowHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlacementHints {
    /// Parse the first JSON object found in a free-text response.
    pub fn from_response(text: &str) -> Result<Self> {
        let object = extract_json_object(text).ok_or_else(|| {
            Error::MalformedHints("no balanced JSON object in response".to_string())
        })?;
        Ok(serde_json::from_str(object)?)
    }

    pub fn is_empty(&self) -> bool {
        self.furniture.is_empty() && self.windows.is_empty()
    }
}

/// The first balanced `{…}` in `text`. Braces inside JSON strings are not
/// counted.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Validation ──────────────────────────────────────────────────────────

/// Issues for one furniture hint.
pub fn furniture_issues(layout: &Layout, hint: &FurnitureHint) -> Vec<ValidationIssue> {
    let Some(room) = layout.get(&hint.room_id) else {
        return vec![ValidationIssue::error(
            "furniture",
            format!("{} references unknown room '{}'", hint.kind, hint.room_id),
        )];
    };
    let rect = hint.rect();
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return vec![ValidationIssue::error(
            "furniture",
            format!(
                "{} in '{}' has non-positive size {}×{}",
                hint.kind, hint.room_id, rect.width, rect.height
            ),
        )];
    }
    if !room.contains(&rect, HINT_TOLERANCE) {
        return vec![ValidationIssue::error(
            "furniture",
            format!(
                "{} at ({:.2},{:.2}) {}×{} extends outside room '{}'",
                hint.kind, rect.x, rect.y, rect.width, rect.height, hint.room_id
            ),
        )];
    }
    Vec::new()
}

/// Absolute `(start, end)` of a window along its wall axis.
fn window_span(room: &Rect, hint: &WindowHint) -> (f64, f64) {
    let origin = match hint.wall {
        Wall::North | Wall::South => room.x,
        Wall::East | Wall::West => room.y,
    };
    let start = origin + hint.offset_m;
    (start, start + hint.width_m)
}

/// True if another room covers the whole window span on that wall.
fn opens_into_room(layout: &Layout, room_id: &str, room: &Rect, hint: &WindowHint) -> bool {
    let (start, end) = window_span(room, hint);
    layout
        .iter()
        .filter(|(id, _)| id.as_str() != room_id)
        .filter_map(|(_, other)| shared_wall(room, other))
        .any(|shared| {
            shared.wall == hint.wall
                && shared.start <= start + HINT_TOLERANCE
                && end <= shared.end + HINT_TOLERANCE
        })
}

/// Issues for one window hint.
pub fn window_issues(layout: &Layout, hint: &WindowHint) -> Vec<ValidationIssue> {
    let Some(room) = layout.get(&hint.room_id) else {
        return vec![ValidationIssue::error(
            "window",
            format!("Window references unknown room '{}'", hint.room_id),
        )];
    };
    let wall_length = room.wall_length(hint.wall);
    if !(hint.width_m > 0.0) || !(hint.offset_m >= 0.0) {
        return vec![ValidationIssue::error(
            "window",
            format!(
                "Window on {:?} wall of '{}' has offset {} and width {}",
                hint.wall, hint.room_id, hint.offset_m, hint.width_m
            ),
        )];
    }
    if hint.offset_m + hint.width_m > wall_length + HINT_TOLERANCE {
        return vec![ValidationIssue::error(
            "window",
            format!(
                "Window on {:?} wall of '{}' ends at {:.2} m, wall is {:.2} m",
                hint.wall,
                hint.room_id,
                hint.offset_m + hint.width_m,
                wall_length
            ),
        )];
    }
    if opens_into_room(layout, &hint.room_id, room, hint) {
        return vec![ValidationIssue::warning(
            "window",
            format!(
                "Window on {:?} wall of '{}' faces an adjacent room",
                hint.wall, hint.room_id
            ),
        )];
    }
    Vec::new()
}

/// Run all hint checks and return combined results.
pub fn validate_hints(layout: &Layout, hints: &PlacementHints) -> Vec<ValidationIssue> {
    let mut all = Vec::new();
    for hint in &hints.furniture {
        all.extend(furniture_issues(layout, hint));
    }
    for hint in &hints.windows {
        all.extend(window_issues(layout, hint));
    }
    all
}

fn has_error(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Drop every hint that has an error-severity issue. Warnings are kept.
pub fn retain_valid_hints(layout: &Layout, hints: &mut PlacementHints) {
    let before = hints.furniture.len() + hints.windows.len();
    hints
        .furniture
        .retain(|h| !has_error(&furniture_issues(layout, h)));
    hints.windows.retain(|h| !has_error(&window_issues(layout, h)));
    let dropped = before - hints.furniture.len() - hints.windows.len();
    if dropped > 0 {
        log::warn!("hints: dropped {} invalid hint(s)", dropped);
    }
}

// ── Fallback ────────────────────────────────────────────────────────────

/// Furniture for one room, relative to its minimum corner.
fn fallback_furniture(room_type: &str, width: f64, height: f64) -> Vec<(&'static str, Rect)> {
    if room_type.contains("living") {
        let (sw, sh) = (1.6, 0.8);
        let x = 0.5 * (width - sw);
        let y = 0.45 * (height - sh);
        vec![
            ("sofa", Rect::new(x, y, sw, sh)),
            ("table", Rect::new(x + sw + 0.25, y + (sh - 0.6) / 2.0, 0.9, 0.6)),
        ]
    } else if room_type.contains("bed") {
        let (bw, bh) = (2.0, 1.6);
        let x = ((width - bw) / 6.0).max(0.2);
        let y = ((height - bh) / 6.0).max(0.2);
        vec![("bed", Rect::new(x, y, bw, bh))]
    } else if room_type.contains("kitchen") {
        vec![
            ("stove", Rect::new(0.2, 0.2, 0.8, 0.6)),
            ("sink", Rect::new(1.15, 0.2, 0.8, 0.5)),
        ]
    } else if room_type.contains("bath") {
        vec![
            ("toilet", Rect::new(0.3, 0.3, 0.7, 0.6)),
            ("sink", Rect::new(0.3, 1.1, 0.6, 0.4)),
        ]
    } else {
        Vec::new()
    }
}

/// Window `(wall, offset, width)` for one room.
fn fallback_window(room_type: &str, width: f64, height: f64) -> Option<(Wall, f64, f64)> {
    if room_type.contains("living") {
        Some((Wall::North, (width * 0.2).max(0.2), (width * 0.5).min(1.6)))
    } else if room_type.contains("bed") {
        Some((Wall::North, 0.3, (width * 0.4).min(1.2)))
    } else if room_type.contains("kitchen") {
        Some((Wall::East, 0.3, (height * 0.4).min(1.0)))
    } else if room_type.contains("bath") {
        Some((Wall::North, 0.2, 0.6))
    } else {
        None
    }
}

/// Deterministic hints for a synthesized layout.
///
/// Living rooms get a sofa, a table and a north window; bedrooms a bed and
/// a north window; kitchens a stove, a sink and an east window; bathrooms a
/// toilet, a sink and a small north window. Anything that would not pass
/// [`validate_hints`] without issues is left out, so the result always
/// validates cleanly.
pub fn fallback_hints(plan: &Plan, layout: &Layout) -> PlacementHints {
    let mut hints = PlacementHints {
        notes: Some("fallback deterministic placements".to_string()),
        ..PlacementHints::default()
    };

    for spec in &plan.rooms {
        let Some(room) = layout.get(&spec.id) else {
            continue;
        };
        let room_type = spec.room_type.to_lowercase();

        for (kind, local) in fallback_furniture(&room_type, room.width, room.height) {
            let hint = FurnitureHint::new(
                spec.id.clone(),
                kind,
                local.moved_to(room.x + local.x, room.y + local.y),
            );
            if furniture_issues(layout, &hint).is_empty() {
                hints.furniture.push(hint);
            } else {
                log::debug!("hints: {} does not fit in '{}'", kind, spec.id);
            }
        }

        if let Some((wall, offset_m, width_m)) = fallback_window(&room_type, room.width, room.height) {
            let hint = WindowHint {
                room_id: spec.id.clone(),
                wall,
                offset_m,
                width_m,
            };
            if window_issues(layout, &hint).is_empty() {
                hints.windows.push(hint);
            } else {
                log::debug!("hints: no {:?} window for '{}'", wall, spec.id);
            }
        }
    }
    hints
}
