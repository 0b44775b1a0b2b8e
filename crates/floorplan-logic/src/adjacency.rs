//! Adjacency graph over room ids.
//!
//! Edges come from two sources: fuzzy preference matching (a token matches
//! a room when it is a case-insensitive substring of that room's type or
//! id) and explicit doors. Substring matching is deliberately loose: the
//! token "kitchen" links to both a "Kitchen" and a "kitchenette", and "bed"
//! links to every bedroom. Callers relying on exact matching must filter
//! the plan themselves.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::plan::{Plan, RoomSpec};
use crate::sizing::ResolvedRoom;

/// An ordered `(a, b)` room-id pair the optimizer should pull together.
pub type AdjacencyPair = (String, String);

/// True if `token` occurs in the room's type or id, ignoring case.
pub fn token_matches(token: &str, room: &RoomSpec) -> bool {
    let token = token.to_lowercase();
    room.room_type.to_lowercase().contains(&token) || room.id.to_lowercase().contains(&token)
}

/// Every `(room, other)` index pair produced by preference tokens, in plan
/// order: room, then token, then candidate. A room never matches itself.
fn preference_matches(plan: &Plan) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    for (i, room) in plan.rooms.iter().enumerate() {
        for token in &room.preferred_adjacent {
            for (j, other) in plan.rooms.iter().enumerate() {
                if i != j && token_matches(token, other) {
                    matches.push((i, j));
                }
            }
        }
    }
    matches
}

/// Undirected simple graph, one node per plan room, nodes in plan order.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    /// Neighbor lists in edge insertion order.
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Build the graph from preference tokens and explicit doors.
    ///
    /// Doors naming an unknown room, or a room to itself, are skipped.
    pub fn build(plan: &Plan) -> Self {
        let ids: Vec<String> = plan.rooms.iter().map(|r| r.id.clone()).collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let mut graph = Self {
            neighbors: vec![Vec::new(); ids.len()],
            ids,
            index,
        };

        for (i, j) in preference_matches(plan) {
            graph.add_edge(i, j);
        }
        for (from, to) in plan.door_pairs() {
            if let (Some(i), Some(j)) = (graph.index_of(from), graph.index_of(to)) {
                graph.add_edge(i, j);
            }
        }
        graph
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.neighbors[a].contains(&b) {
            return;
        }
        self.neighbors[a].push(b);
        self.neighbors[b].push(a);
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors[node].len()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.neighbors[i].contains(&j),
            _ => false,
        }
    }

    /// Breadth-first order from `root`, then every node the root cannot
    /// reach, each remaining component traversed from its first node in
    /// plan order. Every node appears exactly once.
    pub fn traversal_order(&self, root: usize) -> Vec<usize> {
        let mut visited = vec![false; self.ids.len()];
        let mut order = Vec::with_capacity(self.ids.len());
        let starts = std::iter::once(root).chain(0..self.ids.len());

        for start in starts {
            if start >= self.ids.len() || visited[start] {
                continue;
            }
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(start);
            while let Some(current) = queue.pop_front() {
                order.push(current);
                for &next in &self.neighbors[current] {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        order
    }
}

/// Pick the placement seed: the first room whose type mentions "living",
/// otherwise the largest resolved area (first one wins ties).
pub fn select_root(rooms: &[ResolvedRoom]) -> Option<usize> {
    if let Some(i) = rooms
        .iter()
        .position(|r| r.room_type.to_lowercase().contains("living"))
    {
        return Some(i);
    }
    let mut best: Option<(usize, f64)> = None;
    for (i, room) in rooms.iter().enumerate() {
        match best {
            Some((_, area)) if room.area() <= area => {}
            _ => best = Some((i, room.area())),
        }
    }
    best.map(|(i, _)| i)
}

/// Adjacency pairs for the cost model: preference matches followed by door
/// pairs, duplicates removed keeping the first occurrence.
///
/// Door pairs are kept even when an id is unknown; the cost model skips
/// pairs it cannot resolve.
pub fn adjacency_pairs(plan: &Plan) -> Vec<AdjacencyPair> {
    let preferences = preference_matches(plan)
        .into_iter()
        .map(|(i, j)| (plan.rooms[i].id.clone(), plan.rooms[j].id.clone()));
    let doors = plan
        .door_pairs()
        .map(|(a, b)| (a.to_string(), b.to_string()));
    dedupe_pairs(preferences.chain(doors))
}

/// Remove duplicate pairs, keeping the first occurrence of each.
pub fn dedupe_pairs(pairs: impl IntoIterator<Item = AdjacencyPair>) -> Vec<AdjacencyPair> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}
