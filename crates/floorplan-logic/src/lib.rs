//! Pure floor plan layout synthesis.
//!
//! This crate turns an abstract room plan (ids, types, sizes, adjacency
//! preferences, doors) into a non-overlapping arrangement of axis-aligned
//! rectangles. Functions take plain data and return results, so any host
//! can drive them, including the headless simtest harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`adjacency`] | Fuzzy adjacency graph, root selection, adjacency pairs |
//! | [`anneal`] | Simulated annealing with periodic snap sweeps |
//! | [`config`] | Tunables for sizing, placement, annealing, normalization |
//! | [`cost`] | Overlap / adjacency / area / aspect scoring |
//! | [`doors`] | Door positions on shared walls |
//! | [`error`] | Crate error type |
//! | [`geometry`] | Rectangles, walls, layout validation |
//! | [`hints`] | Furniture and window hint validation, fallback hints |
//! | [`layout`] | Room id → rectangle map |
//! | [`normalize`] | Shift a layout to a fixed margin from the origin |
//! | [`pipeline`] | End-to-end synthesis |
//! | [`placer`] | Breadth-first constructive placement |
//! | [`plan`] | Plan / room / door input model and JSON boundary |
//! | [`sizing`] | Room size resolution from explicit, minimum or default sizes |

pub mod adjacency;
pub mod anneal;
pub mod config;
pub mod cost;
pub mod doors;
pub mod error;
pub mod geometry;
pub mod hints;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod placer;
pub mod plan;
pub mod sizing;

pub use error::{Error, Result};
pub use geometry::Rect;
pub use layout::Layout;
pub use pipeline::{synthesize, Synthesis};
pub use plan::Plan;
