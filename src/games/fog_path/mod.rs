//! Fog-of-war shortest path.
//!
//! - A 3x3 grid with integer edge weights 1-9, a quarter of them visible
//! - Hidden edges show a small range known to contain the weight
//! - The player walks from the top-left to the bottom-right corner and is
//!   scored against Dijkstra on the true weights

mod dijkstra;
mod engine;
mod graph;

pub use dijkstra::{shortest_path, PathResult};
pub use engine::{FogEngine, FogSnapshot, WalkStep};
pub use graph::{Edge, EdgeView, Graph, NodeId, WeightBounds};
