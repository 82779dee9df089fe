//! Dijkstra over the grid graph with a pluggable edge weight.
//!
//! Ties in the frontier are broken by insertion order, so for equal-cost
//! routes the first-discovered one wins and results are reproducible.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::graph::{Edge, Graph, NodeId};

/// A route and its cost. `cost` is `None` when the goal is unreachable,
/// in which case `path` is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<NodeId>,
    pub cost: Option<u32>,
}

impl PathResult {
    fn unreachable() -> Self {
        Self::default()
    }

    /// Was the goal reached?
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.cost.is_some()
    }
}

/// Cheapest route from `start` to `goal` with edge costs given by `weight`.
pub fn shortest_path(graph: &Graph, start: NodeId, goal: NodeId, weight: impl Fn(&Edge) -> u32) -> PathResult {
    let n = graph.node_count();
    if start >= n || goal >= n {
        return PathResult::unreachable();
    }

    let mut dist: Vec<Option<u32>> = vec![None; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut done = vec![false; n];
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist[start] = Some(0);
    frontier.push(Reverse((0u32, seq, start)));

    while let Some(Reverse((cost, _, node))) = frontier.pop() {
        if done[node] {
            continue;
        }
        done[node] = true;
        if node == goal {
            break;
        }

        for (next, edge) in graph.neighbors(node) {
            let candidate = cost + weight(edge);
            if dist[next].map_or(true, |d| candidate < d) {
                dist[next] = Some(candidate);
                prev[next] = Some(node);
                seq += 1;
                frontier.push(Reverse((candidate, seq, next)));
            }
        }
    }

    let Some(cost) = dist[goal] else {
        return PathResult::unreachable();
    };

    let mut path = vec![goal];
    let mut at = goal;
    while let Some(p) = prev[at] {
        path.push(p);
        at = p;
    }
    path.reverse();
    debug_assert_eq!(path.first(), Some(&start));

    PathResult { path, cost: Some(cost) }
}
