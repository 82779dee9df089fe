//! Grid graph with partially hidden edge weights.
//!
//! Nodes are numbered row-major. Edges are generated per node in row-major
//! order, right neighbour first, then the one below; that order is also the
//! adjacency order Dijkstra relaxes in.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{FogConfig, IntRange, RandomSource};

/// Node identifier (row-major index).
pub type NodeId = usize;

/// Bounding-range lengths for hidden edges and their relative odds.
const BOUND_LENGTHS: [u32; 4] = [2, 3, 4, 5];
const BOUND_LENGTH_ODDS: [u32; 4] = [1, 3, 3, 1];

/// Publicly known range for a hidden edge weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightBounds {
    pub min: u32,
    pub max: u32,
}

impl WeightBounds {
    /// Does the range contain `weight`?
    #[must_use]
    pub const fn contains(self, weight: u32) -> bool {
        self.min <= weight && weight <= self.max
    }

    /// Draw a range containing `weight`, clipped to `global`.
    ///
    /// Draws a length from `BOUND_LENGTHS`, then where `weight` sits inside it.
    pub fn around<R: RandomSource>(weight: u32, global: IntRange, rng: &mut R) -> Self {
        let length = rng
            .choose_weighted(&BOUND_LENGTH_ODDS)
            .map_or(BOUND_LENGTHS[1], |i| BOUND_LENGTHS[i]);
        let offset = rng.gen_range_inclusive(0..=length - 1);
        let low = i64::from(weight) - i64::from(offset);
        let high = low + i64::from(length) - 1;
        let clip = |x: i64| x.clamp(i64::from(global.min), i64::from(global.max)) as u32;
        Self {
            min: clip(low),
            max: clip(high),
        }
    }
}

/// An undirected weighted edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: usize,
    pub u: NodeId,
    pub v: NodeId,
    /// True weight, known to the engine from generation.
    pub weight: u32,
    pub revealed: bool,
    /// Range shown while the edge is hidden.
    pub bounds: WeightBounds,
}

impl Edge {
    /// Create an edge, checking that `bounds` contains `weight`.
    ///
    /// # Panics
    ///
    /// If the bounds do not contain the weight.
    pub fn new(id: usize, u: NodeId, v: NodeId, weight: u32, revealed: bool, bounds: WeightBounds) -> Self {
        assert!(
            bounds.contains(weight),
            "Edge {}-{} bounds {}..={} do not contain weight {}",
            u,
            v,
            bounds.min,
            bounds.max,
            weight
        );
        Self {
            id,
            u,
            v,
            weight,
            revealed,
            bounds,
        }
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    #[must_use]
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.u == node {
            Some(self.v)
        } else if self.v == node {
            Some(self.u)
        } else {
            None
        }
    }

    /// The weight a player may see.
    #[must_use]
    pub fn visible_weight(&self) -> Option<u32> {
        self.revealed.then_some(self.weight)
    }

    /// Optimistic weight: true if revealed, lower bound otherwise.
    #[must_use]
    pub fn optimistic_weight(&self) -> u32 {
        if self.revealed {
            self.weight
        } else {
            self.bounds.min
        }
    }

    /// What a player may see of this edge.
    #[must_use]
    pub fn view(&self) -> EdgeView {
        EdgeView {
            id: self.id,
            u: self.u,
            v: self.v,
            weight: self.visible_weight(),
            bounds: self.bounds,
        }
    }
}

/// Player-facing edge: the true weight only once revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: usize,
    pub u: NodeId,
    pub v: NodeId,
    /// `None` while the edge is hidden.
    pub weight: Option<u32>,
    pub bounds: WeightBounds,
}

impl EdgeView {
    /// Has the weight been revealed?
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.weight.is_some()
    }
}

/// Weighted undirected graph over `node_count` nodes.
///
/// Edges live in a persistent vector so cloning a graph is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    node_count: usize,
    edges: Vector<Edge>,
    adjacency: Vec<SmallVec<[usize; 4]>>,
}

impl Graph {
    /// Build a graph from explicit edges. Edge ids must equal positions.
    pub fn from_edges(node_count: usize, edges: impl IntoIterator<Item = Edge>) -> Self {
        let edges: Vector<Edge> = edges.into_iter().collect();
        let mut adjacency = vec![SmallVec::new(); node_count];
        for (index, edge) in edges.iter().enumerate() {
            assert_eq!(edge.id, index, "Edge ids must match their positions");
            assert!(edge.u < node_count && edge.v < node_count, "Edge {} leaves the graph", index);
            assert_ne!(edge.u, edge.v, "Self-loop on node {}", edge.u);
            adjacency[edge.u].push(index);
            adjacency[edge.v].push(index);
        }
        Self {
            node_count,
            edges,
            adjacency,
        }
    }

    /// Generate a `rows × cols` grid with random weights and fog.
    ///
    /// Per edge the draws are: weight, revealed flag, bound length, offset.
    pub fn grid<R: RandomSource>(config: &FogConfig, rng: &mut R) -> Self {
        let (rows, cols) = (config.rows, config.cols);
        let mut edges = Vec::with_capacity(2 * rows * cols);
        let mut add = |u: NodeId, v: NodeId, rng: &mut R| {
            let weight = rng.gen_range_inclusive(config.weight_range.as_range());
            let revealed = rng.gen_bool(config.reveal_probability);
            let bounds = WeightBounds::around(weight, config.weight_range, rng);
            edges.push(Edge::new(edges.len(), u, v, weight, revealed, bounds));
        };

        for r in 0..rows {
            for c in 0..cols {
                let u = r * cols + c;
                if c + 1 < cols {
                    add(u, u + 1, rng);
                }
                if r + 1 < rows {
                    add(u, u + cols, rng);
                }
            }
        }

        Self::from_edges(rows * cols, edges)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// All edges in id order.
    #[must_use]
    pub fn edges(&self) -> &Vector<Edge> {
        &self.edges
    }

    /// Look up an edge.
    #[must_use]
    pub fn edge(&self, id: usize) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Neighbours of `node` with the connecting edge, in adjacency order.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(move |&id| {
                let edge = &self.edges[id];
                edge.other(node).map(|other| (other, edge))
            })
    }

    /// The edge joining `a` and `b`, if any.
    #[must_use]
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.neighbors(a).find(|&(n, _)| n == b).map(|(_, e)| e)
    }

    /// Mark an edge revealed. Returns `true` if it was hidden.
    pub fn reveal(&mut self, id: usize) -> bool {
        match self.edges.get_mut(id) {
            Some(edge) if !edge.revealed => {
                edge.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Reveal every edge.
    pub fn reveal_all(&mut self) {
        for edge in self.edges.iter_mut() {
            edge.revealed = true;
        }
    }

    /// Ids of edges still hidden, in id order.
    #[must_use]
    pub fn hidden_edges(&self) -> Vec<usize> {
        self.edges.iter().filter(|e| !e.revealed).map(|e| e.id).collect()
    }

    /// Cost of `path` under `weight`. `None` if consecutive nodes are not joined.
    pub fn path_cost(&self, path: &[NodeId], weight: impl Fn(&Edge) -> u32) -> Option<u32> {
        path.windows(2)
            .map(|pair| self.edge_between(pair[0], pair[1]).map(&weight))
            .sum()
    }
}
