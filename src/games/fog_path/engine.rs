//! Fog-of-war shortest-path engine.
//!
//! The player grows a walk from the start node (top-left) towards the goal
//! (bottom-right). Walking an edge reveals its weight. Once the walk is
//! committed every edge is revealed and the walk is scored against the
//! optimal route.
//!
//! Two rule sets share this engine, chosen by `FogConfig`:
//!
//! - **Expedition**: no backtracking, no cards, commit on reaching the goal.
//! - **Classic**: backtrack to any earlier node, spend reveal cards, commit
//!   explicitly once the walk ends at the goal.
//!
//! Without backtracking a walk can paint itself into a corner: every
//! neighbour of its last node is already on the walk. The round is then
//! stuck; `extend_walk` reports `WalkStep::DeadEnd` and the snapshot carries
//! `stuck` until `new_game`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::dijkstra::{shortest_path, PathResult};
use super::graph::{Edge, EdgeView, Graph, NodeId};
use crate::core::{CommandResult, ConfigError, FogConfig, GameRng, RandomSource, Rejection};
use crate::rules::{Epoch, GameEngine, GameResult};

/// Outcome of a successful `extend_walk`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkStep {
    /// The walk grew by one node.
    Moved,
    /// The walk reached the goal and awaits `commit`.
    AtGoal,
    /// The walk reached the goal and was committed.
    Committed,
    /// The walk grew, but every neighbour of the new node is already on it
    /// and backtracking is off. The round can no longer reach the goal.
    DeadEnd,
}

/// Read-only fog-path state.
///
/// Edges are player views: hidden weights are left out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FogSnapshot {
    pub epoch: Epoch,
    pub rows: usize,
    pub cols: usize,
    pub start: NodeId,
    pub goal: NodeId,
    pub edges: Vec<EdgeView>,
    pub walk: Vec<NodeId>,
    pub walk_cost: Option<u32>,
    pub committed: bool,
    pub allow_backtrack: bool,
    /// The walk can neither grow nor commit.
    pub stuck: bool,
    /// `None` when cards are disabled.
    pub cards_left: Option<u32>,
    /// Optimal route, known once committed.
    pub optimal: Option<PathResult>,
}

/// Shortest-path game on a partially hidden grid.
#[derive(Clone, Debug)]
pub struct FogEngine<R: RandomSource = GameRng> {
    config: FogConfig,
    rng: R,
    graph: Graph,
    walk: Vec<NodeId>,
    committed: bool,
    cards_left: Option<u32>,
    optimal: Option<PathResult>,
    epoch: Epoch,
}

impl FogEngine<GameRng> {
    /// Create an engine with a seeded ChaCha stream and generate the first grid.
    pub fn new(config: FogConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, GameRng::new(seed))
    }
}

impl<R: RandomSource> FogEngine<R> {
    /// Create an engine drawing from `rng` and generate the first grid.
    pub fn with_rng(config: FogConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            graph: Graph::from_edges(config.node_count(), []),
            walk: Vec::new(),
            committed: false,
            cards_left: config.card_budget,
            optimal: None,
            epoch: Epoch::default(),
            config,
            rng,
        };
        engine.new_game();
        Ok(engine)
    }

    /// Create an engine that starts on a fixed graph.
    ///
    /// Later `new_game` calls generate grids as usual.
    pub fn with_graph(config: FogConfig, rng: R, graph: Graph) -> Result<Self, ConfigError> {
        if graph.node_count() != config.node_count() {
            return Err(ConfigError::invalid(
                "graph",
                format!(
                    "expected {} nodes for a {}x{} grid, got {}",
                    config.node_count(),
                    config.rows,
                    config.cols,
                    graph.node_count()
                ),
            ));
        }
        let mut engine = Self::with_rng(config, rng)?;
        engine.graph = graph;
        Ok(engine)
    }

    /// Start node.
    #[must_use]
    pub fn start(&self) -> NodeId {
        0
    }

    /// Goal node.
    #[must_use]
    pub fn goal(&self) -> NodeId {
        self.graph.node_count().saturating_sub(1)
    }

    // === Walk ===

    /// Append `node` to the walk.
    ///
    /// The node must be adjacent to the walk's last node and not already on
    /// the walk. The connecting edge is revealed.
    pub fn extend_walk(&mut self, node: NodeId) -> CommandResult<WalkStep> {
        self.ensure_open()?;
        if node >= self.graph.node_count() {
            return self.reject(Rejection::UnknownNode { node });
        }
        if self.walk.contains(&node) {
            return self.reject(Rejection::AlreadyVisited { node });
        }
        let Some(edge) = self.graph.edge_between(self.tail(), node).map(|e| e.id) else {
            return self.reject(Rejection::NotAdjacent { node });
        };

        self.walk.push(node);
        self.graph.reveal(edge);
        debug!(node, edge, walk = ?self.walk, "walk extended");

        if node != self.goal() {
            if self.is_stuck() {
                info!(walk = ?self.walk, walk_cost = ?self.walk_cost(), "fog walk stuck");
                return Ok(WalkStep::DeadEnd);
            }
            return Ok(WalkStep::Moved);
        }
        if self.config.auto_commit {
            self.seal();
            Ok(WalkStep::Committed)
        } else {
            Ok(WalkStep::AtGoal)
        }
    }

    /// Cut the walk back to an earlier node.
    pub fn backtrack_to(&mut self, node: NodeId) -> CommandResult {
        self.ensure_open()?;
        if !self.config.allow_backtrack {
            return self.reject(Rejection::BacktrackDisabled);
        }
        let earlier = &self.walk[..self.walk.len().saturating_sub(1)];
        let Some(index) = earlier.iter().position(|&n| n == node) else {
            return self.reject(Rejection::NotOnWalk { node });
        };
        self.walk.truncate(index + 1);
        debug!(node, walk = ?self.walk, "walk backtracked");
        Ok(())
    }

    /// Spend a card to reveal up to `edges_per_card` hidden edges.
    ///
    /// Returns the ids of the edges revealed, which may be fewer than asked
    /// (or none) when little is left hidden.
    pub fn draw_card(&mut self) -> CommandResult<Vec<usize>> {
        self.ensure_open()?;
        match self.cards_left {
            None => return self.reject(Rejection::CardsDisabled),
            Some(0) => return self.reject(Rejection::NoCardsLeft),
            Some(n) => self.cards_left = Some(n - 1),
        }
        let revealed = self.reveal_random(self.config.edges_per_card);
        debug!(?revealed, cards_left = ?self.cards_left, "card drawn");
        Ok(revealed)
    }

    /// Commit a walk that ends at the goal. Returns the optimal route.
    pub fn commit(&mut self) -> CommandResult<PathResult> {
        self.ensure_open()?;
        if self.tail() != self.goal() {
            return self.reject(Rejection::GoalNotReached);
        }
        Ok(self.seal())
    }

    // === Solvers ===

    /// Best route under the true weights.
    #[must_use]
    pub fn solve_optimal(&self) -> PathResult {
        shortest_path(&self.graph, self.start(), self.goal(), |e| e.weight)
    }

    /// Best route assuming every hidden edge costs its lower bound.
    #[must_use]
    pub fn solve_risky(&self) -> PathResult {
        shortest_path(&self.graph, self.start(), self.goal(), Edge::optimistic_weight)
    }

    /// True cost of the walk so far.
    #[must_use]
    pub fn walk_cost(&self) -> Option<u32> {
        self.graph.path_cost(&self.walk, |e| e.weight)
    }

    // === Accessors ===

    /// Current graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current walk, starting at the start node.
    #[must_use]
    pub fn walk(&self) -> &[NodeId] {
        &self.walk
    }

    /// Is the walk frozen?
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Is the walk stuck short of the goal?
    ///
    /// Only possible without backtracking: the last node has no neighbour
    /// left off the walk.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        let tail = self.tail();
        !self.committed
            && !self.config.allow_backtrack
            && tail != self.goal()
            && self.graph.neighbors(tail).all(|(next, _)| self.walk.contains(&next))
    }

    /// Cards remaining, `None` when cards are disabled.
    #[must_use]
    pub fn cards_left(&self) -> Option<u32> {
        self.cards_left
    }

    /// Optimal route, known once committed.
    #[must_use]
    pub fn optimal(&self) -> Option<&PathResult> {
        self.optimal.as_ref()
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &FogConfig {
        &self.config
    }

    // === Internals ===

    fn tail(&self) -> NodeId {
        self.walk.last().copied().unwrap_or(self.start())
    }

    fn ensure_open(&self) -> CommandResult {
        if self.committed {
            return self.reject(Rejection::WalkCommitted);
        }
        Ok(())
    }

    fn reject<T>(&self, rejection: Rejection) -> CommandResult<T> {
        trace!(%rejection, walk = ?self.walk, "fog command rejected");
        Err(rejection)
    }

    /// Reveal up to `count` hidden edges chosen at random.
    fn reveal_random(&mut self, count: usize) -> Vec<usize> {
        let mut hidden = self.graph.hidden_edges();
        let mut revealed = Vec::with_capacity(count.min(hidden.len()));
        while revealed.len() < count && !hidden.is_empty() {
            let id = hidden.remove(self.rng.gen_index(hidden.len()));
            self.graph.reveal(id);
            revealed.push(id);
        }
        revealed
    }

    /// Freeze the walk, lift the fog and compute the optimal route.
    fn seal(&mut self) -> PathResult {
        self.committed = true;
        self.graph.reveal_all();
        let optimal = self.solve_optimal();
        info!(
            walk = ?self.walk,
            walk_cost = ?self.walk_cost(),
            optimal_cost = ?optimal.cost,
            "fog walk committed"
        );
        self.optimal = Some(optimal.clone());
        optimal
    }
}

impl<R: RandomSource> GameEngine for FogEngine<R> {
    type Snapshot = FogSnapshot;

    fn new_game(&mut self) {
        self.graph = Graph::grid(&self.config, &mut self.rng);
        self.reveal_random(self.config.initial_reveals);
        self.walk = vec![self.start()];
        self.committed = false;
        self.cards_left = self.config.card_budget;
        self.optimal = None;
        self.epoch = self.epoch.next();
        info!(
            epoch = self.epoch.0,
            hidden = self.graph.hidden_edges().len(),
            "fog grid generated"
        );
    }

    fn snapshot(&self) -> FogSnapshot {
        FogSnapshot {
            epoch: self.epoch,
            rows: self.config.rows,
            cols: self.config.cols,
            start: self.start(),
            goal: self.goal(),
            edges: self.graph.edges().iter().map(Edge::view).collect(),
            walk: self.walk.clone(),
            walk_cost: self.walk_cost(),
            committed: self.committed,
            allow_backtrack: self.config.allow_backtrack,
            stuck: self.is_stuck(),
            cards_left: self.cards_left,
            optimal: self.optimal.clone(),
        }
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn result(&self) -> Option<GameResult> {
        if !self.committed {
            return None;
        }
        let player = self.walk_cost()?;
        let reference = self.optimal.as_ref()?.cost?;
        Some(GameResult::Scored { player, reference })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;
    use crate::games::fog_path::graph::WeightBounds;

    const GRID_ENDS: [(NodeId, NodeId); 12] = [
        (0, 1),
        (0, 3),
        (1, 2),
        (1, 4),
        (2, 5),
        (3, 4),
        (3, 6),
        (4, 5),
        (4, 7),
        (5, 8),
        (6, 7),
        (7, 8),
    ];

    /// 3x3 grid, all hidden. Cheapest route runs along the top and right
    /// edges: 0-1-2-5-8 for 4.
    fn fixed_grid() -> Graph {
        let weights: [u32; 12] = [1, 5, 1, 9, 1, 5, 5, 5, 5, 1, 5, 5];
        Graph::from_edges(
            9,
            GRID_ENDS.iter().zip(weights).enumerate().map(|(id, (&(u, v), w))| {
                let bounds = WeightBounds {
                    min: w.saturating_sub(1).max(1),
                    max: (w + 1).min(9),
                };
                Edge::new(id, u, v, w, false, bounds)
            }),
        )
    }

    fn engine(config: FogConfig) -> FogEngine<ScriptedRng> {
        FogEngine::with_graph(config, ScriptedRng::default(), fixed_grid()).unwrap()
    }

    fn walk(engine: &mut FogEngine<ScriptedRng>, nodes: &[NodeId]) -> WalkStep {
        let mut step = WalkStep::Moved;
        for &node in nodes {
            step = engine.extend_walk(node).unwrap();
        }
        step
    }

    #[test]
    fn test_walk_legality() {
        let mut engine = engine(FogConfig::expedition());

        assert_eq!(engine.extend_walk(1), Ok(WalkStep::Moved));
        assert_eq!(engine.extend_walk(3), Err(Rejection::NotAdjacent { node: 3 }));
        assert_eq!(engine.extend_walk(0), Err(Rejection::AlreadyVisited { node: 0 }));
        assert_eq!(engine.extend_walk(1), Err(Rejection::AlreadyVisited { node: 1 }));
        assert_eq!(engine.extend_walk(9), Err(Rejection::UnknownNode { node: 9 }));
        assert_eq!(engine.walk(), &[0, 1]);
    }

    #[test]
    fn test_walking_reveals_edges() {
        let mut engine = engine(FogConfig::expedition());
        assert!(!engine.graph().edge(0).unwrap().revealed);

        walk(&mut engine, &[1, 4]);

        assert!(engine.graph().edge(0).unwrap().revealed);
        assert!(engine.graph().edge(3).unwrap().revealed);
        assert_eq!(engine.graph().hidden_edges().len(), 10);
        assert_eq!(engine.walk_cost(), Some(10));
    }

    #[test]
    fn test_auto_commit_triggers_once() {
        let mut engine = engine(FogConfig::expedition());

        assert_eq!(walk(&mut engine, &[1, 2, 5]), WalkStep::Moved);
        assert!(!engine.is_committed());
        assert_eq!(engine.extend_walk(8), Ok(WalkStep::Committed));

        assert!(engine.is_committed());
        assert!(engine.graph().hidden_edges().is_empty());
        let optimal = engine.optimal().cloned().unwrap();
        assert_eq!(optimal.path, vec![0, 1, 2, 5, 8]);
        assert_eq!(optimal.cost, Some(4));
        assert_eq!(engine.result(), Some(GameResult::Scored { player: 4, reference: 4 }));

        // Frozen from here on
        assert_eq!(engine.extend_walk(7), Err(Rejection::WalkCommitted));
        assert_eq!(engine.commit(), Err(Rejection::WalkCommitted));
        assert_eq!(engine.walk(), &[0, 1, 2, 5, 8]);
        assert_eq!(engine.optimal(), Some(&optimal));
    }

    #[test]
    fn test_suboptimal_walk_is_scored() {
        let mut engine = engine(FogConfig::expedition());
        assert_eq!(walk(&mut engine, &[3, 6, 7, 8]), WalkStep::Committed);
        assert_eq!(engine.result(), Some(GameResult::Scored { player: 20, reference: 4 }));
    }

    #[test]
    fn test_expedition_dead_end() {
        let mut engine = engine(FogConfig::expedition());

        // Spiral in: node 1 has 0, 2 and 4 already on the walk
        assert_eq!(walk(&mut engine, &[3, 4, 5, 2]), WalkStep::Moved);
        assert!(!engine.is_stuck());
        assert_eq!(engine.extend_walk(1), Ok(WalkStep::DeadEnd));

        assert!(engine.is_stuck());
        assert!(engine.snapshot().stuck);
        assert_eq!(engine.commit(), Err(Rejection::GoalNotReached));
        assert_eq!(engine.result(), None);
        for node in [0, 2, 4] {
            assert_eq!(engine.extend_walk(node), Err(Rejection::AlreadyVisited { node }));
        }

        engine.new_game();
        assert!(!engine.is_stuck());
    }

    #[test]
    fn test_classic_is_never_stuck() {
        let mut engine = engine(FogConfig::classic());

        assert_eq!(walk(&mut engine, &[3, 4, 5, 2, 1]), WalkStep::Moved);
        assert!(!engine.is_stuck());
        assert!(!engine.snapshot().stuck);
        assert_eq!(engine.backtrack_to(5), Ok(()));
        assert_eq!(engine.extend_walk(8), Ok(WalkStep::AtGoal));
    }

    #[test]
    fn test_expedition_disables_extras() {
        let mut engine = engine(FogConfig::expedition());
        walk(&mut engine, &[1, 2]);

        assert_eq!(engine.backtrack_to(0), Err(Rejection::BacktrackDisabled));
        assert_eq!(engine.draw_card(), Err(Rejection::CardsDisabled));
        assert_eq!(engine.commit(), Err(Rejection::GoalNotReached));
        assert_eq!(engine.walk(), &[0, 1, 2]);
    }

    #[test]
    fn test_classic_waits_for_commit() {
        let mut engine = engine(FogConfig::classic());

        assert_eq!(walk(&mut engine, &[1, 2, 5, 8]), WalkStep::AtGoal);
        assert!(!engine.is_committed());
        assert_eq!(engine.result(), None);

        let optimal = engine.commit().unwrap();
        assert_eq!(optimal.cost, Some(4));
        assert!(engine.is_committed());
        assert_eq!(engine.commit(), Err(Rejection::WalkCommitted));
        assert_eq!(engine.draw_card(), Err(Rejection::WalkCommitted));
    }

    #[test]
    fn test_classic_backtrack() {
        let mut engine = engine(FogConfig::classic());
        walk(&mut engine, &[1, 4, 7]);

        assert_eq!(engine.backtrack_to(1), Ok(()));
        assert_eq!(engine.walk(), &[0, 1]);
        // Revealed edges stay revealed
        assert!(engine.graph().edge(8).unwrap().revealed);

        assert_eq!(engine.backtrack_to(4), Err(Rejection::NotOnWalk { node: 4 }));
        // The tail is not an earlier step
        assert_eq!(engine.backtrack_to(1), Err(Rejection::NotOnWalk { node: 1 }));

        // Backtracked nodes can be walked again
        assert_eq!(engine.extend_walk(4), Ok(WalkStep::Moved));
    }

    #[test]
    fn test_classic_cards() {
        let mut engine = engine(FogConfig::classic());
        assert_eq!(engine.cards_left(), Some(5));

        // Indices into the shrinking hidden list
        engine.rng.extend([5, 5, 0, 100]);
        assert_eq!(engine.draw_card(), Ok(vec![5, 6, 0, 2]));
        assert_eq!(engine.cards_left(), Some(4));
        assert_eq!(engine.graph().hidden_edges().len(), 8);

        for _ in 0..4 {
            engine.draw_card().unwrap();
        }
        assert!(engine.graph().hidden_edges().is_empty());
        assert_eq!(engine.cards_left(), Some(0));
        assert_eq!(engine.draw_card(), Err(Rejection::NoCardsLeft));
    }

    #[test]
    fn test_card_budget_override() {
        // Cards work under expedition rules too once a budget is set
        let mut expedition = engine(FogConfig::expedition().with_card_budget(Some(1)));
        assert_eq!(expedition.snapshot().cards_left, Some(1));

        assert_eq!(expedition.draw_card(), Ok(vec![0, 1, 2, 3]));
        assert_eq!(expedition.draw_card(), Err(Rejection::NoCardsLeft));

        let mut classic = engine(FogConfig::classic().with_card_budget(None));
        assert_eq!(classic.draw_card(), Err(Rejection::CardsDisabled));
    }

    #[test]
    fn test_risky_solve_uses_lower_bounds() {
        let config = FogConfig::expedition().with_grid(2, 2);
        let graph = Graph::from_edges(
            4,
            [
                Edge::new(0, 0, 1, 2, true, WeightBounds { min: 1, max: 3 }),
                Edge::new(1, 0, 2, 6, false, WeightBounds { min: 1, max: 6 }),
                Edge::new(2, 1, 3, 2, true, WeightBounds { min: 1, max: 3 }),
                Edge::new(3, 2, 3, 1, false, WeightBounds { min: 1, max: 3 }),
            ],
        );
        let engine = FogEngine::with_graph(config, ScriptedRng::default(), graph).unwrap();

        let optimal = engine.solve_optimal();
        assert_eq!(optimal.path, vec![0, 1, 3]);
        assert_eq!(optimal.cost, Some(4));

        let risky = engine.solve_risky();
        assert_eq!(risky.path, vec![0, 2, 3]);
        assert_eq!(risky.cost, Some(2));
        assert_eq!(engine.graph().path_cost(&risky.path, |e| e.weight), Some(7));

        // Hints do not reveal anything
        assert_eq!(engine.graph().hidden_edges(), vec![1, 3]);
    }

    #[test]
    fn test_unreachable_goal() {
        let config = FogConfig::expedition().with_grid(1, 3);
        let graph = Graph::from_edges(3, [Edge::new(0, 0, 1, 4, true, WeightBounds { min: 3, max: 5 })]);
        let mut engine = FogEngine::with_graph(config, ScriptedRng::default(), graph).unwrap();

        let optimal = engine.solve_optimal();
        assert_eq!(optimal.cost, None);
        assert!(optimal.path.is_empty());

        engine.extend_walk(1).unwrap();
        assert_eq!(engine.extend_walk(2), Err(Rejection::NotAdjacent { node: 2 }));
    }

    #[test]
    fn test_with_graph_checks_size() {
        let config = FogConfig::expedition().with_grid(2, 2);
        assert!(FogEngine::with_graph(config, ScriptedRng::default(), fixed_grid()).is_err());
    }

    #[test]
    fn test_classic_initial_reveals() {
        let engine = FogEngine::new(FogConfig::classic().with_reveal_probability(0.0), 11).unwrap();
        assert_eq!(engine.graph().hidden_edges().len(), 9);
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut engine = engine(FogConfig::classic());
        walk(&mut engine, &[1, 2, 5, 8]);
        engine.draw_card().unwrap();
        engine.commit().unwrap();
        let epoch = engine.epoch();

        engine.new_game();

        assert_eq!(engine.walk(), &[0]);
        assert!(!engine.is_committed());
        assert_eq!(engine.cards_left(), Some(5));
        assert_eq!(engine.optimal(), None);
        assert_eq!(engine.result(), None);
        assert_eq!(engine.epoch(), epoch.next());
    }

    #[test]
    fn test_snapshot_hides_unrevealed_weights() {
        let mut engine = engine(FogConfig::expedition());
        walk(&mut engine, &[1]);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.edges.len(), 12);
        assert_eq!(snapshot.walk, vec![0, 1]);
        assert_eq!(snapshot.walk_cost, Some(1));
        assert_eq!(snapshot.goal, 8);
        assert_eq!(snapshot.edges[0].weight, Some(1));
        assert!(snapshot.edges[0].is_revealed());
        assert_eq!(snapshot.edges[1].weight, None);
        assert_eq!(snapshot.edges[1].bounds, WeightBounds { min: 4, max: 6 });
        assert!(!snapshot.stuck);
        assert_eq!(snapshot.cards_left, None);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FogSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
