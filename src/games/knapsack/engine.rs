//! Knapsack game engine.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::item::{Item, ItemId, ItemSet};
use super::solver::{Solution, Strategy};
use crate::core::{CommandResult, ConfigError, GameRng, KnapsackConfig, RandomSource, Rejection};
use crate::rules::{Epoch, GameEngine};

/// Totals of the player's current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub total_weight: u32,
    pub total_value: u32,
    /// `total_weight <= capacity` (the boundary is feasible).
    pub feasible: bool,
}

/// How the player's selection stacks up against a reference solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Strictly more value than the reference.
    BeatReference,
    /// Within 95% of the reference.
    Excellent,
    /// Anything below that.
    Good,
}

/// Player-vs-reference comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub strategy: Strategy,
    pub player_value: u32,
    pub reference_value: u32,
    /// `None` when the reference value is zero.
    pub efficiency_percent: Option<f64>,
    pub verdict: Verdict,
}

/// One item as the presentation layer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub weight: u32,
    pub value: u32,
    pub selected: bool,
}

/// Read-only knapsack state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackSnapshot {
    pub epoch: Epoch,
    pub capacity: u32,
    pub items: Vec<ItemView>,
    pub selection: SelectionSummary,
    /// Reference solutions computed since the last change, canonical first.
    pub solutions: Vec<Solution>,
}

/// Knapsack game: a generated item set, a capacity, the player's selection
/// and cached reference solutions.
///
/// Cached solutions are dropped whenever the items or the capacity change,
/// so a returned reference always matches the current round.
#[derive(Clone, Debug)]
pub struct KnapsackEngine<R: RandomSource = GameRng> {
    config: KnapsackConfig,
    rng: R,
    items: ItemSet,
    capacity: u32,
    selection: FxHashSet<ItemId>,
    solutions: FxHashMap<Strategy, Solution>,
    epoch: Epoch,
}

impl KnapsackEngine<GameRng> {
    /// Create an engine with a seeded ChaCha stream and generate the first round.
    pub fn new(config: KnapsackConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, GameRng::new(seed))
    }
}

impl<R: RandomSource> KnapsackEngine<R> {
    /// Create an engine drawing from `rng` and generate the first round.
    pub fn with_rng(config: KnapsackConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.capacity;
        let mut engine = Self {
            config,
            rng,
            items: ItemSet::default(),
            capacity,
            selection: FxHashSet::default(),
            solutions: FxHashMap::default(),
            epoch: Epoch::default(),
        };
        engine.generate();
        Ok(engine)
    }

    /// Draw a fresh item set. Clears the selection and cached solutions.
    ///
    /// Capacity is a player setting and carries over.
    pub fn generate(&mut self) {
        self.items = ItemSet::generate(&self.config, &mut self.rng);
        self.selection.clear();
        self.solutions.clear();
        self.epoch = self.epoch.next();
        info!(epoch = self.epoch.0, items = self.items.len(), capacity = self.capacity, "knapsack round generated");
    }

    /// Set the capacity. Keeps the selection, drops cached solutions.
    pub fn set_capacity(&mut self, capacity: u32) {
        if capacity != self.capacity {
            self.capacity = capacity;
            self.solutions.clear();
            debug!(capacity, "knapsack capacity changed");
        }
    }

    /// Flip membership of `id` in the selection.
    ///
    /// Returns whether the item is selected afterwards.
    pub fn toggle_select(&mut self, id: ItemId) -> CommandResult<bool> {
        if !self.items.contains(id) {
            trace!(%id, "toggle rejected: unknown item");
            return Err(Rejection::UnknownItem { id: id.0 });
        }
        let selected = if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        };
        debug!(%id, selected, "knapsack selection toggled");
        Ok(selected)
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Run (or reuse) the reference solver for `strategy`.
    pub fn solve(&mut self, strategy: Strategy) -> Solution {
        if let Some(solution) = self.solutions.get(&strategy) {
            return solution.clone();
        }
        let solution = strategy.solver().solve(self.items.as_slice(), self.capacity);
        assert!(
            solution.weight <= self.capacity,
            "{strategy} solver overfilled the knapsack: {} > {}",
            solution.weight,
            self.capacity
        );
        debug!(%strategy, value = solution.value, weight = solution.weight, "reference solved");
        self.solutions.insert(strategy, solution.clone());
        solution
    }

    /// Canonical optimal reference.
    pub fn solve_optimal(&mut self) -> Solution {
        self.solve(Strategy::ExactDp)
    }

    /// Greedy heuristic reference.
    pub fn solve_greedy(&mut self) -> Solution {
        self.solve(Strategy::GreedyRatio)
    }

    /// Totals and feasibility of the current selection.
    #[must_use]
    pub fn evaluate_selection(&self) -> SelectionSummary {
        let (total_weight, total_value) = self.items.totals(&self.selection);
        SelectionSummary {
            total_weight,
            total_value,
            feasible: total_weight <= self.capacity,
        }
    }

    /// Compare the selection with a reference solution.
    ///
    /// `None` while the selection is empty or over capacity.
    pub fn compare(&mut self, strategy: Strategy) -> Option<Comparison> {
        let summary = self.evaluate_selection();
        if self.selection.is_empty() || !summary.feasible {
            return None;
        }
        let reference = self.solve(strategy);
        let player = u64::from(summary.total_value);
        let target = u64::from(reference.value);

        let verdict = if player > target {
            Verdict::BeatReference
        } else if player * 100 >= target * 95 {
            Verdict::Excellent
        } else {
            Verdict::Good
        };

        Some(Comparison {
            strategy,
            player_value: summary.total_value,
            reference_value: reference.value,
            efficiency_percent: (reference.value > 0)
                .then(|| f64::from(summary.total_value) / f64::from(reference.value) * 100.0),
            verdict,
        })
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.items.as_slice()
    }

    /// Current capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn selection(&self) -> Vec<ItemId> {
        let mut ids: Vec<_> = self.selection.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Is `id` selected?
    #[must_use]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.contains(&id)
    }

    /// Cached reference for `strategy`, if still fresh.
    #[must_use]
    pub fn cached_solution(&self, strategy: Strategy) -> Option<&Solution> {
        self.solutions.get(&strategy)
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &KnapsackConfig {
        &self.config
    }
}

impl<R: RandomSource> GameEngine for KnapsackEngine<R> {
    type Snapshot = KnapsackSnapshot;

    fn new_game(&mut self) {
        self.generate();
    }

    fn snapshot(&self) -> KnapsackSnapshot {
        KnapsackSnapshot {
            epoch: self.epoch,
            capacity: self.capacity,
            items: self
                .items
                .iter()
                .map(|item| ItemView {
                    id: item.id,
                    name: item.name.clone(),
                    weight: item.weight,
                    value: item.value,
                    selected: self.selection.contains(&item.id),
                })
                .collect(),
            selection: self.evaluate_selection(),
            solutions: Strategy::ALL
                .iter()
                .filter_map(|s| self.solutions.get(s).cloned())
                .collect(),
        }
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;

    /// Three items: (w5, v10), (w10, v30), (w20, v25).
    fn engine(capacity: u32) -> KnapsackEngine<ScriptedRng> {
        let config = KnapsackConfig::default().with_max_items(3).with_capacity(capacity);
        KnapsackEngine::with_rng(config, ScriptedRng::new([5, 10, 10, 30, 20, 25])).unwrap()
    }

    #[test]
    fn test_generation_is_scripted() {
        let engine = engine(20);
        let stats: Vec<_> = engine.items().iter().map(|i| (i.weight, i.value)).collect();
        assert_eq!(stats, vec![(5, 10), (10, 30), (20, 25)]);
        assert_eq!(engine.epoch(), Epoch(1));
    }

    #[test]
    fn test_toggle_select() {
        let mut engine = engine(20);

        assert_eq!(engine.toggle_select(ItemId(1)), Ok(true));
        assert!(engine.is_selected(ItemId(1)));
        assert_eq!(engine.toggle_select(ItemId(1)), Ok(false));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_toggle_unknown_item_is_noop() {
        let mut engine = engine(20);
        engine.toggle_select(ItemId(0)).unwrap();

        assert_eq!(engine.toggle_select(ItemId(3)), Err(Rejection::UnknownItem { id: 3 }));
        assert_eq!(engine.selection(), vec![ItemId(0)]);
    }

    #[test]
    fn test_feasibility_boundary_is_inclusive() {
        let mut engine = engine(15);
        engine.toggle_select(ItemId(0)).unwrap();
        engine.toggle_select(ItemId(1)).unwrap();

        let summary = engine.evaluate_selection();
        assert_eq!(summary.total_weight, 15);
        assert_eq!(summary.total_value, 40);
        assert!(summary.feasible);

        engine.set_capacity(14);
        assert!(!engine.evaluate_selection().feasible);
        // Selection survives the capacity change
        assert_eq!(engine.selection(), vec![ItemId(0), ItemId(1)]);
    }

    #[test]
    fn test_infeasible_selection_is_allowed() {
        let mut engine = engine(10);
        for id in 0..3 {
            engine.toggle_select(ItemId(id)).unwrap();
        }

        let summary = engine.evaluate_selection();
        assert_eq!(summary.total_weight, 35);
        assert!(!summary.feasible);
        assert!(engine.compare(Strategy::ExactDp).is_none());
    }

    #[test]
    fn test_capacity_change_invalidates_cache() {
        let mut engine = engine(15);
        assert_eq!(engine.solve_optimal().value, 40);
        assert!(engine.cached_solution(Strategy::ExactDp).is_some());

        engine.set_capacity(0);
        assert!(engine.cached_solution(Strategy::ExactDp).is_none());

        let empty = engine.solve_optimal();
        assert_eq!(empty.value, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_huge_capacity_takes_everything() {
        let mut engine = engine(20);
        engine.set_capacity(u32::MAX);

        let optimal = engine.solve_optimal();
        assert_eq!(optimal.items.as_slice(), &[ItemId(0), ItemId(1), ItemId(2)]);
        assert_eq!((optimal.weight, optimal.value), (35, 65));
        assert_eq!(engine.solve_greedy().value, 65);
    }

    #[test]
    fn test_compare_verdicts() {
        let mut engine = engine(30);
        // Optimal at 30: items 1 + 2 = 55 (weight 30)
        engine.toggle_select(ItemId(0)).unwrap();
        engine.toggle_select(ItemId(1)).unwrap();

        let cmp = engine.compare(Strategy::ExactDp).unwrap();
        assert_eq!(cmp.player_value, 40);
        assert_eq!(cmp.reference_value, 55);
        assert_eq!(cmp.verdict, Verdict::Good);

        engine.toggle_select(ItemId(0)).unwrap();
        engine.toggle_select(ItemId(2)).unwrap();
        let cmp = engine.compare(Strategy::ExactDp).unwrap();
        assert_eq!(cmp.verdict, Verdict::Excellent);
        assert_eq!(cmp.efficiency_percent, Some(100.0));
    }

    #[test]
    fn test_player_can_beat_greedy() {
        // Greedy at 30 takes item 1 (ratio 3), then item 0 (ratio 2): 40
        let mut engine = engine(30);
        assert_eq!(engine.solve_greedy().value, 40);

        engine.toggle_select(ItemId(1)).unwrap();
        engine.toggle_select(ItemId(2)).unwrap();
        let cmp = engine.compare(Strategy::GreedyRatio).unwrap();
        assert_eq!(cmp.verdict, Verdict::BeatReference);
    }

    #[test]
    fn test_new_game_resets_round_state() {
        let mut engine = engine(30);
        engine.rng.extend([6, 11, 7, 12, 8, 13]);
        engine.toggle_select(ItemId(2)).unwrap();
        engine.solve_optimal();

        engine.new_game();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.epoch, Epoch(2));
        assert!(snapshot.items.iter().all(|i| !i.selected));
        assert!(snapshot.solutions.is_empty());
        assert_eq!(snapshot.selection.total_weight, 0);
        assert_eq!(snapshot.capacity, 30);
        assert_eq!(snapshot.items[0].weight, 6);
    }

    #[test]
    fn test_snapshot_lists_solutions_canonical_first() {
        let mut engine = engine(30);
        engine.solve_greedy();
        engine.solve_optimal();

        let snapshot = engine.snapshot();
        let strategies: Vec<_> = snapshot.solutions.iter().map(|s| s.strategy).collect();
        assert_eq!(strategies, vec![Strategy::ExactDp, Strategy::GreedyRatio]);
    }
}
