//! Reference solvers the player is measured against.
//!
//! - `ExactDp`: 0/1 dynamic programming, always optimal,
//!   O(items × min(capacity, total weight))
//! - `GreedyRatio`: densest-first heuristic, fast but can miss the optimum
//!
//! The two can disagree, so every solution records which strategy made it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::item::{Item, ItemId};

/// Which reference solver to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Exact 0/1 dynamic programming.
    ExactDp,
    /// Value/weight ratio heuristic.
    GreedyRatio,
}

impl Strategy {
    /// Both strategies, canonical first.
    pub const ALL: [Strategy; 2] = [Strategy::ExactDp, Strategy::GreedyRatio];

    /// Solver implementing this strategy.
    #[must_use]
    pub fn solver(self) -> &'static dyn KnapsackSolver {
        match self {
            Strategy::ExactDp => &ExactDp,
            Strategy::GreedyRatio => &GreedyRatio,
        }
    }

    /// Does this strategy guarantee an optimal answer?
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Strategy::ExactDp)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::ExactDp => write!(f, "optimal (DP)"),
            Strategy::GreedyRatio => write!(f, "greedy (ratio)"),
        }
    }
}

/// Chosen subset plus its totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub strategy: Strategy,
    pub value: u32,
    pub weight: u32,
    /// Chosen items in ascending id order.
    pub items: SmallVec<[ItemId; 16]>,
}

impl Solution {
    fn from_chosen(strategy: Strategy, items: &[Item], mut chosen: SmallVec<[ItemId; 16]>) -> Self {
        chosen.sort_unstable();
        let (weight, value) = chosen
            .iter()
            .map(|id| &items[id.0])
            .fold((0, 0), |(w, v), item| (w + item.weight, v + item.value));
        Self {
            strategy,
            value,
            weight,
            items: chosen,
        }
    }

    /// Is `id` part of this solution?
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }
}

/// A knapsack solver.
///
/// Implementations must never return a subset heavier than `capacity`.
pub trait KnapsackSolver {
    /// Strategy tag stamped on results.
    fn strategy(&self) -> Strategy;

    /// Pick a subset of `items` with total weight ≤ `capacity`.
    fn solve(&self, items: &[Item], capacity: u32) -> Solution;
}

/// Exact 0/1 knapsack via a full DP table.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactDp;

impl KnapsackSolver for ExactDp {
    fn strategy(&self) -> Strategy {
        Strategy::ExactDp
    }

    fn solve(&self, items: &[Item], capacity: u32) -> Solution {
        let total_weight: u64 = items.iter().map(|item| u64::from(item.weight)).sum();
        if u64::from(capacity) >= total_weight {
            // Everything fits
            let chosen = items.iter().map(|item| item.id).collect();
            return Solution::from_chosen(Strategy::ExactDp, items, chosen);
        }

        // Below the total weight, so the table stays as wide as the items
        let capacity = capacity as usize;
        let n = items.len();
        let width = capacity + 1;

        // best[i * width + w] = best value using the first i items within weight w
        let mut best = vec![0u32; (n + 1) * width];
        for (i, item) in items.iter().enumerate() {
            let (prev, row) = best.split_at_mut((i + 1) * width);
            let prev = &prev[i * width..];
            let row = &mut row[..width];
            let item_weight = item.weight as usize;
            for w in 0..width {
                row[w] = if item_weight <= w {
                    prev[w].max(prev[w - item_weight] + item.value)
                } else {
                    prev[w]
                };
            }
        }

        // Walk back up the table to recover the subset
        let mut chosen = SmallVec::new();
        let mut w = capacity;
        for i in (1..=n).rev() {
            if best[i * width + w] != best[(i - 1) * width + w] {
                chosen.push(items[i - 1].id);
                w -= items[i - 1].weight as usize;
            }
        }

        let solution = Solution::from_chosen(Strategy::ExactDp, items, chosen);
        debug_assert_eq!(solution.value, best[n * width + capacity]);
        solution
    }
}

/// Densest-first heuristic.
///
/// Items are visited by value/weight ratio, descending (stable, so equal
/// ratios keep id order). Every item that still fits is taken; an item that
/// does not fit is skipped rather than ending the scan.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyRatio;

impl KnapsackSolver for GreedyRatio {
    fn strategy(&self) -> Strategy {
        Strategy::GreedyRatio
    }

    fn solve(&self, items: &[Item], capacity: u32) -> Solution {
        let mut order: Vec<&Item> = items.iter().collect();
        order.sort_by(|a, b| b.cmp_ratio(a));

        let mut chosen = SmallVec::new();
        let mut total_weight = 0u32;
        for item in order {
            if item.weight <= capacity - total_weight {
                total_weight += item.weight;
                chosen.push(item.id);
            }
        }

        Solution::from_chosen(Strategy::GreedyRatio, items, chosen)
    }
}
