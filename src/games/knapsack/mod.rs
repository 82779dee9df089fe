//! 0/1 knapsack puzzle.
//!
//! - A round generates up to 14 items (weight 5-25, value 10-50)
//! - The player toggles items into a selection; overweight selections are
//!   allowed but flagged infeasible
//! - Reference solvers (exact DP, greedy ratio) give the score to beat

mod engine;
mod item;
mod solver;

pub use engine::{Comparison, ItemView, KnapsackEngine, KnapsackSnapshot, SelectionSummary, Verdict};
pub use item::{Item, ItemId, ItemSet, ITEM_NAMES};
pub use solver::{ExactDp, GreedyRatio, KnapsackSolver, Solution, Strategy};
