//! Nim with rearrangement, human vs. AI.
//!
//! - Four piles of 3-13 stones, capped at 15
//! - A turn removes 1-5 stones from one pile; taking the last stone wins
//! - Each side may once per game shift up to 3 stones between two piles
//! - The AI plays nim-sum theory and searches rearrangements when it is
//!   losing or its winning cut is over the limit

mod ai;
mod engine;
mod piles;

pub use ai::{decide_ai_move, winning_removal, AiMove, AiStrategy, NimRules};
pub use engine::{AiTicket, NimEngine, NimPhase, NimSnapshot};
pub use piles::{nim_sum, PileSet, Rearrangement, Removal};
