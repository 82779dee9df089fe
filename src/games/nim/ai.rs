//! AI opponent for Nim-rearrange.
//!
//! Decision order, first match wins:
//!
//! 1. **Winning removal**: nim-sum is non-zero and some pile can be cut to
//!    zero it within the per-turn limit.
//! 2. **Rearrange to win**: with budget left, search pile pairs `(a, b)`,
//!    `a < b`, and shifts `-max..=max` (skipping 0) for a rearrangement after
//!    which step 1 succeeds. Play both.
//! 3. **Rearrange to narrow the gap**: with budget left, pick the
//!    rearrangement whose cheapest zeroing cut overshoots the limit the least,
//!    then remove the limit from that pile.
//! 4. **Fallback**: take half (rounded up) of the largest pile, capped at the
//!    limit.
//!
//! Every search scans piles, pairs and shifts in ascending order and keeps
//! the first best candidate, so the AI is fully deterministic.

use serde::{Deserialize, Serialize};

use super::piles::{PileSet, Rearrangement, Removal};
use crate::core::NimConfig;

/// Move limits the AI plays under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NimRules {
    pub max_remove: u32,
    pub max_shift: u32,
}

impl From<&NimConfig> for NimRules {
    fn from(config: &NimConfig) -> Self {
        Self {
            max_remove: config.max_remove_per_turn,
            max_shift: config.max_rearrange_shift,
        }
    }
}

/// Which rule produced an AI move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiStrategy {
    WinningRemoval,
    RearrangeToWin,
    RearrangeToNarrowGap,
    Fallback,
}

/// A full AI turn: optional rearrangement, then a removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMove {
    pub strategy: AiStrategy,
    pub rearrangement: Option<Rearrangement>,
    pub removal: Removal,
}

/// First pile whose zeroing cut fits within `max_remove`.
#[must_use]
pub fn winning_removal(piles: &PileSet, max_remove: u32) -> Option<Removal> {
    zeroing_cuts(piles).find(|r| r.amount <= max_remove)
}

/// Cheapest zeroing cut regardless of the limit, lowest pile on ties.
fn cheapest_cut(piles: &PileSet) -> Option<Removal> {
    zeroing_cuts(piles).fold(None, |best: Option<Removal>, r| match best {
        Some(b) if b.amount <= r.amount => Some(b),
        _ => Some(r),
    })
}

/// Every removal that brings the nim-sum to zero, in pile order.
fn zeroing_cuts(piles: &PileSet) -> impl Iterator<Item = Removal> + '_ {
    let sum = piles.nim_sum();
    piles
        .as_slice()
        .iter()
        .enumerate()
        .filter_map(move |(pile, &p)| {
            let target = p ^ sum;
            (sum != 0 && target < p).then(|| Removal {
                pile,
                amount: p - target,
            })
        })
}

/// Every legal AI rearrangement, in search order.
fn rearrangements(piles: &PileSet, max_shift: u32) -> impl Iterator<Item = (PileSet, Rearrangement)> + '_ {
    let n = piles.len();
    let max_shift = max_shift as i32;
    (0..n).flat_map(move |a| {
        (a + 1..n).flat_map(move |b| {
            (-max_shift..=max_shift).filter_map(move |shift| piles.shifted(a, b, shift))
        })
    })
}

/// Choose the AI's move for the given position.
///
/// The position must not be cleared; if it is, the returned removal takes
/// nothing.
#[must_use]
pub fn decide_ai_move(piles: &PileSet, rearranges_left: u32, rules: &NimRules) -> AiMove {
    if let Some(removal) = winning_removal(piles, rules.max_remove) {
        return AiMove {
            strategy: AiStrategy::WinningRemoval,
            rearrangement: None,
            removal,
        };
    }

    if rearranges_left > 0 {
        let mut narrowest: Option<(u32, Rearrangement, Removal)> = None;

        for (next, rearrangement) in rearrangements(piles, rules.max_shift) {
            if let Some(removal) = winning_removal(&next, rules.max_remove) {
                return AiMove {
                    strategy: AiStrategy::RearrangeToWin,
                    rearrangement: Some(rearrangement),
                    removal,
                };
            }
            if let Some(cut) = cheapest_cut(&next) {
                let gap = cut.amount.saturating_sub(rules.max_remove);
                if narrowest.map_or(true, |(best, _, _)| gap < best) {
                    let removal = Removal {
                        pile: cut.pile,
                        amount: rules.max_remove,
                    };
                    narrowest = Some((gap, rearrangement, removal));
                }
            }
        }

        if let Some((_, rearrangement, removal)) = narrowest {
            return AiMove {
                strategy: AiStrategy::RearrangeToNarrowGap,
                rearrangement: Some(rearrangement),
                removal,
            };
        }
    }

    let pile = piles.largest().unwrap_or(0);
    let size = piles.get(pile).unwrap_or(0);
    let amount = size.div_ceil(2).max(1).min(rules.max_remove).min(size);
    AiMove {
        strategy: AiStrategy::Fallback,
        rearrangement: None,
        removal: Removal { pile, amount },
    }
}
