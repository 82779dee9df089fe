//! Pile configurations and the moves that change them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{NimConfig, RandomSource};

/// XOR of all pile sizes.
///
/// Zero means the player to move loses plain removal-only Nim.
#[must_use]
pub fn nim_sum(piles: &[u32]) -> u32 {
    piles.iter().fold(0, |acc, &p| acc ^ p)
}

/// Take `amount` stones from `pile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Removal {
    pub pile: usize,
    pub amount: u32,
}

/// Move `amount` stones from pile `from` to pile `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rearrangement {
    pub from: usize,
    pub to: usize,
    pub amount: u32,
}

/// Ordered pile sizes, each bounded by a shared capacity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PileSet {
    piles: SmallVec<[u32; 4]>,
    capacity: u32,
}

impl PileSet {
    /// Create a pile set. Every pile must be within `capacity`.
    pub fn new(piles: impl IntoIterator<Item = u32>, capacity: u32) -> Self {
        let piles: SmallVec<[u32; 4]> = piles.into_iter().collect();
        assert!(
            piles.iter().all(|&p| p <= capacity),
            "Pile exceeds capacity {}: {:?}",
            capacity,
            piles
        );
        Self { piles, capacity }
    }

    /// Draw fresh piles from the configured range.
    pub fn generate<R: RandomSource>(config: &NimConfig, rng: &mut R) -> Self {
        let piles = (0..config.pile_count)
            .map(|_| rng.gen_range_inclusive(config.initial_pile_range.as_range()));
        Self::new(piles, config.pile_capacity)
    }

    /// Number of piles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.piles.len()
    }

    /// Are there no piles at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// Size of a pile.
    #[must_use]
    pub fn get(&self, pile: usize) -> Option<u32> {
        self.piles.get(pile).copied()
    }

    /// All sizes in order.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.piles
    }

    /// Shared pile capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Total stones left.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.piles.iter().sum()
    }

    /// Every pile is empty.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.piles.iter().all(|&p| p == 0)
    }

    /// XOR of all piles.
    #[must_use]
    pub fn nim_sum(&self) -> u32 {
        nim_sum(&self.piles)
    }

    /// Index of the largest pile, lowest index on ties.
    #[must_use]
    pub fn largest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &p) in self.piles.iter().enumerate() {
            if best.map_or(true, |b| p > self.piles[b]) {
                best = Some(i);
            }
        }
        best
    }

    /// Apply a removal. Caller checks legality.
    pub fn apply_removal(&mut self, removal: Removal) {
        let pile = &mut self.piles[removal.pile];
        assert!(removal.amount <= *pile, "Removing {} from pile of {}", removal.amount, pile);
        *pile -= removal.amount;
    }

    /// Apply a rearrangement. Caller checks legality.
    ///
    /// # Panics
    ///
    /// If the move would leave either pile outside `[0, capacity]`.
    pub fn apply_rearrangement(&mut self, rearrangement: Rearrangement) {
        let Rearrangement { from, to, amount } = rearrangement;
        assert_ne!(from, to, "Rearrangement needs two distinct piles");
        let before = self.piles[from] + self.piles[to];
        assert!(self.piles[from] >= amount, "Rearrangement drains pile {} below zero", from);
        assert!(
            self.piles[to] + amount <= self.capacity,
            "Rearrangement overfills pile {} past {}",
            to,
            self.capacity
        );
        self.piles[from] -= amount;
        self.piles[to] += amount;
        debug_assert_eq!(self.piles[from] + self.piles[to], before);
    }

    /// Piles after moving `shift` stones from `a` to `b` (negative moves
    /// from `b` to `a`). `None` if a pile would leave `[0, capacity]`.
    #[must_use]
    pub fn shifted(&self, a: usize, b: usize, shift: i32) -> Option<(PileSet, Rearrangement)> {
        let na = i64::from(self.piles[a]) - i64::from(shift);
        let nb = i64::from(self.piles[b]) + i64::from(shift);
        let cap = i64::from(self.capacity);
        if shift == 0 || !(0..=cap).contains(&na) || !(0..=cap).contains(&nb) {
            return None;
        }
        let rearrangement = if shift > 0 {
            Rearrangement { from: a, to: b, amount: shift.unsigned_abs() }
        } else {
            Rearrangement { from: b, to: a, amount: shift.unsigned_abs() }
        };
        let mut next = self.clone();
        next.apply_rearrangement(rearrangement);
        Some((next, rearrangement))
    }

    /// The player's rearrange rule: move stones from the larger of the two
    /// piles (`a` on ties) to the smaller, as many as possible up to
    /// `max_shift` while both stay within bounds.
    #[must_use]
    pub fn balancing_move(&self, a: usize, b: usize, max_shift: u32) -> Option<Rearrangement> {
        let (larger, smaller) = if self.piles[a] >= self.piles[b] { (a, b) } else { (b, a) };
        (1..=max_shift).rev().find_map(|k| {
            (self.piles[larger] >= k && self.piles[smaller] + k <= self.capacity).then_some(
                Rearrangement {
                    from: larger,
                    to: smaller,
                    amount: k,
                },
            )
        })
    }
}
