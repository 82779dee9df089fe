//! Engine trait for game implementations.
//!
//! The presentation layer owns one engine per game and only ever talks to it
//! through commands (inherent methods on each engine) and the observation
//! surface defined here.

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Result of a finished round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// A two-sided game ended with a winner.
    Winner(Side),
    /// A solo round ended with a score and the reference score it is
    /// judged against. Whether higher or lower is better is game-specific.
    Scored { player: u32, reference: u32 },
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, GameResult::Winner(s) if *s == side)
    }
}

/// Generation counter, bumped by every `new_game`.
///
/// Anything scheduled against an older epoch must be discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Epoch({})", self.0)
    }
}

/// Observation and reset surface.
///
/// ## Implementation Notes
///
/// - `new_game` must reset every mutable field; nothing may survive a round
/// - `new_game` must advance `epoch`
/// - `snapshot` must be cheap enough to call after every command
pub trait GameEngine {
    /// Read-only view handed to the presentation layer.
    type Snapshot;

    /// Start a fresh round.
    fn new_game(&mut self);

    /// Capture the current state for rendering.
    fn snapshot(&self) -> Self::Snapshot;

    /// Current generation.
    fn epoch(&self) -> Epoch;

    /// Result of the round, if it has finished.
    fn result(&self) -> Option<GameResult> {
        None
    }
}
