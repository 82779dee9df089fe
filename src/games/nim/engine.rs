//! Nim-rearrange game engine.
//!
//! ## Turn flow
//!
//! ```text
//! PlayerTurn ──remove──▶ AiTurn ──run_ai_move(ticket)──▶ PlayerTurn
//!     │  ▲                                   │
//!     │  └─ rearrange (begin/select/commit)  │
//!     └──────── last stone ──▶ GameOver ◀────┘
//! ```
//!
//! The AI never moves on its own. When the player's move hands over the
//! turn, the engine issues an `AiTicket`; the caller waits `ticket.delay`
//! and redeems it. `new_game` invalidates outstanding tickets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;
use tracing::{debug, info, trace};

use super::ai::{decide_ai_move, AiMove, NimRules};
use super::piles::{PileSet, Rearrangement, Removal};
use crate::core::{CommandResult, ConfigError, GameRng, NimConfig, RandomSource, Rejection, Side, SideMap};
use crate::rules::{Epoch, GameEngine, GameResult};

/// Where the game is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NimPhase {
    PlayerTurn,
    AiTurn,
    GameOver { winner: Side },
}

/// Permission to run one scheduled AI move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiTicket {
    /// Generation the ticket was issued in.
    pub epoch: Epoch,
    /// Turn number the ticket was issued for.
    pub turn: u32,
    /// How long the caller should wait before redeeming.
    pub delay: Duration,
}

/// Read-only Nim state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NimSnapshot {
    pub epoch: Epoch,
    pub turn: u32,
    pub piles: Vec<u32>,
    pub pile_capacity: u32,
    pub max_remove_per_turn: u32,
    pub phase: NimPhase,
    pub rearranges_left: SideMap<u32>,
    /// Piles picked so far, `None` when no rearrange is being composed.
    pub rearrange_selection: Option<Vec<usize>>,
    pub rearranged_this_turn: bool,
    pub pending_ai: Option<AiTicket>,
    pub last_ai_move: Option<AiMove>,
}

/// Nim with a one-shot rearrange move, human vs. AI.
#[derive(Clone, Debug)]
pub struct NimEngine<R: RandomSource = GameRng> {
    config: NimConfig,
    rng: R,
    piles: PileSet,
    phase: NimPhase,
    rearranges_left: SideMap<u32>,
    draft: Option<SmallVec<[usize; 2]>>,
    rearranged_this_turn: bool,
    pending_ai: Option<AiTicket>,
    last_ai_move: Option<AiMove>,
    turn: u32,
    epoch: Epoch,
}

impl NimEngine<GameRng> {
    /// Create an engine with a seeded ChaCha stream and deal the first game.
    pub fn new(config: NimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, GameRng::new(seed))
    }
}

impl<R: RandomSource> NimEngine<R> {
    /// Create an engine drawing from `rng` and deal the first game.
    pub fn with_rng(config: NimConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            piles: PileSet::new([], config.pile_capacity),
            phase: NimPhase::PlayerTurn,
            rearranges_left: SideMap::with_value(config.rearrange_budget),
            draft: None,
            rearranged_this_turn: false,
            pending_ai: None,
            last_ai_move: None,
            turn: 0,
            epoch: Epoch::default(),
            config,
            rng,
        };
        engine.new_game();
        Ok(engine)
    }

    /// Create an engine that starts from a fixed position.
    ///
    /// Later `new_game` calls deal random piles as usual.
    pub fn with_position(config: NimConfig, rng: R, piles: &[u32]) -> Result<Self, ConfigError> {
        if piles.len() != config.pile_count {
            return Err(ConfigError::invalid(
                "piles",
                format!("expected {} piles, got {}", config.pile_count, piles.len()),
            ));
        }
        if let Some(&p) = piles.iter().find(|&&p| p > config.pile_capacity) {
            return Err(ConfigError::invalid(
                "piles",
                format!("pile of {} exceeds capacity {}", p, config.pile_capacity),
            ));
        }
        let mut engine = Self::with_rng(config, rng)?;
        engine.piles = PileSet::new(piles.iter().copied(), engine.config.pile_capacity);
        if engine.piles.is_cleared() {
            // Nobody can move; count it as the AI having taken the last stone
            engine.phase = NimPhase::GameOver { winner: Side::Ai };
        }
        Ok(engine)
    }

    // === Removal ===

    /// Largest legal removal from `pile` this turn.
    #[must_use]
    pub fn removal_limit(&self, pile: usize) -> u32 {
        self.piles
            .get(pile)
            .map_or(0, |p| p.min(self.config.max_remove_per_turn))
    }

    /// Take `amount` stones from `pile` and end the player's turn.
    pub fn remove_stones(&mut self, pile: usize, amount: u32) -> CommandResult<NimPhase> {
        self.ensure_player_turn()?;
        if self.draft.is_some() {
            return self.reject(Rejection::RearrangeInProgress);
        }
        if self.piles.get(pile).is_none() {
            return self.reject(Rejection::InvalidPile { pile });
        }
        let max = self.removal_limit(pile);
        if amount == 0 || amount > max {
            return self.reject(Rejection::InvalidAmount { amount, max });
        }

        self.piles.apply_removal(Removal { pile, amount });
        debug!(pile, amount, piles = ?self.piles.as_slice(), "player removed stones");
        self.finish_turn(Side::Player);
        Ok(self.phase)
    }

    // === Rearrange lifecycle ===

    /// Start composing a rearrange.
    pub fn begin_rearrange(&mut self) -> CommandResult {
        self.ensure_player_turn()?;
        if self.draft.is_some() {
            return self.reject(Rejection::RearrangeInProgress);
        }
        if self.rearranges_left[Side::Player] == 0 {
            return self.reject(Rejection::NoRearrangesLeft);
        }
        if self.rearranged_this_turn {
            return self.reject(Rejection::AlreadyRearranged);
        }
        self.draft = Some(SmallVec::new());
        Ok(())
    }

    /// Add a pile to the rearrange being composed.
    pub fn select_pile_for_rearrange(&mut self, pile: usize) -> CommandResult {
        self.ensure_player_turn()?;
        let rejection = match &self.draft {
            None => Some(Rejection::RearrangeNotActive),
            Some(_) if pile >= self.piles.len() => Some(Rejection::InvalidPile { pile }),
            Some(selected) if selected.contains(&pile) => Some(Rejection::PileAlreadySelected { pile }),
            Some(selected) if selected.len() >= 2 => Some(Rejection::RearrangeSelectionFull),
            Some(_) => None,
        };
        if let Some(rejection) = rejection {
            return self.reject(rejection);
        }
        if let Some(selected) = self.draft.as_mut() {
            selected.push(pile);
        }
        Ok(())
    }

    /// Apply the composed rearrange.
    ///
    /// Stones move from the larger pile to the smaller, as many as allowed
    /// (up to `max_rearrange_shift`) without breaking the capacity.
    pub fn commit_rearrange(&mut self) -> CommandResult<Rearrangement> {
        self.ensure_player_turn()?;
        let (a, b) = match self.draft.as_deref() {
            None => return self.reject(Rejection::RearrangeNotActive),
            Some(&[a, b]) => (a, b),
            Some(_) => return self.reject(Rejection::RearrangeIncomplete),
        };
        let Some(rearrangement) = self.piles.balancing_move(a, b, self.config.max_rearrange_shift) else {
            return self.reject(Rejection::NoRearrangementPossible);
        };

        self.piles.apply_rearrangement(rearrangement);
        self.rearranges_left[Side::Player] -= 1;
        self.draft = None;
        self.rearranged_this_turn = true;
        debug!(?rearrangement, piles = ?self.piles.as_slice(), "player rearranged");

        if self.config.rearrange_ends_turn {
            self.finish_turn(Side::Player);
        }
        Ok(rearrangement)
    }

    /// Abandon the rearrange being composed.
    pub fn cancel_rearrange(&mut self) -> CommandResult {
        if self.draft.take().is_none() {
            return self.reject(Rejection::RearrangeNotActive);
        }
        Ok(())
    }

    // === AI turn ===

    /// Ticket for the AI move that is due, if any.
    #[must_use]
    pub fn pending_ai_move(&self) -> Option<AiTicket> {
        self.pending_ai
    }

    /// Play the AI turn the ticket was issued for.
    ///
    /// Rejected as stale if the game was reset since, or the ticket was
    /// already redeemed.
    pub fn run_ai_move(&mut self, ticket: AiTicket) -> CommandResult<AiMove> {
        if self.pending_ai != Some(ticket) {
            return self.reject(Rejection::StaleTicket);
        }
        self.pending_ai = None;

        let mv = decide_ai_move(&self.piles, self.rearranges_left[Side::Ai], &NimRules::from(&self.config));
        if let Some(rearrangement) = mv.rearrangement {
            self.piles.apply_rearrangement(rearrangement);
            self.rearranges_left[Side::Ai] -= 1;
        }
        self.piles.apply_removal(mv.removal);
        debug!(strategy = ?mv.strategy, rearrangement = ?mv.rearrangement, removal = ?mv.removal, piles = ?self.piles.as_slice(), "AI moved");

        self.last_ai_move = Some(mv);
        self.finish_turn(Side::Ai);
        Ok(mv)
    }

    // === Accessors ===

    /// Current piles.
    #[must_use]
    pub fn piles(&self) -> &PileSet {
        &self.piles
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> NimPhase {
        self.phase
    }

    /// Rearranges a side has left.
    #[must_use]
    pub fn rearranges_left(&self, side: Side) -> u32 {
        self.rearranges_left[side]
    }

    /// Is a rearrange being composed?
    #[must_use]
    pub fn is_rearranging(&self) -> bool {
        self.draft.is_some()
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &NimConfig {
        &self.config
    }

    // === Internals ===

    fn ensure_player_turn(&self) -> CommandResult {
        match self.phase {
            NimPhase::PlayerTurn => Ok(()),
            NimPhase::AiTurn => self.reject(Rejection::NotYourTurn),
            NimPhase::GameOver { .. } => self.reject(Rejection::GameOver),
        }
    }

    fn reject<T>(&self, rejection: Rejection) -> CommandResult<T> {
        trace!(%rejection, phase = ?self.phase, "nim command rejected");
        Err(rejection)
    }

    /// Close `mover`'s turn: declare the winner or hand over.
    fn finish_turn(&mut self, mover: Side) {
        self.draft = None;
        self.rearranged_this_turn = false;
        self.turn += 1;

        if self.piles.is_cleared() {
            self.phase = NimPhase::GameOver { winner: mover };
            self.pending_ai = None;
            info!(winner = %mover, turns = self.turn, "nim game over");
            return;
        }

        let next = mover.opponent();
        match next {
            Side::Ai => {
                self.phase = NimPhase::AiTurn;
                self.pending_ai = Some(AiTicket {
                    epoch: self.epoch,
                    turn: self.turn,
                    delay: Duration::from_millis(self.config.ai_delay_ms),
                });
            }
            Side::Player => self.phase = NimPhase::PlayerTurn,
        }
        debug!(%next, turn = self.turn, "nim turn passed");
    }
}

impl<R: RandomSource> GameEngine for NimEngine<R> {
    type Snapshot = NimSnapshot;

    fn new_game(&mut self) {
        self.piles = PileSet::generate(&self.config, &mut self.rng);
        self.phase = NimPhase::PlayerTurn;
        self.rearranges_left = SideMap::with_value(self.config.rearrange_budget);
        self.draft = None;
        self.rearranged_this_turn = false;
        self.pending_ai = None;
        self.last_ai_move = None;
        self.turn = 0;
        self.epoch = self.epoch.next();
        info!(epoch = self.epoch.0, piles = ?self.piles.as_slice(), "nim game dealt");
    }

    fn snapshot(&self) -> NimSnapshot {
        NimSnapshot {
            epoch: self.epoch,
            turn: self.turn,
            piles: self.piles.as_slice().to_vec(),
            pile_capacity: self.config.pile_capacity,
            max_remove_per_turn: self.config.max_remove_per_turn,
            phase: self.phase,
            rearranges_left: self.rearranges_left.clone(),
            rearrange_selection: self.draft.as_ref().map(|s| s.to_vec()),
            rearranged_this_turn: self.rearranged_this_turn,
            pending_ai: self.pending_ai,
            last_ai_move: self.last_ai_move,
        }
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn result(&self) -> Option<GameResult> {
        match self.phase {
            NimPhase::GameOver { winner } => Some(GameResult::Winner(winner)),
            _ => None,
        }
    }
}
