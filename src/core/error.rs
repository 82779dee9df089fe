//! Error types.
//!
//! Illegal moves are ordinary gameplay, not failures: every command returns
//! `Result<_, Rejection>` and a rejected command leaves the engine untouched.
//! `ConfigError` is reported when an engine is built from an unusable config.

use thiserror::Error;

/// Why a command was refused. The engine state is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    // === Knapsack ===
    #[error("item {id} is not in the current item set")]
    UnknownItem { id: usize },

    // === Turn structure ===
    #[error("it is not your turn")]
    NotYourTurn,

    #[error("the game is already over")]
    GameOver,

    // === Nim ===
    #[error("pile {pile} does not exist")]
    InvalidPile { pile: usize },

    #[error("cannot remove {amount} stones (allowed 1..={max})")]
    InvalidAmount { amount: u32, max: u32 },

    #[error("no rearranges left")]
    NoRearrangesLeft,

    #[error("already rearranged this turn")]
    AlreadyRearranged,

    #[error("no rearrange is being composed")]
    RearrangeNotActive,

    #[error("finish or cancel the rearrange first")]
    RearrangeInProgress,

    #[error("two piles are already selected")]
    RearrangeSelectionFull,

    #[error("pile {pile} is already selected")]
    PileAlreadySelected { pile: usize },

    #[error("select two piles before committing")]
    RearrangeIncomplete,

    #[error("no stones can move between the selected piles")]
    NoRearrangementPossible,

    #[error("AI move ticket is stale")]
    StaleTicket,

    // === Fog path ===
    #[error("node {node} does not exist")]
    UnknownNode { node: usize },

    #[error("node {node} is not adjacent to the end of the walk")]
    NotAdjacent { node: usize },

    #[error("node {node} is already on the walk")]
    AlreadyVisited { node: usize },

    #[error("backtracking is disabled")]
    BacktrackDisabled,

    #[error("node {node} is not an earlier step of the walk")]
    NotOnWalk { node: usize },

    #[error("the walk is already committed")]
    WalkCommitted,

    #[error("the walk has not reached the goal")]
    GoalNotReached,

    #[error("reveal cards are disabled")]
    CardsDisabled,

    #[error("no reveal cards left")]
    NoCardsLeft,
}

/// Invalid engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("empty range for {field}: {min}..={max}")]
    EmptyRange { field: &'static str, min: u32, max: u32 },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result of an engine command.
pub type CommandResult<T = ()> = Result<T, Rejection>;
