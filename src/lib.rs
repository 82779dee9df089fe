//! # puzzle-arcade
//!
//! Engines for three single-player puzzle games: a 0/1 knapsack optimizer,
//! Nim with a rearrange move against an AI, and a fog-of-war shortest path.
//!
//! ## Design Principles
//!
//! 1. **Engines, not UIs**: Each game exposes commands (inherent methods
//!    returning `Result<_, Rejection>`) and a serialisable snapshot. Drawing,
//!    input and timers belong to the caller.
//!
//! 2. **Rejections Change Nothing**: An illegal command returns a
//!    `Rejection` and leaves the engine exactly as it was.
//!
//! 3. **Deterministic**: All randomness flows through `RandomSource`. Seeded
//!    ChaCha streams in play, scripted values in tests.
//!
//! ## Architecture
//!
//! - **Epochs**: Every `new_game` bumps the engine's epoch. Deferred work
//!   (the Nim AI move) is issued as an epoch-stamped ticket and refused once
//!   stale.
//!
//! - **Persistent Data Structures**: Fog-path edges live in an `im` vector so
//!   snapshots share them with the engine.
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, configuration, errors
//! - `rules`: `GameEngine` trait, `GameResult`, `Epoch`
//! - `games`: Knapsack, Nim and fog-path engines
//! - `arcade`: One object owning all three engines

pub mod arcade;
pub mod core;
pub mod games;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Side, SideMap,
    GameRng, RandomSource, ScriptedRng,
    ArcadeConfig, FogConfig, IntRange, KnapsackConfig, NimConfig,
    CommandResult, ConfigError, Rejection,
};

pub use crate::rules::{Epoch, GameEngine, GameResult};

pub use crate::arcade::{Arcade, ArcadeSnapshot, GameKind};

pub use crate::games::knapsack::{KnapsackEngine, KnapsackSnapshot, Strategy};
pub use crate::games::nim::{AiTicket, NimEngine, NimPhase, NimSnapshot};
pub use crate::games::fog_path::{FogEngine, FogSnapshot, PathResult, WalkStep};
