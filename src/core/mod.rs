//! Core engine types: sides, RNG, configuration, errors.
//!
//! This module holds the building blocks shared by every game.
//! Games configure these rather than reimplementing them.

pub mod side;
pub mod rng;
pub mod config;
pub mod error;

pub use side::{Side, SideMap};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use config::{ArcadeConfig, FogConfig, IntRange, KnapsackConfig, NimConfig};
pub use error::{CommandResult, ConfigError, Rejection};
