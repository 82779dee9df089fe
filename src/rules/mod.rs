//! Engine trait shared by every game.
//!
//! Games implement `GameEngine` to expose:
//! - A reset to generation-time defaults
//! - A read-only snapshot for the presentation layer
//! - A generation counter that invalidates deferred work
//! - A final result, once there is one

pub mod engine;

pub use engine::{Epoch, GameEngine, GameResult};
