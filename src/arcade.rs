//! All three games behind one object.
//!
//! Each engine gets its own ChaCha stream derived from the master seed, so
//! playing one game never shifts the random draws of another.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{ArcadeConfig, ConfigError, GameRng};
use crate::games::fog_path::{FogEngine, FogSnapshot};
use crate::games::knapsack::{KnapsackEngine, KnapsackSnapshot};
use crate::games::nim::{NimEngine, NimSnapshot};
use crate::rules::GameEngine;

/// Names a game in the arcade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Knapsack,
    Nim,
    FogPath,
}

impl GameKind {
    /// Every game, in display order.
    pub const ALL: [GameKind; 3] = [GameKind::Knapsack, GameKind::Nim, GameKind::FogPath];

    /// RNG context label for this game's stream.
    #[must_use]
    pub const fn rng_context(self) -> &'static str {
        match self {
            GameKind::Knapsack => "knapsack",
            GameKind::Nim => "nim",
            GameKind::FogPath => "fog",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKind::Knapsack => write!(f, "Knapsack"),
            GameKind::Nim => write!(f, "Nim"),
            GameKind::FogPath => write!(f, "Fog Path"),
        }
    }
}

/// Snapshots of every game at once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcadeSnapshot {
    pub knapsack: KnapsackSnapshot,
    pub nim: NimSnapshot,
    pub fog_path: FogSnapshot,
}

/// Owns one engine per game.
#[derive(Clone, Debug)]
pub struct Arcade {
    config: ArcadeConfig,
    knapsack: KnapsackEngine,
    nim: NimEngine,
    fog_path: FogEngine,
}

impl Arcade {
    /// Build every engine from a validated config.
    pub fn new(config: ArcadeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let master = GameRng::new(config.seed);
        let stream = |game: GameKind| master.for_context(game.rng_context());

        let arcade = Self {
            knapsack: KnapsackEngine::with_rng(config.knapsack.clone(), stream(GameKind::Knapsack))?,
            nim: NimEngine::with_rng(config.nim.clone(), stream(GameKind::Nim))?,
            fog_path: FogEngine::with_rng(config.fog.clone(), stream(GameKind::FogPath))?,
            config,
        };
        info!(seed = arcade.config.seed, "arcade ready");
        Ok(arcade)
    }

    /// Default configuration with the given master seed.
    pub fn from_seed(seed: u64) -> Result<Self, ConfigError> {
        Self::new(ArcadeConfig::new(seed))
    }

    /// Start a fresh round of one game.
    pub fn new_game(&mut self, game: GameKind) {
        match game {
            GameKind::Knapsack => self.knapsack.new_game(),
            GameKind::Nim => self.nim.new_game(),
            GameKind::FogPath => self.fog_path.new_game(),
        }
    }

    /// Start a fresh round of every game.
    pub fn new_all(&mut self) {
        for game in GameKind::ALL {
            self.new_game(game);
        }
    }

    /// Capture every game's state.
    #[must_use]
    pub fn snapshot(&self) -> ArcadeSnapshot {
        ArcadeSnapshot {
            knapsack: self.knapsack.snapshot(),
            nim: self.nim.snapshot(),
            fog_path: self.fog_path.snapshot(),
        }
    }

    /// Arcade configuration.
    #[must_use]
    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    /// Knapsack engine.
    #[must_use]
    pub fn knapsack(&self) -> &KnapsackEngine {
        &self.knapsack
    }

    /// Knapsack engine, for commands.
    pub fn knapsack_mut(&mut self) -> &mut KnapsackEngine {
        &mut self.knapsack
    }

    /// Nim engine.
    #[must_use]
    pub fn nim(&self) -> &NimEngine {
        &self.nim
    }

    /// Nim engine, for commands.
    pub fn nim_mut(&mut self) -> &mut NimEngine {
        &mut self.nim
    }

    /// Fog-path engine.
    #[must_use]
    pub fn fog_path(&self) -> &FogEngine {
        &self.fog_path
    }

    /// Fog-path engine, for commands.
    pub fn fog_path_mut(&mut self) -> &mut FogEngine {
        &mut self.fog_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NimConfig;

    #[test]
    fn test_same_seed_same_games() {
        let a = Arcade::from_seed(42).unwrap();
        let b = Arcade::from_seed(42).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_streams_are_independent() {
        let mut a = Arcade::from_seed(42).unwrap();
        let mut b = Arcade::from_seed(42).unwrap();

        // Rerolling one game leaves the others' next draws untouched
        a.new_game(GameKind::Knapsack);
        a.new_game(GameKind::Knapsack);
        b.new_game(GameKind::Nim);
        a.new_game(GameKind::Nim);

        assert_eq!(a.nim().piles(), b.nim().piles());
    }

    #[test]
    fn test_new_all_bumps_every_epoch() {
        let mut arcade = Arcade::from_seed(7).unwrap();
        let before = arcade.snapshot();

        arcade.new_all();

        let after = arcade.snapshot();
        assert_eq!(after.knapsack.epoch, before.knapsack.epoch.next());
        assert_eq!(after.nim.epoch, before.nim.epoch.next());
        assert_eq!(after.fog_path.epoch, before.fog_path.epoch.next());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ArcadeConfig::new(1).with_nim(NimConfig::default().with_pile_count(0));
        assert!(Arcade::new(config).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(GameKind::FogPath.to_string(), "Fog Path");
        assert_eq!(GameKind::ALL.len(), 3);
    }
}
