//! Engine configuration types.
//!
//! Each engine is built from its own config:
//! - `KnapsackConfig`: item count, default capacity, stat ranges
//! - `NimConfig`: pile layout, move limits, rearrange rules, AI delay
//! - `FogConfig`: grid size, weights, fog density and rule variant
//! - `ArcadeConfig`: master seed plus all three
//!
//! Configs are plain serde structs so a presentation layer can ship them as
//! JSON. Engines call `validate()` before accepting one.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::error::ConfigError;

/// Inclusive integer range used for random generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

impl IntRange {
    /// Create a new range `min..=max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Does the range contain `value`?
    #[must_use]
    pub const fn contains(self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    /// As a std range for drawing.
    #[must_use]
    pub const fn as_range(self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    fn check(self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::EmptyRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for IntRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Knapsack game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnapsackConfig {
    /// Items generated per round.
    pub max_items: usize,

    /// Capacity at construction time.
    pub capacity: u32,

    /// Item weight range.
    pub weight_range: IntRange,

    /// Item value range.
    pub value_range: IntRange,
}

impl Default for KnapsackConfig {
    fn default() -> Self {
        Self {
            max_items: 14,
            capacity: 100,
            weight_range: IntRange::new(5, 25),
            value_range: IntRange::new(10, 50),
        }
    }
}

impl KnapsackConfig {
    /// Set the number of generated items.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Set the starting capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the weight range.
    #[must_use]
    pub fn with_weight_range(mut self, min: u32, max: u32) -> Self {
        self.weight_range = IntRange::new(min, max);
        self
    }

    /// Set the value range.
    #[must_use]
    pub fn with_value_range(mut self, min: u32, max: u32) -> Self {
        self.value_range = IntRange::new(min, max);
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items == 0 {
            return Err(ConfigError::invalid("max_items", "must be at least 1"));
        }
        self.weight_range.check("weight_range")?;
        self.value_range.check("value_range")?;
        if self.weight_range.min == 0 {
            return Err(ConfigError::invalid("weight_range", "weights must be positive"));
        }
        if self.value_range.min == 0 {
            return Err(ConfigError::invalid("value_range", "values must be positive"));
        }
        Ok(())
    }
}

/// Nim-rearrange game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NimConfig {
    /// Number of piles.
    pub pile_count: usize,

    /// Upper bound for any pile after a rearrange.
    pub pile_capacity: u32,

    /// Most stones one removal may take.
    pub max_remove_per_turn: u32,

    /// Range for fresh pile sizes.
    pub initial_pile_range: IntRange,

    /// Rearranges each side gets per game.
    pub rearrange_budget: u32,

    /// Largest number of stones a rearrange moves.
    pub max_rearrange_shift: u32,

    /// Delay before the AI replies, in milliseconds.
    pub ai_delay_ms: u64,

    /// Does a committed rearrange pass the turn?
    ///
    /// When `false` the player must still remove stones in the same turn.
    pub rearrange_ends_turn: bool,
}

impl Default for NimConfig {
    fn default() -> Self {
        Self {
            pile_count: 4,
            pile_capacity: 15,
            max_remove_per_turn: 5,
            initial_pile_range: IntRange::new(3, 13),
            rearrange_budget: 1,
            max_rearrange_shift: 3,
            ai_delay_ms: 450,
            rearrange_ends_turn: false,
        }
    }
}

impl NimConfig {
    /// Set the number of piles.
    #[must_use]
    pub fn with_pile_count(mut self, count: usize) -> Self {
        self.pile_count = count;
        self
    }

    /// Set the per-turn removal limit.
    #[must_use]
    pub fn with_max_remove(mut self, max: u32) -> Self {
        self.max_remove_per_turn = max;
        self
    }

    /// Set the rearrange budget for each side.
    #[must_use]
    pub fn with_rearrange_budget(mut self, budget: u32) -> Self {
        self.rearrange_budget = budget;
        self
    }

    /// Set the AI reply delay.
    #[must_use]
    pub fn with_ai_delay_ms(mut self, delay_ms: u64) -> Self {
        self.ai_delay_ms = delay_ms;
        self
    }

    /// Let a committed rearrange end the turn.
    #[must_use]
    pub fn rearrange_ends_turn(mut self, ends_turn: bool) -> Self {
        self.rearrange_ends_turn = ends_turn;
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pile_count == 0 {
            return Err(ConfigError::invalid("pile_count", "must be at least 1"));
        }
        if self.max_remove_per_turn == 0 {
            return Err(ConfigError::invalid("max_remove_per_turn", "must be at least 1"));
        }
        if self.max_rearrange_shift == 0 {
            return Err(ConfigError::invalid("max_rearrange_shift", "must be at least 1"));
        }
        self.initial_pile_range.check("initial_pile_range")?;
        if self.initial_pile_range.min == 0 {
            return Err(ConfigError::invalid("initial_pile_range", "piles must start non-empty"));
        }
        if self.initial_pile_range.max > self.pile_capacity {
            return Err(ConfigError::invalid(
                "initial_pile_range",
                format!("exceeds pile capacity {}", self.pile_capacity),
            ));
        }
        Ok(())
    }
}

/// Fog shortest-path game configuration.
///
/// Two rule sets ship as presets:
/// - `expedition()` (default): no backtracking, no cards, walk commits on
///   reaching the goal
/// - `classic()`: backtracking, five reveal cards, explicit commit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    /// Grid rows.
    pub rows: usize,

    /// Grid columns.
    pub cols: usize,

    /// Global edge weight bounds.
    pub weight_range: IntRange,

    /// Chance an edge starts revealed.
    pub reveal_probability: f64,

    /// May the player step back to an earlier node?
    pub allow_backtrack: bool,

    /// Reveal cards per game. `None` disables the mechanic.
    pub card_budget: Option<u32>,

    /// Hidden edges revealed by one card.
    pub edges_per_card: usize,

    /// Commit automatically on reaching the goal.
    pub auto_commit: bool,

    /// Extra random reveals when a game starts.
    pub initial_reveals: usize,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self::expedition()
    }
}

impl FogConfig {
    /// No backtracking, no cards, auto-commit at the goal.
    #[must_use]
    pub fn expedition() -> Self {
        Self {
            rows: 3,
            cols: 3,
            weight_range: IntRange::new(1, 9),
            reveal_probability: 0.25,
            allow_backtrack: false,
            card_budget: None,
            edges_per_card: 4,
            auto_commit: true,
            initial_reveals: 0,
        }
    }

    /// Backtracking, reveal cards and explicit commit.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            allow_backtrack: true,
            card_budget: Some(5),
            auto_commit: false,
            initial_reveals: 3,
            ..Self::expedition()
        }
    }

    /// Set the grid size.
    #[must_use]
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the starting reveal probability.
    #[must_use]
    pub fn with_reveal_probability(mut self, probability: f64) -> Self {
        self.reveal_probability = probability;
        self
    }

    /// Set the card budget (`None` disables cards).
    #[must_use]
    pub fn with_card_budget(mut self, budget: Option<u32>) -> Self {
        self.card_budget = budget;
        self
    }

    /// Number of grid nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::invalid("rows/cols", "grid must be at least 1x1"));
        }
        if self.node_count() < 2 {
            return Err(ConfigError::invalid("rows/cols", "start and goal must differ"));
        }
        self.weight_range.check("weight_range")?;
        if !(0.0..=1.0).contains(&self.reveal_probability) {
            return Err(ConfigError::invalid(
                "reveal_probability",
                format!("{} is not a probability", self.reveal_probability),
            ));
        }
        if self.card_budget.is_some() && self.edges_per_card == 0 {
            return Err(ConfigError::invalid("edges_per_card", "cards must reveal something"));
        }
        Ok(())
    }
}

/// Configuration for the full arcade.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Master seed; each game derives its own stream.
    pub seed: u64,
    pub knapsack: KnapsackConfig,
    pub nim: NimConfig,
    pub fog: FogConfig,
}

impl ArcadeConfig {
    /// Create a config with default games and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Replace the knapsack config.
    #[must_use]
    pub fn with_knapsack(mut self, config: KnapsackConfig) -> Self {
        self.knapsack = config;
        self
    }

    /// Replace the nim config.
    #[must_use]
    pub fn with_nim(mut self, config: NimConfig) -> Self {
        self.nim = config;
        self
    }

    /// Replace the fog config.
    #[must_use]
    pub fn with_fog(mut self, config: FogConfig) -> Self {
        self.fog = config;
        self
    }

    /// Validate all three game configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.knapsack.validate()?;
        self.nim.validate()?;
        self.fog.validate()
    }
}
