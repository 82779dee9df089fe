//! Sides of a human-vs-AI game and per-side data storage.
//!
//! ## Side
//!
//! The two participants: the human `Player` and the `Ai` opponent.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A participant in a two-sided game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human at the presentation layer.
    Player,
    /// The built-in opponent.
    Ai,
}

impl Side {
    /// Both sides, player first.
    pub const ALL: [Side; 2] = [Side::Player, Side::Ai];

    /// Slot index (0 = player, 1 = AI).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Ai => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "You"),
            Side::Ai => write!(f, "AI"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use puzzle_arcade::core::{Side, SideMap};
///
/// let mut budget: SideMap<u32> = SideMap::with_value(1);
/// budget[Side::Ai] -= 1;
///
/// assert_eq!(budget[Side::Player], 1);
/// assert_eq!(budget[Side::Ai], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player), factory(Side::Ai)],
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_basics() {
        assert_eq!(Side::Player.index(), 0);
        assert_eq!(Side::Ai.index(), 1);
        assert_eq!(Side::Player.opponent(), Side::Ai);
        assert_eq!(Side::Ai.opponent(), Side::Player);
        assert_eq!(format!("{}", Side::Player), "You");
        assert_eq!(format!("{}", Side::Ai), "AI");
    }

    #[test]
    fn test_side_map_new() {
        let map: SideMap<i32> = SideMap::new(|s| s.index() as i32 * 10);

        assert_eq!(map[Side::Player], 0);
        assert_eq!(map[Side::Ai], 10);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<u32> = SideMap::with_value(1);

        map[Side::Player] = 0;

        assert_eq!(map[Side::Player], 0);
        assert_eq!(map[Side::Ai], 1);
    }

    #[test]
    fn test_side_map_iter() {
        let map: SideMap<u32> = SideMap::new(|s| s.index() as u32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::Player, &0), (Side::Ai, &1)]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map: SideMap<u32> = SideMap::new(|s| s.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
