//! Knapsack items and the generated item set.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::{KnapsackConfig, RandomSource};

/// Display names handed out in generation order.
pub const ITEM_NAMES: [&str; 14] = [
    "Laptop", "Book", "Camera", "Tablet", "Phone", "Charger", "Snacks", "Water", "Jacket",
    "Shoes", "Wallet", "Keys", "Glasses", "Watch",
];

/// Item identifier: the item's position in its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub usize);

impl ItemId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// A packable item. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub weight: u32,
    pub value: u32,
}

impl Item {
    /// Create an item. Weight and value must be positive.
    pub fn new(id: usize, name: impl Into<String>, weight: u32, value: u32) -> Self {
        assert!(weight > 0, "Item weight must be positive");
        assert!(value > 0, "Item value must be positive");
        Self {
            id: ItemId(id),
            name: name.into(),
            weight,
            value,
        }
    }

    /// Compare value/weight ratios exactly (no floating point).
    ///
    /// `Greater` means `self` is denser than `other`.
    #[must_use]
    pub fn cmp_ratio(&self, other: &Item) -> Ordering {
        let lhs = u64::from(self.value) * u64::from(other.weight);
        let rhs = u64::from(other.value) * u64::from(self.weight);
        lhs.cmp(&rhs)
    }
}

/// Ordered items of one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    /// Wrap an explicit item list. Ids must equal positions.
    pub fn from_items(items: Vec<Item>) -> Self {
        for (index, item) in items.iter().enumerate() {
            assert_eq!(item.id, ItemId(index), "Item ids must match their positions");
        }
        Self { items }
    }

    /// Draw a fresh set from the configured ranges.
    ///
    /// Each item draws its weight, then its value.
    pub fn generate<R: RandomSource>(config: &KnapsackConfig, rng: &mut R) -> Self {
        let items = (0..config.max_items)
            .map(|i| {
                let weight = rng.gen_range_inclusive(config.weight_range.as_range());
                let value = rng.gen_range_inclusive(config.value_range.as_range());
                Item::new(i, ITEM_NAMES[i % ITEM_NAMES.len()], weight, value)
            })
            .collect();
        Self { items }
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    /// Does the set contain `id`?
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        id.0 < self.items.len()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the set empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in id order.
    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    /// Iterate in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Total (weight, value) of a subset. Unknown ids are skipped.
    pub fn totals<'a>(&self, ids: impl IntoIterator<Item = &'a ItemId>) -> (u32, u32) {
        ids.into_iter()
            .filter_map(|&id| self.get(id))
            .fold((0, 0), |(w, v), item| (w + item.weight, v + item.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;

    #[test]
    fn test_generate_uses_config_ranges() {
        let config = KnapsackConfig::default().with_max_items(3);
        let mut rng = ScriptedRng::new([7, 30, 25, 10, 1, 99]);

        let set = ItemSet::generate(&config, &mut rng);

        assert_eq!(set.len(), 3);
        assert_eq!((set.as_slice()[0].weight, set.as_slice()[0].value), (7, 30));
        assert_eq!((set.as_slice()[1].weight, set.as_slice()[1].value), (25, 10));
        // Scripted values are clamped into range
        assert_eq!((set.as_slice()[2].weight, set.as_slice()[2].value), (5, 50));
        assert_eq!(set.as_slice()[0].name, "Laptop");
        assert_eq!(set.as_slice()[2].name, "Camera");
    }

    #[test]
    fn test_names_cycle_past_roster() {
        let config = KnapsackConfig::default().with_max_items(16);
        let set = ItemSet::generate(&config, &mut ScriptedRng::default());

        assert_eq!(set.as_slice()[14].name, "Laptop");
        assert_eq!(set.as_slice()[15].name, "Book");
    }

    #[test]
    fn test_cmp_ratio_is_exact() {
        let a = Item::new(0, "a", 3, 10);
        let b = Item::new(1, "b", 6, 20);
        let c = Item::new(2, "c", 5, 10);

        assert_eq!(a.cmp_ratio(&b), Ordering::Equal);
        assert_eq!(a.cmp_ratio(&c), Ordering::Greater);
        assert_eq!(c.cmp_ratio(&a), Ordering::Less);
    }

    #[test]
    fn test_totals() {
        let set = ItemSet::from_items(vec![
            Item::new(0, "a", 5, 10),
            Item::new(1, "b", 7, 12),
        ]);

        assert_eq!(set.totals(&[ItemId(0), ItemId(1)]), (12, 22));
        assert_eq!(set.totals(&[ItemId(1), ItemId(9)]), (7, 12));
        assert!(set.contains(ItemId(1)));
        assert!(!set.contains(ItemId(2)));
    }

    #[test]
    #[should_panic(expected = "Item weight must be positive")]
    fn test_zero_weight_panics() {
        Item::new(0, "bad", 0, 10);
    }
}
