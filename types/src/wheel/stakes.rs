use serde::{Deserialize, Serialize};

use super::{Group, Item, ITEM_COUNT};

/// Per-item staked amounts for a single round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakes([u64; ITEM_COUNT]);

impl Stakes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, item: Item) -> u64 {
        self.0[item.index()]
    }

    #[inline]
    pub fn is_staked(&self, item: Item) -> bool {
        self.get(item) > 0
    }

    pub fn add(&mut self, item: Item, amount: u64) {
        let slot = &mut self.0[item.index()];
        *slot = slot.saturating_add(amount);
    }

    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, amount| acc.saturating_add(*amount))
    }

    /// Number of items carrying a nonzero stake.
    pub fn staked_count(&self) -> usize {
        self.0.iter().filter(|amount| **amount > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|amount| *amount == 0)
    }

    /// Nonzero stakes in item order.
    pub fn iter(&self) -> impl Iterator<Item = (Item, u64)> + '_ {
        Item::ALL
            .into_iter()
            .map(|item| (item, self.get(item)))
            .filter(|(_, amount)| *amount > 0)
    }

    /// The single largest stake; ties resolve to the earlier item.
    pub fn largest(&self) -> Option<(Item, u64)> {
        self.iter()
            .fold(None, |best: Option<(Item, u64)>, (item, amount)| match best {
                Some((_, top)) if top >= amount => best,
                _ => Some((item, amount)),
            })
    }

    /// Whether any stake sits on an item outside `group`.
    pub fn has_stake_outside(&self, group: Group) -> bool {
        self.iter().any(|(item, _)| !group.contains(item))
    }
}
