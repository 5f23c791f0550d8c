//! Layered game configuration.
//!
//! Every value the engine consults has a built-in default (see `luckyeight_types` constants).
//! Values delivered by the config provider arrive as [`ConfigOverrides`], where every field is
//! optional, and are merged field by field with [`GameConfig::apply`]. A field that fails
//! validation is dropped and its current value retained; the remaining fields still apply.
//!
//! The engine only ever reads an immutable [`GameConfig`] snapshot, swapped in at the start of a
//! round.

use luckyeight_types::{
    Item, ADVANCED_UNLOCK_STAKE, BASIC_MODE_CHIPS, DEFAULT_CHIPS, DEFAULT_JACKPOT_BONUS,
    DEFAULT_JACKPOT_EVERY, DEFAULT_MAX_STAKES, DEFAULT_MILESTONE_REWARDS,
    DEFAULT_MILESTONE_THRESHOLDS, DEFAULT_MULTIPLIERS, DEFAULT_WIN_WEIGHTS, ITEM_COUNT,
    MILESTONE_COUNT, UNSET_WIN_WEIGHT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Threshold and one-time reward of a single milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSpec {
    pub threshold: u64,
    pub reward: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub multipliers: [u64; ITEM_COUNT],
    pub weights: [f64; ITEM_COUNT],
    /// Ascending chip denominations.
    pub chips: Vec<u64>,
    /// Chips selectable while in basic mode (a prefix of `chips`).
    pub basic_chip_count: usize,
    pub max_stakes: usize,
    pub jackpot_bonus: u64,
    pub jackpot_every: u32,
    pub milestones: [MilestoneSpec; MILESTONE_COUNT],
    pub advanced_unlock_stake: u64,
    /// Unlocks advanced mode regardless of lifetime stake.
    pub advanced_mode_override: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut milestones = [MilestoneSpec {
            threshold: 0,
            reward: 0,
        }; MILESTONE_COUNT];
        for (idx, milestone) in milestones.iter_mut().enumerate() {
            milestone.threshold = DEFAULT_MILESTONE_THRESHOLDS[idx];
            milestone.reward = DEFAULT_MILESTONE_REWARDS[idx];
        }
        Self {
            multipliers: DEFAULT_MULTIPLIERS,
            weights: DEFAULT_WIN_WEIGHTS,
            chips: DEFAULT_CHIPS.to_vec(),
            basic_chip_count: BASIC_MODE_CHIPS,
            max_stakes: DEFAULT_MAX_STAKES,
            jackpot_bonus: DEFAULT_JACKPOT_BONUS,
            jackpot_every: DEFAULT_JACKPOT_EVERY,
            milestones,
            advanced_unlock_stake: ADVANCED_UNLOCK_STAKE,
            advanced_mode_override: false,
        }
    }
}

/// Multiplier/weight entry for one item as delivered by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemOverride {
    pub item: Item,
    #[serde(default)]
    pub multiplier: Option<u64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Optional values delivered by the config provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(default)]
    pub items: Option<Vec<ItemOverride>>,
    #[serde(default)]
    pub chips: Option<Vec<u64>>,
    #[serde(default)]
    pub max_stakes: Option<usize>,
    #[serde(default)]
    pub jackpot_bonus: Option<u64>,
    #[serde(default)]
    pub milestone_rewards: Option<Vec<u64>>,
    #[serde(default)]
    pub advanced_mode_override: Option<bool>,
    /// Absolute end of the current betting session (epoch milliseconds). Consumed once.
    #[serde(default)]
    pub session_end_ms: Option<u64>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("multiplier for {item} must be positive")]
    InvalidMultiplier { item: Item },
    #[error("weight for {item} must be finite and non-negative (got {value})")]
    InvalidWeight { item: Item, value: f64 },
    #[error("item weights must not all be zero")]
    ZeroTotalWeight,
    #[error("invalid chips: {0}")]
    InvalidChips(&'static str),
    #[error("max stakes must be within 1..={max} (got {got})")]
    InvalidMaxStakes { max: usize, got: usize },
    #[error("expected {expected} milestone rewards (got {got})")]
    InvalidMilestoneRewards { expected: usize, got: usize },
}

impl GameConfig {
    /// Merge `overrides` into this config, returning the fields that were rejected.
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(items) = &overrides.items {
            let mut weights = self.weights;
            for entry in items {
                match entry.multiplier {
                    Some(0) => errors.push(ConfigError::InvalidMultiplier { item: entry.item }),
                    Some(multiplier) => self.multipliers[entry.item.index()] = multiplier,
                    None => {}
                }
                match entry.weight {
                    Some(value) if !value.is_finite() || value < 0.0 => {
                        errors.push(ConfigError::InvalidWeight {
                            item: entry.item,
                            value,
                        });
                    }
                    Some(value) => weights[entry.item.index()] = value,
                    None => {}
                }
            }
            if weights.iter().sum::<f64>() > 0.0 {
                self.weights = weights;
            } else {
                errors.push(ConfigError::ZeroTotalWeight);
            }
        }

        if let Some(chips) = &overrides.chips {
            match validate_chips(chips) {
                Ok(()) => {
                    self.chips = chips.clone();
                    self.basic_chip_count = self.basic_chip_count.min(chips.len()).max(1);
                }
                Err(err) => errors.push(err),
            }
        }

        if let Some(max_stakes) = overrides.max_stakes {
            if (1..=ITEM_COUNT).contains(&max_stakes) {
                self.max_stakes = max_stakes;
            } else {
                errors.push(ConfigError::InvalidMaxStakes {
                    max: ITEM_COUNT,
                    got: max_stakes,
                });
            }
        }

        if let Some(bonus) = overrides.jackpot_bonus {
            self.jackpot_bonus = bonus;
        }

        if let Some(rewards) = &overrides.milestone_rewards {
            if rewards.len() == MILESTONE_COUNT {
                for (milestone, reward) in self.milestones.iter_mut().zip(rewards) {
                    milestone.reward = *reward;
                }
            } else {
                errors.push(ConfigError::InvalidMilestoneRewards {
                    expected: MILESTONE_COUNT,
                    got: rewards.len(),
                });
            }
        }

        if let Some(flag) = overrides.advanced_mode_override {
            self.advanced_mode_override = flag;
        }

        errors
    }

    #[inline]
    pub fn multiplier(&self, item: Item) -> u64 {
        self.multipliers[item.index()]
    }

    /// Draw weight for `item`, falling back to the unset default for unusable values.
    #[inline]
    pub fn weight(&self, item: Item) -> f64 {
        let weight = self.weights[item.index()];
        if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            UNSET_WIN_WEIGHT
        }
    }
}

fn validate_chips(chips: &[u64]) -> Result<(), ConfigError> {
    if chips.is_empty() {
        return Err(ConfigError::InvalidChips("no denominations"));
    }
    if chips.contains(&0) {
        return Err(ConfigError::InvalidChips("zero denomination"));
    }
    if !chips.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(ConfigError::InvalidChips("denominations must be strictly ascending"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let mut config = GameConfig::default();
        let errors = config.apply(&ConfigOverrides::default());
        assert!(errors.is_empty());
        assert_eq!(config, GameConfig::default());
        assert!(ConfigOverrides::default().is_empty());
    }

    #[test]
    fn test_item_overrides_apply_per_field() {
        let mut config = GameConfig::default();
        let overrides = ConfigOverrides {
            items: Some(vec![
                ItemOverride {
                    item: Item::Chicken,
                    multiplier: Some(40),
                    weight: None,
                },
                ItemOverride {
                    item: Item::Carrot,
                    multiplier: None,
                    weight: Some(25.0),
                },
            ]),
            ..Default::default()
        };
        assert!(config.apply(&overrides).is_empty());
        assert_eq!(config.multiplier(Item::Chicken), 40);
        assert_eq!(config.weight(Item::Chicken), DEFAULT_WIN_WEIGHTS[7]);
        assert_eq!(config.weight(Item::Carrot), 25.0);
        assert_eq!(config.multiplier(Item::Carrot), DEFAULT_MULTIPLIERS[0]);
    }

    #[test]
    fn test_invalid_fields_fall_back_independently() {
        let mut config = GameConfig::default();
        let overrides = ConfigOverrides {
            items: Some(vec![ItemOverride {
                item: Item::Steak,
                multiplier: Some(0),
                weight: Some(f64::NAN),
            }]),
            chips: Some(vec![500, 100]),
            max_stakes: Some(9),
            jackpot_bonus: Some(250_000),
            milestone_rewards: Some(vec![1, 2, 3]),
            ..Default::default()
        };
        let errors = config.apply(&overrides);
        assert_eq!(errors.len(), 5);
        assert_eq!(config.multiplier(Item::Steak), DEFAULT_MULTIPLIERS[6]);
        assert_eq!(config.chips, DEFAULT_CHIPS.to_vec());
        assert_eq!(config.max_stakes, DEFAULT_MAX_STAKES);
        assert_eq!(config.milestones[0].reward, DEFAULT_MILESTONE_REWARDS[0]);
        // The valid field still lands.
        assert_eq!(config.jackpot_bonus, 250_000);
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut config = GameConfig::default();
        let overrides = ConfigOverrides {
            items: Some(
                Item::ALL
                    .into_iter()
                    .map(|item| ItemOverride {
                        item,
                        multiplier: None,
                        weight: Some(0.0),
                    })
                    .collect(),
            ),
            ..Default::default()
        };
        assert_eq!(config.apply(&overrides), vec![ConfigError::ZeroTotalWeight]);
        assert_eq!(config.weights, DEFAULT_WIN_WEIGHTS);
    }

    #[test]
    fn test_shorter_chip_table_clamps_basic_prefix() {
        let mut config = GameConfig::default();
        let overrides = ConfigOverrides {
            chips: Some(vec![50, 500]),
            milestone_rewards: Some(vec![10, 20, 30, 40, 50]),
            advanced_mode_override: Some(true),
            ..Default::default()
        };
        assert!(config.apply(&overrides).is_empty());
        assert_eq!(config.chips, vec![50, 500]);
        assert_eq!(config.basic_chip_count, 2);
        assert_eq!(config.milestones[4].reward, 50);
        assert_eq!(config.milestones[4].threshold, DEFAULT_MILESTONE_THRESHOLDS[4]);
        assert!(config.advanced_mode_override);
    }

    #[test]
    fn test_overrides_deserialize_from_provider_json() {
        let json = r#"{
            "items": [{"item": "shrimp", "multiplier": 12, "weight": 7.5}],
            "maxStakes": 4,
            "sessionEndMs": 1700000030000
        }"#;
        let overrides: ConfigOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.max_stakes, Some(4));
        assert_eq!(overrides.session_end_ms, Some(1_700_000_030_000));
        let items = overrides.items.unwrap();
        assert_eq!(items[0].item, Item::Shrimp);
        assert_eq!(items[0].weight, Some(7.5));
        assert!(overrides.chips.is_none());
    }
}
