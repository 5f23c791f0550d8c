//! Payout calculation.
//!
//! Normal round: the stake on the winning item times its multiplier.
//!
//! Jackpot round: every staked item of the winning group pays stake times multiplier, plus a
//! share of the jackpot bonus. The full bonus is paid only when the player staked on all four
//! group items and on nothing outside the group; otherwise the bonus is scaled by
//! `matched / 4` and rounded. Nothing is paid when no group item was staked.

use luckyeight_types::{Group, Item, Outcome, Stakes, Winner, GROUP_SIZE};

use crate::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Winner,
    pub payout: u64,
    /// Multiplier winnings before any jackpot bonus.
    pub base_win: u64,
    pub bonus: u64,
    /// Staked items among the winners.
    pub matched: usize,
    pub exact_four: bool,
    pub total_stake: u64,
    pub outcome: Outcome,
}

/// Classify a settled round.
pub fn classify(payout: u64, total_stake: u64) -> Outcome {
    if payout > 0 {
        Outcome::Win
    } else if total_stake == 0 {
        Outcome::NoBet
    } else {
        Outcome::Lose
    }
}

pub fn settle_normal(stakes: &Stakes, winner: Item, config: &GameConfig) -> Settlement {
    let stake = stakes.get(winner);
    let payout = if stake > 0 {
        stake.saturating_mul(config.multiplier(winner))
    } else {
        0
    };
    let total_stake = stakes.total();
    Settlement {
        winner: Winner::Item(winner),
        payout,
        base_win: payout,
        bonus: 0,
        matched: usize::from(stake > 0),
        exact_four: false,
        total_stake,
        outcome: classify(payout, total_stake),
    }
}

pub fn settle_jackpot(stakes: &Stakes, group: Group, config: &GameConfig) -> Settlement {
    let matched: Vec<Item> = group
        .items()
        .into_iter()
        .filter(|item| stakes.is_staked(*item))
        .collect();
    let base_win = matched.iter().fold(0u64, |acc, item| {
        acc.saturating_add(stakes.get(*item).saturating_mul(config.multiplier(*item)))
    });
    let exact_four = matched.len() == GROUP_SIZE && !stakes.has_stake_outside(group);
    let bonus = if matched.is_empty() {
        0
    } else if exact_four {
        config.jackpot_bonus
    } else {
        scaled_bonus(config.jackpot_bonus, matched.len())
    };
    let payout = if matched.is_empty() {
        0
    } else {
        base_win.saturating_add(bonus)
    };
    let total_stake = stakes.total();
    Settlement {
        winner: Winner::Group(group),
        payout,
        base_win,
        bonus,
        matched: matched.len(),
        exact_four,
        total_stake,
        outcome: classify(payout, total_stake),
    }
}

pub fn settle(stakes: &Stakes, winner: Winner, config: &GameConfig) -> Settlement {
    match winner {
        Winner::Item(item) => settle_normal(stakes, item, config),
        Winner::Group(group) => settle_jackpot(stakes, group, config),
    }
}

/// `round(bonus * matched / 4)`, rounding halves up.
fn scaled_bonus(bonus: u64, matched: usize) -> u64 {
    let numerator = (bonus as u128) * (matched as u128) + (GROUP_SIZE as u128) / 2;
    (numerator / GROUP_SIZE as u128).min(u64::MAX as u128) as u64
}
