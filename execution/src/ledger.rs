//! Per-round stake ledger.
//!
//! Stakes are debited from the balance the moment they are accepted; nothing is reserved and
//! settled later, so `stakes.total() <= balance_at_round_start` always holds. Payouts are the only
//! credits and are applied once per round when showtime ends.

use luckyeight_types::{Item, Stakes};
use serde::{Deserialize, Serialize};

use crate::Rejection;

/// Account totals. All values are unsigned, so the account can never go negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    /// Cumulative all-time stake.
    pub lifetime_stake: u64,
    /// Cumulative payout since the last progress reset.
    pub today_win: u64,
}

impl Account {
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BetLedger {
    account: Account,
    stakes: Stakes,
}

impl BetLedger {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            stakes: Stakes::new(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn stakes(&self) -> &Stakes {
        &self.stakes
    }

    /// Stake `amount` on `item`, debiting the balance immediately.
    pub fn place(&mut self, item: Item, amount: u64, max_stakes: usize) -> Result<(), Rejection> {
        self.place_many(&[(item, amount)], max_stakes)
    }

    /// Stake every entry or none of them.
    ///
    /// The combined amount must fit the balance and the resulting number of distinct staked
    /// items must not exceed `max_stakes`.
    pub fn place_many(&mut self, entries: &[(Item, u64)], max_stakes: usize) -> Result<(), Rejection> {
        if entries.is_empty() || entries.iter().any(|(_, amount)| *amount == 0) {
            return Err(Rejection::ZeroAmount);
        }

        let needed = entries
            .iter()
            .try_fold(0u64, |acc, (_, amount)| acc.checked_add(*amount))
            .ok_or(Rejection::InsufficientBalance {
                needed: u64::MAX,
                balance: self.account.balance,
            })?;
        if needed > self.account.balance {
            return Err(Rejection::InsufficientBalance {
                needed,
                balance: self.account.balance,
            });
        }

        let mut projected = self.stakes;
        for (item, amount) in entries {
            projected.add(*item, *amount);
        }
        if projected.staked_count() > max_stakes {
            return Err(Rejection::StakeLimit { limit: max_stakes });
        }

        self.stakes = projected;
        self.account.balance -= needed;
        self.account.lifetime_stake = self.account.lifetime_stake.saturating_add(needed);
        Ok(())
    }

    /// Credit a settled payout to the balance and today's winnings.
    pub fn credit_payout(&mut self, payout: u64) {
        self.account.balance = self.account.balance.saturating_add(payout);
        self.account.today_win = self.account.today_win.saturating_add(payout);
    }

    /// Clear the round's stakes, returning what was staked.
    pub fn clear_stakes(&mut self) -> Stakes {
        std::mem::take(&mut self.stakes)
    }

    pub fn reset_today_win(&mut self) {
        self.account.today_win = 0;
    }
}
