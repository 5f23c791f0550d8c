use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use super::{Item, Outcome, RoundType, Winner};

/// Immutable snapshot of a settled round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round: u64,
    pub timestamp_ms: u64,
    pub round_type: RoundType,
    pub winner: Winner,
    /// The player's single largest-stake item at settlement.
    pub selected: Option<Item>,
    pub selected_amount: u64,
    pub total_stake: u64,
    pub payout: u64,
    pub outcome: Outcome,
    pub balance_before: u64,
    pub balance_after: u64,
}

impl Write for RoundRecord {
    fn write(&self, writer: &mut impl BufMut) {
        self.round.write(writer);
        self.timestamp_ms.write(writer);
        self.round_type.write(writer);
        self.winner.write(writer);
        self.selected.is_some().write(writer);
        if let Some(item) = self.selected {
            item.write(writer);
        }
        self.selected_amount.write(writer);
        self.total_stake.write(writer);
        self.payout.write(writer);
        self.outcome.write(writer);
        self.balance_before.write(writer);
        self.balance_after.write(writer);
    }
}

impl Read for RoundRecord {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let round = u64::read(reader)?;
        let timestamp_ms = u64::read(reader)?;
        let round_type = RoundType::read(reader)?;
        let winner = Winner::read(reader)?;
        if winner.round_type() != round_type {
            return Err(Error::Invalid("RoundRecord", "winner does not match round type"));
        }
        let selected = if bool::read(reader)? {
            Some(Item::read(reader)?)
        } else {
            None
        };
        Ok(Self {
            round,
            timestamp_ms,
            round_type,
            winner,
            selected,
            selected_amount: u64::read(reader)?,
            total_stake: u64::read(reader)?,
            payout: u64::read(reader)?,
            outcome: Outcome::read(reader)?,
            balance_before: u64::read(reader)?,
            balance_after: u64::read(reader)?,
        })
    }
}

impl EncodeSize for RoundRecord {
    fn encode_size(&self) -> usize {
        self.round.encode_size()
            + self.timestamp_ms.encode_size()
            + self.round_type.encode_size()
            + self.winner.encode_size()
            + self.selected.is_some().encode_size()
            + self.selected.map_or(0, |item| item.encode_size())
            + self.selected_amount.encode_size()
            + self.total_stake.encode_size()
            + self.payout.encode_size()
            + self.outcome.encode_size()
            + self.balance_before.encode_size()
            + self.balance_after.encode_size()
    }
}
