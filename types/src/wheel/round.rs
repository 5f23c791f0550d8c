use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use super::{Group, Item};

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    #[default]
    Normal = 0,
    Jackpot = 1,
}

impl RoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Normal => "normal",
            RoundType::Jackpot => "jackpot",
        }
    }
}

impl TryFrom<u8> for RoundType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RoundType::Normal),
            1 => Ok(RoundType::Jackpot),
            _ => Err(()),
        }
    }
}

impl Write for RoundType {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for RoundType {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        RoundType::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for RoundType {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// Position of the round in the phase cycle.
///
/// The cycle has no terminal state: `Showtime` always leads back to `Intermission`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Intermission,
    Betting,
    Drawing,
    Showtime,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intermission => "intermission",
            Phase::Betting => "betting",
            Phase::Drawing => "drawing",
            Phase::Showtime => "showtime",
        }
    }
}

/// The two back-to-back delays that make up an intermission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntermissionStage {
    Banner,
    GetReady,
}

/// Classification of a settled round from the player's point of view.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win = 0,
    Lose = 1,
    NoBet = 2,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::NoBet => "no_bet",
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Win),
            1 => Ok(Outcome::Lose),
            2 => Ok(Outcome::NoBet),
            _ => Err(()),
        }
    }
}

impl Write for Outcome {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Outcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Outcome::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for Outcome {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// Presentation overlays that block stake placement while open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    SettlementPanel,
    MilestonePopup,
    InfoDialog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Basic,
    Advanced,
}

/// The drawn result of a round: one item for normal rounds, one group for jackpot rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Winner {
    Item(Item),
    Group(Group),
}

impl Winner {
    pub fn round_type(&self) -> RoundType {
        match self {
            Winner::Item(_) => RoundType::Normal,
            Winner::Group(_) => RoundType::Jackpot,
        }
    }
}

impl Write for Winner {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Winner::Item(item) => {
                0u8.write(writer);
                item.write(writer);
            }
            Winner::Group(group) => {
                1u8.write(writer);
                group.write(writer);
            }
        }
    }
}

impl Read for Winner {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Winner::Item(Item::read(reader)?)),
            1 => Ok(Winner::Group(Group::read(reader)?)),
            tag => Err(Error::InvalidEnum(tag)),
        }
    }
}

impl EncodeSize for Winner {
    fn encode_size(&self) -> usize {
        u8::SIZE * 2
    }
}
