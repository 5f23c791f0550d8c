use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bettable items on the wheel.
pub const ITEM_COUNT: usize = 8;

/// Number of items in each jackpot group.
pub const GROUP_SIZE: usize = 4;

/// One of the eight bettable outcomes.
///
/// Discriminants fix the iteration order used by the weighted draw.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Carrot = 0,
    Corn = 1,
    Tomato = 2,
    Lettuce = 3,
    Skewer = 4,
    Shrimp = 5,
    Steak = 6,
    Chicken = 7,
}

impl Item {
    pub const ALL: [Item; ITEM_COUNT] = [
        Item::Carrot,
        Item::Corn,
        Item::Tomato,
        Item::Lettuce,
        Item::Skewer,
        Item::Shrimp,
        Item::Steak,
        Item::Chicken,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The jackpot group this item belongs to.
    pub fn group(self) -> Group {
        if (self as u8) < GROUP_SIZE as u8 {
            Group::Salad
        } else {
            Group::Grill
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Item::Carrot => "carrot",
            Item::Corn => "corn",
            Item::Tomato => "tomato",
            Item::Lettuce => "lettuce",
            Item::Skewer => "skewer",
            Item::Shrimp => "shrimp",
            Item::Steak => "steak",
            Item::Chicken => "chicken",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Item {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Item::ALL.get(value as usize).copied().ok_or(())
    }
}

impl Write for Item {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Item {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Item::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for Item {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// One of the two disjoint four-item buckets that settle jackpot rounds.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Salad = 0,
    Grill = 1,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Salad, Group::Grill];

    pub fn items(self) -> [Item; GROUP_SIZE] {
        match self {
            Group::Salad => [Item::Carrot, Item::Corn, Item::Tomato, Item::Lettuce],
            Group::Grill => [Item::Skewer, Item::Shrimp, Item::Steak, Item::Chicken],
        }
    }

    #[inline]
    pub fn contains(self, item: Item) -> bool {
        item.group() == self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Salad => "salad",
            Group::Grill => "grill",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Group {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Group::Salad),
            1 => Ok(Group::Grill),
            _ => Err(()),
        }
    }
}

impl Write for Group {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Group {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Group::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for Group {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}
