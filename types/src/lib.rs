//! Common types used throughout luckyeight.
//!
//! The round engine, the HTTP adapters, and the live table service all speak in terms of the
//! vocabulary defined here: the eight bettable [`Item`]s and their two jackpot [`Group`]s, round
//! [`Phase`]s, settled [`RoundRecord`]s, and the [`EngineSnapshot`] handed to presentation.

pub mod wheel;
pub use wheel::*;
