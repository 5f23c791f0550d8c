//! Wheel domain types.
//!
//! Defines items/groups, round and phase state, stake maps, history records, and the
//! presentation-facing snapshot/event types used by the execution layer and clients.

mod constants;
mod events;
mod item;
mod record;
mod round;
mod snapshot;
mod stakes;

pub use constants::*;
pub use events::*;
pub use item::*;
pub use record::*;
pub use round::*;
pub use snapshot::*;
pub use stakes::*;
