//! Luckyeight round engine.
//!
//! This crate contains the deterministic game logic of the wheel: the phase state machine
//! ([`RoundEngine`]), the stake ledger, the weighted draw, payout calculation, the daily
//! milestone track, and the bounded round history.
//!
//! ## Determinism requirements
//! - Do not read the wall clock inside the engine; the driver passes `now_ms` into every call.
//! - Randomness only comes from the `Rng` handed to the engine, so a seeded RNG replays a session.
//! - Outbound notifications go through [`StakeNotifier`] and never feed back into state.
//!
//! ## Minimal driver loop (example)
//! ```rust,ignore
//! use luckyeight_execution::{EngineBuilder, GameConfig, NoopNotifier, PhaseConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut engine = EngineBuilder::new(GameConfig::default(), PhaseConfig::default())
//!     .player_id("player-1")
//!     .balance(100_000)
//!     .build(StdRng::from_entropy(), NoopNotifier);
//! let mut now_ms = 0;
//! engine.start(now_ms);
//! loop {
//!     now_ms += 1_000;
//!     for event in engine.tick(now_ms) {
//!         // forward to presentation
//!     }
//! }
//! ```

pub mod config;
pub mod draw;
pub mod engine;
pub mod ledger;
pub mod notify;
pub mod payout;
pub mod progress;
pub mod records;
pub mod rejection;
pub mod round_scheduler;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use config::{ConfigError, ConfigOverrides, GameConfig, ItemOverride, MilestoneSpec};
pub use engine::{EngineBuilder, RoundEngine};
pub use ledger::{Account, BetLedger};
pub use notify::{NoopNotifier, StakeNotifier};
pub use payout::Settlement;
pub use progress::{Milestone, ProgressTracker};
pub use records::RecordStore;
pub use rejection::Rejection;
pub use round_scheduler::{PhaseConfig, RoundScheduler};
