use std::sync::{Arc, Mutex};

use luckyeight_types::StakeEvent;
use rand::{rngs::StdRng, SeedableRng};

use crate::{round_scheduler::PhaseConfig, EngineBuilder, GameConfig, RoundEngine, StakeNotifier};

/// Notifier that keeps every event it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<StakeEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, oldest first.
    pub fn events(&self) -> Vec<StakeEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StakeNotifier for RecordingNotifier {
    fn notify(&self, event: StakeEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Short phases so tests can walk full cycles quickly on a synthetic clock.
pub fn fast_phases() -> PhaseConfig {
    PhaseConfig {
        banner_ms: 100,
        get_ready_ms: 150,
        betting_ms: 2_000,
        drawing_ms: 500,
        jackpot_drawing_ms: 700,
        showtime_ms: 300,
        jackpot_showtime_ms: 600,
        tick_ms: 100,
        hint_ceiling_ms: 10_000,
    }
}

/// Engine with a seeded RNG and a recording notifier.
pub fn create_engine(
    seed: u64,
    balance: u64,
) -> (RoundEngine<StdRng, RecordingNotifier>, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let engine = EngineBuilder::new(GameConfig::default(), fast_phases())
        .player_id("player-1")
        .balance(balance)
        .build(StdRng::seed_from_u64(seed), notifier.clone());
    (engine, notifier)
}
