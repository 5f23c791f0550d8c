//! Round scheduler for the wheel.
//!
//! This module provides the timing rules of the phase cycle separately from the engine that
//! mutates state. All functions are pure: the caller supplies `now_ms` and stores the returned
//! deadlines.
//!
//! ## Phases
//!
//! A round progresses through four phases and then starts over:
//! 1. **Intermission** - a "round starting" banner followed by a "get ready" period
//! 2. **Betting** - countdown running, stakes accepted
//! 3. **Drawing** - winner fixed, draw animation plays out
//! 4. **Showtime** - payout displayed, applied when the phase ends
//!
//! Drawing and showtime run longer on jackpot rounds.
//!
//! ## Session-end hints
//!
//! The config provider may supply the absolute time at which the current betting session ends.
//! When it yields a positive betting window below [`PhaseConfig::hint_ceiling_ms`] it replaces the
//! fixed betting duration for one round.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use luckyeight_execution::round_scheduler::{PhaseConfig, RoundScheduler};
//!
//! let scheduler = RoundScheduler::new(PhaseConfig::default());
//! let now_ms = 1_000;
//! let betting_ends_at = scheduler.betting_ends_at(now_ms, None);
//! assert!(scheduler.is_betting_open(Phase::Betting, betting_ends_at, now_ms));
//! assert_eq!(scheduler.countdown_secs(betting_ends_at, now_ms), 20);
//! ```

use luckyeight_types::{
    Phase, RoundType, DEFAULT_BANNER_MS, DEFAULT_BETTING_MS, DEFAULT_DRAWING_MS,
    DEFAULT_GET_READY_MS, DEFAULT_HINT_CEILING_MS, DEFAULT_JACKPOT_DRAWING_MS,
    DEFAULT_JACKPOT_SHOWTIME_MS, DEFAULT_SHOWTIME_MS, DEFAULT_TICK_MS,
};

/// Phase configuration with durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseConfig {
    /// "Round starting" banner at the top of each intermission.
    pub banner_ms: u64,
    /// "Get ready" period after the banner.
    pub get_ready_ms: u64,
    /// Betting countdown used when no session-end hint applies.
    pub betting_ms: u64,
    pub drawing_ms: u64,
    pub jackpot_drawing_ms: u64,
    pub showtime_ms: u64,
    pub jackpot_showtime_ms: u64,
    /// Interval at which the driver ticks the engine.
    pub tick_ms: u64,
    /// Hinted betting windows at or above this are discarded.
    pub hint_ceiling_ms: u64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            banner_ms: DEFAULT_BANNER_MS,
            get_ready_ms: DEFAULT_GET_READY_MS,
            betting_ms: DEFAULT_BETTING_MS,
            drawing_ms: DEFAULT_DRAWING_MS,
            jackpot_drawing_ms: DEFAULT_JACKPOT_DRAWING_MS,
            showtime_ms: DEFAULT_SHOWTIME_MS,
            jackpot_showtime_ms: DEFAULT_JACKPOT_SHOWTIME_MS,
            tick_ms: DEFAULT_TICK_MS,
            hint_ceiling_ms: DEFAULT_HINT_CEILING_MS,
        }
    }
}

impl PhaseConfig {
    /// Validate the configuration (all durations must be > 0).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.banner_ms == 0 {
            return Err("banner_ms must be greater than zero");
        }
        if self.get_ready_ms == 0 {
            return Err("get_ready_ms must be greater than zero");
        }
        if self.betting_ms == 0 {
            return Err("betting_ms must be greater than zero");
        }
        if self.drawing_ms == 0 || self.jackpot_drawing_ms == 0 {
            return Err("drawing durations must be greater than zero");
        }
        if self.showtime_ms == 0 || self.jackpot_showtime_ms == 0 {
            return Err("showtime durations must be greater than zero");
        }
        if self.tick_ms == 0 {
            return Err("tick_ms must be greater than zero");
        }
        Ok(())
    }

    /// Get the default duration for a phase of a round of the given type.
    pub fn duration_for_phase(&self, phase: Phase, round_type: RoundType) -> u64 {
        match (phase, round_type) {
            (Phase::Intermission, _) => self.banner_ms.saturating_add(self.get_ready_ms),
            (Phase::Betting, _) => self.betting_ms,
            (Phase::Drawing, RoundType::Normal) => self.drawing_ms,
            (Phase::Drawing, RoundType::Jackpot) => self.jackpot_drawing_ms,
            (Phase::Showtime, RoundType::Normal) => self.showtime_ms,
            (Phase::Showtime, RoundType::Jackpot) => self.jackpot_showtime_ms,
        }
    }

}

/// Pure timing rules for the phase cycle.
#[derive(Clone, Debug)]
pub struct RoundScheduler {
    config: PhaseConfig,
}

impl RoundScheduler {
    /// Create a new round scheduler with the given configuration.
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    /// Whether a deadline has been reached.
    #[inline]
    pub fn is_due(&self, ends_at_ms: u64, now_ms: u64) -> bool {
        now_ms >= ends_at_ms
    }

    pub fn banner_ends_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_add(self.config.banner_ms)
    }

    pub fn get_ready_ends_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_add(self.config.get_ready_ms)
    }

    /// Resolve the betting window, preferring a sane session-end hint.
    pub fn betting_ms(&self, now_ms: u64, session_end_hint_ms: Option<u64>) -> u64 {
        match session_end_hint_ms {
            Some(end_ms) if end_ms > now_ms && end_ms - now_ms < self.config.hint_ceiling_ms => {
                end_ms - now_ms
            }
            _ => self.config.betting_ms,
        }
    }

    pub fn betting_ends_at(&self, now_ms: u64, session_end_hint_ms: Option<u64>) -> u64 {
        now_ms.saturating_add(self.betting_ms(now_ms, session_end_hint_ms))
    }

    pub fn drawing_ends_at(&self, now_ms: u64, round_type: RoundType) -> u64 {
        now_ms.saturating_add(self.config.duration_for_phase(Phase::Drawing, round_type))
    }

    pub fn showtime_ends_at(&self, now_ms: u64, round_type: RoundType) -> u64 {
        now_ms.saturating_add(self.config.duration_for_phase(Phase::Showtime, round_type))
    }

    /// Check if betting is currently allowed.
    pub fn is_betting_open(&self, current_phase: Phase, phase_ends_at_ms: u64, now_ms: u64) -> bool {
        matches!(current_phase, Phase::Betting) && now_ms < phase_ends_at_ms
    }

    /// Whole seconds left on the countdown, rounded up.
    pub fn countdown_secs(&self, phase_ends_at_ms: u64, now_ms: u64) -> u64 {
        phase_ends_at_ms.saturating_sub(now_ms).div_ceil(1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PhaseConfig {
        PhaseConfig {
            banner_ms: 1_000,
            get_ready_ms: 1_500,
            betting_ms: 20_000,
            drawing_ms: 5_000,
            jackpot_drawing_ms: 7_000,
            showtime_ms: 3_000,
            jackpot_showtime_ms: 6_000,
            tick_ms: 1_000,
            hint_ceiling_ms: 120_000,
        }
    }

    #[test]
    fn test_phase_config_validation() {
        let valid = test_config();
        assert!(valid.validate().is_ok());
        assert_eq!(PhaseConfig::default(), valid);

        let invalid_banner = PhaseConfig { banner_ms: 0, ..valid };
        assert!(invalid_banner.validate().is_err());

        let invalid_betting = PhaseConfig { betting_ms: 0, ..valid };
        assert!(invalid_betting.validate().is_err());

        let invalid_drawing = PhaseConfig {
            jackpot_drawing_ms: 0,
            ..valid
        };
        assert!(invalid_drawing.validate().is_err());

        let invalid_showtime = PhaseConfig { showtime_ms: 0, ..valid };
        assert!(invalid_showtime.validate().is_err());

        let invalid_tick = PhaseConfig { tick_ms: 0, ..valid };
        assert!(invalid_tick.validate().is_err());
    }

    #[test]
    fn test_phase_config_duration_for_phase() {
        let config = test_config();
        assert_eq!(
            config.duration_for_phase(Phase::Intermission, RoundType::Normal),
            2_500
        );
        assert_eq!(config.duration_for_phase(Phase::Betting, RoundType::Jackpot), 20_000);
        assert_eq!(config.duration_for_phase(Phase::Drawing, RoundType::Normal), 5_000);
        assert_eq!(config.duration_for_phase(Phase::Drawing, RoundType::Jackpot), 7_000);
        assert_eq!(config.duration_for_phase(Phase::Showtime, RoundType::Normal), 3_000);
        assert_eq!(config.duration_for_phase(Phase::Showtime, RoundType::Jackpot), 6_000);
    }

    #[test]
    fn test_session_end_hint() {
        let scheduler = RoundScheduler::new(test_config());
        let now_ms = 1_000_000;

        // Sane hint wins.
        assert_eq!(scheduler.betting_ms(now_ms, Some(now_ms + 12_345)), 12_345);
        // Missing, past, or beyond the ceiling falls back.
        assert_eq!(scheduler.betting_ms(now_ms, None), 20_000);
        assert_eq!(scheduler.betting_ms(now_ms, Some(now_ms)), 20_000);
        assert_eq!(scheduler.betting_ms(now_ms, Some(now_ms - 5)), 20_000);
        assert_eq!(scheduler.betting_ms(now_ms, Some(now_ms + 120_000)), 20_000);
        assert_eq!(scheduler.betting_ends_at(now_ms, None), now_ms + 20_000);
    }

    #[test]
    fn test_is_betting_open() {
        let scheduler = RoundScheduler::new(test_config());

        // Betting phase, before end time
        assert!(scheduler.is_betting_open(Phase::Betting, 100_000, 50_000));

        // Betting phase, at end time (not open)
        assert!(!scheduler.is_betting_open(Phase::Betting, 100_000, 100_000));

        // Wrong phase
        assert!(!scheduler.is_betting_open(Phase::Drawing, 100_000, 50_000));
    }

    #[test]
    fn test_countdown_rounds_up() {
        let scheduler = RoundScheduler::new(test_config());
        assert_eq!(scheduler.countdown_secs(20_000, 0), 20);
        assert_eq!(scheduler.countdown_secs(20_000, 1), 20);
        assert_eq!(scheduler.countdown_secs(20_000, 19_001), 1);
        assert_eq!(scheduler.countdown_secs(20_000, 20_000), 0);
        assert_eq!(scheduler.countdown_secs(20_000, 25_000), 0);
    }

    #[test]
    fn test_deterministic_timing() {
        // Ensure same inputs always produce same outputs
        let scheduler = RoundScheduler::new(test_config());

        for i in 0..100 {
            let start = i * 1000;
            assert_eq!(scheduler.banner_ends_at(start), start + 1_000);
            assert_eq!(scheduler.get_ready_ends_at(start), start + 1_500);
            assert_eq!(
                scheduler.drawing_ends_at(start, RoundType::Jackpot),
                start + 7_000
            );
            assert_eq!(
                scheduler.showtime_ends_at(start, RoundType::Normal),
                start + 3_000
            );
        }
    }

    #[test]
    fn test_overflow_protection() {
        let config = PhaseConfig {
            betting_ms: u64::MAX,
            drawing_ms: u64::MAX,
            ..test_config()
        };
        let scheduler = RoundScheduler::new(config);

        // Should saturate instead of overflow
        assert_eq!(scheduler.betting_ends_at(u64::MAX, None), u64::MAX);
        assert_eq!(
            scheduler.drawing_ends_at(u64::MAX, RoundType::Normal),
            u64::MAX
        );
        assert_eq!(
            scheduler.showtime_ends_at(u64::MAX - 1, RoundType::Jackpot),
            u64::MAX
        );
    }
}
