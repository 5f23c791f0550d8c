use super::ITEM_COUNT;

/// Payout multipliers per item, in [`Item::ALL`](super::Item::ALL) order.
pub const DEFAULT_MULTIPLIERS: [u64; ITEM_COUNT] = [5, 5, 5, 5, 10, 15, 25, 45];

/// Relative draw weights per item, in [`Item::ALL`](super::Item::ALL) order.
pub const DEFAULT_WIN_WEIGHTS: [f64; ITEM_COUNT] = [19.0, 19.0, 19.0, 19.0, 10.0, 6.0, 4.0, 2.0];

/// Weight used for an item whose weight was never provided.
pub const UNSET_WIN_WEIGHT: f64 = 1.0;

/// Chip denominations, ascending.
pub const DEFAULT_CHIPS: [u64; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// Number of chip denominations selectable in basic mode.
pub const BASIC_MODE_CHIPS: usize = 3;

/// Maximum number of distinct items a player may stake on in one round.
pub const DEFAULT_MAX_STAKES: usize = 6;

/// Bonus pool paid (fully or pro rata) on jackpot rounds.
pub const DEFAULT_JACKPOT_BONUS: u64 = 100_000;

/// Completed normal rounds after which the next round is forced to be a jackpot round.
pub const DEFAULT_JACKPOT_EVERY: u32 = 10;

/// Number of milestones on the daily progress track.
pub const MILESTONE_COUNT: usize = 5;

/// Ascending `todayWin` thresholds that unlock each milestone.
pub const DEFAULT_MILESTONE_THRESHOLDS: [u64; MILESTONE_COUNT] =
    [10_000, 100_000, 500_000, 1_000_000, 5_000_000];

/// One-time reward yielded when each milestone is opened.
pub const DEFAULT_MILESTONE_REWARDS: [u64; MILESTONE_COUNT] = [100, 500, 2_000, 5_000, 20_000];

/// Lifetime stake required before advanced mode can be selected.
pub const ADVANCED_UNLOCK_STAKE: u64 = 1_000_000;

/// Rounds retained in the history log.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Upper bound accepted when decoding a history log.
pub const MAX_HISTORY_CAPACITY: usize = 1_024;

/// Number assigned to the first round after start.
pub const DEFAULT_FIRST_ROUND: u64 = 1;

/// "Round starting" banner shown at the top of each intermission.
pub const DEFAULT_BANNER_MS: u64 = 1_000;

/// "Get ready" period that follows the banner.
pub const DEFAULT_GET_READY_MS: u64 = 1_500;

/// Betting countdown used when no session-end hint is available.
pub const DEFAULT_BETTING_MS: u64 = 20_000;

/// Draw animation window for normal rounds.
pub const DEFAULT_DRAWING_MS: u64 = 5_000;

/// Draw animation window for jackpot rounds.
pub const DEFAULT_JACKPOT_DRAWING_MS: u64 = 7_000;

/// Result display window for normal rounds.
pub const DEFAULT_SHOWTIME_MS: u64 = 3_000;

/// Result display window for jackpot rounds (extra reveal time).
pub const DEFAULT_JACKPOT_SHOWTIME_MS: u64 = 6_000;

/// Countdown tick interval.
pub const DEFAULT_TICK_MS: u64 = 1_000;

/// Session-end hints resolving to a betting window at or above this are ignored.
pub const DEFAULT_HINT_CEILING_MS: u64 = 120_000;
