use serde::{Deserialize, Serialize};

use super::{
    IntermissionStage, Mode, Outcome, Overlay, Phase, RoundRecord, RoundType, Stakes, Winner,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub threshold: u64,
    pub reward: u64,
    pub ready: bool,
    pub opened: bool,
}

/// Everything presentation needs to render the current state of the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub round: u64,
    pub round_type: RoundType,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<IntermissionStage>,
    pub time_left_ms: u64,
    /// Whole seconds remaining, rounded up; only meaningful while betting.
    pub time_left_secs: u64,
    pub stakes: Stakes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub balance: u64,
    pub lifetime_stake: u64,
    pub today_win: u64,
    pub bonus_claimed: u64,
    pub milestones: Vec<MilestoneView>,
    pub progress: f64,
    pub mode: Mode,
    pub advanced_unlocked: bool,
    pub chips: Vec<u64>,
    pub selected_chip: usize,
    pub overlays: Vec<Overlay>,
    /// Normal rounds left before a jackpot round is forced.
    pub jackpot_in: u32,
    pub history: Vec<RoundRecord>,
}
