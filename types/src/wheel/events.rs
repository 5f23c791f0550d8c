use serde::{Deserialize, Serialize};

use super::{IntermissionStage, Item, Phase, RoundRecord, RoundType, Winner};

/// State changes emitted by the engine while it advances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    PhaseChanged {
        round: u64,
        round_type: RoundType,
        phase: Phase,
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<IntermissionStage>,
    },
    Countdown {
        round: u64,
        secs: u64,
    },
    WinnerDrawn {
        round: u64,
        winner: Winner,
    },
    Settled {
        record: RoundRecord,
    },
    PayoutApplied {
        round: u64,
        payout: u64,
        balance: u64,
    },
    MilestoneReady {
        index: usize,
        threshold: u64,
    },
}

/// Notification sent to the ledger backend after every accepted stake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeEvent {
    pub player_id: String,
    /// Local balance after the debit.
    pub balance: u64,
    pub amount: u64,
    pub item: Item,
}
