use luckyeight_types::{Overlay, Phase};
use thiserror::Error;

/// Reason a user intent was refused.
///
/// Rejections never mutate engine state. Presentation treats them as silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("engine stopped")]
    Stopped,
    #[error("stakes are closed during {}", .0.as_str())]
    WrongPhase(Phase),
    #[error("blocked by {0:?}")]
    Blocked(Overlay),
    #[error("insufficient balance: need {needed}, have {balance}")]
    InsufficientBalance { needed: u64, balance: u64 },
    #[error("stake limit reached: {limit} distinct items")]
    StakeLimit { limit: usize },
    #[error("stake amount must be positive")]
    ZeroAmount,
    #[error("no chip at index {0}")]
    UnknownChip(usize),
    #[error("advanced mode is locked")]
    ModeLocked,
    #[error("milestone {0} is not ready")]
    MilestoneNotReady(usize),
    #[error("nothing to repeat")]
    NothingToRepeat,
}
