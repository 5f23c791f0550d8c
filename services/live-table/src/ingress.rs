use luckyeight_execution::Rejection;
use luckyeight_types::{EngineSnapshot, Group, Item, Mode, Overlay, RoundRecord};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// User intent forwarded by presentation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Stake { item: Item, amount: u64 },
    GroupStake { group: Group, amount: u64 },
    Chip { index: usize },
    StakeChip { item: Item },
    GroupChip { group: Group },
    Rebet,
    OpenMilestone { index: usize },
    Mode { mode: Mode },
    Overlay { overlay: Overlay, open: bool },
    ResetProgress,
}

/// Result of an intent: the state after handling it and, if refused, why.
#[derive(Clone, Debug)]
pub struct IntentOutcome {
    pub snapshot: EngineSnapshot,
    pub rejection: Option<Rejection>,
}

/// Messages sent to the table actor.
pub enum Message {
    Intent {
        intent: Intent,
        response: oneshot::Sender<IntentOutcome>,
    },
    Snapshot {
        response: oneshot::Sender<EngineSnapshot>,
    },
    History {
        response: oneshot::Sender<Vec<RoundRecord>>,
    },
}

/// Mailbox for the table actor.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
}

impl Mailbox {
    pub(crate) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    pub async fn intent(&self, intent: Intent) -> Option<IntentOutcome> {
        let (response, receiver) = oneshot::channel();
        if self
            .sender
            .send(Message::Intent { intent, response })
            .await
            .is_err()
        {
            warn!("table mailbox closed; intent dropped");
            return None;
        }
        receiver.await.ok()
    }

    pub async fn snapshot(&self) -> Option<EngineSnapshot> {
        let (response, receiver) = oneshot::channel();
        if self
            .sender
            .send(Message::Snapshot { response })
            .await
            .is_err()
        {
            warn!("table mailbox closed; snapshot dropped");
            return None;
        }
        receiver.await.ok()
    }

    pub async fn history(&self) -> Option<Vec<RoundRecord>> {
        let (response, receiver) = oneshot::channel();
        if self
            .sender
            .send(Message::History { response })
            .await
            .is_err()
        {
            warn!("table mailbox closed; history dropped");
            return None;
        }
        receiver.await.ok()
    }
}
