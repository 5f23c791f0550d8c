use luckyeight_execution::StakeNotifier;
use luckyeight_types::StakeEvent;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::warn;

use crate::Client;

/// Pending stake events held while the ledger is slow or unreachable.
pub const NOTIFY_QUEUE_SIZE: usize = 1024;

/// Forwards stake events to the ledger backend from a background task.
///
/// `notify` only enqueues, so the engine never waits on the network. Failed submissions are
/// logged and dropped; the local debit stands. Once the queue is full, new events are dropped
/// with a warning instead of growing memory without bound.
#[derive(Clone, Debug)]
pub struct HttpNotifier {
    sender: mpsc::Sender<StakeEvent>,
}

impl HttpNotifier {
    /// Spawn the submission task. It exits once every notifier clone is dropped.
    pub fn spawn(client: Client) -> (Self, JoinHandle<()>) {
        Self::spawn_with_capacity(client, NOTIFY_QUEUE_SIZE)
    }

    pub fn spawn_with_capacity(client: Client, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<StakeEvent>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let Err(err) = client.submit_stake(&event).await {
                    warn!(
                        player = %event.player_id,
                        item = event.item.as_str(),
                        amount = event.amount,
                        ?err,
                        "stake notification failed"
                    );
                }
            }
        });
        (Self { sender }, handle)
    }
}

impl StakeNotifier for HttpNotifier {
    fn notify(&self, event: StakeEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    player = %event.player_id,
                    item = event.item.as_str(),
                    amount = event.amount,
                    "stake queue full; dropping event"
                );
            }
            Err(TrySendError::Closed(_)) => {
                warn!("stake notifier closed; dropping event");
            }
        }
    }
}
