//! Best-effort side channel to the ledger backend.

use luckyeight_types::StakeEvent;

/// Receives a notification for every accepted stake.
///
/// Implementations must not block and cannot report failure back to the engine; the local
/// ledger stays authoritative whatever happens to the notification.
pub trait StakeNotifier {
    fn notify(&self, event: StakeEvent);
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl StakeNotifier for NoopNotifier {
    fn notify(&self, _event: StakeEvent) {}
}

impl<N: StakeNotifier + ?Sized> StakeNotifier for Box<N> {
    fn notify(&self, event: StakeEvent) {
        (**self).notify(event)
    }
}

impl<N: StakeNotifier + ?Sized> StakeNotifier for std::sync::Arc<N> {
    fn notify(&self, event: StakeEvent) {
        (**self).notify(event)
    }
}
