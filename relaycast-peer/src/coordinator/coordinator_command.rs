use relaycast_core::ViewerId;
use tokio::sync::oneshot;

/// Commands a host sends to a running coordinator.
#[derive(Debug)]
pub enum CoordinatorCommand<S> {
    /// Tear everything down; `done` fires once teardown finished.
    Close { done: oneshot::Sender<()> },

    /// Manual reconnect: reset the retry count and rebuild the link now.
    Reconnect,

    /// Offer again to an existing viewer (broadcaster only).
    Renegotiate { viewer_id: ViewerId },

    Stats { reply: oneshot::Sender<S> },
}
