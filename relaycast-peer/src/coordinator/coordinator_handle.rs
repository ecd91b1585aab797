use crate::coordinator::{BroadcasterStats, CoordinatorCommand, ViewerStats};
use crate::error::CoordinatorError;
use relaycast_core::ViewerId;
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to a running coordinator.
pub struct CoordinatorHandle<S> {
    commands: mpsc::Sender<CoordinatorCommand<S>>,
}

pub type BroadcasterHandle = CoordinatorHandle<BroadcasterStats>;
pub type ViewerHandle = CoordinatorHandle<ViewerStats>;

impl<S> Clone for CoordinatorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<S> CoordinatorHandle<S> {
    pub(crate) fn new(commands: mpsc::Sender<CoordinatorCommand<S>>) -> Self {
        Self { commands }
    }

    /// Tear the coordinator down and wait for it. Safe to call repeatedly.
    pub async fn close(&self) {
        let (done, finished) = oneshot::channel();
        if self
            .commands
            .send(CoordinatorCommand::Close { done })
            .await
            .is_err()
        {
            return;
        }
        let _ = finished.await;
    }

    pub async fn reconnect(&self) -> Result<(), CoordinatorError> {
        self.send(CoordinatorCommand::Reconnect).await
    }

    pub async fn renegotiate(&self, viewer_id: ViewerId) -> Result<(), CoordinatorError> {
        self.send(CoordinatorCommand::Renegotiate { viewer_id })
            .await
    }

    pub async fn stats(&self) -> Result<S, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::Stats { reply }).await?;
        rx.await.map_err(|_| CoordinatorError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, cmd: CoordinatorCommand<S>) -> Result<(), CoordinatorError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| CoordinatorError::Closed)
    }
}
