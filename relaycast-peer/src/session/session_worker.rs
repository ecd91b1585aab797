use crate::coordinator::CoordinatorEvent;
use crate::media::LocalMedia;
use crate::negotiation::{NegotiationEvent, Negotiator, NegotiatorFactory};
use crate::session::{SessionAction, SessionInput, SessionKey};
use relaycast_core::PathCandidate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One asynchronous negotiator step.
#[derive(Debug)]
pub(crate) enum SessionOp {
    AttachMedia(LocalMedia),
    CreateOffer,
    AcceptOffer(String),
    ApplyAnswer(String),
    ApplyCandidate(PathCandidate),
}

/// Owns a session's negotiator and runs its steps strictly in submission order.
///
/// Results go back to the coordinator loop as `Completed` events tagged
/// with the session key. Dropping the worker closes the negotiator once
/// every queued step has run.
pub(crate) struct SessionWorker {
    key: SessionKey,
    ops: Option<mpsc::UnboundedSender<SessionOp>>,
}

impl SessionWorker {
    pub fn spawn(
        key: SessionKey,
        factory: Arc<dyn NegotiatorFactory>,
        negotiation_tx: mpsc::Sender<NegotiationEvent>,
        events_tx: mpsc::UnboundedSender<CoordinatorEvent>,
    ) -> Self {
        let (ops_tx, ops_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(key, factory, negotiation_tx, events_tx, ops_rx));
        Self {
            key,
            ops: Some(ops_tx),
        }
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn submit(&self, op: SessionOp) {
        let Some(ops) = &self.ops else {
            debug!("{} is shut down, dropping {:?}", self.key, op);
            return;
        };
        if ops.send(op).is_err() {
            debug!("Negotiator for {} is gone", self.key);
        }
    }

    /// Hand negotiator work to the worker and return the actions the owner handles itself.
    pub fn dispatch(&self, actions: Vec<SessionAction>) -> Vec<SessionAction> {
        actions
            .into_iter()
            .filter_map(|action| {
                let op = match action {
                    SessionAction::CreateOffer => SessionOp::CreateOffer,
                    SessionAction::AcceptOffer { sdp } => SessionOp::AcceptOffer(sdp),
                    SessionAction::ApplyAnswer { sdp } => SessionOp::ApplyAnswer(sdp),
                    SessionAction::ApplyCandidate(c) => SessionOp::ApplyCandidate(c),
                    other => return Some(other),
                };
                self.submit(op);
                None
            })
            .collect()
    }

    /// Stop accepting work; the negotiator is closed after the queue drains.
    pub fn shutdown(&mut self) {
        self.ops = None;
    }
}

async fn run_worker(
    key: SessionKey,
    factory: Arc<dyn NegotiatorFactory>,
    negotiation_tx: mpsc::Sender<NegotiationEvent>,
    events_tx: mpsc::UnboundedSender<CoordinatorEvent>,
    mut ops_rx: mpsc::UnboundedReceiver<SessionOp>,
) {
    let negotiator = match factory.create(key, negotiation_tx).await {
        Ok(negotiator) => negotiator,
        Err(e) => {
            warn!("Failed to create negotiator for {}: {:?}", key, e);
            let _ = events_tx.send(CoordinatorEvent::Completed {
                key,
                input: SessionInput::NegotiationFailed(format!("{:#}", e)),
            });
            return;
        }
    };

    while let Some(op) = ops_rx.recv().await {
        let Some(input) = execute(key, negotiator.as_ref(), op).await else {
            continue;
        };
        if events_tx
            .send(CoordinatorEvent::Completed { key, input })
            .is_err()
        {
            break;
        }
    }

    if let Err(e) = negotiator.close().await {
        debug!("Closing negotiator for {} failed: {:?}", key, e);
    }
    debug!("Negotiator for {} closed", key);
}

async fn execute(key: SessionKey, negotiator: &dyn Negotiator, op: SessionOp) -> Option<SessionInput> {
    match op {
        SessionOp::AttachMedia(media) => match negotiator.add_local_media(&media).await {
            Ok(()) => None,
            Err(e) => Some(failed("attach media", e)),
        },
        SessionOp::CreateOffer => Some(match negotiator.create_offer().await {
            Ok(sdp) => SessionInput::OfferCreated { sdp },
            Err(e) => failed("create offer", e),
        }),
        SessionOp::AcceptOffer(sdp) => Some(match negotiator.accept_offer(sdp).await {
            Ok(sdp) => SessionInput::AnswerCreated { sdp },
            Err(e) => failed("accept offer", e),
        }),
        SessionOp::ApplyAnswer(sdp) => Some(match negotiator.apply_answer(sdp).await {
            Ok(()) => SessionInput::RemoteAnswerApplied,
            Err(e) => failed("apply answer", e),
        }),
        SessionOp::ApplyCandidate(candidate) => {
            if let Err(e) = negotiator.add_candidate(candidate).await {
                warn!("Error adding ICE candidate for {}: {:?}", key, e);
            }
            None
        }
    }
}

fn failed(step: &str, e: anyhow::Error) -> SessionInput {
    SessionInput::NegotiationFailed(format!("{} failed: {:#}", step, e))
}
