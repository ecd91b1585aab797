use crate::coordinator::{Capabilities, CoordinatorConfig, CoordinatorEvent};
use crate::link::{LinkEnvelope, LinkEvent, SignalingLink};
use crate::negotiation::NegotiationEvent;
use crate::reconnect::{ReconnectionController, RetryDecision};
use crate::session::{SessionKey, SessionWorker};
use crate::status::StatusEvent;
use relaycast_core::{Role, SignalMessage, StreamId, ViewerId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Result of asking for a retry after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryOutcome {
    Scheduled,
    AlreadyPending,
    GaveUp,
}

/// Receivers owned by the coordinator loop.
pub(crate) struct CoordinatorChannels {
    pub link_rx: mpsc::UnboundedReceiver<LinkEnvelope>,
    pub transport_rx: mpsc::Receiver<NegotiationEvent>,
    pub event_rx: mpsc::UnboundedReceiver<CoordinatorEvent>,
}

/// State shared by both coordinator roles: the link, retry bookkeeping,
/// status reporting and the senders every spawned task reports through.
pub(crate) struct CoordinatorCore {
    pub config: CoordinatorConfig,
    pub role: Role,
    pub caps: Capabilities,
    pub link: SignalingLink,
    pub reconnect: ReconnectionController,
    link_tx: mpsc::UnboundedSender<LinkEnvelope>,
    transport_tx: mpsc::Sender<NegotiationEvent>,
    events_tx: mpsc::UnboundedSender<CoordinatorEvent>,
    retry_timer: Option<(u64, JoinHandle<()>)>,
    next_token: u64,
    last_generation: u64,
    closed: bool,
}

impl CoordinatorCore {
    pub fn new(
        config: CoordinatorConfig,
        role: Role,
        caps: Capabilities,
    ) -> (Self, CoordinatorChannels) {
        let (link_tx, link_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (events_tx, event_rx) = mpsc::unbounded_channel();

        let link = SignalingLink::new(
            role,
            config.stream_id.clone(),
            config.wire_format,
            &config.relay_url,
        );
        let reconnect = ReconnectionController::new(config.reconnect);

        let core = Self {
            config,
            role,
            caps,
            link,
            reconnect,
            link_tx,
            transport_tx,
            events_tx,
            retry_timer: None,
            next_token: 0,
            last_generation: 0,
            closed: false,
        };
        let channels = CoordinatorChannels {
            link_rx,
            transport_rx,
            event_rx,
        };
        (core, channels)
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.config.stream_id
    }

    pub fn events(&self) -> mpsc::UnboundedSender<CoordinatorEvent> {
        self.events_tx.clone()
    }

    pub fn status(&self, event: StatusEvent) {
        self.caps
            .observer
            .on_status(&self.config.stream_id, self.role, &event);
    }

    pub fn open_link(&mut self) {
        self.status(StatusEvent::RelayConnecting {
            attempt: self.reconnect.retry_count(),
        });
        self.link
            .open(self.caps.transport.clone(), self.link_tx.clone());
    }

    /// Pass a link envelope through the epoch filter and report it.
    pub fn accept_link(&mut self, envelope: LinkEnvelope) -> Option<LinkEvent> {
        let event = self.link.accept(envelope)?;
        match &event {
            LinkEvent::Opened => self.status(StatusEvent::RelayOpened),
            LinkEvent::Closed { code, reason } => self.status(StatusEvent::RelayClosed {
                code: *code,
                reason: reason.clone(),
            }),
            LinkEvent::Failed(reason) => self.status(StatusEvent::RelayError(reason.clone())),
            LinkEvent::Message(_) => {}
        }
        Some(event)
    }

    pub fn send(&self, msg: &SignalMessage) {
        if !self.link.send(msg) {
            return;
        }
        let viewer_id = msg.viewer_id();
        match msg {
            SignalMessage::Offer { .. } => self.status(StatusEvent::OfferSent { viewer_id }),
            SignalMessage::Answer { .. } => self.status(StatusEvent::AnswerSent { viewer_id }),
            SignalMessage::IceCandidate { .. } => {
                self.status(StatusEvent::CandidateSent { viewer_id })
            }
            SignalMessage::ViewerJoined {} => {}
        }
    }

    pub fn spawn_worker(&mut self, viewer_id: Option<ViewerId>) -> SessionWorker {
        self.last_generation += 1;
        let key = SessionKey {
            viewer_id,
            generation: self.last_generation,
        };
        SessionWorker::spawn(
            key,
            self.caps.negotiators.clone(),
            self.transport_tx.clone(),
            self.events_tx.clone(),
        )
    }

    /// Ask the controller for a retry and arm the timer if it grants one.
    pub fn schedule_retry(&mut self) -> RetryOutcome {
        match self.reconnect.on_failure() {
            Some(RetryDecision::Retry { attempt, delay }) => {
                self.next_token += 1;
                let token = self.next_token;
                let events = self.events_tx.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(CoordinatorEvent::RetryDue { token });
                });
                self.retry_timer = Some((token, timer));
                self.status(StatusEvent::RetryScheduled { attempt, delay });
                RetryOutcome::Scheduled
            }
            Some(RetryDecision::GiveUp { attempts }) => {
                self.status(StatusEvent::Terminal {
                    reason: format!("relay unreachable after {} reconnection attempts", attempts),
                });
                RetryOutcome::GaveUp
            }
            None => {
                debug!("[{}] retry already pending or exhausted", self.stream_id());
                RetryOutcome::AlreadyPending
            }
        }
    }

    /// Consume a fired timer. False for tokens of cancelled timers.
    pub fn take_retry(&mut self, token: u64) -> bool {
        match &self.retry_timer {
            Some((pending, _)) if *pending == token => {
                self.retry_timer = None;
                self.reconnect.begin_attempt();
                true
            }
            _ => {
                debug!("[{}] ignoring cancelled retry {}", self.stream_id(), token);
                false
            }
        }
    }

    pub fn cancel_retry(&mut self) {
        if let Some((_, timer)) = self.retry_timer.take() {
            timer.abort();
        }
        self.reconnect.cancel();
    }

    /// Manual reconnect: cancel any pending retry and start counting from zero.
    pub fn reset_retries(&mut self) {
        self.cancel_retry();
        self.reconnect.reset();
    }

    /// Mark the coordinator closed; false if it already was.
    pub fn begin_close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.cancel_retry();
        self.link.close();
        true
    }
}
