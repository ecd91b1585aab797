use crate::coordinator::coordinator_core::{CoordinatorChannels, CoordinatorCore, RetryOutcome};
use crate::coordinator::{
    Capabilities, CoordinatorCommand, CoordinatorConfig, CoordinatorEvent, CoordinatorHandle,
    ViewerHandle, ViewerStats,
};
use crate::link::{LinkEnvelope, LinkEvent};
use crate::media::{RemoteMedia, RemoteSink};
use crate::negotiation::NegotiationEvent;
use crate::session::{PeerSession, SessionAction, SessionInput, SessionWorker};
use crate::status::StatusEvent;
use relaycast_core::{Role, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct LiveSession {
    session: PeerSession,
    worker: SessionWorker,
}

/// Receives one stream: a single session, rebuilt from scratch on every
/// reconnect.
pub struct ViewerCoordinator {
    core: CoordinatorCore,
    sink: Arc<dyn RemoteSink>,
    live: Option<LiveSession>,
    command_rx: mpsc::Receiver<CoordinatorCommand<ViewerStats>>,
    channels: CoordinatorChannels,
}

impl ViewerCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        caps: Capabilities,
        sink: Arc<dyn RemoteSink>,
    ) -> (Self, ViewerHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (core, channels) = CoordinatorCore::new(config, Role::Viewer, caps);

        let coordinator = Self {
            core,
            sink,
            live: None,
            command_rx,
            channels,
        };
        (coordinator, CoordinatorHandle::new(command_tx))
    }

    pub async fn run(mut self) {
        info!("[{}] Viewer coordinator started", self.core.stream_id());

        self.connect();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(CoordinatorCommand::Close { done }) => {
                            self.shutdown();
                            let _ = done.send(());
                            break;
                        }
                        Some(c) => self.handle_command(c),
                        None => {
                            info!("All handles dropped. Shutting down viewer.");
                            self.shutdown();
                            break;
                        }
                    }
                }

                Some(envelope) = self.channels.link_rx.recv() => self.handle_link(envelope),

                Some(event) = self.channels.transport_rx.recv() => self.handle_negotiation(event),

                Some(event) = self.channels.event_rx.recv() => self.handle_event(event),
            }
        }

        info!("[{}] Viewer coordinator finished", self.core.stream_id());
    }

    fn handle_command(&mut self, cmd: CoordinatorCommand<ViewerStats>) {
        match cmd {
            CoordinatorCommand::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
            CoordinatorCommand::Reconnect => {
                info!("[{}] Manual reconnect requested", self.core.stream_id());
                self.core.reset_retries();
                self.reconnect();
            }
            CoordinatorCommand::Renegotiate { viewer_id } => {
                debug!(
                    "[{}] viewers do not offer, ignoring renegotiation for {}",
                    self.core.stream_id(),
                    viewer_id
                );
            }
            CoordinatorCommand::Close { .. } => {}
        }
    }

    fn stats(&self) -> ViewerStats {
        let session = self.live.as_ref().map(|live| &live.session);
        ViewerStats {
            connected: session.is_some_and(PeerSession::is_connected),
            signaling_state: session.map(PeerSession::state),
            viewer_id: session.and_then(PeerSession::viewer_id),
        }
    }

    /// A fresh session first, so no early offer finds nothing to land on.
    fn connect(&mut self) {
        let worker = self.core.spawn_worker(None);
        let session = PeerSession::viewer(self.core.stream_id().clone(), worker.key().generation);
        self.live = Some(LiveSession { session, worker });
        self.core.open_link();
    }

    fn teardown(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.session.handle(SessionInput::Close);
            live.worker.shutdown();
        }
        self.core.link.close();
    }

    fn reconnect(&mut self) {
        self.teardown();
        self.connect();
    }

    fn handle_link(&mut self, envelope: LinkEnvelope) {
        let Some(event) = self.core.accept_link(envelope) else {
            return;
        };

        match event {
            LinkEvent::Opened => {}
            LinkEvent::Message(msg) => self.handle_signal(msg),
            LinkEvent::Closed { .. } | LinkEvent::Failed(_) => self.hand_off(),
        }
    }

    fn handle_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Offer { sdp, viewer_id } => {
                self.drive(SessionInput::RemoteOffer { sdp, viewer_id })
            }
            SignalMessage::IceCandidate {
                candidate,
                viewer_id,
            } => self.drive(SessionInput::RemoteCandidate {
                candidate,
                viewer_id,
            }),
            other => debug!(
                "[{}] viewer ignores {}",
                self.core.stream_id(),
                other.kind()
            ),
        }
    }

    fn drive(&mut self, input: SessionInput) {
        let Some(live) = self.live.as_mut() else {
            debug!("[{}] no session, dropping input", self.core.stream_id());
            return;
        };
        let viewer_before = live.session.viewer_id();
        let actions = live.session.handle(input);
        let viewer_id = live.session.viewer_id();
        let rest = live.worker.dispatch(actions);

        if viewer_before.is_none() {
            if let Some(id) = viewer_id {
                info!("[{}] Bound to viewer id {}", self.core.stream_id(), id);
            }
        }

        for action in rest {
            match action {
                SessionAction::Send(msg) => self.core.send(&msg),
                SessionAction::StateChanged(state) => {
                    self.core
                        .status(StatusEvent::SignalingChanged { viewer_id, state })
                }
                SessionAction::Connected => {
                    self.core.reconnect.on_success();
                    info!("[{}] Connected to broadcaster", self.core.stream_id());
                }
                SessionAction::Failed(reason) => {
                    self.core
                        .status(StatusEvent::SessionFailed { viewer_id, reason });
                    self.hand_off();
                }
                SessionAction::CreateOffer
                | SessionAction::AcceptOffer { .. }
                | SessionAction::ApplyAnswer { .. }
                | SessionAction::ApplyCandidate(_) => {}
            }
        }
    }

    /// Relay loss or terminal session failure: the controller decides what happens next.
    fn hand_off(&mut self) {
        if self.core.schedule_retry() == RetryOutcome::GaveUp {
            self.teardown();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.session.key().generation == generation)
    }

    fn handle_negotiation(&mut self, event: NegotiationEvent) {
        if !self.is_current(event.key().generation) {
            debug!(
                "[{}] stale negotiation event for {}",
                self.core.stream_id(),
                event.key()
            );
            return;
        }

        match event {
            NegotiationEvent::CandidateGenerated(_, candidate) => {
                self.drive(SessionInput::LocalCandidate(candidate))
            }
            NegotiationEvent::StateChanged(_, state) => {
                let viewer_id = self.live.as_ref().and_then(|l| l.session.viewer_id());
                self.core
                    .status(StatusEvent::ConnectionChanged { viewer_id, state });
                self.drive(SessionInput::ConnectionChanged(state));
            }
            NegotiationEvent::RemoteTrack(_, media) => self.attach(media),
        }
    }

    fn attach(&self, media: RemoteMedia) {
        let element_id = &self.core.config.remote_element_id;
        if self.sink.attach(element_id, media) {
            self.core.status(StatusEvent::StreamAttached {
                element_id: element_id.clone(),
            });
        } else {
            warn!(
                "[{}] Remote element '{}' not found, stream not attached",
                self.core.stream_id(),
                element_id
            );
        }
    }

    fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::Completed { key, input } => {
                if !self.is_current(key.generation) {
                    debug!("[{}] stale completion for {}", self.core.stream_id(), key);
                    return;
                }
                self.drive(input);
            }
            CoordinatorEvent::RetryDue { token } => {
                if self.core.take_retry(token) {
                    self.reconnect();
                }
            }
            CoordinatorEvent::MediaAcquired(_) => {}
        }
    }

    fn shutdown(&mut self) {
        if !self.core.begin_close() {
            return;
        }
        self.teardown();
        self.core.status(StatusEvent::Closed);
    }
}
