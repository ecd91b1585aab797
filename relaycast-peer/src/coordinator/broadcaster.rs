use crate::coordinator::coordinator_core::{CoordinatorChannels, CoordinatorCore, RetryOutcome};
use crate::coordinator::session_registry::SessionRegistry;
use crate::coordinator::{
    BroadcasterHandle, BroadcasterStats, Capabilities, CoordinatorCommand, CoordinatorConfig,
    CoordinatorEvent, CoordinatorHandle,
};
use crate::error::MediaError;
use crate::link::{LinkEnvelope, LinkEvent};
use crate::media::{LocalMedia, MediaSource};
use crate::negotiation::NegotiationEvent;
use crate::session::{PeerSession, SessionAction, SessionInput, SessionOp, SessionWorker};
use crate::status::StatusEvent;
use relaycast_core::{Role, SignalMessage, ViewerId, WireFormat};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;
use tracing::{debug, info, warn};

struct LiveSession {
    session: PeerSession,
    worker: SessionWorker,
}

enum MediaState {
    Acquiring,
    Ready(LocalMedia),
    Unavailable,
    Released,
}

/// Serves one local media source to any number of viewers, one
/// [`PeerSession`] per viewer.
pub struct BroadcasterCoordinator {
    core: CoordinatorCore,
    media_source: Arc<dyn MediaSource>,
    media: MediaState,
    sessions: SessionRegistry<LiveSession>,
    /// Viewers that joined before media was ready, in join order.
    deferred: Vec<ViewerId>,
    command_rx: mpsc::Receiver<CoordinatorCommand<BroadcasterStats>>,
    channels: CoordinatorChannels,
}

impl BroadcasterCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        caps: Capabilities,
        media_source: Arc<dyn MediaSource>,
    ) -> (Self, BroadcasterHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (core, channels) = CoordinatorCore::new(config, Role::Broadcaster, caps);

        let coordinator = Self {
            core,
            media_source,
            media: MediaState::Acquiring,
            sessions: SessionRegistry::new(),
            deferred: Vec::new(),
            command_rx,
            channels,
        };
        (coordinator, CoordinatorHandle::new(command_tx))
    }

    /// Run the event loop until closed or every handle is dropped.
    pub async fn run(mut self) {
        info!("[{}] Broadcaster coordinator started", self.core.stream_id());

        self.acquire_media();
        self.core.open_link();

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
                            info!("All handles dropped. Shutting down broadcaster.");
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

        info!("[{}] Broadcaster coordinator finished", self.core.stream_id());
    }

    fn handle_command(&mut self, cmd: CoordinatorCommand<BroadcasterStats>) {
        match cmd {
            CoordinatorCommand::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
            CoordinatorCommand::Reconnect => {
                info!("[{}] Manual reconnect requested", self.core.stream_id());
                self.core.reset_retries();
                if matches!(self.media, MediaState::Unavailable) {
                    self.media = MediaState::Acquiring;
                    self.acquire_media();
                }
                self.rebuild_link();
            }
            CoordinatorCommand::Renegotiate { viewer_id } => {
                self.drive(viewer_id, SessionInput::Negotiate);
            }
            CoordinatorCommand::Close { .. } => {}
        }
    }

    fn stats(&self) -> BroadcasterStats {
        BroadcasterStats {
            active_session_count: self.sessions.len(),
            viewer_ids: self.sessions.ids(),
        }
    }

    fn handle_link(&mut self, envelope: LinkEnvelope) {
        let Some(event) = self.core.accept_link(envelope) else {
            return;
        };

        match event {
            LinkEvent::Opened => self.offer_to_implicit_viewer(),
            LinkEvent::Message(msg) => self.handle_signal(msg),
            LinkEvent::Closed { .. } | LinkEvent::Failed(_) => self.relay_lost(),
        }
    }

    fn handle_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::ViewerJoined {} => self.on_viewer_joined(),
            SignalMessage::Answer { sdp, viewer_id } => match self.route(viewer_id) {
                Some(id) => self.drive(id, SessionInput::RemoteAnswer { sdp }),
                None => debug!("[{}] answer without a viewer id, ignoring", self.core.stream_id()),
            },
            SignalMessage::IceCandidate {
                candidate,
                viewer_id,
            } => match self.route(viewer_id) {
                Some(id) => self.drive(
                    id,
                    SessionInput::RemoteCandidate {
                        candidate,
                        viewer_id: Some(id),
                    },
                ),
                None => debug!(
                    "[{}] ICE candidate without a viewer id, ignoring",
                    self.core.stream_id()
                ),
            },
            SignalMessage::Offer { .. } => {
                debug!("[{}] broadcaster ignores offers", self.core.stream_id())
            }
        }
    }

    /// Legacy links cannot carry viewer ids; everything belongs to the newest session.
    fn route(&self, viewer_id: Option<ViewerId>) -> Option<ViewerId> {
        match (viewer_id, self.core.config.wire_format) {
            (Some(id), _) => Some(id),
            (None, WireFormat::Legacy) => self.sessions.latest(),
            (None, WireFormat::Multiplexed) => None,
        }
    }

    fn on_viewer_joined(&mut self) {
        let viewer_id = self.sessions.allocate();
        self.core.status(StatusEvent::ViewerJoined { viewer_id });

        match &self.media {
            MediaState::Ready(media) => {
                let media = media.clone();
                self.start_session(viewer_id, media);
            }
            MediaState::Acquiring => {
                info!(
                    "[{}] Local media not ready, deferring offer to viewer {}",
                    self.core.stream_id(),
                    viewer_id
                );
                self.deferred.push(viewer_id);
            }
            MediaState::Unavailable | MediaState::Released => {
                warn!(
                    "[{}] Cannot create offer for viewer {} - no local stream",
                    self.core.stream_id(),
                    viewer_id
                );
            }
        }
    }

    fn offer_to_implicit_viewer(&mut self) {
        if self.core.config.wire_format != WireFormat::Legacy
            || !self.core.link.is_open()
            || !self.sessions.is_empty()
        {
            return;
        }
        let MediaState::Ready(media) = &self.media else {
            return;
        };
        let media = media.clone();
        let viewer_id = self.sessions.allocate();
        self.start_session(viewer_id, media);
    }

    fn start_session(&mut self, viewer_id: ViewerId, media: LocalMedia) {
        let worker = self.core.spawn_worker(Some(viewer_id));
        let session = PeerSession::broadcaster(
            self.core.stream_id().clone(),
            viewer_id,
            worker.key().generation,
        );
        worker.submit(SessionOp::AttachMedia(media));

        info!(
            "[{}] Created session for viewer {}",
            self.core.stream_id(),
            viewer_id
        );
        self.sessions
            .insert(viewer_id, LiveSession { session, worker });
        self.drive(viewer_id, SessionInput::Negotiate);
    }

    fn drive(&mut self, viewer_id: ViewerId, input: SessionInput) {
        let Some(live) = self.sessions.get_mut(viewer_id) else {
            debug!(
                "[{}] no session for viewer {}, dropping input",
                self.core.stream_id(),
                viewer_id
            );
            return;
        };
        let actions = live.session.handle(input);
        let rest = live.worker.dispatch(actions);
        self.perform(viewer_id, rest);
    }

    fn perform(&mut self, viewer_id: ViewerId, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::Send(msg) => self.core.send(&msg),
                SessionAction::StateChanged(state) => {
                    self.core.status(StatusEvent::SignalingChanged {
                        viewer_id: Some(viewer_id),
                        state,
                    })
                }
                SessionAction::Connected => {
                    self.core.reconnect.on_success();
                    info!(
                        "[{}] Viewer {} connected",
                        self.core.stream_id(),
                        viewer_id
                    );
                }
                SessionAction::Failed(reason) => {
                    self.core.status(StatusEvent::SessionFailed {
                        viewer_id: Some(viewer_id),
                        reason,
                    });
                    self.remove_session(viewer_id);
                }
                SessionAction::CreateOffer
                | SessionAction::AcceptOffer { .. }
                | SessionAction::ApplyAnswer { .. }
                | SessionAction::ApplyCandidate(_) => {}
            }
        }
    }

    fn remove_session(&mut self, viewer_id: ViewerId) {
        if let Some(mut live) = self.sessions.remove(viewer_id) {
            live.session.handle(SessionInput::Close);
            live.worker.shutdown();
            info!(
                "[{}] Removed session for viewer {}",
                self.core.stream_id(),
                viewer_id
            );
        }
    }

    fn teardown_sessions(&mut self) {
        for (_, mut live) in self.sessions.drain() {
            live.session.handle(SessionInput::Close);
            live.worker.shutdown();
        }
        self.deferred.clear();
    }

    fn handle_negotiation(&mut self, event: NegotiationEvent) {
        let key = event.key();
        let Some(viewer_id) = key.viewer_id else {
            return;
        };
        if !self.is_current(viewer_id, key.generation) {
            debug!("[{}] stale negotiation event for {}", self.core.stream_id(), key);
            return;
        }

        match event {
            NegotiationEvent::CandidateGenerated(_, candidate) => {
                self.drive(viewer_id, SessionInput::LocalCandidate(candidate))
            }
            NegotiationEvent::StateChanged(_, state) => {
                self.core.status(StatusEvent::ConnectionChanged {
                    viewer_id: Some(viewer_id),
                    state,
                });
                self.drive(viewer_id, SessionInput::ConnectionChanged(state));
            }
            NegotiationEvent::RemoteTrack(..) => {
                debug!("[{}] broadcaster ignores remote tracks", self.core.stream_id())
            }
        }
    }

    fn is_current(&self, viewer_id: ViewerId, generation: u64) -> bool {
        self.sessions
            .get(viewer_id)
            .is_some_and(|live| live.session.key().generation == generation)
    }

    fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::Completed { key, input } => {
                let Some(viewer_id) = key.viewer_id else {
                    return;
                };
                if !self.is_current(viewer_id, key.generation) {
                    debug!("[{}] stale completion for {}", self.core.stream_id(), key);
                    return;
                }
                if input == SessionInput::RemoteAnswerApplied {
                    self.core.status(StatusEvent::AnswerProcessed {
                        viewer_id: Some(viewer_id),
                    });
                }
                self.drive(viewer_id, input);
            }
            CoordinatorEvent::RetryDue { token } => {
                if self.core.take_retry(token) {
                    self.rebuild_link();
                }
            }
            CoordinatorEvent::MediaAcquired(result) => self.on_media(result),
        }
    }

    fn acquire_media(&self) {
        let source = self.media_source.clone();
        let events = self.core.events();
        tokio::spawn(async move {
            let result = source.acquire().await;
            // Nobody left to own the media; give it straight back.
            if let Err(SendError(CoordinatorEvent::MediaAcquired(Ok(media)))) =
                events.send(CoordinatorEvent::MediaAcquired(result))
            {
                source.release(media);
            }
        });
    }

    fn on_media(&mut self, result: Result<LocalMedia, MediaError>) {
        match result {
            Ok(media) => {
                if !matches!(self.media, MediaState::Acquiring) {
                    self.media_source.release(media);
                    return;
                }
                info!("[{}] Local media ready", self.core.stream_id());
                self.media = MediaState::Ready(media.clone());
                self.core.status(StatusEvent::MediaReady);

                for viewer_id in std::mem::take(&mut self.deferred) {
                    self.start_session(viewer_id, media.clone());
                }
                self.offer_to_implicit_viewer();
            }
            Err(e) => {
                warn!("[{}] {}", self.core.stream_id(), e);
                self.media = MediaState::Unavailable;
                self.core.status(StatusEvent::MediaUnavailable(e.to_string()));
                self.core.status(StatusEvent::Terminal {
                    reason: e.to_string(),
                });
                self.teardown_sessions();
                self.core.cancel_retry();
                self.core.link.close();
            }
        }
    }

    fn relay_lost(&mut self) {
        if self.core.schedule_retry() == RetryOutcome::GaveUp {
            self.teardown_sessions();
        }
    }

    /// Drop every session and the link, then connect again.
    fn rebuild_link(&mut self) {
        self.teardown_sessions();
        self.core.link.close();
        self.core.open_link();
    }

    fn shutdown(&mut self) {
        if !self.core.begin_close() {
            return;
        }
        self.teardown_sessions();
        if let MediaState::Ready(media) = std::mem::replace(&mut self.media, MediaState::Released)
        {
            self.media_source.release(media);
        }
        self.core.status(StatusEvent::Closed);
    }
}
