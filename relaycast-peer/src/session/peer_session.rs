use crate::negotiation::ConnectionState;
use crate::session::{CandidateQueue, SessionKey};
use relaycast_core::{PathCandidate, Role, SignalMessage, SignalingState, StreamId, ViewerId};
use tracing::debug;

/// Inputs to the session state machine.
///
/// Remote messages, locally gathered candidates, connection-state reports
/// and completions of the asynchronous negotiator steps all arrive here.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// Broadcaster wants a fresh offer.
    Negotiate,
    /// The negotiator created an offer and stored it as the local description.
    OfferCreated { sdp: String },
    RemoteOffer {
        sdp: String,
        viewer_id: Option<ViewerId>,
    },
    /// The negotiator applied the remote offer and stored its answer locally.
    AnswerCreated { sdp: String },
    RemoteAnswer { sdp: String },
    /// The negotiator applied the remote answer.
    RemoteAnswerApplied,
    RemoteCandidate {
        candidate: PathCandidate,
        viewer_id: Option<ViewerId>,
    },
    LocalCandidate(PathCandidate),
    ConnectionChanged(ConnectionState),
    NegotiationFailed(String),
    Close,
}

/// Work the owner of a session must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    CreateOffer,
    AcceptOffer { sdp: String },
    ApplyAnswer { sdp: String },
    ApplyCandidate(PathCandidate),
    Send(SignalMessage),
    StateChanged(SignalingState),
    Connected,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    CreatingOffer,
    AcceptingOffer,
    ApplyingAnswer,
}

/// State machine for exactly one media connection.
///
/// Transitions are synchronous: `handle` mutates the session and returns
/// the actions to perform. Anything asynchronous is reported back later as
/// another input, and inputs that no longer fit the current state are
/// dropped, so a late completion can never resurrect a superseded
/// negotiation.
#[derive(Debug)]
pub struct PeerSession {
    role: Role,
    stream_id: StreamId,
    key: SessionKey,
    viewer_id: Option<ViewerId>,
    state: SignalingState,
    has_remote_description: bool,
    candidates: CandidateQueue,
    pending: Option<Pending>,
    connected: bool,
}

impl PeerSession {
    /// A broadcaster-side session serving `viewer_id`.
    pub fn broadcaster(stream_id: StreamId, viewer_id: ViewerId, generation: u64) -> Self {
        Self::new(
            Role::Broadcaster,
            stream_id,
            SessionKey {
                viewer_id: Some(viewer_id),
                generation,
            },
        )
    }

    /// The single viewer-side session; its viewer id is learned from the first offer.
    pub fn viewer(stream_id: StreamId, generation: u64) -> Self {
        Self::new(
            Role::Viewer,
            stream_id,
            SessionKey {
                viewer_id: None,
                generation,
            },
        )
    }

    fn new(role: Role, stream_id: StreamId, key: SessionKey) -> Self {
        Self {
            role,
            stream_id,
            viewer_id: key.viewer_id,
            key,
            state: SignalingState::Stable,
            has_remote_description: false,
            candidates: CandidateQueue::new(),
            pending: None,
            connected: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn viewer_id(&self) -> Option<ViewerId> {
        self.viewer_id
    }

    pub fn state(&self) -> SignalingState {
        self.state
    }

    pub fn has_remote_description(&self) -> bool {
        self.has_remote_description
    }

    pub fn queued_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_closed(&self) -> bool {
        self.state == SignalingState::Closed
    }

    pub fn handle(&mut self, input: SessionInput) -> Vec<SessionAction> {
        if self.is_closed() {
            debug!(
                "[{}] {} closed, dropping {:?}",
                self.stream_id,
                self.key,
                input_name(&input)
            );
            return Vec::new();
        }

        match input {
            SessionInput::Negotiate => self.on_negotiate(),
            SessionInput::OfferCreated { sdp } => self.on_offer_created(sdp),
            SessionInput::RemoteOffer { sdp, viewer_id } => self.on_remote_offer(sdp, viewer_id),
            SessionInput::AnswerCreated { sdp } => self.on_answer_created(sdp),
            SessionInput::RemoteAnswer { sdp } => self.on_remote_answer(sdp),
            SessionInput::RemoteAnswerApplied => self.on_remote_answer_applied(),
            SessionInput::RemoteCandidate {
                candidate,
                viewer_id,
            } => self.on_remote_candidate(candidate, viewer_id),
            SessionInput::LocalCandidate(candidate) => {
                vec![SessionAction::Send(SignalMessage::IceCandidate {
                    candidate,
                    viewer_id: self.viewer_id,
                })]
            }
            SessionInput::ConnectionChanged(state) => self.on_connection_changed(state),
            SessionInput::NegotiationFailed(reason) => self.fail(reason),
            SessionInput::Close => {
                self.shut();
                vec![SessionAction::StateChanged(SignalingState::Closed)]
            }
        }
    }

    fn on_negotiate(&mut self) -> Vec<SessionAction> {
        if self.role != Role::Broadcaster {
            debug!("[{}] only a broadcaster produces offers", self.stream_id);
            return Vec::new();
        }
        if self.state != SignalingState::Stable || self.pending.is_some() {
            debug!(
                "[{}] not offering to {}, state {} pending {:?}",
                self.stream_id, self.key, self.state, self.pending
            );
            return Vec::new();
        }
        self.pending = Some(Pending::CreatingOffer);
        vec![SessionAction::CreateOffer]
    }

    fn on_offer_created(&mut self, sdp: String) -> Vec<SessionAction> {
        if self.pending != Some(Pending::CreatingOffer) {
            debug!("[{}] stale offer for {} dropped", self.stream_id, self.key);
            return Vec::new();
        }
        self.pending = None;
        self.state = SignalingState::HaveLocalOffer;
        vec![
            SessionAction::StateChanged(self.state),
            SessionAction::Send(SignalMessage::Offer {
                sdp,
                viewer_id: self.viewer_id,
            }),
        ]
    }

    fn on_remote_offer(&mut self, sdp: String, viewer_id: Option<ViewerId>) -> Vec<SessionAction> {
        if self.role != Role::Viewer {
            debug!("[{}] broadcaster ignores offers", self.stream_id);
            return Vec::new();
        }
        if let (Some(bound), Some(id)) = (self.viewer_id, viewer_id) {
            if bound != id {
                debug!(
                    "[{}] ignoring offer for viewer {}, bound to {}",
                    self.stream_id, id, bound
                );
                return Vec::new();
            }
        }
        if self.state != SignalingState::Stable || self.pending.is_some() {
            debug!(
                "[{}] ignoring offer, signaling state: {}",
                self.stream_id, self.state
            );
            return Vec::new();
        }

        if self.viewer_id.is_none() {
            self.viewer_id = viewer_id;
        }
        self.state = SignalingState::HaveRemoteOffer;
        self.pending = Some(Pending::AcceptingOffer);
        vec![
            SessionAction::StateChanged(self.state),
            SessionAction::AcceptOffer { sdp },
        ]
    }

    fn on_answer_created(&mut self, sdp: String) -> Vec<SessionAction> {
        if self.pending != Some(Pending::AcceptingOffer) {
            debug!("[{}] stale answer for {} dropped", self.stream_id, self.key);
            return Vec::new();
        }
        self.pending = None;
        self.state = SignalingState::Stable;
        self.has_remote_description = true;

        let mut actions = vec![
            SessionAction::Send(SignalMessage::Answer {
                sdp,
                viewer_id: self.viewer_id,
            }),
            SessionAction::StateChanged(self.state),
        ];
        actions.extend(self.flush());
        actions
    }

    fn on_remote_answer(&mut self, sdp: String) -> Vec<SessionAction> {
        if self.role != Role::Broadcaster {
            debug!("[{}] viewer ignores answers", self.stream_id);
            return Vec::new();
        }
        if self.state != SignalingState::HaveLocalOffer || self.pending.is_some() {
            debug!(
                "[{}] ignoring answer for {}, state: {}",
                self.stream_id, self.key, self.state
            );
            return Vec::new();
        }
        self.pending = Some(Pending::ApplyingAnswer);
        vec![SessionAction::ApplyAnswer { sdp }]
    }

    fn on_remote_answer_applied(&mut self) -> Vec<SessionAction> {
        if self.pending != Some(Pending::ApplyingAnswer) {
            return Vec::new();
        }
        self.pending = None;
        self.state = SignalingState::Stable;
        self.has_remote_description = true;

        let mut actions = vec![SessionAction::StateChanged(self.state)];
        actions.extend(self.flush());
        actions
    }

    fn on_remote_candidate(
        &mut self,
        candidate: PathCandidate,
        viewer_id: Option<ViewerId>,
    ) -> Vec<SessionAction> {
        if self.role == Role::Viewer {
            if let (Some(bound), Some(id)) = (self.viewer_id, viewer_id) {
                if bound != id {
                    return Vec::new();
                }
            }
        }

        match self
            .candidates
            .drain_if_ready(candidate, self.has_remote_description)
        {
            Some(c) => vec![SessionAction::ApplyCandidate(c)],
            None => {
                debug!(
                    "[{}] queueing ICE candidate for {} ({} waiting)",
                    self.stream_id,
                    self.key,
                    self.candidates.len()
                );
                Vec::new()
            }
        }
    }

    fn on_connection_changed(&mut self, state: ConnectionState) -> Vec<SessionAction> {
        match state {
            ConnectionState::Connected => {
                self.connected = true;
                vec![SessionAction::Connected]
            }
            ConnectionState::Failed | ConnectionState::Closed => {
                self.fail(format!("peer connection {}", state))
            }
            ConnectionState::Disconnected => {
                self.connected = false;
                Vec::new()
            }
            ConnectionState::New | ConnectionState::Connecting => Vec::new(),
        }
    }

    fn fail(&mut self, reason: String) -> Vec<SessionAction> {
        self.shut();
        vec![
            SessionAction::StateChanged(SignalingState::Closed),
            SessionAction::Failed(reason),
        ]
    }

    fn shut(&mut self) {
        self.state = SignalingState::Closed;
        self.pending = None;
        self.connected = false;
        self.candidates.clear();
    }

    fn flush(&mut self) -> Vec<SessionAction> {
        self.candidates
            .flush()
            .into_iter()
            .map(SessionAction::ApplyCandidate)
            .collect()
    }
}

fn input_name(input: &SessionInput) -> &'static str {
    match input {
        SessionInput::Negotiate => "negotiate",
        SessionInput::OfferCreated { .. } => "offer-created",
        SessionInput::RemoteOffer { .. } => "offer",
        SessionInput::AnswerCreated { .. } => "answer-created",
        SessionInput::RemoteAnswer { .. } => "answer",
        SessionInput::RemoteAnswerApplied => "answer-applied",
        SessionInput::RemoteCandidate { .. } => "ice-candidate",
        SessionInput::LocalCandidate(_) => "local-candidate",
        SessionInput::ConnectionChanged(_) => "connection-state",
        SessionInput::NegotiationFailed(_) => "negotiation-failed",
        SessionInput::Close => "close",
    }
}
