use crate::negotiation::ConnectionState;
use relaycast_core::{SignalingState, ViewerId};
use std::time::Duration;

/// Progress reported to the host, one event per notable step.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    RelayConnecting { attempt: u32 },
    RelayOpened,
    RelayClosed { code: Option<u16>, reason: String },
    RelayError(String),
    ViewerJoined { viewer_id: ViewerId },
    OfferSent { viewer_id: Option<ViewerId> },
    AnswerSent { viewer_id: Option<ViewerId> },
    AnswerProcessed { viewer_id: Option<ViewerId> },
    CandidateSent { viewer_id: Option<ViewerId> },
    SignalingChanged {
        viewer_id: Option<ViewerId>,
        state: SignalingState,
    },
    ConnectionChanged {
        viewer_id: Option<ViewerId>,
        state: ConnectionState,
    },
    SessionFailed {
        viewer_id: Option<ViewerId>,
        reason: String,
    },
    StreamAttached { element_id: String },
    MediaReady,
    MediaUnavailable(String),
    RetryScheduled { attempt: u32, delay: Duration },
    /// Nothing more happens until a manual reconnect or close.
    Terminal { reason: String },
    Closed,
}

impl StatusEvent {
    /// Short kebab-case label.
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::RelayConnecting { .. } => "relay-connecting",
            StatusEvent::RelayOpened => "relay-open",
            StatusEvent::RelayClosed { .. } => "relay-closed",
            StatusEvent::RelayError(_) => "relay-error",
            StatusEvent::ViewerJoined { .. } => "viewer-joined",
            StatusEvent::OfferSent { .. } => "offer-sent",
            StatusEvent::AnswerSent { .. } => "answer-sent",
            StatusEvent::AnswerProcessed { .. } => "answer-processed",
            StatusEvent::CandidateSent { .. } => "ice-candidate-sent",
            StatusEvent::SignalingChanged { .. } => "signaling-state",
            StatusEvent::ConnectionChanged { .. } => "connection-state",
            StatusEvent::SessionFailed { .. } => "session-failed",
            StatusEvent::StreamAttached { .. } => "stream-attached",
            StatusEvent::MediaReady => "media-ready",
            StatusEvent::MediaUnavailable(_) => "media-unavailable",
            StatusEvent::RetryScheduled { .. } => "retry-scheduled",
            StatusEvent::Terminal { .. } => "terminal",
            StatusEvent::Closed => "closed",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusEvent::RelayError(_)
                | StatusEvent::SessionFailed { .. }
                | StatusEvent::MediaUnavailable(_)
                | StatusEvent::Terminal { .. }
        )
    }
}
