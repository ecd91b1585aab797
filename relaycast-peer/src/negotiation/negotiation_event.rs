use crate::media::RemoteMedia;
use crate::session::SessionKey;
use relaycast_core::PathCandidate;
use std::fmt;

/// Connection state reported by a negotiation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::New => "new",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Failed => "failed",
            ConnectionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Events a negotiation object raises on its own, outside any request.
pub enum NegotiationEvent {
    /// A local path candidate was gathered and must reach the remote peer.
    CandidateGenerated(SessionKey, PathCandidate),

    StateChanged(SessionKey, ConnectionState),

    /// Remote media arrived (viewer side).
    RemoteTrack(SessionKey, RemoteMedia),
}

impl NegotiationEvent {
    pub fn key(&self) -> SessionKey {
        match self {
            NegotiationEvent::CandidateGenerated(key, _)
            | NegotiationEvent::StateChanged(key, _)
            | NegotiationEvent::RemoteTrack(key, _) => *key,
        }
    }
}
