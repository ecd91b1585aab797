use crate::model::candidate::PathCandidate;
use crate::model::viewer::ViewerId;
use serde::{Deserialize, Serialize};

/// Signaling messages exchanged over the relay (multiplexed variant).
///
/// `viewer_id` is present once the broadcaster has assigned one and is
/// echoed back by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalMessage {
    Offer {
        sdp: String,
        #[serde(rename = "viewerId", default, skip_serializing_if = "Option::is_none")]
        viewer_id: Option<ViewerId>,
    },
    Answer {
        sdp: String,
        #[serde(rename = "viewerId", default, skip_serializing_if = "Option::is_none")]
        viewer_id: Option<ViewerId>,
    },
    IceCandidate {
        candidate: PathCandidate,
        #[serde(rename = "viewerId", default, skip_serializing_if = "Option::is_none")]
        viewer_id: Option<ViewerId>,
    },
    ViewerJoined {},
}

impl SignalMessage {
    pub fn viewer_id(&self) -> Option<ViewerId> {
        match self {
            SignalMessage::Offer { viewer_id, .. }
            | SignalMessage::Answer { viewer_id, .. }
            | SignalMessage::IceCandidate { viewer_id, .. } => *viewer_id,
            SignalMessage::ViewerJoined {} => None,
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::IceCandidate { .. } => "ice-candidate",
            SignalMessage::ViewerJoined {} => "viewer-joined",
        }
    }
}
