use crate::error::ProtocolError;
use crate::model::{PathCandidate, Role, SignalMessage, StreamId};
use crate::utils::SIGNAL_PATH_PREFIX;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two relay protocol variants.
///
/// `Multiplexed` is canonical: one broadcaster fans out to many viewers and
/// every message carries a `type` tag plus an optional `viewerId`.
/// `Legacy` is the single-viewer-per-stream form kept for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Multiplexed,
    Legacy,
}

impl WireFormat {
    /// Relay path for a link of `role` on `stream_id`.
    pub fn signal_path(self, stream_id: &StreamId, role: Role) -> String {
        match self {
            WireFormat::Multiplexed => {
                format!("{}/{}/{}", SIGNAL_PATH_PREFIX, stream_id, role)
            }
            WireFormat::Legacy => format!("{}/{}", SIGNAL_PATH_PREFIX, stream_id),
        }
    }

    pub fn encode(self, msg: &SignalMessage) -> Result<String, ProtocolError> {
        match self {
            WireFormat::Multiplexed => Ok(serde_json::to_string(msg)?),
            WireFormat::Legacy => encode_legacy(msg),
        }
    }

    pub fn decode(self, text: &str) -> Result<SignalMessage, ProtocolError> {
        match self {
            WireFormat::Multiplexed => Ok(serde_json::from_str(text)?),
            WireFormat::Legacy => decode_legacy(text),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LegacyDescription {
    #[serde(rename = "type")]
    kind: String,
    sdp: String,
}

#[derive(Serialize, Deserialize)]
struct LegacyCandidate {
    candidate: PathCandidate,
}

fn encode_legacy(msg: &SignalMessage) -> Result<String, ProtocolError> {
    let json = match msg {
        SignalMessage::Offer { sdp, .. } => serde_json::to_string(&LegacyDescription {
            kind: "offer".to_owned(),
            sdp: sdp.clone(),
        })?,
        SignalMessage::Answer { sdp, .. } => serde_json::to_string(&LegacyDescription {
            kind: "answer".to_owned(),
            sdp: sdp.clone(),
        })?,
        SignalMessage::IceCandidate { candidate, .. } => {
            serde_json::to_string(&LegacyCandidate {
                candidate: candidate.clone(),
            })?
        }
        SignalMessage::ViewerJoined {} => {
            return Err(ProtocolError::NotRepresentable("viewer-joined"));
        }
    };
    Ok(json)
}

fn decode_legacy(text: &str) -> Result<SignalMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;

    match value.get("type").and_then(Value::as_str) {
        Some("offer") => {
            let desc: LegacyDescription = serde_json::from_value(value)?;
            return Ok(SignalMessage::Offer {
                sdp: desc.sdp,
                viewer_id: None,
            });
        }
        Some("answer") => {
            let desc: LegacyDescription = serde_json::from_value(value)?;
            return Ok(SignalMessage::Answer {
                sdp: desc.sdp,
                viewer_id: None,
            });
        }
        _ => {}
    }

    if value.get("candidate").is_some_and(Value::is_object) {
        let c: LegacyCandidate = serde_json::from_value(value)?;
        return Ok(SignalMessage::IceCandidate {
            candidate: c.candidate,
            viewer_id: None,
        });
    }

    Err(ProtocolError::UnknownShape)
}
