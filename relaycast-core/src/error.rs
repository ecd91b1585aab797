use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("signaling payload has no recognizable message shape")]
    UnknownShape,

    #[error("'{0}' cannot be expressed in the legacy wire variant")]
    NotRepresentable(&'static str),
}
