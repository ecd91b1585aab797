use thiserror::Error;

/// Failures opening or using the relay link.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to connect to relay {url}: {reason}")]
    Connect { url: String, reason: String },
}

/// Failures obtaining local media. Fatal for a broadcaster run.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("local media unavailable: {0}")]
    Unavailable(String),

    #[error("media access denied: {0}")]
    Denied(String),
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("coordinator is closed")]
    Closed,
}
