use crate::error::LinkError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// A frame read from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayFrame {
    Text(String),
    Closed { code: Option<u16>, reason: String },
}

/// An open relay connection as a pair of text channels.
///
/// Dropping `outgoing` closes the connection.
pub struct RelayChannel {
    pub outgoing: mpsc::UnboundedSender<String>,
    pub incoming: mpsc::UnboundedReceiver<RelayFrame>,
}

/// Opens duplex text connections to the relay.
#[async_trait]
pub trait RelayTransport: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<RelayChannel, LinkError>;
}
