use crate::link::{RelayTransport, WsTransport};
use crate::negotiation::{NegotiationConfig, NegotiatorFactory, WebRtcNegotiatorFactory};
use crate::status::{StatusObserver, TracingObserver};
use std::sync::Arc;

/// The host-provided pieces a coordinator is built from.
#[derive(Clone)]
pub struct Capabilities {
    pub transport: Arc<dyn RelayTransport>,
    pub negotiators: Arc<dyn NegotiatorFactory>,
    pub observer: Arc<dyn StatusObserver>,
}

impl Capabilities {
    pub fn new(
        transport: Arc<dyn RelayTransport>,
        negotiators: Arc<dyn NegotiatorFactory>,
        observer: Arc<dyn StatusObserver>,
    ) -> Self {
        Self {
            transport,
            negotiators,
            observer,
        }
    }

    /// WebSocket relay, `webrtc` peer connections and tracing output.
    pub fn webrtc(config: NegotiationConfig) -> Self {
        Self::new(
            Arc::new(WsTransport),
            Arc::new(WebRtcNegotiatorFactory::new(config)),
            Arc::new(TracingObserver),
        )
    }

    pub fn with_observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.observer = observer;
        self
    }
}
