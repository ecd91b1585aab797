use crate::reconnect::ReconnectPolicy;
use relaycast_core::{StreamId, WireFormat};

pub const DEFAULT_REMOTE_ELEMENT: &str = "remote";

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Base relay address, e.g. `ws://localhost:8000`.
    pub relay_url: String,
    pub stream_id: StreamId,
    pub wire_format: WireFormat,
    pub reconnect: ReconnectPolicy,
    /// Element remote media is attached to (viewer side).
    pub remote_element_id: String,
}

impl CoordinatorConfig {
    pub fn new(relay_url: impl Into<String>, stream_id: impl Into<StreamId>) -> Self {
        Self {
            relay_url: relay_url.into(),
            stream_id: stream_id.into(),
            wire_format: WireFormat::default(),
            reconnect: ReconnectPolicy::default(),
            remote_element_id: DEFAULT_REMOTE_ELEMENT.to_owned(),
        }
    }

    pub fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = wire_format;
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_remote_element(mut self, element_id: impl Into<String>) -> Self {
        self.remote_element_id = element_id.into();
        self
    }
}
