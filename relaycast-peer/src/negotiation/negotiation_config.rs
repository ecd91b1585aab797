use relaycast_core::IceServerConfig;

/// Configuration for the WebRTC negotiator.
#[derive(Debug, Clone)]
pub struct NegotiationConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            ice_servers: IceServerConfig::defaults(),
        }
    }
}
