use crate::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }

    /// The public STUN servers used when nothing else is configured.
    pub fn defaults() -> Vec<IceServerConfig> {
        vec![
            IceServerConfig::stun(DEFAULT_STUN_ADDR),
            IceServerConfig::stun(DEFAULT_STUN_ADDR_2),
        ]
    }
}
