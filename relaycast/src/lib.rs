pub use relaycast_core::{Role, StreamId, ViewerId, WireFormat};
pub use relaycast_peer::{
    BroadcasterHandle, Capabilities, CoordinatorConfig, ReconnectPolicy, StatusEvent,
    StatusObserver, ViewerHandle, spawn_broadcaster, spawn_viewer,
};

pub mod model {
    pub use relaycast_core::model::*;
}

pub mod peer {
    pub use relaycast_peer::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use relaycast_relay::*;
}
