pub mod coordinator;
pub mod error;
pub mod link;
pub mod media;
pub mod negotiation;
pub mod reconnect;
pub mod session;
pub mod status;

pub use coordinator::{
    BroadcasterCoordinator, BroadcasterHandle, BroadcasterStats, Capabilities, CoordinatorConfig,
    ViewerCoordinator, ViewerHandle, ViewerStats, spawn_broadcaster, spawn_viewer,
};
pub use error::{CoordinatorError, LinkError, MediaError};
pub use reconnect::ReconnectPolicy;
pub use status::{StatusEvent, StatusObserver, TracingObserver};
