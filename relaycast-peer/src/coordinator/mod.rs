mod broadcaster;
mod capabilities;
mod coordinator_command;
mod coordinator_config;
mod coordinator_core;
mod coordinator_event;
mod coordinator_handle;
mod session_registry;
mod stats;
mod viewer;

pub use broadcaster::BroadcasterCoordinator;
pub use capabilities::Capabilities;
pub use coordinator_command::CoordinatorCommand;
pub use coordinator_config::CoordinatorConfig;
pub(crate) use coordinator_event::CoordinatorEvent;
pub use coordinator_handle::{BroadcasterHandle, CoordinatorHandle, ViewerHandle};
pub use stats::{BroadcasterStats, ViewerStats};
pub use viewer::ViewerCoordinator;

use crate::media::{MediaSource, RemoteSink};
use std::sync::Arc;

/// Start a broadcaster coordinator on the current runtime.
pub fn spawn_broadcaster(
    config: CoordinatorConfig,
    capabilities: Capabilities,
    media: Arc<dyn MediaSource>,
) -> BroadcasterHandle {
    let (coordinator, handle) = BroadcasterCoordinator::new(config, capabilities, media);
    tokio::spawn(coordinator.run());
    handle
}

/// Start a viewer coordinator on the current runtime.
pub fn spawn_viewer(
    config: CoordinatorConfig,
    capabilities: Capabilities,
    sink: Arc<dyn RemoteSink>,
) -> ViewerHandle {
    let (coordinator, handle) = ViewerCoordinator::new(config, capabilities, sink);
    tokio::spawn(coordinator.run());
    handle
}
