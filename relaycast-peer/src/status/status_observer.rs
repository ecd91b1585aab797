use crate::status::StatusEvent;
use relaycast_core::{Role, StreamId};
use tracing::{debug, info, warn};

/// Receives status events from a coordinator.
///
/// Called on the coordinator's loop, so implementations must not block.
pub trait StatusObserver: Send + Sync + 'static {
    fn on_status(&self, stream_id: &StreamId, role: Role, event: &StatusEvent);
}

/// Writes every status event to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl StatusObserver for TracingObserver {
    fn on_status(&self, stream_id: &StreamId, role: Role, event: &StatusEvent) {
        if event.is_error() {
            warn!("[{}] {} {}: {:?}", stream_id, role, event.name(), event);
        } else if matches!(event, StatusEvent::CandidateSent { .. }) {
            debug!("[{}] {} {}", stream_id, role, event.name());
        } else {
            info!("[{}] {} {}: {:?}", stream_id, role, event.name(), event);
        }
    }
}
