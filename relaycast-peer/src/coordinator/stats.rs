use relaycast_core::{SignalingState, ViewerId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BroadcasterStats {
    pub active_session_count: usize,
    /// Ascending.
    pub viewer_ids: Vec<ViewerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStats {
    pub connected: bool,
    pub signaling_state: Option<SignalingState>,
    pub viewer_id: Option<ViewerId>,
}
