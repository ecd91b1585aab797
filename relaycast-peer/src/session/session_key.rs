use relaycast_core::ViewerId;
use std::fmt;

/// Routes asynchronous results back to the session that requested them.
///
/// `generation` is unique per coordinator, so a result produced for a
/// session that has since been torn down never matches its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub viewer_id: Option<ViewerId>,
    pub generation: u64,
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.viewer_id {
            Some(id) => write!(f, "viewer {} (gen {})", id, self.generation),
            None => write!(f, "viewer session (gen {})", self.generation),
        }
    }
}
