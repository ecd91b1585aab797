use relaycast_core::ViewerId;
use std::collections::BTreeMap;

/// Broadcaster sessions keyed by viewer id.
///
/// Ids come from a counter that only ever grows, so an id is never handed
/// out twice for the lifetime of the coordinator, reconnects included.
#[derive(Debug)]
pub(crate) struct SessionRegistry<T> {
    sessions: BTreeMap<ViewerId, T>,
    last_id: u64,
}

impl<T> SessionRegistry<T> {
    pub fn new() -> Self {
        Self {
            sessions: BTreeMap::new(),
            last_id: 0,
        }
    }

    pub fn allocate(&mut self) -> ViewerId {
        self.last_id += 1;
        ViewerId(self.last_id)
    }

    pub fn insert(&mut self, viewer_id: ViewerId, session: T) {
        self.sessions.insert(viewer_id, session);
    }

    pub fn get(&self, viewer_id: ViewerId) -> Option<&T> {
        self.sessions.get(&viewer_id)
    }

    pub fn get_mut(&mut self, viewer_id: ViewerId) -> Option<&mut T> {
        self.sessions.get_mut(&viewer_id)
    }

    pub fn remove(&mut self, viewer_id: ViewerId) -> Option<T> {
        self.sessions.remove(&viewer_id)
    }

    /// Remove every session. The id counter is left alone.
    pub fn drain(&mut self) -> Vec<(ViewerId, T)> {
        std::mem::take(&mut self.sessions).into_iter().collect()
    }

    pub fn ids(&self) -> Vec<ViewerId> {
        self.sessions.keys().copied().collect()
    }

    /// The most recently created session still alive.
    pub fn latest(&self) -> Option<ViewerId> {
        self.sessions.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
