use relaycast_core::PathCandidate;
use std::collections::VecDeque;

/// Holds remote path candidates that arrived before the remote description.
///
/// Candidates routinely beat the SDP across the relay; dropping them loses
/// connectivity on some network topologies, so they wait here and are
/// replayed in arrival order once the session can accept them.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    pending: VecDeque<PathCandidate>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, candidate: PathCandidate) {
        self.pending.push_back(candidate);
    }

    /// Returns the candidate for immediate application when `ready`,
    /// otherwise queues it and returns `None`.
    pub fn drain_if_ready(&mut self, candidate: PathCandidate, ready: bool) -> Option<PathCandidate> {
        if ready {
            return Some(candidate);
        }
        self.enqueue(candidate);
        None
    }

    /// Takes every queued candidate in arrival order, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<PathCandidate> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
