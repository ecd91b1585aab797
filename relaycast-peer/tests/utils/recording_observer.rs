use relaycast_core::{Role, StreamId};
use relaycast_peer::{StatusEvent, StatusObserver};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Keeps every status event with the (possibly paused) time it arrived.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<(Instant, StatusEvent)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn timed_events(&self) -> Vec<(Instant, StatusEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&StatusEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub async fn wait_for(&self, pred: impl Fn(&StatusEvent) -> bool, timeout_ms: u64) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while Instant::now() < deadline {
            if self.count(&pred) > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

impl StatusObserver for RecordingObserver {
    fn on_status(&self, _stream_id: &StreamId, _role: Role, event: &StatusEvent) {
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), event.clone()));
    }
}
