mod status_event;
mod status_observer;

pub use status_event::StatusEvent;
pub use status_observer::{StatusObserver, TracingObserver};
