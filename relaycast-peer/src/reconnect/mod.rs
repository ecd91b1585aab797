mod reconnect_policy;
mod reconnection_controller;

pub use reconnect_policy::ReconnectPolicy;
pub use reconnection_controller::{ReconnectionController, RetryDecision};
