mod negotiation_config;
mod negotiation_event;
mod negotiator;
mod webrtc_negotiator;

pub use negotiation_config::NegotiationConfig;
pub use negotiation_event::{ConnectionState, NegotiationEvent};
pub use negotiator::{Negotiator, NegotiatorFactory};
pub use webrtc_negotiator::{WebRtcNegotiator, WebRtcNegotiatorFactory};
