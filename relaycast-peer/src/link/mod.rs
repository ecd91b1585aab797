mod relay_transport;
mod signaling_link;
mod ws_transport;

pub use relay_transport::{RelayChannel, RelayFrame, RelayTransport};
pub use signaling_link::{LinkEnvelope, LinkEvent, LinkState, SignalingLink};
pub use ws_transport::WsTransport;
