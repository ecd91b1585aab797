mod candidate;
mod ice;
mod role;
mod signaling;
mod state;
mod stream;
mod viewer;

pub use candidate::PathCandidate;
pub use ice::IceServerConfig;
pub use role::{InvalidRole, Role};
pub use signaling::SignalMessage;
pub use state::SignalingState;
pub use stream::StreamId;
pub use viewer::ViewerId;
