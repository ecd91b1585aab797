pub mod mock_negotiator;
pub mod recording_observer;

pub use mock_media::*;
pub use mock_negotiator::*;
pub use mock_transport::*;
pub use recording_observer::*;
