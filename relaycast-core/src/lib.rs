pub mod codec;
pub mod error;
pub mod model;
pub mod utils;

pub use codec::WireFormat;
pub use error::ProtocolError;
pub use model::*;
