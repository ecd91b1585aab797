pub mod config;
pub mod routing;
pub mod server;
pub mod signaling;

pub use config::RelayConfig;
pub use routing::{ConnectionId, Delivery, StreamRoutes};
pub use server::{router, run, serve};
pub use signaling::RelayService;
