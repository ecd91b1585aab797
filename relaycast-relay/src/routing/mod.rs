mod connection_id;
mod legacy_routes;
mod stream_routes;

pub use connection_id::ConnectionId;
pub use legacy_routes::LegacyRoutes;
pub use stream_routes::{Delivery, StreamRoutes};
