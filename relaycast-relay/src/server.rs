use crate::RelayConfig;
use crate::signaling::{RelayService, legacy_ws_handler, ws_handler};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub fn router(service: RelayService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/signal/{stream_id}/{role}", get(ws_handler))
        .route("/signal/{stream_id}", get(legacy_ws_handler))
        .layer(cors)
        .with_state(service)
}

pub async fn serve(listener: TcpListener, service: RelayService) -> std::io::Result<()> {
    axum::serve(listener, router(service)).await
}

/// Bind and serve until the process exits.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    info!("Relay listening on ws://{}", listener.local_addr()?);
    serve(listener, RelayService::new()).await?;
    Ok(())
}
