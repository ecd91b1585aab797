use crate::RelayService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use relaycast_core::{Role, StreamId};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Multiplexed(Role),
    Legacy,
}

/// `/signal/{stream_id}/{role}`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path((stream_id, role)): Path<(String, String)>,
    State(service): State<RelayService>,
) -> Response {
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            warn!("Rejecting connection to stream '{}': {}", stream_id, e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    let stream_id = StreamId::from(stream_id);

    ws.on_upgrade(move |socket| handle_socket(socket, stream_id, Endpoint::Multiplexed(role), service))
}

/// `/signal/{stream_id}`, the single-viewer protocol.
pub async fn legacy_ws_handler(
    ws: WebSocketUpgrade,
    Path(stream_id): Path<String>,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    let stream_id = StreamId::from(stream_id);

    ws.on_upgrade(move |socket| handle_socket(socket, stream_id, Endpoint::Legacy, service))
}

async fn handle_socket(
    socket: WebSocket,
    stream_id: StreamId,
    endpoint: Endpoint,
    service: RelayService,
) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let conn = match endpoint {
        Endpoint::Multiplexed(role) => service.connect(&stream_id, role, tx),
        Endpoint::Legacy => service.connect_legacy(&stream_id, tx),
    };

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let stream_id = stream_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match endpoint {
                        Endpoint::Multiplexed(role) => {
                            service.forward(&stream_id, role, conn, text.as_str())
                        }
                        Endpoint::Legacy => service.forward_legacy(&stream_id, conn, text.as_str()),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    match endpoint {
        Endpoint::Multiplexed(_) => service.disconnect(&stream_id, conn),
        Endpoint::Legacy => service.disconnect_legacy(&stream_id, conn),
    }
    info!("[{}] WebSocket disconnected: {}", stream_id, conn);
}
