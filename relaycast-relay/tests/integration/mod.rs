mod test_multiplexed_routing;

use futures::{SinkExt, StreamExt};
use relaycast_relay::{RelayService, serve};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub async fn start_relay() -> (SocketAddr, RelayService) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind relay");
    let addr = listener.local_addr().unwrap();
    let service = RelayService::new();
    tokio::spawn(serve(listener, service.clone()));
    (addr, service)
}

pub struct WsClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(addr: SocketAddr, path: &str) -> Self {
        let (socket, _) = connect_async(format!("ws://{}{}", addr, path))
            .await
            .expect("connect to relay");
        Self { socket }
    }

    pub async fn send(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_owned().into()))
            .await
            .expect("send frame");
    }

    /// Next text frame, or `None` after `timeout_ms`.
    pub async fn recv(&mut self, timeout_ms: u64) -> Option<String> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let next = tokio::time::timeout_at(deadline, self.socket.next()).await.ok()??;
            match next.ok()? {
                Message::Text(text) => return Some(text.as_str().to_owned()),
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

/// Wait until the relay has registered `count` connections.
pub async fn wait_for_connections(service: &RelayService, count: usize) {
    for _ in 0..200 {
        if service.connection_count() == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} relay connections, have {}",
        count,
        service.connection_count()
    );
}
