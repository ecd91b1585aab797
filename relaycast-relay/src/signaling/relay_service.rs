use crate::routing::{ConnectionId, Delivery, LegacyRoutes, StreamRoutes};
use axum::extract::ws::Message;
use dashmap::DashMap;
use relaycast_core::{Role, StreamId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Default)]
struct RelayInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    streams: DashMap<StreamId, StreamRoutes>,
    legacy: DashMap<StreamId, LegacyRoutes>,
}

/// Shared relay state: open connections plus per-stream routing tables.
#[derive(Clone, Default)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(
        &self,
        stream_id: &StreamId,
        role: Role,
        tx: mpsc::UnboundedSender<Message>,
    ) -> ConnectionId {
        let conn = ConnectionId::new();
        self.inner.connections.insert(conn, tx);

        let replay = {
            let mut routes = self.inner.streams.entry(stream_id.clone()).or_default();
            match role {
                Role::Broadcaster => routes.attach_broadcaster(conn),
                Role::Viewer => {
                    routes.attach_viewer(conn);
                    Vec::new()
                }
            }
        };
        info!("[{}] {} connected as {}", stream_id, role, conn);
        self.deliver(replay);
        conn
    }

    pub fn forward(&self, stream_id: &StreamId, role: Role, conn: ConnectionId, text: &str) {
        let deliveries = {
            let Some(mut routes) = self.inner.streams.get_mut(stream_id) else {
                warn!("[{}] frame for unknown stream", stream_id);
                return;
            };
            match role {
                Role::Broadcaster => routes.from_broadcaster(text),
                Role::Viewer => routes.from_viewer(conn, text),
            }
        };
        self.deliver(deliveries);
    }

    pub fn disconnect(&self, stream_id: &StreamId, conn: ConnectionId) {
        self.inner.connections.remove(&conn);
        if let Some(mut routes) = self.inner.streams.get_mut(stream_id) {
            routes.detach(conn);
        }
        self.inner
            .streams
            .remove_if(stream_id, |_, routes| routes.is_empty());
        info!("[{}] connection {} left", stream_id, conn);
    }

    pub fn connect_legacy(
        &self,
        stream_id: &StreamId,
        tx: mpsc::UnboundedSender<Message>,
    ) -> ConnectionId {
        let conn = ConnectionId::new();
        self.inner.connections.insert(conn, tx);
        self.inner
            .legacy
            .entry(stream_id.clone())
            .or_default()
            .attach(conn);
        info!("[{}] legacy connection {}", stream_id, conn);
        conn
    }

    pub fn forward_legacy(&self, stream_id: &StreamId, conn: ConnectionId, text: &str) {
        let targets = match self.inner.legacy.get_mut(stream_id) {
            Some(mut routes) => routes.route(conn, text),
            None => return,
        };
        self.deliver(
            targets
                .into_iter()
                .map(|to| Delivery {
                    to,
                    text: text.to_owned(),
                })
                .collect(),
        );
    }

    pub fn disconnect_legacy(&self, stream_id: &StreamId, conn: ConnectionId) {
        self.inner.connections.remove(&conn);
        if let Some(mut routes) = self.inner.legacy.get_mut(stream_id) {
            routes.detach(conn);
        }
        self.inner
            .legacy
            .remove_if(stream_id, |_, routes| routes.is_empty());
        info!("[{}] legacy connection {} left", stream_id, conn);
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn stream_count(&self) -> usize {
        self.inner.streams.len() + self.inner.legacy.len()
    }

    fn deliver(&self, deliveries: Vec<Delivery>) {
        for Delivery { to, text } in deliveries {
            match self.inner.connections.get(&to) {
                Some(tx) => {
                    if let Err(e) = tx.send(Message::Text(text.into())) {
                        error!("Failed to relay frame to {}: {:?}", to, e);
                    }
                }
                None => warn!("Attempted to relay to disconnected connection {}", to),
            }
        }
    }
}
