use crate::routing::ConnectionId;
use relaycast_core::{SignalMessage, ViewerId};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// A frame to write to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub text: String,
}

/// Routing state for one multiplexed stream.
///
/// Viewer connections announce themselves with `viewer-joined` and wait,
/// unbound, until the broadcaster's offer for a fresh viewer id claims the
/// oldest of them. From then on that id addresses that connection.
#[derive(Debug, Default)]
pub struct StreamRoutes {
    broadcaster: Option<ConnectionId>,
    viewers: Vec<ConnectionId>,
    unbound: VecDeque<ConnectionId>,
    bindings: HashMap<ViewerId, ConnectionId>,
}

impl StreamRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `viewer-joined` replays for every viewer still waiting.
    pub fn attach_broadcaster(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        if let Some(previous) = self.broadcaster.replace(conn) {
            warn!("Broadcaster {} replaced by {}", previous, conn);
            self.bindings.clear();
        }

        let joined = viewer_joined();
        self.unbound
            .iter()
            .map(|_| Delivery {
                to: conn,
                text: joined.clone(),
            })
            .collect()
    }

    pub fn attach_viewer(&mut self, conn: ConnectionId) {
        if !self.viewers.contains(&conn) {
            self.viewers.push(conn);
        }
    }

    pub fn from_viewer(&mut self, conn: ConnectionId, text: &str) -> Vec<Delivery> {
        let mut value = serde_json::from_str::<Value>(text).ok();
        let kind = value
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        if kind.as_deref() == Some("viewer-joined") {
            self.unbind(conn);
            self.unbound.push_back(conn);
        }

        let Some(broadcaster) = self.broadcaster else {
            warn!("No broadcaster connected, dropping {:?} from viewer {}", kind, conn);
            return Vec::new();
        };

        // Stamp the bound id on frames the viewer sent without one.
        let bound = self.bound_id(conn);
        let text = match (&mut value, bound) {
            (Some(Value::Object(map)), Some(id)) if !map.contains_key("viewerId") => {
                map.insert("viewerId".to_owned(), Value::from(id.value()));
                Value::Object(map.clone()).to_string()
            }
            _ => text.to_owned(),
        };

        vec![Delivery {
            to: broadcaster,
            text,
        }]
    }

    pub fn from_broadcaster(&mut self, text: &str) -> Vec<Delivery> {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            debug!("Fanning out unparsed broadcaster frame");
            return self.fan_out(text);
        };

        let viewer_id = value
            .get("viewerId")
            .and_then(|v| serde_json::from_value::<ViewerId>(v.clone()).ok());
        let Some(viewer_id) = viewer_id else {
            return self.fan_out(text);
        };

        if let Some(conn) = self.bindings.get(&viewer_id) {
            return vec![Delivery {
                to: *conn,
                text: text.to_owned(),
            }];
        }

        if value.get("type").and_then(Value::as_str) != Some("offer") {
            warn!("No viewer bound to id {}, dropping frame", viewer_id);
            return Vec::new();
        }

        match self.unbound.pop_front() {
            Some(conn) => {
                debug!("Binding viewer id {} to connection {}", viewer_id, conn);
                self.bindings.insert(viewer_id, conn);
                vec![Delivery {
                    to: conn,
                    text: text.to_owned(),
                }]
            }
            None => {
                warn!("Offer for viewer {} but no viewer is waiting", viewer_id);
                Vec::new()
            }
        }
    }

    /// Forget `conn`. A departing broadcaster invalidates every binding.
    pub fn detach(&mut self, conn: ConnectionId) {
        if self.broadcaster == Some(conn) {
            self.broadcaster = None;
            self.bindings.clear();
            return;
        }
        self.viewers.retain(|c| *c != conn);
        self.unbind(conn);
    }

    pub fn broadcaster(&self) -> Option<ConnectionId> {
        self.broadcaster
    }

    pub fn waiting_count(&self) -> usize {
        self.unbound.len()
    }

    pub fn bound_id(&self, conn: ConnectionId) -> Option<ViewerId> {
        self.bindings
            .iter()
            .find(|(_, c)| **c == conn)
            .map(|(id, _)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.broadcaster.is_none() && self.viewers.is_empty()
    }

    fn unbind(&mut self, conn: ConnectionId) {
        self.unbound.retain(|c| *c != conn);
        self.bindings.retain(|_, c| *c != conn);
    }

    fn fan_out(&self, text: &str) -> Vec<Delivery> {
        self.viewers
            .iter()
            .map(|conn| Delivery {
                to: *conn,
                text: text.to_owned(),
            })
            .collect()
    }
}

fn viewer_joined() -> String {
    serde_json::to_string(&SignalMessage::ViewerJoined {})
        .unwrap_or_else(|_| r#"{"type":"viewer-joined"}"#.to_owned())
}
