use crate::routing::ConnectionId;
use relaycast_core::Role;
use tracing::{debug, warn};

/// Routing for the single-viewer endpoint: the first frame names the
/// role, everything after goes to every connection of the other role.
#[derive(Debug, Default)]
pub struct LegacyRoutes {
    members: Vec<(ConnectionId, Option<Role>)>,
}

impl LegacyRoutes {
    pub fn attach(&mut self, conn: ConnectionId) {
        self.members.push((conn, None));
    }

    /// Returns the connections `text` must be copied to.
    pub fn route(&mut self, conn: ConnectionId, text: &str) -> Vec<ConnectionId> {
        let Some(index) = self.members.iter().position(|(c, _)| *c == conn) else {
            return Vec::new();
        };

        let Some(role) = self.members[index].1 else {
            match text.trim().parse::<Role>() {
                Ok(role) => {
                    debug!("Legacy connection {} is a {}", conn, role);
                    self.members[index].1 = Some(role);
                }
                Err(e) => warn!("Legacy connection {} sent no role: {}", conn, e),
            }
            return Vec::new();
        };

        self.members
            .iter()
            .filter(|(_, r)| *r == Some(role.other()))
            .map(|(c, _)| *c)
            .collect()
    }

    pub fn detach(&mut self, conn: ConnectionId) {
        self.members.retain(|(c, _)| *c != conn);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
