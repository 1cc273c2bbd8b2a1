//! Broadcast relay
//!
//! Receives a message from one connection and fans it out to all other
//! connections, once the full quorum of roles is present. Stateless across
//! messages: no sequence numbers, no buffering, no retry. A dropped
//! message is superseded by the sender's next per-tick sample.

use tracing::{debug, info, warn};

use crossway_core::{ConnId, Role};

/// Connection registry and fan-out policy
#[derive(Debug, Default)]
pub struct BroadcastRelay {
    /// Connections in accept order
    connections: Vec<(ConnId, Role)>,
}

impl BroadcastRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection with its role. Re-registering an existing
    /// connection updates its role in place.
    pub fn on_connect(&mut self, conn: ConnId, role: Role) {
        if let Some(entry) = self.connections.iter_mut().find(|(c, _)| *c == conn) {
            debug!(?conn, %role, "connection re-registered");
            entry.1 = role;
            return;
        }
        info!(?conn, %role, "connection registered");
        self.connections.push((conn, role));
    }

    /// Remove a connection
    pub fn on_disconnect(&mut self, conn: ConnId) {
        let before = self.connections.len();
        self.connections.retain(|(c, _)| *c != conn);
        if self.connections.len() != before {
            info!(?conn, "connection removed");
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether every quorum role has at least one connection
    pub fn has_quorum(&self) -> bool {
        Role::all()
            .iter()
            .all(|role| self.connections.iter().any(|(_, r)| r == role))
    }

    /// Fan-out targets for a message arriving on `from`: every connection
    /// except the sender, or nothing while the quorum is not met. The
    /// message itself is forwarded unmodified by the caller.
    pub fn targets_for(&self, from: ConnId) -> Vec<ConnId> {
        if !self.has_quorum() {
            warn!("not all clients are connected, dropping message");
            return Vec::new();
        }

        self.connections
            .iter()
            .filter(|(conn, _)| *conn != from)
            .map(|(conn, _)| *conn)
            .collect()
    }

    /// Targets for a server-originated broadcast: every connection
    pub fn broadcast_targets(&self) -> Vec<ConnId> {
        self.connections.iter().map(|(conn, _)| *conn).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_quorum_drops() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(2), Role::Cyclist);

        assert!(!relay.has_quorum());
        assert!(relay.targets_for(ConnId::new(1)).is_empty());
    }

    #[test]
    fn test_quorum_reached_forwards_to_others() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(2), Role::Cyclist);
        relay.on_connect(ConnId::new(3), Role::Driver);

        assert!(relay.has_quorum());
        assert_eq!(
            relay.targets_for(ConnId::new(2)),
            vec![ConnId::new(1), ConnId::new(3)]
        );
    }

    #[test]
    fn test_duplicate_role_does_not_make_quorum() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(2), Role::Pedestrian);
        relay.on_connect(ConnId::new(3), Role::Cyclist);

        assert!(!relay.has_quorum());
    }

    #[test]
    fn test_disconnect_breaks_quorum() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(2), Role::Cyclist);
        relay.on_connect(ConnId::new(3), Role::Driver);
        relay.on_disconnect(ConnId::new(3));

        assert!(!relay.has_quorum());
        assert!(relay.targets_for(ConnId::new(1)).is_empty());
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(2), Role::Cyclist);

        // Server broadcasts are not quorum-gated
        assert_eq!(
            relay.broadcast_targets(),
            vec![ConnId::new(1), ConnId::new(2)]
        );
    }

    #[test]
    fn test_reregistration_updates_role() {
        let mut relay = BroadcastRelay::new();
        relay.on_connect(ConnId::new(1), Role::Pedestrian);
        relay.on_connect(ConnId::new(1), Role::Driver);

        assert_eq!(relay.connection_count(), 1);
        relay.on_connect(ConnId::new(2), Role::Pedestrian);
        relay.on_connect(ConnId::new(3), Role::Cyclist);
        assert!(relay.has_quorum());
    }
}
