//! In-memory experiment simulator
//!
//! Wires participant sessions through the broadcast relay and the
//! experiment server without any sockets. Delivery is immediate and
//! lossless, in connection order, so every test run is deterministic.

use std::collections::VecDeque;

use crossway_core::{ClientId, ConnId, Pose, Role};
use crossway_relay::{BroadcastRelay, ExperimentServer};
use crossway_session::ParticipantSession;
use crossway_wire::Message;

use crate::{RecordedDisplay, RecordedScene, ScriptedInput};

/// One simulated participant: session plus its seams and inbox
pub struct HarnessClient {
    pub conn: ConnId,
    pub session: ParticipantSession,
    pub input: ScriptedInput,
    pub scene: RecordedScene,
    pub display: RecordedDisplay,
    inbox: VecDeque<Message>,
}

/// The whole experiment in one process: relay, server, participants
pub struct ExperimentSimulator {
    relay: BroadcastRelay,
    server: ExperimentServer,
    clients: Vec<HarnessClient>,
    next_conn: u64,
}

impl Default for ExperimentSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentSimulator {
    pub fn new() -> Self {
        ExperimentSimulator {
            relay: BroadcastRelay::new(),
            server: ExperimentServer::new(None),
            clients: Vec::new(),
            next_conn: 0,
        }
    }

    /// Connect a participant at the default origin pose
    pub fn connect(&mut self, role: Role) -> ConnId {
        self.connect_at(role, Pose::default())
    }

    /// Connect a participant with a given starting root pose. Registration
    /// goes through the session's own hello message, like a real client.
    pub fn connect_at(&mut self, role: Role, root: Pose) -> ConnId {
        self.next_conn += 1;
        let conn = ConnId::new(self.next_conn);
        let session = ParticipantSession::with_pose(ClientId::new(self.next_conn), role, root);

        if let Message::Hello(hello) = session.hello() {
            self.relay.on_connect(conn, hello.role);
        }

        self.clients.push(HarnessClient {
            conn,
            session,
            input: ScriptedInput::default(),
            scene: RecordedScene::default(),
            display: RecordedDisplay::default(),
            inbox: VecDeque::new(),
        });
        conn
    }

    pub fn disconnect(&mut self, conn: ConnId) {
        self.relay.on_disconnect(conn);
        self.clients.retain(|c| c.conn != conn);
    }

    pub fn client(&self, conn: ConnId) -> &HarnessClient {
        self.clients
            .iter()
            .find(|c| c.conn == conn)
            .unwrap_or_else(|| panic!("no such connection: {:?}", conn))
    }

    pub fn client_mut(&mut self, conn: ConnId) -> &mut HarnessClient {
        self.clients
            .iter_mut()
            .find(|c| c.conn == conn)
            .unwrap_or_else(|| panic!("no such connection: {:?}", conn))
    }

    pub fn set_input(&mut self, conn: ConnId, forward: f32, turn: f32) {
        self.client_mut(conn).input = ScriptedInput::new(forward, turn);
    }

    /// Operator command: select a condition and deliver the broadcast
    pub fn set_condition(&mut self, n: i32) -> bool {
        match self.server.set_condition(n) {
            Some(msg) => {
                self.deliver_broadcast(msg);
                true
            }
            None => false,
        }
    }

    /// Operator command: start the AV
    pub fn start_driving(&mut self) {
        let msg = self.server.start_driving();
        self.deliver_broadcast(msg);
    }

    /// Operator command: stop the AV
    pub fn stop_driving(&mut self) {
        let msg = self.server.stop_driving();
        self.deliver_broadcast(msg);
    }

    /// One full simulation tick: sample every session, fan the samples out
    /// through the relay, broadcast the server's speed, apply inboxes.
    pub fn tick(&mut self, dt: f32) {
        let mut outgoing: Vec<(ConnId, Message)> = Vec::new();
        for client in &mut self.clients {
            for msg in client.session.tick(dt, &mut client.input) {
                outgoing.push((client.conn, msg));
            }
        }

        for (from, msg) in outgoing {
            for target in self.relay.targets_for(from) {
                self.inbox_push(target, msg.clone());
            }
        }

        let speed = self.server.tick(dt);
        for target in self.relay.broadcast_targets() {
            self.inbox_push(target, speed.clone());
        }

        self.pump();
    }

    fn deliver_broadcast(&mut self, msg: Message) {
        for target in self.relay.broadcast_targets() {
            self.inbox_push(target, msg.clone());
        }
        self.pump();
    }

    fn inbox_push(&mut self, conn: ConnId, msg: Message) {
        if let Some(client) = self.clients.iter_mut().find(|c| c.conn == conn) {
            client.inbox.push_back(msg);
        }
    }

    /// Drain every inbox through the session receive path
    fn pump(&mut self) {
        for client in &mut self.clients {
            while let Some(msg) = client.inbox.pop_front() {
                client
                    .session
                    .handle_message(&msg, &mut client.scene, &mut client.display);
            }
        }
    }
}
