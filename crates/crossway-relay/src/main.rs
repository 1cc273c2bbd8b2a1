//! Crossway server binary
//!
//! Binds the UDP transport, fans participant traffic out through the
//! broadcast relay, and exposes the operator command surface on stdin:
//!
//! ```text
//! cond <n>   select experiment condition n (1-12)
//! start      start the AV
//! stop       stop the AV
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossway_core::{ConnId, CrosswayResult};
use crossway_relay::{BroadcastRelay, ExperimentServer, OperationLog};
use crossway_transport::{start_receive_loop, UdpTransport};
use crossway_wire::Message;

#[derive(Parser, Debug)]
#[command(name = "crossway-server")]
#[command(about = "Crossway experiment server - relays participant poses and drives eHMI conditions")]
struct Args {
    /// UDP listen address
    #[arg(long, default_value = "127.0.0.1:4850")]
    listen: SocketAddr,

    /// Operational log file path
    #[arg(long, default_value = "server_log.txt")]
    log_file: PathBuf,

    /// Simulation tick interval in milliseconds
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Log level filter
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Shared server state behind one lock. Locks are held only to compute
/// fan-out targets; sends happen outside the lock.
struct ServerState {
    relay: BroadcastRelay,
    server: ExperimentServer,
    addrs: HashMap<ConnId, SocketAddr>,
    conn_by_addr: HashMap<SocketAddr, ConnId>,
    next_conn: u64,
}

impl ServerState {
    fn register(&mut self, addr: SocketAddr, role: crossway_core::Role) -> ConnId {
        let conn = *self.conn_by_addr.entry(addr).or_insert_with(|| {
            self.next_conn += 1;
            ConnId::new(self.next_conn)
        });
        self.addrs.insert(conn, addr);
        self.relay.on_connect(conn, role);
        conn
    }

    fn broadcast_addrs(&self) -> Vec<SocketAddr> {
        self.relay
            .broadcast_targets()
            .into_iter()
            .filter_map(|conn| self.addrs.get(&conn).copied())
            .collect()
    }
}

async fn send_all(transport: &UdpTransport, msg: &Message, dests: &[SocketAddr]) {
    for dest in dests {
        if let Err(e) = transport.send_to(msg, *dest).await {
            warn!(peer = %dest, error = %e, "send failed");
        }
    }
}

#[tokio::main]
async fn main() -> CrosswayResult<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing log file is fatal to the paper trail, not to the process
    let log = match OperationLog::open(&args.log_file) {
        Ok(log) => Some(log),
        Err(e) => {
            error!(path = %args.log_file.display(), error = %e, "operational log unavailable");
            None
        }
    };

    let transport = Arc::new(UdpTransport::bind(args.listen).await?);
    info!(addr = %transport.local_addr(), "server started and ready for commands");

    let state = Arc::new(Mutex::new(ServerState {
        relay: BroadcastRelay::new(),
        server: ExperimentServer::new(log),
        addrs: HashMap::new(),
        conn_by_addr: HashMap::new(),
        next_conn: 0,
    }));

    // Network fan-out loop
    {
        let state = Arc::clone(&state);
        let transport = Arc::clone(&transport);
        let mut rx = start_receive_loop(transport.socket(), 1024);
        tokio::spawn(async move {
            while let Some((msg, addr)) = rx.recv().await {
                let targets = {
                    let mut state = state.lock();
                    match &msg {
                        Message::Hello(hello) => {
                            let conn = state.register(addr, hello.role);
                            info!(?conn, role = %hello.role, peer = %addr, "client registered");
                            Vec::new()
                        }
                        _ => match state.conn_by_addr.get(&addr).copied() {
                            Some(conn) => state
                                .relay
                                .targets_for(conn)
                                .into_iter()
                                .filter_map(|c| state.addrs.get(&c).copied())
                                .collect(),
                            None => {
                                warn!(peer = %addr, "message from unregistered peer dropped");
                                Vec::new()
                            }
                        },
                    }
                };
                send_all(&transport, &msg, &targets).await;
            }
        });
    }

    // Per-tick AV speed broadcast
    {
        let state = Arc::clone(&state);
        let transport = Arc::clone(&transport);
        let tick = Duration::from_millis(args.tick_ms);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                let (msg, targets) = {
                    let mut state = state.lock();
                    let msg = state.server.tick(tick.as_secs_f32());
                    (msg, state.broadcast_addrs())
                };
                send_all(&transport, &msg, &targets).await;
            }
        });
    }

    // Operator command surface
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let command = line.trim();
        let outcome = {
            let mut state = state.lock();
            let msg = match command.split_whitespace().collect::<Vec<_>>().as_slice() {
                ["cond", n] => match n.parse::<i32>() {
                    Ok(n) => state.server.set_condition(n),
                    Err(_) => {
                        warn!(input = command, "unparseable condition number");
                        None
                    }
                },
                ["start"] => Some(state.server.start_driving()),
                ["stop"] => Some(state.server.stop_driving()),
                ["quit"] | ["exit"] => break,
                [] => None,
                _ => {
                    warn!(input = command, "unknown command");
                    None
                }
            };
            msg.map(|m| (m, state.broadcast_addrs()))
        };
        if let Some((msg, targets)) = outcome {
            send_all(&transport, &msg, &targets).await;
        }
    }

    info!("server stopped");
    Ok(())
}
