//! UDP transport implementation

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use crossway_core::{CrosswayError, CrosswayResult};
use crossway_wire::{decode, encode, Message, MAX_MESSAGE_SIZE};

/// UDP transport for Crossway messages
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind to a local address
    pub async fn bind(addr: SocketAddr) -> CrosswayResult<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| CrosswayError::TransportError(e.to_string()))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| CrosswayError::TransportError(e.to_string()))?;

        Ok(UdpTransport {
            socket: Arc::new(socket),
            local_addr,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Send a message to a destination, fire-and-forget
    pub async fn send_to(&self, msg: &Message, dest: SocketAddr) -> CrosswayResult<()> {
        let bytes = encode(msg)?;
        self.socket
            .send_to(&bytes, dest)
            .await
            .map_err(|e| CrosswayError::TransportError(e.to_string()))?;
        Ok(())
    }

    /// Receive one message (blocking)
    pub async fn recv_from(&self) -> CrosswayResult<(Message, SocketAddr)> {
        let mut buf = vec![0u8; MAX_MESSAGE_SIZE];
        let (len, addr) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(|e| CrosswayError::TransportError(e.to_string()))?;

        let msg = decode(&buf[..len])?;
        Ok((msg, addr))
    }

    /// Get a clone of the socket for concurrent operations
    pub fn socket(&self) -> Arc<UdpSocket> {
        Arc::clone(&self.socket)
    }
}

/// Decoded message receiver channel
pub type MessageReceiver = mpsc::Receiver<(Message, SocketAddr)>;

/// Start a background receive loop. Undecodable datagrams are logged and
/// skipped; the loop ends when the receiver is dropped.
pub fn start_receive_loop(socket: Arc<UdpSocket>, buffer_size: usize) -> MessageReceiver {
    let (tx, rx) = mpsc::channel(buffer_size);

    tokio::spawn(async move {
        let mut buf = vec![0u8; MAX_MESSAGE_SIZE];
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, addr)) => {
                    let msg = match decode(&buf[..len]) {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "undecodable datagram dropped");
                            continue;
                        }
                    };
                    if tx.send((msg, addr)).await.is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => {
                    tracing::warn!("UDP receive error: {}", e);
                }
            }
        }
    });

    rx
}
