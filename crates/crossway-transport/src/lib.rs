//! Crossway Transport Layer - UDP datagram transport
//!
//! One message per datagram, fire-and-forget. Delivery order per sender is
//! preserved in practice on the experiment LAN; delivery itself is not
//! guaranteed, and the protocol tolerates loss by continuous per-tick
//! resampling upstream.

pub mod udp;

pub use udp::*;
