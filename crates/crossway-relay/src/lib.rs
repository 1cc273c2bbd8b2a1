//! Crossway Relay - Server-side fan-out and experiment control
//!
//! The server owns three things:
//! - the broadcast relay that fans participant traffic out to every other
//!   connection, gated on a quorum of connected roles
//! - the experiment condition machine and AV speed model, driven by the
//!   operator command surface
//! - the append-only operational log

pub mod log;
pub mod relay;
pub mod server;

pub use log::*;
pub use relay::*;
pub use server::*;
