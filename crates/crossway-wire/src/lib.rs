//! Crossway Wire Protocol - Binary message format
//!
//! One datagram carries one message:
//! - Kind byte
//! - Fixed fields, little-endian
//! - Pose sequences as count-prefixed arrays
//!
//! No version field; the schema is fixed per deployment.

pub mod codec;
pub mod message;

pub use codec::*;
pub use message::*;
