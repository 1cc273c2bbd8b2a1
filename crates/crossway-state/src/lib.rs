//! Crossway State - State machines and the pose chunk codec
//!
//! This crate holds the authoritative pieces of the simulation:
//! - JointSet: an ordered pose sequence with a stable index schema
//! - Chunk codec: bounded-size slices of a joint set for transmission
//! - ConditionMachine: the server-owned experiment condition
//! - AV behavior: standalone drive/decelerate/stop lifecycle, the
//!   server-mirrored variant, and the server-side speed model

pub mod av;
pub mod chunk;
pub mod condition;
pub mod jointset;

pub use av::*;
pub use chunk::*;
pub use condition::*;
pub use jointset::*;
