//! Crossway Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout Crossway:
//! - Identifiers (ClientId, ConnId, Role)
//! - Math primitives (Vec3, Quat, Pose)
//! - Joint and sub-part schemas
//! - Experiment condition model and the condition->display table
//! - Error types

pub mod condition;
pub mod error;
pub mod id;
pub mod math;
pub mod pose;

pub use condition::*;
pub use error::*;
pub use id::*;
pub use math::*;
pub use pose::*;
