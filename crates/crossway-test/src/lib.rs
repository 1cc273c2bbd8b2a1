//! Crossway test harness - deterministic end-to-end experiment simulation
//!
//! This crate provides:
//! - Scripted input and recording sinks shared across test suites
//! - An in-memory experiment harness wiring sessions through the relay
//! - End-to-end integration tests for the full participant flow

pub mod harness;
pub mod integration;
pub mod simulator;

pub use harness::*;
pub use simulator::*;
