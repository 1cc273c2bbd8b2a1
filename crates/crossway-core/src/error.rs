//! Error types for Crossway

use thiserror::Error;

/// Core Crossway errors
#[derive(Error, Debug)]
pub enum CrosswayError {
    // Wire errors
    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unknown message kind: {0}")]
    UnknownMessageKind(u8),

    #[error("Unknown role byte: {0}")]
    UnknownRole(u8),

    // Condition errors
    #[error("Invalid condition number: {0}. Must be between 1 and 12")]
    InvalidCondition(i32),

    #[error("No condition selected")]
    ConditionNotSelected,

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),

    // Operational log errors
    #[error("Log write failed: {0}")]
    LogWriteFailed(String),
}

/// Result type for Crossway operations
pub type CrosswayResult<T> = Result<T, CrosswayError>;
