//! Pose chunk codec
//!
//! Splits a sampled joint set into bounded-size chunks for transmission and
//! applies received chunks back onto a local set. Chunks from one sampling
//! tick need not be reassembled atomically: each chunk is applied
//! independently and idempotently to the indices it names.

use tracing::debug;

use crossway_core::ClientId;
use crossway_wire::PoseChunkMessage;

use crate::JointSet;

/// Joints per chunk used by pedestrian sessions
pub const DEFAULT_CHUNK_SIZE: usize = 3;

/// Split a joint set into `ceil(N / chunk_size)` chunks covering `[0, N)`
/// exactly once, in ascending start order.
pub fn encode_chunks(set: &JointSet, sender: ClientId, chunk_size: usize) -> Vec<PoseChunkMessage> {
    assert!(chunk_size > 0, "chunk_size must be positive");

    let mut chunks = Vec::with_capacity(set.len().div_ceil(chunk_size));
    let mut start = 0;

    while start < set.len() {
        let end = (start + chunk_size).min(set.len());
        let poses = (start..end).filter_map(|i| set.get(i)).copied().collect();
        chunks.push(PoseChunkMessage {
            sender,
            start_index: start as u32,
            poses,
        });
        start = end;
    }

    chunks
}

/// Apply a received chunk to a local joint set. Indices beyond the local
/// set's length are skipped without error; the local set may be smaller
/// than the sender's. An empty chunk is a logged no-op.
pub fn apply_chunk(set: &mut JointSet, msg: &PoseChunkMessage) {
    if msg.poses.is_empty() {
        debug!(sender = %msg.sender, "empty pose chunk, ignoring");
        return;
    }

    for (i, pose) in msg.poses.iter().enumerate() {
        set.set(msg.start_index as usize + i, *pose);
    }
}
