//! Error types for the edit pipeline.

use crate::coords::ChunkKey;

/// A chunk could not be loaded or generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chunk {key} unavailable: {reason}")]
pub struct ChunkLoadError {
    /// The chunk that could not be acquired.
    pub key: ChunkKey,
    /// Human-readable cause reported by the world.
    pub reason: String,
}

impl ChunkLoadError {
    /// Creates a new load error for `key`.
    pub fn new(key: ChunkKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the opt-in strict execution policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// One or more chunks were dropped because they could not be acquired.
    #[error("{} chunk(s) dropped during execute", .0.len())]
    ChunksDropped(Vec<ChunkLoadError>),
}

/// Failure while decoding a received [`ChunkUpdate`](crate::ChunkUpdate).
#[derive(Debug, thiserror::Error)]
pub enum UpdateDecodeError {
    /// The wire bytes were not a valid update.
    #[error("malformed chunk update: {0}")]
    Postcard(#[from] postcard::Error),
    /// A compressed payload could not be decompressed.
    #[error("LZ4 decompression failed: {0}")]
    Lz4(String),
}
