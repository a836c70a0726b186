//! Dirty-position queue standing in for a light propagation engine.
//!
//! [`QueuedLighting`] records positions handed to it and, when
//! [`propagate`](QueuedLighting::propagate) runs, drains them and bumps a
//! per-chunk light revision. The light payload it encodes is that revision
//! plus the number of positions still waiting in the chunk.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use quarry_edit::{ChunkKey, LightingEngine, VoxelCoord};

/// Light payload carried in a chunk update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSnapshot {
    /// Chunk the light data describes.
    pub key: ChunkKey,
    /// Number of propagation passes that touched this chunk.
    pub revision: u64,
    /// Positions in this chunk queued but not yet propagated.
    pub pending: u32,
}

impl LightSnapshot {
    /// Decodes a payload produced by [`QueuedLighting::encode_light`].
    ///
    /// # Errors
    ///
    /// Returns a postcard error if `bytes` are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

/// FIFO of positions awaiting a light recheck.
#[derive(Debug, Default)]
pub struct QueuedLighting {
    queue: VecDeque<VoxelCoord>,
    /// Queued positions per chunk; entries are removed when they reach zero.
    pending: FxHashMap<ChunkKey, u32>,
    revisions: FxHashMap<ChunkKey, u64>,
    marked: usize,
}

impl QueuedLighting {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions waiting for propagation.
    pub fn queued(&self) -> impl Iterator<Item = &VoxelCoord> {
        self.queue.iter()
    }

    /// Number of positions waiting for propagation.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Total positions ever marked dirty.
    pub fn marked_total(&self) -> usize {
        self.marked
    }

    /// Processes up to `budget` queued positions, oldest first.
    ///
    /// Each chunk with at least one processed position gets its revision
    /// bumped once. Returns the number of positions processed.
    pub fn propagate(&mut self, budget: usize) -> usize {
        let take = budget.min(self.queue.len());
        let mut chunks: Vec<ChunkKey> = self
            .queue
            .drain(..take)
            .map(VoxelCoord::chunk_key)
            .collect();
        chunks.sort_unstable();
        for key in &chunks {
            if let Some(count) = self.pending.get_mut(key) {
                *count -= 1;
                if *count == 0 {
                    self.pending.remove(key);
                }
            }
        }
        chunks.dedup();
        for key in chunks {
            *self.revisions.entry(key).or_default() += 1;
        }
        take
    }

    /// Number of positions in `key` waiting for propagation.
    pub fn pending(&self, key: ChunkKey) -> u32 {
        self.pending.get(&key).copied().unwrap_or(0)
    }

    /// Current light revision of `key`.
    pub fn revision(&self, key: ChunkKey) -> u64 {
        self.revisions.get(&key).copied().unwrap_or(0)
    }
}

impl LightingEngine for QueuedLighting {
    fn mark_dirty(&mut self, coord: VoxelCoord) {
        self.queue.push_back(coord);
        let count = self.pending.entry(coord.chunk_key()).or_default();
        *count = count.saturating_add(1);
        self.marked += 1;
    }

    fn encode_light(&self, key: ChunkKey) -> Vec<u8> {
        let snapshot = LightSnapshot {
            key,
            revision: self.revision(key),
            pending: self.pending(key),
        };
        postcard::to_allocvec(&snapshot).unwrap_or_default()
    }
}
