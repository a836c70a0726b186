//! Per-chunk update messages and view-distance filtered delivery.
//!
//! Every touched chunk is snapshotted once into a [`ChunkUpdate`]; the same
//! message is then handed to each observer whose view box contains the
//! chunk. The view box is an axis-aligned square in chunk space extending
//! `view_distance + 1` chunks from the observer's chunk on each side.

use std::collections::BTreeSet;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};

use crate::coords::ChunkKey;
use crate::error::UpdateDecodeError;
use crate::world::{BroadcastChannel, ChunkStorage, LightingEngine, Observer, WorldAccess};

// ---------------------------------------------------------------------------
// ChunkUpdate
// ---------------------------------------------------------------------------

/// Full snapshot of one chunk's blocks and light, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkUpdate {
    /// Which chunk this snapshot describes.
    pub key: ChunkKey,
    /// LZ4-compressed block data.
    pub blocks: Vec<u8>,
    /// LZ4-compressed light data.
    pub light: Vec<u8>,
}

impl ChunkUpdate {
    /// Snapshots `chunk` together with the engine's current light data for it.
    pub fn build<C: ChunkStorage + ?Sized>(chunk: &C, lighting: &dyn LightingEngine) -> Self {
        let key = chunk.key();
        Self::from_raw(key, &chunk.encode_blocks(), &lighting.encode_light(key))
    }

    /// Builds an update from uncompressed block and light payloads.
    pub fn from_raw(key: ChunkKey, blocks: &[u8], light: &[u8]) -> Self {
        Self {
            key,
            blocks: compress_prepend_size(blocks),
            light: compress_prepend_size(light),
        }
    }

    /// Decompresses the block payload.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateDecodeError::Lz4`] if the payload is corrupt.
    pub fn decode_blocks(&self) -> Result<Vec<u8>, UpdateDecodeError> {
        decompress_size_prepended(&self.blocks).map_err(|e| UpdateDecodeError::Lz4(e.to_string()))
    }

    /// Decompresses the light payload.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateDecodeError::Lz4`] if the payload is corrupt.
    pub fn decode_light(&self) -> Result<Vec<u8>, UpdateDecodeError> {
        decompress_size_prepended(&self.light).map_err(|e| UpdateDecodeError::Lz4(e.to_string()))
    }

    /// Encodes the update for the wire.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateDecodeError::Postcard`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, UpdateDecodeError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Decodes an update received from the wire.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateDecodeError::Postcard`] if `bytes` are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UpdateDecodeError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Returns `true` if `observer` should receive updates for chunk `key`.
///
/// Square cutoff: both `|key.x - observer.chunk_x|` and
/// `|key.z - observer.chunk_z|` must be at most `view_distance + 1`.
pub fn observer_sees_chunk(observer: &Observer, key: ChunkKey, view_distance: u32) -> bool {
    let dist = i64::from(view_distance) + 1;
    let dx = i64::from(key.x) - i64::from(observer.chunk_x);
    let dz = i64::from(key.z) - i64::from(observer.chunk_z);
    dx.abs() <= dist && dz.abs() <= dist
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

/// Sends one update per touched chunk to every observer that can see it.
///
/// The update for a chunk is built once and shared across observers. A
/// touched chunk that is no longer loaded is skipped. Returns the number of
/// messages sent.
pub fn publish<W: WorldAccess>(
    world: &W,
    lighting: &dyn LightingEngine,
    channel: &mut dyn BroadcastChannel,
    touched: &BTreeSet<ChunkKey>,
    view_distance: u32,
) -> usize {
    if touched.is_empty() {
        return 0;
    }

    let observers = channel.observers();
    let mut sent = 0;

    for &key in touched {
        let Some(chunk) = world.chunk(key) else {
            tracing::trace!(%key, "touched chunk unloaded before broadcast");
            continue;
        };
        let update = ChunkUpdate::build(chunk, lighting);

        for observer in &observers {
            if observer_sees_chunk(observer, key, view_distance) {
                channel.send(observer.id, &update);
                sent += 1;
            }
        }
    }

    sent
}
