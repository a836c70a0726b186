//! Collaborator interfaces the edit pipeline is driven through.
//!
//! The pipeline owns none of these: chunk storage, material conversion,
//! light propagation, and the network transport all live elsewhere and are
//! reached only through the traits below.

use serde::{Deserialize, Serialize};

use crate::broadcast::ChunkUpdate;
use crate::coords::{ChunkKey, LocalPos, VoxelCoord};
use crate::error::ChunkLoadError;

/// Material identifier as seen by callers of the edit session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

/// Opaque handle to a concrete block state (type plus variant data).
///
/// Produced and interpreted only by a [`BlockRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState(pub u32);

/// Converts between caller-facing materials and stored block states.
pub trait BlockRegistry {
    /// Failure raised for identifiers the registry does not know.
    type Error: std::error::Error;

    /// Returns the default block state for `material`.
    fn material_to_state(&self, material: MaterialId) -> Result<BlockState, Self::Error>;

    /// Returns the material a block state was derived from.
    fn state_to_material(&self, state: BlockState) -> Result<MaterialId, Self::Error>;
}

/// A chunk column owned by the world storage engine.
pub trait ChunkStorage {
    /// Key of this chunk.
    fn key(&self) -> ChunkKey;

    /// Returns the block state at `local`.
    fn block_state(&self, local: LocalPos) -> BlockState;

    /// Writes a block state directly into storage.
    ///
    /// Must not trigger lighting updates or per-block network traffic.
    fn set_block_state(&mut self, local: LocalPos, state: BlockState);

    /// Serializes the chunk's block data for a network snapshot.
    fn encode_blocks(&self) -> Vec<u8>;
}

/// Read access to committed world state plus chunk acquisition.
pub trait WorldAccess {
    /// Chunk container type handed out by this world.
    type Chunk: ChunkStorage;

    /// Returns the committed block state at `coord`.
    fn committed_block(&self, coord: VoxelCoord) -> BlockState;

    /// Returns the chunk for `key`, loading or generating it if absent.
    ///
    /// May block while the chunk is read from disk or generated.
    fn chunk_or_load(&mut self, key: ChunkKey) -> Result<&mut Self::Chunk, ChunkLoadError>;

    /// Returns the chunk for `key` if it is currently loaded.
    fn chunk(&self, key: ChunkKey) -> Option<&Self::Chunk>;
}

/// The external light propagation engine.
pub trait LightingEngine {
    /// Queues `coord` for a light recheck. Scheduling is owned by the engine.
    fn mark_dirty(&mut self, coord: VoxelCoord);

    /// Serializes the current light data for chunk `key`.
    fn encode_light(&self, key: ChunkKey) -> Vec<u8>;
}

/// Identifies a connected observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

/// A connected observer and the chunk it currently stands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observer {
    /// Observer identifier.
    pub id: ObserverId,
    /// Chunk-grid X of the observer's position.
    pub chunk_x: i32,
    /// Chunk-grid Z of the observer's position.
    pub chunk_z: i32,
}

impl Observer {
    /// Creates an observer standing in chunk `(chunk_x, chunk_z)`.
    pub fn new(id: u64, chunk_x: i32, chunk_z: i32) -> Self {
        Self {
            id: ObserverId(id),
            chunk_x,
            chunk_z,
        }
    }
}

/// Outbound side of the network transport.
pub trait BroadcastChannel {
    /// Returns every currently connected observer.
    fn observers(&self) -> Vec<Observer>;

    /// Delivers `update` to one observer. Transport errors are the channel's concern.
    fn send(&mut self, observer: ObserverId, update: &ChunkUpdate);
}
