//! Batched voxel edit sessions.
//!
//! An [`EditSession`] buffers block writes in memory and commits them in one
//! pass: edits are applied chunk by chunk, edited positions are optionally
//! handed to the lighting engine, and every touched chunk is broadcast once
//! to the observers that can see it.

pub mod broadcast;
pub mod context;
pub mod coords;
pub mod error;
pub mod lighting;
pub mod mutator;
pub mod pending;
pub mod session;
pub mod world;

pub use broadcast::{ChunkUpdate, observer_sees_chunk};
pub use context::WorldContext;
pub use coords::{CHUNK_SHIFT, CHUNK_WIDTH, ChunkKey, LocalPos, VoxelCoord};
pub use error::{ChunkLoadError, EditError, UpdateDecodeError};
pub use mutator::MutationOutcome;
pub use pending::PendingEditSet;
pub use session::{DEFAULT_VIEW_DISTANCE, EditSession, EditSettings, ExecuteReport};
pub use world::{
    BlockRegistry, BlockState, BroadcastChannel, ChunkStorage, LightingEngine, MaterialId,
    Observer, ObserverId, WorldAccess,
};

#[cfg(test)]
mod test_support;
