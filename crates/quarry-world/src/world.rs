//! Chunk store keyed by [`ChunkKey`], standing in for a world storage engine.

use std::collections::hash_map::Entry;

use rustc_hash::{FxHashMap, FxHashSet};

use quarry_edit::{BlockState, ChunkKey, ChunkLoadError, ChunkStorage, VoxelCoord, WorldAccess};

use crate::chunk::MemoryChunk;

/// What [`MemoryWorld::chunk_or_load`] does for a chunk that is not loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Create the chunk, filled with the world's fill state.
    #[default]
    Generate,
    /// Refuse: only pre-loaded chunks can be acquired.
    LoadedOnly,
}

/// Owns every loaded chunk and hands them out by key.
pub struct MemoryWorld {
    chunks: FxHashMap<ChunkKey, MemoryChunk>,
    /// Chunks that fail to load regardless of policy (corrupt, locked, ...).
    unavailable: FxHashSet<ChunkKey>,
    policy: LoadPolicy,
    fill: BlockState,
    generated: usize,
}

impl MemoryWorld {
    /// Creates an empty world that generates chunks filled with `fill`.
    pub fn new(fill: BlockState) -> Self {
        Self {
            chunks: FxHashMap::default(),
            unavailable: FxHashSet::default(),
            policy: LoadPolicy::default(),
            fill,
            generated: 0,
        }
    }

    /// Sets how absent chunks are handled.
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Inserts a chunk, replacing any chunk already loaded under its key.
    pub fn load_chunk(&mut self, chunk: MemoryChunk) {
        self.chunks.insert(chunk.key(), chunk);
    }

    /// Makes every future acquisition of `key` fail.
    pub fn mark_unavailable(&mut self, key: ChunkKey) {
        self.unavailable.insert(key);
    }

    /// Number of currently loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks created by the [`LoadPolicy::Generate`] policy.
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    /// Returns `true` if `key` is loaded.
    pub fn is_loaded(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Writes one block directly, loading or generating its chunk.
    ///
    /// Intended for seeding a world before an edit session runs.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkLoadError`] if the chunk cannot be acquired.
    pub fn place(&mut self, coord: VoxelCoord, state: BlockState) -> Result<(), ChunkLoadError> {
        self.chunk_or_load(coord.chunk_key())?
            .set_block_state(coord.local(), state);
        Ok(())
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new(BlockState(0))
    }
}

impl WorldAccess for MemoryWorld {
    type Chunk = MemoryChunk;

    /// Unloaded chunks read as the fill state; reads never load.
    fn committed_block(&self, coord: VoxelCoord) -> BlockState {
        self.chunks
            .get(&coord.chunk_key())
            .map_or(self.fill, |chunk| chunk.block_state(coord.local()))
    }

    fn chunk_or_load(&mut self, key: ChunkKey) -> Result<&mut MemoryChunk, ChunkLoadError> {
        if self.unavailable.contains(&key) {
            return Err(ChunkLoadError::new(key, "chunk marked unavailable"));
        }
        match self.chunks.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(_) if self.policy == LoadPolicy::LoadedOnly => {
                Err(ChunkLoadError::new(key, "chunk not loaded"))
            }
            Entry::Vacant(entry) => {
                tracing::trace!(%key, "generating chunk");
                self.generated += 1;
                Ok(entry.insert(MemoryChunk::new(key, self.fill)))
            }
        }
    }

    fn chunk(&self, key: ChunkKey) -> Option<&MemoryChunk> {
        self.chunks.get(&key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
