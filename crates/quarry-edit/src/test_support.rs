//! Minimal collaborator stubs shared by the unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::broadcast::ChunkUpdate;
use crate::coords::{ChunkKey, LocalPos, VoxelCoord};
use crate::error::ChunkLoadError;
use crate::world::{
    BlockRegistry, BlockState, BroadcastChannel, ChunkStorage, LightingEngine, MaterialId,
    Observer, ObserverId, WorldAccess,
};

#[derive(Debug)]
pub struct StubChunk {
    key: ChunkKey,
    blocks: HashMap<LocalPos, BlockState>,
}

impl StubChunk {
    fn new(key: ChunkKey) -> Self {
        Self {
            key,
            blocks: HashMap::new(),
        }
    }
}

impl ChunkStorage for StubChunk {
    fn key(&self) -> ChunkKey {
        self.key
    }

    fn block_state(&self, local: LocalPos) -> BlockState {
        self.blocks.get(&local).copied().unwrap_or(BlockState(0))
    }

    fn set_block_state(&mut self, local: LocalPos, state: BlockState) {
        self.blocks.insert(local, state);
    }

    fn encode_blocks(&self) -> Vec<u8> {
        let mut entries: Vec<_> = self.blocks.iter().collect();
        entries.sort();
        entries.iter().map(|(_, s)| s.0 as u8).collect()
    }
}

#[derive(Debug, Default)]
pub struct StubWorld {
    chunks: HashMap<ChunkKey, StubChunk>,
    unavailable: HashSet<ChunkKey>,
    load_calls: usize,
}

impl StubWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_unavailable(&mut self, key: ChunkKey) {
        self.unavailable.insert(key);
    }

    pub fn set_committed(&mut self, coord: VoxelCoord, state: BlockState) {
        let key = coord.chunk_key();
        self.chunks
            .entry(key)
            .or_insert_with(|| StubChunk::new(key))
            .set_block_state(coord.local(), state);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls
    }
}

impl WorldAccess for StubWorld {
    type Chunk = StubChunk;

    fn committed_block(&self, coord: VoxelCoord) -> BlockState {
        self.chunks
            .get(&coord.chunk_key())
            .map_or(BlockState(0), |c| c.block_state(coord.local()))
    }

    fn chunk_or_load(&mut self, key: ChunkKey) -> Result<&mut StubChunk, ChunkLoadError> {
        self.load_calls += 1;
        if self.unavailable.contains(&key) {
            return Err(ChunkLoadError::new(key, "stubbed failure"));
        }
        Ok(self.chunks.entry(key).or_insert_with(|| StubChunk::new(key)))
    }

    fn chunk(&self, key: ChunkKey) -> Option<&StubChunk> {
        self.chunks.get(&key)
    }
}

#[derive(Debug, Default)]
pub struct StubLighting {
    pub dirty: Vec<VoxelCoord>,
    pub encode_calls: Cell<usize>,
}

impl LightingEngine for StubLighting {
    fn mark_dirty(&mut self, coord: VoxelCoord) {
        self.dirty.push(coord);
    }

    fn encode_light(&self, _key: ChunkKey) -> Vec<u8> {
        self.encode_calls.set(self.encode_calls.get() + 1);
        vec![15; 8]
    }
}

#[derive(Debug, Default)]
pub struct StubChannel {
    pub observers: Vec<Observer>,
    pub sent: Vec<(ObserverId, ChunkUpdate)>,
    pub observer_queries: Cell<usize>,
}

impl StubChannel {
    pub fn with_observers(observers: Vec<Observer>) -> Self {
        Self {
            observers,
            ..Default::default()
        }
    }
}

impl BroadcastChannel for StubChannel {
    fn observers(&self) -> Vec<Observer> {
        self.observer_queries.set(self.observer_queries.get() + 1);
        self.observers.clone()
    }

    fn send(&mut self, observer: ObserverId, update: &ChunkUpdate) {
        self.sent.push((observer, update.clone()));
    }
}

/// Material `n` maps to state `n * 10`; material 999 is unknown.
#[derive(Debug, Default)]
pub struct StubRegistry;

#[derive(Debug, thiserror::Error)]
#[error("unknown id {0}")]
pub struct StubRegistryError(pub u32);

impl BlockRegistry for StubRegistry {
    type Error = StubRegistryError;

    fn material_to_state(&self, material: MaterialId) -> Result<BlockState, Self::Error> {
        if material.0 == 999 {
            return Err(StubRegistryError(999));
        }
        Ok(BlockState(u32::from(material.0) * 10))
    }

    fn state_to_material(&self, state: BlockState) -> Result<MaterialId, Self::Error> {
        if state.0 % 10 != 0 {
            return Err(StubRegistryError(state.0));
        }
        Ok(MaterialId((state.0 / 10) as u16))
    }
}
