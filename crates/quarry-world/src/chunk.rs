//! Full-height chunk column stored as lazily allocated 16-high sections.
//!
//! Every write sets [`SAVE_DIRTY`]. Writes never relight and never notify
//! observers; those are left to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use quarry_edit::{BlockState, CHUNK_WIDTH, ChunkKey, ChunkStorage, LocalPos};

/// Height of one storage section, in voxels.
pub const SECTION_HEIGHT: i32 = 16;

/// Voxels per section.
pub const SECTION_VOLUME: usize = (CHUNK_WIDTH * CHUNK_WIDTH * SECTION_HEIGHT) as usize;

/// Dirty-flag bit: chunk needs saving to disk.
pub const SAVE_DIRTY: u8 = 0b0000_0001;

/// A chunk column backed by sparse vertical sections.
#[derive(Clone, Debug)]
pub struct MemoryChunk {
    key: ChunkKey,
    /// Section index (`y.div_euclid(16)`) to dense block storage.
    sections: BTreeMap<i32, Box<[BlockState]>>,
    /// State of voxels in sections that were never written.
    fill: BlockState,
    dirty: u8,
}

impl MemoryChunk {
    /// Creates a chunk whose every voxel is `fill`.
    pub fn new(key: ChunkKey, fill: BlockState) -> Self {
        Self {
            key,
            sections: BTreeMap::new(),
            fill,
            dirty: 0,
        }
    }

    /// Returns `true` if the specified dirty flag (or combination) is set.
    pub fn is_dirty(&self, flag: u8) -> bool {
        self.dirty & flag == flag
    }

    /// Captures the chunk's block data.
    pub fn snapshot(&self) -> BlockSnapshot {
        BlockSnapshot {
            key: self.key,
            fill: self.fill,
            sections: self
                .sections
                .iter()
                .map(|(index, blocks)| (*index, blocks.to_vec()))
                .collect(),
        }
    }

    fn split(local: LocalPos) -> (i32, usize) {
        let section = local.y().div_euclid(SECTION_HEIGHT);
        let y = local.y().rem_euclid(SECTION_HEIGHT) as usize;
        let width = CHUNK_WIDTH as usize;
        let index = (y * width + usize::from(local.z())) * width + usize::from(local.x());
        (section, index)
    }
}

impl ChunkStorage for MemoryChunk {
    fn key(&self) -> ChunkKey {
        self.key
    }

    fn block_state(&self, local: LocalPos) -> BlockState {
        let (section, index) = Self::split(local);
        self.sections
            .get(&section)
            .map_or(self.fill, |blocks| blocks[index])
    }

    fn set_block_state(&mut self, local: LocalPos, state: BlockState) {
        let (section, index) = Self::split(local);
        let fill = self.fill;
        let blocks = self
            .sections
            .entry(section)
            .or_insert_with(|| vec![fill; SECTION_VOLUME].into_boxed_slice());
        blocks[index] = state;
        self.dirty |= SAVE_DIRTY;
    }

    fn encode_blocks(&self) -> Vec<u8> {
        self.snapshot().to_bytes()
    }
}

/// Serializable copy of a chunk's block data, as carried in chunk updates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    /// Chunk the data belongs to.
    pub key: ChunkKey,
    /// State of every voxel outside the listed sections.
    pub fill: BlockState,
    /// `(section index, blocks)` for every allocated section.
    pub sections: Vec<(i32, Vec<BlockState>)>,
}

impl BlockSnapshot {
    /// Encodes the snapshot with postcard.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Vec output cannot run out of space.
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Decodes a snapshot produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns a postcard error if `bytes` are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }

    /// Returns the state at `local` as recorded in this snapshot.
    ///
    /// A section shorter than [`SECTION_VOLUME`] reads as `fill` past its end.
    pub fn block_state(&self, local: LocalPos) -> BlockState {
        let (section, index) = MemoryChunk::split(local);
        self.sections
            .iter()
            .find(|(i, _)| *i == section)
            .and_then(|(_, blocks)| blocks.get(index).copied())
            .unwrap_or(self.fill)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
