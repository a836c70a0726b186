//! In-memory buffer of uncommitted block writes.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::coords::{ChunkKey, LocalPos, VoxelCoord};
use crate::world::BlockState;

/// Pending block writes keyed by world coordinate.
///
/// Each coordinate holds at most one state; a later write replaces an
/// earlier one. Iteration order is unspecified.
#[derive(Clone, Debug, Default)]
pub struct PendingEditSet {
    edits: FxHashMap<VoxelCoord, BlockState>,
}

impl PendingEditSet {
    /// Creates an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` at `coord`, returning the state it replaced, if any.
    pub fn insert(&mut self, coord: VoxelCoord, state: BlockState) -> Option<BlockState> {
        self.edits.insert(coord, state)
    }

    /// Returns the pending state at `coord`.
    pub fn get(&self, coord: VoxelCoord) -> Option<BlockState> {
        self.edits.get(&coord).copied()
    }

    /// Returns `true` if `coord` has a pending write.
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.edits.contains_key(&coord)
    }

    /// Number of distinct coordinates with a pending write.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Drops every pending write.
    pub fn clear(&mut self) {
        self.edits.clear();
    }

    /// Iterates over `(coordinate, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelCoord, BlockState)> + '_ {
        self.edits.iter().map(|(c, s)| (*c, *s))
    }

    /// Iterates over the edited coordinates.
    pub fn coords(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.edits.keys().copied()
    }

    /// Partitions the edits by owning chunk, converting each coordinate to
    /// its chunk-local position.
    pub fn group_by_chunk(&self) -> BTreeMap<ChunkKey, Vec<(LocalPos, BlockState)>> {
        let mut groups: BTreeMap<ChunkKey, Vec<(LocalPos, BlockState)>> = BTreeMap::new();
        for (coord, state) in &self.edits {
            groups
                .entry(coord.chunk_key())
                .or_default()
                .push((coord.local(), *state));
        }
        groups
    }
}

impl Extend<(VoxelCoord, BlockState)> for PendingEditSet {
    fn extend<I: IntoIterator<Item = (VoxelCoord, BlockState)>>(&mut self, iter: I) {
        self.edits.extend(iter);
    }
}
