//! Chunk-grouped application of pending edits.

use std::collections::BTreeSet;

use crate::coords::ChunkKey;
use crate::error::ChunkLoadError;
use crate::pending::PendingEditSet;
use crate::world::{ChunkStorage, WorldAccess};

/// What [`apply`] did to the world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Chunks that were acquired and written to.
    pub touched: BTreeSet<ChunkKey>,
    /// Chunks whose edits were dropped because they could not be acquired.
    pub dropped: Vec<ChunkLoadError>,
    /// Number of block writes performed.
    pub applied: usize,
}

/// Writes every pending edit into its chunk, loading chunks as needed.
///
/// A chunk that cannot be acquired drops only its own edits; it is recorded
/// in [`MutationOutcome::dropped`] and every other chunk is still written.
/// Writes go straight to chunk storage with no relighting or per-block
/// network traffic.
pub fn apply<W: WorldAccess>(world: &mut W, edits: &PendingEditSet) -> MutationOutcome {
    let mut outcome = MutationOutcome::default();

    for (key, group) in edits.group_by_chunk() {
        let chunk = match world.chunk_or_load(key) {
            Ok(chunk) => chunk,
            Err(err) => {
                outcome.dropped.push(err);
                continue;
            }
        };
        for (local, state) in &group {
            chunk.set_block_state(*local, *state);
        }
        outcome.applied += group.len();
        outcome.touched.insert(key);
    }

    outcome
}
