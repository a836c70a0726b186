//! Deferred relighting of edited positions.

use crate::pending::PendingEditSet;
use crate::world::LightingEngine;

/// Submits every edited coordinate to the lighting engine exactly once.
///
/// Coordinates whose chunk failed to load are submitted too; the engine
/// treats positions in missing chunks as no-ops. Returns the number of
/// coordinates submitted.
pub fn recalculate(lighting: &mut dyn LightingEngine, edits: &PendingEditSet) -> usize {
    for coord in edits.coords() {
        lighting.mark_dirty(coord);
    }
    edits.len()
}
