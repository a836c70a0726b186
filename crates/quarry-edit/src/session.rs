//! The edit session: buffer writes, read through them, commit in one pass.

use std::collections::BTreeSet;

use crate::broadcast;
use crate::context::WorldContext;
use crate::coords::{ChunkKey, VoxelCoord};
use crate::error::{ChunkLoadError, EditError};
use crate::lighting;
use crate::mutator;
use crate::pending::PendingEditSet;
use crate::world::{BlockRegistry, BlockState, MaterialId, WorldAccess};

/// Default server view distance, in chunks.
pub const DEFAULT_VIEW_DISTANCE: u32 = 10;

// ---------------------------------------------------------------------------
// EditSettings
// ---------------------------------------------------------------------------

/// Tunables for a session's commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSettings {
    /// Relight edited positions on [`EditSession::execute_with_settings`].
    pub update_lighting: bool,
    /// Server view distance in chunks; observers see `view_distance + 1`
    /// chunks in each direction.
    pub view_distance: u32,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            update_lighting: true,
            view_distance: DEFAULT_VIEW_DISTANCE,
        }
    }
}

// ---------------------------------------------------------------------------
// ExecuteReport
// ---------------------------------------------------------------------------

/// Summary of one [`EditSession::execute`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    /// Chunks that were written to and broadcast.
    pub touched: BTreeSet<ChunkKey>,
    /// Chunks whose edits were dropped because they could not be acquired.
    pub dropped: Vec<ChunkLoadError>,
    /// Block writes performed.
    pub applied: usize,
    /// Coordinates submitted for relighting.
    pub relit: usize,
    /// Update messages sent to observers.
    pub messages_sent: usize,
}

impl ExecuteReport {
    /// Returns `true` if no chunk was dropped.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Strict policy: turns any dropped chunk into an error.
    ///
    /// The world is left as `execute` left it; the surviving chunks are
    /// already written and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ChunksDropped`] listing every dropped chunk.
    pub fn into_result(self) -> Result<Self, EditError> {
        if self.dropped.is_empty() {
            Ok(self)
        } else {
            Err(EditError::ChunksDropped(self.dropped))
        }
    }
}

// ---------------------------------------------------------------------------
// EditSession
// ---------------------------------------------------------------------------

/// Buffers block writes against one world and commits them in a single pass.
///
/// Writes are only recorded until [`execute`](Self::execute) runs. The
/// buffer is not cleared by `execute`: running it again re-applies and
/// re-broadcasts the same edits. Use [`clear`](Self::clear) to start a new
/// batch on the same session.
pub struct EditSession<'w, W: WorldAccess, R: BlockRegistry> {
    context: WorldContext<'w, W>,
    registry: &'w R,
    pending: PendingEditSet,
    settings: EditSettings,
}

impl<'w, W: WorldAccess, R: BlockRegistry> EditSession<'w, W, R> {
    /// Creates a session with default settings.
    pub fn new(context: WorldContext<'w, W>, registry: &'w R) -> Self {
        Self::with_settings(context, registry, EditSettings::default())
    }

    /// Creates a session with explicit settings.
    pub fn with_settings(
        context: WorldContext<'w, W>,
        registry: &'w R,
        settings: EditSettings,
    ) -> Self {
        Self {
            context,
            registry,
            pending: PendingEditSet::new(),
            settings,
        }
    }

    /// Queues `material` at `(x, y, z)`, replacing any earlier pending write.
    ///
    /// The world is not touched.
    ///
    /// # Errors
    ///
    /// Returns the registry's own error if `material` cannot be converted;
    /// the pending set is left unchanged.
    pub fn set_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        material: MaterialId,
    ) -> Result<(), R::Error> {
        let state = self.registry.material_to_state(material)?;
        self.pending.insert(VoxelCoord::new(x, y, z), state);
        Ok(())
    }

    /// Queues an already converted block state at `coord`.
    pub fn set_block_state(&mut self, coord: VoxelCoord, state: BlockState) {
        self.pending.insert(coord, state);
    }

    /// Returns the material at `(x, y, z)`, preferring a pending write over
    /// the committed world.
    ///
    /// # Errors
    ///
    /// Returns the registry's own error if the state cannot be converted back.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<MaterialId, R::Error> {
        self.registry.state_to_material(self.block_state(VoxelCoord::new(x, y, z)))
    }

    /// Returns the block state at `coord`, preferring a pending write.
    pub fn block_state(&self, coord: VoxelCoord) -> BlockState {
        self.pending
            .get(coord)
            .unwrap_or_else(|| self.context.world().committed_block(coord))
    }

    /// Commits every pending write.
    ///
    /// Edits are written chunk by chunk, then (if `update_lighting`) every
    /// edited coordinate is handed to the lighting engine, then each touched
    /// chunk is sent to the observers that can see it. Chunks that cannot be
    /// acquired are skipped and listed in the report; nothing is rolled back.
    pub fn execute(&mut self, update_lighting: bool) -> ExecuteReport {
        let _span = tracing::debug_span!(
            "execute",
            edits = self.pending.len(),
            update_lighting
        )
        .entered();

        let view_distance = self.settings.view_distance;
        let (world, lighting, channel) = self.context.parts();

        let outcome = mutator::apply(world, &self.pending);
        let relit = if update_lighting {
            lighting::recalculate(lighting, &self.pending)
        } else {
            0
        };
        let messages_sent =
            broadcast::publish(&*world, &*lighting, channel, &outcome.touched, view_distance);

        tracing::debug!(
            applied = outcome.applied,
            touched = outcome.touched.len(),
            dropped = outcome.dropped.len(),
            relit,
            messages_sent,
            "edit session committed"
        );

        ExecuteReport {
            touched: outcome.touched,
            dropped: outcome.dropped,
            applied: outcome.applied,
            relit,
            messages_sent,
        }
    }

    /// Commits using the session's configured lighting setting.
    pub fn execute_with_settings(&mut self) -> ExecuteReport {
        self.execute(self.settings.update_lighting)
    }

    /// The pending writes.
    pub fn pending(&self) -> &PendingEditSet {
        &self.pending
    }

    /// Number of distinct pending coordinates.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending write so the session can build a new batch.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Ends the session without committing, returning the world context.
    pub fn discard(self) -> WorldContext<'w, W> {
        self.context
    }

    /// The session's settings.
    pub fn settings(&self) -> EditSettings {
        self.settings
    }

    /// Read access to the underlying world.
    pub fn world(&self) -> &W {
        self.context.world()
    }
}
