//! The world mutation thread's capabilities, bundled for an edit session.

use std::marker::PhantomData;

use crate::world::{BroadcastChannel, LightingEngine, WorldAccess};

/// Borrowed handles to the world, its lighting engine, and the broadcast
/// channel.
///
/// Chunks may only be mutated from the world's mutation thread, so this type
/// is neither `Send` nor `Sync`: construct it on that thread and keep every
/// session built from it there.
pub struct WorldContext<'w, W: WorldAccess> {
    world: &'w mut W,
    lighting: &'w mut dyn LightingEngine,
    channel: &'w mut dyn BroadcastChannel,
    _mutation_thread: PhantomData<*const ()>,
}

impl<'w, W: WorldAccess> WorldContext<'w, W> {
    /// Bundles the mutation thread's world, lighting engine, and channel.
    pub fn new(
        world: &'w mut W,
        lighting: &'w mut dyn LightingEngine,
        channel: &'w mut dyn BroadcastChannel,
    ) -> Self {
        Self {
            world,
            lighting,
            channel,
            _mutation_thread: PhantomData,
        }
    }

    /// Read access to the world.
    pub fn world(&self) -> &W {
        &*self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    /// Read access to the lighting engine.
    pub fn lighting(&self) -> &dyn LightingEngine {
        &*self.lighting
    }

    /// Splits the context into its parts for a single pipeline pass.
    pub(crate) fn parts(
        &mut self,
    ) -> (&mut W, &mut dyn LightingEngine, &mut dyn BroadcastChannel) {
        (&mut *self.world, &mut *self.lighting, &mut *self.channel)
    }
}
