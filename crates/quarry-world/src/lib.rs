//! In-memory collaborators for `quarry-edit`.
//!
//! A small chunk store, material registry, lighting queue, and recording
//! broadcast channel. Enough to drive an edit session end to end without a
//! real server behind it.

pub mod channel;
pub mod chunk;
pub mod lighting;
pub mod registry;
pub mod world;

pub use channel::RecordingChannel;
pub use chunk::{BlockSnapshot, MemoryChunk, SAVE_DIRTY, SECTION_HEIGHT, SECTION_VOLUME};
pub use lighting::{LightSnapshot, QueuedLighting};
pub use registry::{MaterialDef, MaterialRegistry, RegistryError};
pub use world::{LoadPolicy, MemoryWorld};
