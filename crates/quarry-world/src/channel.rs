//! Broadcast channel that records encoded chunk updates per observer.

use quarry_edit::{BroadcastChannel, ChunkUpdate, Observer, ObserverId, UpdateDecodeError};

/// Keeps a list of connected observers and an outbox of wire-encoded updates.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    observers: Vec<Observer>,
    outbox: Vec<(ObserverId, Vec<u8>)>,
}

impl RecordingChannel {
    /// Creates a channel with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects an observer, replacing any observer with the same id.
    pub fn connect(&mut self, observer: Observer) {
        self.disconnect(observer.id);
        self.observers.push(observer);
    }

    /// Disconnects an observer.
    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.retain(|o| o.id != id);
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.outbox.len()
    }

    /// Raw `(observer, bytes)` pairs in send order.
    pub fn outbox(&self) -> &[(ObserverId, Vec<u8>)] {
        &self.outbox
    }

    /// Decodes every update delivered to `id`, in send order.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateDecodeError`] if a recorded message is malformed.
    pub fn received(&self, id: ObserverId) -> Result<Vec<ChunkUpdate>, UpdateDecodeError> {
        self.outbox
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, bytes)| ChunkUpdate::from_bytes(bytes))
            .collect()
    }
}

impl BroadcastChannel for RecordingChannel {
    fn observers(&self) -> Vec<Observer> {
        self.observers.clone()
    }

    fn send(&mut self, observer: ObserverId, update: &ChunkUpdate) {
        match update.to_bytes() {
            Ok(bytes) => self.outbox.push((observer, bytes)),
            Err(err) => {
                tracing::warn!(?observer, key = %update.key, "dropping chunk update: {err}")
            }
        }
    }
}
