//! End-to-end behaviour of an edit session against the in-memory world.

use std::collections::BTreeSet;

use quarry_edit::{
    BlockRegistry, BlockState, ChunkKey, EditSession, EditSettings, MaterialId, Observer,
    ObserverId, VoxelCoord, WorldAccess, WorldContext,
};
use quarry_world::{
    BlockSnapshot, LightSnapshot, LoadPolicy, MaterialDef, MaterialRegistry, MemoryChunk,
    MemoryWorld, QueuedLighting, RecordingChannel, SAVE_DIRTY,
};

struct Server {
    world: MemoryWorld,
    lighting: QueuedLighting,
    channel: RecordingChannel,
    registry: MaterialRegistry,
    stone: MaterialId,
    glass: MaterialId,
}

impl Server {
    fn new() -> Self {
        let mut registry = MaterialRegistry::new();
        let stone = registry.register(MaterialDef::named("stone")).unwrap();
        let glass = registry.register(MaterialDef::named("glass")).unwrap();
        Self {
            world: MemoryWorld::default(),
            lighting: QueuedLighting::new(),
            channel: RecordingChannel::new(),
            registry,
            stone,
            glass,
        }
    }

    fn session(&mut self) -> EditSession<'_, MemoryWorld, MaterialRegistry> {
        let ctx = WorldContext::new(&mut self.world, &mut self.lighting, &mut self.channel);
        EditSession::new(ctx, &self.registry)
    }

    fn committed(&self, x: i32, y: i32, z: i32) -> MaterialId {
        let state = self.world.committed_block(VoxelCoord::new(x, y, z));
        self.registry.state_to_material(state).unwrap()
    }
}

const AIR: MaterialId = MaterialId(0);

#[test]
fn test_read_your_writes_before_execute() {
    let mut server = Server::new();
    let (stone, glass) = (server.stone, server.glass);
    let mut session = server.session();

    let coords = [(0, 0, 0), (-1, 64, -1), (100, -20, -300), (15, 15, 16)];
    for (i, &(x, y, z)) in coords.iter().enumerate() {
        let material = if i % 2 == 0 { stone } else { glass };
        session.set_block(x, y, z, material).unwrap();
        assert_eq!(session.get_block(x, y, z).unwrap(), material);
    }
    drop(session);

    // Nothing reached the world yet.
    for &(x, y, z) in &coords {
        assert_eq!(server.committed(x, y, z), AIR);
    }
    assert_eq!(server.world.loaded_count(), 0);
}

#[test]
fn test_unedited_coords_read_committed_world() {
    let mut server = Server::new();
    let stone_state = server.registry.material_to_state(server.stone).unwrap();
    server.world.place(VoxelCoord::new(3, 10, 3), stone_state).unwrap();
    let (stone, glass) = (server.stone, server.glass);

    let mut session = server.session();
    session.set_block(4, 10, 3, glass).unwrap();

    assert_eq!(session.get_block(3, 10, 3).unwrap(), stone);
    assert_eq!(session.get_block(5, 10, 3).unwrap(), AIR);
}

#[test]
fn test_execute_commits_every_available_edit() {
    let mut server = Server::new();
    let stone = server.stone;
    let mut session = server.session();
    for x in -20..20 {
        for z in -20..20 {
            session.set_block(x, 70, z, stone).unwrap();
        }
    }
    let report = session.execute(false);
    drop(session);

    assert_eq!(report.applied, 1600);
    assert!(report.is_complete());
    for x in -20..20 {
        for z in -20..20 {
            assert_eq!(server.committed(x, 70, z), stone);
        }
    }
    assert_eq!(server.committed(0, 71, 0), AIR);
}

#[test]
fn test_touched_set_is_pending_chunks_minus_failures() {
    let mut server = Server::new();
    server.world.mark_unavailable(ChunkKey::new(1, 0));
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(0, 0, 0, stone).unwrap();
    session.set_block(17, 0, 0, stone).unwrap();
    session.set_block(-1, 0, -17, stone).unwrap();
    session.set_block(-16, 0, -32, stone).unwrap();

    let report = session.execute(false);
    drop(session);

    assert_eq!(
        report.touched,
        BTreeSet::from([ChunkKey::new(0, 0), ChunkKey::new(-1, -2)])
    );
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].key, ChunkKey::new(1, 0));
    assert_eq!(server.committed(17, 0, 0), AIR);
    assert_eq!(server.committed(-1, 0, -17), stone);
    assert!(!server.world.is_loaded(ChunkKey::new(1, 0)));
}

#[test]
fn test_loaded_only_world_drops_unloaded_chunks_silently() {
    let mut server = Server::new();
    server.world = MemoryWorld::default().with_policy(LoadPolicy::LoadedOnly);
    server.world.load_chunk(MemoryChunk::new(ChunkKey::new(0, 0), BlockState(0)));
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(1, 1, 1, stone).unwrap();
    session.set_block(33, 1, 1, stone).unwrap();
    let report = session.execute(true);
    drop(session);

    assert_eq!(report.touched, BTreeSet::from([ChunkKey::new(0, 0)]));
    // Lighting still receives the dropped coordinate.
    assert_eq!(server.lighting.marked_total(), 2);
    assert_eq!(server.committed(1, 1, 1), stone);
}

#[test]
fn test_only_touched_chunks_are_save_dirty() {
    let mut server = Server::new();
    for x in 0..3 {
        server.world.load_chunk(MemoryChunk::new(ChunkKey::new(x, 0), BlockState(0)));
    }
    server.world.mark_unavailable(ChunkKey::new(2, 0));
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(3, 10, 3, stone).unwrap();
    session.set_block(40, 10, 3, stone).unwrap();
    let report = session.execute(false);
    drop(session);

    assert_eq!(report.touched, BTreeSet::from([ChunkKey::new(0, 0)]));
    let dirty = |x| server.world.chunk(ChunkKey::new(x, 0)).unwrap().is_dirty(SAVE_DIRTY);
    assert!(dirty(0));
    assert!(!dirty(1));
    assert!(!dirty(2));
}

#[test]
fn test_broadcast_uses_square_view_box() {
    let mut server = Server::new();
    server.channel.connect(Observer::new(1, 16, 5));
    server.channel.connect(Observer::new(2, 17, 5));
    server.channel.connect(Observer::new(3, 16, -6));
    let stone = server.stone;

    let mut session = server.session();
    // Chunk (5, 5).
    session.set_block(80, 64, 80, stone).unwrap();
    session.set_block(95, 64, 95, stone).unwrap();
    let report = session.execute(true);
    drop(session);

    assert_eq!(report.messages_sent, 2);
    assert_eq!(server.channel.received(ObserverId(1)).unwrap().len(), 1);
    assert!(server.channel.received(ObserverId(2)).unwrap().is_empty());
    assert_eq!(server.channel.received(ObserverId(3)).unwrap().len(), 1);
}

#[test]
fn test_broadcast_carries_committed_blocks_and_light() {
    let mut server = Server::new();
    server.channel.connect(Observer::new(7, 0, 0));
    let stone_state = server.registry.material_to_state(server.stone).unwrap();
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(2, 3, 4, stone).unwrap();
    session.execute(true);
    drop(session);

    let updates = server.channel.received(ObserverId(7)).unwrap();
    assert_eq!(updates.len(), 1);
    let update = &updates[0];
    assert_eq!(update.key, ChunkKey::new(0, 0));

    let blocks = BlockSnapshot::from_bytes(&update.decode_blocks().unwrap()).unwrap();
    assert_eq!(blocks.block_state(VoxelCoord::new(2, 3, 4).local()), stone_state);

    let light = LightSnapshot::from_bytes(&update.decode_light().unwrap()).unwrap();
    assert_eq!(light.key, ChunkKey::new(0, 0));
    assert_eq!(light.pending, 1);
}

#[test]
fn test_light_propagated_between_executes_shows_in_next_broadcast() {
    let mut server = Server::new();
    server.channel.connect(Observer::new(1, 0, 0));
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(2, 3, 4, stone).unwrap();
    session.execute(true);
    drop(session);

    assert_eq!(server.lighting.propagate(usize::MAX), 1);
    assert_eq!(server.lighting.queued_len(), 0);

    let mut session = server.session();
    session.set_block(5, 3, 4, stone).unwrap();
    session.execute(true);
    drop(session);

    let light: Vec<LightSnapshot> = server
        .channel
        .received(ObserverId(1))
        .unwrap()
        .iter()
        .map(|update| LightSnapshot::from_bytes(&update.decode_light().unwrap()).unwrap())
        .collect();
    assert_eq!(light.len(), 2);
    assert_eq!((light[0].revision, light[0].pending), (0, 1));
    assert_eq!((light[1].revision, light[1].pending), (1, 1));
}

#[test]
fn test_empty_session_touches_and_sends_nothing() {
    let mut server = Server::new();
    server.channel.connect(Observer::new(1, 0, 0));

    let mut session = server.session();
    let report = session.execute(true);
    drop(session);

    assert!(report.touched.is_empty());
    assert_eq!(report.messages_sent, 0);
    assert_eq!(server.channel.sent_count(), 0);
    assert_eq!(server.world.loaded_count(), 0);
    assert_eq!(server.lighting.marked_total(), 0);
}

#[test]
fn test_double_execute_same_state_double_broadcast() {
    let mut server = Server::new();
    server.channel.connect(Observer::new(1, 0, 0));
    let stone = server.stone;

    let mut session = server.session();
    session.set_block(1, 1, 1, stone).unwrap();
    session.set_block(40, 1, 1, stone).unwrap();
    let first = session.execute(false);
    let second = session.execute(false);
    drop(session);

    assert_eq!(first.touched, second.touched);
    assert_eq!(first.messages_sent, 2);
    assert_eq!(second.messages_sent, 2);
    assert_eq!(server.channel.sent_count(), 4);
    assert_eq!(server.committed(1, 1, 1), stone);
    assert_eq!(server.committed(40, 1, 1), stone);
}

#[test]
fn test_overwrite_commits_only_last_value() {
    let mut server = Server::new();
    let (stone, glass) = (server.stone, server.glass);

    let mut session = server.session();
    session.set_block(9, 9, 9, stone).unwrap();
    session.set_block(9, 9, 9, glass).unwrap();
    assert_eq!(session.len(), 1);
    let report = session.execute(true);
    drop(session);

    assert_eq!(report.applied, 1);
    assert_eq!(report.relit, 1);
    assert_eq!(server.committed(9, 9, 9), glass);
}

#[test]
fn test_unknown_material_is_rejected_by_registry() {
    let mut server = Server::new();
    let mut session = server.session();
    let err = session.set_block(0, 0, 0, MaterialId(500)).unwrap_err();
    assert_eq!(err, quarry_world::RegistryError::UnknownMaterial(MaterialId(500)));
    assert!(session.is_empty());
}

#[test]
fn test_cleared_session_can_build_a_new_batch() {
    let mut server = Server::new();
    let (stone, glass) = (server.stone, server.glass);
    let ctx = WorldContext::new(&mut server.world, &mut server.lighting, &mut server.channel);
    let settings = EditSettings {
        update_lighting: false,
        ..EditSettings::default()
    };
    let mut session = EditSession::with_settings(ctx, &server.registry, settings);

    session.set_block(0, 0, 0, stone).unwrap();
    session.execute_with_settings();
    session.clear();
    session.set_block(1, 0, 0, glass).unwrap();
    let report = session.execute_with_settings();
    drop(session);

    assert_eq!(report.applied, 1);
    assert_eq!(server.committed(0, 0, 0), stone);
    assert_eq!(server.committed(1, 0, 0), glass);
    assert_eq!(server.lighting.marked_total(), 0);
}
