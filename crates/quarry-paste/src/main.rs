//! Fills a box of blocks through one edit session and reports the commit.
//!
//! Runs against the in-memory world, so it doubles as a smoke test of the
//! whole pipeline: `quarry-paste --from 0,60,0 --to 31,64,31 --observer 0,0`.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use quarry_config::{CliArgs, Config};
use quarry_edit::{ChunkKey, EditSession, ExecuteReport, Observer, VoxelCoord, WorldContext};
use quarry_world::{
    LoadPolicy, MaterialDef, MaterialRegistry, MemoryWorld, QueuedLighting, RecordingChannel,
    RegistryError,
};

/// Materials every paste run knows about.
const MATERIALS: [&str; 4] = ["stone", "dirt", "glass", "oak_planks"];

/// Command-line arguments for `quarry-paste`.
#[derive(Parser, Debug)]
#[command(name = "quarry-paste", about = "Batch-fill a region through an edit session")]
struct PasteArgs {
    #[command(flatten)]
    common: CliArgs,

    /// First corner of the region, as `x,y,z`.
    #[arg(long, value_parser = parse_coord, default_value = "0,64,0")]
    from: VoxelCoord,

    /// Opposite corner of the region, as `x,y,z` (inclusive).
    #[arg(long, value_parser = parse_coord, default_value = "15,64,15")]
    to: VoxelCoord,

    /// Material to fill with.
    #[arg(long, default_value = "stone")]
    material: String,

    /// Connected observer at chunk `cx,cz`. Repeatable.
    #[arg(long = "observer", value_parser = parse_chunk)]
    observers: Vec<ChunkKey>,

    /// Chunk `cx,cz` that fails to load. Repeatable.
    #[arg(long = "unavailable", value_parser = parse_chunk)]
    unavailable: Vec<ChunkKey>,

    /// Only edit chunks that are already loaded (none are, unless seeded).
    #[arg(long)]
    loaded_only: bool,

    /// Exit with an error if any chunk was dropped.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, thiserror::Error)]
enum PasteError {
    #[error("unknown material {0:?}")]
    UnknownMaterial(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Edit(#[from] quarry_edit::EditError),
}

fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    parts
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated integers, got {s:?}"))
}

fn parse_coord(s: &str) -> Result<VoxelCoord, String> {
    let [x, y, z] = parse_ints::<3>(s)?;
    Ok(VoxelCoord::new(x, y, z))
}

fn parse_chunk(s: &str) -> Result<ChunkKey, String> {
    let [x, z] = parse_ints::<2>(s)?;
    Ok(ChunkKey::new(x, z))
}

fn build_registry() -> Result<MaterialRegistry, RegistryError> {
    let mut registry = MaterialRegistry::new();
    for name in MATERIALS {
        registry.register(MaterialDef::named(name))?;
    }
    Ok(registry)
}

fn run(args: &PasteArgs, config: &Config) -> Result<ExecuteReport, PasteError> {
    let registry = build_registry()?;
    let material = registry
        .lookup_by_name(&args.material)
        .ok_or_else(|| PasteError::UnknownMaterial(args.material.clone()))?;

    let policy = if args.loaded_only {
        LoadPolicy::LoadedOnly
    } else {
        LoadPolicy::Generate
    };
    let mut world = MemoryWorld::default().with_policy(policy);
    for &key in &args.unavailable {
        world.mark_unavailable(key);
    }
    let mut lighting = QueuedLighting::new();
    let mut channel = RecordingChannel::new();
    for (id, key) in (1u64..).zip(&args.observers) {
        channel.connect(Observer::new(id, key.x, key.z));
    }

    let ctx = WorldContext::new(&mut world, &mut lighting, &mut channel);
    let mut session = EditSession::with_settings(ctx, &registry, config.edit_settings());

    let (lo, hi) = (args.from, args.to);
    for x in lo.x.min(hi.x)..=lo.x.max(hi.x) {
        for y in lo.y.min(hi.y)..=lo.y.max(hi.y) {
            for z in lo.z.min(hi.z)..=lo.z.max(hi.z) {
                session.set_block(x, y, z, material)?;
            }
        }
    }
    info!(blocks = session.len(), material = %args.material, "region queued");

    let report = session.execute_with_settings();
    drop(session);

    let propagated = lighting.propagate(usize::MAX);
    debug!(propagated, "light queue drained");

    if args.strict {
        Ok(report.into_result()?)
    } else {
        Ok(report)
    }
}

fn main() {
    let args = PasteArgs::parse();

    let config_dir: PathBuf = args.common.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quarry")
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.common);

    let log_dir = config_dir.join("logs");
    quarry_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(report) => {
            info!(
                applied = report.applied,
                touched = report.touched.len(),
                dropped = report.dropped.len(),
                relit = report.relit,
                messages_sent = report.messages_sent,
                "paste committed"
            );
            for dropped in &report.dropped {
                info!("skipped: {dropped}");
            }
        }
        Err(e) => {
            eprintln!("quarry-paste: {e}");
            std::process::exit(1);
        }
    }
}
