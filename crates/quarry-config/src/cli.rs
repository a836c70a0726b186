//! Command-line overrides for [`Config`].

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Arguments shared by every Quarry binary.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Server view distance in chunks.
    #[arg(long)]
    pub view_distance: Option<u32>,

    /// Skip relighting edited blocks.
    #[arg(long)]
    pub no_lighting: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(vd) = args.view_distance {
            self.broadcast.view_distance = vd;
        }
        if args.no_lighting {
            self.edit.update_lighting = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
