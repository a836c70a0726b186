//! Configuration for Quarry edit servers.
//!
//! Settings persist to disk as `config.ron`, accept CLI overrides via clap,
//! and tolerate missing or unknown fields so older and newer files load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{BroadcastConfig, Config, DebugConfig, EditConfig};
pub use error::ConfigError;
