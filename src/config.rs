use std::path::PathBuf;

use clap::Parser;

/// Process-level CLI surface. Game tunables live in the loaded
/// [`crate::settings::Settings`] document, not here.
#[derive(Parser, Debug, Clone)]
#[command(name = "snake_arena")]
#[command(about = "Server-authoritative multiplayer snake arena")]
pub struct ServerArgs {
    /// TCP port to listen on.
    #[arg(short, long, default_value_t = 11000)]
    pub port: u16,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the settings document.
    #[arg(long, default_value = "settings.toml")]
    pub settings: PathBuf,
}
