use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use snake_arena::config::ServerArgs;
use snake_arena::server::run_server;
use snake_arena::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let settings = Settings::load(&args.settings)?;

    info!("===========================================");
    info!("    Snake Arena Server v0.1.0");
    info!("===========================================");
    info!("");
    info!("Configuration:");
    info!("  Port: {}", args.port);
    info!("  Settings file: {:?}", args.settings);
    info!("  Universe size: {}", settings.universe_size);
    info!("  MS per frame: {}", settings.ms_per_frame);
    info!("  Game mode: {:?}", settings.game_mode);
    info!("  Walls: {}", settings.walls.len());
    info!("");

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    run_server(addr, settings).await
}
