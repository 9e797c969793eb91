use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::game::world::{create_shared_world, SharedWorld};
use crate::protocol::framing::LineReader;
use crate::server::handler::GameHandler;
use crate::server::session::{create_session_manager, SharedSessionManager};
use crate::settings::Settings;

/// Bind `addr` and run the server until terminated. The tick driver and
/// the accept loop run as independent tasks, coordinated only through
/// the world lock and the session registry.
pub async fn run_server(addr: SocketAddr, settings: Settings) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("listening on {}", addr);

    let ms_per_frame = settings.ms_per_frame;
    let world: SharedWorld = create_shared_world(settings);
    let sessions: SharedSessionManager = create_session_manager();
    let handler = Arc::new(GameHandler::new(world, sessions));

    tokio::spawn(game_loop(handler.clone(), ms_per_frame));

    loop {
        let (socket, addr) = listener.accept().await?;
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(socket, addr, &handler).await {
                warn!("connection {} ended with error: {}", addr, err);
            }
        });
    }
}

async fn game_loop(handler: Arc<GameHandler>, ms_per_frame: u64) {
    let mut interval = tokio::time::interval(Duration::from_millis(ms_per_frame.max(1)));
    loop {
        interval.tick().await;
        handler.tick();
    }
}

/// Per-client connection lifecycle: handshake, then a read loop applying
/// direction commands until the socket breaks.
async fn handle_connection(socket: TcpStream, addr: SocketAddr, handler: &GameHandler) -> anyhow::Result<()> {
    socket.set_nodelay(true).ok();
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = LineReader::new(read_half);

    let name = match tokio::time::timeout(Duration::from_secs(3), reader.next_line()).await {
        Ok(Ok(Some(line))) if !line.trim().is_empty() => line.trim().to_string(),
        Ok(Ok(_)) => {
            warn!("{} disconnected before sending a name", addr);
            return Ok(());
        }
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => {
            warn!("{} timed out during handshake", addr);
            return Ok(());
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let (session_id, snake_id, universe_size, walls) = handler.on_connect(addr, name, tx);

    write_half
        .write_all(format!("{}\n{}\n", snake_id, universe_size as i64).as_bytes())
        .await?;
    write_half.write_all(walls.as_bytes()).await?;

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    loop {
        match reader.next_line().await {
            Ok(Some(line)) => handler.on_direction(snake_id, &line),
            Ok(None) => break,
            Err(err) => {
                debug!("read error from {}: {}", addr, err);
                break;
            }
        }
    }

    writer_task.abort();
    handler.on_disconnect(session_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::create_shared_world;
    use crate::server::session::create_session_manager;

    #[tokio::test]
    async fn handshake_creates_a_snake_and_session() {
        let world = create_shared_world(Settings::default());
        let sessions = create_session_manager();
        let handler = GameHandler::new(world.clone(), sessions.clone());

        let (tx, _rx) = mpsc::unbounded_channel();
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        let (session_id, snake_id, universe_size, _walls) =
            handler.on_connect(addr, "alice".into(), tx);

        assert_eq!(universe_size, Settings::default().universe_size);
        assert!(sessions.get(session_id).is_some());
        assert_eq!(sessions.get(session_id).unwrap().snake_id, snake_id);
    }
}
