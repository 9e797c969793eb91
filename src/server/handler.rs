use std::net::SocketAddr;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::game::world::SharedWorld;
use crate::protocol::outgoing::encode_line;
use crate::protocol::incoming::parse_direction_line;
use crate::protocol::types::SnakeId;
use crate::server::session::{SessionId, SharedSessionManager};

/// Ties the world and the session registry together for the connection
/// manager. Mirrors the shape of a packet handler even though, with a
/// full-state broadcast every tick, there is no per-client delta
/// bookkeeping left to do.
pub struct GameHandler {
    world: SharedWorld,
    sessions: SharedSessionManager,
}

impl GameHandler {
    pub fn new(world: SharedWorld, sessions: SharedSessionManager) -> Self {
        Self { world, sessions }
    }

    /// Handshake: create the client's snake and register its session.
    /// Returns the session id, the new snake id,
    /// the universe size, and every wall pre-encoded as JSON lines.
    pub fn on_connect(
        &self,
        addr: SocketAddr,
        name: String,
        tx: mpsc::UnboundedSender<String>,
    ) -> (SessionId, SnakeId, f32, String) {
        let (snake_id, universe_size, walls) = {
            let mut world = self.world.write();
            let snake_id = world.create_snake(name.clone());
            let universe_size = world.settings.universe_size;
            let walls: String = world
                .walls()
                .iter()
                .filter_map(|w| encode_line(&w.to_frame()))
                .collect();
            (snake_id, universe_size, walls)
        };

        let session_id = self.sessions.register(addr, name, snake_id, tx);
        info!("client connected: addr={} snake={}", addr, snake_id);
        (session_id, snake_id, universe_size, walls)
    }

    /// Apply one line of client input.
    pub fn on_direction(&self, snake_id: SnakeId, line: &str) {
        if let Some(direction) = parse_direction_line(line) {
            self.world.write().request_turn(snake_id, direction);
        }
    }

    /// A broken socket marks the client's snake `dc`, to be emitted once
    /// more and garbage collected.
    pub fn on_disconnect(&self, session_id: SessionId) {
        if let Some(session) = self.sessions.remove(session_id) {
            self.world.write().mark_disconnected(session.snake_id);
            debug!("client disconnected: snake={}", session.snake_id);
        }
    }

    /// One fixed-interval tick: advance the simulation,
    /// encode the frame, broadcast it, then garbage collect.
    pub fn tick(&self) {
        let frame = {
            let mut world = self.world.write();
            world.tick();
            let frame = world.encode_frame();
            world.garbage_collect();
            frame
        };
        self.sessions.broadcast_frame(&frame);
    }
}
