use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::protocol::types::SnakeId;

pub type SessionId = u64;

/// A connected client. Holds the outbound line channel the broadcast
/// phase writes into and the snake id assigned at handshake.
pub struct Session {
    pub id: SessionId,
    pub addr: SocketAddr,
    pub name: String,
    pub snake_id: SnakeId,
    pub connected_at: Instant,
    tx: mpsc::UnboundedSender<String>,
}

impl Session {
    pub fn new(id: SessionId, addr: SocketAddr, name: String, snake_id: SnakeId, tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            addr,
            name,
            snake_id,
            connected_at: Instant::now(),
            tx,
        }
    }

    /// Queue one pre-formatted line (newline included) for this
    /// client's writer task. Returns false if the writer has gone away.
    pub fn send_line(&self, line: String) -> bool {
        self.tx.send(line).is_ok()
    }
}

/// Registry of connected clients. Mutated only by the connection
/// manager; the simulation enumerates it read-only during the
/// broadcast phase.
pub struct SessionManager {
    sessions: DashMap<SessionId, Session>,
    next_id: AtomicU64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register(
        &self,
        addr: SocketAddr,
        name: String,
        snake_id: SnakeId,
        tx: mpsc::UnboundedSender<String>,
    ) -> SessionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sessions.insert(id, Session::new(id, addr, name, snake_id, tx));
        id
    }

    pub fn get(&self, id: SessionId) -> Option<dashmap::mapref::one::Ref<SessionId, Session>> {
        self.sessions.get(&id)
    }

    pub fn remove(&self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id).map(|(_, session)| session)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|r| *r.key()).collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Fan a fully-encoded per-tick frame out to every connected client.
    pub fn broadcast_frame(&self, frame: &str) {
        if frame.is_empty() {
            return;
        }
        for session in self.sessions.iter() {
            let _ = session.send_line(frame.to_string());
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedSessionManager = Arc<SessionManager>;

pub fn create_session_manager() -> SharedSessionManager {
    Arc::new(SessionManager::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:11000".parse().unwrap()
    }

    #[tokio::test]
    async fn register_and_lookup() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = manager.register(addr(), "alice".into(), 1, tx);
        let session = manager.get(id).unwrap();
        assert_eq!(session.name, "alice");
        assert_eq!(session.snake_id, 1);
    }

    #[tokio::test]
    async fn remove_drops_the_session() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = manager.register(addr(), "bob".into(), 2, tx);
        assert!(manager.remove(id).is_some());
        assert!(manager.get(id).is_none());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_session() {
        let manager = SessionManager::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        manager.register(addr(), "a".into(), 1, tx1);
        manager.register(addr(), "b".into(), 2, tx2);

        manager.broadcast_frame("{\"snake\":1}\n");

        assert_eq!(rx1.recv().await.unwrap(), "{\"snake\":1}\n");
        assert_eq!(rx2.recv().await.unwrap(), "{\"snake\":1}\n");
    }
}
