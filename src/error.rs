use std::net::SocketAddr;
use std::path::PathBuf;

/// Startup failures that abort the process before it accepts a single
/// connection. Every other fault (bad handshake, malformed direction
/// command, a dropped socket) is handled locally where it occurs and
/// never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read settings document at {path:?}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
