pub mod framing;
pub mod incoming;
pub mod outgoing;
pub mod types;

pub use framing::LineReader;
pub use incoming::parse_direction_line;
pub use outgoing::encode_line;
pub use types::SnakeId;
