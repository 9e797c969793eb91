/// Identifier for a snake, assigned by a monotonic per-world counter.
pub type SnakeId = u32;
