use serde::Serialize;

/// Serialize one wire record to a single newline-terminated JSON line.
/// Used both for the per-tick frame and for the one-shot wall records
/// sent during handshake.
pub fn encode_line<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok().map(|mut line| {
        line.push('\n');
        line
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::wall::Wall;
    use crate::game::geometry::Vector2D;

    #[test]
    fn encodes_with_trailing_newline() {
        let wall = Wall::new(1, Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 0.0));
        let line = encode_line(&wall.to_frame()).unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.contains("\"wall\":1"));
    }
}
