use serde::Deserialize;

use crate::game::geometry::Direction;

/// The four directions a client may request, plus `none` meaning "keep
/// going": `{"moving":"up"|"down"|"left"|"right"|"none"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MoveCommand {
    Up,
    Down,
    Left,
    Right,
    None,
}

#[derive(Debug, Deserialize)]
struct DirectionMessage {
    moving: MoveCommand,
}

/// Parse one line of client input into a direction request. Returns
/// `None` both for `"none"` and for malformed/unknown input - the
/// caller drops the message silently either way, without closing the
/// connection.
pub fn parse_direction_line(line: &str) -> Option<Direction> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let message: DirectionMessage = serde_json::from_str(trimmed).ok()?;
    match message.moving {
        MoveCommand::Up => Some(Direction::Up),
        MoveCommand::Down => Some(Direction::Down),
        MoveCommand::Left => Some(Direction::Left),
        MoveCommand::Right => Some(Direction::Right),
        MoveCommand::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_direction() {
        assert_eq!(parse_direction_line(r#"{"moving":"up"}"#), Some(Direction::Up));
        assert_eq!(parse_direction_line(r#"{"moving":"down"}"#), Some(Direction::Down));
        assert_eq!(parse_direction_line(r#"{"moving":"left"}"#), Some(Direction::Left));
        assert_eq!(parse_direction_line(r#"{"moving":"right"}"#), Some(Direction::Right));
    }

    #[test]
    fn none_is_a_no_op() {
        assert_eq!(parse_direction_line(r#"{"moving":"none"}"#), None);
    }

    #[test]
    fn malformed_json_is_ignored() {
        assert_eq!(parse_direction_line("not json"), None);
        assert_eq!(parse_direction_line(r#"{"moving":"sideways"}"#), None);
        assert_eq!(parse_direction_line(""), None);
    }
}
