use crate::game::geometry::{Aabb, Vector2D};
use crate::game::snake::Snake;
use crate::game::wall::Wall;
use crate::game::powerup::Powerup;

/// A segment that only exists because a snake wrapped across an edge this
/// tick looks, geometrically, like two points of equal magnitude and
/// opposite sign on the axis that differs. Such segments never
/// participate in collision tests.
pub fn is_wrap_segment(a: Vector2D, b: Vector2D) -> bool {
    if (a.x - b.x).abs() < f32::EPSILON {
        a.y != b.y && (a.y + b.y).abs() < f32::EPSILON
    } else if (a.y - b.y).abs() < f32::EPSILON {
        a.x != b.x && (a.x + b.x).abs() < f32::EPSILON
    } else {
        false
    }
}

/// Minkowski-style point-vs-region test: does a query point with
/// footprint `query_size` intersect a segment whose own body has
/// `width`?
pub fn point_hits_segment(point: Vector2D, a: Vector2D, b: Vector2D, width: f32, query_size: f32) -> bool {
    if is_wrap_segment(a, b) {
        return false;
    }
    let aabb = Aabb::from_points(a, b).inflate(width / 2.0 + query_size / 2.0);
    aabb.contains_point(point)
}

/// Walk a snake's body segment-by-segment looking for a hit. Returns the
/// index of the first segment hit (the segment from `body[idx]` to
/// `body[idx+1]`), so callers can tell a head-cap hit from a body hit.
pub fn point_hits_snake_body(point: Vector2D, snake: &Snake, width: f32, query_size: f32) -> Option<usize> {
    for idx in 0..snake.body.len().saturating_sub(1) {
        let a = snake.body[idx];
        let b = snake.body[idx + 1];
        if point_hits_segment(point, a, b, width, query_size) {
            return Some(idx);
        }
    }
    None
}

/// The segment index that represents a snake's own head cap.
pub fn head_segment_index(snake: &Snake) -> usize {
    snake.body.len().saturating_sub(2)
}

pub fn point_hits_wall(point: Vector2D, wall: &Wall, query_size: f32) -> bool {
    wall.inflated_aabb(query_size).contains_point(point)
}

pub fn point_hits_powerup(point: Vector2D, powerup: &Powerup, powerup_width: f32, query_size: f32) -> bool {
    let half = powerup_width / 2.0 + query_size / 2.0;
    let aabb = Aabb {
        bl: Vector2D::new(powerup.loc.x - half, powerup.loc.y - half),
        tr: Vector2D::new(powerup.loc.x + half, powerup.loc.y + half),
    };
    aabb.contains_point(point)
}

/// Self-collision: the walker must have observed a segment whose
/// direction is cardinal-opposite of the current head direction before
/// any hit is counted. This lets a snake safely clear
/// its own neck immediately after a U-turn while still detecting coils
/// further back in the body.
pub fn self_collision(snake: &Snake, width: f32) -> bool {
    if snake.body.len() < 3 {
        return false;
    }
    let head = snake.head();
    let head_dir = snake.direction.unit();
    let last_segment = snake.body.len() - 2;
    let mut gate_open = false;

    for idx in 0..snake.body.len() - 1 {
        let a = snake.body[idx];
        let b = snake.body[idx + 1];

        // The segment ending at the head is never tested against the
        // head itself - it shares the head as an endpoint by
        // construction, so any test there is a false positive.
        if idx == last_segment {
            if !gate_open && (b - a).normalized().is_cardinal_opposite(head_dir) {
                gate_open = true;
            }
            continue;
        }

        if !gate_open {
            let seg_dir = (b - a).normalized();
            if seg_dir.is_cardinal_opposite(head_dir) {
                gate_open = true;
            }
            continue;
        }

        if point_hits_segment(head, a, b, width, width) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::geometry::Direction;
    use std::collections::VecDeque;

    #[test]
    fn wrap_segment_detected() {
        assert!(is_wrap_segment(Vector2D::new(-995.0, 0.0), Vector2D::new(995.0, 0.0)));
        assert!(!is_wrap_segment(Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 0.0)));
    }

    #[test]
    fn wrap_segment_never_hits() {
        let a = Vector2D::new(-995.0, 0.0);
        let b = Vector2D::new(995.0, 0.0);
        assert!(!point_hits_segment(Vector2D::new(0.0, 0.0), a, b, 10.0, 10.0));
    }

    #[test]
    fn straight_segment_detects_overlap() {
        let a = Vector2D::new(0.0, 0.0);
        let b = Vector2D::new(0.0, 100.0);
        assert!(point_hits_segment(Vector2D::new(3.0, 50.0), a, b, 10.0, 10.0));
        assert!(!point_hits_segment(Vector2D::new(50.0, 50.0), a, b, 10.0, 10.0));
    }

    fn snake_with_body(points: Vec<Vector2D>, direction: Direction) -> Snake {
        let mut s = Snake::spawn(1, "s".into(), Vector2D::ZERO, 0.0);
        s.body = VecDeque::from(points);
        s.direction = direction;
        s
    }

    #[test]
    fn self_collision_requires_gate() {
        // A simple straight snake never collides with itself.
        let s = snake_with_body(
            vec![Vector2D::new(0.0, 0.0), Vector2D::new(0.0, -100.0)],
            Direction::Up,
        );
        assert!(!self_collision(&s, 10.0));
    }

    #[test]
    fn self_collision_detects_tight_coil() {
        // A spiral that curls back across an old segment well behind the
        // immediate neck; the head is moving Right, so the gate opens on
        // the Left-moving segment, and the hit lands on the segment after
        // it (not the head's own immediate segment).
        let s = snake_with_body(
            vec![
                Vector2D::new(0.0, 0.0),
                Vector2D::new(200.0, 0.0),
                Vector2D::new(200.0, 200.0),
                Vector2D::new(0.0, 200.0),
                Vector2D::new(0.0, 5.0),
                Vector2D::new(5.0, 5.0),
            ],
            Direction::Right,
        );
        assert!(self_collision(&s, 10.0));
    }
}
