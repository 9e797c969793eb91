use std::collections::VecDeque;

use crate::game::geometry::{Direction, Vector2D};
use crate::protocol::types::SnakeId;
use crate::settings::{GameMode, Settings};

/// An authoritative live entity.
///
/// `body` holds the tail at the front and the head at the back so growth
/// and tail-advance can push/pop at either end without shifting the rest
/// of the polyline.
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: SnakeId,
    pub name: String,
    real_name: String,
    pub body: VecDeque<Vector2D>,
    pub direction: Direction,
    prev_direction: Direction,
    pub score: u32,
    pub alive: bool,
    pub died: bool,
    pub dc: bool,
    pub join: bool,
    growth: u32,
    respawn: u32,
    pub venomous: bool,
    venom_counter: u32,
}

impl Snake {
    /// Construct a freshly spawned snake: a provisional vertical body of
    /// `starting_size` pointing upward, head above tail.
    pub fn spawn(id: SnakeId, name: String, origin: Vector2D, starting_size: f32) -> Self {
        let direction = Direction::Up;
        let mut body = VecDeque::new();
        body.push_back(origin); // tail
        body.push_back(origin + direction.unit() * starting_size); // head

        Self {
            id,
            real_name: name.clone(),
            name,
            body,
            direction,
            prev_direction: direction,
            score: 0,
            alive: true,
            died: false,
            dc: false,
            join: true,
            growth: 0,
            respawn: 0,
            venomous: false,
            venom_counter: 0,
        }
    }

    pub fn head(&self) -> Vector2D {
        *self.body.back().expect("snake body has at least 2 points")
    }

    pub fn neck(&self) -> Vector2D {
        let len = self.body.len();
        self.body[len.saturating_sub(2)]
    }

    pub fn tail(&self) -> Vector2D {
        *self.body.front().expect("snake body has at least 2 points")
    }

    pub fn respawn_ticks_remaining(&self) -> u32 {
        self.respawn
    }

    pub fn growth_ticks_remaining(&self) -> u32 {
        self.growth
    }

    pub fn venom_ticks_remaining(&self) -> u32 {
        self.venom_counter
    }

    /// Clear the one-tick `died`/`join` flags once the frame that carried
    /// them has been encoded. Must run *after* `World::encode_frame`, not
    /// before it - these flags can be set between ticks (a handshake's
    /// `join`, a disconnect's `died`), and clearing them before that
    /// tick's frame is encoded would mean the client never sees them.
    pub fn clear_one_shot_flags(&mut self) {
        self.died = false;
        self.join = false;
    }

    pub fn tick_respawn(&mut self) -> bool {
        if self.alive || self.respawn == 0 {
            return false;
        }
        self.respawn -= 1;
        self.respawn == 0
    }

    /// Revive at a freshly chosen placement.
    pub fn revive(&mut self, origin: Vector2D, starting_size: f32) {
        let direction = Direction::Up;
        self.body.clear();
        self.body.push_back(origin);
        self.body.push_back(origin + direction.unit() * starting_size);
        self.direction = direction;
        self.prev_direction = direction;
        self.alive = true;
        self.join = true;
        self.growth = 0;
        self.score = 0;
        self.venomous = false;
        self.venom_counter = 0;
    }

    /// Validate and apply a direction command. Returns
    /// whether the command was accepted.
    pub fn request_turn(&mut self, candidate: Direction, snake_width: f32) -> bool {
        if !self.alive {
            return false;
        }
        if candidate.is_opposite(self.direction) {
            return false;
        }
        if self.body.len() >= 2 {
            let neck_seg = self.head() - self.neck();
            if neck_seg.length() <= snake_width
                && candidate.unit().is_cardinal_opposite(neck_seg.normalized())
            {
                return false;
            }
        }
        self.direction = candidate;
        true
    }

    /// Move the head by `speed` along the current direction, inserting a
    /// corner point if the direction changed since the last tick (spec
    /// §4.2 step 2a). Returns the new head position.
    pub fn advance_head(&mut self, speed: f32) -> Vector2D {
        let turned = self.direction != self.prev_direction;
        if turned {
            let head = self.head();
            self.body.push_back(head);
        }
        let delta = self.direction.unit() * speed;
        if let Some(last) = self.body.back_mut() {
            *last = *last + delta;
        }
        self.prev_direction = self.direction;
        self.head()
    }

    /// Wrap the head across a world edge, preserving overshoot (spec
    /// §4.2 step 2b). `half_universe` is `universe_size / 2`; `speed` is
    /// the per-tick move distance, needed to convert the pre-wrap body
    /// length into a tick count for the post-wrap growth counter.
    pub fn wrap_if_needed(&mut self, half_universe: f32, snake_width: f32, speed: f32) -> bool {
        let threshold = half_universe - snake_width / 2.0;
        let head = self.head();
        let dir = self.direction.unit();

        let (wrapped, tail_point, head_point) = if dir.x > 0.0 && head.x > threshold {
            let overshoot = head.x - threshold;
            (
                true,
                Vector2D::new(-threshold, head.y),
                Vector2D::new(-threshold + overshoot, head.y),
            )
        } else if dir.x < 0.0 && head.x < -threshold {
            let overshoot = -threshold - head.x;
            (
                true,
                Vector2D::new(threshold, head.y),
                Vector2D::new(threshold - overshoot, head.y),
            )
        } else if dir.y > 0.0 && head.y > threshold {
            let overshoot = head.y - threshold;
            (
                true,
                Vector2D::new(head.x, -threshold),
                Vector2D::new(head.x, -threshold + overshoot),
            )
        } else if dir.y < 0.0 && head.y < -threshold {
            let overshoot = -threshold - head.y;
            (
                true,
                Vector2D::new(head.x, threshold),
                Vector2D::new(head.x, threshold - overshoot),
            )
        } else {
            (false, Vector2D::ZERO, Vector2D::ZERO)
        };

        if wrapped {
            // Pre-wrap polyline length, not vertex count: this is the
            // body length the snake needs to regrow before the tail
            // resumes advancing, so it doesn't eat through the short
            // post-wrap body in a couple of ticks.
            let pre_wrap_length: f32 = self
                .body
                .iter()
                .zip(self.body.iter().skip(1))
                .map(|(a, b)| (*b - *a).length())
                .sum();

            self.body.clear();
            self.body.push_back(tail_point);
            self.body.push_back(head_point);
            self.growth = (pre_wrap_length / speed.max(f32::EPSILON)).ceil() as u32;
        }

        wrapped
    }

    /// Advance the tail, consuming up to `speed` of tail length unless a
    /// growth tick is pending.
    pub fn advance_tail(&mut self, speed: f32) {
        if self.growth > 0 {
            self.growth -= 1;
            return;
        }

        let mut remaining = speed;
        while remaining > 0.0 {
            if self.body.len() <= 2 {
                let tail = self.tail();
                let next = self.body[1];
                let seg = next - tail;
                let seg_len = seg.length();
                if seg_len > 0.0 {
                    let shift = remaining.min(seg_len);
                    let dir = seg.normalized();
                    self.body[0] = tail + dir * shift;
                }
                break;
            }

            let tail = self.body[0];
            let next = self.body[1];
            let seg = next - tail;
            let seg_len = seg.length();

            if seg_len <= remaining {
                self.body.pop_front();
                remaining -= seg_len;
            } else {
                let dir = seg.normalized();
                self.body[0] = tail + dir * remaining;
                remaining = 0.0;
            }
        }
    }

    /// Credit a powerup pickup per the active game mode.
    pub fn collect_powerup(&mut self, settings: &Settings) {
        match settings.game_mode {
            GameMode::Default | GameMode::Poison => {
                self.score += Settings::POWERUP_SCORE;
                self.growth += settings.snake_growth_frames;
            }
            GameMode::Venom => {
                self.venomous = true;
                self.venom_counter += settings.venom_ticks();
            }
        }
    }

    /// Tick down venom duration, clearing the flag at zero.
    pub fn tick_venom(&mut self) {
        if self.venomous {
            if self.venom_counter > 0 {
                self.venom_counter -= 1;
            }
            if self.venom_counter == 0 {
                self.venomous = false;
            }
        }
    }

    /// Absorb a defeated snake's score (poison/venom modes):
    /// `score/powerup_score * growth_frames` growth, minimum credit of
    /// one powerup-score in venom mode.
    pub fn absorb(&mut self, victim_score: u32, settings: &Settings, minimum_on_zero: bool) {
        let credited = if minimum_on_zero && victim_score == 0 {
            Settings::POWERUP_SCORE
        } else {
            victim_score
        };
        self.score += credited;
        if settings.game_mode == GameMode::Poison {
            self.growth += (credited / Settings::POWERUP_SCORE) * settings.snake_growth_frames;
        }
    }

    /// Kill this snake: arm the respawn timer and clear transient state.
    pub fn kill(&mut self, respawn_rate: u32) {
        self.alive = false;
        self.died = true;
        self.respawn = respawn_rate;
        self.growth = 0;
        self.score = 0;
        self.venomous = false;
        self.venom_counter = 0;
    }

    pub fn mark_disconnected(&mut self) {
        self.dc = true;
        self.alive = false;
        self.died = true;
    }

    pub fn to_frame(&self, game_mode: GameMode, ms_per_frame: u64) -> SnakeFrame {
        let name = if self.venomous && game_mode == GameMode::Venom {
            let seconds = (self.venom_counter as u64 * ms_per_frame) / 1000;
            format!("{} {}", self.real_name, seconds)
        } else {
            self.real_name.clone()
        };

        SnakeFrame {
            snake: self.id,
            name,
            body: self.body.iter().map(|p| [p.x, p.y]).collect(),
            dir: self.direction,
            score: self.score,
            died: self.died,
            alive: self.alive,
            dc: self.dc,
            join: self.join,
        }
    }
}

/// Wire record for a snake. Private fields (growth, respawn, venom
/// internals, previous direction, real name) are never emitted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SnakeFrame {
    pub snake: SnakeId,
    pub name: String,
    pub body: Vec<[f32; 2]>,
    pub dir: Direction,
    pub score: u32,
    pub died: bool,
    pub alive: bool,
    pub dc: bool,
    pub join: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> Snake {
        Snake::spawn(1, "alice".into(), Vector2D::new(0.0, 0.0), 120.0)
    }

    #[test]
    fn spawn_produces_two_point_vertical_body() {
        let s = snake();
        assert_eq!(s.body.len(), 2);
        assert!(s.alive);
        assert!(s.join);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn reject_cardinal_opposite_turn() {
        let mut s = snake();
        s.direction = Direction::Right;
        assert!(!s.request_turn(Direction::Left, 10.0));
        assert_eq!(s.direction, Direction::Right);
    }

    #[test]
    fn reject_u_turn_through_short_neck() {
        let mut s = Snake::spawn(1, "a".into(), Vector2D::new(0.0, 0.0), 120.0);
        s.direction = Direction::Right;
        // shrink the head segment to below snake width
        let neck = s.neck();
        *s.body.back_mut().unwrap() = neck + Vector2D::new(5.0, 0.0);
        assert!(!s.request_turn(Direction::Left, 10.0));
    }

    #[test]
    fn wrap_preserves_overshoot() {
        let mut s = Snake::spawn(1, "a".into(), Vector2D::new(988.0, 0.0), 0.0);
        s.body.clear();
        s.body.push_back(Vector2D::new(984.0, 0.0));
        s.body.push_back(Vector2D::new(994.0, 0.0));
        s.direction = Direction::Right;

        s.advance_head(6.0);
        let wrapped = s.wrap_if_needed(1000.0, 10.0, 6.0);
        assert!(wrapped);
        assert_eq!(s.body.len(), 2);
        assert_eq!(s.tail(), Vector2D::new(-995.0, 0.0));
        assert_eq!(s.head(), Vector2D::new(-990.0, 0.0));
    }

    #[test]
    fn wrap_growth_covers_pre_wrap_body_length() {
        // Pre-wrap polyline is 396 units long; at speed 6 that's 66 ticks
        // of growth, not the 2-vertex count the bug used to reset to.
        let mut s = Snake::spawn(1, "a".into(), Vector2D::new(600.0, 0.0), 0.0);
        s.body.clear();
        s.body.push_back(Vector2D::new(600.0, 0.0));
        s.body.push_back(Vector2D::new(990.0, 0.0));
        s.direction = Direction::Right;
        s.prev_direction = Direction::Right;

        s.advance_head(6.0);
        let wrapped = s.wrap_if_needed(1000.0, 10.0, 6.0);
        assert!(wrapped);
        assert_eq!(s.growth_ticks_remaining(), 66);
    }

    #[test]
    fn growth_suppresses_tail_advance() {
        let mut s = snake();
        s.growth = 3;
        let tail_before = s.tail();
        s.advance_tail(6.0);
        assert_eq!(s.tail(), tail_before);
        assert_eq!(s.growth, 2);
    }

    #[test]
    fn kill_resets_transient_state() {
        let mut s = snake();
        s.score = 40;
        s.kill(100);
        assert!(!s.alive);
        assert!(s.died);
        assert_eq!(s.respawn_ticks_remaining(), 100);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn venom_countdown_clears_flag_at_zero() {
        let mut s = snake();
        s.venomous = true;
        s.venom_counter = 1;
        s.tick_venom();
        assert!(!s.venomous);
    }
}
