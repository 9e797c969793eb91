use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::game::collision;
use crate::game::geometry::{Direction, Vector2D, WorldRng};
use crate::game::powerup::{Powerup, PowerupId};
use crate::game::snake::Snake;
use crate::game::wall::Wall;
use crate::protocol::types::SnakeId;
use crate::settings::{GameMode, Settings};

/// The authoritative simulation state. Exclusively mutated by the tick
/// driver; the connection manager only reads it
/// inside the broadcast phase and otherwise reaches into it through
/// `request_turn`/`create_snake`/`mark_disconnected`, all serialized by
/// the lock `SharedWorld` wraps this in.
pub struct World {
    pub settings: Settings,
    snakes: Vec<Snake>,
    powerups: Vec<Powerup>,
    walls: Vec<Wall>,
    next_snake_id: SnakeId,
    next_powerup_id: PowerupId,
    powerup_gate: u32,
    rng: WorldRng,
    frame_count: u64,
}

impl World {
    pub fn new(settings: Settings) -> Self {
        let walls = settings.walls();
        Self {
            settings,
            snakes: Vec::new(),
            powerups: Vec::new(),
            walls,
            next_snake_id: 1,
            next_powerup_id: 1,
            powerup_gate: 0,
            rng: WorldRng::seeded_from_entropy(),
            frame_count: 0,
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Create a newly connected client's snake at a free respawn point.
    /// It joins the simulation on the next tick.
    pub fn create_snake(&mut self, name: String) -> SnakeId {
        let id = self.next_snake_id;
        self.next_snake_id += 1;

        let starting_size = self.settings.snake_starting_size;
        let origin = self.pick_respawn_point(starting_size, Settings::SNAKE_WIDTH);
        self.snakes.push(Snake::spawn(id, name, origin, starting_size));
        id
    }

    pub fn mark_disconnected(&mut self, id: SnakeId) {
        if let Some(snake) = self.find_mut(id) {
            snake.mark_disconnected();
        }
    }

    /// Apply a direction command from a client. Validated and stored
    /// immediately; takes effect on the snake's next move.
    pub fn request_turn(&mut self, id: SnakeId, direction: Direction) -> bool {
        match self.find_mut(id) {
            Some(snake) => snake.request_turn(direction, Settings::SNAKE_WIDTH),
            None => false,
        }
    }

    fn find_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.id == id)
    }

    /// Run one full tick: respawn scan, per-snake move + collide,
    /// then the powerup spawn gate. `died`/`join` are NOT cleared here -
    /// they're cleared in `garbage_collect`, after the caller has
    /// encoded the frame that carries them.
    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);

        let starting_size = self.settings.snake_starting_size;
        for i in 0..self.snakes.len() {
            if self.snakes[i].tick_respawn() {
                let origin = self.pick_respawn_point(starting_size, Settings::SNAKE_WIDTH);
                self.snakes[i].revive(origin, starting_size);
            }
        }

        let half_universe = self.settings.universe_size / 2.0;
        let speed = self.settings.snake_speed;

        for i in 0..self.snakes.len() {
            if !self.snakes[i].alive {
                continue;
            }

            self.snakes[i].advance_head(speed);
            self.snakes[i].wrap_if_needed(half_universe, Settings::SNAKE_WIDTH, speed);
            self.snakes[i].advance_tail(speed);

            self.resolve_powerup_pickup(i);
            self.resolve_inter_snake(i);
            if self.snakes[i].alive {
                self.resolve_wall_collision(i);
            }
            if self.snakes[i].alive {
                self.resolve_self_collision(i);
            }

            self.snakes[i].tick_venom();
        }

        self.tick_powerup_spawn();
    }

    fn resolve_powerup_pickup(&mut self, i: usize) {
        let head = self.snakes[i].head();
        let query = Settings::SNAKE_WIDTH;

        let hit = self
            .powerups
            .iter()
            .position(|p| !p.died && collision::point_hits_powerup(head, p, Settings::POWERUP_WIDTH, query));

        if let Some(idx) = hit {
            self.powerups[idx].died = true;
            self.snakes[i].collect_powerup(&self.settings);
        }
    }

    fn resolve_inter_snake(&mut self, i: usize) {
        if !self.snakes[i].alive {
            return;
        }
        let head = self.snakes[i].head();
        let width = Settings::SNAKE_WIDTH;

        let mut found: Option<(usize, bool)> = None;
        for j in 0..self.snakes.len() {
            if j == i || !self.snakes[j].alive {
                continue;
            }
            if let Some(seg_idx) = collision::point_hits_snake_body(head, &self.snakes[j], width, width) {
                let is_head_hit = seg_idx == collision::head_segment_index(&self.snakes[j]);
                found = Some((j, is_head_hit));
                break;
            }
        }

        let Some((j, other_head_hit)) = found else {
            return;
        };

        let other_head = self.snakes[j].head();
        let mutual = other_head_hit
            && collision::point_hits_snake_body(other_head, &self.snakes[i], width, width)
                .map(|idx| idx == collision::head_segment_index(&self.snakes[i]))
                .unwrap_or(false);

        if mutual {
            let (winner, loser) = self.resolve_tiebreak(i, j);
            self.apply_kill(loser, Some(winner));
            return;
        }

        match self.settings.game_mode {
            GameMode::Venom => {
                if self.snakes[i].venomous {
                    self.apply_kill(j, Some(i));
                } else {
                    self.apply_kill(i, None);
                }
            }
            GameMode::Poison => self.apply_kill(i, Some(j)),
            GameMode::Default => self.apply_kill(i, None),
        }
    }

    fn resolve_tiebreak(&self, i: usize, j: usize) -> (usize, usize) {
        let si = &self.snakes[i];
        let sj = &self.snakes[j];
        if si.score > sj.score {
            (i, j)
        } else if sj.score > si.score {
            (j, i)
        } else if si.id <= sj.id {
            (i, j)
        } else {
            (j, i)
        }
    }

    fn apply_kill(&mut self, loser: usize, winner: Option<usize>) {
        let victim_score = self.snakes[loser].score;
        self.snakes[loser].kill(self.settings.respawn_rate);

        if let Some(winner) = winner {
            match self.settings.game_mode {
                GameMode::Poison => self.snakes[winner].absorb(victim_score, &self.settings, false),
                GameMode::Venom => self.snakes[winner].absorb(victim_score, &self.settings, true),
                GameMode::Default => {}
            }
        }
    }

    fn resolve_wall_collision(&mut self, i: usize) {
        let head = self.snakes[i].head();
        let hit = self.walls.iter().any(|w| collision::point_hits_wall(head, w, Settings::SNAKE_WIDTH));
        if hit {
            self.apply_kill(i, None);
        }
    }

    fn resolve_self_collision(&mut self, i: usize) {
        if collision::self_collision(&self.snakes[i], Settings::SNAKE_WIDTH) {
            self.apply_kill(i, None);
        }
    }

    fn tick_powerup_spawn(&mut self) {
        let alive_count = self.powerups.iter().filter(|p| !p.died).count();
        if alive_count >= self.settings.max_powerups {
            return;
        }

        if self.powerup_gate == 0 {
            let loc = self.pick_respawn_point(0.0, Settings::POWERUP_WIDTH);
            let id = self.next_powerup_id;
            self.next_powerup_id += 1;
            self.powerups.push(Powerup::new(id, loc));
            self.powerup_gate = self.rng.range_u32(0, self.settings.powerup_delay.max(1));
        } else {
            self.powerup_gate -= 1;
        }
    }

    /// Placement search shared by snake and powerup spawn. Samples a
    /// provisional vertical body at stride `width` and
    /// retries until every sample point clears walls, snakes, and
    /// powerups.
    fn pick_respawn_point(&mut self, length: f32, width: f32) -> Vector2D {
        let half = self.settings.universe_size / 2.0;
        let margin = Settings::RESPAWN_MARGIN;

        loop {
            let x = self.rng.range(-half + margin, half - margin);
            let y = self.rng.range(-half + margin, half - margin);
            let origin = Vector2D::new(x, y);

            if self.placement_is_clear(origin, length, width) {
                return origin;
            }
        }
    }

    fn placement_is_clear(&self, origin: Vector2D, length: f32, width: f32) -> bool {
        let mut offset = 0.0;
        loop {
            let point = Vector2D::new(origin.x, origin.y - offset);
            if self.point_collides(point, width) {
                return false;
            }
            if offset >= length {
                break;
            }
            offset += width;
        }
        true
    }

    fn point_collides(&self, point: Vector2D, query_size: f32) -> bool {
        if self.walls.iter().any(|w| collision::point_hits_wall(point, w, query_size)) {
            return true;
        }
        if self
            .snakes
            .iter()
            .filter(|s| s.alive)
            .any(|s| collision::point_hits_snake_body(point, s, Settings::SNAKE_WIDTH, query_size).is_some())
        {
            return true;
        }
        self.powerups
            .iter()
            .filter(|p| !p.died)
            .any(|p| collision::point_hits_powerup(point, p, Settings::POWERUP_WIDTH, query_size))
    }

    /// Serialize every live snake then every powerup into newline-
    /// delimited JSON records.
    pub fn encode_frame(&self) -> String {
        let mut out = String::new();
        for snake in &self.snakes {
            let frame = snake.to_frame(self.settings.game_mode, self.settings.ms_per_frame);
            if let Ok(line) = serde_json::to_string(&frame) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        for powerup in &self.powerups {
            let frame = powerup.to_frame();
            if let Ok(line) = serde_json::to_string(&frame) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Remove disconnected snakes and consumed powerups, but only after
    /// the frame carrying their
    /// terminal flags has already been encoded. Also clears the
    /// survivors' one-shot `died`/`join` flags for the same reason - the
    /// frame that just went out is the one and only broadcast that's
    /// allowed to see them set.
    pub fn garbage_collect(&mut self) {
        let before = self.snakes.len();
        self.snakes.retain(|s| !s.dc);
        if self.snakes.len() != before {
            debug!("removed {} disconnected snake(s)", before - self.snakes.len());
        }
        for snake in self.snakes.iter_mut() {
            snake.clear_one_shot_flags();
        }
        self.powerups.retain(|p| !p.died);
    }
}

pub type SharedWorld = Arc<RwLock<World>>;

pub fn create_shared_world(settings: Settings) -> SharedWorld {
    Arc::new(RwLock::new(World::new(settings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut s = Settings::default();
        s.universe_size = 2000.0;
        s.snake_speed = 6.0;
        s.snake_starting_size = 120.0;
        s
    }

    #[test]
    fn world_creation_starts_empty() {
        let world = World::new(settings());
        assert_eq!(world.snakes.len(), 0);
    }

    #[test]
    fn create_snake_spawns_a_two_point_body() {
        let mut world = World::new(settings());
        let id = world.create_snake("alice".into());
        assert!(world.find_mut(id).is_some());
    }

    #[test]
    fn tick_advances_frame_counter() {
        let mut world = World::new(settings());
        world.create_snake("alice".into());
        world.tick();
        assert_eq!(world.frame_count(), 1);
    }

    #[test]
    fn head_to_head_tiebreak_kills_lower_score() {
        let mut world = World::new(settings());
        let winner_id = world.create_snake("winner".into());
        let loser_id = world.create_snake("loser".into());

        let winner_idx = world.snakes.iter().position(|s| s.id == winner_id).unwrap();
        let loser_idx = world.snakes.iter().position(|s| s.id == loser_id).unwrap();
        world.snakes[winner_idx].score = 30;
        world.snakes[loser_idx].score = 20;

        // Position the two snakes so their heads meet head-to-head.
        world.snakes[winner_idx].body = std::collections::VecDeque::from(vec![
            Vector2D::new(-120.0, 0.0),
            Vector2D::new(0.0, 0.0),
        ]);
        world.snakes[winner_idx].direction = Direction::Right;
        world.snakes[loser_idx].body = std::collections::VecDeque::from(vec![
            Vector2D::new(120.0, 0.0),
            Vector2D::new(6.0, 0.0),
        ]);
        world.snakes[loser_idx].direction = Direction::Left;

        world.resolve_inter_snake(winner_idx);
        world.resolve_inter_snake(loser_idx);

        assert!(world.snakes[winner_idx].alive);
        assert!(!world.snakes[loser_idx].alive);
        assert!(world.snakes[loser_idx].died);
    }

    #[test]
    fn garbage_collect_removes_disconnected_snakes() {
        let mut world = World::new(settings());
        let id = world.create_snake("alice".into());
        world.mark_disconnected(id);
        world.garbage_collect();
        assert!(world.find_mut(id).is_none());
    }
}
