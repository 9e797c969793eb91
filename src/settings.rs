use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::error::ServerError;
use crate::game::wall::Wall;

/// Game-mode behavior variant: changes how inter-snake kills are credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Default,
    Poison,
    Venom,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointSpec {
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WallSpec {
    #[serde(rename = "ID")]
    pub id: u32,
    pub p1: PointSpec,
    pub p2: PointSpec,
}

/// Immutable tunables loaded once at startup from the settings document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "MSPerFrame")]
    pub ms_per_frame: u64,
    #[serde(rename = "RespawnRate")]
    pub respawn_rate: u32,
    #[serde(rename = "UniverseSize")]
    pub universe_size: f32,
    #[serde(rename = "SnakeSpeed")]
    pub snake_speed: f32,
    #[serde(rename = "PowerupDelay")]
    pub powerup_delay: u32,
    #[serde(rename = "MaxPowerups")]
    pub max_powerups: usize,
    #[serde(rename = "SnakeGrowthFrames")]
    pub snake_growth_frames: u32,
    #[serde(rename = "SnakeStartingSize")]
    pub snake_starting_size: f32,
    #[serde(rename = "GameMode")]
    pub game_mode: GameMode,
    #[serde(rename = "VenomCounter")]
    pub venom_counter: u32,
    #[serde(rename = "Walls")]
    pub walls: Vec<WallSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ms_per_frame: 50,
            respawn_rate: 100,
            universe_size: 2000.0,
            snake_speed: 6.0,
            powerup_delay: 150,
            max_powerups: 50,
            snake_growth_frames: 24,
            snake_starting_size: 120.0,
            game_mode: GameMode::Default,
            venom_counter: 10,
            walls: Vec::new(),
        }
    }
}

impl Settings {
    pub const SNAKE_WIDTH: f32 = 10.0;
    pub const POWERUP_WIDTH: f32 = 10.0;
    pub const POWERUP_SCORE: u32 = 10;
    pub const RESPAWN_MARGIN: f32 = 100.0;

    /// Convert the configured venom duration from seconds into ticks:
    /// `seconds * 1000 / ms_per_frame`.
    pub fn venom_ticks(&self) -> u32 {
        (self.venom_counter as u64 * 1000 / self.ms_per_frame.max(1)) as u32
    }

    pub fn walls(&self) -> Vec<Wall> {
        self.walls.iter().map(Wall::from_spec).collect()
    }

    /// Load from a TOML document at `path`. An unreadable file is a fatal
    /// startup error; a readable but malformed document falls back to
    /// defaults with an empty wall list, field by field.
    pub fn load(path: &Path) -> Result<Settings, ServerError> {
        let text = std::fs::read_to_string(path).map_err(|source| ServerError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;

        match toml::from_str::<Settings>(&text) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                warn!("malformed settings document at {:?}: {}", path, err);
                Ok(Settings::default())
            }
        }
    }
}
