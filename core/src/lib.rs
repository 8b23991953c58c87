#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use host::*;
pub use input::*;
pub use render::*;
pub use schedule::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod host;
mod input;
mod render;
mod schedule;
mod types;

/// Smallest board that still fits the starting snake with room to turn.
pub const MIN_GRID_SIZE: Coord = 4;

/// Length of the snake right after `start`.
pub const INITIAL_SNAKE_LEN: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGameConfig")]
pub struct GameConfig {
    pub grid_size: Coord,
    pub initial_interval_ms: u32,
    pub interval_step_ms: u32,
    pub min_interval_ms: u32,
    pub food_score: u32,
}

impl GameConfig {
    pub const DEFAULT_GRID_SIZE: Coord = 20;
    pub const DEFAULT_INTERVAL_MS: u32 = 150;
    pub const DEFAULT_INTERVAL_STEP_MS: u32 = 5;
    pub const DEFAULT_MIN_INTERVAL_MS: u32 = 50;
    pub const DEFAULT_FOOD_SCORE: u32 = 10;

    pub const fn new_unchecked(
        grid_size: Coord,
        initial_interval_ms: u32,
        interval_step_ms: u32,
        min_interval_ms: u32,
        food_score: u32,
    ) -> Self {
        Self {
            grid_size,
            initial_interval_ms,
            interval_step_ms,
            min_interval_ms,
            food_score,
        }
    }

    /// Board of `grid_size` with the default speed curve, clamped to a playable size.
    pub fn with_grid_size(grid_size: Coord) -> Self {
        Self::new(
            grid_size,
            Self::DEFAULT_INTERVAL_MS,
            Self::DEFAULT_INTERVAL_STEP_MS,
            Self::DEFAULT_MIN_INTERVAL_MS,
            Self::DEFAULT_FOOD_SCORE,
        )
    }

    pub fn new(
        grid_size: Coord,
        initial_interval_ms: u32,
        interval_step_ms: u32,
        min_interval_ms: u32,
        food_score: u32,
    ) -> Self {
        let grid_size = grid_size.clamp(MIN_GRID_SIZE, Coord::MAX);
        let initial_interval_ms = initial_interval_ms.max(1);
        let min_interval_ms = min_interval_ms.clamp(1, initial_interval_ms);
        Self::new_unchecked(
            grid_size,
            initial_interval_ms,
            interval_step_ms,
            min_interval_ms,
            food_score,
        )
    }

    /// Same config run through the clamping of [`GameConfig::new`].
    pub fn clamped(self) -> Self {
        Self::new(
            self.grid_size,
            self.initial_interval_ms,
            self.interval_step_ms,
            self.min_interval_ms,
            self.food_score,
        )
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    /// Interval after one more piece of food, never below the floor.
    pub fn next_interval(&self, current_ms: u32) -> u32 {
        current_ms
            .saturating_sub(self.interval_step_ms)
            .max(self.min_interval_ms)
    }
}

/// Wire shape of [`GameConfig`], clamped on the way in.
#[derive(Deserialize)]
struct RawGameConfig {
    grid_size: Coord,
    initial_interval_ms: u32,
    interval_step_ms: u32,
    min_interval_ms: u32,
    food_score: u32,
}

impl From<RawGameConfig> for GameConfig {
    fn from(raw: RawGameConfig) -> Self {
        Self::new(
            raw.grid_size,
            raw.initial_interval_ms,
            raw.interval_step_ms,
            raw.min_interval_ms,
            raw.food_score,
        )
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            Self::DEFAULT_GRID_SIZE,
            Self::DEFAULT_INTERVAL_MS,
            Self::DEFAULT_INTERVAL_STEP_MS,
            Self::DEFAULT_MIN_INTERVAL_MS,
            Self::DEFAULT_FOOD_SCORE,
        )
    }
}

/// Why a running game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crash {
    Wall,
    SelfHit,
    BoardFull,
}

/// Result of a single `tick`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running, nothing changed.
    Idle,
    Moved,
    Ate,
    GameOver(Crash),
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Result of a direction request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Accepted,
    /// Would reverse into the neck.
    Rejected,
    /// Not running.
    Ignored,
}
