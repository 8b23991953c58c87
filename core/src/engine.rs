use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

impl Phase {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Owned, read-only copy of the engine state handed to renderers and UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: Coord,
    /// Head first.
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub direction: Direction,
    pub pending: Option<Direction>,
    pub score: u32,
    pub high_score: u32,
    pub tick_interval_ms: u32,
    pub phase: Phase,
}

impl Snapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// The game just ended on a score that set the best of the session.
    pub fn is_new_high_score(&self) -> bool {
        self.phase.is_game_over() && self.score > 0 && self.score == self.high_score
    }

    pub fn should_offer_mint(&self) -> bool {
        offer_mint(self.phase, self.score)
    }
}

/// Sole owner of the game state. All mutation goes through `start`, `set_direction_intent` and
/// `tick`; everything else reads.
#[derive(Clone, Debug)]
pub struct GameEngine<P = RandomFoodPlacer> {
    config: GameConfig,
    placer: P,
    snake: VecDeque<Cell>,
    occupied: Array2<bool>,
    food: Cell,
    direction: Direction,
    pending: Option<Direction>,
    score: u32,
    high_score: u32,
    tick_interval_ms: u32,
    phase: Phase,
}

impl<P: FoodPlacer> GameEngine<P> {
    pub fn new(config: GameConfig, placer: P) -> Self {
        let config = config.clamped();
        let size = (config.grid_size, config.grid_size);
        let mut engine = Self {
            config,
            placer,
            snake: VecDeque::new(),
            occupied: Array2::default(size.to_nd_index()),
            food: (0, 0),
            direction: Direction::Right,
            pending: None,
            score: 0,
            high_score: 0,
            tick_interval_ms: config.initial_interval_ms,
            phase: Phase::Idle,
        };
        engine.reseed();
        engine
    }

    /// Builds a running engine from an explicit layout, head first.
    pub fn with_layout(
        config: GameConfig,
        placer: P,
        snake: &[Cell],
        direction: Direction,
        food: Cell,
    ) -> Result<Self> {
        let config = config.clamped();
        let size = config.grid_size;
        if snake.is_empty() {
            return Err(GameError::EmptySnake);
        }

        let mut occupied: Array2<bool> = Array2::default((size, size).to_nd_index());
        for &cell in snake {
            if !in_bounds(cell, size) {
                return Err(GameError::InvalidCoords);
            }
            if occupied[cell.to_nd_index()] {
                return Err(GameError::OverlappingSnake);
            }
            occupied[cell.to_nd_index()] = true;
        }

        let connected = snake
            .windows(2)
            .all(|pair| pair[0].0.abs_diff(pair[1].0) + pair[0].1.abs_diff(pair[1].1) == 1);
        if !connected {
            return Err(GameError::DisconnectedSnake);
        }

        if !in_bounds(food, size) {
            return Err(GameError::InvalidCoords);
        }
        if occupied[food.to_nd_index()] {
            return Err(GameError::FoodOnSnake);
        }

        Ok(Self {
            config,
            placer,
            snake: snake.iter().copied().collect(),
            occupied,
            food,
            direction,
            pending: None,
            score: 0,
            high_score: 0,
            tick_interval_ms: config.initial_interval_ms,
            phase: Phase::Running,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    /// Direction the snake is actually moving in, pending intents excluded.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        in_bounds(cell, self.config.grid_size) && self.occupied[cell.to_nd_index()]
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.config.grid_size,
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            direction: self.direction,
            pending: self.pending,
            score: self.score,
            high_score: self.high_score,
            tick_interval_ms: self.tick_interval_ms,
            phase: self.phase,
        }
    }

    /// Fresh round from any phase. The high score survives.
    pub fn start(&mut self) {
        self.reseed();
        self.phase = Phase::Running;
        log::debug!("Game started, food at {:?}", self.food);
    }

    /// Back to the idle screen with a fresh layout, without ticking.
    pub fn reset(&mut self) {
        self.reseed();
        self.phase = Phase::Idle;
        log::debug!("Game reset");
    }

    pub fn set_direction_intent(&mut self, direction: Direction) -> IntentOutcome {
        if !self.phase.is_running() {
            return IntentOutcome::Ignored;
        }

        // checked against the committed direction so two quick turns within one tick
        // cannot fold the head back into the neck
        if direction.is_opposite(self.direction) {
            log::trace!("Rejected reversal {:?} while moving {:?}", direction, self.direction);
            return IntentOutcome::Rejected;
        }

        self.pending = Some(direction);
        IntentOutcome::Accepted
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_running() {
            return TickOutcome::Idle;
        }

        if let Some(direction) = self.pending.take() {
            self.direction = direction;
        }

        let Some(next) = step(self.head(), self.direction, self.config.grid_size) else {
            return self.end_game(Crash::Wall);
        };

        // the tail still counts, it only moves after the head has
        if self.occupied[next.to_nd_index()] {
            return self.end_game(Crash::SelfHit);
        }

        self.snake.push_front(next);
        self.occupied[next.to_nd_index()] = true;

        if next == self.food {
            self.score = self.score.saturating_add(self.config.food_score);
            self.tick_interval_ms = self.config.next_interval(self.tick_interval_ms);
            match self.spawn_food() {
                Some(food) => self.food = food,
                None => return self.end_game(Crash::BoardFull),
            }
            log::trace!("Ate at {:?}, score {}, next food {:?}", next, self.score, self.food);
            TickOutcome::Ate
        } else {
            if let Some(tail) = self.snake.pop_back() {
                self.occupied[tail.to_nd_index()] = false;
            }
            TickOutcome::Moved
        }
    }

    /// Moves the food to `cell`, which must be free.
    pub fn set_food(&mut self, cell: Cell) -> Result<()> {
        if !in_bounds(cell, self.config.grid_size) {
            return Err(GameError::InvalidCoords);
        }
        if self.occupied[cell.to_nd_index()] {
            return Err(GameError::FoodOnSnake);
        }
        self.food = cell;
        Ok(())
    }

    fn end_game(&mut self, crash: Crash) -> TickOutcome {
        self.phase = Phase::GameOver;
        self.pending = None;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        log::debug!(
            "Game over ({:?}) with score {}, best {}",
            crash,
            self.score,
            self.high_score
        );
        TickOutcome::GameOver(crash)
    }

    fn reseed(&mut self) {
        let size = self.config.grid_size;
        let center = size / 2;

        self.occupied.fill(false);
        self.snake.clear();
        for offset in 0..INITIAL_SNAKE_LEN {
            let cell = (center - offset as Coord, center);
            self.snake.push_back(cell);
            self.occupied[cell.to_nd_index()] = true;
        }

        self.direction = Direction::Right;
        self.pending = None;
        self.score = 0;
        self.tick_interval_ms = self.config.initial_interval_ms;

        match self.spawn_food() {
            Some(food) => self.food = food,
            None => log::warn!("No room for food on a fresh board"),
        }
    }

    fn spawn_food(&mut self) -> Option<Cell> {
        match self.placer.place(&self.occupied) {
            Some(cell) if self.is_free(cell) => Some(cell),
            Some(cell) => {
                log::error!("Food placer picked taken cell {:?}, scanning instead", cell);
                free_cells(&self.occupied).next()
            }
            None => None,
        }
    }

    fn is_free(&self, cell: Cell) -> bool {
        in_bounds(cell, self.config.grid_size) && !self.occupied[cell.to_nd_index()]
    }
}

impl GameEngine<RandomFoodPlacer> {
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomFoodPlacer::new(seed))
    }
}
