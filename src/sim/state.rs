//! Game state and core simulation types
//!
//! All state for an in-progress run lives here. The aggregate owns its
//! RNG, so a run is reproducible from its seed.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::{place_food, place_power_up};
use crate::consts::*;

/// A single grid cell, column/row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor cell one step in the given direction (unbounded)
    pub fn shifted(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Remap both coordinates into the grid, wrapping at the edges
    pub fn wrapped(self) -> Self {
        Self::new(self.x.rem_euclid(GRID_WIDTH), self.y.rem_euclid(GRID_HEIGHT))
    }

    /// Whether the cell lies inside the grid
    pub fn in_bounds(self) -> bool {
        (0..GRID_WIDTH).contains(&self.x) && (0..GRID_HEIGHT).contains(&self.y)
    }
}

/// Movement heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset in grid coordinates (y grows downward)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The snake body, head first
#[derive(Debug, Clone, Default)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Straight segment of `len` cells with the head at `head`,
    /// trailing away from the movement direction
    pub fn segment(head: Cell, len: usize, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        let body = (0..len as i32)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Self { body }
    }

    /// Rebuild the body from head-to-tail cells (save restore)
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            body: cells.into_iter().collect(),
        }
    }

    pub fn head(&self) -> Cell {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Head-to-tail iteration
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether `cell` hits the body excluding the head slot
    pub fn hits_body(&self, cell: Cell) -> bool {
        self.body.iter().skip(1).any(|&c| c == cell)
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub fn pop_tail(&mut self) -> Option<Cell> {
        self.body.pop_back()
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed, not yet started
    Ready,
    /// Active gameplay
    Running,
    /// Frozen by the player
    Paused,
    /// Run ended, terminal until reset
    GameOver,
}

/// Discrete gameplay events, mapped to sound cues by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Ate,
    AtePowerUp,
    Died,
}

/// Owned view of the state for rendering
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub power_up: Option<Cell>,
    pub score: u32,
    pub best_score: u32,
    pub tick_interval_ms: u64,
    pub is_over: bool,
    pub is_paused: bool,
    pub invulnerable: bool,
    pub invulnerable_remaining: Duration,
    pub wall_pass: bool,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub snake: Snake,
    pub direction: Direction,
    /// Requested direction, applied at the next tick
    pub pending_direction: Option<Direction>,
    pub food: Cell,
    pub power_up: Option<Cell>,
    pub score: u32,
    pub best_score: u32,
    /// Current tick cadence; shrinks as the speed ramps up
    pub tick_interval_ms: u64,
    pub phase: GamePhase,
    /// Wrap at the grid edges instead of colliding
    pub wall_pass: bool,
    /// Invulnerability deadline while a power-up is active
    pub invulnerable_until: Option<Instant>,
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh state in the `Ready` phase with the board already laid out
    pub fn new(seed: u64) -> Self {
        let center = Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 2);
        let snake = Snake::segment(center, INITIAL_SNAKE_LEN, Direction::Right);
        let mut rng = Pcg32::seed_from_u64(seed);
        let food = place_food(&mut rng, &snake, None).expect("fresh grid has free cells");
        let power_up = place_power_up(&mut rng, &snake, food);

        Self {
            seed,
            snake,
            direction: Direction::Right,
            pending_direction: None,
            food,
            power_up,
            score: 0,
            best_score: 0,
            tick_interval_ms: INITIAL_TICK_MS,
            phase: GamePhase::Ready,
            wall_pass: false,
            invulnerable_until: None,
            rng,
        }
    }

    /// Reinitialize the run and start it immediately
    pub fn reset(&mut self) -> GameEvent {
        let center = Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 2);
        self.snake = Snake::segment(center, INITIAL_SNAKE_LEN, Direction::Right);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.score = 0;
        self.tick_interval_ms = INITIAL_TICK_MS;
        self.invulnerable_until = None;
        self.respawn_items();
        self.phase = GamePhase::Running;
        GameEvent::Started
    }

    /// Request a heading change, applied at the next tick.
    /// Reversals and requests while paused or over are ignored.
    pub fn set_direction(&mut self, requested: Direction) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Paused) {
            return;
        }
        if requested == self.direction.opposite() {
            return;
        }
        self.pending_direction = Some(requested);
    }

    /// Flip between `Running` and `Paused`; no-op once the run is over
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Running,
            _ => {}
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Whether the power-up shield is active at `now`
    pub fn invulnerable(&self, now: Instant) -> bool {
        self.invulnerable_until.is_some_and(|until| now < until)
    }

    /// Spawn fresh food and (probabilistically) a power-up
    pub fn respawn_items(&mut self) {
        match place_food(&mut self.rng, &self.snake, None) {
            Some(cell) => self.food = cell,
            // Snake covers the whole grid; leave the stale food in place
            None => log::warn!("no free cell left for food"),
        }
        self.power_up = place_power_up(&mut self.rng, &self.snake, self.food);
    }

    /// Restore a saved run: score, cadence and body, with items
    /// respawned and all transient flags cleared
    pub fn restore(&mut self, score: u32, tick_interval_ms: u64, cells: Vec<Cell>) {
        debug_assert!(!cells.is_empty());
        self.snake = Snake::from_cells(cells);
        self.score = score;
        self.best_score = self.best_score.max(score);
        self.tick_interval_ms = tick_interval_ms;
        self.pending_direction = None;
        self.invulnerable_until = None;
        // The heading is not persisted; recover it from the first two cells
        {
            let mut cells_iter = self.snake.cells();
            if let (Some(head), Some(neck)) = (cells_iter.next(), cells_iter.next()) {
                self.direction = match (head.x - neck.x, head.y - neck.y) {
                    (_, y) if y < 0 => Direction::Up,
                    (_, y) if y > 0 => Direction::Down,
                    (x, _) if x < 0 => Direction::Left,
                    _ => Direction::Right,
                };
            }
        }
        self.respawn_items();
        self.phase = GamePhase::Running;
    }

    /// Owned render view at `now`
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let invulnerable = self.invulnerable(now);
        let invulnerable_remaining = self
            .invulnerable_until
            .filter(|_| invulnerable)
            .map(|until| until.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO);

        Snapshot {
            snake: self.snake.cells().collect(),
            food: self.food,
            power_up: self.power_up,
            score: self.score,
            best_score: self.best_score,
            tick_interval_ms: self.tick_interval_ms,
            is_over: self.is_over(),
            is_paused: self.is_paused(),
            invulnerable,
            invulnerable_remaining,
            wall_pass: self.wall_pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_trails_away_from_heading() {
        let snake = Snake::segment(Cell::new(20, 15), 3, Direction::Right);
        let cells: Vec<_> = snake.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(20, 15), Cell::new(19, 15), Cell::new(18, 15)]
        );
        assert_eq!(snake.head(), Cell::new(20, 15));
    }

    #[test]
    fn test_reversal_rejected() {
        let mut state = GameState::new(7);
        state.reset();
        assert_eq!(state.direction, Direction::Right);

        state.set_direction(Direction::Left);
        assert_eq!(state.pending_direction, None);

        state.set_direction(Direction::Up);
        assert_eq!(state.pending_direction, Some(Direction::Up));
    }

    #[test]
    fn test_direction_ignored_while_paused_or_over() {
        let mut state = GameState::new(7);
        state.reset();

        state.toggle_pause();
        state.set_direction(Direction::Up);
        assert_eq!(state.pending_direction, None);

        state.toggle_pause();
        state.phase = GamePhase::GameOver;
        state.set_direction(Direction::Up);
        assert_eq!(state.pending_direction, None);
    }

    #[test]
    fn test_pause_is_noop_after_game_over() {
        let mut state = GameState::new(7);
        state.reset();
        state.phase = GamePhase::GameOver;
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_wrapped_remaps_into_grid() {
        use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
        assert_eq!(Cell::new(-1, 5).wrapped(), Cell::new(GRID_WIDTH - 1, 5));
        assert_eq!(Cell::new(GRID_WIDTH, 5).wrapped(), Cell::new(0, 5));
        assert_eq!(Cell::new(3, -1).wrapped(), Cell::new(3, GRID_HEIGHT - 1));
        assert_eq!(Cell::new(3, GRID_HEIGHT).wrapped(), Cell::new(3, 0));
    }

    #[test]
    fn test_restore_recovers_heading() {
        let mut state = GameState::new(7);
        state.reset();
        state.restore(
            30,
            120,
            vec![Cell::new(5, 5), Cell::new(5, 6), Cell::new(5, 7)],
        );
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.score, 30);
        assert_eq!(state.tick_interval_ms, 120);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.invulnerable_until.is_none());
        assert!(!state.snake.contains(state.food));
    }
}
