//! Snake Pro - a grid snake arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, item spawning, game state)
//! - `persistence`: Save slot and append-only score ledger
//! - `game`: Control-loop layer wiring input commands, tick scheduling and persistence
//!
//! Rendering, window/input plumbing and sound live in an external
//! presentation layer that reads [`sim::Snapshot`]s and forwards raw key
//! events as [`game::Command`]s.

pub mod game;
pub mod persistence;
pub mod sim;

pub use game::{Command, Game, InputSource, TickTimer};
pub use persistence::{Ledger, PersistError, SaveSlot, ScoreRecord};
pub use sim::{Cell, Direction, GameEvent, GamePhase, GameState, Snapshot};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Grid dimensions in cells
    pub const GRID_WIDTH: i32 = 40;
    pub const GRID_HEIGHT: i32 = 30;

    /// Initial interval between simulation ticks
    pub const INITIAL_TICK_MS: u64 = 150;
    /// Speed ramp floor - the interval never drops below this
    pub const MIN_TICK_MS: u64 = 50;
    /// Interval reduction applied at each speed-up step
    pub const TICK_DECREMENT_MS: u64 = 15;
    /// A speed-up step fires whenever the score reaches a multiple of this
    pub const SPEEDUP_SCORE_MULTIPLE: u32 = 50;

    /// Flat bonus for eating food
    pub const FOOD_SCORE: u32 = 10;
    /// Flat bonus for grabbing the power-up
    pub const POWER_UP_SCORE: u32 = 50;
    /// How long invulnerability lasts after grabbing the power-up
    pub const POWER_UP_DURATION: Duration = Duration::from_secs(8);
    /// Power-up appears with probability 1-in-N at each regeneration
    pub const POWER_UP_SPAWN_ODDS: u32 = 3;

    /// Snake length right after a reset
    pub const INITIAL_SNAKE_LEN: usize = 3;
}
