//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Explicit wall-clock time passed into every time-sensitive operation
//! - No rendering or platform dependencies

pub mod spawn;
pub mod state;
pub mod tick;

pub use spawn::{place_food, place_power_up};
pub use state::{Cell, Direction, GameEvent, GamePhase, GameState, Snake, Snapshot};
pub use tick::tick;
