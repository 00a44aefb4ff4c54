//! Item spawning
//!
//! Free cells are enumerated directly and sampled uniformly, so
//! placement terminates even at high occupancy and is fully
//! deterministic under a seeded RNG.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Cell, Snake};
use crate::consts::{GRID_HEIGHT, GRID_WIDTH, POWER_UP_SPAWN_ODDS};

/// All grid cells not occupied by the snake, minus `exclude`
fn free_cells(snake: &Snake, exclude: Option<Cell>) -> Vec<Cell> {
    let area = (GRID_WIDTH * GRID_HEIGHT) as usize;
    let mut cells = Vec::with_capacity(area.saturating_sub(snake.len()));
    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH {
            let cell = Cell::new(x, y);
            if Some(cell) != exclude && !snake.contains(cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Pick a food cell uniformly among cells the snake does not occupy,
/// also avoiding `avoid` (the current power-up, if any). `None` only
/// when no free cell is left.
pub fn place_food<R: Rng>(rng: &mut R, snake: &Snake, avoid: Option<Cell>) -> Option<Cell> {
    free_cells(snake, avoid).choose(rng).copied()
}

/// Roll the 1-in-3 presence chance, then pick a power-up cell avoiding
/// both the snake and the food. `None` means no power-up this round.
pub fn place_power_up<R: Rng>(rng: &mut R, snake: &Snake, food: Cell) -> Option<Cell> {
    if rng.random_range(0..POWER_UP_SPAWN_ODDS) != 0 {
        return None;
    }
    free_cells(snake, Some(food)).choose(rng).copied()
}
