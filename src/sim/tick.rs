//! Tick-advance transition
//!
//! One tick moves the snake by one cell and resolves collisions,
//! item consumption, the speed ramp and invulnerability expiry. A tick
//! is atomic: it either fully applies or ends the run, and the state
//! stays consistent and inspectable either way.

use std::time::Instant;

use super::spawn::{place_food, place_power_up};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the run by one tick at wall-clock time `now`.
///
/// Only advances in the `Running` phase. Returns the event produced by
/// this tick, if any.
pub fn tick(state: &mut GameState, now: Instant) -> Option<GameEvent> {
    if state.phase != GamePhase::Running {
        return None;
    }

    if let Some(dir) = state.pending_direction.take() {
        state.direction = dir;
    }

    let mut new_head = state.snake.head().shifted(state.direction);
    if state.wall_pass {
        // Boundary policy: remap before any collision evaluation
        new_head = new_head.wrapped();
    }
    state.snake.push_head(new_head);

    let hit_wall = !state.wall_pass && !new_head.in_bounds();
    let hit_self = state.snake.hits_body(new_head) && !state.invulnerable(now);
    if hit_wall || hit_self {
        // The head stays inserted so the final body is inspectable
        state.phase = GamePhase::GameOver;
        return Some(GameEvent::Died);
    }

    let event = if new_head == state.food {
        state.score += FOOD_SCORE;
        state.best_score = state.best_score.max(state.score);
        match place_food(&mut state.rng, &state.snake, state.power_up) {
            Some(cell) => state.food = cell,
            None => log::warn!("no free cell left for food"),
        }
        if state.score % SPEEDUP_SCORE_MULTIPLE == 0 {
            state.tick_interval_ms = state
                .tick_interval_ms
                .saturating_sub(TICK_DECREMENT_MS)
                .max(MIN_TICK_MS);
        }
        Some(GameEvent::Ate)
    } else if state.power_up == Some(new_head) {
        state.invulnerable_until = Some(now + POWER_UP_DURATION);
        state.score += POWER_UP_SCORE;
        state.best_score = state.best_score.max(state.score);
        state.power_up = place_power_up(&mut state.rng, &state.snake, state.food);
        Some(GameEvent::AtePowerUp)
    } else {
        state.snake.pop_tail();
        None
    };

    if state.invulnerable_until.is_some_and(|until| now >= until) {
        state.invulnerable_until = None;
    }

    event
}
