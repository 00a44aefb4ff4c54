//! Control-loop layer
//!
//! Bridges the presentation adapter to the simulation: drains input,
//! schedules ticks at the simulation-controlled cadence, and wires
//! gameplay to the save slot and score ledger. The whole layer runs on
//! one logical actor; operations execute strictly sequentially.

use std::time::{Duration, Instant};

use crate::persistence::{Ledger, PersistError, SaveData, SaveSlot, ScoreRecord};
use crate::sim::{Direction, GameEvent, GameState, Snapshot, tick};

/// Name used until the ledger provides a best-record holder
const DEFAULT_PLAYER: &str = "Player";

/// Commands the adapter can issue besides steering.
///
/// One unambiguous command vocabulary; how keys map to commands is the
/// adapter's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Save,
    Load,
    Restart,
    ShowLeaderboard,
}

/// Non-blocking input boundary implemented by the presentation adapter
pub trait InputSource {
    /// Latest requested heading, if any
    fn poll_direction(&mut self) -> Option<Direction>;
    /// Next queued command, if any
    fn poll_command(&mut self) -> Option<Command>;
}

/// Explicit tick scheduler.
///
/// Fires when the current interval has elapsed since the last fire.
/// The cadence is simulation state, so it shrinks as the run speeds up.
#[derive(Debug, Default)]
pub struct TickTimer {
    last: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tick is due at `now` for the given interval.
    /// A fresh or reset timer fires immediately.
    pub fn fire(&mut self, now: Instant, interval: Duration) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// One run of the game wired to its persistence
pub struct Game {
    pub state: GameState,
    slot: SaveSlot,
    ledger: Ledger,
    timer: TickTimer,
    player_name: String,
}

impl Game {
    /// Build a game, seeding the best score and display name from the
    /// ledger. A missing or empty ledger just means no best yet; an
    /// unreadable one is logged and ignored.
    pub fn new(seed: u64, slot: SaveSlot, ledger: Ledger) -> Self {
        let mut state = GameState::new(seed);
        let mut player_name = DEFAULT_PLAYER.to_string();

        match ledger.best_record() {
            Ok(best) => {
                state.best_score = best.score;
                player_name = best.player_name;
            }
            Err(PersistError::NoRecords) => {}
            Err(err) => log::warn!("score ledger unavailable: {err}"),
        }

        Self {
            state,
            slot,
            ledger,
            timer: TickTimer::new(),
            player_name,
        }
    }

    /// Start (or restart) the run
    pub fn start(&mut self) -> GameEvent {
        self.timer.reset();
        self.state.reset()
    }

    /// One pass of the control loop: drain the adapter's input, then
    /// advance the simulation if a tick is due at `now`. Returns the
    /// events this pass produced, in order.
    pub fn step(&mut self, input: &mut dyn InputSource, now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if let Some(dir) = input.poll_direction() {
            self.state.set_direction(dir);
        }
        while let Some(command) = input.poll_command() {
            if let Some(event) = self.handle_command(command) {
                events.push(event);
            }
        }

        let interval = Duration::from_millis(self.state.tick_interval_ms);
        if self.timer.fire(now, interval) {
            if let Some(event) = tick(&mut self.state, now) {
                if event == GameEvent::Died {
                    self.record_final_score();
                }
                events.push(event);
            }
        }

        events
    }

    /// Apply one adapter command. Persistence faults are reported in
    /// the log and never interrupt gameplay.
    pub fn handle_command(&mut self, command: Command) -> Option<GameEvent> {
        match command {
            Command::Pause => {
                self.state.toggle_pause();
                None
            }
            Command::Save => {
                if let Err(err) = self.save() {
                    log::warn!("save failed: {err}");
                }
                None
            }
            Command::Load => {
                match self.load() {
                    Ok(()) => log::info!("run restored from save slot"),
                    Err(err) => log::warn!("load failed: {err}"),
                }
                None
            }
            Command::Restart => Some(self.start()),
            // The adapter renders the leaderboard itself via `leaderboard()`
            Command::ShowLeaderboard => None,
        }
    }

    /// Persist the current run into the save slot
    pub fn save(&self) -> Result<(), PersistError> {
        self.slot.save(&SaveData {
            score: self.state.score,
            tick_interval_ms: self.state.tick_interval_ms,
            cells: self.state.snake.cells().collect(),
        })
    }

    /// Replace the current run with the saved one. Food and power-up
    /// are respawned (items are not persisted) and the run resumes
    /// unpaused. On error the current run is left untouched.
    pub fn load(&mut self) -> Result<(), PersistError> {
        let data = self.slot.load()?;
        self.state
            .restore(data.score, data.tick_interval_ms, data.cells);
        self.timer.reset();
        Ok(())
    }

    /// Full ledger for the adapter's leaderboard screen
    pub fn leaderboard(&self) -> Result<Vec<ScoreRecord>, PersistError> {
        self.ledger.records()
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        self.state.snapshot(now)
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Select the boundary policy for subsequent ticks
    pub fn set_wall_pass(&mut self, enabled: bool) {
        self.state.wall_pass = enabled;
    }

    /// Append the finished run to the ledger when it matched or beat
    /// the best known score (best-effort, call-site policy)
    fn record_final_score(&mut self) {
        let score = self.state.score;
        if score == 0 || score < self.state.best_score {
            return;
        }
        let record = ScoreRecord::now(self.player_name.clone(), score);
        if let Err(err) = self.ledger.append(&record) {
            log::warn!("failed to record score {score}: {err}");
        }
    }
}
