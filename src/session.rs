//! Frame scheduling around the simulation
//!
//! The platform calls [`Session::frame`] once per display refresh with an
//! absolute timestamp. The session turns that into a clamped frame time,
//! runs the simulation while it is live and reports to its observer.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::{Arena, GameEvent, GamePhase, GameState, TickInput, UiSnapshot, tick};

/// Presentation side of a session: HUD, audio cues, game-over screen
pub trait SessionObserver {
    /// Everything that happened this frame, in order
    fn on_events(&mut self, _events: &[GameEvent]) {}

    /// Called after every simulated frame
    fn on_snapshot(&mut self, snapshot: &UiSnapshot);

    /// Called exactly once per session, after the post-hit grace period
    fn on_game_over(&mut self, score: u64);
}

/// Observer that ignores everything
impl SessionObserver for () {
    fn on_snapshot(&mut self, _snapshot: &UiSnapshot) {}
    fn on_game_over(&mut self, _score: u64) {}
}

pub struct Session<O: SessionObserver> {
    state: GameState,
    rng: Pcg32,
    /// Timestamp of the previous frame; `None` until the first frame
    last_timestamp: Option<f64>,
    observer: O,
}

impl<O: SessionObserver> Session<O> {
    pub fn new(seed: u64, width: f32, height: f32, ui_inset: f32, observer: O) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(seed, Arena::new(width, height, ui_inset), &mut rng);
        Self {
            state,
            rng,
            last_timestamp: None,
            observer,
        }
    }

    /// Per-display-refresh entry point.
    ///
    /// The first call only starts the clock. Frame time is capped at
    /// `MAX_FRAME_MS`; a timestamp going backwards counts as no time.
    pub fn frame(&mut self, timestamp_ms: f64, input: &TickInput) {
        let Some(last) = self.last_timestamp.replace(timestamp_ms) else {
            return;
        };
        self.step((timestamp_ms - last) as f32, input);
    }

    /// Advance by an explicit frame time, clamped to `0..=MAX_FRAME_MS`
    pub fn step(&mut self, dt_ms: f32, input: &TickInput) {
        let dt_ms = if dt_ms.is_nan() {
            0.0
        } else {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        };
        match self.state.phase {
            GamePhase::Playing => {
                if let Some(outcome) = tick(&mut self.state, input, dt_ms, &mut self.rng) {
                    if !outcome.events.is_empty() {
                        self.observer.on_events(&outcome.events);
                    }
                    self.observer.on_snapshot(&outcome.snapshot);
                }
            }
            GamePhase::Ending { remaining_ms } => {
                let remaining_ms = remaining_ms - dt_ms;
                if remaining_ms > 0.0 {
                    self.state.phase = GamePhase::Ending { remaining_ms };
                } else {
                    self.state.phase = GamePhase::GameOver;
                    let score = self.state.display_score();
                    log::info!(
                        "Game over: {} points, wave {}, {} ms survived",
                        score,
                        self.state.wave,
                        self.state.elapsed_ms as u64
                    );
                    self.observer.on_events(&[GameEvent::GameOver { score }]);
                    self.observer.on_game_over(score);
                }
            }
            GamePhase::GameOver => {}
        }
    }

    /// "Play again": fresh session on the same arena
    pub fn restart(&mut self, seed: u64) {
        let arena = &self.state.arena;
        let arena = Arena::new(arena.width, arena.height, arena.ui_inset);
        self.rng = Pcg32::seed_from_u64(seed);
        self.state = GameState::new(seed, arena, &mut self.rng);
        self.last_timestamp = None;
    }

    /// Canvas changed size; entities are pulled back in bounds by their
    /// next update
    pub fn resize(&mut self, width: f32, height: f32, ui_inset: f32) {
        self.state.arena.resize(width, height, ui_inset);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }
}
