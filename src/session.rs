/// Session state machine: `Menu → Playing → (GameOver | Win) → Playing`.
///
/// `Game` is the only mutator of a session. A front-end feeds it input
/// events and frame intervals, then renders `snapshot()`; the snapshot is
/// always taken between ticks.

use rand::Rng;

use crate::compute::{advance, frame_dt, new_state, reset};
use crate::entities::{GameState, GameStatus, TickOutcome};
use crate::input::{InputSampler, Key};
use crate::render::Snapshot;
use crate::tuning::Tuning;

pub struct Game<R: Rng> {
    state: GameState,
    input: InputSampler,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            state: new_state(tuning),
            input: InputSampler::new(),
            rng,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tests and tooling that need to stage a scenario.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Menu → Playing. Returns `false` (and does nothing) from any other
    /// state.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::Menu {
            return false;
        }
        self.begin();
        log::info!("game started");
        true
    }

    /// GameOver | Win → Playing. Returns `false` (and does nothing) from any
    /// other state.
    pub fn restart(&mut self) -> bool {
        if !self.state.status.is_terminal() {
            return false;
        }
        self.begin();
        log::info!("game restarted");
        true
    }

    fn begin(&mut self) {
        reset(&mut self.state);
        self.input.clear();
        self.state.status = GameStatus::Playing;
    }

    pub fn press(&mut self, key: Key) {
        self.input.press(key, self.state.status);
    }

    pub fn release(&mut self, key: Key) {
        self.input.release(key, self.state.status);
    }

    /// Run one frame given the host's elapsed time since the previous frame.
    pub fn frame(&mut self, elapsed_ms: f32) -> TickOutcome {
        let dt = frame_dt(elapsed_ms, &self.state.tuning);
        self.tick(dt)
    }

    /// Run one tick with an explicit `dt`. Only `Playing` advances the
    /// simulation; every other state returns `Continue` untouched.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.state.status != GameStatus::Playing {
            return TickOutcome::Continue;
        }
        let input = self.input.snapshot();
        let outcome = advance(&mut self.state, &input, dt, &mut self.rng);
        match outcome {
            TickOutcome::Continue => {}
            TickOutcome::PlayerLost => {
                self.state.status = GameStatus::GameOver;
                log::info!(
                    "game over after {} ticks, score {}",
                    self.state.frame,
                    self.state.score
                );
            }
            TickOutcome::PlayerWon => {
                self.state.status = GameStatus::Win;
                log::info!(
                    "formation cleared after {} ticks, score {}",
                    self.state.frame,
                    self.state.score
                );
            }
        }
        outcome
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }
}
