/// Held-key tracking for the three logical controls.
///
/// Front-ends translate device events into `press` / `release` calls; the
/// simulation only ever sees the copied `InputState`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::entities::GameStatus;
use crate::session::Game;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
}

impl Key {
    pub const ALL: [Key; 3] = [Key::Left, Key::Right, Key::Fire];
}

/// Flags sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputSampler {
    state: InputState,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events outside `Playing` are dropped, not latched.
    pub fn press(&mut self, key: Key, status: GameStatus) {
        if status == GameStatus::Playing {
            self.set(key, true);
        }
    }

    pub fn release(&mut self, key: Key, status: GameStatus) {
        if status == GameStatus::Playing {
            self.set(key, false);
        }
    }

    pub fn clear(&mut self) {
        self.state = InputState::default();
    }

    pub fn snapshot(&self) -> InputState {
        self.state
    }

    fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Left => self.state.move_left = held,
            Key::Right => self.state.move_right = held,
            Key::Fire => self.state.fire = held,
        }
    }
}

// ── Hold window ───────────────────────────────────────────────────────────────

/// A key counts as held this long after its last press/repeat event. Covers
/// terminals that never report releases: OS key-repeat keeps refreshing the
/// timestamp while the key is down.
pub const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Wall-clock held-key tracker for front-ends whose key events may lack
/// releases. Independent of the host frame rate.
#[derive(Clone, Debug)]
pub struct HeldKeys {
    last_seen: HashMap<Key, Instant>,
    window: Duration,
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::new(HOLD_WINDOW)
    }
}

impl HeldKeys {
    pub fn new(window: Duration) -> Self {
        Self { last_seen: HashMap::new(), window }
    }

    /// Record a press or repeat. Dropped unless `Playing`, so a key that
    /// starts a session is never carried into it.
    pub fn seen(&mut self, key: Key, status: GameStatus, at: Instant) {
        if status == GameStatus::Playing {
            self.last_seen.insert(key, at);
        }
    }

    pub fn released(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn is_held(&self, key: Key, now: Instant) -> bool {
        self.last_seen
            .get(&key)
            .map(|&at| now.saturating_duration_since(at) <= self.window)
            .unwrap_or(false)
    }

    /// Push the current held set into `game` as press/release calls.
    pub fn apply<R: Rng>(&self, game: &mut Game<R>, now: Instant) {
        for key in Key::ALL {
            if self.is_held(key, now) {
                game.press(key);
            } else {
                game.release(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_while_playing() {
        let mut s = InputSampler::new();
        s.press(Key::Left, GameStatus::Playing);
        s.press(Key::Fire, GameStatus::Playing);
        assert_eq!(
            s.snapshot(),
            InputState { move_left: true, move_right: false, fire: true }
        );
        s.release(Key::Left, GameStatus::Playing);
        assert!(!s.snapshot().move_left);
        assert!(s.snapshot().fire);
    }

    #[test]
    fn events_outside_playing_are_ignored() {
        let mut s = InputSampler::new();
        for status in [GameStatus::Menu, GameStatus::GameOver, GameStatus::Win] {
            s.press(Key::Right, status);
            s.press(Key::Fire, status);
        }
        assert_eq!(s.snapshot(), InputState::default());
    }

    #[test]
    fn release_outside_playing_does_not_clear() {
        let mut s = InputSampler::new();
        s.press(Key::Right, GameStatus::Playing);
        s.release(Key::Right, GameStatus::GameOver);
        assert!(s.snapshot().move_right);
    }

    #[test]
    fn hold_window_is_wall_clock() {
        let t0 = Instant::now();
        let mut held = HeldKeys::default();
        held.seen(Key::Left, GameStatus::Playing, t0);
        assert!(held.is_held(Key::Left, t0 + Duration::from_millis(100)));
        assert!(held.is_held(Key::Left, t0 + HOLD_WINDOW));
        assert!(!held.is_held(Key::Left, t0 + Duration::from_millis(200)));
        assert!(!held.is_held(Key::Right, t0));
    }

    #[test]
    fn repeat_refreshes_and_release_drops() {
        let t0 = Instant::now();
        let mut held = HeldKeys::default();
        held.seen(Key::Fire, GameStatus::Playing, t0);
        held.seen(Key::Fire, GameStatus::Playing, t0 + Duration::from_millis(100));
        assert!(held.is_held(Key::Fire, t0 + Duration::from_millis(200)));
        held.released(Key::Fire);
        assert!(!held.is_held(Key::Fire, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn keys_seen_outside_playing_are_dropped() {
        let t0 = Instant::now();
        let mut held = HeldKeys::default();
        for status in [GameStatus::Menu, GameStatus::GameOver, GameStatus::Win] {
            held.seen(Key::Fire, status, t0);
        }
        assert!(!held.is_held(Key::Fire, t0));
    }
}
