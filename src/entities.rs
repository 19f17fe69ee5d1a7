/// All game entity types — pure data, no logic.
///
/// Coordinates are logical field units (the field is 480×640 by default),
/// origin top-left, y growing downward.

use crate::tuning::Tuning;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    GameOver,
    Win,
}

impl GameStatus {
    /// `GameOver` and `Win` only leave through an explicit restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Win)
    }
}

/// What a single tick did to the session as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    PlayerLost,
    PlayerWon,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A projectile. Direction is implied by the collection it lives in:
/// `player_bullets` travel up, `enemy_bullets` travel down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal speed in units per normalized frame.
    pub speed: f32,
    /// Frames until the next shot is allowed; fires when `<= 0`.
    pub cooldown: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    /// Dead enemies stay in the arena as tombstones until the next reset.
    pub alive: bool,
    /// Cosmetic only (the grid row, 0..=3).
    pub variant: u8,
}

/// Shared movement state of the enemy grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    /// +1 moving right, -1 moving left.
    pub direction: f32,
    pub speed_x: f32,
    pub down_step: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session. One value per game; nothing lives in statics so
/// several sessions (or tests) can run side by side.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Fixed-size arena in canonical rows×cols order.
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub formation: Formation,
    pub score: u32,
    pub lives: u32,
    pub status: GameStatus,
    /// Ticks advanced in the current session.
    pub frame: u64,
    pub tuning: Tuning,
}

impl GameState {
    pub fn width(&self) -> f32 {
        self.tuning.field_width
    }

    pub fn height(&self) -> f32 {
        self.tuning.field_height
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_enemies().count()
    }
}
