/// Renderer contract and cosmetic sprite skins.
///
/// Nothing here feeds back into the simulation. A front-end takes a
/// `Snapshot`, optionally turns it into `DrawOp`s with `frame_ops`, and
/// puts pixels (or terminal cells) on screen.

use std::str::FromStr;

use crate::config::ConfigError;
use crate::entities::{Bullet, GameState, GameStatus, Rect};

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyView {
    pub rect: Rect,
    pub variant: u8,
}

/// Read-only view of a session between ticks.
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub score: u32,
    pub lives: u32,
    pub width: f32,
    pub height: f32,
    pub player: Rect,
    /// The ship's own colour; the neon skin paints with it, classic ignores it.
    pub player_color: Rgb,
    /// Alive enemies only, in arena order.
    pub enemies: Vec<EnemyView>,
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Snapshot {
            status: state.status,
            score: state.score,
            lives: state.lives,
            width: state.width(),
            height: state.height(),
            player: state.player.rect,
            player_color: PLAYER_COLOR,
            enemies: state
                .alive_enemies()
                .map(|e| EnemyView { rect: e.rect, variant: e.variant })
                .collect(),
            player_bullets: &state.player_bullets,
            enemy_bullets: &state.enemy_bullets,
        }
    }
}

pub trait Renderer {
    type Error;

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Self::Error>;
}

// ── Draw instructions ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend toward black, as if drawn at `alpha` over an empty background.
    pub fn dim(self, alpha: f32) -> Rgb {
        let f = |c: u8| (c as f32 * alpha).round() as u8;
        Rgb(f(self.0), f(self.1), f(self.2))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Rgb },
}

impl DrawOp {
    pub fn recolored(self, color: Rgb) -> DrawOp {
        match self {
            DrawOp::FillRect { rect, .. } => DrawOp::FillRect { rect, color },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Skin {
    /// Glowing cyan ship, rainbow rows, starfield.
    #[default]
    Neon,
    /// Monochrome phosphor look.
    Classic,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Neon => "neon",
            Skin::Classic => "classic",
        }
    }
}

impl FromStr for Skin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neon" => Ok(Skin::Neon),
            "classic" | "retro" => Ok(Skin::Classic),
            _ => Err(ConfigError::UnknownSkin(s.to_string())),
        }
    }
}

// ── Palettes ──────────────────────────────────────────────────────────────────

/// Player ship colour carried by every snapshot.
pub const PLAYER_COLOR: Rgb = Rgb(0x00, 0xff, 0xff);

const NEON_PLAYER: Rgb = PLAYER_COLOR;
const NEON_ROWS: [Rgb; 4] = [
    Rgb(0xff, 0xff, 0x00),
    Rgb(0x00, 0xff, 0x00),
    Rgb(0xff, 0x00, 0xff),
    Rgb(0xff, 0x44, 0x44),
];
const NEON_EYES: Rgb = Rgb(0x22, 0x22, 0x22);
const NEON_PLAYER_BULLET: Rgb = Rgb(0xff, 0xff, 0xff);
const NEON_ENEMY_BULLET: Rgb = Rgb(0xff, 0xff, 0x00);
const NEON_STARS: [Rgb; 3] = [
    Rgb(0xff, 0xff, 0xff),
    Rgb(0x00, 0xff, 0xff),
    Rgb(0x00, 0xaa, 0xff),
];
const STAR_ALPHA: f32 = 0.14;

const CLASSIC_GREEN: Rgb = Rgb(0x33, 0xff, 0x33);
const CLASSIC_ROWS: [Rgb; 4] = [
    Rgb(0xff, 0xff, 0xff),
    Rgb(0xdd, 0xdd, 0xdd),
    Rgb(0xbb, 0xbb, 0xbb),
    Rgb(0x99, 0x99, 0x99),
];

fn fill(x: f32, y: f32, w: f32, h: f32, color: Rgb) -> DrawOp {
    DrawOp::FillRect { rect: Rect::new(x, y, w, h), color }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Draw instructions for one entity. Pure: same inputs, same output.
pub fn sprite(skin: Skin, kind: SpriteKind, variant: u8, r: Rect) -> Vec<DrawOp> {
    match skin {
        Skin::Neon => neon_sprite(kind, variant, r),
        Skin::Classic => classic_sprite(kind, variant, r),
    }
}

fn neon_sprite(kind: SpriteKind, variant: u8, r: Rect) -> Vec<DrawOp> {
    match kind {
        SpriteKind::Player => {
            // Body plus a stepped dome on top.
            let dome = r.w / 3.0;
            vec![
                fill(r.x, r.y, r.w, r.h, NEON_PLAYER),
                fill(r.center_x() - dome, r.y - dome / 2.0, dome * 2.0, dome / 2.0, NEON_PLAYER),
                fill(r.center_x() - dome / 2.0, r.y - dome, dome, dome / 2.0, NEON_PLAYER),
            ]
        }
        SpriteKind::Enemy => {
            let color = NEON_ROWS[(variant % 4) as usize];
            vec![
                fill(r.x, r.y, r.w, r.h / 2.0, color),
                fill(r.x + 4.0, r.y + r.h / 2.0, r.w - 8.0, r.h / 2.0 - 5.0, color),
                fill(r.x + 6.0, r.y + 5.0, 6.0, 4.0, NEON_EYES),
                fill(r.right() - 12.0, r.y + 5.0, 6.0, 4.0, NEON_EYES),
            ]
        }
        SpriteKind::PlayerBullet => vec![fill(r.x, r.y, r.w, r.h, NEON_PLAYER_BULLET)],
        SpriteKind::EnemyBullet => vec![fill(r.x, r.y, r.w, r.h, NEON_ENEMY_BULLET)],
    }
}

fn classic_sprite(kind: SpriteKind, variant: u8, r: Rect) -> Vec<DrawOp> {
    match kind {
        SpriteKind::Player => {
            // Flat base with a narrow turret.
            let turret = r.w / 5.0;
            vec![
                fill(r.x, r.y + r.h / 3.0, r.w, r.h * 2.0 / 3.0, CLASSIC_GREEN),
                fill(r.center_x() - turret / 2.0, r.y, turret, r.h / 3.0, CLASSIC_GREEN),
            ]
        }
        SpriteKind::Enemy => {
            let color = CLASSIC_ROWS[(variant % 4) as usize];
            let qw = r.w / 4.0;
            let qh = r.h / 4.0;
            vec![
                fill(r.x + qw, r.y, qw * 2.0, qh, color),
                fill(r.x, r.y + qh, r.w, qh * 2.0, color),
                fill(r.x, r.y + qh * 3.0, qw, qh, color),
                fill(r.right() - qw, r.y + qh * 3.0, qw, qh, color),
            ]
        }
        SpriteKind::PlayerBullet => vec![fill(r.x, r.y, r.w, r.h, CLASSIC_GREEN)],
        SpriteKind::EnemyBullet => vec![fill(r.x, r.y, r.w, r.h, CLASSIC_ROWS[0])],
    }
}

/// The fixed 50-star background: `(x, y, radius, colour)`.
pub fn starfield(width: f32, height: f32) -> Vec<(f32, f32, f32, Rgb)> {
    let (w, h) = (width.max(1.0) as u32, height.max(1.0) as u32);
    (0..50u32)
        .map(|i| {
            let x = ((i * 97) % w) as f32;
            let y = ((i * 151) % h) as f32;
            let radius = (1 + i % 2) as f32;
            (x, y, radius, NEON_STARS[(i % 3) as usize].dim(STAR_ALPHA))
        })
        .collect()
}

/// Every draw instruction for one frame, back to front.
pub fn frame_ops(snapshot: &Snapshot<'_>, skin: Skin) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    if skin == Skin::Neon {
        for (x, y, radius, color) in starfield(snapshot.width, snapshot.height) {
            ops.push(fill(x - radius, y - radius, radius * 2.0, radius * 2.0, color));
        }
    }

    let player = sprite(skin, SpriteKind::Player, 0, snapshot.player);
    match skin {
        Skin::Neon => ops.extend(player.into_iter().map(|op| op.recolored(snapshot.player_color))),
        Skin::Classic => ops.extend(player),
    }
    for b in snapshot.player_bullets {
        ops.extend(sprite(skin, SpriteKind::PlayerBullet, 0, b.rect));
    }
    for e in &snapshot.enemies {
        ops.extend(sprite(skin, SpriteKind::Enemy, e.variant, e.rect));
    }
    for b in snapshot.enemy_bullets {
        ops.extend(sprite(skin, SpriteKind::EnemyBullet, 0, b.rect));
    }
    ops
}
