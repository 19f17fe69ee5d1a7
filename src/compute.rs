/// Game-logic functions.
///
/// `advance` moves a session forward by one tick in place. All randomness
/// comes through the injected RNG so callers control determinism (tests use
/// a seeded `StdRng`).

use rand::Rng;

use crate::collision::{resolve_enemy_hits, resolve_player_hits};
use crate::entities::{
    Bullet, Enemy, Formation, GameState, GameStatus, Player, Rect, TickOutcome,
};
use crate::input::InputState;
use crate::tuning::Tuning;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh session sitting in the menu, entities already in their start
/// layout.
pub fn new_state(tuning: Tuning) -> GameState {
    GameState {
        player: spawn_player(&tuning),
        enemies: spawn_grid(&tuning),
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        formation: spawn_formation(&tuning),
        score: 0,
        lives: tuning.starting_lives,
        status: GameStatus::Menu,
        frame: 0,
        tuning,
    }
}

/// Put every entity and counter back to its start value. Does not touch
/// `status`; the state machine owns that.
pub fn reset(state: &mut GameState) {
    let tuning = state.tuning;
    state.player = spawn_player(&tuning);
    state.enemies = spawn_grid(&tuning);
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    state.formation = spawn_formation(&tuning);
    state.score = 0;
    state.lives = tuning.starting_lives;
    state.frame = 0;
}

fn spawn_player(t: &Tuning) -> Player {
    Player {
        rect: Rect::new(t.player_start_x(), t.player_y(), t.player_width, t.player_height),
        speed: t.player_speed,
        cooldown: 0.0,
    }
}

/// Canonical rows×cols layout, row-major. The row doubles as the variant.
fn spawn_grid(t: &Tuning) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(t.enemy_count());
    for row in 0..t.enemy_rows {
        for col in 0..t.enemy_cols {
            enemies.push(Enemy {
                rect: Rect::new(
                    t.enemy_origin_x + col as f32 * (t.enemy_width + t.enemy_padding_x),
                    t.enemy_origin_y + row as f32 * (t.enemy_height + t.enemy_padding_y),
                    t.enemy_width,
                    t.enemy_height,
                ),
                alive: true,
                variant: (row % 4) as u8,
            });
        }
    }
    enemies
}

fn spawn_formation(t: &Tuning) -> Formation {
    Formation {
        direction: 1.0,
        speed_x: t.formation_speed,
        down_step: t.formation_down_step,
    }
}

// ── Time step ────────────────────────────────────────────────────────────────

/// Normalize a host frame interval into a `dt` multiplier.
///
/// Zero, negative or non-finite intervals count as one nominal frame; long
/// stalls are capped at `max_dt`.
pub fn frame_dt(elapsed_ms: f32, tuning: &Tuning) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / tuning.frame_ms).min(tuning.max_dt)
}

/// Clamp a caller-supplied `dt` into `(0, max_dt]`.
fn sanitize_dt(dt: f32, tuning: &Tuning) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        1.0
    } else {
        dt.min(tuning.max_dt)
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Phases run in a fixed order; a `PlayerLost` or `PlayerWon` outcome ends
/// the tick immediately. The caller applies the status transition.
pub fn advance(
    state: &mut GameState,
    input: &InputState,
    dt: f32,
    rng: &mut impl Rng,
) -> TickOutcome {
    let dt = sanitize_dt(dt, &state.tuning);
    state.frame += 1;

    // ── 1. Player movement ───────────────────────────────────────────────────
    move_player(state, input, dt);

    // ── 2. Player fire + cooldown ────────────────────────────────────────────
    player_fire(state, input, dt);

    // ── 3. Player bullets ────────────────────────────────────────────────────
    let bullet_step = state.tuning.bullet_speed * dt;
    for b in &mut state.player_bullets {
        b.rect.y -= bullet_step;
    }
    state.player_bullets.retain(|b| b.rect.bottom() > 0.0);

    // ── 4-5. Formation ───────────────────────────────────────────────────────
    move_formation(state, dt);

    // ── 6. Enemy fire ────────────────────────────────────────────────────────
    enemy_fire(state, rng);

    // ── 7. Enemy bullets ─────────────────────────────────────────────────────
    let enemy_step = state.tuning.enemy_bullet_speed * dt;
    let floor = state.height() + state.tuning.enemy_bullet_slack;
    for b in &mut state.enemy_bullets {
        b.rect.y += enemy_step;
    }
    state.enemy_bullets.retain(|b| b.rect.y < floor);

    // ── 8. Player bullets ↔ enemies ──────────────────────────────────────────
    resolve_player_hits(state);

    // ── 9. Enemy bullets ↔ player ────────────────────────────────────────────
    if resolve_enemy_hits(state) == TickOutcome::PlayerLost {
        return TickOutcome::PlayerLost;
    }

    // ── 10. Formation reached the player ─────────────────────────────────────
    let player_y = state.player.rect.y;
    if state.alive_enemies().any(|e| e.rect.bottom() >= player_y) {
        state.lives = 0;
        log::debug!("formation reached the player line");
        return TickOutcome::PlayerLost;
    }

    // ── 11. Win ──────────────────────────────────────────────────────────────
    if state.alive_count() == 0 {
        return TickOutcome::PlayerWon;
    }

    TickOutcome::Continue
}

fn move_player(state: &mut GameState, input: &InputState, dt: f32) {
    let max_x = state.width() - state.player.rect.w;
    let step = state.player.speed * dt;
    let p = &mut state.player.rect;
    if input.move_left {
        p.x -= step;
    }
    if input.move_right {
        p.x += step;
    }
    p.x = p.x.clamp(0.0, max_x.max(0.0));
}

fn player_fire(state: &mut GameState, input: &InputState, dt: f32) {
    let t = &state.tuning;
    let player = &mut state.player;
    if input.fire && player.cooldown <= 0.0 {
        state.player_bullets.push(Bullet {
            rect: Rect::new(
                player.rect.center_x() - t.bullet_width / 2.0,
                player.rect.y - t.bullet_spawn_offset,
                t.bullet_width,
                t.bullet_height,
            ),
        });
        player.cooldown = t.fire_cooldown;
    }
    if player.cooldown > 0.0 {
        player.cooldown -= dt;
    }
}

/// Slide the alive enemies and bounce the whole formation off the margins.
/// Returns `true` when this tick bounced.
pub fn move_formation(state: &mut GameState, dt: f32) -> bool {
    let width = state.width();
    let margin = state.tuning.formation_margin;
    let step = state.formation.speed_x * state.formation.direction * dt;

    let mut left_most = width;
    let mut right_most = 0.0_f32;
    for e in state.enemies.iter_mut().filter(|e| e.alive) {
        e.rect.x += step;
        left_most = left_most.min(e.rect.x);
        right_most = right_most.max(e.rect.right());
    }

    if left_most < margin || right_most > width - margin {
        let down = state.formation.down_step;
        state.formation.direction = -state.formation.direction;
        for e in state.enemies.iter_mut().filter(|e| e.alive) {
            e.rect.y += down;
        }
        state.formation.speed_x *= state.tuning.formation_speed_growth;
        log::debug!(
            "formation bounced, direction {} speed {:.3}",
            state.formation.direction,
            state.formation.speed_x
        );
        return true;
    }
    false
}

/// Only the bottom-most alive enemy in its column may shoot. Columns are
/// identified by exact x, which formation movement keeps aligned.
pub fn fire_eligible(state: &GameState, index: usize) -> bool {
    let Some(me) = state.enemies.get(index) else {
        return false;
    };
    if !me.alive {
        return false;
    }
    !state
        .enemies
        .iter()
        .enumerate()
        .any(|(i, other)| i != index && other.alive && other.rect.x == me.rect.x && other.rect.y > me.rect.y)
}

fn enemy_fire(state: &mut GameState, rng: &mut impl Rng) {
    let t = state.tuning;
    for i in 0..state.enemies.len() {
        if !fire_eligible(state, i) {
            continue;
        }
        if rng.gen_bool(t.enemy_fire_chance) {
            let e = &state.enemies[i].rect;
            state.enemy_bullets.push(Bullet {
                rect: Rect::new(
                    e.center_x() - t.bullet_width / 2.0,
                    e.bottom(),
                    t.bullet_width,
                    t.bullet_height,
                ),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_dt_normalizes_and_caps() {
        let t = Tuning::default();
        assert_eq!(frame_dt(0.0, &t), 1.0);
        assert_eq!(frame_dt(-5.0, &t), 1.0);
        assert_eq!(frame_dt(f32::NAN, &t), 1.0);
        assert_eq!(frame_dt(1000.0, &t), 2.0);
        assert!((frame_dt(16.67, &t) - 1.0).abs() < 1e-6);
        assert!((frame_dt(8.335, &t) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn sanitize_dt_clamps_out_of_range() {
        let t = Tuning::default();
        assert_eq!(sanitize_dt(0.0, &t), 1.0);
        assert_eq!(sanitize_dt(f32::INFINITY, &t), 1.0);
        assert_eq!(sanitize_dt(7.0, &t), 2.0);
        assert_eq!(sanitize_dt(0.25, &t), 0.25);
    }

    #[test]
    fn grid_is_row_major_with_row_variants() {
        let grid = spawn_grid(&Tuning::default());
        assert_eq!(grid.len(), 32);
        assert_eq!(grid[0].rect, Rect::new(40.0, 60.0, 34.0, 20.0));
        assert_eq!(grid[1].rect.x, 92.0);
        assert_eq!(grid[8].rect.y, 98.0);
        assert_eq!(grid[31].variant, 3);
    }
}
