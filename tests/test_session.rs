use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::entities::*;
use std::time::{Duration, Instant};

use space_invaders::input::{HeldKeys, Key};
use space_invaders::{Game, Tuning};

fn quiet_game() -> Game<StdRng> {
    let tuning = Tuning { enemy_fire_chance: 0.0, ..Tuning::default() };
    Game::new(tuning, StdRng::seed_from_u64(42))
}

fn playing_game() -> Game<StdRng> {
    let mut g = quiet_game();
    assert!(g.start());
    g
}

/// Drop an enemy bullet right on top of the player.
fn shoot_player(g: &mut Game<StdRng>) {
    let p = g.state().player.rect;
    g.state_mut().enemy_bullets.push(Bullet {
        rect: Rect::new(p.x + 10.0, p.y, 4.0, 12.0),
    });
}

/// Put one player bullet inside every alive enemy of `row`.
fn volley_at_row(g: &mut Game<StdRng>, row: usize) {
    let cols = g.state().tuning.enemy_cols;
    let targets: Vec<Rect> = g.state().enemies[row * cols..(row + 1) * cols]
        .iter()
        .filter(|e| e.alive)
        .map(|e| e.rect)
        .collect();
    for t in targets {
        g.state_mut().player_bullets.push(Bullet {
            rect: Rect::new(t.center_x() - 2.0, t.y + 12.0, 4.0, 12.0),
        });
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn starts_in_menu_and_does_not_simulate() {
    let mut g = quiet_game();
    assert_eq!(g.status(), GameStatus::Menu);
    let before = g.state().enemies.clone();
    for _ in 0..10 {
        assert_eq!(g.tick(1.0), TickOutcome::Continue);
    }
    assert_eq!(g.state().enemies, before);
    assert_eq!(g.state().frame, 0);
}

#[test]
fn start_only_from_menu() {
    let mut g = quiet_game();
    assert!(!g.restart());
    assert_eq!(g.status(), GameStatus::Menu);
    assert!(g.start());
    assert_eq!(g.status(), GameStatus::Playing);
    assert!(!g.start());
    assert!(!g.restart());
}

#[test]
fn playing_advances_each_frame() {
    let mut g = playing_game();
    g.frame(16.67);
    g.frame(0.0);
    assert_eq!(g.state().frame, 2);
}

// ── Input gating ──────────────────────────────────────────────────────────────

#[test]
fn keys_in_menu_are_not_latched() {
    let mut g = quiet_game();
    g.press(Key::Left);
    g.press(Key::Fire);
    g.start();
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 220.0);
    assert!(g.state().player_bullets.is_empty());
}

#[test]
fn start_key_does_not_carry_into_play() {
    let mut g = quiet_game();
    let mut held = HeldKeys::default();
    let t0 = Instant::now();

    // Space both starts the game and is the fire key.
    held.seen(Key::Fire, g.status(), t0);
    assert!(g.start());
    held.apply(&mut g, t0);
    g.tick(1.0);
    assert!(g.state().player_bullets.is_empty());
}

#[test]
fn keys_held_on_game_over_do_not_leak_into_restart() {
    let mut g = playing_game();
    let mut held = HeldKeys::default();
    let t0 = Instant::now();
    g.state_mut().lives = 1;
    shoot_player(&mut g);
    g.tick(1.0);
    assert_eq!(g.status(), GameStatus::GameOver);

    held.seen(Key::Left, g.status(), t0);
    assert!(g.restart());
    held.apply(&mut g, t0);
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 220.0);
}

#[test]
fn held_keys_expire_after_the_hold_window() {
    let mut g = playing_game();
    let mut held = HeldKeys::default();
    let t0 = Instant::now();

    held.seen(Key::Right, g.status(), t0);
    held.apply(&mut g, t0 + Duration::from_millis(50));
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 225.0);

    held.apply(&mut g, t0 + Duration::from_millis(500));
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 225.0);
}

#[test]
fn held_keys_drive_the_player() {
    let mut g = playing_game();
    g.press(Key::Right);
    g.press(Key::Fire);
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 225.0);
    assert_eq!(g.state().player_bullets.len(), 1);

    g.release(Key::Right);
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 225.0);
}

// ── End-to-end ────────────────────────────────────────────────────────────────

#[test]
fn clearing_the_formation_wins_with_640() {
    let mut g = playing_game();
    assert_eq!(g.state().alive_count(), 32);

    // Bottom row first, one row per tick.
    for row in (0..4).rev() {
        volley_at_row(&mut g, row);
        let outcome = g.tick(1.0);
        if row > 0 {
            assert_eq!(outcome, TickOutcome::Continue);
            assert_eq!(g.status(), GameStatus::Playing);
        } else {
            assert_eq!(outcome, TickOutcome::PlayerWon);
        }
    }

    assert_eq!(g.status(), GameStatus::Win);
    assert_eq!(g.state().score, 640);
    assert_eq!(g.state().alive_count(), 0);
    // Tombstones stay in the arena.
    assert_eq!(g.state().enemies.len(), 32);

    // Terminal states do not simulate.
    let frame = g.state().frame;
    g.tick(1.0);
    assert_eq!(g.state().frame, frame);
}

#[test]
fn three_hits_is_game_over() {
    let mut g = playing_game();
    for expected in [2, 1] {
        shoot_player(&mut g);
        assert_eq!(g.tick(1.0), TickOutcome::Continue);
        assert_eq!(g.state().lives, expected);
        assert_eq!(g.status(), GameStatus::Playing);
    }
    shoot_player(&mut g);
    assert_eq!(g.tick(1.0), TickOutcome::PlayerLost);
    assert_eq!(g.status(), GameStatus::GameOver);
    assert_eq!(g.state().lives, 0);
}

#[test]
fn invasion_is_game_over_regardless_of_lives() {
    let mut g = playing_game();
    let player_y = g.state().player.rect.y;
    for e in g.state_mut().enemies.iter_mut() {
        e.rect.y = player_y - 10.0;
    }
    assert_eq!(g.state().lives, 3);
    assert_eq!(g.tick(1.0), TickOutcome::PlayerLost);
    assert_eq!(g.status(), GameStatus::GameOver);
    assert_eq!(g.state().lives, 0);
}

#[test]
fn formation_eventually_invades_an_idle_player() {
    let mut g = playing_game();
    let mut ticks = 0;
    while g.status() == GameStatus::Playing {
        g.tick(2.0);
        ticks += 1;
        assert!(ticks < 10_000, "formation never arrived");
    }
    assert_eq!(g.status(), GameStatus::GameOver);
    assert_eq!(g.state().lives, 0);
}

#[test]
fn restart_after_game_over_resets_everything() {
    let mut g = playing_game();
    g.press(Key::Left);
    g.press(Key::Fire);
    for _ in 0..20 {
        g.tick(1.0);
    }
    volley_at_row(&mut g, 3);
    g.tick(1.0);
    assert!(g.state().score > 0);

    g.state_mut().lives = 1;
    shoot_player(&mut g);
    g.tick(1.0);
    assert_eq!(g.status(), GameStatus::GameOver);

    // Input is dead until the restart.
    g.press(Key::Right);

    assert!(g.restart());
    let s = g.state();
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.alive_count(), 32);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 3);
    assert!(s.player_bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.player.rect.x, 220.0);
    assert_eq!(s.formation.direction, 1.0);
    assert_eq!(s.formation.speed_x, 1.1);

    // Held keys from the previous session were cleared.
    g.tick(1.0);
    assert_eq!(g.state().player.rect.x, 220.0);
    assert!(g.state().player_bullets.is_empty());
}

#[test]
fn restart_after_win() {
    let mut g = playing_game();
    for row in (0..4).rev() {
        volley_at_row(&mut g, row);
        g.tick(1.0);
    }
    assert_eq!(g.status(), GameStatus::Win);
    assert!(g.restart());
    assert_eq!(g.state().alive_count(), 32);
    assert_eq!(g.state().score, 0);
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[test]
fn snapshot_lists_alive_enemies_in_order() {
    let mut g = playing_game();
    g.state_mut().enemies[0].alive = false;
    g.state_mut().enemies[9].alive = false;
    shoot_player(&mut g);

    let snap = g.snapshot();
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.enemies.len(), 30);
    assert_eq!(snap.enemies[0].rect, g.state().enemies[1].rect);
    assert_eq!(snap.enemies[29].variant, 3);
    assert_eq!(snap.enemy_bullets.len(), 1);
    assert_eq!((snap.score, snap.lives), (0, 3));
    assert_eq!((snap.width, snap.height), (480.0, 640.0));
}

#[test]
fn seeded_games_match() {
    let run = || {
        let mut g = Game::new(Tuning::default(), StdRng::seed_from_u64(2024));
        g.start();
        g.press(Key::Fire);
        for _ in 0..400 {
            if g.tick(1.0) != TickOutcome::Continue {
                break;
            }
        }
        (g.state().score, g.state().lives, g.state().enemy_bullets.clone())
    };
    assert_eq!(run(), run());
}
