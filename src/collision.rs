/// Axis-aligned bounding-box collision between projectiles and targets.

use crate::entities::{GameState, Rect, TickOutcome};

/// Strict AABB overlap. Rectangles that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Player bullets vs alive enemies.
///
/// Each bullet kills at most one enemy (the first alive match in arena
/// order) and is removed on the spot. Returns the number of kills; the
/// score is credited here.
pub fn resolve_player_hits(state: &mut GameState) -> u32 {
    let enemies = &mut state.enemies;
    let mut kills: u32 = 0;

    state.player_bullets.retain(|bullet| {
        match enemies
            .iter_mut()
            .find(|e| e.alive && overlaps(&bullet.rect, &e.rect))
        {
            Some(enemy) => {
                enemy.alive = false;
                kills += 1;
                false
            }
            None => true,
        }
    });

    if kills > 0 {
        let gained = kills.saturating_mul(state.tuning.score_per_kill);
        state.score = state.score.saturating_add(gained);
        log::debug!("{} enemies destroyed, score {}", kills, state.score);
    }
    kills
}

/// Enemy bullets vs the player.
///
/// Every hit costs one life and consumes the bullet. Stops at the hit that
/// takes the last life and reports `PlayerLost`.
pub fn resolve_enemy_hits(state: &mut GameState) -> TickOutcome {
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        if overlaps(&state.enemy_bullets[i].rect, &state.player.rect) {
            state.enemy_bullets.remove(i);
            state.lives = state.lives.saturating_sub(1);
            log::debug!("player hit, {} lives left", state.lives);
            if state.lives == 0 {
                return TickOutcome::PlayerLost;
            }
        } else {
            i += 1;
        }
    }
    TickOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&right, &a));
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&below, &a));
    }

    #[test]
    fn contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 34.0, 20.0);
        let inner = Rect::new(15.0, 4.0, 4.0, 12.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }
}
