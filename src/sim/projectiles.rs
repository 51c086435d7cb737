//! Bullets: spawn, move, hit, expire

use glam::Vec2;

use super::geom::touching;
use super::interact;
use super::state::{Owner, Projectile, WorldState};
use crate::consts::*;

/// Fire a bullet from `pos` along `angle` (radians, screen space)
pub fn spawn(state: &mut WorldState, pos: Vec2, angle: f32, speed: f32, owner: Owner) {
    let size = match owner {
        Owner::Player => PLAYER_SHOT_SIZE,
        Owner::Enemy => ENEMY_SHOT_SIZE,
    };
    state.projectiles.push(Projectile {
        pos,
        vel: Vec2::new(angle.cos(), angle.sin()) * speed,
        size,
        owner,
        active: true,
    });
}

/// Move every bullet, resolve hits, and drop spent or off-level ones
///
/// Enemy bullets only test the player. Player bullets stop at the first enemy
/// they touch.
pub fn update(state: &mut WorldState) {
    for i in 0..state.projectiles.len() {
        let vel = state.projectiles[i].vel;
        state.projectiles[i].pos += vel;

        if !state.projectiles[i].active {
            continue;
        }

        let owner = state.projectiles[i].owner;
        match owner {
            Owner::Enemy => {
                if touching(&state.projectiles[i], &state.player) {
                    state.projectiles[i].active = false;
                    if !state.player.invulnerable {
                        interact::player_hit(state);
                    }
                }
            }
            Owner::Player => {
                let target = state
                    .enemies
                    .iter()
                    .find(|e| touching(&state.projectiles[i], *e))
                    .map(|e| e.id);
                if let Some(enemy_id) = target {
                    state.projectiles[i].active = false;
                    if interact::defeat_enemy(state, enemy_id).is_some() {
                        interact::check_level_completion(state);
                    }
                }
            }
        }
    }

    let level_width = state.config.level_width;
    let height = state.config.viewport_height;
    state.projectiles.retain(|p| {
        p.active && p.pos.x >= 0.0 && p.pos.x <= level_width && p.pos.y >= 0.0 && p.pos.y <= height
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, WeaponId};
    use crate::sim::state::{Enemy, EnemyBehavior, Patrol, Transition};

    fn empty_world() -> WorldState {
        let mut state = WorldState::new(GameConfig::default(), 3).unwrap();
        state.enemies.clear();
        state.projectiles.clear();
        state.player.invulnerable = false;
        state
    }

    fn platform_enemy(state: &mut WorldState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            speed: 0.0,
            direction: 1.0,
            patrol: Patrol {
                start: pos.x - 100.0,
                end: pos.x + 100.0,
            },
            armed: false,
            weapon: WeaponId::EnemyGun,
            attack_cooldown: 120,
            last_attack_tick: None,
            behavior: EnemyBehavior::Platform {
                platform_y: pos.y,
                edge_margin: EDGE_MARGIN,
            },
        });
        id
    }

    #[test]
    fn test_projectile_moves_in_straight_line() {
        let mut state = empty_world();
        spawn(&mut state, Vec2::new(1000.0, 200.0), 0.0, 10.0, Owner::Player);
        update(&mut state);
        update(&mut state);
        let p = &state.projectiles[0];
        assert!((p.pos.x - 1020.0).abs() < 1e-4);
        assert!((p.pos.y - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_projectile_discarded_off_level() {
        let mut state = empty_world();
        spawn(&mut state, Vec2::new(5.0, 200.0), std::f32::consts::PI, 10.0, Owner::Player);
        spawn(&mut state, Vec2::new(500.0, 595.0), std::f32::consts::FRAC_PI_2, 10.0, Owner::Player);
        update(&mut state);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_projectile_ignores_enemies() {
        let mut state = empty_world();
        state.player.pos = Vec2::new(50.0, 100.0);
        spawn(&mut state, Vec2::new(2000.0, 300.0), 0.0, 6.0, Owner::Enemy);
        update(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].is_enemy());
        assert_eq!(state.projectiles[0].size, ENEMY_SHOT_SIZE);
    }

    #[test]
    fn test_player_bullet_defeats_enemy_and_checks_completion() {
        let mut state = empty_world();
        state.coins.clear();
        state.require_coins = 0;
        state.require_enemies = 1;
        state.level_enemy_total = 1;
        let id = platform_enemy(&mut state, Vec2::new(1200.0, 300.0));

        spawn(&mut state, Vec2::new(1190.0, 315.0), 0.0, 10.0, Owner::Player);
        update(&mut state);

        assert!(state.enemy_index(id).is_none());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 150);
        assert!(state.enemies_hit.contains(&id));
        assert_eq!(state.pending, Some(Transition::Advance));
    }

    #[test]
    fn test_two_bullets_on_one_enemy_score_once() {
        let mut state = empty_world();
        platform_enemy(&mut state, Vec2::new(1200.0, 300.0));
        platform_enemy(&mut state, Vec2::new(2500.0, 300.0));
        state.level_enemy_total = 2;
        state.require_enemies = 2;

        spawn(&mut state, Vec2::new(1200.0, 310.0), 0.0, 0.0, Owner::Player);
        spawn(&mut state, Vec2::new(1210.0, 310.0), 0.0, 0.0, Owner::Player);
        update(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 150);
        // Nothing left under the second bullet, so it flies on
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.pending.is_none());
    }
}
