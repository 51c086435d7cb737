//! Fox AI: spawning, patrol and chase movement, telegraphed attacks

use glam::Vec2;
use rand::Rng;

use super::geom::{Rect, overlaps};
use super::interact;
use super::particles;
use super::schedule::ScheduledShot;
use super::state::{
    EffectKind, Enemy, EnemyBehavior, ParticleKind, Patrol, WorldState,
};
use crate::config::{ConfigError, LevelConfig, WeaponId};
use crate::consts::*;

/// Spawn the enemies for a level
///
/// Ground enemies scale with the level's defeat requirement. Each platform
/// gets a guard with even odds. `platforms` must start with the ground.
pub fn spawn_for_level(
    state: &mut WorldState,
    level: u32,
    level_config: &LevelConfig,
    platforms: &[Rect],
) -> Result<Vec<Enemy>, ConfigError> {
    let cooldown = crate::ms_to_ticks(state.config.weapon(WeaponId::EnemyGun)?.cooldown_ms);
    let level_width = state.config.level_width;
    let ground_y = state.config.ground_y;
    let mut enemies = Vec::new();

    let ground_count = (level_config.require_enemies as f32 * 2.5).floor() as u32;
    for _ in 0..ground_count {
        let armed = state.rng.random::<f32>() < 0.4;
        let x = 200.0 + state.rng.random::<f32>() * (level_width - 400.0);
        let direction = if state.rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        enemies.push(Enemy {
            id: state.next_entity_id(),
            pos: Vec2::new(x, ground_y - ENEMY_SIZE),
            size: Vec2::splat(ENEMY_SIZE),
            speed: 3.0 + level as f32 * 0.5,
            direction,
            patrol: Patrol {
                start: 0.0,
                end: level_width,
            },
            armed,
            weapon: WeaponId::EnemyGun,
            attack_cooldown: cooldown,
            last_attack_tick: None,
            behavior: EnemyBehavior::Ground {
                vel_y: 0.0,
                gravity: ENEMY_GRAVITY,
                chase_range: CHASE_RANGE,
                chasing: false,
            },
        });
    }

    for platform in platforms.iter().skip(1) {
        if state.rng.random::<f32>() >= 0.5 {
            continue;
        }
        let armed = state.rng.random::<f32>() < 0.3;
        let direction = if state.rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        let y = platform.y - ENEMY_SIZE;
        enemies.push(Enemy {
            id: state.next_entity_id(),
            pos: Vec2::new(platform.x + platform.width / 2.0, y),
            size: Vec2::splat(ENEMY_SIZE),
            speed: 2.0 + level as f32 * 0.3,
            direction,
            patrol: Patrol {
                start: platform.x + 20.0,
                end: platform.x + platform.width - 60.0,
            },
            armed,
            weapon: WeaponId::EnemyGun,
            attack_cooldown: cooldown,
            last_attack_tick: None,
            behavior: EnemyBehavior::Platform {
                platform_y: y,
                edge_margin: EDGE_MARGIN,
            },
        });
    }

    Ok(enemies)
}

/// What an enemy did with its move this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Moved,
    /// Platform enemy reversed at an edge instead of moving
    Turned,
}

/// Move, attack and resolve player contact for every enemy
///
/// Enemies are visited by id; one removed by an earlier stomp this tick is
/// skipped.
pub fn update(state: &mut WorldState) {
    let solids: Vec<Rect> = state
        .platforms
        .iter()
        .copied()
        .chain(
            state
                .bricks
                .iter()
                .filter(|b| b.active)
                .map(|b| Rect::from_pos_size(b.pos, b.size)),
        )
        .collect();
    let ground_y = state.config.ground_y;
    let player_pos = state.player.pos;

    let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
    for id in ids {
        let Some(index) = state.enemy_index(id) else {
            continue;
        };

        let step = step_movement(&mut state.enemies[index], player_pos, &solids, ground_y);
        if step == Step::Turned {
            let center = state.enemies[index].center();
            particles::emit(state, center, ParticleKind::Enemy, 3);
        }

        if state.enemies[index].armed {
            try_attack(state, index);
        }

        interact::resolve_enemy_contact(state, id);
    }
}

fn step_movement(enemy: &mut Enemy, player_pos: Vec2, solids: &[Rect], ground_y: f32) -> Step {
    match enemy.behavior {
        EnemyBehavior::Ground {
            ref mut vel_y,
            gravity,
            chase_range,
            ref mut chasing,
        } => {
            *vel_y += gravity;
            enemy.pos.y += *vel_y;

            let mut on_surface = false;
            if enemy.pos.y + enemy.size.y > ground_y {
                enemy.pos.y = ground_y - enemy.size.y;
                *vel_y = 0.0;
                on_surface = true;
            } else {
                let rect = Rect::from_pos_size(enemy.pos, enemy.size);
                let landing = solids.iter().find(|s| {
                    overlaps(&rect, s)
                        && rect.bottom() - s.top() < ENEMY_LANDING_DEPTH
                        && *vel_y >= 0.0
                });
                if let Some(surface) = landing {
                    enemy.pos.y = surface.y - enemy.size.y;
                    *vel_y = 0.0;
                    on_surface = true;
                }
            }

            if !on_surface {
                return Step::Moved;
            }

            let delta = player_pos - enemy.pos;
            if delta.length() < chase_range {
                *chasing = true;
                enemy.direction = if delta.x > 0.0 { 1.0 } else { -1.0 };
                enemy.pos.x += enemy.speed * CHASE_SPEED_FACTOR * enemy.direction;
            } else {
                *chasing = false;
                enemy.pos.x += enemy.speed * enemy.direction;
                if enemy.pos.x <= enemy.patrol.start
                    || enemy.pos.x + enemy.size.x >= enemy.patrol.end
                {
                    enemy.direction = -enemy.direction;
                }
            }
            Step::Moved
        }
        EnemyBehavior::Platform {
            platform_y,
            edge_margin,
        } => {
            enemy.pos.y = platform_y;
            let next_x = enemy.pos.x + enemy.speed * enemy.direction;
            let at_edge = if enemy.direction > 0.0 {
                next_x + enemy.size.x + edge_margin >= enemy.patrol.end
            } else {
                next_x - edge_margin <= enemy.patrol.start
            };

            if at_edge {
                enemy.direction = -enemy.direction;
                Step::Turned
            } else {
                enemy.pos.x = next_x;
                Step::Moved
            }
        }
    }
}

/// Telegraph a shot at the player when in range and off cooldown
fn try_attack(state: &mut WorldState, index: usize) {
    let now = state.time_ticks;
    let enemy = &state.enemies[index];
    let ready = match enemy.last_attack_tick {
        Some(last) => now.saturating_sub(last) >= enemy.attack_cooldown,
        None => true,
    };
    if !ready {
        return;
    }

    let delta = state.player.pos - enemy.pos;
    if delta.x.abs() >= DETECT_RANGE_X || delta.y.abs() >= DETECT_RANGE_Y {
        return;
    }

    let shot = ScheduledShot {
        enemy_id: enemy.id,
        fire_tick: now + SHOT_DELAY_TICKS,
        origin: enemy.center(),
        angle: delta.y.atan2(delta.x),
        weapon: enemy.weapon,
    };
    let warning = Vec2::new(shot.origin.x, enemy.pos.y);

    state.enemies[index].last_attack_tick = Some(now);
    particles::emit(state, shot.origin, ParticleKind::Attack, 5);
    particles::add_effect(state, warning, EffectKind::Enemy, "!");
    state.shots.schedule(shot);
}
