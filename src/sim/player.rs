//! Player controller: running, jumping, flight, attacks, collision and camera

use glam::Vec2;
use rand::Rng;

use super::bricks;
use super::geom::{PlatformContact, Rect, classify_platform_contact};
use super::interact;
use super::particles;
use super::projectiles;
use super::state::{Facing, Owner, ParticleKind, Transition, WorldState};
use super::tick::TickInput;
use crate::consts::*;

/// Surface the player touched this tick
#[derive(Debug, Clone, Copy)]
enum Surface {
    Platform,
    Brick(usize),
}

/// Advance the player by one tick
pub fn update(state: &mut WorldState, input: &TickInput) {
    run(state, input);

    if input.attack {
        attack(state);
    }

    state.player.pos.x += state.player.vel.x;

    fly_and_fall(state, input);
    jump(state, input);

    state.player.pos.y += state.player.vel.y;
    if state.player.is_flying && state.player.pos.y < FLY_CEILING {
        state.player.pos.y = FLY_CEILING;
        state.player.vel.y = 0.0;
    }

    let grounded = resolve_collisions(state);
    state.player.airborne = !grounded;
    if grounded {
        state.player.jumps_remaining = AIR_JUMPS;
    }

    let level_width = state.config.level_width;
    state.player.clamp_to_level(level_width);

    if state.player.pos.y > state.config.viewport_height {
        fell_off(state);
    }

    update_camera(state);
}

/// Left wins when both directions are held
fn run(state: &mut WorldState, input: &TickInput) {
    let p = &mut state.player;
    if input.left {
        p.vel.x = (p.vel.x - RUN_ACCEL).max(-MAX_RUN_SPEED);
        p.facing = Facing::Left;
    } else if input.right {
        p.vel.x = (p.vel.x + RUN_ACCEL).min(MAX_RUN_SPEED);
        p.facing = Facing::Right;
    } else {
        p.vel.x *= RUN_DECAY;
    }
}

fn fly_and_fall(state: &mut WorldState, input: &TickInput) {
    if state.player.can_fly && input.up {
        state.player.is_flying = true;
        state.player.vel.y = FLY_SPEED;
        if state.rng.random::<f32>() < 0.3 {
            let p = &state.player;
            let pos = Vec2::new(p.center().x, p.bottom());
            particles::emit(state, pos, ParticleKind::Wings, 1);
        }
    } else if !input.up {
        state.player.is_flying = false;
    }

    if !state.player.is_flying {
        state.player.vel.y = (state.player.vel.y + PLAYER_GRAVITY).min(MAX_FALL_SPEED);
    }
}

/// Edge-triggered jump with a fixed number of air jumps
fn jump(state: &mut WorldState, input: &TickInput) {
    if !input.up {
        state.player.jump_latched = false;
        return;
    }
    if state.player.jump_latched || state.player.is_flying {
        return;
    }

    let p = &mut state.player;
    if !p.airborne {
        p.vel.y = -PLAYER_JUMP_FORCE;
        p.airborne = true;
        p.jumps_remaining = AIR_JUMPS;
        p.jump_latched = true;
        let pos = Vec2::new(p.center().x, p.bottom());
        particles::emit(state, pos, ParticleKind::Jump, 10);
    } else if p.jumps_remaining > 0 {
        p.vel.y = -PLAYER_JUMP_FORCE * AIR_JUMP_FACTOR;
        p.jumps_remaining -= 1;
        p.jump_latched = true;
    }
}

/// Fire the equipped weapon if its cooldown has elapsed
pub fn attack(state: &mut WorldState) {
    let now = state.time_ticks;
    let Some(weapon_id) = state.player.weapon else {
        return;
    };
    if !state.player.can_attack(now) {
        return;
    }
    let Ok(weapon) = state.config.weapon(weapon_id) else {
        log::warn!("Player holds unknown weapon {:?}", weapon_id);
        return;
    };
    let (count, spread, speed) = (weapon.projectiles, weapon.spread_radians(), weapon.speed);

    let origin = state.player.center();
    let base = state.player.facing.angle();
    for _ in 0..count {
        let offset = state.rng.random::<f32>() * spread - spread / 2.0;
        projectiles::spawn(state, origin, base + offset, speed, Owner::Player);
    }

    let p = &state.player;
    let flash_x = match p.facing {
        Facing::Right => p.pos.x + p.size.x + 30.0,
        Facing::Left => p.pos.x - 30.0,
    };
    let flash = Vec2::new(flash_x, origin.y);
    particles::emit(state, flash, ParticleKind::Attack, 15);
    state.player.last_attack_tick = Some(now);
}

/// Single scan over the ground, platforms and active bricks
///
/// Stops at the first contact. Returns whether the player is standing on
/// something.
fn resolve_collisions(state: &mut WorldState) -> bool {
    let rect = state.player.rect();
    let vel_y = state.player.vel.y;

    let surfaces = state
        .platforms
        .iter()
        .map(|r| (Surface::Platform, *r))
        .chain(
            state
                .bricks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.active)
                .map(|(i, b)| (Surface::Brick(i), Rect::from_pos_size(b.pos, b.size))),
        );

    let mut contact = None;
    for (surface, solid) in surfaces {
        match classify_platform_contact(&rect, vel_y, &solid) {
            PlatformContact::None => {}
            c => {
                contact = Some((surface, solid, c));
                break;
            }
        }
    }

    match contact {
        Some((_, solid, PlatformContact::LandingOnTop)) => {
            state.player.pos.y = solid.top() - state.player.size.y;
            state.player.vel.y = 0.0;
            true
        }
        Some((surface, solid, PlatformContact::HittingFromBelow)) => {
            state.player.pos.y = solid.bottom();
            state.player.vel.y = 0.0;
            if let Surface::Brick(index) = surface {
                bricks::bump(state, index);
            }
            false
        }
        _ => false,
    }
}

/// Below the screen: super players recover, everyone else dies
fn fell_off(state: &mut WorldState) {
    if state.player.is_super() {
        state.player.pos.y = FALL_RECOVERY_Y;
        state.player.vel.y = 0.0;
        interact::player_hit(state);
    } else {
        state.request(Transition::Reset);
    }
}

/// Ease the camera toward a point ahead of the player
fn update_camera(state: &mut WorldState) {
    let target = state.player.pos.x - CAMERA_LEAD;
    let max_x = (state.config.level_width - state.config.viewport_width).max(0.0);
    let cam = &mut state.camera;
    cam.x += (target - cam.x) * CAMERA_EASE;
    cam.x = cam.x.min(max_x).max(0.0);
}
