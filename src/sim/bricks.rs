//! Breakable blocks: bump handling, drops and the bump animation

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::particles;
use super::state::{
    Brick, BrickKind, BrickPattern, Chest, Coin, Motion, ParticleKind, PowerUp, PowerUpKind,
    WorldState,
};
use crate::config::{BrickPlacement, WeaponId};
use crate::consts::*;

/// What a bump produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpOutcome {
    /// Brick is inactive or still animating
    Ignored,
    /// Brick took a hit (it may have spawned a drop)
    Hit { broke: bool },
}

/// Build a brick from a level placement
pub fn create_brick(state: &mut WorldState, placement: &BrickPlacement) -> Brick {
    let kind = placement.kind;
    let pattern = kind
        .patterns()
        .choose(&mut state.rng)
        .copied()
        .unwrap_or(BrickPattern::Solid);

    Brick {
        id: state.next_entity_id(),
        pos: Vec2::new(placement.x, placement.y),
        size: Vec2::splat(BRICK_SIZE),
        kind,
        appearance: kind,
        hits_left: kind.hits(),
        active: true,
        visible: kind.starts_visible(),
        bump_started: None,
        bump_offset: 0.0,
        pattern,
    }
}

/// Hit the brick at `index` from below
pub fn bump(state: &mut WorldState, index: usize) -> BumpOutcome {
    let now = state.time_ticks;
    let Some(brick) = state.bricks.get_mut(index) else {
        return BumpOutcome::Ignored;
    };
    if !brick.active || brick.is_bumping() {
        return BumpOutcome::Ignored;
    }

    brick.bump_started = Some(now);
    let had_hits = brick.hits_left > 0;
    brick.hits_left = brick.hits_left.saturating_sub(1);

    if brick.kind == BrickKind::Hidden {
        brick.visible = true;
        brick.appearance = BrickKind::Normal;
    }

    let broke = brick.hits_left == 0;
    if broke {
        brick.active = false;
    }

    let kind = brick.kind;
    let pos = brick.pos;
    let size = brick.size;
    let id = brick.id;

    if had_hits {
        match kind {
            BrickKind::Weapon => drop_chest(state, pos),
            BrickKind::Item => {
                // 70% wings, 30% mushroom
                let item = if state.rng.random::<f32>() > 0.3 {
                    PowerUpKind::Wings
                } else {
                    PowerUpKind::Mushroom
                };
                drop_powerup(state, pos, item);
            }
            BrickKind::Hidden => {
                if state.rng.random::<f32>() < 0.5 {
                    drop_coin(state, Vec2::new(pos.x + size.x / 2.0, pos.y));
                } else {
                    drop_powerup(state, pos, PowerUpKind::Wings);
                }
            }
            BrickKind::Normal => {}
        }
    }

    log::debug!("Brick {} ({:?}) bumped, broke: {}", id, kind, broke);
    particles::emit(state, pos + size / 2.0, ParticleKind::Brick, 5);

    BumpOutcome::Hit { broke }
}

fn drop_direction(state: &mut WorldState) -> f32 {
    if state.rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 }
}

fn drop_coin(state: &mut WorldState, pos: Vec2) {
    let dir = drop_direction(state);
    let id = state.next_entity_id();
    state.coins.push(Coin::new(
        id,
        pos,
        Vec2::splat(DROPPED_COIN_SIZE),
        Motion::dropped(dir),
        (),
    ));
}

fn drop_powerup(state: &mut WorldState, pos: Vec2, kind: PowerUpKind) {
    let dir = drop_direction(state);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp::new(
        id,
        pos,
        Vec2::splat(ITEM_SIZE),
        Motion::dropped(dir),
        kind,
    ));
}

fn drop_chest(state: &mut WorldState, pos: Vec2) {
    let dir = drop_direction(state);
    let id = state.next_entity_id();
    state.chests.push(Chest::new(
        id,
        pos,
        Vec2::splat(ITEM_SIZE),
        Motion::dropped(dir),
        WeaponId::Scatter,
    ));
}

/// Advance bump animations
pub fn update(bricks: &mut [Brick], now: u64) {
    for brick in bricks.iter_mut() {
        if let Some(started) = brick.bump_started {
            let elapsed = now.saturating_sub(started);
            if elapsed < BUMP_TICKS {
                let progress = elapsed as f32 / BUMP_TICKS as f32;
                brick.bump_offset = -(progress * std::f32::consts::PI).sin() * BUMP_HEIGHT;
            } else {
                brick.bump_offset = 0.0;
                brick.bump_started = None;
            }
        }
    }
}
