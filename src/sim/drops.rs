//! Physics for items dropped out of bricks
//!
//! Drops bounce off the level walls and ceiling, land on the ground or any
//! solid surface, then keep sliding: friction never takes them below
//! [`DROP_MIN_SLIDE`].

use glam::Vec2;

use super::geom::{Rect, overlaps};
use super::state::{Motion, Pickup, WorldState};
use crate::consts::*;

/// Horizontal and vertical limits for drops
#[derive(Debug, Clone, Copy)]
pub struct DropBounds {
    pub level_width: f32,
    /// Top of the ground segment
    pub ground_y: f32,
}

/// Step every falling drop in the world
pub fn update(state: &mut WorldState) {
    let bounds = DropBounds {
        level_width: state.config.level_width,
        ground_y: state.config.ground_y,
    };
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

    step_items(&mut state.coins, &solids, bounds);
    step_items(&mut state.powerups, &solids, bounds);
    step_items(&mut state.chests, &solids, bounds);
}

/// Step a list of pickups; static and collected ones are left alone
pub fn step_items<K>(items: &mut [Pickup<K>], solids: &[Rect], bounds: DropBounds) {
    for item in items.iter_mut().filter(|i| !i.collected) {
        if let Motion::Falling {
            ref mut vel,
            gravity,
            friction,
        } = item.motion
        {
            step_falling(&mut item.pos, item.size, vel, gravity, friction, solids, bounds);
        }
    }
}

fn step_falling(
    pos: &mut Vec2,
    size: Vec2,
    vel: &mut Vec2,
    gravity: f32,
    friction: f32,
    solids: &[Rect],
    bounds: DropBounds,
) {
    pos.x += vel.x;

    // Wall bounce with speed loss
    if pos.x <= 0.0 {
        pos.x = 0.0;
        vel.x = (vel.x * WALL_BOUNCE_DAMPING).abs();
    } else if pos.x >= bounds.level_width - size.x {
        pos.x = bounds.level_width - size.x;
        vel.x = -(vel.x * WALL_BOUNCE_DAMPING).abs();
    }

    vel.y += gravity;
    pos.y += vel.y;

    if pos.y < 0.0 {
        pos.y = 0.0;
        vel.y = (vel.y * CEILING_BOUNCE_DAMPING).abs();
    }

    if pos.y + size.y > bounds.ground_y {
        pos.y = bounds.ground_y - size.y;
        vel.y = 0.0;
        slide(vel, friction);
        return;
    }

    let rect = Rect::from_pos_size(*pos, size);
    if let Some(surface) = solids.iter().find(|s| overlaps(&rect, s)) {
        pos.y = surface.y - size.y;
        vel.y = 0.0;
        slide(vel, friction);
    }
}

/// Ground friction with a minimum horizontal speed
fn slide(vel: &mut Vec2, friction: f32) {
    vel.x *= friction;
    if vel.x.abs() < DROP_MIN_SLIDE {
        vel.x = if vel.x > 0.0 {
            DROP_MIN_SLIDE
        } else {
            -DROP_MIN_SLIDE
        };
    }
}
