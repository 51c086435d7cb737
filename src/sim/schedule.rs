//! Delayed enemy fire
//!
//! Armed enemies telegraph a shot and fire it [`SHOT_DELAY_TICKS`] later. The
//! shot is keyed by enemy id and re-validated when it comes due, so a fox
//! defeated (or disarmed) during the delay never fires.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::projectiles;
use super::state::{Owner, WorldState};
use crate::config::WeaponId;

/// A shot waiting for its fire tick
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledShot {
    pub enemy_id: u32,
    pub fire_tick: u64,
    /// Enemy centre when the shot was decided
    pub origin: Vec2,
    /// Aim at decision time (radians)
    pub angle: f32,
    pub weapon: WeaponId,
}

/// Pending enemy shots in scheduling order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShotQueue {
    pending: Vec<ScheduledShot>,
}

impl ShotQueue {
    pub fn schedule(&mut self, shot: ScheduledShot) {
        self.pending.push(shot);
    }

    /// Remove and return every shot due at or before `now`, oldest first
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledShot> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|shot| shot.fire_tick <= now);
        self.pending = waiting;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledShot> {
        self.pending.iter()
    }
}

/// Fire every due shot whose enemy is still present and armed
pub fn fire_due_shots(state: &mut WorldState) {
    for shot in state.shots.take_due(state.time_ticks) {
        let still_armed = state
            .enemies
            .iter()
            .any(|e| e.id == shot.enemy_id && e.armed);
        if !still_armed {
            log::debug!("Dropping stale shot from enemy {}", shot.enemy_id);
            continue;
        }

        let (spread, speed) = match state.config.weapon(shot.weapon) {
            Ok(weapon) => (weapon.spread_radians(), weapon.speed),
            Err(e) => {
                log::warn!("Enemy {} shot dropped: {}", shot.enemy_id, e);
                continue;
            }
        };
        let jitter = (state.rng.random::<f32>() - 0.5) * spread;
        projectiles::spawn(state, shot.origin, shot.angle + jitter, speed, Owner::Enemy);
    }
}
