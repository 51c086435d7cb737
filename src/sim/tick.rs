//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, WorldState};
use super::{bricks, drops, enemy, interact, particles, player, projectiles, schedule};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump, or fly while wings are active
    pub up: bool,
    /// Fire the equipped weapon
    pub attack: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(state: &mut WorldState, input: &TickInput) {
    if state.phase == GamePhase::Victory {
        return;
    }

    state.time_ticks += 1;
    state.enemies_hit.clear();

    schedule::fire_due_shots(state);
    player::update(state, input);
    enemy::update(state);
    projectiles::update(state);
    interact::collect_pickups(state);
    drops::update(state);
    bricks::update(&mut state.bricks, state.time_ticks);
    particles::update(&mut state.particles, &mut state.effects);

    state.flash_ticks = state.flash_ticks.saturating_sub(1);
    if state.player.invulnerable
        && state.time_ticks.saturating_sub(state.player.last_hit_tick) > INVULNERABILITY_TICKS
    {
        state.player.invulnerable = false;
    }

    state.apply_pending_transition();
}
