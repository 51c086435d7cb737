//! Cosmetic particles and floating texts
//!
//! Nothing in here is read by gameplay code.

use glam::Vec2;
use rand::Rng;

use super::state::{Effect, EffectKind, Particle, ParticleKind, WorldState};
use crate::consts::*;

/// Spawn `count` sparks of the given kind at a point
///
/// Emissions beyond [`MAX_PARTICLES`] are dropped.
pub fn emit(state: &mut WorldState, pos: Vec2, kind: ParticleKind, count: usize) {
    let room = MAX_PARTICLES.saturating_sub(state.particles.len());
    if room < count {
        log::warn!(
            "Particle cap reached, dropping {} {:?} particles",
            count - room,
            kind
        );
    }

    for _ in 0..count.min(room) {
        let vx = (state.rng.random::<f32>() - 0.5) * 6.0;
        let vy = if kind == ParticleKind::Jump {
            -state.rng.random::<f32>() * 4.0 - 2.0
        } else {
            (state.rng.random::<f32>() - 0.5) * 6.0
        };
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(vx, vy),
            size: if kind == ParticleKind::Jump { 5.0 } else { 3.0 },
            life: PARTICLE_LIFE,
            alpha: 1.0,
            kind,
        });
    }
}

/// Add a floating text above a point
pub fn add_effect(state: &mut WorldState, pos: Vec2, kind: EffectKind, text: impl Into<String>) {
    state.effects.push(Effect {
        pos,
        text: text.into(),
        kind,
        life: EFFECT_LIFE,
        alpha: 1.0,
    });
}

/// Advance particles and floating texts, dropping expired ones
pub fn update(particles: &mut Vec<Particle>, effects: &mut Vec<Effect>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life = p.life.saturating_sub(1);
        p.alpha = p.life as f32 / PARTICLE_LIFE as f32;
    }
    particles.retain(|p| p.life > 0);

    for e in effects.iter_mut() {
        e.pos.y -= 1.0;
        e.alpha = (e.alpha - 1.0 / EFFECT_LIFE as f32).max(0.0);
        e.life = e.life.saturating_sub(1);
    }
    effects.retain(|e| e.life > 0);
}
