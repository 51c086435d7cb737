//! Player contact rules: pickups, stomps, hits and level completion

use glam::Vec2;

use super::geom::{overlaps, touching};
use super::particles;
use super::state::{
    EffectKind, EnemyKind, GameEvent, ParticleKind, PowerUpKind, Transition, WorldState,
};
use crate::consts::*;

/// Result of the player taking damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Super player lost the power-up and keeps playing
    Shrunk,
    /// Level reset requested
    Died,
}

/// An enemy removed from play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defeat {
    pub kind: EnemyKind,
    pub score: u64,
}

/// Apply one hit to the player
pub fn player_hit(state: &mut WorldState) -> HitOutcome {
    if state.player.is_super() {
        let now = state.time_ticks;
        state.player.shrink();
        state.player.make_invulnerable(now);

        let center = state.player.center();
        let top = Vec2::new(center.x, state.player.pos.y);
        particles::emit(state, center, ParticleKind::PowerUp, 15);
        particles::add_effect(state, top, EffectKind::PowerUp, "Shrunk!");
        state.push_event(GameEvent::PlayerShrunk);
        log::info!("Player shrunk at tick {}", now);
        HitOutcome::Shrunk
    } else {
        state.request(Transition::Reset);
        HitOutcome::Died
    }
}

/// Remove an enemy and award its points
///
/// Returns `None` when the enemy was already defeated this tick or is gone.
pub fn defeat_enemy(state: &mut WorldState, enemy_id: u32) -> Option<Defeat> {
    let index = state.enemy_index(enemy_id)?;
    if !state.enemies_hit.insert(enemy_id) {
        return None;
    }
    let enemy = state.enemies.remove(index);

    let score = enemy.score();
    let kind = enemy.kind();
    state.score += score;

    let center = enemy.center();
    let count = match kind {
        EnemyKind::Platform => 25,
        EnemyKind::Ground => 20,
    };
    particles::add_effect(
        state,
        Vec2::new(center.x, enemy.pos.y),
        EffectKind::Enemy,
        format!("+{score}"),
    );
    particles::emit(state, center, ParticleKind::Enemy, count);
    log::debug!("Enemy {} ({:?}) defeated for {}", enemy_id, kind, score);

    Some(Defeat { kind, score })
}

/// Resolve contact between the player and one enemy
///
/// A stomp takes out every enemy in the same vertical band that the player
/// overlaps. Any other contact hurts the player unless invulnerable.
pub fn resolve_enemy_contact(state: &mut WorldState, enemy_id: u32) {
    let Some(index) = state.enemy_index(enemy_id) else {
        return;
    };
    let enemy_rect = state.enemies[index].rect();
    let player_rect = state.player.rect();
    if !overlaps(&player_rect, &enemy_rect) {
        return;
    }

    let stomp =
        state.player.bottom() - enemy_rect.top() < STOMP_DEPTH && state.player.vel.y > 0.0;
    if !stomp {
        if !state.player.invulnerable {
            player_hit(state);
        }
        return;
    }

    let band_y = enemy_rect.y;
    let group: Vec<(u32, EnemyKind)> = state
        .enemies
        .iter()
        .filter(|e| {
            !state.enemies_hit.contains(&e.id)
                && (e.pos.y - band_y).abs() < STOMP_BAND
                && touching(&player_rect, *e)
        })
        .map(|e| (e.id, e.kind()))
        .collect();
    let platform_stomp = group.iter().any(|(_, kind)| *kind == EnemyKind::Platform);

    for (id, _) in group {
        defeat_enemy(state, id);
    }

    let bounce = if platform_stomp {
        PLATFORM_STOMP_BOUNCE
    } else {
        1.0
    };
    state.player.vel.y = -PLAYER_JUMP_FORCE * bounce;
    check_level_completion(state);
}

/// Request the next level (or victory) once both objectives are met
pub fn check_level_completion(state: &mut WorldState) -> bool {
    let coins_ok = state.collected_coins() >= state.require_coins as usize;
    let defeated = state
        .level_enemy_total
        .saturating_sub(state.enemies.len() as u32);
    let enemies_ok = defeated >= state.require_enemies;
    if !(coins_ok && enemies_ok) {
        return false;
    }

    if state.level < state.config.max_level() {
        state.request(Transition::Advance);
    } else {
        state.request(Transition::Victory);
    }
    true
}

/// Collect everything the player overlaps: coins, then chests, then power-ups
pub fn collect_pickups(state: &mut WorldState) {
    for i in 0..state.coins.len() {
        if state.coins[i].collected || !touching(&state.player, &state.coins[i]) {
            continue;
        }
        state.coins[i].collected = true;
        let rect = state.coins[i].rect();

        state.score += COIN_SCORE;
        state.coin_count += 1;
        particles::add_effect(
            state,
            Vec2::new(rect.center().x, rect.y),
            EffectKind::Coin,
            format!("+{COIN_SCORE}"),
        );
        check_level_completion(state);
        particles::emit(state, rect.center(), ParticleKind::Collect, 20);
    }

    for i in 0..state.chests.len() {
        if state.chests[i].collected || !touching(&state.player, &state.chests[i]) {
            continue;
        }
        state.chests[i].collected = true;
        let weapon_id = state.chests[i].kind;
        let rect = state.chests[i].rect();

        let name = match state.config.weapon(weapon_id) {
            Ok(weapon) => {
                state.player.attack_cooldown = crate::ms_to_ticks(weapon.cooldown_ms);
                weapon.name.clone()
            }
            Err(e) => {
                log::warn!("Chest {} carries an unusable weapon: {}", state.chests[i].id, e);
                continue;
            }
        };
        state.player.weapon = Some(weapon_id);
        log::info!("Player equipped {}", name);

        let top = Vec2::new(rect.center().x, rect.y);
        particles::add_effect(state, top, EffectKind::Chest, format!("Got {name}!"));
        particles::emit(state, rect.center(), ParticleKind::Collect, 20);
    }

    for i in 0..state.powerups.len() {
        if state.powerups[i].collected || !touching(&state.player, &state.powerups[i]) {
            continue;
        }
        state.powerups[i].collected = true;
        let kind = state.powerups[i].kind;
        let rect = state.powerups[i].rect();
        let top = Vec2::new(rect.center().x, rect.y);

        match kind {
            PowerUpKind::Mushroom => {
                state.player.grow();
                let level_width = state.config.level_width;
                state.player.clamp_to_level(level_width);
                let center = state.player.center();
                particles::emit(state, center, ParticleKind::PowerUp, 15);
                particles::add_effect(state, top, EffectKind::PowerUp, "Super Size!");
            }
            PowerUpKind::Wings => {
                state.player.grant_wings();
                particles::add_effect(state, top, EffectKind::PowerUp, "Wings Power!");
            }
        }
        log::info!("Player collected {:?}", kind);
        particles::emit(state, rect.center(), ParticleKind::Collect, 20);
    }
}
