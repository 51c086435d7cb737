//! End-to-end gameplay scenarios driven through `tick`

use fox_platformer::GameConfig;
use fox_platformer::WeaponId;
use fox_platformer::consts::*;
use fox_platformer::sim::bricks::{self, BumpOutcome};
use fox_platformer::sim::{
    BrickKind, EnemyBehavior, GameEvent, Owner, TickInput, WorldState, interact, projectiles,
    tick,
};
use glam::Vec2;

fn world() -> WorldState {
    let mut state = WorldState::new(GameConfig::default(), 4242).unwrap();
    state.shots.clear();
    state
}

/// Keep one unarmed, motionless ground enemy per position and forget the rest
fn keep_enemies(state: &mut WorldState, positions: &[Vec2]) {
    state
        .enemies
        .retain(|e| matches!(e.behavior, EnemyBehavior::Ground { .. }));
    state.enemies.truncate(positions.len());
    assert_eq!(state.enemies.len(), positions.len());
    for (enemy, pos) in state.enemies.iter_mut().zip(positions) {
        enemy.pos = *pos;
        enemy.armed = false;
        enemy.speed = 0.0;
    }
    state.level_enemy_total = positions.len() as u32;
}

fn idle(state: &mut WorldState, ticks: usize) {
    for _ in 0..ticks {
        tick(state, &TickInput::default());
    }
}

#[test]
fn test_level_one_clears_to_level_two() {
    let mut state = world();
    assert_eq!(state.level, 1);
    assert_eq!(state.require_coins, 5);
    assert_eq!(state.require_enemies, 2);

    keep_enemies(
        &mut state,
        &[Vec2::new(990.0, 510.0), Vec2::new(1020.0, 510.0)],
    );

    // Park the coins out of reach
    for coin in state.coins.iter_mut() {
        coin.pos = Vec2::new(3000.0, 100.0);
    }

    // Falling onto both foxes at once
    state.player.pos = Vec2::new(1000.0, 465.0);
    state.player.vel = Vec2::new(0.0, 2.0);
    tick(&mut state, &TickInput::default());

    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 200);
    assert_eq!(state.enemies_hit.len(), 2);
    assert!(state.player.vel.y < 0.0);
    assert_eq!(state.level, 1);

    // Every required coin lands on the player at once
    let pos = state.player.pos;
    for coin in state.coins.iter_mut() {
        coin.pos = pos;
    }
    tick(&mut state, &TickInput::default());

    assert!(state.enemies_hit.is_empty());
    assert_eq!(state.level, 2);
    assert_eq!(state.score, 200 + 5 * COIN_SCORE);
    assert_eq!(state.coin_count, 5);
    assert!(state.drain_events().contains(&GameEvent::LevelComplete {
        level: 1,
        next_level: 2
    }));
    assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
    assert!(state.coins.iter().all(|c| !c.collected));
}

#[test]
fn test_weapon_brick_chest_equips_scatter() {
    let mut state = world();
    keep_enemies(&mut state, &[]);
    let index = state
        .bricks
        .iter()
        .position(|b| b.kind == BrickKind::Weapon)
        .unwrap();

    assert_eq!(bricks::bump(&mut state, index), BumpOutcome::Hit { broke: true });
    assert_eq!(state.chests.len(), 1);
    assert!(!state.chests[0].collected);
    assert!(state.config.weapons.contains_key(&state.chests[0].kind));

    state.player.pos = Vec2::new(600.0, 500.0);
    state.player.vel = Vec2::ZERO;
    let pos = state.player.pos;
    state.chests[0].pos = pos;
    tick(&mut state, &TickInput::default());

    assert!(state.chests[0].collected);
    assert_eq!(state.player.weapon, Some(WeaponId::Scatter));
    assert_eq!(state.player.attack_cooldown, fox_platformer::ms_to_ticks(500));

    state.projectiles.clear();
    tick(
        &mut state,
        &TickInput {
            attack: true,
            ..Default::default()
        },
    );
    let shots = state
        .projectiles
        .iter()
        .filter(|p| p.owner == Owner::Player)
        .count();
    assert_eq!(shots, 5);
}

/// One armed fox 300 units left of a standing, vulnerable player
fn duel() -> WorldState {
    let mut state = world();
    keep_enemies(&mut state, &[Vec2::new(1000.0, 510.0)]);
    state.enemies[0].armed = true;
    state.coins.clear();
    state.player.pos = Vec2::new(1300.0, 500.0);
    state.player.vel = Vec2::ZERO;
    state.player.invulnerable = false;
    state
}

#[test]
fn test_fired_bullet_outlives_its_owner() {
    let mut state = duel();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.shots.len(), 1);

    idle(&mut state, SHOT_DELAY_TICKS as usize);
    assert!(state.shots.is_empty());
    assert_eq!(state.projectiles.iter().filter(|p| p.is_enemy()).count(), 1);

    let id = state.enemies[0].id;
    assert!(interact::defeat_enemy(&mut state, id).is_some());

    let mut died = false;
    for _ in 0..120 {
        tick(&mut state, &TickInput::default());
        if state.death_count == 1 {
            died = true;
            break;
        }
    }
    assert!(died);
}

#[test]
fn test_unfired_shot_cancelled_when_owner_dies() {
    let mut state = duel();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.shots.len(), 1);

    let id = state.enemies[0].id;
    interact::defeat_enemy(&mut state, id);
    idle(&mut state, SHOT_DELAY_TICKS as usize + 5);

    assert!(state.shots.is_empty());
    assert!(state.projectiles.iter().all(|p| !p.is_enemy()));
    assert_eq!(state.death_count, 0);
}

#[test]
fn test_unfired_shot_cancelled_when_owner_disarmed() {
    let mut state = duel();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.shots.len(), 1);

    state.enemies[0].armed = false;
    idle(&mut state, SHOT_DELAY_TICKS as usize + 5);

    assert_eq!(state.enemies.len(), 1);
    assert!(state.shots.is_empty());
    assert!(state.projectiles.iter().all(|p| !p.is_enemy()));
    assert_eq!(state.death_count, 0);
}

#[test]
fn test_stomp_and_bullet_in_one_tick_score_once() {
    let mut state = world();
    keep_enemies(&mut state, &[Vec2::new(990.0, 510.0)]);
    for coin in state.coins.iter_mut() {
        coin.pos = Vec2::new(3000.0, 100.0);
    }
    let id = state.enemies[0].id;

    state.player.pos = Vec2::new(1000.0, 465.0);
    state.player.vel = Vec2::new(0.0, 2.0);
    // Stationary player bullet sitting inside the same fox
    projectiles::spawn(&mut state, Vec2::new(1000.0, 520.0), 0.0, 0.0, Owner::Player);
    tick(&mut state, &TickInput::default());

    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 100);
    assert!(state.enemies_hit.contains(&id));
    assert_eq!(state.enemies_hit.len(), 1);
    assert_eq!(
        state
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Player)
            .count(),
        1
    );
    assert!(state.player.vel.y < 0.0);
}

#[test]
fn test_super_player_survives_a_fall() {
    let mut state = world();
    keep_enemies(&mut state, &[]);
    state.platforms.truncate(0);
    state.player.grow();
    state.player.pos = Vec2::new(700.0, 595.0);
    state.player.vel.y = 12.0;

    tick(&mut state, &TickInput::default());
    assert_eq!(state.death_count, 0);
    assert!(!state.player.is_super());
    assert!(state.drain_events().contains(&GameEvent::PlayerShrunk));

    // Second fall without the power-up is fatal
    state.player.pos = Vec2::new(700.0, 595.0);
    state.player.vel.y = 12.0;
    tick(&mut state, &TickInput::default());
    assert_eq!(state.death_count, 1);
    assert_eq!(state.score, 0);
}

#[test]
fn test_run_to_victory_on_final_level() {
    let mut state = world();
    state.init_level(state.config.max_level()).unwrap();
    keep_enemies(&mut state, &[]);
    state.require_enemies = 0;
    let pos = state.player.pos;
    for coin in state.coins.iter_mut() {
        coin.pos = pos;
    }

    tick(&mut state, &TickInput::default());
    assert_eq!(state.phase, fox_platformer::sim::GamePhase::Victory);
    assert!(
        state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Victory { .. }))
    );

    let ticks = state.time_ticks;
    idle(&mut state, 10);
    assert_eq!(state.time_ticks, ticks);
}
