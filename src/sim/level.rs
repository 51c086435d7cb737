//! Level building and transitions

use glam::Vec2;
use rand::Rng;

use super::bricks;
use super::enemy;
use super::geom::Rect;
use super::state::{Coin, GameEvent, GamePhase, Motion, Transition, WorldState};
use crate::config::{ConfigError, LevelConfig};
use crate::consts::*;

/// Placement attempts per coin before using the platform fallback spot
const COIN_PLACEMENT_ATTEMPTS: u32 = 15;
/// Minimum spacing between placed coins
const COIN_MIN_DISTANCE: f32 = 200.0;

impl WorldState {
    /// Build level `level` from the config
    ///
    /// Score, deaths and coin count carry over. The player loses weapon and
    /// flight and gets a fresh invulnerability window.
    pub fn init_level(&mut self, level: u32) -> Result<(), ConfigError> {
        let level_config = self.config.level(level)?.clone();

        let mut platforms = Vec::with_capacity(level_config.platforms.len() + 1);
        platforms.push(self.config.ground());
        platforms.extend(level_config.platforms.iter().copied());

        let bricks = level_config
            .bricks
            .iter()
            .map(|placement| bricks::create_brick(self, placement))
            .collect();
        let enemies = enemy::spawn_for_level(self, level, &level_config, &platforms)?;
        let coins = place_coins(self, &level_config);

        self.level = level;
        self.objective = level_config.objective.clone();
        self.require_coins = level_config.require_coins;
        self.require_enemies = level_config.require_enemies;
        self.level_enemy_total = enemies.len() as u32;
        self.platforms = platforms;
        self.bricks = bricks;
        self.enemies = enemies;
        self.coins = coins;
        self.powerups.clear();
        self.chests.clear();
        self.shots.clear();

        let now = self.time_ticks;
        self.player.weapon = None;
        self.player.make_invulnerable(now);
        self.player.clear_flight();

        log::info!(
            "Level {} '{}': {} enemies, {} coins, {} bricks",
            level,
            level_config.name,
            self.level_enemy_total,
            self.coins.len(),
            self.bricks.len()
        );
        Ok(())
    }

    /// Death: back to the level start with score and coins zeroed
    pub fn reset_level(&mut self) -> Result<(), ConfigError> {
        self.flash_ticks = FLASH_TICKS;
        self.player.return_to_start();
        self.player.shrink();
        self.camera.x = 0.0;

        self.score = 0;
        self.death_count += 1;
        self.coin_count = 0;

        let level = self.level;
        self.init_level(level)?;
        self.push_event(GameEvent::PlayerDied {
            level,
            deaths: self.death_count,
        });
        log::info!("Player died on level {} (deaths: {})", level, self.death_count);
        Ok(())
    }

    /// Move on to the next level, keeping super size
    pub fn advance_level(&mut self) -> Result<(), ConfigError> {
        let finished = self.level;
        let next = finished + 1;
        // Fail before touching anything
        self.config.level(next)?;

        let was_super = self.player.is_super();
        self.player.return_to_start();
        self.player.invulnerable = false;
        self.camera.x = 0.0;
        if was_super {
            self.player.grow();
        } else {
            self.player.shrink();
        }

        self.init_level(next)?;
        self.push_event(GameEvent::LevelComplete {
            level: finished,
            next_level: next,
        });
        Ok(())
    }

    /// Final level cleared; further ticks are no-ops
    pub fn declare_victory(&mut self) {
        self.phase = GamePhase::Victory;
        let play_time_secs = self.play_time_secs();
        self.push_event(GameEvent::Victory {
            score: self.score,
            play_time_secs,
            deaths: self.death_count,
        });
        log::info!(
            "Victory! score {} in {:.1}s with {} deaths",
            self.score,
            play_time_secs,
            self.death_count
        );
    }

    /// Apply the transition requested during this tick, if any
    pub fn apply_pending_transition(&mut self) {
        let Some(transition) = self.pending.take() else {
            return;
        };
        let result = match transition {
            Transition::Reset => self.reset_level(),
            Transition::Advance => self.advance_level(),
            Transition::Victory => {
                self.declare_victory();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::error!("{:?} transition failed: {}", transition, e);
        }
    }
}

/// Scatter the level's required coins over its platforms
fn place_coins(state: &mut WorldState, level_config: &LevelConfig) -> Vec<Coin> {
    let count = level_config.require_coins as usize;
    let anchors = if level_config.platforms.is_empty() {
        vec![state.config.ground()]
    } else {
        level_config.platforms.clone()
    };

    let mut coins: Vec<Coin> = Vec::with_capacity(count);
    for i in 0..count {
        let anchor = anchors[i * anchors.len() / count];
        let pos = find_coin_position(state, &anchor, &coins);
        let id = state.next_entity_id();
        coins.push(Coin::new(id, pos, Vec2::splat(COIN_SIZE), Motion::Static, ()));
    }
    coins
}

/// Pick a spot on the ground, on `platform`, or floating above it
///
/// Candidates within [`COIN_MIN_DISTANCE`] of an existing coin are rejected.
fn find_coin_position(state: &mut WorldState, platform: &Rect, existing: &[Coin]) -> Vec2 {
    let ground_y = state.config.ground_y;
    let ground_span = (state.config.level_width - 600.0).max(0.0);
    let clear = |pos: Vec2| {
        existing
            .iter()
            .all(|c| c.pos.distance(pos) >= COIN_MIN_DISTANCE)
    };

    for _ in 0..COIN_PLACEMENT_ATTEMPTS {
        let rng = &mut state.rng;
        let candidate = if rng.random::<f32>() < 0.2 {
            Vec2::new(rng.random::<f32>() * ground_span, ground_y - COIN_SIZE)
        } else if rng.random::<f32>() < 0.4 {
            let x = platform.x + rng.random::<f32>() * (platform.width - COIN_SIZE);
            Vec2::new(x, platform.y - 60.0)
        } else {
            let x = platform.x + rng.random::<f32>() * (platform.width - COIN_SIZE);
            Vec2::new(x, platform.y - 100.0 - rng.random::<f32>() * 100.0)
        };
        if clear(candidate) {
            return candidate;
        }
    }

    Vec2::new(platform.x + platform.width - COIN_SIZE, platform.y - 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::projectiles;
    use crate::sim::state::{Owner, PowerState};

    fn world() -> WorldState {
        WorldState::new(GameConfig::default(), 2024).unwrap()
    }

    #[test]
    fn test_new_world_starts_level_one() {
        let state = world();
        let config = GameConfig::default();
        let level = config.level(1).unwrap();

        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.coins.len(), level.require_coins as usize);
        assert_eq!(state.bricks.len(), level.bricks.len());
        assert_eq!(state.platforms.len(), level.platforms.len() + 1);
        assert_eq!(state.platforms[0], config.ground());
        assert_eq!(state.level_enemy_total as usize, state.enemies.len());
        assert!(state.player.invulnerable);
    }

    #[test]
    fn test_coins_keep_their_distance_or_fall_back() {
        let state = world();
        let config = GameConfig::default();
        let platforms = &config.level(1).unwrap().platforms;
        for (i, a) in state.coins.iter().enumerate() {
            let fallback = platforms
                .iter()
                .any(|p| a.pos == Vec2::new(p.x + p.width - COIN_SIZE, p.y - 60.0));
            for b in &state.coins[..i] {
                assert!(fallback || a.pos.distance(b.pos) >= COIN_MIN_DISTANCE);
            }
        }
    }

    #[test]
    fn test_reset_zeroes_score_and_counts_death() {
        let mut state = world();
        state.score = 900;
        state.coin_count = 3;
        state.player.grow();
        state.player.pos = Vec2::new(1500.0, 100.0);
        state.camera.x = 700.0;

        state.reset_level().unwrap();
        assert_eq!(state.score, 0);
        assert_eq!(state.coin_count, 0);
        assert_eq!(state.death_count, 1);
        assert_eq!(state.flash_ticks, FLASH_TICKS);
        assert_eq!(state.player.state, PowerState::Normal);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(state.camera.x, 0.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PlayerDied {
                level: 1,
                deaths: 1
            }]
        );
    }

    #[test]
    fn test_advance_keeps_super_size() {
        let mut state = world();
        state.score = 500;
        state.player.grow();
        state.advance_level().unwrap();

        assert_eq!(state.level, 2);
        assert_eq!(state.score, 500);
        assert!(state.player.is_super());
        assert_eq!(state.player.size, Vec2::splat(PLAYER_SUPER_SIZE));
        assert_eq!(state.player.weapon, None);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelComplete {
                level: 1,
                next_level: 2
            }]
        );
    }

    #[test]
    fn test_advance_keeps_winged_super_size() {
        let mut state = world();
        state.player.grow();
        state.player.grant_wings();
        state.advance_level().unwrap();

        assert!(state.player.is_super());
        assert_eq!(state.player.size, Vec2::splat(PLAYER_SUPER_SIZE));
        assert!(!state.player.can_fly);
    }

    #[test]
    fn test_bullets_in_flight_survive_level_rebuild() {
        let mut state = world();
        projectiles::spawn(&mut state, Vec2::new(2000.0, 200.0), 0.0, 6.0, Owner::Enemy);
        state.reset_level().unwrap();
        assert_eq!(state.projectiles.len(), 1);

        state.advance_level().unwrap();
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.shots.is_empty());
    }

    #[test]
    fn test_advance_past_last_level_fails_cleanly() {
        let mut state = world();
        state.init_level(3).unwrap();
        let enemies = state.enemies.len();
        assert!(matches!(
            state.advance_level(),
            Err(ConfigError::UnknownLevel(4))
        ));
        assert_eq!(state.level, 3);
        assert_eq!(state.enemies.len(), enemies);
    }

    #[test]
    fn test_pending_victory_ends_session() {
        let mut state = world();
        state.request(Transition::Victory);
        state.request(Transition::Reset);
        state.apply_pending_transition();

        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.death_count, 0);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::Victory { deaths: 0, .. }]
        ));
        assert!(state.pending.is_none());
    }
}
