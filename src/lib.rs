//! Fox Platformer - simulation core for a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (player, enemies, bricks, projectiles, pickups)
//! - `config`: Level and weapon tables consumed by the simulation
//! - `session`: Host-side loop converting frame time into fixed ticks

pub mod config;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig, LevelConfig, WeaponConfig, WeaponId};
pub use session::Session;

/// Game configuration constants
///
/// Velocities and accelerations are per tick; durations are in ticks.
pub mod consts {
    /// Fixed simulation timestep (display rate the tuning was made at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1200.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Default level width
    pub const LEVEL_WIDTH: f32 = 3600.0;
    /// Ground segment spans the level at this height
    pub const GROUND_Y: f32 = 550.0;
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const PLAYER_NORMAL_SIZE: f32 = 50.0;
    pub const PLAYER_SUPER_SIZE: f32 = 70.0;
    pub const PLAYER_GRAVITY: f32 = 0.6;
    pub const PLAYER_JUMP_FORCE: f32 = 12.0;
    /// Second and later jumps are weaker
    pub const AIR_JUMP_FACTOR: f32 = 0.85;
    /// Extra jumps granted by leaving the ground
    pub const AIR_JUMPS: u8 = 2;
    pub const MAX_RUN_SPEED: f32 = 8.0;
    pub const RUN_ACCEL: f32 = 1.0;
    pub const RUN_DECAY: f32 = 0.8;
    pub const MAX_FALL_SPEED: f32 = 12.0;
    /// Upward velocity while flying
    pub const FLY_SPEED: f32 = -4.0;
    /// Flying can't take the player above this screen y
    pub const FLY_CEILING: f32 = 80.0;
    /// Where a super player reappears after falling out
    pub const FALL_RECOVERY_Y: f32 = VIEWPORT_HEIGHT - 100.0;
    /// 2 seconds
    pub const INVULNERABILITY_TICKS: u64 = 120;
    pub const CAMERA_LEAD: f32 = VIEWPORT_WIDTH / 3.0;
    pub const CAMERA_EASE: f32 = 0.1;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_GRAVITY: f32 = 0.5;
    pub const CHASE_RANGE: f32 = 300.0;
    pub const CHASE_SPEED_FACTOR: f32 = 1.5;
    pub const EDGE_MARGIN: f32 = 30.0;
    /// Ground enemies land on surfaces they are less than this far into
    pub const ENEMY_LANDING_DEPTH: f32 = 20.0;
    pub const ENEMY_COOLDOWN_MS: u32 = 2000;
    /// Detection window for armed enemies (half extents)
    pub const DETECT_RANGE_X: f32 = 400.0;
    pub const DETECT_RANGE_Y: f32 = 200.0;
    /// Delay between the warning and the shot (500 ms)
    pub const SHOT_DELAY_TICKS: u64 = 30;

    /// Stomp tolerances
    pub const STOMP_DEPTH: f32 = 20.0;
    pub const STOMP_BAND: f32 = 10.0;
    pub const PLATFORM_STOMP_BOUNCE: f32 = 1.2;

    /// Brick defaults
    pub const BRICK_SIZE: f32 = 40.0;
    /// 200 ms
    pub const BUMP_TICKS: u64 = 12;
    pub const BUMP_HEIGHT: f32 = 10.0;

    /// Dropped item physics
    pub const DROP_SPEED_X: f32 = 2.0;
    pub const DROP_LAUNCH_VY: f32 = -4.0;
    pub const DROP_GRAVITY: f32 = 0.5;
    pub const DROP_FRICTION: f32 = 0.98;
    pub const DROP_MIN_SLIDE: f32 = 1.5;
    pub const WALL_BOUNCE_DAMPING: f32 = 0.8;
    pub const CEILING_BOUNCE_DAMPING: f32 = 0.5;

    /// Pickup sizes
    pub const COIN_SIZE: f32 = 40.0;
    pub const DROPPED_COIN_SIZE: f32 = 20.0;
    pub const ITEM_SIZE: f32 = 40.0;

    /// Projectile half extents
    pub const PLAYER_SHOT_SIZE: f32 = 5.0;
    pub const ENEMY_SHOT_SIZE: f32 = 8.0;

    /// Scoring
    pub const COIN_SCORE: u64 = 50;

    /// Particle defaults
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    /// Maximum particles
    pub const MAX_PARTICLES: usize = 512;
    pub const EFFECT_LIFE: u32 = 30;
    /// Screen flash after a death (1 second)
    pub const FLASH_TICKS: u32 = 60;
}

/// Convert a millisecond duration from the tuning tables to whole ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * consts::TICKS_PER_SECOND as u64).div_ceil(1000)
}

/// Convert a tick count to seconds of play time
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}
