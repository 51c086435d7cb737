//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (time is counted in ticks)
//! - Seeded RNG only
//! - Stable iteration order (list order, enemies by id)
//! - No rendering or platform dependencies

pub mod bricks;
pub mod drops;
pub mod enemy;
pub mod geom;
pub mod interact;
pub mod level;
pub mod particles;
pub mod player;
pub mod projectiles;
pub mod schedule;
pub mod state;
pub mod tick;

pub use geom::{Hitbox, PlatformContact, Rect, classify_platform_contact, overlaps, touching};
pub use schedule::{ScheduledShot, ShotQueue};
pub use state::{
    Brick, BrickKind, Camera, Chest, Coin, Enemy, EnemyBehavior, EnemyKind, Facing, GameEvent,
    GamePhase, Motion, Owner, Player, PowerState, PowerUp, PowerUpKind, Projectile, Transition,
    WorldState,
};
pub use tick::{TickInput, tick};
