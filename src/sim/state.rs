//! World state and entity records
//!
//! Everything the simulation mutates lives in [`WorldState`]. The renderer
//! only reads it.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::{Hitbox, Rect};
use super::schedule::ShotQueue;
use crate::config::{ConfigError, GameConfig, WeaponId};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// All levels cleared; ticks are no-ops
    Victory,
}

/// Notifications for the host shell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A level was finished and the next one is loaded
    LevelComplete { level: u32, next_level: u32 },
    /// The final level was finished
    Victory {
        score: u64,
        play_time_secs: f32,
        deaths: u32,
    },
    /// The player died and the level was rebuilt
    PlayerDied { level: u32, deaths: u32 },
    /// A super player took a hit and shrank back to normal
    PlayerShrunk,
}

/// Level transition requested during a tick, applied once all systems ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Reset,
    Advance,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Firing angle (radians, screen space)
    #[inline]
    pub fn angle(self) -> f32 {
        match self {
            Facing::Left => std::f32::consts::PI,
            Facing::Right => 0.0,
        }
    }
}

/// Player power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerState {
    #[default]
    Normal,
    /// Grown by a mushroom; survives one hit
    Super,
    /// Wings collected at normal size. Super players keep `Super` and only
    /// gain `can_fly`.
    Flying,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub state: PowerState,
    pub can_fly: bool,
    pub is_flying: bool,
    /// Not standing on anything after the last collision pass
    pub airborne: bool,
    pub jumps_remaining: u8,
    /// Set when a jump fires; cleared when up is released
    pub jump_latched: bool,
    pub weapon: Option<WeaponId>,
    /// Ticks between attacks with the current weapon
    pub attack_cooldown: u64,
    pub last_attack_tick: Option<u64>,
    pub invulnerable: bool,
    pub last_hit_tick: u64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            size: Vec2::splat(PLAYER_NORMAL_SIZE),
            facing: Facing::Right,
            state: PowerState::Normal,
            can_fly: false,
            is_flying: false,
            airborne: false,
            jumps_remaining: AIR_JUMPS,
            jump_latched: false,
            weapon: None,
            attack_cooldown: crate::ms_to_ticks(500),
            last_attack_tick: None,
            invulnerable: false,
            last_hit_tick: 0,
        }
    }
}

impl Player {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn is_super(&self) -> bool {
        self.state == PowerState::Super
    }

    /// Mushroom effect
    pub fn grow(&mut self) {
        self.state = PowerState::Super;
        self.size = Vec2::splat(PLAYER_SUPER_SIZE);
    }

    /// Wings effect. Flight rides on top of super size.
    pub fn grant_wings(&mut self) {
        self.can_fly = true;
        if self.state == PowerState::Normal {
            self.state = PowerState::Flying;
        }
    }

    /// Keep the whole body inside `[0, level_width]`
    pub fn clamp_to_level(&mut self, level_width: f32) {
        let max_x = level_width - self.size.x;
        self.pos.x = self.pos.x.min(max_x).max(0.0);
    }

    /// Back to normal size
    pub fn shrink(&mut self) {
        self.state = PowerState::Normal;
        self.size = Vec2::splat(PLAYER_NORMAL_SIZE);
    }

    /// Start (or restart) the invulnerability window
    pub fn make_invulnerable(&mut self, now: u64) {
        self.invulnerable = true;
        self.last_hit_tick = now;
    }

    /// Back to the level start with no velocity, weapon or flight
    pub fn return_to_start(&mut self) {
        self.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.vel = Vec2::ZERO;
        self.weapon = None;
        self.clear_flight();
    }

    pub fn clear_flight(&mut self) {
        self.can_fly = false;
        self.is_flying = false;
        if self.state == PowerState::Flying {
            self.state = PowerState::Normal;
        }
    }

    /// Whether the weapon cooldown has elapsed
    pub fn can_attack(&self, now: u64) -> bool {
        match self.last_attack_tick {
            Some(last) => now.saturating_sub(last) >= self.attack_cooldown,
            None => true,
        }
    }
}

impl Hitbox for Player {
    fn hitbox(&self) -> Rect {
        self.rect()
    }
}

/// Horizontal scroll offset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrickKind {
    #[default]
    Normal,
    /// Invisible until bumped
    Hidden,
    /// Drops a power-up
    Item,
    /// Drops a weapon chest
    Weapon,
}

impl BrickKind {
    /// Hits before the brick breaks
    pub fn hits(self) -> u8 {
        1
    }

    pub fn starts_visible(self) -> bool {
        self != BrickKind::Hidden
    }

    /// Texture patterns a fresh brick may pick from
    pub fn patterns(self) -> &'static [BrickPattern] {
        match self {
            BrickKind::Hidden => &[BrickPattern::Solid],
            _ => &[BrickPattern::Solid, BrickPattern::Lined, BrickPattern::Brick],
        }
    }
}

/// Visual texture tag for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickPattern {
    Solid,
    Lined,
    Brick,
}

/// A breakable block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    /// How the renderer should colour it (revealed hidden bricks look normal)
    pub appearance: BrickKind,
    pub hits_left: u8,
    /// Still solid and bumpable
    pub active: bool,
    pub visible: bool,
    /// Tick the current bump animation started
    pub bump_started: Option<u64>,
    /// Vertical draw offset from the bump animation (negative = up)
    pub bump_offset: f32,
    pub pattern: BrickPattern,
}

impl Brick {
    pub fn is_bumping(&self) -> bool {
        self.bump_started.is_some()
    }
}

impl Hitbox for Brick {
    fn hitbox(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Enemy behavior variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Ground,
    Platform,
}

/// Per-variant enemy state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Walks the ground, falls with gravity, chases the player when close
    Ground {
        vel_y: f32,
        gravity: f32,
        chase_range: f32,
        chasing: bool,
    },
    /// Pinned to a platform, turns before its edges
    Platform { platform_y: f32, edge_margin: f32 },
}

/// Horizontal range a non-chasing enemy paces in
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Patrol {
    pub start: f32,
    pub end: f32,
}

/// A fox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
    pub patrol: Patrol,
    pub armed: bool,
    pub weapon: WeaponId,
    pub attack_cooldown: u64,
    pub last_attack_tick: Option<u64>,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            EnemyBehavior::Ground { .. } => EnemyKind::Ground,
            EnemyBehavior::Platform { .. } => EnemyKind::Platform,
        }
    }

    /// Points for defeating this enemy
    pub fn score(&self) -> u64 {
        match (self.kind(), self.armed) {
            (EnemyKind::Platform, true) => 250,
            (EnemyKind::Platform, false) => 150,
            (EnemyKind::Ground, true) => 200,
            (EnemyKind::Ground, false) => 100,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Ground { chasing: true, .. })
    }
}

impl Hitbox for Enemy {
    fn hitbox(&self) -> Rect {
        self.rect()
    }
}

/// Pickup movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Placed by the level; never moves
    Static,
    /// Dropped from a brick; bounces and slides
    Falling {
        vel: Vec2,
        gravity: f32,
        friction: f32,
    },
}

impl Motion {
    /// Standard brick drop with the given horizontal direction
    pub fn dropped(direction: f32) -> Self {
        Motion::Falling {
            vel: Vec2::new(direction * DROP_SPEED_X, DROP_LAUNCH_VY),
            gravity: DROP_GRAVITY,
            friction: DROP_FRICTION,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Super size
    Mushroom,
    /// Flight
    Wings,
}

/// A collectable item; `K` carries what it grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup<K> {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Collected items stay in their list but are skipped everywhere
    pub collected: bool,
    pub motion: Motion,
    pub kind: K,
}

impl<K> Pickup<K> {
    pub fn new(id: u32, pos: Vec2, size: Vec2, motion: Motion, kind: K) -> Self {
        Self {
            id,
            pos,
            size,
            collected: false,
            motion,
            kind,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

impl<K> Hitbox for Pickup<K> {
    fn hitbox(&self) -> Rect {
        self.rect()
    }
}

pub type Coin = Pickup<()>;
pub type PowerUp = Pickup<PowerUpKind>;
/// Weapon drop
pub type Chest = Pickup<WeaponId>;

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Centre
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half extent of the hit square
    pub size: f32,
    pub owner: Owner,
    pub active: bool,
}

impl Projectile {
    pub fn is_enemy(&self) -> bool {
        self.owner == Owner::Enemy
    }
}

impl Hitbox for Projectile {
    fn hitbox(&self) -> Rect {
        Rect::around(self.pos, self.size)
    }
}

/// Particle flavours (renderer picks colours from these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Jump,
    Attack,
    Brick,
    Collect,
    Wings,
    Enemy,
    PowerUp,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Ticks left
    pub life: u32,
    pub alpha: f32,
    pub kind: ParticleKind,
}

/// Floating text flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Coin,
    Enemy,
    Chest,
    PowerUp,
}

/// Rising, fading text ("+50", "Shrunk!")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    /// World position
    pub pos: Vec2,
    pub text: String,
    pub kind: EffectKind,
    pub life: u32,
    pub alpha: f32,
}

/// Complete world state
#[derive(Debug, Clone, Serialize)]
pub struct WorldState {
    /// Level and weapon tables
    #[serde(skip)]
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,

    /// Current level (1-based)
    pub level: u32,
    pub objective: String,
    pub require_coins: u32,
    pub require_enemies: u32,
    /// Enemies spawned when the level was built
    pub level_enemy_total: u32,

    pub score: u64,
    pub coin_count: u32,
    pub death_count: u32,
    /// Tick the session started
    pub start_tick: u64,
    /// Screen flash after a death (ticks remaining)
    pub flash_ticks: u32,

    pub player: Player,
    pub camera: Camera,
    /// Ground segment first, then the level's platforms
    pub platforms: Vec<Rect>,
    pub bricks: Vec<Brick>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub powerups: Vec<PowerUp>,
    pub chests: Vec<Chest>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub effects: Vec<Effect>,

    /// Enemies already defeated this tick; cleared at tick start
    pub enemies_hit: BTreeSet<u32>,
    /// Enemy shots waiting for their reaction delay
    pub shots: ShotQueue,

    #[serde(skip)]
    pub pending: Option<Transition>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl WorldState {
    /// Validate the config and start at level 1
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            level: 1,
            objective: String::new(),
            require_coins: 0,
            require_enemies: 0,
            level_enemy_total: 0,
            score: 0,
            coin_count: 0,
            death_count: 0,
            start_tick: 0,
            flash_ticks: 0,
            player: Player::default(),
            camera: Camera::default(),
            platforms: Vec::new(),
            bricks: Vec::new(),
            enemies: Vec::new(),
            coins: Vec::new(),
            powerups: Vec::new(),
            chests: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            effects: Vec::new(),
            enemies_hit: BTreeSet::new(),
            shots: ShotQueue::default(),
            pending: None,
            events: Vec::new(),
            next_id: 1,
        };

        state.init_level(1)?;
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ask for a level transition at the end of this tick (first request wins)
    pub fn request(&mut self, transition: Transition) {
        if self.pending.is_none() {
            self.pending = Some(transition);
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all notifications raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn collected_coins(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    pub fn enemy_index(&self, id: u32) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    /// Seconds since the session started
    pub fn play_time_secs(&self) -> f32 {
        crate::ticks_to_secs(self.time_ticks.saturating_sub(self.start_tick))
    }

    /// Serialize everything the renderer draws
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
