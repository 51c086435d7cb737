//! Level and weapon tables
//!
//! Static configuration consumed by the simulation. The built-in tables cover
//! the three shipped levels; a host can also load its own from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geom::Rect;
use crate::sim::state::BrickKind;

/// Fatal configuration problems (the level cannot be initialized)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("game config defines no levels")]
    NoLevels,
    #[error("level {0} is not configured")]
    UnknownLevel(u32),
    #[error("weapon {0:?} is referenced but not configured")]
    MissingWeapon(WeaponId),
    #[error("weapon {0:?} fires no projectiles")]
    EmptyWeapon(WeaponId),
    #[error("level {level}: {what} has a negative size")]
    NegativeSize { level: u32, what: &'static str },
    #[error("level width {level_width} is narrower than the viewport ({viewport_width})")]
    LevelTooNarrow { level_width: f32, viewport_width: f32 },
}

/// Weapon identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponId {
    /// Player weapon dropped by weapon bricks
    Scatter,
    /// Carried by armed enemies
    EnemyGun,
}

/// Per-weapon tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Display name
    pub name: String,
    /// Projectiles per attack
    pub projectiles: u32,
    /// Total spread angle (degrees)
    pub spread: f32,
    /// Projectile speed (units per tick)
    pub speed: f32,
    /// Attack cooldown (milliseconds)
    pub cooldown_ms: u32,
}

impl WeaponConfig {
    /// Spread in radians
    pub fn spread_radians(&self) -> f32 {
        self.spread.to_radians()
    }
}

/// A brick placed in a level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BrickPlacement {
    pub x: f32,
    pub y: f32,
    pub kind: BrickKind,
}

/// Per-level tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub objective: String,
    /// Coins that must be collected to finish the level
    pub require_coins: u32,
    /// Enemies that must be defeated to finish the level
    pub require_enemies: u32,
    /// Platforms above the ground segment
    pub platforms: Vec<Rect>,
    pub bricks: Vec<BrickPlacement>,
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub level_width: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Top edge of the ground segment
    pub ground_y: f32,
    pub ground_height: f32,
    /// Levels in play order (level 1 is the first entry)
    pub levels: Vec<LevelConfig>,
    pub weapons: BTreeMap<WeaponId, WeaponConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            WeaponId::Scatter,
            WeaponConfig {
                name: "Scatter Gun".to_string(),
                projectiles: 5,
                spread: 45.0,
                speed: 10.0,
                cooldown_ms: 500,
            },
        );
        weapons.insert(
            WeaponId::EnemyGun,
            WeaponConfig {
                name: "Enemy Gun".to_string(),
                projectiles: 1,
                spread: 10.0,
                speed: 6.0,
                cooldown_ms: ENEMY_COOLDOWN_MS,
            },
        );

        Self {
            level_width: LEVEL_WIDTH,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ground_y: GROUND_Y,
            ground_height: GROUND_HEIGHT,
            levels: vec![forest_adventure(), desert_challenge(), mountain_peak()],
            weapons,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON (for writing a template config)
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of levels; the last one ends the game
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Look up a level by 1-based number
    pub fn level(&self, level: u32) -> Result<&LevelConfig, ConfigError> {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .ok_or(ConfigError::UnknownLevel(level))
    }

    pub fn weapon(&self, id: WeaponId) -> Result<&WeaponConfig, ConfigError> {
        self.weapons.get(&id).ok_or(ConfigError::MissingWeapon(id))
    }

    /// The ground segment spanning the level
    pub fn ground(&self) -> Rect {
        Rect::new(0.0, self.ground_y, self.level_width, self.ground_height)
    }

    /// Check everything the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.level_width < self.viewport_width {
            return Err(ConfigError::LevelTooNarrow {
                level_width: self.level_width,
                viewport_width: self.viewport_width,
            });
        }

        // Weapon bricks drop scatter guns, armed enemies carry enemy guns
        for id in [WeaponId::Scatter, WeaponId::EnemyGun] {
            if self.weapon(id)?.projectiles == 0 {
                return Err(ConfigError::EmptyWeapon(id));
            }
        }

        for (i, level) in self.levels.iter().enumerate() {
            let number = i as u32 + 1;
            if level.platforms.iter().any(|p| p.width < 0.0 || p.height < 0.0) {
                return Err(ConfigError::NegativeSize {
                    level: number,
                    what: "platform",
                });
            }
        }

        Ok(())
    }
}

fn platform(x: f32, y: f32, width: f32) -> Rect {
    Rect::new(x, y, width, 30.0)
}

fn brick(x: f32, y: f32, kind: BrickKind) -> BrickPlacement {
    BrickPlacement { x, y, kind }
}

const OBJECTIVE: &str = "Break blocks for items, collect coins and defeat armed foxes";

fn forest_adventure() -> LevelConfig {
    use BrickKind::*;
    LevelConfig {
        name: "Forest Adventure".to_string(),
        objective: OBJECTIVE.to_string(),
        require_coins: 5,
        require_enemies: 2,
        platforms: vec![
            platform(250.0, 450.0, 200.0),
            platform(600.0, 380.0, 150.0),
            platform(950.0, 320.0, 150.0),
            platform(1300.0, 280.0, 200.0),
            platform(1700.0, 330.0, 150.0),
            platform(2100.0, 300.0, 150.0),
            platform(2500.0, 250.0, 150.0),
            platform(2900.0, 300.0, 200.0),
        ],
        bricks: vec![
            brick(400.0, 350.0, Item),
            brick(600.0, 300.0, Item),
            brick(900.0, 250.0, Item),
            brick(1200.0, 200.0, Item),
            brick(1500.0, 250.0, Item),
            brick(1800.0, 300.0, Weapon),
            brick(2100.0, 250.0, Item),
            brick(2400.0, 200.0, Weapon),
        ],
    }
}

fn desert_challenge() -> LevelConfig {
    use BrickKind::*;
    LevelConfig {
        name: "Desert Challenge".to_string(),
        objective: OBJECTIVE.to_string(),
        require_coins: 5,
        require_enemies: 3,
        platforms: vec![
            platform(200.0, 450.0, 150.0),
            platform(500.0, 380.0, 150.0),
            platform(850.0, 320.0, 150.0),
            platform(1200.0, 260.0, 150.0),
            platform(1600.0, 300.0, 150.0),
            platform(2000.0, 250.0, 150.0),
            platform(2400.0, 280.0, 150.0),
            platform(2800.0, 320.0, 150.0),
        ],
        bricks: vec![
            brick(350.0, 350.0, Item),
            brick(500.0, 300.0, Item),
            brick(800.0, 250.0, Item),
            brick(1100.0, 200.0, Item),
            brick(1400.0, 240.0, Weapon),
            brick(1700.0, 280.0, Item),
            brick(2000.0, 220.0, Item),
            brick(2300.0, 260.0, Item),
            brick(2600.0, 300.0, Weapon),
        ],
    }
}

fn mountain_peak() -> LevelConfig {
    use BrickKind::*;
    LevelConfig {
        name: "Mountain Peak".to_string(),
        objective: OBJECTIVE.to_string(),
        require_coins: 5,
        require_enemies: 4,
        platforms: vec![
            platform(200.0, 500.0, 120.0),
            platform(500.0, 430.0, 120.0),
            platform(850.0, 370.0, 120.0),
            platform(1200.0, 310.0, 120.0),
            platform(1550.0, 250.0, 120.0),
            platform(1900.0, 280.0, 120.0),
            platform(2250.0, 320.0, 120.0),
            platform(2600.0, 360.0, 120.0),
            platform(2950.0, 400.0, 120.0),
        ],
        bricks: vec![
            brick(300.0, 400.0, Item),
            brick(500.0, 350.0, Item),
            brick(800.0, 300.0, Item),
            brick(1100.0, 250.0, Item),
            brick(1400.0, 200.0, Weapon),
            brick(1700.0, 230.0, Item),
            brick(2000.0, 260.0, Weapon),
            brick(2300.0, 290.0, Item),
            brick(2600.0, 320.0, Item),
            brick(2900.0, 350.0, Item),
        ],
    }
}
