//! Host-side frame loop
//!
//! Converts variable frame times into fixed simulation ticks and hands the
//! resulting notifications back to the shell.

use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::sim::{GameEvent, TickInput, WorldState, tick};

/// One run of the game
pub struct Session {
    pub world: WorldState,
    accumulator: f32,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            world: WorldState::new(config, seed)?,
            accumulator: 0.0,
        })
    }

    /// Run as many ticks as `frame_dt` seconds cover, returning new events
    ///
    /// Long frames are clamped and at most [`MAX_SUBSTEPS`] ticks run per
    /// call.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let dt = frame_dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.world.drain_events()
    }

    /// Start over with a fresh world on the same config
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        self.world = WorldState::new(self.world.config.clone(), seed)?;
        self.accumulator = 0.0;
        log::info!("Session restarted with seed {}", seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_becomes_ticks() {
        let mut session = Session::new(GameConfig::default(), 1).unwrap();
        session.update(SIM_DT * 3.5, &TickInput::default());
        assert_eq!(session.world.time_ticks, 3);
        session.update(SIM_DT * 0.6, &TickInput::default());
        assert_eq!(session.world.time_ticks, 4);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut session = Session::new(GameConfig::default(), 1).unwrap();
        session.update(5.0, &TickInput::default());
        assert!(session.world.time_ticks <= MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_restart_resets_world() {
        let mut session = Session::new(GameConfig::default(), 1).unwrap();
        session.update(0.05, &TickInput::default());
        session.restart(2).unwrap();
        assert_eq!(session.world.time_ticks, 0);
        assert_eq!(session.world.seed, 2);
    }
}
