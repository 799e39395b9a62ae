//! Data-driven game balance
//!
//! Defaults come from `consts`; a build can override them from JSON without
//! touching the simulation code.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Skier speed at start and after recovering from a crash (px/tick)
    pub starting_speed: f32,
    /// Seconds a jump lasts
    pub jump_duration: f32,
    /// Seconds after take-off before the landing sprite shows
    pub landing_swap_delay: f32,
    /// Seconds between being eaten and the new session
    pub restart_delay: f32,
    /// Rhino pursuit speed (px/tick)
    pub rhino_speed: f32,
    /// Rhino head start behind the skier (px)
    pub rhino_start_distance: f32,
    /// Sprite animation frame length (seconds)
    pub animation_frame: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_speed: STARTING_SPEED,
            jump_duration: JUMP_DURATION_SECS,
            landing_swap_delay: LANDING_SWAP_SECS,
            restart_delay: RESTART_DELAY_SECS,
            rhino_speed: RHINO_SPEED,
            rhino_start_distance: RHINO_START_DISTANCE,
            animation_frame: ANIMATION_FRAME_SECS,
        }
    }
}

impl Tuning {
    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the game.
    ///
    /// The rhino must stay faster than the skier's base speed or it could
    /// never catch up, and timers need a positive length.
    pub fn sanitized(mut self) -> Self {
        if !(self.starting_speed > 0.0) {
            log::warn!("starting_speed {} invalid, using default", self.starting_speed);
            self.starting_speed = STARTING_SPEED;
        }
        if !(self.rhino_speed > self.starting_speed) {
            log::warn!(
                "rhino_speed {} not above starting_speed {}, bumping it",
                self.rhino_speed,
                self.starting_speed
            );
            self.rhino_speed = self.starting_speed + 1.0;
        }
        self.jump_duration = self.jump_duration.max(SIM_DT);
        self.landing_swap_delay = self.landing_swap_delay.max(0.0);
        self.restart_delay = self.restart_delay.max(0.0);
        self.animation_frame = self.animation_frame.max(SIM_DT);
        self.rhino_start_distance = self.rhino_start_distance.max(0.0);
        self
    }
}
