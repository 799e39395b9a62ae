//! On-screen readouts fed by simulation events

use crate::sim::GameEvent;

/// Last skier speed announced by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedReadout {
    speed: f32,
    starting_speed: f32,
}

impl SpeedReadout {
    pub fn new(starting_speed: f32) -> Self {
        Self {
            speed: starting_speed,
            starting_speed,
        }
    }

    /// Track speed changes; a restart puts the readout back to the starting speed
    pub fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::SpeedChanged { speed } => self.speed = speed,
                GameEvent::RestartRequested => self.speed = self.starting_speed,
                _ => {}
            }
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn text(&self) -> String {
        format!("Speed: {}", self.speed.round())
    }
}
