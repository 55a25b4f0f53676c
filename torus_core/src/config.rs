// config.rs - Timings and layout for one piece container

use std::time::Duration;

use glam::Vec2;

use crate::motion::AmbientPulse;

pub const MOVE_DURATION: Duration = Duration::from_millis(500);
pub const SCALE_DURATION: Duration = Duration::from_millis(500);
pub const PULSE_MIN_ALPHA: f32 = 0.8;
pub const PULSE_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerConfig {
    /// Position of display cell [0, 0]; the lattice grows right and down from here.
    pub start_origin: Vec2,
    pub move_duration: Duration,
    pub scale_duration: Duration,
    pub pulse: AmbientPulse,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            start_origin: Vec2::ZERO,
            move_duration: MOVE_DURATION,
            scale_duration: SCALE_DURATION,
            pulse: AmbientPulse {
                min_alpha: PULSE_MIN_ALPHA,
                period: PULSE_PERIOD,
            },
        }
    }
}

impl ContainerConfig {
    pub fn with_start_origin(mut self, start_origin: Vec2) -> Self {
        self.start_origin = start_origin;
        self
    }
}
