/*
    Wheel Odometry
*/

use crate::resources::config::ENCODER_DIST_CM_PER_EDGE;
use crate::resources::config::ENCODER_STALL_TICKS;
use crate::resources::config::TICK_S;
use crate::resources::config::VELOCITY_FILTER_HISTORY;
use crate::resources::sensor_resources::EncoderDelta;

/// Distance and velocity of the robot centre from the two wheel encoders.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Odometry {
    traveled_cm: f32,
    velocity_m_s: f32,
    idle_ticks: u32,
}

impl Odometry {
    pub const fn new() -> Self {
        Self {
            traveled_cm: 0.0,
            velocity_m_s: 0.0,
            idle_ticks: 0,
        }
    }

    /// Integrates one tick of encoder edges, returns the distance covered [cm].
    pub fn update(&mut self, delta: EncoderDelta) -> f32 {
        let left_cm = delta.left as f32 * ENCODER_DIST_CM_PER_EDGE;
        let right_cm = delta.right as f32 * ENCODER_DIST_CM_PER_EDGE;
        let distance_cm = (left_cm + right_cm) / 2.0;

        if delta.is_zero() {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
        } else {
            self.idle_ticks = 0;
        }

        if self.idle_ticks >= ENCODER_STALL_TICKS {
            self.velocity_m_s = 0.0;
        } else {
            let raw_m_s = distance_cm / 100.0 / TICK_S;
            self.velocity_m_s = (1.0 - VELOCITY_FILTER_HISTORY) * raw_m_s + VELOCITY_FILTER_HISTORY * self.velocity_m_s;
        }

        self.traveled_cm += distance_cm;
        distance_cm
    }

    pub fn traveled_cm(&self) -> f32 {
        self.traveled_cm
    }

    pub fn set_traveled_cm(&mut self, traveled_cm: f32) {
        self.traveled_cm = traveled_cm;
    }

    /// Filtered mean wheel velocity [m/s].
    pub fn velocity_m_s(&self) -> f32 {
        self.velocity_m_s
    }

    pub fn is_stalled(&self) -> bool {
        self.idle_ticks >= ENCODER_STALL_TICKS
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Odometry {
    fn default() -> Self {
        Self::new()
    }
}
