/*
    Control Cascade
        target speeds + feedback -> left / right / fan duty

    left  = linear + rotation
    right = linear - rotation
    rotation = -angular_pid(target_angular, gyro)
*/

use libm::fabsf;

use crate::resources::config::*;
use crate::resources::general_params::GeneralParams;

use super::pid_control::PIDcontrol;

/* --------------------------- Types -------------------------- */
/// Which IR correction is layered onto the angular target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WallFollow {
    #[default]
    Off,
    Sides,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Feedback {
    /// Filtered mean wheel velocity [m/s].
    pub linear_velocity: f32,
    /// Gyro rate [rad/s], counter-clockwise positive.
    pub angular_velocity: f32,
    pub battery_voltage: f32,
    pub side_error: f32,
    pub diagonal_error: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorDuty {
    pub left: i32,
    pub right: i32,
    pub fan: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmergencyCause {
    External,
    LinearTracking,
    AngularTracking,
    GyroRate,
    LowBattery,
}

/* --------------------------- Cascade -------------------------- */
pub struct ControlCascade {
    angular_pid: PIDcontrol,
    wall_pid: PIDcontrol,
    linear_pid: PIDcontrol,
    diagonal_pid: PIDcontrol,
    fan_speed: f32,
    target_linear_m_s: f32,
    target_angular_rad_s: f32,
    wall_follow: WallFollow,
    disabled: bool,
    emergency: Option<EmergencyCause>,
}

impl ControlCascade {
    pub fn new(params: &GeneralParams) -> Self {
        Self {
            angular_pid: PIDcontrol::new(params.angular),
            wall_pid: PIDcontrol::new(params.wall),
            linear_pid: PIDcontrol::new(params.linear_velocity),
            diagonal_pid: PIDcontrol::new(params.diagonal_walls),
            fan_speed: params.fan_speed,
            target_linear_m_s: 0.0,
            target_angular_rad_s: 0.0,
            wall_follow: WallFollow::Off,
            disabled: false,
            emergency: None,
        }
    }

    /// Reloads gains, clears integrators, targets and the emergency latch.
    pub fn reset(&mut self, params: &GeneralParams) {
        *self = Self::new(params);
    }

    /// Swaps gains without touching the integrators.
    pub fn update_params(&mut self, params: &GeneralParams) {
        self.angular_pid.update_pid_param(params.angular);
        self.wall_pid.update_pid_param(params.wall);
        self.linear_pid.update_pid_param(params.linear_velocity);
        self.diagonal_pid.update_pid_param(params.diagonal_walls);
        self.fan_speed = params.fan_speed;
    }

    pub fn set_target_speeds(&mut self, linear_m_s: f32, angular_rad_s: f32) {
        self.target_linear_m_s = linear_m_s;
        self.target_angular_rad_s = angular_rad_s;
    }

    pub fn target_speeds(&self) -> (f32, f32) {
        (self.target_linear_m_s, self.target_angular_rad_s)
    }

    pub fn set_wall_follow(&mut self, mode: WallFollow) {
        self.wall_follow = mode;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_emergency(&mut self) {
        self.latch(EmergencyCause::External);
    }

    pub fn emergency(&self) -> Option<EmergencyCause> {
        self.emergency
    }

    fn latch(&mut self, cause: EmergencyCause) {
        if self.emergency.is_none() {
            log::warn!("control: emergency {:?}", cause);
            self.emergency = Some(cause);
        }
    }

    pub fn update(&mut self, feedback: &Feedback) -> MotorDuty {
        let battery_present = feedback.battery_voltage >= BATTERY_PRESENT_VOLTAGE;
        if battery_present && feedback.battery_voltage < LOW_BATTERY_VOLTAGE {
            self.latch(EmergencyCause::LowBattery);
        }
        if fabsf(feedback.angular_velocity) > MAX_GYRO_RATE_RAD_S {
            self.latch(EmergencyCause::GyroRate);
        }

        let mut duty = MotorDuty::default();

        if !self.disabled {
            let mut target_angular = self.target_angular_rad_s;
            match self.wall_follow {
                WallFollow::Sides => target_angular += self.wall_pid.calculate(0.0, feedback.side_error),
                WallFollow::Diagonal => target_angular += self.diagonal_pid.calculate(0.0, feedback.diagonal_error),
                WallFollow::Off => {}
            }

            let linear = self.linear_pid.calculate(self.target_linear_m_s, feedback.linear_velocity);
            let rotation = -self.angular_pid.calculate(target_angular, feedback.angular_velocity);

            if fabsf(self.target_linear_m_s - feedback.linear_velocity) > MAX_LINEAR_ERROR_M_S {
                self.latch(EmergencyCause::LinearTracking);
            }
            if fabsf(target_angular - feedback.angular_velocity) > MAX_ANGULAR_ERROR_RAD_S {
                self.latch(EmergencyCause::AngularTracking);
            }

            let (left, right) = saturate(
                voltage_to_duty(linear + rotation),
                voltage_to_duty(linear - rotation),
                PWM_PERIOD_TICKS as f32,
            );
            duty.left = left as i32;
            duty.right = right as i32;
            duty.fan = self.fan_duty(feedback.battery_voltage);
        }

        if self.disabled || self.emergency.is_some() {
            return MotorDuty::default();
        }
        duty
    }

    fn fan_duty(&self, battery_voltage: f32) -> i32 {
        if battery_voltage <= MIN_FAN_BATTERY_VOLTAGE {
            return 0;
        }
        let target = self.fan_speed.clamp(0.0, FAN_MAX_SPEED);
        let volts = target / FAN_MAX_SPEED * FAN_MAX_VOLTAGE;
        (volts / battery_voltage * FAN_MAX_SPEED) as i32
    }
}

fn voltage_to_duty(volts: f32) -> f32 {
    volts / MAX_BATTERY_VOLTAGE * PWM_PERIOD_TICKS as f32
}

/// Clamps both wheels to `±max` while keeping their difference, so a
/// saturated robot still turns as commanded.
fn saturate(mut left: f32, mut right: f32, max: f32) -> (f32, f32) {
    if left > max || right > max {
        let diff = fabsf(left - right).min(2.0 * max);
        if left > right {
            left = max;
            right = max - diff;
        } else {
            left = max - diff;
            right = max;
        }
    }

    if left < -max || right < -max {
        let diff = fabsf(left - right).min(2.0 * max);
        if left < right {
            left = -max;
            right = -max + diff;
        } else {
            left = -max + diff;
            right = -max;
        }
    }

    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::PIDConfig;
    use crate::resources::general_params::SpeedTier;

    fn proportional_params(linear_kp: f32, angular_kp: f32) -> GeneralParams {
        let mut params = GeneralParams::for_tier(SpeedTier::Slow);
        params.linear_velocity = PIDConfig::new(linear_kp, 0.0, 0.0, LINEAR_I_LIMIT);
        params.angular = PIDConfig::new(angular_kp, 0.0, 0.0, ANGULAR_I_LIMIT);
        params.wall = PIDConfig::new(0.01, 0.0, 0.0, 0.0);
        params.fan_speed = 0.0;
        params
    }

    fn healthy() -> Feedback {
        Feedback {
            battery_voltage: 12.0,
            ..Feedback::default()
        }
    }

    #[test]
    fn straight_command_drives_both_wheels_equally() {
        let mut cascade = ControlCascade::new(&proportional_params(6.3, 1.0));
        cascade.set_target_speeds(0.5, 0.0);
        let duty = cascade.update(&healthy());
        // 0.5 m/s error * 6.3 = 3.15 V, a quarter of 12.6 V
        assert_eq!(duty.left, 249);
        assert_eq!(duty.right, 249);
    }

    #[test]
    fn positive_angular_target_turns_left() {
        let mut cascade = ControlCascade::new(&proportional_params(0.0, 1.26));
        cascade.set_target_speeds(0.0, 1.0);
        let duty = cascade.update(&healthy());
        assert!(duty.right > 0 && duty.left < 0);
        assert_eq!(duty.right, -duty.left);
    }

    #[test]
    fn wall_error_steers_away_from_the_close_wall() {
        let mut cascade = ControlCascade::new(&proportional_params(0.0, 1.0));
        cascade.set_wall_follow(WallFollow::Sides);
        let duty = cascade.update(&Feedback {
            side_error: 100.0,
            ..healthy()
        });
        // Closer to the left wall: the left wheel speeds up.
        assert!(duty.left > duty.right);
    }

    #[test]
    fn saturation_keeps_the_difference() {
        assert_eq!(saturate(1200.0, 1000.0, 999.0), (999.0, 799.0));
        assert_eq!(saturate(-300.0, -1500.0, 999.0), (-999.0 + 1200.0, -999.0));
        assert_eq!(saturate(500.0, -500.0, 999.0), (500.0, -500.0));
        assert_eq!(saturate(3000.0, -3000.0, 999.0), (999.0, -999.0));
    }

    #[test]
    fn emergency_forces_zero_output() {
        let mut cascade = ControlCascade::new(&proportional_params(6.3, 1.0));
        cascade.set_target_speeds(0.5, 0.0);
        cascade.set_emergency();
        assert_eq!(cascade.update(&healthy()), MotorDuty::default());
        assert_eq!(cascade.emergency(), Some(EmergencyCause::External));

        cascade.reset(&proportional_params(6.3, 1.0));
        assert_eq!(cascade.emergency(), None);
        assert_eq!(cascade.target_speeds(), (0.0, 0.0));
    }

    #[test]
    fn tracking_error_latches_emergency() {
        let mut cascade = ControlCascade::new(&proportional_params(1.0, 1.0));
        cascade.set_target_speeds(1.0, 0.0);
        let duty = cascade.update(&healthy());
        assert_eq!(duty, MotorDuty::default());
        assert_eq!(cascade.emergency(), Some(EmergencyCause::LinearTracking));

        // Stays latched once the error is gone.
        cascade.set_target_speeds(0.0, 0.0);
        assert_eq!(cascade.update(&healthy()), MotorDuty::default());
    }

    #[test]
    fn battery_checks() {
        let mut cascade = ControlCascade::new(&proportional_params(1.0, 1.0));
        // No reading yet is not an emergency.
        cascade.update(&Feedback::default());
        assert_eq!(cascade.emergency(), None);

        cascade.update(&Feedback {
            battery_voltage: 9.8,
            ..Feedback::default()
        });
        assert_eq!(cascade.emergency(), Some(EmergencyCause::LowBattery));
    }

    #[test]
    fn fan_scales_with_battery() {
        let mut params = proportional_params(1.0, 1.0);
        params.fan_speed = 500.0;
        let mut cascade = ControlCascade::new(&params);
        // 3 V out of 12 V
        assert_eq!(cascade.update(&healthy()).fan, 250);

        assert_eq!(cascade.fan_duty(4.0), 0);
    }

    #[test]
    fn disabled_control_outputs_nothing() {
        let mut cascade = ControlCascade::new(&proportional_params(6.3, 1.0));
        cascade.set_target_speeds(0.5, 0.0);
        cascade.set_disabled(true);
        assert_eq!(cascade.update(&healthy()), MotorDuty::default());
        assert_eq!(cascade.emergency(), None);
    }
}
