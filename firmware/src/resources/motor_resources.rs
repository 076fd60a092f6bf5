/*
    Motor Resources

    Two-pin H-bridge per wheel: channel A drives forward, channel B reverse.
    The fan uses a single channel. 125 MHz / 5 / (999 + 1) = 25 kHz.
*/

use super::*;

const PWM_DIVIDER: u8 = 5;

fn pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.top = PWM_PERIOD_TICKS as u16;
    config.divider = PWM_DIVIDER.into();
    config.compare_a = 0;
    config.compare_b = 0;
    return config;
}

/// Signed duty to the (forward, reverse) compare pair.
pub fn bridge_compare(duty: i32) -> (u16, u16) {
    let duty = duty.clamp(-PWM_PERIOD_TICKS, PWM_PERIOD_TICKS);
    if duty > 0 {
        (duty as u16, 0)
    }
    else {
        (0, duty.unsigned_abs() as u16)
    }
}

pub struct Motors<'d> {
    left: Pwm<'d>,
    right: Pwm<'d>,
    fan: Pwm<'d>,
    left_config: PwmConfig,
    right_config: PwmConfig,
    fan_config: PwmConfig,
    last_duty: MotorDuty,
}

impl<'d> Motors<'d> {
    pub fn new(resources: MotorResources) -> Self {
        let left = Pwm::new_output_ab(resources.LEFT_SLICE, resources.LEFT_PWM_FWD_PIN, resources.LEFT_PWM_REV_PIN, pwm_config());
        let right = Pwm::new_output_ab(resources.RIGHT_SLICE, resources.RIGHT_PWM_FWD_PIN, resources.RIGHT_PWM_REV_PIN, pwm_config());
        let fan = Pwm::new_output_a(resources.FAN_SLICE, resources.FAN_PWM_PIN, pwm_config());

        Self {
            left,
            right,
            fan,
            left_config: pwm_config(),
            right_config: pwm_config(),
            fan_config: pwm_config(),
            last_duty: MotorDuty::default(),
        }
    }

    pub fn set_duty(&mut self, duty: MotorDuty) {
        if duty == self.last_duty {
            return;
        }
        self.last_duty = duty;

        (self.left_config.compare_a, self.left_config.compare_b) = bridge_compare(duty.left);
        (self.right_config.compare_a, self.right_config.compare_b) = bridge_compare(duty.right);
        self.fan_config.compare_a = duty.fan.clamp(0, PWM_PERIOD_TICKS) as u16;

        self.left.set_config(&self.left_config);
        self.right.set_config(&self.right_config);
        self.fan.set_config(&self.fan_config);
    }

    pub fn stop(&mut self) {
        self.set_duty(MotorDuty::default());
    }

    pub fn last_duty(&self) -> MotorDuty {
        return self.last_duty;
    }
}
