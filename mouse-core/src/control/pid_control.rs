/*
    PID Controller
*/

/* --------------------------- Config -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PIDConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub i_limit: f32,
}

impl PIDConfig {
    pub const fn new(kp: f32, ki: f32, kd: f32, i_limit: f32) -> Self {
        Self { kp, ki, kd, i_limit }
    }
}

/* --------------------------- Code -------------------------- */
/// Discrete PID with an integral clamped to `±i_limit`. Gains can be swapped at
/// any time without touching the accumulated state.
#[derive(Debug, Clone)]
pub struct PIDcontrol {
    kp: f32,
    ki: f32,
    kd: f32,
    i_limit: f32,
    integral: f32,
    prev_error: f32,
}

impl PIDcontrol {
    pub const fn new(config: PIDConfig) -> Self {
        Self {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            i_limit: config.i_limit,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    pub fn update_pid_param(&mut self, config: PIDConfig) {
        self.kp = config.kp;
        self.ki = config.ki;
        self.kd = config.kd;
        self.i_limit = config.i_limit;
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    fn limit_integral(&mut self) {
        let limit = self.i_limit.abs();
        self.integral = self.integral.clamp(-limit, limit);
    }

    pub fn calculate(&mut self, target: f32, measured: f32) -> f32 {
        let error = target - measured;

        self.integral += error;
        self.limit_integral();

        let derivative = error - self.prev_error;
        self.prev_error = error;

        return self.kp * error + self.ki * self.integral + self.kd * derivative;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn integral_stays_clamped() {
        let mut pid = PIDcontrol::new(PIDConfig::new(0.0, 1.0, 0.0, 5.0));
        for _ in 0..100 {
            pid.calculate(10.0, 0.0);
        }
        assert_relative_eq!(pid.integral(), 5.0);

        for _ in 0..100 {
            pid.calculate(-10.0, 0.0);
        }
        assert_relative_eq!(pid.integral(), -5.0);
    }

    #[test]
    fn zero_limit_disables_the_integral_term() {
        let mut pid = PIDcontrol::new(PIDConfig::new(2.0, 1.0, 0.0, 0.0));
        let output = pid.calculate(1.0, 0.0);
        assert_relative_eq!(output, 2.0);
        assert_relative_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut pid = PIDcontrol::new(PIDConfig::new(0.0, 0.0, 1.0, 0.0));
        assert_relative_eq!(pid.calculate(1.0, 0.0), 1.0);
        assert_relative_eq!(pid.calculate(3.0, 0.0), 2.0);

        pid.reset();
        assert_relative_eq!(pid.calculate(3.0, 0.0), 3.0);
    }

    #[test]
    fn gain_swap_keeps_state() {
        let mut pid = PIDcontrol::new(PIDConfig::new(1.0, 1.0, 0.0, 100.0));
        pid.calculate(2.0, 0.0);
        pid.update_pid_param(PIDConfig::new(0.0, 2.0, 0.0, 100.0));
        assert_relative_eq!(pid.calculate(2.0, 0.0), 8.0);
    }
}
