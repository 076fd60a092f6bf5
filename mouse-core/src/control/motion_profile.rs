/*
    Motion Profile Generator
*/

use libm::sqrtf;

use crate::resources::movement_params::TurnParams;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ProfileType {
    Trapezoidal,
    Triangular,
}

/// Symmetric trapezoidal velocity over a signed displacement, triangular when
/// the distance is too short to reach `v_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapezoidProfile {
    a_max: f32,
    t_acc: f32,
    t_coast: f32,
    t_total: f32,
    profile_type: ProfileType,
    direction: f32,
}

impl TrapezoidProfile {
    pub fn new(displacement: f32, v_max: f32, a_max: f32) -> Self {
        let direction = if displacement < 0.0 { -1.0 } else { 1.0 };
        let displacement_abs = displacement.abs();
        let v_max_abs = v_max.abs();
        let a_max_abs = a_max.abs();

        let (profile_type, t_acc, t_coast, t_total) = if v_max_abs <= 0.0 || a_max_abs <= 0.0 {
            (ProfileType::Triangular, 0.0, 0.0, 0.0)
        } else {
            let d_min = (v_max_abs * v_max_abs) / a_max_abs;
            if displacement_abs >= d_min {
                let t_acc = v_max_abs / a_max_abs;
                let t_coast = (displacement_abs - d_min) / v_max_abs;
                (ProfileType::Trapezoidal, t_acc, t_coast, 2.0 * t_acc + t_coast)
            } else {
                let t_acc = sqrtf(displacement_abs / a_max_abs);
                (ProfileType::Triangular, t_acc, 0.0, 2.0 * t_acc)
            }
        };

        Self {
            a_max: a_max_abs,
            t_acc,
            t_coast,
            t_total,
            profile_type,
            direction,
        }
    }

    pub fn t_acc(&self) -> f32 {
        self.t_acc
    }

    pub fn t_coast(&self) -> f32 {
        self.t_coast
    }

    pub fn duration(&self) -> f32 {
        self.t_total
    }

    pub fn is_triangular(&self) -> bool {
        self.profile_type == ProfileType::Triangular
    }

    /// Signed velocity at `t`, zero outside the profile.
    pub fn velocity(&self, t: f32) -> f32 {
        if t <= 0.0 || t >= self.t_total {
            return 0.0;
        }

        let peak = self.a_max * self.t_acc;
        let speed = if t < self.t_acc {
            self.a_max * t
        } else if t < self.t_acc + self.t_coast {
            peak
        } else {
            peak - self.a_max * (t - self.t_acc - self.t_coast)
        };

        self.direction * speed.max(0.0)
    }
}

/* --------------------------- Turn Profile -------------------------- */
/// Time breakpoints of a turn, in seconds from the start of the movement.
///
/// - `t0` end of the straight entry (`start_cm` at the turn's linear speed)
/// - `t1` end of angular acceleration
/// - `t2` end of constant angular speed
/// - `t3` end of angular deceleration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TurnProfile {
    pub t0: f32,
    pub t1: f32,
    pub t2: f32,
    pub t3: f32,
    sign: f32,
    rotation: TrapezoidProfile,
}

impl TurnProfile {
    pub fn new(params: &TurnParams) -> Self {
        let t0 = if params.start_cm > 0.0 && params.turn_linear_speed > 0.0 {
            // cm over m/s
            params.start_cm / (params.turn_linear_speed * 100.0)
        } else {
            0.0
        };
        Self::with_entry(params, t0)
    }

    /// Profile for an in-place rotation, no straight entry.
    pub fn in_place(params: &TurnParams) -> Self {
        Self::with_entry(params, 0.0)
    }

    fn with_entry(params: &TurnParams, t0: f32) -> Self {
        let rotation = TrapezoidProfile::new(params.angle_to_turn, params.max_angular_speed, params.angular_accel);
        let t1 = t0 + rotation.t_acc();
        let t2 = t1 + rotation.t_coast();
        let t3 = t0 + rotation.duration();
        Self {
            t0,
            t1,
            t2,
            t3,
            sign: params.sign,
            rotation,
        }
    }

    /// Target angular speed [rad/s] at `t` seconds into the movement.
    pub fn angular_speed(&self, t: f32) -> f32 {
        self.sign * self.rotation.velocity(t - self.t0)
    }

    pub fn is_done(&self, t: f32) -> bool {
        t > self.t3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trapezoid_reaches_target() {
        let profile = TrapezoidProfile::new(10.0, 2.0, 1.0);
        assert!(!profile.is_triangular());
        assert_relative_eq!(profile.t_acc(), 2.0);
        assert_relative_eq!(profile.t_coast(), 3.0);
        assert_relative_eq!(profile.duration(), 7.0);
        assert_relative_eq!(profile.velocity(1.0), 1.0);
        assert_relative_eq!(profile.velocity(3.0), 2.0);
        assert_relative_eq!(profile.velocity(6.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(profile.velocity(7.0), 0.0);
    }

    #[test]
    fn short_move_is_triangular() {
        let profile = TrapezoidProfile::new(-1.0, 2.0, 1.0);
        assert!(profile.is_triangular());
        assert_relative_eq!(profile.duration(), 2.0);
        assert_relative_eq!(profile.velocity(1.0), -1.0, epsilon = 1e-6);
        assert_relative_eq!(profile.velocity(1.5), -0.5, epsilon = 1e-6);
    }

    fn quarter_turn(start_cm: f32) -> TurnParams {
        TurnParams {
            start_cm,
            end_cm: 0.0,
            turn_linear_speed: 0.5,
            angular_accel: 100.0,
            max_angular_speed: 10.0,
            angle_to_turn: core::f32::consts::FRAC_PI_2,
            sign: -1.0,
        }
    }

    #[test]
    fn turn_breakpoints_follow_the_trapezoid() {
        let profile = TurnProfile::new(&quarter_turn(1.5));
        // 1.5 cm at 0.5 m/s
        assert_relative_eq!(profile.t0, 0.03, epsilon = 1e-6);
        assert_relative_eq!(profile.t1 - profile.t0, 0.1, epsilon = 1e-6);
        assert_relative_eq!(profile.t3 - profile.t2, 0.1, epsilon = 1e-6);
        assert!(profile.t2 > profile.t1);

        assert_relative_eq!(profile.angular_speed(0.01), 0.0);
        assert_relative_eq!(profile.angular_speed(profile.t1 + 0.01), -10.0, epsilon = 1e-4);
        assert!(!profile.is_done(profile.t3));
        assert!(profile.is_done(profile.t3 + 0.001));
        assert_relative_eq!(profile.angular_speed(profile.t3 + 0.001), 0.0);
    }

    #[test]
    fn negative_start_offset_has_no_straight_entry() {
        let profile = TurnProfile::new(&quarter_turn(-2.0));
        assert_relative_eq!(profile.t0, 0.0);
    }
}
