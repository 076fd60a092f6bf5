/*
    General Parameters and Speed Tiers
*/

use crate::control::PIDConfig;

use super::config::*;
use super::param_packet::ErrorCode;

/* --------------------------- Speed Tier -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SpeedTier {
    SearchSlow = 0,
    SearchMedium = 1,
    SearchFast = 2,
    Slow = 3,
    Medium = 4,
    Fast = 5,
    Custom = 6,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 7] = [
        SpeedTier::SearchSlow,
        SpeedTier::SearchMedium,
        SpeedTier::SearchFast,
        SpeedTier::Slow,
        SpeedTier::Medium,
        SpeedTier::Fast,
        SpeedTier::Custom,
    ];

    pub const fn is_search(self) -> bool {
        matches!(self, SpeedTier::SearchSlow | SpeedTier::SearchMedium | SpeedTier::SearchFast)
    }
}

impl TryFrom<u8> for SpeedTier {
    type Error = ErrorCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SpeedTier::ALL.get(value as usize).copied().ok_or(ErrorCode::InvalidIndex)
    }
}

/* --------------------------- General Params -------------------------- */
/// Gains and tuning values read by the control cascade and the executor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeneralParams {
    pub fan_speed: f32,
    pub angular: PIDConfig,
    pub wall: PIDConfig,
    pub linear_velocity: PIDConfig,
    pub diagonal_walls: PIDConfig,
    pub start_wall_break_cm_left: f32,
    pub start_wall_break_cm_right: f32,
    pub enable_wall_break_correction: bool,
}

/// Number of values addressable by index, also the persisted field count.
pub const PARAM_COUNT: usize = 16;

impl GeneralParams {
    #[allow(clippy::too_many_arguments)]
    const fn table(
        fan_speed: f32,
        angular: [f32; 3],
        wall: [f32; 3],
        linear_velocity: [f32; 3],
        diagonal_walls: [f32; 3],
        wall_break_left: f32,
        wall_break_right: f32,
        enable_wall_break_correction: bool,
    ) -> Self {
        Self {
            fan_speed,
            angular: PIDConfig::new(angular[0], angular[1], angular[2], ANGULAR_I_LIMIT),
            wall: PIDConfig::new(wall[0], wall[1], wall[2], WALLS_I_LIMIT),
            linear_velocity: PIDConfig::new(linear_velocity[0], linear_velocity[1], linear_velocity[2], LINEAR_I_LIMIT),
            diagonal_walls: PIDConfig::new(diagonal_walls[0], diagonal_walls[1], diagonal_walls[2], DIAGONAL_I_LIMIT),
            start_wall_break_cm_left: wall_break_left,
            start_wall_break_cm_right: wall_break_right,
            enable_wall_break_correction,
        }
    }

    pub const fn for_tier(tier: SpeedTier) -> Self {
        match tier {
            SpeedTier::SearchSlow => DEFAULT_PARAMS_SEARCH_SLOW,
            SpeedTier::SearchMedium => DEFAULT_PARAMS_SEARCH_MEDIUM,
            SpeedTier::SearchFast => DEFAULT_PARAMS_SEARCH_FAST,
            SpeedTier::Slow => DEFAULT_PARAMS_SLOW,
            SpeedTier::Medium | SpeedTier::Custom => DEFAULT_PARAMS_MEDIUM,
            SpeedTier::Fast => DEFAULT_PARAMS_FAST,
        }
    }

    /// Value at `index` in the fixed field order used by packets and storage.
    pub fn get(&self, index: usize) -> Option<f32> {
        let value = match index {
            0 => self.fan_speed,
            1 => self.angular.kp,
            2 => self.angular.ki,
            3 => self.angular.kd,
            4 => self.wall.kp,
            5 => self.wall.ki,
            6 => self.wall.kd,
            7 => self.linear_velocity.kp,
            8 => self.linear_velocity.ki,
            9 => self.linear_velocity.kd,
            10 => self.diagonal_walls.kp,
            11 => self.diagonal_walls.ki,
            12 => self.diagonal_walls.kd,
            13 => self.start_wall_break_cm_left,
            14 => self.start_wall_break_cm_right,
            15 => {
                if self.enable_wall_break_correction {
                    1.0
                } else {
                    0.0
                }
            }
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), ErrorCode> {
        if !value.is_finite() {
            return Err(ErrorCode::NonFiniteFloat);
        }

        let field = match index {
            0 => &mut self.fan_speed,
            1 => &mut self.angular.kp,
            2 => &mut self.angular.ki,
            3 => &mut self.angular.kd,
            4 => &mut self.wall.kp,
            5 => &mut self.wall.ki,
            6 => &mut self.wall.kd,
            7 => &mut self.linear_velocity.kp,
            8 => &mut self.linear_velocity.ki,
            9 => &mut self.linear_velocity.kd,
            10 => &mut self.diagonal_walls.kp,
            11 => &mut self.diagonal_walls.ki,
            12 => &mut self.diagonal_walls.kd,
            13 => &mut self.start_wall_break_cm_left,
            14 => &mut self.start_wall_break_cm_right,
            15 => {
                self.enable_wall_break_correction = value != 0.0;
                return Ok(());
            }
            _ => return Err(ErrorCode::InvalidIndex),
        };
        *field = value;
        Ok(())
    }
}

impl Default for GeneralParams {
    fn default() -> Self {
        Self::for_tier(SpeedTier::SearchMedium)
    }
}

/* --------------------------- Default Tables -------------------------- */
pub const DEFAULT_PARAMS_SEARCH_SLOW: GeneralParams = GeneralParams::table(
    0.0,
    [0.0350, 0.0020, 0.0000],
    [0.0012, 0.0000, 0.0020],
    [3.0000, 0.0360, 0.0000],
    [0.8000, 0.0000, 0.0000],
    0.0,
    0.0,
    false,
);

pub const DEFAULT_PARAMS_SEARCH_MEDIUM: GeneralParams = GeneralParams::table(
    0.0,
    [0.0500, 0.0050, 0.0000],
    [0.0015, 0.0000, 0.0025],
    [5.0000, 0.0600, 0.0000],
    [0.0000, 0.0000, 0.0000],
    0.0,
    0.0,
    false,
);

pub const DEFAULT_PARAMS_SEARCH_FAST: GeneralParams = GeneralParams::table(
    200.0,
    [0.0850, 0.0110, 0.0000],
    [0.0020, 0.0000, 0.0040],
    [8.0000, 0.1100, 0.0000],
    [0.0000, 0.0000, 0.0000],
    0.0,
    0.0,
    false,
);

pub const DEFAULT_PARAMS_SLOW: GeneralParams = GeneralParams::table(
    0.0,
    [0.0500, 0.0050, 0.0000],
    [0.0015, 0.0000, 0.0025],
    [5.0000, 0.0600, 0.0000],
    [0.0045, 0.0000, 0.0045],
    6.1,
    7.5,
    true,
);

pub const DEFAULT_PARAMS_MEDIUM: GeneralParams = GeneralParams::table(
    600.0,
    [0.1050, 0.0100, 0.0075],
    [0.0025, 0.0000, 0.0050],
    [8.0000, 0.1000, 0.0000],
    [0.0045, 0.0000, 0.0045],
    6.5,
    8.0,
    true,
);

pub const DEFAULT_PARAMS_FAST: GeneralParams = DEFAULT_PARAMS_MEDIUM;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_access_covers_every_field() {
        let mut params = GeneralParams::for_tier(SpeedTier::Slow);
        for index in 0..PARAM_COUNT {
            assert!(params.get(index).is_some(), "index {}", index);
        }
        assert_eq!(params.get(PARAM_COUNT), None);

        params.set(8, 0.25).unwrap();
        assert_eq!(params.linear_velocity.ki, 0.25);
        assert_eq!(params.linear_velocity.i_limit, LINEAR_I_LIMIT);

        params.set(15, 0.0).unwrap();
        assert!(!params.enable_wall_break_correction);
    }

    #[test]
    fn rejects_bad_updates() {
        let mut params = GeneralParams::default();
        assert_eq!(params.set(PARAM_COUNT, 1.0), Err(ErrorCode::InvalidIndex));
        assert_eq!(params.set(0, f32::NAN), Err(ErrorCode::NonFiniteFloat));
        assert_eq!(params, GeneralParams::default());
    }

    #[test]
    fn tier_from_byte() {
        assert_eq!(SpeedTier::try_from(4), Ok(SpeedTier::Medium));
        assert_eq!(SpeedTier::try_from(7), Err(ErrorCode::InvalidIndex));
        assert!(SpeedTier::SearchFast.is_search());
        assert!(!SpeedTier::Custom.is_search());
    }
}
