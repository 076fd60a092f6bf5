/*
    Kinematic Profile Tables

    ForwardParams
    - max_speed [m/s], acceleration / deceleration [m/s^2], target_travel_cm [cm]

    TurnParams
    - start_cm / end_cm: where the turn begins / ends relative to the cell edge [cm],
      negative means before the edge
    - turn_linear_speed [m/s], angular_accel [rad/s^2], max_angular_speed [rad/s],
      angle_to_turn [rad], sign +1 counter-clockwise, -1 clockwise
*/

use crate::planner::Movement;

use super::config::CELL_DIAGONAL_SIZE_CM;
use super::config::CELL_SIZE_CM;
use super::config::HALF_CELL_SIZE_CM;
use super::config::ROBOT_DIST_FROM_CENTER_START_CM;
use super::config::ROBOT_DIST_FROM_CENTER_START_CM_FAST;
use super::general_params::SpeedTier;

/* --------------------------- Struct -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ForwardParams {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub target_travel_cm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TurnParams {
    pub start_cm: f32,
    pub end_cm: f32,
    pub turn_linear_speed: f32,
    pub angular_accel: f32,
    pub max_angular_speed: f32,
    pub angle_to_turn: f32,
    pub sign: f32,
}

const fn fwd(max_speed: f32, acceleration: f32, deceleration: f32, target_travel_cm: f32) -> ForwardParams {
    ForwardParams {
        max_speed,
        acceleration,
        deceleration,
        target_travel_cm,
    }
}

const fn turn(
    start_cm: f32,
    end_cm: f32,
    turn_linear_speed: f32,
    angular_accel: f32,
    max_angular_speed: f32,
    angle_to_turn: f32,
    sign: f32,
) -> TurnParams {
    TurnParams {
        start_cm,
        end_cm,
        turn_linear_speed,
        angular_accel,
        max_angular_speed,
        angle_to_turn,
        sign,
    }
}

type ForwardTable = [(Movement, ForwardParams)];
type TurnTable = [(Movement, TurnParams)];

const START_TRAVEL_CM: f32 = HALF_CELL_SIZE_CM + ROBOT_DIST_FROM_CENTER_START_CM;
const START_TRAVEL_CM_FAST: f32 = HALF_CELL_SIZE_CM + ROBOT_DIST_FROM_CENTER_START_CM_FAST;

/* --------------------------- Search Slow -------------------------- */
const TURN_PARAMS_SEARCH_SLOW: &TurnTable = &[
    (Movement::TurnAround, turn(0.0, 0.0, 0.25, 52.36, 3.49, 3.1067, -1.0)),
    (Movement::TurnRight90Search, turn(0.0, 0.0, 0.25, 43.633, 4.014, 1.553, -1.0)),
    (Movement::TurnLeft90Search, turn(0.0, 0.0, 0.25, 43.633, 4.014, 1.553, 1.0)),
];

const FORWARD_PARAMS_SEARCH_SLOW: &ForwardTable = &[
    (Movement::Start, fwd(0.25, 0.65, 0.65, START_TRAVEL_CM)),
    (Movement::Forward, fwd(0.25, 0.65, 0.65, CELL_SIZE_CM)),
    (Movement::Stop, fwd(0.25, 0.65, 0.65, HALF_CELL_SIZE_CM)),
    (Movement::TurnAround, fwd(0.25, 0.5, 0.5, 8.0)),
    (Movement::TurnRight90Search, fwd(0.25, 0.65, 0.65, 2.2)),
    (Movement::TurnLeft90Search, fwd(0.25, 0.65, 0.65, 2.2)),
];

/* --------------------------- Search Medium -------------------------- */
const TURN_PARAMS_SEARCH_MEDIUM: &TurnTable = &[
    (Movement::TurnAround, turn(0.0, 0.0, 0.5, 52.36, 3.49, 3.1067, -1.0)),
    (Movement::TurnAroundInplace, turn(0.0, 0.0, 0.5, 52.36, 3.49, 3.1067, -1.0)),
    (Movement::TurnRight90Search, turn(0.0, 0.0, 0.5, 104.72, 10.47, 1.553, -1.0)),
    (Movement::TurnLeft90Search, turn(0.0, 0.0, 0.5, 104.72, 10.47, 1.553, 1.0)),
];

const FORWARD_PARAMS_SEARCH_MEDIUM: &ForwardTable = &[
    (Movement::Start, fwd(0.5, 1.0, 1.0, START_TRAVEL_CM)),
    (Movement::Forward, fwd(0.5, 2.0, 2.0, CELL_SIZE_CM)),
    (Movement::Stop, fwd(0.5, 2.0, 2.0, HALF_CELL_SIZE_CM)),
    (Movement::TurnAround, fwd(0.5, 2.0, 2.0, 8.0)),
    (Movement::TurnAroundInplace, fwd(0.5, 2.0, 2.0, 8.0)),
    (Movement::TurnRight90Search, fwd(0.5, 2.0, 2.0, 1.5)),
    (Movement::TurnLeft90Search, fwd(0.5, 2.0, 2.0, 1.5)),
];

/* --------------------------- Search Fast -------------------------- */
const TURN_PARAMS_SEARCH_FAST: &TurnTable = &[
    (Movement::TurnAround, turn(0.0, 0.0, 0.7, 104.72, 10.47, 3.1416, -1.0)),
    (Movement::TurnAroundInplace, turn(0.0, 0.0, 0.7, 104.72, 10.47, 3.1416, -1.0)),
    (Movement::TurnRight90Search, turn(0.0, 0.0, 0.7, 244.346, 17.453, 1.5708, -1.0)),
    (Movement::TurnLeft90Search, turn(0.0, 0.0, 0.7, 244.346, 17.453, 1.5708, 1.0)),
    (Movement::TurnRight90, turn(0.0, -2.2, 0.7, 244.346, 15.708, 1.5708, -1.0)),
    (Movement::TurnLeft90, turn(0.0, -2.2, 0.7, 244.346, 15.708, 1.5708, 1.0)),
];

const FORWARD_PARAMS_SEARCH_FAST: &ForwardTable = &[
    (Movement::Start, fwd(0.7, 2.0, 2.0, START_TRAVEL_CM)),
    (Movement::Forward, fwd(0.7, 4.0, 4.0, CELL_SIZE_CM)),
    (Movement::Stop, fwd(0.7, 4.0, 6.0, HALF_CELL_SIZE_CM)),
    (Movement::TurnAround, fwd(0.7, 4.0, 6.0, 8.0)),
    (Movement::TurnAroundInplace, fwd(0.7, 4.0, 6.0, 8.0)),
    (Movement::TurnRight90Search, fwd(0.7, 4.0, 4.0, 1.9)),
    (Movement::TurnLeft90Search, fwd(0.7, 4.0, 4.0, 2.0)),
];

/* --------------------------- Run Slow -------------------------- */
const TURN_PARAMS_SLOW: &TurnTable = &[
    (Movement::TurnRight45, turn(-5.0, -8.6, 0.5, 100.00, 7.854, 0.7854, -1.0)),
    (Movement::TurnLeft45, turn(-5.0, -8.6, 0.5, 100.00, 7.854, 0.7854, 1.0)),
    (Movement::TurnRight90, turn(1.5, -2.2, 0.5, 104.72, 10.47, 1.553, -1.0)),
    (Movement::TurnLeft90, turn(1.5, -2.2, 0.5, 104.72, 10.47, 1.553, 1.0)),
    (Movement::TurnRight180, turn(-1.5, 1.5, 0.5, 100.00, 5.5850, 3.1241, -1.0)),
    (Movement::TurnLeft180, turn(-1.5, 1.5, 0.5, 100.00, 5.5850, 3.1241, 1.0)),
    (Movement::TurnRight135, turn(-1.5, -7.6, 0.5, 100.00, 7.5049, 2.3387, -1.0)),
    (Movement::TurnLeft135, turn(0.0, -8.6, 0.5, 100.00, 7.5049, 2.3387, 1.0)),
    (Movement::TurnRight45From45, turn(0.0, 3.7, 0.5, 100.0, 7.8539, 0.7679, -1.0)),
    (Movement::TurnLeft45From45, turn(0.0, 3.7, 0.5, 100.0, 7.8539, 0.7679, 1.0)),
    (Movement::TurnRight90From45, turn(0.0, -6.2, 0.5, 104.72, 10.47, 1.553, -1.0)),
    (Movement::TurnLeft90From45, turn(0.0, -6.2, 0.5, 104.72, 10.47, 1.5708, 1.0)),
    (Movement::TurnRight135From45, turn(0.0, 0.3, 0.5, 100.0, 7.5049, 2.3387, -1.0)),
    (Movement::TurnLeft135From45, turn(0.0, -1.2, 0.5, 100.0, 7.5049, 2.3387, 1.0)),
    (Movement::TurnAround, turn(0.0, 0.0, 0.5, 52.36, 3.49, 3.1067, -1.0)),
];

const FORWARD_PARAMS_SLOW: &ForwardTable = &[
    (Movement::Start, fwd(0.5, 2.0, 2.0, START_TRAVEL_CM)),
    (Movement::Forward, fwd(0.7, 2.0, 2.0, CELL_SIZE_CM)),
    (Movement::Diagonal, fwd(0.7, 2.0, 2.0, CELL_DIAGONAL_SIZE_CM)),
    (Movement::Stop, fwd(0.5, 2.0, 2.0, HALF_CELL_SIZE_CM - 1.0)),
    (Movement::TurnAround, fwd(0.5, 2.0, 2.0, 8.0)),
    (Movement::TurnRight45From45, fwd(0.5, 2.0, 2.0, 7.4)),
    (Movement::TurnLeft45From45, fwd(0.5, 2.0, 2.0, 7.4)),
    (Movement::TurnRight90From45, fwd(0.5, 2.0, 2.0, 4.3)),
    (Movement::TurnLeft90From45, fwd(0.5, 2.0, 2.0, 4.8)),
    (Movement::TurnRight135From45, fwd(0.5, 2.0, 2.0, 6.0)),
    (Movement::TurnLeft135From45, fwd(0.5, 2.0, 2.0, 7.85)),
];

/* --------------------------- Run Medium / Custom -------------------------- */
const TURN_PARAMS_MEDIUM: &TurnTable = &[
    (Movement::TurnRight45, turn(-6.3, -8.4, 1.5, 785.40, 20.07, 0.7854, -1.0)),
    (Movement::TurnLeft45, turn(-6.3, -8.4, 1.5, 785.40, 20.07, 0.7854, 1.0)),
    (Movement::TurnRight90, turn(-2.4, 0.7, 1.5, 700.0, 17.45, 1.5708, -1.0)),
    (Movement::TurnLeft90, turn(-2.1, 0.7, 1.5, 700.0, 17.45, 1.5708, 1.0)),
    (Movement::TurnRight135, turn(-4.5, -5.4, 1.5, 436.33, 20.07, 2.3562, -1.0)),
    (Movement::TurnLeft135, turn(-4.5, -5.8, 1.5, 436.33, 20.07, 2.3562, 1.0)),
    (Movement::TurnRight180, turn(-6.0, 2.3, 1.5, 261.06, 16.4, 3.1416, -1.0)),
    (Movement::TurnLeft180, turn(-6.0, 2.8, 1.5, 261.06, 16.4, 3.1416, 1.0)),
    (Movement::TurnRight45From45, turn(0.0, 5.7, 1.5, 785.40, 20.07, 0.7854, -1.0)),
    (Movement::TurnLeft45From45, turn(0.0, 4.6, 1.5, 785.40, 20.07, 0.7854, 1.0)),
    (Movement::TurnRight90From45, turn(0.0, -3.2, 1.5, 785.40, 26.18, 1.5708, -1.0)),
    (Movement::TurnLeft90From45, turn(0.0, -2.8, 1.5, 785.40, 26.18, 1.5708, 1.0)),
    (Movement::TurnRight135From45, turn(0.0, 2.5, 1.5, 436.33, 20.07, 2.3562, -1.0)),
    (Movement::TurnLeft135From45, turn(0.0, 2.1, 1.5, 436.33, 20.07, 2.3562, 1.0)),
    (Movement::TurnAround, turn(0.0, 0.0, 1.5, 52.36, 3.49, 3.1416, -1.0)),
];

const FORWARD_PARAMS_MEDIUM: &ForwardTable = &[
    (Movement::Start, fwd(1.5, 12.0, 20.0, START_TRAVEL_CM_FAST)),
    (Movement::Forward, fwd(3.5, 15.0, 20.0, CELL_SIZE_CM)),
    (Movement::Diagonal, fwd(1.7, 12.0, 20.0, CELL_DIAGONAL_SIZE_CM)),
    (Movement::Stop, fwd(1.0, 2.0, 30.0, HALF_CELL_SIZE_CM - 1.0)),
    (Movement::TurnAround, fwd(1.5, 12.0, 20.0, 8.0)),
    (Movement::TurnRight45From45, fwd(1.5, 12.0, 20.0, 6.9)),
    (Movement::TurnLeft45From45, fwd(1.5, 12.0, 20.0, 6.4)),
    (Movement::TurnRight90From45, fwd(1.5, 12.0, 20.0, 3.5)),
    (Movement::TurnLeft90From45, fwd(1.5, 12.0, 20.0, 3.5)),
    (Movement::TurnRight135From45, fwd(1.5, 12.0, 20.0, 2.8)),
    (Movement::TurnLeft135From45, fwd(1.5, 12.0, 20.0, 3.1)),
];

/* --------------------------- Run Fast -------------------------- */
const TURN_PARAMS_FAST: &TurnTable = &[
    (Movement::TurnRight45, turn(-2.0, -8.2, 1.5, 785.39, 22.69, 0.7679, -1.0)),
    (Movement::TurnLeft45, turn(-2.0, -8.2, 1.5, 785.39, 22.69, 0.7679, 1.0)),
    (Movement::TurnRight90, turn(0.0, -1.3, 1.5, 785.39, 24.96, 1.553, -1.0)),
    (Movement::TurnLeft90, turn(0.0, -1.3, 1.5, 785.39, 24.96, 1.553, 1.0)),
    (Movement::TurnRight135, turn(-2.9, -9.1, 1.5, 610.865, 20.94, 2.3387, -1.0)),
    (Movement::TurnLeft135, turn(-2.9, -9.1, 1.5, 610.865, 20.94, 2.3387, 1.0)),
    (Movement::TurnRight180, turn(-2.9, 0.2, 1.5, 610.865, 16.05, 3.1241, -1.0)),
    (Movement::TurnLeft180, turn(-2.9, 0.2, 1.5, 610.865, 16.05, 3.1241, 1.0)),
    (Movement::TurnRight45From45, turn(7.7, 5.4, 1.5, 785.39, 22.69, 0.7679, -1.0)),
    (Movement::TurnLeft45From45, turn(7.7, 5.4, 1.5, 785.39, 22.69, 0.7679, 1.0)),
    (Movement::TurnRight90From45, turn(4.0, -3.8, 1.5, 785.39, 24.96, 1.553, -1.0)),
    (Movement::TurnLeft90From45, turn(4.0, -3.8, 1.5, 785.39, 24.96, 1.553, 1.0)),
    (Movement::TurnRight135From45, turn(7.0, 1.0, 1.5, 610.865, 20.94, 2.3387, -1.0)),
    (Movement::TurnLeft135From45, turn(7.0, 1.0, 1.5, 610.865, 20.94, 2.3387, 1.0)),
    (Movement::TurnAround, turn(HALF_CELL_SIZE_CM, HALF_CELL_SIZE_CM, 0.0, 100.00, 6.981, 3.1241, -1.0)),
];

const FORWARD_PARAMS_FAST: &ForwardTable = &[
    (Movement::Start, fwd(1.0, 5.0, 20.0, START_TRAVEL_CM_FAST)),
    (Movement::Forward, fwd(3.5, 15.0, 30.0, CELL_SIZE_CM)),
    (Movement::Diagonal, fwd(2.5, 15.0, 35.0, CELL_DIAGONAL_SIZE_CM)),
    (Movement::Stop, fwd(0.75, 2.0, 35.0, HALF_CELL_SIZE_CM)),
    (Movement::TurnAround, fwd(0.5, 2.0, 2.0, HALF_CELL_SIZE_CM)),
];

/* --------------------------- Lookup -------------------------- */
const fn tables(tier: SpeedTier) -> (&'static ForwardTable, &'static TurnTable) {
    match tier {
        SpeedTier::SearchSlow => (FORWARD_PARAMS_SEARCH_SLOW, TURN_PARAMS_SEARCH_SLOW),
        SpeedTier::SearchMedium => (FORWARD_PARAMS_SEARCH_MEDIUM, TURN_PARAMS_SEARCH_MEDIUM),
        SpeedTier::SearchFast => (FORWARD_PARAMS_SEARCH_FAST, TURN_PARAMS_SEARCH_FAST),
        SpeedTier::Slow => (FORWARD_PARAMS_SLOW, TURN_PARAMS_SLOW),
        SpeedTier::Medium | SpeedTier::Custom => (FORWARD_PARAMS_MEDIUM, TURN_PARAMS_MEDIUM),
        SpeedTier::Fast => (FORWARD_PARAMS_FAST, TURN_PARAMS_FAST),
    }
}

pub fn forward_params(tier: SpeedTier, movement: Movement) -> Option<ForwardParams> {
    let (table, _) = tables(tier);
    table.iter().find(|(kind, _)| *kind == movement).map(|(_, params)| *params)
}

pub fn turn_params(tier: SpeedTier, movement: Movement) -> Option<TurnParams> {
    let (_, table) = tables(tier);
    table.iter().find(|(kind, _)| *kind == movement).map(|(_, params)| *params)
}

/// Straight profile of `movement`, including the two diagonal connectors
/// that have no table entry of their own.
///
/// `ForwardBeforeTurn45` drives one cell with the tier's `Forward` speeds.
/// `ForwardAfterDiagonal` takes over the post-turn straight of the from-45
/// turn before it, or is empty when there is none.
pub fn straight_params(tier: SpeedTier, movement: Movement, previous: Option<Movement>) -> Option<ForwardParams> {
    match movement {
        Movement::ForwardBeforeTurn45 => forward_params(tier, Movement::Forward).map(|params| ForwardParams {
            target_travel_cm: CELL_SIZE_CM,
            ..params
        }),
        Movement::ForwardAfterDiagonal => {
            let after_turn = previous.and_then(|previous| forward_params(tier, previous));
            after_turn.or_else(|| {
                forward_params(tier, Movement::Forward).map(|params| ForwardParams {
                    target_travel_cm: 0.0,
                    ..params
                })
            })
        }
        _ => forward_params(tier, movement),
    }
}
