/*
*  Default Robot Config
*
*  Maze Geometry
*  - Cell 18 cm, posts excluded from the diagonal
*
*  Drive Train
*  - Wheel radius 1.27 cm
*  - Encoder 1024 edges per wheel revolution
*/

use core::f32::consts::PI;

/* --------------------------- Maze Geometry -------------------------- */
pub const CELL_SIZE_CM: f32 = 18.0;
pub const HALF_CELL_SIZE_CM: f32 = 9.0;
pub const CELL_DIAGONAL_SIZE_CM: f32 = 12.727922;
pub const ROBOT_DIST_FROM_CENTER_START_CM: f32 = 2.0;
pub const ROBOT_DIST_FROM_CENTER_START_CM_FAST: f32 = 3.0;

/* --------------------------- Control Loop -------------------------- */
pub const TIME_SAMPLING_US: u64 = 1000; // 1 kHz control tick
pub const TICK_S: f32 = TIME_SAMPLING_US as f32 / 1_000_000.0;

/* --------------------------- Odometry -------------------------- */
pub const WHEEL_RADIUS_CM: f32 = 1.27;
pub const ENCODER_EDGES_PER_REV: f32 = 1024.0;
pub const ENCODER_DIST_CM_PER_EDGE: f32 = 2.0 * PI * WHEEL_RADIUS_CM / ENCODER_EDGES_PER_REV;
pub const VELOCITY_FILTER_HISTORY: f32 = 0.9;
pub const ENCODER_STALL_TICKS: u32 = 50; // 50 ms without an edge

/* --------------------------- Motor PWM -------------------------- */
pub const PWM_PERIOD_TICKS: i32 = 999;
pub const MAX_BATTERY_VOLTAGE: f32 = 12.6;
pub const FAN_MAX_SPEED: f32 = 1000.0;
pub const FAN_MAX_VOLTAGE: f32 = 6.0;
pub const MIN_FAN_BATTERY_VOLTAGE: f32 = 5.0; // Below this the battery reading is not trusted

/* --------------------------- Battery -------------------------- */
pub const BATTERY_PRESENT_VOLTAGE: f32 = 1.0; // Lower readings mean no sample yet
pub const LOW_BATTERY_VOLTAGE: f32 = 10.5;

/* --------------------------- PID Integral Limits -------------------------- */
pub const LINEAR_I_LIMIT: f32 = 100.0;
pub const ANGULAR_I_LIMIT: f32 = 500.0;
pub const WALLS_I_LIMIT: f32 = 0.0;
pub const DIAGONAL_I_LIMIT: f32 = 0.0;

/* --------------------------- Emergency Criteria -------------------------- */
pub const MAX_LINEAR_ERROR_M_S: f32 = 0.75;
pub const MAX_ANGULAR_ERROR_RAD_S: f32 = 10.0;
pub const MAX_GYRO_RATE_RAD_S: f32 = 40.0;

/* --------------------------- Motion Executor -------------------------- */
pub const MIN_MOVE_SPEED: f32 = 0.05;
pub const WALL_BREAK_WINDOW_CM: f32 = 3.0;
pub const FRONT_EMERGENCY_CM: f32 = 3.5;

/* --------------------------- IR Sensors -------------------------- */
pub const IR_FILTER_WINDOW: usize = 1 << 2;
pub const IR_SENSOR_COUNT: usize = 4;

/* --------------------------- Encoder Handoff -------------------------- */
pub const ENCODER_QUEUE_SIZE: usize = 256; // Must be 2^n
