/*
    IR Wall Sensing

    Sensor layout
    - Left / Right look sideways at the cell walls
    - FrontLeft / FrontRight look ahead, crossing in front of the robot

    All values are raw 12-bit ADC counts, larger is closer.
*/

use crate::control::MovingAverage;
use crate::resources::config::IR_FILTER_WINDOW;
use crate::resources::config::IR_SENSOR_COUNT;

/* --------------------------- Readings -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IrSensor {
    Left = 0,
    FrontLeft = 1,
    FrontRight = 2,
    Right = 3,
}

impl IrSensor {
    pub const ALL: [IrSensor; IR_SENSOR_COUNT] = [IrSensor::Left, IrSensor::FrontLeft, IrSensor::FrontRight, IrSensor::Right];
}

/// One sample of all four receivers, indexed by [`IrSensor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrReadings(pub [f32; IR_SENSOR_COUNT]);

impl IrReadings {
    pub const fn new(left: f32, front_left: f32, front_right: f32, right: f32) -> Self {
        Self([left, front_left, front_right, right])
    }

    pub fn get(&self, sensor: IrSensor) -> f32 {
        self.0[sensor as usize]
    }
}

/* --------------------------- Thresholds -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallThresholds {
    /// Reading above which a wall is reported, per sensor.
    pub wall_present: [f32; IR_SENSOR_COUNT],
    /// Side readings above this are close enough to steer on.
    pub control_valid_left: f32,
    pub control_valid_right: f32,
    /// Side readings with the robot centred between two walls.
    pub center_left: f32,
    pub center_right: f32,
    /// Front readings at which the robot is about to touch the wall.
    pub emergency_front_left: f32,
    pub emergency_front_right: f32,
    /// Front readings above these push the robot off a diagonal post.
    pub diagonal_front_left: f32,
    pub diagonal_front_right: f32,
}

impl WallThresholds {
    pub const fn new() -> Self {
        Self {
            wall_present: [700.0, 400.0, 700.0, 1100.0],
            control_valid_left: 800.0,
            control_valid_right: 1200.0,
            center_left: 900.0,
            center_right: 1400.0,
            emergency_front_left: 2000.0,
            emergency_front_right: 2500.0,
            diagonal_front_left: 300.0,
            diagonal_front_right: 500.0,
        }
    }
}

impl Default for WallThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/* --------------------------- Report -------------------------- */
/// What the executor and the cascade need from the IR sensors in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallReport {
    pub front: bool,
    pub left: bool,
    pub right: bool,
    /// Positive when the robot sits closer to the left wall.
    pub side_error: f32,
    /// Positive when the robot drifts towards a post on its left.
    pub diagonal_error: f32,
    pub front_emergency: bool,
    /// The side wall disappeared this tick.
    pub left_falling_edge: bool,
    pub right_falling_edge: bool,
}

/* --------------------------- Wall Sensors -------------------------- */
pub struct WallSensors {
    thresholds: WallThresholds,
    filters: [MovingAverage<IR_FILTER_WINDOW>; IR_SENSOR_COUNT],
    last_good: IrReadings,
    last_report: WallReport,
}

impl WallSensors {
    pub const fn new(thresholds: WallThresholds) -> Self {
        Self {
            thresholds,
            filters: [MovingAverage::new(), MovingAverage::new(), MovingAverage::new(), MovingAverage::new()],
            last_good: IrReadings([0.0; IR_SENSOR_COUNT]),
            last_report: WallReport {
                front: false,
                left: false,
                right: false,
                side_error: 0.0,
                diagonal_error: 0.0,
                front_emergency: false,
                left_falling_edge: false,
                right_falling_edge: false,
            },
        }
    }

    pub fn thresholds(&self) -> &WallThresholds {
        &self.thresholds
    }

    pub fn filtered(&self) -> IrReadings {
        self.last_good
    }

    pub fn last_report(&self) -> WallReport {
        self.last_report
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.thresholds);
    }

    /// Feeds one sample. `None` means the read failed; the previous filtered
    /// values stand in for it and no edges are reported.
    pub fn update(&mut self, sample: Option<IrReadings>) -> WallReport {
        let previous = self.last_report;
        let readings = match sample {
            Some(sample) => {
                for sensor in IrSensor::ALL {
                    let index = sensor as usize;
                    self.last_good.0[index] = self.filters[index].update(sample.get(sensor));
                }
                self.last_good
            }
            None => {
                log::debug!("sensors: ir read failed, holding last values");
                self.last_good
            }
        };

        let mut report = self.evaluate(&readings);
        if sample.is_some() {
            report.left_falling_edge = previous.left && !report.left;
            report.right_falling_edge = previous.right && !report.right;
        }
        self.last_report = report;
        report
    }

    fn evaluate(&self, readings: &IrReadings) -> WallReport {
        let t = &self.thresholds;
        let is_wall = |sensor: IrSensor| readings.get(sensor) > t.wall_present[sensor as usize];

        let left = readings.get(IrSensor::Left);
        let right = readings.get(IrSensor::Right);
        let front_left = readings.get(IrSensor::FrontLeft);
        let front_right = readings.get(IrSensor::FrontRight);

        WallReport {
            front: is_wall(IrSensor::FrontLeft) || is_wall(IrSensor::FrontRight),
            left: is_wall(IrSensor::Left),
            right: is_wall(IrSensor::Right),
            side_error: side_wall_error(left, right, t),
            diagonal_error: diagonal_error(front_left, front_right, t),
            front_emergency: front_left > t.emergency_front_left && front_right > t.emergency_front_right,
            left_falling_edge: false,
            right_falling_edge: false,
        }
    }
}

impl Default for WallSensors {
    fn default() -> Self {
        Self::new(WallThresholds::new())
    }
}

/// Lateral offset from the corridor centre. With a single usable wall the
/// offset to that wall counts twice.
fn side_wall_error(left: f32, right: f32, t: &WallThresholds) -> f32 {
    let left_valid = left > t.control_valid_left;
    let right_valid = right > t.control_valid_right;

    match (left_valid, right_valid) {
        (true, true) => (left - t.center_left) - (right - t.center_right),
        (true, false) => 2.0 * (left - t.center_left),
        (false, true) => -2.0 * (right - t.center_right),
        (false, false) => 0.0,
    }
}

fn diagonal_error(front_left: f32, front_right: f32, t: &WallThresholds) -> f32 {
    let mut error = 0.0;
    if front_left > t.diagonal_front_left {
        error += front_left - t.diagonal_front_left;
    }
    if front_right > t.diagonal_front_right {
        error -= front_right - t.diagonal_front_right;
    }
    error
}
