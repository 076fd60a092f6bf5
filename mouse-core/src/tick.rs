/*
    Control Tick

    IR sample -> wall report -> executor step -> target speeds -> cascade -> duty

    Runs every TIME_SAMPLING_US from the firmware's control task. Everything is
    passed in by reference; nothing here blocks or allocates.
*/

use crate::control::ControlCascade;
use crate::control::Feedback;
use crate::control::MotorDuty;
use crate::navigation::NavError;
use crate::navigation::Navigation;
use crate::planner::PlanCursor;
use crate::resources::sensor_resources::EncoderDelta;
use crate::sensors::IrReadings;
use crate::sensors::WallReport;
use crate::sensors::WallSensors;

/// Sensor values gathered for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlInputs {
    pub encoder: EncoderDelta,
    /// `None` when the IR read failed this tick.
    pub ir: Option<IrReadings>,
    pub gyro_rad_s: f32,
    pub battery_voltage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    pub duty: MotorDuty,
    /// The active movement completed on this tick.
    pub movement_done: bool,
    pub report: WallReport,
}

pub fn control_tick(
    nav: &mut Navigation,
    sensors: &mut WallSensors,
    cascade: &mut ControlCascade,
    inputs: &ControlInputs,
) -> TickOutput {
    let report = sensors.update(inputs.ir);
    let movement_done = nav.step(inputs.encoder, &report);

    let command = nav.command();
    cascade.set_target_speeds(command.linear_m_s, command.angular_rad_s);
    cascade.set_wall_follow(command.wall_follow);

    let duty = cascade.update(&Feedback {
        linear_velocity: nav.odometry().velocity_m_s(),
        angular_velocity: inputs.gyro_rad_s,
        battery_voltage: inputs.battery_voltage,
        side_error: report.side_error,
        diagonal_error: report.diagonal_error,
    });

    TickOutput {
        duty,
        movement_done,
        report,
    }
}

/* --------------------------- Plan Feeding -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanProgress {
    Running,
    Finished,
    /// The last movement stopped on the front proximity check.
    Aborted,
}

/// Hands the next plan entry to an idle executor. Call once per tick after
/// [`control_tick`]; a busy executor is left alone.
pub fn advance_plan(nav: &mut Navigation, cursor: &mut PlanCursor<'_>) -> Result<PlanProgress, NavError> {
    if !nav.is_idle() {
        return Ok(PlanProgress::Running);
    }
    if nav.front_emergency() {
        return Ok(PlanProgress::Aborted);
    }

    let Some(step) = cursor.current() else {
        return Ok(PlanProgress::Finished);
    };
    nav.set_movement(step, cursor.previous(), cursor.upcoming())?;
    cursor.advance();
    Ok(PlanProgress::Running)
}
