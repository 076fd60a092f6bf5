/*
    Direction list to movement plan
*/

use crate::maze::Direction;
use crate::maze::RelativeTurn;

use super::diagonal::convert_diagonals;
use super::push_step;
use super::Movement;
use super::MovementPlan;
use super::PlanError;
use super::PlanStep;

/// One movement per direction, relative to a heading that starts north.
///
/// The first entry is always `Start` (the run out of the start cell), the last `Stop`.
pub fn default_movements(directions: &[Direction]) -> Result<MovementPlan, PlanError> {
    let mut plan = MovementPlan::new();
    push_step(&mut plan, (Movement::Start, 1))?;

    let mut heading = Direction::North;
    for &direction in directions {
        let movement = match heading.turn_to(direction) {
            RelativeTurn::Straight => Movement::Forward,
            RelativeTurn::Right => Movement::TurnRight90,
            RelativeTurn::Left => Movement::TurnLeft90,
            RelativeTurn::Back => Movement::TurnAround,
        };
        push_step(&mut plan, (movement, 1))?;
        heading = direction;
    }

    push_step(&mut plan, (Movement::Stop, 1))?;
    Ok(plan)
}

/// Single left-to-right pass merging forward runs and same-side 90 degree pairs.
pub fn smooth_movements(plan: &[PlanStep]) -> Result<MovementPlan, PlanError> {
    let mut smoothed = MovementPlan::new();
    let mut index = 0;

    while index < plan.len() {
        let (movement, count) = plan[index];
        let next = plan.get(index + 1).copied();

        match movement {
            Movement::Forward => {
                if let Some(last) = smoothed.last_mut() {
                    if last.0 == Movement::Forward && u16::from(last.1) + u16::from(count) <= u16::from(u8::MAX) {
                        last.1 += count;
                        index += 1;
                        continue;
                    }
                }
                push_step(&mut smoothed, (movement, count))?;
            }
            Movement::TurnLeft90 | Movement::TurnRight90 if count == 1 && next == Some((movement, 1)) => {
                let merged = if movement == Movement::TurnLeft90 {
                    Movement::TurnLeft180
                } else {
                    Movement::TurnRight180
                };
                push_step(&mut smoothed, (merged, 1))?;
                index += 2;
                continue;
            }
            _ => push_step(&mut smoothed, (movement, count))?,
        }
        index += 1;
    }

    Ok(smoothed)
}

/// Full compilation: default movements, smoothing, then diagonals when `diagonals` is set.
pub fn compile_plan(directions: &[Direction], diagonals: bool) -> Result<MovementPlan, PlanError> {
    let plan = default_movements(directions)?;
    let plan = smooth_movements(&plan)?;
    if !diagonals {
        return Ok(plan);
    }
    convert_diagonals(&plan)
}
