/*
    Search Explorer

    Called once per completed movement while searching. Converts what the
    side and front sensors see into absolute walls, asks the solver for the
    next direction and turns it into a search movement.

    Outbound -> goal reached -> Returning -> origin reached -> Finished
*/

use crate::maze::Direction;
use crate::maze::Maze;
use crate::maze::Point;
use crate::maze::SolveError;
use crate::maze::Walls;
use crate::planner::Movement;
use crate::sensors::WallReport;

use super::Navigation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchPhase {
    Outbound,
    Returning,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Explorer {
    phase: SearchPhase,
    started: bool,
}

impl Explorer {
    pub const fn new() -> Self {
        Self {
            phase: SearchPhase::Outbound,
            started: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn reached_goal_once(&self) -> bool {
        self.phase != SearchPhase::Outbound
    }

    /// Next search movement from the pose the executor believes in.
    ///
    /// The first call leaves the start cell with [`Movement::Start`]. Arriving
    /// back at the origin yields one [`Movement::Stop`], then `None`.
    pub fn next_movement<const W: usize, const H: usize>(
        &mut self,
        maze: &mut Maze<W, H>,
        heading: Direction,
        position: Point,
        walls: &WallReport,
    ) -> Result<Option<Movement>, SolveError> {
        if self.phase == SearchPhase::Finished {
            return Ok(None);
        }

        if !self.started && position == Point::ORIGIN {
            self.started = true;
            return Ok(Some(Movement::Start));
        }
        self.started = true;

        let seen = Walls::from_relative(heading, walls.front, walls.left, walls.right);
        let direction = match maze.next_step(position, seen, self.reached_goal_once(), true) {
            Ok(direction) => direction,
            Err(SolveError::AtTarget) if self.phase == SearchPhase::Outbound => {
                log::info!("explorer: goal reached at ({}, {}), returning", position.x, position.y);
                self.phase = SearchPhase::Returning;
                maze.next_step(position, seen, true, true)?
            }
            Err(SolveError::AtTarget) => {
                log::info!("explorer: back at the origin");
                self.phase = SearchPhase::Finished;
                return Ok(Some(Movement::Stop));
            }
            Err(error) => return Err(error),
        };

        Ok(Some(Navigation::target_movement(heading, direction)))
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}
