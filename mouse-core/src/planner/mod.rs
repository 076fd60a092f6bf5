/*
    Movement Planner
*/

use heapless::Vec;

use crate::maze::Direction;
use crate::maze::Point;

/* --------------------------- Declare Modules -------------------------- */
pub mod compiler;
pub mod diagonal;

pub use compiler::*;
pub use diagonal::*;

/* --------------------------- Types -------------------------- */
/// Longest compiled plan. Diagonal conversion can roughly double the entries of a
/// 256-cell path.
pub const MAX_PLAN_LEN: usize = 512;

/// One plan entry: a movement and how many times it repeats back to back.
pub type PlanStep = (Movement, u8);
pub type MovementPlan = Vec<PlanStep, MAX_PLAN_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// The compiled plan does not fit in [`MAX_PLAN_LEN`] entries.
    Overflow,
}

fn push_step(plan: &mut MovementPlan, step: PlanStep) -> Result<(), PlanError> {
    plan.push(step).map_err(|_| PlanError::Overflow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// +1 for counter-clockwise, -1 for clockwise.
    pub const fn sign(self) -> i16 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovementFamily {
    Straight,
    Turn,
    TurnAround,
}

/// Every primitive manoeuvre the executor knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Movement {
    Start,
    Forward,
    Diagonal,
    Stop,
    ForwardBeforeTurn45,
    ForwardAfterDiagonal,

    TurnLeft45,
    TurnRight45,
    TurnLeft90,
    TurnRight90,
    TurnLeft135,
    TurnRight135,
    TurnLeft180,
    TurnRight180,

    TurnLeft45From45,
    TurnRight45From45,
    TurnLeft90From45,
    TurnRight90From45,
    TurnLeft135From45,
    TurnRight135From45,

    TurnAround,
    TurnAroundInplace,
    TurnLeft90Search,
    TurnRight90Search,
}

impl Movement {
    pub const fn family(self) -> MovementFamily {
        match self {
            Movement::Start
            | Movement::Forward
            | Movement::Diagonal
            | Movement::Stop
            | Movement::ForwardBeforeTurn45
            | Movement::ForwardAfterDiagonal => MovementFamily::Straight,
            Movement::TurnAround | Movement::TurnAroundInplace => MovementFamily::TurnAround,
            _ => MovementFamily::Turn,
        }
    }

    pub const fn turn_45(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft45,
            Side::Right => Movement::TurnRight45,
        }
    }

    pub const fn turn_90(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft90,
            Side::Right => Movement::TurnRight90,
        }
    }

    pub const fn turn_135(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft135,
            Side::Right => Movement::TurnRight135,
        }
    }

    pub const fn turn_180(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft180,
            Side::Right => Movement::TurnRight180,
        }
    }

    pub const fn turn_45_from_45(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft45From45,
            Side::Right => Movement::TurnRight45From45,
        }
    }

    pub const fn turn_90_from_45(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft90From45,
            Side::Right => Movement::TurnRight90From45,
        }
    }

    pub const fn turn_135_from_45(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft135From45,
            Side::Right => Movement::TurnRight135From45,
        }
    }

    pub const fn turn_90_search(side: Side) -> Self {
        match side {
            Side::Left => Movement::TurnLeft90Search,
            Side::Right => Movement::TurnRight90Search,
        }
    }

    /// Signed heading change in degrees, counter-clockwise positive.
    pub const fn rotation_deg(self) -> i16 {
        match self {
            Movement::Start
            | Movement::Forward
            | Movement::Diagonal
            | Movement::Stop
            | Movement::ForwardBeforeTurn45
            | Movement::ForwardAfterDiagonal => 0,
            Movement::TurnLeft45 | Movement::TurnLeft45From45 => 45,
            Movement::TurnRight45 | Movement::TurnRight45From45 => -45,
            Movement::TurnLeft90 | Movement::TurnLeft90From45 | Movement::TurnLeft90Search => 90,
            Movement::TurnRight90 | Movement::TurnRight90From45 | Movement::TurnRight90Search => -90,
            Movement::TurnLeft135 | Movement::TurnLeft135From45 => 135,
            Movement::TurnRight135 | Movement::TurnRight135From45 => -135,
            Movement::TurnLeft180 => 180,
            Movement::TurnRight180 | Movement::TurnAround | Movement::TurnAroundInplace => -180,
        }
    }

    /// Distance the movement covers along the cell sequence, in half cells.
    /// A diagonal crossing of one cell counts as a full cell.
    pub const fn footprint_half_cells(self) -> u16 {
        match self {
            Movement::Stop | Movement::ForwardAfterDiagonal | Movement::TurnAroundInplace => 0,
            Movement::TurnLeft45
            | Movement::TurnRight45
            | Movement::TurnLeft45From45
            | Movement::TurnRight45From45 => 1,
            Movement::Start
            | Movement::Forward
            | Movement::Diagonal
            | Movement::ForwardBeforeTurn45
            | Movement::TurnLeft90
            | Movement::TurnRight90
            | Movement::TurnLeft90From45
            | Movement::TurnRight90From45
            | Movement::TurnLeft90Search
            | Movement::TurnRight90Search
            | Movement::TurnAround => 2,
            Movement::TurnLeft135
            | Movement::TurnRight135
            | Movement::TurnLeft135From45
            | Movement::TurnRight135From45 => 3,
            Movement::TurnLeft180 | Movement::TurnRight180 => 4,
        }
    }

    /// Grid pose after `count` repetitions starting at `position` facing `heading`.
    ///
    /// `None` for diagonal-family movements, which do not end on the
    /// orthogonal cell lattice.
    pub fn apply_to_pose(self, count: u8, heading: Direction, position: Point) -> Option<(Direction, Point)> {
        let mut heading = heading;
        let mut position = position;
        for _ in 0..count.max(1) {
            match self {
                Movement::Start | Movement::Forward => position = position.step(heading),
                Movement::Stop => {}
                Movement::TurnLeft90 | Movement::TurnLeft90Search => {
                    heading = heading.left();
                    position = position.step(heading);
                }
                Movement::TurnRight90 | Movement::TurnRight90Search => {
                    heading = heading.right();
                    position = position.step(heading);
                }
                Movement::TurnLeft180 => {
                    for _ in 0..2 {
                        heading = heading.left();
                        position = position.step(heading);
                    }
                }
                Movement::TurnRight180 => {
                    for _ in 0..2 {
                        heading = heading.right();
                        position = position.step(heading);
                    }
                }
                Movement::TurnAround => {
                    heading = heading.opposite();
                    position = position.step(heading);
                }
                Movement::TurnAroundInplace => heading = heading.opposite(),
                _ => return None,
            }
        }
        Some((heading, position))
    }
}

/* --------------------------- Plan Cursor -------------------------- */
/// Walks a compiled plan one entry at a time.
pub struct PlanCursor<'a> {
    plan: &'a [PlanStep],
    index: usize,
}

impl<'a> PlanCursor<'a> {
    pub fn new(plan: &'a [PlanStep]) -> Self {
        Self { plan, index: 0 }
    }

    pub fn current(&self) -> Option<PlanStep> {
        self.plan.get(self.index).copied()
    }

    pub fn previous(&self) -> Option<Movement> {
        self.index.checked_sub(1).and_then(|i| self.plan.get(i)).map(|step| step.0)
    }

    pub fn upcoming(&self) -> Option<Movement> {
        self.plan.get(self.index + 1).map(|step| step.0)
    }

    /// Moves to the next entry and returns it.
    pub fn advance(&mut self) -> Option<PlanStep> {
        if self.index < self.plan.len() {
            self.index += 1;
        }
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.plan.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }
}
