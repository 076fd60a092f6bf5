/*
    Maze Module
*/

/* --------------------------- Declare Modules -------------------------- */
pub mod grid;
pub mod persistence;
pub mod solver;

pub use grid::*;
pub use persistence::*;
pub use solver::*;

/* --------------------------- Direction -------------------------- */
/// Cardinal direction. The discriminant order is also the neighbour
/// enumeration order of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    North = 0,
    West = 1,
    South = 2,
    East = 3,
}

/// Relative change from one heading to another, in counter-clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelativeTurn {
    Straight,
    Left,
    Back,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::West, Direction::South, Direction::East];

    pub const fn from_index(index: u8) -> Self {
        match index & 0b11 {
            0 => Direction::North,
            1 => Direction::West,
            2 => Direction::South,
            _ => Direction::East,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub const fn left(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn right(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn wall(self) -> Walls {
        Walls(1 << self.index())
    }

    /// Turn needed to go from heading `self` to heading `target`.
    pub const fn turn_to(self, target: Direction) -> RelativeTurn {
        match (target.index() + 4 - self.index()) & 0b11 {
            0 => RelativeTurn::Straight,
            1 => RelativeTurn::Left,
            2 => RelativeTurn::Back,
            _ => RelativeTurn::Right,
        }
    }
}

/* --------------------------- Walls -------------------------- */
/// 4-bit wall mask, one bit per [`Direction`] (`1 << direction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Walls(pub u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const NORTH: Walls = Walls(1 << 0);
    pub const WEST: Walls = Walls(1 << 1);
    pub const SOUTH: Walls = Walls(1 << 2);
    pub const EAST: Walls = Walls(1 << 3);
    pub const ALL: Walls = Walls(0b1111);

    pub const fn bits(self) -> u8 {
        self.0 & 0b1111
    }

    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.wall().0 != 0
    }

    pub const fn union(self, other: Walls) -> Walls {
        Walls((self.0 | other.0) & 0b1111)
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.wall().0;
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.wall().0;
    }

    /// Circular 4-bit shift by `steps` quarter turns counter-clockwise.
    pub const fn rotate(self, steps: u8) -> Walls {
        let bits = self.bits();
        let steps = steps & 0b11;
        Walls(((bits << steps) | (bits >> ((4 - steps) & 0b11))) & 0b1111)
    }

    /// Absolute walls of the cell ahead from what the robot sees relative to `heading`.
    /// The side it came from is never a wall.
    pub fn from_relative(heading: Direction, front: bool, left: bool, right: bool) -> Walls {
        // Relative frame: bit 0 front, bit 1 left, bit 2 back, bit 3 right.
        let relative = (front as u8) | (left as u8) << 1 | (right as u8) << 3;
        Walls(relative).rotate(heading.index())
    }
}

/* --------------------------- Point -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/* --------------------------- Errors -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SolveError {
    /// No target cell can be reached with the walls known so far.
    NoPath,
    /// The queried position already is one of the targets.
    AtTarget,
}
