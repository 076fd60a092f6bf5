//! Simulated field and drive train shared by the integration tests.

#![allow(dead_code)]

use mouse_core::maze::Direction;
use mouse_core::maze::Point;
use mouse_core::maze::Walls;
use mouse_core::navigation::MotionCommand;
use mouse_core::resources::config::ENCODER_DIST_CM_PER_EDGE;
use mouse_core::resources::config::TICK_S;
use mouse_core::resources::sensor_resources::EncoderDelta;
use mouse_core::sensors::WallReport;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

/// The real walls of a field, unknown to the robot.
pub struct World<const W: usize, const H: usize> {
    walls: [[Walls; H]; W],
}

impl<const W: usize, const H: usize> World<W, H> {
    /// Only the outer border.
    pub fn open() -> Self {
        let mut walls = [[Walls::NONE; H]; W];
        for (x, column) in walls.iter_mut().enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                if x == 0 {
                    cell.insert(Direction::West);
                }
                if x == W - 1 {
                    cell.insert(Direction::East);
                }
                if y == 0 {
                    cell.insert(Direction::South);
                }
                if y == H - 1 {
                    cell.insert(Direction::North);
                }
            }
        }
        Self { walls }
    }

    /// Perfect maze carved by a randomised depth-first walk. The start cell
    /// only opens to the north.
    pub fn perfect(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut world = Self {
            walls: [[Walls::ALL; H]; W],
        };
        let mut seen = [[false; H]; W];
        seen[0][0] = true;
        world.open_between(Point::ORIGIN, Direction::North);

        let mut stack = vec![Point::new(0, 1)];
        seen[0][1] = true;
        while let Some(&current) = stack.last() {
            let options: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&direction| {
                    let next = current.step(direction);
                    world.contains(next) && !seen[next.x as usize][next.y as usize]
                })
                .collect();

            if options.is_empty() {
                stack.pop();
                continue;
            }
            let direction = options[rng.gen_range(0..options.len())];
            let next = current.step(direction);
            world.open_between(current, direction);
            seen[next.x as usize][next.y as usize] = true;
            stack.push(next);
        }
        world
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as usize) < W && (point.y as usize) < H
    }

    pub fn has_wall(&self, point: Point, direction: Direction) -> bool {
        if !self.contains(point) {
            return true;
        }
        self.walls[point.x as usize][point.y as usize].contains(direction)
    }

    pub fn open_between(&mut self, point: Point, direction: Direction) {
        let next = point.step(direction);
        self.walls[point.x as usize][point.y as usize].remove(direction);
        if self.contains(next) {
            self.walls[next.x as usize][next.y as usize].remove(direction.opposite());
        }
    }

    /// What the IR sensors report standing in `point` facing `heading`.
    pub fn sense(&self, point: Point, heading: Direction) -> WallReport {
        WallReport {
            front: self.has_wall(point, heading),
            left: self.has_wall(point, heading.left()),
            right: self.has_wall(point, heading.right()),
            ..WallReport::default()
        }
    }

    /// Follows `directions` from the cell north of the start, returns the last cell.
    pub fn walk(&self, directions: &[Direction]) -> Point {
        let mut position = Point::new(0, 1);
        for &direction in directions {
            assert!(
                !self.has_wall(position, direction),
                "drove through a wall at ({}, {}) going {:?}",
                position.x,
                position.y,
                direction
            );
            position = position.step(direction);
        }
        position
    }
}

/// Wheels that follow the commanded linear speed exactly.
pub struct Wheels {
    residual_edges: f32,
}

impl Wheels {
    pub fn new() -> Self {
        Self { residual_edges: 0.0 }
    }

    pub fn delta(&mut self, command: MotionCommand) -> EncoderDelta {
        let edges = command.linear_m_s * 100.0 * TICK_S / ENCODER_DIST_CM_PER_EDGE + self.residual_edges;
        let whole = edges as i32;
        self.residual_edges = edges - whole as f32;
        EncoderDelta::new(whole, whole)
    }
}
