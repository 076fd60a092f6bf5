/*
    Flood Fill Solver
*/

use heapless::Vec;

use super::grid::Grid;
use super::grid::CELLS_X;
use super::grid::CELLS_Y;
use super::grid::MAX_CELLS;
use super::grid::UNREACHED;
use super::Direction;
use super::Point;
use super::SolveError;
use super::Walls;

/* --------------------------- Constants -------------------------- */
pub const MAX_GOALS: usize = 4;

/// Centre 2x2 of the classic 16x16 maze.
pub const CLASSIC_GOALS: [Point; 4] = [Point::new(7, 7), Point::new(7, 8), Point::new(8, 7), Point::new(8, 8)];

pub type Goals = Vec<Point, MAX_GOALS>;
pub type DirectionList = Vec<Direction, MAX_CELLS>;

/* --------------------------- Maze -------------------------- */
/// Cell grid plus goal set and an in-memory backup copy.
#[derive(Debug, Clone)]
pub struct Maze<const W: usize = CELLS_X, const H: usize = CELLS_Y> {
    grid: Grid<W, H>,
    backup: Grid<W, H>,
    goals: Goals,
}

impl Maze<CELLS_X, CELLS_Y> {
    pub fn classic() -> Self {
        Self::new(&CLASSIC_GOALS)
    }
}

impl<const W: usize, const H: usize> Maze<W, H> {
    /// Goals outside the grid and goals beyond [`MAX_GOALS`] are dropped.
    pub fn new(goals: &[Point]) -> Self {
        let grid = Grid::new();
        let mut kept = Goals::new();
        for &goal in goals.iter().filter(|goal| grid.contains(**goal)) {
            if kept.push(goal).is_err() {
                log::warn!("maze: ignoring goal ({}, {}), goal list is full", goal.x, goal.y);
            }
        }

        let mut maze = Self {
            grid,
            backup: Grid::new(),
            goals: kept,
        };
        maze.reset();
        maze
    }

    /// Forgets every wall, then seals the border and the start cell.
    pub fn reset(&mut self) {
        self.grid.reset();
        // The robot starts at the origin facing north with walls on both sides and behind.
        self.grid.set_walls(Point::ORIGIN, Walls::SOUTH.union(Walls::WEST).union(Walls::EAST));
        if let Some(origin) = self.grid.cell_mut(Point::ORIGIN) {
            origin.visited = true;
        }
    }

    pub fn grid(&self) -> &Grid<W, H> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid<W, H> {
        &mut self.grid
    }

    pub fn goals(&self) -> &[Point] {
        &self.goals
    }

    pub fn is_goal(&self, point: Point) -> bool {
        self.goals.contains(&point)
    }

    pub fn create_backup(&mut self) {
        self.backup = self.grid.clone();
    }

    pub fn restore_backup(&mut self) {
        self.grid = self.backup.clone();
    }

    pub fn backup(&self) -> &Grid<W, H> {
        &self.backup
    }

    pub(crate) fn backup_mut(&mut self) -> &mut Grid<W, H> {
        &mut self.backup
    }

    /// Records what the robot saw in `point` and marks it visited.
    pub fn update_walls(&mut self, point: Point, walls: Walls) {
        self.grid.set_walls(point, walls);
        if let Some(cell) = self.grid.cell_mut(point) {
            cell.visited = true;
        }
    }

    fn flood(&mut self, reached_goal_once: bool, search_mode: bool) {
        let origin = [Point::ORIGIN];
        let targets: &[Point] = if reached_goal_once { &origin } else { &self.goals };
        self.grid.flood_fill(targets, !search_mode);
    }

    /// Next direction to drive from `position`.
    ///
    /// While `reached_goal_once` is false the targets are the goal cells,
    /// afterwards the origin. In search mode `walls` is written into the map
    /// first; in replay mode the map is taken as complete and only visited
    /// cells are considered.
    pub fn next_step(
        &mut self,
        position: Point,
        walls: Walls,
        reached_goal_once: bool,
        search_mode: bool,
    ) -> Result<Direction, SolveError> {
        if !self.grid.contains(position) {
            return Err(SolveError::NoPath);
        }

        let at_target = if reached_goal_once { position == Point::ORIGIN } else { self.is_goal(position) };
        if at_target {
            // The start cell keeps the walls it was sealed with.
            if search_mode && position != Point::ORIGIN {
                self.update_walls(position, walls);
            }
            return Err(SolveError::AtTarget);
        }

        if position == Point::ORIGIN {
            return Ok(Direction::North);
        }

        if search_mode {
            self.update_walls(position, walls);
        }

        self.flood(reached_goal_once, search_mode);

        let Some(&cell) = self.grid.cell(position) else {
            return Err(SolveError::NoPath);
        };
        if cell.distance == UNREACHED {
            log::debug!("maze: ({}, {}) cannot reach any target", position.x, position.y);
            return Err(SolveError::NoPath);
        }

        // (direction, distance, visited)
        let mut best: Option<(Direction, u8, bool)> = None;
        for direction in Direction::ALL {
            if cell.walls.contains(direction) {
                continue;
            }
            let Some(next) = self.grid.neighbour(position, direction) else {
                continue;
            };
            let Some(&neighbour) = self.grid.cell(next) else {
                continue;
            };
            if !search_mode && !neighbour.visited {
                continue;
            }
            if neighbour.distance == UNREACHED {
                continue;
            }

            let better = match best {
                None => true,
                Some((_, distance, visited)) => {
                    neighbour.distance < distance || (neighbour.distance == distance && neighbour.visited && !visited)
                }
            };
            if better {
                best = Some((direction, neighbour.distance, neighbour.visited));
            }
        }

        match best {
            Some((direction, _, _)) => Ok(direction),
            None => {
                log::warn!("maze: no open neighbour at ({}, {}), defaulting to north", position.x, position.y);
                Ok(Direction::North)
            }
        }
    }

    /// Replay walk from the cell north of the origin to the first goal reached.
    pub fn directions_to_goal(&mut self) -> Result<DirectionList, SolveError> {
        let mut directions = DirectionList::new();
        let mut position = Point::ORIGIN.step(Direction::North);

        while !self.is_goal(position) {
            let walls = self.grid.cell(position).map_or(Walls::ALL, |cell| cell.walls);
            let direction = self.next_step(position, walls, false, false)?;
            // A walk longer than the grid means the field is inconsistent.
            directions.push(direction).map_err(|_| SolveError::NoPath)?;
            position = position.step(direction);
        }

        Ok(directions)
    }

    /// Reachable unvisited cell closest to `from`, if any is left.
    pub fn closest_unvisited(&mut self, from: Point) -> Option<Point> {
        self.grid.flood_fill(&[from], false);
        let grid = &self.grid;
        grid.points()
            .filter_map(|point| grid.cell(point).map(|cell| (point, *cell)))
            .filter(|(_, cell)| !cell.visited && cell.distance != UNREACHED)
            .min_by_key(|(_, cell)| cell.distance)
            .map(|(point, _)| point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_cell_is_sealed() {
        let maze = Maze::classic();
        let origin = maze.grid().cell(Point::ORIGIN).unwrap();
        assert_eq!(origin.walls, Walls::SOUTH.union(Walls::WEST).union(Walls::EAST));
        assert_eq!(origin.known_walls, Walls::ALL);
        assert!(maze.grid().cell(Point::new(1, 0)).unwrap().walls.contains(Direction::West));
        assert!(!maze.grid().cell(Point::new(0, 1)).unwrap().walls.contains(Direction::South));
    }

    #[test]
    fn origin_always_heads_north() {
        let mut maze = Maze::classic();
        assert_eq!(maze.next_step(Point::ORIGIN, Walls::NONE, false, true), Ok(Direction::North));
    }

    #[test]
    fn search_step_marks_cell_visited() {
        let mut maze = Maze::classic();
        let position = Point::new(0, 1);
        let direction = maze.next_step(position, Walls::WEST.union(Walls::NORTH), false, true).unwrap();
        assert_eq!(direction, Direction::East);
        assert!(maze.grid().is_visited(position));
        assert!(maze.grid().cell(Point::new(0, 2)).unwrap().walls.contains(Direction::South));
    }

    #[test]
    fn visited_neighbour_wins_a_tie() {
        // From (1,1) towards goal (2,2): north (1,2) and east (2,1) are both one step away.
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(2, 2)]);
        maze.grid_mut().cell_mut(Point::new(2, 1)).unwrap().visited = true;
        assert_eq!(maze.next_step(Point::new(1, 1), Walls::NONE, false, true), Ok(Direction::East));

        // Without the visit, enumeration order (north before east) decides.
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(2, 2)]);
        assert_eq!(maze.next_step(Point::new(1, 1), Walls::NONE, false, true), Ok(Direction::North));
    }

    #[test]
    fn smaller_distance_beats_visited() {
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(1, 3)]);
        maze.grid_mut().cell_mut(Point::new(2, 1)).unwrap().visited = true;
        assert_eq!(maze.next_step(Point::new(1, 1), Walls::NONE, false, true), Ok(Direction::North));
    }

    #[test]
    fn unreachable_goal_reports_no_path() {
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(3, 3)]);
        maze.update_walls(Point::new(3, 3), Walls::ALL);
        assert_eq!(maze.next_step(Point::new(0, 1), Walls::NONE, false, true), Err(SolveError::NoPath));
    }

    #[test]
    fn arriving_at_target_is_reported() {
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(2, 2)]);
        assert_eq!(maze.next_step(Point::new(2, 2), Walls::NORTH, false, true), Err(SolveError::AtTarget));
        assert!(maze.grid().is_visited(Point::new(2, 2)));
        assert_eq!(maze.next_step(Point::ORIGIN, Walls::NONE, true, true), Err(SolveError::AtTarget));
    }

    #[test]
    fn replay_walk_needs_a_visited_path() {
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(0, 3)]);
        assert_eq!(maze.directions_to_goal(), Err(SolveError::NoPath));

        for y in 1..=3 {
            maze.grid_mut().cell_mut(Point::new(0, y)).unwrap().visited = true;
        }
        let directions = maze.directions_to_goal().unwrap();
        assert_eq!(directions.as_slice(), &[Direction::North, Direction::North]);
    }

    #[test]
    fn closest_unvisited_cell() {
        let mut maze: Maze<4, 4> = Maze::new(&[Point::new(3, 3)]);
        maze.update_walls(Point::new(0, 1), Walls::WEST.union(Walls::EAST));
        assert_eq!(maze.closest_unvisited(Point::new(0, 1)), Some(Point::new(0, 2)));

        for point in maze.grid().points().collect::<std::vec::Vec<_>>() {
            maze.grid_mut().cell_mut(point).unwrap().visited = true;
        }
        assert_eq!(maze.closest_unvisited(Point::new(0, 1)), None);
    }

    #[test]
    fn backup_round_trip() {
        let mut maze = Maze::classic();
        maze.update_walls(Point::new(4, 4), Walls::NORTH);
        maze.create_backup();
        maze.reset();
        assert!(!maze.grid().is_visited(Point::new(4, 4)));
        maze.restore_backup();
        assert!(maze.grid().is_visited(Point::new(4, 4)));
    }
}
