/*
    Cell Grid and Flood Fill
*/

use heapless::Deque;

use super::Direction;
use super::Point;
use super::Walls;

/* --------------------------- Constants -------------------------- */
pub const CELLS_X: usize = 16;
pub const CELLS_Y: usize = 16;

/// Capacity of the flood fill queue, and therefore the largest supported grid.
pub const MAX_CELLS: usize = 256;

pub const UNREACHED: u8 = u8::MAX;

/* --------------------------- Cell -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub walls: Walls,
    pub known_walls: Walls,
    pub distance: u8,
    pub visited: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        walls: Walls::NONE,
        known_walls: Walls::NONE,
        distance: UNREACHED,
        visited: false,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

/* --------------------------- Grid -------------------------- */
/// Fixed `W` x `H` array of cells addressed by coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<const W: usize, const H: usize> {
    cells: [[Cell; H]; W],
}

impl<const W: usize, const H: usize> Grid<W, H> {
    const FITS_QUEUE: () = assert!(W * H <= MAX_CELLS && W > 0 && H > 0, "grid larger than the flood fill queue");

    pub const fn new() -> Self {
        let () = Self::FITS_QUEUE;
        Self { cells: [[Cell::EMPTY; H]; W] }
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub const fn height(&self) -> usize {
        H
    }

    pub const fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as usize) < W && (point.y as usize) < H
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        if !self.contains(point) {
            return None;
        }
        Some(&self.cells[point.x as usize][point.y as usize])
    }

    pub fn cell_mut(&mut self, point: Point) -> Option<&mut Cell> {
        if !self.contains(point) {
            return None;
        }
        Some(&mut self.cells[point.x as usize][point.y as usize])
    }

    /// Neighbour coordinate in `direction`, if it lies inside the grid.
    pub fn neighbour(&self, point: Point, direction: Direction) -> Option<Point> {
        let next = point.step(direction);
        self.contains(next).then_some(next)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> {
        (0..W as i32).flat_map(|x| (0..H as i32).map(move |y| Point::new(x, y)))
    }

    /// Walls on the outer border touching `point`.
    pub fn border_walls(&self, point: Point) -> Walls {
        let mut walls = Walls::NONE;
        for direction in Direction::ALL {
            if self.neighbour(point, direction).is_none() {
                walls.insert(direction);
            }
        }
        walls
    }

    pub fn distance(&self, point: Point) -> u8 {
        self.cell(point).map_or(UNREACHED, |cell| cell.distance)
    }

    pub fn is_visited(&self, point: Point) -> bool {
        self.cell(point).is_some_and(|cell| cell.visited)
    }

    /// Clears every cell, then seals the outer border as known walls.
    pub fn reset(&mut self) {
        for point in self.points() {
            let border = self.border_walls(point);
            let cell = &mut self.cells[point.x as usize][point.y as usize];
            *cell = Cell::EMPTY;
            cell.walls = border;
            cell.known_walls = border;
        }
    }

    /// Overwrites the walls of `point` and mirrors every side onto the
    /// neighbouring cells. All four sides become known.
    pub fn set_walls(&mut self, point: Point, walls: Walls) {
        if !self.contains(point) {
            return;
        }
        let walls = walls.union(self.border_walls(point));
        {
            let cell = &mut self.cells[point.x as usize][point.y as usize];
            cell.walls = walls;
            cell.known_walls = Walls::ALL;
        }

        for direction in Direction::ALL {
            let Some(next) = self.neighbour(point, direction) else {
                continue;
            };
            let opposite = direction.opposite();
            let neighbour = &mut self.cells[next.x as usize][next.y as usize];
            if walls.contains(direction) {
                neighbour.walls.insert(opposite);
            } else {
                neighbour.walls.remove(opposite);
            }
            neighbour.known_walls.insert(opposite);
        }
    }

    /// Breadth-first distance relaxation from `targets`.
    ///
    /// A cell is expanded towards a neighbour when there is no wall on that
    /// side and the neighbour is still unreached. With `require_visited` only
    /// cells the robot has driven through are seeded or expanded into.
    pub fn flood_fill(&mut self, targets: &[Point], require_visited: bool) {
        let mut queue: Deque<Point, MAX_CELLS> = Deque::new();

        for column in self.cells.iter_mut() {
            for cell in column.iter_mut() {
                cell.distance = UNREACHED;
            }
        }

        for &target in targets {
            let Some(cell) = self.cell_mut(target) else {
                continue;
            };
            if cell.distance == 0 || (require_visited && !cell.visited) {
                continue;
            }
            cell.distance = 0;
            // Each cell is queued at most once, so the queue never overflows.
            let _ = queue.push_back(target);
        }

        while let Some(current) = queue.pop_front() {
            let Some(&cell) = self.cell(current) else {
                continue;
            };

            for direction in Direction::ALL {
                if cell.walls.contains(direction) {
                    continue;
                }
                let Some(next) = self.neighbour(current, direction) else {
                    continue;
                };
                let neighbour = &mut self.cells[next.x as usize][next.y as usize];
                if neighbour.distance != UNREACHED {
                    continue;
                }
                if require_visited && !neighbour.visited {
                    continue;
                }
                neighbour.distance = cell.distance.saturating_add(1);
                let _ = queue.push_back(next);
            }
        }
    }
}

impl<const W: usize, const H: usize> Default for Grid<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> Grid<CELLS_X, CELLS_Y> {
        let mut grid = Grid::new();
        grid.reset();
        grid
    }

    #[test]
    fn reset_seals_only_the_border() {
        let grid = open_grid();
        assert_eq!(grid.cell(Point::new(0, 0)).unwrap().walls, Walls::SOUTH.union(Walls::WEST));
        assert_eq!(grid.cell(Point::new(15, 15)).unwrap().walls, Walls::NORTH.union(Walls::EAST));
        assert_eq!(grid.cell(Point::new(7, 7)).unwrap().walls, Walls::NONE);
        assert_eq!(grid.cell(Point::new(7, 0)).unwrap().known_walls, Walls::SOUTH);
    }

    #[test]
    fn walls_are_mirrored_on_neighbours() {
        let mut grid = open_grid();
        grid.set_walls(Point::new(3, 3), Walls::NORTH.union(Walls::EAST));

        let north = grid.cell(Point::new(3, 4)).unwrap();
        assert!(north.walls.contains(Direction::South));
        assert!(north.known_walls.contains(Direction::South));

        let west = grid.cell(Point::new(2, 3)).unwrap();
        assert!(!west.walls.contains(Direction::East));
        assert!(west.known_walls.contains(Direction::East));

        // A later reading without the wall clears both sides again.
        grid.set_walls(Point::new(3, 3), Walls::EAST);
        assert!(!grid.cell(Point::new(3, 4)).unwrap().walls.contains(Direction::South));
        assert!(grid.cell(Point::new(4, 3)).unwrap().walls.contains(Direction::West));
    }

    #[test]
    fn border_wall_survives_a_bad_reading() {
        let mut grid = open_grid();
        grid.set_walls(Point::new(0, 5), Walls::NONE);
        assert!(grid.cell(Point::new(0, 5)).unwrap().walls.contains(Direction::West));
    }

    #[test]
    fn flood_fill_is_a_bfs_field() {
        let mut grid = open_grid();
        grid.set_walls(Point::new(6, 5), Walls::NORTH.union(Walls::WEST));
        grid.set_walls(Point::new(5, 5), Walls::ALL);
        let targets = [Point::new(7, 7), Point::new(8, 8)];
        grid.flood_fill(&targets, false);

        for target in targets {
            assert_eq!(grid.distance(target), 0);
        }

        for point in grid.points() {
            let distance = grid.distance(point);
            if distance == 0 || distance == UNREACHED {
                continue;
            }
            let cell = *grid.cell(point).unwrap();
            let best = Direction::ALL
                .iter()
                .filter(|&&d| !cell.walls.contains(d))
                .filter_map(|&d| grid.neighbour(point, d))
                .map(|n| grid.distance(n))
                .min()
                .unwrap();
            assert_eq!(distance, best + 1, "cell {:?}", point);
        }

        // The boxed cell is cut off from every target.
        assert_eq!(grid.distance(Point::new(5, 5)), UNREACHED);
    }

    #[test]
    fn replay_flood_only_expands_into_visited_cells() {
        let mut grid = open_grid();
        for y in 0..4 {
            grid.cell_mut(Point::new(0, y)).unwrap().visited = true;
        }
        grid.flood_fill(&[Point::new(0, 3)], true);

        assert_eq!(grid.distance(Point::new(0, 0)), 3);
        assert_eq!(grid.distance(Point::new(1, 3)), UNREACHED);
        assert_eq!(grid.distance(Point::new(0, 4)), UNREACHED);
    }

    #[test]
    fn empty_target_list_reaches_nothing() {
        let mut grid = open_grid();
        grid.flood_fill(&[], false);
        assert!(grid.points().all(|p| grid.distance(p) == UNREACHED));
    }
}
