/*
    Maze Persistence
        cell at base + 4 * (x * H + y)
        [walls] [visited] [distance] [known walls]
*/

use crate::resources::storage::Eeprom;
use crate::resources::storage::StorageError;
use crate::resources::storage::BYTES_PER_CELL;
use crate::resources::storage::MAZE_BACKUP_ADDR;
use crate::resources::storage::MAZE_MAIN_ADDR;

use super::grid::Cell;
use super::grid::Grid;
use super::solver::Maze;
use super::Point;
use super::Walls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MazeSlot {
    /// The live map.
    Main,
    /// The in-memory backup copy.
    Backup,
}

impl MazeSlot {
    pub const fn base_addr(self) -> u16 {
        match self {
            MazeSlot::Main => MAZE_MAIN_ADDR,
            MazeSlot::Backup => MAZE_BACKUP_ADDR,
        }
    }
}

fn cell_addr<const H: usize>(base: u16, point: Point) -> u16 {
    let index = point.x as usize * H + point.y as usize;
    base + index as u16 * BYTES_PER_CELL
}

fn encode(cell: &Cell) -> [u8; 4] {
    [cell.walls.bits(), cell.visited as u8, cell.distance, cell.known_walls.bits()]
}

fn decode(bytes: [u8; 4]) -> Result<Cell, StorageError> {
    let [walls, visited, distance, known] = bytes;
    if walls > 0x0F || known > 0x0F || visited > 1 {
        return Err(StorageError::Corrupt);
    }
    Ok(Cell {
        walls: Walls(walls),
        known_walls: Walls(known),
        distance,
        visited: visited == 1,
    })
}

fn write_grid<E: Eeprom, const W: usize, const H: usize>(
    eeprom: &mut E,
    grid: &Grid<W, H>,
    base: u16,
) -> Result<(), StorageError> {
    for point in grid.points() {
        if let Some(cell) = grid.cell(point) {
            eeprom.write(cell_addr::<H>(base, point), &encode(cell))?;
        }
    }
    Ok(())
}

/// Decodes into a scratch grid so a damaged slot leaves `grid` untouched.
fn read_grid<E: Eeprom, const W: usize, const H: usize>(
    eeprom: &mut E,
    grid: &mut Grid<W, H>,
    base: u16,
) -> Result<(), StorageError> {
    let mut loaded = Grid::<W, H>::new();
    for point in grid.points() {
        let mut bytes = [0u8; 4];
        eeprom.read(cell_addr::<H>(base, point), &mut bytes)?;
        if let Some(cell) = loaded.cell_mut(point) {
            *cell = decode(bytes)?;
        }
    }
    *grid = loaded;
    Ok(())
}

impl<const W: usize, const H: usize> Maze<W, H> {
    pub fn save<E: Eeprom>(&self, eeprom: &mut E, slot: MazeSlot) -> Result<(), StorageError> {
        let grid = match slot {
            MazeSlot::Main => self.grid(),
            MazeSlot::Backup => self.backup(),
        };
        write_grid(eeprom, grid, slot.base_addr())?;
        log::info!("maze: saved {:?} slot", slot);
        Ok(())
    }

    pub fn load<E: Eeprom>(&mut self, eeprom: &mut E, slot: MazeSlot) -> Result<(), StorageError> {
        let base = slot.base_addr();
        match slot {
            MazeSlot::Main => read_grid(eeprom, self.grid_mut(), base),
            MazeSlot::Backup => read_grid(eeprom, self.backup_mut(), base),
        }
    }

    /// Snapshots the live map into the backup and writes that slot.
    pub fn save_backup<E: Eeprom>(&mut self, eeprom: &mut E) -> Result<(), StorageError> {
        self.create_backup();
        self.save(eeprom, MazeSlot::Backup)
    }

    /// Boot load. Takes the main slot, else brings the backup slot into the live map.
    pub fn restore<E: Eeprom>(&mut self, eeprom: &mut E) -> Result<MazeSlot, StorageError> {
        if self.load(eeprom, MazeSlot::Main).is_ok() {
            return Ok(MazeSlot::Main);
        }
        self.load(eeprom, MazeSlot::Backup)?;
        self.restore_backup();
        Ok(MazeSlot::Backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;
    use crate::resources::storage::MemoryEeprom;

    #[test]
    fn main_and_backup_slots_are_independent() {
        let mut eeprom: MemoryEeprom = MemoryEeprom::new();
        let mut maze = Maze::classic();
        maze.update_walls(Point::new(0, 1), Walls::WEST.union(Walls::NORTH));
        maze.create_backup();
        maze.update_walls(Point::new(1, 1), Walls::SOUTH);

        maze.save(&mut eeprom, MazeSlot::Main).unwrap();
        maze.save(&mut eeprom, MazeSlot::Backup).unwrap();

        let mut restored = Maze::classic();
        restored.load(&mut eeprom, MazeSlot::Main).unwrap();
        assert_eq!(restored.grid(), maze.grid());

        restored.load(&mut eeprom, MazeSlot::Backup).unwrap();
        restored.restore_backup();
        assert!(restored.grid().is_visited(Point::new(0, 1)));
        assert!(!restored.grid().is_visited(Point::new(1, 1)));
        assert!(restored.grid().cell(Point::new(0, 2)).unwrap().walls.contains(Direction::South));
    }

    #[test]
    fn restore_falls_back_to_the_backup_slot() {
        let mut eeprom: MemoryEeprom = MemoryEeprom::new();
        let mut maze = Maze::classic();
        assert!(maze.restore(&mut eeprom).is_err());

        maze.update_walls(Point::new(0, 1), Walls::EAST);
        maze.update_walls(Point::new(0, 2), Walls::WEST);
        maze.save_backup(&mut eeprom).unwrap();

        let mut restored = Maze::classic();
        assert_eq!(restored.restore(&mut eeprom), Ok(MazeSlot::Backup));
        assert_eq!(restored.grid(), maze.grid());
        assert!(restored.grid().is_visited(Point::new(0, 2)));

        maze.save(&mut eeprom, MazeSlot::Main).unwrap();
        assert_eq!(Maze::classic().restore(&mut eeprom), Ok(MazeSlot::Main));
    }

    #[test]
    fn cell_layout_is_column_major() {
        let mut eeprom: MemoryEeprom = MemoryEeprom::new();
        let mut maze = Maze::classic();
        maze.update_walls(Point::new(1, 2), Walls::NORTH);
        maze.save(&mut eeprom, MazeSlot::Main).unwrap();

        let addr = (MAZE_MAIN_ADDR + 4 * (16 + 2)) as usize;
        let bytes = &eeprom.as_bytes()[addr..addr + 4];
        assert_eq!(bytes, &[Walls::NORTH.bits(), 1, maze.grid().distance(Point::new(1, 2)), 0x0F]);
    }

    #[test]
    fn erased_slot_is_rejected_without_touching_the_map() {
        let mut eeprom: MemoryEeprom = MemoryEeprom::new();
        let mut maze = Maze::classic();
        maze.update_walls(Point::new(2, 2), Walls::EAST);
        let before = maze.grid().clone();

        assert_eq!(maze.load(&mut eeprom, MazeSlot::Main), Err(StorageError::Corrupt));
        assert_eq!(maze.grid(), &before);
    }

    #[test]
    fn slot_past_the_device_end_is_out_of_range() {
        let mut eeprom = MemoryEeprom::<0x600>::new();
        let maze = Maze::classic();
        assert!(matches!(maze.save(&mut eeprom, MazeSlot::Backup), Err(StorageError::OutOfRange { .. })));
    }
}
