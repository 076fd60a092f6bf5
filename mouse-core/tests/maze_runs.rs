mod common;

use common::Wheels;
use common::World;
use mouse_core::maze::Direction;
use mouse_core::maze::Maze;
use mouse_core::maze::Point;
use mouse_core::navigation::Explorer;
use mouse_core::navigation::Navigation;
use mouse_core::navigation::SearchPhase;
use mouse_core::planner::compile_plan;
use mouse_core::planner::default_movements;
use mouse_core::planner::smooth_movements;
use mouse_core::planner::Movement;
use mouse_core::planner::PlanCursor;
use mouse_core::planner::PlanStep;
use mouse_core::resources::general_params::GeneralParams;
use mouse_core::resources::general_params::SpeedTier;
use mouse_core::sensors::WallReport;
use mouse_core::tick::advance_plan;
use mouse_core::tick::PlanProgress;

const SEEDS: [u64; 12] = [1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233];

fn footprint(plan: &[PlanStep]) -> u32 {
    plan.iter()
        .map(|&(movement, count)| u32::from(movement.footprint_half_cells()) * u32::from(count))
        .sum()
}

fn rotation_deg(plan: &[PlanStep]) -> i32 {
    let total: i32 = plan.iter().map(|&(movement, count)| i32::from(movement.rotation_deg()) * i32::from(count)).sum();
    total.rem_euclid(360)
}

/// Searches out and back at the grid level, returns the movements issued.
fn search<const W: usize, const H: usize>(world: &World<W, H>, maze: &mut Maze<W, H>) -> Vec<Movement> {
    let mut explorer = Explorer::new();
    let mut heading = Direction::North;
    let mut position = Point::ORIGIN;
    let mut issued = Vec::new();

    for _ in 0..20_000 {
        let seen = world.sense(position, heading);
        let Some(movement) = explorer.next_movement(maze, heading, position, &seen).unwrap() else {
            break;
        };
        issued.push(movement);

        let (next_heading, next_position) = movement.apply_to_pose(1, heading, position).unwrap();
        if next_position != position {
            assert!(!world.has_wall(position, next_heading), "search drove through a wall");
        }
        heading = next_heading;
        position = next_position;
    }

    assert_eq!(explorer.phase(), SearchPhase::Finished);
    assert_eq!(position, Point::ORIGIN);
    issued
}

/// Feeds `plan` to the executor until it runs out. Returns the final pose.
fn execute(plan: &[PlanStep], tier: SpeedTier) -> (Direction, Point) {
    let mut nav = Navigation::new(tier, GeneralParams::for_tier(tier));
    let mut cursor = PlanCursor::new(plan);
    let mut wheels = Wheels::new();
    let walls = WallReport::default();

    for _ in 0..400_000 {
        match advance_plan(&mut nav, &mut cursor).unwrap() {
            PlanProgress::Running => {}
            PlanProgress::Finished => return (nav.heading(), nav.position()),
            PlanProgress::Aborted => panic!("unexpected front emergency"),
        }
        let delta = wheels.delta(nav.command());
        nav.step(delta, &walls);
    }
    panic!("plan did not finish");
}

#[test]
fn straight_corridor() {
    let mut maze: Maze<1, 16> = Maze::new(&[Point::new(0, 8)]);
    for y in 1..=8 {
        maze.grid_mut().cell_mut(Point::new(0, y)).unwrap().visited = true;
    }

    let directions = maze.directions_to_goal().unwrap();
    assert_eq!(directions.as_slice(), &[Direction::North; 7]);

    let plan = smooth_movements(&default_movements(&directions).unwrap()).unwrap();
    assert_eq!(plan.as_slice(), &[(Movement::Start, 1), (Movement::Forward, 7), (Movement::Stop, 1)]);

    let (heading, position) = execute(&plan, SpeedTier::Slow);
    assert_eq!(heading, Direction::North);
    assert_eq!(position, Point::new(0, 8));
}

#[test]
fn corridor_search_goes_out_and_back() {
    let world: World<1, 6> = World::open();
    let mut maze: Maze<1, 6> = Maze::new(&[Point::new(0, 5)]);
    let issued = search(&world, &mut maze);

    assert_eq!(issued.first(), Some(&Movement::Start));
    assert_eq!(issued.last(), Some(&Movement::Stop));
    assert_eq!(issued.iter().filter(|&&movement| movement == Movement::TurnAround).count(), 1);
    for y in 0..6 {
        assert!(maze.grid().is_visited(Point::new(0, y)));
    }
}

#[test]
fn random_mazes_search_and_replay() {
    for seed in SEEDS {
        let world: World<16, 16> = World::perfect(seed);
        let mut maze = Maze::classic();
        search(&world, &mut maze);

        let directions = maze.directions_to_goal().unwrap();
        let end = world.walk(&directions);
        assert!(maze.is_goal(end), "seed {} ended at ({}, {})", seed, end.x, end.y);

        let last = directions.last().copied().unwrap_or(Direction::North);
        for diagonals in [false, true] {
            let plan = compile_plan(&directions, diagonals).unwrap();
            assert_eq!(footprint(&plan), 2 * (directions.len() as u32 + 1), "seed {} plan {:?}", seed, plan);
            assert_eq!(rotation_deg(&plan), i32::from(last.index()) * 90, "seed {} plan {:?}", seed, plan);
            assert_eq!(compile_plan(&directions, diagonals).unwrap(), plan);
        }
    }
}

#[test]
fn replayed_runs_reach_the_goal() {
    for seed in SEEDS.iter().take(4) {
        let world: World<16, 16> = World::perfect(*seed);
        let mut maze = Maze::classic();
        search(&world, &mut maze);
        let directions = maze.directions_to_goal().unwrap();
        let goal = world.walk(&directions);
        let last = directions.last().copied().unwrap_or(Direction::North);

        let plan = compile_plan(&directions, false).unwrap();
        assert_eq!(execute(&plan, SpeedTier::Slow), (last, goal), "seed {}", seed);

        // Diagonal runs leave the grid pose alone, they only have to finish.
        let plan = compile_plan(&directions, true).unwrap();
        execute(&plan, SpeedTier::Slow);
    }
}

#[test]
fn maze_survives_a_power_cycle() {
    use mouse_core::maze::MazeSlot;
    use mouse_core::resources::storage::MemoryEeprom;

    let world: World<16, 16> = World::perfect(7);
    let mut maze = Maze::classic();
    search(&world, &mut maze);
    let directions = maze.directions_to_goal().unwrap();

    let mut eeprom: MemoryEeprom = MemoryEeprom::new();
    maze.save(&mut eeprom, MazeSlot::Main).unwrap();

    let mut restored = Maze::classic();
    restored.load(&mut eeprom, MazeSlot::Main).unwrap();
    assert_eq!(restored.directions_to_goal().unwrap(), directions);
}

#[test]
fn interrupted_search_survives_a_power_cycle() {
    use mouse_core::maze::MazeSlot;
    use mouse_core::resources::storage::MemoryEeprom;

    let world: World<16, 16> = World::perfect(7);
    let mut maze = Maze::classic();
    let mut explorer = Explorer::new();
    let mut heading = Direction::North;
    let mut position = Point::ORIGIN;
    let mut after_goal = 0;

    // Stopped by the button a few cells into the way back.
    while after_goal < 10 {
        let seen = world.sense(position, heading);
        let movement = explorer.next_movement(&mut maze, heading, position, &seen).unwrap().unwrap();
        (heading, position) = movement.apply_to_pose(1, heading, position).unwrap();
        if explorer.phase() == SearchPhase::Returning {
            after_goal += 1;
        }
    }
    let directions = maze.directions_to_goal().unwrap();

    let mut eeprom: MemoryEeprom = MemoryEeprom::new();
    maze.save_backup(&mut eeprom).unwrap();

    let mut booted = Maze::classic();
    assert_eq!(booted.restore(&mut eeprom), Ok(MazeSlot::Backup));
    assert_eq!(booted.grid(), maze.grid());
    assert_eq!(booted.directions_to_goal().unwrap(), directions);

    let goal = world.walk(&directions);
    assert!(booted.is_goal(goal));
    let last = directions.last().copied().unwrap_or(Direction::North);
    let plan = compile_plan(&directions, false).unwrap();
    assert_eq!(execute(&plan, SpeedTier::Slow), (last, goal));
}
