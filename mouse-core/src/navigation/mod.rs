/*
    Motion Executor

    One movement at a time, stepped once per control tick.
    - Straight family: accelerate, then brake at the Torricelli distance to the end speed
    - Turn family: fixed angular trapezoid in time, optional straight afterwards
    - Turn around: brake, rotate in place, accelerate away
*/

use libm::fmodf;

use crate::control::TurnProfile;
use crate::control::WallFollow;
use crate::maze::Direction;
use crate::maze::Point;
use crate::maze::RelativeTurn;
use crate::planner::Movement;
use crate::planner::MovementFamily;
use crate::planner::PlanStep;
use crate::resources::config::*;
use crate::resources::general_params::GeneralParams;
use crate::resources::general_params::SpeedTier;
use crate::resources::movement_params::forward_params;
use crate::resources::movement_params::straight_params;
use crate::resources::movement_params::turn_params;
use crate::resources::movement_params::ForwardParams;
use crate::resources::sensor_resources::EncoderDelta;
use crate::sensors::WallReport;

/* --------------------------- Declare Modules -------------------------- */
pub mod explorer;
pub mod odometry;

pub use explorer::*;
pub use odometry::*;

/* --------------------------- Errors -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavError {
    /// The active tier has no kinematic entry for the movement.
    MissingProfile(Movement),
}

/* --------------------------- Command -------------------------- */
/// What the executor asks of the control cascade this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionCommand {
    pub linear_m_s: f32,
    pub angular_rad_s: f32,
    pub wall_follow: WallFollow,
}

/* --------------------------- Straight Stepper -------------------------- */
/// Distance needed to slow from `v_now` to `v_end` at `deceleration` [m].
pub fn braking_distance_m(v_now: f32, v_end: f32, deceleration: f32) -> f32 {
    if deceleration <= 0.0 || v_now <= v_end {
        return 0.0;
    }
    (v_now * v_now - v_end * v_end) / (2.0 * deceleration)
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StraightStepper {
    params: ForwardParams,
    target_cm: f32,
    end_speed: f32,
    braking: bool,
}

impl StraightStepper {
    pub fn new(params: ForwardParams, target_cm: f32, end_speed: f32) -> Self {
        Self {
            params,
            target_cm: target_cm.max(0.0),
            end_speed: end_speed.max(0.0),
            braking: false,
        }
    }

    pub fn target_cm(&self) -> f32 {
        self.target_cm
    }

    pub fn is_braking(&self) -> bool {
        self.braking
    }

    pub fn is_done(&self, traveled_cm: f32) -> bool {
        traveled_cm >= self.target_cm
    }

    /// Speed for the next tick given the current commanded speed. Braking is
    /// latched once it starts.
    pub fn next_speed(&mut self, speed: f32, traveled_cm: f32) -> f32 {
        if !self.braking {
            let remaining_m = (self.target_cm - traveled_cm) / 100.0;
            if remaining_m <= braking_distance_m(speed, self.end_speed, self.params.deceleration) {
                self.braking = true;
            }
        }

        if self.braking {
            let floor = self.end_speed.max(MIN_MOVE_SPEED);
            return (speed - self.params.deceleration * TICK_S).max(floor);
        }

        if speed > self.params.max_speed {
            (speed - self.params.deceleration * TICK_S).max(self.params.max_speed)
        } else {
            (speed + self.params.acceleration * TICK_S).min(self.params.max_speed)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StraightOutcome {
    Running,
    Arrived,
    Emergency,
}

/* --------------------------- Movement States -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq)]
enum TurnPhase {
    Rotating,
    Straight(StraightStepper),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AroundPhase {
    Braking(StraightStepper),
    Rotating,
    Leaving(StraightStepper),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MotionState {
    Idle,
    Straight {
        stepper: StraightStepper,
        follow: WallFollow,
        wall_break: bool,
    },
    Turn {
        profile: TurnProfile,
        linear_m_s: f32,
        after: Option<StraightStepper>,
        phase: TurnPhase,
    },
    TurnAround {
        profile: TurnProfile,
        leaving: Option<StraightStepper>,
        phase: AroundPhase,
    },
}

/* --------------------------- Navigation -------------------------- */
pub struct Navigation {
    tier: SpeedTier,
    params: GeneralParams,
    odometry: Odometry,
    heading: Direction,
    position: Point,
    state: MotionState,
    current: Option<PlanStep>,
    ticks: u32,
    command: MotionCommand,
    front_emergency: bool,
}

impl Navigation {
    pub fn new(tier: SpeedTier, params: GeneralParams) -> Self {
        Self {
            tier,
            params,
            odometry: Odometry::new(),
            heading: Direction::North,
            position: Point::ORIGIN,
            state: MotionState::Idle,
            current: None,
            ticks: 0,
            command: MotionCommand::default(),
            front_emergency: false,
        }
    }

    /// Drops any movement in progress and puts the robot back in the start cell.
    pub fn reset(&mut self) {
        self.abort();
        self.heading = Direction::North;
        self.position = Point::ORIGIN;
    }

    /// Cancels the movement in progress. The believed pose is kept.
    pub fn abort(&mut self) {
        self.state = MotionState::Idle;
        self.current = None;
        self.ticks = 0;
        self.command = MotionCommand::default();
        self.front_emergency = false;
        self.odometry.reset();
    }

    /// Applies to movements started after the call.
    pub fn set_tier(&mut self, tier: SpeedTier) {
        self.tier = tier;
    }

    pub fn tier(&self) -> SpeedTier {
        self.tier
    }

    pub fn set_params(&mut self, params: GeneralParams) {
        self.params = params;
    }

    pub fn set_pose(&mut self, position: Point, heading: Direction) {
        self.position = position;
        self.heading = heading;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn odometry(&self) -> &Odometry {
        &self.odometry
    }

    pub fn command(&self) -> MotionCommand {
        self.command
    }

    pub fn current_movement(&self) -> Option<PlanStep> {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.state == MotionState::Idle
    }

    /// The last movement was cut short by the front proximity check.
    pub fn front_emergency(&self) -> bool {
        self.front_emergency
    }

    /// Search-mode movement that turns the robot from `heading` to `direction`
    /// and enters the next cell.
    pub fn target_movement(heading: Direction, direction: Direction) -> Movement {
        match heading.turn_to(direction) {
            RelativeTurn::Straight => Movement::Forward,
            RelativeTurn::Left => Movement::TurnLeft90Search,
            RelativeTurn::Right => Movement::TurnRight90Search,
            RelativeTurn::Back => Movement::TurnAround,
        }
    }

    /// Speed the robot should carry into `movement`.
    fn entry_speed(&self, movement: Option<Movement>, previous: Movement) -> f32 {
        let Some(movement) = movement else {
            return 0.0;
        };
        match movement {
            Movement::TurnAroundInplace => 0.0,
            Movement::TurnAround => forward_params(self.tier, movement).map_or(0.0, |params| params.max_speed),
            _ => match movement.family() {
                MovementFamily::Straight => {
                    straight_params(self.tier, movement, Some(previous)).map_or(0.0, |params| params.max_speed)
                }
                _ => turn_params(self.tier, movement).map_or(0.0, |params| params.turn_linear_speed),
            },
        }
    }

    /// Loads `step` as the active movement. Parameters are copied here, so a
    /// later tier change never affects it.
    pub fn set_movement(
        &mut self,
        step: PlanStep,
        previous: Option<Movement>,
        next: Option<Movement>,
    ) -> Result<(), NavError> {
        let (movement, count) = step;
        let count = count.max(1);

        let state = match movement {
            Movement::TurnAround | Movement::TurnAroundInplace => {
                let turn = turn_params(self.tier, movement).ok_or(NavError::MissingProfile(movement))?;
                let profile = TurnProfile::in_place(&turn);
                let straight = forward_params(self.tier, movement);

                match (movement, straight) {
                    (Movement::TurnAround, Some(params)) => MotionState::TurnAround {
                        profile,
                        leaving: Some(StraightStepper::new(
                            params,
                            params.target_travel_cm,
                            self.entry_speed(next, movement),
                        )),
                        phase: AroundPhase::Braking(StraightStepper::new(params, params.target_travel_cm, 0.0)),
                    },
                    _ => MotionState::TurnAround {
                        profile,
                        leaving: None,
                        phase: AroundPhase::Rotating,
                    },
                }
            }
            _ if movement.family() == MovementFamily::Straight => {
                let params =
                    straight_params(self.tier, movement, previous).ok_or(NavError::MissingProfile(movement))?;

                let mut target_cm = params.target_travel_cm * count as f32;
                // The previous turn ended off the cell edge.
                if let Some(turn) = previous.and_then(|previous| turn_params(self.tier, previous)) {
                    target_cm -= turn.end_cm;
                }
                // The next turn starts before the cell edge.
                if let Some(turn) = next.and_then(|next| turn_params(self.tier, next)) {
                    if turn.start_cm < 0.0 {
                        target_cm += turn.start_cm;
                    }
                }

                MotionState::Straight {
                    stepper: StraightStepper::new(params, target_cm, self.entry_speed(next, movement)),
                    follow: if movement == Movement::Diagonal { WallFollow::Diagonal } else { WallFollow::Sides },
                    wall_break: movement == Movement::Forward,
                }
            }
            _ => {
                let turn = turn_params(self.tier, movement).ok_or(NavError::MissingProfile(movement))?;
                // A following connector drives the post-turn straight itself.
                let after = match next {
                    Some(Movement::ForwardAfterDiagonal) => None,
                    _ => forward_params(self.tier, movement)
                        .map(|params| StraightStepper::new(params, params.target_travel_cm, self.entry_speed(next, movement))),
                };
                MotionState::Turn {
                    profile: TurnProfile::new(&turn),
                    linear_m_s: turn.turn_linear_speed,
                    after,
                    phase: TurnPhase::Rotating,
                }
            }
        };

        log::debug!("nav: {:?} x{} from ({}, {})", movement, count, self.position.x, self.position.y);
        self.state = state;
        self.current = Some((movement, count));
        self.ticks = 0;
        self.front_emergency = false;
        self.odometry.set_traveled_cm(0.0);
        Ok(())
    }

    /// Advances the active movement by one tick. Returns `true` on the tick
    /// the movement completes.
    pub fn step(&mut self, delta: EncoderDelta, walls: &WallReport) -> bool {
        self.odometry.update(delta);

        let mut state = self.state;
        if state == MotionState::Idle {
            self.command = MotionCommand::default();
            return false;
        }
        self.ticks = self.ticks.saturating_add(1);
        let elapsed = self.ticks as f32 * TICK_S;

        let done = match &mut state {
            MotionState::Idle => false,
            MotionState::Straight {
                stepper,
                follow,
                wall_break,
            } => {
                if *wall_break && self.params.enable_wall_break_correction {
                    self.correct_wall_break(walls);
                }
                self.drive_straight(stepper, *follow, walls) != StraightOutcome::Running
            }
            MotionState::Turn {
                profile,
                linear_m_s,
                after,
                phase,
            } => match phase {
                TurnPhase::Rotating => {
                    if profile.is_done(elapsed) {
                        match after.take() {
                            Some(stepper) => {
                                *phase = TurnPhase::Straight(stepper);
                                self.odometry.set_traveled_cm(0.0);
                                self.command.angular_rad_s = 0.0;
                                false
                            }
                            None => true,
                        }
                    } else {
                        self.command = MotionCommand {
                            linear_m_s: *linear_m_s,
                            angular_rad_s: profile.angular_speed(elapsed),
                            wall_follow: WallFollow::Off,
                        };
                        false
                    }
                }
                TurnPhase::Straight(stepper) => {
                    self.drive_straight(stepper, WallFollow::Sides, walls) != StraightOutcome::Running
                }
            },
            MotionState::TurnAround {
                profile,
                leaving,
                phase,
            } => match phase {
                AroundPhase::Braking(stepper) => {
                    if self.drive_straight(stepper, WallFollow::Sides, walls) != StraightOutcome::Running {
                        // Rebase so the rotation starts at t = 0.
                        *phase = AroundPhase::Rotating;
                        self.front_emergency = false;
                        self.ticks = 0;
                        self.command = MotionCommand::default();
                    }
                    false
                }
                AroundPhase::Rotating => {
                    if profile.is_done(elapsed) {
                        match leaving.take() {
                            Some(stepper) => {
                                *phase = AroundPhase::Leaving(stepper);
                                self.ticks = 0;
                                self.odometry.set_traveled_cm(0.0);
                                self.command = MotionCommand::default();
                                false
                            }
                            None => true,
                        }
                    } else {
                        self.command = MotionCommand {
                            linear_m_s: 0.0,
                            angular_rad_s: profile.angular_speed(elapsed),
                            wall_follow: WallFollow::Off,
                        };
                        false
                    }
                }
                AroundPhase::Leaving(stepper) => {
                    self.drive_straight(stepper, WallFollow::Sides, walls) != StraightOutcome::Running
                }
            },
        };

        if done {
            self.finish();
        } else {
            self.state = state;
        }
        done
    }

    fn drive_straight(&mut self, stepper: &mut StraightStepper, follow: WallFollow, walls: &WallReport) -> StraightOutcome {
        if walls.front_emergency {
            log::warn!("nav: front wall too close, stopping");
            self.front_emergency = true;
            self.command = MotionCommand::default();
            return StraightOutcome::Emergency;
        }

        let traveled = self.odometry.traveled_cm();
        if stepper.is_done(traveled) {
            return StraightOutcome::Arrived;
        }

        self.command = MotionCommand {
            linear_m_s: stepper.next_speed(self.command.linear_m_s, traveled),
            angular_rad_s: 0.0,
            wall_follow: follow,
        };
        StraightOutcome::Running
    }

    /// Snaps the distance inside the current cell to where the side wall is
    /// known to end.
    fn correct_wall_break(&mut self, walls: &WallReport) {
        let expected = if walls.left_falling_edge {
            self.params.start_wall_break_cm_left
        } else if walls.right_falling_edge {
            self.params.start_wall_break_cm_right
        } else {
            return;
        };

        let traveled = self.odometry.traveled_cm();
        let in_cell = fmodf(traveled, CELL_SIZE_CM);
        let correction = expected - in_cell;
        if correction.abs() <= WALL_BREAK_WINDOW_CM {
            log::debug!("nav: wall break correction {} cm", correction);
            self.odometry.set_traveled_cm(traveled + correction);
        }
    }

    fn finish(&mut self) {
        let Some((movement, count)) = self.current.take() else {
            self.state = MotionState::Idle;
            return;
        };

        if movement == Movement::Stop || self.front_emergency {
            self.command = MotionCommand::default();
        } else {
            self.command.angular_rad_s = 0.0;
        }

        if !self.front_emergency {
            if let Some((heading, position)) = movement.apply_to_pose(count, self.heading, self.position) {
                self.heading = heading;
                self.position = position;
            }
        }

        self.state = MotionState::Idle;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::config::ENCODER_DIST_CM_PER_EDGE;
    use approx::assert_relative_eq;

    /// Wheels that follow the commanded speed exactly.
    struct Wheels {
        residual_edges: f32,
    }

    impl Wheels {
        fn new() -> Self {
            Self { residual_edges: 0.0 }
        }

        fn delta(&mut self, command: MotionCommand) -> EncoderDelta {
            let edges = command.linear_m_s * 100.0 * TICK_S / ENCODER_DIST_CM_PER_EDGE + self.residual_edges;
            let whole = edges as i32;
            self.residual_edges = edges - whole as f32;
            EncoderDelta::new(whole, whole)
        }
    }

    fn run(nav: &mut Navigation, walls: &WallReport, max_ticks: u32) -> u32 {
        let mut wheels = Wheels::new();
        for tick in 1..=max_ticks {
            let delta = wheels.delta(nav.command());
            if nav.step(delta, walls) {
                return tick;
            }
        }
        panic!("movement did not finish in {} ticks", max_ticks);
    }

    #[test]
    fn torricelli_braking_profile() {
        let params = ForwardParams {
            max_speed: 1.0,
            acceleration: 2.0,
            deceleration: 2.0,
            target_travel_cm: 18.0,
        };
        let mut stepper = StraightStepper::new(params, 18.0, 0.0);
        let mut speed = 0.0;
        let mut traveled = 0.0;
        let mut peak: f32 = 0.0;
        while !stepper.is_done(traveled) {
            speed = stepper.next_speed(speed, traveled);
            traveled += speed * 100.0 * TICK_S;
            peak = peak.max(speed);
        }

        // Triangular: braking starts halfway at sqrt(2 * a * 0.09 m).
        assert_relative_eq!(peak, 0.6, epsilon = 0.01);
        assert!(traveled - 18.0 < 0.15);
        assert_relative_eq!(speed, MIN_MOVE_SPEED, epsilon = 1e-3);
    }

    #[test]
    fn executor_brakes_at_the_torricelli_distance() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_pose(Point::new(0, 1), Direction::North);
        nav.set_movement((Movement::Forward, 3), Some(Movement::Start), None).unwrap();
        let params = straight_params(SpeedTier::SearchMedium, Movement::Forward, Some(Movement::Start)).unwrap();
        let target_cm = params.target_travel_cm * 3.0;

        let mut wheels = Wheels::new();
        let mut braking_at = None;
        for tick in 1..=5_000u32 {
            let before = nav.command().linear_m_s;
            let done = nav.step(wheels.delta(nav.command()), &WallReport::default());
            if done {
                break;
            }
            let after = nav.command().linear_m_s;
            if braking_at.is_none() && after < before {
                let remaining_m = (target_cm - nav.odometry().traveled_cm()) / 100.0;
                braking_at = Some((tick, before, remaining_m));
            }
            if braking_at.is_some() {
                assert!(after <= before, "speed rose again at tick {}", tick);
            }
        }

        let (tick, speed, remaining_m) = braking_at.unwrap();
        assert_relative_eq!(speed, params.max_speed, epsilon = 1e-4);
        let expected_m = braking_distance_m(speed, 0.0, params.deceleration);
        let one_tick_m = speed * TICK_S + ENCODER_DIST_CM_PER_EDGE / 100.0;
        assert!(remaining_m <= expected_m, "tick {}: {} m left, {} m needed", tick, remaining_m, expected_m);
        assert!(remaining_m > expected_m - one_tick_m, "tick {}: {} m left, {} m needed", tick, remaining_m, expected_m);

        assert_eq!(nav.position(), Point::new(0, 4));
        assert!(nav.is_idle());
    }

    #[test]
    fn braking_keeps_the_next_movement_speed() {
        let params = ForwardParams {
            max_speed: 1.0,
            acceleration: 10.0,
            deceleration: 2.0,
            target_travel_cm: 36.0,
        };
        let mut stepper = StraightStepper::new(params, 36.0, 0.5);
        let mut speed = 0.0;
        let mut traveled = 0.0;
        while !stepper.is_done(traveled) {
            speed = stepper.next_speed(speed, traveled);
            traveled += speed * 100.0 * TICK_S;
        }
        assert!(stepper.is_braking());
        assert_relative_eq!(speed, 0.5, epsilon = 0.02);
    }

    #[test]
    fn forward_run_updates_the_pose() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_pose(Point::new(0, 1), Direction::North);
        nav.set_movement((Movement::Forward, 3), Some(Movement::Start), Some(Movement::Stop)).unwrap();
        run(&mut nav, &WallReport::default(), 5_000);

        assert_eq!(nav.position(), Point::new(0, 4));
        assert_relative_eq!(nav.odometry().traveled_cm(), 54.0, epsilon = 0.2);
        assert!(nav.is_idle());
    }

    #[test]
    fn search_turn_rotates_then_straightens() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_pose(Point::new(0, 1), Direction::North);
        nav.set_movement((Movement::TurnRight90Search, 1), Some(Movement::Forward), Some(Movement::Forward))
            .unwrap();

        let mut wheels = Wheels::new();
        let mut heading_rad = 0.0;
        let mut done = false;
        for _ in 0..5_000 {
            let command = nav.command();
            heading_rad += command.angular_rad_s * TICK_S;
            if nav.step(wheels.delta(command), &WallReport::default()) {
                done = true;
                break;
            }
        }
        assert!(done);

        let turn = turn_params(SpeedTier::SearchMedium, Movement::TurnRight90Search).unwrap();
        assert_relative_eq!(heading_rad, -turn.angle_to_turn, epsilon = 0.05);
        assert_eq!(nav.heading(), Direction::East);
        assert_eq!(nav.position(), Point::new(1, 1));
    }

    #[test]
    fn turn_around_brakes_rotates_and_leaves() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_pose(Point::new(0, 3), Direction::North);
        nav.set_movement((Movement::TurnAround, 1), Some(Movement::Forward), Some(Movement::Forward)).unwrap();

        let mut wheels = Wheels::new();
        let mut stopped_to_rotate = false;
        let mut done = false;
        for _ in 0..10_000 {
            let command = nav.command();
            if command.angular_rad_s != 0.0 {
                assert_eq!(command.linear_m_s, 0.0);
                stopped_to_rotate = true;
            }
            if nav.step(wheels.delta(command), &WallReport::default()) {
                done = true;
                break;
            }
        }
        assert!(done && stopped_to_rotate);
        assert_eq!(nav.heading(), Direction::South);
        assert_eq!(nav.position(), Point::new(0, 2));
        // Left at the speed of the following forward.
        assert!(nav.command().linear_m_s > 0.0);
    }

    #[test]
    fn front_emergency_stops_immediately() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_pose(Point::new(0, 1), Direction::North);
        nav.set_movement((Movement::Forward, 2), None, None).unwrap();
        nav.step(EncoderDelta::default(), &WallReport::default());
        assert!(nav.command().linear_m_s > 0.0);

        let blocked = WallReport {
            front_emergency: true,
            ..WallReport::default()
        };
        assert!(nav.step(EncoderDelta::default(), &blocked));
        assert!(nav.front_emergency());
        assert_eq!(nav.command(), MotionCommand::default());
        assert_eq!(nav.position(), Point::new(0, 1));
    }

    #[test]
    fn missing_profile_is_an_error() {
        let mut nav = Navigation::new(SpeedTier::SearchSlow, GeneralParams::default());
        assert_eq!(
            nav.set_movement((Movement::Diagonal, 1), None, None),
            Err(NavError::MissingProfile(Movement::Diagonal))
        );
        assert!(nav.is_idle());
    }

    #[test]
    fn tier_change_keeps_the_active_movement() {
        let mut nav = Navigation::new(SpeedTier::SearchSlow, GeneralParams::default());
        nav.set_movement((Movement::Forward, 4), None, None).unwrap();
        nav.set_tier(SpeedTier::Fast);

        let mut wheels = Wheels::new();
        let mut peak: f32 = 0.0;
        for _ in 0..20_000 {
            let command = nav.command();
            peak = peak.max(command.linear_m_s);
            if nav.step(wheels.delta(command), &WallReport::default()) {
                break;
            }
        }
        assert!(peak <= 0.25 + 1e-6);
    }

    #[test]
    fn abort_clears_the_movement() {
        let mut nav = Navigation::new(SpeedTier::SearchMedium, GeneralParams::default());
        nav.set_movement((Movement::Forward, 1), None, None).unwrap();
        for _ in 0..10 {
            nav.step(EncoderDelta::new(20, 20), &WallReport::default());
        }
        nav.abort();
        assert!(nav.is_idle());
        assert_eq!(nav.command(), MotionCommand::default());
        assert_eq!(nav.odometry().traveled_cm(), 0.0);
        assert!(!nav.step(EncoderDelta::default(), &WallReport::default()));
    }

    #[test]
    fn wall_break_snaps_inside_the_window() {
        let mut params = GeneralParams::for_tier(SpeedTier::Slow);
        params.start_wall_break_cm_left = 6.0;
        let mut nav = Navigation::new(SpeedTier::Slow, params);
        nav.set_movement((Movement::Forward, 2), None, None).unwrap();

        // 18 + 4.5 cm traveled: 4.5 cm into the second cell.
        nav.odometry.set_traveled_cm(22.5);
        let edge = WallReport {
            left_falling_edge: true,
            ..WallReport::default()
        };
        nav.step(EncoderDelta::default(), &edge);
        assert_relative_eq!(nav.odometry().traveled_cm(), 24.0);

        // Too far from the expected break: ignored.
        nav.odometry.set_traveled_cm(30.0);
        nav.step(EncoderDelta::default(), &edge);
        assert_relative_eq!(nav.odometry().traveled_cm(), 30.0);
    }

    #[test]
    fn search_movement_for_each_direction() {
        assert_eq!(Navigation::target_movement(Direction::North, Direction::North), Movement::Forward);
        assert_eq!(Navigation::target_movement(Direction::North, Direction::West), Movement::TurnLeft90Search);
        assert_eq!(Navigation::target_movement(Direction::East, Direction::South), Movement::TurnRight90Search);
        assert_eq!(Navigation::target_movement(Direction::South, Direction::North), Movement::TurnAround);
    }
}
