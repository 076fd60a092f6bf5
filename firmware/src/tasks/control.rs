/*
    Control Task

    Owns everything the 1 kHz tick touches and runs on the high priority
    executor.

    Idle --short press--> Search (no solved maze) or Run (solved maze)
    Search / Run --finished, short press or emergency--> Idle
    Idle --long press--> next run tier
*/

use super::*;

use mouse_core::control::ControlCascade;
use mouse_core::maze::Maze;
use mouse_core::maze::MazeSlot;
use mouse_core::navigation::Explorer;
use mouse_core::navigation::Navigation;
use mouse_core::planner::compile_plan;
use mouse_core::planner::Movement;
use mouse_core::planner::PlanCursor;
use mouse_core::resources::drain_encoder_edges;
use mouse_core::resources::load_active_tier;
use mouse_core::resources::load_params;
use mouse_core::resources::response;
use mouse_core::resources::save_active_tier;
use mouse_core::resources::save_params;
use mouse_core::resources::EncoderConsumer;
use mouse_core::resources::GeneralParams;
use mouse_core::resources::SpeedTier;
use mouse_core::sensors::WallSensors;
use mouse_core::tick::advance_plan;
use mouse_core::tick::control_tick;
use mouse_core::tick::ControlInputs;
use mouse_core::tick::PlanProgress;
use mouse_core::tick::TickOutput;

#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub enum DriveMode {
    Search,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
enum Outcome {
    Finished,
    Stopped,
    Failed,
}

fn next_run_tier(tier: SpeedTier) -> SpeedTier {
    match tier {
        SpeedTier::Slow => SpeedTier::Medium,
        SpeedTier::Medium => SpeedTier::Fast,
        _ => SpeedTier::Slow,
    }
}

pub struct MouseDriver<'d> {
    encoder: EncoderConsumer<'static>,
    motors: Motors<'d>,
    storage: FlashEeprom<'d>,
    nav: Navigation,
    wall_sensors: WallSensors,
    cascade: ControlCascade,
    maze: Maze,
    explorer: Explorer,
    params: GeneralParams,
    run_tier: SpeedTier,
    ticker: Ticker,
}

impl<'d> MouseDriver<'d> {
    pub fn new(encoder: EncoderConsumer<'static>, motors: Motors<'d>, storage: FlashEeprom<'d>) -> Self {
        let params = GeneralParams::for_tier(DEFAULT_RUN_TIER);
        Self {
            encoder,
            motors,
            storage,
            nav: Navigation::new(DEFAULT_RUN_TIER, params),
            wall_sensors: WallSensors::default(),
            cascade: ControlCascade::new(&params),
            maze: Maze::classic(),
            explorer: Explorer::new(),
            params,
            run_tier: DEFAULT_RUN_TIER,
            ticker: Ticker::every(Duration::from_micros(TIME_SAMPLING_US)),
        }
    }

    /* --------------------------- Storage -------------------------- */
    fn load_storage(&mut self) {
        if let Err(e) = self.storage.load() {
            log::warn!("storage: flash read failed ({:?}), using defaults", e);
        }

        self.run_tier = load_active_tier(&mut self.storage).unwrap_or_else(|e| {
            log::info!("storage: no run tier stored ({:?})", e);
            DEFAULT_RUN_TIER
        });
        self.params = load_params(&mut self.storage).unwrap_or_else(|e| {
            log::info!("storage: no parameters stored ({:?}), {:?} defaults", e, self.run_tier);
            GeneralParams::for_tier(self.run_tier)
        });

        match self.maze.restore(&mut self.storage) {
            Ok(slot) => log::info!("storage: maze restored from the {:?} slot", slot),
            Err(e) => {
                log::info!("storage: no maze stored ({:?})", e);
                self.maze.reset();
            },
        }

        self.nav.set_tier(self.run_tier);
        self.nav.set_params(self.params);
        self.cascade.reset(&self.params);
    }

    fn save_maze(&mut self, slot: MazeSlot) {
        let result = match slot {
            MazeSlot::Main => self.maze.save(&mut self.storage, slot),
            MazeSlot::Backup => self.maze.save_backup(&mut self.storage),
        };
        if let Err(e) = result {
            log::warn!("storage: saving the maze failed ({:?})", e);
        }
    }

    /* --------------------------- Commands -------------------------- */
    fn update_param(&mut self, update: mouse_core::resources::ParamUpdate) {
        let result = update.apply(&mut self.params);
        if result.is_ok() {
            self.nav.set_params(self.params);
            self.cascade.update_params(&self.params);
            if let Err(e) = save_params(&mut self.storage, &self.params) {
                log::warn!("storage: saving parameters failed ({:?})", e);
            }
        }
        log::info!("param {} = {}: {:02X?}", update.index, update.value, response(result));
    }

    /// Applies queued parameter updates, returns the last button press.
    fn handle_commands(&mut self) -> Option<Press> {
        let mut press = None;
        while let Ok(command) = COMMAND_CHANNEL.try_receive() {
            match command {
                DriverCommand::UpdateParam(update) => self.update_param(update),
                DriverCommand::Button(button) => press = Some(button),
            }
        }
        return press;
    }

    /* --------------------------- Tick -------------------------- */
    fn tick(&mut self) -> TickOutput {
        let inputs = ControlInputs {
            encoder: drain_encoder_edges(&mut self.encoder),
            ir: SENSORS.get_ir(),
            gyro_rad_s: SENSORS.get_gyro_rate(),
            battery_voltage: SENSORS.get_battery_voltage(),
        };
        let output = control_tick(&mut self.nav, &mut self.wall_sensors, &mut self.cascade, &inputs);
        self.motors.set_duty(output.duty);
        return output;
    }

    /// Common checks of a moving tick. `Some` ends the drive.
    fn check_abort(&mut self, press: Option<Press>) -> Option<Outcome> {
        if press.is_some() {
            log::info!("drive: stopped by the button");
            return Some(Outcome::Stopped);
        }
        if let Some(cause) = self.cascade.emergency() {
            log::warn!("drive: emergency stop ({:?})", cause);
            return Some(Outcome::Failed);
        }
        return None;
    }

    async fn prepare(&mut self, tier: SpeedTier) {
        Timer::after_millis(START_DELAY_MS).await;
        self.nav.set_tier(tier);
        self.nav.set_params(self.params);
        self.nav.reset();
        self.wall_sensors.reset();
        self.cascade.reset(&self.params);
        drain_encoder_edges(&mut self.encoder);
        self.ticker.reset();
    }

    fn finish(&mut self) {
        self.nav.abort();
        self.cascade.set_target_speeds(0.0, 0.0);
        self.motors.stop();
    }

    /* --------------------------- Modes -------------------------- */
    async fn idle(&mut self) -> DriveMode {
        self.motors.stop();
        loop {
            self.ticker.next().await;
            drain_encoder_edges(&mut self.encoder);

            if self.storage.is_dirty() {
                if let Err(e) = self.storage.commit() {
                    log::warn!("storage: commit failed ({:?})", e);
                }
                self.ticker.reset();
            }

            match self.handle_commands() {
                Some(Press::Short) => {
                    return match self.maze.directions_to_goal() {
                        Ok(_) => DriveMode::Run,
                        Err(_) => DriveMode::Search,
                    };
                },
                Some(Press::Long) => {
                    self.run_tier = next_run_tier(self.run_tier);
                    log::info!("drive: run tier {:?}", self.run_tier);
                    if let Err(e) = save_active_tier(&mut self.storage, self.run_tier) {
                        log::warn!("storage: saving the run tier failed ({:?})", e);
                    }
                },
                None => {},
            }
        }
    }

    async fn search(&mut self) -> Outcome {
        log::info!("search: start");
        self.maze.reset();
        self.explorer.reset();
        self.prepare(SEARCH_TIER).await;

        let mut previous: Option<Movement> = None;
        let outcome = loop {
            self.ticker.next().await;
            let press = self.handle_commands();
            let output = self.tick();
            if let Some(outcome) = self.check_abort(press) {
                break outcome;
            }
            if !self.nav.is_idle() {
                continue;
            }
            if self.nav.front_emergency() {
                log::warn!("search: blocked ahead at ({}, {})", self.nav.position().x, self.nav.position().y);
                break Outcome::Failed;
            }

            let movement = match self.explorer.next_movement(&mut self.maze, self.nav.heading(), self.nav.position(), &output.report) {
                Ok(Some(movement)) => movement,
                Ok(None) => break Outcome::Finished,
                Err(e) => {
                    log::warn!("search: {:?}", e);
                    break Outcome::Failed;
                },
            };
            // Search movements chain at the tier's cruise speed.
            if let Err(e) = self.nav.set_movement((movement, 1), previous, Some(Movement::Forward)) {
                log::warn!("search: {:?}", e);
                break Outcome::Failed;
            }
            previous = Some(movement);
        };

        self.finish();
        match outcome {
            Outcome::Finished => self.save_maze(MazeSlot::Main),
            _ => self.save_maze(MazeSlot::Backup),
        }
        return outcome;
    }

    async fn run(&mut self) -> Outcome {
        let plan = match self.maze.directions_to_goal() {
            Ok(directions) => compile_plan(&directions, !self.run_tier.is_search()),
            Err(e) => {
                log::warn!("run: {:?}", e);
                return Outcome::Failed;
            },
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("run: {:?}", e);
                return Outcome::Failed;
            },
        };

        log::info!("run: {} movements at {:?}", plan.len(), self.run_tier);
        self.prepare(self.run_tier).await;

        let mut cursor = PlanCursor::new(&plan);
        let outcome = loop {
            self.ticker.next().await;
            let press = self.handle_commands();
            self.tick();
            if let Some(outcome) = self.check_abort(press) {
                break outcome;
            }

            match advance_plan(&mut self.nav, &mut cursor) {
                Ok(PlanProgress::Running) => {},
                Ok(PlanProgress::Finished) => break Outcome::Finished,
                Ok(PlanProgress::Aborted) => {
                    log::warn!("run: blocked ahead after {} movements", cursor.position());
                    break Outcome::Failed;
                },
                Err(e) => {
                    log::warn!("run: {:?}", e);
                    break Outcome::Failed;
                },
            }
        };

        self.finish();
        return outcome;
    }

    pub async fn run_control_task(&mut self) {
        self.load_storage();
        self.motors.stop();

        loop {
            let mode = self.idle().await;
            let outcome = match mode {
                DriveMode::Search => self.search().await,
                DriveMode::Run => self.run().await,
            };
            log::info!("drive: {:?} ended, {:?}", mode, outcome);
        }
    }
}

#[embassy_executor::task]
pub async fn control_task(mut driver: MouseDriver<'static>) {
    driver.run_control_task().await;
}
