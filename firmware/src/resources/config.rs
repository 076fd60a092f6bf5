/*
*  Default Firmware Config
*
*  Board
*  - RP2040, 2 MiB flash, last sector holds the emulated EEPROM
*  - Battery 3S LiPo through a 100k / 22k divider
*  - Gyro on I2C1, +-2000 dps full scale
*/

use super::*;

use mouse_core::resources::SpeedTier;

/* --------------------------- Flash Storage -------------------------- */
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const STORAGE_OFFSET: u32 = (FLASH_SIZE - EEPROM_SIZE) as u32; // 0x1F_F000

/* --------------------------- ADC -------------------------- */
pub const ADC_REF_VOLTAGE: f32 = 3.3;
pub const ADC_MAX_COUNT: f32 = 4095.0;
pub const BATTERY_DIVIDER_RATIO: f32 = (100.0 + 22.0) / 22.0;
pub const IR_SETTLE_US: u64 = 20; // Receiver rise time after the emitter turns on
pub const IR_SAMPLE_PERIOD_US: u64 = 1000;
pub const BATTERY_SAMPLE_PERIOD_MS: u64 = 50;

/* --------------------------- Gyro -------------------------- */
pub const IMU_ADDRESS: u16 = 0x6B;
pub const IMU_WHO_AM_I_REG: u8 = 0x0F;
pub const IMU_CTRL2_G_REG: u8 = 0x11;
pub const IMU_CTRL2_G_VALUE: u8 = 0x8C; // 1.66 kHz, 2000 dps
pub const IMU_OUTZ_L_G_REG: u8 = 0x26;
pub const IMU_GYRO_RAD_S_PER_LSB: f32 = 0.070 * core::f32::consts::PI / 180.0;
pub const IMU_SAMPLE_PERIOD_US: u64 = 1000;
pub const IMU_ERROR_LOG_EVERY: u32 = 1000;

/* --------------------------- Driver Loop -------------------------- */
pub const SEARCH_TIER: SpeedTier = SpeedTier::SearchMedium;
pub const DEFAULT_RUN_TIER: SpeedTier = SpeedTier::Slow;
pub const BUTTON_DEBOUNCE_MS: u64 = 50;
pub const BUTTON_LONG_PRESS_MS: u64 = 1000;
pub const START_DELAY_MS: u64 = 1000; // Hand clear of the robot before it moves

/* --------------------------- Communication Channels -------------------------- */
pub const COMMAND_CHANNEL_SIZE: usize = 8;

/* --------------------------- Static Storage -------------------------- */
pub static ENCODER_QUEUE: StaticCell<EncoderQueue> = StaticCell::new();

/* --------------------------- Executor -------------------------- */
pub static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
