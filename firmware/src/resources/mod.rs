/*
* Resources Hub
*/

/* --------------------------- Library -------------------------- */
use assign_resources::assign_resources;
use static_cell::StaticCell;

use embassy_rp::bind_interrupts;
use embassy_rp::peripherals;
use embassy_rp::adc::InterruptHandler as AdcInterruptHandler;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::usb::InterruptHandler as UsbInterruptHandler;
use embassy_rp::flash::Flash;
use embassy_rp::flash::Blocking;
use embassy_rp::pwm::Pwm;
use embassy_rp::pwm::Config as PwmConfig;
use embassy_sync::channel::Channel;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_executor::InterruptExecutor;

use mouse_core::resources::Eeprom;
use mouse_core::resources::StorageError;
use mouse_core::resources::EncoderQueue;
use mouse_core::resources::ParamUpdate;
use mouse_core::resources::SensorHandler;
use mouse_core::resources::EEPROM_SIZE;
use mouse_core::resources::PWM_PERIOD_TICKS;
use mouse_core::control::MotorDuty;

/* --------------------------- Declare Modules -------------------------- */
pub mod gpio_list;
pub mod config;
pub mod global_resources;
pub mod flash_storage;
pub mod motor_resources;

pub use gpio_list::*;
pub use config::*;
pub use global_resources::*;
pub use flash_storage::*;
pub use motor_resources::*;
