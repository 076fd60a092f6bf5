/*
* Tasks Hub
*/

/* --------------------------- Library -------------------------- */
use embassy_rp::adc::Adc;
use embassy_rp::adc::Async as AdcAsync;
use embassy_rp::adc::Channel as AdcChannel;
use embassy_rp::adc::Config as AdcConfig;
use embassy_rp::gpio::Input;
use embassy_rp::gpio::Level;
use embassy_rp::gpio::Output;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::Async as I2cAsync;
use embassy_rp::i2c::Config as I2cConfig;
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::I2C1;
use embassy_rp::peripherals::PIO0;
use embassy_rp::peripherals::USB;
use embassy_rp::pio_programs::rotary_encoder::Direction as EncoderDirection;
use embassy_rp::pio_programs::rotary_encoder::PioEncoder;
use embassy_rp::usb::Driver;
use embassy_futures::select::select;
use embassy_futures::select::Either;
use embassy_time::Duration;
use embassy_time::Instant;
use embassy_time::Ticker;
use embassy_time::Timer;
use embassy_usb_logger::ReceiverHandler;
use heapless::spsc::Producer;

use mouse_core::resources::EncoderEdge;
use mouse_core::resources::Rotation;
use mouse_core::resources::Wheel;
use mouse_core::resources::ENCODER_QUEUE_SIZE;
use mouse_core::resources::IR_SENSOR_COUNT;
use mouse_core::resources::TIME_SAMPLING_US;
use mouse_core::sensors::IrReadings;

use crate::resources::*;

/* --------------------------- Declare Modules -------------------------- */
pub mod control;
pub mod encoder;
pub mod imu;
pub mod ir_sensors;
pub mod start_button;
pub mod usb_handler;
