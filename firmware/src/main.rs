//! Main
// Micromouse firmware, RP2040
// Control tick 1 kHz on SWI_IRQ_1, sampling and USB on the thread executor

#![no_std]
#![no_main]

// Mod
mod tasks;
mod resources;

// Resources
use crate::resources::Irqs;
use crate::resources::AssignedResources;
use crate::resources::EncoderResources;
use crate::resources::MotorResources;
use crate::resources::IrResources;
use crate::resources::BatteryResources;
use crate::resources::ImuResources;
use crate::resources::ButtonResources;
use crate::resources::StorageResources;
use crate::resources::UsbResources;
use crate::resources::Motors;
use crate::resources::FlashEeprom;
use crate::resources::StorageFlash;
use crate::resources::ENCODER_QUEUE;
use crate::resources::EXECUTOR_HIGH;

// Tasks
use crate::tasks::control::MouseDriver;
use crate::tasks::control::control_task;
use crate::tasks::encoder::Encoders;
use crate::tasks::encoder::encoder_task;
use crate::tasks::imu::Gyro;
use crate::tasks::imu::imu_task;
use crate::tasks::ir_sensors::SensorSampler;
use crate::tasks::ir_sensors::sensor_task;
use crate::tasks::start_button::button_task;
use crate::tasks::usb_handler::usb_logger_task;

// Library
use defmt_rtt as _;
use panic_probe as _;

use mouse_core::resources::EncoderQueue;

use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::interrupt::Priority;
use embassy_rp::usb::Driver;
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::rotary_encoder::PioEncoder;
use embassy_rp::pio_programs::rotary_encoder::PioEncoderProgram;
use embassy_executor::Spawner;

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let ph = embassy_rp::init(Default::default());
    let p = split_resources!(ph);

    let usb_driver = Driver::new(p.usb_resources.USB, Irqs);

    let queue = ENCODER_QUEUE.init(EncoderQueue::new());
    let (producer, consumer) = queue.split();

    let Pio {
        mut common, sm0, sm1, ..
    } = Pio::new(p.encoder_resources.PIO, Irqs);

    let enc_prg = PioEncoderProgram::new(&mut common);
    let encoders = Encoders::new(
                    PioEncoder::new(
                        &mut common,
                        sm0,
                        p.encoder_resources.LEFT_PIN_A,
                        p.encoder_resources.LEFT_PIN_B,
                        &enc_prg,
                    ),
                    PioEncoder::new(
                        &mut common,
                        sm1,
                        p.encoder_resources.RIGHT_PIN_A,
                        p.encoder_resources.RIGHT_PIN_B,
                        &enc_prg,
                    ),
                    producer,
                );

    let motors = Motors::new(p.motor_resources);
    let storage = FlashEeprom::new(StorageFlash::new_blocking(p.storage_resources.FLASH));
    let driver = MouseDriver::new(consumer, motors, storage);

    spawner.must_spawn(usb_logger_task(usb_driver));
    spawner.must_spawn(encoder_task(encoders));
    spawner.must_spawn(sensor_task(SensorSampler::new(p.ir_resources, p.battery_resources)));
    spawner.must_spawn(imu_task(Gyro::new(p.imu_resources)));
    spawner.must_spawn(button_task(p.button_resources));

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.must_spawn(control_task(driver));
}
