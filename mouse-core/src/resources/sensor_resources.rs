/*
    Sensor Handoff
        interrupt / sampling tasks -> control tick

    Encoder edges go through a single-producer single-consumer queue, one
    entry per edge. The latest IR, battery and gyro values are plain atomic
    fields with one writer and one reader each; f32 values are stored as bits.
*/

use heapless::spsc::Consumer;
use heapless::spsc::Queue;
use portable_atomic::AtomicBool;
use portable_atomic::AtomicU32;
use portable_atomic::Ordering;

use crate::sensors::IrReadings;

use super::config::ENCODER_QUEUE_SIZE;
use super::config::IR_SENSOR_COUNT;

/* --------------------------- Encoder Edges -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wheel {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderEdge {
    pub wheel: Wheel,
    pub rotation: Rotation,
}

/// Signed edge counts accumulated over one tick. Counter-clockwise edges
/// count forward on both wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderDelta {
    pub left: i32,
    pub right: i32,
}

impl EncoderDelta {
    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    pub fn add(&mut self, edge: EncoderEdge) {
        let step = match edge.rotation {
            Rotation::CounterClockwise => 1,
            Rotation::Clockwise => -1,
        };
        match edge.wheel {
            Wheel::Left => self.left = self.left.saturating_add(step),
            Wheel::Right => self.right = self.right.saturating_add(step),
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

/// Holds `ENCODER_QUEUE_SIZE - 1` edges, close to 3 ms of both wheels at 3.5 m/s.
pub type EncoderQueue = Queue<EncoderEdge, ENCODER_QUEUE_SIZE>;
pub type EncoderConsumer<'a> = Consumer<'a, EncoderEdge, ENCODER_QUEUE_SIZE>;

/// Empties the queue into one delta. Called once per tick.
pub fn drain_encoder_edges(consumer: &mut EncoderConsumer<'_>) -> EncoderDelta {
    let mut delta = EncoderDelta::default();
    while let Some(edge) = consumer.dequeue() {
        delta.add(edge);
    }
    delta
}

/* --------------------------- Sensor Handler -------------------------- */
pub struct SensorHandler {
    ir: [AtomicU32; IR_SENSOR_COUNT],
    ir_valid: AtomicBool,
    battery_voltage: AtomicU32,
    gyro_rate: AtomicU32,
}

impl SensorHandler {
    pub const fn new() -> Self {
        Self {
            ir: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
            ir_valid: AtomicBool::new(false),
            battery_voltage: AtomicU32::new(0),
            gyro_rate: AtomicU32::new(0),
        }
    }

    pub fn set_ir(&self, readings: IrReadings) {
        for (slot, value) in self.ir.iter().zip(readings.0) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
        self.ir_valid.store(true, Ordering::Release);
    }

    /// Marks the latest IR sample as failed.
    pub fn set_ir_failed(&self) {
        self.ir_valid.store(false, Ordering::Release);
    }

    pub fn get_ir(&self) -> Option<IrReadings> {
        if !self.ir_valid.load(Ordering::Acquire) {
            return None;
        }
        let mut readings = IrReadings::default();
        for (value, slot) in readings.0.iter_mut().zip(self.ir.iter()) {
            *value = f32::from_bits(slot.load(Ordering::Relaxed));
        }
        Some(readings)
    }

    pub fn set_battery_voltage(&self, volts: f32) {
        self.battery_voltage.store(volts.to_bits(), Ordering::Relaxed);
    }

    pub fn get_battery_voltage(&self) -> f32 {
        return f32::from_bits(self.battery_voltage.load(Ordering::Relaxed));
    }

    pub fn set_gyro_rate(&self, rad_s: f32) {
        self.gyro_rate.store(rad_s.to_bits(), Ordering::Relaxed);
    }

    pub fn get_gyro_rate(&self) -> f32 {
        return f32::from_bits(self.gyro_rate.load(Ordering::Relaxed));
    }
}

impl Default for SensorHandler {
    fn default() -> Self {
        Self::new()
    }
}
