/*
    IR and Battery Sampling Task

    Per sensor: select the mux input, read ambient, pulse the emitter, read
    again. The wall signal is the difference. The battery shares the ADC and
    is read every BATTERY_SAMPLE_PERIOD_MS.
*/

use super::*;

pub struct SensorSampler<'d> {
    adc: Adc<'d, AdcAsync>,
    receiver: AdcChannel<'d>,
    battery: AdcChannel<'d>,
    emitters: [Output<'d>; IR_SENSOR_COUNT],
    mux_select: [Output<'d>; 2],
    failures: u32,
}

impl<'d> SensorSampler<'d> {
    pub fn new(ir: IrResources, battery: BatteryResources) -> Self {
        Self {
            adc: Adc::new(battery.ADC, Irqs, AdcConfig::default()),
            receiver: AdcChannel::new_pin(ir.RECEIVER_PIN, Pull::None),
            battery: AdcChannel::new_pin(battery.BATTERY_PIN, Pull::None),
            emitters: [
                Output::new(ir.EMITTER_LEFT_PIN, Level::Low),
                Output::new(ir.EMITTER_FRONT_LEFT_PIN, Level::Low),
                Output::new(ir.EMITTER_FRONT_RIGHT_PIN, Level::Low),
                Output::new(ir.EMITTER_RIGHT_PIN, Level::Low),
            ],
            mux_select: [Output::new(ir.MUX_SEL_0_PIN, Level::Low), Output::new(ir.MUX_SEL_1_PIN, Level::Low)],
            failures: 0,
        }
    }

    fn select_input(&mut self, index: usize) {
        for (bit, pin) in self.mux_select.iter_mut().enumerate() {
            pin.set_level(Level::from(index & (1 << bit) != 0));
        }
    }

    async fn sample_one(&mut self, index: usize) -> Result<f32, embassy_rp::adc::Error> {
        self.select_input(index);
        Timer::after_micros(IR_SETTLE_US).await;
        let ambient = self.adc.read(&mut self.receiver).await?;

        self.emitters[index].set_high();
        Timer::after_micros(IR_SETTLE_US).await;
        let lit = self.adc.read(&mut self.receiver).await;
        self.emitters[index].set_low();

        Ok(lit?.saturating_sub(ambient) as f32)
    }

    async fn sample_ir(&mut self) -> Result<IrReadings, embassy_rp::adc::Error> {
        let mut readings = IrReadings::default();
        for index in 0..IR_SENSOR_COUNT {
            readings.0[index] = self.sample_one(index).await?;
        }
        Ok(readings)
    }

    async fn sample_battery(&mut self) -> Result<f32, embassy_rp::adc::Error> {
        let raw = self.adc.read(&mut self.battery).await?;
        return Ok(raw as f32 / ADC_MAX_COUNT * ADC_REF_VOLTAGE * BATTERY_DIVIDER_RATIO);
    }

    pub async fn run_sensor_task(&mut self) {
        let mut ticker = Ticker::every(Duration::from_micros(IR_SAMPLE_PERIOD_US));
        let mut last_battery = Instant::now();
        let battery_period = Duration::from_millis(BATTERY_SAMPLE_PERIOD_MS);

        loop {
            match self.sample_ir().await {
                Ok(readings) => SENSORS.set_ir(readings),
                Err(e) => {
                    // The control tick keeps the last good filtered values.
                    SENSORS.set_ir_failed();
                    self.failures = self.failures.wrapping_add(1);
                    if self.failures % 1000 == 1 {
                        log::warn!("ir: adc read failed ({:?}), {} failures", e, self.failures);
                    }
                }
            }

            if last_battery.elapsed() >= battery_period {
                last_battery = Instant::now();
                match self.sample_battery().await {
                    Ok(volts) => SENSORS.set_battery_voltage(volts),
                    Err(e) => log::warn!("battery: adc read failed ({:?})", e),
                }
            }

            ticker.next().await;
        }
    }
}

#[embassy_executor::task]
pub async fn sensor_task(mut sampler: SensorSampler<'static>) {
    sampler.run_sensor_task().await;
}
