/*
    Gyro Task

    Polls the yaw rate at 1 kHz. Positive is counter-clockwise seen from above.
    A failed read keeps the previous rate.
*/

use super::*;

pub struct Gyro<'d> {
    i2c: I2c<'d, I2C1, I2cAsync>,
    errors: u32,
}

impl<'d> Gyro<'d> {
    pub fn new(resources: ImuResources) -> Self {
        let mut config = I2cConfig::default();
        config.frequency = 400_000;
        Self {
            i2c: I2c::new_async(resources.I2C, resources.SCL_PIN, resources.SDA_PIN, Irqs, config),
            errors: 0,
        }
    }

    async fn configure(&mut self) -> Result<(), embassy_rp::i2c::Error> {
        let mut who_am_i = [0u8; 1];
        self.i2c.write_read_async(IMU_ADDRESS, [IMU_WHO_AM_I_REG], &mut who_am_i).await?;
        log::info!("imu: WHO_AM_I = {:#04x}", who_am_i[0]);

        self.i2c.write_async(IMU_ADDRESS, [IMU_CTRL2_G_REG, IMU_CTRL2_G_VALUE]).await
    }

    async fn read_yaw_rate(&mut self) -> Result<f32, embassy_rp::i2c::Error> {
        let mut raw = [0u8; 2];
        self.i2c.write_read_async(IMU_ADDRESS, [IMU_OUTZ_L_G_REG], &mut raw).await?;
        return Ok(i16::from_le_bytes(raw) as f32 * IMU_GYRO_RAD_S_PER_LSB);
    }

    pub async fn run_imu_task(&mut self) {
        while let Err(e) = self.configure().await {
            log::warn!("imu: configuration failed ({:?}), retrying", e);
            Timer::after_millis(500).await;
        }

        let mut ticker = Ticker::every(Duration::from_micros(IMU_SAMPLE_PERIOD_US));
        loop {
            match self.read_yaw_rate().await {
                Ok(rate) => SENSORS.set_gyro_rate(rate),
                Err(e) => {
                    self.errors = self.errors.wrapping_add(1);
                    if self.errors % IMU_ERROR_LOG_EVERY == 1 {
                        log::warn!("imu: read failed ({:?}), {} errors", e, self.errors);
                    }
                }
            }
            ticker.next().await;
        }
    }
}

#[embassy_executor::task]
pub async fn imu_task(mut gyro: Gyro<'static>) {
    gyro.run_imu_task().await;
}
