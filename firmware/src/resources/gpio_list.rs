/*
    Resource Allocation Module

    Motors      PWM slice 0 (left), slice 1 (right), slice 2 A (fan)
    Encoders    PIO0 state machines 0 (left) and 1 (right)
    IR          4 emitters, 4:1 analog mux on ADC0
    Battery     divider on ADC1
    Gyro        I2C1
*/

use super::*;

assign_resources! {
    motor_resources: MotorResources {
        LEFT_SLICE: PWM_SLICE0,
        LEFT_PWM_FWD_PIN: PIN_16,
        LEFT_PWM_REV_PIN: PIN_17,
        RIGHT_SLICE: PWM_SLICE1,
        RIGHT_PWM_FWD_PIN: PIN_18,
        RIGHT_PWM_REV_PIN: PIN_19,
        FAN_SLICE: PWM_SLICE2,
        FAN_PWM_PIN: PIN_4,
    },

    encoder_resources: EncoderResources {
        PIO: PIO0,
        LEFT_PIN_A: PIN_6,
        LEFT_PIN_B: PIN_7,
        RIGHT_PIN_A: PIN_8,
        RIGHT_PIN_B: PIN_9,
    },

    ir_resources: IrResources {
        EMITTER_LEFT_PIN: PIN_10,
        EMITTER_FRONT_LEFT_PIN: PIN_11,
        EMITTER_FRONT_RIGHT_PIN: PIN_12,
        EMITTER_RIGHT_PIN: PIN_13,
        MUX_SEL_0_PIN: PIN_20,
        MUX_SEL_1_PIN: PIN_21,
        RECEIVER_PIN: PIN_26,
    },

    battery_resources: BatteryResources {
        ADC: ADC,
        BATTERY_PIN: PIN_27,
    },

    imu_resources: ImuResources {
        I2C: I2C1,
        SDA_PIN: PIN_14,
        SCL_PIN: PIN_15,
    },

    button_resources: ButtonResources {
        START_PIN: PIN_22,
    },

    storage_resources: StorageResources {
        FLASH: FLASH,
    },

    usb_resources: UsbResources {
        USB: USB,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<peripherals::PIO0>;
    USBCTRL_IRQ => UsbInterruptHandler<peripherals::USB>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
    I2C1_IRQ => I2cInterruptHandler<peripherals::I2C1>;
});
