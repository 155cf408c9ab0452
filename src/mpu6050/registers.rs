#![allow(non_camel_case_types)]

use embassy_time::Duration;
use micromath::F32Ext;
use num_derive::FromPrimitive;

pub const DEFAULT_MPU6050_ADDR: u8 = 0x68;

pub const WHOAMI_REG: u8 = 0x75;

/// High byte of the X rate, Y and Z follow two bytes apart
pub const GYRO_REGX_H: u8 = 0x43;

/// Field position in a register: most significant bit and length
pub struct BitBlock {
    pub bit: u8,
    pub length: u8,
}

pub struct PWR_MGMT_1;

impl PWR_MGMT_1 {
    pub const ADDR: u8 = 0x6B;
    pub const SLEEP: u8 = 6;
    pub const CLKSEL: BitBlock = BitBlock { bit: 2, length: 3 };
}

pub struct GYRO_CONFIG;

impl GYRO_CONFIG {
    pub const ADDR: u8 = 0x1B;
    pub const FS_SEL: BitBlock = BitBlock { bit: 4, length: 2 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum CLKSEL {
    Internal8MHz = 0,
    PllGyroX = 1,
    PllGyroY = 2,
    PllGyroZ = 3,
    External32kHz = 4,
    External19MHz = 5,
    Stopped = 7,
}

/// Full scale of the rate output
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum GyroRange {
    #[default]
    D250 = 0,
    D500 = 1,
    D1000 = 2,
    D2000 = 3,
}

impl GyroRange {
    /// LSB per deg/s
    pub fn sensitivity(&self) -> f32 {
        match self {
            GyroRange::D250 => 131.0,
            GyroRange::D500 => 65.5,
            GyroRange::D1000 => 32.8,
            GyroRange::D2000 => 16.4,
        }
    }

    /// Raw units that integrate to one tenth of a degree when a sample is
    /// accumulated every `tick`
    pub fn sensor_scale(&self, tick: Duration) -> i32 {
        let tick_s = tick.as_micros() as f32 / 1e6;
        F32Ext::round(self.sensitivity() / (10.0 * tick_s)) as i32
    }
}

/// Rate axis, the channel an estimator reads
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    /// Yaw when the board lies flat
    #[default]
    Z,
}

impl Axis {
    pub fn high_reg(&self) -> u8 {
        GYRO_REGX_H + 2 * (*self as u8)
    }
}
