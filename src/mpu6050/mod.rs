//! Minimal MPU6050 driver exposing one raw gyro axis as a [`RateSensor`].

use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use num_traits::FromPrimitive;

use crate::gyro::RateSensor;

mod bits;
pub mod registers;

pub use registers::{Axis, GyroRange, CLKSEL, DEFAULT_MPU6050_ADDR};
use registers::*;

/// All possible errors of the driver
#[derive(Debug)]
pub enum Error<E> {
    I2c(E),
    InvalidChipId(u8),
    InvalidFieldValue(u8),
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    addr: u8,
    gyro_range: GyroRange,
}

impl<I2C, E> Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Side effect free constructor, nothing is written until [`Mpu6050::init`]
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            addr: DEFAULT_MPU6050_ADDR,
            gyro_range: GyroRange::D250,
        }
    }

    pub fn with_gyro_range(mut self, gyro_range: GyroRange) -> Self {
        self.gyro_range = gyro_range;
        self
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    /// Wakes the chip, checks its identity and applies the gyro range
    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.wake(delay).await?;
        self.verify().await?;
        self.set_gyro_range(self.gyro_range).await
    }

    /// Clears sleep with the X gyro PLL as clock, recommended over the internal oscillator
    async fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.write_byte(PWR_MGMT_1::ADDR, CLKSEL::PllGyroX as u8)
            .await?;
        delay.delay_ms(100).await;
        Ok(())
    }

    async fn verify(&mut self) -> Result<(), Error<E>> {
        let id = self.read_byte(WHOAMI_REG).await?;
        if id != DEFAULT_MPU6050_ADDR {
            return Err(Error::InvalidChipId(id));
        }
        Ok(())
    }

    pub async fn get_clock_source(&mut self) -> Result<CLKSEL, Error<E>> {
        let source = self
            .read_bits(
                PWR_MGMT_1::ADDR,
                PWR_MGMT_1::CLKSEL.bit,
                PWR_MGMT_1::CLKSEL.length,
            )
            .await?;
        CLKSEL::from_u8(source).ok_or(Error::InvalidFieldValue(source))
    }

    /// Set gyro range, rate readings are in LSB of this range from now on
    pub async fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), Error<E>> {
        self.write_bits(
            GYRO_CONFIG::ADDR,
            GYRO_CONFIG::FS_SEL.bit,
            GYRO_CONFIG::FS_SEL.length,
            range as u8,
        )
        .await?;

        self.gyro_range = range;
        Ok(())
    }

    pub async fn get_gyro_range(&mut self) -> Result<GyroRange, Error<E>> {
        let byte = self
            .read_bits(
                GYRO_CONFIG::ADDR,
                GYRO_CONFIG::FS_SEL.bit,
                GYRO_CONFIG::FS_SEL.length,
            )
            .await?;
        GyroRange::from_u8(byte).ok_or(Error::InvalidFieldValue(byte))
    }

    pub async fn set_sleep_enabled(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::SLEEP, enable)
            .await
    }

    pub async fn get_sleep_enabled(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::SLEEP).await? != 0)
    }

    /// Raw signed rate of one axis, in LSB of the current range
    pub async fn read_rate_raw(&mut self, axis: Axis) -> Result<i16, Error<E>> {
        let mut buf = [0; 2];
        self.read_bytes(axis.high_reg(), &mut buf).await?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Writes byte to register
    pub async fn write_byte(&mut self, reg: u8, byte: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &[reg, byte])
            .await
            .map_err(Error::I2c)
    }

    /// Enables bit n at register address reg
    pub async fn write_bit(&mut self, reg: u8, bit_n: u8, enable: bool) -> Result<(), Error<E>> {
        let mut byte = self.read_byte(reg).await?;
        bits::set_bit(&mut byte, bit_n, enable);
        self.write_byte(reg, byte).await
    }

    /// Write bits data at reg from start_bit down to start_bit - length + 1
    pub async fn write_bits(
        &mut self,
        reg: u8,
        start_bit: u8,
        length: u8,
        data: u8,
    ) -> Result<(), Error<E>> {
        let mut byte = self.read_byte(reg).await?;
        bits::set_bits(&mut byte, start_bit, length, data);
        self.write_byte(reg, byte).await
    }

    async fn read_bit(&mut self, reg: u8, bit_n: u8) -> Result<u8, Error<E>> {
        Ok(bits::get_bit(self.read_byte(reg).await?, bit_n))
    }

    pub async fn read_bits(&mut self, reg: u8, start_bit: u8, length: u8) -> Result<u8, Error<E>> {
        Ok(bits::get_bits(self.read_byte(reg).await?, start_bit, length))
    }

    /// Reads byte from register
    pub async fn read_byte(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut byte = [0; 1];
        self.read_bytes(reg, &mut byte).await?;
        Ok(byte[0])
    }

    /// Reads series of bytes into buf from specified reg
    pub async fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c
            .write_read(self.addr, &[reg], buf)
            .await
            .map_err(Error::I2c)
    }
}

impl<I2C, E> RateSensor for Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Channel = Axis;
    type Error = Error<E>;

    async fn set_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.set_sleep_enabled(!enabled).await
    }

    async fn read_raw(&mut self, axis: Axis) -> Result<i32, Self::Error> {
        Ok(self.read_rate_raw(axis).await? as i32)
    }
}
