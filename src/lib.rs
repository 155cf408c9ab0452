#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod display;
pub mod gyro;
pub mod mpu6050;

pub use gyro::{config::GyroConfig, Gyro, Heading, RateSensor, Strategy};
