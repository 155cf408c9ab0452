#![no_std]
#![no_main]
#![deny(unused_must_use)]

use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Delay, Duration, Timer};
use embedded_graphics::{
    mono_font::{ascii, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::Point,
    text::Text,
    Drawable,
};
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::I2c,
    time::Rate,
    timer::systimer::SystemTimer,
    Async,
};
use gyro_heading::{
    display::debug_line,
    mpu6050::{Axis, GyroRange, Mpu6050},
    Gyro, GyroConfig,
};
use log::{error, info};
use ssd1306::{
    mode::{BasicMode, DisplayConfigAsync},
    prelude::I2CInterface,
    I2CDisplayInterface,
};
use static_cell::StaticCell;

type I2cBus = I2c<'static, Async>;
type I2cDev = I2cDevice<'static, CriticalSectionRawMutex, I2cBus>;

type DisplaySize = ssd1306::size::DisplaySize128x64;
type Display = ssd1306::Ssd1306Async<I2CInterface<I2cDev>, DisplaySize, BasicMode>;

static GYRO: Gyro = Gyro::new();

const GYRO_TICK: Duration = Duration::from_millis(1);
const GYRO_RANGE: GyroRange = GyroRange::D250;

#[embassy_executor::task]
async fn gyro_task(mut imu: Mpu6050<I2cDev>) {
    if let Err(err) = imu.init(&mut Delay).await {
        error!("MPU6050 init ERROR: {err:?}");
        return;
    }

    let config = GyroConfig::raw_integration(Axis::Z)
        .with_tick(GYRO_TICK)
        .with_sensor_scale(GYRO_RANGE.sensor_scale(GYRO_TICK));

    GYRO.run(imu, Delay, config).await
}

#[embassy_executor::task]
async fn ui_task(display: Display) {
    let mut display = display.into_buffered_graphics_mode();
    if let Err(err) = display.init().await {
        error!("Display init ERROR: {err:?}");
        return;
    }

    let font_style = MonoTextStyleBuilder::new()
        .text_color(BinaryColor::On)
        .font(&ascii::FONT_6X9)
        .build();

    loop {
        display.clear_buffer();

        let line = debug_line(&GYRO.snapshot());
        if let Err(err) = Text::new(&line, Point::new(0, 10), font_style).draw(&mut display) {
            error!("Display draw ERROR: {err:?}");
        }
        if let Err(err) = display.flush().await {
            error!("Display flush ERROR: {err:?}");
        }

        Timer::after_millis(20).await;
    }
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let systimer = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(systimer.alarm0);

    let i2c = I2c::new(
        peripherals.I2C0,
        esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to configure I2C0")
    .into_async()
    .with_scl(peripherals.GPIO21)
    .with_sda(peripherals.GPIO20);

    static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2cBus>> = StaticCell::new();
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let imu = Mpu6050::new(I2cDevice::new(i2c_bus)).with_gyro_range(GYRO_RANGE);

    let display = ssd1306::Ssd1306Async::new(
        I2CDisplayInterface::new(I2cDevice::new(i2c_bus)),
        ssd1306::size::DisplaySize128x64,
        ssd1306::rotation::DisplayRotation::Rotate0,
    );

    spawner.must_spawn(gyro_task(imu));
    spawner.must_spawn(ui_task(display));

    // BOOT button forces a recalibration, keep the board still after pressing it
    let mut button = Input::new(peripherals.GPIO9, InputConfig::default().with_pull(Pull::Up));

    loop {
        button.wait_for_falling_edge().await;
        info!("Recalibrating gyro");
        GYRO.reinit();
        Timer::after_millis(200).await;
    }
}
