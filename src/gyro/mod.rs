//! Single-axis heading estimation from a rate gyro.
//!
//! The estimator task calibrates the sensor bias, then once per tick filters
//! the raw reading, converts it to a wrapped heading, unwraps that into an
//! absolute angle and publishes all three as one [`Heading`] snapshot.

use core::fmt::Debug;

use embassy_futures::select::select;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

pub mod calibration;
pub mod config;
pub mod filter;
pub mod integrator;
pub mod state;

use calibration::{BiasCalibrator, CalibrationResult};
use config::GyroConfig;
pub use config::Strategy;
use filter::{DriftNull, JitterGate};
use integrator::{clip_full_scale, heading_from_tenths, scale_accumulator, AngleIntegrator};
pub use state::{Heading, SharedHeading};

/// PI, f32
pub const PI: f32 = core::f32::consts::PI;

/// PI / 180, for conversion to radians
pub const PI_180: f32 = PI / 180.0;

/// Source of raw single-axis readings
pub trait RateSensor {
    /// Input the estimator is bound to, e.g. an ADC pin or a gyro axis
    type Channel: Copy + Debug;
    type Error: Debug;

    /// Power the sensor down or up. Called around the quiescence delay so
    /// the sensor settles before calibration.
    #[allow(async_fn_in_trait)]
    async fn set_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Latest signed reading of the channel, in sensor native units
    #[allow(async_fn_in_trait)]
    async fn read_raw(&mut self, channel: Self::Channel) -> Result<i32, Self::Error>;
}

enum Filter {
    Jitter(JitterGate),
    Drift(DriftNull),
}

/// Per-tick pipeline: filter, scale, wrap and unwrap
pub struct Estimator {
    filter: Filter,
    integrator: AngleIntegrator,
    sensor_scale: i32,
    full_scale: i32,
}

impl Estimator {
    pub fn new<C>(config: &GyroConfig<C>, calibration: CalibrationResult) -> Self {
        let filter = match config.strategy {
            Strategy::RawIntegration => Filter::Jitter(JitterGate::new(
                calibration,
                config.jitter_threshold,
                config.calibration_window_ticks,
            )),
            Strategy::PreScaled => Filter::Drift(DriftNull::new(
                config.stationary_threshold,
                config.drift_check_window,
                config.tick,
            )),
        };

        Self {
            filter,
            integrator: AngleIntegrator::new(),
            sensor_scale: config.sensor_scale,
            full_scale: config.full_scale_tenths,
        }
    }

    /// Angle in tenths of a degree after filtering `raw`
    fn filtered_tenths(&mut self, raw: i32) -> i64 {
        match &mut self.filter {
            Filter::Jitter(gate) => {
                let tenths = scale_accumulator(gate.update(raw), self.sensor_scale);
                clip_full_scale(tenths, self.full_scale)
            }
            Filter::Drift(drift) => drift.update(raw),
        }
    }

    pub fn step(&mut self, raw: i32) -> Heading {
        let degrees = heading_from_tenths(self.filtered_tenths(raw));
        let absolute_degrees = self.integrator.update(degrees);

        Heading {
            valid: true,
            degrees,
            absolute_degrees,
        }
    }
}

async fn sleep<D: DelayNs>(delay: &mut D, duration: Duration) {
    delay
        .delay_us(duration.as_micros().min(u32::MAX as u64) as u32)
        .await;
}

/// Handle to the estimator shared between the task running it and its readers.
///
/// Intended to live in a `static`. One task calls [`Gyro::run`], any other
/// code reads through the accessors or requests recalibration via
/// [`Gyro::reinit`].
pub struct Gyro {
    heading: SharedHeading,
    reinit: Signal<CriticalSectionRawMutex, ()>,
}

impl Gyro {
    pub const fn new() -> Self {
        Self {
            heading: SharedHeading::new(),
            reinit: Signal::new(),
        }
    }

    /// All published values of the same tick
    pub fn snapshot(&self) -> Heading {
        self.heading.get()
    }

    /// Heading in [0, 360)
    pub fn heading_degrees(&self) -> f32 {
        self.snapshot().degrees
    }

    /// Heading in [0, 2PI)
    pub fn heading_radians(&self) -> f32 {
        self.snapshot().radians()
    }

    /// Cumulative rotation since the last calibration, both signs, unbounded
    pub fn absolute_degrees(&self) -> f32 {
        self.snapshot().absolute_degrees
    }

    pub fn is_valid(&self) -> bool {
        self.snapshot().valid
    }

    /// Invalidates the published heading and makes the running task abandon
    /// whatever it is doing and calibrate again with the same sensor.
    pub fn reinit(&self) {
        self.heading.reset();
        self.reinit.signal(());
    }

    /// Estimator task body. Binds `sensor` on `config.channel` and never returns.
    ///
    /// Calling this a second time concurrently on the same handle is not supported.
    pub async fn run<S, D>(&self, mut sensor: S, mut delay: D, config: GyroConfig<S::Channel>) -> !
    where
        S: RateSensor,
        D: DelayNs,
    {
        loop {
            self.heading.reset();
            self.reinit.reset();

            info!("Gyro starting on channel {:?}", config.channel);

            // Reinit request is polled first so a pending one wins over the next tick
            select(
                self.reinit.wait(),
                self.estimate(&mut sensor, &mut delay, &config),
            )
            .await;

            info!("Gyro reinit requested");
        }
    }

    async fn estimate<S, D>(
        &self,
        sensor: &mut S,
        delay: &mut D,
        config: &GyroConfig<S::Channel>,
    ) -> !
    where
        S: RateSensor,
        D: DelayNs,
    {
        let calibration = calibrate(sensor, delay, config).await;
        let mut estimator = Estimator::new(config, calibration);

        loop {
            match sensor.read_raw(config.channel).await {
                Ok(raw) => self.heading.publish(estimator.step(raw)),
                Err(err) => warn!("Gyro read ERROR: {err:?}"),
            }

            sleep(delay, config.tick).await;
        }
    }
}

impl Default for Gyro {
    fn default() -> Self {
        Self::new()
    }
}

/// Power cycles the sensor, waits for it to settle and averages the bias.
///
/// Failed reads are retried on the next calibration tick, so the bias is
/// always the mean of a full window.
async fn calibrate<S, D>(
    sensor: &mut S,
    delay: &mut D,
    config: &GyroConfig<S::Channel>,
) -> CalibrationResult
where
    S: RateSensor,
    D: DelayNs,
{
    if let Err(err) = sensor.set_enabled(false).await {
        warn!("Gyro disable ERROR: {err:?}");
    }
    sleep(delay, config.quiescence_delay).await;

    if let Err(err) = sensor.set_enabled(true).await {
        warn!("Gyro enable ERROR: {err:?}");
    }
    sleep(delay, config.quiescence_delay).await;

    let window = match config.strategy {
        Strategy::RawIntegration => config.calibration_window_ticks,
        // Sensor zeroes itself when enabled
        Strategy::PreScaled => 0,
    };

    let mut calibrator = BiasCalibrator::new(window);
    while !calibrator.is_complete() {
        match sensor.read_raw(config.channel).await {
            Ok(raw) => {
                calibrator.add(raw);
            }
            Err(err) => warn!("Gyro calibration read ERROR: {err:?}"),
        }

        sleep(delay, config.calibration_tick).await;
    }

    let result = calibrator.result();
    info!(
        "Gyro calibrated over {} samples: bias={} remainder={}",
        calibrator.window(),
        result.bias,
        result.remainder
    );

    result
}
