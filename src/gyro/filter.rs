use embassy_time::Duration;
use log::debug;

use super::calibration::CalibrationResult;

/// Bias removal and jitter rejection for a raw rate signal.
///
/// Samples whose bias-corrected magnitude is within the threshold are noise
/// and never reach the accumulator, so a resting sensor does not random-walk.
/// The fractional part of the bias lost to integer averaging is paid back by
/// subtracting the calibration remainder once every `period` accepted samples.
#[derive(Debug, Clone)]
pub struct JitterGate {
    calibration: CalibrationResult,
    threshold: i32,
    period: u32,
    accepted: u32,
    accumulator: i64,
}

impl JitterGate {
    pub fn new(calibration: CalibrationResult, threshold: i32, period: u32) -> Self {
        Self {
            calibration,
            threshold,
            period,
            accepted: 0,
            accumulator: 0,
        }
    }

    /// Feeds one raw sample, returns the integrated accumulator
    pub fn update(&mut self, raw: i32) -> i64 {
        let delta = raw as i64 - self.calibration.bias as i64;

        if delta.abs() > self.threshold as i64 {
            self.accumulator += delta;

            self.accepted = self.accepted.wrapping_add(1);
            if self.period != 0 && self.accepted % self.period == 0 {
                self.accumulator -= self.calibration.remainder as i64;
            }
        }

        self.accumulator
    }

    pub fn accumulator(&self) -> i64 {
        self.accumulator
    }
}

/// Re-nulls slow drift of a pre-scaled angle while the platform is at rest.
///
/// Once per check window the reading is compared with the one taken at the
/// previous check. A change below the threshold means nothing moved, so the
/// change is drift and its negation is folded into the persistent correction.
#[derive(Debug, Clone)]
pub struct DriftNull {
    threshold: i32,
    window: Duration,
    tick: Duration,
    since_check: Duration,
    last_check: i64,
    drift_error: i64,
}

impl DriftNull {
    pub fn new(threshold: i32, window: Duration, tick: Duration) -> Self {
        Self {
            threshold,
            window,
            tick,
            since_check: Duration::from_ticks(0),
            last_check: 0,
            drift_error: 0,
        }
    }

    /// Feeds one reading, returns it with the accumulated drift removed
    pub fn update(&mut self, value: i32) -> i64 {
        let value = value as i64;

        if self.since_check > self.window {
            let residual = value - self.last_check;
            if residual.abs() < self.threshold as i64 {
                self.drift_error -= residual;
                debug!("Gyro drift nulled: residual={residual} drift={}", self.drift_error);
            }

            self.last_check = value;
            self.since_check = Duration::from_ticks(0);
        }

        self.since_check += self.tick;

        value + self.drift_error
    }

    pub fn drift_error(&self) -> i64 {
        self.drift_error
    }
}
