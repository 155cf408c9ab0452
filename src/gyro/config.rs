use embassy_time::Duration;

/// How raw sensor readings are turned into an angle
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Reading is an angular rate. Bias is averaged at startup, small deltas
    /// are rejected as jitter and the rest is integrated here.
    #[default]
    RawIntegration,
    /// Reading is an angle already integrated by the sensor, in tenths of a
    /// degree. Slow drift is nulled while the platform is at rest.
    PreScaled,
}

/// Estimator tuning. `C` is the sensor channel the estimator is bound to.
#[derive(Debug, Clone, Copy)]
pub struct GyroConfig<C> {
    pub channel: C,
    pub strategy: Strategy,
    /// Number of stationary samples averaged into the bias
    pub calibration_window_ticks: u32,
    /// Settle time after the sensor is switched off and again after it is switched on
    pub quiescence_delay: Duration,
    /// Sleep between calibration samples
    pub calibration_tick: Duration,
    /// Sleep between running ticks
    pub tick: Duration,
    /// Bias-corrected samples with magnitude up to this are dropped
    pub jitter_threshold: i32,
    /// Max change over one drift check window still considered at rest
    pub stationary_threshold: i32,
    pub drift_check_window: Duration,
    /// Raw accumulator units per tenth of a degree
    pub sensor_scale: i32,
    /// Clip bound for the scaled angle, tenths of a degree
    pub full_scale_tenths: i32,
}

impl<C> GyroConfig<C> {
    /// Rate sensor sampled every millisecond, 1024 sample bias window
    pub fn raw_integration(channel: C) -> Self {
        Self {
            channel,
            strategy: Strategy::RawIntegration,
            calibration_window_ticks: 1024,
            quiescence_delay: Duration::from_millis(500),
            calibration_tick: Duration::from_millis(1),
            tick: Duration::from_millis(1),
            jitter_threshold: 4,
            stationary_threshold: 3,
            drift_check_window: Duration::from_millis(250),
            sensor_scale: 130,
            full_scale_tenths: 3600,
        }
    }

    /// Sensor that reports its own integrated angle, polled every 20ms
    pub fn pre_scaled(channel: C) -> Self {
        Self {
            strategy: Strategy::PreScaled,
            calibration_window_ticks: 0,
            tick: Duration::from_millis(20),
            ..Self::raw_integration(channel)
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_calibration_window(mut self, ticks: u32) -> Self {
        self.calibration_window_ticks = ticks;
        self
    }

    pub fn with_quiescence_delay(mut self, delay: Duration) -> Self {
        self.quiescence_delay = delay;
        self
    }

    pub fn with_calibration_tick(mut self, tick: Duration) -> Self {
        self.calibration_tick = tick;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_jitter_threshold(mut self, threshold: i32) -> Self {
        self.jitter_threshold = threshold;
        self
    }

    pub fn with_stationary_threshold(mut self, threshold: i32) -> Self {
        self.stationary_threshold = threshold;
        self
    }

    pub fn with_drift_check_window(mut self, window: Duration) -> Self {
        self.drift_check_window = window;
        self
    }

    pub fn with_sensor_scale(mut self, scale: i32) -> Self {
        self.sensor_scale = scale;
        self
    }

    pub fn with_full_scale(mut self, tenths: i32) -> Self {
        self.full_scale_tenths = tenths;
        self
    }
}

impl<C: Default> Default for GyroConfig<C> {
    fn default() -> Self {
        Self::raw_integration(C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_scaled_keeps_shared_tuning() {
        let config = GyroConfig::pre_scaled(());

        assert_eq!(config.strategy, Strategy::PreScaled);
        assert_eq!(config.tick, Duration::from_millis(20));
        assert_eq!(config.calibration_window_ticks, 0);
        assert_eq!(config.stationary_threshold, 3);
        assert_eq!(config.drift_check_window, Duration::from_millis(250));
    }

    #[test]
    fn builders_override_defaults() {
        let config = GyroConfig::<u8>::default()
            .with_strategy(Strategy::PreScaled)
            .with_calibration_tick(Duration::from_millis(2))
            .with_jitter_threshold(0)
            .with_full_scale(1800)
            .with_calibration_window(16);

        assert_eq!(config.channel, 0);
        assert_eq!(config.strategy, Strategy::PreScaled);
        assert_eq!(config.calibration_tick, Duration::from_millis(2));
        // Untouched by the strategy switch
        assert_eq!(config.tick, Duration::from_millis(1));
        assert_eq!(config.jitter_threshold, 0);
        assert_eq!(config.full_scale_tenths, 1800);
        assert_eq!(config.calibration_window_ticks, 16);
    }
}
