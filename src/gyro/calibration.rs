/// Zero-rate offset of a stationary sensor
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationResult {
    /// floor(sum / N)
    pub bias: i32,
    /// sum - bias * N, always in [0, N)
    pub remainder: i32,
}

/// Averages a fixed window of raw samples into a [`CalibrationResult`].
///
/// The sensor must be motionless for the whole window. Nothing checks this:
/// a sensor rotated during calibration yields a wrong bias and the heading
/// drifts at the corresponding rate until the next calibration.
#[derive(Debug, Clone)]
pub struct BiasCalibrator {
    window: u32,
    sum: i64,
    count: u32,
}

impl BiasCalibrator {
    pub fn new(window: u32) -> Self {
        Self {
            window,
            sum: 0,
            count: 0,
        }
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.window
    }

    /// Adds one sample, returns the result once the window is full
    pub fn add(&mut self, raw: i32) -> Option<CalibrationResult> {
        if !self.is_complete() {
            self.sum += raw as i64;
            self.count += 1;
        }

        self.is_complete().then(|| self.result())
    }

    /// Result over the samples seen so far. An empty window means no bias.
    pub fn result(&self) -> CalibrationResult {
        if self.count == 0 {
            return CalibrationResult::default();
        }

        let n = self.count as i64;
        let bias = self.sum.div_euclid(n);

        CalibrationResult {
            bias: bias as i32,
            remainder: (self.sum - bias * n) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrate(window: u32, samples: impl IntoIterator<Item = i32>) -> CalibrationResult {
        let mut calibrator = BiasCalibrator::new(window);
        samples
            .into_iter()
            .find_map(|raw| calibrator.add(raw))
            .expect("window not filled")
    }

    #[test]
    fn flat_samples_give_exact_bias() {
        let result = calibrate(1024, core::iter::repeat(1850));
        assert_eq!(
            result,
            CalibrationResult {
                bias: 1850,
                remainder: 0
            }
        );
    }

    #[test]
    fn remainder_keeps_truncated_part() {
        // 7 * 100 + 1 + 2 + 3 = 706, 706 / 10 = 70 rem 6
        let samples = [100, 101, 102, 103, 0, 0, 0, 100, 100, 100];
        let result = calibrate(10, samples);

        let sum: i32 = samples.iter().sum();
        assert_eq!(result.bias, sum / 10);
        assert_eq!(result.remainder, sum - result.bias * 10);
        assert_eq!(result.remainder, 6);
    }

    #[test]
    fn negative_sum_floors() {
        // -7 / 4 floors to -2, remainder 1
        let result = calibrate(4, [-2, -2, -2, -1]);
        assert_eq!(result.bias, -2);
        assert_eq!(result.remainder, 1);
    }

    #[test]
    fn completes_exactly_at_window() {
        let mut calibrator = BiasCalibrator::new(3);
        assert_eq!(calibrator.add(5), None);
        assert_eq!(calibrator.add(5), None);
        assert!(calibrator.add(5).is_some());
        assert!(calibrator.is_complete());

        // Samples past the window are ignored
        calibrator.add(1000);
        assert_eq!(calibrator.result().bias, 5);
    }

    #[test]
    fn empty_window_is_zero_bias() {
        let calibrator = BiasCalibrator::new(0);
        assert!(calibrator.is_complete());
        assert_eq!(calibrator.result(), CalibrationResult::default());
    }
}
