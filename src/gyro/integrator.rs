/// One full turn in tenths of a degree
pub const TENTHS_PER_TURN: i64 = 3600;

/// Converts an integrated raw accumulator into tenths of a degree.
/// Truncates toward zero.
pub fn scale_accumulator(accumulator: i64, sensor_scale: i32) -> i64 {
    accumulator / sensor_scale.max(1) as i64
}

/// Reduces an angle whose magnitude reached `full_scale` by whole multiples of
/// it, using truncating division.
///
/// For negative input this keeps the sign of the input (-3700 -> -100 for a
/// 3600 bound) rather than mapping into [0, full_scale) like a floored modulo.
pub fn clip_full_scale(tenths: i64, full_scale: i32) -> i64 {
    let full_scale = full_scale as i64;
    if full_scale <= 0 || tenths.abs() < full_scale {
        return tenths;
    }

    tenths - (tenths / full_scale) * full_scale
}

/// Heading in [0, 360) degrees for an angle in tenths of a degree
pub fn heading_from_tenths(tenths: i64) -> f32 {
    let mut tenths = tenths % TENTHS_PER_TURN;
    if tenths < 0 {
        tenths += TENTHS_PER_TURN;
    }

    tenths as f32 / 10.0
}

/// Signed change between two headings along the shorter way around the circle
pub fn shortest_delta(previous: f32, current: f32) -> f32 {
    let mut delta = current - previous;

    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }

    delta
}

/// Accumulates successive headings into a continuous absolute angle
#[derive(Default, Debug, Clone)]
pub struct AngleIntegrator {
    previous: f32,
    absolute: f32,
}

impl AngleIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the heading of the current tick, returns the absolute angle
    pub fn update(&mut self, heading: f32) -> f32 {
        self.absolute += shortest_delta(self.previous, heading);
        self.previous = heading;
        self.absolute
    }

    pub fn absolute(&self) -> f32 {
        self.absolute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn crossing_zero_forward() {
        assert!(approx(shortest_delta(359.0, 1.0), 2.0));
    }

    #[test]
    fn crossing_zero_backward() {
        assert!(approx(shortest_delta(2.0, 358.0), -4.0));
    }

    #[test]
    fn delta_never_exceeds_half_turn() {
        let headings = [0.0, 179.9, 359.9, 0.1, 180.0, 90.0, 270.5, 0.0, 359.0];
        for pair in headings.windows(2) {
            let delta = shortest_delta(pair[0], pair[1]);
            assert!(delta.abs() <= 180.0, "{pair:?} -> {delta}");
        }
    }

    #[test]
    fn absolute_continues_across_wrap() {
        let mut integrator = AngleIntegrator::new();
        for heading in [350.0, 355.0, 0.0, 5.0, 10.0] {
            integrator.update(heading);
        }
        // First tick moves 0 -> 350 backwards by 10
        assert!(approx(integrator.absolute(), 10.0));

        let mut integrator = AngleIntegrator::new();
        for heading in [10.0, 120.0, 230.0, 340.0, 90.0, 200.0] {
            integrator.update(heading);
        }
        assert!(approx(integrator.absolute(), 560.0));
    }

    #[test]
    fn clip_truncates_toward_zero() {
        assert_eq!(clip_full_scale(3599, 3600), 3599);
        assert_eq!(clip_full_scale(3600, 3600), 0);
        assert_eq!(clip_full_scale(7300, 3600), 100);
        assert_eq!(clip_full_scale(-3599, 3600), -3599);
        assert_eq!(clip_full_scale(-3700, 3600), -100);
        assert_eq!(clip_full_scale(-7300, 3600), -100);
    }

    #[test]
    fn scale_truncates_toward_zero() {
        assert_eq!(scale_accumulator(259, 130), 1);
        assert_eq!(scale_accumulator(-259, 130), -1);
    }

    #[test]
    fn heading_in_range() {
        assert_eq!(heading_from_tenths(0), 0.0);
        assert!(approx(heading_from_tenths(-100), 350.0));
        assert!(approx(heading_from_tenths(3599), 359.9));
        assert_eq!(heading_from_tenths(-3600), 0.0);
        assert!(approx(heading_from_tenths(5400), 180.0));

        for tenths in (-20_000..20_000).step_by(7) {
            let heading = heading_from_tenths(tenths);
            assert!((0.0..360.0).contains(&heading), "{tenths} -> {heading}");
        }
    }
}
