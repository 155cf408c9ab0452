use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use super::PI_180;

/// Everything the estimator publishes for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Calibration done and at least one tick integrated
    pub valid: bool,
    /// Wrapped heading in [0, 360)
    pub degrees: f32,
    /// Unwrapped cumulative rotation, continuous across 0/360
    pub absolute_degrees: f32,
}

impl Heading {
    pub const STARTUP: Self = Self {
        valid: false,
        degrees: 0.0,
        absolute_degrees: 0.0,
    };

    /// Heading in [0, 2PI)
    pub fn radians(&self) -> f32 {
        self.degrees * PI_180
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::STARTUP
    }
}

/// Latest [`Heading`], replaced as a whole so readers never see a half-updated tick.
///
/// Anyone holding a reference can read. Only the estimator inside this crate can publish.
pub struct SharedHeading {
    inner: Mutex<CriticalSectionRawMutex, Cell<Heading>>,
}

impl SharedHeading {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Heading::STARTUP)),
        }
    }

    pub fn get(&self) -> Heading {
        self.inner.lock(|cell| cell.get())
    }

    pub(crate) fn publish(&self, heading: Heading) {
        self.inner.lock(|cell| cell.set(heading));
    }

    pub(crate) fn reset(&self) {
        self.publish(Heading::STARTUP);
    }
}

impl Default for SharedHeading {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_invalid_at_zero() {
        let shared = SharedHeading::new();
        assert_eq!(shared.get(), Heading::STARTUP);
        assert!(!shared.get().valid);
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let shared = SharedHeading::new();
        let heading = Heading {
            valid: true,
            degrees: 90.0,
            absolute_degrees: -270.0,
        };

        shared.publish(heading);
        assert_eq!(shared.get(), heading);

        shared.reset();
        assert_eq!(shared.get(), Heading::STARTUP);
    }

    #[test]
    fn radians_scale_degrees() {
        let heading = Heading {
            valid: true,
            degrees: 180.0,
            absolute_degrees: 180.0,
        };
        assert!((heading.radians() - core::f32::consts::PI).abs() < 1e-6);
    }
}
