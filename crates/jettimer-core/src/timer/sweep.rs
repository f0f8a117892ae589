//! Linear interpolation of the progress arc.

use std::time::Duration;

/// Angle of a full, untouched arc in degrees.
pub const FULL_SWEEP: f32 = 360.0;

/// A value moving linearly from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepAnimation {
    from: f32,
    to: f32,
    duration: Duration,
}

impl SweepAnimation {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Full arc down to nothing over `duration`.
    pub fn countdown(duration: Duration) -> Self {
        Self::new(FULL_SWEEP, 0.0, duration)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 0.0 .. 1.0 progress, clamped.
    pub fn fraction(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, elapsed: Duration) -> f32 {
        self.from + (self.to - self.from) * self.fraction(elapsed)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let sweep = SweepAnimation::countdown(Duration::from_secs(4));
        assert_eq!(sweep.value_at(Duration::ZERO), 360.0);
        assert_eq!(sweep.value_at(Duration::from_secs(1)), 270.0);
        assert_eq!(sweep.value_at(Duration::from_secs(2)), 180.0);
        assert_eq!(sweep.value_at(Duration::from_secs(4)), 0.0);
    }

    #[test]
    fn clamps_past_the_end() {
        let sweep = SweepAnimation::countdown(Duration::from_secs(2));
        assert_eq!(sweep.value_at(Duration::from_secs(10)), 0.0);
        assert!(sweep.is_finished(Duration::from_secs(2)));
        assert!(!sweep.is_finished(Duration::from_millis(1999)));
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let sweep = SweepAnimation::new(10.0, 20.0, Duration::ZERO);
        assert_eq!(sweep.value_at(Duration::ZERO), 20.0);
    }
}
