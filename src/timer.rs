use std::time::Duration;

/// Countdown owned by whoever armed it. Dropping the value is the
/// cancellation; nothing outlives its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideTimer {
    elapsed: Duration,
    duration: Duration,
}

impl SlideTimer {
    pub fn new(duration: Duration) -> Self {
        Self::starting_at(Duration::ZERO, duration)
    }

    /// Re-arms a timer that already ran for `elapsed`.
    pub fn starting_at(elapsed: Duration, duration: Duration) -> Self {
        Self {
            elapsed: elapsed.min(duration),
            duration,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fraction of the duration that has run, clamped to 1.0.
    pub fn ratio(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_clamps_at_one() {
        let mut timer = SlideTimer::new(Duration::from_millis(3000));
        timer.update(Duration::from_millis(1500));
        assert_eq!(timer.ratio(), 0.5);
        assert!(!timer.is_expired());

        timer.update(Duration::from_millis(10_000));
        assert_eq!(timer.ratio(), 1.0);
        assert!(timer.is_expired());
        assert_eq!(timer.elapsed(), Duration::from_millis(3000));
    }

    #[test]
    fn starting_at_resumes_partial_progress() {
        let timer = SlideTimer::starting_at(Duration::from_millis(750), Duration::from_millis(3000));
        assert_eq!(timer.ratio(), 0.25);
    }

    #[test]
    fn zero_duration_is_immediately_done() {
        let timer = SlideTimer::new(Duration::ZERO);
        assert!(timer.is_expired());
        assert_eq!(timer.ratio(), 1.0);
    }
}
