/// Converts the host's millisecond timestamps into per-frame deltas in seconds.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap every delta at `max_dt` seconds, e.g. to absorb a stalled window.
    pub fn with_max_dt(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: Some(max_dt),
        }
    }

    /// Delta since the previous call. The first call, a clock running
    /// backwards, or a non-finite timestamp yield zero.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(prev) => ((now_ms - prev) / 1000.0) as f32,
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.max_dt {
            Some(max) => dt.min(max),
            None => dt,
        }
    }

    /// Forget the previous timestamp, so the next frame starts from zero.
    pub fn restart(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(16_000.0), 0.0);
    }

    #[test]
    fn delta_is_in_seconds() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(1250.0), 0.25);
        assert_eq!(clock.tick(2250.0), 1.0);
    }

    #[test]
    fn backwards_and_nan_are_zero() {
        let mut clock = FrameClock::new();
        clock.tick(5000.0);
        assert_eq!(clock.tick(4000.0), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.tick(4500.0), 0.5);
    }

    #[test]
    fn max_dt_caps_long_frames() {
        let mut clock = FrameClock::with_max_dt(0.1);
        clock.tick(0.0);
        assert_eq!(clock.tick(3000.0), 0.1);
    }

    #[test]
    fn restart_forgets_previous_timestamp() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.restart();
        assert_eq!(clock.tick(10_000.0), 0.0);
    }
}
