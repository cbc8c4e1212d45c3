/// Wall-clock accumulator driven by the page's animation-frame callback.
///
/// Orbits are evaluated from `elapsed`; per-frame integrators (shooting stars)
/// use `delta`. Deltas are clamped so a backgrounded tab resumes smoothly.
#[derive(Debug, Clone)]
pub struct FrameClock {
    elapsed: f64,
    delta: f32,
    max_dt: f32,
    time_scale: f32,
    paused: bool,
    frame: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            max_dt,
            time_scale: 1.0,
            paused: false,
            frame: 0,
        }
    }

    /// Advance by one frame of real time. Returns the scaled, clamped delta.
    pub fn tick(&mut self, frame_dt: f32) -> f32 {
        self.frame += 1;
        let dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, self.max_dt) } else { 0.0 };
        self.delta = if self.paused { 0.0 } else { dt * self.time_scale };
        self.elapsed += self.delta as f64;
        self.delta
    }

    /// Seconds of simulated time since start.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Simulated seconds covered by the last tick.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(0.016);
        clock.tick(0.016);
        assert!((clock.elapsed() - 0.032).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn clamps_long_frames() {
        let mut clock = FrameClock::new(0.1);
        let dt = clock.tick(5.0);
        assert_eq!(dt, 0.1);
    }

    #[test]
    fn negative_and_nan_deltas_are_zero() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.tick(-1.0), 0.0);
        assert_eq!(clock.tick(f32::NAN), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn pause_freezes_time() {
        let mut clock = FrameClock::new(0.1);
        clock.set_paused(true);
        clock.tick(0.05);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn time_scale_multiplies_delta() {
        let mut clock = FrameClock::new(0.1);
        clock.set_time_scale(2.0);
        assert!((clock.tick(0.02) - 0.04).abs() < 1e-6);
    }
}
