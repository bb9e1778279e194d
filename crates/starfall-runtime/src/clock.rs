//! Game clock with clamped frame delta and fixed-timestep accumulator

use std::time::Instant;

/// Frame timing.
///
/// Every delta is clamped to `max_tick` so a stalled host (debugger,
/// backgrounded tab) resumes with one bounded step instead of a huge jump.
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Clamped time since last frame in seconds
    pub delta_time: f64,
    /// Upper bound for `delta_time`
    pub max_tick: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    accumulator: f64,
    last_instant: Option<Instant>,
    frame: u64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_tick: 0.1,
            fixed_timestep: 1.0 / 60.0,
            accumulator: 0.0,
            last_instant: None,
            frame: 0,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tick(max_tick: f64) -> Self {
        Self {
            max_tick,
            ..Self::default()
        }
    }

    /// Advance from the wall clock. The first tick has zero delta.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = self
            .last_instant
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_instant = Some(now);
        self.advance(elapsed);
    }

    /// Advance by an externally measured delta (headless runs, tests)
    pub fn advance(&mut self, elapsed: f64) {
        self.delta_time = elapsed.clamp(0.0, self.max_tick);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
        self.frame += 1;
    }

    /// Frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }

    /// Interpolation alpha for rendering between fixed steps
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.fixed_timestep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert!((clock.max_tick - 0.1).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = GameClock::with_max_tick(0.1);
        clock.advance(5.0);
        assert!((clock.delta_time - 0.1).abs() < 1e-12);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert!((clock.total_time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_logic() {
        let mut clock = GameClock::new();
        clock.advance(1.0 / 30.0 + 1e-9);

        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(!clock.should_fixed_update());
    }

    #[test]
    fn test_interpolation_alpha() {
        let mut clock = GameClock::new();
        clock.advance(clock.fixed_timestep * 0.5);
        assert!((clock.interpolation_alpha() - 0.5).abs() < 1e-10);
    }
}
