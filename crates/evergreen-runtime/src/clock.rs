//! Scene clock

use std::time::Instant;

/// Tracks scene time for the frame loop.
///
/// `tick` reads the wall clock; `advance` steps by an explicit delta so
/// headless runs and tests are deterministic.
pub struct SceneClock {
    /// Total elapsed scene time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Upper bound on a single frame's delta
    pub max_delta: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for SceneClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: 0.25,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit delta in seconds.
    pub fn advance(&mut self, delta: f64) {
        // Clamp so a stalled frame does not fling particles across the scene
        self.delta_time = if delta.is_finite() {
            delta.clamp(0.0, self.max_delta)
        } else {
            0.0
        };
        self.total_time += self.delta_time;
        self.first_tick = false;
    }

    pub fn delta(&self) -> f32 {
        self.delta_time as f32
    }

    pub fn elapsed(&self) -> f32 {
        self.total_time as f32
    }
}
