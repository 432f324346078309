//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-timestep accumulator driving `Scene::fixed_update`
///
/// The application loop feeds in variable frame deltas; `drain` reports how
/// many fixed steps fit, capped so a long stall cannot spiral into an
/// unbounded catch-up burst.
pub struct FixedTimestep {
    step: f32,
    max_steps_per_tick: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator with the given step length in seconds
    pub fn new(step: f32, max_steps_per_tick: u32) -> Self {
        Self {
            step,
            max_steps_per_tick,
            accumulator: 0.0,
        }
    }

    /// The fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulate a frame delta and return the number of fixed steps to run
    pub fn drain(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_tick {
            self.accumulator -= self.step;
            steps += 1;
        }

        // Backlog beyond the cap is discarded, not replayed.
        if steps == self.max_steps_per_tick {
            self.accumulator = 0.0;
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_accumulates_partial_frames() {
        let mut ts = FixedTimestep::new(0.02, 8);

        assert_eq!(ts.drain(0.01), 0);
        assert_eq!(ts.drain(0.01), 1);
        assert_eq!(ts.drain(0.05), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_catch_up() {
        let mut ts = FixedTimestep::new(0.02, 4);

        assert_eq!(ts.drain(1.0), 4);
        // Backlog is discarded after hitting the cap.
        assert_eq!(ts.drain(0.0), 0);
    }
}
