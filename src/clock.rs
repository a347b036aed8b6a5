//! Monotonic session clock feeding the wave phase.

use std::time::Instant;

use crate::params::WaterParams;

/// Seconds since the session started; never goes backwards
pub struct FrameClock {
    start: Instant,
    last: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: 0.0,
            frames: 0,
        }
    }

    /// Elapsed seconds at `now`, held at the previous value if `now` is earlier
    pub fn elapsed_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        self.last = self.last.max(elapsed);
        self.last
    }

    /// Advance one frame and publish the elapsed time into `params`
    pub fn tick(&mut self, params: &mut WaterParams) -> f32 {
        self.tick_at(Instant::now(), params)
    }

    pub fn tick_at(&mut self, now: Instant, params: &mut WaterParams) -> f32 {
        let elapsed = self.elapsed_at(now);
        params.elapsed_time = elapsed;
        self.frames += 1;
        elapsed
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
