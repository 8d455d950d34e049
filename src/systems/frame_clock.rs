//! Fixed-step frame clock
//!
//! Animation advances in whole ticks at a fixed rate so explode and rotate
//! speeds do not depend on the display's refresh rate. Leftover time carries
//! into the next frame; long stalls are capped instead of replayed.

use std::time::Instant;

/// Converts elapsed frame time into animation ticks
pub struct FrameClock {
    tick_seconds: f32,
    max_ticks_per_frame: u32,
    accumulator: f32,
    last_frame: Option<Instant>,
}

impl FrameClock {
    /// `tick_rate` in Hz; non-positive rates fall back to 60
    pub fn new(tick_rate: f32, max_ticks_per_frame: u32) -> Self {
        let tick_rate = if tick_rate > 0.0 { tick_rate } else { 60.0 };
        Self {
            tick_seconds: 1.0 / tick_rate,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: 0.0,
            last_frame: None,
        }
    }

    /// Add `dt` seconds and return how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let due = (self.accumulator / self.tick_seconds).floor();
        if due >= self.max_ticks_per_frame as f32 {
            // drop the backlog rather than fast-forward
            self.accumulator = 0.0;
            return self.max_ticks_per_frame;
        }

        let ticks = due as u32;
        self.accumulator -= ticks as f32 * self.tick_seconds;
        ticks
    }

    /// Advance by the wall time since the previous call
    ///
    /// The first call only starts the clock.
    pub fn advance_to(&mut self, now: Instant) -> u32 {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.advance(dt)
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }
}
