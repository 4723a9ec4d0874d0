//! Frame timing for hosts that drive the toolkit.
//!
//! [`FrameClock`] is the per-frame source of truth for elapsed time,
//! delta time and a periodically refreshed fps estimate. [`StepClock`]
//! converts arbitrary frame deltas into whole fixed-size simulation
//! steps for hosts that tick on a timer.
//!
//! There is no pause state: a host that stops requesting frames simply
//! stops calling `update()`, and teardown is the only true stop.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = clock.update();
//! field.step(delta);
//! ```

use std::time::{Duration, Instant};

/// Per-frame time tracking.
///
/// Tracks elapsed time, delta time, frame count and fps. A speed
/// multiplier scales both delta and elapsed, and an optional fixed
/// delta replaces wall-clock measurement for deterministic runs.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total scaled time in seconds, accumulated from deltas.
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated fps (updated periodically).
    fps: f32,
    /// Frame count at last fps update.
    fps_frame_count: u64,
    /// Time of last fps calculation.
    fps_update_time: Instant,
    /// How often to refresh the fps estimate.
    fps_update_interval: Duration,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Speed multiplier (1.0 = normal speed).
    speed: f32,
}

impl FrameClock {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
            speed: 1.0,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta) * self.speed;
        self.elapsed_secs += self.delta_secs;
        self.last_frame = now;

        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total scaled time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Current speed multiplier.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed
    /// - `2.0` = double speed
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Reset the clock to its initial state.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
    }

    /// Get delta time as a Duration.
    #[inline]
    pub fn delta_duration(&self) -> Duration {
        Duration::from_secs_f32(self.delta_secs)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-timestep accumulator.
///
/// Converts irregular frame deltas into whole simulation steps.
/// Catch-up after a long stall is capped at [`MAX_CATCH_UP_STEPS`];
/// past the cap the backlog is discarded, so a host coming back from a
/// background tab resumes smoothly instead of fast-forwarding.
#[derive(Debug, Clone)]
pub struct StepClock {
    step_secs: f32,
    accumulator: f32,
}

/// Most steps a single `advance` call will ever report.
pub const MAX_CATCH_UP_STEPS: u32 = 8;

impl StepClock {
    /// Create an accumulator producing steps of `step_secs` seconds.
    pub fn new(step_secs: f32) -> Self {
        Self {
            step_secs: step_secs.max(f32::EPSILON),
            accumulator: 0.0,
        }
    }

    /// The common 60 Hz reference step.
    pub fn sixty_hz() -> Self {
        Self::new(1.0 / 60.0)
    }

    /// Feed a frame delta; returns how many whole steps to simulate.
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let steps = (self.accumulator / self.step_secs) as u32;
        if steps > MAX_CATCH_UP_STEPS {
            self.accumulator = 0.0;
            MAX_CATCH_UP_STEPS
        } else {
            self.accumulator -= steps as f32 * self.step_secs;
            steps
        }
    }

    /// Seconds per simulation step.
    #[inline]
    pub fn step_seconds(&self) -> f32 {
        self.step_secs
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::sixty_hz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.speed(), 1.0);
    }

    #[test]
    fn test_clock_update() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_speed_clamps_at_zero() {
        let mut clock = FrameClock::new();
        clock.set_speed(2.0);
        assert_eq!(clock.speed(), 2.0);

        clock.set_speed(-1.0);
        assert_eq!(clock.speed(), 0.0);
    }

    #[test]
    fn test_fixed_delta_accumulates_elapsed() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));

        for _ in 0..60 {
            clock.update();
        }

        assert!((clock.elapsed() - 1.0).abs() < 1e-4);
        assert!((clock.delta() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_scales_fixed_delta() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(0.1));
        clock.set_speed(0.5);
        let (_, delta) = clock.update();
        assert!((delta - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_step_clock_whole_steps() {
        let mut steps = StepClock::sixty_hz();
        assert_eq!(steps.advance(1.0 / 60.0), 1);
        assert_eq!(steps.advance(3.0 / 60.0), 3);
        assert_eq!(steps.advance(0.0), 0);
    }

    #[test]
    fn test_step_clock_carries_remainder() {
        let mut steps = StepClock::new(0.01);
        assert_eq!(steps.advance(0.015), 1);
        // 0.005 carried over
        assert_eq!(steps.advance(0.005), 1);
    }

    #[test]
    fn test_step_clock_caps_catch_up() {
        let mut steps = StepClock::sixty_hz();
        assert_eq!(steps.advance(10.0), MAX_CATCH_UP_STEPS);
        // Backlog past the cap is dropped, not replayed
        assert_eq!(steps.advance(0.0), 0);
    }

    #[test]
    fn test_step_clock_ignores_negative_delta() {
        let mut steps = StepClock::sixty_hz();
        assert_eq!(steps.advance(-5.0), 0);
        assert_eq!(steps.advance(1.0 / 60.0), 1);
    }
}
