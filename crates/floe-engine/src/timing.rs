//! Frame timing and performance tracking.
//!
//! Provides wall-clock delta time, frame pacing for realtime runs, and slow
//! frame accounting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::warn;

/// Maximum samples kept for averaging.
const MAX_SAMPLES: usize = 120;

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Frames slower than `frame_budget * slow_factor` are counted
    slow_factor: f32,
    /// Number of slow frames seen
    slow_frames: u64,
    /// Total frames measured
    frames: u64,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a new frame timing manager.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            slow_factor: 2.0,
            slow_frames: 0,
            frames: 0,
            frame_times: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Sets the slow-frame threshold as a multiple of the frame budget.
    #[must_use]
    pub fn with_slow_factor(mut self, factor: f32) -> Self {
        self.slow_factor = factor.max(1.0);
        self
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Time budget per frame.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Calculate delta time since last frame.
    ///
    /// The raw value is returned; the simulation replaces out-of-range
    /// deltas itself.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
        dt
    }

    /// Records a frame time without touching the wall clock.
    pub fn record(&mut self, dt: f32) {
        self.frames += 1;
        if dt > self.frame_budget.as_secs_f32() * self.slow_factor {
            self.slow_frames += 1;
            warn!("Slow frame: {:.1}ms", dt * 1000.0);
        }

        self.frame_times.push_back(dt);
        if self.frame_times.len() > MAX_SAMPLES {
            self.frame_times.pop_front();
        }
    }

    /// Sleep for the remainder of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Get the current FPS (averaged over recent frames).
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        self.average_frame_time() * 1000.0
    }

    fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    /// Frames measured.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that exceeded the slow threshold.
    #[must_use]
    pub fn slow_frames(&self) -> u64 {
        self.slow_frames
    }

    /// Reset timing (call after pause).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.frame_times.clear();
    }
}
