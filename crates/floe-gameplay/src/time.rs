//! Simulation time.
//!
//! All gameplay timers are driven by accumulated simulation time rather than a
//! wall clock, so a run is fully determined by its inputs and deltas.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Delta substituted for invalid frame deltas.
pub const NOMINAL_DT: f32 = 0.016;
/// Largest frame delta accepted as-is.
pub const MAX_DT: f32 = 0.1;

/// Replaces a non-finite, non-positive or oversized delta with `NOMINAL_DT`.
#[must_use]
pub fn normalize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 && dt <= MAX_DT {
        dt
    } else {
        NOMINAL_DT
    }
}

/// Accumulated simulation clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Total elapsed simulated seconds.
    elapsed: f64,
    /// Number of ticks advanced.
    ticks: u64,
    /// Delta substituted for invalid input.
    nominal_dt: f32,
    /// Largest delta accepted as-is.
    max_dt: f32,
    /// Number of deltas that had to be replaced.
    corrected: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(NOMINAL_DT, MAX_DT)
    }
}

impl SimClock {
    /// Create a clock with custom delta limits.
    #[must_use]
    pub fn new(nominal_dt: f32, max_dt: f32) -> Self {
        let nominal_dt = if nominal_dt.is_finite() && nominal_dt > 0.0 {
            nominal_dt
        } else {
            NOMINAL_DT
        };
        Self {
            elapsed: 0.0,
            ticks: 0,
            nominal_dt,
            max_dt: if max_dt.is_finite() && max_dt > 0.0 { max_dt } else { MAX_DT },
            corrected: 0,
        }
    }

    /// Validate a delta without advancing.
    #[must_use]
    pub fn normalize(&self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 && dt <= self.max_dt {
            dt
        } else {
            self.nominal_dt
        }
    }

    /// Advance by a frame delta. Returns the delta actually applied.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let applied = self.normalize(dt);
        if applied.to_bits() != dt.to_bits() {
            self.corrected += 1;
            warn!("Frame delta {dt} out of range, using {applied}");
        }
        self.elapsed += f64::from(applied);
        self.ticks += 1;
        applied
    }

    /// Total elapsed simulated seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks advanced.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of deltas that were replaced.
    #[must_use]
    pub const fn corrected(&self) -> u64 {
        self.corrected
    }
}
