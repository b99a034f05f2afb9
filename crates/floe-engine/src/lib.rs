//! # Floe Engine
//!
//! Headless runner for Floe Arena.
//!
//! This crate ties the gameplay core to a process:
//! - Config: `floe.toml` loading, validation and RON scenarios
//! - Timing: wall-clock deltas, pacing and slow-frame tracking
//! - App: the match loop driven by an autopilot player

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod timing;

pub use app::{run, Autopilot};
pub use config::EngineConfig;
pub use timing::FrameTiming;
