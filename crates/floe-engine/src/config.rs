//! Engine configuration.
//!
//! Loaded from `floe.toml`. Missing or invalid files fall back to defaults
//! with a warning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use floe_common::{FloeError, FloeResult};
use floe_gameplay::SimulationConfig;

/// Configuration file name.
pub const CONFIG_FILE: &str = "floe.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Loop Settings ===
    /// Target frames per second
    pub target_fps: u32,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,
    /// Stop after this many simulated seconds (0 = until the match ends)
    pub max_seconds: f32,
    /// Seconds of simulated time between progress logs (0 = disabled)
    pub log_interval: f32,
    /// Warn when a frame exceeds the budget by this factor
    pub slow_frame_factor: f32,

    // === Match Settings ===
    /// RNG seed (None = random)
    pub seed: Option<u64>,
    /// Random behavior perturbation for enemies
    pub perturbation: bool,
    /// RON scenario describing the arena, player and enemies
    pub scenario: Option<PathBuf>,

    // === Autopilot ===
    /// Seconds between autopilot swings
    pub autopilot_attack_interval: f32,
    /// Seconds between autopilot dashes
    pub autopilot_dodge_interval: f32,
    /// Radius the autopilot circles the arena center at
    pub autopilot_orbit_radius: f32,

    // === Output ===
    /// Write the final summary as JSON to this path
    pub summary_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Loop
            target_fps: 60,
            realtime: false,
            max_seconds: 120.0,
            log_interval: 5.0,
            slow_frame_factor: 2.0,

            // Match
            seed: None,
            perturbation: true,
            scenario: None,

            // Autopilot
            autopilot_attack_interval: 0.6,
            autopilot_dodge_interval: 3.0,
            autopilot_orbit_radius: 120.0,

            // Output
            summary_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        let before = self.clone();

        self.target_fps = self.target_fps.clamp(1, 240);
        self.max_seconds = finite_or(self.max_seconds, 120.0).max(0.0);
        self.log_interval = finite_or(self.log_interval, 5.0).max(0.0);
        self.slow_frame_factor = finite_or(self.slow_frame_factor, 2.0).clamp(1.0, 10.0);

        self.autopilot_attack_interval = finite_or(self.autopilot_attack_interval, 0.6).max(0.1);
        self.autopilot_dodge_interval = finite_or(self.autopilot_dodge_interval, 3.0).max(0.5);
        self.autopilot_orbit_radius =
            finite_or(self.autopilot_orbit_radius, 120.0).clamp(0.0, 400.0);

        if *self != before {
            warn!("Engine config had out-of-range values, clamped");
        }
    }

    /// Frame delta implied by the target FPS.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Builds the simulation configuration, reading the scenario if set.
    pub fn simulation_config(&self) -> FloeResult<SimulationConfig> {
        let mut sim = match &self.scenario {
            Some(path) => {
                let source = fs::read_to_string(path)?;
                let config = SimulationConfig::from_ron(&source)
                    .map_err(|e| FloeError::Config(format!("{}: {e}", path.display())))?;
                info!("Loaded scenario from {}", path.display());
                config
            },
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            sim = sim.with_seed(seed);
        }
        if !self.perturbation {
            sim = sim.with_perturbation(false);
        }
        Ok(sim)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
