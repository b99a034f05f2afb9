//! Headless application loop.
//!
//! Drives a [`Simulation`] with an [`Autopilot`] standing in for a human
//! player, logging progress and the final match summary.

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use floe_common::Vec2;
use floe_gameplay::{
    Action, InputFrame, InputProvider, MatchOutcome, MatchSummary, Simulation,
};

use crate::config::EngineConfig;
use crate::timing::FrameTiming;

/// Scripted player that circles the arena center.
///
/// It swings and dashes on fixed intervals, which is enough to exercise
/// every enemy state in a headless run.
#[derive(Debug, Clone)]
pub struct Autopilot {
    center: Vec2,
    radius: f32,
    elapsed: f32,
    position: Vec2,
    attack_interval: f32,
    dodge_interval: f32,
    next_attack: f32,
    next_dodge: f32,
}

impl Autopilot {
    /// Creates an autopilot orbiting `center` at `radius`.
    #[must_use]
    pub fn new(center: Vec2, radius: f32, attack_interval: f32, dodge_interval: f32) -> Self {
        Self {
            center,
            radius,
            elapsed: 0.0,
            position: center,
            attack_interval: attack_interval.max(0.01),
            dodge_interval: dodge_interval.max(0.01),
            next_attack: attack_interval,
            next_dodge: dodge_interval,
        }
    }

    /// Creates an autopilot from engine settings.
    #[must_use]
    pub fn from_config(config: &EngineConfig, center: Vec2, start: Vec2) -> Self {
        let mut pilot = Self::new(
            center,
            config.autopilot_orbit_radius,
            config.autopilot_attack_interval,
            config.autopilot_dodge_interval,
        );
        pilot.position = start;
        pilot
    }

    /// Updates the autopilot's idea of where the player is.
    pub fn observe(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Point on the orbit the autopilot is steering toward.
    #[must_use]
    pub fn waypoint(&self) -> Vec2 {
        self.center + Vec2::from_angle(self.elapsed * 0.5) * self.radius
    }
}

impl InputProvider for Autopilot {
    fn next_frame(&mut self, dt: f32) -> InputFrame {
        self.elapsed += dt.max(0.0);

        let offset = self.waypoint() - self.position;
        let movement = if offset.length() > 5.0 {
            offset.normalized()
        } else {
            Vec2::ZERO
        };
        let mut frame = InputFrame::moving(movement);

        if self.elapsed >= self.next_attack {
            self.next_attack += self.attack_interval;
            frame = frame.with_action(Action::Attack);
        }
        if self.elapsed >= self.next_dodge {
            self.next_dodge += self.dodge_interval;
            frame = frame.with_action(Action::Dodge);
        }
        frame
    }
}

/// Provider that keeps its autopilot's view of the player current.
struct TrackedAutopilot {
    pilot: Autopilot,
    player: Rc<Cell<Vec2>>,
}

impl InputProvider for TrackedAutopilot {
    fn next_frame(&mut self, dt: f32) -> InputFrame {
        self.pilot.observe(self.player.get());
        self.pilot.next_frame(dt)
    }
}

/// Runs one match to completion or until the configured time limit.
pub fn run(config: &EngineConfig) -> Result<MatchSummary> {
    let sim_config = config
        .simulation_config()
        .context("Failed to build simulation config")?;
    let center = sim_config.arena.center();

    let player = Rc::new(Cell::new(sim_config.player.position));
    let pilot = Autopilot::from_config(config, center, sim_config.player.position);
    let mut sim = Simulation::new(sim_config).with_input(Box::new(TrackedAutopilot {
        pilot,
        player: Rc::clone(&player),
    }));

    info!(
        "Match started: {} enemies, arena {}x{}",
        sim.actors().len(),
        sim.arena().width,
        sim.arena().height
    );

    let mut timing = FrameTiming::new(config.target_fps).with_slow_factor(config.slow_frame_factor);
    let fixed_dt = config.frame_dt();
    let mut next_log = config.log_interval;

    while sim.is_running() {
        let dt = if config.realtime {
            timing.delta_time()
        } else {
            timing.record(fixed_dt);
            fixed_dt
        };

        player.set(sim.player().position());
        let report = sim.step(dt);
        if !report.defeated.is_empty() {
            debug!("Defeated this frame: {:?}", report.defeated);
        }

        let elapsed = sim.clock().elapsed() as f32;
        if config.log_interval > 0.0 && elapsed >= next_log {
            next_log += config.log_interval;
            log_progress(&sim);
        }
        if config.max_seconds > 0.0 && elapsed >= config.max_seconds {
            info!("Time limit of {}s reached", config.max_seconds);
            sim.stop();
        }

        if config.realtime {
            timing.sleep_remainder();
        }
    }

    let summary = sim.summary();
    info!(
        "Match finished: {:?}, score {}, max combo {}, {} frames ({} slow, {:.1} fps)",
        summary.outcome,
        summary.score,
        summary.max_combo,
        timing.frames(),
        timing.slow_frames(),
        timing.current_fps()
    );

    if let Some(path) = &config.summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Wrote summary to {}", path.display());
    }

    Ok(summary)
}

fn log_progress(sim: &Simulation) {
    let player = sim.player();
    info!(
        "t={:.1}s player hp {:.0}/{:.0} score {}",
        sim.clock().elapsed(),
        player.health(),
        player.max_health(),
        player.score()
    );
    for state in sim.render_states() {
        info!(
            "  {} at ({:.0}, {:.0}) hp {:.0}% {} [{}]",
            state.id,
            state.position.x,
            state.position.y,
            state.health_fraction * 100.0,
            state.state,
            state.animation.as_str()
        );
    }
}

/// Whether a finished match counts as a win.
#[must_use]
pub fn is_win(summary: &MatchSummary) -> bool {
    summary.outcome == MatchOutcome::Victory
}
