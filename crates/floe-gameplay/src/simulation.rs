//! Frame-stepped arena simulation.
//!
//! [`Simulation`] owns the player, the enemy actors, the random source and
//! the optional input provider. Each tick it advances the clock, moves the
//! player, runs enemy AI against a read-only target snapshot, applies the
//! resulting attacks, and checks for the end of the match.

use std::fmt;

use floe_common::{ActorId, ArenaBounds, FloeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::Obstacle;
use crate::combat::CombatStrategy;
use crate::config::{ActorConfig, SimulationConfig};
use crate::effects::{EffectBuffer, ParticleEffect};
use crate::entity::{Actor, ActorRenderState};
use crate::input::{InputFrame, InputProvider};
use crate::player::Player;
use crate::random::{FastRandom, RandomSource};
use crate::snapshot::ActorSnapshot;
use crate::time::{SimClock, MAX_DT};

/// Errors that can occur when addressing the simulation.
#[derive(Debug, Clone, Error)]
pub enum SimulationError {
    /// No actor with this id
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),
}

/// Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

impl From<SimulationError> for FloeError {
    fn from(err: SimulationError) -> Self {
        Self::Simulation(err.to_string())
    }
}

/// State of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Still being played
    #[default]
    InProgress,
    /// Every enemy defeated
    Victory,
    /// Player defeated
    Defeat,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Applied delta
    pub dt: f32,
    /// Attacks the enemies made
    pub enemy_attacks: usize,
    /// Enemy attacks that hurt the player
    pub enemy_hits: usize,
    /// Enemies the player hit
    pub player_hits: usize,
    /// Enemies removed this tick
    pub defeated: Vec<ActorId>,
}

/// Serializable end-of-run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Match state
    pub outcome: MatchOutcome,
    /// Simulated seconds
    pub elapsed: f64,
    /// Ticks run
    pub ticks: u64,
    /// Deltas that had to be replaced
    pub corrected_frames: u64,
    /// Player score
    pub score: u64,
    /// Best combo
    pub max_combo: u32,
    /// Player health
    pub player_health: f32,
    /// Enemies still in the arena
    pub enemies_remaining: usize,
    /// Enemies defeated
    pub enemies_defeated: usize,
}

/// Arena simulation.
pub struct Simulation {
    clock: SimClock,
    arena: ArenaBounds,
    perturbation: bool,
    player: Player,
    actors: Vec<Actor>,
    obstacles: Vec<Obstacle>,
    effects: EffectBuffer,
    rng: Box<dyn RandomSource>,
    input: Option<Box<dyn InputProvider>>,
    running: bool,
    paused: bool,
    outcome: MatchOutcome,
    defeated: usize,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("clock", &self.clock)
            .field("player", &self.player.position())
            .field("actors", &self.actors.len())
            .field("running", &self.running)
            .field("paused", &self.paused)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Simulation {
    /// Creates a simulation and spawns the configured enemies.
    ///
    /// Seeds the RNG from `config.seed`, or from entropy when unset.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(FastRandom::new(seed)),
            None => Box::new(FastRandom::from_entropy()),
        };

        let mut sim = Self {
            clock: SimClock::new(config.nominal_dt, config.max_dt.min(MAX_DT)),
            arena: config.arena,
            perturbation: config.perturbation,
            player: Player::new(config.player).with_bounds(config.arena),
            actors: Vec::with_capacity(config.enemies.len()),
            obstacles: Vec::new(),
            effects: EffectBuffer::for_world(),
            rng,
            input: None,
            running: true,
            paused: false,
            outcome: MatchOutcome::InProgress,
            defeated: 0,
        };
        for enemy in config.enemies {
            sim.spawn(enemy);
        }
        sim
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Installs an input provider for [`Simulation::step`].
    #[must_use]
    pub fn with_input(mut self, input: Box<dyn InputProvider>) -> Self {
        self.input = Some(input);
        self
    }

    /// Adds an obstacle.
    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    // ------------------------------------------------------------------------
    // Actors
    // ------------------------------------------------------------------------

    /// Spawns an enemy with the default strategy for its kind.
    pub fn spawn(&mut self, config: ActorConfig) -> ActorId {
        let strategy = crate::combat::strategy_for(&config);
        self.spawn_with_strategy(config, strategy)
    }

    /// Spawns an enemy with an explicit strategy.
    pub fn spawn_with_strategy(
        &mut self,
        mut config: ActorConfig,
        strategy: Box<dyn CombatStrategy>,
    ) -> ActorId {
        if !self.perturbation {
            config.perturbation = false;
        }
        let actor = Actor::new(config, strategy).with_bounds(self.arena);
        let id = actor.id();
        info!("Spawned {} ({}) at {:?}", actor.name(), id, actor.position());
        self.actors.push(actor);
        id
    }

    /// Looks up an enemy.
    pub fn actor(&self, id: ActorId) -> SimulationResult<&Actor> {
        self.actors
            .iter()
            .find(|a| a.id() == id)
            .ok_or(SimulationError::UnknownActor(id))
    }

    /// Looks up an enemy mutably.
    pub fn actor_mut(&mut self, id: ActorId) -> SimulationResult<&mut Actor> {
        self.actors
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(SimulationError::UnknownActor(id))
    }

    /// Applies a network snapshot to the actor it names.
    ///
    /// Returns false when that actor is not remote.
    pub fn apply_snapshot(&mut self, snapshot: &ActorSnapshot) -> SimulationResult<bool> {
        Ok(self.actor_mut(snapshot.id)?.apply_snapshot(snapshot))
    }

    /// Enemies in the arena.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Obstacles enemies steer around.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Replaces the obstacle list.
    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Simulation clock.
    #[must_use]
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Arena bounds.
    #[must_use]
    pub const fn arena(&self) -> ArenaBounds {
        self.arena
    }

    /// Whether ticks still advance the simulation.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stops the simulation. Further ticks do nothing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sets the pause state directly.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Toggles the pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("Simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Match state.
    #[must_use]
    pub const fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// World particles waiting to be rendered.
    #[must_use]
    pub const fn effects(&self) -> &EffectBuffer {
        &self.effects
    }

    /// Takes the world particles.
    pub fn drain_effects(&mut self) -> Vec<ParticleEffect> {
        self.effects.drain()
    }

    /// Render views of every enemy.
    #[must_use]
    pub fn render_states(&self) -> Vec<ActorRenderState> {
        self.actors.iter().map(Actor::render_state).collect()
    }

    /// Snapshots of every enemy.
    #[must_use]
    pub fn snapshots(&self) -> Vec<ActorSnapshot> {
        self.actors.iter().map(Actor::snapshot).collect()
    }

    /// Summary of the run so far.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            outcome: self.outcome,
            elapsed: self.clock.elapsed(),
            ticks: self.clock.ticks(),
            corrected_frames: self.clock.corrected(),
            score: self.player.score(),
            max_combo: self.player.max_combo(),
            player_health: self.player.health(),
            enemies_remaining: self.actors.len(),
            enemies_defeated: self.defeated,
        }
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advances one tick, reading input from the installed provider.
    ///
    /// Without a provider the player stands still.
    pub fn step(&mut self, dt: f32) -> TickReport {
        let frame = self
            .input
            .as_mut()
            .map_or(InputFrame::IDLE, |input| input.next_frame(dt));
        self.tick(dt, &frame)
    }

    /// Advances one tick with explicit input.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) -> TickReport {
        let mut report = TickReport::default();
        if !self.running {
            return report;
        }

        if input.actions.menu {
            self.toggle_pause();
        }
        if self.paused {
            return report;
        }

        let dt = self.clock.advance(dt);
        report.dt = dt;

        let intent = self.player.update(dt, input, self.rng.as_mut());
        if let Some(swing) = &intent.attack {
            for actor in &mut self.actors {
                if actor.apply_outcome(swing, self.rng.as_mut()).landed() {
                    report.player_hits += 1;
                    self.player.record_hit(actor, self.rng.as_mut());
                }
            }
        }

        let target = self.player.target_snapshot();
        for actor in &mut self.actors {
            let outcomes = actor.update(dt, &target, &self.obstacles, self.rng.as_mut());
            for outcome in &outcomes {
                report.enemy_attacks += 1;
                let landed = self.player.apply_outcome(outcome, self.rng.as_mut());
                actor.record_attack_result(outcome.kind, landed);
                if landed {
                    report.enemy_hits += 1;
                    actor.record_damage_dealt(outcome.damage);
                }
            }
            self.effects.extend(actor.drain_effects());
        }
        self.effects.extend(self.player.drain_effects());

        self.actors.retain(|actor| {
            if actor.is_active() {
                return true;
            }
            info!("{} ({}) defeated", actor.name(), actor.id());
            report.defeated.push(actor.id());
            false
        });
        self.defeated += report.defeated.len();

        self.effects.age(dt);
        self.check_outcome();
        report
    }

    fn check_outcome(&mut self) {
        if self.outcome != MatchOutcome::InProgress {
            return;
        }
        if !self.player.is_alive() {
            self.outcome = MatchOutcome::Defeat;
        } else if self.actors.is_empty() {
            self.outcome = MatchOutcome::Victory;
        } else {
            return;
        }
        self.running = false;
        info!(
            "Match over: {:?} after {:.2}s, score {}",
            self.outcome,
            self.clock.elapsed(),
            self.player.score()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiState;
    use crate::combat::AttackKind;
    use crate::input::{Action, ScriptedInput};
    use crate::random::ScriptedRandom;
    use floe_common::Vec2;

    fn grunt_at(x: f32, y: f32) -> ActorConfig {
        ActorConfig {
            attack_range: 60.0,
            perturbation: false,
            ..ActorConfig::default().with_position(x, y)
        }
    }

    fn sim_with(enemies: Vec<ActorConfig>, roll: f32) -> Simulation {
        Simulation::new(
            SimulationConfig::default()
                .with_seed(7)
                .with_perturbation(false)
                .with_enemies(enemies),
        )
        .with_random(Box::new(ScriptedRandom::constant(roll)))
    }

    #[test]
    fn test_default_simulation() {
        let sim = Simulation::new(SimulationConfig::default().with_seed(1));
        assert_eq!(sim.actors().len(), 1);
        assert_eq!(sim.actors()[0].position(), Vec2::new(600.0, 300.0));
        assert_eq!(sim.player().position(), Vec2::new(400.0, 300.0));
        assert!(sim.is_running());
        assert_eq!(sim.outcome(), MatchOutcome::InProgress);
    }

    #[test]
    fn test_enemy_attack_hits_player() {
        let mut sim = sim_with(vec![grunt_at(450.0, 300.0)], 0.9);
        let id = sim.actors()[0].id();
        sim.actor_mut(id)
            .expect("actor should exist")
            .change_state(AiState::Attack);

        let report = sim.tick(0.016, &InputFrame::IDLE);
        assert_eq!(report.enemy_attacks, 1);
        assert_eq!(report.enemy_hits, 1);
        assert_eq!(sim.player().health(), 90.0);

        let actor = sim.actor(id).expect("actor should exist");
        assert_eq!(actor.stats().successful, 1);
        assert_eq!(actor.stats().damage_dealt, 10.0);
        assert_eq!(
            actor.memory().last().map(|r| r.action),
            Some(crate::memory::ActionKind::Attack(AttackKind::Normal))
        );
    }

    #[test]
    fn test_player_kill_wins_match() {
        let mut sim = sim_with(
            vec![ActorConfig {
                max_health: 10.0,
                ..grunt_at(450.0, 300.0)
            }],
            0.9,
        );

        let report = sim.tick(0.016, &InputFrame::IDLE.with_action(Action::Attack));
        assert_eq!(report.player_hits, 1);
        assert_eq!(report.defeated.len(), 1);
        assert_eq!(sim.outcome(), MatchOutcome::Victory);
        assert!(!sim.is_running());
        assert_eq!(sim.player().score(), 10);
        assert!(!sim.effects().is_empty());

        let summary = sim.summary();
        assert_eq!(summary.enemies_defeated, 1);
        assert_eq!(summary.enemies_remaining, 0);
    }

    #[test]
    fn test_player_swing_respects_reach() {
        let mut sim = sim_with(vec![grunt_at(450.0, 300.0), grunt_at(700.0, 500.0)], 0.9);
        let far = sim.actors()[1].id();

        let report = sim.tick(0.016, &InputFrame::IDLE.with_action(Action::Attack));
        assert_eq!(report.player_hits, 1);
        assert!(sim.actors()[0].health() < 100.0);
        assert_eq!(sim.actor(far).expect("actor should exist").health(), 100.0);
        assert_eq!(sim.player().combo(), 1);
    }

    #[test]
    fn test_player_death_loses_match() {
        let mut sim = sim_with(vec![grunt_at(450.0, 300.0)], 0.9);
        let id = sim.actors()[0].id();
        sim.actor_mut(id)
            .expect("actor should exist")
            .change_state(AiState::Attack);
        sim.player_mut().set_health(5.0);

        sim.tick(0.016, &InputFrame::IDLE);
        assert_eq!(sim.outcome(), MatchOutcome::Defeat);
        assert!(!sim.is_running());

        let ticks = sim.clock().ticks();
        let report = sim.tick(0.016, &InputFrame::IDLE);
        assert_eq!(report, TickReport::default());
        assert_eq!(sim.clock().ticks(), ticks);
    }

    #[test]
    fn test_invalid_dt_normalized() {
        let mut sim = sim_with(vec![grunt_at(700.0, 500.0)], 0.9);
        for dt in [f32::NAN, -1.0, 0.0, 5.0] {
            let report = sim.tick(dt, &InputFrame::IDLE);
            assert!((report.dt - 0.016).abs() < 1e-6);
        }
        assert_eq!(sim.clock().ticks(), 4);
        assert_eq!(sim.clock().corrected(), 4);
        assert!((sim.clock().elapsed() - 0.064).abs() < 1e-5);
    }

    #[test]
    fn test_menu_pauses_and_resumes() {
        let mut sim = sim_with(vec![grunt_at(700.0, 500.0)], 0.9);
        let menu = InputFrame::IDLE.with_action(Action::Menu);

        sim.tick(0.016, &menu);
        assert!(sim.is_paused());
        sim.tick(0.016, &InputFrame::IDLE);
        assert_eq!(sim.clock().ticks(), 0);

        sim.tick(0.016, &menu);
        assert!(!sim.is_paused());
        assert_eq!(sim.clock().ticks(), 1);
    }

    #[test]
    fn test_step_reads_provider() {
        let mut sim = sim_with(vec![grunt_at(700.0, 500.0)], 0.9).with_input(Box::new(
            ScriptedInput::new([InputFrame::moving(Vec2::new(-1.0, 0.0))]),
        ));

        sim.step(0.016);
        assert!(sim.player().position().x < 400.0);

        let x = sim.player().position().x;
        sim.step(0.016);
        assert_eq!(sim.player().position().x, x);
    }

    #[test]
    fn test_unknown_actor() {
        let mut sim = sim_with(Vec::new(), 0.5);
        let missing = ActorId::from_raw(u64::MAX);
        assert!(matches!(
            sim.actor(missing),
            Err(SimulationError::UnknownActor(id)) if id == missing
        ));
        assert!(sim.actor_mut(missing).is_err());

        let err: FloeError = SimulationError::UnknownActor(missing).into();
        assert!(err.to_string().contains("unknown actor"));
    }

    #[test]
    fn test_no_enemies_is_immediate_victory() {
        let mut sim = sim_with(Vec::new(), 0.5);
        sim.tick(0.016, &InputFrame::IDLE);
        assert_eq!(sim.outcome(), MatchOutcome::Victory);
    }

    #[test]
    fn test_global_perturbation_switch() {
        let sim = Simulation::new(
            SimulationConfig::default()
                .with_seed(3)
                .with_perturbation(false),
        );
        assert!(!sim.actors()[0].ai().perturbation_enabled);
    }

    #[test]
    fn test_remote_snapshot_through_simulation() {
        let mut sim = sim_with(
            vec![ActorConfig {
                remote: true,
                ..grunt_at(700.0, 500.0)
            }],
            0.5,
        );
        let mut snapshot = sim.snapshots()[0].clone();
        snapshot.x = 650.0;
        snapshot.state = AiState::Retreat;

        assert!(sim.apply_snapshot(&snapshot).expect("actor should exist"));
        let actor = &sim.actors()[0];
        assert_eq!(actor.position().x, 650.0);
        assert_eq!(actor.state(), AiState::Retreat);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let run = || {
            let mut sim = Simulation::new(SimulationConfig::default().with_seed(42));
            for _ in 0..300 {
                sim.tick(0.016, &InputFrame::IDLE);
            }
            (
                sim.player().health(),
                sim.render_states()
                    .iter()
                    .map(|s| (s.position, s.state))
                    .collect::<Vec<_>>(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_summary_serializes() {
        let sim = sim_with(vec![grunt_at(700.0, 500.0)], 0.5);
        let json = serde_json::to_string(&sim.summary()).expect("encode should succeed");
        assert!(json.contains("\"outcome\":\"in_progress\""));
    }
}
