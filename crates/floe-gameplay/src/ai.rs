//! Enemy AI state machine.
//!
//! This module provides:
//! - AI states and per-actor AI parameters (`AIProfile`)
//! - The read-only target and obstacle views the AI consumes
//! - State-specific update logic for `Actor`
//!
//! Every transition resets the state timer. `Dead` is terminal.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use floe_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::{AttackContext, AttackOutcome};
use crate::config::ActorConfig;
use crate::entity::Actor;
use crate::random::RandomSource;

/// Seconds of accumulated AI time between adaptation passes.
pub const ADAPT_INTERVAL: f32 = 5.0;
/// Minimum simulated seconds between two dodges.
pub const DODGE_COOLDOWN: f32 = 1.5;
/// Distance within which an attacking target can be dodged.
pub const DODGE_TRIGGER_DISTANCE: f32 = 150.0;
/// Target attack cooldown below which it counts as attacking.
pub const TARGET_ATTACK_WINDOW: f32 = 0.5;
/// Radius within which obstacles push a chasing actor away.
pub const OBSTACLE_AVOID_RADIUS: f32 = 100.0;
/// Distance at which a patrol waypoint counts as reached.
pub const WAYPOINT_RADIUS: f32 = 10.0;

/// States a perturbation may force.
const PERTURBATION_STATES: [AiState; 4] =
    [AiState::Idle, AiState::Patrol, AiState::Chase, AiState::Evade];

/// AI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    /// Standing still
    #[default]
    Idle,
    /// Walking the patrol route
    Patrol,
    /// Pursuing the target
    Chase,
    /// Hovering at attack range and attacking
    Attack,
    /// Dodging sideways
    Evade,
    /// Backing off to recover
    Retreat,
    /// Dead, terminal
    Dead,
}

impl AiState {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::Attack => "attack",
            Self::Evade => "evade",
            Self::Retreat => "retreat",
            Self::Dead => "dead",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(Self::Idle),
            "patrol" => Some(Self::Patrol),
            "chase" => Some(Self::Chase),
            "attack" => Some(Self::Attack),
            "evade" => Some(Self::Evade),
            "retreat" => Some(Self::Retreat),
            "dead" => Some(Self::Dead),
            _ => None,
        }
    }

    /// Speed multiplier applied on entering this state.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Chase => 1.3,
            Self::Evade => 2.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sideways dodge rolled when an evade starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvadeManeuver {
    /// +1 for clockwise, -1 for counter-clockwise
    pub side: f32,
    /// Seconds before returning to chase
    pub duration: f32,
}

impl EvadeManeuver {
    /// Rolls a side and a duration in 0.5-1.0 s.
    pub fn roll(rng: &mut dyn RandomSource) -> Self {
        let side = if rng.chance(0.5) { 1.0 } else { -1.0 };
        Self {
            side,
            duration: rng.range(0.5, 1.0),
        }
    }
}

/// What the AI knows about its target this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot {
    /// Target position
    pub position: Vec2,
    /// Whether the target is mid-attack
    pub is_attacking: bool,
    /// Target's remaining attack cooldown
    pub attack_cooldown: f32,
    /// Display name
    pub name: String,
}

impl TargetSnapshot {
    /// Idle target at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            is_attacking: false,
            attack_cooldown: 1.0,
            name: String::new(),
        }
    }

    /// Sets the attacking flag.
    #[must_use]
    pub fn with_attacking(mut self, attacking: bool) -> Self {
        self.is_attacking = attacking;
        self
    }

    /// Whether the target counts as attacking for dodge decisions.
    #[must_use]
    pub fn threatens(&self) -> bool {
        self.is_attacking || self.attack_cooldown < TARGET_ATTACK_WINDOW
    }
}

/// Circular obstacle a chasing actor steers around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Center
    pub position: Vec2,
    /// Radius
    pub radius: f32,
}

impl Obstacle {
    /// Creates an obstacle.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }
}

/// Per-actor AI parameters and bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIProfile {
    state: AiState,
    state_timer: f32,
    /// Accumulated time toward the next adaptation pass
    pub adapt_timer: f32,
    /// Target position last seen within vision range
    pub last_known_target: Option<Vec2>,
    /// Tendency to engage (0-1)
    pub aggressiveness: f32,
    /// Tendency to back off after attacking (0-1)
    pub caution: f32,
    /// Rate of random behavior changes (0-1)
    pub unpredictability: f32,
    /// Chance to dodge an attacking target (0-1)
    pub dodge_chance: f32,
    /// Minimum seconds between dodges
    pub dodge_cooldown: f32,
    /// Simulation time of the last dodge
    pub last_dodge: Option<f64>,
    /// Patrol waypoints
    pub patrol_route: Vec<Vec2>,
    /// Index of the next waypoint
    pub patrol_index: usize,
    /// Seconds spent idle
    pub idle_timer: f32,
    /// Seconds before an idle actor reconsiders
    pub max_idle_time: f32,
    /// Current evade maneuver
    pub evade: Option<EvadeManeuver>,
    /// Whether random perturbation is active
    pub perturbation_enabled: bool,
}

impl Default for AIProfile {
    fn default() -> Self {
        Self::from_config(&ActorConfig::default())
    }
}

impl AIProfile {
    /// Creates a profile from an actor config.
    #[must_use]
    pub fn from_config(config: &ActorConfig) -> Self {
        Self {
            state: AiState::Idle,
            state_timer: 0.0,
            adapt_timer: 0.0,
            last_known_target: None,
            aggressiveness: config.aggressiveness.clamp(0.0, 1.0),
            caution: config.caution.clamp(0.0, 1.0),
            unpredictability: config.unpredictability.clamp(0.0, 1.0),
            dodge_chance: config.dodge_chance.clamp(0.0, 1.0),
            dodge_cooldown: DODGE_COOLDOWN,
            last_dodge: None,
            patrol_route: config.patrol_route.clone(),
            patrol_index: 0,
            idle_timer: 0.0,
            max_idle_time: config.max_idle_time,
            evade: None,
            perturbation_enabled: config.perturbation,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AiState {
        self.state
    }

    /// Seconds spent in the current state.
    #[must_use]
    pub const fn state_timer(&self) -> f32 {
        self.state_timer
    }

    /// Whether enough simulated time has passed since the last dodge.
    #[must_use]
    pub fn dodge_ready(&self, now: f64) -> bool {
        self.last_dodge
            .map_or(true, |last| now - last > f64::from(self.dodge_cooldown))
    }

    pub(crate) fn set_state(&mut self, state: AiState) {
        self.state = state;
        self.state_timer = 0.0;
    }

    pub(crate) fn advance_timers(&mut self, dt: f32) {
        self.state_timer += dt;
        self.adapt_timer += dt;
    }
}

impl Actor {
    /// Transitions to `new_state`.
    ///
    /// Returns false when already in that state or dead.
    pub fn change_state(&mut self, new_state: AiState) -> bool {
        let current = self.ai.state();
        if current == new_state || current == AiState::Dead {
            return false;
        }

        debug!("{} AI: {} -> {}", self.name, current, new_state);
        self.ai.set_state(new_state);
        self.speed = self.effective_base_speed() * new_state.speed_multiplier();

        if new_state == AiState::Evade {
            self.ai.evade = None;
            self.ai.last_dodge = Some(self.clock);
        }
        true
    }

    /// Runs one AI step and returns the attacks it produced.
    pub(crate) fn update_ai(
        &mut self,
        dt: f32,
        target: &TargetSnapshot,
        obstacles: &[Obstacle],
        rng: &mut dyn RandomSource,
    ) -> Vec<AttackOutcome> {
        let mut outcomes = Vec::new();
        if self.ai.state() == AiState::Dead {
            return outcomes;
        }
        self.ai.advance_timers(dt);

        let distance = self.position.distance(target.position);
        let angle = self.position.angle_to(target.position);
        if distance < self.vision_range {
            self.ai.last_known_target = Some(target.position);
        }

        match self.ai.state() {
            AiState::Idle => self.update_idle(dt, distance, rng),
            AiState::Patrol => self.update_patrol(distance),
            AiState::Chase => {
                self.update_chase(target, distance, angle, obstacles, rng, &mut outcomes);
            },
            AiState::Attack => self.update_attack(target, distance, angle, rng, &mut outcomes),
            AiState::Evade => self.update_evade(angle, rng),
            AiState::Retreat => self.update_retreat(dt, distance, angle),
            AiState::Dead => {},
        }

        if self.ai.state() == AiState::Attack && self.commitment.is_none() {
            let ctx = self.attack_context(target, distance, angle);
            if let Some(outcome) = self.strategy.opportunistic(&ctx, rng, &mut self.effects) {
                outcomes.push(self.adopt(outcome));
            }
        }

        if self.ai.adapt_timer >= ADAPT_INTERVAL {
            self.adapt();
            self.ai.adapt_timer = 0.0;
        }

        if self.ai.perturbation_enabled && rng.chance(self.ai.unpredictability * dt) {
            let forced = PERTURBATION_STATES[rng.index(PERTURBATION_STATES.len())];
            debug!("{} perturbed toward {}", self.name, forced);
            self.change_state(forced);
        }

        outcomes
    }

    pub(crate) fn attack_context(
        &self,
        target: &TargetSnapshot,
        distance: f32,
        angle: f32,
    ) -> AttackContext {
        AttackContext {
            position: self.position,
            target: target.position,
            distance,
            angle,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            attack_range: self.attack_range,
            state: self.ai.state(),
        }
    }

    /// Stamps an outcome with this actor and applies its side effects.
    fn adopt(&mut self, outcome: AttackOutcome) -> AttackOutcome {
        let outcome = outcome.with_source(self.id, self.position);
        if outcome.kind.is_ability() {
            debug!("{} used {}", self.name, outcome.kind.as_str());
        }
        if let Some(commitment) = outcome.commitment {
            self.commitment = Some(commitment);
            self.velocity = Vec2::ZERO;
        }
        if let Some(impulse) = outcome.impulse {
            self.velocity = impulse;
        }
        outcome
    }

    fn update_idle(&mut self, dt: f32, distance: f32, rng: &mut dyn RandomSource) {
        self.velocity = Vec2::ZERO;

        self.ai.idle_timer += dt;
        if self.ai.idle_timer > self.ai.max_idle_time {
            if distance < self.aggro_range && rng.chance(self.ai.aggressiveness) {
                self.change_state(AiState::Chase);
            } else if !self.ai.patrol_route.is_empty() {
                self.change_state(AiState::Patrol);
            }
            self.ai.idle_timer = 0.0;
        }

        if distance < self.aggro_range {
            self.change_state(AiState::Chase);
        }
    }

    fn update_patrol(&mut self, distance: f32) {
        let Some(&waypoint) = self.ai.patrol_route.get(self.ai.patrol_index) else {
            self.ai.patrol_index = 0;
            self.change_state(AiState::Idle);
            return;
        };

        if self.position.distance(waypoint) > WAYPOINT_RADIUS {
            let direction = (waypoint - self.position).normalized();
            self.velocity = direction * (self.speed * 0.7);
        } else {
            self.ai.patrol_index = (self.ai.patrol_index + 1) % self.ai.patrol_route.len();
            self.change_state(AiState::Idle);
        }

        if distance < self.aggro_range {
            self.change_state(AiState::Chase);
        }
    }

    fn update_chase(
        &mut self,
        target: &TargetSnapshot,
        distance: f32,
        angle: f32,
        obstacles: &[Obstacle],
        rng: &mut dyn RandomSource,
        outcomes: &mut Vec<AttackOutcome>,
    ) {
        if target.threatens()
            && distance < DODGE_TRIGGER_DISTANCE
            && rng.chance(self.ai.dodge_chance)
            && self.ai.dodge_ready(self.clock)
        {
            self.change_state(AiState::Evade);
            return;
        }

        let mut avoid = Vec2::ZERO;
        for obstacle in obstacles {
            let gap = self.position.distance(obstacle.position);
            if gap < OBSTACLE_AVOID_RADIUS {
                let away = Vec2::from_angle(obstacle.position.angle_to(self.position));
                avoid += away * ((OBSTACLE_AVOID_RADIUS - gap) * 0.01);
            }
        }

        if distance > self.attack_range {
            let chase_speed = self.speed * (1.0 + self.ai.aggressiveness * 0.5);
            self.velocity = Vec2::from_angle(angle) * chase_speed + avoid;
        } else {
            self.change_state(AiState::Attack);
            return;
        }

        let ctx = self.attack_context(target, distance, angle);
        if let Some(outcome) = self.strategy.pursue(&ctx, rng, &mut self.effects) {
            outcomes.push(self.adopt(outcome));
        }

        if distance > self.vision_range * 1.5 {
            self.change_state(AiState::Patrol);
        }
    }

    fn update_attack(
        &mut self,
        target: &TargetSnapshot,
        distance: f32,
        angle: f32,
        rng: &mut dyn RandomSource,
        outcomes: &mut Vec<AttackOutcome>,
    ) {
        if distance > self.attack_range * 1.2 {
            self.change_state(AiState::Chase);
            return;
        }

        let toward = Vec2::from_angle(angle);
        self.velocity = if distance < self.attack_range * 0.7 {
            -toward * (self.speed * 0.8)
        } else {
            toward * (self.speed * 0.3)
        };

        if self.attack_timer <= 0.0 && distance <= self.attack_range {
            let ctx = self.attack_context(target, distance, angle);
            let outcome = self.strategy.choose_attack(&ctx, rng, &mut self.effects);
            outcomes.push(self.adopt(outcome));
            self.attack_timer = self.attack_cooldown;

            if rng.chance(self.ai.caution) && self.health < self.max_health * 0.5 {
                self.change_state(AiState::Evade);
            }
        }

        if self.health < self.max_health * 0.3 && rng.chance(0.1) {
            self.change_state(AiState::Retreat);
        }
    }

    fn update_evade(&mut self, angle: f32, rng: &mut dyn RandomSource) {
        self.ai.last_dodge = Some(self.clock);
        let maneuver = *self.ai.evade.get_or_insert_with(|| EvadeManeuver::roll(rng));

        let evade_angle = angle + maneuver.side * FRAC_PI_2;
        self.velocity = Vec2::from_angle(evade_angle) * (self.effective_base_speed() * 2.0);
        self.hit_flash = 0.3;

        if self.ai.state_timer() > maneuver.duration {
            self.change_state(AiState::Chase);
        }
    }

    fn update_retreat(&mut self, dt: f32, distance: f32, angle: f32) {
        self.velocity = -Vec2::from_angle(angle) * (self.speed * 1.2);

        if self.ai.state_timer() > 1.0 {
            self.health = (self.health + self.health_regen * 3.0 * dt).min(self.max_health);
            if self.health > self.max_health * 0.7 || distance > self.vision_range {
                self.change_state(AiState::Chase);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn calm_actor(config: ActorConfig) -> Actor {
        Actor::from_config(config.with_perturbation(false))
    }

    #[test]
    fn test_state_names_round_trip() {
        for state in [
            AiState::Idle,
            AiState::Patrol,
            AiState::Chase,
            AiState::Attack,
            AiState::Evade,
            AiState::Retreat,
            AiState::Dead,
        ] {
            assert_eq!(AiState::from_name(state.as_str()), Some(state));
        }
        assert_eq!(AiState::from_name("dancing"), None);
    }

    #[test]
    fn test_transition_resets_timer_and_speed() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        actor.update(0.05, &far, &[], &mut rng);
        assert!(actor.ai().state_timer() > 0.0);

        assert!(actor.change_state(AiState::Chase));
        assert_eq!(actor.ai().state_timer(), 0.0);
        assert!((actor.speed() - 2.5 * 1.3).abs() < 1e-5);

        assert!(!actor.change_state(AiState::Chase));

        assert!(actor.change_state(AiState::Evade));
        assert!((actor.speed() - 5.0).abs() < 1e-5);

        assert!(actor.change_state(AiState::Attack));
        assert!((actor.speed() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_idle_to_chase_in_aggro_range() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let near = TargetSnapshot::at(Vec2::new(500.0, 300.0));

        actor.update(0.016, &near, &[], &mut rng);
        assert_eq!(actor.state(), AiState::Chase);
    }

    #[test]
    fn test_idle_stays_idle_without_route() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.0);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        for _ in 0..200 {
            actor.update(0.016, &far, &[], &mut rng);
        }
        assert_eq!(actor.state(), AiState::Idle);
        assert_eq!(actor.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_idle_to_patrol_after_idle_time() {
        let config = ActorConfig::default()
            .with_patrol_route(vec![Vec2::new(100.0, 300.0), Vec2::new(400.0, 100.0)]);
        let mut actor = calm_actor(config);
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        for _ in 0..130 {
            actor.update(0.016, &far, &[], &mut rng);
        }
        assert_eq!(actor.state(), AiState::Patrol);

        let before = actor.position();
        actor.update(0.016, &far, &[], &mut rng);
        assert!(actor.position().x < before.x);
    }

    #[test]
    fn test_patrol_without_route_goes_idle() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        actor.change_state(AiState::Patrol);
        actor.update(0.016, &far, &[], &mut rng);
        assert_eq!(actor.state(), AiState::Idle);
    }

    #[test]
    fn test_patrol_advances_waypoint() {
        let config = ActorConfig::default()
            .with_patrol_route(vec![Vec2::new(405.0, 300.0), Vec2::new(100.0, 100.0)]);
        let mut actor = calm_actor(config);
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        actor.change_state(AiState::Patrol);
        actor.update(0.016, &far, &[], &mut rng);
        assert_eq!(actor.ai().patrol_index, 1);
        assert_eq!(actor.state(), AiState::Idle);
    }

    #[test]
    fn test_chase_closes_distance_then_attacks() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(550.0, 300.0));

        actor.change_state(AiState::Chase);
        let before = actor.position().distance(target.position);
        actor.update(0.016, &target, &[], &mut rng);
        let after = actor.position().distance(target.position);
        assert!(after < before);

        for _ in 0..200 {
            actor.update(0.016, &target, &[], &mut rng);
            if actor.state() == AiState::Attack {
                break;
            }
        }
        assert_eq!(actor.state(), AiState::Attack);
    }

    #[test]
    fn test_chase_avoids_obstacles() {
        let mut plain = calm_actor(ActorConfig::default());
        let mut avoiding = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(600.0, 300.0));
        let rock = Obstacle::new(Vec2::new(420.0, 260.0), 10.0);

        plain.change_state(AiState::Chase);
        avoiding.change_state(AiState::Chase);
        plain.update(0.016, &target, &[], &mut rng);
        avoiding.update(0.016, &target, &[rock], &mut rng);

        assert!(avoiding.position().y > plain.position().y);
    }

    #[test]
    fn test_chase_dodges_attacking_target() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.1);
        let target = TargetSnapshot::at(Vec2::new(500.0, 300.0)).with_attacking(true);

        actor.change_state(AiState::Chase);
        actor.update(0.016, &target, &[], &mut rng);
        assert_eq!(actor.state(), AiState::Evade);
        assert!(actor.ai().last_dodge.is_some());
    }

    #[test]
    fn test_dodge_cooldown_enforced() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.1);
        let target = TargetSnapshot::at(Vec2::new(500.0, 300.0)).with_attacking(true);

        actor.change_state(AiState::Chase);
        let mut dodge_times = Vec::new();
        let mut previous = actor.state();
        for _ in 0..400 {
            actor.update(0.016, &target, &[], &mut rng);
            let state = actor.state();
            if previous == AiState::Chase && state == AiState::Evade {
                dodge_times.push(actor.clock());
            }
            if state == AiState::Attack {
                actor.change_state(AiState::Chase);
            }
            previous = actor.state();
        }

        assert!(dodge_times.len() >= 2);
        for pair in dodge_times.windows(2) {
            assert!(pair[1] - pair[0] > 1.5);
        }
    }

    #[test]
    fn test_evade_returns_to_chase() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.5);
        let target = TargetSnapshot::at(Vec2::new(700.0, 300.0));

        actor.change_state(AiState::Evade);
        actor.update(0.016, &target, &[], &mut rng);
        let maneuver = actor.ai().evade.expect("maneuver rolled on first evade tick");
        assert_eq!(maneuver.duration, 0.75);
        assert!(actor.velocity().y.abs() > actor.velocity().x.abs());

        for _ in 0..60 {
            actor.update(0.016, &target, &[], &mut rng);
        }
        assert_eq!(actor.state(), AiState::Chase);
    }

    #[test]
    fn test_attack_hovers_and_strikes() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(470.0, 300.0));

        actor.change_state(AiState::Attack);
        let outcomes = actor.update(0.016, &target, &[], &mut rng);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].damage, 10.0);
        assert_eq!(outcomes[0].source, actor.id());
        assert!(actor.attack_timer() > 0.9);

        let outcomes = actor.update(0.016, &target, &[], &mut rng);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_attack_backs_off_when_too_close() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(420.0, 300.0));

        actor.change_state(AiState::Attack);
        actor.update(0.016, &target, &[], &mut rng);
        assert!(actor.position().x < 400.0);
    }

    #[test]
    fn test_attack_to_chase_when_target_leaves() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(600.0, 300.0));

        actor.change_state(AiState::Attack);
        actor.update(0.016, &target, &[], &mut rng);
        assert_eq!(actor.state(), AiState::Chase);
    }

    #[test]
    fn test_retreat_recovers_then_chases() {
        let mut actor = calm_actor(ActorConfig::default());
        actor.set_health(69.0);
        let mut rng = ScriptedRandom::constant(0.99);
        let target = TargetSnapshot::at(Vec2::new(500.0, 300.0));

        actor.change_state(AiState::Retreat);
        for _ in 0..120 {
            actor.update(0.1, &target, &[], &mut rng);
            if actor.state() != AiState::Retreat {
                break;
            }
        }
        assert_eq!(actor.state(), AiState::Chase);
        assert!(actor.health() > 69.0);
    }

    #[test]
    fn test_adaptation_every_five_seconds() {
        let mut actor = calm_actor(ActorConfig::default());
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        for step in 0..98 {
            actor.update(0.05, &far, &[], &mut rng);
            if step % 20 == 0 {
                let timer = actor.ai().adapt_timer;
                actor.change_state(AiState::Retreat);
                actor.change_state(AiState::Idle);
                assert_eq!(actor.ai().adapt_timer, timer);
            }
        }
        assert_eq!(actor.stats().adaptations, 0);

        for _ in 0..4 {
            actor.update(0.05, &far, &[], &mut rng);
        }
        assert_eq!(actor.stats().adaptations, 1);
        assert!(actor.ai().adapt_timer < 0.2);
    }

    #[test]
    fn test_chase_gives_up_on_lost_target() {
        let mut rng = ScriptedRandom::constant(0.99);

        let mut tracking = calm_actor(ActorConfig::default());
        tracking.change_state(AiState::Chase);
        tracking.update(0.016, &TargetSnapshot::at(Vec2::new(840.0, 300.0)), &[], &mut rng);
        assert_eq!(tracking.state(), AiState::Chase);

        let mut lost = calm_actor(ActorConfig::default());
        lost.change_state(AiState::Chase);
        lost.update(0.016, &TargetSnapshot::at(Vec2::new(900.0, 300.0)), &[], &mut rng);
        assert_eq!(lost.state(), AiState::Patrol);
    }

    #[test]
    fn test_cautious_attack_evades_when_hurt() {
        let target = TargetSnapshot::at(Vec2::new(470.0, 300.0));

        let mut healthy = calm_actor(ActorConfig::default());
        healthy.change_state(AiState::Attack);
        let outcomes = healthy.update(0.016, &target, &[], &mut ScriptedRandom::constant(0.1));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(healthy.state(), AiState::Attack);

        let mut hurt = calm_actor(ActorConfig::default());
        hurt.set_health(40.0);
        hurt.change_state(AiState::Attack);
        let outcomes = hurt.update(0.016, &target, &[], &mut ScriptedRandom::constant(0.1));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(hurt.state(), AiState::Evade);
    }

    #[test]
    fn test_attack_retreats_at_low_health() {
        let target = TargetSnapshot::at(Vec2::new(470.0, 300.0));
        let config = ActorConfig {
            caution: 0.0,
            ..ActorConfig::default()
        };

        let mut steady = calm_actor(config.clone());
        steady.set_health(20.0);
        steady.change_state(AiState::Attack);
        steady.update(0.016, &target, &[], &mut ScriptedRandom::constant(0.5));
        assert_eq!(steady.state(), AiState::Attack);

        let mut fleeing = calm_actor(config);
        fleeing.set_health(20.0);
        fleeing.change_state(AiState::Attack);
        fleeing.update(0.016, &target, &[], &mut ScriptedRandom::constant(0.05));
        assert_eq!(fleeing.state(), AiState::Retreat);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut actor = calm_actor(ActorConfig::default());
        actor.change_state(AiState::Dead);
        for state in PERTURBATION_STATES {
            assert!(!actor.change_state(state));
        }
        assert_eq!(actor.state(), AiState::Dead);
    }

    #[test]
    fn test_perturbation_toggle() {
        let mut rng = ScriptedRandom::constant(0.0);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        let mut calm = calm_actor(ActorConfig::default());
        calm.update(0.016, &far, &[], &mut rng);
        assert_eq!(calm.state(), AiState::Idle);

        let mut restless = Actor::from_config(ActorConfig {
            unpredictability: 1.0,
            ..ActorConfig::default()
        });
        let mut rng = ScriptedRandom::new([0.0, 0.3], 0.99);
        restless.update(0.016, &far, &[], &mut rng);
        assert_eq!(restless.state(), AiState::Patrol);
    }

    #[test]
    fn test_target_threat_proxy() {
        let mut target = TargetSnapshot::at(Vec2::ZERO);
        assert!(!target.threatens());
        target.attack_cooldown = 0.2;
        assert!(target.threatens());
    }
}
