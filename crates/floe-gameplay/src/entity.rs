//! Combat actors.
//!
//! An `Actor` composes the shared combat attributes with an AI profile,
//! adaptive statistics, action memory, a pending-effect buffer and a
//! `CombatStrategy` that decides how it attacks.

use floe_common::{ActorId, ArenaBounds, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adaptation::BehaviorStats;
use crate::ai::{AIProfile, AiState, Obstacle, TargetSnapshot};
use crate::combat::{strategy_for, AttackKind, AttackOutcome, CombatStrategy, Commitment};
use crate::config::{ActorConfig, ActorKind};
use crate::effects::{EffectBuffer, EffectKind, ParticleEffect};
use crate::memory::{ActionKind, ActionMemory, ActionRecord};
use crate::random::RandomSource;
use crate::time::normalize_dt;

/// Invulnerability granted after taking damage, in seconds.
pub const DAMAGE_INVULNERABILITY: f32 = 0.3;
/// Hit flash duration after taking damage, in seconds.
pub const HIT_FLASH_DURATION: f32 = 0.5;
/// Fraction of max health above which a single hit may cause a retreat.
pub const HEAVY_DAMAGE_FRACTION: f32 = 0.2;
/// Chance to retreat after a heavy hit.
pub const HEAVY_DAMAGE_RETREAT_CHANCE: f32 = 0.7;
/// Health fraction below which hits make the actor more aggressive.
pub const ENRAGE_HEALTH_FRACTION: f32 = 0.4;
/// Velocity retained per tick.
pub const VELOCITY_DAMPING: f32 = 0.9;

/// Result of a `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Invulnerable, dead or non-positive amount
    Ignored,
    /// Damage applied, actor survived
    Applied,
    /// Damage applied, actor died
    Killed,
}

impl DamageResult {
    /// Whether health changed.
    #[must_use]
    pub const fn landed(self) -> bool {
        matches!(self, Self::Applied | Self::Killed)
    }
}

/// Animation tag exposed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationTag {
    /// Standing
    #[default]
    Idle,
    /// Moving
    Walk,
    /// Attacking
    Attack,
    /// Recoiling from a hit
    Hurt,
    /// Committed belly flop
    Flop,
    /// Dying
    Death,
}

impl AnimationTag {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Attack => "attack",
            Self::Hurt => "hurt",
            Self::Flop => "flop",
            Self::Death => "death",
        }
    }
}

/// Everything the renderer needs to draw an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRenderState {
    /// Actor identifier
    pub id: ActorId,
    /// World position
    pub position: Vec2,
    /// Bounding size (width, height)
    pub size: Vec2,
    /// Health fraction 0-1
    pub health_fraction: f32,
    /// AI state
    pub state: AiState,
    /// Animation tag
    pub animation: AnimationTag,
    /// Upward draw offset
    pub vertical_offset: f32,
    /// Remaining hit flash
    pub hit_flash: f32,
}

/// A combat actor.
#[derive(Debug)]
pub struct Actor {
    pub(crate) id: ActorId,
    pub(crate) name: String,
    pub(crate) kind: ActorKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) speed: f32,
    pub(crate) base_speed: f32,
    pub(crate) speed_factor: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) health_regen: f32,
    pub(crate) invulnerability: f32,
    pub(crate) hit_flash: f32,
    pub(crate) damage: f32,
    pub(crate) base_damage: f32,
    pub(crate) damage_growth_cap: Option<f32>,
    pub(crate) attack_range: f32,
    pub(crate) attack_cooldown: f32,
    pub(crate) attack_timer: f32,
    pub(crate) vision_range: f32,
    pub(crate) aggro_range: f32,
    pub(crate) active: bool,
    pub(crate) remote: bool,
    pub(crate) bounds: ArenaBounds,
    pub(crate) clock: f64,
    pub(crate) ai: AIProfile,
    pub(crate) stats: BehaviorStats,
    pub(crate) memory: ActionMemory,
    pub(crate) effects: EffectBuffer,
    pub(crate) commitment: Option<Commitment>,
    pub(crate) strategy: Box<dyn CombatStrategy>,
}

impl Actor {
    /// Creates an actor with an explicit strategy.
    #[must_use]
    pub fn new(mut config: ActorConfig, strategy: Box<dyn CombatStrategy>) -> Self {
        config.validate();
        let bounds = ArenaBounds::default();
        Self {
            id: ActorId::new(),
            name: config.name.clone(),
            kind: config.kind,
            position: bounds.clamp(config.position),
            velocity: Vec2::ZERO,
            width: config.width,
            height: config.height,
            speed: config.speed,
            base_speed: config.speed,
            speed_factor: 1.0,
            health: config.initial_health(),
            max_health: config.max_health,
            health_regen: config.health_regen,
            invulnerability: 0.0,
            hit_flash: 0.0,
            damage: config.damage,
            base_damage: config.damage,
            damage_growth_cap: config.damage_growth_cap,
            attack_range: config.attack_range,
            attack_cooldown: config.attack_cooldown,
            attack_timer: 0.0,
            vision_range: config.vision_range,
            aggro_range: config.aggro_range,
            active: true,
            remote: config.remote,
            bounds,
            clock: 0.0,
            ai: AIProfile::from_config(&config),
            stats: BehaviorStats::new(),
            memory: ActionMemory::new(),
            effects: EffectBuffer::for_actor(),
            commitment: None,
            strategy,
        }
    }

    /// Creates an actor with the default strategy for its kind.
    #[must_use]
    pub fn from_config(config: ActorConfig) -> Self {
        let strategy = strategy_for(&config);
        Self::new(config, strategy)
    }

    /// Confines the actor to different arena bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: ArenaBounds) -> Self {
        self.bounds = bounds;
        self.position = bounds.clamp(self.position);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Actor identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Actor kind.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity per nominal frame.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Bounding size.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Current speed including the state multiplier.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Configured base speed.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Base speed after adaptation, before state multipliers.
    ///
    /// The adaptive speed factor persists across transitions, so a state
    /// without a multiplier reverts to this rather than the configured speed.
    #[must_use]
    pub fn effective_base_speed(&self) -> f32 {
        self.base_speed * self.speed_factor
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Health as a fraction of maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Current attack damage.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Attack reach.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Remaining time before the next attack.
    #[must_use]
    pub const fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    /// Whether the actor is still in play.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the actor is driven by network snapshots.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Marks the actor as driven by network snapshots.
    pub fn set_remote(&mut self, remote: bool) {
        self.remote = remote;
    }

    /// Whether incoming damage is currently ignored.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    /// Remaining hit flash.
    #[must_use]
    pub const fn hit_flash(&self) -> f32 {
        self.hit_flash
    }

    /// Current AI state.
    #[must_use]
    pub const fn state(&self) -> AiState {
        self.ai.state()
    }

    /// AI profile.
    #[must_use]
    pub const fn ai(&self) -> &AIProfile {
        &self.ai
    }

    /// Mutable AI profile.
    pub fn ai_mut(&mut self) -> &mut AIProfile {
        &mut self.ai
    }

    /// Adaptive statistics.
    #[must_use]
    pub const fn stats(&self) -> &BehaviorStats {
        &self.stats
    }

    /// Action memory.
    #[must_use]
    pub const fn memory(&self) -> &ActionMemory {
        &self.memory
    }

    /// Active commitment, if any.
    #[must_use]
    pub const fn commitment(&self) -> Option<&Commitment> {
        self.commitment.as_ref()
    }

    /// Combat strategy.
    #[must_use]
    pub fn strategy(&self) -> &dyn CombatStrategy {
        self.strategy.as_ref()
    }

    /// Simulation seconds this actor has been updated for.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Pending particle effects.
    #[must_use]
    pub const fn effects(&self) -> &EffectBuffer {
        &self.effects
    }

    /// Removes and returns pending particle effects.
    pub fn drain_effects(&mut self) -> Vec<ParticleEffect> {
        self.effects.drain()
    }

    /// Moves the actor, clamped to the arena.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = self.bounds.clamp(position);
    }

    /// Sets health, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, health: f32) {
        if health.is_finite() {
            self.health = health.clamp(0.0, self.max_health);
        }
    }

    /// Upward draw offset from an active commitment.
    #[must_use]
    pub fn vertical_offset(&self) -> f32 {
        self.commitment.map_or(0.0, |c| c.vertical_offset())
    }

    /// Animation tag for the current frame.
    #[must_use]
    pub fn animation(&self) -> AnimationTag {
        if self.ai.state() == AiState::Dead {
            return AnimationTag::Death;
        }
        if self.commitment.is_some() {
            return AnimationTag::Flop;
        }
        match self.ai.state() {
            AiState::Attack => AnimationTag::Attack,
            AiState::Evade => AnimationTag::Walk,
            _ if self.hit_flash > 0.0 => AnimationTag::Hurt,
            AiState::Idle => AnimationTag::Idle,
            _ => AnimationTag::Walk,
        }
    }

    /// Render view of the actor.
    #[must_use]
    pub fn render_state(&self) -> ActorRenderState {
        ActorRenderState {
            id: self.id,
            position: self.position,
            size: self.size(),
            health_fraction: self.health_fraction(),
            state: self.ai.state(),
            animation: self.animation(),
            vertical_offset: self.vertical_offset(),
            hit_flash: self.hit_flash.max(0.0),
        }
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Advances the actor by one tick and returns the attacks it made.
    pub fn update(
        &mut self,
        dt: f32,
        target: &TargetSnapshot,
        obstacles: &[Obstacle],
        rng: &mut dyn RandomSource,
    ) -> Vec<AttackOutcome> {
        if !self.active {
            return Vec::new();
        }
        let dt = normalize_dt(dt);
        self.clock += f64::from(dt);

        self.strategy.tick(dt);
        self.attack_timer = (self.attack_timer - dt).max(0.0);
        self.invulnerability = (self.invulnerability - dt).max(0.0);

        if self.health < self.max_health && self.ai.state() != AiState::Chase {
            self.health = (self.health + self.health_regen * dt).min(self.max_health);
        }

        let outcomes = if self.remote {
            Vec::new()
        } else if let Some(commitment) = self.commitment.as_mut() {
            self.velocity = Vec2::ZERO;
            if commitment.advance(dt) {
                let finished = *commitment;
                self.commitment = None;
                if let Some(wave) = finished.shockwave {
                    self.effects
                        .ring(wave.kind, self.position, wave.step_degrees, wave.speed);
                }
            }
            Vec::new()
        } else {
            self.update_ai(dt, target, obstacles, rng)
        };

        self.update_physics(dt);
        self.hit_flash = (self.hit_flash - dt).max(0.0);

        if self.health < self.max_health {
            let bonus = self.strategy.bonus_regeneration(rng);
            if bonus > 0.0 {
                self.health = (self.health + bonus).min(self.max_health);
            }
        }

        outcomes
    }

    fn update_physics(&mut self, dt: f32) {
        if self.commitment.is_some() {
            self.velocity = Vec2::ZERO;
        }
        self.position += self.velocity * (dt * 60.0);
        self.velocity *= VELOCITY_DAMPING;
        self.position = self.bounds.clamp(self.position);
    }

    // ------------------------------------------------------------------
    // Damage
    // ------------------------------------------------------------------

    /// Applies incoming damage.
    pub fn take_damage(&mut self, amount: f32, rng: &mut dyn RandomSource) -> DamageResult {
        if !self.active || self.ai.state() == AiState::Dead {
            return DamageResult::Ignored;
        }
        if self.is_invulnerable() || !amount.is_finite() || amount <= 0.0 {
            return DamageResult::Ignored;
        }

        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        self.hit_flash = HIT_FLASH_DURATION;
        self.invulnerability = DAMAGE_INVULNERABILITY;
        self.stats.damage_taken += amount;
        debug!(
            "{} took {:.1} damage, HP {:.1} -> {:.1}",
            self.name, amount, before, self.health
        );

        if self.health <= 0.0 {
            self.die(rng);
            return DamageResult::Killed;
        }

        if amount > self.max_health * HEAVY_DAMAGE_FRACTION
            && rng.chance(HEAVY_DAMAGE_RETREAT_CHANCE)
        {
            self.change_state(AiState::Retreat);
        }
        if self.health < self.max_health * ENRAGE_HEALTH_FRACTION {
            self.ai.aggressiveness = (self.ai.aggressiveness * 1.3).min(1.0);
        }

        self.strategy.on_damage_taken(amount, &mut self.ai);
        self.record_action(ActionKind::DamageTaken, true);
        DamageResult::Applied
    }

    /// Applies an attack made by another combatant.
    ///
    /// Ignored when this actor is out of the attack's reach.
    pub fn apply_outcome(
        &mut self,
        outcome: &AttackOutcome,
        rng: &mut dyn RandomSource,
    ) -> DamageResult {
        if !outcome.reaches(self.position) {
            return DamageResult::Ignored;
        }
        self.take_damage(outcome.damage, rng)
    }

    fn die(&mut self, rng: &mut dyn RandomSource) {
        info!("{} died", self.name);
        self.change_state(AiState::Dead);
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.commitment = None;

        for _ in 0..15 {
            let offset = Vec2::new(rng.signed() * 25.0, rng.signed() * 25.0);
            let velocity = Vec2::new(rng.signed() * 5.0, rng.signed() * 5.0);
            self.effects.push(
                ParticleEffect::new(EffectKind::Death, self.position + offset, velocity)
                    .with_lifetime(1.0 + rng.next_f32() * 2.0),
            );
        }
        self.strategy.on_death(self.position, rng, &mut self.effects);
    }

    // ------------------------------------------------------------------
    // Outcome bookkeeping
    // ------------------------------------------------------------------

    /// Records whether an attack this actor made landed.
    pub fn record_attack_result(&mut self, kind: AttackKind, landed: bool) {
        self.record_action(ActionKind::Attack(kind), landed);
    }

    /// Adds to the damage this actor has dealt.
    pub fn record_damage_dealt(&mut self, amount: f32) {
        if amount > 0.0 {
            self.stats.damage_dealt += amount;
        }
    }

    fn record_action(&mut self, action: ActionKind, success: bool) {
        self.memory.record(ActionRecord {
            action,
            success,
            timestamp: self.clock,
            state: self.ai.state(),
            health: self.health,
        });
        self.stats.record(success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use proptest::prelude::*;

    fn actor() -> Actor {
        Actor::from_config(ActorConfig::default().with_perturbation(false))
    }

    #[test]
    fn test_actor_creation() {
        let actor = actor();
        assert!(actor.is_active());
        assert_eq!(actor.state(), AiState::Idle);
        assert_eq!(actor.health(), 100.0);
        assert_eq!(actor.position(), Vec2::new(400.0, 300.0));
        assert_eq!(actor.animation(), AnimationTag::Idle);
    }

    #[test]
    fn test_spawn_clamped_to_arena() {
        let actor = Actor::from_config(ActorConfig::default().with_position(-100.0, 900.0));
        assert_eq!(actor.position(), Vec2::new(50.0, 550.0));
    }

    #[test]
    fn test_heavy_hit_retreats() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.5);

        assert_eq!(actor.take_damage(25.0, &mut rng), DamageResult::Applied);
        assert_eq!(actor.health(), 75.0);
        assert_eq!(actor.state(), AiState::Retreat);
        assert!(actor.is_invulnerable());
        assert_eq!(actor.hit_flash(), HIT_FLASH_DURATION);
        assert_eq!(actor.stats().damage_taken, 25.0);
        assert_eq!(
            actor.memory().last().map(|r| r.action),
            Some(ActionKind::DamageTaken)
        );
    }

    #[test]
    fn test_heavy_hit_roll_can_fail() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.8);
        actor.take_damage(25.0, &mut rng);
        assert_eq!(actor.state(), AiState::Idle);
    }

    #[test]
    fn test_invulnerability_gate() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.9);

        actor.take_damage(5.0, &mut rng);
        assert_eq!(actor.take_damage(5.0, &mut rng), DamageResult::Ignored);
        assert_eq!(actor.health(), 95.0);

        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));
        for _ in 0..20 {
            actor.update(0.016, &far, &[], &mut rng);
        }
        assert!(!actor.is_invulnerable());
        assert_eq!(actor.take_damage(5.0, &mut rng), DamageResult::Applied);
    }

    #[test]
    fn test_invalid_damage_ignored() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.9);
        assert_eq!(actor.take_damage(0.0, &mut rng), DamageResult::Ignored);
        assert_eq!(actor.take_damage(-3.0, &mut rng), DamageResult::Ignored);
        assert_eq!(actor.take_damage(f32::NAN, &mut rng), DamageResult::Ignored);
        assert_eq!(actor.health(), 100.0);
    }

    #[test]
    fn test_outcome_needs_reach() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.9);
        let swing = AttackOutcome::new(AttackKind::Normal, 10.0, 0.0, 80.0)
            .with_source(ActorId::from_raw(1), Vec2::new(300.0, 300.0));

        assert_eq!(actor.apply_outcome(&swing, &mut rng), DamageResult::Ignored);
        assert_eq!(actor.health(), 100.0);

        let close = swing.with_source(ActorId::from_raw(1), Vec2::new(350.0, 300.0));
        assert_eq!(actor.apply_outcome(&close, &mut rng), DamageResult::Applied);
        assert_eq!(actor.health(), 90.0);
    }

    #[test]
    fn test_low_health_enrages() {
        let mut actor = actor();
        actor.set_health(40.0);
        let mut rng = ScriptedRandom::constant(0.9);

        actor.take_damage(5.0, &mut rng);
        assert!((actor.ai().aggressiveness - 0.91).abs() < 1e-5);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut actor = actor();
        let mut rng = ScriptedRandom::constant(0.5);

        assert_eq!(actor.take_damage(150.0, &mut rng), DamageResult::Killed);
        assert_eq!(actor.health(), 0.0);
        assert_eq!(actor.state(), AiState::Dead);
        assert!(!actor.is_active());
        assert_eq!(actor.effects().len(), 15);
        assert_eq!(actor.animation(), AnimationTag::Death);

        assert!(!actor.change_state(AiState::Chase));
        assert_eq!(actor.take_damage(10.0, &mut rng), DamageResult::Ignored);
        let near = TargetSnapshot::at(Vec2::new(450.0, 300.0));
        assert!(actor.update(0.016, &near, &[], &mut rng).is_empty());
        assert_eq!(actor.state(), AiState::Dead);
    }

    #[test]
    fn test_seal_death_adds_particles() {
        let mut seal = Actor::from_config(ActorConfig::seal());
        let mut rng = ScriptedRandom::constant(0.5);
        seal.take_damage(30.0, &mut rng);
        assert_eq!(seal.drain_effects().len(), 40);
        assert!(seal.effects().is_empty());
    }

    #[test]
    fn test_regeneration_outside_chase() {
        let mut actor = actor();
        actor.set_health(50.0);
        let mut rng = ScriptedRandom::constant(0.99);
        let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));

        actor.update(0.1, &far, &[], &mut rng);
        assert!((actor.health() - 50.01).abs() < 1e-4);

        actor.change_state(AiState::Chase);
        let before = actor.health();
        actor.update(0.05, &far, &[], &mut rng);
        assert_eq!(actor.health(), before);
    }

    #[test]
    fn test_physics_damping() {
        let mut actor = actor();
        actor.velocity = Vec2::new(10.0, 0.0);
        actor.update_physics(1.0 / 60.0);
        assert!((actor.position().x - 410.0).abs() < 1e-3);
        assert!((actor.velocity().x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_record_attack_result() {
        let mut actor = actor();
        actor.record_attack_result(AttackKind::Normal, true);
        actor.record_attack_result(AttackKind::Heavy, false);
        actor.record_damage_dealt(10.0);

        assert_eq!(actor.stats().successful, 1);
        assert_eq!(actor.stats().failed, 1);
        assert_eq!(actor.stats().damage_dealt, 10.0);
        assert_eq!(actor.memory().len(), 2);
    }

    #[test]
    fn test_belly_flop_commitment_freezes_actor() {
        let mut seal = Actor::from_config(ActorConfig::seal().with_perturbation(false));
        let mut rng = ScriptedRandom::constant(0.1);
        let target = TargetSnapshot::at(Vec2::new(430.0, 300.0));

        seal.change_state(AiState::Attack);
        let outcomes = seal.update(0.016, &target, &[], &mut rng);
        assert_eq!(outcomes[0].kind, AttackKind::BellyFlop);
        assert!(seal.commitment().is_some());
        assert_eq!(seal.animation(), AnimationTag::Flop);
        seal.drain_effects();

        let frozen = seal.position();
        seal.update(0.1, &target, &[], &mut rng);
        assert_eq!(seal.position(), frozen);
        assert!(seal.vertical_offset() > 0.0);

        seal.update(0.1, &target, &[], &mut rng);
        seal.update(0.1, &target, &[], &mut rng);
        assert!(seal.commitment().is_none());
        assert_eq!(seal.vertical_offset(), 0.0);
        let shockwave = seal
            .effects()
            .iter()
            .filter(|p| p.kind == EffectKind::Shockwave)
            .count();
        assert_eq!(shockwave, 24);
    }

    #[test]
    fn test_remote_actor_skips_ai() {
        let mut actor = actor();
        actor.set_remote(true);
        let mut rng = ScriptedRandom::constant(0.1);
        let near = TargetSnapshot::at(Vec2::new(450.0, 300.0));
        actor.update(0.016, &near, &[], &mut rng);
        assert_eq!(actor.state(), AiState::Idle);
    }

    proptest! {
        #[test]
        fn prop_health_bounded(
            hits in proptest::collection::vec((-50.0f32..200.0, 0.0f32..1.0, 0.0f32..0.1), 1..60)
        ) {
            let mut actor = actor();
            let far = TargetSnapshot::at(Vec2::new(750.0, 550.0));
            for (amount, roll, dt) in hits {
                let mut rng = ScriptedRandom::constant(roll);
                actor.take_damage(amount, &mut rng);
                prop_assert!(actor.health() >= 0.0);
                prop_assert!(actor.health() <= actor.max_health());
                actor.update(dt, &far, &[], &mut rng);
                prop_assert!(actor.health() >= 0.0);
                prop_assert!(actor.health() <= actor.max_health());
            }
        }

        #[test]
        fn prop_invulnerable_hits_change_nothing(first in 1.0f32..50.0, second in 1.0f32..50.0) {
            let mut actor = actor();
            let mut rng = ScriptedRandom::constant(0.9);
            actor.take_damage(first, &mut rng);
            let health = actor.health();
            prop_assert_eq!(actor.take_damage(second, &mut rng), DamageResult::Ignored);
            prop_assert_eq!(actor.health(), health);
        }
    }
}
