//! The player actor.
//!
//! The player is driven by [`InputFrame`]s rather than AI. Enemies see it
//! through a read-only [`TargetSnapshot`]. Damage flows both ways as
//! [`AttackOutcome`]s applied by the simulation loop.

use floe_common::{ActorId, ArenaBounds, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::TargetSnapshot;
use crate::combat::{AttackKind, AttackOutcome};
use crate::config::PlayerConfig;
use crate::effects::{EffectBuffer, EffectKind, ParticleEffect};
use crate::entity::Actor;
use crate::input::InputFrame;
use crate::random::RandomSource;

/// Particles emitted per swing.
const SWING_PARTICLES: usize = 10;
/// Particles emitted per enemy hit.
const HIT_PARTICLES: usize = 15;
/// Particles emitted per dash.
const DASH_PARTICLES: usize = 8;
/// Dash velocity below which the burst is dropped.
const DASH_REST_SPEED: f32 = 0.1;
/// Per-frame decay of the dash burst.
const DASH_DAMPING: f32 = 0.85;

/// What the player did this tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerIntent {
    /// Swing started this tick, to be applied to enemies
    pub attack: Option<AttackOutcome>,
    /// A dash started
    pub dashed: bool,
}

impl PlayerIntent {
    /// Whether a swing started.
    #[must_use]
    pub fn attacked(&self) -> bool {
        self.attack.is_some()
    }
}

/// Timed status effects applied by enemy attacks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Remaining stun in seconds
    pub stun: f32,
    /// Fraction of speed removed while slowed
    pub slow_amount: f32,
    /// Remaining slow in seconds
    pub slow_remaining: f32,
}

impl PlayerStatus {
    /// Whether the player is stunned.
    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.stun > 0.0
    }

    /// Speed multiplier from the current slow.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        if self.slow_remaining > 0.0 {
            (1.0 - self.slow_amount).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn tick(&mut self, dt: f32) {
        self.stun = (self.stun - dt).max(0.0);
        self.slow_remaining = (self.slow_remaining - dt).max(0.0);
        if self.slow_remaining <= 0.0 {
            self.slow_amount = 0.0;
        }
    }
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    id: ActorId,
    config: PlayerConfig,
    position: Vec2,
    facing: Vec2,
    dash_velocity: Vec2,
    health: f32,
    attack_timer: f32,
    is_attacking: bool,
    invulnerability: f32,
    dash_timer: f32,
    regen_timer: f32,
    status: PlayerStatus,
    combo: u32,
    max_combo: u32,
    score: u64,
    bounds: ArenaBounds,
    effects: EffectBuffer,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl Player {
    /// Creates a player from its configuration.
    #[must_use]
    pub fn new(config: PlayerConfig) -> Self {
        let bounds = ArenaBounds::default();
        Self {
            id: ActorId::new(),
            position: bounds.clamp(config.position),
            facing: Vec2::new(1.0, 0.0),
            dash_velocity: Vec2::ZERO,
            health: config.max_health.max(1.0),
            attack_timer: 0.0,
            is_attacking: false,
            invulnerability: 0.0,
            dash_timer: 0.0,
            regen_timer: 0.0,
            status: PlayerStatus::default(),
            combo: 0,
            max_combo: 0,
            score: 0,
            bounds,
            effects: EffectBuffer::for_actor(),
            config,
        }
    }

    /// Sets the arena bounds and re-clamps the position.
    #[must_use]
    pub fn with_bounds(mut self, bounds: ArenaBounds) -> Self {
        self.bounds = bounds;
        self.position = bounds.clamp(self.position);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Identity stamped on the player's attacks.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleports the player, clamped to the arena.
    pub fn set_position(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = self.bounds.clamp(position);
        }
    }

    /// Last non-zero movement direction.
    #[must_use]
    pub const fn facing(&self) -> Vec2 {
        self.facing
    }

    /// Bounding size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.config.max_health.max(1.0)
    }

    /// Sets health, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, health: f32) {
        if health.is_finite() {
            self.health = health.clamp(0.0, self.max_health());
        }
    }

    /// Whether health is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Whether a swing is in progress.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Remaining attack cooldown.
    #[must_use]
    pub const fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    /// Remaining dash cooldown.
    #[must_use]
    pub const fn dash_timer(&self) -> f32 {
        self.dash_timer
    }

    /// Whether incoming attacks are ignored.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    /// Status effects.
    #[must_use]
    pub const fn status(&self) -> &PlayerStatus {
        &self.status
    }

    /// Movement speed after slows.
    #[must_use]
    pub fn effective_speed(&self) -> f32 {
        self.config.speed * self.status.speed_multiplier()
    }

    /// Current combo.
    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    /// Best combo this match.
    #[must_use]
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Pending particles.
    #[must_use]
    pub const fn effects(&self) -> &EffectBuffer {
        &self.effects
    }

    /// Takes pending particles.
    pub fn drain_effects(&mut self) -> Vec<ParticleEffect> {
        self.effects.drain()
    }

    /// Read-only view handed to enemy AI.
    #[must_use]
    pub fn target_snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            position: self.position,
            is_attacking: self.is_attacking,
            attack_cooldown: self.attack_timer,
            name: self.config.name.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------------

    /// Advances timers, moves, and reads actions for one tick.
    pub fn update(
        &mut self,
        dt: f32,
        frame: &InputFrame,
        rng: &mut dyn RandomSource,
    ) -> PlayerIntent {
        let mut intent = PlayerIntent::default();
        if !self.is_alive() {
            return intent;
        }

        self.tick_timers(dt);
        self.regenerate(dt);

        if self.status.is_stunned() {
            return intent;
        }

        let frame = frame.normalized();
        if frame.has_movement() {
            self.facing = frame.move_vector.normalized();
        }

        let step = frame.move_vector * self.effective_speed() + self.dash_velocity;
        self.position = self.bounds.clamp(self.position + step * (dt * 60.0));
        self.dash_velocity *= DASH_DAMPING;
        if self.dash_velocity.length() < DASH_REST_SPEED {
            self.dash_velocity = Vec2::ZERO;
        }

        if frame.actions.attack && self.begin_attack(rng) {
            intent.attack = Some(self.swing());
        }
        if frame.actions.dodge {
            intent.dashed = self.dash(frame.move_vector, rng);
        }
        if frame.actions.jump {
            debug!("{} jumped", self.config.name);
        }
        if frame.actions.interact {
            debug!("{} interacted", self.config.name);
        }

        intent
    }

    fn tick_timers(&mut self, dt: f32) {
        if self.attack_timer > 0.0 {
            self.attack_timer = (self.attack_timer - dt).max(0.0);
            if self.attack_timer <= 0.0 {
                self.is_attacking = false;
            }
        }
        self.invulnerability = (self.invulnerability - dt).max(0.0);
        self.dash_timer = (self.dash_timer - dt).max(0.0);
        self.status.tick(dt);
    }

    fn regenerate(&mut self, dt: f32) {
        let interval = self.config.regen_interval;
        if interval <= 0.0 {
            return;
        }
        self.regen_timer += dt;
        while self.regen_timer >= interval {
            self.regen_timer -= interval;
            if self.health < self.max_health() {
                self.health = (self.health + 1.0).min(self.max_health());
            }
        }
    }

    fn begin_attack(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.attack_timer > 0.0 {
            return false;
        }
        self.is_attacking = true;
        self.attack_timer = self.config.attack_cooldown;
        self.effects.scatter(
            rng,
            EffectKind::PlayerAttack,
            self.position,
            SWING_PARTICLES,
            Vec2::ZERO,
            5.0,
        );
        true
    }

    fn dash(&mut self, direction: Vec2, rng: &mut dyn RandomSource) -> bool {
        if self.dash_timer > 0.0 {
            return false;
        }
        let direction = if direction.length() > 0.0 {
            direction.normalized()
        } else {
            self.facing
        };
        self.dash_velocity = direction * self.config.dash_speed;
        self.dash_timer = self.config.dash_cooldown;
        self.invulnerability = self.invulnerability.max(self.config.dash_invulnerability);
        self.effects.scatter(
            rng,
            EffectKind::Dash,
            self.position,
            DASH_PARTICLES,
            Vec2::new(10.0, 10.0),
            1.0,
        );
        debug!("{} dashed", self.config.name);
        true
    }

    // ------------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------------

    /// Outcome of a swing from the current position, hitting everything
    /// within the attack radius.
    fn swing(&self) -> AttackOutcome {
        AttackOutcome::new(
            AttackKind::Normal,
            self.config.damage,
            self.facing.angle(),
            self.config.attack_radius,
        )
        .with_source(self.id, self.position)
    }

    /// Credits a swing that landed on `enemy`: combo, score and hit particles.
    pub fn record_hit(&mut self, enemy: &Actor, rng: &mut dyn RandomSource) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.score += 10 * u64::from(self.combo);
        self.effects.scatter(
            rng,
            EffectKind::Hit,
            enemy.position(),
            HIT_PARTICLES,
            Vec2::ZERO,
            10.0,
        );
        debug!(
            "{} hit {} for {}, combo {}",
            self.config.name,
            enemy.name(),
            self.config.damage,
            self.combo
        );
    }

    /// Applies an enemy attack. Returns true if it landed.
    pub fn apply_outcome(&mut self, outcome: &AttackOutcome, rng: &mut dyn RandomSource) -> bool {
        if !self.is_alive() || self.is_invulnerable() || !outcome.reaches(self.position) {
            return false;
        }
        if !outcome.damage.is_finite() || outcome.damage <= 0.0 {
            return false;
        }

        self.health = (self.health - outcome.damage).max(0.0);
        self.invulnerability = self.config.hit_invulnerability;
        self.combo = 0;

        if outcome.stun_chance > 0.0 && rng.chance(outcome.stun_chance) {
            self.status.stun = self.status.stun.max(self.config.stun_duration);
        }
        if let Some(slow) = outcome.slow {
            self.status.slow_amount = slow.amount.clamp(0.0, 1.0);
            self.status.slow_remaining = slow.duration.max(0.0);
        }

        if self.is_alive() {
            debug!(
                "{} took {} from {} ({})",
                self.config.name,
                outcome.damage,
                outcome.source,
                outcome.kind.as_str()
            );
        } else {
            info!("{} was defeated by {}", self.config.name, outcome.source);
        }
        true
    }
}
