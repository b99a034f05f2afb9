//! Combat resolution for enemy actors.
//!
//! This module provides:
//! - Attack kinds and the `AttackOutcome` the simulation applies to a target
//! - Commitments: short uninterruptible sub-states requested by an attack
//! - The `CombatStrategy` seam that boss overlays plug into
//! - `BaseStrategy`, the generic enemy attack

use std::collections::BTreeMap;
use std::f32::consts::PI;

use floe_common::{ActorId, Vec2};
use serde::{Deserialize, Serialize};

use crate::abilities::SlowEffect;
use crate::ai::{AIProfile, AiState};
use crate::boss::SealStrategy;
use crate::config::{ActorConfig, ActorKind};
use crate::effects::{EffectBuffer, EffectKind, ParticleEffect};
use crate::random::RandomSource;
use crate::snapshot::SnapshotValue;

/// Distance below which a base attack may become heavy.
pub const HEAVY_ATTACK_DISTANCE: f32 = 50.0;
/// Chance of a heavy attack when close enough.
pub const HEAVY_ATTACK_CHANCE: f32 = 0.3;
/// Health fraction below which attacks become desperate.
pub const DESPERATE_HEALTH_FRACTION: f32 = 0.4;

/// Kind of attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// Regular attack
    Normal,
    /// Close-range heavy attack
    Heavy,
    /// Attack made at low health
    Desperate,
    /// Seal belly flop
    BellyFlop,
    /// Seal ice scream
    IceScream,
    /// Seal slide attack
    SlideAttack,
}

impl AttackKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Heavy => "heavy",
            Self::Desperate => "desperate",
            Self::BellyFlop => "belly_flop",
            Self::IceScream => "ice_scream",
            Self::SlideAttack => "slide_attack",
        }
    }

    /// Whether this is a special ability rather than a base attack.
    #[must_use]
    pub const fn is_ability(self) -> bool {
        matches!(self, Self::BellyFlop | Self::IceScream | Self::SlideAttack)
    }
}

/// Particles emitted when a commitment ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    /// Particle kind
    pub kind: EffectKind,
    /// Angular step between particles
    pub step_degrees: u32,
    /// Particle speed per nominal frame
    pub speed: f32,
}

/// An uninterruptible presentation sub-state.
///
/// While a commitment is active the owning actor skips AI and movement. The
/// arc it describes is purely visual and never moves the actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commitment {
    /// Attack that requested the commitment
    pub kind: AttackKind,
    /// Progress from 0 to 1
    pub progress: f32,
    /// Progress per second
    pub rate: f32,
    /// Peak of the vertical arc
    pub height: f32,
    /// Particles emitted on completion
    pub shockwave: Option<Shockwave>,
}

impl Commitment {
    /// Belly flop arc: 0.25 s, ending in a ring of 24 particles.
    #[must_use]
    pub const fn belly_flop(height: f32) -> Self {
        Self {
            kind: AttackKind::BellyFlop,
            progress: 0.0,
            rate: 4.0,
            height,
            shockwave: Some(Shockwave {
                kind: EffectKind::Shockwave,
                step_degrees: 15,
                speed: 6.0,
            }),
        }
    }

    /// Advances the commitment. Returns true once it has completed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.progress += dt * self.rate;
        self.is_finished()
    }

    /// Whether the commitment has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Upward render offset for the current progress.
    #[must_use]
    pub fn vertical_offset(&self) -> f32 {
        if self.is_finished() {
            0.0
        } else {
            (self.progress * PI).sin() * self.height
        }
    }
}

/// Result of an attack attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    /// Attacking actor
    pub source: ActorId,
    /// Attacker position when the attack was made
    pub origin: Vec2,
    /// Kind of attack
    pub kind: AttackKind,
    /// Cosmetic variant, e.g. `seal_slap`
    pub subtype: Option<&'static str>,
    /// Damage dealt on hit
    pub damage: f32,
    /// Direction of the attack in radians
    pub angle: f32,
    /// Area radius, if the attack hits an area
    pub area: Option<f32>,
    /// Chance to stun on hit
    pub stun_chance: f32,
    /// Slow applied on hit
    pub slow: Option<SlowEffect>,
    /// Reach of the attack
    pub range: f32,
    /// Whether the attack was carried out
    pub success: bool,
    /// Commitment the attacker enters
    pub commitment: Option<Commitment>,
    /// Velocity the attacker takes on
    pub impulse: Option<Vec2>,
}

impl AttackOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn new(kind: AttackKind, damage: f32, angle: f32, range: f32) -> Self {
        Self {
            source: ActorId::NULL,
            origin: Vec2::ZERO,
            kind,
            subtype: None,
            damage,
            angle,
            area: None,
            stun_chance: 0.0,
            slow: None,
            range,
            success: true,
            commitment: None,
            impulse: None,
        }
    }

    /// Sets the area radius.
    #[must_use]
    pub fn with_area(mut self, area: f32) -> Self {
        self.area = Some(area);
        self
    }

    /// Sets the stun chance.
    #[must_use]
    pub fn with_stun_chance(mut self, chance: f32) -> Self {
        self.stun_chance = chance;
        self
    }

    /// Sets the slow effect.
    #[must_use]
    pub fn with_slow(mut self, slow: Option<SlowEffect>) -> Self {
        self.slow = slow;
        self
    }

    /// Sets the cosmetic variant.
    #[must_use]
    pub fn with_subtype(mut self, subtype: &'static str) -> Self {
        self.subtype = Some(subtype);
        self
    }

    /// Requests a commitment.
    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Gives the attacker a velocity burst.
    #[must_use]
    pub fn with_impulse(mut self, impulse: Vec2) -> Self {
        self.impulse = Some(impulse);
        self
    }

    /// Stamps the attacker identity and position.
    #[must_use]
    pub fn with_source(mut self, source: ActorId, origin: Vec2) -> Self {
        self.source = source;
        self.origin = origin;
        self
    }

    /// Distance within which the attack connects.
    #[must_use]
    pub fn reach(&self) -> f32 {
        self.area.unwrap_or(self.range)
    }

    /// Whether a target at `position` is within reach.
    #[must_use]
    pub fn reaches(&self, position: Vec2) -> bool {
        self.success && self.origin.distance(position) <= self.reach()
    }
}

/// Read-only view of the attacker handed to a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackContext {
    /// Attacker position
    pub position: Vec2,
    /// Target position
    pub target: Vec2,
    /// Distance to the target
    pub distance: f32,
    /// Angle toward the target
    pub angle: f32,
    /// Current health
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Current damage
    pub damage: f32,
    /// Attack reach
    pub attack_range: f32,
    /// Current AI state
    pub state: AiState,
}

impl AttackContext {
    /// Health as a fraction of maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

/// Attack behavior plugged into an actor.
pub trait CombatStrategy: std::fmt::Debug {
    /// Advances internal cooldowns.
    fn tick(&mut self, _dt: f32) {}

    /// Chooses and performs an attack.
    fn choose_attack(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> AttackOutcome;

    /// Ability fired outside the attack timer while attacking.
    fn opportunistic(
        &mut self,
        _ctx: &AttackContext,
        _rng: &mut dyn RandomSource,
        _effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        None
    }

    /// Ability fired while chasing.
    fn pursue(
        &mut self,
        _ctx: &AttackContext,
        _rng: &mut dyn RandomSource,
        _effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        None
    }

    /// Reacts to damage that left the actor alive.
    fn on_damage_taken(&mut self, _amount: f32, _ai: &mut AIProfile) {}

    /// Emits death effects.
    fn on_death(&mut self, _position: Vec2, _rng: &mut dyn RandomSource, _effects: &mut EffectBuffer) {}

    /// Extra health restored this tick. Only called while damaged.
    fn bonus_regeneration(&mut self, _rng: &mut dyn RandomSource) -> f32 {
        0.0
    }

    /// Strategy-specific snapshot fields.
    fn snapshot_fields(&self, _commitment: Option<&Commitment>) -> BTreeMap<String, SnapshotValue> {
        BTreeMap::new()
    }
}

/// Performs the generic enemy attack.
pub fn base_attack(
    ctx: &AttackContext,
    rng: &mut dyn RandomSource,
    effects: &mut EffectBuffer,
) -> AttackOutcome {
    let kind = if ctx.distance < HEAVY_ATTACK_DISTANCE && rng.chance(HEAVY_ATTACK_CHANCE) {
        AttackKind::Heavy
    } else if ctx.health_fraction() < DESPERATE_HEALTH_FRACTION {
        AttackKind::Desperate
    } else {
        AttackKind::Normal
    };

    effects.push(ParticleEffect::new(
        EffectKind::Attack,
        ctx.position + Vec2::from_angle(ctx.angle) * 30.0,
        Vec2::ZERO,
    ));

    AttackOutcome::new(kind, ctx.damage, ctx.angle, ctx.attack_range)
}

/// Generic enemy strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseStrategy;

impl CombatStrategy for BaseStrategy {
    fn choose_attack(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> AttackOutcome {
        base_attack(ctx, rng, effects)
    }
}

/// Builds the strategy an actor config asks for.
#[must_use]
pub fn strategy_for(config: &ActorConfig) -> Box<dyn CombatStrategy> {
    match config.kind {
        ActorKind::Grunt => Box::new(BaseStrategy),
        ActorKind::Seal => Box::new(SealStrategy::new(config.seal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn context(distance: f32, health: f32) -> AttackContext {
        AttackContext {
            position: Vec2::new(100.0, 100.0),
            target: Vec2::new(100.0 + distance, 100.0),
            distance,
            angle: 0.0,
            health,
            max_health: 100.0,
            damage: 10.0,
            attack_range: 60.0,
            state: AiState::Attack,
        }
    }

    #[test]
    fn test_base_attack_normal() {
        let mut rng = ScriptedRandom::constant(0.9);
        let mut effects = EffectBuffer::for_actor();
        let outcome = base_attack(&context(55.0, 100.0), &mut rng, &mut effects);

        assert_eq!(outcome.kind, AttackKind::Normal);
        assert_eq!(outcome.damage, 10.0);
        assert!(outcome.success);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_base_attack_heavy_when_close() {
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();
        let outcome = base_attack(&context(30.0, 100.0), &mut rng, &mut effects);
        assert_eq!(outcome.kind, AttackKind::Heavy);
    }

    #[test]
    fn test_base_attack_desperate_at_low_health() {
        let mut rng = ScriptedRandom::constant(0.9);
        let mut effects = EffectBuffer::for_actor();
        let outcome = base_attack(&context(30.0, 20.0), &mut rng, &mut effects);
        assert_eq!(outcome.kind, AttackKind::Desperate);
        assert_eq!(outcome.damage, 10.0);
    }

    #[test]
    fn test_outcome_reach() {
        let outcome = AttackOutcome::new(AttackKind::Normal, 5.0, 0.0, 60.0)
            .with_source(ActorId::new(), Vec2::ZERO);
        assert!(outcome.reaches(Vec2::new(60.0, 0.0)));
        assert!(!outcome.reaches(Vec2::new(61.0, 0.0)));

        let area = outcome.clone().with_area(100.0);
        assert!(area.reaches(Vec2::new(90.0, 0.0)));
    }

    #[test]
    fn test_ability_kinds() {
        assert!(AttackKind::IceScream.is_ability());
        assert!(AttackKind::BellyFlop.is_ability());
        assert!(!AttackKind::Heavy.is_ability());
        assert_eq!(AttackKind::SlideAttack.as_str(), "slide_attack");
    }

    #[test]
    fn test_commitment_arc() {
        let mut commitment = Commitment::belly_flop(30.0);
        assert_eq!(commitment.vertical_offset(), 0.0);

        assert!(!commitment.advance(0.125));
        assert!((commitment.vertical_offset() - 30.0).abs() < 0.01);

        assert!(commitment.advance(0.13));
        assert_eq!(commitment.vertical_offset(), 0.0);
    }

    #[test]
    fn test_strategy_for_kind() {
        let mut rng = ScriptedRandom::constant(0.9);
        let mut effects = EffectBuffer::for_actor();
        let mut grunt = strategy_for(&ActorConfig::default());
        let outcome = grunt.choose_attack(&context(55.0, 100.0), &mut rng, &mut effects);
        assert_eq!(outcome.kind, AttackKind::Normal);
        assert!(grunt.snapshot_fields(None).is_empty());

        let seal = strategy_for(&ActorConfig::seal());
        assert!(seal.snapshot_fields(None).contains_key("subtype"));
    }
}
