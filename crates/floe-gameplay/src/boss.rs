//! Seal boss overlay.
//!
//! The seal layers three abilities on top of the base attack:
//! - Belly flop: close-range area slam that commits the seal to a short hop
//! - Ice scream: flat-damage cone that slows a target out of slapping range
//! - Slide attack: velocity burst toward a distant target while chasing
//!
//! Heavy hits make the seal more likely to flop and more aggressive.

use std::collections::BTreeMap;

use floe_common::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abilities::{Ability, AbilityDamage, AbilityEffect};
use crate::ai::AIProfile;
use crate::combat::{
    base_attack, AttackContext, AttackKind, AttackOutcome, CombatStrategy, Commitment,
};
use crate::effects::{EffectBuffer, EffectKind, ParticleEffect};
use crate::random::RandomSource;
use crate::snapshot::SnapshotValue;

/// Distance beyond which the ice scream may be used.
const SCREAM_MIN_DISTANCE: f32 = 100.0;
/// Distance beyond which a chasing seal may slide.
const SLIDE_MIN_DISTANCE: f32 = 120.0;

const SEAL_DEATH_COLORS: [[f32; 4]; 3] = [
    [0.31, 0.76, 0.97, 1.0],
    [0.0, 0.9, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
];

/// Seal variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealSubtype {
    /// Regular seal
    #[default]
    Normal,
    /// Yo-chan
    YoChan,
    /// Pon-chan
    PonChan,
}

impl SealSubtype {
    /// Snapshot name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::YoChan => "yo-chan",
            Self::PonChan => "pon-chan",
        }
    }
}

/// Tunable seal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealTuning {
    /// Variant
    pub subtype: SealSubtype,
    /// Starting chance to belly flop when close
    pub flop_chance: f32,
    /// Ceiling for the flop chance
    pub flop_chance_cap: f32,
    /// Flop chance gained per heavy hit
    pub flop_chance_step: f32,
    /// Damage above which a hit counts as heavy
    pub heavy_hit_threshold: f32,
    /// Peak of the belly flop arc
    pub flop_height: f32,
    /// Flat damage of the ice scream
    pub scream_power: f32,
    /// Chance per tick of regenerating 1 HP while damaged
    pub ice_regen_chance: f32,
}

impl SealTuning {
    /// Sets the variant.
    #[must_use]
    pub const fn with_subtype(mut self, subtype: SealSubtype) -> Self {
        self.subtype = subtype;
        self
    }

    /// Clamps chances into `[0, 1]` and magnitudes to non-negative values.
    pub(crate) fn sanitize(&mut self) {
        let defaults = Self::default();
        self.flop_chance = unit(self.flop_chance, defaults.flop_chance);
        self.flop_chance_cap = unit(self.flop_chance_cap, defaults.flop_chance_cap);
        self.flop_chance_step = unit(self.flop_chance_step, defaults.flop_chance_step);
        self.ice_regen_chance = unit(self.ice_regen_chance, defaults.ice_regen_chance);
        self.heavy_hit_threshold = magnitude(self.heavy_hit_threshold, defaults.heavy_hit_threshold);
        self.flop_height = magnitude(self.flop_height, defaults.flop_height);
        self.scream_power = magnitude(self.scream_power, defaults.scream_power);
    }
}

fn unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn magnitude(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

impl Default for SealTuning {
    fn default() -> Self {
        Self {
            subtype: SealSubtype::Normal,
            flop_chance: 0.3,
            flop_chance_cap: 0.8,
            flop_chance_step: 0.2,
            heavy_hit_threshold: 5.0,
            flop_height: 30.0,
            scream_power: 5.0,
            ice_regen_chance: 0.01,
        }
    }
}

/// Seal boss strategy.
#[derive(Debug, Clone)]
pub struct SealStrategy {
    tuning: SealTuning,
    flop_chance: f32,
    belly_flop: Ability,
    ice_scream: Ability,
    slide_attack: Ability,
}

impl Default for SealStrategy {
    fn default() -> Self {
        Self::new(SealTuning::default())
    }
}

impl SealStrategy {
    /// Creates a seal with the given tuning.
    #[must_use]
    pub fn new(tuning: SealTuning) -> Self {
        Self {
            tuning,
            flop_chance: tuning.flop_chance,
            belly_flop: Ability::new(
                3.0,
                AbilityEffect::new(AbilityDamage::Multiplier(1.5), 40.0)
                    .with_area(100.0)
                    .with_stun_chance(0.3)
                    .with_trigger_chance(0.3),
            ),
            ice_scream: Ability::new(
                4.0,
                AbilityEffect::new(AbilityDamage::Flat(tuning.scream_power), 200.0)
                    .with_slow(0.5, 2.0)
                    .with_trigger_chance(0.2),
            ),
            slide_attack: Ability::new(
                2.5,
                AbilityEffect::new(AbilityDamage::Flat(12.0), 150.0).with_trigger_chance(0.4),
            ),
        }
    }

    /// Current belly flop chance.
    #[must_use]
    pub fn flop_chance(&self) -> f32 {
        self.flop_chance
    }

    /// Belly flop ability state.
    #[must_use]
    pub fn belly_flop(&self) -> &Ability {
        &self.belly_flop
    }

    /// Ice scream ability state.
    #[must_use]
    pub fn ice_scream(&self) -> &Ability {
        &self.ice_scream
    }

    /// Slide attack ability state.
    #[must_use]
    pub fn slide_attack(&self) -> &Ability {
        &self.slide_attack
    }

    fn perform_belly_flop(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        if !self.belly_flop.try_fire() {
            return None;
        }
        debug!("Seal belly flop at distance {:.1}", ctx.distance);

        for _ in 0..20 {
            let position = ctx.position
                + Vec2::new(rng.signed() * 40.0, 30.0 + rng.next_f32() * 20.0);
            let velocity = Vec2::new(rng.signed() * 5.0, -5.0 - rng.next_f32() * 5.0);
            effects.push(
                ParticleEffect::new(EffectKind::BellyFlop, position, velocity)
                    .with_lifetime(1.0 + rng.next_f32()),
            );
        }

        let effect = *self.belly_flop.effect();
        Some(
            AttackOutcome::new(
                AttackKind::BellyFlop,
                effect.damage.resolve(ctx.damage),
                ctx.angle,
                ctx.attack_range,
            )
            .with_area(effect.area.unwrap_or(ctx.attack_range))
            .with_stun_chance(effect.stun_chance)
            .with_commitment(Commitment::belly_flop(self.tuning.flop_height)),
        )
    }

    fn perform_ice_scream(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        if !self.ice_scream.try_fire() {
            return None;
        }
        debug!("Seal ice scream at distance {:.1}", ctx.distance);

        let mouth = ctx.position + Vec2::from_angle(ctx.angle) * 20.0;
        for _ in 0..30 {
            let direction = ctx.angle + rng.signed() * 0.4;
            let speed = 8.0 + rng.next_f32() * 4.0;
            effects.push(
                ParticleEffect::new(EffectKind::IceScream, mouth, Vec2::from_angle(direction) * speed)
                    .with_lifetime(1.0 + rng.next_f32() * 0.5),
            );
        }

        let effect = *self.ice_scream.effect();
        Some(
            AttackOutcome::new(
                AttackKind::IceScream,
                effect.damage.resolve(ctx.damage),
                ctx.angle,
                effect.range,
            )
            .with_slow(effect.slow),
        )
    }

    fn perform_slide_attack(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        if !self.slide_attack.try_fire() {
            return None;
        }
        debug!("Seal slide attack at distance {:.1}", ctx.distance);

        let direction = Vec2::from_angle(ctx.angle);
        let tail = ctx.position - direction * 30.0;
        for _ in 0..10 {
            let velocity = -direction * 5.0 + Vec2::new(rng.signed(), rng.signed());
            effects.push(
                ParticleEffect::new(EffectKind::Slide, tail, velocity)
                    .with_lifetime(0.5 + rng.next_f32() * 0.3),
            );
        }

        let effect = *self.slide_attack.effect();
        Some(
            AttackOutcome::new(
                AttackKind::SlideAttack,
                effect.damage.resolve(ctx.damage),
                ctx.angle,
                effect.range,
            )
            .with_impulse(direction * 15.0),
        )
    }
}

impl CombatStrategy for SealStrategy {
    fn tick(&mut self, dt: f32) {
        self.belly_flop.tick(dt);
        self.ice_scream.tick(dt);
        self.slide_attack.tick(dt);
    }

    fn choose_attack(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> AttackOutcome {
        if ctx.distance < self.belly_flop.effect().range
            && self.belly_flop.is_ready()
            && rng.chance(self.flop_chance)
        {
            if let Some(outcome) = self.perform_belly_flop(ctx, rng, effects) {
                return outcome;
            }
        } else if ctx.distance > SCREAM_MIN_DISTANCE
            && self.ice_scream.is_ready()
            && rng.chance(self.ice_scream.effect().trigger_chance)
        {
            if let Some(outcome) = self.perform_ice_scream(ctx, rng, effects) {
                return outcome;
            }
        }

        let outcome = base_attack(ctx, rng, effects);
        effects.push(
            ParticleEffect::new(
                EffectKind::SealSlap,
                ctx.position + Vec2::from_angle(ctx.angle) * 40.0,
                Vec2::from_angle(ctx.angle + rng.signed() * 0.25),
            )
            .with_lifetime(0.3),
        );
        outcome.with_subtype("seal_slap")
    }

    fn opportunistic(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        if ctx.distance > ctx.attack_range || ctx.distance >= 50.0 || !self.belly_flop.is_ready() {
            return None;
        }
        if rng.chance(self.belly_flop.effect().trigger_chance) {
            self.perform_belly_flop(ctx, rng, effects)
        } else {
            None
        }
    }

    fn pursue(
        &mut self,
        ctx: &AttackContext,
        rng: &mut dyn RandomSource,
        effects: &mut EffectBuffer,
    ) -> Option<AttackOutcome> {
        if ctx.distance > SLIDE_MIN_DISTANCE
            && self.slide_attack.is_ready()
            && rng.chance(self.slide_attack.effect().trigger_chance)
        {
            if let Some(outcome) = self.perform_slide_attack(ctx, rng, effects) {
                return Some(outcome);
            }
        }

        if ctx.distance > SCREAM_MIN_DISTANCE
            && ctx.distance <= self.ice_scream.effect().range
            && self.ice_scream.is_ready()
            && rng.chance(self.ice_scream.effect().trigger_chance)
        {
            return self.perform_ice_scream(ctx, rng, effects);
        }
        None
    }

    fn on_damage_taken(&mut self, amount: f32, ai: &mut AIProfile) {
        if amount > self.tuning.heavy_hit_threshold {
            self.flop_chance =
                (self.flop_chance + self.tuning.flop_chance_step).min(self.tuning.flop_chance_cap);
            ai.aggressiveness = (ai.aggressiveness + 0.1).min(1.0);
        }
    }

    fn on_death(&mut self, position: Vec2, rng: &mut dyn RandomSource, effects: &mut EffectBuffer) {
        for _ in 0..25 {
            let offset = Vec2::new(rng.signed() * 30.0, rng.signed() * 20.0);
            let velocity = Vec2::new(rng.signed() * 4.0, -3.0 - rng.next_f32() * 4.0);
            let color = SEAL_DEATH_COLORS[rng.index(SEAL_DEATH_COLORS.len())];
            effects.push(
                ParticleEffect::new(EffectKind::SealDeath, position + offset, velocity)
                    .with_lifetime(1.5 + rng.next_f32())
                    .with_color(color),
            );
        }
    }

    fn bonus_regeneration(&mut self, rng: &mut dyn RandomSource) -> f32 {
        if rng.chance(self.tuning.ice_regen_chance) {
            1.0
        } else {
            0.0
        }
    }

    fn snapshot_fields(&self, commitment: Option<&Commitment>) -> BTreeMap<String, SnapshotValue> {
        let flopping = commitment.filter(|c| c.kind == AttackKind::BellyFlop);
        let mut fields = BTreeMap::new();
        fields.insert(
            "subtype".to_string(),
            SnapshotValue::Text(self.tuning.subtype.as_str().to_string()),
        );
        fields.insert(
            "is_flopping".to_string(),
            SnapshotValue::Flag(flopping.is_some()),
        );
        fields.insert(
            "flop_progress".to_string(),
            SnapshotValue::Number(flopping.map_or(0.0, |c| f64::from(c.progress))),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiState, TargetSnapshot};
    use crate::config::ActorConfig;
    use crate::entity::Actor;
    use crate::random::ScriptedRandom;

    fn context(distance: f32) -> AttackContext {
        AttackContext {
            position: Vec2::new(300.0, 300.0),
            target: Vec2::new(300.0 + distance, 300.0),
            distance,
            angle: 0.0,
            health: 25.0,
            max_health: 25.0,
            damage: 8.0,
            attack_range: 60.0,
            state: AiState::Attack,
        }
    }

    #[test]
    fn test_belly_flop_when_close() {
        let mut seal = SealStrategy::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        let outcome = seal.choose_attack(&context(30.0), &mut rng, &mut effects);
        assert_eq!(outcome.kind, AttackKind::BellyFlop);
        assert_eq!(outcome.damage, 12.0);
        assert_eq!(outcome.area, Some(100.0));
        assert_eq!(outcome.stun_chance, 0.3);
        assert!(outcome.commitment.is_some());
        assert_eq!(seal.belly_flop().remaining(), 3.0);
        assert_eq!(effects.len(), 20);
    }

    #[test]
    fn test_ice_scream_when_far() {
        let mut seal = SealStrategy::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        let outcome = seal.choose_attack(&context(150.0), &mut rng, &mut effects);
        assert_eq!(outcome.kind, AttackKind::IceScream);
        assert_eq!(outcome.damage, 5.0);
        assert_eq!(outcome.range, 200.0);
        let slow = outcome.slow.expect("scream should slow");
        assert_eq!(slow.amount, 0.5);
        assert_eq!(slow.duration, 2.0);
        assert_eq!(seal.ice_scream().remaining(), 4.0);
    }

    #[test]
    fn test_cooldown_falls_back_to_slap() {
        let mut seal = SealStrategy::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        let first = seal.choose_attack(&context(30.0), &mut rng, &mut effects);
        assert_eq!(first.kind, AttackKind::BellyFlop);

        seal.tick(2.9);
        let second = seal.choose_attack(&context(30.0), &mut rng, &mut effects);
        assert_ne!(second.kind, AttackKind::BellyFlop);
        assert_eq!(second.subtype, Some("seal_slap"));
        assert_eq!(second.damage, 8.0);

        seal.tick(0.2);
        let third = seal.choose_attack(&context(30.0), &mut rng, &mut effects);
        assert_eq!(third.kind, AttackKind::BellyFlop);
    }

    #[test]
    fn test_pursuit_slide() {
        let mut seal = SealStrategy::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        assert!(seal.pursue(&context(100.0), &mut rng, &mut effects).is_none());

        let outcome = seal
            .pursue(&context(140.0), &mut rng, &mut effects)
            .expect("slide should fire");
        assert_eq!(outcome.kind, AttackKind::SlideAttack);
        assert_eq!(outcome.damage, 12.0);
        assert_eq!(outcome.impulse, Some(Vec2::new(15.0, 0.0)));

        // Slide on cooldown, the scream covers the gap.
        let outcome = seal
            .pursue(&context(140.0), &mut rng, &mut effects)
            .expect("scream should fire");
        assert_eq!(outcome.kind, AttackKind::IceScream);
        assert!(seal.pursue(&context(140.0), &mut rng, &mut effects).is_none());
    }

    #[test]
    fn test_chasing_seal_screams() {
        let mut seal = Actor::from_config(ActorConfig::seal().with_perturbation(false));
        let mut rng = ScriptedRandom::constant(0.1);
        let target = TargetSnapshot::at(Vec2::new(510.0, 300.0));

        seal.change_state(AiState::Chase);
        let outcomes = seal.update(0.016, &target, &[], &mut rng);
        assert_eq!(outcomes.len(), 1);
        let scream = &outcomes[0];
        assert_eq!(scream.kind, AttackKind::IceScream);
        assert_eq!(scream.source, seal.id());
        assert!(scream.reaches(target.position));
        assert_eq!(scream.slow.map(|slow| slow.amount), Some(0.5));
        assert_eq!(seal.effects().len(), 30);
        assert_eq!(seal.state(), AiState::Chase);
    }

    #[test]
    fn test_scream_power_is_tunable() {
        let tuning = SealTuning {
            scream_power: 7.0,
            ..SealTuning::default()
        }
        .with_subtype(SealSubtype::YoChan);
        let mut seal = SealStrategy::new(tuning);
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        let outcome = seal
            .pursue(&context(110.0), &mut rng, &mut effects)
            .expect("scream should fire");
        assert_eq!(outcome.damage, 7.0);
        assert_eq!(
            seal.snapshot_fields(None).get("subtype"),
            Some(&SnapshotValue::Text("yo-chan".to_string()))
        );
    }

    #[test]
    fn test_opportunistic_flop_needs_close_range() {
        let mut seal = SealStrategy::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut effects = EffectBuffer::for_actor();

        assert!(seal.opportunistic(&context(55.0), &mut rng, &mut effects).is_none());
        let outcome = seal.opportunistic(&context(45.0), &mut rng, &mut effects);
        assert_eq!(outcome.map(|o| o.kind), Some(AttackKind::BellyFlop));
    }

    #[test]
    fn test_heavy_hit_reaction() {
        let mut seal = SealStrategy::default();
        let mut ai = AIProfile::default();
        ai.aggressiveness = 0.8;

        seal.on_damage_taken(4.0, &mut ai);
        assert_eq!(seal.flop_chance(), 0.3);

        seal.on_damage_taken(10.0, &mut ai);
        assert!((seal.flop_chance() - 0.5).abs() < 1e-6);
        assert!((ai.aggressiveness - 0.9).abs() < 1e-6);

        for _ in 0..5 {
            seal.on_damage_taken(10.0, &mut ai);
        }
        assert!((seal.flop_chance() - 0.8).abs() < 1e-6);
        assert_eq!(ai.aggressiveness, 1.0);
    }

    #[test]
    fn test_snapshot_fields() {
        let seal = SealStrategy::default();
        let fields = seal.snapshot_fields(None);
        assert_eq!(fields.get("subtype"), Some(&SnapshotValue::Text("normal".to_string())));
        assert_eq!(fields.get("is_flopping"), Some(&SnapshotValue::Flag(false)));

        let mut commitment = Commitment::belly_flop(30.0);
        commitment.advance(0.1);
        let fields = seal.snapshot_fields(Some(&commitment));
        assert_eq!(fields.get("is_flopping"), Some(&SnapshotValue::Flag(true)));
    }

    #[test]
    fn test_death_and_regen() {
        let mut seal = SealStrategy::default();
        let mut effects = EffectBuffer::for_actor();
        let mut rng = ScriptedRandom::constant(0.005);

        seal.on_death(Vec2::new(100.0, 100.0), &mut rng, &mut effects);
        assert_eq!(effects.len(), 25);
        assert_eq!(seal.bonus_regeneration(&mut rng), 1.0);

        let mut high = ScriptedRandom::constant(0.5);
        assert_eq!(seal.bonus_regeneration(&mut high), 0.0);
    }
}
