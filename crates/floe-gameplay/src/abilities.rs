//! Cooldown-gated abilities.
//!
//! An ability's remaining cooldown decays every tick and clamps at zero. It can
//! only fire once the remaining cooldown reaches zero, and firing resets it to
//! the full duration.

use serde::{Deserialize, Serialize};

/// Movement slow applied to a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Fraction of speed removed (0-1)
    pub amount: f32,
    /// Duration in seconds
    pub duration: f32,
}

/// How an ability derives its damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityDamage {
    /// Multiple of the actor's current damage
    Multiplier(f32),
    /// Fixed amount
    Flat(f32),
}

impl AbilityDamage {
    /// Resolves against the actor's current damage.
    #[must_use]
    pub fn resolve(self, base_damage: f32) -> f32 {
        match self {
            Self::Multiplier(m) => base_damage * m,
            Self::Flat(amount) => amount,
        }
    }
}

/// Effect parameters of an ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityEffect {
    /// Damage
    pub damage: AbilityDamage,
    /// Area radius, if the ability hits an area
    pub area: Option<f32>,
    /// Chance to stun on hit
    pub stun_chance: f32,
    /// Slow applied on hit
    pub slow: Option<SlowEffect>,
    /// Reach
    pub range: f32,
    /// Chance to use the ability when its conditions are met
    pub trigger_chance: f32,
}

impl AbilityEffect {
    /// Effect that deals `damage` within `range`.
    #[must_use]
    pub const fn new(damage: AbilityDamage, range: f32) -> Self {
        Self {
            damage,
            area: None,
            stun_chance: 0.0,
            slow: None,
            range,
            trigger_chance: 1.0,
        }
    }

    /// Sets the area radius.
    #[must_use]
    pub const fn with_area(mut self, area: f32) -> Self {
        self.area = Some(area);
        self
    }

    /// Sets the stun chance.
    #[must_use]
    pub const fn with_stun_chance(mut self, chance: f32) -> Self {
        self.stun_chance = chance;
        self
    }

    /// Sets the slow effect.
    #[must_use]
    pub const fn with_slow(mut self, amount: f32, duration: f32) -> Self {
        self.slow = Some(SlowEffect { amount, duration });
        self
    }

    /// Sets the trigger chance.
    #[must_use]
    pub const fn with_trigger_chance(mut self, chance: f32) -> Self {
        self.trigger_chance = chance;
        self
    }
}

/// An ability with its cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    cooldown: f32,
    remaining: f32,
    effect: AbilityEffect,
}

impl Ability {
    /// Creates a ready ability.
    #[must_use]
    pub fn new(cooldown: f32, effect: AbilityEffect) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            remaining: 0.0,
            effect,
        }
    }

    /// Full cooldown duration.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Remaining cooldown.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Effect parameters.
    #[must_use]
    pub const fn effect(&self) -> &AbilityEffect {
        &self.effect
    }

    /// Whether the ability can fire.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Decays the cooldown.
    pub fn tick(&mut self, dt: f32) {
        if dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Fires if ready, resetting the cooldown. Returns whether it fired.
    pub fn try_fire(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = self.cooldown;
        true
    }

    /// Makes the ability ready immediately.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}
