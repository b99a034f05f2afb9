//! Adaptive counter-strategy.
//!
//! Every few seconds an actor classifies how the fight is going and shifts
//! one of its parameters to counter the opponent's style.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::Actor;

/// Ceiling for dodge chance raised by the evasive counter.
pub const MAX_ADAPTIVE_DODGE: f32 = 0.7;
/// Damage multiplier applied by the breaking counter.
pub const BREAKING_DAMAGE_FACTOR: f32 = 1.1;
/// Base speed factor applied by the adaptive counter.
pub const ADAPTIVE_SPEED_FACTOR: f32 = 1.1;

/// Observed opponent play style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStyle {
    /// Opponent keeps getting hit
    Aggressive,
    /// Opponent trades poorly
    Defensive,
    /// Neither
    Balanced,
}

/// Behavioral profile adopted in response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterStrategy {
    /// No adaptation yet
    #[default]
    Neutral,
    /// Dodge more
    Evasive,
    /// Hit harder
    Breaking,
    /// Move faster
    Adaptive,
}

impl CounterStrategy {
    /// Counter for an observed style.
    #[must_use]
    pub const fn against(style: PlayerStyle) -> Self {
        match style {
            PlayerStyle::Aggressive => Self::Evasive,
            PlayerStyle::Defensive => Self::Breaking,
            PlayerStyle::Balanced => Self::Adaptive,
        }
    }
}

/// Outcome statistics feeding adaptation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorStats {
    /// Successful actions
    pub successful: u32,
    /// Failed actions
    pub failed: u32,
    /// Damage this actor dealt
    pub damage_dealt: f32,
    /// Damage this actor took
    pub damage_taken: f32,
    /// Last classification
    pub player_style: Option<PlayerStyle>,
    /// Current counter-strategy
    pub counter_strategy: CounterStrategy,
    /// Number of adaptation passes run
    pub adaptations: u32,
}

impl BehaviorStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an action outcome.
    pub fn record(&mut self, success: bool) {
        if success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Classifies the opponent from the current counters.
    #[must_use]
    pub fn classify(&self) -> PlayerStyle {
        if self.successful > self.failed * 2 {
            PlayerStyle::Aggressive
        } else if self.damage_taken < self.damage_dealt {
            PlayerStyle::Defensive
        } else {
            PlayerStyle::Balanced
        }
    }
}

impl Actor {
    /// Runs one adaptation pass and returns the adopted counter-strategy.
    pub fn adapt(&mut self) -> CounterStrategy {
        let style = self.stats.classify();
        let counter = CounterStrategy::against(style);

        match counter {
            CounterStrategy::Evasive => {
                self.ai.dodge_chance = (self.ai.dodge_chance + 0.1).min(MAX_ADAPTIVE_DODGE);
            },
            CounterStrategy::Breaking => {
                let mut damage = self.damage * BREAKING_DAMAGE_FACTOR;
                if let Some(cap) = self.damage_growth_cap {
                    damage = damage.min(self.base_damage * cap);
                }
                self.damage = damage;
            },
            CounterStrategy::Adaptive => {
                self.speed_factor = ADAPTIVE_SPEED_FACTOR;
                self.speed = self.effective_base_speed() * self.ai.state().speed_multiplier();
            },
            CounterStrategy::Neutral => {},
        }

        self.stats.player_style = Some(style);
        self.stats.counter_strategy = counter;
        self.stats.adaptations += 1;

        info!(
            "{} adapted to {:?} opponent, strategy {:?}",
            self.name, style, counter
        );
        counter
    }
}
