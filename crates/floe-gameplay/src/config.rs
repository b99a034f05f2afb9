//! Actor, player and simulation configuration.
//!
//! Configs are plain serde structs with defaults for every field, so a RON or
//! TOML document only needs to name what it overrides.

use floe_common::{ArenaBounds, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::boss::SealTuning;

/// Error types for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// RON document could not be parsed
    #[error("Failed to parse RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Kind of combat actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Generic enemy with the base attack set
    #[default]
    Grunt,
    /// Seal boss with belly flop, ice scream and slide attack
    Seal,
}

impl ActorKind {
    /// Wire tag used in snapshots.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Grunt => "normal",
            Self::Seal => "seal",
        }
    }

    /// Parses a wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "normal" => Some(Self::Grunt),
            "seal" => Some(Self::Seal),
            _ => None,
        }
    }
}

/// Configuration for a single enemy actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Display name
    pub name: String,
    /// Actor kind, selects the combat strategy
    pub kind: ActorKind,
    /// Spawn position
    pub position: Vec2,
    /// Bounding width
    pub width: f32,
    /// Bounding height
    pub height: f32,
    /// Movement speed per nominal frame
    pub speed: f32,
    /// Maximum health
    pub max_health: f32,
    /// Starting health, defaults to `max_health`
    pub health: Option<f32>,
    /// Passive regeneration per second
    pub health_regen: f32,
    /// Base attack damage
    pub damage: f32,
    /// Attack reach
    pub attack_range: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Distance at which the target is tracked
    pub vision_range: f32,
    /// Distance at which pursuit begins
    pub aggro_range: f32,
    /// Tendency to engage (0-1)
    pub aggressiveness: f32,
    /// Tendency to back off after attacking (0-1)
    pub caution: f32,
    /// Rate of random behavior changes (0-1)
    pub unpredictability: f32,
    /// Chance to dodge an incoming attack (0-1)
    pub dodge_chance: f32,
    /// Seconds spent idle before reconsidering
    pub max_idle_time: f32,
    /// Patrol waypoints
    pub patrol_route: Vec<Vec2>,
    /// Caps adaptive damage growth at `damage * cap` when set
    pub damage_growth_cap: Option<f32>,
    /// Enables random behavior perturbation
    pub perturbation: bool,
    /// Actor state is driven by network snapshots
    pub remote: bool,
    /// Seal variant and ability tuning, used when `kind` is `Seal`
    pub seal: SealTuning,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            name: "Enemy".to_string(),
            kind: ActorKind::Grunt,
            position: Vec2::new(400.0, 300.0),
            width: 64.0,
            height: 64.0,
            speed: 2.5,
            max_health: 100.0,
            health: None,
            health_regen: 0.1,
            damage: 10.0,
            attack_range: 80.0,
            attack_cooldown: 1.0,
            vision_range: 300.0,
            aggro_range: 200.0,
            aggressiveness: 0.7,
            caution: 0.3,
            unpredictability: 0.2,
            dodge_chance: 0.3,
            max_idle_time: 2.0,
            patrol_route: Vec::new(),
            damage_growth_cap: None,
            perturbation: true,
            remote: false,
            seal: SealTuning::default(),
        }
    }
}

impl ActorConfig {
    /// Seal boss preset.
    #[must_use]
    pub fn seal() -> Self {
        Self {
            name: "Seal".to_string(),
            kind: ActorKind::Seal,
            speed: 2.0,
            max_health: 25.0,
            damage: 8.0,
            attack_range: 60.0,
            attack_cooldown: 1.2,
            vision_range: 350.0,
            aggro_range: 250.0,
            aggressiveness: 0.8,
            caution: 0.2,
            unpredictability: 0.4,
            dodge_chance: 0.4,
            ..Self::default()
        }
    }

    /// Parses a config from a RON document.
    pub fn from_ron(source: &str) -> ConfigResult<Self> {
        let mut config: Self = ron::from_str(source)?;
        config.validate();
        Ok(config)
    }

    /// Sets the spawn position.
    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the patrol route.
    #[must_use]
    pub fn with_patrol_route(mut self, route: Vec<Vec2>) -> Self {
        self.patrol_route = route;
        self
    }

    /// Enables or disables behavior perturbation.
    #[must_use]
    pub const fn with_perturbation(mut self, enabled: bool) -> Self {
        self.perturbation = enabled;
        self
    }

    /// Sets the seal tuning.
    #[must_use]
    pub const fn with_seal_tuning(mut self, tuning: SealTuning) -> Self {
        self.seal = tuning;
        self
    }

    /// Caps adaptive damage growth.
    #[must_use]
    pub const fn with_damage_growth_cap(mut self, cap: f32) -> Self {
        self.damage_growth_cap = Some(cap);
        self
    }

    /// Starting health.
    #[must_use]
    pub fn initial_health(&self) -> f32 {
        self.health.unwrap_or(self.max_health).clamp(0.0, self.max_health)
    }

    /// Clamps every value into its valid range. Returns true if anything changed.
    pub fn validate(&mut self) -> bool {
        let before = self.clone();

        self.max_health = sanitize(self.max_health, 1.0, f32::MAX, 100.0);
        self.width = sanitize(self.width, 1.0, f32::MAX, 64.0);
        self.height = sanitize(self.height, 1.0, f32::MAX, 64.0);
        self.speed = sanitize(self.speed, 0.0, f32::MAX, 2.5);
        self.health_regen = sanitize(self.health_regen, 0.0, f32::MAX, 0.1);
        self.damage = sanitize(self.damage, 0.0, f32::MAX, 10.0);
        self.attack_range = sanitize(self.attack_range, 0.0, f32::MAX, 80.0);
        self.attack_cooldown = sanitize(self.attack_cooldown, 0.0, f32::MAX, 1.0);
        self.vision_range = sanitize(self.vision_range, 0.0, f32::MAX, 300.0);
        self.aggro_range = sanitize(self.aggro_range, 0.0, f32::MAX, 200.0);
        self.max_idle_time = sanitize(self.max_idle_time, 0.0, f32::MAX, 2.0);
        self.aggressiveness = sanitize(self.aggressiveness, 0.0, 1.0, 0.7);
        self.caution = sanitize(self.caution, 0.0, 1.0, 0.3);
        self.unpredictability = sanitize(self.unpredictability, 0.0, 1.0, 0.2);
        self.dodge_chance = sanitize(self.dodge_chance, 0.0, 1.0, 0.3);
        if let Some(health) = self.health {
            self.health = Some(sanitize(health, 0.0, self.max_health, self.max_health));
        }
        if let Some(cap) = self.damage_growth_cap {
            self.damage_growth_cap = Some(sanitize(cap, 1.0, f32::MAX, 1.0));
        }
        self.patrol_route.retain(|point| point.is_finite());
        self.seal.sanitize();

        let changed = *self != before;
        if changed {
            warn!("Actor config '{}' had out-of-range values, clamped", self.name);
        }
        changed
    }
}

/// Clamps `value` into `[min, max]`, replacing non-finite input with `fallback`.
fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Configuration for the player actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Display name
    pub name: String,
    /// Spawn position
    pub position: Vec2,
    /// Bounding width
    pub width: f32,
    /// Bounding height
    pub height: f32,
    /// Maximum health
    pub max_health: f32,
    /// Movement speed per nominal frame
    pub speed: f32,
    /// Damage per hit
    pub damage: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Radius in which an attack hits enemies
    pub attack_radius: f32,
    /// Invulnerability after being hit, in seconds
    pub hit_invulnerability: f32,
    /// Seconds between 1 HP regeneration ticks
    pub regen_interval: f32,
    /// Seconds between dashes
    pub dash_cooldown: f32,
    /// Invulnerability granted by a dash, in seconds
    pub dash_invulnerability: f32,
    /// Dash velocity burst per nominal frame
    pub dash_speed: f32,
    /// Stun duration when a stun roll succeeds, in seconds
    pub stun_duration: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            position: Vec2::new(400.0, 300.0),
            width: 40.0,
            height: 60.0,
            max_health: 100.0,
            speed: 5.0,
            damage: 10.0,
            attack_cooldown: 0.5,
            attack_radius: 80.0,
            hit_invulnerability: 1.0,
            regen_interval: 2.0,
            dash_cooldown: 2.0,
            dash_invulnerability: 0.3,
            dash_speed: 15.0,
            stun_duration: 0.5,
        }
    }
}

/// Configuration for a whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Arena bounds
    pub arena: ArenaBounds,
    /// RNG seed, `None` seeds from entropy
    pub seed: Option<u64>,
    /// Delta used when the supplied one is invalid
    pub nominal_dt: f32,
    /// Largest delta accepted as-is
    pub max_dt: f32,
    /// Global switch for behavior perturbation
    pub perturbation: bool,
    /// Player setup
    pub player: PlayerConfig,
    /// Enemies spawned at start
    pub enemies: Vec<ActorConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            seed: None,
            nominal_dt: 0.016,
            max_dt: 0.1,
            perturbation: true,
            player: PlayerConfig::default(),
            enemies: vec![ActorConfig::seal().with_position(600.0, 300.0)],
        }
    }
}

impl SimulationConfig {
    /// Sets the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the enemy list.
    #[must_use]
    pub fn with_enemies(mut self, enemies: Vec<ActorConfig>) -> Self {
        self.enemies = enemies;
        self
    }

    /// Enables or disables behavior perturbation for every actor.
    #[must_use]
    pub const fn with_perturbation(mut self, enabled: bool) -> Self {
        self.perturbation = enabled;
        self
    }

    /// Parses a config from a RON document.
    pub fn from_ron(source: &str) -> ConfigResult<Self> {
        let mut config: Self = ron::from_str(source)?;
        for enemy in &mut config.enemies {
            enemy.validate();
        }
        Ok(config)
    }
}
