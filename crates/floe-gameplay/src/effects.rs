//! Particle effect descriptors.
//!
//! The simulation only produces and ages descriptors; drawing them is the
//! renderer's job. Velocities are expressed in world units per nominal frame
//! (1/60 s), the same convention the actor physics uses.

use bytemuck::{Pod, Zeroable};
use floe_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Capacity of the world-level buffer the simulation drains each frame.
pub const WORLD_EFFECT_CAPACITY: usize = 1000;

/// Capacity of a single actor's pending-effect buffer.
pub const ACTOR_EFFECT_CAPACITY: usize = 256;

/// Kind of particle effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EffectKind {
    /// Generic enemy attack swipe.
    #[default]
    Attack = 0,
    /// Seal slap on a regular attack.
    SealSlap = 1,
    /// Debris thrown up by a belly flop.
    BellyFlop = 2,
    /// Ring emitted when a belly flop lands.
    Shockwave = 3,
    /// Ice scream cone.
    IceScream = 4,
    /// Trail left by a slide attack.
    Slide = 5,
    /// Generic death burst.
    Death = 6,
    /// Seal-specific death burst.
    SealDeath = 7,
    /// Player swing.
    PlayerAttack = 8,
    /// Impact on an enemy hit by the player.
    Hit = 9,
    /// Player dash trail.
    Dash = 10,
}

impl EffectKind {
    /// Default lifetime in seconds.
    #[must_use]
    pub const fn default_lifetime(&self) -> f32 {
        match self {
            Self::Attack | Self::PlayerAttack => 0.5,
            Self::SealSlap | Self::Dash => 0.3,
            Self::BellyFlop | Self::IceScream | Self::Hit => 1.0,
            Self::Shockwave => 0.8,
            Self::Slide => 0.5,
            Self::Death => 1.0,
            Self::SealDeath => 1.5,
        }
    }

    /// Base RGBA color.
    #[must_use]
    pub const fn base_color(&self) -> [f32; 4] {
        match self {
            Self::Attack => [1.0, 1.0, 1.0, 1.0],
            Self::SealSlap | Self::Slide => [0.31, 0.76, 0.97, 1.0], // #4fc3f7
            Self::BellyFlop => [1.0, 0.8, 0.0, 1.0],                 // #ffcc00
            Self::Shockwave => [0.0, 0.9, 1.0, 1.0],                 // #00e5ff
            Self::IceScream => [0.0, 1.0, 1.0, 1.0],                 // #00ffff
            Self::Death => [0.6, 0.6, 0.6, 1.0],
            Self::SealDeath => [1.0, 1.0, 1.0, 1.0],
            Self::PlayerAttack => [1.0, 0.6, 0.0, 1.0], // #FF9800
            Self::Hit => [1.0, 0.32, 0.32, 1.0],        // #FF5252
            Self::Dash => [0.3, 0.69, 0.31, 0.8],       // #4CAF50
        }
    }
}

/// A single particle descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffect {
    /// Effect kind
    pub kind: EffectKind,
    /// World position
    pub position: Vec2,
    /// Velocity per nominal frame
    pub velocity: Vec2,
    /// Remaining lifetime in seconds
    pub lifetime: f32,
    /// RGBA color
    pub color: [f32; 4],
    /// Downward acceleration per nominal frame
    pub gravity: f32,
}

impl ParticleEffect {
    /// Creates a particle with the kind's default lifetime and color.
    #[must_use]
    pub fn new(kind: EffectKind, position: Vec2, velocity: Vec2) -> Self {
        Self {
            kind,
            position,
            velocity,
            lifetime: kind.default_lifetime(),
            color: kind.base_color(),
            gravity: 0.0,
        }
    }

    /// Overrides the lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Overrides the color.
    #[must_use]
    pub const fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Sets gravity.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Whether the particle still has lifetime left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Advances the particle by `dt` seconds.
    pub fn age(&mut self, dt: f32) {
        let frames = dt * 60.0;
        self.velocity.y += self.gravity * frames;
        self.position += self.velocity * frames;
        self.lifetime -= dt;
    }

    /// Packs the particle for GPU upload.
    #[must_use]
    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance {
            position: [self.position.x, self.position.y],
            velocity: [self.velocity.x, self.velocity.y],
            color: self.color,
            lifetime: self.lifetime,
            kind: self.kind as u32,
        }
    }
}

/// GPU-ready particle layout.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ParticleInstance {
    /// World position
    pub position: [f32; 2],
    /// Velocity per nominal frame
    pub velocity: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
    /// Remaining lifetime
    pub lifetime: f32,
    /// `EffectKind` discriminant
    pub kind: u32,
}

/// Bounded buffer of particle descriptors.
#[derive(Debug, Clone)]
pub struct EffectBuffer {
    particles: Vec<ParticleEffect>,
    capacity: usize,
}

impl EffectBuffer {
    /// Creates an empty buffer with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Buffer sized for a single actor.
    #[must_use]
    pub fn for_actor() -> Self {
        Self::new(ACTOR_EFFECT_CAPACITY)
    }

    /// Buffer sized for the whole world.
    #[must_use]
    pub fn for_world() -> Self {
        Self::new(WORLD_EFFECT_CAPACITY)
    }

    /// Maximum number of particles held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Adds a particle. Returns false and drops it when the buffer is full.
    pub fn push(&mut self, particle: ParticleEffect) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Adds particles until the buffer is full. Returns how many were kept.
    pub fn extend<I>(&mut self, particles: I) -> usize
    where
        I: IntoIterator<Item = ParticleEffect>,
    {
        let mut added = 0;
        for particle in particles {
            if !self.push(particle) {
                break;
            }
            added += 1;
        }
        added
    }

    /// Ages every particle and drops the expired ones.
    pub fn age(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.age(dt);
        }
        self.particles.retain(ParticleEffect::is_alive);
    }

    /// Removes and returns all particles.
    pub fn drain(&mut self) -> Vec<ParticleEffect> {
        std::mem::take(&mut self.particles)
    }

    /// Iterates over live particles.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleEffect> {
        self.particles.iter()
    }

    /// Packs all live particles for GPU upload.
    #[must_use]
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(ParticleEffect::instance).collect()
    }

    /// Raw bytes of [`Self::instances`].
    #[must_use]
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances()).to_vec()
    }

    /// Emits `count` particles scattered around `origin`.
    ///
    /// `spread` is the half-extent of the position jitter and `speed` the
    /// half-extent of the velocity jitter on each axis.
    pub fn scatter(
        &mut self,
        rng: &mut dyn RandomSource,
        kind: EffectKind,
        origin: Vec2,
        count: usize,
        spread: Vec2,
        speed: f32,
    ) -> usize {
        let mut added = 0;
        for _ in 0..count {
            let offset = Vec2::new(rng.signed() * spread.x, rng.signed() * spread.y);
            let velocity = Vec2::new(rng.signed() * speed, rng.signed() * speed);
            if !self.push(ParticleEffect::new(kind, origin + offset, velocity)) {
                break;
            }
            added += 1;
        }
        added
    }

    /// Emits a ring of particles every `step_degrees` around `origin`.
    pub fn ring(
        &mut self,
        kind: EffectKind,
        origin: Vec2,
        step_degrees: u32,
        speed: f32,
    ) -> usize {
        let step = step_degrees.max(1);
        let mut added = 0;
        for degrees in (0..360).step_by(step as usize) {
            let velocity = Vec2::from_angle((degrees as f32).to_radians()) * speed;
            if !self.push(ParticleEffect::new(kind, origin, velocity)) {
                break;
            }
            added += 1;
        }
        added
    }
}

impl Default for EffectBuffer {
    fn default() -> Self {
        Self::for_world()
    }
}
