//! # Floe Gameplay
//!
//! Gameplay core for Floe Arena.
//!
//! This crate provides the actor model and the frame-stepped arena loop:
//! - Actors with per-enemy AI state machines
//! - Adaptive counter-strategies driven by outcome statistics
//! - Ability cooldowns and the combat resolver, with the seal boss strategy
//! - The player, its input frames and status effects
//! - Particle effect descriptors for the renderer
//! - Snapshots for network sync

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod abilities;
pub mod adaptation;
pub mod ai;
pub mod boss;
pub mod combat;
pub mod config;
pub mod effects;
pub mod entity;
pub mod input;
pub mod memory;
pub mod player;
pub mod random;
pub mod simulation;
pub mod snapshot;
pub mod time;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::abilities::*;
    pub use crate::adaptation::*;
    pub use crate::ai::*;
    pub use crate::boss::*;
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::effects::*;
    pub use crate::entity::*;
    pub use crate::input::*;
    pub use crate::memory::*;
    pub use crate::player::*;
    pub use crate::random::*;
    pub use crate::simulation::*;
    pub use crate::snapshot::*;
    pub use crate::time::*;
}

pub use prelude::*;
