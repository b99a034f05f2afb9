//! Actor snapshots for network sync.
//!
//! Snapshots are available as JSON for debugging and relays, and as a compact
//! binary envelope: magic bytes, then a bincode-encoded schema version and
//! snapshot.

use std::collections::BTreeMap;
use std::fmt;

use floe_common::{ActorId, FloeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ai::AiState;
use crate::entity::{Actor, AnimationTag};

/// Leading bytes of a binary snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"FLSN";

/// Binary snapshot schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped on breaking layout changes
    pub major: u16,
    /// Bumped on compatible additions
    pub minor: u16,
}

impl SchemaVersion {
    /// Version written by this build.
    pub const CURRENT: Self = Self::new(1, 0);

    /// Creates a version.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Whether data written as `data_version` can be decoded.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Errors that can occur while encoding or decoding snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding error
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Binary decoding error
    #[error("Corrupted snapshot: {0}")]
    Corrupted(String),

    /// Missing or wrong magic bytes
    #[error("Invalid snapshot format")]
    InvalidFormat,

    /// Snapshot written by an incompatible schema
    #[error("Incompatible snapshot version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version found in the data
        found: SchemaVersion,
    },
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

impl From<SnapshotError> for FloeError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::VersionMismatch { expected, found } => Self::VersionMismatch {
                expected: expected.to_string(),
                actual: found.to_string(),
            },
            other => Self::Snapshot(other.to_string()),
        }
    }
}

/// Strategy-specific snapshot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapshotValue {
    /// Text
    Text(String),
    /// Number
    Number(f64),
    /// Flag
    Flag(bool),
}

/// Serializable view of an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Actor identifier
    pub id: ActorId,
    /// Kind tag
    #[serde(rename = "type")]
    pub kind: String,
    /// X position, two decimals
    pub x: f32,
    /// Y position, two decimals
    pub y: f32,
    /// Health, one decimal
    pub health: f32,
    /// AI state
    pub state: AiState,
    /// Animation tag
    pub animation: AnimationTag,
    /// Strategy-specific fields
    #[serde(default)]
    pub extra: BTreeMap<String, SnapshotValue>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: SchemaVersion,
    snapshot: ActorSnapshot,
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

impl ActorSnapshot {
    /// Encodes as JSON.
    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes as a binary envelope.
    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        let envelope = SnapshotEnvelope {
            version: SchemaVersion::CURRENT,
            snapshot: self.clone(),
        };
        let data =
            bincode::serialize(&envelope).map_err(|e| SnapshotError::Encode(e.to_string()))?;

        let mut buffer = Vec::with_capacity(SNAPSHOT_MAGIC.len() + data.len());
        buffer.extend_from_slice(&SNAPSHOT_MAGIC);
        buffer.extend(data);
        Ok(buffer)
    }

    /// Decodes a binary envelope.
    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        let Some(payload) = bytes.strip_prefix(&SNAPSHOT_MAGIC) else {
            return Err(SnapshotError::InvalidFormat);
        };

        let envelope: SnapshotEnvelope = bincode::deserialize(payload)
            .map_err(|e| SnapshotError::Corrupted(e.to_string()))?;

        if !SchemaVersion::CURRENT.can_read(&envelope.version) {
            return Err(SnapshotError::VersionMismatch {
                expected: SchemaVersion::CURRENT,
                found: envelope.version,
            });
        }
        Ok(envelope.snapshot)
    }
}

impl Actor {
    /// Captures a snapshot of this actor.
    #[must_use]
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            kind: self.kind.tag().to_string(),
            x: round_to(self.position.x, 2),
            y: round_to(self.position.y, 2),
            health: round_to(self.health, 1),
            state: self.ai.state(),
            animation: self.animation(),
            extra: self.strategy.snapshot_fields(self.commitment.as_ref()),
        }
    }

    /// Applies a snapshot to a remote actor.
    ///
    /// Local actors ignore snapshots and return false.
    pub fn apply_snapshot(&mut self, snapshot: &ActorSnapshot) -> bool {
        if !self.remote {
            return false;
        }

        if snapshot.x.is_finite() && snapshot.y.is_finite() {
            self.position = floe_common::Vec2::new(snapshot.x, snapshot.y);
        }
        self.set_health(snapshot.health);
        self.change_state(snapshot.state);
        if self.ai.state() == AiState::Dead {
            self.active = false;
        }
        debug!("{} applied snapshot in state {}", self.name, snapshot.state);
        true
    }
}
