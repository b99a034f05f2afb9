//! Short-term action memory for adaptive actors.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::ai::AiState;
use crate::combat::AttackKind;

/// Number of records an actor remembers.
pub const MEMORY_CAPACITY: usize = 50;

/// What an actor did or suffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// An attack of the given kind
    Attack(AttackKind),
    /// Health lost to an incoming hit
    DamageTaken,
}

/// One remembered action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// What happened
    pub action: ActionKind,
    /// Whether it succeeded
    pub success: bool,
    /// Simulation time in seconds
    pub timestamp: f64,
    /// AI state at the time
    pub state: AiState,
    /// Health at the time
    pub health: f32,
}

/// Ring buffer of the most recent actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionMemory {
    records: VecDeque<ActionRecord>,
}

impl ActionMemory {
    /// Creates an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(MEMORY_CAPACITY),
        }
    }

    /// Appends a record, evicting the oldest past capacity.
    pub fn record(&mut self, record: ActionRecord) {
        if self.records.len() >= MEMORY_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the memory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&ActionRecord> {
        self.records.back()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter()
    }

    /// Fraction of attack records that succeeded, `None` without attacks.
    #[must_use]
    pub fn attack_success_rate(&self) -> Option<f32> {
        let (hits, total) = self
            .records
            .iter()
            .filter(|r| matches!(r.action, ActionKind::Attack(_)))
            .fold((0u32, 0u32), |(hits, total), r| {
                (hits + u32::from(r.success), total + 1)
            });
        if total == 0 {
            None
        } else {
            Some(hits as f32 / total as f32)
        }
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
