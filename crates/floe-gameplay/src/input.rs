//! Player input frames.
//!
//! Device mapping happens outside the core. The simulation only sees a
//! normalized movement vector and a set of action flags for the frame.

use std::collections::VecDeque;

use floe_common::Vec2;
use serde::{Deserialize, Serialize};

/// Discrete player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Melee attack
    Attack,
    /// Jump
    Jump,
    /// Dash
    Dodge,
    /// Interact
    Interact,
    /// Toggle pause menu
    Menu,
}

impl Action {
    /// All actions.
    pub const ALL: [Self; 5] = [
        Self::Attack,
        Self::Jump,
        Self::Dodge,
        Self::Interact,
        Self::Menu,
    ];
}

/// Action flags pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSet {
    /// Attack pressed
    pub attack: bool,
    /// Jump pressed
    pub jump: bool,
    /// Dodge pressed
    pub dodge: bool,
    /// Interact pressed
    pub interact: bool,
    /// Menu pressed
    pub menu: bool,
}

impl ActionSet {
    /// No actions.
    pub const NONE: Self = Self {
        attack: false,
        jump: false,
        dodge: false,
        interact: false,
        menu: false,
    };

    /// Returns a copy with `action` set.
    #[must_use]
    pub const fn with(mut self, action: Action) -> Self {
        match action {
            Action::Attack => self.attack = true,
            Action::Jump => self.jump = true,
            Action::Dodge => self.dodge = true,
            Action::Interact => self.interact = true,
            Action::Menu => self.menu = true,
        }
        self
    }

    /// Whether `action` is set.
    #[must_use]
    pub const fn contains(&self, action: Action) -> bool {
        match action {
            Action::Attack => self.attack,
            Action::Jump => self.jump,
            Action::Dodge => self.dodge,
            Action::Interact => self.interact,
            Action::Menu => self.menu,
        }
    }

    /// Whether any action is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.attack || self.jump || self.dodge || self.interact || self.menu
    }
}

/// Input for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Movement direction, each component in `[-1, 1]`
    pub move_vector: Vec2,
    /// Actions pressed this frame
    pub actions: ActionSet,
}

impl InputFrame {
    /// Frame with no movement and no actions.
    pub const IDLE: Self = Self {
        move_vector: Vec2::ZERO,
        actions: ActionSet::NONE,
    };

    /// Creates a normalized frame.
    #[must_use]
    pub fn new(move_vector: Vec2, actions: ActionSet) -> Self {
        Self {
            move_vector,
            actions,
        }
        .normalized()
    }

    /// Frame that only moves.
    #[must_use]
    pub fn moving(move_vector: Vec2) -> Self {
        Self::new(move_vector, ActionSet::NONE)
    }

    /// Frame from four directional keys.
    #[must_use]
    pub fn from_axes(up: bool, down: bool, left: bool, right: bool) -> Self {
        let mut movement = Vec2::ZERO;
        if up {
            movement.y -= 1.0;
        }
        if down {
            movement.y += 1.0;
        }
        if left {
            movement.x -= 1.0;
        }
        if right {
            movement.x += 1.0;
        }
        Self::moving(movement)
    }

    /// Returns a copy with `action` set.
    #[must_use]
    pub const fn with_action(mut self, action: Action) -> Self {
        self.actions = self.actions.with(action);
        self
    }

    /// Clamps components to `[-1, 1]` and normalizes diagonals.
    ///
    /// Non-finite components become zero.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let finite = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        let movement = Vec2::new(finite(self.move_vector.x), finite(self.move_vector.y));
        self.move_vector = if movement.length() > 1.0 {
            movement.normalized()
        } else {
            movement
        };
        self
    }

    /// Whether the frame carries any movement.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        self.move_vector.x != 0.0 || self.move_vector.y != 0.0
    }
}

/// Supplies one input frame per tick.
pub trait InputProvider {
    /// Input for the next tick of length `dt`.
    fn next_frame(&mut self, dt: f32) -> InputFrame;
}

/// Provider that never moves or acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn next_frame(&mut self, _dt: f32) -> InputFrame {
        InputFrame::IDLE
    }
}

/// Provider replaying a fixed list of frames, then idling.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    /// Creates a provider from frames.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().map(InputFrame::normalized).collect(),
        }
    }

    /// Queues a frame.
    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push_back(frame.normalized());
    }

    /// Frames left to replay.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputProvider for ScriptedInput {
    fn next_frame(&mut self, _dt: f32) -> InputFrame {
        self.frames.pop_front().unwrap_or(InputFrame::IDLE)
    }
}
