//! Per-combatant health and behavioral state

use serde::{Deserialize, Serialize};

/// What a fighter is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FighterState {
    #[default]
    Idle,
    Attacking,
    /// Held until an explicit guard release, never timer-driven
    Guarding,
    Recovering,
    Sidestepping,
    /// Enemy only: telegraphing an incoming strike
    Telling,
}

impl FighterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FighterState::Idle => "idle",
            FighterState::Attacking => "attacking",
            FighterState::Guarding => "guarding",
            FighterState::Recovering => "recovering",
            FighterState::Sidestepping => "sidestepping",
            FighterState::Telling => "telling",
        }
    }
}

/// A combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    hp: u32,
    max_hp: u32,
    pub state: FighterState,
    /// Seconds left in the current state (0 when untimed)
    pub state_timer: f32,
}

impl Fighter {
    /// Fresh fighter at full health. `max_hp` of 0 is bumped to 1.
    pub fn new(max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            hp: max_hp,
            max_hp,
            state: FighterState::Idle,
            state_timer: 0.0,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose one hit point, clamped at zero
    pub fn take_damage(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    /// Swap state and timer together
    pub fn enter(&mut self, state: FighterState, duration: f32) {
        self.state = state;
        self.state_timer = duration.max(0.0);
    }

    /// Count the state timer down (floored at 0).
    ///
    /// Returns true on the tick the timer runs out.
    pub fn tick_timer(&mut self, dt: f32) -> bool {
        if self.state_timer <= 0.0 {
            return false;
        }
        self.state_timer = (self.state_timer - dt).max(0.0);
        self.state_timer <= 0.0
    }

    /// Back to full health and idle
    pub fn reset(&mut self) {
        *self = Self::new(self.max_hp);
    }
}
