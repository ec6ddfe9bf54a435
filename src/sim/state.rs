//! Combat state aggregate
//!
//! Everything the engine mutates during a round lives here. Collaborators
//! only ever see it through `&CombatState`.

use serde::{Deserialize, Serialize};

use super::fighter::Fighter;
use super::range::RangeState;
use crate::consts::DEFAULT_MAX_HP;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Silent lead-in, player input ignored
    TensionStart,
    /// Live combat
    Active,
    /// Round over (terminal)
    Resolved,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::TensionStart => "tension",
            RoundPhase::Active => "active",
            RoundPhase::Resolved => "resolved",
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    PlayerWon,
    PlayerLost,
}

impl RoundResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundResult::PlayerWon => "won",
            RoundResult::PlayerLost => "lost",
        }
    }
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    pub player: Fighter,
    pub enemy: Fighter,
    /// Discrete range, the only distance combat resolution looks at
    pub range: RangeState,
    /// Continuous distance in [0, 1] (melee 0, far 1), presentation only
    pub enemy_distance: f32,
    /// Stereo position in [-1, 1], presentation only
    pub enemy_direction: f32,
    pub phase: RoundPhase,
    /// Seconds since the round started
    pub elapsed_time: f32,
    /// Seconds since the last phase change
    pub phase_time: f32,
    /// Set once the round resolves
    pub result: Option<RoundResult>,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HP)
    }
}

impl CombatState {
    /// Fresh round with both fighters at `max_hp`
    pub fn new(max_hp: u32) -> Self {
        Self {
            player: Fighter::new(max_hp),
            enemy: Fighter::new(max_hp),
            range: RangeState::Far,
            enemy_distance: RangeState::Far.target_distance(),
            enemy_direction: 0.0,
            phase: RoundPhase::TensionStart,
            elapsed_time: 0.0,
            phase_time: 0.0,
            result: None,
        }
    }

    /// Start a new round, keeping the fighters' max health
    pub fn reset(&mut self) {
        let mut player = self.player.clone();
        let mut enemy = self.enemy.clone();
        player.reset();
        enemy.reset();
        *self = Self {
            player,
            enemy,
            ..Self::new(DEFAULT_MAX_HP)
        };
    }

    /// Switch phase, restarting the phase clock
    pub fn set_phase(&mut self, phase: RoundPhase) {
        self.phase = phase;
        self.phase_time = 0.0;
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == RoundPhase::Resolved
    }

    /// Move `enemy_distance` toward the current tier's target without
    /// overshooting
    pub fn approach_target_distance(&mut self, dt: f32, rate: f32) {
        let target = self.range.target_distance();
        let max_step = rate * dt;
        let delta = (target - self.enemy_distance).clamp(-max_step, max_step);
        self.enemy_distance = (self.enemy_distance + delta).clamp(0.0, 1.0);
    }
}
