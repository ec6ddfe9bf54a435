//! Outward combat events
//!
//! The engine pushes every observable change through an [`EventSink`],
//! synchronously and after the mutation it reflects. Audio, haptics and UI
//! collaborators hang off this one seam.

use serde::{Deserialize, Serialize};

use super::action::TellType;
use super::range::RangeState;
use super::state::{RoundPhase, RoundResult};

/// Something collaborators may want to render, play or feel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CombatEvent {
    /// Player lost a hit point; `hp` is the value after the hit
    PlayerDamaged { hp: u32 },
    /// Enemy lost a hit point; `hp` is the value after the hit
    EnemyDamaged { hp: u32 },
    RangeChanged { range: RangeState },
    EnemyTold { tell: TellType, direction: f32 },
    /// Strike window just opened
    EnemyStruck { direction: f32 },
    PlayerBlocked,
    /// Strike sidestepped
    PlayerDodged,
    /// Player attacked out of range
    AttackWhiffed,
    RoundEnded { result: RoundResult },
    /// Continuous "where is the enemy" signal, emitted every active tick
    PositionUpdated {
        range: RangeState,
        direction: f32,
        distance: f32,
    },
    PhaseChanged { phase: RoundPhase },
}

impl CombatEvent {
    /// Everything except the per-tick position stream
    pub fn is_discrete(&self) -> bool {
        !matches!(self, CombatEvent::PositionUpdated { .. })
    }
}

/// Receiver for engine events.
///
/// Called inline from `update` / `handle_player_action`; a slow sink stalls
/// the engine.
pub trait EventSink {
    fn handle(&mut self, event: &CombatEvent);
}

/// Discards everything
impl EventSink for () {
    fn handle(&mut self, _event: &CombatEvent) {}
}

/// Records everything, in order
impl EventSink for Vec<CombatEvent> {
    fn handle(&mut self, event: &CombatEvent) {
        self.push(*event);
    }
}

impl<F: FnMut(&CombatEvent)> EventSink for F {
    fn handle(&mut self, event: &CombatEvent) {
        self(event)
    }
}
