//! Combat simulation module
//!
//! All combat logic lives here. This module must stay free of presentation:
//! - Delta-time ticks only, no clock of its own
//! - Randomness only through the engine's RNG
//! - No audio, haptic or input dependencies (collaborators hang off `EventSink`)

pub mod action;
pub mod behavior;
pub mod difficulty;
pub mod engine;
pub mod event;
pub mod fighter;
pub mod range;
pub mod state;

pub use action::{ActionKind, CombatAction, EnemyAction, TellType};
pub use behavior::{DelayBand, EasyBehavior, EnemyBehavior, HardBehavior, NormalBehavior};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use engine::{CombatEngine, PendingAction};
pub use event::{CombatEvent, EventSink};
pub use fighter::{Fighter, FighterState};
pub use range::RangeState;
pub use state::{CombatState, RoundPhase, RoundResult};
