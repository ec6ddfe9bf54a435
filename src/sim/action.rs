//! Enemy intents and player inputs

use serde::{Deserialize, Serialize};

/// Telegraph flavor for an incoming strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TellType {
    /// Sharp breath before a strike
    Inhale,
    /// Foot scrape before a strike
    Scrape,
    /// Telegraphs like a real tell but never resolves into a strike
    Fake,
}

impl TellType {
    pub fn is_fake(&self) -> bool {
        matches!(self, TellType::Fake)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TellType::Inhale => "inhale",
            TellType::Scrape => "scrape",
            TellType::Fake => "fake",
        }
    }
}

/// Something the enemy AI intends to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyAction {
    Approach,
    Tell(TellType),
    Strike,
    Wait,
    Reposition,
}

impl EnemyAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            EnemyAction::Approach => ActionKind::Approach,
            EnemyAction::Tell(_) => ActionKind::Tell,
            EnemyAction::Strike => ActionKind::Strike,
            EnemyAction::Wait => ActionKind::Wait,
            EnemyAction::Reposition => ActionKind::Reposition,
        }
    }
}

/// Payload-free discriminant of [`EnemyAction`], keys reaction-delay bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Approach,
    Tell,
    Strike,
    Wait,
    Reposition,
}

/// The only vocabulary the engine accepts from input collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    Attack,
    GuardStart,
    GuardEnd,
    Sidestep,
}
