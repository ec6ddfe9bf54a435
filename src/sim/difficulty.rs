//! Difficulty tiers
//!
//! Timing lives here; decision policy lives on the behavior. The engine reads
//! `DifficultyConfig` once at construction and never changes it mid-round.

use serde::{Deserialize, Serialize};

use super::behavior::{EasyBehavior, EnemyBehavior, HardBehavior, NormalBehavior};

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Timing tunables for this tier
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                tell_duration: 0.6,
                reaction_window: 0.45,
                recovery_duration: 1.0,
            },
            Difficulty::Normal => DifficultyConfig {
                tell_duration: 0.4,
                reaction_window: 0.3,
                recovery_duration: 0.7,
            },
            Difficulty::Hard => DifficultyConfig {
                tell_duration: 0.25,
                reaction_window: 0.2,
                recovery_duration: 0.45,
            },
        }
    }

    /// Enemy decision policy for this tier
    pub fn behavior(&self) -> Box<dyn EnemyBehavior> {
        match self {
            Difficulty::Easy => Box::new(EasyBehavior),
            Difficulty::Normal => Box::new(NormalBehavior),
            Difficulty::Hard => Box::new(HardBehavior),
        }
    }
}

/// Per-round timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Seconds between a tell and the strike it announces
    pub tell_duration: f32,
    /// Seconds the player has to block or dodge an open strike
    pub reaction_window: f32,
    /// Seconds the enemy stays vulnerable after its strike resolves
    pub recovery_duration: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::Normal.config()
    }
}
