//! Win streak record
//!
//! Tracks the current and best run of consecutive wins, overall and per
//! difficulty. Persisted through a `KeyValueStore`.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::sim::{Difficulty, RoundResult};

/// Best streak reached on one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierBest {
    pub easy: u32,
    pub normal: u32,
    pub hard: u32,
}

impl TierBest {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    fn slot(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Streak record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WinStreak {
    /// Consecutive wins right now
    pub current: u32,
    /// Longest run ever
    pub best: u32,
    pub wins: u32,
    pub losses: u32,
    pub best_by_tier: TierBest,
    /// Difficulty the current streak was built on (a tier change restarts it)
    pub current_tier: Option<Difficulty>,
}

impl WinStreak {
    /// Store key
    const STORAGE_KEY: &'static str = "echo_duel_streak";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round.
    /// Returns true if this result set a new overall best.
    pub fn record(&mut self, result: RoundResult, difficulty: Difficulty) -> bool {
        match result {
            RoundResult::PlayerWon => {
                if self.current_tier != Some(difficulty) {
                    self.current = 0;
                }
                self.current_tier = Some(difficulty);
                self.current += 1;
                self.wins += 1;

                let tier_best = self.best_by_tier.slot(difficulty);
                *tier_best = (*tier_best).max(self.current);

                if self.current > self.best {
                    self.best = self.current;
                    return true;
                }
                false
            }
            RoundResult::PlayerLost => {
                self.current = 0;
                self.current_tier = None;
                self.losses += 1;
                false
            }
        }
    }

    /// Total rounds recorded
    pub fn rounds(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<WinStreak>(store, Self::STORAGE_KEY) {
            Ok(Some(streak)) => {
                log::info!("Loaded streak record ({} rounds)", streak.rounds());
                streak
            }
            Ok(None) => {
                log::info!("No streak record found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Streak record unreadable, starting fresh: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Streak saved (current {}, best {})", self.current, self.best),
            Err(e) => log::warn!("Failed to save streak: {}", e),
        }
    }
}
