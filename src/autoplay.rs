//! Scripted player
//!
//! Listens to the same events a human would hear and answers with
//! `CombatAction`s after a human-ish reaction delay. Drives the headless
//! binary and the long-running tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::ATTACK_COOLDOWN;
use crate::sim::{CombatAction, CombatEvent, CombatState, FighterState, RangeState, RoundPhase};

/// How the scripted player answers a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Defense {
    /// Raise the guard as soon as a tell is heard
    #[default]
    Guard,
    /// Wait for the strike, then sidestep
    Sidestep,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    action: CombatAction,
    countdown: f32,
}

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    reaction_time: f32,
    jitter: f32,
    defense: Defense,
    rng: Pcg32,
    queue: Vec<Scheduled>,
}

impl AutoPlayer {
    /// `reaction_time` is the minimum delay; up to `jitter` more is added per action
    pub fn new(reaction_time: f32, jitter: f32, defense: Defense, seed: u64) -> Self {
        Self {
            reaction_time: reaction_time.max(0.0),
            jitter: jitter.max(0.0),
            defense,
            rng: Pcg32::seed_from_u64(seed),
            queue: Vec::new(),
        }
    }

    pub fn defense(&self) -> Defense {
        self.defense
    }

    /// Number of actions waiting to fire
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn latency(&mut self) -> f32 {
        if self.jitter > 0.0 {
            self.reaction_time + self.rng.random_range(0.0..self.jitter)
        } else {
            self.reaction_time
        }
    }

    fn is_queued(&self, action: CombatAction) -> bool {
        self.queue.iter().any(|s| s.action == action)
    }

    fn schedule(&mut self, action: CombatAction, extra: f32) {
        let countdown = self.latency() + extra;
        self.queue.push(Scheduled { action, countdown });
    }

    /// React to an engine event
    pub fn observe(&mut self, event: &CombatEvent) {
        match *event {
            CombatEvent::PhaseChanged {
                phase: RoundPhase::TensionStart,
            }
            | CombatEvent::RoundEnded { .. } => self.queue.clear(),
            CombatEvent::EnemyTold { .. } => {
                if self.defense == Defense::Guard && !self.is_queued(CombatAction::GuardStart) {
                    self.schedule(CombatAction::GuardStart, 0.0);
                }
            }
            CombatEvent::EnemyStruck { .. } => match self.defense {
                Defense::Guard => {
                    if !self.is_queued(CombatAction::GuardStart) {
                        self.schedule(CombatAction::GuardStart, 0.0);
                    }
                }
                Defense::Sidestep => self.schedule(CombatAction::Sidestep, 0.0),
            },
            CombatEvent::PlayerBlocked | CombatEvent::PlayerDodged => {
                self.queue.retain(|s| s.action == CombatAction::Attack);
                if !self.is_queued(CombatAction::Attack) {
                    self.schedule(CombatAction::Attack, 0.0);
                }
            }
            CombatEvent::EnemyDamaged { hp } if hp > 0 => {
                if !self.is_queued(CombatAction::Attack) {
                    self.schedule(CombatAction::Attack, ATTACK_COOLDOWN);
                }
            }
            _ => {}
        }
    }

    /// Advance timers and return the actions due now, in schedule order
    pub fn poll(&mut self, dt: f32, state: &CombatState) -> Vec<CombatAction> {
        if state.phase != RoundPhase::Active {
            return Vec::new();
        }

        let mut due = Vec::new();
        self.queue.retain_mut(|s| {
            s.countdown -= dt;
            if s.countdown <= 0.0 {
                due.push(s.action);
                false
            } else {
                true
            }
        });

        if due.is_empty() && self.queue.is_empty() {
            let enemy_threatening = matches!(
                state.enemy.state,
                FighterState::Telling | FighterState::Attacking
            );
            match state.player.state {
                // Fake tell or finished exchange: drop the guard
                FighterState::Guarding if !enemy_threatening => due.push(CombatAction::GuardEnd),
                FighterState::Idle
                    if state.range == RangeState::Close
                        && state.enemy.state == FighterState::Idle =>
                {
                    self.schedule(CombatAction::Attack, 0.0);
                }
                _ => {}
            }
        }

        due
    }
}
