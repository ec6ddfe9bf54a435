//! Enemy decision policy
//!
//! This module defines the [`EnemyBehavior`] trait, the pluggable strategy the
//! engine consults whenever the enemy needs its next move. Every tier shares
//! the same decision shape (see [`EnemyBehavior::next_action`]); tiers differ
//! only in their tuning knobs and reaction-delay bands. A new tier is a new
//! type implementing the required methods, the engine never needs to know.

use rand::{Rng, RngCore};

use super::action::{ActionKind, EnemyAction, TellType};
use super::fighter::FighterState;
use super::range::RangeState;
use super::state::CombatState;

/// A delay the enemy waits before executing a chosen action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayBand {
    Fixed(f32),
    /// Uniform in `[min, max)`
    Uniform { min: f32, max: f32 },
}

impl DelayBand {
    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        match *self {
            DelayBand::Fixed(secs) => secs,
            DelayBand::Uniform { min, max } if max > min => rng.random_range(min..max),
            DelayBand::Uniform { min, .. } => min,
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            DelayBand::Fixed(secs) => (secs, secs),
            DelayBand::Uniform { min, max } => (min, max.max(min)),
        }
    }
}

/// Enemy decision policy.
///
/// Implementors supply the tuning; the provided methods implement the shared
/// policy. Both decision methods must treat the state as read-only, they may
/// only consume randomness.
pub trait EnemyBehavior {
    /// Weight toward `Approach` at mid range, in [0, 1]
    fn aggression_level(&self) -> f32;

    /// Chance a close-range tell is a fake, in [0, 1]
    fn fake_tell_probability(&self) -> f32;

    /// Chance of repositioning instead of approaching at far range
    fn far_reposition_chance(&self) -> f32 {
        0.0
    }

    /// Reaction-delay band for an action kind
    fn delay_band(&self, kind: ActionKind) -> DelayBand;

    /// Tier name for logs
    fn name(&self) -> &'static str;

    /// Pick the next action for the current state.
    ///
    /// - Far: approach (or reposition, with `far_reposition_chance`)
    /// - Mid: cumulative roll over approach / reposition / wait
    /// - Close: tell if idle (fake first, then inhale or scrape), else wait
    fn next_action(&self, state: &CombatState, rng: &mut dyn RngCore) -> EnemyAction {
        match state.range {
            RangeState::Far => {
                let chance = self.far_reposition_chance();
                if chance > 0.0 && rng.random::<f32>() < chance {
                    EnemyAction::Reposition
                } else {
                    EnemyAction::Approach
                }
            }
            RangeState::Mid => {
                let aggression = self.aggression_level().clamp(0.0, 1.0);
                let reposition_band = aggression + (1.0 - aggression) / 2.0;
                let roll = rng.random::<f32>();
                if roll < aggression {
                    EnemyAction::Approach
                } else if roll < reposition_band {
                    EnemyAction::Reposition
                } else {
                    EnemyAction::Wait
                }
            }
            RangeState::Close => {
                if state.enemy.state != FighterState::Idle {
                    return EnemyAction::Wait;
                }
                let fake = self.fake_tell_probability();
                let tell = if fake > 0.0 && rng.random::<f32>() < fake {
                    TellType::Fake
                } else if rng.random_bool(0.5) {
                    TellType::Inhale
                } else {
                    TellType::Scrape
                };
                EnemyAction::Tell(tell)
            }
        }
    }

    /// Seconds to wait before executing `action`
    fn reaction_delay(&self, action: EnemyAction, rng: &mut dyn RngCore) -> f32 {
        self.delay_band(action.kind()).sample(rng)
    }
}

/// Blanket implementation for boxed behaviors
impl<B: EnemyBehavior + ?Sized> EnemyBehavior for Box<B> {
    fn aggression_level(&self) -> f32 {
        (**self).aggression_level()
    }

    fn fake_tell_probability(&self) -> f32 {
        (**self).fake_tell_probability()
    }

    fn far_reposition_chance(&self) -> f32 {
        (**self).far_reposition_chance()
    }

    fn delay_band(&self, kind: ActionKind) -> DelayBand {
        (**self).delay_band(kind)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn next_action(&self, state: &CombatState, rng: &mut dyn RngCore) -> EnemyAction {
        (**self).next_action(state, rng)
    }

    fn reaction_delay(&self, action: EnemyAction, rng: &mut dyn RngCore) -> f32 {
        (**self).reaction_delay(action, rng)
    }
}

const fn band(min: f32, max: f32) -> DelayBand {
    DelayBand::Uniform { min, max }
}

/// Slow, hesitant, sometimes drifts sideways instead of closing in
#[derive(Debug, Clone, Copy, Default)]
pub struct EasyBehavior;

impl EnemyBehavior for EasyBehavior {
    fn aggression_level(&self) -> f32 {
        0.3
    }

    fn fake_tell_probability(&self) -> f32 {
        0.0
    }

    fn far_reposition_chance(&self) -> f32 {
        0.25
    }

    fn delay_band(&self, kind: ActionKind) -> DelayBand {
        match kind {
            ActionKind::Approach => band(1.5, 2.5),
            ActionKind::Tell => band(1.0, 2.0),
            ActionKind::Strike => DelayBand::Fixed(0.0),
            ActionKind::Wait => band(1.0, 1.5),
            ActionKind::Reposition => band(0.8, 1.2),
        }
    }

    fn name(&self) -> &'static str {
        "easy"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalBehavior;

impl EnemyBehavior for NormalBehavior {
    fn aggression_level(&self) -> f32 {
        0.5
    }

    fn fake_tell_probability(&self) -> f32 {
        0.0
    }

    fn delay_band(&self, kind: ActionKind) -> DelayBand {
        match kind {
            ActionKind::Approach => band(1.0, 1.8),
            ActionKind::Tell => band(0.6, 1.2),
            ActionKind::Strike => DelayBand::Fixed(0.0),
            ActionKind::Wait => band(0.6, 1.0),
            ActionKind::Reposition => band(0.5, 0.9),
        }
    }

    fn name(&self) -> &'static str {
        "normal"
    }
}

/// Presses hard and mixes in fake tells
#[derive(Debug, Clone, Copy, Default)]
pub struct HardBehavior;

impl EnemyBehavior for HardBehavior {
    fn aggression_level(&self) -> f32 {
        0.75
    }

    fn fake_tell_probability(&self) -> f32 {
        0.25
    }

    fn delay_band(&self, kind: ActionKind) -> DelayBand {
        match kind {
            ActionKind::Approach => band(0.5, 1.0),
            ActionKind::Tell => band(0.3, 0.7),
            ActionKind::Strike => DelayBand::Fixed(0.0),
            ActionKind::Wait => band(0.3, 0.6),
            ActionKind::Reposition => band(0.3, 0.5),
        }
    }

    fn name(&self) -> &'static str {
        "hard"
    }
}
