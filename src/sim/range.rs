//! Discrete range tiers
//!
//! Only the three tiers take part in combat resolution. The continuous
//! distance tracked on `CombatState` is derived from them for presentation.

use serde::{Deserialize, Serialize};

use crate::consts::{CLOSE_DISTANCE, FAR_DISTANCE, MID_DISTANCE};

/// Proximity of the enemy, ordered `Far < Mid < Close`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RangeState {
    Far,
    Mid,
    /// Attacks only land here
    Close,
}

impl RangeState {
    /// One step closer, saturating at `Close`
    pub fn closer(self) -> Self {
        match self {
            RangeState::Far => RangeState::Mid,
            RangeState::Mid | RangeState::Close => RangeState::Close,
        }
    }

    /// One step farther, saturating at `Far`
    pub fn farther(self) -> Self {
        match self {
            RangeState::Close => RangeState::Mid,
            RangeState::Mid | RangeState::Far => RangeState::Far,
        }
    }

    /// Continuous distance the presentation value settles on for this tier
    pub fn target_distance(self) -> f32 {
        match self {
            RangeState::Far => FAR_DISTANCE,
            RangeState::Mid => MID_DISTANCE,
            RangeState::Close => CLOSE_DISTANCE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeState::Far => "far",
            RangeState::Mid => "mid",
            RangeState::Close => "close",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_range() -> impl Strategy<Value = RangeState> {
        prop_oneof![
            Just(RangeState::Far),
            Just(RangeState::Mid),
            Just(RangeState::Close),
        ]
    }

    #[test]
    fn test_saturates_at_bounds() {
        assert_eq!(RangeState::Close.closer(), RangeState::Close);
        assert_eq!(RangeState::Far.farther(), RangeState::Far);
    }

    #[test]
    fn test_mid_round_trip() {
        assert_eq!(RangeState::Mid.closer().farther(), RangeState::Mid);
        assert_eq!(RangeState::Mid.farther().closer(), RangeState::Mid);
    }

    #[test]
    fn test_ordering() {
        assert!(RangeState::Far < RangeState::Mid);
        assert!(RangeState::Mid < RangeState::Close);
        assert!(RangeState::Far.closer() > RangeState::Far);
    }

    #[test]
    fn test_target_distance_shrinks_as_range_closes() {
        assert!(RangeState::Far.target_distance() > RangeState::Mid.target_distance());
        assert!(RangeState::Mid.target_distance() > RangeState::Close.target_distance());
    }

    proptest! {
        #[test]
        fn closer_never_moves_away(range in any_range()) {
            prop_assert!(range.closer() >= range);
            prop_assert!(range.farther() <= range);
        }

        #[test]
        fn steps_are_idempotent_at_bounds(range in any_range(), n in 2usize..6) {
            let mut near = range;
            let mut far = range;
            for _ in 0..n {
                near = near.closer();
                far = far.farther();
            }
            prop_assert_eq!(near, RangeState::Close);
            prop_assert_eq!(far, RangeState::Far);
        }
    }
}
