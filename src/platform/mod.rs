//! Platform abstraction layer
//!
//! Host-facing plumbing that the simulation never sees:
//! - Frame timestamps → clamped deltas
//! - Fixed-step accumulator driving `CombatEngine::update`
//!
//! Storage lives in `persistence`, outputs in `audio`/`haptics`.

pub mod clock;

pub use clock::{FixedStep, FrameClock};
