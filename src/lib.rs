//! Echo Duel - an audio/haptic-only duel
//!
//! Core modules:
//! - `sim`: Combat engine (range, fighters, enemy AI, timing windows)
//! - `audio`: Procedural sound cue recipes and the audio backend seam
//! - `haptics`: Haptic pulse patterns and the haptic backend seam
//! - `cues`: Routes combat events to audio and haptics
//! - `platform`: Frame clock and fixed-step accumulator
//! - `persistence`: Key-value store capability for preferences and records

pub mod audio;
pub mod autoplay;
pub mod cues;
pub mod haptics;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod streak;

pub use settings::Settings;
pub use streak::WinStreak;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the clock will hand out (long pauses get clamped)
    pub const MAX_FRAME_DT: f32 = 1.0 / 15.0;

    /// Fighter health at round start
    pub const DEFAULT_MAX_HP: u32 = 5;

    /// Silent lead-in before the enemy starts acting
    pub const TENSION_DURATION: f32 = 1.0;

    /// Player attack cooldown, reset on every attack
    pub const ATTACK_COOLDOWN: f32 = 0.3;
    /// How long the player stays in the attacking state
    pub const PLAYER_ATTACK_DURATION: f32 = 0.2;
    /// How long a sidestep lasts
    pub const SIDESTEP_DURATION: f32 = 0.4;

    /// Chance the enemy retreats a second range step after recovering
    pub const SECOND_RETREAT_CHANCE: f64 = 0.3;

    /// Continuous distance approach rate (units per second)
    pub const DISTANCE_LERP_RATE: f32 = 0.7;
    /// Continuous distance targets per range tier
    pub const FAR_DISTANCE: f32 = 1.0;
    pub const MID_DISTANCE: f32 = 0.5;
    pub const CLOSE_DISTANCE: f32 = 0.1;

    /// Listener-space radius that continuous distance 1.0 maps to (meters)
    pub const ARENA_RADIUS: f32 = 8.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Place the enemy in listener space.
///
/// `direction` is the stereo value in [-1, 1] (-1 hard left, +1 hard right)
/// and `distance` the continuous [0, 1] distance. The listener faces +y, so
/// direction 0 puts the enemy straight ahead.
#[inline]
pub fn enemy_emitter_position(distance: f32, direction: f32) -> Vec2 {
    use std::f32::consts::FRAC_PI_2;
    let theta = FRAC_PI_2 - direction.clamp(-1.0, 1.0) * FRAC_PI_2;
    polar_to_cartesian(distance.clamp(0.0, 1.0) * consts::ARENA_RADIUS, theta)
}
