//! Audio cues
//!
//! Procedurally described sound effects - no external files needed! Each
//! effect is a recipe of oscillator voices; an [`AudioBackend`] turns voices
//! into sound. The enemy's continuous presence is a separate looping emitter
//! positioned in listener space.

use glam::Vec2;

use crate::enemy_emitter_position;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Low drone while the round is about to start
    TensionDrone,
    /// Round goes live
    Fight,
    /// Tell: sharp breath
    TellInhale,
    /// Tell: foot scrape
    TellScrape,
    /// Tell that will not follow through (sounds almost like an inhale)
    TellFake,
    /// Enemy strike coming in
    Strike,
    /// Strike met the guard
    Block,
    /// Strike sidestepped
    Dodge,
    /// Player swung at nothing
    Whiff,
    /// Player got hit
    PlayerHurt,
    /// Enemy got hit
    EnemyHurt,
    /// Enemy stepped in
    Approach,
    /// Enemy backed off
    Retreat,
    Victory,
    Defeat,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
    /// Filtered noise burst (breaths, scrapes)
    Noise,
}

/// One oscillator with a gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub freq: f32,
    /// Exponential sweep target (Hz), if any
    pub end_freq: Option<f32>,
    /// Peak gain after volume scaling
    pub gain: f32,
    /// Seconds from trigger to start
    pub delay: f32,
    /// Seconds until the voice decays out
    pub duration: f32,
    /// Stereo pan in [-1, 1]
    pub pan: f32,
}

impl Voice {
    fn new(waveform: Waveform, freq: f32, gain: f32, duration: f32) -> Self {
        Self {
            waveform,
            freq,
            end_freq: None,
            gain,
            delay: 0.0,
            duration,
            pan: 0.0,
        }
    }

    fn sweep(mut self, end_freq: f32) -> Self {
        self.end_freq = Some(end_freq);
        self
    }

    fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Output seam for a platform audio engine
pub trait AudioBackend {
    /// Start a one-shot voice
    fn play_voice(&mut self, voice: &Voice);

    /// Move (or start) the looping enemy presence emitter
    fn set_presence(&mut self, emitter: Vec2, gain: f32);

    /// Silence the presence emitter
    fn stop_presence(&mut self);
}

/// Writes voices to the log instead of a sound device
#[derive(Debug, Default)]
pub struct LogAudioBackend;

impl AudioBackend for LogAudioBackend {
    fn play_voice(&mut self, voice: &Voice) {
        log::trace!(
            "voice {:?} {:.0}Hz gain {:.2} pan {:+.2} for {:.2}s",
            voice.waveform,
            voice.freq,
            voice.gain,
            voice.pan,
            voice.duration
        );
    }

    fn set_presence(&mut self, emitter: Vec2, gain: f32) {
        log::trace!("presence at ({:.2}, {:.2}) gain {:.2}", emitter.x, emitter.y, gain);
    }

    fn stop_presence(&mut self) {
        log::trace!("presence stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.backend.stop_presence();
        }
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect panned to `pan`
    pub fn play(&mut self, effect: SoundEffect, pan: f32) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let pan = pan.clamp(-1.0, 1.0);
        for mut voice in recipe(effect) {
            voice.gain *= vol;
            voice.pan = pan;
            self.backend.play_voice(&voice);
        }
    }

    /// Place the enemy's presence loop. Louder as it closes in.
    pub fn update_presence(&mut self, distance: f32, direction: f32) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let emitter = enemy_emitter_position(distance, direction);
        let gain = vol * (0.15 + 0.45 * (1.0 - distance.clamp(0.0, 1.0)));
        self.backend.set_presence(emitter, gain);
    }

    pub fn stop_presence(&mut self) {
        self.backend.stop_presence();
    }
}

// === Sound recipes ===

/// Voices making up an effect, at unit volume and centered
pub fn recipe(effect: SoundEffect) -> Vec<Voice> {
    use Waveform::*;

    match effect {
        // Low, slow swell
        SoundEffect::TensionDrone => vec![
            Voice::new(Sine, 55.0, 0.3, 1.0),
            Voice::new(Triangle, 82.5, 0.15, 1.0),
        ],
        // Rising sting
        SoundEffect::Fight => vec![
            Voice::new(Triangle, 200.0, 0.3, 0.25).sweep(600.0),
            Voice::new(Sine, 60.0, 0.3, 0.12),
        ],
        // Breath: airy noise rising in pitch
        SoundEffect::TellInhale => vec![
            Voice::new(Noise, 800.0, 0.25, 0.35).sweep(2400.0),
            Voice::new(Sine, 180.0, 0.08, 0.3).sweep(260.0),
        ],
        // Gritty scrape along the floor
        SoundEffect::TellScrape => vec![
            Voice::new(Noise, 300.0, 0.3, 0.3).sweep(150.0),
            Voice::new(Sawtooth, 90.0, 0.12, 0.25),
        ],
        // Shorter breath that cuts off early
        SoundEffect::TellFake => vec![Voice::new(Noise, 800.0, 0.22, 0.2).sweep(1800.0)],
        // Whoosh down into an impact
        SoundEffect::Strike => vec![
            Voice::new(Noise, 3000.0, 0.35, 0.15).sweep(400.0),
            Voice::new(Square, 400.0, 0.2, 0.12).sweep(120.0),
        ],
        // Deep metallic clang
        SoundEffect::Block => vec![
            Voice::new(Sine, 80.0, 0.5, 0.25).sweep(40.0),
            Voice::new(Square, 400.0, 0.25, 0.2),
            Voice::new(Triangle, 250.0, 0.2, 0.15),
        ],
        // Air moving past
        SoundEffect::Dodge => vec![Voice::new(Noise, 600.0, 0.3, 0.3).sweep(200.0)],
        SoundEffect::Whiff => vec![Voice::new(Noise, 1200.0, 0.2, 0.15).sweep(500.0)],
        // Solid thump
        SoundEffect::PlayerHurt => vec![
            Voice::new(Sine, 150.0, 0.6, 0.15).sweep(60.0),
            Voice::new(Sawtooth, 100.0, 0.3, 0.2).sweep(40.0),
        ],
        // Higher crack
        SoundEffect::EnemyHurt => vec![
            Voice::new(Square, 1500.0, 0.2, 0.1),
            Voice::new(Sine, 220.0, 0.4, 0.12).sweep(110.0),
        ],
        SoundEffect::Approach => vec![
            Voice::new(Sine, 70.0, 0.35, 0.08),
            Voice::new(Sine, 70.0, 0.3, 0.08).after(0.25),
        ],
        SoundEffect::Retreat => vec![
            Voice::new(Sine, 70.0, 0.25, 0.08),
            Voice::new(Sine, 60.0, 0.2, 0.08).after(0.3),
        ],
        // Triumphant fanfare
        SoundEffect::Victory => [400.0, 500.0, 600.0, 800.0]
            .iter()
            .enumerate()
            .map(|(i, freq)| Voice::new(Triangle, *freq, 0.3, 0.4).after(i as f32 * 0.1))
            .collect(),
        // Sad descending
        SoundEffect::Defeat => [400.0, 350.0, 300.0, 200.0]
            .iter()
            .enumerate()
            .map(|(i, freq)| Voice::new(Sine, *freq, 0.3, 0.3).after(i as f32 * 0.2))
            .collect(),
    }
}
