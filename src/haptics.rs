//! Haptic cues
//!
//! Patterns are rendered into pulse lists; a [`HapticBackend`] drives the
//! actual actuator.

/// Haptic vocabulary
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HapticPattern {
    /// Proximity heartbeat; `closeness` in [0, 1] speeds it up and firms it
    Heartbeat { closeness: f32 },
    /// Light tick (tells, landed hits)
    Tap,
    /// Firm single knock (block)
    Thud,
    /// Sharp warning buzz (strike incoming)
    Buzz,
    /// Long heavy rumble (player hurt)
    Rumble,
    /// Rising triple pulse
    Victory,
    /// Fading double pulse
    Defeat,
}

/// A single actuator pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Seconds from trigger
    pub delay: f32,
    pub duration: f32,
    /// Strength in [0, 1]
    pub intensity: f32,
    /// Crispness in [0, 1] (0 = soft rumble, 1 = sharp click)
    pub sharpness: f32,
}

impl Pulse {
    fn at(delay: f32, duration: f32, intensity: f32, sharpness: f32) -> Self {
        Self {
            delay,
            duration,
            intensity,
            sharpness,
        }
    }
}

impl HapticPattern {
    /// Pulses at full intensity
    pub fn pulses(&self) -> Vec<Pulse> {
        match *self {
            HapticPattern::Heartbeat { closeness } => {
                let closeness = closeness.clamp(0.0, 1.0);
                let gap = 0.35 - 0.2 * closeness;
                let strength = 0.3 + 0.5 * closeness;
                vec![
                    Pulse::at(0.0, 0.06, strength, 0.3),
                    Pulse::at(gap * 0.4, 0.05, strength * 0.7, 0.3),
                ]
            }
            HapticPattern::Tap => vec![Pulse::at(0.0, 0.02, 0.4, 0.9)],
            HapticPattern::Thud => vec![Pulse::at(0.0, 0.08, 0.9, 0.5)],
            HapticPattern::Buzz => vec![
                Pulse::at(0.0, 0.04, 0.7, 1.0),
                Pulse::at(0.06, 0.04, 0.7, 1.0),
            ],
            HapticPattern::Rumble => vec![Pulse::at(0.0, 0.35, 1.0, 0.1)],
            HapticPattern::Victory => (0..3)
                .map(|i| Pulse::at(i as f32 * 0.12, 0.06, 0.5 + 0.2 * i as f32, 0.7))
                .collect(),
            HapticPattern::Defeat => vec![
                Pulse::at(0.0, 0.2, 0.8, 0.2),
                Pulse::at(0.3, 0.3, 0.4, 0.1),
            ],
        }
    }
}

/// Output seam for a platform haptic engine
pub trait HapticBackend {
    fn play_pulses(&mut self, pulses: &[Pulse]);
}

/// Writes pulses to the log instead of an actuator
#[derive(Debug, Default)]
pub struct LogHapticBackend;

impl HapticBackend for LogHapticBackend {
    fn play_pulses(&mut self, pulses: &[Pulse]) {
        log::trace!("haptic: {} pulse(s)", pulses.len());
    }
}

/// Haptic manager: enable flag and intensity scaling
pub struct HapticManager<B: HapticBackend> {
    backend: B,
    enabled: bool,
    intensity: f32,
}

impl<B: HapticBackend> HapticManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            enabled: true,
            intensity: 1.0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Global intensity scale (0.0 - 1.0)
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn play(&mut self, pattern: HapticPattern) {
        if !self.enabled || self.intensity <= 0.0 {
            return;
        }
        let pulses: Vec<Pulse> = pattern
            .pulses()
            .into_iter()
            .map(|mut p| {
                p.intensity = (p.intensity * self.intensity).clamp(0.0, 1.0);
                p
            })
            .collect();
        self.backend.play_pulses(&pulses);
    }
}
