//! Event-to-cue routing
//!
//! [`CueRouter`] is an [`EventSink`]: hand it to the engine and every combat
//! event turns into sound and touch. It never reports failures back; a broken
//! backend only loses its own cues.

use crate::audio::{AudioBackend, AudioManager, SoundEffect};
use crate::haptics::{HapticBackend, HapticManager, HapticPattern};
use crate::settings::Settings;
use crate::sim::{CombatEvent, EventSink, RangeState, RoundPhase, RoundResult, TellType};

pub struct CueRouter<A: AudioBackend, H: HapticBackend> {
    pub audio: AudioManager<A>,
    pub haptics: HapticManager<H>,
    last_range: RangeState,
    last_direction: f32,
}

impl<A: AudioBackend, H: HapticBackend> CueRouter<A, H> {
    pub fn new(audio: A, haptics: H) -> Self {
        Self {
            audio: AudioManager::new(audio),
            haptics: HapticManager::new(haptics),
            last_range: RangeState::Far,
            last_direction: 0.0,
        }
    }

    /// Push user preferences into both managers
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.audio.set_master_volume(settings.master_volume);
        self.audio.set_sfx_volume(settings.sfx_volume);
        self.audio.set_muted(settings.muted);
        self.haptics.set_enabled(settings.haptics_enabled);
        self.haptics.set_intensity(settings.haptic_intensity);
    }

    fn closeness(range: RangeState) -> f32 {
        match range {
            RangeState::Far => 0.0,
            RangeState::Mid => 0.5,
            RangeState::Close => 1.0,
        }
    }
}

impl<A: AudioBackend, H: HapticBackend> EventSink for CueRouter<A, H> {
    fn handle(&mut self, event: &CombatEvent) {
        let pan = self.last_direction;
        match *event {
            CombatEvent::PhaseChanged { phase } => match phase {
                RoundPhase::TensionStart => {
                    self.last_range = RangeState::Far;
                    self.last_direction = 0.0;
                    self.audio.play(SoundEffect::TensionDrone, 0.0);
                }
                RoundPhase::Active => {
                    self.audio.play(SoundEffect::Fight, 0.0);
                    self.haptics.play(HapticPattern::Tap);
                }
                RoundPhase::Resolved => self.audio.stop_presence(),
            },
            CombatEvent::EnemyTold { tell, direction } => {
                self.last_direction = direction;
                let effect = match tell {
                    TellType::Inhale => SoundEffect::TellInhale,
                    TellType::Scrape => SoundEffect::TellScrape,
                    TellType::Fake => SoundEffect::TellFake,
                };
                self.audio.play(effect, direction);
                self.haptics.play(HapticPattern::Tap);
            }
            CombatEvent::EnemyStruck { direction } => {
                self.last_direction = direction;
                self.audio.play(SoundEffect::Strike, direction);
                self.haptics.play(HapticPattern::Buzz);
            }
            CombatEvent::PlayerBlocked => {
                self.audio.play(SoundEffect::Block, pan);
                self.haptics.play(HapticPattern::Thud);
            }
            CombatEvent::PlayerDodged => self.audio.play(SoundEffect::Dodge, -pan),
            CombatEvent::AttackWhiffed => self.audio.play(SoundEffect::Whiff, pan),
            CombatEvent::PlayerDamaged { .. } => {
                self.audio.play(SoundEffect::PlayerHurt, pan);
                self.haptics.play(HapticPattern::Rumble);
            }
            CombatEvent::EnemyDamaged { .. } => {
                self.audio.play(SoundEffect::EnemyHurt, pan);
                self.haptics.play(HapticPattern::Tap);
            }
            CombatEvent::RangeChanged { range } => {
                let effect = if range > self.last_range {
                    SoundEffect::Approach
                } else {
                    SoundEffect::Retreat
                };
                self.last_range = range;
                self.audio.play(effect, pan);
                self.haptics.play(HapticPattern::Heartbeat {
                    closeness: Self::closeness(range),
                });
            }
            CombatEvent::RoundEnded { result } => match result {
                RoundResult::PlayerWon => {
                    self.audio.play(SoundEffect::Victory, 0.0);
                    self.haptics.play(HapticPattern::Victory);
                }
                RoundResult::PlayerLost => {
                    self.audio.play(SoundEffect::Defeat, 0.0);
                    self.haptics.play(HapticPattern::Defeat);
                }
            },
            CombatEvent::PositionUpdated {
                range,
                direction,
                distance,
            } => {
                self.last_direction = direction;
                self.last_range = range;
                self.audio.update_presence(distance, direction);
            }
        }
    }
}
