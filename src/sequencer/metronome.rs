// Metronome - Tick engine
// Plays one tone per beat and waits out the rest of the beat interval

use std::thread;
use std::time::Duration;

use super::timeline::{ACCENT_FREQUENCY_HZ, Tempo, Tone};
use crate::audio::player::{AudioError, TonePlayer};
use crate::preferences::Preferences;

/// Metronome click type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// Click closing a measure, played at the accent pitch
    Accent,
    /// Click on other beats, played with the selected tone
    Regular,
}

/// What a single tick played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    pub click_type: ClickType,
    pub frequency_hz: f32,
    /// Beat index after the tick (1-based, meaningless when accents are off)
    pub index: u8,
}

impl Beat {
    pub fn is_accent(&self) -> bool {
        self.click_type == ClickType::Accent
    }
}

/// Blocks the tick loop between the end of a tone and the next beat
pub trait Pacer {
    fn wait(&mut self, duration: Duration);
}

/// Pacer backed by `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Tick engine state
///
/// The caller overwrites tempo, signature and tone between ticks
/// (see [`TickEngine::apply`]); the beat index is owned by the engine.
pub struct TickEngine<P: TonePlayer, W: Pacer = ThreadPacer> {
    player: P,
    pacer: W,
    tone_duration: Duration,
    beats_per_measure: u8,
    current_beat: u8,
    tempo: Tempo,
    frequency_hz: f32,
}

impl<P: TonePlayer> TickEngine<P, ThreadPacer> {
    pub fn new(player: P) -> Self {
        Self::with_pacer(player, ThreadPacer)
    }
}

impl<P: TonePlayer, W: Pacer> TickEngine<P, W> {
    /// Duration of every tone, whatever the tempo
    pub const TONE_DURATION: Duration = Duration::from_millis(100);

    pub fn with_pacer(player: P, pacer: W) -> Self {
        Self {
            player,
            pacer,
            tone_duration: Self::TONE_DURATION,
            beats_per_measure: 0,
            current_beat: 1,
            tempo: Tempo::default(),
            frequency_hz: Tone::default().frequency_hz(),
        }
    }

    /// Copy a settings snapshot into the working state
    pub fn apply(&mut self, settings: &Preferences) {
        self.tempo = settings.tempo;
        self.beats_per_measure = settings.time_signature.beats_per_measure();
        self.frequency_hz = settings.tone.frequency_hz();
    }

    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }

    /// Raw accent period; 0 disables accents, 1 accents every beat
    pub fn set_beats_per_measure(&mut self, beats: u8) {
        self.beats_per_measure = beats;
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.frequency_hz = tone.frequency_hz();
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }

    pub fn current_beat(&self) -> u8 {
        self.current_beat
    }

    pub fn tone_duration(&self) -> Duration {
        self.tone_duration
    }

    /// Time left in the beat once the tone has played
    /// Zero when the beat is shorter than the tone.
    pub fn rest_duration(&self) -> Duration {
        self.tempo
            .beat_interval()
            .saturating_sub(self.tone_duration)
    }

    /// Play one beat and block until the next one is due
    pub fn tick(&mut self) -> Result<Beat, AudioError> {
        let mut click_type = ClickType::Regular;
        let mut frequency_hz = self.frequency_hz;

        if self.beats_per_measure > 0 && self.current_beat == self.beats_per_measure {
            click_type = ClickType::Accent;
            frequency_hz = ACCENT_FREQUENCY_HZ;
            self.current_beat = 1;
        } else if self.beats_per_measure != 0 {
            self.current_beat = self.current_beat.saturating_add(1);
        }

        // The signature may have shrunk since the last tick
        if self.beats_per_measure != 0 && self.current_beat > self.beats_per_measure {
            self.current_beat = 1;
        }

        self.player.play_tone(frequency_hz, self.tone_duration)?;

        let rest = self.rest_duration();
        if rest.is_zero() {
            log::debug!(
                "{} leaves no rest after a {:?} tone, ticking back-to-back",
                self.tempo,
                self.tone_duration
            );
        } else {
            self.pacer.wait(rest);
        }

        Ok(Beat {
            click_type,
            frequency_hz,
            index: self.current_beat,
        })
    }
}
