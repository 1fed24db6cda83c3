// Timeline - Musical values driving the metronome
// Tempo, time signature and tone selection, with their fixed tables

use std::fmt;
use std::time::Duration;

/// Accent pitch (A5), independent of the selected tone
pub const ACCENT_FREQUENCY_HZ: f32 = 880.0;

/// Tempo in BPM (Beats Per Minute), bounded to [MIN_BPM, MAX_BPM]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo {
    bpm: u16,
}

impl Tempo {
    pub const MIN_BPM: u16 = 1;
    pub const MAX_BPM: u16 = 300;

    /// Creates a tempo, or `None` when outside the supported range
    pub fn new(bpm: u16) -> Option<Self> {
        (Self::MIN_BPM..=Self::MAX_BPM)
            .contains(&bpm)
            .then_some(Self { bpm })
    }

    /// Creates a tempo, clamping out-of-range values to the bounds
    pub fn clamped(bpm: i64) -> Self {
        let bpm = bpm.clamp(Self::MIN_BPM as i64, Self::MAX_BPM as i64);
        Self { bpm: bpm as u16 }
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// One BPM faster; no-op at the upper bound
    pub fn increment(self) -> Self {
        Self {
            bpm: (self.bpm + 1).min(Self::MAX_BPM),
        }
    }

    /// One BPM slower; no-op at the lower bound
    pub fn decrement(self) -> Self {
        Self {
            bpm: (self.bpm - 1).max(Self::MIN_BPM),
        }
    }

    /// Duration of one beat (60 / BPM seconds)
    pub fn beat_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.bpm as f64)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 60 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// Time signature offered by the metronome
/// Only the numerator matters: it is the accent period in beats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeSignature {
    /// No accent, uniform ticks
    #[default]
    None,
    TwoFour,
    ThreeFour,
    FourFour,
}

impl TimeSignature {
    pub const ALL: [TimeSignature; 4] = [
        TimeSignature::None,
        TimeSignature::TwoFour,
        TimeSignature::ThreeFour,
        TimeSignature::FourFour,
    ];

    /// Beats per measure (0 = no accent)
    pub fn beats_per_measure(&self) -> u8 {
        match self {
            TimeSignature::None => 0,
            TimeSignature::TwoFour => 2,
            TimeSignature::ThreeFour => 3,
            TimeSignature::FourFour => 4,
        }
    }

    pub fn from_beats_per_measure(beats: u8) -> Option<Self> {
        match beats {
            0 => Some(TimeSignature::None),
            2 => Some(TimeSignature::TwoFour),
            3 => Some(TimeSignature::ThreeFour),
            4 => Some(TimeSignature::FourFour),
            _ => None,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSignature::None => write!(f, "None"),
            other => write!(f, "{}/4", other.beats_per_measure()),
        }
    }
}

/// Tone of the regular (non-accented) tick, named after its note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Tone {
    pub const ALL: [Tone; 7] = [
        Tone::A,
        Tone::B,
        Tone::C,
        Tone::D,
        Tone::E,
        Tone::F,
        Tone::G,
    ];

    /// Fixed frequency table (Hz)
    pub fn frequency_hz(&self) -> f32 {
        match self {
            Tone::A => 440.0,
            Tone::B => 494.0,
            Tone::C => 523.0,
            Tone::D => 587.0,
            Tone::E => 659.0,
            Tone::F => 699.0,
            Tone::G => 784.0,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Tone::A => 'A',
            Tone::B => 'B',
            Tone::C => 'C',
            Tone::D => 'D',
            Tone::E => 'E',
            Tone::F => 'F',
            Tone::G => 'G',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.letter() == letter)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
