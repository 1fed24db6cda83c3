// Preferences - The three values remembered between runs
//
// On disk: `<tempo>\n<beats per measure>\n<tone letter>\n`, no versioning.

pub mod store;

use std::fmt;

use crate::sequencer::timeline::{Tempo, TimeSignature, Tone};

pub use store::{LoadOutcome, PreferencesStore};

/// Preferences parse errors
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Missing {0} line")]
    MissingLine(&'static str),

    #[error("Invalid {field} value: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Tempo out of range: {0} (expected {}..={})", Tempo::MIN_BPM, Tempo::MAX_BPM)]
    TempoOutOfRange(i64),

    #[error("Unsupported beats per measure: {0} (expected 0, 2, 3 or 4)")]
    UnsupportedSignature(i64),

    #[error("Unknown tone: {0:?} (expected a letter from A to G)")]
    UnknownTone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tempo, time signature and tone, as persisted and as posted to the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub tone: Tone,
}

impl Preferences {
    /// Parse the three-line format
    pub fn parse(text: &str) -> Result<Self, PreferencesError> {
        let mut lines = text.lines().map(str::trim);

        let tempo_line = lines.next().ok_or(PreferencesError::MissingLine("tempo"))?;
        let tempo = parse_integer("tempo", tempo_line)?;
        let tempo = u16::try_from(tempo)
            .ok()
            .and_then(Tempo::new)
            .ok_or(PreferencesError::TempoOutOfRange(tempo))?;

        let beats_line = lines
            .next()
            .ok_or(PreferencesError::MissingLine("beats per measure"))?;
        let beats = parse_integer("beats per measure", beats_line)?;
        let time_signature = u8::try_from(beats)
            .ok()
            .and_then(TimeSignature::from_beats_per_measure)
            .ok_or(PreferencesError::UnsupportedSignature(beats))?;

        let tone_line = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or(PreferencesError::MissingLine("tone"))?;
        let mut letters = tone_line.chars();
        let tone = match (letters.next(), letters.next()) {
            (Some(letter), None) => Tone::from_letter(letter),
            _ => None,
        }
        .ok_or_else(|| PreferencesError::UnknownTone(tone_line.to_string()))?;

        Ok(Self {
            tempo,
            time_signature,
            tone,
        })
    }
}

fn parse_integer(field: &'static str, line: &str) -> Result<i64, PreferencesError> {
    line.parse::<i64>()
        .map_err(|_| PreferencesError::InvalidNumber {
            field,
            value: line.to_string(),
        })
}

impl fmt::Display for Preferences {
    /// The on-disk format
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tempo.bpm())?;
        writeln!(f, "{}", self.time_signature.beats_per_measure())?;
        writeln!(f, "{}", self.tone.letter())
    }
}
