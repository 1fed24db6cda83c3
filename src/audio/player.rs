// Tone player - Blocking "play this pitch for this long" seam used by the tick engine

use std::time::Duration;

/// Audio errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio configuration error: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}. Supported formats: F32, I16, U16")]
    UnsupportedFormat(String),

    #[error("Audio stream error: {0}")]
    Stream(String),

    #[error("Audio output is not available")]
    DeviceUnavailable,
}

/// Plays a pure tone and returns once it has finished
pub trait TonePlayer {
    fn play_tone(&mut self, frequency_hz: f32, duration: Duration) -> Result<(), AudioError>;
}
