// Metromono - Library exports for the binary and tests

pub mod audio;
pub mod logging;
pub mod messaging;
pub mod preferences;
pub mod sequencer;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::engine::{AudioEngine, ToneHandle};
pub use audio::player::{AudioError, TonePlayer};
pub use messaging::channels::{create_beat_channel, create_notification_channel};
pub use messaging::mailbox::SettingsMailbox;
pub use preferences::{LoadOutcome, Preferences, PreferencesError, PreferencesStore};
pub use sequencer::{
    Beat, ClickType, Pacer, RunController, RunState, TapTempo, Tempo, ThreadPacer, TickEngine,
    TickLoop, TimeSignature, Tone,
};
