// Sequencer module
// Musical values, tick engine, tap tempo and run control

pub mod metronome;
pub mod tap_tempo;
pub mod timeline;
pub mod transport;

pub use metronome::{Beat, ClickType, Pacer, ThreadPacer, TickEngine};
pub use tap_tempo::{TapTempo, estimate_tempo};
pub use timeline::{ACCENT_FREQUENCY_HZ, Tempo, TimeSignature, Tone};
pub use transport::{RunController, RunState, TickLoop};
