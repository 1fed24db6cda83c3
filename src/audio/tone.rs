// Tone generator - Pure sine rendered in the audio callback on request
//
// The tick thread posts (frequency, length) requests through atomics;
// the callback-owned renderer picks them up once per buffer.

use std::f32::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::audio::dsp_utils::OnePoleSmoother;
use crate::audio::parameters::AtomicF32;

/// Peak amplitude of the tone
pub const TONE_AMPLITUDE: f32 = 0.5;

/// Gate smoothing, short enough to keep the tone crisp without pops
const GATE_TIME_CONSTANT_MS: f32 = 2.0;

/// Tone request shared between the tick thread and the audio callback
#[derive(Clone, Debug, Default)]
pub struct SharedTone {
    frequency: AtomicF32,
    frames: Arc<AtomicU64>,
    generation: Arc<AtomicU64>,
}

impl SharedTone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the callback to play `frames` frames at `frequency_hz`
    pub fn request(&self, frequency_hz: f32, frames: u64) {
        self.frequency.set(frequency_hz);
        self.frames.store(frames, Ordering::Relaxed);
        // Publishes the two stores above
        self.generation.fetch_add(1, Ordering::Release);
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Sine renderer owned by the audio callback
pub struct ToneRenderer {
    shared: SharedTone,
    sample_rate: f32,
    seen_generation: u64,
    remaining_frames: u64,
    phase: f32,
    phase_increment: f32,
    gate: OnePoleSmoother,
}

impl ToneRenderer {
    pub fn new(shared: SharedTone, sample_rate: f32) -> Self {
        let seen_generation = shared.generation();
        Self {
            shared,
            sample_rate,
            seen_generation,
            remaining_frames: 0,
            phase: 0.0,
            phase_increment: 0.0,
            gate: OnePoleSmoother::new(0.0, GATE_TIME_CONSTANT_MS, sample_rate),
        }
    }

    /// Pick up a pending request; call once per buffer
    pub fn poll(&mut self) {
        let generation = self.shared.generation();
        if generation == self.seen_generation {
            return;
        }
        self.seen_generation = generation;

        let frequency = self.shared.frequency.get();
        self.phase_increment = TAU * frequency / self.sample_rate;
        self.remaining_frames = self.shared.frames.load(Ordering::Relaxed);
    }

    /// True while a tone is playing or fading out
    pub fn is_sounding(&self) -> bool {
        self.remaining_frames > 0 || self.gate.get() > 0.0
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let target = if self.remaining_frames > 0 {
            self.remaining_frames -= 1;
            1.0
        } else {
            0.0
        };

        let gain = self.gate.process(target);
        if gain == 0.0 {
            self.phase = 0.0;
            return 0.0;
        }

        let sample = self.phase.sin() * gain * TONE_AMPLITUDE;
        self.phase = (self.phase + self.phase_increment) % TAU;
        sample
    }
}
