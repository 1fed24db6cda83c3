// Tap tempo - BPM from the gap between two taps

use std::time::{Duration, Instant};

use super::timeline::Tempo;

/// Estimate a tempo from the interval between two taps
/// Returns `None` for a zero interval; results are clamped to the tempo bounds.
pub fn estimate_tempo(interval: Duration) -> Option<Tempo> {
    let seconds = interval.as_secs_f64();
    if seconds <= 0.0 {
        return None;
    }
    Some(Tempo::clamped((60.0 / seconds).round() as i64))
}

/// Two-tap estimator: the first tap arms it, the second yields a tempo and disarms it
#[derive(Debug, Default, Clone, Copy)]
pub struct TapTempo {
    armed_at: Option<Instant>,
}

impl TapTempo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn reset(&mut self) {
        self.armed_at = None;
    }

    /// Register a tap at `now`
    pub fn tap(&mut self, now: Instant) -> Option<Tempo> {
        match self.armed_at.take() {
            None => {
                self.armed_at = Some(now);
                None
            }
            Some(first) => {
                let tempo = estimate_tempo(now.saturating_duration_since(first));
                if tempo.is_none() {
                    // Double event at the same instant: start over from this tap
                    log::debug!("Ignoring tap pair with zero interval");
                    self.armed_at = Some(now);
                }
                tempo
            }
        }
    }
}
