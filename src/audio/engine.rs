// Audio engine - CPAL output stream playing the metronome tone
//
// # Format Support
//
// The device's preferred sample format is detected with `sample_format()`
// and the matching stream is built (F32, I16 or U16). The tone is rendered
// in f32 and converted when written to the output buffer.
//
// # Stream Limitations
//
// On macOS (CoreAudio) the Stream is not Send, so the engine stays on the
// main thread. The tick thread only receives a `ToneHandle`, which talks to
// the callback through atomics.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::audio::format_conversion::write_mono_to_interleaved_frame;
use crate::audio::player::{AudioError, TonePlayer};
use crate::audio::status::{AtomicDeviceStatus, DeviceStatus};
use crate::audio::tone::{SharedTone, ToneRenderer};
use crate::messaging::channels::NotificationProducer;
use crate::messaging::notification::{Notification, NotificationCategory};

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    tone: SharedTone,
    pub status: AtomicDeviceStatus,
}

impl AudioEngine {
    pub fn new(notification_tx: Arc<Mutex<NotificationProducer>>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        log::info!(
            "Audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;

        let sample_format = supported_config.sample_format();
        log::debug!("Audio config: {:?}", supported_config);

        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let tone = SharedTone::new();
        let status = AtomicDeviceStatus::new(DeviceStatus::Connecting);

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                ToneRenderer::new(tone.clone(), sample_rate),
                status.clone(),
                notification_tx.clone(),
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                ToneRenderer::new(tone.clone(), sample_rate),
                status.clone(),
                notification_tx.clone(),
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                ToneRenderer::new(tone.clone(), sample_rate),
                status.clone(),
                notification_tx.clone(),
            ),
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        status.set(DeviceStatus::Connected);
        log::info!("Audio engine started: {} Hz, {} channels", sample_rate, channels);

        if let Ok(mut tx) = notification_tx.try_lock() {
            let notif = Notification::info(
                NotificationCategory::Audio,
                format!("Audio connected: {} Hz", sample_rate),
            );
            let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
        }

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            tone,
            status,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Player for the tick thread
    pub fn tone_handle(&self) -> ToneHandle {
        ToneHandle {
            tone: self.tone.clone(),
            status: self.status.clone(),
            sample_rate: self.sample_rate,
        }
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut renderer: ToneRenderer,
        status: AtomicDeviceStatus,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    // No allocations, no I/O, no blocking locks
                    renderer.poll();
                    for frame in data.chunks_mut(channels) {
                        write_mono_to_interleaved_frame(renderer.next_sample(), frame);
                    }
                },
                move |err| {
                    // Runs outside the audio callback, I/O is fine here
                    log::error!("Audio stream error: {}", err);
                    status.set(DeviceStatus::Error);

                    if let Ok(mut tx) = notification_tx.try_lock() {
                        let notif = Notification::error(
                            NotificationCategory::Audio,
                            format!("Audio stream error: {}", err),
                        );
                        let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
                    }
                },
                None,
            )
            .map_err(|e| AudioError::Stream(e.to_string()))
    }
}

/// `Send` handle that plays tones through the engine's stream
#[derive(Clone, Debug)]
pub struct ToneHandle {
    tone: SharedTone,
    status: AtomicDeviceStatus,
    sample_rate: f32,
}

impl ToneHandle {
    /// Handle with no stream behind it; every tone fails
    pub fn disconnected() -> Self {
        Self {
            tone: SharedTone::new(),
            status: AtomicDeviceStatus::new(DeviceStatus::Disconnected),
            sample_rate: 48000.0,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        self.status.get()
    }
}

impl TonePlayer for ToneHandle {
    fn play_tone(&mut self, frequency_hz: f32, duration: Duration) -> Result<(), AudioError> {
        if self.status.get() != DeviceStatus::Connected {
            return Err(AudioError::DeviceUnavailable);
        }

        let frames = (duration.as_secs_f64() * self.sample_rate as f64).round() as u64;
        self.tone.request(frequency_hz, frames);
        thread::sleep(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_handle_fails_fast() {
        let mut handle = ToneHandle::disconnected();
        assert_eq!(handle.status(), DeviceStatus::Disconnected);

        let result = handle.play_tone(440.0, Duration::from_secs(10));
        assert!(matches!(result, Err(AudioError::DeviceUnavailable)));
    }

    #[test]
    fn test_connected_handle_blocks_for_duration() {
        let mut handle = ToneHandle::disconnected();
        handle.status.set(DeviceStatus::Connected);

        let start = std::time::Instant::now();
        handle.play_tone(440.0, Duration::from_millis(30)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
