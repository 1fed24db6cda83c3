// Integration test: background tick loop driven by the run controller

use metromono::messaging::channels::NotificationProducer;
use metromono::{
    AudioError, Pacer, Preferences, RunController, RunState, SettingsMailbox, Tempo, TickEngine,
    TickLoop, TimeSignature, Tone, TonePlayer, create_beat_channel, create_notification_channel,
};
use ringbuf::traits::Consumer;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct RecordingPlayer {
    tones: Arc<Mutex<Vec<f32>>>,
}

impl TonePlayer for RecordingPlayer {
    fn play_tone(&mut self, frequency_hz: f32, _duration: Duration) -> Result<(), AudioError> {
        self.tones.lock().unwrap().push(frequency_hz);
        Ok(())
    }
}

struct BrokenPlayer;

impl TonePlayer for BrokenPlayer {
    fn play_tone(&mut self, _: f32, _: Duration) -> Result<(), AudioError> {
        Err(AudioError::DeviceUnavailable)
    }
}

/// Short real wait so the loop doesn't spin
struct ShortPacer;

impl Pacer for ShortPacer {
    fn wait(&mut self, _duration: Duration) {
        thread::sleep(Duration::from_millis(1));
    }
}

fn notification_tx() -> (
    Arc<Mutex<NotificationProducer>>,
    metromono::messaging::channels::NotificationConsumer,
) {
    let (tx, rx) = create_notification_channel(8);
    (Arc::new(Mutex::new(tx)), rx)
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[test]
fn test_loop_idles_until_started_and_exits_on_close() {
    let player = RecordingPlayer::default();
    let controller = RunController::new();
    let mailbox = SettingsMailbox::new(Preferences::default());
    let (beat_tx, _beat_rx) = create_beat_channel(16);
    let (notification_tx, _notification_rx) = notification_tx();

    let handle = TickLoop::new(
        TickEngine::with_pacer(player.clone(), ShortPacer),
        controller.clone(),
        mailbox,
        beat_tx,
        notification_tx,
    )
    .spawn()
    .unwrap();

    thread::sleep(Duration::from_millis(30));
    assert!(player.tones.lock().unwrap().is_empty(), "ticked while stopped");

    controller.start();
    assert!(wait_until(Duration::from_secs(2), || player.tones.lock().unwrap().len() >= 5));

    controller.stop();
    thread::sleep(Duration::from_millis(20));
    let count = player.tones.lock().unwrap().len();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(player.tones.lock().unwrap().len(), count, "ticked after stop");

    controller.close();
    handle.join().unwrap();
}

#[test]
fn test_loop_applies_posted_settings() {
    let player = RecordingPlayer::default();
    let controller = RunController::new();
    let mailbox = SettingsMailbox::new(Preferences {
        tempo: Tempo::new(120).unwrap(),
        time_signature: TimeSignature::None,
        tone: Tone::C,
    });
    let (beat_tx, mut beat_rx) = create_beat_channel(256);
    let (notification_tx, _notification_rx) = notification_tx();

    let handle = TickLoop::new(
        TickEngine::with_pacer(player.clone(), ShortPacer),
        controller.clone(),
        mailbox.clone(),
        beat_tx,
        notification_tx,
    )
    .spawn()
    .unwrap();

    controller.start();
    assert!(wait_until(Duration::from_secs(2), || player.tones.lock().unwrap().len() >= 3));

    mailbox.post(Preferences {
        tempo: Tempo::new(120).unwrap(),
        time_signature: TimeSignature::ThreeFour,
        tone: Tone::G,
    });
    assert!(wait_until(Duration::from_secs(2), || {
        player.tones.lock().unwrap().iter().filter(|f| **f == 880.0).count() >= 3
    }));

    controller.close();
    handle.join().unwrap();

    let tones = player.tones.lock().unwrap();
    assert!(tones.iter().take(3).all(|f| *f == Tone::C.frequency_hz()));
    assert!(tones.contains(&Tone::G.frequency_hz()));

    // Once in 3/4 the accent comes back every third beat
    let first_accent = tones.iter().position(|f| *f == 880.0).unwrap();
    for (offset, frequency) in tones[first_accent..].iter().enumerate() {
        let expected = if offset % 3 == 0 { 880.0 } else { Tone::G.frequency_hz() };
        assert_eq!(*frequency, expected, "beat {} after the first accent", offset);
    }

    let beats: Vec<_> = std::iter::from_fn(|| beat_rx.try_pop()).collect();
    assert!(beats.iter().filter(|b| b.is_accent()).all(|b| b.index == 1));
}

#[test]
fn test_audio_failure_stops_and_notifies() {
    let controller = RunController::new();
    let (beat_tx, _beat_rx) = create_beat_channel(16);
    let (notification_tx, mut notification_rx) = notification_tx();

    let handle = TickLoop::new(
        TickEngine::with_pacer(BrokenPlayer, ShortPacer),
        controller.clone(),
        SettingsMailbox::default(),
        beat_tx,
        notification_tx,
    )
    .spawn()
    .unwrap();

    controller.start();
    assert!(wait_until(Duration::from_secs(2), || {
        controller.state() == RunState::Stopped
    }));

    let notification = notification_rx.try_pop().expect("no notification");
    assert!(notification.message.contains("not available"));

    controller.close();
    handle.join().unwrap();
}
