use metromono::messaging::channels::NotificationProducer;
use metromono::messaging::notification::{Notification, NotificationCategory};
use metromono::ui::app::MetronomeApp;
use metromono::ui::controls::Controls;
use metromono::{
    AudioEngine, LoadOutcome, PreferencesStore, RunController, SettingsMailbox, TickEngine,
    TickLoop, ToneHandle, create_beat_channel, create_notification_channel, logging,
};
use std::sync::{Arc, Mutex};

// Ringbuffer capacity constants
// The UI drains both every frame; a beat every 200ms at most
const BEAT_RINGBUFFER_CAPACITY: usize = 64;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

fn notify(notification_tx: &Arc<Mutex<NotificationProducer>>, notification: Notification) {
    if let Ok(mut tx) = notification_tx.lock() {
        let _ = ringbuf::traits::Producer::try_push(&mut *tx, notification);
    }
}

fn main() {
    match logging::init_logger() {
        Ok(path) => log::info!("Metromono starting, logging to {}", path.display()),
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    let (notification_tx, notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    let store = PreferencesStore::at_default_location();
    let outcome = store.load();
    if let LoadOutcome::Malformed(e) = &outcome {
        notify(
            &notification_tx,
            Notification::warning(
                NotificationCategory::Preferences,
                format!("Ignoring saved settings ({}), using defaults", e),
            ),
        );
    }
    let preferences = outcome.preferences();

    let audio_engine = match AudioEngine::new(notification_tx.clone()) {
        Ok(engine) => Some(engine),
        Err(e) => {
            log::error!("Audio engine unavailable: {}", e);
            notify(
                &notification_tx,
                Notification::error(NotificationCategory::Audio, e.to_string()),
            );
            None
        }
    };
    let player = audio_engine
        .as_ref()
        .map(AudioEngine::tone_handle)
        .unwrap_or_else(ToneHandle::disconnected);

    let controller = RunController::new();
    let mailbox = SettingsMailbox::new(preferences);
    let (beat_tx, beat_rx) = create_beat_channel(BEAT_RINGBUFFER_CAPACITY);

    let tick_loop = TickLoop::new(
        TickEngine::new(player),
        controller.clone(),
        mailbox.clone(),
        beat_tx,
        notification_tx,
    );
    // Not joined on exit: at worst the process outlives the window by one beat
    if let Err(e) = tick_loop.spawn() {
        log::error!("Cannot start tick thread: {}", e);
        eprintln!("ERROR: cannot start tick thread: {}", e);
        return;
    }

    let controls = Controls::new(preferences, controller.clone(), mailbox);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 260.0])
            .with_title("Metromono"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Metromono",
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(MetronomeApp::new(
                controls,
                store,
                audio_engine,
                beat_rx,
                notification_rx,
            )))
        }),
    );

    if let Err(e) = result {
        log::error!("UI error: {}", e);
        eprintln!("ERROR: {}", e);
    }
    controller.close();
}
