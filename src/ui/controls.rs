// Controls - UI state behind the widgets and shortcuts
// Every settings change is posted to the tick loop's mailbox

use std::time::Instant;

use crate::messaging::mailbox::SettingsMailbox;
use crate::preferences::{Preferences, PreferencesError, PreferencesStore};
use crate::sequencer::tap_tempo::TapTempo;
use crate::sequencer::timeline::{Tempo, TimeSignature, Tone};
use crate::sequencer::transport::{RunController, RunState};
use crate::ui::shortcuts::UiAction;

pub struct Controls {
    settings: Preferences,
    tap: TapTempo,
    controller: RunController,
    mailbox: SettingsMailbox,
}

impl Controls {
    pub fn new(settings: Preferences, controller: RunController, mailbox: SettingsMailbox) -> Self {
        mailbox.post(settings);
        Self {
            settings,
            tap: TapTempo::new(),
            controller,
            mailbox,
        }
    }

    pub fn settings(&self) -> Preferences {
        self.settings
    }

    pub fn run_state(&self) -> RunState {
        self.controller.state()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Tapping is only possible while stopped
    pub fn tap_enabled(&self) -> bool {
        self.run_state() == RunState::Stopped
    }

    pub fn tap_armed(&self) -> bool {
        self.tap.is_armed()
    }

    fn update(&mut self, settings: Preferences) {
        if settings != self.settings {
            self.settings = settings;
            self.mailbox.post(settings);
        }
    }

    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.update(Preferences {
            tempo,
            ..self.settings
        });
    }

    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.update(Preferences {
            time_signature,
            ..self.settings
        });
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.update(Preferences {
            tone,
            ..self.settings
        });
    }

    pub fn tempo_up(&mut self) {
        self.set_tempo(self.settings.tempo.increment());
    }

    pub fn tempo_down(&mut self) {
        self.set_tempo(self.settings.tempo.decrement());
    }

    /// Register a tap; returns the new tempo once a pair is complete
    pub fn tap(&mut self, now: Instant) -> Option<Tempo> {
        if !self.tap_enabled() {
            return None;
        }
        let tempo = self.tap.tap(now)?;
        log::info!("Tap tempo: {}", tempo);
        self.set_tempo(tempo);
        Some(tempo)
    }

    pub fn toggle_run(&mut self) -> RunState {
        let state = self.controller.toggle();
        if state.is_running() {
            // A half-finished tap pair is meaningless once ticking
            self.tap.reset();
        }
        log::info!("Metronome {:?}", state);
        state
    }

    /// Apply a shortcut; returns true when the user asked to quit
    pub fn handle(&mut self, action: UiAction, now: Instant) -> bool {
        match action {
            UiAction::Tap => {
                self.tap(now);
            }
            UiAction::ToggleRun => {
                self.toggle_run();
            }
            UiAction::TempoUp => self.tempo_up(),
            UiAction::TempoDown => self.tempo_down(),
            UiAction::Quit => return true,
        }
        false
    }

    /// Release the tick loop and persist the current settings
    pub fn shutdown(&mut self, store: &PreferencesStore) -> Result<(), PreferencesError> {
        self.controller.close();
        store.save(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn controls() -> (Controls, RunController, SettingsMailbox) {
        let controller = RunController::new();
        let mailbox = SettingsMailbox::default();
        let controls = Controls::new(Preferences::default(), controller.clone(), mailbox.clone());
        (controls, controller, mailbox)
    }

    #[test]
    fn test_initial_settings_are_posted() {
        let (_, _, mailbox) = controls();
        assert_eq!(mailbox.take(), Some(Preferences::default()));
    }

    #[test]
    fn test_changes_are_posted() {
        let (mut controls, _, mailbox) = controls();
        mailbox.take();

        controls.set_tone(Tone::F);
        controls.set_time_signature(TimeSignature::FourFour);

        let posted = mailbox.take().unwrap();
        assert_eq!(posted.tone, Tone::F);
        assert_eq!(posted.time_signature, TimeSignature::FourFour);
    }

    #[test]
    fn test_unchanged_value_is_not_posted() {
        let (mut controls, _, mailbox) = controls();
        mailbox.take();

        controls.set_tone(Tone::A);
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_tempo_arrows_clamp() {
        let (mut controls, _, _) = controls();

        controls.set_tempo(Tempo::new(300).unwrap());
        controls.handle(UiAction::TempoUp, Instant::now());
        assert_eq!(controls.settings().tempo.bpm(), 300);

        controls.set_tempo(Tempo::new(1).unwrap());
        controls.handle(UiAction::TempoDown, Instant::now());
        assert_eq!(controls.settings().tempo.bpm(), 1);

        controls.handle(UiAction::TempoUp, Instant::now());
        assert_eq!(controls.settings().tempo.bpm(), 2);
    }

    #[test]
    fn test_tap_sets_tempo() {
        let (mut controls, _, _) = controls();
        let t0 = Instant::now();

        assert!(controls.tap(t0).is_none());
        assert!(controls.tap_armed());
        let tempo = controls.tap(t0 + Duration::from_millis(500)).unwrap();

        assert_eq!(tempo.bpm(), 120);
        assert_eq!(controls.settings().tempo.bpm(), 120);
    }

    #[test]
    fn test_tap_disabled_while_running() {
        let (mut controls, _, _) = controls();
        let t0 = Instant::now();

        controls.toggle_run();
        assert!(!controls.tap_enabled());
        assert!(controls.tap(t0).is_none());
        assert!(controls.tap(t0 + Duration::from_secs(1)).is_none());
        assert_eq!(controls.settings().tempo.bpm(), 60);

        controls.toggle_run();
        assert!(controls.tap_enabled());
    }

    #[test]
    fn test_start_disarms_tap() {
        let (mut controls, _, _) = controls();
        controls.tap(Instant::now());
        controls.toggle_run();
        assert!(!controls.tap_armed());
    }

    #[test]
    fn test_space_toggles_and_q_quits() {
        let (mut controls, controller, _) = controls();

        assert!(!controls.handle(UiAction::ToggleRun, Instant::now()));
        assert!(controller.is_running());
        assert!(!controls.handle(UiAction::ToggleRun, Instant::now()));
        assert!(!controller.is_running());

        assert!(controls.handle(UiAction::Quit, Instant::now()));
    }

    #[test]
    fn test_shutdown_closes_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferencesStore::new(dir.path().join("preferences"));
        let (mut controls, controller, _) = controls();

        controls.set_tempo(Tempo::new(88).unwrap());
        controls.toggle_run();
        controls.shutdown(&store).unwrap();

        assert_eq!(controller.state(), RunState::Closing);
        assert_eq!(store.load().preferences().tempo.bpm(), 88);
    }
}
