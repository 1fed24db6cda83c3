// Transport - Start/stop control and the background tick loop
// The UI drives a RunController; the tick loop sleeps on it while stopped

use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::metronome::{Pacer, TickEngine};
use crate::audio::player::TonePlayer;
use crate::messaging::channels::{BeatProducer, NotificationProducer};
use crate::messaging::mailbox::SettingsMailbox;
use crate::messaging::notification::{Notification, NotificationCategory};

/// Run state shared between the UI and the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    /// Terminal: the application is shutting down
    Closing,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// Run flag with wake-up on every transition
#[derive(Clone, Default)]
pub struct RunController {
    inner: Arc<(Mutex<RunState>, Condvar)>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `next` unless closing; returns true if the state changed
    fn transition(&self, next: RunState) -> bool {
        let mut state = self.lock();
        if *state == RunState::Closing || *state == next {
            return false;
        }
        log::debug!("Run state {:?} -> {:?}", *state, next);
        *state = next;
        self.inner.1.notify_all();
        true
    }

    pub fn state(&self) -> RunState {
        *self.lock()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    pub fn start(&self) -> bool {
        self.transition(RunState::Running)
    }

    pub fn stop(&self) -> bool {
        self.transition(RunState::Stopped)
    }

    /// Start when stopped, stop when running
    pub fn toggle(&self) -> RunState {
        let mut state = self.lock();
        *state = match *state {
            RunState::Stopped => RunState::Running,
            RunState::Running => RunState::Stopped,
            RunState::Closing => RunState::Closing,
        };
        self.inner.1.notify_all();
        *state
    }

    pub fn close(&self) {
        self.transition(RunState::Closing);
    }

    /// Block while stopped; returns Running or Closing
    pub fn wait_while_stopped(&self) -> RunState {
        let guard = self.lock();
        let guard = self
            .inner
            .1
            .wait_while(guard, |state| *state == RunState::Stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Background loop: one tick per iteration while running
pub struct TickLoop<P: TonePlayer, W: Pacer> {
    engine: TickEngine<P, W>,
    controller: RunController,
    mailbox: SettingsMailbox,
    beat_tx: BeatProducer,
    notification_tx: Arc<Mutex<NotificationProducer>>,
}

impl<P, W> TickLoop<P, W>
where
    P: TonePlayer + Send + 'static,
    W: Pacer + Send + 'static,
{
    pub fn new(
        engine: TickEngine<P, W>,
        controller: RunController,
        mailbox: SettingsMailbox,
        beat_tx: BeatProducer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Self {
        Self {
            engine,
            controller,
            mailbox,
            beat_tx,
            notification_tx,
        }
    }

    /// Run on a dedicated thread
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("tick-loop".to_string())
            .spawn(move || self.run())
    }

    pub fn run(mut self) {
        log::info!("Tick loop started");

        while self.controller.wait_while_stopped() == RunState::Running {
            if let Some(settings) = self.mailbox.take() {
                log::debug!("Applying settings: {:?}", settings);
                self.engine.apply(&settings);
            }

            match self.engine.tick() {
                Ok(beat) => {
                    let _ = ringbuf::traits::Producer::try_push(&mut self.beat_tx, beat);
                }
                Err(e) => {
                    log::error!("Tick failed: {}", e);
                    self.controller.stop();
                    if let Ok(mut tx) = self.notification_tx.lock() {
                        let notif = Notification::error(
                            NotificationCategory::Audio,
                            format!("Metronome stopped: {}", e),
                        );
                        let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
                    }
                }
            }
        }

        log::info!("Tick loop exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_initial_state_is_stopped() {
        let controller = RunController::new();
        assert_eq!(controller.state(), RunState::Stopped);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_start_stop_transitions() {
        let controller = RunController::new();

        assert!(controller.start());
        assert!(controller.is_running());
        assert!(!controller.start());

        assert!(controller.stop());
        assert_eq!(controller.state(), RunState::Stopped);
        assert!(!controller.stop());
    }

    #[test]
    fn test_toggle() {
        let controller = RunController::new();
        assert_eq!(controller.toggle(), RunState::Running);
        assert_eq!(controller.toggle(), RunState::Stopped);
    }

    #[test]
    fn test_closing_is_terminal() {
        let controller = RunController::new();
        controller.start();
        controller.close();

        assert!(!controller.start());
        assert!(!controller.stop());
        assert_eq!(controller.toggle(), RunState::Closing);
        assert_eq!(controller.state(), RunState::Closing);
    }

    #[test]
    fn test_wait_returns_immediately_when_running() {
        let controller = RunController::new();
        controller.start();
        assert_eq!(controller.wait_while_stopped(), RunState::Running);
    }

    #[test]
    fn test_wait_wakes_on_start() {
        let controller = RunController::new();
        let waiter = controller.clone();

        let handle = thread::spawn(move || waiter.wait_while_stopped());

        thread::sleep(Duration::from_millis(20));
        controller.start();

        assert_eq!(handle.join().unwrap(), RunState::Running);
    }

    #[test]
    fn test_wait_wakes_on_close() {
        let controller = RunController::new();
        let waiter = controller.clone();

        let handle = thread::spawn(move || waiter.wait_while_stopped());

        thread::sleep(Duration::from_millis(20));
        controller.close();

        assert_eq!(handle.join().unwrap(), RunState::Closing);
    }
}
