// Single-slot mailbox - Latest settings snapshot from the UI to the tick loop

use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use crate::preferences::Preferences;

/// Holds at most one value; posting overwrites, taking empties the slot
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> Mailbox<T> {
    /// Mailbox pre-loaded with an initial value
    pub fn new(initial: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(initial))),
        }
    }

    /// Replace any unread value
    pub fn post(&self, value: T) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Take the latest value without blocking
    /// Returns `None` when nothing new was posted or the UI holds the lock right now.
    pub fn take(&self) -> Option<T> {
        match self.slot.try_lock() {
            Ok(mut slot) => slot.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

pub type SettingsMailbox = Mailbox<Preferences>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_value_is_taken_once() {
        let mailbox = Mailbox::new(7);
        assert_eq!(mailbox.take(), Some(7));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_only_latest_value_is_kept() {
        let mailbox = Mailbox::default();
        mailbox.post(1);
        mailbox.post(2);
        mailbox.post(3);
        assert_eq!(mailbox.take(), Some(3));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let ui_side = Mailbox::default();
        let loop_side = ui_side.clone();
        ui_side.post("4/4");
        assert_eq!(loop_side.take(), Some("4/4"));
    }
}
