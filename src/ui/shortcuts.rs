// Keyboard shortcuts

use eframe::egui;

/// User action reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Tap,
    ToggleRun,
    Quit,
    TempoUp,
    TempoDown,
}

pub const SHORTCUTS: [(egui::Key, UiAction); 5] = [
    (egui::Key::T, UiAction::Tap),
    (egui::Key::Space, UiAction::ToggleRun),
    (egui::Key::Q, UiAction::Quit),
    (egui::Key::ArrowRight, UiAction::TempoUp),
    (egui::Key::ArrowLeft, UiAction::TempoDown),
];

pub fn map_key(key: egui::Key) -> Option<UiAction> {
    SHORTCUTS
        .iter()
        .find(|(shortcut, _)| *shortcut == key)
        .map(|(_, action)| *action)
}

/// Actions whose key went down this frame
/// The key presses are consumed so focused widgets don't also react to them.
pub fn take_pressed_actions(input: &mut egui::InputState) -> Vec<UiAction> {
    SHORTCUTS
        .iter()
        .filter(|(key, _)| input.consume_key(egui::Modifiers::NONE, *key))
        .map(|(_, action)| *action)
        .collect()
}

/// Lines for the shortcuts dialog
pub fn describe() -> &'static [(&'static str, &'static str)] {
    &[
        ("T", "Tap tempo"),
        ("Space", "Start / stop"),
        ("Q", "Quit"),
        ("→", "Tempo +1"),
        ("←", "Tempo −1"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_keys() {
        assert_eq!(map_key(egui::Key::T), Some(UiAction::Tap));
        assert_eq!(map_key(egui::Key::Space), Some(UiAction::ToggleRun));
        assert_eq!(map_key(egui::Key::Q), Some(UiAction::Quit));
        assert_eq!(map_key(egui::Key::ArrowRight), Some(UiAction::TempoUp));
        assert_eq!(map_key(egui::Key::ArrowLeft), Some(UiAction::TempoDown));
    }

    #[test]
    fn test_other_key_returns_none() {
        assert!(map_key(egui::Key::X).is_none());
        assert!(map_key(egui::Key::Enter).is_none());
    }

    #[test]
    fn test_every_shortcut_is_described() {
        assert_eq!(describe().len(), SHORTCUTS.len());
    }
}
