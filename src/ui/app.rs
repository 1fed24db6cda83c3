// Main UI App

use eframe::egui;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::audio::engine::AudioEngine;
use crate::messaging::channels::{BeatConsumer, NotificationConsumer};
use crate::messaging::notification::{Notification, NotificationLevel};
use crate::preferences::PreferencesStore;
use crate::sequencer::metronome::Beat;
use crate::sequencer::timeline::{Tempo, TimeSignature, Tone};
use crate::ui::controls::Controls;
use crate::ui::dialogs::Dialog;
use crate::ui::shortcuts::{self, UiAction};

/// How long the beat indicator stays lit
const BEAT_FLASH: Duration = Duration::from_millis(150);

const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 120, 40);
const BEAT_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 255);

pub struct MetronomeApp {
    controls: Controls,
    store: PreferencesStore,
    // Keeps the stream alive; None when no output device could be opened
    _audio_engine: Option<AudioEngine>,
    beat_rx: BeatConsumer,
    last_beat: Option<(Beat, Instant)>,
    // Notification system
    notification_rx: NotificationConsumer,
    notification_queue: VecDeque<Notification>,
    max_notifications: usize,
    dialog: Option<Dialog>,
    shut_down: bool,
}

impl MetronomeApp {
    pub fn new(
        controls: Controls,
        store: PreferencesStore,
        audio_engine: Option<AudioEngine>,
        beat_rx: BeatConsumer,
        notification_rx: NotificationConsumer,
    ) -> Self {
        Self {
            controls,
            store,
            _audio_engine: audio_engine,
            beat_rx,
            last_beat: None,
            notification_rx,
            notification_queue: VecDeque::new(),
            max_notifications: 10,
            dialog: None,
            shut_down: false,
        }
    }

    fn push_notification(&mut self, notification: Notification) {
        self.notification_queue.push_back(notification);
        if self.notification_queue.len() > self.max_notifications {
            self.notification_queue.pop_front();
        }
    }

    /// Drain the ringbuffers filled by the tick loop and the audio callbacks
    fn poll_channels(&mut self) {
        while let Some(notification) = ringbuf::traits::Consumer::try_pop(&mut self.notification_rx)
        {
            self.push_notification(notification);
        }

        while let Some(beat) = ringbuf::traits::Consumer::try_pop(&mut self.beat_rx) {
            self.last_beat = Some((beat, Instant::now()));
        }
    }

    /// Most recent notifications (less than 5 seconds old)
    fn recent_notifications(&self) -> Vec<&Notification> {
        self.notification_queue
            .iter()
            .rev()
            .filter(|n| n.is_recent(5000))
            .take(3)
            .collect()
    }

    /// Stop the tick loop and save preferences, once
    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Err(e) = self.controls.shutdown(&self.store) {
            log::error!("Failed to save preferences: {}", e);
        }
        log::info!("Shutting down");
    }

    fn quit(&mut self, ctx: &egui::Context) {
        self.shutdown();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.dialog.is_some() {
            return;
        }

        let actions = ctx.input_mut(shortcuts::take_pressed_actions);
        let now = Instant::now();
        for action in actions {
            if self.controls.handle(action, now) {
                self.quit(ctx);
                return;
            }
        }
    }

    fn draw_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        self.quit(ctx);
                    }
                });
                ui.menu_button("Help", |ui| {
                    for dialog in [Dialog::Help, Dialog::Shortcuts, Dialog::License] {
                        if ui.button(dialog.title()).clicked() {
                            self.dialog = Some(dialog);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button(Dialog::About.title()).clicked() {
                        self.dialog = Some(Dialog::About);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let settings = self.controls.settings();

        ui.horizontal(|ui| {
            let mut bpm = settings.tempo.bpm();
            let slider = egui::Slider::new(&mut bpm, Tempo::MIN_BPM..=Tempo::MAX_BPM).text("BPM");
            if ui.add(slider).changed() {
                self.controls.set_tempo(Tempo::clamped(bpm as i64));
            }

            let label = if self.controls.is_running() { "Stop" } else { "Start" };
            if ui.button(label).clicked() {
                self.controls.toggle_run();
            }
        });

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Tone:");
            let mut tone = settings.tone;
            egui::ComboBox::from_id_salt("tone_selector")
                .selected_text(format!("{} ({} Hz)", tone, tone.frequency_hz()))
                .show_ui(ui, |ui| {
                    for option in Tone::ALL {
                        ui.selectable_value(&mut tone, option, option.to_string());
                    }
                });
            self.controls.set_tone(tone);

            ui.add_space(12.0);

            ui.label("Time signature:");
            let mut signature = settings.time_signature;
            egui::ComboBox::from_id_salt("signature_selector")
                .selected_text(signature.to_string())
                .show_ui(ui, |ui| {
                    for option in TimeSignature::ALL {
                        ui.selectable_value(&mut signature, option, option.to_string());
                    }
                });
            self.controls.set_time_signature(signature);
        });

        ui.add_space(6.0);

        let tap_label = if self.controls.tap_armed() { "TAP…" } else { "TAP" };
        let tap = egui::Button::new(tap_label).min_size(egui::vec2(80.0, 32.0));
        if ui.add_enabled(self.controls.tap_enabled(), tap).clicked() {
            self.controls.handle(UiAction::Tap, Instant::now());
        }
    }

    fn draw_beat_indicator(&self, ui: &mut egui::Ui) {
        let beats = self.controls.settings().time_signature.beats_per_measure().max(1);
        let lit = self
            .last_beat
            .filter(|(_, at)| at.elapsed() < BEAT_FLASH && self.controls.is_running())
            .map(|(beat, _)| beat);

        ui.horizontal(|ui| {
            for position in 1..=beats {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::hover());
                let color = match lit {
                    Some(beat) if beat.is_accent() && position == 1 => ACCENT_COLOR,
                    Some(beat) if beats == 1 || beat.index == position => BEAT_COLOR,
                    _ => egui::Color32::from_gray(60),
                };
                ui.painter().circle_filled(rect.center(), 11.0, color);
            }
        });
    }

    fn draw_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let recent = self.recent_notifications();

                if recent.is_empty() {
                    ui.label(format!("{}", self.controls.settings().tempo));
                } else {
                    for notification in recent {
                        let (icon, color) = match notification.level {
                            NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                            NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                            NotificationLevel::Error => ("✖", egui::Color32::RED),
                        };

                        ui.colored_label(color, icon);
                        ui.colored_label(color, &notification.message);
                        ui.add_space(10.0);
                    }
                }
            });
        });
    }
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keeps the beat indicator moving without input events
        ctx.request_repaint_after(Duration::from_millis(30));

        self.poll_channels();

        if ctx.input(|i| i.viewport().close_requested()) {
            self.shutdown();
        }

        self.handle_shortcuts(ctx);
        self.draw_menu(ctx);
        self.draw_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Metromono");
            ui.separator();
            ui.add_space(8.0);

            self.draw_controls(ui);

            ui.add_space(12.0);
            self.draw_beat_indicator(ui);
        });

        if let Some(dialog) = self.dialog
            && !dialog.show(ctx)
        {
            self.dialog = None;
        }
    }
}
