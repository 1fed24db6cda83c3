// Informational dialogs from the Help menu

use eframe::egui;

use crate::ui::shortcuts;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Help,
    Shortcuts,
    License,
    About,
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Help => "Help",
            Dialog::Shortcuts => "Keyboard shortcuts",
            Dialog::License => "License",
            Dialog::About => "About Metromono",
        }
    }

    /// Draw the dialog; returns false once the user closed it
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut open = true;
        let mut dismissed = false;

        egui::Window::new(self.title())
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                match self {
                    Dialog::Help => {
                        ui.label("Pick a tempo with the slider or the arrow keys.");
                        ui.label("TAP twice in rhythm to set the tempo by ear.");
                        ui.label("Choose a time signature to accent the first beat of each measure.");
                        ui.label("The tone selector changes the pitch of regular beats.");
                        ui.label("Your settings are restored on the next start.");
                    }
                    Dialog::Shortcuts => {
                        egui::Grid::new("shortcuts_grid").show(ui, |ui| {
                            for (key, action) in shortcuts::describe() {
                                ui.strong(*key);
                                ui.label(*action);
                                ui.end_row();
                            }
                        });
                    }
                    Dialog::License => {
                        ui.label("This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.");
                        ui.label("It is distributed WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.");
                        ui.hyperlink("https://www.gnu.org/licenses/gpl.html");
                    }
                    Dialog::About => {
                        ui.label(format!("Metromono v.{}", VERSION));
                    }
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        open && !dismissed
    }
}
