// User interface (egui)

pub mod app;
pub mod controls;
pub mod dialogs;
pub mod shortcuts;
