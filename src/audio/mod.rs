// Audio module - CPAL backend and tone playback

pub mod dsp_utils;
pub mod engine;
pub mod format_conversion;
pub mod parameters;
pub mod player;
pub mod status;
pub mod tone;
