// Messaging between the UI, the tick loop and the audio callback

pub mod channels;
pub mod mailbox;
pub mod notification;
