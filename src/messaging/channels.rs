// Lock-free channels from the tick loop and audio callback to the UI

use crate::messaging::notification::Notification;
use crate::sequencer::metronome::Beat;
use ringbuf::{HeapRb, traits::Split};

pub type BeatProducer = ringbuf::HeapProd<Beat>;
pub type BeatConsumer = ringbuf::HeapCons<Beat>;

pub fn create_beat_channel(capacity: usize) -> (BeatProducer, BeatConsumer) {
    let rb = HeapRb::<Beat>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}
