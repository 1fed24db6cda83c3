// Format conversion for CPAL audio streams
//
// The tone is rendered in f32 and converted to the device format
// (f32, i16 or u16) when written, without allocation.

use cpal::{FromSample, Sample};

/// Write a mono f32 sample to every channel of one interleaved frame
#[inline]
pub fn write_mono_to_interleaved_frame<T>(internal_sample: f32, output_frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for channel_sample in output_frame.iter_mut() {
        *channel_sample = Sample::from_sample::<f32>(internal_sample);
    }
}
