//! # Sample Format Converter
//!
//! Converts Symphonia's decoded buffers into the engine's fixed-point planes.

use crate::frame::{DecodedFrame, FIXED_ONE, MAX_CHANNELS};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::conv::IntoSample;
use symphonia::core::sample::Sample;
use tracing::trace;

/// Sample converter that writes decoded audio as fixed-point planes.
///
/// Symphonia's MPEG decoder outputs planar `f32` in `[-1.0, 1.0]`; other
/// sample formats are first normalized through `IntoSample<f32>`. Every value is
/// then scaled by [`FIXED_ONE`], so full scale maps to `1 << FRAC_BITS`.
///
/// [`FRAC_BITS`]: crate::frame::FRAC_BITS
pub struct SampleConverter;

impl SampleConverter {
    /// Fill `block` from `buffer`, replacing its previous contents.
    ///
    /// Channels beyond the first two are dropped.
    pub fn to_fixed_point(buffer: &AudioBufferRef<'_>, block: &mut DecodedFrame) {
        match buffer {
            AudioBufferRef::F32(buf) => Self::convert_planes(&**buf, block, |sample: f32| sample),
            AudioBufferRef::F64(buf) => {
                Self::convert_planes(&**buf, block, |sample: f64| sample.into_sample())
            }
            AudioBufferRef::S32(buf) => {
                Self::convert_planes(&**buf, block, |sample: i32| sample.into_sample())
            }
            AudioBufferRef::S24(buf) => {
                Self::convert_planes(&**buf, block, |sample| IntoSample::into_sample(sample))
            }
            AudioBufferRef::S16(buf) => {
                Self::convert_planes(&**buf, block, |sample: i16| sample.into_sample())
            }
            AudioBufferRef::S8(buf) => {
                Self::convert_planes(&**buf, block, |sample: i8| sample.into_sample())
            }
            AudioBufferRef::U32(buf) => {
                Self::convert_planes(&**buf, block, |sample: u32| sample.into_sample())
            }
            AudioBufferRef::U24(buf) => {
                Self::convert_planes(&**buf, block, |sample| IntoSample::into_sample(sample))
            }
            AudioBufferRef::U16(buf) => {
                Self::convert_planes(&**buf, block, |sample: u16| sample.into_sample())
            }
            AudioBufferRef::U8(buf) => {
                Self::convert_planes(&**buf, block, |sample: u8| sample.into_sample())
            }
        }
    }

    /// Scale a normalized sample to fixed point, saturating outside `i32`.
    #[inline]
    pub fn fixed_from_f32(sample: f32) -> i32 {
        (f64::from(sample) * f64::from(FIXED_ONE)) as i32
    }

    fn convert_planes<T>(buf: &AudioBuffer<T>, block: &mut DecodedFrame, convert: fn(T) -> f32)
    where
        T: Sample + Copy,
    {
        let channels = buf.spec().channels.count();
        let frames = buf.frames();
        if channels > MAX_CHANNELS {
            trace!(channels, "Dropping channels beyond stereo");
        }

        block.prepare(channels.min(MAX_CHANNELS) as u16, frames);
        for ch in 0..usize::from(block.channels()) {
            let plane = &buf.chan(ch)[..frames];
            for (out, sample) in block.plane_mut(ch).iter_mut().zip(plane) {
                *out = Self::fixed_from_f32(convert(*sample));
            }
        }
    }
}
