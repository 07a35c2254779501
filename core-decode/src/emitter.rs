//! # Sample Emitter
//!
//! Narrows fixed-point blocks to interleaved stereo `i16` and tracks where a
//! partially emitted block should resume.

use crate::config::DecoderConfig;
use crate::frame::DecodedFrame;

/// Position of the first not-yet-emitted sample in the live block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeftoverCursor {
    /// Nothing pending.
    #[default]
    Empty,
    /// Resume at this per-channel sample index (always below the block length).
    At(usize),
}

impl LeftoverCursor {
    pub fn is_empty(&self) -> bool {
        matches!(self, LeftoverCursor::Empty)
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            LeftoverCursor::Empty => None,
            LeftoverCursor::At(index) => Some(*index),
        }
    }
}

/// Converts synthesized blocks to interleaved stereo PCM.
///
/// Stereo blocks are written L/R; mono blocks write the single channel to both
/// slots. Output is always whole pairs, so an odd `dest` length leaves its last
/// slot untouched.
#[derive(Debug, Clone, Copy)]
pub struct SampleEmitter {
    shift: u32,
}

impl SampleEmitter {
    /// Emitter that shifts each fixed-point sample right by `shift` bits.
    pub fn new(shift: u32) -> Self {
        Self { shift }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.sample_shift())
    }

    /// Narrow one fixed-point sample, saturating at the `i16` limits.
    #[inline]
    pub fn convert(&self, sample: i32) -> i16 {
        (sample >> self.shift).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }

    /// Write `block` from per-channel index `start` into `dest`.
    ///
    /// Returns the number of `i16` values written and where the block should
    /// resume next time. Writes `min(block.len() - start, dest.len() / 2)` pairs.
    pub fn emit(
        &self,
        block: &DecodedFrame,
        start: usize,
        dest: &mut [i16],
    ) -> (usize, LeftoverCursor) {
        let available = block.len().saturating_sub(start);
        let pairs = available.min(dest.len() / 2);
        let end = start + pairs;

        let left = block.plane(0);
        let right = if block.channels() >= 2 {
            block.plane(1)
        } else {
            left
        };

        for (out, (l, r)) in dest
            .chunks_exact_mut(2)
            .zip(left[start..end].iter().zip(&right[start..end]))
        {
            out[0] = self.convert(*l);
            out[1] = self.convert(*r);
        }

        let leftover = if end < block.len() {
            LeftoverCursor::At(end)
        } else {
            LeftoverCursor::Empty
        };
        (pairs * 2, leftover)
    }

    /// Interleaved values still pending in `block` from `leftover`.
    pub fn pending(block: &DecodedFrame, leftover: LeftoverCursor) -> usize {
        leftover
            .index()
            .map_or(0, |index| block.len().saturating_sub(index) * 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAC_BITS;

    fn stereo_block(len: usize) -> DecodedFrame {
        let mut block = DecodedFrame::new();
        block.prepare(2, len);
        for i in 0..len {
            block.plane_mut(0)[i] = (i as i32) << 14;
            block.plane_mut(1)[i] = -((i as i32) << 14);
        }
        block
    }

    #[test]
    fn test_whole_block_fits() {
        let emitter = SampleEmitter::new(14);
        let block = stereo_block(4);
        let mut dest = [0i16; 10];

        let (written, leftover) = emitter.emit(&block, 0, &mut dest);
        assert_eq!(written, 8);
        assert_eq!(leftover, LeftoverCursor::Empty);
        assert_eq!(&dest[..8], &[0, 0, 1, -1, 2, -2, 3, -3]);
    }

    #[test]
    fn test_partial_block_sets_leftover() {
        let emitter = SampleEmitter::new(14);
        let block = stereo_block(4);
        let mut dest = [0i16; 4];

        let (written, leftover) = emitter.emit(&block, 0, &mut dest);
        assert_eq!(written, 4);
        assert_eq!(leftover, LeftoverCursor::At(2));
        assert_eq!(SampleEmitter::pending(&block, leftover), 4);

        let (written, leftover) = emitter.emit(&block, 2, &mut dest);
        assert_eq!(written, 4);
        assert_eq!(leftover, LeftoverCursor::Empty);
        assert_eq!(dest, [2, -2, 3, -3]);
    }

    #[test]
    fn test_mono_is_duplicated() {
        let emitter = SampleEmitter::new(14);
        let mut block = DecodedFrame::new();
        block.prepare(1, 3);
        block.plane_mut(0).copy_from_slice(&[1 << 14, 2 << 14, 3 << 14]);

        let mut dest = [0i16; 6];
        emitter.emit(&block, 0, &mut dest);
        assert_eq!(dest, [1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_odd_request_never_splits_a_pair() {
        let emitter = SampleEmitter::new(14);
        let block = stereo_block(4);
        let mut dest = [7i16; 5];

        let (written, leftover) = emitter.emit(&block, 0, &mut dest);
        assert_eq!(written, 4);
        assert_eq!(leftover, LeftoverCursor::At(2));
        assert_eq!(dest[4], 7);
    }

    #[test]
    fn test_conversion_saturates() {
        let full_scale = SampleEmitter::new(FRAC_BITS - 15);
        assert_eq!(full_scale.convert(1 << FRAC_BITS), i16::MAX);
        assert_eq!(full_scale.convert(-(1 << FRAC_BITS) * 2), i16::MIN);

        let reference = SampleEmitter::new(FRAC_BITS - 14);
        assert_eq!(reference.convert(1 << FRAC_BITS), 16384);
        assert_eq!(reference.convert(-(1 << FRAC_BITS)), -16384);
    }
}
