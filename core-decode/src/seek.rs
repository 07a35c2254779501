//! # Approximate Seeking
//!
//! Compressed MPEG audio carries no byte-accurate index, so a seek position is
//! mapped proportionally onto the byte range and the decoder then decodes a
//! few frames to find its footing again.

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::config::DecoderConfig;
use crate::error::FrameError;
use crate::frame::DecodedFrame;
use crate::traits::FrameCodec;
use tracing::trace;

/// Result of a resynchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncOutcome {
    /// Decode attempts made.
    pub attempts: usize,
    /// Attempts that produced a frame.
    pub synced_frames: usize,
}

/// Bounded resynchronization after landing at an arbitrary byte offset.
#[derive(Debug, Clone, Copy)]
pub struct SeekController {
    attempt_budget: usize,
    sync_frames: usize,
}

impl SeekController {
    pub fn new(attempt_budget: usize, sync_frames: usize) -> Self {
        Self {
            attempt_budget,
            sync_frames,
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.seek_attempt_budget, config.seek_sync_frames)
    }

    /// Byte offset proportional to `position / length` of `total_bytes`.
    ///
    /// Clamped to `total_bytes`; a zero `length` maps everything to offset 0.
    pub fn target_offset(total_bytes: usize, position: u64, length: u64) -> usize {
        if length == 0 {
            return 0;
        }
        let offset = total_bytes as u128 * u128::from(position) / u128::from(length);
        usize::try_from(offset).unwrap_or(usize::MAX).min(total_bytes)
    }

    /// Decode and discard frames from `cursor` until `sync_frames` succeed or
    /// the attempt budget runs out.
    ///
    /// Stops early when the buffer is exhausted or the codec reports an
    /// unrecoverable error. `block` holds garbage afterwards.
    pub fn resync<C: FrameCodec + ?Sized>(
        &self,
        codec: &mut C,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
        block: &mut DecodedFrame,
    ) -> ResyncOutcome {
        let mut outcome = ResyncOutcome {
            attempts: 0,
            synced_frames: 0,
        };

        while outcome.attempts < self.attempt_budget && outcome.synced_frames < self.sync_frames {
            outcome.attempts += 1;
            match codec.decode_frame(buffer, cursor, block) {
                Ok(_) => outcome.synced_frames += 1,
                Err(FrameError::BufferExhausted) => break,
                Err(err) if err.is_recoverable() => {
                    trace!(offset = cursor.offset(), error = %err, "Resync attempt failed");
                }
                Err(_) => break,
            }
        }

        outcome
    }
}
