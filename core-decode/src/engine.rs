//! # Stream Decoder
//!
//! The generic decode loop: drain leftover samples, decode frames on demand,
//! hand each synthesized block to the [`SampleEmitter`], and keep at most one
//! partially consumed block between calls.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──read──▶ Decoding ──▶ LeftoverPending ──drained──▶ Decoding
//!                    │
//!                    ├──▶ EndOfStream
//!                    └──▶ Error
//!
//! seek (from any state) ──▶ Decoding, with a fresh unsynchronized cursor
//! ```

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::config::DecoderConfig;
use crate::emitter::{LeftoverCursor, SampleEmitter};
use crate::error::{FrameError, Result};
use crate::frame::{DecodedFrame, FrameHeader, TrackStats};
use crate::scanner::HeaderScanner;
use crate::seek::SeekController;
use crate::traits::{AudioCodec, FrameCodec, SoundSource};
use tracing::{debug, trace, warn};

/// Where the decode loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Constructed, nothing read yet.
    Idle,
    /// Ready to decode the next frame.
    Decoding,
    /// Part of the last synthesized block is waiting to be emitted.
    LeftoverPending,
    /// The buffer ran out of frames.
    EndOfStream,
    /// Decoding stopped on an unrecoverable frame error.
    Error,
}

impl DecoderState {
    /// Returns `true` if the last read stopped short.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Error)
    }
}

/// Pull-based decoder over one in-memory compressed stream.
///
/// Owns the buffer, the parse cursor, the live block and its leftover cursor;
/// only [`read`](Self::read) and [`seek`](Self::seek) mutate them.
pub struct StreamDecoder<C: FrameCodec> {
    codec: C,
    buffer: CompressedBuffer,
    cursor: StreamCursor,
    block: DecodedFrame,
    leftover: LeftoverCursor,
    emitter: SampleEmitter,
    seeker: SeekController,
    stats: TrackStats,
    config: DecoderConfig,
    state: DecoderState,
    frames_decoded: u64,
}

impl<C: FrameCodec> StreamDecoder<C> {
    /// Build a decoder, running the header prescan over `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidConfig`](crate::DecodeError::InvalidConfig)
    /// if `config` fails validation.
    pub fn new(mut codec: C, buffer: CompressedBuffer, config: DecoderConfig) -> Result<Self> {
        config.validate()?;

        let stats = HeaderScanner::scan(&mut codec, &buffer);
        codec.mute();

        Ok(Self {
            codec,
            buffer,
            cursor: StreamCursor::at(0),
            block: DecodedFrame::new(),
            leftover: LeftoverCursor::Empty,
            emitter: SampleEmitter::from_config(&config),
            seeker: SeekController::from_config(&config),
            stats,
            config,
            state: DecoderState::Idle,
            frames_decoded: 0,
        })
    }

    /// Total length in interleaved stereo samples at the configured output rate.
    pub fn length(&self) -> u64 {
        2 * self.stats.duration().count(self.config.length_sample_rate)
    }

    /// Fill `dest` with interleaved stereo samples; returns how many were written.
    ///
    /// Only whole pairs are written, so at most `dest.len()` rounded down to
    /// an even number. A short count means end of stream or an unrecoverable
    /// frame error.
    pub fn read(&mut self, dest: &mut [i16]) -> usize {
        let wanted = dest.len() & !1;
        let dest = &mut dest[..wanted];
        let mut produced = 0;

        if let Some(start) = self.leftover.index() {
            let (written, leftover) = self.emitter.emit(&self.block, start, dest);
            produced += written;
            self.leftover = leftover;
        }

        if produced < wanted && !self.state.is_terminal() {
            self.state = DecoderState::Decoding;
        }

        while produced < wanted {
            match self.decode_next() {
                Ok(_) => {
                    let (written, leftover) = self.emitter.emit(&self.block, 0, &mut dest[produced..]);
                    produced += written;
                    self.leftover = leftover;
                }
                Err(FrameError::BufferExhausted) => {
                    debug!(
                        offset = self.cursor.offset(),
                        frames = self.frames_decoded,
                        "Reached end of stream"
                    );
                    self.state = DecoderState::EndOfStream;
                    break;
                }
                Err(err) => {
                    warn!(offset = self.cursor.offset(), error = %err, "Decoding stopped");
                    self.state = DecoderState::Error;
                    break;
                }
            }
        }

        if !self.leftover.is_empty() {
            self.state = DecoderState::LeftoverPending;
        } else if self.state == DecoderState::LeftoverPending {
            self.state = DecoderState::Decoding;
        }

        trace!(wanted, produced, "read");
        produced
    }

    /// Move to approximately `position` and return it unchanged.
    ///
    /// See [`SeekController`] for how the byte offset is estimated and how the
    /// bitstream is resynchronized.
    pub fn seek(&mut self, position: u64) -> u64 {
        let target = SeekController::target_offset(self.buffer.len(), position, self.length());

        self.cursor = StreamCursor::at(target);
        self.codec.mute();
        let outcome = self
            .seeker
            .resync(&mut self.codec, &self.buffer, &mut self.cursor, &mut self.block);

        // The priming block is contaminated by the resync and never emitted.
        self.block.clear();
        self.leftover = LeftoverCursor::Empty;
        self.state = DecoderState::Decoding;

        debug!(
            position,
            target,
            attempts = outcome.attempts,
            synced = outcome.synced_frames,
            "Seek completed"
        );
        position
    }

    /// Decode the next frame into the live block, skipping recoverable errors.
    fn decode_next(&mut self) -> std::result::Result<FrameHeader, FrameError> {
        loop {
            let before = self.cursor.offset();
            match self
                .codec
                .decode_frame(&self.buffer, &mut self.cursor, &mut self.block)
            {
                Ok(header) => {
                    self.frames_decoded += 1;
                    return Ok(header);
                }
                Err(err) if err.is_recoverable() => {
                    trace!(offset = before, error = %err, "Skipping frame");
                    if self.cursor.offset() == before {
                        self.cursor.advance(1, &self.buffer);
                    }
                    if self.cursor.is_at_end(&self.buffer) {
                        return Err(FrameError::BufferExhausted);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn stats(&self) -> &TrackStats {
        &self.stats
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn codec(&self) -> AudioCodec {
        self.codec.codec()
    }

    /// Current leftover position within the live block.
    pub fn leftover(&self) -> LeftoverCursor {
        self.leftover
    }

    /// Interleaved samples already synthesized and waiting for the next read.
    pub fn pending_samples(&self) -> usize {
        SampleEmitter::pending(&self.block, self.leftover)
    }

    /// Frames successfully decoded by reads since construction.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Current byte offset of the parse cursor.
    pub fn byte_position(&self) -> usize {
        self.cursor.offset()
    }

    pub fn compressed_len(&self) -> usize {
        self.buffer.len()
    }
}

impl<C: FrameCodec> SoundSource for StreamDecoder<C> {
    fn length(&self) -> u64 {
        StreamDecoder::length(self)
    }

    fn read(&mut self, dest: &mut [i16]) -> usize {
        StreamDecoder::read(self, dest)
    }

    fn seek(&mut self, position: u64) -> u64 {
        StreamDecoder::seek(self, position)
    }
}

impl<C: FrameCodec> std::fmt::Debug for StreamDecoder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("codec", &self.codec.codec())
            .field("bytes", &self.buffer.len())
            .field("cursor", &self.cursor)
            .field("leftover", &self.leftover)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAC_BITS;
    use crate::timer::MediaTime;

    /// Each byte `n` is one frame of `n` stereo samples valued `n`; 0 is noise.
    struct CountCodec;

    impl FrameCodec for CountCodec {
        fn codec(&self) -> AudioCodec {
            AudioCodec::Unknown
        }

        fn decode_header(
            &mut self,
            buffer: &CompressedBuffer,
            cursor: &mut StreamCursor,
        ) -> std::result::Result<FrameHeader, FrameError> {
            let n = *buffer
                .remaining(cursor)
                .first()
                .ok_or(FrameError::BufferExhausted)?;
            cursor.advance(1, buffer);
            if n == 0 {
                return Err(FrameError::LostSync);
            }
            Ok(FrameHeader {
                sample_rate: 44100,
                bitrate: 1000,
                channels: 2,
                samples_per_channel: u32::from(n),
                frame_len: 1,
            })
        }

        fn decode_frame(
            &mut self,
            buffer: &CompressedBuffer,
            cursor: &mut StreamCursor,
            block: &mut DecodedFrame,
        ) -> std::result::Result<FrameHeader, FrameError> {
            let header = self.decode_header(buffer, cursor)?;
            block.prepare(2, header.samples_per_channel as usize);
            let value = (header.samples_per_channel as i32) << (FRAC_BITS - 14);
            block.plane_mut(0).fill(value);
            block.plane_mut(1).fill(-value);
            Ok(header)
        }

        fn mute(&mut self) {}
    }

    fn decoder(frames: Vec<u8>) -> StreamDecoder<CountCodec> {
        StreamDecoder::new(CountCodec, CompressedBuffer::from(frames), DecoderConfig::default())
            .unwrap()
    }

    #[test]
    fn test_length_counts_stereo_samples() {
        let dec = decoder(vec![3, 0, 5]);
        assert_eq!(dec.stats().frame_count(), 2);
        assert_eq!(dec.stats().duration(), MediaTime::from_samples(8, 44100));
        assert_eq!(dec.length(), 16);
        assert_eq!(dec.state(), DecoderState::Idle);
    }

    #[test]
    fn test_reads_across_frames_and_noise() {
        let mut dec = decoder(vec![2, 0, 0, 3]);
        let mut out = [0i16; 10];

        assert_eq!(dec.read(&mut out), 10);
        assert_eq!(out, [2, -2, 2, -2, 3, -3, 3, -3, 3, -3]);
        assert_eq!(dec.read(&mut out), 0);
        assert_eq!(dec.state(), DecoderState::EndOfStream);
    }

    #[test]
    fn test_leftover_then_drain() {
        let mut dec = decoder(vec![4, 1]);
        let mut out = [0i16; 4];

        assert_eq!(dec.read(&mut out), 4);
        assert_eq!(dec.leftover(), LeftoverCursor::At(2));
        assert_eq!(dec.pending_samples(), 4);
        assert_eq!(dec.state(), DecoderState::LeftoverPending);

        let mut small = [0i16; 2];
        assert_eq!(dec.read(&mut small), 2);
        assert_eq!(dec.leftover(), LeftoverCursor::At(3));

        let mut rest = [0i16; 8];
        assert_eq!(dec.read(&mut rest), 4);
        assert_eq!(&rest[..4], &[4, -4, 1, -1]);
        assert_eq!(dec.state(), DecoderState::EndOfStream);
    }

    #[test]
    fn test_empty_request_is_a_no_op() {
        let mut dec = decoder(vec![4]);
        assert_eq!(dec.read(&mut []), 0);
        assert_eq!(dec.frames_decoded(), 0);
        assert_eq!(dec.read(&mut [0i16; 1]), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DecoderConfig {
            output_fraction_bits: 0,
            ..Default::default()
        };
        let result = StreamDecoder::new(CountCodec, CompressedBuffer::from(vec![1]), config);
        assert!(result.is_err());
    }
}
