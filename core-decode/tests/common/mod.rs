//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use core_decode::{
    AudioCodec, CompressedBuffer, DecodedFrame, FrameCodec, FrameError, FrameHeader,
    StreamCursor, FRAC_BITS,
};

/// Byte value that makes [`RampCodec`] fail unrecoverably.
pub const FATAL: u8 = 0xEE;

/// Byte value [`RampCodec`] treats as noise.
pub const NOISE: u8 = 0x00;

/// Any other byte is one frame.
pub const FRAME: u8 = 0x01;

/// Deterministic synthetic codec.
///
/// Every non-noise byte of the buffer is one frame of `block_len` samples per
/// channel. The frame starting at byte offset `k` synthesizes the ramp
/// `ramp_value(k, i)` on the left channel and its negation on the right, so
/// every emitted sample identifies the frame and position it came from.
pub struct RampCodec {
    pub block_len: usize,
    pub channels: u16,
    pub mutes: usize,
}

impl RampCodec {
    pub fn new(block_len: usize, channels: u16) -> Self {
        Self {
            block_len,
            channels,
            mutes: 0,
        }
    }

    /// MPEG-1 Layer III shaped blocks: 1152 stereo samples.
    pub fn layer3_stereo() -> Self {
        Self::new(1152, 2)
    }

    fn header(&self) -> FrameHeader {
        FrameHeader {
            sample_rate: 44100,
            bitrate: 128_000,
            channels: self.channels,
            samples_per_channel: self.block_len as u32,
            frame_len: 1,
        }
    }

    fn step(
        &self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
    ) -> Result<(usize, FrameHeader), FrameError> {
        let offset = cursor.offset();
        let byte = *buffer
            .remaining(cursor)
            .first()
            .ok_or(FrameError::BufferExhausted)?;
        match byte {
            NOISE => {
                cursor.advance(1, buffer);
                Err(FrameError::LostSync)
            }
            FATAL => Err(FrameError::Unrecoverable("fatal byte".to_string())),
            _ => {
                cursor.advance(1, buffer);
                Ok((offset, self.header()))
            }
        }
    }
}

/// The `i16` value [`RampCodec`] emits (with the default 14 fraction bits)
/// for sample `index` of the frame at byte `offset`.
pub fn ramp_value(offset: usize, index: usize) -> i16 {
    ((offset * 1000 + index) % 8000) as i16
}

impl FrameCodec for RampCodec {
    fn codec(&self) -> AudioCodec {
        AudioCodec::Unknown
    }

    fn decode_header(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
    ) -> Result<FrameHeader, FrameError> {
        self.step(buffer, cursor).map(|(_, header)| header)
    }

    fn decode_frame(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
        block: &mut DecodedFrame,
    ) -> Result<FrameHeader, FrameError> {
        let (offset, header) = self.step(buffer, cursor)?;
        block.prepare(self.channels, self.block_len);
        for i in 0..self.block_len {
            let value = i32::from(ramp_value(offset, i)) << (FRAC_BITS - 14);
            block.plane_mut(0)[i] = value;
            if self.channels == 2 {
                block.plane_mut(1)[i] = -value;
            }
        }
        Ok(header)
    }

    fn mute(&mut self) {
        self.mutes += 1;
    }
}

/// `count` frame bytes.
pub fn ramp_frames(count: usize) -> Vec<u8> {
    vec![FRAME; count]
}

// ============================================================================
// MPEG fixtures
// ============================================================================

/// Length of a 128 kbps, 44.1 kHz, unpadded MPEG-1 Layer III frame.
pub const SILENT_FRAME_LEN: usize = 417;

/// One silent MPEG-1 Layer III frame (128 kbps, 44.1 kHz, no CRC).
///
/// Side information and main data are all zero: no reservoir back-reference,
/// zero-length Huffman data, so every granule decodes to silence.
pub fn silent_frame(mono: bool) -> Vec<u8> {
    let mut frame = vec![0u8; SILENT_FRAME_LEN];
    let mode = if mono { 0xC0 } else { 0x00 };
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, mode]);
    frame
}

/// `count` back-to-back silent frames.
pub fn silent_frames(count: usize, mono: bool) -> Vec<u8> {
    (0..count).flat_map(|_| silent_frame(mono)).collect()
}

/// An ID3v2.4 tag with `body_len` bytes of (sync-pattern-laden) payload.
pub fn id3v2_tag(body_len: usize) -> Vec<u8> {
    assert!(body_len < 1 << 21);
    let mut tag = b"ID3\x04\x00\x00".to_vec();
    tag.extend([
        ((body_len >> 21) & 0x7F) as u8,
        ((body_len >> 14) & 0x7F) as u8,
        ((body_len >> 7) & 0x7F) as u8,
        (body_len & 0x7F) as u8,
    ]);
    tag.extend(std::iter::repeat(0xFF).take(body_len));
    tag
}

/// Drain `source` in `chunk`-sized reads and return everything it produced.
pub fn drain<S: core_decode::SoundSource + ?Sized>(source: &mut S, chunk: usize) -> Vec<i16> {
    let mut out = Vec::new();
    let mut buf = vec![0i16; chunk];
    loop {
        let produced = source.read(&mut buf);
        assert!(produced <= chunk);
        out.extend_from_slice(&buf[..produced]);
        if produced == 0 {
            return out;
        }
    }
}
