//! # Core Decode Traits
//!
//! Two seams define the engine:
//!
//! - [`SoundSource`] is the capability set callers see: `length`, `read` and
//!   `seek`. There is one implementation per compressed format, chosen when the
//!   source is constructed (see [`open_source`](crate::open_source)).
//! - [`FrameCodec`] is what a format plugs into the generic
//!   [`StreamDecoder`](crate::StreamDecoder): locate and parse frame headers,
//!   decode and synthesize one frame, and drop synthesis history after a seek.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use core_decode::{DecoderConfig, Mp3Source, SoundSource};
//!
//! # fn example() -> core_decode::Result<()> {
//! let mut source = Mp3Source::open("/path/to/song.mp3", DecoderConfig::default())?;
//!
//! let mut pcm = vec![0i16; 4096];
//! loop {
//!     let produced = source.read(&mut pcm);
//!     // hand pcm[..produced] to the output device
//!     if produced < pcm.len() {
//!         break;
//!     }
//! }
//!
//! // Jump to the middle; the returned position is the requested one.
//! let middle = source.length() / 2;
//! source.seek(middle);
//! # Ok(())
//! # }
//! ```

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::error::FrameError;
use crate::frame::{DecodedFrame, FrameHeader};
use serde::{Deserialize, Serialize};

// ============================================================================
// Codec Identification
// ============================================================================

/// Compressed formats the engine can identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// MPEG audio Layer I
    Mp1,
    /// MPEG audio Layer II
    Mp2,
    /// MPEG audio Layer III
    Mp3,
    /// Not recognized
    Unknown,
}

impl AudioCodec {
    /// Returns `true` for any MPEG audio layer.
    pub fn is_mpeg_audio(&self) -> bool {
        matches!(self, AudioCodec::Mp1 | AudioCodec::Mp2 | AudioCodec::Mp3)
    }
}

// ============================================================================
// Core Traits
// ============================================================================

/// Frame-at-a-time access to one compressed format.
///
/// Both decode methods start at `cursor` and leave it past whatever they
/// consumed. On a recoverable [`FrameError`] the cursor must have moved forward
/// (at least one byte) so that retrying terminates; on
/// [`FrameError::BufferExhausted`] it may stay where it is.
pub trait FrameCodec {
    /// Format handled by this codec.
    fn codec(&self) -> AudioCodec;

    /// Parse the next frame header and step over the frame without decoding audio.
    fn decode_header(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
    ) -> Result<FrameHeader, FrameError>;

    /// Decode the next frame and synthesize it into `block` as fixed-point PCM.
    ///
    /// On error, the contents of `block` are unspecified.
    fn decode_frame(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
        block: &mut DecodedFrame,
    ) -> Result<FrameHeader, FrameError>;

    /// Forget all inter-frame synthesis state (overlap, reservoir).
    fn mute(&mut self);
}

/// A seekable, pull-based source of interleaved stereo `i16` PCM.
///
/// Sources are single-threaded: every call runs to completion on the calling
/// thread. Share one between threads through
/// [`SharedSource`](crate::SharedSource) or an equivalent lock.
pub trait SoundSource {
    /// Total length in interleaved samples (two per stereo frame) at the
    /// configured output rate.
    fn length(&self) -> u64;

    /// Fill `dest` with interleaved samples and return how many were written.
    ///
    /// Fewer than `dest.len()` means the stream ended or could not be decoded
    /// further; zero means nothing is left.
    fn read(&mut self, dest: &mut [i16]) -> usize;

    /// Move to approximately `position` (in the units of [`length`](Self::length)).
    ///
    /// Returns `position` as requested. The position actually reached is only
    /// an estimate and is not reported.
    fn seek(&mut self, position: u64) -> u64;
}

impl<S: SoundSource + ?Sized> SoundSource for Box<S> {
    fn length(&self) -> u64 {
        (**self).length()
    }

    fn read(&mut self, dest: &mut [i16]) -> usize {
        (**self).read(dest)
    }

    fn seek(&mut self, position: u64) -> u64 {
        (**self).seek(position)
    }
}
