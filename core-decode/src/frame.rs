//! # Frame-Level Data Types
//!
//! [`FrameHeader`] is produced for every frame by the header scan and by
//! decoding, [`DecodedFrame`] holds one synthesized block of fixed-point PCM,
//! and [`TrackStats`] aggregates the whole stream once at construction.

use crate::timer::MediaTime;
use std::time::Duration;

/// Fraction bits of a synthesized fixed-point sample.
///
/// A value of `1 << FRAC_BITS` represents full scale (1.0).
pub const FRAC_BITS: u32 = 28;

/// Fixed-point representation of 1.0.
pub const FIXED_ONE: i32 = 1 << FRAC_BITS;

/// Maximum number of channels a decoded block can carry.
pub const MAX_CHANNELS: usize = 2;

// ============================================================================
// Frame Header
// ============================================================================

/// Metadata of one parsed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bitrate in bits per second.
    pub bitrate: u32,
    /// Number of channels (1 or 2).
    pub channels: u16,
    /// Samples per channel this frame synthesizes to.
    pub samples_per_channel: u32,
    /// Total frame length in bytes, header included.
    pub frame_len: usize,
}

impl FrameHeader {
    /// Playback duration of this frame.
    pub fn duration(&self) -> MediaTime {
        MediaTime::from_samples(u64::from(self.samples_per_channel), self.sample_rate)
    }
}

// ============================================================================
// Decoded Block
// ============================================================================

/// One synthesized block of fixed-point PCM, stored planar.
///
/// The block is reused across frames; [`DecodedFrame::prepare`] resizes it
/// without reallocating once it has grown to the largest frame size.
#[derive(Debug, Clone, Default)]
pub struct DecodedFrame {
    planes: [Vec<i32>; MAX_CHANNELS],
    channels: u16,
    len: usize,
}

impl DecodedFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize for `len` samples per channel over `channels` channels, zero-filled.
    ///
    /// The channel count is clamped to `1..=MAX_CHANNELS`.
    pub fn prepare(&mut self, channels: u16, len: usize) {
        self.channels = channels.clamp(1, MAX_CHANNELS as u16);
        self.len = len;
        for plane in self.planes.iter_mut().take(self.channels as usize) {
            plane.clear();
            plane.resize(len, 0);
        }
        for plane in self.planes.iter_mut().skip(self.channels as usize) {
            plane.clear();
        }
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.len = 0;
        self.channels = 0;
        for plane in &mut self.planes {
            plane.clear();
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Samples of `channel`, or an empty slice for a channel the block lacks.
    pub fn plane(&self, channel: usize) -> &[i32] {
        if channel < self.channels as usize {
            &self.planes[channel][..self.len]
        } else {
            &[]
        }
    }

    pub fn plane_mut(&mut self, channel: usize) -> &mut [i32] {
        if channel < self.channels as usize {
            let len = self.len;
            &mut self.planes[channel][..len]
        } else {
            &mut []
        }
    }
}

// ============================================================================
// Track Statistics
// ============================================================================

/// Aggregate statistics computed once by the header scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackStats {
    duration: MediaTime,
    frame_count: u64,
    bitrate: u32,
    sample_rate: u32,
    channels: u16,
}

impl TrackStats {
    pub(crate) fn new(
        duration: MediaTime,
        frame_count: u64,
        bitrate: u32,
        sample_rate: u32,
        channels: u16,
    ) -> Self {
        Self {
            duration,
            frame_count,
            bitrate,
            sample_rate,
            channels,
        }
    }

    /// Total duration as exact media time.
    pub fn duration(&self) -> MediaTime {
        self.duration
    }

    /// Total duration as wall-clock time.
    pub fn duration_secs(&self) -> Duration {
        self.duration.as_duration()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average bitrate in bits per second, 0 when no frame was found.
    pub fn bitrate(&self) -> u32 {
        self.bitrate
    }

    /// Sample rate of the last frame scanned, 0 when no frame was found.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the last frame scanned, 0 when no frame was found.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
