//! # MPEG Audio Frame Header
//!
//! Parses the 4-byte header that starts every MPEG-1, MPEG-2 and MPEG-2.5
//! audio frame (Layers I, II and III).

use crate::error::FrameError;
use crate::frame::FrameHeader;
use crate::traits::AudioCodec;

/// Length of an MPEG audio frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Bitrates in kbps, indexed by `[table][bitrate_index]`.
///
/// Tables: MPEG-1 Layer I, II, III; MPEG-2/2.5 Layer I; MPEG-2/2.5 Layer II and III.
const BITRATES_KBPS: [[u32; 15]; 5] = [
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
];

/// MPEG-1 sample rates; MPEG-2 halves them and MPEG-2.5 quarters them.
const SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg2_5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegLayer {
    Layer1,
    Layer2,
    Layer3,
}

impl MpegLayer {
    pub fn codec(&self) -> AudioCodec {
        match self {
            MpegLayer::Layer1 => AudioCodec::Mp1,
            MpegLayer::Layer2 => AudioCodec::Mp2,
            MpegLayer::Layer3 => AudioCodec::Mp3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

/// A parsed MPEG audio frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpegHeader {
    pub version: MpegVersion,
    pub layer: MpegLayer,
    /// A 16-bit CRC follows the header.
    pub crc_protected: bool,
    /// Bits per second.
    pub bitrate: u32,
    pub sample_rate: u32,
    pub padding: bool,
    pub channel_mode: ChannelMode,
}

/// Returns `true` if `bytes` starts with the 11-bit frame sync pattern.
#[inline]
pub fn is_sync_word(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0
}

impl MpegHeader {
    /// Parse the header at the start of `bytes`.
    ///
    /// # Errors
    ///
    /// - [`FrameError::BufferExhausted`] if fewer than [`HEADER_LEN`] bytes are given
    /// - [`FrameError::LostSync`] for a missing sync word or reserved version
    /// - [`FrameError::BadLayer`], [`FrameError::BadBitrate`],
    ///   [`FrameError::BadSampleRate`], [`FrameError::BadEmphasis`] for reserved fields
    /// - [`FrameError::FreeFormat`] for the free-format bitrate index
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < HEADER_LEN {
            return Err(FrameError::BufferExhausted);
        }
        if !is_sync_word(bytes) {
            return Err(FrameError::LostSync);
        }

        let version = match (bytes[1] >> 3) & 0b11 {
            0b00 => MpegVersion::Mpeg2_5,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return Err(FrameError::LostSync),
        };

        let layer = match (bytes[1] >> 1) & 0b11 {
            0b01 => MpegLayer::Layer3,
            0b10 => MpegLayer::Layer2,
            0b11 => MpegLayer::Layer1,
            _ => return Err(FrameError::BadLayer),
        };

        let crc_protected = bytes[1] & 0x01 == 0;

        let bitrate_index = (bytes[2] >> 4) as usize;
        if bitrate_index == 0x0F {
            return Err(FrameError::BadBitrate);
        }
        if bitrate_index == 0 {
            return Err(FrameError::FreeFormat);
        }

        let sample_rate_index = ((bytes[2] >> 2) & 0b11) as usize;
        if sample_rate_index == 0b11 {
            return Err(FrameError::BadSampleRate);
        }

        if bytes[3] & 0b11 == 0b10 {
            return Err(FrameError::BadEmphasis);
        }

        let table = match (version, layer) {
            (MpegVersion::Mpeg1, MpegLayer::Layer1) => 0,
            (MpegVersion::Mpeg1, MpegLayer::Layer2) => 1,
            (MpegVersion::Mpeg1, MpegLayer::Layer3) => 2,
            (_, MpegLayer::Layer1) => 3,
            (_, _) => 4,
        };
        let bitrate = BITRATES_KBPS[table][bitrate_index] * 1000;

        let sample_rate = match version {
            MpegVersion::Mpeg1 => SAMPLE_RATES[sample_rate_index],
            MpegVersion::Mpeg2 => SAMPLE_RATES[sample_rate_index] / 2,
            MpegVersion::Mpeg2_5 => SAMPLE_RATES[sample_rate_index] / 4,
        };

        let channel_mode = match bytes[3] >> 6 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        Ok(Self {
            version,
            layer,
            crc_protected,
            bitrate,
            sample_rate,
            padding: bytes[2] & 0x02 != 0,
            channel_mode,
        })
    }

    pub fn channels(&self) -> u16 {
        match self.channel_mode {
            ChannelMode::Mono => 1,
            _ => 2,
        }
    }

    /// Samples per channel one frame synthesizes to.
    pub fn samples_per_frame(&self) -> u32 {
        match (self.layer, self.version) {
            (MpegLayer::Layer1, _) => 384,
            (MpegLayer::Layer2, _) => 1152,
            (MpegLayer::Layer3, MpegVersion::Mpeg1) => 1152,
            (MpegLayer::Layer3, _) => 576,
        }
    }

    /// Frame length in bytes, header included.
    pub fn frame_len(&self) -> usize {
        let bitrate = self.bitrate as usize;
        let rate = self.sample_rate as usize;
        let padding = usize::from(self.padding);
        match (self.layer, self.version) {
            (MpegLayer::Layer1, _) => (12 * bitrate / rate + padding) * 4,
            (MpegLayer::Layer2, _) | (MpegLayer::Layer3, MpegVersion::Mpeg1) => {
                144 * bitrate / rate + padding
            }
            (MpegLayer::Layer3, _) => 72 * bitrate / rate + padding,
        }
    }

    pub fn to_frame_header(&self) -> FrameHeader {
        FrameHeader {
            sample_rate: self.sample_rate,
            bitrate: self.bitrate,
            channels: self.channels(),
            samples_per_channel: self.samples_per_frame(),
            frame_len: self.frame_len(),
        }
    }
}
