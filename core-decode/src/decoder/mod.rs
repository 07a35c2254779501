//! # MPEG Audio Decoder Module
//!
//! Everything specific to MPEG audio: header parsing, frame sync, format
//! detection, and the [`MpegCodec`] that plugs into the generic
//! [`StreamDecoder`](crate::StreamDecoder).
//!
//! ## Supported Formats
//!
//! | Format | Codec | Feature Flag |
//! |--------|-------|--------------|
//! | MP1 | MPEG-1/2/2.5 Audio Layer I | `decoder-mp3` |
//! | MP2 | MPEG-1/2/2.5 Audio Layer II | `decoder-mp3` |
//! | MP3 | MPEG-1/2/2.5 Audio Layer III | `decoder-mp3` |
//!
//! Free-format streams (bitrate index 0) are not supported.
//!
//! ## Architecture
//!
//! ```text
//! CompressedBuffer → sync::next_frame → MpegHeader + frame bytes
//!                                      → Symphonia MPA decoder → SampleConverter → DecodedFrame
//! ```
//!
//! Framing is done here rather than by a Symphonia format reader so that the
//! engine owns the byte cursor: seeking is a cursor move followed by a
//! resync, exactly like after corrupt data.

pub mod format_detector;
pub mod header;
pub mod sync;

#[cfg(feature = "decoder-mp3")]
mod mpeg;

#[cfg(feature = "decoder-mp3")]
mod sample_converter;

pub use format_detector::FormatDetector;
pub use header::{ChannelMode, MpegHeader, MpegLayer, MpegVersion};

#[cfg(feature = "decoder-mp3")]
pub use mpeg::MpegCodec;

#[cfg(feature = "decoder-mp3")]
pub use sample_converter::SampleConverter;
