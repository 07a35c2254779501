//! # Streaming MPEG Audio Decode Engine
//!
//! Turns a compressed MPEG audio file held entirely in memory into interleaved
//! stereo 16-bit PCM, on demand, with approximate seeking.
//!
//! ## Overview
//!
//! This crate handles:
//! - A one-time header prescan for duration, frame count and average bitrate
//! - Pull-based decoding that keeps at most one partially consumed frame
//! - Proportional byte seeking followed by bitstream resynchronization
//! - Fixed-point to `i16` conversion with configurable headroom
//! - Format selection when opening a file (`open_source`)
//!
//! MPEG audio synthesis comes from Symphonia (feature `decoder-mp3`); framing,
//! sync recovery and everything above it live here.

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod frame;
pub mod logging;
pub mod scanner;
pub mod seek;
pub mod shared;
pub mod source;
pub mod timer;
pub mod traits;

pub use buffer::{CompressedBuffer, StreamCursor};
pub use config::DecoderConfig;
pub use decoder::FormatDetector;
pub use emitter::{LeftoverCursor, SampleEmitter};
pub use engine::{DecoderState, StreamDecoder};
pub use error::{DecodeError, FrameError, Result};
pub use frame::{DecodedFrame, FrameHeader, TrackStats, FRAC_BITS};
pub use scanner::HeaderScanner;
pub use seek::{ResyncOutcome, SeekController};
pub use shared::SharedSource;
pub use source::open_source;
pub use timer::MediaTime;
pub use traits::{AudioCodec, FrameCodec, SoundSource};

#[cfg(feature = "decoder-mp3")]
pub use decoder::MpegCodec;

#[cfg(feature = "decoder-mp3")]
pub use source::Mp3Source;
