//! # Sound Sources
//!
//! Concrete [`SoundSource`] implementations and the constructor that picks one
//! for a file.

use crate::config::DecoderConfig;
use crate::decoder::FormatDetector;
use crate::error::{DecodeError, Result};
use crate::traits::{AudioCodec, SoundSource};
use bytes::Bytes;
use std::path::Path;
use tracing::{error, instrument};

#[cfg(feature = "decoder-mp3")]
use crate::buffer::CompressedBuffer;
#[cfg(feature = "decoder-mp3")]
use crate::decoder::MpegCodec;
#[cfg(feature = "decoder-mp3")]
use crate::engine::{DecoderState, StreamDecoder};
#[cfg(feature = "decoder-mp3")]
use crate::frame::TrackStats;
#[cfg(feature = "decoder-mp3")]
use tracing::info;

/// Read a whole file into memory.
fn load(path: &Path) -> Result<Bytes> {
    std::fs::read(path).map(Bytes::from).map_err(|e| {
        error!("Failed to read file {:?}: {}", path, e);
        DecodeError::SourceError(format!("Failed to read {}: {}", path.display(), e))
    })
}

// ============================================================================
// MP3
// ============================================================================

/// MPEG audio source over an in-memory file.
///
/// The whole compressed file is held in memory for the lifetime of the source;
/// frames are decoded on demand by [`read`](SoundSource::read).
#[cfg(feature = "decoder-mp3")]
#[derive(Debug)]
pub struct Mp3Source {
    engine: StreamDecoder<MpegCodec>,
}

#[cfg(feature = "decoder-mp3")]
impl Mp3Source {
    /// Load and prescan the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::SourceError`] if the file cannot be read in full
    /// - [`DecodeError::InvalidConfig`] if `config` fails validation
    /// - [`DecodeError::DecoderError`] if the synthesis backend cannot be created
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: DecoderConfig) -> Result<Self> {
        let data = load(path.as_ref())?;
        Self::from_bytes(data, config)
    }

    /// Build a source over compressed bytes already in memory.
    ///
    /// A buffer containing no decodable frame still succeeds, with zero
    /// length and reads returning nothing.
    pub fn from_bytes(data: impl Into<Bytes>, config: DecoderConfig) -> Result<Self> {
        let buffer = CompressedBuffer::new(data);
        let codec = MpegCodec::for_buffer(&buffer)?;
        let engine = StreamDecoder::new(codec, buffer, config)?;

        let stats = engine.stats();
        info!(
            codec = ?engine.codec(),
            frames = stats.frame_count(),
            bitrate = stats.bitrate(),
            sample_rate = stats.sample_rate(),
            channels = stats.channels(),
            "Opened MPEG audio source"
        );
        Ok(Self { engine })
    }

    /// Human-readable source type.
    pub fn source_type(&self) -> &'static str {
        "mp3 file."
    }

    pub fn stats(&self) -> &TrackStats {
        self.engine.stats()
    }

    pub fn state(&self) -> DecoderState {
        self.engine.state()
    }

    pub fn codec(&self) -> AudioCodec {
        self.engine.codec()
    }

    /// Interleaved samples decoded but not yet returned.
    pub fn pending_samples(&self) -> usize {
        self.engine.pending_samples()
    }

    pub fn config(&self) -> &DecoderConfig {
        self.engine.config()
    }

    /// The underlying engine, for diagnostics.
    pub fn engine(&self) -> &StreamDecoder<MpegCodec> {
        &self.engine
    }
}

#[cfg(feature = "decoder-mp3")]
impl SoundSource for Mp3Source {
    fn length(&self) -> u64 {
        self.engine.length()
    }

    fn read(&mut self, dest: &mut [i16]) -> usize {
        self.engine.read(dest)
    }

    fn seek(&mut self, position: u64) -> u64 {
        self.engine.seek(position)
    }
}

// ============================================================================
// Format Selection
// ============================================================================

/// Open `path` with the source implementation matching its format.
///
/// The format is taken from the file extension, or sniffed from the contents
/// when the extension is missing or unrecognized.
///
/// # Errors
///
/// - [`DecodeError::SourceError`] if the file cannot be read in full
/// - [`DecodeError::UnsupportedCodec`] if no implementation handles the format
/// - any error from the selected source's constructor
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_source(
    path: impl AsRef<Path>,
    config: DecoderConfig,
) -> Result<Box<dyn SoundSource + Send>> {
    let path = path.as_ref();
    let data = load(path)?;

    #[cfg(feature = "decoder-mp3")]
    let codec = FormatDetector::detect(Some(path), &CompressedBuffer::new(data.clone()));
    #[cfg(not(feature = "decoder-mp3"))]
    let codec = FormatDetector::codec_from_extension(path);

    FormatDetector::validate_codec_support(&codec)?;
    build_source(codec, data, config)
}

/// Construct the source implementation for a validated `codec`.
#[cfg(feature = "decoder-mp3")]
fn build_source(
    codec: AudioCodec,
    data: Bytes,
    config: DecoderConfig,
) -> Result<Box<dyn SoundSource + Send>> {
    if codec.is_mpeg_audio() {
        return Ok(Box::new(Mp3Source::from_bytes(data, config)?));
    }
    Err(no_source_for(codec))
}

#[cfg(not(feature = "decoder-mp3"))]
fn build_source(
    codec: AudioCodec,
    _data: Bytes,
    _config: DecoderConfig,
) -> Result<Box<dyn SoundSource + Send>> {
    Err(no_source_for(codec))
}

fn no_source_for(codec: AudioCodec) -> DecodeError {
    DecodeError::UnsupportedCodec(format!("No sound source for {:?}", codec))
}
