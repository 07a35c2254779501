//! # MPEG Audio Frame Codec
//!
//! [`FrameCodec`] for MPEG-1/2/2.5 audio. Framing, sync recovery and header
//! parsing happen here; each located frame is handed to Symphonia's MPEG audio
//! decoder as a single packet for synthesis.

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::decoder::format_detector::FormatDetector;
use crate::decoder::header::MpegHeader;
use crate::decoder::sample_converter::SampleConverter;
use crate::decoder::sync;
use crate::error::{DecodeError, FrameError, Result};
use crate::frame::{DecodedFrame, FrameHeader};
use crate::traits::{AudioCodec, FrameCodec};
use symphonia::core::audio::Channels;
use symphonia::core::codecs::{
    CodecParameters, CodecType, Decoder, DecoderOptions, CODEC_TYPE_MP1, CODEC_TYPE_MP2,
    CODEC_TYPE_MP3,
};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::Packet;
use tracing::{debug, error};

/// MPEG audio codec backed by Symphonia's synthesis.
///
/// The Symphonia decoder keeps the Layer III bit reservoir and the
/// synthesis filterbank overlap between frames; [`FrameCodec::mute`] resets
/// both.
pub struct MpegCodec {
    decoder: Box<dyn Decoder>,
    codec: AudioCodec,
}

impl MpegCodec {
    /// Create a codec for `codec`, using `first` (if known) to describe the stream.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnsupportedCodec`] if `codec` is not an MPEG audio layer
    /// - [`DecodeError::DecoderError`] if Symphonia cannot build the decoder
    pub fn new(codec: AudioCodec, first: Option<&MpegHeader>) -> Result<Self> {
        FormatDetector::validate_codec_support(&codec)?;

        let mut params = CodecParameters::new();
        params.for_codec(symphonia_codec_type(codec)?);
        if let Some(header) = first {
            let channels = if header.channels() == 1 {
                Channels::FRONT_LEFT
            } else {
                Channels::FRONT_LEFT | Channels::FRONT_RIGHT
            };
            params
                .with_sample_rate(header.sample_rate)
                .with_channels(channels);
        }

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| {
                error!("Failed to create MPEG decoder: {}", e);
                DecodeError::DecoderError(format!("Failed to create codec decoder: {}", e))
            })?;

        debug!(?codec, "MPEG codec initialized");
        Ok(Self { decoder, codec })
    }

    /// Create a codec matching the first frame found in `buffer`.
    ///
    /// Falls back to Layer III when no frame is found, so that a buffer with
    /// no audio still yields an (empty) source.
    pub fn for_buffer(buffer: &CompressedBuffer) -> Result<Self> {
        let first = FormatDetector::sniff(buffer);
        let codec = first.map_or(AudioCodec::Mp3, |header| header.layer.codec());
        Self::new(codec, first.as_ref())
    }
}

impl FrameCodec for MpegCodec {
    fn codec(&self) -> AudioCodec {
        self.codec
    }

    fn decode_header(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
    ) -> std::result::Result<FrameHeader, FrameError> {
        sync::next_frame(buffer, cursor).map(|located| located.header.to_frame_header())
    }

    fn decode_frame(
        &mut self,
        buffer: &CompressedBuffer,
        cursor: &mut StreamCursor,
        block: &mut DecodedFrame,
    ) -> std::result::Result<FrameHeader, FrameError> {
        let located = sync::next_frame(buffer, cursor)?;
        let bytes = located
            .bytes(buffer)
            .ok_or(FrameError::BufferExhausted)?;
        let header = located.header.to_frame_header();

        let packet = Packet::new_from_slice(0, 0, u64::from(header.samples_per_channel), bytes);
        match self.decoder.decode(&packet) {
            Ok(decoded) => {
                SampleConverter::to_fixed_point(&decoded, block);
                Ok(header)
            }
            Err(err) => Err(map_decode_error(err)),
        }
    }

    fn mute(&mut self) {
        self.decoder.reset();
    }
}

impl std::fmt::Debug for MpegCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpegCodec")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

fn symphonia_codec_type(codec: AudioCodec) -> Result<CodecType> {
    match codec {
        AudioCodec::Mp1 => Ok(CODEC_TYPE_MP1),
        AudioCodec::Mp2 => Ok(CODEC_TYPE_MP2),
        AudioCodec::Mp3 => Ok(CODEC_TYPE_MP3),
        AudioCodec::Unknown => Err(DecodeError::UnsupportedCodec(
            "Unknown audio codec".to_string(),
        )),
    }
}

/// Classify a Symphonia decode failure.
///
/// Bad frame data (including a Layer III reservoir that reaches back past the
/// start of the stream) is recoverable; anything else stops decoding.
fn map_decode_error(err: SymphoniaError) -> FrameError {
    match err {
        SymphoniaError::DecodeError(msg) => FrameError::Corrupt(msg.to_string()),
        SymphoniaError::IoError(e) => FrameError::Corrupt(e.to_string()),
        other => FrameError::Unrecoverable(other.to_string()),
    }
}
