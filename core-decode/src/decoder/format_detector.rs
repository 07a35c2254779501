//! # Format Detection Module
//!
//! Picks a decode engine for a source from its file extension and, failing
//! that, from the first MPEG audio frame found in its bytes.

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::decoder::header::MpegHeader;
use crate::decoder::sync;
use crate::error::{DecodeError, Result};
use crate::traits::AudioCodec;
use std::path::Path;
use tracing::{debug, warn};

/// Give up sniffing after this many rejected candidates.
const MAX_SNIFF_ATTEMPTS: usize = 64;

/// Format detector for compressed audio sources.
pub struct FormatDetector;

impl FormatDetector {
    /// Detect the codec from a file extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_decode::{AudioCodec, FormatDetector};
    /// use std::path::Path;
    ///
    /// let codec = FormatDetector::codec_from_extension(Path::new("/music/song.MP3"));
    /// assert_eq!(codec, AudioCodec::Mp3);
    /// ```
    pub fn codec_from_extension(path: &Path) -> AudioCodec {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("mp3") => AudioCodec::Mp3,
            Some("mp2") | Some("mpa") => AudioCodec::Mp2,
            Some("mp1") => AudioCodec::Mp1,
            Some(other) => {
                debug!("Unrecognized file extension: {}", other);
                AudioCodec::Unknown
            }
            None => {
                debug!("No file extension found, will sniff contents");
                AudioCodec::Unknown
            }
        }
    }

    /// Header of the first confirmed MPEG audio frame in `buffer`.
    ///
    /// Leading ID3v2 tags and garbage are skipped the same way the decoder
    /// skips them.
    pub fn sniff(buffer: &CompressedBuffer) -> Option<MpegHeader> {
        let mut cursor = StreamCursor::at(0);
        for _ in 0..MAX_SNIFF_ATTEMPTS {
            match sync::next_frame(buffer, &mut cursor) {
                Ok(located) => return Some(located.header),
                Err(err) if err.is_recoverable() => continue,
                Err(_) => return None,
            }
        }
        None
    }

    /// Detect the codec of a source, preferring its extension.
    pub fn detect(path: Option<&Path>, buffer: &CompressedBuffer) -> AudioCodec {
        let from_extension = path.map_or(AudioCodec::Unknown, Self::codec_from_extension);
        if from_extension != AudioCodec::Unknown {
            return from_extension;
        }

        match Self::sniff(buffer) {
            Some(header) => header.layer.codec(),
            None => {
                warn!("No MPEG audio frame found while sniffing");
                AudioCodec::Unknown
            }
        }
    }

    /// Validate if a codec is supported by current feature flags.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Codec is supported
    /// - `Err(DecodeError::UnsupportedCodec)` - Codec not enabled or unknown
    pub fn validate_codec_support(codec: &AudioCodec) -> Result<()> {
        match codec {
            codec if codec.is_mpeg_audio() => {
                #[cfg(not(feature = "decoder-mp3"))]
                return Err(DecodeError::UnsupportedCodec(
                    "MPEG audio decoder not enabled. Enable 'decoder-mp3' feature".to_string(),
                ));
                #[cfg(feature = "decoder-mp3")]
                Ok(())
            }
            _ => Err(DecodeError::UnsupportedCodec(
                "Unknown audio codec".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::header::MpegLayer;

    fn layer2_frame() -> Vec<u8> {
        // MPEG-1 Layer II, 192 kbps, 48 kHz: 576 bytes
        let mut bytes = vec![0u8; 576];
        bytes[..4].copy_from_slice(&[0xFF, 0xFD, 0xA4, 0x00]);
        bytes
    }

    #[test]
    fn test_codec_from_extension() {
        assert_eq!(FormatDetector::codec_from_extension(Path::new("a.mp3")), AudioCodec::Mp3);
        assert_eq!(FormatDetector::codec_from_extension(Path::new("a.MP2")), AudioCodec::Mp2);
        assert_eq!(FormatDetector::codec_from_extension(Path::new("a.mp1")), AudioCodec::Mp1);
        assert_eq!(FormatDetector::codec_from_extension(Path::new("a.flac")), AudioCodec::Unknown);
        assert_eq!(FormatDetector::codec_from_extension(Path::new("noext")), AudioCodec::Unknown);
    }

    #[test]
    fn test_sniff_finds_first_frame() {
        let data: Vec<u8> = [vec![0x42; 5], layer2_frame(), layer2_frame()].concat();
        let header = FormatDetector::sniff(&CompressedBuffer::from(data)).unwrap();
        assert_eq!(header.layer, MpegLayer::Layer2);
        assert_eq!(header.sample_rate, 48000);
    }

    #[test]
    fn test_sniff_without_frames() {
        assert!(FormatDetector::sniff(&CompressedBuffer::from(vec![0u8; 100])).is_none());
        assert!(FormatDetector::sniff(&CompressedBuffer::from(Vec::new())).is_none());
    }

    #[test]
    fn test_detect_prefers_extension() {
        let data: Vec<u8> = [layer2_frame(), layer2_frame()].concat();
        let buffer = CompressedBuffer::from(data);

        assert_eq!(FormatDetector::detect(Some(Path::new("x.mp3")), &buffer), AudioCodec::Mp3);
        assert_eq!(FormatDetector::detect(Some(Path::new("x.bin")), &buffer), AudioCodec::Mp2);
        assert_eq!(FormatDetector::detect(None, &buffer), AudioCodec::Mp2);
    }

    #[cfg(feature = "decoder-mp3")]
    #[test]
    fn test_codec_validation() {
        for codec in [AudioCodec::Mp1, AudioCodec::Mp2, AudioCodec::Mp3] {
            assert!(FormatDetector::validate_codec_support(&codec).is_ok());
        }
        assert!(matches!(
            FormatDetector::validate_codec_support(&AudioCodec::Unknown),
            Err(DecodeError::UnsupportedCodec(_))
        ));
    }

    #[cfg(not(feature = "decoder-mp3"))]
    #[test]
    fn test_codec_validation_without_decoder() {
        assert!(FormatDetector::validate_codec_support(&AudioCodec::Mp3).is_err());
    }
}
