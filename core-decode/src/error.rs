//! # Decode Error Types
//!
//! Two layers of errors exist in this crate:
//!
//! - [`DecodeError`] is surfaced to callers. It only occurs while building an
//!   engine (loading, format selection, configuration) or while initializing
//!   logging.
//! - [`FrameError`] describes a single frame failing to parse or decode. It is
//!   handled inside the scan, read and seek loops and never reaches the caller
//!   of [`SoundSource::read`](crate::SoundSource::read) or
//!   [`SoundSource::seek`](crate::SoundSource::seek).

use thiserror::Error;

/// Errors that can occur while constructing or configuring a decode engine.
#[derive(Error, Debug)]
pub enum DecodeError {
    // ========================================================================
    // Load Errors
    // ========================================================================
    /// Failed to open or fully read the compressed source.
    #[error("Failed to open audio source: {0}")]
    SourceError(String),

    // ========================================================================
    // Format/Codec Errors
    // ========================================================================
    /// No decode engine exists for the detected format.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// The synthesis backend could not be created.
    #[error("Decoder internal error: {0}")]
    DecoderError(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration values are out of range, or logging setup failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DecodeError {
    /// Returns `true` if the source itself could not be loaded.
    pub fn is_load_error(&self) -> bool {
        matches!(self, DecodeError::SourceError(_))
    }
}

/// Result type for engine construction and configuration.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Outcome of a single frame that failed to parse or decode.
///
/// Everything except [`FrameError::BufferExhausted`] and
/// [`FrameError::Unrecoverable`] is recoverable: the cursor has already been
/// moved past the offending bytes and the next frame can be attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No frame header at the cursor; the cursor was moved to the next
    /// candidate sync word.
    #[error("lost synchronization")]
    LostSync,

    /// Reserved layer field.
    #[error("reserved header layer value")]
    BadLayer,

    /// Forbidden bitrate index.
    #[error("forbidden bitrate value")]
    BadBitrate,

    /// Reserved sample rate index.
    #[error("reserved sample frequency value")]
    BadSampleRate,

    /// Reserved emphasis field.
    #[error("reserved emphasis value")]
    BadEmphasis,

    /// Free-format bitrate frames are not supported.
    #[error("free format bitrate not supported")]
    FreeFormat,

    /// The frame was located but its payload failed to decode.
    #[error("corrupt frame: {0}")]
    Corrupt(String),

    /// Not enough data remains for another frame.
    #[error("end of buffer")]
    BufferExhausted,

    /// Decoding cannot continue.
    #[error("unrecoverable frame error: {0}")]
    Unrecoverable(String),
}

impl FrameError {
    /// Returns `true` if the stream can continue with the next frame.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FrameError::BufferExhausted | FrameError::Unrecoverable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_recoverability() {
        assert!(FrameError::LostSync.is_recoverable());
        assert!(FrameError::BadBitrate.is_recoverable());
        assert!(FrameError::Corrupt("crc".into()).is_recoverable());

        assert!(!FrameError::BufferExhausted.is_recoverable());
        assert!(!FrameError::Unrecoverable("backend".into()).is_recoverable());
    }

    #[test]
    fn test_decode_error_classification() {
        assert!(DecodeError::SourceError("missing".into()).is_load_error());
        assert!(!DecodeError::UnsupportedCodec("flac".into()).is_load_error());
        assert!(!DecodeError::InvalidConfig("budget".into()).is_load_error());
    }
}
