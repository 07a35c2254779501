//! # Frame Synchronization
//!
//! Locates MPEG audio frames in a [`CompressedBuffer`].
//!
//! A synchronized cursor expects the next frame to start exactly where it
//! points. An unsynchronized cursor (start of stream, after a seek, after a
//! sync loss) searches forward for a sync word and only accepts a candidate
//! when another sync word follows it one frame length later, which filters out
//! the `0xFFE` patterns that occur inside compressed payload.

use super::header::{is_sync_word, MpegHeader, HEADER_LEN};
use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::error::FrameError;

/// Size of an ID3v2 tag header (and footer).
const ID3V2_HEADER_LEN: usize = 10;

/// A located frame: its header and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedFrame {
    pub header: MpegHeader,
    pub offset: usize,
}

impl LocatedFrame {
    /// The frame's bytes, header included.
    pub fn bytes<'a>(&self, buffer: &'a CompressedBuffer) -> Option<&'a [u8]> {
        buffer.slice(self.offset, self.header.frame_len())
    }
}

/// Find the next frame at or after `cursor` and step the cursor past it.
///
/// # Errors
///
/// - [`FrameError::BufferExhausted`] when no complete frame remains; the cursor
///   is left at the truncated frame, or at the end if no sync word was found
/// - a recoverable error when the bytes at the cursor are not a valid frame; the
///   cursor has moved forward and the stream is marked unsynchronized
pub fn next_frame(
    buffer: &CompressedBuffer,
    cursor: &mut StreamCursor,
) -> Result<LocatedFrame, FrameError> {
    if buffer.remaining_len(cursor) < HEADER_LEN {
        return Err(FrameError::BufferExhausted);
    }

    let start = if cursor.is_synced() {
        cursor.offset()
    } else {
        if let Some(tag_len) = id3v2_tag_len(buffer.remaining(cursor)) {
            cursor.advance(tag_len, buffer);
            return Err(FrameError::LostSync);
        }
        match find_sync(buffer.as_slice(), cursor.offset()) {
            Some(offset) => offset,
            None => {
                cursor.move_to(buffer.len(), buffer);
                return Err(FrameError::BufferExhausted);
            }
        }
    };

    let bytes = &buffer.as_slice()[start..];
    let header = match MpegHeader::parse(bytes) {
        Ok(header) => header,
        Err(FrameError::BufferExhausted) => {
            cursor.move_to(start, buffer);
            return Err(FrameError::BufferExhausted);
        }
        Err(err) => {
            cursor.move_to(start + 1, buffer);
            cursor.set_synced(false);
            return Err(err);
        }
    };

    let frame_len = header.frame_len();
    let end = start + frame_len;
    if frame_len < HEADER_LEN || end > buffer.len() {
        cursor.move_to(start, buffer);
        return Err(FrameError::BufferExhausted);
    }

    if !cursor.is_synced() {
        if !next_frame_follows(&buffer.as_slice()[end..]) {
            cursor.move_to(start + 1, buffer);
            return Err(FrameError::LostSync);
        }
        cursor.set_synced(true);
    }

    cursor.move_to(end, buffer);
    Ok(LocatedFrame {
        header,
        offset: start,
    })
}

/// Offset of the first sync word at or after `from`.
fn find_sync(data: &[u8], from: usize) -> Option<usize> {
    let window = data.get(from..)?;
    window
        .windows(2)
        .position(is_sync_word)
        .map(|pos| from + pos)
}

/// Whether the bytes after a candidate frame confirm it: end of data, another
/// sync word, or a trailing tag.
fn next_frame_follows(rest: &[u8]) -> bool {
    rest.is_empty() || is_sync_word(rest) || rest.starts_with(b"TAG") || rest.starts_with(b"ID3")
}

/// Total length of an ID3v2 tag at the start of `data`, if there is one.
pub fn id3v2_tag_len(data: &[u8]) -> Option<usize> {
    if data.len() < ID3V2_HEADER_LEN || !data.starts_with(b"ID3") {
        return None;
    }
    let size_bytes = &data[6..10];
    if size_bytes.iter().any(|b| b & 0x80 != 0) {
        return None;
    }
    let size = size_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | usize::from(*b));
    let footer = if data[5] & 0x10 != 0 {
        ID3V2_HEADER_LEN
    } else {
        0
    };
    Some(ID3V2_HEADER_LEN + size + footer)
}
