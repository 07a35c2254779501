//! # Compressed Byte Store
//!
//! The whole compressed stream lives in one immutable [`CompressedBuffer`]. Parse
//! position is an explicit [`StreamCursor`] value rather than a pointer into the
//! buffer, and every advance is clamped to the buffer length.

use bytes::Bytes;

/// Immutable store holding the entire compressed bitstream.
#[derive(Debug, Clone)]
pub struct CompressedBuffer {
    data: Bytes,
}

impl CompressedBuffer {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Bytes from the cursor to the end of the buffer.
    pub fn remaining(&self, cursor: &StreamCursor) -> &[u8] {
        &self.data[cursor.offset().min(self.data.len())..]
    }

    /// Number of bytes from the cursor to the end of the buffer.
    pub fn remaining_len(&self, cursor: &StreamCursor) -> usize {
        self.data.len().saturating_sub(cursor.offset())
    }

    /// `len` bytes starting at `offset`, or `None` if that runs past the end.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }
}

impl From<Vec<u8>> for CompressedBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// Current parse position within a [`CompressedBuffer`].
///
/// `synced` records whether the previous frame ended exactly where the next one
/// begins. A cursor placed at an arbitrary offset (start of stream, or a seek
/// target) starts unsynchronized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCursor {
    offset: usize,
    synced: bool,
}

impl StreamCursor {
    /// Unsynchronized cursor at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            synced: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    /// Move forward by `count` bytes, never past `buffer`'s end.
    pub fn advance(&mut self, count: usize, buffer: &CompressedBuffer) {
        self.offset = self.offset.saturating_add(count).min(buffer.len());
    }

    /// Jump to `offset`, clamped to `buffer`'s end.
    pub fn move_to(&mut self, offset: usize, buffer: &CompressedBuffer) {
        self.offset = offset.min(buffer.len());
    }

    pub fn is_at_end(&self, buffer: &CompressedBuffer) -> bool {
        self.offset >= buffer.len()
    }
}
