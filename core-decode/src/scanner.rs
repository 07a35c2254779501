//! # Header Prescan
//!
//! Walks the whole buffer once, decoding frame headers only, to compute
//! [`TrackStats`] without any synthesis work.

use crate::buffer::{CompressedBuffer, StreamCursor};
use crate::error::FrameError;
use crate::frame::{FrameHeader, TrackStats};
use crate::timer::MediaTime;
use crate::traits::FrameCodec;
use tracing::{debug, trace};

/// Header-only scan producing [`TrackStats`].
pub struct HeaderScanner;

impl HeaderScanner {
    /// Scan `buffer` from offset 0.
    ///
    /// Recoverable header errors are skipped; running out of data or hitting an
    /// unrecoverable error ends the scan with whatever was accumulated.
    pub fn scan<C: FrameCodec + ?Sized>(codec: &mut C, buffer: &CompressedBuffer) -> TrackStats {
        let mut totals = StatsAccumulator::default();
        let mut cursor = StreamCursor::at(0);
        let mut skipped = 0u64;

        while !cursor.is_at_end(buffer) {
            match codec.decode_header(buffer, &mut cursor) {
                Ok(header) => totals.push(&header),
                Err(err) if err.is_recoverable() => {
                    skipped += 1;
                    trace!(offset = cursor.offset(), error = %err, "Skipping during header scan");
                }
                Err(FrameError::BufferExhausted) => break,
                Err(err) => {
                    debug!(offset = cursor.offset(), error = %err, "Header scan stopped early");
                    break;
                }
            }
        }

        let stats = totals.finish();
        debug!(
            frames = stats.frame_count(),
            bitrate = stats.bitrate(),
            duration_ms = stats.duration_secs().as_millis() as u64,
            skipped,
            "Header scan complete"
        );
        stats
    }
}

#[derive(Debug, Default)]
struct StatsAccumulator {
    duration: MediaTime,
    frame_count: u64,
    bitrate_sum: u64,
    sample_rate: u32,
    channels: u16,
}

impl StatsAccumulator {
    fn push(&mut self, header: &FrameHeader) {
        self.frame_count += 1;
        self.duration += header.duration();
        self.bitrate_sum += u64::from(header.bitrate);
        self.sample_rate = header.sample_rate;
        self.channels = header.channels;
    }

    fn finish(self) -> TrackStats {
        let bitrate = if self.frame_count == 0 {
            0
        } else {
            u32::try_from(self.bitrate_sum / self.frame_count).unwrap_or(u32::MAX)
        };
        TrackStats::new(
            self.duration,
            self.frame_count,
            bitrate,
            self.sample_rate,
            self.channels,
        )
    }
}
