//! Exact media time arithmetic.
//!
//! Durations are counted in ticks of [`TICKS_PER_SECOND`], a rate every MPEG
//! audio sample rate divides evenly, so summing thousands of frame durations
//! never accumulates rounding error.

use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Tick rate of [`MediaTime`].
pub const TICKS_PER_SECOND: u64 = 352_800_000;

/// A non-negative span of media time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaTime {
    ticks: u64,
}

impl MediaTime {
    /// Zero duration.
    pub const ZERO: MediaTime = MediaTime { ticks: 0 };

    /// Duration of `samples` samples at `sample_rate` Hz.
    ///
    /// A zero sample rate yields [`MediaTime::ZERO`].
    pub fn from_samples(samples: u64, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Self::ZERO;
        }
        let ticks = u128::from(samples) * u128::from(TICKS_PER_SECOND) / u128::from(sample_rate);
        Self {
            ticks: u64::try_from(ticks).unwrap_or(u64::MAX),
        }
    }

    /// Raw tick count.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of whole samples this span covers at `sample_rate` Hz (rounded down).
    pub fn count(&self, sample_rate: u32) -> u64 {
        let samples = u128::from(self.ticks) * u128::from(sample_rate) / u128::from(TICKS_PER_SECOND);
        u64::try_from(samples).unwrap_or(u64::MAX)
    }

    pub fn as_duration(&self) -> Duration {
        let secs = self.ticks / TICKS_PER_SECOND;
        let rem = self.ticks % TICKS_PER_SECOND;
        let nanos = u128::from(rem) * 1_000_000_000 / u128::from(TICKS_PER_SECOND);
        Duration::new(secs, nanos as u32)
    }

    pub fn is_zero(&self) -> bool {
        self.ticks == 0
    }
}

impl Add for MediaTime {
    type Output = MediaTime;

    fn add(self, rhs: MediaTime) -> MediaTime {
        MediaTime {
            ticks: self.ticks.saturating_add(rhs.ticks),
        }
    }
}

impl AddAssign for MediaTime {
    fn add_assign(&mut self, rhs: MediaTime) {
        *self = *self + rhs;
    }
}

impl From<MediaTime> for Duration {
    fn from(time: MediaTime) -> Duration {
        time.as_duration()
    }
}
