//! Time ranges used to select along time axes.

use std::fmt::{self, Display};
use std::ops::Range;

use super::duration::Duration;
use super::rate::Rate;

/// A span of time starting at `start`, optionally bounded by a duration.
///
/// An unbounded slice runs to the end of whatever axis it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlice {
    start: Duration,
    duration: Option<Duration>,
}

impl TimeSlice {
    /// A slice of `duration` starting at `start`.
    pub const fn new(start: Duration, duration: Duration) -> Self {
        Self {
            start,
            duration: Some(duration),
        }
    }

    /// An open-ended slice starting at `start`.
    pub const fn starting_at(start: Duration) -> Self {
        Self {
            start,
            duration: None,
        }
    }

    /// The slice covering `[start, stop)`.
    pub fn between(start: Duration, stop: Duration) -> Self {
        Self::new(start, stop - start)
    }

    /// The slice covering everything.
    pub const fn all() -> Self {
        Self::starting_at(Duration::ZERO)
    }

    /// Where the slice begins.
    pub const fn start(&self) -> Duration {
        self.start
    }

    /// How long the slice is, if bounded.
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Where the slice ends, if bounded.
    pub fn stop(&self) -> Option<Duration> {
        self.duration.map(|d| self.start + d)
    }

    /// Element indices selected on an axis of `len` elements at `rate`.
    ///
    /// The range is `floor(start / step) .. ceil(stop / step)`, clamped to the
    /// axis; an inverted or fully out-of-range slice yields an empty range.
    pub fn index_range(&self, rate: &Rate, len: usize) -> Range<usize> {
        let clamp = |index: i64| index.clamp(0, len as i64) as usize;
        let start = clamp(self.start.div_floor(rate.step()));
        let stop = match self.stop() {
            Some(stop) => clamp(stop.div_ceil(rate.step())),
            None => len,
        };
        start..stop.max(start)
    }
}

impl Display for TimeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stop() {
            Some(stop) => write!(f, "[{}, {})", self.start, stop),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}
