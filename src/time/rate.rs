//! Sampling rates for time-dimensioned axes.
//!
//! A [`Rate`] describes how the elements of a time axis relate to elapsed
//! time: `step` is the time between the starts of consecutive elements and
//! `span` is the time each element covers. Plain audio has `step == span`;
//! overlapping analysis windows have `step < span`.

use std::fmt::{self, Display};

use super::duration::{Duration, TICKS_PER_SECOND};
use crate::{ArrayError, ArrayResult};

/// Step and span of the elements along a time axis.
///
/// Immutable once constructed; both durations are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Rate {
    step: Duration,
    span: Duration,
}

impl Rate {
    /// Creates a rate from a per-element step and span.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidRate`] if either duration is not strictly
    /// positive.
    pub fn new(step: Duration, span: Duration) -> ArrayResult<Self> {
        if !step.is_positive() {
            return Err(ArrayError::InvalidRate(format!(
                "step must be > 0, got {step}"
            )));
        }
        if !span.is_positive() {
            return Err(ArrayError::InvalidRate(format!(
                "span must be > 0, got {span}"
            )));
        }
        Ok(Self { step, span })
    }

    /// Creates a rate whose elements abut exactly (`span == step`).
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidRate`] if `step` is not strictly positive.
    pub fn constant(step: Duration) -> ArrayResult<Self> {
        Self::new(step, step)
    }

    /// Creates the rate of plain audio sampled at `hz` samples per second.
    ///
    /// The step is `1 / hz` seconds rounded to the nearest tick, which is exact
    /// for every rate in [`AudioSampleRate`].
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidRate`] if `hz` is zero or so large that the
    /// step rounds to zero ticks.
    pub fn from_sample_rate(hz: u32) -> ArrayResult<Self> {
        if hz == 0 {
            return Err(ArrayError::InvalidRate(
                "sample rate must be > 0".to_string(),
            ));
        }
        let hz = i64::from(hz);
        let step = (TICKS_PER_SECOND + hz / 2) / hz;
        Self::constant(Duration::from_ticks(step))
    }

    /// Time between the starts of consecutive elements.
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Time covered by a single element.
    pub const fn span(&self) -> Duration {
        self.span
    }

    /// True if consecutive elements overlap in time.
    pub fn is_overlapping(&self) -> bool {
        self.span > self.step
    }

    /// Time shared by two consecutive elements, zero if they do not overlap.
    pub fn overlap(&self) -> Duration {
        if self.is_overlapping() {
            self.span - self.step
        } else {
            Duration::ZERO
        }
    }

    /// Elements per second, as a float.
    pub fn samples_per_second(&self) -> f64 {
        TICKS_PER_SECOND as f64 / self.step.ticks() as f64
    }

    /// The integer sample rate this step corresponds to, if it is exact.
    pub fn sample_rate_hz(&self) -> Option<u32> {
        let ticks = self.step.ticks();
        if TICKS_PER_SECOND % ticks == 0 {
            u32::try_from(TICKS_PER_SECOND / ticks).ok()
        } else {
            None
        }
    }

    /// The rate of a sliding window over elements at this rate.
    ///
    /// Each window advances by `step_count` elements and covers `span_count`
    /// elements, so the new step is `step * step_count` and the new span runs
    /// from the start of the first covered element to the end of the last.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidRate`] if either count is zero.
    pub fn windowed(&self, step_count: u32, span_count: u32) -> ArrayResult<Self> {
        if step_count == 0 || span_count == 0 {
            return Err(ArrayError::InvalidRate(format!(
                "window counts must be > 0, got step {step_count} span {span_count}"
            )));
        }
        Self::new(
            self.step * i64::from(step_count),
            self.step * i64::from(span_count - 1) + self.span,
        )
    }

    /// How many times longer this rate's step is than `other`'s.
    pub fn relative_to(&self, other: &Self) -> f64 {
        self.step / other.step
    }

    /// Total time covered by `len` consecutive elements.
    pub fn span_of(&self, len: usize) -> Duration {
        if len == 0 {
            Duration::ZERO
        } else {
            self.step * (len as i64 - 1) + self.span
        }
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rate(step={}, span={})", self.step, self.span)
    }
}

/// The standard audio sample rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioSampleRate {
    /// 8 kHz telephony.
    Hz8000,
    /// 11.025 kHz.
    Hz11025,
    /// 16 kHz wideband speech.
    Hz16000,
    /// 22.05 kHz.
    Hz22050,
    /// 32 kHz.
    Hz32000,
    /// 44.1 kHz CD audio.
    Hz44100,
    /// 48 kHz.
    Hz48000,
    /// 88.2 kHz.
    Hz88200,
    /// 96 kHz.
    Hz96000,
    /// 192 kHz.
    Hz192000,
}

impl AudioSampleRate {
    /// Every standard rate, ascending.
    pub const ALL: [Self; 10] = [
        Self::Hz8000,
        Self::Hz11025,
        Self::Hz16000,
        Self::Hz22050,
        Self::Hz32000,
        Self::Hz44100,
        Self::Hz48000,
        Self::Hz88200,
        Self::Hz96000,
        Self::Hz192000,
    ];

    /// Samples per second.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz8000 => 8000,
            Self::Hz11025 => 11025,
            Self::Hz16000 => 16000,
            Self::Hz22050 => 22050,
            Self::Hz32000 => 32000,
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
            Self::Hz88200 => 88200,
            Self::Hz96000 => 96000,
            Self::Hz192000 => 192000,
        }
    }

    /// The exact time-axis rate of audio at this sample rate.
    pub fn rate(self) -> Rate {
        let step = Duration::from_ticks(TICKS_PER_SECOND / i64::from(self.hz()));
        Rate {
            step,
            span: step,
        }
    }

    /// The standard rate closest to `hz`.
    pub fn nearest(hz: u32) -> Self {
        let mut best = Self::Hz8000;
        for candidate in Self::ALL {
            if candidate.hz().abs_diff(hz) < best.hz().abs_diff(hz) {
                best = candidate;
            }
        }
        best
    }

    /// The standard rate matching a time-axis rate, if any.
    pub fn from_rate(rate: &Rate) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.rate() == *rate)
    }
}

impl TryFrom<u32> for AudioSampleRate {
    type Error = ArrayError;

    fn try_from(hz: u32) -> ArrayResult<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.hz() == hz)
            .ok_or_else(|| ArrayError::InvalidRate(format!("{hz} Hz is not a standard audio sample rate")))
    }
}

impl Display for AudioSampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_step() {
        let err = Rate::new(Duration::ZERO, Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, ArrayError::InvalidRate(_)));
        assert!(Rate::constant(-Duration::seconds(1)).is_err());
        assert!(Rate::new(Duration::seconds(1), Duration::ZERO).is_err());
        assert!(Rate::from_sample_rate(0).is_err());
    }

    #[test]
    fn test_sample_rate_step_is_exact() {
        let rate = Rate::from_sample_rate(44100).unwrap();
        assert_eq!(rate.step() * 44100, Duration::seconds(1));
        assert_eq!(rate.sample_rate_hz(), Some(44100));
        assert_eq!(rate, AudioSampleRate::Hz44100.rate());
        assert!(!rate.is_overlapping());
    }

    #[test]
    fn test_windowed_rate() {
        // A half-lapped base rate: each frame covers two steps.
        let base = Rate::new(Duration::milliseconds(10), Duration::milliseconds(20)).unwrap();
        let pooled = base.windowed(2, 4).unwrap();
        assert_eq!(pooled.relative_to(&base), 2.0);
        assert_eq!(pooled.span() / base.step(), 5.0);
        assert!(pooled.is_overlapping());
        assert_eq!(pooled.overlap(), Duration::milliseconds(30));
        assert!(base.windowed(0, 4).is_err());
    }

    #[test]
    fn test_span_of() {
        let rate = Rate::new(Duration::seconds(1), Duration::seconds(2)).unwrap();
        assert_eq!(rate.span_of(0), Duration::ZERO);
        assert_eq!(rate.span_of(1), Duration::seconds(2));
        assert_eq!(rate.span_of(10), Duration::seconds(11));
    }

    #[test]
    fn test_audio_sample_rate_lookup() {
        assert_eq!(AudioSampleRate::try_from(48000).unwrap(), AudioSampleRate::Hz48000);
        assert!(matches!(
            AudioSampleRate::try_from(44000),
            Err(ArrayError::InvalidRate(_))
        ));
        assert_eq!(AudioSampleRate::nearest(44000), AudioSampleRate::Hz44100);
        assert_eq!(AudioSampleRate::nearest(1), AudioSampleRate::Hz8000);
        let one_second = Rate::constant(Duration::seconds(1)).unwrap();
        assert_eq!(AudioSampleRate::from_rate(&one_second), None);
        assert_eq!(
            AudioSampleRate::from_rate(&Rate::from_sample_rate(11025).unwrap()),
            Some(AudioSampleRate::Hz11025)
        );
    }
}
