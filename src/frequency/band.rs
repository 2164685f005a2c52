//! Half-open frequency bands.

use std::fmt::{self, Display};

/// The half-open frequency interval `[start_hz, stop_hz)`.
///
/// Bands are immutable. A band whose stop does not exceed its start is empty
/// and intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyBand {
    start_hz: f64,
    stop_hz: f64,
}

impl FrequencyBand {
    /// Creates the band `[start_hz, stop_hz)`.
    pub const fn new(start_hz: f64, stop_hz: f64) -> Self {
        Self { start_hz, stop_hz }
    }

    /// Creates a band of `bandwidth` Hz centred on `center_hz`.
    pub fn from_center(center_hz: f64, bandwidth: f64) -> Self {
        let half = bandwidth / 2.0;
        Self::new(center_hz - half, center_hz + half)
    }

    /// Lower edge, inclusive.
    pub const fn start_hz(&self) -> f64 {
        self.start_hz
    }

    /// Upper edge, exclusive.
    pub const fn stop_hz(&self) -> f64 {
        self.stop_hz
    }

    /// Width of the band in Hz.
    pub fn bandwidth(&self) -> f64 {
        self.stop_hz - self.start_hz
    }

    /// Midpoint of the band.
    pub fn center_frequency(&self) -> f64 {
        (self.start_hz + self.stop_hz) / 2.0
    }

    /// True if the band covers no frequencies.
    pub fn is_empty(&self) -> bool {
        self.stop_hz.is_nan() || self.start_hz.is_nan() || self.stop_hz <= self.start_hz
    }

    /// True if `hz` lies inside the band.
    pub fn contains(&self, hz: f64) -> bool {
        hz >= self.start_hz && hz < self.stop_hz
    }

    /// True if the two bands share any frequency.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start_hz < other.stop_hz && other.start_hz < self.stop_hz
    }

    /// The frequencies shared by both bands.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::new(
            self.start_hz.max(other.start_hz),
            self.stop_hz.min(other.stop_hz),
        ))
    }

    /// Distance between the two band centres in Hz.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.center_frequency() - other.center_frequency()).abs()
    }
}

impl Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} Hz, {} Hz)", self.start_hz, self.stop_hz)
    }
}
