//! Frequency weighting curves.
//!
//! A weighting maps the centre frequency of a band to a linear gain. Applying
//! it to an array with a frequency axis scales every band by its gain and
//! broadcasts across the remaining axes (see
//! [`ArrayWithUnits::weighted`](crate::ArrayWithUnits::weighted)).

use super::scale::Scale;
use crate::utils::audio_math::{amplitude_to_db, db_to_amplitude};

/// A pure function from centre frequency (Hz) to linear gain.
pub trait Weighting {
    /// Gain applied to a band centred on `center_hz`.
    fn weight(&self, center_hz: f64) -> f64;

    /// Gain for every band of `scale`, lowest first.
    fn weights(&self, scale: &Scale) -> Vec<f64> {
        scale
            .iter()
            .map(|band| self.weight(band.center_frequency()))
            .collect()
    }
}

impl<F> Weighting for F
where
    F: Fn(f64) -> f64,
{
    fn weight(&self, center_hz: f64) -> f64 {
        self(center_hz)
    }
}

/// The IEC 61672 A-weighting curve.
///
/// Normalised so the gain at 1 kHz is 0 dB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AWeighting;

impl AWeighting {
    const F1: f64 = 20.598_997;
    const F2: f64 = 107.652_65;
    const F3: f64 = 737.862_23;
    const F4: f64 = 12_194.217;
    const OFFSET_DB: f64 = 2.0;

    fn response(hz: f64) -> f64 {
        let f2 = hz * hz;
        let numerator = Self::F4 * Self::F4 * f2 * f2;
        let denominator = (f2 + Self::F1 * Self::F1)
            * ((f2 + Self::F2 * Self::F2) * (f2 + Self::F3 * Self::F3)).sqrt()
            * (f2 + Self::F4 * Self::F4);
        numerator / denominator
    }

    /// The curve in decibels at `hz`.
    pub fn db(&self, hz: f64) -> f64 {
        amplitude_to_db(Self::response(hz)) + Self::OFFSET_DB
    }
}

impl Weighting for AWeighting {
    fn weight(&self, center_hz: f64) -> f64 {
        if center_hz <= 0.0 {
            return 0.0;
        }
        db_to_amplitude(self.db(center_hz))
    }
}
