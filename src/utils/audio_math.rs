//! Level conversions between linear gain and decibels.
//!
//! ```rust
//! use audio_dims::utils::audio_math::{amplitude_to_db, db_to_amplitude};
//!
//! let db = amplitude_to_db(0.1f64); // -20 dB
//! let amp = db_to_amplitude(-20.0f64); // 0.1
//! ```

use crate::{RealFloat, to_precision};

/// Floor returned for non-positive inputs so callers never see `-inf`.
pub const DB_FLOOR: f64 = -80.0;

/// Converts a linear amplitude ratio to decibels, `20 * log10(amplitude)`.
///
/// Zero and negative amplitudes map to [`DB_FLOOR`].
pub fn amplitude_to_db<F: RealFloat>(amplitude: F) -> F {
    if amplitude > F::zero() {
        to_precision::<F, _>(20.0) * amplitude.log10()
    } else {
        to_precision::<F, _>(DB_FLOOR)
    }
}

/// Converts decibels to a linear amplitude ratio, `10^(db / 20)`.
pub fn db_to_amplitude<F: RealFloat>(db: F) -> F {
    to_precision::<F, _>(10.0).powf(db / to_precision::<F, _>(20.0))
}

/// Converts a power ratio to decibels, `10 * log10(power)`.
///
/// Zero and negative powers map to [`DB_FLOOR`].
pub fn power_to_db<F: RealFloat>(power: F) -> F {
    if power > F::zero() {
        to_precision::<F, _>(10.0) * power.log10()
    } else {
        to_precision::<F, _>(DB_FLOOR)
    }
}

/// Converts decibels to a power ratio, `10^(db / 10)`.
pub fn db_to_power<F: RealFloat>(db: F) -> F {
    to_precision::<F, _>(10.0).powf(db / to_precision::<F, _>(10.0))
}
