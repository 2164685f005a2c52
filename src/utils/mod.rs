//! Utility functions for audio processing.
//!
//! - [`audio_math`] - Level conversions between linear gain and decibels
//! - [`generation`] - Test signal generation

pub mod audio_math;
pub mod generation;

pub use audio_math::{amplitude_to_db, db_to_amplitude, db_to_power, power_to_db};
pub use generation::sine_wave;
