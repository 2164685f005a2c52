// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # audio_dims
//!
//! Dimension-aware arrays for audio and time-frequency data, plus a
//! push-driven decode node that turns a byte stream into sample chunks.
//!
//! Every axis of an [`ArrayWithUnits`] carries a [`Dimension`]: a Time axis
//! knows its [`Rate`], a Frequency axis knows its [`Scale`] of bands, and an
//! Identity axis is a plain index. Slicing by [`TimeSlice`] or
//! [`FrequencyBand`], reductions, broadcasting arithmetic and concatenation
//! all keep those descriptors consistent with the data.
//!
//! Time is exact: a [`Duration`] is an integer count of ticks, with
//! [`TICKS_PER_SECOND`] chosen so the sample period of every standard audio
//! rate is a whole number of ticks.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! audio_dims = "0.1"
//! ```
//!
//! ## Features
//!
//! - `streaming` (default): the [`streaming`] module and its WAV decoder
//!   (using the `hound` crate)
//! - `serialization`: `serde` derives for rates, durations, bands, scales and
//!   stream configuration
//!
//! ## Error Handling
//!
//! Array operations return [`ArrayResult`]; streaming operations return
//! `streaming::StreamResult`.
//!
//! ```rust
//! use audio_dims::{ArrayError, Rate, Duration};
//!
//! match Rate::constant(Duration::from_ticks(0)) {
//!     Err(ArrayError::InvalidRate(msg)) => eprintln!("Invalid rate: {msg}"),
//!     Err(other) => eprintln!("Other error: {other}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_dims::{AudioSampleRate, Duration, TimeSlice, sine_wave};
//!
//! let audio = sine_wave(440.0f32, Duration::seconds(2), AudioSampleRate::Hz44100, 1.0).unwrap();
//! let tail = audio
//!     .slice_time(TimeSlice::starting_at(Duration::milliseconds(1500)))
//!     .unwrap();
//! assert_eq!(tail.len(), 22050);
//! ```
//!
//! ```rust
//! use audio_dims::{ArrayWithUnits, Dimension, FrequencyBand, Reduction, Scale};
//! use ndarray::Array1;
//!
//! let scale = Scale::linear(FrequencyBand::new(0.0, 8000.0), 16).unwrap();
//! let spectrum = ArrayWithUnits::new(Array1::<f64>::ones(16), vec![Dimension::Frequency(scale)]).unwrap();
//!
//! let low = spectrum.slice(&[FrequencyBand::new(0.0, 1000.0).into()]).unwrap();
//! assert_eq!(low.len(), 2);
//!
//! let total = spectrum.reduce(Reduction::Sum, Some(0)).unwrap();
//! assert!(total.dims()[0].is_identity());
//! ```
//!
//! ## License
//!
//! MIT License

use std::fmt::{Debug, Display};

use num_traits::{Float, FloatConst, FromPrimitive, NumCast};

mod error;

pub mod audio;
pub mod dimension;
pub mod frequency;
pub mod repr;
pub mod selector;
#[cfg(feature = "streaming")]
pub mod streaming;
pub mod time;
pub mod utils;

pub use crate::audio::AudioSamples;
pub use crate::dimension::{Dimension, DomainRange};
pub use crate::error::{ArrayError, ArrayResult};
pub use crate::frequency::{AWeighting, FrequencyBand, Scale, ScaleKind, Weighting};
pub use crate::repr::{ArrayWithUnits, BinaryOp, Reduction};
pub use crate::selector::AxisSelector;
pub use crate::time::{AudioSampleRate, Duration, Rate, TICKS_PER_SECOND, TimeSlice, TimeUnit};
pub use crate::utils::{amplitude_to_db, db_to_amplitude, sine_wave};

/// Marker trait for real floating-point types (f32, f64)
pub trait RealFloat:
    Float + FloatConst + FromPrimitive + NumCast + Debug + Display + Send + Sync + 'static
{
}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Casts a numeric value into the target floating-point type `F`.
///
/// The main purpose is to abstract over floating-point precision in generic
/// code where `F: RealFloat` may be either `f32` or `f64`. A value the target
/// cannot represent becomes NaN.
///
/// # Examples
/// ```
/// use audio_dims::to_precision;
///
/// let value_f32: f32 = to_precision(42i32);
/// assert_eq!(value_f32, 42.0);
///
/// let value_f64: f64 = to_precision(0.5f32);
/// assert_eq!(value_f64, 0.5);
/// ```
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat,
    T: NumCast,
{
    NumCast::from(value).unwrap_or_else(F::nan)
}
