//! Exact time arithmetic: durations, rates and time slices.

pub mod duration;
pub mod rate;
pub mod slice;

pub use duration::{Duration, TICKS_PER_SECOND, TimeUnit};
pub use rate::{AudioSampleRate, Rate};
pub use slice::TimeSlice;
