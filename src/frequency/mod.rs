//! Frequency bands, band scales and weighting curves.

pub mod band;
pub mod scale;
pub mod weighting;

pub use band::FrequencyBand;
pub use scale::{Scale, ScaleKind};
pub use weighting::{AWeighting, Weighting};
