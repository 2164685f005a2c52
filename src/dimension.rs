//! Per-axis semantic descriptors.
//!
//! Every axis of an [`ArrayWithUnits`](crate::ArrayWithUnits) carries a
//! [`Dimension`]. The dimension decides how domain-specific selectors (time
//! ranges, frequency bands) map onto element indices and what the axis becomes
//! after slicing, reduction or concatenation.

use std::fmt::{self, Display};
use std::ops::Range;

use crate::frequency::{FrequencyBand, Scale};
use crate::time::{Rate, TimeSlice};
use crate::{ArrayError, ArrayResult};

/// What an array axis means.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    /// No semantics beyond the axis length.
    Identity,
    /// Elements are laid out in time at the given rate.
    Time(Rate),
    /// Element `i` is the `i`-th band of the scale.
    Frequency(Scale),
}

/// A selector expressed in an axis's own domain rather than in indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainRange {
    /// A span of time, for [`Dimension::Time`] axes.
    Time(TimeSlice),
    /// A frequency band, for [`Dimension::Frequency`] axes.
    Frequency(FrequencyBand),
}

impl Display for DomainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(slice) => write!(f, "time {slice}"),
            Self::Frequency(band) => write!(f, "frequency {band}"),
        }
    }
}

impl Dimension {
    /// The rate of a time axis.
    pub const fn rate(&self) -> Option<&Rate> {
        match self {
            Self::Time(rate) => Some(rate),
            _ => None,
        }
    }

    /// The scale of a frequency axis.
    pub const fn scale(&self) -> Option<&Scale> {
        match self {
            Self::Frequency(scale) => Some(scale),
            _ => None,
        }
    }

    /// True for [`Dimension::Identity`].
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// True for [`Dimension::Time`].
    pub const fn is_time(&self) -> bool {
        matches!(self, Self::Time(_))
    }

    /// True for [`Dimension::Frequency`].
    pub const fn is_frequency(&self) -> bool {
        matches!(self, Self::Frequency(_))
    }

    /// The axis length this dimension requires, if it fixes one.
    pub fn expected_len(&self) -> Option<usize> {
        self.scale().map(Scale::len)
    }

    /// Checks that an axis of `len` elements is consistent with this dimension.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] if a frequency axis length
    /// differs from its band count.
    pub fn validate(&self, axis: usize, len: usize) -> ArrayResult<()> {
        match self.expected_len() {
            Some(expected) if expected != len => Err(ArrayError::dimension_mismatch(format!(
                "axis {axis} has {len} elements but {self} expects {expected}"
            ))),
            _ => Ok(()),
        }
    }

    /// Resolves a domain selector against an axis of `len` elements.
    ///
    /// Returns the element range to keep and the dimension of the sliced axis.
    ///
    /// # Errors
    /// Returns [`ArrayError::DimensionMismatch`] if the selector's domain does
    /// not match this dimension (for example a time range on a frequency axis).
    pub fn select(&self, range: &DomainRange, len: usize) -> ArrayResult<(Range<usize>, Self)> {
        let indices = match (self, range) {
            (Self::Time(rate), DomainRange::Time(slice)) => slice.index_range(rate, len),
            (Self::Frequency(scale), DomainRange::Frequency(band)) => {
                scale.overlapping_range(band)
            }
            _ => {
                return Err(ArrayError::dimension_mismatch(format!(
                    "cannot select {range} on a {self} axis"
                )));
            }
        };
        let narrowed = self.narrow(indices.clone());
        Ok((indices, narrowed))
    }

    /// The dimension of this axis after keeping only elements `range`.
    ///
    /// Time axes keep their rate. Frequency axes keep the selected bands, or
    /// degrade to [`Dimension::Identity`] when nothing is left.
    pub fn narrow(&self, range: Range<usize>) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Time(rate) => Self::Time(*rate),
            Self::Frequency(scale) => scale.narrow(range).map_or(Self::Identity, Self::Frequency),
        }
    }

    /// What the axis becomes once collapsed by a reduction.
    pub const fn after_reduction(&self) -> Self {
        Self::Identity
    }

    /// The dimension of an axis formed by joining axes end to end.
    ///
    /// Identity axes join into an identity axis. Time axes must share a rate.
    /// Frequency axes join into a single scale when their scales are
    /// contiguous, and into an identity axis otherwise.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleRate`] for time axes with different
    /// rates, [`ArrayError::DimensionMismatch`] for mixed dimension kinds and
    /// [`ArrayError::InvalidParameter`] when `dims` is empty.
    pub fn concat(dims: &[&Self]) -> ArrayResult<Self> {
        let Some((first, rest)) = dims.split_first() else {
            return Err(ArrayError::invalid_parameter(
                "dims",
                "need at least one dimension to concatenate",
            ));
        };
        match first {
            Self::Identity => {
                if let Some(other) = rest.iter().find(|d| !d.is_identity()) {
                    return Err(ArrayError::dimension_mismatch(format!(
                        "cannot concatenate {first} with {other}"
                    )));
                }
                Ok(Self::Identity)
            }
            Self::Time(rate) => {
                for other in rest {
                    match other {
                        Self::Time(other_rate) if other_rate == rate => {}
                        Self::Time(other_rate) => {
                            return Err(ArrayError::incompatible_rate(rate, other_rate));
                        }
                        _ => {
                            return Err(ArrayError::dimension_mismatch(format!(
                                "cannot concatenate {first} with {other}"
                            )));
                        }
                    }
                }
                Ok(Self::Time(*rate))
            }
            Self::Frequency(_) => {
                let scales = dims
                    .iter()
                    .map(|d| {
                        d.scale().ok_or_else(|| {
                            ArrayError::dimension_mismatch(format!(
                                "cannot concatenate {first} with {d}"
                            ))
                        })
                    })
                    .collect::<ArrayResult<Vec<&Scale>>>()?;
                Ok(Scale::concatenate(&scales).map_or(Self::Identity, Self::Frequency))
            }
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::Time(rate) => write!(f, "Time({rate})"),
            Self::Frequency(scale) => write!(f, "Frequency({scale})"),
        }
    }
}

impl From<Rate> for Dimension {
    fn from(rate: Rate) -> Self {
        Self::Time(rate)
    }
}

impl From<Scale> for Dimension {
    fn from(scale: Scale) -> Self {
        Self::Frequency(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;

    fn cd_time() -> Dimension {
        Dimension::Time(Rate::from_sample_rate(44100).unwrap())
    }

    fn linear(n: usize) -> Scale {
        Scale::linear(FrequencyBand::new(0.0, 1000.0), n).unwrap()
    }

    #[test]
    fn test_validate_frequency_length() {
        let dim = Dimension::Frequency(linear(10));
        assert!(dim.validate(0, 10).is_ok());
        assert!(matches!(dim.validate(1, 9), Err(ArrayError::DimensionMismatch(_))));
        assert!(Dimension::Identity.validate(0, 3).is_ok());
        assert!(cd_time().validate(0, 12345).is_ok());
    }

    #[test]
    fn test_select_time_keeps_rate() {
        let slice = TimeSlice::new(Duration::seconds(1), Duration::seconds(2));
        let (range, dim) = cd_time()
            .select(&DomainRange::Time(slice), 441_000)
            .unwrap();
        assert_eq!(range, 44_100..132_300);
        assert_eq!(dim, cd_time());
    }

    #[test]
    fn test_select_frequency_narrows_scale() {
        let dim = Dimension::Frequency(linear(10));
        let (range, narrowed) = dim
            .select(&DomainRange::Frequency(FrequencyBand::new(150.0, 420.0)), 10)
            .unwrap();
        assert_eq!(range, 1..5);
        let scale = narrowed.scale().unwrap();
        assert_eq!(scale.len(), 4);
        assert_eq!(scale.start_hz(), 100.0);
        assert_eq!(scale.stop_hz(), 500.0);

        let (empty, degraded) = dim
            .select(&DomainRange::Frequency(FrequencyBand::new(2000.0, 3000.0)), 10)
            .unwrap();
        assert!(empty.is_empty());
        assert!(degraded.is_identity());
    }

    #[test]
    fn test_select_wrong_domain_fails() {
        let band = DomainRange::Frequency(FrequencyBand::new(0.0, 10.0));
        assert!(matches!(
            cd_time().select(&band, 100),
            Err(ArrayError::DimensionMismatch(_))
        ));
        let slice = DomainRange::Time(TimeSlice::all());
        assert!(Dimension::Identity.select(&slice, 100).is_err());
    }

    #[test]
    fn test_after_reduction_is_identity() {
        assert!(cd_time().after_reduction().is_identity());
        assert!(Dimension::Frequency(linear(4)).after_reduction().is_identity());
    }

    #[test]
    fn test_concat_rules() {
        let a = cd_time();
        let b = Dimension::Time(Rate::from_sample_rate(48000).unwrap());
        assert_eq!(Dimension::concat(&[&a, &a]).unwrap(), a);
        assert!(matches!(
            Dimension::concat(&[&a, &b]),
            Err(ArrayError::IncompatibleRate { .. })
        ));
        assert!(matches!(
            Dimension::concat(&[&a, &Dimension::Identity]),
            Err(ArrayError::DimensionMismatch(_))
        ));

        let scale = linear(10);
        let low = Dimension::Frequency(scale.narrow(0..3).unwrap());
        let high = Dimension::Frequency(scale.narrow(3..10).unwrap());
        assert_eq!(
            Dimension::concat(&[&low, &high]).unwrap(),
            Dimension::Frequency(scale)
        );
        assert!(Dimension::concat(&[&high, &low]).unwrap().is_identity());
        assert!(Dimension::concat(&[]).is_err());
    }
}
