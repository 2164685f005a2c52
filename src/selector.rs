//! Per-axis selectors for [`ArrayWithUnits::slice`](crate::ArrayWithUnits::slice).
//!
//! ```rust
//! use audio_dims::{AxisSelector, Duration, FrequencyBand, TimeSlice};
//!
//! let selectors = [
//!     AxisSelector::Ellipsis,
//!     FrequencyBand::new(1000.0, 5000.0).into(),
//! ];
//! let first_second: AxisSelector = TimeSlice::new(Duration::ZERO, Duration::seconds(1)).into();
//! # let _ = (selectors, first_second);
//! ```

use std::fmt::{self, Display};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::dimension::DomainRange;
use crate::frequency::FrequencyBand;
use crate::time::TimeSlice;

/// How one axis is selected.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSelector {
    /// A single element; negative values count from the end. The axis is
    /// dropped from the result.
    Index(isize),
    /// A contiguous range of elements; negative bounds count from the end and
    /// out-of-range bounds are clamped.
    Range {
        /// First element, inclusive. `None` means the start of the axis.
        start: Option<isize>,
        /// Last element, exclusive. `None` means the end of the axis.
        end: Option<isize>,
    },
    /// The whole axis.
    Full,
    /// Stands for as many [`AxisSelector::Full`] selectors as needed to cover
    /// every axis. At most one may appear in a slice expression.
    Ellipsis,
    /// An explicit list of elements, in the given order. The axis degrades to
    /// [`Dimension::Identity`](crate::Dimension::Identity).
    List(Vec<usize>),
    /// A range in the axis's own domain, resolved by its dimension.
    Domain(DomainRange),
}

impl AxisSelector {
    /// Resolves a [`AxisSelector::Range`] against an axis of `len` elements.
    pub(crate) fn clamp_range(start: Option<isize>, end: Option<isize>, len: usize) -> Range<usize> {
        let len_i = len as isize;
        let resolve = |bound: isize| {
            let bound = if bound < 0 { bound + len_i } else { bound };
            bound.clamp(0, len_i) as usize
        };
        let start = start.map_or(0, resolve);
        let end = end.map_or(len, resolve);
        start..end.max(start)
    }

    /// Resolves a possibly negative index against an axis of `len` elements.
    pub(crate) fn resolve_index(index: isize, len: usize) -> Option<usize> {
        let resolved = if index < 0 { index + len as isize } else { index };
        usize::try_from(resolved).ok().filter(|&i| i < len)
    }
}

impl Display for AxisSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Range { start, end } => {
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                write!(f, "..")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                Ok(())
            }
            Self::Full => write!(f, ":"),
            Self::Ellipsis => write!(f, "..."),
            Self::List(indices) => write!(f, "{indices:?}"),
            Self::Domain(range) => write!(f, "{range}"),
        }
    }
}

impl From<isize> for AxisSelector {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}

impl From<Range<isize>> for AxisSelector {
    fn from(range: Range<isize>) -> Self {
        Self::Range {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

impl From<RangeFrom<isize>> for AxisSelector {
    fn from(range: RangeFrom<isize>) -> Self {
        Self::Range {
            start: Some(range.start),
            end: None,
        }
    }
}

impl From<RangeTo<isize>> for AxisSelector {
    fn from(range: RangeTo<isize>) -> Self {
        Self::Range {
            start: None,
            end: Some(range.end),
        }
    }
}

impl From<RangeFull> for AxisSelector {
    fn from(_: RangeFull) -> Self {
        Self::Full
    }
}

impl From<Vec<usize>> for AxisSelector {
    fn from(indices: Vec<usize>) -> Self {
        Self::List(indices)
    }
}

impl From<TimeSlice> for AxisSelector {
    fn from(slice: TimeSlice) -> Self {
        Self::Domain(DomainRange::Time(slice))
    }
}

impl From<FrequencyBand> for AxisSelector {
    fn from(band: FrequencyBand) -> Self {
        Self::Domain(DomainRange::Frequency(band))
    }
}
