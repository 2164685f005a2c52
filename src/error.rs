//! Error types and result utilities for dimension-aware array operations.

use thiserror::Error;

/// Convenience type alias for results that may contain an [`ArrayError`].
pub type ArrayResult<T> = Result<T, ArrayError>;

/// Error types that can occur while building, slicing, combining or reducing
/// dimension-aware arrays and their axis descriptors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// The declared dimensions disagree with the buffer they describe.
    ///
    /// Raised when the number of dimensions differs from the array rank, when a
    /// dimension's expected length differs from its axis length, or when a
    /// selector does not fit the axis it is applied to.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// An integer index fell outside the axis it was applied to.
    #[error("Index {index} is out of bounds for axis {axis} with length {len}")]
    IndexOutOfBounds {
        /// Axis the index was applied to.
        axis: usize,
        /// The offending index, as supplied.
        index: isize,
        /// Length of the axis.
        len: usize,
    },

    /// More than one ellipsis appeared in a single slice expression.
    #[error("Ambiguous slice: at most one ellipsis is allowed, found {0}")]
    AmbiguousSlice(usize),

    /// A rate was constructed with a non-positive step or span.
    #[error("Invalid rate error: {0}")]
    InvalidRate(String),

    /// A frequency scale was constructed from invalid parameters.
    #[error("Invalid scale error: {0}")]
    InvalidScale(String),

    /// Two operands could not be broadcast against each other.
    #[error("Broadcast error: {0}")]
    Broadcast(String),

    /// Time axes with different rates were combined.
    #[error("Incompatible rate: expected {expected}, got {actual}")]
    IncompatibleRate {
        /// The rate of the first operand.
        expected: String,
        /// The rate that disagreed with it.
        actual: String,
    },

    /// Error that occurs when invalid parameters are provided to an operation.
    ///
    /// This includes reductions over a missing axis or over an empty axis.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),
}

impl ArrayError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(details: impl Into<String>) -> Self {
        Self::DimensionMismatch(details.into())
    }

    /// Create a broadcast error.
    pub fn broadcast(details: impl Into<String>) -> Self {
        Self::Broadcast(details.into())
    }

    /// Create an invalid parameter error naming the parameter.
    pub fn invalid_parameter(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidParameter(format!("{name}: {reason}"))
    }

    /// Create an incompatible rate error from the two disagreeing rates.
    pub fn incompatible_rate(expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> Self {
        Self::IncompatibleRate {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// True for shape, length and selector failures.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch(_) | Self::IndexOutOfBounds { .. } | Self::AmbiguousSlice(_)
        )
    }

    /// True for invalid rate or scale parameters.
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::InvalidRate(_) | Self::InvalidScale(_))
    }
}
