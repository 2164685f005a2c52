//! Error types for streaming operations.

use crate::ArrayError;

/// Streaming-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// A decoded chunk could not be wrapped as a dimension-aware array.
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),

    /// The byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffered bytes never resolved to a header the decoder understands.
    #[error("Unrecognized stream format: {0}")]
    UnrecognizedStreamFormat(String),

    /// The decoder rejected the sample data after the header.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An operation was attempted in a state that does not allow it.
    #[error("Cannot {operation} while the stream is {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the stream was in.
        state: String,
    },
}

impl StreamError {
    /// Create an unrecognized stream format error.
    pub fn unrecognized(details: impl Into<String>) -> Self {
        Self::UnrecognizedStreamFormat(details.into())
    }

    /// Create an invalid state error.
    pub fn invalid_state(operation: &'static str, state: impl std::fmt::Display) -> Self {
        Self::InvalidState {
            operation,
            state: state.to_string(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors leave the stream usable: calling an operation in the
    /// wrong state, or an interrupted read.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidState { .. } => true,
            Self::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// Check if this is a fatal error that should terminate the stream
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

impl Clone for StreamError {
    fn clone(&self) -> Self {
        match self {
            Self::Array(err) => Self::Array(err.clone()),
            Self::Io(err) => Self::Io(std::io::Error::new(err.kind(), err.to_string())),
            Self::UnrecognizedStreamFormat(msg) => Self::UnrecognizedStreamFormat(msg.clone()),
            Self::Decode(msg) => Self::Decode(msg.clone()),
            Self::InvalidState { operation, state } => Self::InvalidState {
                operation,
                state: state.clone(),
            },
        }
    }
}

/// Result type for streaming operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Helper macro for creating stream errors
#[macro_export]
macro_rules! stream_error {
    ($kind:ident, $($args:tt)*) => {
        $crate::streaming::StreamError::$kind(format!($($args)*))
    };
}
