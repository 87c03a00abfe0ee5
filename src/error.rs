//! Error types for collection operations.
//!
//! Every fallible operation returns [`CollectionError`]. A failed call never
//! touches the receiver: the instance it was called on stays valid and
//! unchanged.

use thiserror::Error;

/// Represents errors raised by [`Collection`](crate::Collection) and
/// [`DataSet`](crate::DataSet) operations.
///
/// # Examples
///
/// ```rust
/// use keyed_sets::{Collection, CollectionError};
///
/// let error = Collection::from_string("a,b", "").unwrap_err();
/// assert!(matches!(error, CollectionError::InvalidArgument { .. }));
/// assert_eq!(
///     error.to_string(),
///     "from_string: separator must not be empty"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// An argument was outside the accepted domain (for example an empty
    /// separator).
    #[error("{operation}: {message}")]
    InvalidArgument {
        /// The operation that rejected the argument.
        operation: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A value did not have the shape the operation requires.
    #[error("{operation}: {message}")]
    Type {
        /// The operation that rejected the value.
        operation: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// JSON encoding nested deeper than the configured limit.
    #[error("json_encode: maximum depth {limit} exceeded (found {found})")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
        /// The depth of the value that was encoded.
        found: usize,
    },

    /// The serializer itself failed.
    #[error("json_encode: {0}")]
    Json(String),
}

impl CollectionError {
    pub(crate) fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn type_error(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Type {
            operation,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
