//! Error types for shana-data operations.

use thiserror::Error;

/// Result type alias for shana-data operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur while decoding, parsing or patching data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The destination cannot be written to.
    #[error("cannot decode to an invalid value")]
    InvalidDestination,

    /// Source and destination shapes are incompatible.
    #[error("cannot decode a value of type {target} from {found}")]
    TypeMismatch {
        /// The destination type.
        target: &'static str,
        /// The type name of the source value.
        found: &'static str,
    },

    /// A number does not fit in the destination type.
    #[error("cannot decode value of type {target} from {value} due to overflow")]
    Overflow {
        /// The destination type.
        target: &'static str,
        /// Textual rendering of the rejected number.
        value: String,
    },

    /// A float with a fractional part was decoded into an integer.
    #[error("cannot decode value of type {target} from a float number {value}")]
    NotIntegral {
        /// The destination type.
        target: &'static str,
        /// The rejected float.
        value: f64,
    },

    /// A sequence is longer than the fixed-length destination.
    #[error("cannot decode value of type {target} due to no enough room to store {len} element(s)")]
    NoRoom {
        /// The destination type.
        target: &'static str,
        /// Length of the source sequence.
        len: usize,
    },

    /// A duration literal could not be parsed.
    #[error("invalid duration `{input}`: {reason}")]
    InvalidDuration {
        /// The rejected literal.
        input: String,
        /// What went wrong.
        reason: &'static str,
    },

    /// A patch update query resolved to nothing.
    #[error("fail to apply patch due to invalid query `{query}` when updating")]
    InvalidQuery {
        /// The update query.
        query: String,
    },

    /// A patch update query resolved to something other than an object.
    #[error("fail to apply patch due to query `{query}` pointing to a value in unsupported type {found}")]
    UnsupportedType {
        /// The update query.
        query: String,
        /// The type name of the resolved value.
        found: &'static str,
    },

    /// Error reported by caller-supplied code, e.g. a registry hook.
    #[error("{message}")]
    Custom {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DataError {
    /// Create a type mismatch error for destination `T`.
    #[inline]
    pub fn type_mismatch<T: ?Sized>(found: &'static str) -> Self {
        DataError::TypeMismatch {
            target: std::any::type_name::<T>(),
            found,
        }
    }

    /// Create an overflow error for destination `T`.
    #[inline]
    pub fn overflow<T: ?Sized>(value: impl ToString) -> Self {
        DataError::Overflow {
            target: std::any::type_name::<T>(),
            value: value.to_string(),
        }
    }

    /// Create a non-integral float error for destination `T`.
    #[inline]
    pub fn not_integral<T: ?Sized>(value: f64) -> Self {
        DataError::NotIntegral {
            target: std::any::type_name::<T>(),
            value,
        }
    }

    /// Create a "no room" error for fixed-length destination `T`.
    #[inline]
    pub fn no_room<T: ?Sized>(len: usize) -> Self {
        DataError::NoRoom {
            target: std::any::type_name::<T>(),
            len,
        }
    }

    /// Create an invalid duration error.
    #[inline]
    pub fn invalid_duration(input: impl Into<String>, reason: &'static str) -> Self {
        DataError::InvalidDuration {
            input: input.into(),
            reason,
        }
    }

    /// Create an invalid query error.
    #[inline]
    pub fn invalid_query(query: impl Into<String>) -> Self {
        DataError::InvalidQuery {
            query: query.into(),
        }
    }

    /// Create an unsupported type error.
    #[inline]
    pub fn unsupported_type(query: impl Into<String>, found: &'static str) -> Self {
        DataError::UnsupportedType {
            query: query.into(),
            found,
        }
    }

    /// Create a custom error.
    #[inline]
    pub fn custom(message: impl Into<String>) -> Self {
        DataError::Custom {
            message: message.into(),
        }
    }

    /// Returns true for the numeric overflow/non-integral class of errors.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataError::Overflow { .. } | DataError::NotIntegral { .. }
        )
    }
}
