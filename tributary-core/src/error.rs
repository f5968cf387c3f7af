// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the Tributary streaming library
//!
//! A single root [`TributaryError`] covers protocol violations detected at the call
//! site (negative demand, inserting without a subscriber), faults raised by
//! subscribers during delivery, and faults raised by combine functions.
//!
//! # Examples
//!
//! ```
//! use tributary_core::{Result, TributaryError};
//!
//! fn request(n: i64) -> Result<u64> {
//!     if n < 0 {
//!         return Err(TributaryError::invalid_demand(n));
//!     }
//!     Ok(n as u64)
//! }
//!
//! assert!(request(-1).unwrap_err().is_protocol_violation());
//! ```

use std::error::Error;
use std::sync::Arc;

// Shared so terminal errors can be replayed to a subscriber without losing their source.
type SharedError = Arc<dyn Error + Send + Sync>;

/// Root error type for all Tributary operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum TributaryError {
    /// Demand must be non-negative
    ///
    /// Returned synchronously by `request(n)` when `n < 0`. The credit counter is
    /// left untouched.
    #[error("Invalid demand {requested}: n >= 0 required")]
    InvalidDemand {
        /// The rejected request count
        requested: i64,
    },

    /// A value was inserted into a source that nobody has subscribed to
    #[error("No active subscription to receive values")]
    NotSubscribed,

    /// The combine function of a combine-latest operator failed
    ///
    /// Wraps whatever the combine function raised, including arity and type
    /// mismatches detected by the fixed-arity entry points.
    #[error("Combine function failed: {0}")]
    CombineError(#[source] SharedError),

    /// A fixed-arity combine function was handed the wrong number of values
    #[error("Combine function expects {expected} arguments, received {actual}")]
    ArityMismatch {
        /// Number of arguments the function declares
        expected: usize,
        /// Number of values actually available
        actual: usize,
    },

    /// A combination slot held a value of an unexpected type
    #[error("Slot {index} does not hold a value of type {expected}")]
    TypeMismatch {
        /// Source index of the offending slot
        index: usize,
        /// Name of the type the combine function expects
        expected: &'static str,
    },

    /// Stream processing encountered an error
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Custom error from user code, typically a subscriber's `on_next`
    #[error("User error: {0}")]
    UserError(#[source] SharedError),
}

impl TributaryError {
    /// Create an invalid demand error for the rejected count
    #[must_use]
    pub const fn invalid_demand(requested: i64) -> Self {
        Self::InvalidDemand { requested }
    }

    /// Create an arity mismatch error
    #[must_use]
    pub const fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Create a type mismatch error for the slot at `index`
    #[must_use]
    pub const fn type_mismatch(index: usize, expected: &'static str) -> Self {
        Self::TypeMismatch { index, expected }
    }

    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a fault raised by a combine function
    pub fn combine_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::CombineError(Arc::new(error))
    }

    /// Wrap a user error
    pub fn user_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Check if this error was raised synchronously because a caller broke the
    /// handshake protocol
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::InvalidDemand { .. } | Self::NotSubscribed)
    }

    /// Check if this error came out of a combine function
    #[must_use]
    pub const fn is_combine_error(&self) -> bool {
        matches!(self, Self::CombineError(_))
    }
}

/// Specialized Result type for Tributary operations
pub type Result<T> = std::result::Result<T, TributaryError>;

/// Conversion of any standard error into a [`TributaryError::UserError`]
///
/// Handy inside `Subscriber::on_next`, where faults must be reported as a
/// `TributaryError`.
pub trait IntoTributaryError {
    /// Wrap this error as a user error
    fn into_tributary(self) -> TributaryError;
}

impl<E: Error + Send + Sync + 'static> IntoTributaryError for E {
    fn into_tributary(self) -> TributaryError {
        TributaryError::user_error(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// User errors become a [`TributaryError::StreamProcessingError`] carrying the
    /// context and the original message. Other variants pass through unchanged.
    ///
    /// # Errors
    /// Returns `Err(TributaryError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TributaryError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|error| match error.into() {
            TributaryError::UserError(inner) => TributaryError::StreamProcessingError {
                context: format!("{}: {inner}", context.into()),
            },
            other => other,
        })
    }
}
