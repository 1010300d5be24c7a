//! Error types for replay, registration and lifecycle runs.
//!
//! - [`ReplayError`] - A stored path could not be replayed against a value
//! - [`RegistryError`] - A registration was rejected
//! - [`LifecycleError`] - An action or one of its hooks failed

use strand_core::{BoxError, ValueError};
use thiserror::Error;

/// Errors from replaying a [`FieldPath`](crate::FieldPath) against a value.
///
/// A path replayed against an instance of the shape it was discovered from
/// never fails to resolve; every variant except [`ReplayError::Call`] means a
/// path was paired with the wrong instance.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Navigation hit a value that cannot be indexed.
    #[error("cannot select field {index} at depth {depth}: {source}")]
    Navigate {
        /// Position in the index path.
        depth: usize,
        /// The field index being selected.
        index: usize,
        /// Why the selection failed.
        #[source]
        source: ValueError,
    },

    /// The resolved receiver could not be prepared.
    #[error("cannot prepare receiver for `{method}`: {source}")]
    Receiver {
        /// Method being invoked.
        method: String,
        /// Why the receiver could not be prepared.
        #[source]
        source: ValueError,
    },

    /// The method itself returned an error.
    #[error("`{method}` failed: {source}")]
    Call {
        /// Method that failed.
        method: String,
        /// The error it returned.
        #[source]
        source: BoxError,
    },

    /// No method with this name is declared on the type.
    #[error("no method `{method}` declared on `{shape}`")]
    UnknownMethod {
        /// Qualified name of the shape.
        shape: String,
        /// The requested method name.
        method: String,
    },

    /// The type has no embedded capability field.
    #[error("`{shape}` embeds no capability")]
    NoCapability {
        /// Qualified name of the shape.
        shape: String,
    },
}

/// Errors from registering a type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type is already registered under this logical name.
    #[error("type already registered as `{0}`")]
    Duplicate(String),
}

/// Errors from running an action between its lifecycle hooks.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A hook or the action could not be replayed or returned an error.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// A hook or the action panicked.
    #[error("`{method}` panicked: {message}")]
    Panicked {
        /// Method that panicked.
        method: String,
        /// The panic payload, if it was a string.
        message: String,
    },
}
