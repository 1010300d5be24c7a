//! Top-level error type.

use strand_core::{BoxError, ShapeError, ValueError};
use strand_std::{LifecycleError, RegistryError, ReplayError};
use thiserror::Error;

/// Top-level error type for all Strand operations.
#[derive(Error, Debug)]
pub enum StrandError {
    /// A shape declaration was invalid.
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// A value tree was accessed incorrectly.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A stored path could not be replayed.
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),

    /// A registration was rejected.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An action or one of its hooks failed.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

impl From<BoxError> for StrandError {
    fn from(err: BoxError) -> Self {
        StrandError::Custom(err)
    }
}
