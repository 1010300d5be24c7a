//! # strand-std
//!
//! Discovery, replay and registration for the Strand toolkit.
//!
//! This crate provides:
//! - **Capability discovery**: [`find_capabilities`] locates every embedded
//!   occurrence of a designated capability shape
//! - **Hook discovery**: [`discover_hooks`] collects `Before`, `After`,
//!   `Panic` and `Finally` methods across a shape's struct tree
//! - **Replay**: [`FieldPath`] resolves a stored path against a live value and
//!   calls the stored method
//! - **Registry**: [`RegistryBuilder`] and the frozen [`Registry`]
//! - **Lifecycle**: [`Lifecycle`] runs an action between its hooks
//! - **Testing**: [`testing::CallRecorder`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use strand_core;

// Modules
pub mod discovery;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod replay;
pub mod testing;

pub use discovery::{
    capability::{CapabilityPath, find_capabilities},
    hooks::{HookKind, HookSet, discover_hooks},
};
pub use error::{LifecycleError, RegistryError, ReplayError};
pub use lifecycle::Lifecycle;
pub use registry::{MethodArg, MethodType, Module, Registry, RegistryBuilder, TypeDescriptor};
pub use replay::FieldPath;

#[cfg(feature = "inventory")]
pub use inventory;
#[cfg(feature = "inventory")]
pub use registry::Registration;
