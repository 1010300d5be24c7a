//! # strand - Structural Discovery over Explicit Shapes
//!
//! `strand` finds the places inside a composite type where a designated
//! capability type is embedded, collects the lifecycle hooks (`Before`,
//! `After`, `Panic`, `Finally`) declared anywhere in its struct tree, and
//! stores each finding as an index path that can be replayed against live
//! instances.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strand::prelude::*;
//!
//! let controller = Shape::structure("web.Controller").build()?;
//! let hotels = Shape::structure("app.Hotels")
//!     .embed(&Shape::pointer_to(&controller))
//!     .method("Index", index)
//!     .build()?;
//!
//! let mut builder = RegistryBuilder::new(Shape::pointer_to(&controller), Module::new("app"));
//! builder.register_primary(hotels, vec![MethodType::new("Index")])?;
//! let registry = builder.build();
//!
//! let hotels = registry.lookup("hotels").unwrap();
//! Lifecycle::new(hotels).run(&mut instance, "index", &[])?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;

pub use error::StrandError;

pub use strand_core::{
    // Annotations
    Annotation,
    Annotations,
    // Errors
    BoxError,
    // Shapes
    Field,
    MethodDecl,
    MethodFn,
    // Values
    Pointer,
    Receiver,
    ReceiverKind,
    Scalar,
    ScalarKind,
    Shape,
    ShapeBuilder,
    ShapeError,
    ShapeKind,
    ShapeRef,
    StructValue,
    Value,
    ValueError,
};

pub use strand_std::{
    // Discovery
    CapabilityPath,
    FieldPath,
    HookKind,
    HookSet,
    // Lifecycle
    Lifecycle,
    LifecycleError,
    // Registry
    MethodArg,
    MethodType,
    Module,
    Registry,
    RegistryBuilder,
    RegistryError,
    ReplayError,
    TypeDescriptor,
    discover_hooks,
    find_capabilities,
};

/// Discovery walks.
pub mod discovery {
    pub use strand_std::discovery::{
        capability::{CapabilityPath, find_capabilities},
        hooks::{HookKind, HookSet, discover_hooks},
    };
}

/// Testing utilities.
pub mod testing {
    pub use strand_std::testing::CallRecorder;
}

/// Prelude module - common imports for Strand.
///
/// # Usage
///
/// ```rust,ignore
/// use strand::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Registry
        Lifecycle,
        MethodType,
        Module,
        // Shapes
        Receiver,
        RegistryBuilder,
        Shape,
        ShapeRef,
        StrandError,
        // Values
        Value,
    };
}

#[cfg(feature = "inventory")]
pub use strand_std::{Registration, inventory};
