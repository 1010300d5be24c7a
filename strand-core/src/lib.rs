//! # strand-core
//!
//! Shape and value model for the Strand structural discovery toolkit.
//!
//! Rust has no runtime reflection, so Strand describes composite types with an
//! explicit model that discovery can walk and replay can navigate. This crate
//! has minimal dependencies and is meant to be imported by code that only
//! declares shapes, without pulling in the discovery machinery of `strand-std`.
//!
//! # Two Views of a Type
//!
//! ## Declared Shape ([`Shape`])
//!
//! The structural description of a type: its qualified name, its kind
//! (struct, pointer, scalar, interface), its fields in declaration order, and
//! the methods declared directly on it.
//!
//! - **Immutable**: shapes are built once through [`ShapeBuilder`] and shared
//!   as [`ShapeRef`]
//! - **Acyclic**: a shape can only reference shapes that already exist, so
//!   every walk over declared fields terminates
//! - **Owner-aware**: a method belongs to the shape that declares it; nothing
//!   is promoted from embedded fields
//!
//! ## Live Instance ([`Value`])
//!
//! A dynamic value tree mirroring a shape: struct values hold their fields
//! inline, and pointers are shared, lockable cells.
//!
//! # Error Types
//!
//! - [`ShapeError`] - Invalid shape declarations
//! - [`ValueError`] - Invalid access to a value tree

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod annotation;
mod error;
mod shape;
mod value;

// Re-exports
pub use annotation::{Annotation, Annotations};
pub use error::{BoxError, ShapeError, ValueError};
pub use shape::{
    Field, MethodDecl, MethodFn, ReceiverKind, ScalarKind, Shape, ShapeBuilder, ShapeKind,
    ShapeRef,
};
pub use value::{Pointer, Receiver, Scalar, StructValue, Value};
