//! Error types for shape declaration and value access.
//!
//! - [`ShapeError`] - A shape declaration is inconsistent
//! - [`ValueError`] - A value tree was accessed in a way its shape forbids

use thiserror::Error;

/// A boxed error type returned by user-supplied method callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while declaring a shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Two fields of the same struct share a name.
    #[error("duplicate field `{field}` on shape `{shape}`")]
    DuplicateField {
        /// Qualified name of the shape being declared.
        shape: String,
        /// The repeated field name.
        field: String,
    },

    /// Two methods of the same shape share a name, regardless of receiver form.
    #[error("duplicate method `{method}` on shape `{shape}`")]
    DuplicateMethod {
        /// Qualified name of the shape being declared.
        shape: String,
        /// The repeated method name.
        method: String,
    },

    /// A shape was declared without a name.
    #[error("shape name must not be empty")]
    EmptyName,
}

/// Errors raised while reading or writing a value tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value is not a struct, so it has no fields.
    #[error("expected a struct value, found {found}")]
    NotAStruct {
        /// Kind of the value that was found instead.
        found: &'static str,
    },

    /// A field index is past the end of the struct.
    #[error("field index {index} out of range for `{shape}` ({len} fields)")]
    IndexOutOfRange {
        /// Qualified name of the struct shape.
        shape: String,
        /// The requested index.
        index: usize,
        /// Number of fields the struct has.
        len: usize,
    },

    /// No field with the given name exists.
    #[error("no field named `{field}` on `{shape}`")]
    NoSuchField {
        /// Qualified name of the struct shape.
        shape: String,
        /// The requested field name.
        field: String,
    },

    /// A nil pointer was dereferenced.
    #[error("nil pointer dereference")]
    NilPointer,

    /// A pointee lock was poisoned by a panic in an earlier call.
    #[error("pointer target poisoned by an earlier panic")]
    Poisoned,
}
