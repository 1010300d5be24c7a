//! # Live Values
//!
//! [`Value`] is a dynamic instance of a [`Shape`]. Struct values hold their
//! fields inline, in declaration order, so a field index from a shape selects
//! the same field in every value of that shape.
//!
//! Pointers are shared cells ([`Pointer`]); cloning a pointer value copies the
//! reference, not the pointee.

use crate::{
    error::ValueError,
    shape::{ScalarKind, Shape, ShapeKind, ShapeRef},
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
}

/// A struct instance.
#[derive(Debug, Clone)]
pub struct StructValue {
    shape: ShapeRef,
    fields: Vec<Value>,
}

impl StructValue {
    /// Shape this value is an instance of.
    pub fn shape(&self) -> &ShapeRef {
        &self.shape
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Field by index.
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Mutable field by index.
    pub fn field_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.fields.get_mut(index)
    }

    /// Mutable field by index, reporting the struct's arity when out of range.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut Value, ValueError> {
        let len = self.fields.len();
        if index >= len {
            return Err(ValueError::IndexOutOfRange {
                shape: self.shape.name().to_string(),
                index,
                len,
            });
        }
        Ok(&mut self.fields[index])
    }

    /// Field by declared name.
    pub fn get(&self, name: &str) -> Result<&Value, ValueError> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Mutable field by declared name.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value, ValueError> {
        let index = self.index_of(name)?;
        Ok(&mut self.fields[index])
    }

    /// Replace a field by declared name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ValueError> {
        *self.get_mut(name)? = value.into();
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, ValueError> {
        self.shape
            .fields()
            .and_then(|fields| fields.iter().position(|f| f.name() == name))
            .ok_or_else(|| ValueError::NoSuchField {
                shape: self.shape.name().to_string(),
                field: name.to_string(),
            })
    }
}

/// A non-nil pointer: a shared, lockable cell holding the pointee.
#[derive(Debug, Clone)]
pub struct Pointer(Arc<RwLock<Value>>);

impl Pointer {
    /// Allocate a new pointee.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Read access to the pointee.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Value>, ValueError> {
        self.0.read().map_err(|_| ValueError::Poisoned)
    }

    /// Write access to the pointee.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Value>, ValueError> {
        self.0.write().map_err(|_| ValueError::Poisoned)
    }

    /// Whether two pointers share a pointee.
    pub fn ptr_eq(&self, other: &Pointer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A dynamic value.
#[derive(Debug, Clone)]
pub enum Value {
    /// A nil pointer or nil interface.
    Nil,
    /// A primitive.
    Scalar(Scalar),
    /// A struct held inline.
    Struct(StructValue),
    /// A non-nil pointer.
    Pointer(Pointer),
}

impl Value {
    /// The zero value of a shape: zeroed scalars, nil pointers and interfaces,
    /// and structs whose fields are recursively zeroed.
    pub fn zero(shape: &ShapeRef) -> Self {
        match shape.kind() {
            ShapeKind::Struct(fields) => Value::Struct(StructValue {
                shape: ShapeRef::clone(shape),
                fields: fields.iter().map(|f| Value::zero(f.shape())).collect(),
            }),
            ShapeKind::Pointer(_) | ShapeKind::Interface => Value::Nil,
            ShapeKind::Scalar(kind) => Value::Scalar(match kind {
                ScalarKind::Bool => Scalar::Bool(false),
                ScalarKind::Int => Scalar::Int(0),
                ScalarKind::Float => Scalar::Float(0.0),
                ScalarKind::Str => Scalar::Str(String::new()),
            }),
        }
    }

    /// A pointer to a freshly allocated zero value of `shape`.
    pub fn new_pointer(shape: &ShapeRef) -> Self {
        Value::Pointer(Pointer::new(Value::zero(shape)))
    }

    /// Wrap a value behind a new pointer.
    pub fn boxed(self) -> Self {
        Value::Pointer(Pointer::new(self))
    }

    /// Short description of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Scalar(_) => "scalar",
            Value::Struct(_) => "struct",
            Value::Pointer(_) => "pointer",
        }
    }

    /// Whether this is a nil pointer or interface.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Borrow as a struct.
    pub fn as_struct(&self) -> Result<&StructValue, ValueError> {
        match self {
            Value::Struct(s) => Ok(s),
            other => Err(ValueError::NotAStruct {
                found: other.kind_name(),
            }),
        }
    }

    /// Mutably borrow as a struct.
    pub fn as_struct_mut(&mut self) -> Result<&mut StructValue, ValueError> {
        match self {
            Value::Struct(s) => Ok(s),
            other => Err(ValueError::NotAStruct {
                found: other.kind_name(),
            }),
        }
    }

    /// Borrow as a pointer.
    pub fn as_pointer(&self) -> Option<&Pointer> {
        match self {
            Value::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Shape of the struct this value is or points to, if known.
    pub fn shape(&self) -> Option<ShapeRef> {
        match self {
            Value::Struct(s) => Some(ShapeRef::clone(&s.shape)),
            Value::Pointer(p) => p.read().ok().and_then(|v| v.shape()),
            _ => None,
        }
    }

    /// Whether this value is an instance of `shape`, looking through pointers
    /// on both sides.
    pub fn is_instance_of(&self, shape: &Shape) -> bool {
        self.shape().is_some_and(|s| s.is(shape.indirect()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Self {
        Value::Struct(s)
    }
}

/// The receiver a method is called with.
///
/// Pointer-form methods borrow the original struct and may mutate it.
/// Value-form methods receive their own copy.
#[derive(Debug)]
pub enum Receiver<'a> {
    /// The original, borrowed mutably.
    Pointer(&'a mut Value),
    /// A copy.
    Value(Value),
}

impl Receiver<'_> {
    /// Whether the method was given the original.
    pub fn is_pointer(&self) -> bool {
        matches!(self, Receiver::Pointer(_))
    }

    /// Read access to the receiver.
    pub fn get(&self) -> &Value {
        match self {
            Receiver::Pointer(v) => v,
            Receiver::Value(v) => v,
        }
    }

    /// Write access to the receiver. Writes to a value-form receiver only
    /// affect the copy.
    pub fn get_mut(&mut self) -> &mut Value {
        match self {
            Receiver::Pointer(v) => v,
            Receiver::Value(v) => v,
        }
    }

    /// Borrow the receiver as a struct.
    pub fn as_struct(&self) -> Result<&StructValue, ValueError> {
        self.get().as_struct()
    }

    /// Mutably borrow the receiver as a struct.
    pub fn as_struct_mut(&mut self) -> Result<&mut StructValue, ValueError> {
        self.get_mut().as_struct_mut()
    }
}
