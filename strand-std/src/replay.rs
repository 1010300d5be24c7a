//! # Path Replay
//!
//! A [`FieldPath`] is a deferred binding: the field indices that lead from a
//! root value to a nested receiver, plus the method to call once there. It is
//! built once during discovery and replayed against any number of instances.
//!
//! # Pointer Normalization
//!
//! Navigation looks through pointers before selecting each field. Once the
//! path is consumed, the receiver is adapted to the method's declared form:
//!
//! | resolved value | pointer-form method        | value-form method |
//! |----------------|----------------------------|-------------------|
//! | inline struct  | borrow it in place         | copy it           |
//! | pointer        | lock and borrow the pointee| copy the pointee  |
//!
//! Pointees stay write-locked while a pointer-form method runs. A method must
//! not replay another path through the same pointer, or it will deadlock.

use crate::error::ReplayError;
use strand_core::{Annotations, MethodDecl, MethodFn, Receiver, ReceiverKind, Value, ValueError};
use std::fmt;

/// A stored, replayable method binding.
#[derive(Clone)]
pub struct FieldPath {
    name: String,
    index_path: Vec<usize>,
    pointer_receiver: bool,
    callable: MethodFn,
    annotations: Annotations,
}

impl FieldPath {
    /// Bind a declared method to the path that leads to its owner.
    pub fn new(method: &MethodDecl, index_path: Vec<usize>) -> Self {
        Self {
            name: method.name().to_string(),
            index_path,
            pointer_receiver: method.receiver() == ReceiverKind::Pointer,
            callable: MethodFn::clone(method.callable()),
            annotations: method.annotations().clone(),
        }
    }

    /// Name of the bound method.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field indices from the root to the receiver.
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// Whether the method was declared on the pointer form.
    pub fn is_pointer_receiver(&self) -> bool {
        self.pointer_receiver
    }

    /// Annotations of the bound method.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Resolve the receiver inside `root` and call the method with `args`.
    pub fn invoke(&self, root: &mut Value, args: &[Value]) -> Result<Vec<Value>, ReplayError> {
        resolve(root, &self.index_path, |target| self.call(target, args))?
    }

    fn call(&self, target: &mut Value, args: &[Value]) -> Result<Vec<Value>, ReplayError> {
        let result = match (self.pointer_receiver, target) {
            (true, Value::Pointer(pointer)) => {
                let mut pointee = pointer.write().map_err(|source| self.receiver_error(source))?;
                (self.callable)(Receiver::Pointer(&mut *pointee), args)
            }
            (true, Value::Nil) => return Err(self.receiver_error(ValueError::NilPointer)),
            (true, target) => (self.callable)(Receiver::Pointer(target), args),
            (false, Value::Pointer(pointer)) => {
                let copy = pointer
                    .read()
                    .map_err(|source| self.receiver_error(source))?
                    .clone();
                (self.callable)(Receiver::Value(copy), args)
            }
            (false, Value::Nil) => return Err(self.receiver_error(ValueError::NilPointer)),
            (false, target) => (self.callable)(Receiver::Value(target.clone()), args),
        };

        result.map_err(|source| ReplayError::Call {
            method: self.name.clone(),
            source,
        })
    }

    fn receiver_error(&self, source: ValueError) -> ReplayError {
        ReplayError::Receiver {
            method: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("name", &self.name)
            .field("index_path", &self.index_path)
            .field("pointer_receiver", &self.pointer_receiver)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

/// Walk `path` from `value` and hand the value found there to `visit`.
///
/// Each step looks through a pointer (holding its write lock until `visit`
/// returns) and then selects a struct field by index.
pub fn resolve<R, F>(value: &mut Value, path: &[usize], visit: F) -> Result<R, ReplayError>
where
    F: FnOnce(&mut Value) -> R,
{
    descend(value, path, 0, visit)
}

fn descend<R, F>(value: &mut Value, path: &[usize], depth: usize, visit: F) -> Result<R, ReplayError>
where
    F: FnOnce(&mut Value) -> R,
{
    let Some((&index, rest)) = path.split_first() else {
        return Ok(visit(value));
    };

    let fail = |source: ValueError| ReplayError::Navigate {
        depth,
        index,
        source,
    };

    match value {
        Value::Pointer(pointer) => {
            let mut pointee = pointer.write().map_err(fail)?;
            let field = select(&mut pointee, index).map_err(fail)?;
            descend(field, rest, depth + 1, visit)
        }
        Value::Nil => Err(fail(ValueError::NilPointer)),
        other => {
            let field = select(other, index).map_err(fail)?;
            descend(field, rest, depth + 1, visit)
        }
    }
}

fn select(value: &mut Value, index: usize) -> Result<&mut Value, ValueError> {
    value.as_struct_mut()?.at_mut(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use strand_core::{BoxError, ScalarKind, Shape, ShapeRef};

    fn counter_shape() -> ShapeRef {
        Shape::structure("app.Counter")
            .field("hits", &Shape::scalar(ScalarKind::Int))
            .pointer_method("Bump", bump)
            .method("Peek", peek)
            .build()
            .unwrap()
    }

    fn bump(mut recv: Receiver<'_>, _args: &[Value]) -> Result<Vec<Value>, BoxError> {
        let record = recv.as_struct_mut()?;
        let hits = record.get("hits")?.as_int().unwrap_or(0);
        record.set("hits", hits + 1)?;
        Ok(vec![Value::from(hits + 1)])
    }

    fn peek(recv: Receiver<'_>, _args: &[Value]) -> Result<Vec<Value>, BoxError> {
        Ok(vec![recv.as_struct()?.get("hits")?.clone()])
    }

    fn holder(counter: &ShapeRef) -> ShapeRef {
        Shape::structure("app.Holder")
            .field("label", &Shape::scalar(ScalarKind::Str))
            .embed(counter)
            .field("remote", &Shape::pointer_to(counter))
            .build()
            .unwrap()
    }

    fn method_path(shape: &ShapeRef, name: &str, path: Vec<usize>) -> FieldPath {
        FieldPath::new(shape.method(name).unwrap(), path)
    }

    #[test]
    fn test_pointer_method_on_inline_field_mutates_in_place() {
        let counter = counter_shape();
        let mut root = Value::zero(&holder(&counter));
        let bump = method_path(&counter, "Bump", vec![1]);

        bump.invoke(&mut root, &[]).unwrap();
        let out = bump.invoke(&mut root, &[]).unwrap();

        assert_eq!(out[0].as_int(), Some(2));
        let peek = method_path(&counter, "Peek", vec![1]);
        assert_eq!(peek.invoke(&mut root, &[]).unwrap()[0].as_int(), Some(2));
    }

    #[test]
    fn test_pointer_method_through_pointer_field_mutates_pointee() {
        let counter = counter_shape();
        let mut root = Value::zero(&holder(&counter));
        let shared = Value::new_pointer(&counter);
        root.as_struct_mut()
            .unwrap()
            .set("remote", shared.clone())
            .unwrap();

        method_path(&counter, "Bump", vec![2]).invoke(&mut root, &[]).unwrap();

        let pointee = shared.as_pointer().unwrap().read().unwrap();
        assert_eq!(pointee.as_struct().unwrap().get("hits").unwrap().as_int(), Some(1));
    }

    #[test]
    fn test_value_method_through_pointer_root_gets_copy() {
        let counter = counter_shape();
        let mut root = Value::new_pointer(&counter);
        let record_bump = FieldPath {
            pointer_receiver: false,
            ..method_path(&counter, "Bump", vec![])
        };

        record_bump.invoke(&mut root, &[]).unwrap();

        let peek = method_path(&counter, "Peek", vec![]);
        assert_eq!(peek.invoke(&mut root, &[]).unwrap()[0].as_int(), Some(0));
    }

    #[test]
    fn test_nil_pointer_on_path_fails_loudly() {
        let counter = counter_shape();
        let mut root = Value::zero(&holder(&counter));
        let err = method_path(&counter, "Bump", vec![2, 0])
            .invoke(&mut root, &[])
            .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Navigate {
                depth: 1,
                index: 0,
                source: ValueError::NilPointer,
            }
        ));
    }

    #[test]
    fn test_pointer_method_on_nil_field_is_not_called() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let counter = Shape::structure("app.Counter")
            .pointer_method("Touch", move |_recv, _args| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            })
            .build()
            .unwrap();
        let mut root = Value::zero(&holder(&counter));

        let err = method_path(&counter, "Touch", vec![2])
            .invoke(&mut root, &[])
            .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Receiver {
                ref method,
                source: ValueError::NilPointer,
            } if method == "Touch"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_value_method_on_nil_field_fails() {
        let counter = counter_shape();
        let mut root = Value::zero(&holder(&counter));

        let err = method_path(&counter, "Peek", vec![2])
            .invoke(&mut root, &[])
            .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Receiver {
                ref method,
                source: ValueError::NilPointer,
            } if method == "Peek"
        ));
    }

    #[test]
    fn test_out_of_range_index_fails_loudly() {
        let counter = counter_shape();
        let mut root = Value::zero(&counter);
        let err = method_path(&counter, "Peek", vec![5])
            .invoke(&mut root, &[])
            .unwrap_err();

        match err {
            ReplayError::Navigate { depth, index, source } => {
                assert_eq!((depth, index), (0, 5));
                assert!(matches!(source, ValueError::IndexOutOfRange { len: 1, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_method_error_surfaces_as_call_error() {
        let failing = Shape::structure("app.Failing")
            .method("Index", |_recv, _args| Err("boom".into()))
            .build()
            .unwrap();
        let mut root = Value::zero(&failing);

        let err = method_path(&failing, "Index", vec![])
            .invoke(&mut root, &[])
            .unwrap_err();
        assert!(matches!(err, ReplayError::Call { ref method, .. } if method == "Index"));
    }
}
