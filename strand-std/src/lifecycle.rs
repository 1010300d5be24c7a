//! # Lifecycle Runner
//!
//! Runs an action of a registered type between the hooks discovered for it:
//!
//! ```text
//! before* -> action -> after*   (success)
//!                   -> panic*   (failure)
//! finally*                       (always)
//! ```
//!
//! Hooks run in the order stored in the type's [`HookSet`](crate::HookSet).
//! A `before` hook that fails aborts the action and routes to `panic`. A
//! `before` hook whose first return value is not nil skips the action; that
//! value becomes the result and `after` still runs.
//!
//! Every call is guarded with `catch_unwind`, so a panicking hook or action is
//! reported as [`LifecycleError::Panicked`] instead of unwinding through the
//! caller. A panic inside a pointer-form method poisons that pointer; later
//! hooks reaching the same pointer fail with a poisoned-lock error.

use crate::{
    error::{LifecycleError, ReplayError},
    registry::TypeDescriptor,
    replay::FieldPath,
};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};
use strand_core::Value;

/// Runs actions of one type together with its hooks.
#[derive(Debug, Clone, Copy)]
pub struct Lifecycle<'a> {
    descriptor: &'a TypeDescriptor,
}

impl<'a> Lifecycle<'a> {
    /// Create a runner for `descriptor`.
    pub fn new(descriptor: &'a TypeDescriptor) -> Self {
        Self { descriptor }
    }

    /// Run `action` on `instance` with `args`, surrounded by the hooks.
    ///
    /// Returns the action's values, or the first error. Errors raised by
    /// `after`, `panic` or `finally` hooks after something already failed are
    /// logged and dropped.
    pub fn run(
        &self,
        instance: &mut Value,
        action: &str,
        args: &[Value],
    ) -> Result<Vec<Value>, LifecycleError> {
        let hooks = self.descriptor.hooks();
        let span = tracing::debug_span!("lifecycle", ty = self.descriptor.name(), action);
        let _enter = span.enter();

        let mut failure = None;
        let mut result = None;

        for hook in hooks.before() {
            match guarded(hook, instance, &[]) {
                Ok(values) if values.first().is_some_and(|v| !v.is_nil()) => {
                    tracing::debug!(hook = hook.name(), path = ?hook.index_path(), "before hook short-circuited action");
                    result = Some(values);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        if failure.is_none() && result.is_none() {
            match self.descriptor.method_path(action) {
                Some(path) => match guarded(&path, instance, args) {
                    Ok(values) => result = Some(values),
                    Err(err) => failure = Some(err),
                },
                None => {
                    failure = Some(LifecycleError::Replay(ReplayError::UnknownMethod {
                        shape: self.descriptor.shape().name().to_string(),
                        method: action.to_string(),
                    }));
                }
            }
        }

        if failure.is_none() {
            for hook in hooks.after() {
                if let Err(err) = guarded(hook, instance, &[]) {
                    note(&mut failure, hook, err);
                }
            }
        } else {
            if let Some(err) = &failure {
                tracing::debug!(error = %err, "action failed, running panic hooks");
            }
            for hook in hooks.panic() {
                if let Err(err) = guarded(hook, instance, &[]) {
                    note(&mut failure, hook, err);
                }
            }
        }

        for hook in hooks.finally() {
            if let Err(err) = guarded(hook, instance, &[]) {
                note(&mut failure, hook, err);
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(result.unwrap_or_default()),
        }
    }
}

fn guarded(path: &FieldPath, instance: &mut Value, args: &[Value]) -> Result<Vec<Value>, LifecycleError> {
    match panic::catch_unwind(AssertUnwindSafe(|| path.invoke(instance, args))) {
        Ok(outcome) => outcome.map_err(LifecycleError::from),
        Err(payload) => Err(LifecycleError::Panicked {
            method: path.name().to_string(),
            message: panic_message(&*payload),
        }),
    }
}

fn note(failure: &mut Option<LifecycleError>, hook: &FieldPath, err: LifecycleError) {
    tracing::warn!(hook = hook.name(), path = ?hook.index_path(), error = %err, "lifecycle hook failed");
    if failure.is_none() {
        *failure = Some(err);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::Module, testing::CallRecorder};
    use strand_core::{Shape, ShapeRef, ValueError};

    fn descriptor(shape: &ShapeRef) -> TypeDescriptor {
        let controller = Shape::structure("web.Controller").build().unwrap();
        TypeDescriptor::discover(Module::new("app"), shape.clone(), Vec::new(), &controller)
    }

    #[test]
    fn test_success_runs_before_action_after_finally() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Before", recorder.hook("before"))
            .method("After", recorder.hook("after"))
            .method("Panic", recorder.hook("panic"))
            .method("Finally", recorder.hook("finally"))
            .method("Index", recorder.hook_returning("index", vec![Value::from("ok")]))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let out = Lifecycle::new(&descriptor).run(&mut instance, "index", &[]).unwrap();

        assert_eq!(out[0].as_str(), Some("ok"));
        assert_eq!(recorder.calls(), ["before", "index", "after", "finally"]);
    }

    #[test]
    fn test_failing_action_routes_to_panic_hooks() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("After", recorder.hook("after"))
            .method("Panic", recorder.hook("panic"))
            .method("Finally", recorder.hook("finally"))
            .method("Index", recorder.failing_hook("index"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let err = Lifecycle::new(&descriptor)
            .run(&mut instance, "Index", &[])
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Replay(ReplayError::Call { .. })));
        assert_eq!(recorder.calls(), ["index", "panic", "finally"]);
    }

    #[test]
    fn test_failing_before_skips_action() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Before", recorder.failing_hook("before"))
            .method("Panic", recorder.hook("panic"))
            .method("Finally", recorder.hook("finally"))
            .method("Index", recorder.hook("index"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        assert!(Lifecycle::new(&descriptor).run(&mut instance, "Index", &[]).is_err());
        assert_eq!(recorder.calls(), ["before", "panic", "finally"]);
    }

    #[test]
    fn test_before_result_short_circuits_action() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Before", recorder.hook_returning("before", vec![Value::from("redirect")]))
            .method("After", recorder.hook("after"))
            .method("Index", recorder.hook("index"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let out = Lifecycle::new(&descriptor).run(&mut instance, "Index", &[]).unwrap();

        assert_eq!(out[0].as_str(), Some("redirect"));
        assert_eq!(recorder.calls(), ["before", "after"]);
    }

    #[test]
    fn test_rust_panic_is_caught() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Panic", recorder.hook("panic"))
            .method("Finally", recorder.hook("finally"))
            .method("Index", |_recv, _args| panic!("index exploded"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let err = Lifecycle::new(&descriptor)
            .run(&mut instance, "Index", &[])
            .unwrap_err();

        match err {
            LifecycleError::Panicked { method, message } => {
                assert_eq!(method, "Index");
                assert_eq!(message, "index exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(recorder.calls(), ["panic", "finally"]);
    }

    #[test]
    fn test_finally_error_reported_when_nothing_else_failed() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Finally", recorder.failing_hook("finally"))
            .method("Index", recorder.hook("index"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let err = Lifecycle::new(&descriptor)
            .run(&mut instance, "Index", &[])
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Replay(ReplayError::Call { ref method, .. }) if method == "Finally"));
    }

    #[test]
    fn test_panic_behind_pointer_poisons_it_for_later_calls() {
        let recorder = CallRecorder::new();
        let session = Shape::structure("app.Session")
            .pointer_method("Explode", |_recv, _args| panic!("session exploded"))
            .pointer_method("Touch", recorder.hook("touch"))
            .build()
            .unwrap();
        let shape = Shape::structure("app.Hotels")
            .embed(&Shape::pointer_to(&session))
            .method("Panic", recorder.hook("panic"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);
        instance
            .as_struct_mut()
            .unwrap()
            .set("Session", Value::new_pointer(&session))
            .unwrap();

        let err = Lifecycle::new(&descriptor)
            .run(&mut instance, "Explode", &[])
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Panicked { ref method, .. } if method == "Explode"));
        assert_eq!(recorder.calls(), ["panic"]);

        let err = descriptor.call("Touch", &mut instance, &[]).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Receiver {
                ref method,
                source: ValueError::Poisoned,
            } if method == "Touch"
        ));
        assert_eq!(recorder.calls(), ["panic"]);
    }

    #[test]
    fn test_unknown_action_still_runs_finally() {
        let recorder = CallRecorder::new();
        let shape = Shape::structure("app.Hotels")
            .method("Finally", recorder.hook("finally"))
            .build()
            .unwrap();
        let descriptor = descriptor(&shape);
        let mut instance = Value::zero(&shape);

        let err = Lifecycle::new(&descriptor)
            .run(&mut instance, "Missing", &[])
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Replay(ReplayError::UnknownMethod { .. })));
        assert_eq!(recorder.calls(), ["finally"]);
    }
}
