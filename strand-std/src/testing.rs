//! Testing utilities for Strand.
//!
//! # Features
//!
//! - [`CallRecorder`]: Builds method callables that record each invocation,
//!   so tests can assert which hooks ran and in what order

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strand_core::{BoxError, Receiver, Value};

// ============================================================================
// Call Recorder
// ============================================================================

/// Records the label of every callable it produced, in call order.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = CallRecorder::new();
/// let shape = Shape::structure("app.Hotels")
///     .method("Before", recorder.hook("before"))
///     .method("Index", recorder.hook("index"))
///     .build()?;
///
/// Lifecycle::new(&descriptor).run(&mut instance, "Index", &[])?;
/// assert_eq!(recorder.calls(), ["before", "index"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A callable that records `label` and returns nothing.
    pub fn hook(
        &self,
        label: &str,
    ) -> impl Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static + use<>
    {
        self.hook_returning(label, Vec::new())
    }

    /// A callable that records `label` and returns `values`.
    pub fn hook_returning(
        &self,
        label: &str,
        values: Vec<Value>,
    ) -> impl Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static + use<>
    {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        move |_recv: Receiver<'_>, _args: &[Value]| {
            record(&calls, &label);
            Ok(values.clone())
        }
    }

    /// A callable that records `label` and then fails.
    pub fn failing_hook(
        &self,
        label: &str,
    ) -> impl Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static + use<>
    {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        move |_recv: Receiver<'_>, _args: &[Value]| {
            record(&calls, &label);
            Err(BoxError::from(format!("{label} failed")))
        }
    }

    /// A copy of the recorded labels.
    pub fn calls(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn record(calls: &Mutex<Vec<String>>, label: &str) {
    calls
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(label.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::Shape;

    #[test]
    fn test_recorder_tracks_calls_in_order() {
        let recorder = CallRecorder::new();
        let first = recorder.hook("first");
        let second = recorder.failing_hook("second");
        let shape = Shape::structure("app.Empty").build().unwrap();

        first(Receiver::Value(Value::zero(&shape)), &[]).unwrap();
        assert!(second(Receiver::Value(Value::zero(&shape)), &[]).is_err());

        assert_eq!(recorder.calls(), ["first", "second"]);
        assert_eq!(recorder.count(), 2);

        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }
}
