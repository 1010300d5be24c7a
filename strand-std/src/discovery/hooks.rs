//! # Lifecycle Hook Discovery
//!
//! A type and each of its struct components may declare methods named
//! `Before`, `After`, `Panic` or `Finally` (any case). [`discover_hooks`]
//! collects them all into a [`HookSet`] so a dispatcher can run them around an
//! action without knowing where in the structure they live.
//!
//! # Ordering
//!
//! Discovery is depth-first: a shape's own methods (value form, then pointer
//! form, each in declaration order) come before those of its fields, and
//! fields are visited in declaration order.
//!
//! - `before` hooks are stored in reverse discovery order, so the innermost
//!   component sets up first and the root's own `Before` runs last
//! - `after`, `panic` and `finally` hooks keep discovery order, so the root
//!   tears down first

use crate::replay::FieldPath;
use std::fmt;
use strand_core::{ReceiverKind, ShapeRef};

/// The four lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs before the action.
    Before,
    /// Runs after the action succeeded.
    After,
    /// Runs after the action failed.
    Panic,
    /// Always runs last.
    Finally,
}

impl HookKind {
    /// All phases, in the order a dispatcher runs them.
    pub const ALL: [HookKind; 4] = [Self::Before, Self::After, Self::Panic, Self::Finally];

    /// Classify a method name, ignoring case.
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "panic" => Some(Self::Panic),
            "finally" => Some(Self::Finally),
            _ => None,
        }
    }

    /// Lowercase phase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Panic => "panic",
            Self::Finally => "finally",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discovered hooks, bucketed by phase and stored in execution order.
#[derive(Debug, Clone, Default)]
pub struct HookSet {
    before: Vec<FieldPath>,
    after: Vec<FieldPath>,
    panic: Vec<FieldPath>,
    finally: Vec<FieldPath>,
}

impl HookSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly discovered hook. `Before` hooks are prepended, the rest
    /// appended.
    pub fn insert(&mut self, kind: HookKind, path: FieldPath) {
        match kind {
            HookKind::Before => self.before.insert(0, path),
            HookKind::After => self.after.push(path),
            HookKind::Panic => self.panic.push(path),
            HookKind::Finally => self.finally.push(path),
        }
    }

    /// Hooks of one phase, in execution order.
    pub fn get(&self, kind: HookKind) -> &[FieldPath] {
        match kind {
            HookKind::Before => &self.before,
            HookKind::After => &self.after,
            HookKind::Panic => &self.panic,
            HookKind::Finally => &self.finally,
        }
    }

    /// `Before` hooks, innermost first.
    pub fn before(&self) -> &[FieldPath] {
        &self.before
    }

    /// `After` hooks, root first.
    pub fn after(&self) -> &[FieldPath] {
        &self.after
    }

    /// `Panic` hooks, root first.
    pub fn panic(&self) -> &[FieldPath] {
        &self.panic
    }

    /// `Finally` hooks, root first.
    pub fn finally(&self) -> &[FieldPath] {
        &self.finally
    }

    /// Total number of hooks across all phases.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len() + self.panic.len() + self.finally.len()
    }

    /// Whether no hooks were discovered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every hook with its phase, phase by phase.
    pub fn iter(&self) -> impl Iterator<Item = (HookKind, &FieldPath)> {
        HookKind::ALL
            .into_iter()
            .flat_map(move |kind| self.get(kind).iter().map(move |path| (kind, path)))
    }
}

/// Collect the lifecycle hooks of `root` and of every struct nested in it.
///
/// Only methods declared directly on a shape are considered at that shape;
/// a component's hooks are found when its own field is visited, with the path
/// to that field. Struct-kind fields are descended whether embedded or named.
/// Pointer fields are not followed.
pub fn discover_hooks(root: &ShapeRef) -> HookSet {
    let mut hooks = HookSet::new();
    let mut path = Vec::new();
    check(&mut hooks, root, &mut path);
    hooks
}

fn check(hooks: &mut HookSet, shape: &ShapeRef, path: &mut Vec<usize>) {
    for form in [ReceiverKind::Value, ReceiverKind::Pointer] {
        for method in shape.methods_of(form) {
            let Some(kind) = HookKind::from_method_name(method.name()) else {
                continue;
            };
            tracing::debug!(
                shape = %shape,
                method = method.name(),
                pointer = form == ReceiverKind::Pointer,
                ?path,
                "found lifecycle hook"
            );
            hooks.insert(kind, FieldPath::new(method, path.clone()));
        }
    }

    let Some(fields) = shape.fields() else {
        return;
    };
    for (index, field) in fields.iter().enumerate() {
        if field.shape().is_struct() {
            path.push(index);
            check(hooks, field.shape(), path);
            path.pop();
        }
    }
}
