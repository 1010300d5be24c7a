//! Embedded capability discovery.
//!
//! A composite type gains base behavior by embedding a designated capability
//! type, possibly several levels deep. [`find_capabilities`] follows every
//! embedded field breadth-first and records the index path to each
//! occurrence.

use crate::{error::ReplayError, replay};
use std::{collections::VecDeque, fmt};
use strand_core::{Shape, ShapeRef, Value};

/// Field indices from a composite root to one embedded capability field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityPath(Vec<usize>);

impl CapabilityPath {
    /// The index path.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth of the occurrence (1 for a field of the root itself).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Resolve the capability field inside `root` and hand it to `visit`.
    pub fn with<R>(
        &self,
        root: &mut Value,
        visit: impl FnOnce(&mut Value) -> R,
    ) -> Result<R, ReplayError> {
        replay::resolve(root, &self.0, visit)
    }
}

impl From<Vec<usize>> for CapabilityPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for CapabilityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Find every embedded occurrence of `capability` within `root`.
///
/// Only embedded fields are followed; named fields never are. Pointer shapes
/// are looked through before their fields are inspected, and shapes without
/// fields are skipped. A field whose declared shape is the capability is
/// recorded and not descended into.
///
/// Shallower occurrences come first; within a level, declaration order wins.
pub fn find_capabilities(root: &ShapeRef, capability: &Shape) -> Vec<CapabilityPath> {
    let mut found = Vec::new();
    let mut queue: VecDeque<(ShapeRef, Vec<usize>)> = VecDeque::from([(root.clone(), Vec::new())]);

    while let Some((node, path)) = queue.pop_front() {
        let node = node.indirect();
        let Some(fields) = node.fields() else {
            tracing::trace!(shape = %node, ?path, "skipping embedding without fields");
            continue;
        };

        for (index, field) in fields.iter().enumerate() {
            if !field.is_embedded() {
                continue;
            }

            let mut next = path.clone();
            next.push(index);

            if field.shape().is(capability) {
                tracing::debug!(root = %root, path = ?next, "found embedded capability");
                found.push(CapabilityPath(next));
                continue;
            }

            queue.push_back((field.shape().clone(), next));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::ScalarKind;

    fn controller() -> ShapeRef {
        Shape::structure("web.Controller")
            .field("action", &Shape::scalar(ScalarKind::Str))
            .build()
            .unwrap()
    }

    #[test]
    fn test_named_capability_field_is_ignored() {
        let controller = Shape::pointer_to(&controller());
        let app = Shape::structure("app.Named")
            .field("ctrl", &controller)
            .build()
            .unwrap();

        assert!(find_capabilities(&app, &controller).is_empty());
    }

    #[test]
    fn test_degenerate_embeddings_are_skipped() {
        let controller = Shape::pointer_to(&controller());
        let app = Shape::structure("app.Odd")
            .embed(&Shape::scalar(ScalarKind::Int))
            .embed(&Shape::interface("app.Renderer"))
            .embed(&controller)
            .build()
            .unwrap();

        let paths = find_capabilities(&app, &controller);
        assert_eq!(paths, vec![CapabilityPath::from(vec![2])]);
    }

    #[test]
    fn test_capability_is_not_descended() {
        let base = controller();
        let inner = Shape::structure("web.Inner").embed(&base).build().unwrap();
        let wrapping = Shape::structure("web.Wrapping").embed(&inner).build().unwrap();
        let app = Shape::structure("app.App").embed(&wrapping).build().unwrap();

        // Searching for `Wrapping` must not also report the `Controller` below it.
        let paths = find_capabilities(&app, &wrapping);
        assert_eq!(paths, vec![CapabilityPath::from(vec![0])]);
    }

    #[test]
    fn test_shallow_before_deep() {
        let controller = Shape::pointer_to(&controller());
        let deep = Shape::structure("app.Deep").embed(&controller).build().unwrap();
        let app = Shape::structure("app.Mixed")
            .embed(&deep)
            .embed(&controller)
            .build()
            .unwrap();

        let paths = find_capabilities(&app, &controller);
        assert_eq!(
            paths,
            vec![CapabilityPath::from(vec![1]), CapabilityPath::from(vec![0, 0])]
        );
        assert_eq!(paths[1].depth(), 2);
    }
}
