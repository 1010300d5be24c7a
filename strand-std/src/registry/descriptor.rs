//! Registered type descriptors and their owning modules.

use super::method::MethodType;
use crate::{
    discovery::{CapabilityPath, HookSet, discover_hooks, find_capabilities},
    error::ReplayError,
    replay::FieldPath,
};
use std::collections::VecDeque;
use strand_core::{Annotations, Shape, ShapeRef, Value};

/// Separator between a module name and a type's short name.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// A module that contributes types to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    name: String,
}

impl Module {
    /// Create a module.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix applied to the logical names of this module's types.
    pub fn namespace(&self) -> String {
        format!("{}{}", self.name, NAMESPACE_SEPARATOR)
    }
}

/// Everything discovered about one registered type.
///
/// Built once at registration and immutable afterwards; it can be shared
/// freely between threads.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: String,
    short_name: String,
    namespace: String,
    module: Module,
    shape: ShapeRef,
    methods: Vec<MethodType>,
    capability_paths: Vec<CapabilityPath>,
    hooks: HookSet,
}

impl TypeDescriptor {
    /// Run both discovery walks over `shape` and assemble the descriptor.
    pub fn discover(
        module: Module,
        shape: ShapeRef,
        methods: Vec<MethodType>,
        capability: &Shape,
    ) -> Self {
        let namespace = module.namespace();
        let short_name = shape.short_name().to_lowercase();
        let methods = methods
            .into_iter()
            .enumerate()
            .map(|(index, method)| method.with_index(index))
            .collect();

        Self {
            name: format!("{namespace}{short_name}"),
            short_name,
            namespace,
            module,
            capability_paths: find_capabilities(&shape, capability),
            hooks: discover_hooks(&shape),
            shape,
            methods,
        }
    }

    /// Logical name: namespace followed by the lowercase short name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase short name, without namespace.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Namespace of the owning module.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Owning module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The described shape.
    pub fn shape(&self) -> &ShapeRef {
        &self.shape
    }

    /// Method metadata in registration order.
    pub fn methods(&self) -> &[MethodType] {
        &self.methods
    }

    /// Paths to every embedded capability, shallowest first.
    pub fn capability_paths(&self) -> &[CapabilityPath] {
        &self.capability_paths
    }

    /// Discovered lifecycle hooks.
    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Type-level annotations.
    pub fn annotations(&self) -> &Annotations {
        self.shape.annotations()
    }

    /// Method metadata by name, ignoring case.
    pub fn method(&self, name: &str) -> Option<&MethodType> {
        let name = name.to_lowercase();
        self.methods.iter().find(|m| m.lower_name() == name)
    }

    /// A replayable binding for the method `name`, ignoring case.
    ///
    /// Methods declared on the type itself win; otherwise the method is
    /// looked up on embedded components, shallowest first, following
    /// embedded pointers as well as inline structs.
    pub fn method_path(&self, name: &str) -> Option<FieldPath> {
        let name = name.to_lowercase();
        let mut queue: VecDeque<(&Shape, Vec<usize>)> =
            VecDeque::from([(self.shape.as_ref(), Vec::new())]);

        while let Some((shape, path)) = queue.pop_front() {
            if let Some(method) = shape.methods().iter().find(|m| m.lower_name() == name) {
                return Some(FieldPath::new(method, path));
            }
            let Some(fields) = shape.fields() else {
                continue;
            };
            for (index, field) in fields.iter().enumerate() {
                if field.is_embedded() {
                    let mut next = path.clone();
                    next.push(index);
                    queue.push_back((field.shape().indirect(), next));
                }
            }
        }
        None
    }

    /// Invoke the method `name` on `instance`.
    pub fn call(
        &self,
        name: &str,
        instance: &mut Value,
        args: &[Value],
    ) -> Result<Vec<Value>, ReplayError> {
        self.method_path(name)
            .ok_or_else(|| ReplayError::UnknownMethod {
                shape: self.shape.name().to_string(),
                method: name.to_string(),
            })?
            .invoke(instance, args)
    }

    /// Resolve the primary (first discovered) capability inside `instance`
    /// and hand it to `visit`.
    pub fn with_capability<R>(
        &self,
        instance: &mut Value,
        visit: impl FnOnce(&mut Value) -> R,
    ) -> Result<R, ReplayError> {
        let path = self
            .capability_paths
            .first()
            .ok_or_else(|| ReplayError::NoCapability {
                shape: self.shape.name().to_string(),
            })?;
        path.with(instance, visit)
    }
}
