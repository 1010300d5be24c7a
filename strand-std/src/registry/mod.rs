//! Registry module for type descriptors.
//!
//! Types are registered on a [`RegistryBuilder`] during startup. Each
//! registration runs capability and hook discovery once and stores the result
//! as an immutable [`TypeDescriptor`]. Calling `.build()` freezes the builder
//! into a [`Registry`] that can be shared across threads for lookups.
//!
//! # Naming
//!
//! A type is registered under its logical name: the owning module's namespace
//! followed by the lowercase short name (`shop\catalog`). Types owned by the
//! primary module are also reachable under the bare short name (`catalog`).

mod descriptor;
mod method;

pub use descriptor::{Module, NAMESPACE_SEPARATOR, TypeDescriptor};
pub use method::{MethodArg, MethodType};

use crate::error::RegistryError;
use std::{collections::HashMap, sync::Arc};
use strand_core::ShapeRef;

// ============================================================================
// RegistryBuilder - open registration window
// ============================================================================

/// Builder for constructing a [`Registry`].
///
/// # Example
/// ```ignore
/// let mut builder = RegistryBuilder::new(controller_shape, Module::new("app"));
/// builder.register_primary(hotels_shape, vec![MethodType::new("Index")])?;
/// builder.register(&Module::new("admin"), users_shape, Vec::new())?;
/// let registry = builder.build();
/// ```
pub struct RegistryBuilder {
    capability: ShapeRef,
    primary: Module,
    types: HashMap<String, Arc<TypeDescriptor>>,
    order: Vec<Arc<TypeDescriptor>>,
}

impl RegistryBuilder {
    /// Create a builder that discovers embeddings of `capability` and treats
    /// `primary` as the application's own module.
    pub fn new(capability: ShapeRef, primary: Module) -> Self {
        Self {
            capability,
            primary,
            types: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register `shape` as owned by `module`.
    ///
    /// If a type is already registered under the same logical name, the
    /// existing entry is kept and the new one is rejected.
    pub fn register(
        &mut self,
        module: &Module,
        shape: ShapeRef,
        methods: Vec<MethodType>,
    ) -> Result<Arc<TypeDescriptor>, RegistryError> {
        let descriptor = Arc::new(TypeDescriptor::discover(
            module.clone(),
            shape,
            methods,
            &self.capability,
        ));
        let name = descriptor.name().to_string();

        if self.types.contains_key(&name) {
            tracing::error!(name = %name, "attempt to register duplicate type");
            return Err(RegistryError::Duplicate(name));
        }

        self.types.insert(name.clone(), Arc::clone(&descriptor));
        if *module == self.primary {
            self.types
                .insert(descriptor.short_name().to_string(), Arc::clone(&descriptor));
        }
        self.order.push(Arc::clone(&descriptor));

        tracing::debug!(
            name = %name,
            capabilities = descriptor.capability_paths().len(),
            hooks = descriptor.hooks().len(),
            "registered type"
        );
        Ok(descriptor)
    }

    /// Register `shape` as owned by the primary module.
    pub fn register_primary(
        &mut self,
        shape: ShapeRef,
        methods: Vec<MethodType>,
    ) -> Result<Arc<TypeDescriptor>, RegistryError> {
        let primary = self.primary.clone();
        self.register(&primary, shape, methods)
    }

    /// Look up a type registered so far.
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Number of registered types (aliases not counted).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register every [`Registration`] submitted through `inventory`.
    ///
    /// Rejected registrations are returned; the rest are registered. The
    /// iteration order of submitted entries is unspecified, so which of two
    /// conflicting entries wins is too.
    #[cfg(feature = "inventory")]
    pub fn collect(&mut self) -> Vec<RegistryError> {
        let mut errors = Vec::new();
        for registration in inventory::iter::<Registration> {
            let module = if registration.primary {
                self.primary.clone()
            } else {
                Module::new(registration.module)
            };
            if let Err(err) = self.register(&module, (registration.shape)(), (registration.methods)())
            {
                errors.push(err);
            }
        }
        errors
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        Registry {
            capability: self.capability,
            primary: self.primary,
            types: self.types,
            order: self.order,
        }
    }
}

// ============================================================================
// Registry - immutable, thread-safe lookup
// ============================================================================

/// An immutable registry of type descriptors.
///
/// Created by [`RegistryBuilder::build`]. Share it via `Arc` and pass it to
/// whatever dispatches actions.
#[derive(Debug)]
pub struct Registry {
    capability: ShapeRef,
    primary: Module,
    types: HashMap<String, Arc<TypeDescriptor>>,
    order: Vec<Arc<TypeDescriptor>>,
}

impl Registry {
    /// Look up a type by logical name, or by bare short name for types of the
    /// primary module.
    pub fn lookup(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Iterate over registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.order.iter()
    }

    /// Types registered by the named module, in registration order.
    pub fn module_types<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'a Arc<TypeDescriptor>> + 'a {
        self.order.iter().filter(move |d| d.module().name() == module)
    }

    /// The capability shape discovery looked for.
    pub fn capability(&self) -> &ShapeRef {
        &self.capability
    }

    /// The primary module.
    pub fn primary(&self) -> &Module {
        &self.primary
    }

    /// Number of registered types (aliases not counted).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ============================================================================
// Link-time registration
// ============================================================================

/// A type registration submitted at link time with `inventory::submit!`.
///
/// # Example
/// ```ignore
/// inventory::submit! {
///     Registration {
///         module: "app",
///         primary: true,
///         shape: hotels_shape,
///         methods: hotels_methods,
///     }
/// }
/// ```
#[cfg(feature = "inventory")]
pub struct Registration {
    /// Owning module name. Ignored when `primary` is set.
    pub module: &'static str,
    /// Whether the type belongs to the primary module.
    pub primary: bool,
    /// Builds the type's shape.
    pub shape: fn() -> ShapeRef,
    /// Builds the type's method metadata.
    pub methods: fn() -> Vec<MethodType>,
}

#[cfg(feature = "inventory")]
inventory::collect!(Registration);
