//! # Declared Shapes
//!
//! A [`Shape`] is the structural description of a type. Discovery walks shapes,
//! never live values, so everything it needs (field order, which fields are
//! embedded, which methods a type declares and on which receiver form) is
//! recorded here.
//!
//! # Identity
//!
//! Named shapes are identified by their qualified name (`package.Name`).
//! Pointer shapes are identified by the identity of what they point to, so two
//! independently built `*app.Controller` shapes are the same type.
//!
//! # Methods
//!
//! Methods are recorded on the shape that declares them, tagged with the
//! receiver form they were declared on ([`ReceiverKind`]). Embedding a shape
//! does not copy its methods into the embedder.

use crate::{
    annotation::{Annotation, Annotations},
    error::{BoxError, ShapeError},
    value::{Receiver, Value},
};
use std::{collections::HashSet, fmt, sync::Arc};

/// A shared, immutable shape.
pub type ShapeRef = Arc<Shape>;

/// An unbound method: called with the resolved receiver followed by the
/// call arguments.
pub type MethodFn =
    Arc<dyn Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static>;

/// Primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    Str,
}

impl ScalarKind {
    /// The predeclared name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        }
    }
}

/// The structural kind of a shape.
#[derive(Debug)]
pub enum ShapeKind {
    /// A struct with fields in declaration order.
    Struct(Vec<Field>),
    /// A pointer to another shape.
    Pointer(ShapeRef),
    /// A primitive.
    Scalar(ScalarKind),
    /// An interface. Carries no fields.
    Interface,
}

/// The receiver form a method is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// Declared on the value form (`T`). Receives a copy.
    Value,
    /// Declared on the pointer form (`*T`). Receives the original.
    Pointer,
}

/// A struct field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    shape: ShapeRef,
    embedded: bool,
    annotations: Annotations,
}

impl Field {
    /// Field name. Embedded fields are named after the short name of their type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared shape of the field.
    pub fn shape(&self) -> &ShapeRef {
        &self.shape
    }

    /// Whether the field is embedded (anonymous).
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Annotations attached to the field.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// A method declared directly on a shape.
#[derive(Clone)]
pub struct MethodDecl {
    name: String,
    lower_name: String,
    receiver: ReceiverKind,
    callable: MethodFn,
    annotations: Annotations,
}

impl MethodDecl {
    /// Declare a method.
    pub fn new<F>(name: impl Into<String>, receiver: ReceiverKind, callable: F) -> Self
    where
        F: Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            lower_name: name.to_lowercase(),
            name,
            receiver,
            callable: Arc::new(callable),
            annotations: Annotations::new(),
        }
    }

    /// Attach an annotation.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Method name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method name, lowercased.
    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }

    /// Receiver form the method was declared on.
    pub fn receiver(&self) -> ReceiverKind {
        self.receiver
    }

    /// The unbound callable.
    pub fn callable(&self) -> &MethodFn {
        &self.callable
    }

    /// Annotations attached to the method.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

/// The structural description of a type.
#[derive(Debug)]
pub struct Shape {
    name: String,
    kind: ShapeKind,
    methods: Vec<MethodDecl>,
    annotations: Annotations,
}

impl Shape {
    /// Start declaring a struct shape with a qualified name such as `app.Hotels`.
    pub fn structure(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// The pointer shape `*elem`.
    pub fn pointer_to(elem: &ShapeRef) -> ShapeRef {
        Arc::new(Self {
            name: format!("*{}", elem.name),
            kind: ShapeKind::Pointer(Arc::clone(elem)),
            methods: Vec::new(),
            annotations: Annotations::new(),
        })
    }

    /// A predeclared scalar shape.
    pub fn scalar(kind: ScalarKind) -> ShapeRef {
        Arc::new(Self {
            name: kind.name().to_string(),
            kind: ShapeKind::Scalar(kind),
            methods: Vec::new(),
            annotations: Annotations::new(),
        })
    }

    /// A named interface shape.
    pub fn interface(name: impl Into<String>) -> ShapeRef {
        Arc::new(Self {
            name: name.into(),
            kind: ShapeKind::Interface,
            methods: Vec::new(),
            annotations: Annotations::new(),
        })
    }

    /// Qualified name, e.g. `app.Hotels` or `*app.Hotels`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unqualified name of the named type, looking through pointers:
    /// `*app.Hotels` and `app.Hotels` are both `Hotels`.
    pub fn short_name(&self) -> &str {
        let named = self.indirect();
        named
            .name
            .rsplit_once('.')
            .map_or(named.name.as_str(), |(_, short)| short)
    }

    /// Structural kind.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Methods declared directly on this shape, in declaration order.
    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Methods declared on the given receiver form, in declaration order.
    pub fn methods_of(&self, receiver: ReceiverKind) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(move |m| m.receiver == receiver)
    }

    /// Find a declared method by name, ignoring case.
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        let name = name.to_lowercase();
        self.methods.iter().find(|m| m.lower_name == name)
    }

    /// Annotations attached to the type.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Fields, if this is a struct.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            ShapeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Whether this is a struct shape.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, ShapeKind::Struct(_))
    }

    /// Whether this is a pointer shape.
    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, ShapeKind::Pointer(_))
    }

    /// Follow pointer shapes down to the first non-pointer shape.
    pub fn indirect(&self) -> &Shape {
        let mut shape = self;
        while let ShapeKind::Pointer(elem) = &shape.kind {
            shape = elem.as_ref();
        }
        shape
    }

    /// Type identity.
    ///
    /// Pointers are the same type when their elements are; everything else is
    /// the same type when the qualified names match.
    pub fn is(&self, other: &Shape) -> bool {
        match (&self.kind, &other.kind) {
            (ShapeKind::Pointer(a), ShapeKind::Pointer(b)) => a.is(b),
            (ShapeKind::Pointer(_), _) | (_, ShapeKind::Pointer(_)) => false,
            _ => self.name == other.name,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for struct shapes.
///
/// # Example
/// ```ignore
/// let controller = Shape::structure("web.Controller").build()?;
/// let hotels = Shape::structure("app.Hotels")
///     .embed(&Shape::pointer_to(&controller))
///     .field("city", &Shape::scalar(ScalarKind::Str))
///     .pointer_method("Before", |_recv, _args| Ok(vec![]))
///     .build()?;
/// ```
pub struct ShapeBuilder {
    name: String,
    fields: Vec<Field>,
    methods: Vec<MethodDecl>,
    annotations: Annotations,
}

impl ShapeBuilder {
    /// Add an embedded field. Its name is the short name of its type.
    pub fn embed(self, shape: &ShapeRef) -> Self {
        let name = shape.short_name().to_string();
        self.embed_as(name, shape)
    }

    /// Add an embedded field under an explicit name, for a type reached
    /// through an alias.
    pub fn embed_as(mut self, name: impl Into<String>, shape: &ShapeRef) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape: Arc::clone(shape),
            embedded: true,
            annotations: Annotations::new(),
        });
        self
    }

    /// Add a named field.
    pub fn field(self, name: impl Into<String>, shape: &ShapeRef) -> Self {
        self.annotated_field(name, shape, Annotations::new())
    }

    /// Add a named field with annotations.
    pub fn annotated_field(
        mut self,
        name: impl Into<String>,
        shape: &ShapeRef,
        annotations: Annotations,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape: Arc::clone(shape),
            embedded: false,
            annotations,
        });
        self
    }

    /// Declare a method on the value form.
    pub fn method<F>(self, name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static,
    {
        self.with_method(MethodDecl::new(name, ReceiverKind::Value, callable))
    }

    /// Declare a method on the pointer form.
    pub fn pointer_method<F>(self, name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(Receiver<'_>, &[Value]) -> Result<Vec<Value>, BoxError> + Send + Sync + 'static,
    {
        self.with_method(MethodDecl::new(name, ReceiverKind::Pointer, callable))
    }

    /// Declare a prepared method.
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Attach a type-level annotation.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Finish the declaration.
    ///
    /// Field names must be unique. Method names must be unique across both
    /// receiver forms, ignoring case, since methods are looked up by name
    /// without regard to case.
    pub fn build(self) -> Result<ShapeRef, ShapeError> {
        if self.name.is_empty() {
            return Err(ShapeError::EmptyName);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ShapeError::DuplicateField {
                    shape: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method.lower_name.as_str()) {
                return Err(ShapeError::DuplicateMethod {
                    shape: self.name.clone(),
                    method: method.name.clone(),
                });
            }
        }

        Ok(Arc::new(Shape {
            name: self.name,
            kind: ShapeKind::Struct(self.fields),
            methods: self.methods,
            annotations: self.annotations,
        }))
    }
}
