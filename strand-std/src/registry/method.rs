//! Method metadata supplied alongside a registered type.

use std::collections::BTreeMap;
use strand_core::{Annotation, Annotations, ShapeRef};

/// A declared method parameter.
#[derive(Debug, Clone)]
pub struct MethodArg {
    /// Parameter name.
    pub name: String,
    /// Parameter shape.
    pub shape: ShapeRef,
}

/// Externally supplied metadata about one method of a registered type.
#[derive(Debug, Clone)]
pub struct MethodType {
    name: String,
    lower_name: String,
    args: Vec<MethodArg>,
    render_arg_names: BTreeMap<usize, Vec<String>>,
    index: usize,
    annotations: Annotations,
}

impl MethodType {
    /// Describe a method by name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            lower_name: name.to_lowercase(),
            name,
            args: Vec::new(),
            render_arg_names: BTreeMap::new(),
            index: 0,
            annotations: Annotations::new(),
        }
    }

    /// Add a parameter.
    pub fn arg(mut self, name: impl Into<String>, shape: &ShapeRef) -> Self {
        self.args.push(MethodArg {
            name: name.into(),
            shape: ShapeRef::clone(shape),
        });
        self
    }

    /// Record the argument names passed to a render call on `line`.
    pub fn render_args<I, S>(mut self, line: usize, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.render_arg_names
            .insert(line, names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an annotation.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Method name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order.
    pub fn args(&self) -> &[MethodArg] {
        &self.args
    }

    /// Render-call argument names keyed by source line.
    pub fn render_arg_names(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.render_arg_names
    }

    /// Position among the type's methods, in registration order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Annotations attached to the method.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Method name, lowercased.
    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }
}
