//! Opaque annotations carried alongside shapes, methods and field paths.
//!
//! Strand never interprets annotation data. It only keeps it attached to the
//! declaration it came from so a dispatcher can read it back.

use std::collections::BTreeMap;

/// A named annotation with free-form string data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation name, e.g. `"route"`.
    pub name: String,
    /// Key/value payload.
    pub data: BTreeMap<String, String>,
}

impl Annotation {
    /// Create an annotation with no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add a data entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Look up a data entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// An ordered list of annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Find the first annotation with the given name.
    pub fn get(&self, name: &str) -> Option<&Annotation> {
        self.0.iter().find(|a| a.name == name)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_match() {
        let annotations: Annotations = [
            Annotation::new("route").with("path", "/a"),
            Annotation::new("route").with("path", "/b"),
        ]
        .into_iter()
        .collect();

        let route = annotations.get("route").expect("route annotation");
        assert_eq!(route.get("path"), Some("/a"));
        assert!(annotations.get("result").is_none());
        assert_eq!(annotations.len(), 2);
    }
}
