//! Annotation values and the per-document store that collects them.

use indexmap::IndexMap;

/// Position in the flattened text together with the open-element depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker {
    pub offset: usize,
    pub depth: usize,
}

impl Marker {
    pub const fn new(offset: usize, depth: usize) -> Self {
        Marker { offset, depth }
    }
}

/// Extent of one element: where it opened and where it closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Marker,
    pub end: Marker,
}

impl Span {
    pub const fn new(start: Marker, end: Marker) -> Self {
        Span { start, end }
    }

    /// Length in chars of the covered text
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

/// A single annotation value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// Value of an `element:attribute` key
    Attribute(String),
    /// Extent of an `element` key
    Span(Span),
}

impl AnnotationValue {
    pub fn as_span(&self) -> Option<&Span> {
        match self {
            AnnotationValue::Span(span) => Some(span),
            AnnotationValue::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            AnnotationValue::Attribute(value) => Some(value),
            AnnotationValue::Span(_) => None,
        }
    }
}

/// Annotation key to values, keys in first-insertion order
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: IndexMap<String, Vec<AnnotationValue>>,
    /// Scratch space for building `element:attribute` keys
    key_buf: String,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_attribute(&mut self, element: &str, attribute: &str, value: String) {
        self.key_buf.clear();
        self.key_buf.push_str(element);
        self.key_buf.push(':');
        self.key_buf.push_str(attribute);

        let value = AnnotationValue::Attribute(value);
        match self.entries.get_mut(self.key_buf.as_str()) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(self.key_buf.clone(), vec![value]);
            }
        }
    }

    pub fn push_span(&mut self, element: &str, span: Span) {
        let value = AnnotationValue::Span(span);
        match self.entries.get_mut(element) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(element.to_owned(), vec![value]);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[AnnotationValue]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Spans recorded under an element key, in document order
    pub fn spans<'s>(&'s self, element: &str) -> impl Iterator<Item = &'s Span> + 's {
        self.entries
            .get(element)
            .into_iter()
            .flatten()
            .filter_map(AnnotationValue::as_span)
    }

    /// Attribute values recorded under an `element:attribute` key
    pub fn attributes<'s>(&'s self, key: &str) -> impl Iterator<Item = &'s str> + 's {
        self.entries
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(AnnotationValue::as_attribute)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AnnotationValue])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for AnnotationStore {
    fn eq(&self, other: &Self) -> bool {
        // Key order is part of the output.
        self.entries.len() == other.entries.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for AnnotationStore {}
