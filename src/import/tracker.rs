//! Span Tracker
//!
//! Pairs start and end events into spans. Pending starts are kept as a
//! stack per element name, so same-named elements nested inside each other
//! (or repeated before the outer one closes) pair up last-in, first-out,
//! the way end tags close them.

use std::collections::HashMap;

use tracing::trace;

use super::store::{AnnotationStore, Marker, Span};
use crate::config::ImportConfig;
use crate::error::{ImportError, Limit, Result, StructureError};
use crate::reader::Attribute;

#[derive(Debug, Default)]
pub struct SpanTracker {
    pending: HashMap<String, Vec<Marker>>,
    depth: usize,
    elements: usize,
    max_elements: Option<usize>,
    max_depth: Option<usize>,
}

impl SpanTracker {
    pub fn new(config: &ImportConfig) -> Self {
        SpanTracker {
            max_elements: config.max_elements,
            max_depth: config.max_depth,
            ..Self::default()
        }
    }

    /// Current open-element depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of start tags seen so far
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements
    }

    /// Open an element at `offset`; attribute values go straight to the store
    pub fn on_start(
        &mut self,
        name: &str,
        attributes: &[Attribute<'_>],
        offset: usize,
        store: &mut AnnotationStore,
    ) -> Result<()> {
        self.elements += 1;
        if let Some(max) = self.max_elements.filter(|&max| self.elements > max) {
            return Err(ImportError::LimitExceeded {
                limit: Limit::Elements,
                value: max,
            });
        }

        self.depth += 1;
        if let Some(max) = self.max_depth.filter(|&max| self.depth > max) {
            return Err(ImportError::LimitExceeded {
                limit: Limit::Depth,
                value: max,
            });
        }

        let marker = Marker::new(offset, self.depth);
        match self.pending.get_mut(name) {
            Some(stack) => stack.push(marker),
            None => {
                self.pending.insert(name.to_owned(), vec![marker]);
            }
        }

        for attr in attributes {
            store.push_attribute(name, &attr.name, attr.value.clone().into_owned());
        }
        Ok(())
    }

    /// Close the innermost open element called `name`
    pub fn on_end(&mut self, name: &str, offset: usize, store: &mut AnnotationStore) -> Result<Span> {
        let start = self
            .pending
            .get_mut(name)
            .and_then(Vec::pop)
            .ok_or_else(|| StructureError::UnmatchedEnd {
                name: name.to_owned(),
            })?;

        let span = Span::new(start, Marker::new(offset, self.depth));
        trace!(element = name, ?span, "span closed");
        store.push_span(name, span);
        // A successful pop means at least one element is open.
        self.depth -= 1;
        Ok(span)
    }

    /// Check that every element was closed
    ///
    /// Reports the outermost element still open.
    pub fn finish(&self) -> Result<()> {
        let unclosed = self
            .pending
            .iter()
            .filter_map(|(name, stack)| stack.first().map(|m| (m.depth, name)))
            .min();

        match unclosed {
            Some((_, name)) => Err(StructureError::Unclosed { name: name.clone() }.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (SpanTracker, AnnotationStore) {
        (SpanTracker::new(&ImportConfig::default()), AnnotationStore::new())
    }

    #[test]
    fn test_depth_is_recorded_after_increment() {
        let (mut t, mut store) = tracker();
        t.on_start("text", &[], 0, &mut store).unwrap();
        t.on_start("s", &[], 0, &mut store).unwrap();
        let s = t.on_end("s", 5, &mut store).unwrap();
        let text = t.on_end("text", 5, &mut store).unwrap();

        assert_eq!(s, Span::new(Marker::new(0, 2), Marker::new(5, 2)));
        assert_eq!(text, Span::new(Marker::new(0, 1), Marker::new(5, 1)));
        assert_eq!(t.depth(), 0);
        assert!(t.finish().is_ok());
    }

    #[test]
    fn test_same_name_pairs_lifo() {
        let (mut t, mut store) = tracker();
        t.on_start("a", &[], 0, &mut store).unwrap();
        t.on_start("a", &[], 0, &mut store).unwrap();
        let inner = t.on_end("a", 1, &mut store).unwrap();
        let outer = t.on_end("a", 2, &mut store).unwrap();

        assert_eq!(inner, Span::new(Marker::new(0, 2), Marker::new(1, 2)));
        assert_eq!(outer, Span::new(Marker::new(0, 1), Marker::new(2, 1)));
    }

    #[test]
    fn test_attributes_are_stored_at_start() {
        let (mut t, mut store) = tracker();
        let attrs = [Attribute::new("id", "1"), Attribute::new("n", "x")];
        t.on_start("w", &attrs, 0, &mut store).unwrap();

        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["w:id", "w:n"]);
        assert!(store.get("w").is_none());
    }

    #[test]
    fn test_unmatched_end() {
        let (mut t, mut store) = tracker();
        t.on_start("a", &[], 0, &mut store).unwrap();
        let err = t.on_end("b", 0, &mut store).unwrap_err();

        assert_eq!(
            err,
            ImportError::MalformedStructure(StructureError::UnmatchedEnd { name: "b".into() })
        );
        assert!(store.get("b").is_none());
        assert_eq!(t.depth(), 1);
    }

    #[test]
    fn test_finish_reports_outermost_unclosed() {
        let (mut t, mut store) = tracker();
        t.on_start("text", &[], 0, &mut store).unwrap();
        t.on_start("p", &[], 0, &mut store).unwrap();
        t.on_start("s", &[], 0, &mut store).unwrap();
        t.on_end("s", 0, &mut store).unwrap();

        assert_eq!(
            t.finish().unwrap_err(),
            ImportError::MalformedStructure(StructureError::Unclosed { name: "text".into() })
        );
    }

    #[test]
    fn test_element_limit() {
        let mut t = SpanTracker::new(&ImportConfig::new().with_max_elements(2));
        let mut store = AnnotationStore::new();
        t.on_start("a", &[], 0, &mut store).unwrap();
        t.on_end("a", 0, &mut store).unwrap();
        t.on_start("a", &[], 0, &mut store).unwrap();
        t.on_end("a", 0, &mut store).unwrap();

        assert_eq!(
            t.on_start("a", &[], 0, &mut store).unwrap_err(),
            ImportError::LimitExceeded {
                limit: Limit::Elements,
                value: 2
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut t = SpanTracker::new(&ImportConfig::new().with_max_depth(2));
        let mut store = AnnotationStore::new();
        t.on_start("a", &[], 0, &mut store).unwrap();
        t.on_start("b", &[], 0, &mut store).unwrap();
        t.on_end("b", 0, &mut store).unwrap();
        t.on_start("b", &[], 0, &mut store).unwrap();

        assert!(matches!(
            t.on_start("c", &[], 0, &mut store),
            Err(ImportError::LimitExceeded {
                limit: Limit::Depth,
                ..
            })
        ));
        assert_eq!(t.element_count(), 4);
    }
}
