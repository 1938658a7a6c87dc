//! Structure Collector
//!
//! Implements `EventSink` to gather the distinct annotation keys of a
//! document without tracking offsets or depths.

use indexmap::IndexSet;

use crate::error::Result;
use crate::reader::{Attribute, EventSink};

/// Collector of annotation keys, first-seen order
#[derive(Debug, Default, Clone)]
pub struct StructureCollector {
    keys: IndexSet<String>,
    key_buf: String,
}

impl StructureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys collected so far
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Fold another collector's keys in after this one's
    pub fn merge(&mut self, other: StructureCollector) {
        self.keys.extend(other.keys);
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys.into_iter().collect()
    }

    fn insert(&mut self, key: &str) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_owned());
        }
    }
}

impl EventSink for StructureCollector {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<()> {
        if attributes.is_empty() {
            self.insert(name);
            return Ok(());
        }

        let mut key_buf = std::mem::take(&mut self.key_buf);
        for attr in attributes {
            key_buf.clear();
            key_buf.push_str(name);
            key_buf.push(':');
            key_buf.push_str(&attr.name);
            self.insert(&key_buf);
        }
        self.key_buf = key_buf;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{drive, XmlEvent};

    #[test]
    fn test_bare_and_attributed_elements() {
        let events = vec![
            Ok(XmlEvent::start("text", vec![Attribute::new("lang", "sv")])),
            Ok(XmlEvent::start("w", vec![])),
            Ok(XmlEvent::characters("ord")),
            Ok(XmlEvent::end("w")),
            Ok(XmlEvent::start("w", vec![])),
            Ok(XmlEvent::end("w")),
            Ok(XmlEvent::end("text")),
        ];
        let mut collector = StructureCollector::new();
        drive(events, &mut collector).unwrap();

        assert_eq!(collector.keys().collect::<Vec<_>>(), vec!["text:lang", "w"]);
    }

    #[test]
    fn test_attributed_element_name_not_recorded() {
        let mut collector = StructureCollector::new();
        collector
            .start_element("s", &[Attribute::new("id", "1"), Attribute::new("n", "2")])
            .unwrap();

        assert_eq!(collector.into_keys(), vec!["s:id", "s:n"]);
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let mut first = StructureCollector::new();
        first.start_element("a", &[]).unwrap();
        first.start_element("b", &[]).unwrap();

        let mut second = StructureCollector::new();
        second.start_element("c", &[]).unwrap();
        second.start_element("a", &[]).unwrap();

        first.merge(second);
        assert_eq!(first.into_keys(), vec!["a", "b", "c"]);
    }
}
