//! Structure Discovery
//!
//! A standalone pass listing which annotation keys a document would produce,
//! for previewing a corpus before importing it. Elements without attributes
//! contribute their name; elements with attributes contribute one
//! `element:attribute` key per attribute.

pub mod collector;

use crate::core::encoding::decode_document;
use crate::error::Result;
use crate::reader::{drive, SliceReader};

pub use collector::StructureCollector;

/// Collect the keys of one decoded document into `collector`
pub fn collect_structure(input: &str, collector: &mut StructureCollector) -> Result<()> {
    drive(SliceReader::new(input), collector)
}

/// Distinct annotation keys of one document, first-seen order
pub fn discover_structure(input: &str) -> Result<Vec<String>> {
    let mut collector = StructureCollector::new();
    collect_structure(input, &mut collector)?;
    Ok(collector.into_keys())
}

/// Like `discover_structure`, for raw document bytes
pub fn discover_structure_bytes(input: &[u8]) -> Result<Vec<String>> {
    let text = decode_document(input)?;
    discover_structure(&text)
}
