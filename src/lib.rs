//! SaxSpan - XML to flattened text plus annotation spans
//!
//! A single pass over a document's events produces:
//! - the document's character content with markup removed
//! - one span per element, pointing into that text, with nesting depth
//! - every attribute value, keyed by `element:attribute`
//!
//! Structure discovery lists those keys without importing, and batches of
//! documents are processed in parallel with rayon.

use rustler::{Binary, Env, NifResult, Term};

mod core;
mod term;

pub mod config;
pub mod error;
pub mod import;
pub mod reader;
pub mod strategy;
pub mod structure;

pub use config::ImportConfig;
pub use error::{DocumentError, ImportError, Limit, ParseError, StructureError};
pub use import::{
    import_bytes, import_events, import_str, AnnotationStore, AnnotationValue, ImportedDocument,
    Importer, Marker, Span,
};
pub use reader::{drive, Attribute, EventSink, SliceReader, XmlEvent};
pub use strategy::{discover_corpus, import_batch};
pub use structure::{discover_structure, discover_structure_bytes, StructureCollector};

use term::{document_error_to_term, document_to_term, error_to_term, keys_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Document Import
// ============================================================================

/// Import one document
///
/// Limits are `nil` for unbounded.
#[rustler::nif(schedule = "DirtyCpu")]
fn import_document<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    max_elements: Option<usize>,
    max_depth: Option<usize>,
) -> NifResult<Term<'a>> {
    let config = ImportConfig {
        max_elements,
        max_depth,
    };

    match import_bytes(input.as_slice(), config) {
        Ok(doc) => document_to_term(env, &doc),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

/// Import `[{id, binary}]` in parallel, one result per document in input order
#[rustler::nif(schedule = "DirtyCpu")]
fn import_documents<'a>(
    env: Env<'a>,
    docs: Vec<(String, Binary<'a>)>,
    max_elements: Option<usize>,
    max_depth: Option<usize>,
) -> NifResult<Term<'a>> {
    let config = ImportConfig {
        max_elements,
        max_depth,
    };
    let docs: Vec<(&str, &[u8])> = docs
        .iter()
        .map(|(id, input)| (id.as_str(), input.as_slice()))
        .collect();

    let mut list = Term::list_new_empty(env);
    for result in import_batch(&docs, config).iter().rev() {
        let term = match result {
            Ok(doc) => document_to_term(env, doc)?,
            Err(err) => document_error_to_term(env, err),
        };
        list = list.list_prepend(term);
    }
    Ok(list)
}

// ============================================================================
// Structure Discovery
// ============================================================================

/// Distinct annotation keys across the given documents
#[rustler::nif(schedule = "DirtyCpu", name = "discover_structure")]
fn discover_structure_nif<'a>(env: Env<'a>, inputs: Vec<Binary<'a>>) -> NifResult<Term<'a>> {
    let docs: Vec<(String, &[u8])> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| (i.to_string(), input.as_slice()))
        .collect();

    match discover_corpus(&docs) {
        Ok(keys) => Ok(keys_to_term(env, &keys)),
        Err(err) => Ok(document_error_to_term(env, &err)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.SaxSpan.Native");
