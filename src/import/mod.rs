//! Document Import
//!
//! Turns one document's event stream into flattened text plus annotations.
//!
//! ## Architecture
//!
//! ```text
//! SliceReader --XmlEvent--> Importer (EventSink)
//!                              ├── FlattenedText   characters
//!                              ├── SpanTracker     start / end
//!                              └── AnnotationStore spans + attribute values
//! ```
//!
//! All state belongs to a single `Importer`, built fresh per document and
//! consumed by `finish`. After the first error the importer rejects every
//! further event with that same error, so a broken document can never yield
//! partial output.

pub mod store;
pub mod text;
pub mod tracker;

use tracing::debug;

use crate::config::ImportConfig;
use crate::core::encoding::decode_document;
use crate::error::{ImportError, ParseError, Result};
use crate::reader::{drive, Attribute, EventSink, SliceReader, XmlEvent};

pub use store::{AnnotationStore, AnnotationValue, Marker, Span};
pub use text::FlattenedText;
pub use tracker::SpanTracker;

/// Result of importing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    text: FlattenedText,
    /// Distinct annotation keys, first-seen order
    pub structure: Vec<String>,
    pub annotations: AnnotationStore,
}

impl ImportedDocument {
    /// The flattened character content
    pub fn text(&self) -> &str {
        self.text.final_text()
    }

    /// Text covered by a span of this document
    pub fn span_text(&self, span: &Span) -> Option<&str> {
        self.text.slice(span.start.offset, span.end.offset)
    }

    pub fn into_parts(self) -> (String, Vec<String>, AnnotationStore) {
        (self.text.into_string(), self.structure, self.annotations)
    }
}

/// Per-document import state
#[derive(Debug)]
pub struct Importer {
    text: FlattenedText,
    tracker: SpanTracker,
    store: AnnotationStore,
    failed: Option<ImportError>,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Importer {
            text: FlattenedText::new(),
            tracker: SpanTracker::new(&config),
            store: AnnotationStore::new(),
            failed: None,
        }
    }

    #[inline]
    pub fn current_offset(&self) -> usize {
        self.text.current_offset()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.tracker.depth()
    }

    /// Close the document and hand over its outputs
    pub fn finish(self) -> Result<ImportedDocument> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        self.tracker.finish()?;

        let structure: Vec<String> = self.store.keys().map(str::to_owned).collect();
        debug!(
            chars = self.text.current_offset(),
            elements = self.tracker.element_count(),
            keys = structure.len(),
            "document imported"
        );

        Ok(ImportedDocument {
            text: self.text,
            structure,
            annotations: self.store,
        })
    }

    /// Run `step` unless a previous event already failed, remembering any new failure
    fn guarded(&mut self, step: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = step(self);
        if let Err(err) = &result {
            self.failed = Some(err.clone());
        }
        result
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl EventSink for Importer {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<()> {
        self.guarded(|this| {
            let offset = this.text.current_offset();
            this.tracker.on_start(name, attributes, offset, &mut this.store)
        })
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.guarded(|this| {
            let offset = this.text.current_offset();
            this.tracker.on_end(name, offset, &mut this.store).map(drop)
        })
    }

    fn characters(&mut self, chunk: &str) -> Result<()> {
        self.guarded(|this| {
            this.text.push(chunk);
            Ok(())
        })
    }
}

/// Import a document from any event producer
pub fn import_events<'a, I>(events: I, config: ImportConfig) -> Result<ImportedDocument>
where
    I: IntoIterator<Item = std::result::Result<XmlEvent<'a>, ParseError>>,
{
    let mut importer = Importer::new(config);
    drive(events, &mut importer)?;
    importer.finish()
}

/// Import a decoded XML document
pub fn import_str(input: &str, config: ImportConfig) -> Result<ImportedDocument> {
    import_events(SliceReader::new(input), config)
}

/// Import raw document bytes (UTF-8, or UTF-16 with BOM)
pub fn import_bytes(input: &[u8], config: ImportConfig) -> Result<ImportedDocument> {
    let text = decode_document(input)?;
    import_str(&text, config)
}
