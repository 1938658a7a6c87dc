//! Event dispatch
//!
//! `EventSink` is the seam between an event producer and whatever consumes
//! the events: the importer, the structure collector, or a test double.

use super::events::{Attribute, XmlEvent};
use crate::error::{ParseError, Result};

/// Receiver of start / end / characters events
///
/// Any error aborts the document; `drive` stops at the first one.
pub trait EventSink {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<()>;

    fn end_element(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn characters(&mut self, _chunk: &str) -> Result<()> {
        Ok(())
    }

    /// Route one event to the matching callback
    fn handle(&mut self, event: &XmlEvent<'_>) -> Result<()> {
        match event {
            XmlEvent::StartElement { name, attributes } => self.start_element(name, attributes),
            XmlEvent::EndElement { name } => self.end_element(name),
            XmlEvent::Characters(chunk) => self.characters(chunk),
        }
    }
}

/// Feed an event stream into a sink
///
/// Producer errors are propagated unchanged as `ImportError::Parse`.
pub fn drive<'a, I, S>(events: I, sink: &mut S) -> Result<()>
where
    I: IntoIterator<Item = std::result::Result<XmlEvent<'a>, ParseError>>,
    S: EventSink + ?Sized,
{
    for event in events {
        sink.handle(&event?)?;
    }
    Ok(())
}
