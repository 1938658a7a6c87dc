//! XML Reader Module
//!
//! - Events: the start / end / characters vocabulary imports consume
//! - SliceReader: zero-copy pull reader producing those events
//! - Sink: the `EventSink` trait and the `drive` loop feeding it

pub mod events;
pub mod sink;
pub mod slice;

pub use events::{Attribute, XmlEvent};
pub use sink::{drive, EventSink};
pub use slice::SliceReader;
