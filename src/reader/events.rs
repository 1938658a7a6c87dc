//! XML Event Types
//!
//! The three-event vocabulary an import is driven by. Names and text borrow
//! from the decoded input where possible; producers outside this crate can
//! hand in owned strings through the same `Cow` fields.

use std::borrow::Cow;

/// One attribute of a start tag, value already entity-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: Cow<'a, str>,
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent<'a> {
    /// `<name attrs...>`, also emitted for the start half of `<name/>`
    StartElement {
        name: Cow<'a, str>,
        attributes: Vec<Attribute<'a>>,
    },
    /// `</name>`, also emitted for the end half of `<name/>`
    EndElement { name: Cow<'a, str> },
    /// A run of character data or a CDATA section
    Characters(Cow<'a, str>),
}

impl<'a> XmlEvent<'a> {
    pub fn start(name: impl Into<Cow<'a, str>>, attributes: Vec<Attribute<'a>>) -> Self {
        XmlEvent::StartElement {
            name: name.into(),
            attributes,
        }
    }

    pub fn end(name: impl Into<Cow<'a, str>>) -> Self {
        XmlEvent::EndElement { name: name.into() }
    }

    pub fn characters(chunk: impl Into<Cow<'a, str>>) -> Self {
        XmlEvent::Characters(chunk.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(
            XmlEvent::start("w", vec![Attribute::new("pos", "NN")]),
            XmlEvent::StartElement {
                name: Cow::Borrowed("w"),
                attributes: vec![Attribute {
                    name: Cow::Borrowed("pos"),
                    value: Cow::Borrowed("NN"),
                }],
            }
        );
        assert_eq!(
            XmlEvent::end(String::from("tei:w")),
            XmlEvent::EndElement { name: Cow::Borrowed("tei:w") }
        );
        assert_eq!(XmlEvent::characters("x"), XmlEvent::Characters(Cow::Borrowed("x")));
    }
}
