//! Zero-Copy Slice Reader
//!
//! Pulls `XmlEvent`s out of a decoded document. Names, attribute values and
//! text borrow from the input unless entity decoding forces a copy.
//!
//! Line endings in text and CDATA are normalized to `\n`; literal
//! whitespace in attribute values becomes spaces.
//!
//! Comments, processing instructions, the XML declaration and DOCTYPE are
//! skipped. Lexical errors (unterminated constructs, malformed tags) end the
//! stream with a `ParseError`; element nesting is not checked here.

use super::events::{Attribute, XmlEvent};
use crate::core::entities::{decode_attribute, decode_text, normalize_line_endings};
use crate::core::scanner::{is_name_start_char, Scanner};
use crate::error::ParseError;
use std::borrow::Cow;

/// Pull reader over a UTF-8 document
pub struct SliceReader<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    /// End half of a self-closing tag, delivered on the next call
    pending_end: Option<&'a str>,
    failed: bool,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            input,
            scanner: Scanner::new(input.as_bytes()),
            pending_end: None,
            failed: false,
        }
    }

    /// Get the next event, `Ok(None)` at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(XmlEvent::end(name)));
        }

        while !self.scanner.is_eof() {
            if self.scanner.peek() != Some(b'<') {
                return Ok(Some(self.read_text()));
            }
            if let Some(event) = self.read_markup()? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    fn read_text(&mut self) -> XmlEvent<'a> {
        let start = self.scanner.position();
        let end = self.scanner.next_markup();
        self.scanner.set_position(end);
        XmlEvent::Characters(decode_text(&self.input[start..end]))
    }

    /// Read one markup construct; `None` for constructs that produce no event
    fn read_markup(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        let start = self.scanner.position();

        match self.scanner.peek_at(1) {
            Some(b'/') => self.read_end_tag(start).map(Some),
            Some(b'?') => {
                self.skip_past(b"?>", start, "unterminated processing instruction")?;
                Ok(None)
            }
            Some(b'!') => {
                if self.scanner.starts_with(b"<!--") {
                    self.skip_past(b"-->", start, "unterminated comment")?;
                    Ok(None)
                } else if self.scanner.starts_with(b"<![CDATA[") {
                    self.read_cdata(start)
                } else {
                    self.skip_declaration(start)?;
                    Ok(None)
                }
            }
            Some(c) if is_name_start_char(c) => self.read_start_tag(start).map(Some),
            _ => Err(ParseError::new("'<' does not start a tag", start)),
        }
    }

    fn read_start_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        self.scanner.advance(1);
        let name = self.read_name(start, "missing element name")?;
        let mut attributes = Vec::new();

        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b'>') => {
                    self.scanner.advance(1);
                    break;
                }
                Some(b'/') if self.scanner.peek_at(1) == Some(b'>') => {
                    self.scanner.advance(2);
                    self.pending_end = Some(name);
                    break;
                }
                Some(c) if is_name_start_char(c) => attributes.push(self.read_attribute()?),
                Some(_) => {
                    return Err(ParseError::new(
                        format!("unexpected character in tag <{name}>"),
                        self.scanner.position(),
                    ))
                }
                None => return Err(ParseError::new(format!("unterminated tag <{name}>"), start)),
            }
        }

        Ok(XmlEvent::StartElement {
            name: Cow::Borrowed(name),
            attributes,
        })
    }

    fn read_attribute(&mut self) -> Result<Attribute<'a>, ParseError> {
        let attr_start = self.scanner.position();
        let name = self.read_name(attr_start, "missing attribute name")?;

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            return Err(ParseError::new(
                format!("attribute {name} has no value"),
                self.scanner.position(),
            ));
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(ParseError::new(
                    format!("value of attribute {name} is not quoted"),
                    self.scanner.position(),
                ))
            }
        };
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let value_end = self.scanner.find_byte(quote).ok_or_else(|| {
            ParseError::new(format!("unterminated value of attribute {name}"), attr_start)
        })?;
        self.scanner.set_position(value_end + 1);

        Ok(Attribute {
            name: Cow::Borrowed(name),
            value: decode_attribute(&self.input[value_start..value_end]),
        })
    }

    fn read_end_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        self.scanner.advance(2);
        let name = self.read_name(start, "missing name in end tag")?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ParseError::new(format!("malformed end tag </{name}"), start));
        }
        self.scanner.advance(1);
        Ok(XmlEvent::end(name))
    }

    fn read_cdata(&mut self, start: usize) -> Result<Option<XmlEvent<'a>>, ParseError> {
        self.scanner.advance(b"<![CDATA[".len());
        let content_start = self.scanner.position();
        let content_end = self.skip_past(b"]]>", start, "unterminated CDATA section")?;

        if content_end == content_start {
            return Ok(None);
        }
        Ok(Some(XmlEvent::Characters(normalize_line_endings(
            &self.input[content_start..content_end],
        ))))
    }

    /// Skip `<!DOCTYPE ...>` and similar declarations, honouring an internal subset
    fn skip_declaration(&mut self, start: usize) -> Result<(), ParseError> {
        let mut depth = 0usize;
        self.scanner.advance(2);

        while let Some(c) = self.scanner.peek() {
            self.scanner.advance(1);
            match c {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::new("unterminated declaration", start))
    }

    /// Move past `terminator`, returning where it began
    fn skip_past(
        &mut self,
        terminator: &[u8],
        start: usize,
        message: &str,
    ) -> Result<usize, ParseError> {
        match self.scanner.find_sequence(terminator) {
            Some(pos) => {
                self.scanner.set_position(pos + terminator.len());
                Ok(pos)
            }
            None => Err(ParseError::new(message, start)),
        }
    }

    fn read_name(&mut self, start: usize, message: &str) -> Result<&'a str, ParseError> {
        match self.scanner.read_name() {
            Some((from, to)) => Ok(&self.input[from..to]),
            None => Err(ParseError::new(message, start)),
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<XmlEvent<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for SliceReader<'_> {}
